//! Colour assignment for contracted layouts.

use crate::layout::contraction::PositionGrid;
use serde::{Deserialize, Serialize};

/// An 8-bit RGB triple.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb {
    /// Creates a new colour.
    #[inline]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// One colour per unit slot, row-major like [`PositionGrid`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColorGrid {
    x_size: usize,
    y_size: usize,
    colors: Vec<Rgb>,
}

impl ColorGrid {
    /// Colour of the unit at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Rgb> {
        if x < self.x_size && y < self.y_size {
            Some(self.colors[y * self.x_size + x])
        } else {
            None
        }
    }

    /// All colours in row-major order.
    #[inline]
    pub fn colors(&self) -> &[Rgb] {
        &self.colors
    }

    /// Returns `(x_size, y_size)`.
    #[inline]
    pub fn dimensions(&self) -> (usize, usize) {
        (self.x_size, self.y_size)
    }
}

/// Colours each position by a linear gradient over the grid extent.
///
/// Red is 255 at the top and 0 at the bottom, green is 255 on the left and
/// 0 on the right, blue is 0 at the top and 255 at the bottom.
pub fn colors_for(positions: &PositionGrid) -> ColorGrid {
    let x_size = positions.x_size() as f64;
    let y_size = positions.y_size() as f64;
    let zoom_x = 255.0 / x_size;
    let zoom_y = 255.0 / y_size;

    let colors = positions
        .points()
        .iter()
        .map(|p| {
            Rgb::new(
                channel(zoom_y * (y_size - p.y)),
                channel(zoom_x * (x_size - p.x)),
                channel(zoom_y * p.y),
            )
        })
        .collect();

    ColorGrid {
        x_size: positions.x_size(),
        y_size: positions.y_size(),
        colors,
    }
}

#[inline]
fn channel(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}
