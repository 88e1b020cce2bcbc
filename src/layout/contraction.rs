//! Fuzzy similarity layout contraction.
//!
//! Starting from the raw grid coordinates, every unit is repeatedly pulled
//! towards the units it is similar to. Each round reads only the positions of
//! the previous round, so the result does not depend on the order in which
//! units are visited.
//!
//! References:
//! - Himberg (2000): "A SOM based cluster visualization and its application
//!   for false coloring"

use crate::config::LayoutConfig;
use crate::error::{GridError, Result};
use crate::layout::matrix::{SimilarityMatrix, UnitDistanceMatrix};
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// A point in the 2D layout plane, in grid units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate.
    pub x: f64,
    /// Vertical coordinate.
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

/// One layout position per unit slot of a flat grid, row-major.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionGrid {
    x_size: usize,
    y_size: usize,
    points: Vec<Point>,
}

impl PositionGrid {
    /// Positions equal to the raw grid coordinates.
    pub fn initial(x_size: usize, y_size: usize) -> Self {
        let points = (0..x_size * y_size)
            .map(|i| Point::new((i % x_size) as f64, (i / x_size) as f64))
            .collect();

        Self {
            x_size,
            y_size,
            points,
        }
    }

    /// Number of columns.
    #[inline]
    pub fn x_size(&self) -> usize {
        self.x_size
    }

    /// Number of rows.
    #[inline]
    pub fn y_size(&self) -> usize {
        self.y_size
    }

    /// Position of the unit at `(x, y)`.
    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Point> {
        if x < self.x_size && y < self.y_size {
            Some(self.points[y * self.x_size + x])
        } else {
            None
        }
    }

    /// All positions in row-major order.
    #[inline]
    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Iterates over `((x, y), position)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = ((usize, usize), Point)> + '_ {
        let x_size = self.x_size;
        self.points
            .iter()
            .enumerate()
            .map(move |(i, p)| ((i % x_size, i / x_size), *p))
    }
}

/// Contracts a flat grid's layout using the distances in `matrix`.
///
/// Similarity is `exp(-d^2 / temperature)`, row-normalized. Each of the
/// `rounds` rounds moves every unit `(x, y)` by the similarity-weighted sum
/// of offsets towards the units `(x1, y1)` with `x != x1 && y != y1`; units
/// sharing a row or column with it do not pull.
///
/// With `rounds == 0` the raw grid coordinates are returned.
pub fn contract_layout(matrix: &UnitDistanceMatrix, temperature: f64, rounds: usize) -> Result<PositionGrid> {
    let (x_size, y_size, z_size) = matrix.extent();
    if z_size != 1 {
        return Err(GridError::DimensionMismatch(format!(
            "layout contraction needs a single layer, matrix covers {} layers",
            z_size
        )));
    }

    let similarity = SimilarityMatrix::from_distances(matrix, temperature)?;
    let n = similarity.size();
    let mut positions = PositionGrid::initial(x_size, y_size);

    info!(
        "Contracting layout: {} units, temperature={}, {} rounds",
        n, temperature, rounds
    );

    for round in 0..rounds {
        let current = &positions.points;
        let next: Vec<Point> = (0..n)
            .into_par_iter()
            .map(|i| pulled(i, x_size, current, similarity.row(i)))
            .collect();

        let displacement: f64 = current
            .iter()
            .zip(next.iter())
            .map(|(a, b)| a.distance(b))
            .sum::<f64>()
            / n as f64;
        debug!("Round {}: mean displacement {:.6}", round + 1, displacement);

        positions.points = next;
    }

    info!("Layout contraction completed");
    Ok(positions)
}

/// Variant of [`contract_layout`] for round counts arriving as signed values.
pub fn contract_layout_checked(matrix: &UnitDistanceMatrix, temperature: f64, rounds: i64) -> Result<PositionGrid> {
    let rounds = usize::try_from(rounds)
        .map_err(|_| GridError::InvalidParameter(format!("round count must not be negative, got {}", rounds)))?;
    contract_layout(matrix, temperature, rounds)
}

/// Contracts with the temperature and round count from `config`.
pub fn contract_with(matrix: &UnitDistanceMatrix, config: &LayoutConfig) -> Result<PositionGrid> {
    config.validate()?;
    contract_layout(matrix, config.temperature, config.rounds)
}

fn pulled(i: usize, x_size: usize, current: &[Point], similarity: &[f64]) -> Point {
    let (x, y) = (i % x_size, i / x_size);
    let loc = current[i];
    let mut moved = loc;

    for (j, (other, s)) in current.iter().zip(similarity.iter()).enumerate() {
        let (x1, y1) = (j % x_size, j / x_size);
        if x != x1 && y != y1 {
            moved.x += (other.x - loc.x) * s;
            moved.y += (other.y - loc.y) * s;
        }
    }

    moved
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::som::{Grid, Topology};

    fn matrix(x: usize, y: usize) -> UnitDistanceMatrix {
        let grid = Grid::new_geometric(x, y, 1, Topology::Rectangular).unwrap();
        UnitDistanceMatrix::from_grid(&grid)
    }

    fn centroid(points: &[Point]) -> Point {
        let n = points.len() as f64;
        Point::new(
            points.iter().map(|p| p.x).sum::<f64>() / n,
            points.iter().map(|p| p.y).sum::<f64>() / n,
        )
    }

    #[test]
    fn test_zero_rounds_is_identity() {
        let positions = contract_layout(&matrix(4, 3), 1.0, 0).unwrap();
        assert_eq!(positions, PositionGrid::initial(4, 3));
        assert_eq!(positions.get(3, 2), Some(Point::new(3.0, 2.0)));
        assert_eq!(positions.get(4, 0), None);
    }

    #[test]
    fn test_high_temperature_moves_towards_centroid() {
        let initial = PositionGrid::initial(4, 4);
        let c = centroid(initial.points());
        let positions = contract_layout(&matrix(4, 4), 1e6, 1).unwrap();

        for ((x, y), p) in positions.iter() {
            let before = initial.get(x, y).unwrap();
            let displacement = before.distance(&p);
            assert!(p.distance(&c) <= before.distance(&c) + 1e-9, "({x}, {y}) moved away");
            assert!(displacement <= before.distance(&c) + 1e-9, "({x}, {y}) overshot");
        }

        // corner pulled strictly inwards: 3 * (1 + 2 + 3) / 16 along each axis
        let corner = positions.get(0, 0).unwrap();
        assert!((corner.x - 1.125).abs() < 1e-3);
        assert!((corner.y - 1.125).abs() < 1e-3);
    }

    #[test]
    fn test_same_row_and_column_do_not_pull() {
        // in a 1 x n grid every pair shares the row
        let positions = contract_layout(&matrix(5, 1), 1.0, 4).unwrap();
        assert_eq!(positions, PositionGrid::initial(5, 1));
    }

    #[test]
    fn test_symmetric_grid_centre_is_fixed() {
        let positions = contract_layout(&matrix(3, 3), 2.0, 5).unwrap();
        let centre = positions.get(1, 1).unwrap();
        assert!((centre.x - 1.0).abs() < 1e-12);
        assert!((centre.y - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_rounds_contract_further() {
        let c = Point::new(2.0, 2.0);
        let one = contract_layout(&matrix(5, 5), 4.0, 1).unwrap();
        let three = contract_layout(&matrix(5, 5), 4.0, 3).unwrap();

        let corner_one = one.get(0, 0).unwrap().distance(&c);
        let corner_three = three.get(0, 0).unwrap().distance(&c);
        assert!(corner_three < corner_one);
    }

    #[test]
    fn test_input_matrix_not_mutated() {
        let m = matrix(3, 3);
        let before = m.clone();
        contract_layout(&m, 1.0, 2).unwrap();
        assert_eq!(m, before);
    }

    #[test]
    fn test_invalid_parameters() {
        let m = matrix(2, 2);
        assert!(matches!(contract_layout(&m, 0.0, 1), Err(GridError::InvalidParameter(_))));
        assert!(matches!(
            contract_layout_checked(&m, 1.0, -1),
            Err(GridError::InvalidParameter(_))
        ));
        assert!(contract_layout_checked(&m, 1.0, 2).is_ok());
    }

    #[test]
    fn test_multi_layer_rejected() {
        let grid = Grid::new_geometric(2, 2, 2, Topology::Rectangular).unwrap();
        let m = UnitDistanceMatrix::from_grid(&grid);
        assert!(matches!(contract_layout(&m, 1.0, 1), Err(GridError::DimensionMismatch(_))));
    }

    #[test]
    fn test_contract_with_config() {
        let config = LayoutConfig {
            temperature: 1e6,
            rounds: 1,
            ..Default::default()
        };
        let a = contract_with(&matrix(3, 3), &config).unwrap();
        let b = contract_layout(&matrix(3, 3), 1e6, 1).unwrap();
        assert_eq!(a, b);
    }
}
