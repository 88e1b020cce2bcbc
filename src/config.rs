//! Configuration for grid construction and layout contraction.

use crate::error::{GridError, Result};
use crate::layout::DistanceSource;
use crate::som::Topology;
use serde::{Deserialize, Serialize};

/// Main configuration for a map and its visualization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Grid configuration.
    pub grid: GridConfig,

    /// Fuzzy colour coding layout configuration.
    pub layout: LayoutConfig,
}

impl Config {
    /// Checks that every section holds usable values.
    pub fn validate(&self) -> Result<()> {
        self.grid.validate()?;
        self.layout.validate()
    }
}

/// Grid configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Number of columns.
    /// Default: 10.
    pub x_size: usize,

    /// Number of rows.
    /// Default: 10.
    pub y_size: usize,

    /// Number of layers.
    /// Default: 1 (a flat map).
    pub z_size: usize,

    /// Adjacency rule between units.
    /// Default: rectangular.
    pub topology: Topology,

    /// Dimensionality of the unit weight vectors.
    /// Zero builds a purely geometric grid.
    /// Default: 0.
    pub weight_dimension: usize,

    /// Random seed for weight initialization.
    /// Default: None (random).
    pub seed: Option<u64>,

    /// Number of worker threads for parallel computations.
    /// Default: 0 (use all available cores).
    pub num_threads: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            x_size: 10,
            y_size: 10,
            z_size: 1,
            topology: Topology::Rectangular,
            weight_dimension: 0,
            seed: None,
            num_threads: 0,
        }
    }
}

impl GridConfig {
    /// Returns the total number of unit slots.
    #[inline]
    pub fn total_units(&self) -> usize {
        self.x_size * self.y_size * self.z_size
    }

    /// Rejects zero-sized grids.
    pub fn validate(&self) -> Result<()> {
        if self.x_size == 0 || self.y_size == 0 || self.z_size == 0 {
            return Err(GridError::DimensionMismatch(format!(
                "grid size {}x{}x{} has an empty dimension",
                self.x_size, self.y_size, self.z_size
            )));
        }
        Ok(())
    }
}

/// Fuzzy colour coding layout configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Kernel bandwidth turning distance into similarity.
    /// Default: 1.0.
    pub temperature: f64,

    /// Number of contraction rounds.
    /// Default: 3.
    pub rounds: usize,

    /// Distances the similarity kernel is applied to.
    /// Default: map distance.
    #[serde(default)]
    pub source: DistanceSource,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            rounds: 3,
            source: DistanceSource::Map,
        }
    }
}

impl LayoutConfig {
    /// Rejects non-positive or non-finite temperatures.
    pub fn validate(&self) -> Result<()> {
        if !self.temperature.is_finite() || self.temperature <= 0.0 {
            return Err(GridError::InvalidParameter(format!(
                "temperature must be positive and finite, got {}",
                self.temperature
            )));
        }
        Ok(())
    }
}
