//! Unit distance and similarity matrices.

use crate::error::{GridError, Result};
use crate::som::{self, Extent, Grid};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Tolerance for symmetry and zero-diagonal checks on external matrices.
const SYMMETRY_EPSILON: f64 = 1e-9;

/// Where unit dissimilarities come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceSource {
    /// Euclidean distance between grid coordinates.
    #[default]
    Map,
    /// Euclidean distance between unit weight vectors.
    Weights,
}

/// Square, symmetric matrix of pairwise unit distances with a zero diagonal.
///
/// Rows and columns follow the grid's storage order. The matrix is a
/// snapshot: consumers read it and copy before transforming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitDistanceMatrix {
    extent: Extent,
    values: Vec<f64>,
}

impl UnitDistanceMatrix {
    /// Builds the matrix from the chosen distance source.
    pub fn build(grid: &Grid, source: DistanceSource) -> Self {
        match source {
            DistanceSource::Map => Self::from_grid(grid),
            DistanceSource::Weights => Self::from_weights(grid),
        }
    }

    /// Builds the matrix of map distances between all slots.
    pub fn from_grid(grid: &Grid) -> Self {
        Self::fill(grid.dimensions(), |i, j| {
            som::map_distance(grid.coords_of(i), grid.coords_of(j))
        })
    }

    /// Builds the matrix of weight-vector distances between all slots.
    ///
    /// A pair involving an empty slot is infinitely far apart, so it
    /// contributes zero similarity.
    pub fn from_weights(grid: &Grid) -> Self {
        let slots = grid.slots();
        Self::fill(grid.dimensions(), |i, j| {
            if i == j {
                return 0.0;
            }
            match (slots[i].unit(), slots[j].unit()) {
                (Some(a), Some(b)) => som::weight_distance(&a.weights, &b.weights),
                _ => f64::INFINITY,
            }
        })
    }

    /// Wraps externally computed distances in row-major order.
    ///
    /// Rejects a wrong length, NaN or negative entries, a non-zero diagonal
    /// or an asymmetric matrix. Infinite distances mark unreachable pairs.
    pub fn from_values(extent: Extent, values: Vec<f64>) -> Result<Self> {
        let n = extent.0 * extent.1 * extent.2;
        if values.len() != n * n {
            return Err(GridError::DimensionMismatch(format!(
                "{} distances supplied for {} units ({} expected)",
                values.len(),
                n,
                n * n
            )));
        }

        if let Some(i) = values.iter().position(|v| v.is_nan() || *v < 0.0) {
            return Err(GridError::InvalidParameter(format!(
                "distance ({}, {}) is {}, expected a non-negative number",
                i / n,
                i % n,
                values[i]
            )));
        }

        for i in 0..n {
            if values[i * n + i].abs() > SYMMETRY_EPSILON {
                return Err(GridError::InvalidParameter(format!(
                    "diagonal entry {} is {}, expected 0",
                    i,
                    values[i * n + i]
                )));
            }
            for j in (i + 1)..n {
                let (a, b) = (values[i * n + j], values[j * n + i]);
                if a != b && (a - b).abs() > SYMMETRY_EPSILON {
                    return Err(GridError::InvalidParameter(format!(
                        "distance matrix not symmetric at ({}, {}): {} vs {}",
                        i, j, a, b
                    )));
                }
            }
        }

        Ok(Self { extent, values })
    }

    fn fill(extent: Extent, distance: impl Fn(usize, usize) -> f64 + Sync) -> Self {
        let n = extent.0 * extent.1 * extent.2;
        let mut values = vec![0.0; n * n];

        values.par_chunks_mut(n).enumerate().for_each(|(i, row)| {
            for (j, v) in row.iter_mut().enumerate() {
                *v = distance(i, j);
            }
        });

        Self { extent, values }
    }

    /// Grid extent the matrix was built for.
    #[inline]
    pub fn extent(&self) -> Extent {
        self.extent
    }

    /// Number of units (rows).
    #[inline]
    pub fn size(&self) -> usize {
        self.extent.0 * self.extent.1 * self.extent.2
    }

    /// Distance between units `i` and `j`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.size() + j]
    }

    /// One row of the matrix.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        let n = self.size();
        &self.values[i * n..(i + 1) * n]
    }

    /// All distances in row-major order.
    #[inline]
    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

/// Row-stochastic similarity matrix derived from unit distances.
///
/// `S[i][j] = exp(-D[i][j]^2 / T)`, then each row divided by its sum.
/// Normalization makes the matrix asymmetric in general.
#[derive(Debug, Clone)]
pub struct SimilarityMatrix {
    n: usize,
    values: Vec<f64>,
}

impl SimilarityMatrix {
    /// Transforms a private copy of `distances` at the given temperature.
    pub fn from_distances(distances: &UnitDistanceMatrix, temperature: f64) -> Result<Self> {
        if !temperature.is_finite() || temperature <= 0.0 {
            return Err(GridError::InvalidParameter(format!(
                "temperature must be positive and finite, got {}",
                temperature
            )));
        }

        let n = distances.size();
        let mut values = distances.values().to_vec();

        values.par_chunks_mut(n.max(1)).for_each(|row| {
            for v in row.iter_mut() {
                *v = (-(*v * *v) / temperature).exp();
            }
            // diagonal is exp(0) = 1, so the sum is never zero
            let sum: f64 = row.iter().sum();
            for v in row.iter_mut() {
                *v /= sum;
            }
        });

        Ok(Self { n, values })
    }

    /// Number of units (rows).
    #[inline]
    pub fn size(&self) -> usize {
        self.n
    }

    /// Similarity of unit `j` as seen from unit `i`.
    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.n + j]
    }

    /// One row of the matrix.
    #[inline]
    pub fn row(&self, i: usize) -> &[f64] {
        &self.values[i * self.n..(i + 1) * self.n]
    }
}
