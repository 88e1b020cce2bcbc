//! Unit representation for the map grid.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

/// A unit in the map grid.
///
/// Each unit has a position `(x, y, z)` on the grid and a weight vector.
/// Purely geometric grids leave the weight vector empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    /// Column position on the grid.
    pub x: usize,
    /// Row position on the grid.
    pub y: usize,
    /// Layer position on the grid.
    pub z: usize,
    /// Weight vector representing the unit's model.
    pub weights: Vec<f64>,
}

impl Unit {
    /// Creates a new unit with random weights.
    ///
    /// Weights are drawn from a normal distribution with mean 0 and std 0.1.
    pub fn new_random<R: Rng>(x: usize, y: usize, z: usize, weight_dim: usize, rng: &mut R) -> Self {
        let normal = Normal::new(0.0, 0.1).expect("constant std is positive");
        let weights: Vec<f64> = (0..weight_dim).map(|_| normal.sample(rng)).collect();

        Self { x, y, z, weights }
    }

    /// Creates a unit without a weight vector.
    pub fn new_geometric(x: usize, y: usize, z: usize) -> Self {
        Self {
            x,
            y,
            z,
            weights: Vec::new(),
        }
    }

    /// Creates a new unit with the given weights.
    pub fn new_with_weights(x: usize, y: usize, z: usize, weights: Vec<f64>) -> Self {
        Self { x, y, z, weights }
    }

    /// Returns the grid coordinates of this unit.
    #[inline]
    pub fn coords(&self) -> (usize, usize, usize) {
        (self.x, self.y, self.z)
    }

    /// Weight vector dimensionality.
    #[inline]
    pub fn dim(&self) -> usize {
        self.weights.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_unit_creation() {
        let unit = Unit::new_geometric(5, 10, 0);
        assert_eq!(unit.coords(), (5, 10, 0));
        assert_eq!(unit.dim(), 0);
    }

    #[test]
    fn test_random_initialization() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let unit = Unit::new_random(0, 0, 0, 100, &mut rng);
        assert_eq!(unit.dim(), 100);
        assert!(unit.weights.iter().any(|&w| w != 0.0));
    }

    #[test]
    fn test_seeded_initialization_is_reproducible() {
        let a = Unit::new_random(1, 2, 0, 16, &mut ChaCha8Rng::seed_from_u64(7));
        let b = Unit::new_random(1, 2, 0, 16, &mut ChaCha8Rng::seed_from_u64(7));
        assert_eq!(a, b);
    }
}
