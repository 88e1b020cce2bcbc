//! Distances between units.
//!
//! Map distance is the plain Euclidean distance between integer grid
//! coordinates. It is topology independent: hexagonal grids get no packing
//! correction: `(0, 0)` is a hex neighbor of both `(0, 1)` and `(1, 1)`, yet
//! the first pair is 1.0 apart and the second sqrt(2).

use crate::som::topology::Coord;

/// Computes the squared Euclidean distance between two grid coordinates.
#[inline]
pub fn map_distance_squared(a: Coord, b: Coord) -> f64 {
    let dx = a.0 as f64 - b.0 as f64;
    let dy = a.1 as f64 - b.1 as f64;
    let dz = a.2 as f64 - b.2 as f64;
    dx * dx + dy * dy + dz * dz
}

/// Computes the Euclidean distance between two grid coordinates.
#[inline]
pub fn map_distance(a: Coord, b: Coord) -> f64 {
    map_distance_squared(a, b).sqrt()
}

/// Computes the Euclidean distance between two weight vectors.
pub fn weight_distance(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "Weight dimensions must match");

    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).powi(2))
        .sum::<f64>()
        .sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_distance() {
        let dist = map_distance((0, 0, 0), (3, 4, 0));
        assert!((dist - 5.0).abs() < 1e-10); // 3-4-5 triangle
    }

    #[test]
    fn test_map_distance_self_is_zero() {
        assert_eq!(map_distance((2, 7, 1), (2, 7, 1)), 0.0);
    }

    #[test]
    fn test_map_distance_symmetric() {
        let coords = [(0, 0, 0), (1, 3, 0), (4, 1, 2), (2, 2, 1)];
        for &a in &coords {
            for &b in &coords {
                assert_eq!(map_distance(a, b), map_distance(b, a));
            }
        }
    }

    #[test]
    fn test_map_distance_includes_layers() {
        assert!((map_distance_squared((0, 0, 0), (1, 1, 1)) - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_hex_diagonal_not_corrected() {
        // (0, 0) neighbors both (0, 1) and (1, 1) on a hex grid
        assert!((map_distance((0, 1, 0), (0, 0, 0)) - 1.0).abs() < 1e-12);
        assert!((map_distance((1, 1, 0), (0, 0, 0)) - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn test_weight_distance() {
        let dist = weight_distance(&[1.0, 0.0, 0.0], &[0.0, 1.0, 0.0]);
        assert!((dist - std::f64::consts::SQRT_2).abs() < 1e-10);
    }
}
