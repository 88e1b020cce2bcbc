//! Grid topologies and their adjacency rules.
//!
//! A map is laid out either as a plain rectangular lattice or as a
//! brick-offset hexagonal lattice. The hexagonal layout shifts every odd row
//! half a unit to the left, so the diagonal neighbors of a unit depend on the
//! parity of its row:
//!
//! ```text
//! y even:   (x, y-1) (x+1, y-1)
//!        (x-1, y)  *  (x+1, y)
//!           (x, y+1) (x+1, y+1)
//!
//! y odd:    (x-1, y-1) (x, y-1)
//!        (x-1, y)  *  (x+1, y)
//!           (x-1, y+1) (x, y+1)
//! ```
//!
//! Both layouts add the two layer neighbors `(x, y, z±1)`.

use serde::{Deserialize, Serialize};

/// Grid extent as `(x_size, y_size, z_size)`.
pub type Extent = (usize, usize, usize);

/// Grid coordinate as `(x, y, z)`.
pub type Coord = (usize, usize, usize);

/// Adjacency rule of a grid, fixed at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// Axis-aligned lattice with up to 4 neighbors per layer.
    Rectangular,
    /// Brick-offset lattice with up to 6 neighbors per layer.
    Hexagonal,
}

impl Topology {
    /// Same-layer offsets `(dx, dy)` for a unit in row `y`, in enumeration order.
    pub fn layer_offsets(self, y: usize) -> &'static [(i64, i64)] {
        match self {
            Topology::Rectangular => &[(-1, 0), (1, 0), (0, -1), (0, 1)],
            Topology::Hexagonal if y % 2 == 1 => {
                &[(-1, 0), (1, 0), (-1, -1), (0, -1), (-1, 1), (0, 1)]
            }
            Topology::Hexagonal => &[(-1, 0), (1, 0), (0, -1), (1, -1), (0, 1), (1, 1)],
        }
    }

    /// Maximum number of neighbors a unit can have within its layer.
    #[inline]
    pub fn max_layer_neighbors(self) -> usize {
        match self {
            Topology::Rectangular => 4,
            Topology::Hexagonal => 6,
        }
    }
}

impl std::fmt::Display for Topology {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Topology::Rectangular => write!(f, "rectangular"),
            Topology::Hexagonal => write!(f, "hexagonal"),
        }
    }
}

/// Shifts `v` by `delta`, returning `None` when the result leaves `[0, size)`.
#[inline]
fn shift(v: usize, delta: i64, size: usize) -> Option<usize> {
    let shifted = v as i64 + delta;
    if shifted < 0 || shifted >= size as i64 {
        None
    } else {
        Some(shifted as usize)
    }
}

/// Enumerates the in-bounds candidate neighbors of `(x, y, z)`.
///
/// Order is fixed: left, right, the row-dependent vertical/diagonal set,
/// then the lower and upper layer. Candidates falling outside `extent`
/// are dropped, never reported.
pub fn candidates(topology: Topology, coord: Coord, extent: Extent) -> Vec<Coord> {
    let (x, y, z) = coord;
    let (x_size, y_size, z_size) = extent;
    let mut out = Vec::with_capacity(topology.max_layer_neighbors() + 2);

    for &(dx, dy) in topology.layer_offsets(y) {
        if let (Some(nx), Some(ny)) = (shift(x, dx, x_size), shift(y, dy, y_size)) {
            out.push((nx, ny, z));
        }
    }
    for dz in [-1, 1] {
        if let Some(nz) = shift(z, dz, z_size) {
            out.push((x, y, nz));
        }
    }

    out
}

/// Returns true when `a` and `b` are adjacent under `topology`.
pub fn are_adjacent(topology: Topology, a: Coord, b: Coord, extent: Extent) -> bool {
    candidates(topology, a, extent).contains(&b)
}
