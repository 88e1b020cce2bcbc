//! Self-Organizing Map grid geometry.
//!
//! This module provides the spatial side of a growing SOM:
//!
//! - **Grid**: sparse 2D/3D unit storage with bounds-checked addressing (grid.rs)
//! - **Topology**: rectangular and hexagonal adjacency rules (topology.rs)
//! - **Distance**: map distance between unit coordinates (distance.rs)

pub mod distance;
mod grid;
pub mod topology;
mod unit;

pub use distance::{map_distance, map_distance_squared, weight_distance};
pub use grid::{Grid, Slot};
pub use topology::{Coord, Extent, Topology};
pub use unit::Unit;
