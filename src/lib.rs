//! # hexsom - Grid geometry for growing Self-Organizing Maps
//!
//! hexsom provides the spatial primitives a growing SOM and its
//! visualizations are built on: unit addressing under rectangular and
//! hexagonal topologies, neighbor adjacency, map distance, and the fuzzy
//! colour coding layout that projects unit similarity onto a coloured 2D
//! point layout.
//!
//! ## Overview
//!
//! A [`Grid`] holds `x × y × z` slots, each either occupied by a [`Unit`] or
//! empty. Its [`Topology`] decides which slots are adjacent: up to 4 per
//! layer on a rectangular grid, up to 6 on a brick-offset hexagonal grid.
//! Training code asks the grid for neighbors; visualization code asks the
//! [`layout`] module for contracted positions, colours and connecting lines.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hexsom::{Grid, GridConfig, Topology, UnitDistanceMatrix, contract_layout, colors_for};
//!
//! let grid = Grid::new(&GridConfig {
//!     x_size: 8,
//!     y_size: 6,
//!     topology: Topology::Hexagonal,
//!     ..Default::default()
//! })?;
//!
//! // Neighbors for a training step
//! let neighbors = grid.neighbors(3, 3, 0)?;
//!
//! // Fuzzy colour coding for rendering
//! let matrix = UnitDistanceMatrix::from_grid(&grid);
//! let positions = contract_layout(&matrix, 1.0, 3)?;
//! let colors = colors_for(&positions);
//! ```
//!
//! ## Architecture
//!
//! - [`som`] - Grid storage, topologies and map distance
//! - [`layout`] - Distance matrices, layout contraction, colours and lines
//! - [`config`] - Serializable configuration
//! - [`error`] - Error types

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod error;
pub mod layout;
pub mod som;

// Re-export commonly used types
pub use config::{Config, GridConfig, LayoutConfig};
pub use error::{GridError, Result};
pub use layout::{
    colors_for, connections, contract_layout, fuzzy_colour_coding, ColorGrid, DistanceSource, FuzzyLayout, Point,
    PositionGrid, Rgb, Segment, SimilarityMatrix, UnitDistanceMatrix,
};
pub use som::{map_distance, map_distance_squared, Grid, Slot, Topology, Unit};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
