//! Fuzzy colour coding layout.
//!
//! Turns a grid into the data a renderer needs to draw a fuzzy colour coding
//! of the map:
//!
//! 1. **Distances**: a unit distance matrix snapshot (matrix.rs)
//! 2. **Contraction**: similarity-driven pulling of unit positions (contraction.rs)
//! 3. **Colours**: a 2D gradient sampled at the contracted positions (colour.rs)
//! 4. **Lines**: topology-aware segments between adjacent units (connections.rs)

mod colour;
mod connections;
pub mod contraction;
pub mod matrix;

pub use colour::{colors_for, ColorGrid, Rgb};
pub use connections::{connections, Segment};
pub use contraction::{contract_layout, contract_layout_checked, contract_with, Point, PositionGrid};
pub use matrix::{DistanceSource, SimilarityMatrix, UnitDistanceMatrix};

use crate::config::Config;
use crate::error::Result;
use crate::som::Grid;
use log::{info, warn};

/// Everything needed to draw a fuzzy colour coding of a map.
#[derive(Debug, Clone)]
pub struct FuzzyLayout {
    /// Contracted unit positions.
    pub positions: PositionGrid,
    /// Unit colours derived from the positions.
    pub colors: ColorGrid,
    /// Lines between adjacent units.
    pub segments: Vec<Segment>,
}

/// Computes the full fuzzy colour coding of a flat grid.
///
/// Runs on a private pool of `config.grid.num_threads` workers.
pub fn fuzzy_colour_coding(grid: &Grid, config: &Config) -> Result<FuzzyLayout> {
    config.layout.validate()?;

    info!(
        "Fuzzy colour coding of {} grid {:?} from {:?} distances",
        grid.topology(),
        grid.dimensions(),
        config.layout.source
    );

    with_workers(config.grid.num_threads, || {
        let matrix = UnitDistanceMatrix::build(grid, config.layout.source);
        let positions = contract_with(&matrix, &config.layout)?;
        let colors = colors_for(&positions);
        let segments = connections(&positions, grid.topology());

        Ok(FuzzyLayout {
            positions,
            colors,
            segments,
        })
    })?
}

/// Runs `op` on a scoped thread pool with `workers` threads.
///
/// Zero uses rayon's default (one thread per core). Requests above twice the
/// available cores are capped. The global pool is left untouched.
pub fn with_workers<T, F>(workers: usize, op: F) -> Result<T>
where
    T: Send,
    F: FnOnce() -> T + Send,
{
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(effective_workers(workers))
        .build()?;
    Ok(pool.install(op))
}

fn effective_workers(requested: usize) -> usize {
    let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
    let limit = cores.saturating_mul(2);

    if requested > limit {
        warn!(
            "Requested {} worker threads but only {} cores are available, limiting to {}",
            requested, cores, limit
        );
        limit
    } else {
        if requested > cores {
            warn!("Requested {} worker threads but only {} cores are available", requested, cores);
        }
        requested
    }
}
