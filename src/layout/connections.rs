//! Connecting lines between contracted unit positions.

use crate::layout::contraction::{Point, PositionGrid};
use crate::som::Topology;
use serde::{Deserialize, Serialize};

/// A line between two adjacent units in the contracted layout.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Grid coordinates `(x, y)` of the first unit.
    pub from: (usize, usize),
    /// Grid coordinates `(x, y)` of the second unit.
    pub to: (usize, usize),
    /// Contracted position of the first unit.
    pub start: Point,
    /// Contracted position of the second unit.
    pub end: Point,
}

/// Returns one segment per adjacent unit pair, each pair emitted once.
///
/// Every unit links to its right neighbor and to the unit below. Hexagonal
/// grids add the diagonal to the next row: `(x - 1, y + 1)` from odd rows,
/// `(x + 1, y + 1)` from even rows.
pub fn connections(positions: &PositionGrid, topology: Topology) -> Vec<Segment> {
    let (x_size, y_size) = (positions.x_size(), positions.y_size());
    let mut segments = Vec::new();

    for ((x, y), start) in positions.iter() {
        let mut targets = Vec::with_capacity(3);
        if x + 1 < x_size {
            targets.push((x + 1, y));
        }
        if y + 1 < y_size {
            targets.push((x, y + 1));
            if topology == Topology::Hexagonal {
                if y % 2 == 1 {
                    if x > 0 {
                        targets.push((x - 1, y + 1));
                    }
                } else if x + 1 < x_size {
                    targets.push((x + 1, y + 1));
                }
            }
        }

        for to in targets {
            if let Some(end) = positions.get(to.0, to.1) {
                segments.push(Segment {
                    from: (x, y),
                    to,
                    start,
                    end,
                });
            }
        }
    }

    segments
}
