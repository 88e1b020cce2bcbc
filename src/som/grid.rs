//! Sparse unit grid with topology-aware addressing.

use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::som::distance;
use crate::som::topology::{self, Coord, Extent, Topology};
use crate::som::Unit;
use log::debug;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

/// Content of one grid position.
///
/// Sparse (mnemonic) maps leave some positions empty. Emptiness is a normal,
/// queryable state rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    /// The position holds a unit.
    Occupied(Unit),
    /// The position is not part of the map.
    Empty,
}

impl Slot {
    /// Returns the unit if the slot is occupied.
    #[inline]
    pub fn unit(&self) -> Option<&Unit> {
        match self {
            Slot::Occupied(unit) => Some(unit),
            Slot::Empty => None,
        }
    }

    /// Returns true if the slot holds a unit.
    #[inline]
    pub fn is_occupied(&self) -> bool {
        matches!(self, Slot::Occupied(_))
    }
}

/// A fixed-size 2D/3D grid of unit slots.
///
/// Slots are stored layer by layer, row-major within a layer:
/// `index = z * (x_size * y_size) + y * x_size + x`. Every occupied slot holds
/// a unit whose coordinates match its position. The extent and topology are
/// fixed for the lifetime of the grid; growing a map means building a new grid.
///
/// Deserialization goes through the same checks as [`Grid::from_slots`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawGrid")]
pub struct Grid {
    x_size: usize,
    y_size: usize,
    z_size: usize,
    topology: Topology,
    weight_dim: usize,
    slots: Vec<Slot>,
}

impl Grid {
    /// Creates a fully occupied grid with randomly initialized weights.
    pub fn new(config: &GridConfig) -> Result<Self> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        let extent = (config.x_size, config.y_size, config.z_size);
        let slots: Vec<Slot> = (0..config.total_units())
            .map(|i| {
                let (x, y, z) = coords_in(extent, i);
                Slot::Occupied(Unit::new_random(x, y, z, config.weight_dimension, &mut rng))
            })
            .collect();

        debug!(
            "Created {} grid {}x{}x{} with {}-dim weights",
            config.topology, config.x_size, config.y_size, config.z_size, config.weight_dimension
        );

        Ok(Self {
            x_size: config.x_size,
            y_size: config.y_size,
            z_size: config.z_size,
            topology: config.topology,
            weight_dim: config.weight_dimension,
            slots,
        })
    }

    /// Creates a fully occupied grid whose units carry no weights.
    pub fn new_geometric(x_size: usize, y_size: usize, z_size: usize, topology: Topology) -> Result<Self> {
        let extent = (x_size, y_size, z_size);
        check_extent(extent)?;

        let slots = (0..x_size * y_size * z_size)
            .map(|i| {
                let (x, y, z) = coords_in(extent, i);
                Slot::Occupied(Unit::new_geometric(x, y, z))
            })
            .collect();

        Ok(Self {
            x_size,
            y_size,
            z_size,
            topology,
            weight_dim: 0,
            slots,
        })
    }

    /// Creates a grid from caller-provided slots in storage order.
    ///
    /// Fails if the slot count does not match the extent, if a unit's
    /// coordinates disagree with its position, or if weight dimensions differ.
    pub fn from_slots(
        x_size: usize,
        y_size: usize,
        z_size: usize,
        topology: Topology,
        slots: Vec<Slot>,
    ) -> Result<Self> {
        let extent = (x_size, y_size, z_size);
        check_extent(extent)?;

        let expected = x_size * y_size * z_size;
        if slots.len() != expected {
            return Err(GridError::DimensionMismatch(format!(
                "{} slots supplied for a {}x{}x{} grid ({} expected)",
                slots.len(),
                x_size,
                y_size,
                z_size,
                expected
            )));
        }

        let mut weight_dim = None;
        for (i, slot) in slots.iter().enumerate() {
            let Some(unit) = slot.unit() else { continue };

            let position = coords_in(extent, i);
            if unit.coords() != position {
                return Err(GridError::DimensionMismatch(format!(
                    "unit at {:?} stored in slot {:?}",
                    unit.coords(),
                    position
                )));
            }

            match weight_dim {
                None => weight_dim = Some(unit.dim()),
                Some(dim) if dim != unit.dim() => {
                    return Err(GridError::DimensionMismatch(format!(
                        "unit at {:?} has {} weights, expected {}",
                        position,
                        unit.dim(),
                        dim
                    )));
                }
                Some(_) => {}
            }
        }

        Ok(Self {
            x_size,
            y_size,
            z_size,
            topology,
            weight_dim: weight_dim.unwrap_or(0),
            slots,
        })
    }

    /// Restores a grid from weight vectors, one entry per slot in storage order.
    ///
    /// `None` entries become empty slots. Every present vector must have
    /// exactly `dim` components.
    pub fn from_vectors(
        x_size: usize,
        y_size: usize,
        z_size: usize,
        dim: usize,
        topology: Topology,
        vectors: Vec<Option<Vec<f64>>>,
    ) -> Result<Self> {
        let extent = (x_size, y_size, z_size);
        check_extent(extent)?;

        let expected = x_size * y_size * z_size;
        if vectors.len() != expected {
            return Err(GridError::DimensionMismatch(format!(
                "{} weight vectors supplied for a {}x{}x{} grid ({} expected)",
                vectors.len(),
                x_size,
                y_size,
                z_size,
                expected
            )));
        }

        let slots = vectors
            .into_iter()
            .enumerate()
            .map(|(i, vector)| {
                let (x, y, z) = coords_in(extent, i);
                match vector {
                    Some(weights) if weights.len() != dim => Err(GridError::DimensionMismatch(format!(
                        "weight vector for unit ({}, {}, {}) has {} components, expected {}",
                        x,
                        y,
                        z,
                        weights.len(),
                        dim
                    ))),
                    Some(weights) => Ok(Slot::Occupied(Unit::new_with_weights(x, y, z, weights))),
                    None => Ok(Slot::Empty),
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            x_size,
            y_size,
            z_size,
            topology,
            weight_dim: dim,
            slots,
        })
    }

    /// Returns `(x_size, y_size, z_size)`.
    #[inline]
    pub fn dimensions(&self) -> Extent {
        (self.x_size, self.y_size, self.z_size)
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

    /// Number of layers.
    #[inline]
    pub fn z_size(&self) -> usize {
        self.z_size
    }

    /// The adjacency rule of this grid.
    #[inline]
    pub fn topology(&self) -> Topology {
        self.topology
    }

    /// Weight vector dimensionality shared by all units.
    #[inline]
    pub fn weight_dim(&self) -> usize {
        self.weight_dim
    }

    /// Total number of slots, occupied or not.
    #[inline]
    pub fn total_slots(&self) -> usize {
        self.slots.len()
    }

    /// Number of occupied slots.
    pub fn occupied_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_occupied()).count()
    }

    /// Returns true if `(x, y, z)` lies inside the grid.
    #[inline]
    pub fn contains(&self, x: usize, y: usize, z: usize) -> bool {
        x < self.x_size && y < self.y_size && z < self.z_size
    }

    /// Converts coordinates to a storage index.
    #[inline]
    pub fn index_of(&self, x: usize, y: usize, z: usize) -> Result<usize> {
        if !self.contains(x, y, z) {
            return Err(GridError::OutOfBounds {
                x,
                y,
                z,
                extent: self.dimensions(),
            });
        }
        Ok(self.index_unchecked((x, y, z)))
    }

    /// Converts a storage index back to coordinates.
    #[inline]
    pub fn coords_of(&self, index: usize) -> Coord {
        coords_in(self.dimensions(), index)
    }

    #[inline]
    fn index_unchecked(&self, (x, y, z): Coord) -> usize {
        z * self.x_size * self.y_size + y * self.x_size + x
    }

    /// Gets the slot at a position.
    pub fn slot(&self, x: usize, y: usize, z: usize) -> Result<&Slot> {
        let index = self.index_of(x, y, z)?;
        Ok(&self.slots[index])
    }

    /// Gets the unit at a position, or `None` if the slot is empty.
    pub fn get(&self, x: usize, y: usize, z: usize) -> Result<Option<&Unit>> {
        Ok(self.slot(x, y, z)?.unit())
    }

    /// Gets the weights of the unit at a position for in-place updates.
    ///
    /// The slice length is fixed, so neither the unit's coordinates nor the
    /// grid's weight dimension can change through it.
    pub fn weights_mut(&mut self, x: usize, y: usize, z: usize) -> Result<Option<&mut [f64]>> {
        let index = self.index_of(x, y, z)?;
        Ok(match &mut self.slots[index] {
            Slot::Occupied(unit) => Some(unit.weights.as_mut_slice()),
            Slot::Empty => None,
        })
    }

    /// All slots in storage order.
    #[inline]
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    /// Iterates over the occupied units in storage order.
    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.slots.iter().filter_map(Slot::unit)
    }

    #[inline]
    fn occupied_at(&self, coord: Coord) -> Option<&Unit> {
        self.slots[self.index_unchecked(coord)].unit()
    }

    /// Returns the occupied direct neighbors of `(x, y, z)`.
    ///
    /// Order is deterministic: left, right, the row-dependent vertical and
    /// diagonal set, then the neighboring layers. Only the origin is bounds
    /// checked; candidates beyond the edge are skipped.
    pub fn neighbors(&self, x: usize, y: usize, z: usize) -> Result<Vec<&Unit>> {
        self.index_of(x, y, z)?;

        Ok(topology::candidates(self.topology, (x, y, z), self.dimensions())
            .into_iter()
            .filter_map(|c| self.occupied_at(c))
            .collect())
    }

    /// Returns the occupied direct neighbors of a unit.
    pub fn neighbors_of(&self, unit: &Unit) -> Result<Vec<&Unit>> {
        self.neighbors(unit.x, unit.y, unit.z)
    }

    /// Returns true if `(x, y)` on the first layer has at least one occupied neighbor.
    ///
    /// Uses the same candidate rule as [`Grid::neighbors`], so the two always agree.
    pub fn has_neighbor(&self, x: usize, y: usize) -> Result<bool> {
        self.index_of(x, y, 0)?;

        Ok(topology::candidates(self.topology, (x, y, 0), self.dimensions())
            .into_iter()
            .any(|c| self.occupied_at(c).is_some()))
    }

    /// Euclidean distance between two units in grid space.
    #[inline]
    pub fn map_distance(&self, a: &Unit, b: &Unit) -> f64 {
        distance::map_distance(a.coords(), b.coords())
    }

    /// Squared Euclidean distance between two units in grid space.
    #[inline]
    pub fn map_distance_squared(&self, a: &Unit, b: &Unit) -> f64 {
        distance::map_distance_squared(a.coords(), b.coords())
    }

    /// Returns a new grid with a column inserted between `after_x` and `after_x + 1`.
    ///
    /// Inserted units take the mean weights of their left and right
    /// neighbors, or a copy when only one of them exists.
    pub fn with_inserted_column(&self, after_x: usize) -> Result<Grid> {
        if after_x + 1 >= self.x_size {
            return Err(GridError::OutOfBounds {
                x: after_x + 1,
                y: 0,
                z: 0,
                extent: self.dimensions(),
            });
        }

        let grown = self.grown((self.x_size + 1, self.y_size, self.z_size), |(x, y, z)| {
            if x <= after_x {
                Source::Copy((x, y, z))
            } else if x == after_x + 1 {
                Source::Between((after_x, y, z), (after_x + 1, y, z))
            } else {
                Source::Copy((x - 1, y, z))
            }
        });

        debug!("Inserted column after x={}, grid is now {:?}", after_x, grown.dimensions());
        Ok(grown)
    }

    /// Returns a new grid with a row inserted between `after_y` and `after_y + 1`.
    ///
    /// Inserting a row shifts the parity of every row below it, which changes
    /// their hexagonal adjacency.
    pub fn with_inserted_row(&self, after_y: usize) -> Result<Grid> {
        if after_y + 1 >= self.y_size {
            return Err(GridError::OutOfBounds {
                x: 0,
                y: after_y + 1,
                z: 0,
                extent: self.dimensions(),
            });
        }

        let grown = self.grown((self.x_size, self.y_size + 1, self.z_size), |(x, y, z)| {
            if y <= after_y {
                Source::Copy((x, y, z))
            } else if y == after_y + 1 {
                Source::Between((x, after_y, z), (x, after_y + 1, z))
            } else {
                Source::Copy((x, y - 1, z))
            }
        });

        debug!("Inserted row after y={}, grid is now {:?}", after_y, grown.dimensions());
        Ok(grown)
    }

    fn grown(&self, extent: Extent, source: impl Fn(Coord) -> Source) -> Grid {
        let slots = (0..extent.0 * extent.1 * extent.2)
            .map(|i| {
                let (x, y, z) = coords_in(extent, i);
                let weights = match source((x, y, z)) {
                    Source::Copy(from) => self.occupied_at(from).map(|u| u.weights.clone()),
                    Source::Between(a, b) => match (self.occupied_at(a), self.occupied_at(b)) {
                        (Some(a), Some(b)) => Some(mean_weights(&a.weights, &b.weights)),
                        (Some(u), None) | (None, Some(u)) => Some(u.weights.clone()),
                        (None, None) => None,
                    },
                };
                match weights {
                    Some(w) => Slot::Occupied(Unit::new_with_weights(x, y, z, w)),
                    None => Slot::Empty,
                }
            })
            .collect();

        Grid {
            x_size: extent.0,
            y_size: extent.1,
            z_size: extent.2,
            topology: self.topology,
            weight_dim: self.weight_dim,
            slots,
        }
    }
}

/// Grid fields as stored, before validation.
#[derive(Deserialize)]
#[cfg_attr(test, derive(Serialize))]
struct RawGrid {
    x_size: usize,
    y_size: usize,
    z_size: usize,
    topology: Topology,
    weight_dim: usize,
    slots: Vec<Slot>,
}

impl TryFrom<RawGrid> for Grid {
    type Error = GridError;

    fn try_from(raw: RawGrid) -> Result<Self> {
        let mut grid = Grid::from_slots(raw.x_size, raw.y_size, raw.z_size, raw.topology, raw.slots)?;

        if grid.occupied_count() == 0 {
            grid.weight_dim = raw.weight_dim;
        } else if grid.weight_dim != raw.weight_dim {
            return Err(GridError::DimensionMismatch(format!(
                "grid declares {}-dim weights, units carry {}",
                raw.weight_dim, grid.weight_dim
            )));
        }

        Ok(grid)
    }
}

enum Source {
    Copy(Coord),
    Between(Coord, Coord),
}

fn mean_weights(a: &[f64], b: &[f64]) -> Vec<f64> {
    a.iter().zip(b.iter()).map(|(x, y)| (x + y) / 2.0).collect()
}

#[inline]
fn coords_in((x_size, y_size, _): Extent, index: usize) -> Coord {
    let layer = x_size * y_size;
    let z = index / layer;
    let rem = index % layer;
    (rem % x_size, rem / x_size, z)
}

fn check_extent((x, y, z): Extent) -> Result<()> {
    if x == 0 || y == 0 || z == 0 {
        return Err(GridError::DimensionMismatch(format!(
            "grid size {}x{}x{} has an empty dimension",
            x, y, z
        )));
    }
    Ok(())
}
