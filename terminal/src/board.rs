mod arena;
mod error;
mod occupancy;

use std::ops::Index;

pub use arena::*;
pub use error::*;
pub use occupancy::*;

use crate::{Config, Position, Unit, UnitType, Verbosity};

/// A unit affects all cells whose centers are within its range plus this much.
///
/// The engine uses this to include cells that are only just out of range due
/// to rounding, e.g. the diagonal neighbors for a range of 1.
pub const RANGE_TOLERANCE: f64 = 0.51;

const SIZE: usize = ARENA_SIZE as usize;

/// The units on the diamond-shaped arena.
///
/// Every cell inside the arena holds a stack of units, in the order they were
/// added. A cell holds at most one stationary unit, while any number of
/// mobile units may share a cell, with or without a stationary unit.
///
/// The stacks can only be changed through [`Self::add_unit()`] and
/// [`Self::remove_units()`], which keeps them consistent with these rules.
/// Whether a failed operation is an error, a logged warning or silently
/// ignored is decided by the board's [`Verbosity`].
#[derive(Clone, Debug)]
pub struct GameMap<'c> {
    config: &'c Config,
    verbosity: Verbosity,
    /// Indexed by `x * ARENA_SIZE + y`. Cells outside of the arena stay empty.
    cells: Vec<Vec<Unit>>,
}

impl BoardError {
    /// The lowest verbosity at which this failure is noticed.
    pub fn severity(&self) -> Verbosity {
        match self {
            BoardError::EmptyCell { .. } => Verbosity::Crash,
            BoardError::RemoveTargetMissing { .. } => Verbosity::Invariant,
            _ => Verbosity::Warning,
        }
    }
}

impl<'c> GameMap<'c> {
    /// Creates an empty arena.
    pub fn new(config: &'c Config, verbosity: Verbosity) -> Self {
        Self {
            config,
            verbosity,
            cells: vec![Vec::new(); SIZE * SIZE],
        }
    }

    pub fn config(&self) -> &'c Config {
        self.config
    }

    pub fn verbosity(&self) -> Verbosity {
        self.verbosity
    }

    pub fn set_verbosity(&mut self, verbosity: Verbosity) {
        self.verbosity = verbosity;
    }

    pub fn in_arena_bounds(&self, position: Position) -> bool {
        in_arena_bounds(position.x, position.y)
    }

    /// The units at a location, or `None` if it is outside of the arena.
    pub fn get(&self, position: Position) -> Option<&[Unit]> {
        self.in_arena_bounds(position)
            .then(|| self.cells[cell_index(position)].as_slice())
    }

    /// Places a unit of the given type.
    ///
    /// This only changes this map, nothing is sent to the engine. A `health`
    /// of 0 means full health.
    ///
    /// Placing a [`UnitType::Remove`] marks the stationary unit on that cell
    /// for removal.
    ///
    /// Returns `Ok(false)` if the unit could not be placed but the failure
    /// was tolerated.
    pub fn add_unit(
        &mut self,
        unit_type: UnitType,
        position: Position,
        owner: usize,
        health: f64,
    ) -> Result<bool, BoardError> {
        let placed = self.check_placement(unit_type, position, owner).and_then(|()| {
            Unit::new(unit_type, self.config, health, owner, position).map_err(BoardError::from)
        });
        let Some(unit) = self.apply_policy(placed)? else {
            return Ok(false);
        };

        let cell = &mut self.cells[cell_index(position)];
        if unit.pending_removal {
            for target in cell.iter_mut().filter(|u| u.stationary) {
                target.pending_removal = true;
            }
        }
        cell.push(unit);
        Ok(true)
    }

    /// Removes all units from a location.
    ///
    /// Returns `Ok(false)` if there was nothing to remove and that was tolerated.
    pub fn remove_units(&mut self, position: Position) -> Result<bool, BoardError> {
        let check = if !self.in_arena_bounds(position) {
            Err(BoardError::out_of_bounds(position))
        } else if self.cells[cell_index(position)].is_empty() {
            Err(BoardError::EmptyCell { position })
        } else {
            Ok(())
        };
        if self.apply_policy(check)?.is_none() {
            return Ok(false);
        }
        self.cells[cell_index(position)].clear();
        Ok(true)
    }

    /// The stationary unit at a location, if any.
    pub fn stationary_unit(&self, position: Position) -> Option<&Unit> {
        self.get(position)?.iter().find(|unit| unit.stationary)
    }

    /// Whether a location holds a stationary unit. Locations outside of the arena never do.
    pub fn contains_stationary_unit(&self, position: Position) -> bool {
        self.stationary_unit(position).is_some()
    }

    pub fn distance_between(&self, a: Position, b: Position) -> f64 {
        a.distance(b)
    }

    /// All locations whose centers are closer to `center` than `radius` plus
    /// [`RANGE_TOLERANCE`].
    ///
    /// The radius must be between 0 and `ARENA_SIZE`. When an invalid radius
    /// is tolerated, no locations are returned.
    pub fn locations_in_range(&self, center: Position, radius: f64) -> Result<Vec<Position>, BoardError> {
        let check = if (0.0..=f64::from(ARENA_SIZE)).contains(&radius) {
            Ok(())
        } else {
            Err(BoardError::InvalidRadius { radius })
        };
        if self.apply_policy(check)?.is_none() {
            return Ok(Vec::new());
        }
        Ok(range_scan(center, radius)
            .filter(|&pos| self.in_arena_bounds(pos) && center.distance(pos) < radius + RANGE_TOLERANCE)
            .collect())
    }

    /// All locations inside the arena, `x` outer and `y` inner.
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        arena_positions()
    }

    /// Iterates over all locations inside the arena together with their units.
    pub fn iter(&self) -> impl Iterator<Item = (Position, &[Unit])> + '_ {
        arena_positions().map(move |pos| (pos, self.cells[cell_index(pos)].as_slice()))
    }

    /// All units on the map, location by location.
    pub fn units(&self) -> impl Iterator<Item = &Unit> + '_ {
        self.cells.iter().flatten()
    }

    /// The snapshot of blocked cells used for pathfinding.
    pub fn occupancy(&self) -> Occupancy {
        self.iter()
            .filter(|(_, units)| units.iter().any(|unit| unit.stationary))
            .map(|(pos, _)| pos)
            .collect()
    }

    fn check_placement(&self, unit_type: UnitType, position: Position, owner: usize) -> Result<(), BoardError> {
        if !self.in_arena_bounds(position) {
            return Err(BoardError::out_of_bounds(position));
        }
        if owner > 1 {
            return Err(BoardError::InvalidOwner(PlayerIndexError(owner)));
        }
        let num_stationary = self.cells[cell_index(position)]
            .iter()
            .filter(|unit| unit.stationary)
            .count();
        if unit_type.is_stationary() && num_stationary > 0 {
            return Err(BoardError::OccupiedByStationary { position });
        }
        if unit_type == UnitType::Remove && num_stationary != 1 {
            return Err(BoardError::RemoveTargetMissing { position });
        }
        Ok(())
    }

    fn apply_policy<T>(&self, result: Result<T, BoardError>) -> Result<Option<T>, BoardError> {
        let severity = match &result {
            Ok(_) => Verbosity::Suppress,
            Err(err) => err.severity(),
        };
        self.verbosity.resolve(severity, result)
    }
}

impl Index<Position> for GameMap<'_> {
    type Output = [Unit];

    /// Panics if the position is outside of the arena.
    fn index(&self, position: Position) -> &[Unit] {
        match self.get(position) {
            Some(units) => units,
            None => panic!("{}", PositionError::OutOfBounds(position)),
        }
    }
}

fn cell_index(position: Position) -> usize {
    position.x as usize * SIZE + position.y as usize
}

/// The square of candidate cells around `center`, `x` outer and `y` inner.
fn range_scan(center: Position, radius: f64) -> impl Iterator<Item = Position> {
    // Truncation towards zero, as the engine does it
    let x_min = (f64::from(center.x) - radius) as i32;
    let x_max = (f64::from(center.x) + radius) as i32;
    let y_min = (f64::from(center.y) - radius) as i32;
    let y_max = (f64::from(center.y) + radius) as i32;
    (x_min..=x_max).flat_map(move |x| (y_min..=y_max).map(move |y| Position::new(x, y)))
}
