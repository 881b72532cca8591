use super::{in_arena_bounds, ARENA_SIZE};
use crate::Position;

const SIZE: usize = ARENA_SIZE as usize;

/// Which cells of the arena are blocked by a stationary unit.
///
/// This is all the pathfinder needs to know about a board, so it is taken as
/// a snapshot instead of borrowing the board itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Occupancy {
    /// Indexed by `[x][y]`.
    blocked: [[bool; SIZE]; SIZE],
}

impl Occupancy {
    /// An arena without any stationary units.
    pub fn empty() -> Self {
        Self {
            blocked: [[false; SIZE]; SIZE],
        }
    }

    /// Marks a cell as blocked.
    ///
    /// Cells outside of the arena cannot be blocked, in which case this
    /// returns `false`.
    pub fn block(&mut self, position: Position) -> bool {
        if !in_arena_bounds(position.x, position.y) {
            return false;
        }
        self.blocked[position.x as usize][position.y as usize] = true;
        true
    }

    /// Whether a cell inside the arena is blocked. Cells outside are never blocked.
    pub fn is_blocked(&self, position: Position) -> bool {
        in_arena_bounds(position.x, position.y) && self.blocked[position.x as usize][position.y as usize]
    }

    pub fn num_blocked(&self) -> usize {
        self.blocked.iter().flatten().filter(|&&blocked| blocked).count()
    }
}

impl Default for Occupancy {
    fn default() -> Self {
        Self::empty()
    }
}

impl FromIterator<Position> for Occupancy {
    fn from_iter<I: IntoIterator<Item = Position>>(iter: I) -> Self {
        let mut occupancy = Occupancy::empty();
        for position in iter {
            occupancy.block(position);
        }
        occupancy
    }
}
