use crate::{Position, UnitTypeError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionError {
    OutOfBounds(Position),
}

impl std::error::Error for PositionError {}

impl std::fmt::Display for PositionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PositionError::OutOfBounds(position) => {
                write!(f, "{} is outside of the arena", position)
            }
        }
    }
}

/// A player index other than 0 (yourself) or 1 (the opponent) was used.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerIndexError(pub usize);

impl std::error::Error for PlayerIndexError {}

impl std::fmt::Display for PlayerIndexError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Invalid player index {}, player index should always be 0 (yourself) or 1 (your opponent)",
            self.0
        )
    }
}

/// The error type for operations on a [`GameMap`](crate::GameMap).
#[derive(Clone, Debug, PartialEq)]
pub enum BoardError {
    Position(PositionError),
    InvalidOwner(PlayerIndexError),
    OccupiedByStationary { position: Position },
    RemoveTargetMissing { position: Position },
    EmptyCell { position: Position },
    InvalidRadius { radius: f64 },
    UnitType(UnitTypeError),
}

impl BoardError {
    pub(crate) fn out_of_bounds(position: Position) -> Self {
        BoardError::Position(PositionError::OutOfBounds(position))
    }
}

impl std::error::Error for BoardError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BoardError::Position(err) => Some(err),
            BoardError::InvalidOwner(err) => Some(err),
            BoardError::UnitType(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for BoardError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoardError::Position(err) => write!(f, "{}", err),
            BoardError::InvalidOwner(err) => write!(f, "Cannot add unit: {}", err),
            BoardError::OccupiedByStationary { position } => write!(
                f,
                "Cannot place a stationary unit at {}, which already holds one",
                position
            ),
            BoardError::RemoveTargetMissing { position } => write!(
                f,
                "Cannot remove at {}, there is not exactly one stationary unit there",
                position
            ),
            BoardError::EmptyCell { position } => {
                write!(f, "Cannot remove units from {}, there are none", position)
            }
            BoardError::InvalidRadius { radius } => write!(
                f,
                "Radius {} is invalid, expected a value between 0 and {}",
                radius,
                super::ARENA_SIZE
            ),
            BoardError::UnitType(err) => write!(f, "Cannot create unit: {}", err),
        }
    }
}

impl From<PositionError> for BoardError {
    fn from(err: PositionError) -> Self {
        BoardError::Position(err)
    }
}

impl From<UnitTypeError> for BoardError {
    fn from(err: UnitTypeError) -> Self {
        BoardError::UnitType(err)
    }
}
