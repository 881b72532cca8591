use crate::{BoardError, PlayerIndexError, Position, UnitType};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnitTypeError {
    UnknownShorthand(String),
    UnknownIndex(usize),
    /// The config has no entry for this unit type.
    MissingConfig(UnitType),
}

impl std::error::Error for UnitTypeError {}

impl std::fmt::Display for UnitTypeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnitTypeError::UnknownShorthand(shorthand) => {
                write!(f, "Unknown unit shorthand '{}'", shorthand)
            }
            UnitTypeError::UnknownIndex(index) => write!(f, "Unknown unit type index {}", index),
            UnitTypeError::MissingConfig(unit_type) => {
                write!(f, "The config has no unit information for {}", unit_type)
            }
        }
    }
}

/// Why a unit cannot be spawned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SpawnFailureReason {
    /// Only the six real unit types can be spawned.
    NotSpawnable,
    FewerThanOneUnit,
    OutOfBounds,
    NotEnoughResources,
    /// A stationary unit is in the way, or any unit when spawning a stationary unit.
    Blocked,
    EnemyTerritory,
    /// Mobile units must be deployed on one of your own edges.
    NotOnDeployEdge,
    /// Only one stationary unit fits on a cell.
    MultipleStationary,
}

impl SpawnFailureReason {
    fn description(self) -> &'static str {
        match self {
            SpawnFailureReason::NotSpawnable => "This unit type cannot be spawned",
            SpawnFailureReason::FewerThanOneUnit => "At least one unit must be spawned",
            SpawnFailureReason::OutOfBounds => "Location invalid",
            SpawnFailureReason::NotEnoughResources => "Not enough resources",
            SpawnFailureReason::Blocked => "Location is blocked",
            SpawnFailureReason::EnemyTerritory => "Location in enemy territory",
            SpawnFailureReason::NotOnDeployEdge => "Mobile units must be deployed on the edge",
            SpawnFailureReason::MultipleStationary => "Only one stationary unit fits on a location",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SpawnError {
    pub unit_type: UnitType,
    pub position: Position,
    pub reason: SpawnFailureReason,
}

impl std::error::Error for SpawnError {}

impl std::fmt::Display for SpawnError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Could not spawn {} at location {}. {}.",
            self.unit_type,
            self.position,
            self.reason.description()
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveFailureReason {
    OutOfBounds,
    EnemyTerritory,
    NoStationaryUnit,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoveError {
    pub position: Position,
    pub reason: RemoveFailureReason,
}

impl std::error::Error for RemoveError {}

impl std::fmt::Display for RemoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self.reason {
            RemoveFailureReason::OutOfBounds => "Location invalid",
            RemoveFailureReason::EnemyTerritory => "Location is in enemy territory",
            RemoveFailureReason::NoStationaryUnit => "Location has no stationary unit",
        };
        write!(f, "Could not remove a unit from {}. {}.", self.position, reason)
    }
}

/// The error type for [`GameState::project_future_bits()`](crate::GameState::project_future_bits).
#[derive(Clone, Debug, PartialEq)]
pub enum ForecastError {
    /// Only 1 to 99 turns can be forecast.
    TurnsOutOfRange(u32),
    NegativeBits(f64),
    PlayerIndex(PlayerIndexError),
}

impl std::error::Error for ForecastError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ForecastError::PlayerIndex(err) => Some(err),
            _ => None,
        }
    }
}

impl std::fmt::Display for ForecastError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ForecastError::TurnsOutOfRange(turns) => write!(
                f,
                "Invalid turns in future used ({}). Turns in future should be between 1 and 99",
                turns
            ),
            ForecastError::NegativeBits(bits) => {
                write!(f, "Invalid current bits ({}). Current bits cannot be negative", bits)
            }
            ForecastError::PlayerIndex(err) => write!(f, "{}", err),
        }
    }
}

/// The error type for turning an engine message into a [`GameState`](crate::GameState).
#[derive(Debug)]
pub enum ParseError {
    Json(serde_json::Error),
    MissingField(&'static str),
    UnitType(UnitTypeError),
    Board(BoardError),
    PlayerIndex(PlayerIndexError),
}

impl std::error::Error for ParseError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ParseError::Json(err) => Some(err),
            ParseError::MissingField(_) => None,
            ParseError::UnitType(err) => Some(err),
            ParseError::Board(err) => Some(err),
            ParseError::PlayerIndex(err) => Some(err),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseError::Json(_) => write!(f, "Error parsing string from engine"),
            ParseError::MissingField(field) => {
                write!(f, "Message from engine lacks the field '{}'", field)
            }
            ParseError::UnitType(_) => write!(f, "Message from engine contains an invalid unit"),
            ParseError::Board(_) => write!(f, "Message from engine contains a misplaced unit"),
            ParseError::PlayerIndex(_) => write!(f, "Message from engine refers to an unknown player"),
        }
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Json(err)
    }
}

impl From<UnitTypeError> for ParseError {
    fn from(err: UnitTypeError) -> Self {
        ParseError::UnitType(err)
    }
}

impl From<BoardError> for ParseError {
    fn from(err: BoardError) -> Self {
        ParseError::Board(err)
    }
}

impl From<PlayerIndexError> for ParseError {
    fn from(err: PlayerIndexError) -> Self {
        ParseError::PlayerIndex(err)
    }
}
