use serde::{Deserialize, Serialize};

use crate::Position;

/// What kind of message the engine sent, taken from the first entry of `turnInfo`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum StateType {
    /// The start of a turn. The engine waits for a build and a deploy line.
    Turn,
    /// One simulation frame. No response is expected.
    ActionFrame,
    /// The game is over.
    EndGame,
    Unknown(i64),
}

impl From<i64> for StateType {
    fn from(value: i64) -> Self {
        match value {
            0 => StateType::Turn,
            1 => StateType::ActionFrame,
            2 => StateType::EndGame,
            other => StateType::Unknown(other),
        }
    }
}

/// A unit as listed by the engine: `[x, y, health, id]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UnitEntry(pub f64, pub f64, pub f64, pub String);

impl UnitEntry {
    pub fn position(&self) -> Position {
        Position::new(self.0 as i32, self.1 as i32)
    }

    pub fn health(&self) -> f64 {
        self.2
    }

    pub fn id(&self) -> &str {
        &self.3
    }
}

/// A game state message, sent at the start of each turn and after each action frame.
///
/// Stats are `[health, cores, bits, time]`. Units are grouped by unit type
/// index, so `p1_units[2]` lists the destructors of `p1`. The engine always
/// sends this client's data as `p1`, which is player index 0 everywhere else.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateMessage {
    /// `[state type, turn number, action frame number, ...]`
    pub turn_info: Vec<f64>,
    #[serde(default)]
    pub p1_stats: Vec<f64>,
    #[serde(default)]
    pub p2_stats: Vec<f64>,
    #[serde(default)]
    pub p1_units: Vec<Vec<UnitEntry>>,
    #[serde(default)]
    pub p2_units: Vec<Vec<UnitEntry>>,
}

impl StateMessage {
    pub fn state_type(&self) -> Option<StateType> {
        self.turn_info.first().map(|&value| StateType::from(value as i64))
    }
}

/// One entry of the build or deploy line sent to the engine: `[shorthand, x, y]`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnCommand(pub String, pub i32, pub i32);

impl SpawnCommand {
    pub fn new(shorthand: &str, position: Position) -> Self {
        SpawnCommand(String::from(shorthand), position.x, position.y)
    }

    pub fn position(&self) -> Position {
        Position::new(self.1, self.2)
    }
}

/// Tells apart the two kinds of messages the engine sends.
///
/// The config message is the only one without a `turnInfo` field.
pub fn is_config_message(message: &serde_json::Value) -> bool {
    message.get("turnInfo").is_none()
}
