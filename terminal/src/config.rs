use serde::{Deserialize, Serialize};

use crate::{UnitType, UnitTypeError};

/// The game configuration, sent by the engine as the very first message.
///
/// Only the parts used by the algo are modelled, everything else in the
/// message is ignored.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// One entry per unit type, in the order of [`UnitType::ALL`].
    pub unit_information: Vec<UnitInformation>,
    pub resources: Resources,
}

/// The stats of one unit type.
///
/// Which stats are present depends on the kind of unit, e.g. only mobile
/// units have a speed. Missing stats default to 0.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitInformation {
    pub shorthand: String,
    #[serde(default)]
    pub cost: f64,
    /// The maximum health.
    #[serde(default)]
    pub stability: f64,
    #[serde(default)]
    pub range: f64,
    #[serde(default)]
    pub speed: f64,
    #[serde(default)]
    pub damage: f64,
    /// Damage done to stationary units.
    #[serde(default)]
    pub damage_f: f64,
    /// Damage done to mobile units.
    #[serde(default)]
    pub damage_i: f64,
    #[serde(default)]
    pub shield_amount: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resources {
    pub bits_per_round: f64,
    /// Fraction of the held bits lost at the start of every round.
    pub bit_decay_per_round: f64,
    pub turn_interval_for_bit_schedule: f64,
    /// How much the bit income grows every `turn_interval_for_bit_schedule` turns.
    #[serde(default = "default_bit_growth_rate")]
    pub bit_growth_rate: f64,
}

fn default_bit_growth_rate() -> f64 {
    1.0
}

impl Config {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The configured stats of a unit type.
    pub fn unit_information(&self, unit_type: UnitType) -> Result<&UnitInformation, UnitTypeError> {
        self.unit_information
            .get(unit_type.index())
            .ok_or(UnitTypeError::MissingConfig(unit_type))
    }

    /// The shorthand the engine uses for a unit type, e.g. `"FF"`.
    ///
    /// Falls back to the built-in shorthand when the config lacks the entry.
    pub fn shorthand(&self, unit_type: UnitType) -> &str {
        self.unit_information(unit_type)
            .map(|info| info.shorthand.as_str())
            .unwrap_or_else(|_| unit_type.default_shorthand())
    }

    /// Looks up a unit type by the shorthand the engine uses for it.
    pub fn unit_type_from_shorthand(&self, shorthand: &str) -> Result<UnitType, UnitTypeError> {
        UnitType::ALL
            .into_iter()
            .find(|&unit_type| self.shorthand(unit_type) == shorthand)
            .ok_or_else(|| UnitTypeError::UnknownShorthand(String::from(shorthand)))
    }
}
