use serde::{Deserialize, Serialize};

use crate::{Config, Position, UnitTypeError};

/// The kinds of units in the game.
///
/// The first three are stationary structures paid for with cores, the next
/// three are mobile units paid for with bits. `Remove` is not a real unit but
/// the command to remove one of your own structures.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum UnitType {
    /// A wall.
    Filter,
    /// Shields friendly mobile units passing by.
    Encryptor,
    /// A turret.
    Destructor,
    Ping,
    Emp,
    Scrambler,
    Remove,
}

impl UnitType {
    /// All unit types, in the order the engine indexes them.
    pub const ALL: [UnitType; 7] = [
        UnitType::Filter,
        UnitType::Encryptor,
        UnitType::Destructor,
        UnitType::Ping,
        UnitType::Emp,
        UnitType::Scrambler,
        UnitType::Remove,
    ];

    pub const STATIONARY: [UnitType; 3] = [UnitType::Filter, UnitType::Encryptor, UnitType::Destructor];

    pub const MOBILE: [UnitType; 3] = [UnitType::Ping, UnitType::Emp, UnitType::Scrambler];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Result<Self, UnitTypeError> {
        Self::ALL
            .get(index)
            .copied()
            .ok_or(UnitTypeError::UnknownIndex(index))
    }

    pub fn is_stationary(self) -> bool {
        Self::STATIONARY.contains(&self)
    }

    pub fn is_mobile(self) -> bool {
        Self::MOBILE.contains(&self)
    }

    /// The shorthand used by the engine when the config does not say otherwise.
    pub fn default_shorthand(self) -> &'static str {
        match self {
            UnitType::Filter => "FF",
            UnitType::Encryptor => "EF",
            UnitType::Destructor => "DF",
            UnitType::Ping => "PI",
            UnitType::Emp => "EI",
            UnitType::Scrambler => "SI",
            UnitType::Remove => "RM",
        }
    }
}

impl std::fmt::Display for UnitType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.default_shorthand())
    }
}

/// A unit placed on the arena.
///
/// The stats are copied from the [`Config`] when the unit is created and
/// never change afterwards.
#[derive(Clone, Debug, PartialEq)]
pub struct Unit {
    pub unit_type: UnitType,
    /// 0 for yourself, 1 for the opponent.
    pub owner: usize,
    pub position: Position,
    pub health: f64,
    pub stationary: bool,
    pub speed: f64,
    pub damage_to_stationary: f64,
    pub damage_to_mobile: f64,
    pub range: f64,
    pub max_health: f64,
    pub cost: f64,
    /// Whether the unit is marked for removal at the end of the turn.
    pub pending_removal: bool,
}

impl Unit {
    /// Creates a unit with the stats configured for its type.
    ///
    /// A `health` of 0 means full health.
    pub fn new(
        unit_type: UnitType,
        config: &Config,
        health: f64,
        owner: usize,
        position: Position,
    ) -> Result<Self, UnitTypeError> {
        let mut unit = Unit {
            unit_type,
            owner,
            position,
            health,
            stationary: unit_type.is_stationary(),
            speed: 0.0,
            damage_to_stationary: 0.0,
            damage_to_mobile: 0.0,
            range: 0.0,
            max_health: 0.0,
            cost: 0.0,
            pending_removal: false,
        };
        if unit_type == UnitType::Remove {
            unit.pending_removal = true;
            return Ok(unit);
        }

        let info = config.unit_information(unit_type)?;
        if unit.stationary {
            unit.damage_to_mobile = match unit_type {
                UnitType::Encryptor => info.shield_amount,
                _ => info.damage,
            };
        } else {
            unit.speed = info.speed;
            unit.damage_to_stationary = info.damage_f;
            unit.damage_to_mobile = info.damage_i;
        }
        unit.range = info.range;
        unit.max_health = info.stability;
        unit.cost = info.cost;
        if health == 0.0 {
            unit.health = unit.max_health;
        }
        Ok(unit)
    }

    pub fn deals_damage(&self) -> bool {
        self.unit_type != UnitType::Encryptor
            && (self.damage_to_mobile > 0.0 || self.damage_to_stationary > 0.0)
    }
}

impl std::fmt::Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let owner = if self.owner == 0 { "Friendly" } else { "Enemy" };
        write!(
            f,
            "{} {}, health: {} location: {}",
            owner, self.unit_type, self.health, self.position
        )?;
        if self.pending_removal {
            write!(f, ", pending removal")?;
        }
        Ok(())
    }
}
