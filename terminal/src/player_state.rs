use serde::{Deserialize, Serialize};

use crate::{ParseError, PlayerIndexError};

/// The two currencies. Stationary units cost cores, mobile units cost bits.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resource {
    Bits,
    Cores,
}

/// The stats of a single player at the start of a turn.
#[derive(Clone, Debug, PartialEq)]
pub struct Player {
    /// 0 for yourself, 1 for the opponent.
    pub id: usize,
    pub health: f64,
    pub cores: f64,
    pub bits: f64,
    /// Milliseconds the player took for their previous turn.
    pub time_used: f64,
}

impl Player {
    /// Reads the `[health, cores, bits, time]` list sent by the engine.
    pub fn from_stats(id: usize, stats: &[f64]) -> Result<Self, ParseError> {
        if id > 1 {
            return Err(ParseError::PlayerIndex(PlayerIndexError(id)));
        }
        let [health, cores, bits, time_used] = match stats {
            [health, cores, bits, time_used, ..] => [*health, *cores, *bits, *time_used],
            _ => return Err(ParseError::MissingField(if id == 0 { "p1Stats" } else { "p2Stats" })),
        };
        Ok(Player {
            id,
            health,
            cores,
            bits,
            time_used,
        })
    }

    pub fn resource(&self, resource: Resource) -> f64 {
        match resource {
            Resource::Bits => self.bits,
            Resource::Cores => self.cores,
        }
    }

    pub(crate) fn spend(&mut self, resource: Resource, amount: f64) {
        match resource {
            Resource::Bits => self.bits -= amount,
            Resource::Cores => self.cores -= amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats() {
        let mut player = Player::from_stats(1, &[30.0, 12.0, 4.5, 310.0, 99.0]).unwrap();
        assert_eq!(player.health, 30.0);
        assert_eq!(player.resource(Resource::Cores), 12.0);
        assert_eq!(player.resource(Resource::Bits), 4.5);
        assert_eq!(player.time_used, 310.0);
        player.spend(Resource::Cores, 6.0);
        assert_eq!(player.cores, 6.0);
    }

    #[test]
    fn invalid_stats() {
        assert!(matches!(
            Player::from_stats(0, &[30.0, 12.0]),
            Err(ParseError::MissingField("p1Stats"))
        ));
        assert!(matches!(
            Player::from_stats(2, &[30.0, 12.0, 4.5, 310.0]),
            Err(ParseError::PlayerIndex(PlayerIndexError(2)))
        ));
    }
}
