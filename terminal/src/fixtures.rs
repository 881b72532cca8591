use crate::Config;

/// A trimmed-down copy of the engine's config message.
pub const SAMPLE_CONFIG_JSON: &str = r#"{
    "debug": {"printMapString": false},
    "unitInformation": [
        {"display": "Filter", "shorthand": "FF", "cost": 1, "stability": 60, "range": 0, "damage": 0},
        {"display": "Encryptor", "shorthand": "EF", "cost": 4, "stability": 30, "range": 3, "shieldAmount": 10, "damage": 0},
        {"display": "Destructor", "shorthand": "DF", "cost": 6, "stability": 75, "range": 3, "damage": 16},
        {"display": "Ping", "shorthand": "PI", "cost": 1, "stability": 15, "range": 3, "speed": 1, "damageF": 1, "damageI": 1},
        {"display": "EMP", "shorthand": "EI", "cost": 3, "stability": 5, "range": 5, "speed": 0.5, "damageF": 3, "damageI": 3},
        {"display": "Scrambler", "shorthand": "SI", "cost": 1, "stability": 40, "range": 3, "speed": 0.25, "damageF": 0, "damageI": 20},
        {"display": "Remove", "shorthand": "RM"}
    ],
    "resources": {
        "bitsPerRound": 5,
        "bitDecayPerRound": 0.25,
        "turnIntervalForBitSchedule": 10,
        "startingHP": 30
    }
}"#;

pub fn sample_config() -> Config {
    Config::from_json(SAMPLE_CONFIG_JSON).unwrap()
}

/// A turn 0 state with a few units on both sides.
///
/// The filter at (10, 12) is flagged for removal.
pub const SAMPLE_STATE_JSON: &str = r#"{
    "turnInfo": [0, 0, -1],
    "p1Stats": [30.0, 25.0, 5.0, 0],
    "p2Stats": [28.0, 18.0, 7.0, 0],
    "p1Units": [
        [[10, 12, 60.0, "1"], [12, 13, 60.0, "8"]],
        [],
        [[3, 12, 75.0, "2"]],
        [[13, 14, 15.0, "7"]],
        [],
        [],
        [[10, 12, 0.0, "3"]]
    ],
    "p2Units": [
        [],
        [],
        [[13, 16, 75.0, "4"], [20, 20, 30.0, "5"]],
        [[13, 26, 15.0, "6"]],
        [],
        [[14, 17, 40.0, "9"]],
        []
    ],
    "events": {"selfDestruct": [], "breach": [], "damage": [], "shield": [], "move": [], "spawn": [], "death": [], "attack": [], "melee": []}
}"#;
