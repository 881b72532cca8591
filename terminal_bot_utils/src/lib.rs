use std::io::{BufRead, ErrorKind, Write};

use serde_json::Value;
use terminal::{is_config_message, Config, GameState, ParseError, StateMessage, StateType, Verbosity};
use tracing::{debug, error, info, warn};

/// A trait to simplify writing algos.
///
/// [`Self::run()`] talks to the engine and calls the hooks: once with the
/// config when the game starts, then once for every turn and action frame.
pub trait Algo {
    fn on_game_start(&mut self, config: &Config);

    /// Decides on the actions of a turn, by calling e.g.
    /// [`GameState::attempt_spawn()`] on the given state.
    ///
    /// The queued actions are sent to the engine afterwards, even if this
    /// returns an error.
    fn on_turn(&mut self, state: &mut GameState) -> anyhow::Result<()>;

    /// Observes one frame of the action phase. Nothing can be sent back.
    fn on_action_frame(&mut self, _state: &GameState) {}

    /// How strictly rule violations are treated in the game states given to this algo.
    fn verbosity(&self) -> Verbosity {
        Verbosity::Warning
    }

    fn run(&mut self) -> anyhow::Result<()> {
        // Communication happens through stdin/stdout.
        // Stderr can be used for logging.
        let stdin = std::io::stdin().lock();
        let stdout = std::io::stdout().lock();
        self.play(stdin, stdout)
    }

    /// Runs the game loop on the given streams until the game ends.
    ///
    /// Broken messages are logged and skipped. Every turn gets an answer,
    /// empty if necessary, so the engine never waits forever.
    fn play<R: BufRead, W: Write>(&mut self, mut reader: R, mut writer: W) -> anyhow::Result<()> {
        let mut config: Option<Config> = None;
        let mut buf = String::new();

        loop {
            buf.clear(); // because read_line() appends to the buffer
            let num_bytes_read = match reader.read_line(&mut buf) {
                Ok(num_bytes_read) => num_bytes_read,
                // The broken line has been consumed, the next one may be fine
                Err(err) if err.kind() == ErrorKind::InvalidData => {
                    error!("Error reading line from engine: {}", err);
                    continue;
                }
                Err(err) => return Err(err.into()),
            };
            if num_bytes_read == 0 {
                // 0 bytes read means EOF - the engine has exited.
                info!("Engine closed the connection");
                break Ok(());
            }
            let line = buf.trim();
            if line.is_empty() {
                continue;
            }

            let message = match serde_json::from_str::<Value>(line) {
                Ok(message) => message,
                Err(err) => {
                    error!("Error parsing string from engine: {}", err);
                    continue;
                }
            };

            if is_config_message(&message) {
                match serde_json::from_value::<Config>(message) {
                    Ok(new_config) => {
                        info!("Configuring the algo");
                        self.on_game_start(&new_config);
                        config = Some(new_config);
                    }
                    Err(err) => error!("Invalid config from engine: {}", err),
                }
                continue;
            }

            let state_type = message
                .get("turnInfo")
                .and_then(|turn_info| turn_info.get(0))
                .and_then(Value::as_f64)
                .map(|value| StateType::from(value as i64));
            match state_type {
                Some(StateType::Turn) => {
                    let Some(config) = config.as_ref() else {
                        error!("Received a turn before the config, skipping it");
                        submit_empty_turn(&mut writer)?;
                        continue;
                    };
                    match parse_state(config, message, self.verbosity()) {
                        Ok(mut state) => {
                            debug!("Starting turn {}", state.turn_number());
                            if let Err(err) = self.on_turn(&mut state) {
                                error!("Turn {} failed: {:#}", state.turn_number(), err);
                            }
                            state.submit_turn(&mut writer)?;
                        }
                        Err(err) => {
                            error!("Could not read the turn: {}", err);
                            submit_empty_turn(&mut writer)?;
                        }
                    }
                }
                Some(StateType::ActionFrame) => {
                    let Some(config) = config.as_ref() else {
                        warn!("Received an action frame before the config");
                        continue;
                    };
                    match parse_state(config, message, self.verbosity()) {
                        Ok(state) => self.on_action_frame(&state),
                        Err(err) => error!("Could not read the action frame: {}", err),
                    }
                }
                Some(StateType::EndGame) => {
                    info!("Got end state, game over");
                    break Ok(());
                }
                Some(StateType::Unknown(value)) => warn!("Got unexpected state type {}, ignoring", value),
                None => warn!("Got a message without a state type, ignoring"),
            }
        }
    }
}

fn parse_state(config: &Config, message: Value, verbosity: Verbosity) -> Result<GameState<'_>, ParseError> {
    let message: StateMessage = serde_json::from_value(message)?;
    GameState::from_message(config, &message, verbosity)
}

fn submit_empty_turn<W: Write>(writer: &mut W) -> std::io::Result<()> {
    writer.write_all(b"[]\n[]\n")?;
    writer.flush()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use terminal::{Position, UnitType};

    use super::*;

    const CONFIG: &str = r#"{"unitInformation": [
        {"shorthand": "FF", "cost": 1, "stability": 60},
        {"shorthand": "EF", "cost": 4, "stability": 30, "range": 3, "shieldAmount": 10},
        {"shorthand": "DF", "cost": 6, "stability": 75, "range": 3, "damage": 16},
        {"shorthand": "PI", "cost": 1, "stability": 15, "range": 3, "speed": 1, "damageF": 1, "damageI": 1},
        {"shorthand": "EI", "cost": 3, "stability": 5, "range": 5, "speed": 0.5, "damageF": 3, "damageI": 3},
        {"shorthand": "SI", "cost": 1, "stability": 40, "range": 3, "speed": 0.25, "damageI": 20},
        {"shorthand": "RM"}
    ], "resources": {"bitsPerRound": 5, "bitDecayPerRound": 0.25, "turnIntervalForBitSchedule": 10}}"#;

    fn turn(number: u32) -> String {
        format!(
            r#"{{"turnInfo": [0, {}, -1], "p1Stats": [30, 25, 5, 0], "p2Stats": [30, 25, 5, 0],
                "p1Units": [[], [], [], [], [], [], []], "p2Units": [[], [], [], [], [], [], []]}}"#,
            number
        )
        .replace('\n', " ")
    }

    const ACTION_FRAME: &str = r#"{"turnInfo": [1, 0, 3], "p1Stats": [30, 25, 5, 0], "p2Stats": [30, 25, 5, 0], "p1Units": [], "p2Units": []}"#;
    const END: &str = r#"{"turnInfo": [2, 5, 0]}"#;

    #[derive(Default)]
    struct RecordingAlgo {
        configured: bool,
        turns: Vec<u32>,
        frames: usize,
        fail: bool,
    }

    impl Algo for RecordingAlgo {
        fn on_game_start(&mut self, _config: &Config) {
            self.configured = true;
        }

        fn on_turn(&mut self, state: &mut GameState) -> anyhow::Result<()> {
            self.turns.push(state.turn_number());
            state.attempt_spawn(UnitType::Ping, &[Position::new(13, 0)], 1)?;
            if self.fail {
                anyhow::bail!("out of ideas");
            }
            Ok(())
        }

        fn on_action_frame(&mut self, _state: &GameState) {
            self.frames += 1;
        }
    }

    fn play(algo: &mut RecordingAlgo, lines: &[&str]) -> String {
        // One message per line, as the engine sends them
        let input: Vec<String> = lines.iter().map(|line| line.replace('\n', " ")).collect();
        let input = input.join("\n");
        let mut output = Vec::new();
        algo.play(Cursor::new(input), &mut output).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn plays_a_game() {
        let mut algo = RecordingAlgo::default();
        let first = turn(0);
        let second = turn(1);
        let output = play(&mut algo, &[CONFIG, &first, ACTION_FRAME, &second, END, &first]);
        assert!(algo.configured);
        assert_eq!(algo.turns, [0, 1]);
        assert_eq!(algo.frames, 1);
        assert_eq!(output, "[]\n[[\"PI\",13,0]]\n[]\n[[\"PI\",13,0]]\n");
    }

    #[test]
    fn answers_turns_it_cannot_read() {
        let mut algo = RecordingAlgo::default();
        let first = turn(0);
        let broken = r#"{"turnInfo": [0, 1, -1], "p1Stats": [30]}"#;
        let output = play(&mut algo, &[&first, "", "not json", CONFIG, broken, r#"{"turnInfo": [7]}"#]);
        assert!(algo.turns.is_empty());
        assert_eq!(output, "[]\n[]\n[]\n[]\n");
    }

    #[test]
    fn survives_lines_that_are_not_utf8() {
        let mut algo = RecordingAlgo::default();
        let mut input = Vec::new();
        input.extend_from_slice(CONFIG.replace('\n', " ").as_bytes());
        input.extend_from_slice(&[b'\n', 0xff, 0xfe, b'\n']);
        input.extend_from_slice(turn(4).as_bytes());
        input.push(b'\n');

        let mut output = Vec::new();
        algo.play(Cursor::new(input), &mut output).unwrap();
        assert_eq!(algo.turns, [4]);
        assert_eq!(String::from_utf8(output).unwrap(), "[]\n[[\"PI\",13,0]]\n");
    }

    #[test]
    fn failed_turns_are_still_submitted() {
        let mut algo = RecordingAlgo {
            fail: true,
            ..RecordingAlgo::default()
        };
        let first = turn(0);
        let output = play(&mut algo, &[CONFIG, &first]);
        assert_eq!(algo.turns, [0]);
        assert_eq!(output, "[]\n[[\"PI\",13,0]]\n");
    }
}
