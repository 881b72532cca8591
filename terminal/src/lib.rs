pub use board::*;
pub use config::*;
pub use errors::*;
pub use game_state::*;
pub use player_state::*;
pub use position::*;
pub use protocol_types::*;
pub use units::*;
pub use verbosity::*;
pub use visualization::*;

#[cfg(test)]
mod arbitrary;
mod board;
mod config;
mod errors;
#[cfg(test)]
mod fixtures;
mod game_state;
pub mod navigation;
mod player_state;
mod position;
mod protocol_types;
mod units;
mod verbosity;
mod visualization;
