//! # Cycles Patrol
//!
//! A client-side agent for the Cycles light-cycle game: every player leaves an impassable trail
//! on a grid, and the last one moving wins.
//!
//! It provides:
//! - The game snapshot and move types, with their text wire form (`game_interface`)
//! - A move validator enforcing bounds, free cells, head-on avoidance and a two-cell edge buffer
//! - A square patrol that widens by one step after every full square
//! - A decision engine combining the above with a bounded memory of recent own positions
//! - A blocking receive / decide / send loop over a TCP connection
//!
//! The agent only avoids danger: it never tries to trap opponents or look ahead.
//!
//! # Documentation Overview
//!
//! - For the move selection rules, see [`DecisionEngine`](crate::decision::DecisionEngine).
//! - For the safety rules, see [`MoveValidator`](crate::validator::MoveValidator).
//! - For the patrol shape, see [`PatrolState`](crate::patrol::PatrolState).
//! - For the wire protocol, see [`GameState`](crate::game_interface::GameState) and
//!   [`Connection`](crate::connection::Connection).
//! - For server address and logging options, see
//!   [`Configuration`](crate::configuration::Configuration).
//!
//! # Usage Example
//!
//! ```no_run
//! use cycles_patrol::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = Configuration::from_env();
//!     let connection = Connection::connect(&config, "laura")?;
//!
//!     let mut bot = BotClient::new(connection, "laura");
//!     bot.run()
//! }
//! ```
//!
//! # Deciding Without A Server
//!
//! ```
//! use cycles_patrol::prelude::*;
//!
//! let me = Player::new(1, "laura", Position::new(10, 10));
//! let state = GameState::empty(20, 20).with_player(me.clone());
//!
//! let mut engine = DecisionEngine::new();
//! let decision = engine.decide(&state, &me).unwrap();
//! assert_eq!(decision.direction, Direction::North);
//! ```
#![warn(missing_docs)]

pub use anyhow;
pub mod bot;
pub mod configuration;
pub mod connection;
pub mod decision;
pub mod game_interface;
mod logger;
pub mod patrol;
pub mod trail;
pub mod validator;

pub use logger::init_logger;

/// Commonly used types and traits for quick access.
///
/// Import this prelude to get started easily:
/// ```rust
/// use cycles_patrol::prelude::*;
/// ```
pub mod prelude {
    pub use crate::bot::BotClient;
    pub use crate::configuration::Configuration;
    pub use crate::connection::{Connection, Transport};
    pub use crate::decision::{Decision, DecisionEngine, DecisionError, Rule};
    pub use crate::game_interface::{Direction, GameState, Player, Position};
    pub use crate::patrol::PatrolState;
    pub use crate::trail::TrailMemory;
    pub use crate::validator::{MoveValidator, Rejection};
}
