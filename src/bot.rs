//! The receive / decide / send loop.

use anyhow::Context;
use tracing::{debug, info, instrument};

use crate::connection::Transport;
use crate::decision::{Decision, DecisionEngine};
use crate::game_interface::GameState;

/// One agent playing one match over a [`Transport`].
///
/// The server paces the game: there is no clock, timeout, or retry here.
#[derive(Debug)]
pub struct BotClient<T: Transport> {
    transport: T,
    name: String,
    engine: DecisionEngine,
}

impl<T: Transport> BotClient<T> {
    /// A bot registered as `name`, with a fresh decision engine.
    pub fn new(transport: T, name: impl Into<String>) -> BotClient<T> {
        Self::with_engine(transport, name, DecisionEngine::new())
    }

    /// A bot using a prepared decision engine.
    pub fn with_engine(transport: T, name: impl Into<String>, engine: DecisionEngine) -> Self {
        BotClient {
            transport,
            name: name.into(),
            engine,
        }
    }

    /// Plays until the server closes the connection.
    ///
    /// # Errors
    /// Transport faults, a snapshot without this bot in it, and
    /// [`NoValidMove`](crate::decision::DecisionError::NoValidMove) end the match with an error.
    #[instrument(skip(self), fields(name = %self.name))]
    pub fn run(&mut self) -> anyhow::Result<()> {
        let mut ticks = 0u64;
        while self.transport.is_active() {
            let Some(state) = self.transport.receive_game_state()? else {
                break;
            };
            self.tick(&state)?;
            ticks += 1;
        }
        info!("{}: connection closed after {ticks} moves", self.name);
        Ok(())
    }

    /// Decides and sends the move for one snapshot.
    ///
    /// # Errors
    /// See [`run`](Self::run).
    pub fn tick(&mut self, state: &GameState) -> anyhow::Result<Decision> {
        let me = state
            .player_named(&self.name)
            .with_context(|| format!("{}: not found among the players", self.name))?;

        let decision = self.engine.decide(state, me)?;
        debug!(
            frame = state.frame(),
            position = %me.position,
            rule = ?decision.rule,
            "{}: sending move {}",
            self.name,
            decision.direction
        );
        self.transport
            .send_move(decision.direction)
            .context("could not send move")?;
        Ok(decision)
    }

    /// The decision engine, for inspection.
    pub fn engine(&self) -> &DecisionEngine {
        &self.engine
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }
}
