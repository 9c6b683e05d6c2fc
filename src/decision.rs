//! Per-tick move selection.
//!
//! The [`DecisionEngine`] tries, in strict priority:
//!
//! 1. **Edge escape**: when the head sits in the edge buffer, step back toward the centre.
//! 2. **Patrol step**: follow the square patrol heading ([`PatrolState`]).
//! 3. **Fallback sweep**: first direction in [`Direction::from_value`] order that is safe.
//! 4. **Give up**: [`DecisionError::NoValidMove`].
//!
//! Steps 2 and 3 also refuse cells found in the agent's [`TrailMemory`]. Nothing ever relaxes the
//! validator or the trail check: running out of moves is preferred over a risky one.

use thiserror::Error;
use tracing::{info, instrument, trace, warn};

use crate::game_interface::{Direction, GameState, Player, Position};
use crate::patrol::PatrolState;
use crate::trail::TrailMemory;
use crate::validator::{MoveValidator, EDGE_BUFFER};

/// Which rung of the priority ladder produced a move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Moving away from a border.
    EdgeEscape,
    /// Following the patrol heading.
    Patrol,
    /// First safe direction after the patrol heading was refused.
    Fallback,
}

/// A chosen move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    /// Direction to send to the server.
    pub direction: Direction,
    /// Why it was chosen.
    pub rule: Rule,
}

/// The terminal outcome of the priority ladder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecisionError {
    /// Every direction is either refused by the validator or part of the recent trail.
    #[error("no valid moves available from {position}")]
    NoValidMove {
        /// Name of the stuck player.
        name: String,
        /// Where it is stuck.
        position: Position,
    },
}

/// Owns the patrol automaton and trail memory of one match.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    patrol: PatrolState,
    trail: TrailMemory,
}

impl DecisionEngine {
    /// Engine with a fresh patrol and an empty trail of default capacity.
    pub fn new() -> DecisionEngine {
        Self::default()
    }

    /// Engine resuming from an existing patrol and trail.
    pub fn with_state(patrol: PatrolState, trail: TrailMemory) -> DecisionEngine {
        DecisionEngine { patrol, trail }
    }

    /// Chooses the move of `me` for this tick.
    ///
    /// # Errors
    /// [`DecisionError::NoValidMove`] when no rung of the ladder finds a move. The caller is
    /// expected to log it and end the match.
    #[instrument(level = "trace", skip_all, fields(frame = state.frame()))]
    pub fn decide(&mut self, state: &GameState, me: &Player) -> Result<Decision, DecisionError> {
        let validator = MoveValidator::new(state, me);

        if let Some(direction) = self.edge_escape(state, me, &validator) {
            return Ok(Decision {
                direction,
                rule: Rule::EdgeEscape,
            });
        }

        if self.patrol.begin_tick() {
            trace!(
                heading = %self.patrol.heading(),
                side_length = self.patrol.side_length(),
                "turned"
            );
        }
        let heading = self.patrol.heading();
        let next = me.position.step(heading);
        if validator.is_valid(heading) && !self.trail.contains(next) {
            self.patrol.advance();
            self.trail.remember(next);
            return Ok(Decision {
                direction: heading,
                rule: Rule::Patrol,
            });
        }

        // the turn taken above is kept: the next side just starts a tick late
        for direction in (0..4).filter_map(Direction::from_value) {
            let next = me.position.step(direction);
            if validator.is_valid(direction) && !self.trail.contains(next) {
                warn!("{}: fallback to direction {direction}", me.name);
                self.trail.remember(next);
                return Ok(Decision {
                    direction,
                    rule: Rule::Fallback,
                });
            }
        }

        Err(DecisionError::NoValidMove {
            name: me.name.clone(),
            position: me.position,
        })
    }

    /// Patrol automaton as it stands after the last decision.
    pub fn patrol(&self) -> &PatrolState {
        &self.patrol
    }

    /// Positions remembered so far.
    pub fn trail(&self) -> &TrailMemory {
        &self.trail
    }

    fn edge_escape(
        &self,
        state: &GameState,
        me: &Player,
        validator: &MoveValidator<'_>,
    ) -> Option<Direction> {
        let Position { x, y } = me.position;
        let near_left = x < EDGE_BUFFER;
        let near_right = x >= state.width() - EDGE_BUFFER;
        let near_top = y < EDGE_BUFFER;
        let near_bottom = y >= state.height() - EDGE_BUFFER;

        if !(near_left || near_right || near_top || near_bottom) {
            return None;
        }
        info!("{}: near border, adjusting movement", me.name);

        [
            (near_right, Direction::West),
            (near_left, Direction::East),
            (near_top, Direction::South),
            (near_bottom, Direction::North),
        ]
        .into_iter()
        .find(|&(near, direction)| near && validator.is_valid(direction))
        .map(|(_, direction)| direction)
    }
}
