//! Safety predicate applied to every candidate move.

use thiserror::Error;
use tracing::debug;

use crate::game_interface::{Direction, GameState, Player, Position};

/// Width of the strip along each border the validator refuses to enter.
pub const EDGE_BUFFER: i32 = 2;

/// Why a candidate cell was refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Rejection {
    /// The cell is off the grid.
    #[error("move out of bounds at {0}")]
    OutOfBounds(Position),
    /// The cell holds a trail (anyone's, including ours).
    #[error("cell occupied by player {owner} at {position}")]
    Occupied {
        /// The blocked cell.
        position: Position,
        /// Id found in the cell.
        owner: u32,
    },
    /// Another player's head is on the cell.
    #[error("collision with player {player} at {position}")]
    HeadOn {
        /// The blocked cell.
        position: Position,
        /// Name of the other player.
        player: String,
    },
    /// The cell is inside the edge buffer.
    #[error("move near grid edge at {0} is risky")]
    EdgeBuffer(Position),
}

/// Checks candidate moves of one player against one snapshot.
///
/// Total and side-effect free apart from a `debug!` line per rejection. Trail memory is not
/// consulted here.
#[derive(Debug, Clone, Copy)]
pub struct MoveValidator<'a> {
    state: &'a GameState,
    me: &'a Player,
}

impl<'a> MoveValidator<'a> {
    /// Validator for `me` moving on `state`.
    pub fn new(state: &'a GameState, me: &'a Player) -> MoveValidator<'a> {
        MoveValidator { state, me }
    }

    /// Returns the target cell if moving in `direction` is safe, the first failed rule otherwise.
    pub fn check(&self, direction: Direction) -> Result<Position, Rejection> {
        let target = self.me.position.step(direction);

        let Some(cell) = self.state.grid_cell(target) else {
            return Err(Rejection::OutOfBounds(target));
        };
        if cell != 0 {
            return Err(Rejection::Occupied {
                position: target,
                owner: cell,
            });
        }
        if let Some(other) = self
            .state
            .players()
            .iter()
            .find(|p| p.id != self.me.id && p.position == target)
        {
            return Err(Rejection::HeadOn {
                position: target,
                player: other.name.clone(),
            });
        }
        if !self.outside_edge_buffer(target) {
            return Err(Rejection::EdgeBuffer(target));
        }
        Ok(target)
    }

    /// [`check`](Self::check) as a boolean, logging the rejection reason.
    pub fn is_valid(&self, direction: Direction) -> bool {
        match self.check(direction) {
            Ok(_) => true,
            Err(reason) => {
                debug!("{}: {direction} refused: {reason}", self.me.name);
                false
            }
        }
    }

    fn outside_edge_buffer(&self, p: Position) -> bool {
        p.x >= EDGE_BUFFER
            && p.x < self.state.width() - EDGE_BUFFER
            && p.y >= EDGE_BUFFER
            && p.y < self.state.height() - EDGE_BUFFER
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn me_at(x: i32, y: i32) -> Player {
        Player::new(1, "laura", Position::new(x, y))
    }

    #[test]
    fn accepts_empty_inner_cell() {
        let me = me_at(10, 10);
        let state = GameState::empty(20, 20).with_player(me.clone());
        let validator = MoveValidator::new(&state, &me);
        for d in Direction::ALL {
            assert_eq!(validator.check(d), Ok(me.position.step(d)));
        }
    }

    #[test]
    fn rejects_each_rule() {
        let me = me_at(10, 10);
        let state = GameState::empty(20, 20)
            .with_player(me.clone())
            .with_cell(Position::new(10, 9), 3)
            .with_cell(Position::new(11, 10), 1);
        let validator = MoveValidator::new(&state, &me);

        assert_eq!(
            validator.check(Direction::North),
            Err(Rejection::Occupied {
                position: Position::new(10, 9),
                owner: 3
            })
        );
        // own trail blocks like any other
        assert!(matches!(
            validator.check(Direction::East),
            Err(Rejection::Occupied { owner: 1, .. })
        ));

        let corner = me_at(0, 0);
        let state = GameState::empty(20, 20).with_player(corner.clone());
        let validator = MoveValidator::new(&state, &corner);
        assert_eq!(
            validator.check(Direction::West),
            Err(Rejection::OutOfBounds(Position::new(-1, 0)))
        );
        assert_eq!(
            validator.check(Direction::East),
            Err(Rejection::EdgeBuffer(Position::new(1, 0)))
        );
    }

    #[test]
    fn rejects_head_on_with_unmarked_head() {
        let me = me_at(10, 10);
        let mut grid = vec![0; 400];
        grid[10 * 20 + 10] = 1;
        // bob's head is not written into the grid yet
        let state = GameState::new(
            0,
            20,
            20,
            grid,
            vec![me.clone(), Player::new(2, "bob", Position::new(10, 11))],
        )
        .unwrap();
        let validator = MoveValidator::new(&state, &me);
        assert_eq!(
            validator.check(Direction::South),
            Err(Rejection::HeadOn {
                position: Position::new(10, 11),
                player: "bob".to_owned()
            })
        );
        assert!(!validator.is_valid(Direction::South));
    }

    #[test]
    fn edge_buffer_limits() {
        let state = GameState::empty(20, 20);
        let cases = [
            (me_at(3, 10), Direction::West, true),
            (me_at(2, 10), Direction::West, false),
            (me_at(16, 10), Direction::East, true),
            (me_at(17, 10), Direction::East, false),
            (me_at(10, 3), Direction::North, true),
            (me_at(10, 2), Direction::North, false),
            (me_at(10, 16), Direction::South, true),
            (me_at(10, 17), Direction::South, false),
        ];
        for (me, d, expected) in cases {
            let validator = MoveValidator::new(&state, &me);
            assert_eq!(validator.is_valid(d), expected, "{me:?} {d}");
        }
    }

    /// Every cell of a small board, including positions off the board: `check` answers, and
    /// an accepted target satisfies all four rules.
    #[test]
    fn total_and_sound() {
        let (w, h) = (9, 7);
        let state = GameState::empty(w, h)
            .with_player(Player::new(2, "bob", Position::new(4, 3)))
            .with_cell(Position::new(3, 3), 2)
            .with_cell(Position::new(5, 2), 1);
        for x in -2..w + 2 {
            for y in -2..h + 2 {
                let me = Player::new(1, "laura", Position::new(x, y));
                let validator = MoveValidator::new(&state, &me);
                for d in Direction::ALL {
                    let Ok(target) = validator.check(d) else {
                        continue;
                    };
                    assert!(state.is_inside_grid(target));
                    assert_eq!(state.grid_cell(target), Some(0));
                    assert!(state
                        .players()
                        .iter()
                        .all(|p| p.id == me.id || p.position != target));
                    assert!(target.x >= 2 && target.x < w - 2);
                    assert!(target.y >= 2 && target.y < h - 2);
                }
            }
        }
    }

    #[test]
    fn extreme_coordinates_are_out_of_bounds() {
        let state = GameState::empty(20, 20);
        for (x, y) in [
            (i32::MAX, 10),
            (i32::MIN, 10),
            (10, i32::MAX),
            (10, i32::MIN),
            (i32::MAX, i32::MIN),
        ] {
            let me = me_at(x, y);
            let validator = MoveValidator::new(&state, &me);
            for d in Direction::ALL {
                assert!(
                    matches!(validator.check(d), Err(Rejection::OutOfBounds(_))),
                    "{d} from ({x},{y})"
                );
                assert!(!validator.is_valid(d));
            }
        }
    }
}
