//! Expanding clockwise square patrol.

use crate::game_interface::Direction;

/// State of the square patrol automaton.
///
/// The agent walks `side_length` steps, turns right, and after the fourth turn draws the next
/// square one step wider. Nothing from the game feeds back into the side length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatrolState {
    heading: Direction,
    side_length: u32,
    steps_on_side: u32,
    sides_completed: u8,
}

impl PatrolState {
    /// Heading north on a unit square, nothing walked yet.
    pub fn new() -> PatrolState {
        PatrolState {
            heading: Direction::North,
            side_length: 1,
            steps_on_side: 0,
            sides_completed: 0,
        }
    }

    /// Resumes a patrol from explicit counters.
    ///
    /// # Panics
    /// If `side_length` is 0 or `sides_completed` is above 3.
    pub fn resume(
        heading: Direction,
        side_length: u32,
        steps_on_side: u32,
        sides_completed: u8,
    ) -> PatrolState {
        assert!(side_length >= 1, "a square side is at least one step");
        assert!(sides_completed <= 3, "a square has four sides");
        PatrolState {
            heading,
            side_length,
            steps_on_side,
            sides_completed,
        }
    }

    /// Turns right if the current side is done. Returns true when it turned.
    ///
    /// Applied once per tick before the patrol step is attempted. Completing the fourth side
    /// widens the square.
    pub fn begin_tick(&mut self) -> bool {
        if self.steps_on_side < self.side_length {
            return false;
        }
        self.heading = self.heading.clockwise();
        self.steps_on_side = 0;
        self.sides_completed += 1;
        if self.sides_completed == 4 {
            self.side_length += 1;
            self.sides_completed = 0;
        }
        true
    }

    /// Counts a step taken along the current heading.
    pub fn advance(&mut self) {
        self.steps_on_side += 1;
    }

    /// Direction of the current side.
    pub fn heading(&self) -> Direction {
        self.heading
    }

    /// Steps per side of the current square.
    pub fn side_length(&self) -> u32 {
        self.side_length
    }

    /// Steps already walked on the current side.
    pub fn steps_on_side(&self) -> u32 {
        self.steps_on_side
    }

    /// Sides finished in the current square, in `0..=3`.
    pub fn sides_completed(&self) -> u8 {
        self.sides_completed
    }
}

impl Default for PatrolState {
    fn default() -> Self {
        Self::new()
    }
}
