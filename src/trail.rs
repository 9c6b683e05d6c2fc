//! Bounded memory of the agent's own recent positions.

use std::collections::{HashMap, VecDeque};

use crate::game_interface::Position;

/// FIFO set of the most recently remembered positions.
///
/// Membership is O(1). Once more than [`TrailMemory::capacity`] positions have been remembered,
/// the oldest one is forgotten. The memory is advisory: the decision engine uses it to avoid
/// re-entering its own recent path, it never overrides the move validator.
#[derive(Debug, Clone)]
pub struct TrailMemory {
    capacity: usize,
    order: VecDeque<Position>,
    /// Queued copies per position.
    members: HashMap<Position, usize>,
}

impl TrailMemory {
    /// Capacity used by the agent.
    pub const DEFAULT_CAPACITY: usize = 200;

    /// Creates an empty memory holding at most `capacity` positions.
    ///
    /// # Panics
    /// If `capacity` is 0.
    pub fn with_capacity(capacity: usize) -> TrailMemory {
        assert!(capacity >= 1, "trail memory must hold at least one position");
        TrailMemory {
            capacity,
            order: VecDeque::with_capacity(capacity + 1),
            members: HashMap::with_capacity(capacity + 1),
        }
    }

    /// Records `position`, evicting the oldest entry when over capacity.
    pub fn remember(&mut self, position: Position) {
        *self.members.entry(position).or_insert(0) += 1;
        self.order.push_back(position);

        if self.order.len() > self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                return;
            };
            // a re-inserted position stays a member while a newer copy is queued
            if let Some(copies) = self.members.get_mut(&oldest) {
                *copies -= 1;
                if *copies == 0 {
                    self.members.remove(&oldest);
                }
            }
        }
    }

    /// True if `position` is among the remembered positions.
    pub fn contains(&self, position: Position) -> bool {
        self.members.contains_key(&position)
    }

    /// Remembered positions, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &Position> {
        self.order.iter()
    }

    /// Number of remembered positions.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True if nothing has been remembered yet.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Maximum number of remembered positions.
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for TrailMemory {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}
