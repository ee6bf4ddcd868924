//! Experience replay memory for deep Q-learning
//!
//! Transitions are kept in a bounded FIFO: once capacity is reached the oldest
//! transition is dropped for every new one. Batches for long-memory training
//! are drawn uniformly without replacement.

use std::collections::VecDeque;

use rand::Rng;

use super::observation::StateVector;
use crate::game::Action;

/// Default replay memory capacity
pub const DEFAULT_CAPACITY: usize = 100_000;

/// One environment step as seen by the learner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    pub state: StateVector,
    pub action: Action,
    pub reward: f32,
    pub next_state: StateVector,
    pub done: bool,
}

impl Transition {
    pub fn new(
        state: StateVector,
        action: Action,
        reward: f32,
        next_state: StateVector,
        done: bool,
    ) -> Self {
        Self {
            state,
            action,
            reward,
            next_state,
            done,
        }
    }
}

/// Bounded FIFO store of transitions
///
/// # Example
///
/// ```rust
/// use snake_dqn::game::Action;
/// use snake_dqn::rl::{ReplayBuffer, StateVector, Transition};
///
/// let mut buffer = ReplayBuffer::new(2);
/// let state = StateVector([0; 11]);
///
/// for reward in [1.0, 2.0, 3.0] {
///     buffer.remember(Transition::new(state, Action::Straight, reward, state, false));
/// }
///
/// assert_eq!(buffer.len(), 2);
/// assert_eq!(buffer.iter().next().unwrap().reward, 2.0);
/// ```
#[derive(Debug, Clone)]
pub struct ReplayBuffer {
    transitions: VecDeque<Transition>,
    capacity: usize,
}

impl ReplayBuffer {
    /// Create an empty buffer holding at most `capacity` transitions
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "replay buffer capacity must be positive");
        Self {
            transitions: VecDeque::with_capacity(capacity.min(DEFAULT_CAPACITY)),
            capacity,
        }
    }

    /// Append a transition, evicting the oldest one when full
    pub fn remember(&mut self, transition: Transition) {
        if self.is_full() {
            self.transitions.pop_front();
        }
        self.transitions.push_back(transition);
    }

    /// Draw a batch for long-memory training
    ///
    /// With more than `batch_size` transitions stored, returns `batch_size`
    /// distinct transitions chosen uniformly at random. Otherwise returns
    /// the whole store in insertion order.
    pub fn sample<R: Rng + ?Sized>(&self, batch_size: usize, rng: &mut R) -> Vec<Transition> {
        if self.transitions.len() > batch_size {
            rand::seq::index::sample(rng, self.transitions.len(), batch_size)
                .into_iter()
                .map(|i| self.transitions[i])
                .collect()
        } else {
            self.transitions.iter().copied().collect()
        }
    }

    /// Iterate from oldest to newest
    pub fn iter(&self) -> impl Iterator<Item = &Transition> {
        self.transitions.iter()
    }

    /// Get the number of stored transitions
    pub fn len(&self) -> usize {
        self.transitions.len()
    }

    /// Check if the buffer is empty
    pub fn is_empty(&self) -> bool {
        self.transitions.is_empty()
    }

    /// Check if the buffer has reached capacity
    pub fn is_full(&self) -> bool {
        self.transitions.len() >= self.capacity
    }

    /// Maximum number of stored transitions
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Default for ReplayBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}
