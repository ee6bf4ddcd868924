//! Snake DQN - A Snake game environment with a deep Q-learning agent
//!
//! This library provides:
//! - Core game logic on a pixel-aligned grid (game module)
//! - State encoding, replay memory, Q-network and agent (rl module)
//! - Training session bookkeeping (metrics module)
//! - The training loop and model selection (modes module)

pub mod error;
pub mod game;
pub mod logging;
pub mod metrics;
pub mod modes;
pub mod rl;

pub use error::GameError;
