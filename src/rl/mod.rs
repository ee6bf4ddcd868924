//! Deep Q-learning for the Snake game
//!
//! Provides:
//! - 11-feature binary state encoding
//! - Bounded FIFO experience replay
//! - Two-layer Q-network on Burn
//! - Temporal-difference trainer (Adam, MSE)
//! - Epsilon-greedy agent
//! - Model persistence

pub mod agent;
pub mod backend;
pub mod buffer;
pub mod config;
pub mod environment;
pub mod network;
pub mod observation;
pub mod persistence;
pub mod trainer;

pub use agent::{DqnAgent, PolicyMode};
pub use backend::{InferenceBackend, TrainingBackend, default_device};
pub use buffer::{ReplayBuffer, Transition};
pub use config::DqnConfig;
pub use environment::SnakeEnvironment;
pub use network::{QNetwork, QNetworkConfig};
pub use observation::{STATE_SIZE, StateVector, encode_state};
pub use persistence::{ModelMetadata, ModelStore, load_network, save_model};
pub use trainer::{QTrainer, QValues, td_target, td_targets};
