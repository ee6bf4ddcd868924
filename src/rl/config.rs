//! Deep Q-learning hyperparameter configuration

use serde::{Deserialize, Serialize};

use super::buffer::DEFAULT_CAPACITY;

/// Largest exploration constant whose draw range fits in a `u32`
pub const MAX_RANDOMNESS: u32 = u32::MAX / 2;

/// Configuration for the deep Q-learning agent
///
/// # Example
///
/// ```rust
/// use snake_dqn::rl::DqnConfig;
///
/// let config = DqnConfig {
///     randomness: 100,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DqnConfig {
    /// Learning rate for the Adam optimizer
    ///
    /// Default: 0.001
    pub learning_rate: f64,

    /// Discount factor for future rewards (gamma)
    ///
    /// Default: 0.9
    pub gamma: f32,

    /// Width of the network's hidden layer
    ///
    /// Default: 256
    pub hidden_size: usize,

    /// Maximum number of transitions in replay memory
    ///
    /// Default: 100_000
    pub memory_capacity: usize,

    /// Number of transitions sampled for long-memory training
    ///
    /// Default: 1000
    pub batch_size: usize,

    /// Exploration constant
    ///
    /// Epsilon is `randomness - games_played` (floored at zero) and an
    /// exploring move happens when a uniform draw from `0..=2 * randomness`
    /// falls below it.
    ///
    /// Default: 80
    pub randomness: u32,

    /// Seed for exploration and batch sampling; entropy when `None`
    pub seed: Option<u64>,
}

impl DqnConfig {
    /// Create a new configuration with default hyperparameters
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.learning_rate <= 0.0 {
            return Err(format!(
                "learning_rate must be positive, got {}",
                self.learning_rate
            ));
        }

        if !(0.0..=1.0).contains(&self.gamma) {
            return Err(format!("gamma must be in [0, 1], got {}", self.gamma));
        }

        if self.hidden_size == 0 {
            return Err("hidden_size must be at least 1".to_string());
        }

        if self.memory_capacity == 0 {
            return Err("memory_capacity must be at least 1".to_string());
        }

        if self.batch_size == 0 {
            return Err("batch_size must be at least 1".to_string());
        }

        // Exploration draws come from 0..=2 * randomness
        if self.randomness > MAX_RANDOMNESS {
            return Err(format!(
                "randomness must be at most {}, got {}",
                MAX_RANDOMNESS, self.randomness
            ));
        }

        Ok(())
    }
}

impl Default for DqnConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.001,
            gamma: 0.9,
            hidden_size: 256,
            memory_capacity: DEFAULT_CAPACITY,
            batch_size: 1000,
            randomness: 80,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = DqnConfig::default();
        assert_eq!(config.learning_rate, 0.001);
        assert_eq!(config.gamma, 0.9);
        assert_eq!(config.hidden_size, 256);
        assert_eq!(config.memory_capacity, 100_000);
        assert_eq!(config.batch_size, 1000);
        assert_eq!(config.randomness, 80);
        assert!(config.seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validation_negative_learning_rate() {
        let mut config = DqnConfig::new();
        config.learning_rate = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_gamma_out_of_range() {
        let mut config = DqnConfig::default();
        config.gamma = 1.5;
        assert!(config.validate().is_err());

        config.gamma = -0.1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_sizes() {
        for mutate in [
            (|c: &mut DqnConfig| c.hidden_size = 0) as fn(&mut DqnConfig),
            |c| c.memory_capacity = 0,
            |c| c.batch_size = 0,
        ] {
            let mut config = DqnConfig::default();
            mutate(&mut config);
            assert!(config.validate().is_err());
        }
    }

    #[test]
    fn test_validation_randomness_bound() {
        let mut config = DqnConfig {
            randomness: MAX_RANDOMNESS,
            ..Default::default()
        };
        assert!(config.validate().is_ok());

        config.randomness = MAX_RANDOMNESS + 1;
        assert!(config.validate().is_err());

        config.randomness = u32::MAX;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let config = DqnConfig {
            seed: Some(42),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let restored: DqnConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.seed, Some(42));
        assert_eq!(restored.batch_size, config.batch_size);
    }
}
