//! Error types for the game core
//!
//! Failures in the simulation and action decoding are programmer or resource
//! errors that callers must be able to match on, so they get a typed enum.
//! Application-level code (training loop, persistence) wraps these in
//! `anyhow::Error` with context.

use thiserror::Error;

/// Errors raised by the game core
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    /// The action encoding was not exactly one-hot over three entries
    #[error("invalid action encoding {encoding:?}: expected exactly one 1 among 3 entries")]
    InvalidAction { encoding: Vec<u8> },

    /// Every cell of the grid is covered by the snake
    #[error("no free cell left for fruit placement ({cells} cells occupied)")]
    BoardFull { cells: usize },

    /// A configuration value was rejected
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GameError::InvalidAction {
            encoding: vec![1, 1, 0],
        };
        assert!(err.to_string().contains("[1, 1, 0]"));

        let err = GameError::BoardFull { cells: 4 };
        assert!(err.to_string().contains("4 cells"));
    }
}
