use super::observation::{StateVector, encode_state};
use crate::error::GameError;
use crate::game::{Action, GameConfig, GameEngine, GameState, StepResult};

/// Snake environment for reinforcement learning
///
/// Wraps the game engine and exposes the learner's view of it:
/// - Encoded 11-feature observations
/// - Relative action space (straight, right, left)
/// - Standard RL interface (reset, step)
pub struct SnakeEnvironment {
    engine: GameEngine,
    state: GameState,
}

impl SnakeEnvironment {
    /// Create a new Snake environment
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::from_engine(GameEngine::new(config)?)
    }

    /// Create a new Snake environment with deterministic fruit placement
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::from_engine(GameEngine::with_seed(config, seed)?)
    }

    fn from_engine(mut engine: GameEngine) -> Result<Self, GameError> {
        let state = engine.reset()?;
        Ok(Self { engine, state })
    }

    /// Reset the environment and return the initial observation
    pub fn reset(&mut self) -> Result<StateVector, GameError> {
        self.state = self.engine.reset()?;
        Ok(self.observe())
    }

    /// Step the environment with a relative action
    ///
    /// The result carries `(reward, terminated, score)` plus step details.
    pub fn step(&mut self, action: Action) -> Result<StepResult, GameError> {
        self.engine.step(&mut self.state, action)
    }

    /// Encode the current state without stepping
    pub fn observe(&self) -> StateVector {
        encode_state(&self.state)
    }

    /// Get reference to current game state (for rendering and tests)
    pub fn state(&self) -> &GameState {
        &self.state
    }
}
