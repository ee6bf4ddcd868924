use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{GameState, Position, Snake, TerminalCause},
};
use crate::error::GameError;
use rand::{Rng, SeedableRng, rngs::StdRng};

/// Random fruit candidates drawn before falling back to enumerating free cells
const FRUIT_SAMPLE_ATTEMPTS: usize = 64;

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// Why the episode ended, if it did
    pub terminal_cause: Option<TerminalCause>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Reward for this step
    pub reward: f32,
    /// Whether the game has terminated
    pub terminated: bool,
    /// Score after this step
    pub score: u32,
    /// Additional information about the step
    pub info: StepInfo,
}

/// The game engine that handles all game logic
///
/// All randomness (fruit placement) comes from the engine's own seedable
/// generator, so a seeded engine replays identically.
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine seeded from system entropy
    pub fn new(config: GameConfig) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Create a game engine with a fixed seed
    pub fn with_seed(config: GameConfig, seed: u64) -> Result<Self, GameError> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: GameConfig, rng: StdRng) -> Result<Self, GameError> {
        config.validate().map_err(GameError::InvalidConfig)?;
        Ok(Self { config, rng })
    }

    /// Get the engine configuration
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to its initial state
    ///
    /// The snake starts at the configured cell facing east with its body
    /// trailing west.
    pub fn reset(&mut self) -> Result<GameState, GameError> {
        let cell = self.config.cell_size as i32;
        let (column, row) = self.config.start_cell;

        let snake = Snake::new(
            Position::new(column as i32 * cell, row as i32 * cell),
            Direction::East,
            self.config.initial_snake_length,
            cell,
        );

        let food = self.spawn_food(&snake)?;

        Ok(GameState::new(
            snake,
            food,
            self.config.width,
            self.config.height,
            self.config.cell_size,
        ))
    }

    /// Execute one step with an action relative to the current facing
    pub fn step(&mut self, state: &mut GameState, action: Action) -> Result<StepResult, GameError> {
        let requested = action.apply(state.snake.direction);
        self.advance(state, requested)
    }

    /// Execute one step from a one-hot `[straight, right, left]` encoding
    pub fn step_one_hot(
        &mut self,
        state: &mut GameState,
        encoding: &[u8],
    ) -> Result<StepResult, GameError> {
        let action = Action::from_one_hot(encoding)?;
        self.step(state, action)
    }

    /// Execute one step towards an absolute direction (human input)
    ///
    /// A request for the direction opposite the current facing is ignored
    /// and the snake keeps going straight.
    pub fn step_towards(
        &mut self,
        state: &mut GameState,
        direction: Direction,
    ) -> Result<StepResult, GameError> {
        self.advance(state, direction)
    }

    fn advance(
        &mut self,
        state: &mut GameState,
        requested: Direction,
    ) -> Result<StepResult, GameError> {
        if !state.is_alive {
            return Ok(StepResult {
                reward: 0.0,
                terminated: true,
                score: state.score,
                info: StepInfo {
                    ate_food: false,
                    terminal_cause: None,
                },
            });
        }

        state.frame += 1;

        if !state.snake.direction.is_opposite(requested) {
            state.snake.direction = requested;
        }

        // The new head joins the body before any collision test
        let new_head = state.neighbor_of_head(state.snake.direction);
        state.snake.push_head(new_head);

        let stall_limit = self.config.stall_factor as usize * state.snake.len();
        let terminal_cause = state.collision_at(new_head).or_else(|| {
            (state.frame as usize > stall_limit).then_some(TerminalCause::Stalled)
        });

        if let Some(cause) = terminal_cause {
            state.is_alive = false;
            log::trace!("episode over at frame {}: {:?}", state.frame, cause);

            return Ok(StepResult {
                reward: self.config.death_penalty,
                terminated: true,
                score: state.score,
                info: StepInfo {
                    ate_food: false,
                    terminal_cause: Some(cause),
                },
            });
        }

        let ate_food = new_head == state.food;
        let reward = if ate_food {
            // A snake covering the whole field ends the game without scoring
            state.food = match self.spawn_food(&state.snake) {
                Ok(food) => food,
                Err(err) => {
                    state.is_alive = false;
                    return Err(err);
                }
            };
            state.score += 1;
            self.config.food_reward
        } else {
            state.snake.pop_tail();
            self.config.step_reward
        };

        Ok(StepResult {
            reward,
            terminated: false,
            score: state.score,
            info: StepInfo {
                ate_food,
                terminal_cause: None,
            },
        })
    }

    /// Pick a fruit position outside the snake, uniformly over free cells
    pub fn spawn_food(&mut self, snake: &Snake) -> Result<Position, GameError> {
        let columns = self.config.columns() as i32;
        let rows = self.config.rows() as i32;
        let cell = self.config.cell_size as i32;

        if snake.len() >= self.config.cell_count() {
            return Err(GameError::BoardFull { cells: snake.len() });
        }

        for _ in 0..FRUIT_SAMPLE_ATTEMPTS {
            let pos = Position::new(
                self.rng.gen_range(0..columns) * cell,
                self.rng.gen_range(0..rows) * cell,
            );

            if !snake.body.contains(&pos) {
                return Ok(pos);
            }
        }

        let free: Vec<Position> = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| Position::new(column * cell, row * cell)))
            .filter(|pos| !snake.body.contains(pos))
            .collect();

        if free.is_empty() {
            return Err(GameError::BoardFull { cells: snake.len() });
        }

        Ok(free[self.rng.gen_range(0..free.len())])
    }
}
