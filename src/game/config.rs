use serde::{Deserialize, Serialize};

/// Configuration for the game
///
/// Dimensions are in pixels; every position in the game is aligned to
/// `cell_size`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the playing field in pixels
    pub width: u32,
    /// Height of the playing field in pixels
    pub height: u32,
    /// Edge length of one grid cell in pixels
    pub cell_size: u32,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Cell (column, row) of the snake's head at episode start
    pub start_cell: (u32, u32),
    /// An episode is stalled once the frame counter exceeds
    /// `stall_factor * snake length`
    pub stall_factor: u32,

    // Rewards
    /// Reward for eating a fruit
    pub food_reward: f32,
    /// Reward for an ordinary step
    pub step_reward: f32,
    /// Penalty for dying or stalling
    pub death_penalty: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            cell_size: 10,
            initial_snake_length: 3,
            start_cell: (5, 5),
            stall_factor: 100,
            food_reward: 10.0,
            step_reward: 0.0,
            death_penalty: -10.0,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with a custom field size
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// A 10x10 cell field for tests
    pub fn small() -> Self {
        Self::new(100, 100)
    }

    /// Number of cell columns
    pub fn columns(&self) -> u32 {
        self.width / self.cell_size
    }

    /// Number of cell rows
    pub fn rows(&self) -> u32 {
        self.height / self.cell_size
    }

    /// Total number of cells on the field
    pub fn cell_count(&self) -> usize {
        self.columns() as usize * self.rows() as usize
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.cell_size == 0 {
            return Err("cell_size must be positive".to_string());
        }

        if self.width == 0 || self.height == 0 {
            return Err(format!(
                "field must be non-empty, got {}x{}",
                self.width, self.height
            ));
        }

        if self.width % self.cell_size != 0 || self.height % self.cell_size != 0 {
            return Err(format!(
                "field {}x{} is not a multiple of cell_size {}",
                self.width, self.height, self.cell_size
            ));
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        // The snake starts facing east with its tail trailing west of the head
        let (column, row) = self.start_cell;
        let tail_column = column as i64 - (self.initial_snake_length as i64 - 1);
        if column >= self.columns() || row >= self.rows() || tail_column < 0 {
            return Err(format!(
                "snake of length {} at cell {:?} does not fit a {}x{} grid",
                self.initial_snake_length,
                self.start_cell,
                self.columns(),
                self.rows()
            ));
        }

        if self.stall_factor == 0 {
            return Err("stall_factor must be at least 1".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.width, 800);
        assert_eq!(config.height, 600);
        assert_eq!(config.cell_size, 10);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.columns(), 80);
        assert_eq!(config.rows(), 60);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(150, 120);
        assert_eq!(config.columns(), 15);
        assert_eq!(config.rows(), 12);
        assert_eq!(config.cell_count(), 180);
    }

    #[test]
    fn test_misaligned_field_rejected() {
        let config = GameConfig::new(805, 600);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_start_outside_grid_rejected() {
        let mut config = GameConfig::small();
        config.start_cell = (10, 0);
        assert!(config.validate().is_err());

        config.start_cell = (1, 0);
        config.initial_snake_length = 3;
        assert!(config.validate().is_err());

        config.start_cell = (2, 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_values_rejected() {
        let mut config = GameConfig::default();
        config.cell_size = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.stall_factor = 0;
        assert!(config.validate().is_err());

        let mut config = GameConfig::default();
        config.initial_snake_length = 0;
        assert!(config.validate().is_err());
    }
}
