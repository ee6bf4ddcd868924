//! Training mode for the deep Q-learning agent
//!
//! Each tick performs exactly one environment step followed by one
//! single-transition update. Batched replay updates only happen at episode
//! boundaries, and every new record is persisted through a [`ModelStore`].
//!
//! # Example
//!
//! ```rust,ignore
//! use snake_dqn::modes::{TrainConfig, TrainMode};
//! use snake_dqn::rl::{TrainingBackend, default_device};
//!
//! let mut config = TrainConfig::new("models", "snake");
//! config.max_games = Some(500);
//!
//! let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device())?;
//! train_mode.run().await?;
//! ```

use anyhow::{Context, Result};
use burn::tensor::backend::AutodiffBackend;
use rand::{RngCore, SeedableRng, rngs::StdRng};
use std::path::PathBuf;
use std::time::Duration;

use super::selection::ModelSelection;
use crate::game::GameConfig;
use crate::metrics::TrainingSession;
use crate::rl::{DqnAgent, DqnConfig, ModelMetadata, ModelStore, SnakeEnvironment, Transition};

/// Configuration for training mode
#[derive(Debug, Clone)]
pub struct TrainConfig {
    /// Game configuration (field size, rewards)
    pub game_config: GameConfig,

    /// Agent hyperparameters
    pub dqn_config: DqnConfig,

    /// Stop after this many games; `None` trains until interrupted
    pub max_games: Option<usize>,

    /// Fixed tick period; `None` runs as a tight loop
    pub tick_interval: Option<Duration>,

    /// Directory new records are saved to
    pub model_dir: PathBuf,

    /// File stem of the saved model
    pub model_name: String,

    /// Previously saved model to continue from
    pub load_path: Option<PathBuf>,

    /// Log a summary line every N games
    pub log_frequency: usize,
}

impl TrainConfig {
    /// Create a training configuration with default game and agent settings
    ///
    /// # Example
    ///
    /// ```rust
    /// use snake_dqn::modes::TrainConfig;
    ///
    /// let config = TrainConfig::new("models", "snake");
    /// assert_eq!(config.max_games, None);
    /// ```
    pub fn new(model_dir: impl Into<PathBuf>, model_name: impl Into<String>) -> Self {
        Self {
            game_config: GameConfig::default(),
            dqn_config: DqnConfig::default(),
            max_games: None,
            tick_interval: None,
            model_dir: model_dir.into(),
            model_name: model_name.into(),
            load_path: None,
            log_frequency: 100,
        }
    }
}

/// Derive independent `(agent, environment)` seeds from one run seed
///
/// Seeding both generators with the same value would make exploration draws
/// and fruit placement replay the same stream.
pub fn split_seed(seed: u64) -> (u64, u64) {
    let mut master = StdRng::seed_from_u64(seed);
    (master.next_u64(), master.next_u64())
}

/// Training mode for the deep Q-learning agent
pub struct TrainMode<B: AutodiffBackend> {
    agent: DqnAgent<B>,

    env: SnakeEnvironment,

    /// Scores, record and step counters of this run
    session: TrainingSession,

    store: ModelStore,

    selection: ModelSelection,

    config: TrainConfig,
}

impl<B: AutodiffBackend> TrainMode<B> {
    /// Create a new training mode
    ///
    /// Loads the selected model first if the configuration asks for one.
    pub fn new(config: TrainConfig, device: B::Device) -> Result<Self> {
        config
            .game_config
            .validate()
            .map_err(anyhow::Error::msg)
            .context("Invalid game configuration")?;

        let store = ModelStore::new(&config.model_dir, &config.model_name);
        let selection = ModelSelection::resolve(config.load_path.as_deref(), &store);
        let mut session = TrainingSession::new(config.log_frequency.max(1));

        let (agent_seed, env_seed) = config.dqn_config.seed.map(split_seed).unzip();
        let dqn_config = DqnConfig {
            seed: agent_seed,
            ..config.dqn_config.clone()
        };

        let agent = match selection.load_path() {
            Some(path) => {
                let (network, metadata) = ModelStore::load::<B>(path, &device)?;
                log::info!(
                    "Loaded model {:?} (record {}, {} games)",
                    path,
                    metadata.record,
                    metadata.games_played
                );
                session = session.with_record(metadata.record);

                let dqn_config = DqnConfig {
                    hidden_size: metadata.hidden_size,
                    ..dqn_config
                };
                DqnAgent::with_network(network, dqn_config, device)?
            }
            None => DqnAgent::new(dqn_config, device)?,
        };

        let env = match env_seed {
            Some(seed) => SnakeEnvironment::with_seed(config.game_config.clone(), seed)?,
            None => SnakeEnvironment::new(config.game_config.clone())?,
        };

        Ok(Self {
            agent,
            env,
            session,
            store,
            selection,
            config,
        })
    }

    /// Run the training loop
    ///
    /// Returns once `max_games` games have completed; without a limit it only
    /// returns on error.
    pub async fn run(&mut self) -> Result<()> {
        self.log_header();

        let mut ticker = self
            .config
            .tick_interval
            .filter(|interval| !interval.is_zero())
            .map(tokio::time::interval);

        while !self.is_finished() {
            if let Some(ticker) = ticker.as_mut() {
                ticker.tick().await;
            }
            self.tick()?;
        }

        log::info!("Training complete. {}", self.session.format_summary());

        Ok(())
    }

    fn is_finished(&self) -> bool {
        self.config
            .max_games
            .is_some_and(|max| self.session.games() >= max)
    }

    /// Advance the game by one step and learn from it
    ///
    /// Returns the final score if the step ended a game.
    pub fn tick(&mut self) -> Result<Option<u32>> {
        let state = self.env.observe();
        let action = self.agent.select_action(&state);

        let result = self.env.step(action)?;
        let next_state = self.env.observe();

        let transition =
            Transition::new(state, action, result.reward, next_state, result.terminated);
        let loss = self.agent.train_short_memory(&transition);
        self.agent.remember(transition);
        self.session.record_step();

        log::trace!(
            "{:?} -> reward {} score {} loss {:.4}",
            action,
            result.reward,
            result.score,
            loss
        );

        if result.terminated {
            log::debug!("Game over: {:?}", result.info.terminal_cause);
            self.finish_game(result.score)?;
            return Ok(Some(result.score));
        }

        Ok(None)
    }

    /// Episode boundary: reset, replay, and persist on a new record
    fn finish_game(&mut self, score: u32) -> Result<()> {
        self.env.reset()?;
        self.agent.increment_games();
        self.agent.train_long_memory();

        if self.session.record_game(score) {
            self.persist(score);
        }

        log::info!(
            "Game {} Score {} Record {} Mean {:.2}",
            self.session.games(),
            score,
            self.session.record(),
            self.session.mean_score()
        );

        if self.session.games() % self.config.log_frequency.max(1) == 0 {
            log::info!("{}", self.session.format_summary());
        }

        Ok(())
    }

    /// Save the current network as the new record holder
    ///
    /// A failed save is logged and leaves the persisted record unchanged.
    fn persist(&mut self, record: u32) {
        let metadata = ModelMetadata::new(
            self.agent.config().hidden_size,
            self.agent.games_played(),
            record,
        );

        match self.store.save(self.agent.network(), &metadata) {
            Ok(path) => {
                log::info!("New record {}, model saved to {:?}", record, path);
                self.session.mark_saved(record);
            }
            Err(err) => {
                log::warn!("New record {} not saved: {:#}", record, err);
            }
        }
    }

    fn log_header(&self) {
        let game = &self.config.game_config;
        let dqn = self.agent.config();

        log::info!("Deep Q-learning - Snake");
        log::info!(
            "Field: {}x{} px, cell {} px",
            game.width,
            game.height,
            game.cell_size
        );
        log::info!(
            "Agent: lr {} gamma {} hidden {} memory {} batch {} randomness {}",
            dqn.learning_rate,
            dqn.gamma,
            dqn.hidden_size,
            dqn.memory_capacity,
            dqn.batch_size,
            dqn.randomness
        );
        match self.config.max_games {
            Some(max) => log::info!("Games: {}", max),
            None => log::info!("Games: until interrupted"),
        }
        if let Some(interval) = self.config.tick_interval {
            log::info!("Tick interval: {:?}", interval);
        }
        log::info!("Model: {:?} (load: {})", self.selection.path, self.selection.load);
    }

    /// Statistics of this run
    pub fn session(&self) -> &TrainingSession {
        &self.session
    }

    /// The agent being trained
    pub fn agent(&self) -> &DqnAgent<B> {
        &self.agent
    }

    /// The model chosen for this run
    pub fn selection(&self) -> &ModelSelection {
        &self.selection
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{QNetworkConfig, TrainingBackend, default_device};
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> TrainConfig {
        let mut config = TrainConfig::new(temp_dir.path().join("models"), "snake");
        config.game_config = GameConfig::small();
        config.dqn_config = DqnConfig {
            hidden_size: 16,
            batch_size: 32,
            memory_capacity: 1000,
            seed: Some(5),
            ..Default::default()
        };
        config
    }

    #[test]
    fn test_train_config_creation() {
        let config = TrainConfig::new("models", "snake");
        assert_eq!(config.model_dir, PathBuf::from("models"));
        assert_eq!(config.model_name, "snake");
        assert_eq!(config.load_path, None);
        assert_eq!(config.tick_interval, None);
    }

    #[test]
    fn test_split_seed_gives_distinct_streams() {
        for seed in 0..100 {
            let (agent_seed, env_seed) = split_seed(seed);
            assert_ne!(agent_seed, env_seed);
            assert_ne!(agent_seed, seed);
            assert_ne!(env_seed, seed);
            assert_eq!(split_seed(seed), (agent_seed, env_seed));
        }
    }

    #[test]
    fn test_exploration_independent_of_fruit_placement() {
        use rand::Rng;

        // First explore/exploit draw against the first fruit column draw
        let matches = (0..1000u64)
            .filter(|&seed| {
                let (agent_seed, env_seed) = split_seed(seed);
                let explore = StdRng::seed_from_u64(agent_seed).gen_range(0..=160u32) < 80;
                let fruit_west = StdRng::seed_from_u64(env_seed).gen_range(0..80i32) < 40;
                explore == fruit_west
            })
            .count();

        assert!(matches > 400 && matches < 600, "matched {matches}");
    }

    #[test]
    fn test_seeded_run_gives_agent_its_own_seed() {
        let temp_dir = TempDir::new().unwrap();
        let train_mode =
            TrainMode::<TrainingBackend>::new(test_config(&temp_dir), default_device()).unwrap();

        let (agent_seed, _) = split_seed(5);
        assert_eq!(train_mode.agent().config().seed, Some(agent_seed));
    }

    #[test]
    fn test_invalid_game_config_rejected() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.game_config.width = 105;

        assert!(TrainMode::<TrainingBackend>::new(config, default_device()).is_err());
    }

    #[test]
    fn test_tick_steps_and_learns() {
        let temp_dir = TempDir::new().unwrap();
        let mut train_mode =
            TrainMode::<TrainingBackend>::new(test_config(&temp_dir), default_device()).unwrap();

        train_mode.tick().unwrap();

        assert_eq!(train_mode.session().total_steps(), 1);
        assert_eq!(train_mode.agent().memory().len(), 1);
    }

    #[test]
    fn test_game_boundary_resets_and_counts() {
        let temp_dir = TempDir::new().unwrap();
        let mut train_mode =
            TrainMode::<TrainingBackend>::new(test_config(&temp_dir), default_device()).unwrap();

        let score = loop {
            if let Some(score) = train_mode.tick().unwrap() {
                break score;
            }
        };

        assert_eq!(train_mode.session().games(), 1);
        assert_eq!(train_mode.agent().games_played(), 1);
        assert_eq!(train_mode.session().scores(), &[score]);
        assert_eq!(train_mode.env.state().frame, 0);
        assert!(train_mode.env.state().is_alive);
    }

    #[tokio::test]
    async fn test_run_stops_after_max_games() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.max_games = Some(2);
        config.tick_interval = Some(Duration::from_micros(10));

        let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();
        train_mode.run().await.unwrap();

        assert_eq!(train_mode.session().games(), 2);
        assert_eq!(train_mode.agent().games_played(), 2);
    }

    #[test]
    fn test_persist_marks_saved_record() {
        let temp_dir = TempDir::new().unwrap();
        let mut train_mode =
            TrainMode::<TrainingBackend>::new(test_config(&temp_dir), default_device()).unwrap();

        train_mode.persist(3);

        assert_eq!(train_mode.session().saved_record(), Some(3));
        let names = ModelStore::list_models(&temp_dir.path().join("models")).unwrap();
        assert_eq!(names, vec!["snake".to_string()]);
    }

    #[test]
    fn test_failed_persist_keeps_training() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let mut config = test_config(&temp_dir);
        config.model_dir = blocker.join("models");
        let mut train_mode = TrainMode::<TrainingBackend>::new(config, default_device()).unwrap();

        train_mode.session.record_game(4);
        train_mode.persist(4);

        assert_eq!(train_mode.session().record(), 4);
        assert_eq!(train_mode.session().saved_record(), None);
        assert!(train_mode.tick().is_ok());
    }

    #[test]
    fn test_resume_from_saved_model() {
        let temp_dir = TempDir::new().unwrap();
        let device = default_device();
        let network = QNetworkConfig::new(8).init::<TrainingBackend>(&device);
        let path = ModelStore::new(temp_dir.path(), "previous")
            .save(&network, &ModelMetadata::new(8, 40, 6))
            .unwrap();

        let mut config = test_config(&temp_dir);
        config.load_path = Some(path.clone());
        let train_mode = TrainMode::<TrainingBackend>::new(config, device).unwrap();

        assert!(train_mode.selection().load);
        assert_eq!(train_mode.selection().path, Some(path));
        assert_eq!(train_mode.session().record(), 6);
        assert_eq!(train_mode.agent().config().hidden_size, 8);
    }

    #[test]
    fn test_missing_model_fails_to_load() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.load_path = Some(temp_dir.path().join("absent"));

        assert!(TrainMode::<TrainingBackend>::new(config, default_device()).is_err());
    }
}
