//! Deep Q-learning agent
//!
//! Owns the Q-network, its trainer and the replay memory, and implements the
//! annealed epsilon-greedy policy.

use burn::tensor::backend::AutodiffBackend;
use rand::{Rng, SeedableRng, rngs::StdRng};

use super::buffer::{ReplayBuffer, Transition};
use super::config::DqnConfig;
use super::network::{QNetwork, QNetworkConfig};
use super::observation::StateVector;
use super::trainer::{QTrainer, QValues, predict};
use crate::error::GameError;
use crate::game::Action;

/// How an action was chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyMode {
    /// Uniformly random action
    Explore,
    /// Greedy action from the network
    Exploit,
}

/// Deep Q-learning agent
///
/// # Example
///
/// ```rust,ignore
/// use snake_dqn::rl::{DqnAgent, DqnConfig, TrainingBackend, default_device};
///
/// let mut agent = DqnAgent::<TrainingBackend>::new(DqnConfig::default(), default_device())?;
/// let action = agent.select_action(&state);
/// ```
pub struct DqnAgent<B: AutodiffBackend> {
    network: QNetwork<B>,

    trainer: QTrainer<B>,

    memory: ReplayBuffer,

    config: DqnConfig,

    /// Source of exploration draws and batch sampling
    rng: StdRng,

    /// Completed episodes; drives epsilon
    games_played: u32,

    device: B::Device,
}

impl<B: AutodiffBackend> DqnAgent<B> {
    /// Create an agent with a freshly initialized network
    pub fn new(config: DqnConfig, device: B::Device) -> Result<Self, GameError> {
        let network = QNetworkConfig::new(config.hidden_size).init::<B>(&device);
        Self::with_network(network, config, device)
    }

    /// Create an agent around an existing (e.g. loaded) network
    pub fn with_network(
        network: QNetwork<B>,
        config: DqnConfig,
        device: B::Device,
    ) -> Result<Self, GameError> {
        config.validate().map_err(GameError::InvalidConfig)?;

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Ok(Self {
            network,
            trainer: QTrainer::new(config.learning_rate, config.gamma, device.clone()),
            memory: ReplayBuffer::new(config.memory_capacity),
            config,
            rng,
            games_played: 0,
            device,
        })
    }

    /// Current exploration threshold: `max(0, randomness - games_played)`
    pub fn epsilon(&self) -> u32 {
        self.config.randomness.saturating_sub(self.games_played)
    }

    /// Decide between exploring and exploiting for the next move
    pub fn policy_mode(&mut self) -> PolicyMode {
        let draw = self.rng.gen_range(0..=2 * self.config.randomness);
        if draw < self.epsilon() {
            PolicyMode::Explore
        } else {
            PolicyMode::Exploit
        }
    }

    /// Choose the next action for `state` with the epsilon-greedy policy
    pub fn select_action(&mut self, state: &StateVector) -> Action {
        match self.policy_mode() {
            PolicyMode::Explore => Action::ALL[self.rng.gen_range(0..Action::COUNT)],
            PolicyMode::Exploit => self.greedy_action(state),
        }
    }

    /// Action with the highest estimated value; ties go to the lowest index
    pub fn greedy_action(&self, state: &StateVector) -> Action {
        let q_values = self.q_values(state);
        let best = q_values
            .iter()
            .enumerate()
            .fold(0, |best, (i, &q)| if q > q_values[best] { i } else { best });

        Action::ALL[best]
    }

    /// Estimated action values for `state`
    pub fn q_values(&self, state: &StateVector) -> QValues {
        predict(&self.network, state, &self.device)
    }

    /// Store a transition in replay memory
    pub fn remember(&mut self, transition: Transition) {
        self.memory.remember(transition);
    }

    /// One gradient step on the latest transition
    pub fn train_short_memory(&mut self, transition: &Transition) -> f32 {
        self.train_on(std::slice::from_ref(transition))
    }

    /// One gradient step on a batch sampled from replay memory
    pub fn train_long_memory(&mut self) -> f32 {
        let batch = self.memory.sample(self.config.batch_size, &mut self.rng);
        self.train_on(&batch)
    }

    fn train_on(&mut self, batch: &[Transition]) -> f32 {
        let (network, loss) = self.trainer.train_step(self.network.clone(), batch);
        self.network = network;
        loss
    }

    /// Record the end of an episode
    pub fn increment_games(&mut self) {
        self.games_played += 1;
    }

    /// Number of completed episodes
    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    /// Get a reference to the Q-network
    pub fn network(&self) -> &QNetwork<B> {
        &self.network
    }

    /// Get a reference to the replay memory
    pub fn memory(&self) -> &ReplayBuffer {
        &self.memory
    }

    /// Get a reference to the agent configuration
    pub fn config(&self) -> &DqnConfig {
        &self.config
    }

    /// Device the network lives on
    pub fn device(&self) -> &B::Device {
        &self.device
    }
}
