//! Temporal-difference trainer for the Q-network
//!
//! One call to [`QTrainer::train_step`] performs a single Adam step on the
//! mean-squared error between the network's predictions and TD targets. A
//! single transition is simply a batch of one.

use burn::{
    module::AutodiffModule,
    nn::loss::{MseLoss, Reduction},
    optim::{Adam, AdamConfig, GradientsParams, Optimizer, adaptor::OptimizerAdaptor},
    tensor::{ElementConversion, Tensor, TensorData, backend::AutodiffBackend},
};

use super::buffer::Transition;
use super::network::QNetwork;
use super::observation::{StateVector, states_to_tensor};
use crate::game::Action;

/// Action values for one state, in one-hot action order
pub type QValues = [f32; Action::COUNT];

/// TD target for a single transition
///
/// `reward` for terminal transitions, otherwise
/// `reward + gamma * max_a Q(next_state, a)`.
pub fn td_target(transition: &Transition, next_max_q: f32, gamma: f32) -> f32 {
    if transition.done {
        transition.reward
    } else {
        transition.reward + gamma * next_max_q
    }
}

/// Build the regression targets for a batch
///
/// Each target row is a copy of the current prediction for that example with
/// only the entry of the example's own action replaced by its TD target, so
/// the loss only sees the error of the action actually taken.
pub fn td_targets(
    predictions: &[QValues],
    next_max_q: &[f32],
    batch: &[Transition],
    gamma: f32,
) -> Vec<QValues> {
    debug_assert_eq!(predictions.len(), batch.len());
    debug_assert_eq!(next_max_q.len(), batch.len());

    predictions
        .iter()
        .zip(next_max_q)
        .zip(batch)
        .map(|((&prediction, &next_max), transition)| {
            let target = td_target(transition, next_max, gamma);
            let mut row = prediction;
            row[transition.action.index()] = target;
            row
        })
        .collect()
}

/// Split a flat `[batch, 3]` buffer into rows
fn to_rows(values: impl Iterator<Item = f32>) -> Vec<QValues> {
    let flat: Vec<f32> = values.collect();
    flat.chunks_exact(Action::COUNT)
        .map(|chunk| [chunk[0], chunk[1], chunk[2]])
        .collect()
}

/// Gradient-descent trainer for [`QNetwork`]
///
/// Owns the Adam optimizer state; the network itself stays with the agent and
/// is threaded through [`QTrainer::train_step`].
pub struct QTrainer<B: AutodiffBackend> {
    /// Adam optimizer for network parameters
    optim: OptimizerAdaptor<Adam, QNetwork<B>, B>,

    learning_rate: f64,

    gamma: f32,

    device: B::Device,
}

impl<B: AutodiffBackend> QTrainer<B> {
    /// Create a trainer with a fixed learning rate and discount factor
    pub fn new(learning_rate: f64, gamma: f32, device: B::Device) -> Self {
        Self {
            optim: AdamConfig::new().init(),
            learning_rate,
            gamma,
            device,
        }
    }

    /// Discount factor used for TD targets
    pub fn gamma(&self) -> f32 {
        self.gamma
    }

    /// Perform one gradient step on `batch`
    ///
    /// Returns the updated network and the loss before the update. An empty
    /// batch leaves the network untouched.
    pub fn train_step(&mut self, network: QNetwork<B>, batch: &[Transition]) -> (QNetwork<B>, f32) {
        if batch.is_empty() {
            return (network, 0.0);
        }

        let states: Vec<StateVector> = batch.iter().map(|t| t.state).collect();
        let next_states: Vec<StateVector> = batch.iter().map(|t| t.next_state).collect();

        let predictions = network.forward(states_to_tensor::<B>(&states, &self.device));

        // Bootstrap values come from the current network without gradient tracking
        let next_max_q: Vec<f32> = network
            .valid()
            .forward(states_to_tensor::<B::InnerBackend>(&next_states, &self.device))
            .max_dim(1)
            .into_data()
            .iter::<f32>()
            .collect();

        let current = to_rows(predictions.clone().into_data().iter::<f32>());
        let targets = td_targets(&current, &next_max_q, batch, self.gamma);

        let flat: Vec<f32> = targets.iter().flatten().copied().collect();
        let targets = Tensor::<B, 2>::from_data(
            TensorData::new(flat, [batch.len(), Action::COUNT]),
            &self.device,
        );

        let loss = MseLoss::new().forward(predictions, targets, Reduction::Mean);
        let loss_value = loss.clone().into_scalar().elem::<f32>();

        let grads = GradientsParams::from_grads(loss.backward(), &network);
        let network = self.optim.step(self.learning_rate, network, grads);

        log::debug!("train step on {} transitions, loss {:.4}", batch.len(), loss_value);

        (network, loss_value)
    }
}

/// Q-values of a single state on the inference backend
pub fn predict<B: AutodiffBackend>(
    network: &QNetwork<B>,
    state: &StateVector,
    device: &B::Device,
) -> QValues {
    let output = network
        .valid()
        .forward(states_to_tensor::<B::InnerBackend>(std::slice::from_ref(state), device));

    to_rows(output.into_data().iter::<f32>())
        .into_iter()
        .next()
        .unwrap_or_default()
}
