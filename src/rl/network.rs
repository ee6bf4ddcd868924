//! Q-value approximator for the Snake agent
//!
//! A two-layer perceptron mapping the 11 state features to one estimated
//! action value per relative action.
//!
//! # Architecture
//!
//! ```text
//! Input: [batch, 11]
//!   ↓ Linear(11 → 256) + ReLU
//!   ↓ Linear(256 → 3)
//! Output: [batch, 3]  (straight, right, left)
//! ```
//!
//! # Example
//!
//! ```rust
//! use snake_dqn::rl::QNetworkConfig;
//! use burn::backend::ndarray::NdArrayDevice;
//! use burn::backend::NdArray;
//! use burn::tensor::Tensor;
//!
//! type Backend = NdArray<f32>;
//!
//! let device = NdArrayDevice::default();
//! let network = QNetworkConfig::default().init::<Backend>(&device);
//!
//! let states = Tensor::zeros([4, 11], &device);
//! let q_values = network.forward(states);
//!
//! assert_eq!(q_values.dims(), [4, 3]);
//! ```

use burn::{
    module::Module,
    nn::{Linear, LinearConfig},
    tensor::{Tensor, activation::relu, backend::Backend},
};

use super::observation::STATE_SIZE;
use crate::game::Action;

/// Configuration for the Q-network
#[derive(Debug, Clone)]
pub struct QNetworkConfig {
    /// Number of input features (default: 11)
    pub input_size: usize,

    /// Width of the hidden layer (default: 256)
    pub hidden_size: usize,

    /// Number of action values (default: 3)
    pub output_size: usize,
}

impl QNetworkConfig {
    /// Create a configuration with the given hidden layer width
    pub fn new(hidden_size: usize) -> Self {
        Self {
            input_size: STATE_SIZE,
            hidden_size,
            output_size: Action::COUNT,
        }
    }

    /// Initialize a network with random weights on `device`
    pub fn init<B: Backend>(&self, device: &B::Device) -> QNetwork<B> {
        QNetwork {
            linear1: LinearConfig::new(self.input_size, self.hidden_size).init(device),
            linear2: LinearConfig::new(self.hidden_size, self.output_size).init(device),
        }
    }
}

impl Default for QNetworkConfig {
    fn default() -> Self {
        Self::new(256)
    }
}

/// Feed-forward Q-value approximator
///
/// Generic over the Burn backend, so the same module trains on
/// `Autodiff<NdArray>` and runs greedy inference on its inner backend.
#[derive(Module, Debug)]
pub struct QNetwork<B: Backend> {
    /// Hidden layer
    linear1: Linear<B>,
    /// Output layer, one value per action
    linear2: Linear<B>,
}

impl<B: Backend> QNetwork<B> {
    /// Forward pass: `[batch, 11]` states to `[batch, 3]` action values
    pub fn forward(&self, states: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.linear1.forward(states));
        self.linear2.forward(x)
    }
}
