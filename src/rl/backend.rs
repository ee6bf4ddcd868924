//! Backend type aliases and device management
//!
//! - **TrainingBackend**: Autodiff-enabled NdArray backend used by the agent
//! - **InferenceBackend**: Plain NdArray backend for greedy action selection
//!
//! The Q-network is tiny (11 → 256 → 3), so the CPU NdArray backend is all
//! the training loop needs.

use burn::backend::{
    Autodiff,
    ndarray::{NdArray, NdArrayDevice},
};

/// Backend type for training (with autodiff)
pub type TrainingBackend = Autodiff<NdArray<f32>>;

/// Backend type for inference (without autodiff)
pub type InferenceBackend = NdArray<f32>;

/// Get the default device for computation
pub fn default_device() -> NdArrayDevice {
    NdArrayDevice::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::QNetworkConfig;
    use burn::tensor::Tensor;

    #[test]
    fn test_default_device_runs_network() {
        let device = default_device();
        let network = QNetworkConfig::new(8).init::<InferenceBackend>(&device);
        let q = network.forward(Tensor::zeros([1, 11], &device));
        assert_eq!(q.dims(), [1, 3]);
    }
}
