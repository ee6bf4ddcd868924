//! Model persistence for saving and loading trained Q-networks
//!
//! Weights go through Burn's record system; a small JSON sidecar carries the
//! metadata needed to rebuild the network. The weight format is opaque to
//! the rest of the crate.

use super::{QNetwork, QNetworkConfig};
use anyhow::{Context, Result};
use burn::{
    module::Module,
    record::{FullPrecisionSettings, NamedMpkFileRecorder, Recorder},
    tensor::backend::Backend,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Suffix of the metadata sidecar next to the weights
const META_EXTENSION: &str = "meta.json";

/// Metadata saved with the model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelMetadata {
    /// Hidden layer width of the saved network
    pub hidden_size: usize,

    /// Games completed when the model was saved
    pub games_played: u32,

    /// Best score reached when the model was saved
    pub record: u32,

    /// Version identifier for compatibility checking
    pub version: String,
}

impl ModelMetadata {
    /// Create new metadata
    pub fn new(hidden_size: usize, games_played: u32, record: u32) -> Self {
        Self {
            hidden_size,
            games_played,
            record,
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Save a Q-network to `path`
///
/// Creates parent directories if they don't exist. Writes:
/// - `<path>.mpk` - Network weights (Burn record format)
/// - `<path>.meta.json` - Metadata as JSON
pub fn save_model<B: Backend>(
    network: &QNetwork<B>,
    metadata: &ModelMetadata,
    path: &Path,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {:?}", parent))?;
    }

    let record = network.clone().into_record();

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    recorder
        .record(record, path.to_path_buf())
        .context("Failed to save network weights")?;

    let meta_path = path.with_extension(META_EXTENSION);
    let meta_json =
        serde_json::to_string_pretty(metadata).context("Failed to serialize metadata")?;
    std::fs::write(&meta_path, meta_json)
        .with_context(|| format!("Failed to write metadata to {:?}", meta_path))?;

    Ok(())
}

/// Load a Q-network saved with [`save_model`]
///
/// `path` is the same path that was passed to [`save_model`].
pub fn load_network<B: Backend>(
    path: &Path,
    device: &B::Device,
) -> Result<(QNetwork<B>, ModelMetadata)> {
    let meta_path = path.with_extension(META_EXTENSION);
    let meta_json = std::fs::read_to_string(&meta_path)
        .with_context(|| format!("Failed to read metadata from {:?}", meta_path))?;
    let metadata: ModelMetadata =
        serde_json::from_str(&meta_json).context("Failed to deserialize metadata")?;

    let network = QNetworkConfig::new(metadata.hidden_size).init::<B>(device);

    let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
    let record = recorder
        .load(path.to_path_buf(), device)
        .with_context(|| format!("Failed to load network weights from {:?}", path))?;

    Ok((network.load_record(record), metadata))
}

/// Named model slot inside a model directory
///
/// This is the persistence collaborator of the training loop: it is asked
/// to save on every new high score and to load once at startup.
#[derive(Debug, Clone)]
pub struct ModelStore {
    directory: PathBuf,
    name: String,
}

impl ModelStore {
    pub fn new(directory: impl Into<PathBuf>, name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            name: name.into(),
        }
    }

    /// Path handed to [`save_model`] for this slot
    pub fn model_path(&self) -> PathBuf {
        self.directory.join(&self.name)
    }

    /// Persist `network` and return the model path
    pub fn save<B: Backend>(
        &self,
        network: &QNetwork<B>,
        metadata: &ModelMetadata,
    ) -> Result<PathBuf> {
        let path = self.model_path();
        save_model(network, metadata, &path)?;
        Ok(path)
    }

    /// Load a previously saved model
    pub fn load<B: Backend>(
        path: &Path,
        device: &B::Device,
    ) -> Result<(QNetwork<B>, ModelMetadata)> {
        load_network(path, device)
    }

    /// Names of the models saved in `directory`, sorted
    pub fn list_models(directory: &Path) -> Result<Vec<String>> {
        let suffix = format!(".{}", META_EXTENSION);
        let entries = std::fs::read_dir(directory)
            .with_context(|| format!("Failed to list models in {:?}", directory))?;

        let mut names = Vec::new();
        for entry in entries {
            let file_name = entry?.file_name();
            if let Some(name) = file_name.to_str().and_then(|n| n.strip_suffix(&suffix)) {
                names.push(name.to_string());
            }
        }
        names.sort();

        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rl::{InferenceBackend, StateVector, default_device, observation::states_to_tensor};
    use tempfile::TempDir;

    #[test]
    fn test_metadata_creation() {
        let metadata = ModelMetadata::new(256, 100, 12);

        assert_eq!(metadata.hidden_size, 256);
        assert_eq!(metadata.games_played, 100);
        assert_eq!(metadata.record, 12);
        assert_eq!(metadata.version, env!("CARGO_PKG_VERSION"));
    }

    #[test]
    fn test_metadata_serialization() {
        let metadata = ModelMetadata::new(64, 10, 3);

        let json = serde_json::to_string(&metadata).unwrap();
        let deserialized: ModelMetadata = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, metadata);
    }

    #[test]
    fn test_save_and_load_preserves_outputs() {
        let temp_dir = TempDir::new().unwrap();
        let device = default_device();
        let network = QNetworkConfig::new(16).init::<InferenceBackend>(&device);
        let store = ModelStore::new(temp_dir.path().join("models"), "snake");

        let path = store.save(&network, &ModelMetadata::new(16, 7, 4)).unwrap();
        let (loaded, metadata) = ModelStore::load::<InferenceBackend>(&path, &device).unwrap();

        assert_eq!(metadata.record, 4);
        assert_eq!(metadata.games_played, 7);

        let states = [StateVector([1, 0, 0, 0, 1, 0, 0, 1, 0, 0, 1])];
        let input = states_to_tensor::<InferenceBackend>(&states, &device);
        let before: Vec<f32> = network.forward(input.clone()).into_data().iter::<f32>().collect();
        let after: Vec<f32> = loaded.forward(input).into_data().iter::<f32>().collect();
        assert_eq!(before, after);
    }

    #[test]
    fn test_list_models() {
        let temp_dir = TempDir::new().unwrap();
        let device = default_device();
        let network = QNetworkConfig::new(4).init::<InferenceBackend>(&device);

        for name in ["beta", "alpha"] {
            ModelStore::new(temp_dir.path(), name)
                .save(&network, &ModelMetadata::new(4, 0, 0))
                .unwrap();
        }

        let names = ModelStore::list_models(temp_dir.path()).unwrap();
        assert_eq!(names, vec!["alpha".to_string(), "beta".to_string()]);
    }

    #[test]
    fn test_load_missing_model_fails() {
        let temp_dir = TempDir::new().unwrap();
        let result =
            ModelStore::load::<InferenceBackend>(&temp_dir.path().join("absent"), &default_device());
        assert!(result.is_err());
    }

    #[test]
    fn test_save_to_unwritable_path_fails() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("file");
        std::fs::write(&blocker, b"not a directory").unwrap();

        let device = default_device();
        let network = QNetworkConfig::new(4).init::<InferenceBackend>(&device);
        let store = ModelStore::new(blocker.join("models"), "snake");

        assert!(store.save(&network, &ModelMetadata::new(4, 0, 0)).is_err());
    }
}
