//! Which model a training run starts from and where it is saved

use std::path::{Path, PathBuf};

use crate::rl::ModelStore;

/// Model chosen once before the training loop starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelSelection {
    /// Model to load, or the slot a fresh model will be saved to
    pub path: Option<PathBuf>,

    /// True if `path` should be loaded before training
    pub load: bool,
}

impl ModelSelection {
    /// Continue training a previously saved model
    pub fn load(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
            load: true,
        }
    }

    /// Start from a freshly initialized network saved into `store`
    pub fn fresh(store: &ModelStore) -> Self {
        Self {
            path: Some(store.model_path()),
            load: false,
        }
    }

    /// Resolve from an optional `--load` path
    pub fn resolve(load_path: Option<&Path>, store: &ModelStore) -> Self {
        match load_path {
            Some(path) => Self::load(path),
            None => Self::fresh(store),
        }
    }

    /// Path to load from, if this is a load request
    pub fn load_path(&self) -> Option<&Path> {
        if self.load {
            self.path.as_deref()
        } else {
            None
        }
    }
}
