pub mod selection;
pub mod train;

pub use selection::ModelSelection;
pub use train::{TrainConfig, TrainMode};
