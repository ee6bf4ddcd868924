pub mod training_session;

pub use training_session::TrainingSession;
