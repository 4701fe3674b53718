//! Model artifact loading and inference

pub mod artifact;
pub mod predictor;

pub use artifact::{ModelArtifact, ProbabilityOutput};
pub use predictor::Predictor;
