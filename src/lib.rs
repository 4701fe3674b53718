//! Fraud Check Service Library
//!
//! A small interactive fraud-check demo: encodes raw transaction fields
//! into the feature schema a pre-trained classifier expects, scores the
//! record through ONNX Runtime, and serves the verdict over a thin web
//! shell.

pub mod config;
pub mod error;
pub mod feature_encoder;
pub mod models;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use error::{ArtifactError, EncodeError, PredictError};
pub use feature_encoder::{EncodedRecord, FeatureEncoder, FeatureSchema};
pub use models::artifact::ModelArtifact;
pub use models::predictor::Predictor;
pub use types::{transaction::TransactionInput, verdict::FraudVerdict};
