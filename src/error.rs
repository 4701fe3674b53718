//! Error taxonomy for the fraud check service

use thiserror::Error;

/// Startup failures while loading the model artifact.
///
/// Fatal: without a loaded artifact the process cannot serve predictions.
#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("failed to read artifact manifest {path}: {source}")]
    ManifestRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse artifact manifest {path}: {source}")]
    ManifestParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("artifact manifest declares an empty feature list")]
    EmptySchema,

    #[error("failed to build ONNX session from {path}: {source}")]
    Session {
        path: String,
        #[source]
        source: ort::Error,
    },
}

/// Per-request failures while encoding a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The submitted transaction type is not one of the recognized
    /// categories.
    #[error("unrecognized transaction type: {0:?}")]
    UnrecognizedCategory(String),

    /// The reprojected record still lacks schema columns. Indicates
    /// encoder/model version skew.
    #[error("encoded record is missing schema columns: {missing:?}")]
    SchemaMismatch { missing: Vec<String> },
}

/// Per-request failures while running the classifier.
#[derive(Debug, Error)]
pub enum PredictError {
    #[error("classifier inference failed: {0}")]
    Inference(#[from] ort::Error),

    #[error("classifier returned no rows for the label output")]
    EmptyLabelOutput,

    #[error("classifier output {0:?} has an unsupported value type")]
    MalformedOutput(String),

    #[error("model session lock poisoned")]
    Poisoned,
}
