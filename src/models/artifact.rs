//! Model artifact loading
//!
//! An artifact directory bundles the trained classifier (`model.onnx`)
//! with a `manifest.json` describing the feature schema and whether the
//! export carries a class-probability output. The artifact is loaded
//! once at startup, injected into the predictor, and never mutated for
//! the process lifetime.

use crate::error::ArtifactError;
use crate::feature_encoder::FeatureSchema;
use ort::session::{builder::GraphOptimizationLevel, Session};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::sync::RwLock;
use tracing::info;

/// Default classifier file name inside the artifact directory.
pub const MODEL_FILE: &str = "model.onnx";
/// Manifest file name inside the artifact directory.
pub const MANIFEST_FILE: &str = "manifest.json";

/// Sidecar manifest written when the model is exported.
#[derive(Debug, Clone, Deserialize)]
pub struct ArtifactManifest {
    /// Ordered feature columns the classifier was trained on.
    pub feature_names: Vec<String>,

    /// Whether the export carries a class-probability output. Models
    /// exported without one still produce hard decisions.
    #[serde(default = "default_probability_output")]
    pub probability_output: bool,

    /// Classifier file name inside the artifact directory.
    #[serde(default = "default_model_file")]
    pub model_file: String,
}

fn default_probability_output() -> bool {
    true
}

fn default_model_file() -> String {
    MODEL_FILE.to_string()
}

/// Probability capability of the loaded classifier, fixed at load time.
///
/// The predictor matches on this exhaustively; there is no runtime
/// capability probing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbabilityOutput {
    /// The export has a probability output under this name.
    Supported { output_name: String },
    /// Decision-only export; the reported probability degrades to 0.0.
    Unavailable,
}

/// Loaded classifier bundle: ONNX session, feature schema, capability.
///
/// Read-only after load apart from the session lock, which `ort` needs
/// to run inference.
#[derive(Debug)]
pub struct ModelArtifact {
    pub(crate) session: RwLock<Session>,
    pub(crate) input_name: String,
    pub(crate) label_output: String,
    pub(crate) probability: ProbabilityOutput,
    schema: FeatureSchema,
}

impl ModelArtifact {
    /// Load the artifact from a directory with a single inference thread.
    ///
    /// Any failure here is fatal for the process: no prediction can be
    /// served without a model.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self, ArtifactError> {
        Self::load_with_threads(dir, 1)
    }

    /// Load the artifact with a specific ONNX intra-op thread count.
    pub fn load_with_threads<P: AsRef<Path>>(
        dir: P,
        onnx_threads: usize,
    ) -> Result<Self, ArtifactError> {
        let dir = dir.as_ref();
        let manifest = Self::read_manifest(dir)?;

        if manifest.feature_names.is_empty() {
            return Err(ArtifactError::EmptySchema);
        }

        let model_path = dir.join(&manifest.model_file);
        let session = build_session(&model_path, onnx_threads).map_err(|source| {
            ArtifactError::Session {
                path: model_path.display().to_string(),
                source,
            }
        })?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .unwrap_or_else(|| "float_input".to_string());

        let label_output = session
            .outputs
            .iter()
            .find(|o| o.name.contains("label"))
            .map(|o| o.name.clone())
            .unwrap_or_else(|| {
                session
                    .outputs
                    .first()
                    .map(|o| o.name.clone())
                    .unwrap_or_else(|| "label".to_string())
            });

        let probability = if manifest.probability_output {
            let output_name = session
                .outputs
                .iter()
                .find(|o| o.name.contains("prob"))
                .map(|o| o.name.clone())
                .unwrap_or_else(|| "probabilities".to_string());
            ProbabilityOutput::Supported { output_name }
        } else {
            ProbabilityOutput::Unavailable
        };

        info!(
            path = %model_path.display(),
            input = %input_name,
            label_output = %label_output,
            features = manifest.feature_names.len(),
            probability_output = matches!(probability, ProbabilityOutput::Supported { .. }),
            "Model artifact loaded"
        );

        Ok(Self {
            session: RwLock::new(session),
            input_name,
            label_output,
            probability,
            schema: FeatureSchema::new(manifest.feature_names),
        })
    }

    fn read_manifest(dir: &Path) -> Result<ArtifactManifest, ArtifactError> {
        let manifest_path = dir.join(MANIFEST_FILE);

        let raw = fs::read_to_string(&manifest_path).map_err(|source| {
            ArtifactError::ManifestRead {
                path: manifest_path.display().to_string(),
                source,
            }
        })?;

        serde_json::from_str(&raw).map_err(|source| ArtifactError::ManifestParse {
            path: manifest_path.display().to_string(),
            source,
        })
    }

    /// Feature schema the classifier expects.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Whether the classifier can estimate class probabilities.
    pub fn supports_probability(&self) -> bool {
        matches!(self.probability, ProbabilityOutput::Supported { .. })
    }
}

fn build_session(path: &Path, onnx_threads: usize) -> Result<Session, ort::Error> {
    ort::init().commit()?;

    Session::builder()?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .with_intra_threads(onnx_threads)?
        .commit_from_file(path)
}
