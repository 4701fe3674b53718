//! Classifier invocation and output normalization

use crate::error::PredictError;
use crate::feature_encoder::EncodedRecord;
use crate::models::artifact::{ModelArtifact, ProbabilityOutput};
use crate::types::verdict::FraudVerdict;
use ort::memory::Allocator;
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, Tensor};
use std::sync::Arc;
use tracing::debug;

/// Scores encoded records against one loaded model artifact.
///
/// The artifact is injected at construction and never replaced; clones
/// share it. Prediction is a pure, synchronous function of the record
/// and the frozen artifact, so there are no retries.
#[derive(Clone)]
pub struct Predictor {
    artifact: Arc<ModelArtifact>,
}

impl Predictor {
    /// Create a predictor over a loaded artifact.
    pub fn new(artifact: Arc<ModelArtifact>) -> Self {
        Self { artifact }
    }

    /// The artifact this predictor scores against.
    pub fn artifact(&self) -> &ModelArtifact {
        &self.artifact
    }

    /// Run the classifier on a single encoded record.
    ///
    /// `is_fraud` comes from the label output; `fraud_probability` from
    /// the probability output when the model has one, and exactly 0.0
    /// when it is decision-only.
    pub fn predict(&self, record: &EncodedRecord) -> Result<FraudVerdict, PredictError> {
        let row = record.values();
        let shape = vec![1_i64, row.len() as i64];
        let input = Tensor::from_array((shape, row.to_vec()))?;

        let mut session = self
            .artifact
            .session
            .write()
            .map_err(|_| PredictError::Poisoned)?;
        let outputs = session.run(ort::inputs![&self.artifact.input_name => input])?;

        let is_fraud = extract_decision(&outputs, &self.artifact.label_output)?;

        let estimated = match &self.artifact.probability {
            ProbabilityOutput::Supported { output_name } => {
                Some(extract_positive_probability(&outputs, output_name)?)
            }
            ProbabilityOutput::Unavailable => None,
        };
        let fraud_probability = verdict_probability(estimated);

        debug!(is_fraud, fraud_probability, "Transaction scored");

        Ok(FraudVerdict {
            is_fraud,
            fraud_probability,
        })
    }
}

/// Pull the hard 0/1 decision out of the label output.
fn extract_decision(
    outputs: &ort::session::SessionOutputs,
    label_output: &str,
) -> Result<bool, PredictError> {
    let Some(output) = outputs.get(label_output) else {
        return Err(PredictError::MalformedOutput(label_output.to_string()));
    };

    // sklearn-family exports emit int64 labels
    if let Ok((_, data)) = output.try_extract_tensor::<i64>() {
        return data
            .first()
            .map(|&v| v != 0)
            .ok_or(PredictError::EmptyLabelOutput);
    }

    if let Ok((_, data)) = output.try_extract_tensor::<f32>() {
        return data
            .first()
            .map(|&v| v >= 0.5)
            .ok_or(PredictError::EmptyLabelOutput);
    }

    Err(PredictError::MalformedOutput(label_output.to_string()))
}

/// Extract the probability mass assigned to the positive (fraud) class.
///
/// Handles plain tensor outputs and the seq(map(int64, float)) layout
/// some gradient-boosting exports produce.
fn extract_positive_probability(
    outputs: &ort::session::SessionOutputs,
    output_name: &str,
) -> Result<f64, PredictError> {
    let Some(output) = outputs.get(output_name) else {
        return Err(PredictError::MalformedOutput(output_name.to_string()));
    };

    if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
        let dims: Vec<i64> = shape.iter().copied().collect();
        return Ok(positive_class_from_tensor(&dims, data));
    }

    if DynSequenceValueType::can_downcast(&output.dtype()) {
        return positive_class_from_sequence(output, output_name);
    }

    Err(PredictError::MalformedOutput(output_name.to_string()))
}

/// Tensor layout: `[batch, classes]` with the fraud class at index 1, or
/// a single-column score.
fn positive_class_from_tensor(dims: &[i64], data: &[f32]) -> f64 {
    if dims.len() == 2 {
        let num_classes = dims[1] as usize;
        if num_classes >= 2 {
            return data[1] as f64;
        } else if num_classes == 1 {
            return data[0] as f64;
        }
    } else if dims.len() == 1 {
        let num_classes = dims[0] as usize;
        if num_classes >= 2 {
            return data[1] as f64;
        } else if num_classes == 1 {
            return data[0] as f64;
        }
    }

    data.last().map(|&v| v as f64).unwrap_or(0.0)
}

/// seq(map(int64, float)) layout: one map per row, class id -> mass.
fn positive_class_from_sequence(
    output: &ort::value::DynValue,
    output_name: &str,
) -> Result<f64, PredictError> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(PredictError::Inference)?;
    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;

    let Some(map_value) = maps.first() else {
        return Err(PredictError::MalformedOutput(output_name.to_string()));
    };

    let kv_pairs = map_value.try_extract_key_values::<i64, f32>()?;

    for (class_id, mass) in &kv_pairs {
        if *class_id == 1 {
            return Ok(*mass as f64);
        }
    }

    // Degenerate export with only the negative class listed.
    for (class_id, mass) in &kv_pairs {
        if *class_id == 0 {
            return Ok(1.0 - *mass as f64);
        }
    }

    Err(PredictError::MalformedOutput(output_name.to_string()))
}

/// Probability for the verdict: the normalized estimate when the model
/// supports one, exactly 0.0 otherwise.
fn verdict_probability(estimated: Option<f64>) -> f64 {
    match estimated {
        Some(p) => round_probability(p),
        None => 0.0,
    }
}

/// Clamp to [0, 1] and round to 4 decimal places.
fn round_probability(p: f64) -> f64 {
    (p.clamp(0.0, 1.0) * 10_000.0).round() / 10_000.0
}
