//! Fraud verdict data structures

use serde::{Deserialize, Serialize};

/// Result of scoring a single transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FraudVerdict {
    /// Hard decision from the classifier.
    pub is_fraud: bool,

    /// Positive-class probability in [0, 1], rounded to 4 decimal
    /// places. Exactly 0.0 when the loaded model is decision-only.
    pub fraud_probability: f64,
}

impl FraudVerdict {
    /// Human-readable label for the verdict card.
    pub fn label(&self) -> &'static str {
        if self.is_fraud {
            "Fraud Detected"
        } else {
            "Transaction is Safe"
        }
    }

    /// Probability as a percentage with 2 decimal places, as the form
    /// displays it.
    pub fn probability_percent(&self) -> String {
        format!("{:.2}%", self.fraud_probability * 100.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_labels() {
        let fraud = FraudVerdict {
            is_fraud: true,
            fraud_probability: 0.97,
        };
        let safe = FraudVerdict {
            is_fraud: false,
            fraud_probability: 0.02,
        };

        assert_eq!(fraud.label(), "Fraud Detected");
        assert_eq!(safe.label(), "Transaction is Safe");
    }

    #[test]
    fn test_probability_percent_format() {
        let verdict = FraudVerdict {
            is_fraud: false,
            fraud_probability: 0.1234,
        };
        assert_eq!(verdict.probability_percent(), "12.34%");

        let zero = FraudVerdict {
            is_fraud: false,
            fraud_probability: 0.0,
        };
        assert_eq!(zero.probability_percent(), "0.00%");
    }

    #[test]
    fn test_verdict_serialization() {
        let verdict = FraudVerdict {
            is_fraud: true,
            fraud_probability: 0.8531,
        };

        let json = serde_json::to_string(&verdict).unwrap();
        let deserialized: FraudVerdict = serde_json::from_str(&json).unwrap();

        assert_eq!(verdict, deserialized);
    }
}
