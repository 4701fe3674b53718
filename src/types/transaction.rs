//! Transaction input types for the fraud check form

use crate::error::EncodeError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five transaction categories the classifier was trained on.
///
/// The set is closed: anything else is rejected at the parse boundary
/// with [`EncodeError::UnrecognizedCategory`] instead of degrading to an
/// all-zero one-hot row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    #[serde(rename = "CASH_IN")]
    CashIn,
    #[serde(rename = "CASH_OUT")]
    CashOut,
    #[serde(rename = "DEBIT")]
    Debit,
    #[serde(rename = "PAYMENT")]
    Payment,
    #[serde(rename = "TRANSFER")]
    Transfer,
}

impl TransactionType {
    /// All categories, in the order the form lists them.
    pub const ALL: [TransactionType; 5] = [
        TransactionType::CashIn,
        TransactionType::CashOut,
        TransactionType::Debit,
        TransactionType::Payment,
        TransactionType::Transfer,
    ];

    /// Wire name of this category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::CashIn => "CASH_IN",
            TransactionType::CashOut => "CASH_OUT",
            TransactionType::Debit => "DEBIT",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Transfer => "TRANSFER",
        }
    }

    /// Training-set column name of this category's one-hot flag.
    pub fn one_hot_column(&self) -> &'static str {
        match self {
            TransactionType::CashIn => "type_CASH_IN",
            TransactionType::CashOut => "type_CASH_OUT",
            TransactionType::Debit => "type_DEBIT",
            TransactionType::Payment => "type_PAYMENT",
            TransactionType::Transfer => "type_TRANSFER",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CASH_IN" => Ok(TransactionType::CashIn),
            "CASH_OUT" => Ok(TransactionType::CashOut),
            "DEBIT" => Ok(TransactionType::Debit),
            "PAYMENT" => Ok(TransactionType::Payment),
            "TRANSFER" => Ok(TransactionType::Transfer),
            other => Err(EncodeError::UnrecognizedCategory(other.to_string())),
        }
    }
}

/// A single transaction submitted for scoring.
///
/// Ephemeral: built per form submission, dropped after scoring. Serde
/// aliases accept the training-data column names so payloads in either
/// shape deserialize.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionInput {
    /// Hour-like clock index.
    pub step: u32,

    /// Transaction category.
    #[serde(alias = "type")]
    pub tx_type: TransactionType,

    /// Transferred amount. Non-negative by form constraint; the encoder
    /// does not clamp it.
    pub amount: f64,

    /// Sender balance before the transaction.
    #[serde(alias = "oldbalanceOrg")]
    pub sender_old_balance: f64,

    /// Sender balance after the transaction.
    #[serde(alias = "newbalanceOrig")]
    pub sender_new_balance: f64,

    /// Receiver balance before the transaction.
    #[serde(alias = "oldbalanceDest")]
    pub receiver_old_balance: f64,

    /// Receiver balance after the transaction.
    #[serde(alias = "newbalanceDest")]
    pub receiver_new_balance: f64,
}

impl Default for TransactionInput {
    /// The form's default values.
    fn default() -> Self {
        Self {
            step: 10,
            tx_type: TransactionType::CashIn,
            amount: 50_000.0,
            sender_old_balance: 60_000.0,
            sender_new_balance: 10_000.0,
            receiver_old_balance: 0.0,
            receiver_new_balance: 50_000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_serialization() {
        let tx = TransactionInput::default();

        let json = serde_json::to_string(&tx).unwrap();
        let deserialized: TransactionInput = serde_json::from_str(&json).unwrap();

        assert_eq!(tx.step, deserialized.step);
        assert_eq!(tx.tx_type, deserialized.tx_type);
        assert_eq!(tx.amount, deserialized.amount);
    }

    #[test]
    fn test_training_column_aliases() {
        let json = r#"{
            "step": 10,
            "type": "CASH_OUT",
            "amount": 50000.0,
            "oldbalanceOrg": 60000.0,
            "newbalanceOrig": 10000.0,
            "oldbalanceDest": 0.0,
            "newbalanceDest": 50000.0
        }"#;

        let tx: TransactionInput = serde_json::from_str(json).unwrap();
        assert_eq!(tx.tx_type, TransactionType::CashOut);
        assert_eq!(tx.sender_old_balance, 60000.0);
        assert_eq!(tx.receiver_new_balance, 50000.0);
    }

    #[test]
    fn test_unrecognized_category_is_rejected() {
        let err = "UNKNOWN".parse::<TransactionType>().unwrap_err();
        assert_eq!(err, EncodeError::UnrecognizedCategory("UNKNOWN".to_string()));
    }

    #[test]
    fn test_category_round_trip() {
        for ty in TransactionType::ALL {
            assert_eq!(ty.as_str().parse::<TransactionType>().unwrap(), ty);
        }
    }
}
