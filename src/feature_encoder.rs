//! Feature encoding for fraud model inference.
//!
//! Transforms a submitted transaction into the fixed-order numeric
//! record the classifier was trained on. The candidate features the
//! encoder knows how to compute are decoupled from the columns the model
//! expects: the candidate set is reprojected onto the artifact's schema,
//! so a retrained model that adds, drops, or reorders columns keeps
//! working without code changes. Schema columns the encoder cannot
//! produce are zero-filled and surfaced on the record.

use crate::error::EncodeError;
use crate::types::transaction::{TransactionInput, TransactionType};
use tracing::warn;

/// Ordered feature-name list a trained classifier expects.
///
/// Fixed at training time and shipped in the artifact manifest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Vec<String>,
}

impl FeatureSchema {
    pub fn new(names: Vec<String>) -> Self {
        Self { names }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

/// Fixed-order numeric record matching a model schema.
///
/// Immutable once built; column order is the schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    columns: Vec<String>,
    values: Vec<f32>,
    zero_filled: Vec<String>,
}

impl EncodedRecord {
    /// Build a record directly from columns and values. [`FeatureEncoder::encode`]
    /// is the normal path.
    pub fn new(columns: Vec<String>, values: Vec<f32>, zero_filled: Vec<String>) -> Self {
        Self {
            columns,
            values,
            zero_filled,
        }
    }

    /// Column names, in schema order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Feature values, aligned with [`columns`](Self::columns).
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Schema columns the encoder could not compute and filled with 0.
    pub fn zero_filled(&self) -> &[String] {
        &self.zero_filled
    }

    /// Value of a column by name.
    pub fn get(&self, column: &str) -> Option<f32> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|i| self.values[i])
    }
}

/// Encodes transactions against one model schema.
pub struct FeatureEncoder {
    schema: FeatureSchema,
}

impl FeatureEncoder {
    /// Create an encoder targeting the given schema.
    pub fn for_schema(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    /// Number of columns in the target schema.
    pub fn feature_count(&self) -> usize {
        self.schema.len()
    }

    /// The target schema.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Encode a transaction into the schema's column order.
    ///
    /// Balances below zero are treated as zero; `amount` is passed
    /// through unchanged. The two balance differentials are signed and
    /// never clamped.
    pub fn encode(&self, tx: &TransactionInput) -> Result<EncodedRecord, EncodeError> {
        let step = tx.step as f32;
        let amount = tx.amount as f32;

        let old_balance_org = clamp_non_negative(tx.sender_old_balance);
        let new_balance_org = clamp_non_negative(tx.sender_new_balance);
        let old_balance_dest = clamp_non_negative(tx.receiver_old_balance);
        let new_balance_dest = clamp_non_negative(tx.receiver_new_balance);

        // Positive when the sender's balance dropped (funds sent).
        let balance_diff_org = old_balance_org - new_balance_org;
        // Positive when the receiver's balance rose (funds received).
        let balance_diff_dest = new_balance_dest - old_balance_dest;

        let mut candidates: Vec<(&'static str, f32)> = vec![
            ("step", step),
            ("amount", amount),
            ("oldbalanceOrg", old_balance_org),
            ("newbalanceOrig", new_balance_org),
            ("oldbalanceDest", old_balance_dest),
            ("newbalanceDest", new_balance_dest),
            ("balanceDiffOrg", balance_diff_org),
            ("balanceDiffDest", balance_diff_dest),
        ];
        for ty in TransactionType::ALL {
            let flag = if ty == tx.tx_type { 1.0 } else { 0.0 };
            candidates.push((ty.one_hot_column(), flag));
        }

        // Reproject onto the schema: schema order wins, candidates the
        // schema doesn't list are dropped, missing columns are
        // zero-filled and recorded.
        let mut values = Vec::with_capacity(self.schema.len());
        let mut zero_filled = Vec::new();
        for name in self.schema.names() {
            match candidates.iter().find(|(c, _)| *c == name.as_str()) {
                Some((_, v)) => values.push(*v),
                None => {
                    values.push(0.0);
                    zero_filled.push(name.clone());
                }
            }
        }

        if !zero_filled.is_empty() {
            warn!(
                columns = ?zero_filled,
                "schema columns not produced by the encoder, zero-filled"
            );
        }

        let record = EncodedRecord::new(self.schema.names().to_vec(), values, zero_filled);
        self.check_schema(&record)?;
        Ok(record)
    }

    /// Verify that a record covers every schema column.
    ///
    /// Guards against encoder/model version skew; the zero-fill path in
    /// [`encode`](Self::encode) already satisfies this.
    pub fn check_schema(&self, record: &EncodedRecord) -> Result<(), EncodeError> {
        let missing: Vec<String> = self
            .schema
            .names()
            .iter()
            .filter(|name| record.get(name).is_none())
            .cloned()
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(EncodeError::SchemaMismatch { missing })
        }
    }
}

fn clamp_non_negative(value: f64) -> f32 {
    if value < 0.0 {
        0.0
    } else {
        value as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Schema in the order the classifier was trained with.
    fn trained_schema() -> FeatureSchema {
        FeatureSchema::new(
            [
                "step",
                "amount",
                "oldbalanceOrg",
                "newbalanceOrig",
                "oldbalanceDest",
                "newbalanceDest",
                "balanceDiffOrg",
                "balanceDiffDest",
                "type_TRANSFER",
                "type_CASH_OUT",
                "type_PAYMENT",
                "type_DEBIT",
                "type_CASH_IN",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
        )
    }

    fn cash_out_tx() -> TransactionInput {
        TransactionInput {
            step: 10,
            tx_type: TransactionType::CashOut,
            amount: 50_000.0,
            sender_old_balance: 60_000.0,
            sender_new_balance: 10_000.0,
            receiver_old_balance: 0.0,
            receiver_new_balance: 50_000.0,
        }
    }

    #[test]
    fn test_cash_out_scenario() {
        let encoder = FeatureEncoder::for_schema(trained_schema());
        let record = encoder.encode(&cash_out_tx()).unwrap();

        assert_eq!(record.get("step"), Some(10.0));
        assert_eq!(record.get("amount"), Some(50_000.0));
        assert_eq!(record.get("balanceDiffOrg"), Some(50_000.0));
        assert_eq!(record.get("balanceDiffDest"), Some(50_000.0));
        assert_eq!(record.get("type_CASH_OUT"), Some(1.0));
        assert_eq!(record.get("type_TRANSFER"), Some(0.0));
        assert_eq!(record.get("type_PAYMENT"), Some(0.0));
        assert_eq!(record.get("type_DEBIT"), Some(0.0));
        assert_eq!(record.get("type_CASH_IN"), Some(0.0));
    }

    #[test]
    fn test_one_hot_is_exclusive() {
        let encoder = FeatureEncoder::for_schema(trained_schema());

        for ty in TransactionType::ALL {
            let mut tx = cash_out_tx();
            tx.tx_type = ty;
            let record = encoder.encode(&tx).unwrap();

            let flag_sum: f32 = TransactionType::ALL
                .iter()
                .map(|t| record.get(t.one_hot_column()).unwrap())
                .sum();

            assert_eq!(flag_sum, 1.0);
            assert_eq!(record.get(ty.one_hot_column()), Some(1.0));
        }
    }

    #[test]
    fn test_negative_balances_clamp_to_zero() {
        let encoder = FeatureEncoder::for_schema(trained_schema());

        let mut tx = cash_out_tx();
        tx.sender_old_balance = -500.0;
        tx.receiver_old_balance = -1.0;

        let record = encoder.encode(&tx).unwrap();
        assert_eq!(record.get("oldbalanceOrg"), Some(0.0));
        assert_eq!(record.get("oldbalanceDest"), Some(0.0));

        // Idempotent: feeding the clamped value back yields the same record.
        tx.sender_old_balance = 0.0;
        tx.receiver_old_balance = 0.0;
        assert_eq!(encoder.encode(&tx).unwrap(), record);
    }

    #[test]
    fn test_balance_diffs_are_signed() {
        let encoder = FeatureEncoder::for_schema(trained_schema());

        // Sender balance rose, receiver balance dropped.
        let mut tx = cash_out_tx();
        tx.sender_old_balance = 10_000.0;
        tx.sender_new_balance = 60_000.0;
        tx.receiver_old_balance = 50_000.0;
        tx.receiver_new_balance = 0.0;

        let record = encoder.encode(&tx).unwrap();
        assert_eq!(record.get("balanceDiffOrg"), Some(-50_000.0));
        assert_eq!(record.get("balanceDiffDest"), Some(-50_000.0));
    }

    #[test]
    fn test_amount_is_not_clamped() {
        let encoder = FeatureEncoder::for_schema(trained_schema());

        let mut tx = cash_out_tx();
        tx.amount = -42.5;

        let record = encoder.encode(&tx).unwrap();
        assert_eq!(record.get("amount"), Some(-42.5));
    }

    #[test]
    fn test_column_order_matches_schema() {
        let schema = trained_schema();
        let encoder = FeatureEncoder::for_schema(schema.clone());
        let record = encoder.encode(&cash_out_tx()).unwrap();

        assert_eq!(record.columns(), schema.names());
        assert_eq!(record.values().len(), schema.len());
    }

    #[test]
    fn test_missing_schema_column_is_zero_filled() {
        // A retrained model added a column this encoder never computes.
        let mut names: Vec<String> = trained_schema().names().to_vec();
        names.push("isWeekend".to_string());
        let encoder = FeatureEncoder::for_schema(FeatureSchema::new(names));

        let record = encoder.encode(&cash_out_tx()).unwrap();
        assert_eq!(record.get("isWeekend"), Some(0.0));
        assert_eq!(record.zero_filled(), ["isWeekend".to_string()]);
    }

    #[test]
    fn test_candidate_absent_from_schema_is_dropped() {
        // A retrained model dropped the engineered differentials.
        let names: Vec<String> = trained_schema()
            .names()
            .iter()
            .filter(|n| !n.starts_with("balanceDiff"))
            .cloned()
            .collect();
        let encoder = FeatureEncoder::for_schema(FeatureSchema::new(names.clone()));

        let record = encoder.encode(&cash_out_tx()).unwrap();
        assert_eq!(record.get("balanceDiffOrg"), None);
        assert_eq!(record.values().len(), names.len());
        assert!(record.zero_filled().is_empty());
    }

    #[test]
    fn test_schema_mismatch_names_missing_columns() {
        let encoder = FeatureEncoder::for_schema(trained_schema());

        // A record that skipped the zero-fill path.
        let record = EncodedRecord::new(
            vec!["step".to_string(), "amount".to_string()],
            vec![10.0, 50_000.0],
            Vec::new(),
        );

        let err = encoder.check_schema(&record).unwrap_err();
        match err {
            EncodeError::SchemaMismatch { missing } => {
                assert!(missing.contains(&"oldbalanceOrg".to_string()));
                assert!(missing.contains(&"type_CASH_IN".to_string()));
                assert_eq!(missing.len(), trained_schema().len() - 2);
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_encode_is_deterministic() {
        let encoder = FeatureEncoder::for_schema(trained_schema());
        let tx = cash_out_tx();

        let first = encoder.encode(&tx).unwrap();
        let second = encoder.encode(&tx).unwrap();
        assert_eq!(first, second);
    }
}
