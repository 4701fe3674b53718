//! Type definitions for the fraud check service

pub mod transaction;
pub mod verdict;

pub use transaction::{TransactionInput, TransactionType};
pub use verdict::FraudVerdict;
