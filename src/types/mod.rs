//! Type definitions for the fraud check

pub mod transaction;
pub mod verdict;

pub use transaction::{TransactionForm, TransactionInput, TransactionType};
pub use verdict::{PredictionResult, Verdict};
