//! Error kinds surfaced by the fraud check

use thiserror::Error;

/// Everything that can stop a transaction from receiving a verdict.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FraudError {
    /// Transaction type outside CASH_OUT, DEBIT, PAYMENT, TRANSFER
    #[error("unsupported transaction type: {0:?}")]
    InvalidCategory(String),

    /// Negative or non-finite amount/balance
    #[error("{field} must be a non-negative number, got {value}")]
    InvalidRange { field: &'static str, value: f64 },

    /// Classifier artifact missing or unreadable at startup
    #[error("classifier unavailable at {path}: {reason}")]
    ModelUnavailable { path: String, reason: String },

    /// Classifier call failed or broke its output contract
    #[error("inference failed: {0}")]
    InferenceFailure(String),
}

impl FraudError {
    /// True for errors the user fixes by correcting the form and resubmitting.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FraudError::InvalidCategory(_) | FraudError::InvalidRange { .. }
        )
    }

    /// Short machine-friendly name, used as a log field and metrics key.
    pub fn kind(&self) -> &'static str {
        match self {
            FraudError::InvalidCategory(_) => "invalid_category",
            FraudError::InvalidRange { .. } => "invalid_range",
            FraudError::ModelUnavailable { .. } => "model_unavailable",
            FraudError::InferenceFailure(_) => "inference_failure",
        }
    }
}

pub type Result<T> = std::result::Result<T, FraudError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors() {
        assert!(FraudError::InvalidCategory("WIRE".to_string()).is_user_error());
        assert!(FraudError::InvalidRange {
            field: "amount",
            value: -50.0
        }
        .is_user_error());
        assert!(!FraudError::InferenceFailure("shape".to_string()).is_user_error());
    }

    #[test]
    fn test_display() {
        let err = FraudError::InvalidRange {
            field: "amount",
            value: -50.0,
        };
        assert_eq!(err.to_string(), "amount must be a non-negative number, got -50");
        assert_eq!(
            FraudError::InvalidCategory("WIRE".to_string()).to_string(),
            "unsupported transaction type: \"WIRE\""
        );
    }
}
