//! Prediction output and the verdict shown to the user

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Raw classifier decision for one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    /// Classifier's own thresholded label equals the fraud class
    pub is_fraud: bool,
    /// Probability of the fraud class, in [0, 1]
    pub fraud_probability: f64,
}

impl PredictionResult {
    /// Probability of the class the classifier decided on.
    pub fn confidence(&self) -> f64 {
        if self.is_fraud {
            self.fraud_probability
        } else {
            1.0 - self.fraud_probability
        }
    }
}

/// Rendered outcome of a single form submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Verdict {
    /// Per-submission identifier for log correlation
    pub assessment_id: String,

    pub assessed_at: DateTime<Utc>,

    pub prediction: PredictionResult,

    /// Confidence in the stated verdict, as a percentage
    pub confidence_percent: f64,
}

impl Verdict {
    pub fn from_prediction(prediction: PredictionResult) -> Self {
        Self {
            assessment_id: Uuid::new_v4().to_string(),
            assessed_at: Utc::now(),
            prediction,
            confidence_percent: prediction.confidence() * 100.0,
        }
    }

    pub fn is_fraud(&self) -> bool {
        self.prediction.is_fraud
    }

    pub fn headline(&self) -> &'static str {
        if self.is_fraud() {
            "Fraud Detected!"
        } else {
            "Legitimate Transaction"
        }
    }

    pub fn summary(&self) -> &'static str {
        if self.is_fraud() {
            "This transaction is flagged as fraudulent."
        } else {
            "This transaction is considered safe."
        }
    }

    /// Confidence formatted for display, e.g. `97.25%`.
    pub fn confidence_label(&self) -> String {
        format!("{:.2}%", self.confidence_percent)
    }
}
