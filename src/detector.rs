//! Entry point the form layer calls: encode, infer, report.

use crate::error::Result;
use crate::feature_encoder::FeatureEncoder;
use crate::metrics::DashboardMetrics;
use crate::models::inference::InferenceEngine;
use crate::types::transaction::{TransactionForm, TransactionInput};
use crate::types::verdict::{PredictionResult, Verdict};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info, warn};

/// Encoder and inference engine wired together.
///
/// Cheap to clone; every clone shares the same classifier and metrics.
#[derive(Clone)]
pub struct FraudDetector {
    encoder: FeatureEncoder,
    engine: InferenceEngine,
    metrics: Arc<DashboardMetrics>,
}

impl FraudDetector {
    pub fn new(engine: InferenceEngine, metrics: Arc<DashboardMetrics>) -> Self {
        Self {
            encoder: FeatureEncoder::new(),
            engine,
            metrics,
        }
    }

    pub fn metrics(&self) -> &Arc<DashboardMetrics> {
        &self.metrics
    }

    /// Classify one transaction. Validation happens before the classifier
    /// is touched; nothing is retried.
    pub fn assess(&self, input: &TransactionInput) -> Result<PredictionResult> {
        let vector = self.encoder.encode(input)?;
        self.engine.predict(&vector)
    }

    /// Validate and classify a raw form submission. Records nothing; pair
    /// with [`FraudDetector::report`].
    pub fn evaluate_form(
        &self,
        form: &TransactionForm,
    ) -> Result<(TransactionInput, PredictionResult)> {
        let input = TransactionInput::try_from(form)?;
        let prediction = self.assess(&input)?;
        Ok((input, prediction))
    }

    /// Count and log the outcome the user actually gets to see.
    pub fn report(
        &self,
        outcome: Result<(TransactionInput, PredictionResult)>,
        start_time: Instant,
    ) -> Result<Verdict> {
        match outcome {
            Ok((input, prediction)) => {
                let latency = start_time.elapsed();
                self.metrics.record_verdict(prediction.is_fraud, latency);

                let verdict = Verdict::from_prediction(prediction);
                info!(
                    assessment_id = %verdict.assessment_id,
                    transaction_type = %input.transaction_type,
                    amount = input.amount,
                    is_fraud = prediction.is_fraud,
                    fraud_probability = prediction.fraud_probability,
                    latency_us = latency.as_micros() as u64,
                    "Transaction assessed"
                );
                Ok(verdict)
            }
            Err(e) => {
                self.metrics.record_failure(&e);
                if e.is_user_error() {
                    warn!(kind = e.kind(), error = %e, "Submission rejected");
                } else {
                    error!(
                        kind = e.kind(),
                        model = %self.engine.model_name(),
                        error = %e,
                        "Inference failed"
                    );
                }
                Err(e)
            }
        }
    }

    /// Full path for a raw form submission, with logging and metrics.
    pub fn assess_form(&self, form: &TransactionForm) -> Result<Verdict> {
        let start_time = Instant::now();
        self.metrics.record_submission();
        self.report(self.evaluate_form(form), start_time)
    }
}
