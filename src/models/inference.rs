//! Inference invocation for the fraud classifier

use crate::error::{FraudError, Result};
use crate::feature_encoder::FeatureVector;
use crate::models::classifier::Classifier;
use crate::types::verdict::PredictionResult;
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Label the classifier emits for fraudulent transactions. Also the index
/// of the fraud class in the probability output.
pub const FRAUD_CLASS: i64 = 1;

const LEGITIMATE_CLASS: i64 = 0;

/// Run one prediction against `model`.
///
/// The decision is the classifier's own thresholded label; the probability
/// is reported alongside it and never re-thresholded here. Output that
/// breaks the binary-classifier contract fails the request instead of
/// being repaired.
pub fn predict(vector: &FeatureVector, model: &dyn Classifier) -> Result<PredictionResult> {
    let start_time = Instant::now();
    let output = model.evaluate(vector)?;

    let is_fraud = match output.label {
        FRAUD_CLASS => true,
        LEGITIMATE_CLASS => false,
        other => {
            return Err(FraudError::InferenceFailure(format!(
                "classifier {} returned unknown label {}",
                model.name(),
                other
            )))
        }
    };

    let fraud_probability = output.probabilities[FRAUD_CLASS as usize];
    if !(0.0..=1.0).contains(&fraud_probability) {
        return Err(FraudError::InferenceFailure(format!(
            "classifier {} returned fraud probability {} outside [0, 1]",
            model.name(),
            fraud_probability
        )));
    }

    debug!(
        model = %model.name(),
        is_fraud = is_fraud,
        fraud_probability = fraud_probability,
        inference_time_us = start_time.elapsed().as_micros() as u64,
        "Inference complete"
    );

    Ok(PredictionResult {
        is_fraud,
        fraud_probability,
    })
}

/// Holds the process-wide classifier and invokes it per request.
///
/// The classifier is injected at construction, loaded once at startup and
/// never mutated afterwards, so the engine can be cloned freely across
/// request handlers.
#[derive(Clone)]
pub struct InferenceEngine {
    classifier: Arc<dyn Classifier>,
}

impl InferenceEngine {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    pub fn model_name(&self) -> &str {
        self.classifier.name()
    }

    pub fn predict(&self, vector: &FeatureVector) -> Result<PredictionResult> {
        predict(vector, self.classifier.as_ref())
    }
}
