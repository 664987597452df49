//! ONNX Runtime backed classifier

use crate::error::{FraudError, Result};
use crate::feature_encoder::FeatureVector;
use crate::models::classifier::{Classifier, ClassifierOutput};
use anyhow::Context;
use ort::memory::Allocator;
use ort::session::{Session, SessionOutputs};
use ort::value::{DowncastableTarget, DynMapValueType, DynSequenceValueType, DynValue, Tensor};
use std::sync::Mutex;
use tracing::debug;

/// Classifier exported to ONNX (e.g. XGBoost through onnxmltools), exposing
/// a `label` output and a `probabilities` output.
pub struct OnnxClassifier {
    name: String,
    /// `Session::run` needs `&mut`, so concurrent requests take turns here.
    session: Mutex<Session>,
    input_name: String,
    label_output: String,
    probability_output: String,
}

impl OnnxClassifier {
    pub(crate) fn new(
        name: String,
        session: Session,
        input_name: String,
        label_output: String,
        probability_output: String,
    ) -> Self {
        Self {
            name,
            session: Mutex::new(session),
            input_name,
            label_output,
            probability_output,
        }
    }

    pub fn input_name(&self) -> &str {
        &self.input_name
    }

    /// Run the graph once and read both outputs.
    fn run(&self, features: &FeatureVector) -> anyhow::Result<ClassifierOutput> {
        let row = features.to_model_input();

        // Shape [1, num_features]
        let shape = vec![1_i64, row.len() as i64];
        let input_tensor =
            Tensor::from_array((shape, row)).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock error: {}", e))?;

        let outputs = session.run(ort::inputs![self.input_name.as_str() => input_tensor])?;

        let label = self.extract_label(&outputs)?;
        let probabilities = self.extract_probabilities(&outputs)?;

        debug!(
            model = %self.name,
            label = label,
            fraud_probability = probabilities[1],
            "Classifier evaluated"
        );

        Ok(ClassifierOutput {
            label,
            probabilities,
        })
    }

    fn extract_label(&self, outputs: &SessionOutputs) -> anyhow::Result<i64> {
        let output = outputs
            .get(self.label_output.as_str())
            .with_context(|| format!("Missing label output {:?}", self.label_output))?;

        let (_, data) = output
            .try_extract_tensor::<i64>()
            .context("Label output is not an int64 tensor")?;

        data.first()
            .copied()
            .ok_or_else(|| anyhow::anyhow!("Empty label output"))
    }

    /// Handles both tensor outputs (XGBoost, random forest) and seq(map)
    /// outputs (LightGBM, CatBoost with ZipMap).
    fn extract_probabilities(&self, outputs: &SessionOutputs) -> anyhow::Result<[f64; 2]> {
        let output = outputs
            .get(self.probability_output.as_str())
            .with_context(|| {
                format!("Missing probability output {:?}", self.probability_output)
            })?;

        if let Ok((shape, data)) = output.try_extract_tensor::<f32>() {
            let dims: Vec<i64> = shape.iter().copied().collect();
            return probabilities_from_tensor(&dims, data);
        }

        if DynSequenceValueType::can_downcast(&output.dtype()) {
            return probabilities_from_sequence_map(output);
        }

        anyhow::bail!("Unsupported probability output type {:?}", output.dtype())
    }
}

/// `[batch, 2]` or `[2]` carries both classes; `[batch, 1]` or `[1]` carries
/// only the positive class.
fn probabilities_from_tensor(dims: &[i64], data: &[f32]) -> anyhow::Result<[f64; 2]> {
    let num_classes = dims.last().copied().unwrap_or(0);
    match (num_classes, data) {
        (2, [p0, p1, ..]) => Ok([*p0 as f64, *p1 as f64]),
        (1, [p1, ..]) => Ok([1.0 - *p1 as f64, *p1 as f64]),
        _ => anyhow::bail!("Unexpected probability tensor shape {:?}", dims),
    }
}

/// Reads the first map of a seq(map(int64, float)) output; batch size is 1.
fn probabilities_from_sequence_map(output: &DynValue) -> anyhow::Result<[f64; 2]> {
    let allocator = Allocator::default();

    let sequence = output
        .downcast_ref::<DynSequenceValueType>()
        .map_err(|e| anyhow::anyhow!("Failed to downcast to sequence: {}", e))?;

    let maps = sequence.try_extract_sequence::<DynMapValueType>(&allocator)?;
    let first = maps
        .first()
        .ok_or_else(|| anyhow::anyhow!("Empty probability sequence"))?;

    let kv_pairs = first.try_extract_key_values::<i64, f32>()?;

    let mut probabilities = [None, None];
    for (class_id, prob) in &kv_pairs {
        if let Some(slot) = usize::try_from(*class_id)
            .ok()
            .and_then(|i| probabilities.get_mut(i))
        {
            *slot = Some(*prob as f64);
        }
    }

    match probabilities {
        [Some(p0), Some(p1)] => Ok([p0, p1]),
        [None, Some(p1)] => Ok([1.0 - p1, p1]),
        [Some(p0), None] => Ok([p0, 1.0 - p0]),
        [None, None] => anyhow::bail!("No class probabilities in map"),
    }
}

fn inference_failure(e: anyhow::Error) -> FraudError {
    FraudError::InferenceFailure(format!("{:#}", e))
}

impl Classifier for OnnxClassifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn classify(&self, features: &FeatureVector) -> Result<i64> {
        self.run(features).map(|o| o.label).map_err(inference_failure)
    }

    fn class_probabilities(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        self.run(features)
            .map(|o| o.probabilities)
            .map_err(inference_failure)
    }

    fn evaluate(&self, features: &FeatureVector) -> Result<ClassifierOutput> {
        self.run(features).map_err(inference_failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_class_tensor() {
        let probs = probabilities_from_tensor(&[1, 2], &[0.25, 0.75]).unwrap();
        assert_eq!(probs, [0.25, 0.75]);
    }

    #[test]
    fn test_single_column_tensor() {
        let probs = probabilities_from_tensor(&[1, 1], &[0.5]).unwrap();
        assert_eq!(probs, [0.5, 0.5]);
    }

    #[test]
    fn test_malformed_tensor() {
        assert!(probabilities_from_tensor(&[1, 3], &[0.1, 0.2, 0.7]).is_err());
        assert!(probabilities_from_tensor(&[1, 2], &[0.1]).is_err());
        assert!(probabilities_from_tensor(&[], &[]).is_err());
    }
}
