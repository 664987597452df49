//! The classifier seam.
//!
//! The pre-trained artifact is a black box exposing a thresholded label and
//! the two class probabilities. Anything implementing [`Classifier`] can
//! back the inference step, which keeps the invoker testable without a
//! model file on disk.

use crate::error::Result;
use crate::feature_encoder::FeatureVector;

/// Both classifier outputs for one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierOutput {
    /// Thresholded class label as emitted by the model
    pub label: i64,
    /// `[p(legitimate), p(fraud)]`
    pub probabilities: [f64; 2],
}

/// Pre-trained binary classifier, loaded once and shared read-only.
///
/// Implementations must be safe to call from several requests at once;
/// any internal locking is the implementation's business.
pub trait Classifier: Send + Sync {
    /// Name used in logs.
    fn name(&self) -> &str;

    /// Thresholded class label.
    fn classify(&self, features: &FeatureVector) -> Result<i64>;

    /// Per-class probabilities, `[p0, p1]`.
    fn class_probabilities(&self, features: &FeatureVector) -> Result<[f64; 2]>;

    /// Label and probabilities together. Backends that produce both from a
    /// single evaluation should override this.
    fn evaluate(&self, features: &FeatureVector) -> Result<ClassifierOutput> {
        Ok(ClassifierOutput {
            label: self.classify(features)?,
            probabilities: self.class_probabilities(features)?,
        })
    }
}
