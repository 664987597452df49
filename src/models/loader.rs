//! ONNX model loader

use crate::error::FraudError;
use crate::models::onnx::OnnxClassifier;
use anyhow::{Context, Result};
use ort::session::{builder::GraphOptimizationLevel, Session};
use std::path::Path;
use tracing::info;

/// Loader for the classifier artifact
pub struct ModelLoader {
    /// Number of threads for ONNX inference
    onnx_threads: usize,
}

impl ModelLoader {
    /// Create a new model loader with default settings (1 thread)
    pub fn new() -> Self {
        Self::with_threads(1)
    }

    pub fn with_threads(onnx_threads: usize) -> Self {
        Self {
            onnx_threads: onnx_threads.max(1),
        }
    }

    /// Load the classifier once at startup.
    ///
    /// Any failure, including a missing file, is reported as
    /// [`FraudError::ModelUnavailable`]: without the artifact nothing can
    /// be served.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> std::result::Result<OnnxClassifier, FraudError> {
        let path = path.as_ref();
        let unavailable = |reason: String| FraudError::ModelUnavailable {
            path: path.display().to_string(),
            reason,
        };

        if !path.is_file() {
            return Err(unavailable("file not found".to_string()));
        }

        self.load_onnx(path)
            .map_err(|e| unavailable(format!("{:#}", e)))
    }

    fn load_onnx(&self, path: &Path) -> Result<OnnxClassifier> {
        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "classifier".to_string());

        info!(model = %name, path = %path.display(), threads = self.onnx_threads, "Loading ONNX model");

        let session = Session::builder()?
            .with_optimization_level(GraphOptimizationLevel::Level3)?
            .with_intra_threads(self.onnx_threads)?
            .commit_from_file(path)
            .with_context(|| format!("Failed to load model from {:?}", path))?;

        let input_name = session
            .inputs
            .first()
            .map(|i| i.name.clone())
            .context("Model declares no inputs")?;

        let output_names: Vec<String> = session.outputs.iter().map(|o| o.name.clone()).collect();

        let label_output = output_names
            .iter()
            .find(|n| n.contains("label"))
            .or_else(|| output_names.first())
            .cloned()
            .context("Model declares no outputs")?;

        let probability_output = output_names
            .iter()
            .find(|n| n.contains("prob"))
            .or_else(|| output_names.last())
            .cloned()
            .context("Model declares no outputs")?;

        if label_output == probability_output {
            anyhow::bail!(
                "Model must expose separate label and probability outputs, found {:?}",
                output_names
            );
        }

        info!(
            model = %name,
            input = %input_name,
            label_output = %label_output,
            probability_output = %probability_output,
            "Model loaded successfully"
        );

        Ok(OnnxClassifier::new(
            name,
            session,
            input_name,
            label_output,
            probability_output,
        ))
    }
}

impl Default for ModelLoader {
    fn default() -> Self {
        Self::new()
    }
}
