//! Fraud Detection Dashboard Library
//!
//! Encodes a manually entered transaction into the feature vector a
//! pre-trained classifier expects, runs the classifier, and renders a
//! fraud/legitimate verdict with a confidence percentage.

pub mod config;
pub mod detector;
pub mod error;
pub mod feature_encoder;
pub mod metrics;
pub mod models;
pub mod server;
pub mod types;

pub use config::AppConfig;
pub use detector::FraudDetector;
pub use error::FraudError;
pub use feature_encoder::{FeatureEncoder, FeatureVector};
pub use models::{Classifier, InferenceEngine, ModelLoader};
pub use types::{PredictionResult, TransactionForm, TransactionInput, TransactionType, Verdict};
