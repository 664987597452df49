//! Fraud Detection Dashboard - Main Entry Point
//!
//! Loads the classifier once, then serves the transaction form.

use anyhow::Result;
use fraud_detection_dashboard::{
    config::{AppConfig, LoggingConfig, DEFAULT_CONFIG_PATH},
    detector::FraudDetector,
    feature_encoder::FeatureEncoder,
    metrics::{DashboardMetrics, MetricsReporter},
    models::{inference::InferenceEngine, loader::ModelLoader},
    server,
};
use std::sync::Arc;
use tracing::{error, info};

fn init_logging(logging: &LoggingConfig) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(
        format!("fraud_detection_dashboard={}", logging.level).parse()?,
    );

    if logging.format == "json" {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Optional first argument overrides the config path
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = AppConfig::load_from_path(&config_path)?;

    init_logging(&config.logging)?;
    info!(config = %config_path, "Starting Fraud Detection Dashboard");

    let encoder = FeatureEncoder::new();
    info!(
        features = ?encoder.feature_names(),
        "Feature encoder ready ({} features)",
        encoder.feature_count()
    );

    // No classifier, no service
    let classifier = match ModelLoader::with_threads(config.model.onnx_threads)
        .load(&config.model.path)
    {
        Ok(classifier) => classifier,
        Err(e) => {
            error!(error = %e, "Cannot start without the classifier");
            return Err(e.into());
        }
    };

    let metrics = Arc::new(DashboardMetrics::new());
    let engine = InferenceEngine::new(Arc::new(classifier));
    info!(model = %engine.model_name(), "Inference engine initialized");

    let detector = FraudDetector::new(engine, metrics.clone());

    let reporter = MetricsReporter::new(metrics.clone(), config.server.metrics_interval_secs);
    tokio::spawn(reporter.start());

    let result = server::serve(&config, detector).await;

    info!("Dashboard shutting down...");
    metrics.print_summary();

    result
}
