//! Form server: renders the page and hands submissions to the detector.

pub mod page;

use crate::config::AppConfig;
use crate::detector::FraudDetector;
use crate::error::FraudError;
use crate::types::transaction::TransactionForm;
use crate::types::verdict::Verdict;
use actix_web::http::header::ContentType;
use actix_web::http::StatusCode;
use actix_web::{web, App, HttpResponse, HttpServer};
use anyhow::{Context, Result};
use std::time::{Duration, Instant};
use tracing::info;

/// Shared state handed to every request handler
pub struct AppState {
    pub detector: FraudDetector,
    pub inference_timeout: Duration,
}

/// Run one assessment off the async executor, bounded by the configured
/// timeout. A timed-out or panicked call becomes an inference failure.
///
/// The outcome is recorded here, not in the blocking job, so a job that
/// finishes after its request gave up is never counted as a verdict.
pub async fn run_assessment(
    state: &AppState,
    form: TransactionForm,
) -> std::result::Result<Verdict, FraudError> {
    let start_time = Instant::now();
    state.detector.metrics().record_submission();

    let detector = state.detector.clone();
    let job = web::block(move || detector.evaluate_form(&form));

    let outcome = match tokio::time::timeout(state.inference_timeout, job).await {
        Ok(Ok(outcome)) => outcome,
        Ok(Err(e)) => Err(FraudError::InferenceFailure(format!(
            "assessment task failed: {}",
            e
        ))),
        Err(_) => Err(FraudError::InferenceFailure(format!(
            "no answer from the classifier within {} ms",
            state.inference_timeout.as_millis()
        ))),
    };

    state.detector.report(outcome, start_time)
}

fn status_for(outcome: &std::result::Result<Verdict, FraudError>) -> StatusCode {
    match outcome {
        Ok(_) => StatusCode::OK,
        Err(e) if e.is_user_error() => StatusCode::UNPROCESSABLE_ENTITY,
        Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn index() -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page::render(&TransactionForm::default(), None))
}

async fn predict(state: web::Data<AppState>, form: web::Form<TransactionForm>) -> HttpResponse {
    let form = form.into_inner();
    let outcome = run_assessment(&state, form.clone()).await;

    HttpResponse::build(status_for(&outcome))
        .content_type(ContentType::html())
        .body(page::render(&form, Some(&outcome)))
}

async fn health() -> HttpResponse {
    HttpResponse::Ok().content_type(ContentType::plaintext()).body("ok")
}

/// Register the dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/predict", web::post().to(predict))
        .route("/health", web::get().to(health));
}

/// Bind and serve until shutdown (Ctrl-C).
pub async fn serve(config: &AppConfig, detector: FraudDetector) -> Result<()> {
    let state = web::Data::new(AppState {
        detector,
        inference_timeout: config.inference.timeout(),
    });
    let (host, port) = config.bind_address();

    let server = HttpServer::new(move || App::new().app_data(state.clone()).configure(configure))
        .bind((host.as_str(), port))
        .with_context(|| format!("Failed to bind {}:{}", host, port))?;

    info!(host = %host, port = port, "Fraud detection dashboard listening");

    server.run().await.context("Server error")
}
