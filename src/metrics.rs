//! Submission counters and inference latency tracking.

use crate::error::FraudError;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Keep at most this many latency samples
const MAX_LATENCY_SAMPLES: usize = 10_000;

/// Metrics collector for the dashboard
pub struct DashboardMetrics {
    /// Form submissions received
    pub submissions: AtomicU64,
    pub fraud_verdicts: AtomicU64,
    pub legitimate_verdicts: AtomicU64,
    /// Failures by error kind
    failures_by_kind: RwLock<HashMap<&'static str, u64>>,
    /// Inference latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    start_time: Instant,
}

impl DashboardMetrics {
    pub fn new() -> Self {
        Self {
            submissions: AtomicU64::new(0),
            fraud_verdicts: AtomicU64::new(0),
            legitimate_verdicts: AtomicU64::new(0),
            failures_by_kind: RwLock::new(HashMap::new()),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            start_time: Instant::now(),
        }
    }

    pub fn record_submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a verdict and how long encoding plus inference took
    pub fn record_verdict(&self, is_fraud: bool, latency: Duration) {
        if is_fraud {
            self.fraud_verdicts.fetch_add(1, Ordering::Relaxed);
        } else {
            self.legitimate_verdicts.fetch_add(1, Ordering::Relaxed);
        }

        if let Ok(mut latencies) = self.latencies.write() {
            latencies.push(latency.as_micros() as u64);
            if latencies.len() > MAX_LATENCY_SAMPLES {
                latencies.drain(0..MAX_LATENCY_SAMPLES / 2);
            }
        }
    }

    pub fn record_failure(&self, error: &FraudError) {
        if let Ok(mut by_kind) = self.failures_by_kind.write() {
            *by_kind.entry(error.kind()).or_insert(0) += 1;
        }
    }

    pub fn failures(&self, kind: &str) -> u64 {
        self.failures_by_kind
            .read()
            .map(|by_kind| by_kind.get(kind).copied().unwrap_or(0))
            .unwrap_or(0)
    }

    pub fn get_latency_stats(&self) -> LatencyStats {
        let mut sorted = match self.latencies.read() {
            Ok(latencies) => latencies.clone(),
            Err(_) => return LatencyStats::default(),
        };
        if sorted.is_empty() {
            return LatencyStats::default();
        }
        sorted.sort_unstable();

        let count = sorted.len();
        let percentile = |p: f64| sorted[((count as f64 * p) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sorted.iter().sum::<u64>() / count as u64,
            p50_us: percentile(0.50),
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let submissions = self.submissions.load(Ordering::Relaxed);
        let fraud = self.fraud_verdicts.load(Ordering::Relaxed);
        let legitimate = self.legitimate_verdicts.load(Ordering::Relaxed);
        let latency = self.get_latency_stats();
        let fraud_rate = if fraud + legitimate > 0 {
            fraud as f64 / (fraud + legitimate) as f64 * 100.0
        } else {
            0.0
        };

        info!(
            uptime_secs = self.start_time.elapsed().as_secs(),
            submissions = submissions,
            fraud_verdicts = fraud,
            legitimate_verdicts = legitimate,
            fraud_rate = %format!("{:.1}%", fraud_rate),
            invalid_category = self.failures("invalid_category"),
            invalid_range = self.failures("invalid_range"),
            inference_failures = self.failures("inference_failure"),
            latency_mean_us = latency.mean_us,
            latency_p50_us = latency.p50_us,
            latency_p95_us = latency.p95_us,
            latency_p99_us = latency.p99_us,
            "Dashboard metrics summary"
        );
    }
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Latency statistics
#[derive(Debug, Default, PartialEq)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Periodically logs a metrics summary
pub struct MetricsReporter {
    metrics: Arc<DashboardMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<DashboardMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs: interval_secs.max(1),
        }
    }

    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // First tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}
