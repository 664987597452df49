use fraud_detection_dashboard::error::Result;
use fraud_detection_dashboard::metrics::DashboardMetrics;
use fraud_detection_dashboard::models::inference::predict;
use fraud_detection_dashboard::{
    Classifier, FeatureEncoder, FeatureVector, FraudDetector, FraudError, InferenceEngine,
    ModelLoader, TransactionForm, TransactionInput, TransactionType,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Logistic score over the two balance errors, thresholded at 0.5.
struct BalanceErrorModel {
    calls: AtomicUsize,
}

impl BalanceErrorModel {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }

    fn fraud_probability(features: &FeatureVector) -> f64 {
        let z = (features.error_balance_origin.abs() + features.error_balance_destination.abs())
            / 1000.0
            - 2.0;
        1.0 / (1.0 + (-z).exp())
    }
}

impl Classifier for BalanceErrorModel {
    fn name(&self) -> &str {
        "balance-error-logistic"
    }

    fn classify(&self, features: &FeatureVector) -> Result<i64> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(i64::from(Self::fraud_probability(features) >= 0.5))
    }

    fn class_probabilities(&self, features: &FeatureVector) -> Result<[f64; 2]> {
        let p = Self::fraud_probability(features);
        Ok([1.0 - p, p])
    }
}

/// Fails its first call the way a shape mismatch would, then recovers.
struct FlakyModel {
    calls: AtomicUsize,
}

impl Classifier for FlakyModel {
    fn name(&self) -> &str {
        "flaky"
    }

    fn classify(&self, _features: &FeatureVector) -> Result<i64> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            return Err(FraudError::InferenceFailure(
                "expected input shape [1, 13]".to_string(),
            ));
        }
        Ok(1)
    }

    fn class_probabilities(&self, _features: &FeatureVector) -> Result<[f64; 2]> {
        Ok([0.3, 0.7])
    }
}

fn form(amount: &str, transaction_type: &str) -> TransactionForm {
    TransactionForm {
        amount: amount.to_string(),
        sender_old_balance: "1000".to_string(),
        sender_new_balance: "0".to_string(),
        receiver_old_balance: "500".to_string(),
        receiver_new_balance: "1500".to_string(),
        transaction_type: transaction_type.to_string(),
    }
}

fn detector_with(model: Arc<dyn Classifier>) -> FraudDetector {
    FraudDetector::new(
        InferenceEngine::new(model),
        Arc::new(DashboardMetrics::new()),
    )
}

#[test]
fn balanced_cash_out_has_zero_balance_errors() {
    let input = TransactionInput::new(1000.0, 1000.0, 0.0, 500.0, 1500.0, TransactionType::CashOut);
    let vector = FeatureEncoder::new().encode(&input).unwrap();

    assert_eq!(vector.error_balance_origin, 0.0);
    assert_eq!(vector.error_balance_destination, 0.0);
    assert_eq!(vector.is_cash_out, 1.0);
    assert_eq!(vector.is_debit, 0.0);
    assert_eq!(vector.is_payment, 0.0);
    assert_eq!(vector.is_transfer, 0.0);

    let result = detector_with(Arc::new(BalanceErrorModel::new()))
        .assess(&input)
        .unwrap();
    assert!(!result.is_fraud);
}

#[test]
fn unsupported_type_is_rejected_before_inference() {
    let model = Arc::new(BalanceErrorModel::new());
    let detector = detector_with(model.clone());

    assert_eq!(
        detector.assess_form(&form("1000", "WIRE")).unwrap_err(),
        FraudError::InvalidCategory("WIRE".to_string())
    );
    assert_eq!(model.calls.load(Ordering::Relaxed), 0);
}

#[test]
fn negative_amount_is_rejected_before_inference() {
    let model = Arc::new(BalanceErrorModel::new());
    let detector = detector_with(model.clone());
    let input = TransactionInput::new(-50.0, 1000.0, 0.0, 500.0, 1500.0, TransactionType::Payment);

    assert_eq!(
        detector.assess(&input).unwrap_err(),
        FraudError::InvalidRange {
            field: "amount",
            value: -50.0
        }
    );
    assert_eq!(model.calls.load(Ordering::Relaxed), 0);
}

#[test]
fn missing_artifact_is_model_unavailable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("xgb_fraud_model.onnx");

    let err = ModelLoader::new().load(&path).err().unwrap();
    assert!(matches!(err, FraudError::ModelUnavailable { .. }));
    assert!(!err.is_user_error());
}

#[test]
fn drained_account_is_flagged() {
    // Sender balance drops by far more than the amount, receiver gets nothing
    let input = TransactionInput::new(500.0, 9000.0, 0.0, 0.0, 0.0, TransactionType::Transfer);
    let result = detector_with(Arc::new(BalanceErrorModel::new()))
        .assess(&input)
        .unwrap();

    assert!(result.is_fraud);
    assert!((0.0..=1.0).contains(&result.fraud_probability));
}

#[test]
fn inference_failure_does_not_poison_later_requests() {
    let detector = detector_with(Arc::new(FlakyModel {
        calls: AtomicUsize::new(0),
    }));

    assert!(matches!(
        detector.assess_form(&form("1000", "TRANSFER")),
        Err(FraudError::InferenceFailure(_))
    ));

    let verdict = detector.assess_form(&form("1000", "TRANSFER")).unwrap();
    assert!(verdict.is_fraud());
    assert_eq!(verdict.confidence_label(), "70.00%");

    let metrics = detector.metrics();
    assert_eq!(metrics.submissions.load(Ordering::Relaxed), 2);
    assert_eq!(metrics.failures("inference_failure"), 1);
    assert_eq!(metrics.fraud_verdicts.load(Ordering::Relaxed), 1);
}

#[test]
fn concurrent_predictions_share_one_classifier() {
    let model = Arc::new(BalanceErrorModel::new());
    let engine = InferenceEngine::new(model.clone());
    let vector = FeatureEncoder::new()
        .encode(&TransactionInput::new(
            100.0,
            100.0,
            0.0,
            0.0,
            100.0,
            TransactionType::Payment,
        ))
        .unwrap();

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let engine = engine.clone();
            std::thread::spawn(move || engine.predict(&vector).unwrap())
        })
        .collect();

    let first = predict(&vector, model.as_ref()).unwrap();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), first);
    }
    assert_eq!(model.calls.load(Ordering::Relaxed), 9);
}
