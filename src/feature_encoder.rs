//! Feature encoding for fraud classifier inference.
//!
//! Turns a form submission into the 12 columns the classifier was trained
//! on, in the exact training order.

use crate::error::Result;
use crate::types::transaction::{TransactionInput, TransactionType};
use serde::Serialize;

/// Number of columns the classifier expects.
pub const FEATURE_COUNT: usize = 12;

/// Training column names, in model input order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "step",
    "amount",
    "oldbalanceOrg",
    "newbalanceOrig",
    "oldbalanceDest",
    "newbalanceDest",
    "type_CASH_OUT",
    "type_DEBIT",
    "type_PAYMENT",
    "type_TRANSFER",
    "errorBalanceOrig",
    "errorBalanceDest",
];

/// A single ad-hoc submission has no position in a transaction timeline,
/// so every vector is encoded as the first step.
pub const FIXED_STEP: f64 = 1.0;

/// One-hot indicator columns for each category, in
/// `type_CASH_OUT, type_DEBIT, type_PAYMENT, type_TRANSFER` order.
fn type_indicators(transaction_type: TransactionType) -> [f64; 4] {
    match transaction_type {
        TransactionType::CashOut => [1.0, 0.0, 0.0, 0.0],
        TransactionType::Debit => [0.0, 1.0, 0.0, 0.0],
        TransactionType::Payment => [0.0, 0.0, 1.0, 0.0],
        TransactionType::Transfer => [0.0, 0.0, 0.0, 1.0],
    }
}

/// Encoded classifier input with every slot named.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FeatureVector {
    pub step: f64,
    pub amount: f64,
    pub sender_old_balance: f64,
    pub sender_new_balance: f64,
    pub receiver_old_balance: f64,
    pub receiver_new_balance: f64,
    pub is_cash_out: f64,
    pub is_debit: f64,
    pub is_payment: f64,
    pub is_transfer: f64,
    pub error_balance_origin: f64,
    pub error_balance_destination: f64,
}

impl FeatureVector {
    /// Slots in training column order. Everything downstream of the encoder
    /// reads the vector through this method only.
    pub fn to_array(&self) -> [f64; FEATURE_COUNT] {
        [
            self.step,
            self.amount,
            self.sender_old_balance,
            self.sender_new_balance,
            self.receiver_old_balance,
            self.receiver_new_balance,
            self.is_cash_out,
            self.is_debit,
            self.is_payment,
            self.is_transfer,
            self.error_balance_origin,
            self.error_balance_destination,
        ]
    }

    /// Single-precision row as fed to the ONNX graph.
    pub fn to_model_input(&self) -> Vec<f32> {
        self.to_array().iter().map(|&v| v as f32).collect()
    }

    /// The four one-hot type columns.
    pub fn type_indicators(&self) -> [f64; 4] {
        [self.is_cash_out, self.is_debit, self.is_payment, self.is_transfer]
    }
}

/// Encoder that transforms transactions into model input features.
///
/// No scaling or normalization: the classifier was trained on raw values.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeatureEncoder;

impl FeatureEncoder {
    pub fn new() -> Self {
        Self
    }

    /// Encode a transaction.
    ///
    /// Amounts and balances are re-validated here; callers upstream are
    /// not trusted to have rejected negative or non-finite values.
    pub fn encode(&self, input: &TransactionInput) -> Result<FeatureVector> {
        input.validate()?;

        let [is_cash_out, is_debit, is_payment, is_transfer] =
            type_indicators(input.transaction_type);

        Ok(FeatureVector {
            step: FIXED_STEP,
            amount: input.amount,
            sender_old_balance: input.sender_old_balance,
            sender_new_balance: input.sender_new_balance,
            receiver_old_balance: input.receiver_old_balance,
            receiver_new_balance: input.receiver_new_balance,
            is_cash_out,
            is_debit,
            is_payment,
            is_transfer,
            error_balance_origin: input.sender_old_balance
                - input.sender_new_balance
                - input.amount,
            error_balance_destination: input.receiver_new_balance
                - input.receiver_old_balance
                - input.amount,
        })
    }

    pub fn feature_count(&self) -> usize {
        FEATURE_COUNT
    }

    pub fn feature_names(&self) -> &'static [&'static str; FEATURE_COUNT] {
        &FEATURE_NAMES
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FraudError;
    use proptest::prelude::*;

    fn cash_out() -> TransactionInput {
        TransactionInput::new(1000.0, 1000.0, 0.0, 500.0, 1500.0, TransactionType::CashOut)
    }

    #[test]
    fn test_balanced_cash_out() {
        let vector = FeatureEncoder::new().encode(&cash_out()).unwrap();

        assert_eq!(vector.error_balance_origin, 0.0);
        assert_eq!(vector.error_balance_destination, 0.0);
        assert_eq!(vector.type_indicators(), [1.0, 0.0, 0.0, 0.0]);
        assert_eq!(vector.step, 1.0);
    }

    #[test]
    fn test_column_order() {
        let input =
            TransactionInput::new(10.0, 200.0, 150.0, 30.0, 45.0, TransactionType::Payment);
        let vector = FeatureEncoder::new().encode(&input).unwrap();

        assert_eq!(
            vector.to_array(),
            [1.0, 10.0, 200.0, 150.0, 30.0, 45.0, 0.0, 0.0, 1.0, 0.0, 40.0, 5.0]
        );
        assert_eq!(vector.to_model_input().len(), FEATURE_COUNT);
    }

    #[test]
    fn test_rejects_negative_amount() {
        let mut input = cash_out();
        input.amount = -50.0;

        assert_eq!(
            FeatureEncoder::new().encode(&input),
            Err(FraudError::InvalidRange {
                field: "amount",
                value: -50.0
            })
        );
    }

    #[test]
    fn test_rejects_nan_balance() {
        let mut input = cash_out();
        input.sender_new_balance = f64::NAN;
        assert!(FeatureEncoder::new().encode(&input).is_err());
    }

    #[test]
    fn test_feature_count() {
        let encoder = FeatureEncoder::new();
        assert_eq!(encoder.feature_count(), 12);
        assert_eq!(encoder.feature_names()[0], "step");
        assert_eq!(encoder.feature_names()[11], "errorBalanceDest");
    }

    fn any_type() -> impl Strategy<Value = TransactionType> {
        prop::sample::select(TransactionType::ALL.to_vec())
    }

    fn any_input() -> impl Strategy<Value = TransactionInput> {
        (
            0.0f64..1e9,
            0.0f64..1e9,
            0.0f64..1e9,
            0.0f64..1e9,
            0.0f64..1e9,
            any_type(),
        )
            .prop_map(|(a, so, sn, ro, rn, t)| TransactionInput::new(a, so, sn, ro, rn, t))
    }

    proptest! {
        #[test]
        fn exactly_one_type_indicator_is_set(input in any_input()) {
            let vector = FeatureEncoder::new().encode(&input).unwrap();
            let indicators = vector.type_indicators();
            prop_assert_eq!(indicators.iter().filter(|&&v| v == 1.0).count(), 1);
            prop_assert_eq!(indicators.iter().filter(|&&v| v == 0.0).count(), 3);

            let position = TransactionType::ALL
                .iter()
                .position(|&t| t == input.transaction_type)
                .unwrap();
            prop_assert_eq!(indicators[position], 1.0);
        }

        #[test]
        fn encoding_is_deterministic(input in any_input()) {
            let encoder = FeatureEncoder::new();
            prop_assert_eq!(encoder.encode(&input).unwrap(), encoder.encode(&input).unwrap());
        }

        #[test]
        fn balance_errors_follow_bookkeeping(input in any_input()) {
            let vector = FeatureEncoder::new().encode(&input).unwrap();
            prop_assert_eq!(
                vector.error_balance_origin,
                input.sender_old_balance - input.sender_new_balance - input.amount
            );
            prop_assert_eq!(
                vector.error_balance_destination,
                input.receiver_new_balance - input.receiver_old_balance - input.amount
            );
            prop_assert_eq!(vector.step, 1.0);
        }
    }
}
