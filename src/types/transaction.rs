//! Transaction data structures submitted through the form

use crate::error::{FraudError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transaction categories the classifier was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    CashOut,
    Debit,
    Payment,
    Transfer,
}

impl TransactionType {
    /// All supported categories, in one-hot column order.
    pub const ALL: [TransactionType; 4] = [
        TransactionType::CashOut,
        TransactionType::Debit,
        TransactionType::Payment,
        TransactionType::Transfer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::CashOut => "CASH_OUT",
            TransactionType::Debit => "DEBIT",
            TransactionType::Payment => "PAYMENT",
            TransactionType::Transfer => "TRANSFER",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = FraudError;

    /// Exact, case-sensitive match on the category labels; surrounding
    /// whitespace is ignored.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        TransactionType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| FraudError::InvalidCategory(s.to_string()))
    }
}

/// A single validated-on-demand transaction as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionInput {
    pub amount: f64,
    pub sender_old_balance: f64,
    pub sender_new_balance: f64,
    pub receiver_old_balance: f64,
    pub receiver_new_balance: f64,
    pub transaction_type: TransactionType,
}

impl TransactionInput {
    pub fn new(
        amount: f64,
        sender_old_balance: f64,
        sender_new_balance: f64,
        receiver_old_balance: f64,
        receiver_new_balance: f64,
        transaction_type: TransactionType,
    ) -> Self {
        Self {
            amount,
            sender_old_balance,
            sender_new_balance,
            receiver_old_balance,
            receiver_new_balance,
            transaction_type,
        }
    }

    /// Numeric fields paired with their names, in form order.
    pub fn numeric_fields(&self) -> [(&'static str, f64); 5] {
        [
            ("amount", self.amount),
            ("sender_old_balance", self.sender_old_balance),
            ("sender_new_balance", self.sender_new_balance),
            ("receiver_old_balance", self.receiver_old_balance),
            ("receiver_new_balance", self.receiver_new_balance),
        ]
    }

    /// Reject negative or non-finite amounts and balances.
    pub fn validate(&self) -> Result<()> {
        for (field, value) in self.numeric_fields() {
            if !value.is_finite() || value < 0.0 {
                return Err(FraudError::InvalidRange { field, value });
            }
        }
        Ok(())
    }
}

/// Raw form submission, every field still text.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionForm {
    #[serde(default)]
    pub amount: String,
    #[serde(default)]
    pub sender_old_balance: String,
    #[serde(default)]
    pub sender_new_balance: String,
    #[serde(default)]
    pub receiver_old_balance: String,
    #[serde(default)]
    pub receiver_new_balance: String,
    #[serde(default)]
    pub transaction_type: String,
}

fn parse_field(field: &'static str, raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| FraudError::InvalidRange {
            field,
            value: f64::NAN,
        })
}

impl TryFrom<&TransactionForm> for TransactionInput {
    type Error = FraudError;

    /// Category is checked first so an unsupported type is reported even
    /// when the numbers are also wrong.
    fn try_from(form: &TransactionForm) -> Result<Self> {
        let transaction_type = form.transaction_type.parse::<TransactionType>()?;

        let input = TransactionInput {
            amount: parse_field("amount", &form.amount)?,
            sender_old_balance: parse_field("sender_old_balance", &form.sender_old_balance)?,
            sender_new_balance: parse_field("sender_new_balance", &form.sender_new_balance)?,
            receiver_old_balance: parse_field("receiver_old_balance", &form.receiver_old_balance)?,
            receiver_new_balance: parse_field("receiver_new_balance", &form.receiver_new_balance)?,
            transaction_type,
        };
        input.validate()?;
        Ok(input)
    }
}
