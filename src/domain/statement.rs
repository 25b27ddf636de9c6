use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A line of the bank's end-of-day statement.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct StatementEntry {
    pub reference: String,
    pub amount: Decimal,
    #[serde(default)]
    pub value_date: Option<NaiveDate>,
}

impl StatementEntry {
    pub fn new(reference: impl Into<String>, amount: Decimal) -> Self {
        Self {
            reference: reference.into(),
            amount,
            value_date: None,
        }
    }

    /// Exact match on both reference and amount. Amounts compare numerically.
    pub fn matches(&self, reference: &str, amount: Decimal) -> bool {
        self.reference == reference && self.amount == amount
    }
}
