use super::money::Amount;
use super::status::PaymentStatus;
use crate::error::{ReconError, Result};
use serde::{Deserialize, Serialize};

/// One beneficiary disbursement line.
///
/// Records arrive from ingestion already validated and stay loose until the
/// batcher stamps them with a worker receipt number.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct PaymentRecord {
    /// Unique external reference of the disbursement.
    pub reference: String,
    pub amount: Amount,
    pub status: PaymentStatus,
    /// Worker receipt this record was batched into, if any.
    pub receipt_number: Option<String>,
}

impl PaymentRecord {
    /// Creates a validated, not yet batched record.
    pub fn new(reference: impl Into<String>, amount: Amount) -> Result<Self> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(ReconError::Validation(
                "payment reference must not be blank".to_string(),
            ));
        }
        Ok(Self {
            reference,
            amount,
            status: PaymentStatus::Validated,
            receipt_number: None,
        })
    }

    pub fn is_batched(&self) -> bool {
        self.receipt_number.is_some()
    }
}
