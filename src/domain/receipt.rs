use super::money::Money;
use super::status::{EmployerReceiptStatus, WorkerReceiptStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An immutable batch of payment records grouped at the first custody stage.
///
/// `total_amount` always equals the sum of the member records' amounts.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct WorkerReceipt {
    pub receipt_number: String,
    pub total_amount: Money,
    pub total_records: usize,
    pub status: WorkerReceiptStatus,
    pub created_at: DateTime<Utc>,
}

/// The employer's cross-check of a worker receipt against a claimed bank
/// transaction reference. At most one exists per worker receipt.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct EmployerReceipt {
    pub receipt_number: String,
    pub worker_receipt_number: String,
    /// External bank reference supplied by the validator.
    pub transaction_reference: String,
    pub validated_by: String,
    pub validated_at: DateTime<Utc>,
    /// Copied from the worker receipt.
    pub total_amount: Money,
    pub total_records: usize,
    pub status: EmployerReceiptStatus,
}
