use super::money::Money;
use super::status::{EmployerReceiptStatus, LedgerStatus, PaymentStatus, WorkerReceiptStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    Success,
}

impl SettlementStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
        }
    }
}

/// Statuses every linked entity ends in after a settlement.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone, Copy)]
pub struct FinalStatuses {
    pub employer_receipt: EmployerReceiptStatus,
    pub worker_receipt: WorkerReceiptStatus,
    pub payment_records: PaymentStatus,
    pub ledger_entry: LedgerStatus,
}

impl Default for FinalStatuses {
    fn default() -> Self {
        Self {
            employer_receipt: EmployerReceiptStatus::Accepted,
            worker_receipt: WorkerReceiptStatus::PaymentProcessed,
            payment_records: PaymentStatus::PaymentProcessed,
            ledger_entry: LedgerStatus::Processed,
        }
    }
}

/// One employer receipt closed out by a settlement.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SettledReceipt {
    pub employer_receipt_number: String,
    pub worker_receipt_number: String,
    pub board_receipt_number: String,
    pub ledger_reference: Option<String>,
    pub amount: Money,
    pub payment_records: usize,
}

/// Value object produced by the finalizer. Not persisted.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct SettlementResult {
    pub transaction_reference: String,
    pub processed_by: String,
    pub processed_at: DateTime<Utc>,
    pub total_amount: Money,
    /// Number of employer receipts settled.
    pub total_records: usize,
    pub status: SettlementStatus,
    pub message: String,
    pub receipts: Vec<SettledReceipt>,
    pub final_statuses: FinalStatuses,
}
