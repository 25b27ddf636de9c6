use super::money::Money;
use super::status::{LedgerStatus, ReconciliationStatus};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Terminal record of matching an employer receipt against the bank statement.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct BoardReconciliationRecord {
    pub board_receipt_number: String,
    pub employer_receipt_number: String,
    pub worker_receipt_number: String,
    pub transaction_reference: String,
    pub expected_amount: Money,
    pub total_records: usize,
    /// Statement reference of the matched line, `None` when unmatched.
    pub matched_reference: Option<String>,
    /// Amount found on the statement, zero when unmatched.
    pub matched_amount: Money,
    pub status: ReconciliationStatus,
    pub remarks: String,
    pub reconciled_by: String,
    pub reconciled_at: DateTime<Utc>,
}

impl BoardReconciliationRecord {
    pub fn is_reconciled(&self) -> bool {
        self.status == ReconciliationStatus::Reconciled
    }
}

/// Settlement ledger entry (board receipt) opened when an employer receipt is
/// validated and closed by settlement.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct LedgerEntry {
    pub ledger_reference: String,
    pub employer_receipt_number: String,
    pub amount: Money,
    /// Bank UTR, i.e. the employer's transaction reference.
    pub utr_number: String,
    pub status: LedgerStatus,
    pub maker: String,
    pub checker: Option<String>,
    pub date: NaiveDate,
}
