use super::numbering::Numbering;
use crate::domain::money::Money;
use crate::domain::ports::{LedgerStore, NumberKind, StatementLookup};
use crate::domain::reconciliation::BoardReconciliationRecord;
use crate::domain::status::ReconciliationStatus;
use crate::error::{ReconError, Result, required};
use chrono::Utc;
use tracing::{info, warn};

pub const MATCHED_REMARKS: &str = "Successfully matched with bank statement";
pub const UNMATCHED_REMARKS: &str = "No matching transaction found in bank statement";

/// Third custody stage: matches an employer receipt against the bank
/// statement and records a terminal outcome.
#[derive(Clone)]
pub struct ReconciliationMatcher {
    numbering: Numbering,
}

impl ReconciliationMatcher {
    pub fn new(numbering: Numbering) -> Self {
        Self { numbering }
    }

    /// Looks up the receipt's transaction reference and total on the statement.
    ///
    /// A missing statement line is not an error: the returned record carries
    /// status `FAILED` and a zero matched amount.
    pub async fn reconcile(
        &self,
        store: &dyn LedgerStore,
        statement: &dyn StatementLookup,
        employer_receipt_number: &str,
        reconciled_by: &str,
    ) -> Result<BoardReconciliationRecord> {
        let reconciled_by = required(reconciled_by, "reconciler identity")?;
        let mut tx = store.begin().await?;
        let receipt = tx
            .employer_receipt(employer_receipt_number)
            .await?
            .ok_or_else(|| ReconError::not_found("employer receipt", employer_receipt_number))?;
        if tx
            .reconciliation_for_employer(employer_receipt_number)
            .await?
            .is_some()
        {
            return Err(ReconError::AlreadyReconciled(
                employer_receipt_number.to_string(),
            ));
        }

        let expected = receipt.total_amount;
        // Only an exact reference and amount pair counts, whatever the lookup returns.
        let matched = statement
            .find(&receipt.transaction_reference, expected.value())
            .await?
            .filter(|entry| entry.matches(&receipt.transaction_reference, expected.value()));

        let board_receipt_number = self
            .numbering
            .allocate(tx.as_ref(), NumberKind::BoardReceipt)
            .await?;

        let (status, matched_reference, matched_amount, remarks) = match matched {
            Some(entry) => (
                ReconciliationStatus::Reconciled,
                Some(entry.reference),
                Money::new(entry.amount)?,
                MATCHED_REMARKS,
            ),
            None => (
                ReconciliationStatus::Failed,
                None,
                Money::ZERO,
                UNMATCHED_REMARKS,
            ),
        };

        let record = BoardReconciliationRecord {
            board_receipt_number,
            employer_receipt_number: receipt.receipt_number.clone(),
            worker_receipt_number: receipt.worker_receipt_number.clone(),
            transaction_reference: receipt.transaction_reference.clone(),
            expected_amount: expected,
            total_records: receipt.total_records,
            matched_reference,
            matched_amount,
            status,
            remarks: remarks.to_string(),
            reconciled_by: reconciled_by.to_string(),
            reconciled_at: Utc::now(),
        };
        tx.put_reconciliation(record.clone()).await?;
        tx.commit()?;

        if record.is_reconciled() {
            info!(
                board_receipt = %record.board_receipt_number,
                employer_receipt = %record.employer_receipt_number,
                amount = %record.matched_amount,
                "employer receipt reconciled"
            );
        } else {
            warn!(
                board_receipt = %record.board_receipt_number,
                employer_receipt = %record.employer_receipt_number,
                transaction_reference = %record.transaction_reference,
                expected = %record.expected_amount,
                "no statement line matched"
            );
        }
        Ok(record)
    }
}
