use crate::domain::money::Money;
use crate::domain::ports::LedgerStore;
use crate::domain::settlement::{
    FinalStatuses, SettledReceipt, SettlementResult, SettlementStatus,
};
use crate::domain::status::advance;
use crate::error::{ReconError, Result, required};
use chrono::Utc;
use tracing::{debug, info};

pub const SETTLED_MESSAGE: &str = "Payment processing completed successfully";

/// Final custody stage: closes out every record tied to one transaction
/// reference once its employer receipts are reconciled.
#[derive(Debug, Default, Clone, Copy)]
pub struct SettlementFinalizer {
    statuses: FinalStatuses,
}

impl SettlementFinalizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances employer receipts, worker receipts, ledger entries and payment
    /// records for `transaction_reference` in a single unit of work.
    ///
    /// Receipts already ACCEPTED are skipped; `AlreadySettled` is returned only
    /// when nothing is left to settle. Any failing receipt aborts the whole
    /// settlement and nothing is written.
    pub async fn process(
        &self,
        store: &dyn LedgerStore,
        transaction_reference: &str,
        processed_by: &str,
    ) -> Result<SettlementResult> {
        let transaction_reference = required(transaction_reference, "transaction reference")?;
        let processed_by = required(processed_by, "processor identity")?;

        let mut tx = store.begin().await?;
        let receipts = tx
            .employer_receipts_for_transaction(transaction_reference)
            .await?;
        if receipts.is_empty() {
            return Err(ReconError::not_found(
                "employer receipt",
                transaction_reference,
            ));
        }

        // Receipts settled by an earlier run under the same reference stay as they are.
        let (done, pending): (Vec<_>, Vec<_>) = receipts
            .into_iter()
            .partition(|r| r.status == self.statuses.employer_receipt);
        if pending.is_empty() {
            return Err(ReconError::AlreadySettled(transaction_reference.to_string()));
        }
        if !done.is_empty() {
            debug!(
                transaction_reference,
                skipped = done.len(),
                "employer receipts already settled"
            );
        }

        let mut total_amount = Money::ZERO;
        let mut settled = Vec::with_capacity(pending.len());

        for mut receipt in pending {
            let reconciliation = tx
                .reconciliation_for_employer(&receipt.receipt_number)
                .await?
                .filter(|r| r.is_reconciled())
                .ok_or_else(|| {
                    ReconError::not_found("reconciled board record", &receipt.receipt_number)
                })?;
            receipt.total_amount.ensure_matches(
                reconciliation.matched_amount,
                format!("reconciled amount of employer receipt {}", receipt.receipt_number),
            )?;

            advance(&mut receipt.status, self.statuses.employer_receipt)?;

            let mut worker = tx
                .worker_receipt(&receipt.worker_receipt_number)
                .await?
                .ok_or_else(|| {
                    ReconError::not_found("worker receipt", &receipt.worker_receipt_number)
                })?;
            advance(&mut worker.status, self.statuses.worker_receipt)?;

            let mut ledger = tx
                .ledger_entry_for_employer(&receipt.receipt_number)
                .await?;
            if let Some(entry) = ledger.as_mut() {
                advance(&mut entry.status, self.statuses.ledger_entry)?;
                entry.checker = Some(processed_by.to_string());
            } else {
                debug!(employer_receipt = %receipt.receipt_number, "no ledger entry to close");
            }

            let mut records = tx
                .payment_records_for_receipt(&worker.receipt_number)
                .await?;
            for record in &mut records {
                advance(&mut record.status, self.statuses.payment_records)?;
            }

            total_amount += receipt.total_amount;
            settled.push(SettledReceipt {
                employer_receipt_number: receipt.receipt_number.clone(),
                worker_receipt_number: worker.receipt_number.clone(),
                board_receipt_number: reconciliation.board_receipt_number.clone(),
                ledger_reference: ledger.as_ref().map(|e| e.ledger_reference.clone()),
                amount: receipt.total_amount,
                payment_records: records.len(),
            });

            tx.put_employer_receipt(receipt).await?;
            tx.put_worker_receipt(worker).await?;
            if let Some(entry) = ledger {
                tx.put_ledger_entry(entry).await?;
            }
            for record in records {
                tx.put_payment_record(record).await?;
            }
        }

        tx.commit()?;

        let result = SettlementResult {
            transaction_reference: transaction_reference.to_string(),
            processed_by: processed_by.to_string(),
            processed_at: Utc::now(),
            total_amount,
            total_records: settled.len(),
            status: SettlementStatus::Success,
            message: SETTLED_MESSAGE.to_string(),
            receipts: settled,
            final_statuses: self.statuses,
        };
        info!(
            transaction_reference,
            receipts = result.total_records,
            total_amount = %result.total_amount,
            "settlement processed"
        );
        Ok(result)
    }
}
