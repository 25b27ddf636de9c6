use super::numbering::Numbering;
use crate::domain::money::Money;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{LedgerStore, NumberKind};
use crate::domain::receipt::WorkerReceipt;
use crate::domain::status::{PaymentStatus, WorkerReceiptStatus, advance};
use crate::error::{ReconError, Result};
use chrono::Utc;
use std::collections::HashSet;
use tracing::info;

/// First custody stage: groups validated payment records into a worker receipt.
#[derive(Clone)]
pub struct ReceiptBatcher {
    numbering: Numbering,
}

impl ReceiptBatcher {
    pub fn new(numbering: Numbering) -> Self {
        Self { numbering }
    }

    /// Persists a new worker receipt for `records` and stamps each record with
    /// its number and PAYMENT_REQUESTED.
    ///
    /// Fails with `EmptyBatch` for an empty list and `AlreadyBatched` if any
    /// record already belongs to a receipt. A record already stored but not
    /// batched must carry the stored amount and advances from its stored status.
    pub async fn create_receipt(
        &self,
        store: &dyn LedgerStore,
        records: Vec<PaymentRecord>,
    ) -> Result<WorkerReceipt> {
        if records.is_empty() {
            return Err(ReconError::EmptyBatch);
        }
        let mut seen = HashSet::with_capacity(records.len());
        if let Some(duplicate) = records.iter().find(|r| !seen.insert(r.reference.as_str())) {
            return Err(ReconError::Validation(format!(
                "duplicate payment reference in batch: {}",
                duplicate.reference
            )));
        }
        info!(records = records.len(), "creating worker receipt");

        let mut tx = store.begin().await?;
        // A record already on file is batched from its stored state, not the caller's copy.
        let mut batch = Vec::with_capacity(records.len());
        for record in records {
            if record.is_batched() {
                return Err(ReconError::AlreadyBatched(record.reference));
            }
            match tx.payment_record(&record.reference).await? {
                Some(existing) if existing.is_batched() => {
                    return Err(ReconError::AlreadyBatched(record.reference));
                }
                Some(existing) if existing.amount != record.amount => {
                    return Err(ReconError::Validation(format!(
                        "payment {} is on file for {} not {}",
                        record.reference, existing.amount, record.amount
                    )));
                }
                Some(existing) => batch.push(existing),
                None => batch.push(record),
            }
        }

        let total_amount: Money = batch.iter().map(|r| r.amount).sum();
        let total_records = batch.len();
        let receipt_number = self
            .numbering
            .allocate(tx.as_ref(), NumberKind::WorkerReceipt)
            .await?;

        for mut record in batch {
            advance(&mut record.status, PaymentStatus::PaymentRequested)?;
            record.receipt_number = Some(receipt_number.clone());
            tx.put_payment_record(record).await?;
        }

        let receipt = WorkerReceipt {
            receipt_number,
            total_amount,
            total_records,
            status: WorkerReceiptStatus::Generated,
            created_at: Utc::now(),
        };
        tx.put_worker_receipt(receipt.clone()).await?;
        tx.commit()?;

        info!(
            receipt_number = %receipt.receipt_number,
            total_records,
            total_amount = %receipt.total_amount,
            "worker receipt created"
        );
        Ok(receipt)
    }
}
