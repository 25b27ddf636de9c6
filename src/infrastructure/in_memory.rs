use super::write_set::{Tables, select, stage};
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{LedgerStore, LedgerTransaction, NumberKind};
use crate::domain::receipt::{EmployerReceipt, WorkerReceipt};
use crate::domain::reconciliation::{BoardReconciliationRecord, LedgerEntry};
use crate::domain::status::{EmployerReceiptStatus, ReconciliationStatus, WorkerReceiptStatus};
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// A thread-safe in-memory store for the whole custody chain.
///
/// Uses `Arc<Mutex<Tables>>`: a transaction owns the lock from `begin` until it
/// commits or is dropped, so transactions run one at a time.
#[derive(Default, Clone)]
pub struct InMemoryLedgerStore {
    tables: Arc<Mutex<Tables>>,
}

impl InMemoryLedgerStore {
    /// Creates a new, empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LedgerStore for InMemoryLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>> {
        let committed = self.tables.clone().lock_owned().await;
        Ok(Box::new(InMemoryTransaction {
            committed,
            staged: Tables::default(),
        }))
    }
}

pub struct InMemoryTransaction {
    committed: OwnedMutexGuard<Tables>,
    staged: Tables,
}

#[async_trait]
impl LedgerTransaction for InMemoryTransaction {
    async fn payment_record(&self, reference: &str) -> Result<Option<PaymentRecord>> {
        Ok(self
            .staged
            .payment_records
            .get(reference)
            .or_else(|| self.committed.payment_records.get(reference))
            .cloned())
    }

    async fn payment_records_for_receipt(
        &self,
        receipt_number: &str,
    ) -> Result<Vec<PaymentRecord>> {
        Ok(select(
            self.committed.payment_records.values().cloned(),
            &self.staged.payment_records,
            |record| record.receipt_number.as_deref() == Some(receipt_number),
        ))
    }

    async fn put_payment_record(&mut self, record: PaymentRecord) -> Result<()> {
        stage(&mut self.staged.payment_records, record);
        Ok(())
    }

    async fn worker_receipt(&self, receipt_number: &str) -> Result<Option<WorkerReceipt>> {
        Ok(self
            .staged
            .worker_receipts
            .get(receipt_number)
            .or_else(|| self.committed.worker_receipts.get(receipt_number))
            .cloned())
    }

    async fn worker_receipts_by_status(
        &self,
        status: WorkerReceiptStatus,
    ) -> Result<Vec<WorkerReceipt>> {
        Ok(select(
            self.committed.worker_receipts.values().cloned(),
            &self.staged.worker_receipts,
            |receipt| receipt.status == status,
        ))
    }

    async fn put_worker_receipt(&mut self, receipt: WorkerReceipt) -> Result<()> {
        stage(&mut self.staged.worker_receipts, receipt);
        Ok(())
    }

    async fn employer_receipt(&self, receipt_number: &str) -> Result<Option<EmployerReceipt>> {
        Ok(self
            .staged
            .employer_receipts
            .get(receipt_number)
            .or_else(|| self.committed.employer_receipts.get(receipt_number))
            .cloned())
    }

    async fn employer_receipt_for_worker(
        &self,
        worker_receipt_number: &str,
    ) -> Result<Option<EmployerReceipt>> {
        Ok(select(
            self.committed.employer_receipts.values().cloned(),
            &self.staged.employer_receipts,
            |receipt| receipt.worker_receipt_number == worker_receipt_number,
        )
        .into_iter()
        .next())
    }

    async fn employer_receipts_for_transaction(
        &self,
        transaction_reference: &str,
    ) -> Result<Vec<EmployerReceipt>> {
        Ok(select(
            self.committed.employer_receipts.values().cloned(),
            &self.staged.employer_receipts,
            |receipt| receipt.transaction_reference == transaction_reference,
        ))
    }

    async fn employer_receipts_by_status(
        &self,
        status: EmployerReceiptStatus,
    ) -> Result<Vec<EmployerReceipt>> {
        Ok(select(
            self.committed.employer_receipts.values().cloned(),
            &self.staged.employer_receipts,
            |receipt| receipt.status == status,
        ))
    }

    async fn put_employer_receipt(&mut self, receipt: EmployerReceipt) -> Result<()> {
        stage(&mut self.staged.employer_receipts, receipt);
        Ok(())
    }

    async fn reconciliation(
        &self,
        board_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>> {
        Ok(self
            .staged
            .reconciliations
            .get(board_receipt_number)
            .or_else(|| self.committed.reconciliations.get(board_receipt_number))
            .cloned())
    }

    async fn reconciliation_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>> {
        Ok(select(
            self.committed.reconciliations.values().cloned(),
            &self.staged.reconciliations,
            |record| record.employer_receipt_number == employer_receipt_number,
        )
        .into_iter()
        .next())
    }

    async fn reconciliations_by_status(
        &self,
        status: ReconciliationStatus,
    ) -> Result<Vec<BoardReconciliationRecord>> {
        Ok(select(
            self.committed.reconciliations.values().cloned(),
            &self.staged.reconciliations,
            |record| record.status == status,
        ))
    }

    async fn reconciliations_by_user(
        &self,
        reconciled_by: &str,
    ) -> Result<Vec<BoardReconciliationRecord>> {
        Ok(select(
            self.committed.reconciliations.values().cloned(),
            &self.staged.reconciliations,
            |record| record.reconciled_by == reconciled_by,
        ))
    }

    async fn put_reconciliation(&mut self, record: BoardReconciliationRecord) -> Result<()> {
        stage(&mut self.staged.reconciliations, record);
        Ok(())
    }

    async fn ledger_entry(&self, ledger_reference: &str) -> Result<Option<LedgerEntry>> {
        Ok(self
            .staged
            .ledger_entries
            .get(ledger_reference)
            .or_else(|| self.committed.ledger_entries.get(ledger_reference))
            .cloned())
    }

    async fn ledger_entry_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<LedgerEntry>> {
        Ok(select(
            self.committed.ledger_entries.values().cloned(),
            &self.staged.ledger_entries,
            |entry| entry.employer_receipt_number == employer_receipt_number,
        )
        .into_iter()
        .next())
    }

    async fn put_ledger_entry(&mut self, entry: LedgerEntry) -> Result<()> {
        stage(&mut self.staged.ledger_entries, entry);
        Ok(())
    }

    async fn number_in_use(&self, kind: NumberKind, number: &str) -> Result<bool> {
        let (staged, committed) = match kind {
            NumberKind::WorkerReceipt => (
                self.staged.worker_receipts.contains_key(number),
                self.committed.worker_receipts.contains_key(number),
            ),
            NumberKind::EmployerReceipt => (
                self.staged.employer_receipts.contains_key(number),
                self.committed.employer_receipts.contains_key(number),
            ),
            NumberKind::BoardReceipt => (
                self.staged.reconciliations.contains_key(number),
                self.committed.reconciliations.contains_key(number),
            ),
            NumberKind::LedgerEntry => (
                self.staged.ledger_entries.contains_key(number),
                self.committed.ledger_entries.contains_key(number),
            ),
        };
        Ok(staged || committed)
    }

    fn commit(self: Box<Self>) -> Result<()> {
        let InMemoryTransaction {
            mut committed,
            staged,
        } = *self;
        if !staged.is_empty() {
            committed.apply(staged);
        }
        Ok(())
    }
}
