#![allow(dead_code)]

use async_trait::async_trait;
use paytrail::application::engine::ReconciliationEngine;
use paytrail::config::PipelineConfig;
use paytrail::domain::money::Amount;
use paytrail::domain::payment::PaymentRecord;
use paytrail::domain::ports::{LedgerStore, LedgerTransaction, NumberKind};
use paytrail::domain::receipt::{EmployerReceipt, WorkerReceipt};
use paytrail::domain::reconciliation::{BoardReconciliationRecord, LedgerEntry};
use paytrail::domain::statement::StatementEntry;
use paytrail::domain::status::{EmployerReceiptStatus, ReconciliationStatus, WorkerReceiptStatus};
use paytrail::error::{ReconError, Result};
use paytrail::infrastructure::in_memory::InMemoryLedgerStore;
use paytrail::infrastructure::statement::InMemoryStatement;
use rust_decimal::Decimal;

pub fn record(reference: &str, amount: Decimal) -> PaymentRecord {
    PaymentRecord::new(reference, Amount::new(amount).unwrap()).unwrap()
}

/// An engine over a fresh in-memory store and the given statement lines.
pub fn engine(statement: Vec<StatementEntry>) -> ReconciliationEngine {
    engine_with_store(Box::new(InMemoryLedgerStore::new()), statement)
}

pub fn engine_with_store(
    store: Box<dyn LedgerStore>,
    statement: Vec<StatementEntry>,
) -> ReconciliationEngine {
    ReconciliationEngine::new(
        store,
        Box::new(InMemoryStatement::new(statement)),
        &PipelineConfig::default(),
    )
}

/// Which write a `FaultyStore` transaction refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    PaymentRecord,
    WorkerReceipt,
    EmployerReceipt,
    Reconciliation,
    LedgerEntry,
}

/// Wraps an in-memory store; every transaction fails on the chosen write
/// once `armed` is set.
#[derive(Clone)]
pub struct FaultyStore {
    pub inner: InMemoryLedgerStore,
    fault: Fault,
    armed: std::sync::Arc<std::sync::atomic::AtomicBool>,
}

impl FaultyStore {
    pub fn new(fault: Fault) -> Self {
        Self {
            inner: InMemoryLedgerStore::new(),
            fault,
            armed: Default::default(),
        }
    }

    pub fn arm(&self) {
        self.armed.store(true, std::sync::atomic::Ordering::SeqCst);
    }
}

#[async_trait]
impl LedgerStore for FaultyStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>> {
        let armed = self.armed.load(std::sync::atomic::Ordering::SeqCst);
        Ok(Box::new(FaultyTransaction {
            inner: self.inner.begin().await?,
            fault: armed.then_some(self.fault),
        }))
    }
}

struct FaultyTransaction {
    inner: Box<dyn LedgerTransaction>,
    fault: Option<Fault>,
}

impl FaultyTransaction {
    fn check(&self, write: Fault) -> Result<()> {
        if self.fault == Some(write) {
            Err(ReconError::internal(format!("injected failure writing {write:?}")))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl LedgerTransaction for FaultyTransaction {
    async fn payment_record(&self, reference: &str) -> Result<Option<PaymentRecord>> {
        self.inner.payment_record(reference).await
    }

    async fn payment_records_for_receipt(
        &self,
        receipt_number: &str,
    ) -> Result<Vec<PaymentRecord>> {
        self.inner.payment_records_for_receipt(receipt_number).await
    }

    async fn put_payment_record(&mut self, record: PaymentRecord) -> Result<()> {
        self.check(Fault::PaymentRecord)?;
        self.inner.put_payment_record(record).await
    }

    async fn worker_receipt(&self, receipt_number: &str) -> Result<Option<WorkerReceipt>> {
        self.inner.worker_receipt(receipt_number).await
    }

    async fn worker_receipts_by_status(
        &self,
        status: WorkerReceiptStatus,
    ) -> Result<Vec<WorkerReceipt>> {
        self.inner.worker_receipts_by_status(status).await
    }

    async fn put_worker_receipt(&mut self, receipt: WorkerReceipt) -> Result<()> {
        self.check(Fault::WorkerReceipt)?;
        self.inner.put_worker_receipt(receipt).await
    }

    async fn employer_receipt(&self, receipt_number: &str) -> Result<Option<EmployerReceipt>> {
        self.inner.employer_receipt(receipt_number).await
    }

    async fn employer_receipt_for_worker(
        &self,
        worker_receipt_number: &str,
    ) -> Result<Option<EmployerReceipt>> {
        self.inner
            .employer_receipt_for_worker(worker_receipt_number)
            .await
    }

    async fn employer_receipts_for_transaction(
        &self,
        transaction_reference: &str,
    ) -> Result<Vec<EmployerReceipt>> {
        self.inner
            .employer_receipts_for_transaction(transaction_reference)
            .await
    }

    async fn employer_receipts_by_status(
        &self,
        status: EmployerReceiptStatus,
    ) -> Result<Vec<EmployerReceipt>> {
        self.inner.employer_receipts_by_status(status).await
    }

    async fn put_employer_receipt(&mut self, receipt: EmployerReceipt) -> Result<()> {
        self.check(Fault::EmployerReceipt)?;
        self.inner.put_employer_receipt(receipt).await
    }

    async fn reconciliation(
        &self,
        board_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>> {
        self.inner.reconciliation(board_receipt_number).await
    }

    async fn reconciliation_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>> {
        self.inner
            .reconciliation_for_employer(employer_receipt_number)
            .await
    }

    async fn reconciliations_by_status(
        &self,
        status: ReconciliationStatus,
    ) -> Result<Vec<BoardReconciliationRecord>> {
        self.inner.reconciliations_by_status(status).await
    }

    async fn reconciliations_by_user(
        &self,
        reconciled_by: &str,
    ) -> Result<Vec<BoardReconciliationRecord>> {
        self.inner.reconciliations_by_user(reconciled_by).await
    }

    async fn put_reconciliation(&mut self, record: BoardReconciliationRecord) -> Result<()> {
        self.check(Fault::Reconciliation)?;
        self.inner.put_reconciliation(record).await
    }

    async fn ledger_entry(&self, ledger_reference: &str) -> Result<Option<LedgerEntry>> {
        self.inner.ledger_entry(ledger_reference).await
    }

    async fn ledger_entry_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<LedgerEntry>> {
        self.inner
            .ledger_entry_for_employer(employer_receipt_number)
            .await
    }

    async fn put_ledger_entry(&mut self, entry: LedgerEntry) -> Result<()> {
        self.check(Fault::LedgerEntry)?;
        self.inner.put_ledger_entry(entry).await
    }

    async fn number_in_use(&self, kind: NumberKind, number: &str) -> Result<bool> {
        self.inner.number_in_use(kind, number).await
    }

    fn commit(self: Box<Self>) -> Result<()> {
        self.inner.commit()
    }
}
