use super::payment::PaymentRecord;
use super::receipt::{EmployerReceipt, WorkerReceipt};
use super::reconciliation::{BoardReconciliationRecord, LedgerEntry};
use super::statement::StatementEntry;
use super::status::{EmployerReceiptStatus, ReconciliationStatus, WorkerReceiptStatus};
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// Which numbered entity a generated number belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberKind {
    WorkerReceipt,
    EmployerReceipt,
    BoardReceipt,
    LedgerEntry,
}

/// Persistent store for every entity of the custody chain.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Opens a unit of work. The transaction is serializable with respect to
    /// every other transaction on the same store.
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>>;
}

/// A unit of work over the store.
///
/// Reads observe the transaction's own staged writes. Writes become visible
/// to others only on `commit`; dropping the transaction discards them.
#[async_trait]
pub trait LedgerTransaction: Send + Sync {
    async fn payment_record(&self, reference: &str) -> Result<Option<PaymentRecord>>;
    async fn payment_records_for_receipt(&self, receipt_number: &str)
    -> Result<Vec<PaymentRecord>>;
    async fn put_payment_record(&mut self, record: PaymentRecord) -> Result<()>;

    async fn worker_receipt(&self, receipt_number: &str) -> Result<Option<WorkerReceipt>>;
    async fn worker_receipts_by_status(
        &self,
        status: WorkerReceiptStatus,
    ) -> Result<Vec<WorkerReceipt>>;
    async fn put_worker_receipt(&mut self, receipt: WorkerReceipt) -> Result<()>;

    async fn employer_receipt(&self, receipt_number: &str) -> Result<Option<EmployerReceipt>>;
    async fn employer_receipt_for_worker(
        &self,
        worker_receipt_number: &str,
    ) -> Result<Option<EmployerReceipt>>;
    async fn employer_receipts_for_transaction(
        &self,
        transaction_reference: &str,
    ) -> Result<Vec<EmployerReceipt>>;
    async fn employer_receipts_by_status(
        &self,
        status: EmployerReceiptStatus,
    ) -> Result<Vec<EmployerReceipt>>;
    async fn put_employer_receipt(&mut self, receipt: EmployerReceipt) -> Result<()>;

    async fn reconciliation(
        &self,
        board_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>>;
    async fn reconciliation_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>>;
    async fn reconciliations_by_status(
        &self,
        status: ReconciliationStatus,
    ) -> Result<Vec<BoardReconciliationRecord>>;
    async fn reconciliations_by_user(
        &self,
        reconciled_by: &str,
    ) -> Result<Vec<BoardReconciliationRecord>>;
    async fn put_reconciliation(&mut self, record: BoardReconciliationRecord) -> Result<()>;

    async fn ledger_entry(&self, ledger_reference: &str) -> Result<Option<LedgerEntry>>;
    async fn ledger_entry_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<LedgerEntry>>;
    async fn put_ledger_entry(&mut self, entry: LedgerEntry) -> Result<()>;

    /// Whether `number` is already taken by an entity of `kind`.
    async fn number_in_use(&self, kind: NumberKind, number: &str) -> Result<bool>;

    /// Applies every staged write atomically.
    fn commit(self: Box<Self>) -> Result<()>;
}

/// Answers whether a reference/amount pair appears on the end-of-day statement.
#[async_trait]
pub trait StatementLookup: Send + Sync {
    async fn find(&self, reference: &str, amount: Decimal) -> Result<Option<StatementEntry>>;
}

/// Produces candidate receipt numbers. Uniqueness is checked by the caller.
pub trait ReceiptNumberGenerator: Send + Sync {
    fn generate(&self, prefix: &str) -> String;
}

pub type LedgerStoreBox = Box<dyn LedgerStore>;
pub type StatementLookupBox = Box<dyn StatementLookup>;
pub type NumberGeneratorBox = Box<dyn ReceiptNumberGenerator>;
