use super::batcher::ReceiptBatcher;
use super::finalizer::SettlementFinalizer;
use super::matcher::ReconciliationMatcher;
use super::numbering::Numbering;
use super::validator::EmployerValidator;
use crate::config::PipelineConfig;
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{LedgerStoreBox, StatementLookupBox};
use crate::domain::receipt::{EmployerReceipt, WorkerReceipt};
use crate::domain::reconciliation::{BoardReconciliationRecord, LedgerEntry};
use crate::domain::settlement::SettlementResult;
use crate::domain::status::{EmployerReceiptStatus, ReconciliationStatus, WorkerReceiptStatus};
use crate::error::Result;

/// The main entry point of the custody pipeline.
///
/// `ReconciliationEngine` owns the store and the statement lookup and exposes
/// one method per stage. Each call runs in its own unit of work; stages are
/// triggered independently by the caller.
pub struct ReconciliationEngine {
    store: LedgerStoreBox,
    statement: StatementLookupBox,
    batcher: ReceiptBatcher,
    validator: EmployerValidator,
    matcher: ReconciliationMatcher,
    finalizer: SettlementFinalizer,
}

impl ReconciliationEngine {
    /// Creates an engine whose numbering follows `config`.
    ///
    /// # Arguments
    ///
    /// * `store` - Persistent store for every custody entity.
    /// * `statement` - The end-of-day bank statement to reconcile against.
    pub fn new(store: LedgerStoreBox, statement: StatementLookupBox, config: &PipelineConfig) -> Self {
        Self::with_numbering(store, statement, Numbering::from_config(&config.numbering))
    }

    pub fn with_numbering(
        store: LedgerStoreBox,
        statement: StatementLookupBox,
        numbering: Numbering,
    ) -> Self {
        Self {
            store,
            statement,
            batcher: ReceiptBatcher::new(numbering.clone()),
            validator: EmployerValidator::new(numbering.clone()),
            matcher: ReconciliationMatcher::new(numbering),
            finalizer: SettlementFinalizer::new(),
        }
    }

    pub async fn create_receipt(&self, records: Vec<PaymentRecord>) -> Result<WorkerReceipt> {
        self.batcher.create_receipt(self.store.as_ref(), records).await
    }

    pub async fn validate(
        &self,
        worker_receipt_number: &str,
        transaction_reference: &str,
        validated_by: &str,
    ) -> Result<EmployerReceipt> {
        self.validator
            .validate(
                self.store.as_ref(),
                worker_receipt_number,
                transaction_reference,
                validated_by,
            )
            .await
    }

    pub async fn reconcile(
        &self,
        employer_receipt_number: &str,
        reconciled_by: &str,
    ) -> Result<BoardReconciliationRecord> {
        self.matcher
            .reconcile(
                self.store.as_ref(),
                self.statement.as_ref(),
                employer_receipt_number,
                reconciled_by,
            )
            .await
    }

    pub async fn process(
        &self,
        transaction_reference: &str,
        processed_by: &str,
    ) -> Result<SettlementResult> {
        self.finalizer
            .process(self.store.as_ref(), transaction_reference, processed_by)
            .await
    }

    pub async fn worker_receipt(&self, receipt_number: &str) -> Result<Option<WorkerReceipt>> {
        self.store.begin().await?.worker_receipt(receipt_number).await
    }

    pub async fn employer_receipt(&self, receipt_number: &str) -> Result<Option<EmployerReceipt>> {
        self.store.begin().await?.employer_receipt(receipt_number).await
    }

    pub async fn employer_receipt_for_worker(
        &self,
        worker_receipt_number: &str,
    ) -> Result<Option<EmployerReceipt>> {
        self.store
            .begin()
            .await?
            .employer_receipt_for_worker(worker_receipt_number)
            .await
    }

    pub async fn reconciliation_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>> {
        self.store
            .begin()
            .await?
            .reconciliation_for_employer(employer_receipt_number)
            .await
    }

    pub async fn ledger_entry_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<LedgerEntry>> {
        self.store
            .begin()
            .await?
            .ledger_entry_for_employer(employer_receipt_number)
            .await
    }

    pub async fn reconciliation(
        &self,
        board_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>> {
        self.store
            .begin()
            .await?
            .reconciliation(board_receipt_number)
            .await
    }

    pub async fn ledger_entry(&self, ledger_reference: &str) -> Result<Option<LedgerEntry>> {
        self.store.begin().await?.ledger_entry(ledger_reference).await
    }

    pub async fn worker_receipts_by_status(
        &self,
        status: WorkerReceiptStatus,
    ) -> Result<Vec<WorkerReceipt>> {
        self.store.begin().await?.worker_receipts_by_status(status).await
    }

    /// Worker receipts still waiting for employer validation.
    pub async fn available_worker_receipts(&self) -> Result<Vec<WorkerReceipt>> {
        self.worker_receipts_by_status(WorkerReceiptStatus::Generated)
            .await
    }

    pub async fn employer_receipts_by_status(
        &self,
        status: EmployerReceiptStatus,
    ) -> Result<Vec<EmployerReceipt>> {
        self.store
            .begin()
            .await?
            .employer_receipts_by_status(status)
            .await
    }

    /// Validated employer receipts with no board reconciliation record yet.
    pub async fn receipts_awaiting_reconciliation(&self) -> Result<Vec<EmployerReceipt>> {
        let tx = self.store.begin().await?;
        let mut pending = Vec::new();
        for receipt in tx
            .employer_receipts_by_status(EmployerReceiptStatus::Validated)
            .await?
        {
            if tx
                .reconciliation_for_employer(&receipt.receipt_number)
                .await?
                .is_none()
            {
                pending.push(receipt);
            }
        }
        Ok(pending)
    }

    pub async fn reconciliations_by_status(
        &self,
        status: ReconciliationStatus,
    ) -> Result<Vec<BoardReconciliationRecord>> {
        self.store
            .begin()
            .await?
            .reconciliations_by_status(status)
            .await
    }

    pub async fn reconciliations_by_user(
        &self,
        reconciled_by: &str,
    ) -> Result<Vec<BoardReconciliationRecord>> {
        self.store
            .begin()
            .await?
            .reconciliations_by_user(reconciled_by)
            .await
    }

    pub async fn payment_records_for_receipt(
        &self,
        receipt_number: &str,
    ) -> Result<Vec<PaymentRecord>> {
        self.store
            .begin()
            .await?
            .payment_records_for_receipt(receipt_number)
            .await
    }
}
