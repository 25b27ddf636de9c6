use super::write_set::{Keyed, Tables, select, stage};
use crate::domain::payment::PaymentRecord;
use crate::domain::ports::{LedgerStore, LedgerTransaction, NumberKind};
use crate::domain::receipt::{EmployerReceipt, WorkerReceipt};
use crate::domain::reconciliation::{BoardReconciliationRecord, LedgerEntry};
use crate::domain::status::{EmployerReceiptStatus, ReconciliationStatus, WorkerReceiptStatus};
use crate::error::{ReconError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

pub const CF_PAYMENT_RECORDS: &str = "payment_records";
pub const CF_WORKER_RECEIPTS: &str = "worker_receipts";
pub const CF_EMPLOYER_RECEIPTS: &str = "employer_receipts";
pub const CF_RECONCILIATIONS: &str = "reconciliations";
pub const CF_LEDGER_ENTRIES: &str = "ledger_entries";

const COLUMN_FAMILIES: [&str; 5] = [
    CF_PAYMENT_RECORDS,
    CF_WORKER_RECEIPTS,
    CF_EMPLOYER_RECEIPTS,
    CF_RECONCILIATIONS,
    CF_LEDGER_ENTRIES,
];

/// A persistent store implementation using RocksDB.
///
/// Each entity lives in its own column family, keyed by its unique number and
/// stored as JSON. A transaction stages its writes and commits them with a
/// single `WriteBatch`, so either every update of a stage lands or none does.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDbLedgerStore {
    db: Arc<DB>,
    writer: Arc<Mutex<()>>,
}

impl RocksDbLedgerStore {
    /// Opens or creates a RocksDB instance at the specified path, creating any
    /// missing column family.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = COLUMN_FAMILIES
            .iter()
            .map(|name| ColumnFamilyDescriptor::new(*name, Options::default()))
            .collect::<Vec<_>>();

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self {
            db: Arc::new(db),
            writer: Arc::new(Mutex::new(())),
        })
    }
}

#[async_trait]
impl LedgerStore for RocksDbLedgerStore {
    async fn begin(&self) -> Result<Box<dyn LedgerTransaction>> {
        let guard = self.writer.clone().lock_owned().await;
        Ok(Box::new(RocksDbTransaction {
            db: self.db.clone(),
            _guard: guard,
            staged: Tables::default(),
        }))
    }
}

pub struct RocksDbTransaction {
    db: Arc<DB>,
    _guard: OwnedMutexGuard<()>,
    staged: Tables,
}

impl RocksDbTransaction {
    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| ReconError::internal(format!("column family {name} not found")))
    }

    fn load<V: DeserializeOwned>(&self, cf: &str, key: &str) -> Result<Option<V>> {
        match self.db.get_cf(self.cf(cf)?, key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn scan<V: DeserializeOwned>(&self, cf: &str) -> Result<Vec<V>> {
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(self.cf(cf)?, IteratorMode::Start) {
            let (_key, value) = item?;
            rows.push(serde_json::from_slice(&value)?);
        }
        Ok(rows)
    }

    fn get<V>(&self, cf: &str, staged: &BTreeMap<String, V>, key: &str) -> Result<Option<V>>
    where
        V: DeserializeOwned + Clone,
    {
        match staged.get(key) {
            Some(row) => Ok(Some(row.clone())),
            None => self.load(cf, key),
        }
    }

    fn find<V, P>(&self, cf: &str, staged: &BTreeMap<String, V>, predicate: P) -> Result<Vec<V>>
    where
        V: DeserializeOwned + Keyed + Clone,
        P: Fn(&V) -> bool,
    {
        Ok(select(self.scan(cf)?, staged, predicate))
    }

    fn exists(&self, cf: &str, staged: bool, key: &str) -> Result<bool> {
        if staged {
            return Ok(true);
        }
        Ok(self.db.get_pinned_cf(self.cf(cf)?, key.as_bytes())?.is_some())
    }

    fn put_all<V: Serialize>(
        &self,
        batch: &mut WriteBatch,
        cf: &str,
        rows: &BTreeMap<String, V>,
    ) -> Result<()> {
        let handle = self.cf(cf)?;
        for (key, row) in rows {
            batch.put_cf(handle, key.as_bytes(), serde_json::to_vec(row)?);
        }
        Ok(())
    }
}

#[async_trait]
impl LedgerTransaction for RocksDbTransaction {
    async fn payment_record(&self, reference: &str) -> Result<Option<PaymentRecord>> {
        self.get(CF_PAYMENT_RECORDS, &self.staged.payment_records, reference)
    }

    async fn payment_records_for_receipt(
        &self,
        receipt_number: &str,
    ) -> Result<Vec<PaymentRecord>> {
        self.find(CF_PAYMENT_RECORDS, &self.staged.payment_records, |record| {
            record.receipt_number.as_deref() == Some(receipt_number)
        })
    }

    async fn put_payment_record(&mut self, record: PaymentRecord) -> Result<()> {
        stage(&mut self.staged.payment_records, record);
        Ok(())
    }

    async fn worker_receipt(&self, receipt_number: &str) -> Result<Option<WorkerReceipt>> {
        self.get(CF_WORKER_RECEIPTS, &self.staged.worker_receipts, receipt_number)
    }

    async fn worker_receipts_by_status(
        &self,
        status: WorkerReceiptStatus,
    ) -> Result<Vec<WorkerReceipt>> {
        self.find(CF_WORKER_RECEIPTS, &self.staged.worker_receipts, |receipt| {
            receipt.status == status
        })
    }

    async fn put_worker_receipt(&mut self, receipt: WorkerReceipt) -> Result<()> {
        stage(&mut self.staged.worker_receipts, receipt);
        Ok(())
    }

    async fn employer_receipt(&self, receipt_number: &str) -> Result<Option<EmployerReceipt>> {
        self.get(
            CF_EMPLOYER_RECEIPTS,
            &self.staged.employer_receipts,
            receipt_number,
        )
    }

    async fn employer_receipt_for_worker(
        &self,
        worker_receipt_number: &str,
    ) -> Result<Option<EmployerReceipt>> {
        let found = self.find(
            CF_EMPLOYER_RECEIPTS,
            &self.staged.employer_receipts,
            |receipt| receipt.worker_receipt_number == worker_receipt_number,
        )?;
        Ok(found.into_iter().next())
    }

    async fn employer_receipts_for_transaction(
        &self,
        transaction_reference: &str,
    ) -> Result<Vec<EmployerReceipt>> {
        self.find(
            CF_EMPLOYER_RECEIPTS,
            &self.staged.employer_receipts,
            |receipt| receipt.transaction_reference == transaction_reference,
        )
    }

    async fn employer_receipts_by_status(
        &self,
        status: EmployerReceiptStatus,
    ) -> Result<Vec<EmployerReceipt>> {
        self.find(
            CF_EMPLOYER_RECEIPTS,
            &self.staged.employer_receipts,
            |receipt| receipt.status == status,
        )
    }

    async fn put_employer_receipt(&mut self, receipt: EmployerReceipt) -> Result<()> {
        stage(&mut self.staged.employer_receipts, receipt);
        Ok(())
    }

    async fn reconciliation(
        &self,
        board_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>> {
        self.get(
            CF_RECONCILIATIONS,
            &self.staged.reconciliations,
            board_receipt_number,
        )
    }

    async fn reconciliation_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<BoardReconciliationRecord>> {
        let found = self.find(CF_RECONCILIATIONS, &self.staged.reconciliations, |record| {
            record.employer_receipt_number == employer_receipt_number
        })?;
        Ok(found.into_iter().next())
    }

    async fn reconciliations_by_status(
        &self,
        status: ReconciliationStatus,
    ) -> Result<Vec<BoardReconciliationRecord>> {
        self.find(CF_RECONCILIATIONS, &self.staged.reconciliations, |record| {
            record.status == status
        })
    }

    async fn reconciliations_by_user(
        &self,
        reconciled_by: &str,
    ) -> Result<Vec<BoardReconciliationRecord>> {
        self.find(CF_RECONCILIATIONS, &self.staged.reconciliations, |record| {
            record.reconciled_by == reconciled_by
        })
    }

    async fn put_reconciliation(&mut self, record: BoardReconciliationRecord) -> Result<()> {
        stage(&mut self.staged.reconciliations, record);
        Ok(())
    }

    async fn ledger_entry(&self, ledger_reference: &str) -> Result<Option<LedgerEntry>> {
        self.get(
            CF_LEDGER_ENTRIES,
            &self.staged.ledger_entries,
            ledger_reference,
        )
    }

    async fn ledger_entry_for_employer(
        &self,
        employer_receipt_number: &str,
    ) -> Result<Option<LedgerEntry>> {
        let found = self.find(CF_LEDGER_ENTRIES, &self.staged.ledger_entries, |entry| {
            entry.employer_receipt_number == employer_receipt_number
        })?;
        Ok(found.into_iter().next())
    }

    async fn put_ledger_entry(&mut self, entry: LedgerEntry) -> Result<()> {
        stage(&mut self.staged.ledger_entries, entry);
        Ok(())
    }

    async fn number_in_use(&self, kind: NumberKind, number: &str) -> Result<bool> {
        match kind {
            NumberKind::WorkerReceipt => self.exists(
                CF_WORKER_RECEIPTS,
                self.staged.worker_receipts.contains_key(number),
                number,
            ),
            NumberKind::EmployerReceipt => self.exists(
                CF_EMPLOYER_RECEIPTS,
                self.staged.employer_receipts.contains_key(number),
                number,
            ),
            NumberKind::BoardReceipt => self.exists(
                CF_RECONCILIATIONS,
                self.staged.reconciliations.contains_key(number),
                number,
            ),
            NumberKind::LedgerEntry => self.exists(
                CF_LEDGER_ENTRIES,
                self.staged.ledger_entries.contains_key(number),
                number,
            ),
        }
    }

    fn commit(self: Box<Self>) -> Result<()> {
        if self.staged.is_empty() {
            return Ok(());
        }
        let mut batch = WriteBatch::default();
        self.put_all(&mut batch, CF_PAYMENT_RECORDS, &self.staged.payment_records)?;
        self.put_all(&mut batch, CF_WORKER_RECEIPTS, &self.staged.worker_receipts)?;
        self.put_all(&mut batch, CF_EMPLOYER_RECEIPTS, &self.staged.employer_receipts)?;
        self.put_all(&mut batch, CF_RECONCILIATIONS, &self.staged.reconciliations)?;
        self.put_all(&mut batch, CF_LEDGER_ENTRIES, &self.staged.ledger_entries)?;

        debug!(writes = self.staged.len(), "committing write batch");
        self.db.write(batch)?;
        Ok(())
    }
}
