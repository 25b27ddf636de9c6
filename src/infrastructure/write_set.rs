//! Staged writes shared by the store backends.

use crate::domain::payment::PaymentRecord;
use crate::domain::receipt::{EmployerReceipt, WorkerReceipt};
use crate::domain::reconciliation::{BoardReconciliationRecord, LedgerEntry};
use std::collections::BTreeMap;

/// An entity addressed by a unique string key.
pub trait Keyed {
    fn key(&self) -> &str;
}

impl Keyed for PaymentRecord {
    fn key(&self) -> &str {
        &self.reference
    }
}

impl Keyed for WorkerReceipt {
    fn key(&self) -> &str {
        &self.receipt_number
    }
}

impl Keyed for EmployerReceipt {
    fn key(&self) -> &str {
        &self.receipt_number
    }
}

impl Keyed for BoardReconciliationRecord {
    fn key(&self) -> &str {
        &self.board_receipt_number
    }
}

impl Keyed for LedgerEntry {
    fn key(&self) -> &str {
        &self.ledger_reference
    }
}

/// One map per entity, keyed by the entity's unique number or reference.
///
/// Used both as committed state by the in-memory backend and as the staged
/// write set of an open transaction.
#[derive(Debug, Default, Clone)]
pub struct Tables {
    pub payment_records: BTreeMap<String, PaymentRecord>,
    pub worker_receipts: BTreeMap<String, WorkerReceipt>,
    pub employer_receipts: BTreeMap<String, EmployerReceipt>,
    pub reconciliations: BTreeMap<String, BoardReconciliationRecord>,
    pub ledger_entries: BTreeMap<String, LedgerEntry>,
}

impl Tables {
    /// Overwrites committed rows with `staged`.
    pub fn apply(&mut self, staged: Tables) {
        self.payment_records.extend(staged.payment_records);
        self.worker_receipts.extend(staged.worker_receipts);
        self.employer_receipts.extend(staged.employer_receipts);
        self.reconciliations.extend(staged.reconciliations);
        self.ledger_entries.extend(staged.ledger_entries);
    }

    pub fn len(&self) -> usize {
        self.payment_records.len()
            + self.worker_receipts.len()
            + self.employer_receipts.len()
            + self.reconciliations.len()
            + self.ledger_entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Stages `value` under its key.
pub fn stage<V: Keyed>(table: &mut BTreeMap<String, V>, value: V) {
    table.insert(value.key().to_string(), value);
}

/// Rows of `committed` and `staged` matching `predicate`, staged rows winning.
///
/// The result is ordered by key.
pub fn select<V, I, P>(committed: I, staged: &BTreeMap<String, V>, predicate: P) -> Vec<V>
where
    V: Keyed + Clone,
    I: IntoIterator<Item = V>,
    P: Fn(&V) -> bool,
{
    let mut rows: BTreeMap<String, V> = committed
        .into_iter()
        .filter(|row| !staged.contains_key(row.key()) && predicate(row))
        .map(|row| (row.key().to_string(), row))
        .collect();
    for row in staged.values().filter(|row| predicate(*row)) {
        rows.insert(row.key().to_string(), row.clone());
    }
    rows.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Amount;
    use crate::domain::status::PaymentStatus;
    use rust_decimal_macros::dec;

    fn record(reference: &str, receipt: Option<&str>) -> PaymentRecord {
        let mut record = PaymentRecord::new(reference, Amount::new(dec!(1.0)).unwrap()).unwrap();
        record.receipt_number = receipt.map(str::to_string);
        record
    }

    #[test]
    fn test_select_prefers_staged_rows() {
        let committed = vec![record("A", Some("R1")), record("B", Some("R1"))];
        let mut staged = BTreeMap::new();
        let mut moved = record("B", Some("R2"));
        moved.status = PaymentStatus::PaymentRequested;
        stage(&mut staged, moved);
        stage(&mut staged, record("C", Some("R1")));

        let in_r1 = select(committed, &staged, |r| {
            r.receipt_number.as_deref() == Some("R1")
        });
        let refs: Vec<_> = in_r1.iter().map(|r| r.reference.as_str()).collect();
        assert_eq!(refs, vec!["A", "C"]);
    }

    #[test]
    fn test_apply_overwrites() {
        let mut committed = Tables::default();
        assert!(committed.is_empty());
        stage(&mut committed.payment_records, record("A", None));

        let mut staged = Tables::default();
        stage(&mut staged.payment_records, record("A", Some("R1")));
        assert!(!staged.is_empty());
        committed.apply(staged);

        assert_eq!(committed.len(), 1);
        assert_eq!(
            committed.payment_records["A"].receipt_number.as_deref(),
            Some("R1")
        );
    }
}
