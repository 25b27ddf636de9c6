use super::numbering::Numbering;
use crate::domain::money::Money;
use crate::domain::ports::{LedgerStore, NumberKind};
use crate::domain::receipt::EmployerReceipt;
use crate::domain::reconciliation::LedgerEntry;
use crate::domain::status::{
    EmployerReceiptStatus, LedgerStatus, PaymentStatus, WorkerReceiptStatus, advance,
};
use crate::error::{ReconError, Result, required};
use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

/// Second custody stage: the employer confirms a worker receipt against the
/// bank transaction reference they paid with.
#[derive(Clone)]
pub struct EmployerValidator {
    numbering: Numbering,
}

impl EmployerValidator {
    pub fn new(numbering: Numbering) -> Self {
        Self { numbering }
    }

    /// Creates the one employer receipt for `worker_receipt_number` and opens
    /// its settlement ledger entry.
    pub async fn validate(
        &self,
        store: &dyn LedgerStore,
        worker_receipt_number: &str,
        transaction_reference: &str,
        validated_by: &str,
    ) -> Result<EmployerReceipt> {
        let transaction_reference = required(transaction_reference, "transaction reference")?;
        let validated_by = required(validated_by, "validator identity")?;

        let mut tx = store.begin().await?;
        let mut worker = tx
            .worker_receipt(worker_receipt_number)
            .await?
            .ok_or_else(|| ReconError::not_found("worker receipt", worker_receipt_number))?;
        if tx
            .employer_receipt_for_worker(worker_receipt_number)
            .await?
            .is_some()
        {
            return Err(ReconError::AlreadyValidated(worker_receipt_number.to_string()));
        }

        let mut records = tx.payment_records_for_receipt(worker_receipt_number).await?;
        let batched: Money = records.iter().map(|r| r.amount).sum();
        worker.total_amount.ensure_matches(
            batched,
            format!("payment records of worker receipt {worker_receipt_number}"),
        )?;
        if records.len() != worker.total_records {
            return Err(ReconError::AmountMismatch {
                context: format!("record count of worker receipt {worker_receipt_number}"),
                expected: Decimal::from(worker.total_records),
                actual: Decimal::from(records.len()),
            });
        }

        advance(&mut worker.status, WorkerReceiptStatus::Validated)?;

        let receipt_number = self
            .numbering
            .allocate(tx.as_ref(), NumberKind::EmployerReceipt)
            .await?;
        let ledger_reference = self
            .numbering
            .allocate(tx.as_ref(), NumberKind::LedgerEntry)
            .await?;

        let now = Utc::now();
        let mut receipt = EmployerReceipt {
            receipt_number,
            worker_receipt_number: worker.receipt_number.clone(),
            transaction_reference: transaction_reference.to_string(),
            validated_by: validated_by.to_string(),
            validated_at: now,
            total_amount: worker.total_amount,
            total_records: worker.total_records,
            status: EmployerReceiptStatus::Pending,
        };
        advance(&mut receipt.status, EmployerReceiptStatus::Validated)?;

        let ledger = LedgerEntry {
            ledger_reference,
            employer_receipt_number: receipt.receipt_number.clone(),
            amount: receipt.total_amount,
            utr_number: receipt.transaction_reference.clone(),
            status: LedgerStatus::Pending,
            maker: validated_by.to_string(),
            checker: None,
            date: now.date_naive(),
        };

        for record in &mut records {
            if record.status == PaymentStatus::PaymentRequested {
                advance(&mut record.status, PaymentStatus::PaymentInitiated)?;
            }
        }
        for record in records {
            tx.put_payment_record(record).await?;
        }
        tx.put_worker_receipt(worker).await?;
        tx.put_employer_receipt(receipt.clone()).await?;
        tx.put_ledger_entry(ledger).await?;
        tx.commit()?;

        info!(
            employer_receipt = %receipt.receipt_number,
            worker_receipt = %receipt.worker_receipt_number,
            transaction_reference = %receipt.transaction_reference,
            "worker receipt validated"
        );
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::batcher::ReceiptBatcher;
    use crate::config::NumberingConfig;
    use crate::domain::money::Amount;
    use crate::domain::payment::PaymentRecord;
    use crate::domain::receipt::WorkerReceipt;
    use crate::infrastructure::in_memory::InMemoryLedgerStore;
    use rust_decimal_macros::dec;

    fn numbering() -> Numbering {
        Numbering::from_config(&NumberingConfig::default())
    }

    async fn batched(store: &InMemoryLedgerStore) -> WorkerReceipt {
        let records = vec![
            PaymentRecord::new("PAY-1", Amount::new(dec!(100.00)).unwrap()).unwrap(),
            PaymentRecord::new("PAY-2", Amount::new(dec!(300.00)).unwrap()).unwrap(),
        ];
        ReceiptBatcher::new(numbering())
            .create_receipt(store, records)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_validate_copies_totals_and_opens_ledger() {
        let store = InMemoryLedgerStore::new();
        let worker = batched(&store).await;

        let receipt = EmployerValidator::new(numbering())
            .validate(&store, &worker.receipt_number, "TXN-1", "employer-1")
            .await
            .unwrap();

        assert!(receipt.receipt_number.starts_with("EMP-"));
        assert_eq!(receipt.total_amount, worker.total_amount);
        assert_eq!(receipt.total_records, 2);
        assert_eq!(receipt.status, EmployerReceiptStatus::Validated);

        let tx = store.begin().await.unwrap();
        let worker = tx
            .worker_receipt(&worker.receipt_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(worker.status, WorkerReceiptStatus::Validated);

        let ledger = tx
            .ledger_entry_for_employer(&receipt.receipt_number)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(ledger.status, LedgerStatus::Pending);
        assert_eq!(ledger.utr_number, "TXN-1");
        assert_eq!(ledger.maker, "employer-1");

        let records = tx
            .payment_records_for_receipt(&worker.receipt_number)
            .await
            .unwrap();
        assert!(
            records
                .iter()
                .all(|r| r.status == PaymentStatus::PaymentInitiated)
        );
    }

    #[tokio::test]
    async fn test_validate_twice_is_rejected() {
        let store = InMemoryLedgerStore::new();
        let worker = batched(&store).await;
        let validator = EmployerValidator::new(numbering());

        validator
            .validate(&store, &worker.receipt_number, "TXN-1", "employer-1")
            .await
            .unwrap();
        let err = validator
            .validate(&store, &worker.receipt_number, "TXN-2", "employer-2")
            .await
            .unwrap_err();
        assert!(matches!(err, ReconError::AlreadyValidated(_)));
    }

    #[tokio::test]
    async fn test_validate_unknown_receipt() {
        let store = InMemoryLedgerStore::new();
        let err = EmployerValidator::new(numbering())
            .validate(&store, "RCP-MISSING", "TXN-1", "employer-1")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ReconError::NotFound {
                entity: "worker receipt",
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_validate_blank_reference() {
        let store = InMemoryLedgerStore::new();
        let worker = batched(&store).await;
        let err = EmployerValidator::new(numbering())
            .validate(&store, &worker.receipt_number, "  ", "employer-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ReconError::Validation(_)));
    }

    #[tokio::test]
    async fn test_validate_detects_broken_total() {
        let store = InMemoryLedgerStore::new();
        let worker = batched(&store).await;
        {
            let mut tx = store.begin().await.unwrap();
            let mut tampered = worker.clone();
            tampered.total_amount = Money::new(dec!(999)).unwrap();
            tx.put_worker_receipt(tampered).await.unwrap();
            tx.commit().unwrap();
        }

        let err = EmployerValidator::new(numbering())
            .validate(&store, &worker.receipt_number, "TXN-1", "employer-1")
            .await
            .unwrap_err();
        assert!(matches!(err, ReconError::AmountMismatch { .. }));

        let tx = store.begin().await.unwrap();
        assert!(
            tx.employer_receipt_for_worker(&worker.receipt_number)
                .await
                .unwrap()
                .is_none()
        );
    }
}
