use crate::domain::settlement::SettlementResult;
use std::fmt;

const TITLE: &str = "PAYMENT PROCESSING REPORT";
const FOOTER: &str = "This is an auto-generated report for payment processing.";
const WIDTH: usize = 64;
const LABEL_WIDTH: usize = 30;

/// Fixed-layout text view of a settlement.
///
/// The output depends only on the wrapped result, so rendering the same
/// settlement twice yields identical text.
pub struct SettlementReport<'a>(pub &'a SettlementResult);

impl fmt::Display for SettlementReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let rule = "=".repeat(WIDTH);
        let processed_at = result.processed_at.format("%d-%m-%Y %H:%M:%S");

        writeln!(f, "{rule}")?;
        writeln!(f, "{TITLE:^WIDTH$}")?;
        writeln!(f, "{rule}")?;
        row(f, "Transaction Reference:", &result.transaction_reference)?;
        row(f, "Processed By:", &result.processed_by)?;
        row(f, "Processing Date:", processed_at)?;
        row(f, "Total Records Processed:", result.total_records)?;
        row(f, "Total Amount:", result.total_amount)?;
        row(f, "Status:", result.status.as_str())?;
        row(f, "Message:", &result.message)?;

        if !result.receipts.is_empty() {
            writeln!(f)?;
            section(f, "SETTLED RECEIPTS:")?;
            for receipt in &result.receipts {
                writeln!(
                    f,
                    "{:<22}{:<22}{:>20}",
                    receipt.employer_receipt_number,
                    receipt.board_receipt_number,
                    receipt.amount.to_string()
                )?;
            }
        }

        let statuses = &result.final_statuses;
        writeln!(f)?;
        section(f, "STATUS UPDATES COMPLETED:")?;
        row(f, "Employer Receipt Status:", statuses.employer_receipt.as_str())?;
        row(f, "Worker Receipt Status:", statuses.worker_receipt.as_str())?;
        row(f, "Worker Payment Status:", statuses.payment_records.as_str())?;
        row(f, "Board Receipt Status:", statuses.ledger_entry.as_str())?;

        writeln!(f, "{rule}")?;
        writeln!(f, "{FOOTER:^WIDTH$}")
    }
}

/// Renders a settlement as a fixed-layout text report.
pub fn render_settlement_report(result: &SettlementResult) -> String {
    SettlementReport(result).to_string()
}

fn section(f: &mut fmt::Formatter<'_>, heading: &str) -> fmt::Result {
    writeln!(f, "{heading}")?;
    writeln!(f, "{}", "-".repeat(WIDTH))
}

fn row(f: &mut fmt::Formatter<'_>, label: &str, value: impl fmt::Display) -> fmt::Result {
    writeln!(f, "{label:<LABEL_WIDTH$}{value}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::money::Money;
    use crate::domain::settlement::{FinalStatuses, SettledReceipt, SettlementStatus};
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn result() -> SettlementResult {
        SettlementResult {
            transaction_reference: "TXN-1".to_string(),
            processed_by: "checker-1".to_string(),
            processed_at: Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap(),
            total_amount: Money::new(dec!(400.00)).unwrap(),
            total_records: 1,
            status: SettlementStatus::Success,
            message: "Payment processing completed successfully".to_string(),
            receipts: vec![SettledReceipt {
                employer_receipt_number: "EMP-1".to_string(),
                worker_receipt_number: "RCP-1".to_string(),
                board_receipt_number: "BRD-1".to_string(),
                ledger_reference: Some("BRC-1".to_string()),
                amount: Money::new(dec!(400.00)).unwrap(),
                payment_records: 3,
            }],
            final_statuses: FinalStatuses::default(),
        }
    }

    #[test]
    fn test_report_layout() {
        let report = render_settlement_report(&result());

        assert!(report.contains(TITLE));
        assert!(report.contains("Transaction Reference:        TXN-1\n"));
        assert!(report.contains("Processing Date:              01-03-2024 09:30:00\n"));
        assert!(report.contains("Total Amount:                 400.00\n"));
        assert!(report.contains("Employer Receipt Status:      ACCEPTED\n"));
        assert!(report.contains("Worker Payment Status:        PAYMENT_PROCESSED\n"));
        assert!(report.contains("Board Receipt Status:         PROCESSED\n"));
        assert!(report.trim_end().ends_with(FOOTER));
    }

    #[test]
    fn test_report_is_deterministic() {
        let result = result();
        assert_eq!(
            render_settlement_report(&result),
            render_settlement_report(&result)
        );
    }

    #[test]
    fn test_receipt_rows_are_column_aligned() {
        let report = SettlementReport(&result()).to_string();
        let line = format!("{:<22}{:<22}{:>20}\n", "EMP-1", "BRD-1", "400.00");
        assert!(report.contains(&line));
        assert_eq!(report, render_settlement_report(&result()));
    }
}
