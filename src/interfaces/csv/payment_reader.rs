use super::parse_decimal;
use crate::domain::money::Amount;
use crate::domain::payment::PaymentRecord;
use crate::error::{ReconError, Result};
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct PaymentRow {
    reference: String,
    amount: String,
}

/// Reads validated payment records (`reference,amount`) from a CSV source.
///
/// Wraps `csv::Reader` with whitespace trimming and flexible record lengths,
/// yielding one `Result<PaymentRecord>` per row.
pub struct PaymentReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> PaymentReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Lazily deserializes rows; a malformed row yields an error without
    /// ending the stream.
    pub fn records(self) -> impl Iterator<Item = Result<PaymentRecord>> {
        self.reader.into_deserialize().map(|row| {
            let row: PaymentRow = row.map_err(ReconError::from)?;
            let amount = Amount::new(parse_decimal(&row.amount, &row.reference)?)?;
            PaymentRecord::new(row.reference, amount)
        })
    }
}
