use super::parse_decimal;
use crate::domain::statement::StatementEntry;
use crate::error::{ReconError, Result};
use chrono::NaiveDate;
use serde::Deserialize;
use std::io::Read;

#[derive(Debug, Deserialize)]
struct StatementRow {
    reference: String,
    amount: String,
    #[serde(default)]
    value_date: Option<String>,
}

/// Reads end-of-day statement lines (`reference,amount[,value_date]`).
pub struct StatementReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> StatementReader<R> {
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    pub fn entries(self) -> impl Iterator<Item = Result<StatementEntry>> {
        self.reader.into_deserialize().map(|row| {
            let row: StatementRow = row.map_err(ReconError::from)?;
            let amount = parse_decimal(&row.amount, &row.reference)?;
            let value_date = match row.value_date.as_deref().map(str::trim) {
                None | Some("") => None,
                Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|e| {
                    ReconError::Validation(format!("invalid value date {raw:?}: {e}"))
                })?),
            };
            Ok(StatementEntry {
                value_date,
                ..StatementEntry::new(row.reference, amount)
            })
        })
    }
}
