pub mod payment_reader;
pub mod statement_reader;

use crate::error::{ReconError, Result};
use rust_decimal::Decimal;
use std::str::FromStr;

/// Parses a CSV amount column without going through floating point.
fn parse_decimal(raw: &str, line: &str) -> Result<Decimal> {
    Decimal::from_str(raw.trim())
        .map_err(|e| ReconError::Validation(format!("invalid amount {raw:?} for {line}: {e}")))
}
