use miette::Diagnostic;
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the reconciliation pipeline and its adapters.
///
/// A FAILED reconciliation is not an error: it is returned as data on the
/// board reconciliation record.
#[derive(Error, Diagnostic, Debug)]
pub enum ReconError {
    #[error("{entity} not found: {key}")]
    #[diagnostic(code(paytrail::not_found))]
    NotFound { entity: &'static str, key: String },

    #[error("worker receipt already validated: {0}")]
    #[diagnostic(code(paytrail::already_validated))]
    AlreadyValidated(String),

    #[error("employer receipt already reconciled: {0}")]
    #[diagnostic(code(paytrail::already_reconciled))]
    AlreadyReconciled(String),

    #[error("payment record already batched: {0}")]
    #[diagnostic(code(paytrail::already_batched))]
    AlreadyBatched(String),

    #[error("transaction reference already settled: {0}")]
    #[diagnostic(code(paytrail::already_settled))]
    AlreadySettled(String),

    #[error("cannot create a receipt from an empty batch")]
    #[diagnostic(code(paytrail::empty_batch))]
    EmptyBatch,

    #[error("amount mismatch for {context}: expected {expected}, found {actual}")]
    #[diagnostic(code(paytrail::amount_mismatch))]
    AmountMismatch {
        context: String,
        expected: Decimal,
        actual: Decimal,
    },

    #[error("could not allocate a unique {prefix} number after {attempts} attempts")]
    #[diagnostic(code(paytrail::numbering_exhausted))]
    NumberGenerationExhausted { prefix: String, attempts: u32 },

    #[error("invalid {entity} status transition: {from} -> {to}")]
    #[diagnostic(code(paytrail::invalid_transition))]
    InvalidTransition {
        entity: &'static str,
        from: String,
        to: String,
    },

    #[error("validation error: {0}")]
    #[diagnostic(code(paytrail::validation))]
    Validation(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(#[from] toml::de::Error),

    #[cfg(feature = "storage-rocksdb")]
    #[error("storage error: {0}")]
    Storage(#[from] rocksdb::Error),

    #[error("internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification callers translate into transport responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Conflict,
    InvalidInput,
    Internal,
}

impl ReconError {
    pub fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into().into())
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound { .. } => ErrorKind::NotFound,
            Self::AlreadyValidated(_)
            | Self::AlreadyReconciled(_)
            | Self::AlreadyBatched(_)
            | Self::AlreadySettled(_)
            | Self::InvalidTransition { .. } => ErrorKind::Conflict,
            Self::EmptyBatch | Self::Validation(_) | Self::Csv(_) | Self::Config(_) => {
                ErrorKind::InvalidInput
            }
            Self::AmountMismatch { .. }
            | Self::NumberGenerationExhausted { .. }
            | Self::Io(_)
            | Self::Serialization(_)
            | Self::Internal(_) => ErrorKind::Internal,
            #[cfg(feature = "storage-rocksdb")]
            Self::Storage(_) => ErrorKind::Internal,
        }
    }
}

pub type Result<T> = std::result::Result<T, ReconError>;

/// Trims `value`, failing with `Validation` when nothing is left.
pub fn required<'a>(value: &'a str, what: &str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(ReconError::Validation(format!("{what} must not be blank")))
    } else {
        Ok(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind_classification() {
        assert_eq!(
            ReconError::not_found("worker receipt", "RCP-1").kind(),
            ErrorKind::NotFound
        );
        assert_eq!(
            ReconError::AlreadyValidated("RCP-1".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(
            ReconError::AlreadyReconciled("EMP-1".into()).kind(),
            ErrorKind::Conflict
        );
        assert_eq!(ReconError::EmptyBatch.kind(), ErrorKind::InvalidInput);
        assert_eq!(
            ReconError::NumberGenerationExhausted {
                prefix: "RCP".into(),
                attempts: 3
            }
            .kind(),
            ErrorKind::Internal
        );
    }

    #[test]
    fn test_required_trims_and_rejects_blank() {
        assert_eq!(required(" TXN-1 ", "reference").unwrap(), "TXN-1");
        assert!(matches!(
            required(" \t", "reference"),
            Err(ReconError::Validation(_))
        ));
    }

    #[test]
    fn test_core_errors_carry_codes() {
        use miette::Diagnostic;
        let errors = [
            ReconError::AlreadyBatched("PAY-1".into()),
            ReconError::AlreadySettled("TXN-1".into()),
            ReconError::Validation("blank".into()),
            ReconError::InvalidTransition {
                entity: "payment record",
                from: "ERROR".into(),
                to: "PAYMENT_PROCESSED".into(),
            },
        ];
        for err in errors {
            assert!(err.code().is_some(), "{err} has no code");
        }
    }

    #[test]
    fn test_not_found_message() {
        let err = ReconError::not_found("employer receipt", "EMP-42");
        assert_eq!(err.to_string(), "employer receipt not found: EMP-42");
    }
}
