//! Status lifecycles for every entity in the custody chain.
//!
//! Statuses only move forward. Intermediate states may be skipped, but a
//! status never returns to an earlier one and terminal states never change.

use crate::error::{ReconError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A status with a forward-only lifecycle.
pub trait Lifecycle: Copy + PartialEq + fmt::Display {
    /// Entity name used in transition errors.
    const ENTITY: &'static str;

    fn can_advance_to(self, next: Self) -> bool;
}

/// Moves `current` to `next`, rejecting backward or terminal transitions.
pub fn advance<S: Lifecycle>(current: &mut S, next: S) -> Result<()> {
    if current.can_advance_to(next) {
        *current = next;
        Ok(())
    } else {
        Err(ReconError::InvalidTransition {
            entity: S::ENTITY,
            from: current.to_string(),
            to: next.to_string(),
        })
    }
}

macro_rules! status_display {
    ($ty:ty { $($variant:ident => $text:literal),+ $(,)? }) => {
        impl $ty {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Uploaded,
    Validated,
    PaymentRequested,
    PaymentInitiated,
    PaymentProcessed,
    PaymentReconciled,
    Error,
}

status_display!(PaymentStatus {
    Uploaded => "UPLOADED",
    Validated => "VALIDATED",
    PaymentRequested => "PAYMENT_REQUESTED",
    PaymentInitiated => "PAYMENT_INITIATED",
    PaymentProcessed => "PAYMENT_PROCESSED",
    PaymentReconciled => "PAYMENT_RECONCILED",
    Error => "ERROR",
});

impl PaymentStatus {
    fn rank(self) -> Option<u8> {
        match self {
            Self::Uploaded => Some(0),
            Self::Validated => Some(1),
            Self::PaymentRequested => Some(2),
            Self::PaymentInitiated => Some(3),
            Self::PaymentProcessed => Some(4),
            Self::PaymentReconciled => Some(5),
            Self::Error => None,
        }
    }
}

impl Lifecycle for PaymentStatus {
    const ENTITY: &'static str = "payment record";

    fn can_advance_to(self, next: Self) -> bool {
        match (self.rank(), next.rank()) {
            (None, _) => false,
            // ERROR is reachable from every state that has not completed.
            (Some(from), None) => from < 5,
            (Some(from), Some(to)) => to > from,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WorkerReceiptStatus {
    #[default]
    Generated,
    Validated,
    PaymentInitiated,
    PaymentProcessed,
}

status_display!(WorkerReceiptStatus {
    Generated => "GENERATED",
    Validated => "VALIDATED",
    PaymentInitiated => "PAYMENT_INITIATED",
    PaymentProcessed => "PAYMENT_PROCESSED",
});

impl Lifecycle for WorkerReceiptStatus {
    const ENTITY: &'static str = "worker receipt";

    fn can_advance_to(self, next: Self) -> bool {
        (next as u8) > (self as u8)
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EmployerReceiptStatus {
    #[default]
    Pending,
    Validated,
    Accepted,
}

status_display!(EmployerReceiptStatus {
    Pending => "PENDING",
    Validated => "VALIDATED",
    Accepted => "ACCEPTED",
});

impl Lifecycle for EmployerReceiptStatus {
    const ENTITY: &'static str = "employer receipt";

    fn can_advance_to(self, next: Self) -> bool {
        (next as u8) > (self as u8)
    }
}

/// Outcome of matching an employer receipt against the bank statement.
/// Both values are terminal.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReconciliationStatus {
    Reconciled,
    Failed,
}

status_display!(ReconciliationStatus {
    Reconciled => "RECONCILED",
    Failed => "FAILED",
});

impl Lifecycle for ReconciliationStatus {
    const ENTITY: &'static str = "board reconciliation record";

    fn can_advance_to(self, _next: Self) -> bool {
        false
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LedgerStatus {
    #[default]
    Pending,
    Processed,
}

status_display!(LedgerStatus {
    Pending => "PENDING",
    Processed => "PROCESSED",
});

impl Lifecycle for LedgerStatus {
    const ENTITY: &'static str = "settlement ledger entry";

    fn can_advance_to(self, next: Self) -> bool {
        (next as u8) > (self as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_status_moves_forward_only() {
        let mut status = PaymentStatus::Validated;
        advance(&mut status, PaymentStatus::PaymentRequested).unwrap();
        advance(&mut status, PaymentStatus::PaymentProcessed).unwrap();
        assert_eq!(status, PaymentStatus::PaymentProcessed);

        let err = advance(&mut status, PaymentStatus::PaymentInitiated).unwrap_err();
        assert!(matches!(err, ReconError::InvalidTransition { .. }));
        assert_eq!(status, PaymentStatus::PaymentProcessed);
    }

    #[test]
    fn test_payment_error_is_terminal() {
        let mut status = PaymentStatus::PaymentRequested;
        advance(&mut status, PaymentStatus::Error).unwrap();
        assert!(advance(&mut status, PaymentStatus::PaymentInitiated).is_err());
        assert!(advance(&mut status, PaymentStatus::Error).is_err());
    }

    #[test]
    fn test_same_status_is_not_an_advance() {
        let mut status = EmployerReceiptStatus::Accepted;
        assert!(advance(&mut status, EmployerReceiptStatus::Accepted).is_err());
    }

    #[test]
    fn test_reconciliation_status_is_terminal() {
        let mut status = ReconciliationStatus::Failed;
        assert!(advance(&mut status, ReconciliationStatus::Reconciled).is_err());
    }

    #[test]
    fn test_status_serialization() {
        let json = serde_json::to_string(&PaymentStatus::PaymentRequested).unwrap();
        assert_eq!(json, "\"PAYMENT_REQUESTED\"");
        let parsed: WorkerReceiptStatus = serde_json::from_str("\"PAYMENT_PROCESSED\"").unwrap();
        assert_eq!(parsed, WorkerReceiptStatus::PaymentProcessed);
        assert_eq!(LedgerStatus::Processed.to_string(), "PROCESSED");
    }
}
