use crate::config::NumberingScheme;
use crate::domain::ports::{NumberGeneratorBox, ReceiptNumberGenerator};
use chrono::Utc;
use rand::Rng;
use uuid::Uuid;

/// `PREFIX-YYYYMMDD-HHMMSS-NNN` with a random suffix in `100..=999`.
///
/// Two calls within the same second may collide; callers retry.
#[derive(Debug, Default, Clone, Copy)]
pub struct TimestampNumbers;

impl ReceiptNumberGenerator for TimestampNumbers {
    fn generate(&self, prefix: &str) -> String {
        let stamp = Utc::now().format("%Y%m%d-%H%M%S");
        let suffix: u16 = rand::thread_rng().gen_range(100..1000);
        format!("{prefix}-{stamp}-{suffix}")
    }
}

/// `PREFIX-<uuid v7>`.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidNumbers;

impl ReceiptNumberGenerator for UuidNumbers {
    fn generate(&self, prefix: &str) -> String {
        format!("{prefix}-{}", Uuid::now_v7())
    }
}

pub fn generator_for(scheme: NumberingScheme) -> NumberGeneratorBox {
    match scheme {
        NumberingScheme::Timestamp => Box::new(TimestampNumbers),
        NumberingScheme::Uuid => Box::new(UuidNumbers),
    }
}
