use crate::config::NumberingConfig;
use crate::domain::ports::{LedgerTransaction, NumberGeneratorBox, NumberKind, ReceiptNumberGenerator};
use crate::error::{ReconError, Result};
use crate::infrastructure::numbering::generator_for;
use std::sync::Arc;
use tracing::debug;

/// Allocates receipt numbers that are unique within the store.
///
/// Candidates come from the configured generator and are checked against the
/// open transaction; a taken number is retried up to `max_attempts` times.
#[derive(Clone)]
pub struct Numbering {
    generator: Arc<dyn ReceiptNumberGenerator>,
    config: NumberingConfig,
}

impl Numbering {
    pub fn new(generator: NumberGeneratorBox, config: NumberingConfig) -> Self {
        Self {
            generator: Arc::from(generator),
            config,
        }
    }

    pub fn from_config(config: &NumberingConfig) -> Self {
        Self::new(generator_for(config.scheme), config.clone())
    }

    pub async fn allocate(&self, tx: &dyn LedgerTransaction, kind: NumberKind) -> Result<String> {
        let prefix = self.config.prefix(kind);
        for attempt in 1..=self.config.max_attempts {
            let candidate = self.generator.generate(prefix);
            if !tx.number_in_use(kind, &candidate).await? {
                return Ok(candidate);
            }
            debug!(%candidate, attempt, "receipt number collision, retrying");
        }
        Err(ReconError::NumberGenerationExhausted {
            prefix: prefix.to_string(),
            attempts: self.config.max_attempts,
        })
    }
}
