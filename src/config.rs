use crate::domain::ports::NumberKind;
use crate::error::{ReconError, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NumberingScheme {
    /// `PREFIX-YYYYMMDD-HHMMSS-NNN` with a random three digit suffix.
    #[default]
    Timestamp,
    /// `PREFIX-<uuid v7>`.
    Uuid,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct NumberingConfig {
    pub scheme: NumberingScheme,
    pub max_attempts: u32,
    pub worker_prefix: String,
    pub employer_prefix: String,
    pub board_prefix: String,
    pub ledger_prefix: String,
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            scheme: NumberingScheme::Timestamp,
            max_attempts: 5,
            worker_prefix: "RCP".to_string(),
            employer_prefix: "EMP".to_string(),
            board_prefix: "BRD".to_string(),
            ledger_prefix: "BRC".to_string(),
        }
    }
}

impl NumberingConfig {
    pub fn prefix(&self, kind: NumberKind) -> &str {
        match kind {
            NumberKind::WorkerReceipt => &self.worker_prefix,
            NumberKind::EmployerReceipt => &self.employer_prefix,
            NumberKind::BoardReceipt => &self.board_prefix,
            NumberKind::LedgerEntry => &self.ledger_prefix,
        }
    }
}

/// Settings shared by every pipeline stage.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PipelineConfig {
    pub numbering: NumberingConfig,
}

impl PipelineConfig {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> Result<()> {
        if self.numbering.max_attempts == 0 {
            return Err(ReconError::Validation(
                "numbering.max_attempts must be at least 1".to_string(),
            ));
        }
        let prefixes = [
            &self.numbering.worker_prefix,
            &self.numbering.employer_prefix,
            &self.numbering.board_prefix,
            &self.numbering.ledger_prefix,
        ];
        if prefixes.iter().any(|p| p.trim().is_empty()) {
            return Err(ReconError::Validation(
                "numbering prefixes must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.numbering.scheme, NumberingScheme::Timestamp);
        assert_eq!(config.numbering.max_attempts, 5);
        assert_eq!(config.numbering.prefix(NumberKind::BoardReceipt), "BRD");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = PipelineConfig::from_toml_str(
            "[numbering]\nscheme = \"uuid\"\nmax_attempts = 2\n",
        )
        .unwrap();
        assert_eq!(config.numbering.scheme, NumberingScheme::Uuid);
        assert_eq!(config.numbering.max_attempts, 2);
        assert_eq!(config.numbering.worker_prefix, "RCP");
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = PipelineConfig::from_toml_str("[numbering]\nmax_attempts = 0\n");
        assert!(matches!(result, Err(ReconError::Validation(_))));
    }

    #[test]
    fn test_unknown_scheme_rejected() {
        let result = PipelineConfig::from_toml_str("[numbering]\nscheme = \"random\"\n");
        assert!(matches!(result, Err(ReconError::Config(_))));
    }
}
