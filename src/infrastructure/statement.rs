use crate::domain::ports::StatementLookup;
use crate::domain::statement::StatementEntry;
use crate::error::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;

/// An end-of-day statement held in memory.
#[derive(Debug, Default, Clone)]
pub struct InMemoryStatement {
    entries: Vec<StatementEntry>,
}

impl InMemoryStatement {
    pub fn new(entries: Vec<StatementEntry>) -> Self {
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<StatementEntry> for InMemoryStatement {
    fn from_iter<I: IntoIterator<Item = StatementEntry>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl StatementLookup for InMemoryStatement {
    async fn find(&self, reference: &str, amount: Decimal) -> Result<Option<StatementEntry>> {
        Ok(self
            .entries
            .iter()
            .find(|entry| entry.matches(reference, amount))
            .cloned())
    }
}
