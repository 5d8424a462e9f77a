//! In-memory lead store: useful for testing and dry runs.

use async_trait::async_trait;
use leadline_core::error::StoreError;
use leadline_core::lead::{LeadProfile, LeadRecord};
use leadline_core::store::LeadStore;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// A lead store that keeps records in a Vec.
/// Nothing survives the process.
pub struct InMemoryLeadStore {
    records: Arc<RwLock<Vec<LeadRecord>>>,
}

impl InMemoryLeadStore {
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

impl Default for InMemoryLeadStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LeadStore for InMemoryLeadStore {
    fn name(&self) -> &str {
        "in_memory"
    }

    async fn load(&self) -> Result<Vec<LeadRecord>, StoreError> {
        Ok(self.records.read().await.clone())
    }

    async fn commit(&self, profile: &LeadProfile) -> Result<LeadRecord, StoreError> {
        let record = LeadRecord::snapshot(profile);
        let mut records = self.records.write().await;
        records.push(record.clone());
        info!(total = records.len(), "Lead committed (in memory)");
        Ok(record)
    }

    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.records.read().await.len())
    }
}
