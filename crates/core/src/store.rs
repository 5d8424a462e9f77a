//! LeadStore trait: the append-only lead collection.
//!
//! Records are only ever appended; insertion order is commit order and no
//! record is changed or removed afterwards.
//!
//! Implementations: JSON file (durable), in-memory (tests, ephemeral runs).

use async_trait::async_trait;

use crate::error::StoreError;
use crate::lead::{LeadProfile, LeadRecord};

/// The core LeadStore trait.
///
/// `commit` must be safe to call concurrently from many sessions: each
/// read-modify-write cycle is serialized so no append is lost.
#[async_trait]
pub trait LeadStore: Send + Sync {
    /// The backend name (e.g., "json_file", "in_memory").
    fn name(&self) -> &str;

    /// Read every committed record, in commit order.
    async fn load(&self) -> Result<Vec<LeadRecord>, StoreError>;

    /// Snapshot the profile with the current time and append it.
    ///
    /// Qualification is not checked here; callers decide whether partial
    /// leads are worth keeping.
    async fn commit(&self, profile: &LeadProfile) -> Result<LeadRecord, StoreError>;

    /// Number of committed records.
    async fn count(&self) -> Result<usize, StoreError> {
        Ok(self.load().await?.len())
    }
}
