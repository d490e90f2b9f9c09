//! Persistence port for the last dispatch.

use async_trait::async_trait;

use crate::domain::DispatchRecord;
use crate::error::Result;

/// Single-slot store: each save replaces the previous record.
#[async_trait]
pub trait DispatchStore: Send + Sync {
    /// Save `record`, replacing any previous one.
    async fn save(&self, record: &DispatchRecord) -> Result<()>;

    /// Load the last saved record, if any.
    async fn load(&self) -> Result<Option<DispatchRecord>>;
}
