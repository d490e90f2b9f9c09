//! In-memory dispatch store for dry runs and tests.

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::domain::DispatchRecord;
use crate::error::Result;
use crate::port::DispatchStore;

/// Keeps the last record in memory only.
#[derive(Default)]
pub struct MemoryDispatchStore {
    last: Mutex<Option<DispatchRecord>>,
}

impl MemoryDispatchStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DispatchStore for MemoryDispatchStore {
    async fn save(&self, record: &DispatchRecord) -> Result<()> {
        *self.last.lock() = Some(record.clone());
        Ok(())
    }

    async fn load(&self) -> Result<Option<DispatchRecord>> {
        Ok(self.last.lock().clone())
    }
}
