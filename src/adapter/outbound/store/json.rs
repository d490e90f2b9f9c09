//! Last-dispatch record as a JSON file.
//!
//! Writes go to a sibling temp file that is then renamed over the target,
//! so readers never observe a half-written record.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::debug;

use crate::domain::DispatchRecord;
use crate::error::Result;
use crate::port::DispatchStore;

/// Single-record JSON file store.
pub struct JsonDispatchStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonDispatchStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_atomic(&self, json: &str) -> Result<()> {
        let _guard = self.write_lock.lock();

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = self.path.with_extension("tmp");
        let mut file = fs::File::create(&temp_path)?;

        let cleanup_and_err = |e| {
            let _ = fs::remove_file(&temp_path);
            e
        };

        file.write_all(json.as_bytes()).map_err(cleanup_and_err)?;
        file.sync_all().map_err(cleanup_and_err)?;
        fs::rename(&temp_path, &self.path).map_err(cleanup_and_err)?;
        Ok(())
    }
}

#[async_trait]
impl DispatchStore for JsonDispatchStore {
    async fn save(&self, record: &DispatchRecord) -> Result<()> {
        let json = serde_json::to_string_pretty(record)?;
        self.write_atomic(&json)?;
        debug!(path = %self.path.display(), strategy_hash = %record.strategy_hash, "Dispatch record saved");
        Ok(())
    }

    async fn load(&self) -> Result<Option<DispatchRecord>> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::{Address, Bytes, B256, U256};
    use chrono::Utc;

    fn record(incident: &str, salt: u8) -> DispatchRecord {
        DispatchRecord {
            maker: Address::repeat_byte(0xaa),
            token_in: Address::repeat_byte(0x01),
            token_out: Address::repeat_byte(0x02),
            strategy_tokens: vec![Address::repeat_byte(0x01), Address::repeat_byte(0x02)],
            program: Bytes::from_static(&[0x11, 0x00]),
            maker_traits: U256::ZERO,
            salt: B256::repeat_byte(salt),
            strategy_hash: B256::repeat_byte(0xcc),
            tx_hash: Some(B256::repeat_byte(0xdd)),
            amount_ld: U256::from(9_994),
            buffered_fee: U256::from(120),
            incident: incident.into(),
            dispatched_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn load_missing_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDispatchStore::new(dir.path().join("last.json"));
        assert!(store.load().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_then_load_returns_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDispatchStore::new(dir.path().join("nested/last.json"));

        let saved = record("INC-1", 1);
        store.save(&saved).await.unwrap();

        assert_eq!(store.load().await.unwrap(), Some(saved));
        assert!(!dir.path().join("nested/last.tmp").exists());
    }

    #[tokio::test]
    async fn last_write_wins() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonDispatchStore::new(dir.path().join("last.json"));

        store.save(&record("INC-1", 1)).await.unwrap();
        store.save(&record("INC-2", 2)).await.unwrap();

        let loaded = store.load().await.unwrap().unwrap();
        assert_eq!(loaded.incident, "INC-2");
        assert_eq!(loaded.salt, B256::repeat_byte(2));
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonDispatchStore::new(path);
        assert!(store.load().await.is_err());
    }
}
