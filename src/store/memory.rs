//! In-memory record store for tests and demos.

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::error::TrackerError;
use crate::models::asset::AssetProgress;
use crate::models::TrackedAsset;
use crate::traits::record_store::RecordStore;

#[derive(Default)]
pub struct MemoryRecordStore {
    rows: Mutex<Vec<TrackedAsset>>,
}

impl MemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.rows.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.lock().await.is_empty()
    }
}

#[async_trait]
impl RecordStore for MemoryRecordStore {
    async fn append(&self, asset: &TrackedAsset) -> anyhow::Result<()> {
        self.rows.lock().await.push(asset.clone());
        Ok(())
    }

    async fn read_all(&self) -> anyhow::Result<Vec<TrackedAsset>> {
        Ok(self.rows.lock().await.clone())
    }

    async fn contains(&self, address: &str) -> anyhow::Result<bool> {
        Ok(self.rows.lock().await.iter().any(|a| a.address == address))
    }

    async fn update_progress(
        &self,
        address: &str,
        progress: &AssetProgress,
    ) -> anyhow::Result<()> {
        let mut rows = self.rows.lock().await;
        let mut updated = false;
        for row in rows.iter_mut().filter(|a| a.address == address) {
            row.apply_progress(progress);
            updated = true;
        }
        if !updated {
            return Err(TrackerError::StoreWriteConflict { address: address.to_string() }.into());
        }
        Ok(())
    }
}
