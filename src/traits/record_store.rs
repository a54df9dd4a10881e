use async_trait::async_trait;

use crate::models::asset::AssetProgress;
use crate::models::TrackedAsset;

/// Durable, row-oriented store of tracked assets.
///
/// All operations are keyed by the `address` primary key; implementations
/// resolve key-to-row internally so callers never hold positional indices
/// across a read-modify-write window.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Append a new asset row. Does not check for an existing address;
    /// duplicate policy is the ingestion handler's concern.
    async fn append(&self, asset: &TrackedAsset) -> anyhow::Result<()>;

    /// Read every row in insertion order. Rows that fail to parse are
    /// skipped with a warning, never returned and never fatal.
    async fn read_all(&self) -> anyhow::Result<Vec<TrackedAsset>>;

    /// Whether any row exists for this address.
    async fn contains(&self, address: &str) -> anyhow::Result<bool>;

    /// Write back updated progress fields for an address. When duplicate
    /// rows share an address they share progress as well, which keeps the
    /// announce-once invariant per address.
    async fn update_progress(&self, address: &str, progress: &AssetProgress)
        -> anyhow::Result<()>;
}
