//! Announcement ingestion.
//!
//! Reactive: each inbound raw-text event is parsed and, when it carries the
//! minimum required fields, appended to the record store with default
//! progress so the tracking loop picks it up on its next cycle.

use std::sync::Arc;

use tokio::io::AsyncReadExt;
use tokio::net::UnixListener;
use tracing::{error, info, warn};

use crate::config::DuplicatePolicy;
use crate::models::TrackedAsset;
use crate::parse::extract_announcement;
use crate::traits::record_store::RecordStore;

pub struct IngestionHandler {
    store: Arc<dyn RecordStore>,
    default_chain: String,
    duplicate_policy: DuplicatePolicy,
}

impl IngestionHandler {
    pub fn new(
        store: Arc<dyn RecordStore>,
        default_chain: impl Into<String>,
        duplicate_policy: DuplicatePolicy,
    ) -> Self {
        Self { store, default_chain: default_chain.into(), duplicate_policy }
    }

    /// Handle one raw announcement. Returns the appended asset, or `None`
    /// when the event was dropped (unparseable or duplicate-skipped).
    pub async fn handle_raw(&self, text: &str) -> anyhow::Result<Option<TrackedAsset>> {
        let Some(announcement) = extract_announcement(text, &self.default_chain) else {
            warn!("dropping announcement without address/symbol");
            return Ok(None);
        };

        if self.duplicate_policy == DuplicatePolicy::Skip
            && self.store.contains(&announcement.address).await?
        {
            info!(
                address = %announcement.address,
                symbol = %announcement.symbol,
                "already tracked, skipping duplicate announcement"
            );
            return Ok(None);
        }

        let asset = TrackedAsset::new(
            announcement.address,
            announcement.symbol,
            announcement.chain,
            announcement.baseline_value,
        );
        self.store.append(&asset).await?;
        info!(address = %asset.address, symbol = %asset.symbol, "tracking new asset");
        Ok(Some(asset))
    }

    /// Accept raw announcement text on a Unix socket, one event per
    /// connection, for the lifetime of the process.
    pub async fn listen_unix(&self, socket_path: &str) -> anyhow::Result<()> {
        // A stale socket file from a previous run blocks the bind.
        let _ = std::fs::remove_file(socket_path);
        let listener = UnixListener::bind(socket_path)?;
        info!(socket = %socket_path, "listening for announcements");

        loop {
            match listener.accept().await {
                Ok((mut stream, _)) => {
                    let mut text = String::new();
                    if let Err(e) = stream.read_to_string(&mut text).await {
                        warn!("failed to read announcement: {e}");
                        continue;
                    }
                    if let Err(e) = self.handle_raw(&text).await {
                        error!("failed to ingest announcement: {e:#}");
                    }
                }
                Err(e) => warn!("accept failed on ingest socket: {e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;

    const SAMPLE: &str = "\
New Call ($WIF) on #SOL\n\
├ MC: $48.5K\n\
└ CA: JUPyiwrYJFskUPiHa7hkeR8VUtAeFoSYbKedZNsDvCN";

    fn handler(policy: DuplicatePolicy) -> (IngestionHandler, Arc<MemoryRecordStore>) {
        let store = Arc::new(MemoryRecordStore::new());
        let handler = IngestionHandler::new(store.clone(), "solana", policy);
        (handler, store)
    }

    #[tokio::test]
    async fn appends_parsed_announcement_with_default_progress() {
        let (handler, store) = handler(DuplicatePolicy::Skip);
        let asset = handler.handle_raw(SAMPLE).await.unwrap().unwrap();
        assert_eq!(asset.symbol, "WIF");
        assert_eq!(asset.baseline_value, 48_500.0);
        assert_eq!(asset.all_time_high, 0.0);
        assert_eq!(asset.last_announced_multiple, 1.0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn missing_address_appends_nothing() {
        let (handler, store) = handler(DuplicatePolicy::Skip);
        let result = handler.handle_raw("New Call ($WIF) MC: $48.5K").await.unwrap();
        assert!(result.is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn skip_policy_drops_duplicates() {
        let (handler, store) = handler(DuplicatePolicy::Skip);
        handler.handle_raw(SAMPLE).await.unwrap();
        let second = handler.handle_raw(SAMPLE).await.unwrap();
        assert!(second.is_none());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn append_policy_keeps_duplicates() {
        let (handler, store) = handler(DuplicatePolicy::Append);
        handler.handle_raw(SAMPLE).await.unwrap();
        handler.handle_raw(SAMPLE).await.unwrap();
        assert_eq!(store.len().await, 2);
    }
}
