//! Sqlite-backed record store.
//!
//! Progress fields are stored as TEXT in the same stable encoding the rest
//! of the system uses, so a written row re-reads to exactly the values the
//! tracking loop continues with. Rows keep insertion order via the rowid.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection};
use tracing::warn;

use crate::error::TrackerError;
use crate::models::asset::{encode_numeric, AssetProgress};
use crate::models::TrackedAsset;
use crate::traits::record_store::RecordStore;

pub struct SqliteRecordStore {
    conn: Mutex<Connection>,
}

impl SqliteRecordStore {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    pub fn open_in_memory() -> anyhow::Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> anyhow::Result<Self> {
        conn.execute(
            r#"
            CREATE TABLE IF NOT EXISTS tracked_assets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                address TEXT NOT NULL,
                symbol TEXT NOT NULL,
                chain TEXT NOT NULL,
                baseline_value TEXT NOT NULL,
                last_multiple_reached TEXT NOT NULL,
                all_time_high TEXT NOT NULL,
                last_announced_multiple TEXT NOT NULL,
                created_at INTEGER NOT NULL
            )
            "#,
            [],
        )?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn lock(&self) -> anyhow::Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| anyhow::anyhow!("record store mutex poisoned"))
    }
}

#[async_trait]
impl RecordStore for SqliteRecordStore {
    async fn append(&self, asset: &TrackedAsset) -> anyhow::Result<()> {
        let row = asset.to_row();
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO tracked_assets
                (address, symbol, chain, baseline_value,
                 last_multiple_reached, all_time_high, last_announced_multiple,
                 created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
            params![
                row[0],
                row[1],
                row[2],
                row[3],
                row[4],
                row[5],
                row[6],
                chrono::Utc::now().timestamp(),
            ],
        )?;
        Ok(())
    }

    async fn read_all(&self) -> anyhow::Result<Vec<TrackedAsset>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT address, symbol, chain, baseline_value,
                   last_multiple_reached, all_time_high, last_announced_multiple
            FROM tracked_assets
            ORDER BY id
            "#,
        )?;

        let rows = stmt.query_map([], |row| {
            let mut fields = Vec::with_capacity(7);
            for i in 0..7 {
                fields.push(row.get::<_, String>(i)?);
            }
            Ok(fields)
        })?;

        let mut assets = Vec::new();
        for row in rows {
            let fields = row?;
            match TrackedAsset::from_row(&fields) {
                Ok(asset) => assets.push(asset),
                Err(e) => warn!("skipping malformed asset row: {e:#}"),
            }
        }
        Ok(assets)
    }

    async fn contains(&self, address: &str) -> anyhow::Result<bool> {
        let conn = self.lock()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM tracked_assets WHERE address = ?1",
            params![address],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    async fn update_progress(
        &self,
        address: &str,
        progress: &AssetProgress,
    ) -> anyhow::Result<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            r#"
            UPDATE tracked_assets
            SET last_multiple_reached = ?1,
                all_time_high = ?2,
                last_announced_multiple = ?3
            WHERE address = ?4
            "#,
            params![
                encode_numeric(progress.last_multiple_reached),
                encode_numeric(progress.all_time_high),
                encode_numeric(progress.last_announced_multiple),
                address,
            ],
        )?;

        if updated == 0 {
            return Err(TrackerError::StoreWriteConflict { address: address.to_string() }.into());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn append_and_read_round_trip() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        let asset = TrackedAsset::new("addr1", "TKN", "solana", 42_000.0);
        store.append(&asset).await.unwrap();

        let all = store.read_all().await.unwrap();
        assert_eq!(all, vec![asset]);
    }

    #[tokio::test]
    async fn read_preserves_insertion_order() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        for i in 0..5 {
            let asset = TrackedAsset::new(format!("addr{i}"), "TKN", "solana", 1_000.0);
            store.append(&asset).await.unwrap();
        }
        let all = store.read_all().await.unwrap();
        let addresses: Vec<&str> = all.iter().map(|a| a.address.as_str()).collect();
        assert_eq!(addresses, vec!["addr0", "addr1", "addr2", "addr3", "addr4"]);
    }

    #[tokio::test]
    async fn update_progress_by_address_round_trips() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        store
            .append(&TrackedAsset::new("addr1", "TKN", "solana", 1_000.0))
            .await
            .unwrap();

        let progress = AssetProgress {
            all_time_high: 3_200.55,
            last_multiple_reached: 3.2,
            last_announced_multiple: 3.2,
        }
        .normalized();
        store.update_progress("addr1", &progress).await.unwrap();

        let all = store.read_all().await.unwrap();
        assert_eq!(all[0].progress(), progress);
    }

    #[tokio::test]
    async fn update_unknown_address_is_a_conflict() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        let progress = AssetProgress {
            all_time_high: 1.0,
            last_multiple_reached: 1.0,
            last_announced_multiple: 1.0,
        };
        let err = store.update_progress("missing", &progress).await.unwrap_err();
        assert!(err.downcast_ref::<TrackerError>().is_some());
    }

    #[tokio::test]
    async fn contains_sees_appended_rows() {
        let store = SqliteRecordStore::open_in_memory().unwrap();
        assert!(!store.contains("addr1").await.unwrap());
        store
            .append(&TrackedAsset::new("addr1", "TKN", "solana", 1_000.0))
            .await
            .unwrap();
        assert!(store.contains("addr1").await.unwrap());
    }

    #[tokio::test]
    async fn reopening_a_file_store_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("milestones.db");

        {
            let store = SqliteRecordStore::open(&path).unwrap();
            store
                .append(&TrackedAsset::new("addr1", "TKN", "solana", 1_000.0))
                .await
                .unwrap();
        }

        let store = SqliteRecordStore::open(&path).unwrap();
        assert_eq!(store.read_all().await.unwrap().len(), 1);
    }
}
