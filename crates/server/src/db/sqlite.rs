//! SQLite implementation of [`ResultStore`].
//!
//! `sqlx::migrate!("./migrations")` embeds the migration files at compile time,
//! relative to this crate's manifest. Runtime `sqlx::query` calls are used so no
//! `DATABASE_URL` is needed to build.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tracing::info;
use uuid::Uuid;

use finlens_core::record::{format_timestamp, parse_timestamp};
use finlens_core::{AnalysisRecord, AnalysisSummary};

use super::{ResultStore, StoreError};

const MAX_CONNECTIONS: u32 = 5;

type SummaryRow = (String, String, String, String);
type RecordRow = (String, String, String, String, String);

#[derive(Clone, Debug)]
pub struct SqliteStore {
    pool: SqlitePool,
    path: PathBuf,
}

impl SqliteStore {
    /// Pool over the database file at `path`. No connection is opened until first use.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let options = SqliteConnectOptions::new()
            .filename(&path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect_lazy_with(options);
        Self { pool, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn decode_err(msg: String) -> StoreError {
    StoreError::Storage(sqlx::Error::Decode(msg.into()))
}

fn parse_id(raw: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(raw).map_err(|e| decode_err(format!("bad id {raw:?}: {e}")))
}

fn parse_created_at(raw: &str) -> Result<chrono::DateTime<chrono::Utc>, StoreError> {
    parse_timestamp(raw).ok_or_else(|| decode_err(format!("bad created_at {raw:?}")))
}

#[async_trait]
impl ResultStore for SqliteStore {
    async fn init(&self) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir).await?;
        }
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!(path = %self.path.display(), "result store ready");
        Ok(())
    }

    async fn insert(&self, record: &AnalysisRecord) -> Result<(), StoreError> {
        sqlx::query(
            "INSERT INTO analyses (id, filename, query, analysis, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(record.id.to_string())
        .bind(&record.filename)
        .bind(&record.query)
        .bind(&record.analysis)
        .bind(format_timestamp(&record.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn list_recent(&self, limit: u32) -> Result<Vec<AnalysisSummary>, StoreError> {
        let rows: Vec<SummaryRow> = sqlx::query_as(
            "SELECT id, filename, query, created_at FROM analyses \
             ORDER BY created_at DESC, rowid DESC LIMIT ?1",
        )
        .bind(i64::from(limit))
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|(id, filename, query, created_at)| -> Result<AnalysisSummary, StoreError> {
                Ok(AnalysisSummary {
                    id: parse_id(&id)?,
                    filename,
                    query,
                    created_at: parse_created_at(&created_at)?,
                })
            })
            .collect()
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<AnalysisRecord>, StoreError> {
        let row: Option<RecordRow> = sqlx::query_as(
            "SELECT id, filename, query, analysis, created_at FROM analyses WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(|(id, filename, query, analysis, created_at)| -> Result<AnalysisRecord, StoreError> {
            Ok(AnalysisRecord {
                id: parse_id(&id)?,
                filename,
                query,
                analysis,
                created_at: parse_created_at(&created_at)?,
            })
        })
        .transpose()
    }

    async fn count(&self) -> Result<u64, StoreError> {
        let (n,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM analyses")
            .fetch_one(&self.pool)
            .await?;
        Ok(n.max(0) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    async fn store(dir: &Path) -> SqliteStore {
        let store = SqliteStore::open(dir.join("nested").join("results.db"));
        store.init().await.unwrap();
        store
    }

    fn record_at(name: &str, offset_secs: i64) -> AnalysisRecord {
        let mut record = AnalysisRecord::new(
            Uuid::new_v4(),
            format!("{name}.pdf"),
            "Summarize".to_string(),
            format!("analysis of {name}"),
        );
        record.created_at += Duration::seconds(offset_secs);
        record
    }

    #[tokio::test]
    async fn init_creates_file_and_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path()).await;
        assert!(store.path().exists());
        store.init().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn insert_then_get_roundtrips() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path()).await;
        let record = record_at("q3", 0);

        store.insert(&record).await.unwrap();
        let fetched = store.get_by_id(&record.id.to_string()).await.unwrap();
        assert_eq!(fetched, Some(record));
    }

    #[tokio::test]
    async fn unknown_id_is_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path()).await;
        store.insert(&record_at("a", 0)).await.unwrap();

        assert_eq!(store.get_by_id(&Uuid::new_v4().to_string()).await.unwrap(), None);
        assert_eq!(store.get_by_id("not-a-uuid").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_id_is_storage_error() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path()).await;
        let record = record_at("a", 0);
        store.insert(&record).await.unwrap();

        let err = store.insert(&record).await.unwrap_err();
        assert!(matches!(err, StoreError::Storage(_)));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn list_recent_is_newest_first_and_limited() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path()).await;
        let old = record_at("old", -120);
        let mid = record_at("mid", -60);
        let new = record_at("new", 0);
        for r in [&mid, &new, &old] {
            store.insert(r).await.unwrap();
        }

        let all = store.list_recent(20).await.unwrap();
        let names: Vec<_> = all.iter().map(|s| s.filename.as_str()).collect();
        assert_eq!(names, ["new.pdf", "mid.pdf", "old.pdf"]);
        assert!(all.windows(2).all(|w| w[0].created_at >= w[1].created_at));

        let two = store.list_recent(2).await.unwrap();
        assert_eq!(two.len(), 2);
        assert_eq!(two[0].id, new.id);

        assert!(store.list_recent(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn equal_timestamps_fall_back_to_insertion_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path()).await;
        let first = record_at("first", 0);
        let mut second = record_at("second", 0);
        second.created_at = first.created_at;
        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();

        let listed = store.list_recent(10).await.unwrap();
        assert_eq!(listed[0].id, second.id);
        assert_eq!(listed[1].id, first.id);
    }

    #[tokio::test]
    async fn empty_store_lists_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path()).await;
        assert!(store.list_recent(5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn offset_less_created_at_rows_still_load() {
        let tmp = tempfile::tempdir().unwrap();
        let store = store(tmp.path()).await;
        let id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO analyses (id, filename, query, analysis, created_at) \
             VALUES (?1, 'legacy.pdf', 'q', 'old analysis', '2024-01-02T03:04:05.678901')",
        )
        .bind(id.to_string())
        .execute(&store.pool)
        .await
        .unwrap();
        store.insert(&record_at("fresh", 0)).await.unwrap();

        let listed = store.list_recent(10).await.unwrap();
        assert_eq!(listed.len(), 2);
        let legacy = listed.iter().find(|s| s.id == id).unwrap();
        assert_eq!(format_timestamp(&legacy.created_at), "2024-01-02T03:04:05.678901Z");

        let fetched = store.get_by_id(&id.to_string()).await.unwrap().unwrap();
        assert_eq!(fetched.analysis, "old analysis");
    }

    #[tokio::test]
    async fn data_survives_reopen() {
        let tmp = tempfile::tempdir().unwrap();
        let record = record_at("kept", 0);
        {
            let store = store(tmp.path()).await;
            store.insert(&record).await.unwrap();
        }
        let reopened = store(tmp.path()).await;
        assert_eq!(reopened.count().await.unwrap(), 1);
        assert_eq!(reopened.list_recent(1).await.unwrap()[0].created_at, record.created_at);
        assert!(Utc::now() >= record.created_at);
    }
}
