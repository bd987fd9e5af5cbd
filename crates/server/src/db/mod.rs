//! Persistence for analysis results.

pub mod sqlite;

use async_trait::async_trait;

use finlens_core::{AnalysisRecord, AnalysisSummary};

pub use sqlite::SqliteStore;

/// Append-only store of [`AnalysisRecord`]s.
#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Create the backing database and apply migrations. Safe to call repeatedly.
    async fn init(&self) -> Result<(), StoreError>;

    async fn insert(&self, record: &AnalysisRecord) -> Result<(), StoreError>;

    /// Newest first, at most `limit` entries.
    async fn list_recent(&self, limit: u32) -> Result<Vec<AnalysisSummary>, StoreError>;

    /// `Ok(None)` when no record has this id.
    async fn get_by_id(&self, id: &str) -> Result<Option<AnalysisRecord>, StoreError>;

    async fn count(&self) -> Result<u64, StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("migration failed: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
