use std::sync::Arc;

use tokio::sync::Mutex;

use finlens_agent::AnalysisPipeline;
use finlens_core::config::StorageConfig;

use crate::db::ResultStore;

pub struct AppState {
    pub store: Arc<dyn ResultStore>,
    pub pipeline: Arc<dyn AnalysisPipeline>,
    pub storage: StorageConfig,
    /// Serializes writes to the `sample.pdf` debug copy.
    pub sample_lock: Mutex<()>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ResultStore>,
        pipeline: Arc<dyn AnalysisPipeline>,
        storage: StorageConfig,
    ) -> Self {
        Self {
            store,
            pipeline,
            storage,
            sample_lock: Mutex::new(()),
        }
    }

    /// Overwrite `sample.pdf` with the latest upload. Nothing reads it back during analysis.
    pub async fn refresh_sample(&self, bytes: &[u8]) -> std::io::Result<()> {
        let _guard = self.sample_lock.lock().await;
        tokio::fs::write(self.storage.sample_document_path(), bytes).await
    }
}
