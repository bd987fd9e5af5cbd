use async_trait::async_trait;

use finlens_llm::LlmError;

/// Turns extracted document text plus a user query into a narrative analysis.
#[async_trait]
pub trait AnalysisPipeline: Send + Sync {
    async fn analyze(&self, document_text: &str, query: &str) -> Result<String, BackendError>;
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),
    #[error("model returned an empty analysis")]
    EmptyResponse,
}
