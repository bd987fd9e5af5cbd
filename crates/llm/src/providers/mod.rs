pub mod ollama;
pub mod openai;

use std::time::Duration;

use finlens_core::config::LlmConfig;

use crate::provider::{LlmError, LlmProvider};

/// Create the appropriate LLM provider based on config.
pub fn create_provider(config: &LlmConfig) -> Result<Box<dyn LlmProvider>, LlmError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    match config.provider.as_str() {
        "openai" => {
            let api_key = config
                .openai_api_key
                .as_ref()
                .ok_or_else(|| LlmError::NotConfigured("OPENAI_API_KEY not set".into()))?;
            let base_url = config
                .openai_base_url
                .as_deref()
                .unwrap_or("https://api.openai.com");
            Ok(Box::new(openai::OpenAiProvider::new(
                api_key.clone(),
                config.openai_model.clone(),
                base_url.to_string(),
                timeout,
            )?))
        }
        "ollama" => Ok(Box::new(ollama::OllamaProvider::new(
            config.ollama_url.clone(),
            config.ollama_model.clone(),
            timeout,
        )?)),
        other => Err(LlmError::NotConfigured(format!(
            "unknown LLM provider: '{}'",
            other
        ))),
    }
}
