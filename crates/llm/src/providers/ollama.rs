use std::time::Duration;

use async_trait::async_trait;
use serde_json::json;
use tracing::debug;

use crate::provider::{Completion, LlmError, LlmProvider, Message};

pub struct OllamaProvider {
    client: reqwest::Client,
    url: String,
    model: String,
}

impl OllamaProvider {
    pub fn new(url: String, model: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.trim_end_matches('/').to_string(),
            model,
        })
    }
}

fn parse_response(resp: &serde_json::Value) -> Result<Completion, LlmError> {
    let content = resp["message"]["content"]
        .as_str()
        .ok_or_else(|| LlmError::Parse("missing message.content".into()))?
        .to_string();
    Ok(Completion {
        content,
        truncated: resp["done_reason"].as_str() == Some("length"),
    })
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        let url = format!("{}/api/chat", self.url);

        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let body = json!({
            "model": self.model,
            "messages": api_messages,
            "stream": false,
            "options": {
                "temperature": temperature,
                "num_predict": max_tokens,
            },
        });

        debug!(model = %self.model, "Ollama request to {}", url);

        let response = self.client.post(&url).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let resp: serde_json::Value = response.json().await?;
        parse_response(&resp)
    }

    fn model(&self) -> &str {
        &self.model
    }
}
