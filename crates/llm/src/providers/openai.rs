use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::provider::{Completion, LlmError, LlmProvider, Message};

pub struct OpenAiProvider {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String, base_url: String, timeout: Duration) -> Result<Self, LlmError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_key,
            model,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
    finish_reason: Option<String>,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

fn parse_response(resp: ChatResponse) -> Result<Completion, LlmError> {
    let choice = resp
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| LlmError::Parse("missing choices[0]".into()))?;
    let content = choice
        .message
        .content
        .ok_or_else(|| LlmError::Parse("missing choices[0].message.content".into()))?;
    Ok(Completion {
        content,
        truncated: choice.finish_reason.as_deref() == Some("length"),
    })
}

#[async_trait]
impl LlmProvider for OpenAiProvider {
    async fn complete(
        &self,
        messages: Vec<Message>,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<Completion, LlmError> {
        let url = format!("{}/v1/chat/completions", self.base_url);

        let api_messages: Vec<serde_json::Value> = messages
            .iter()
            .map(|m| json!({ "role": m.role.as_str(), "content": m.content }))
            .collect();

        let body = json!({
            "model": self.model,
            "messages": api_messages,
            "temperature": temperature,
            "max_tokens": max_tokens,
        });

        debug!(model = %self.model, "OpenAI request to {}", url);

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(LlmError::Api { status: status.as_u16(), body });
        }

        let resp: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::Parse(e.to_string()))?;
        parse_response(resp)
    }

    fn model(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Result<Completion, LlmError> {
        parse_response(serde_json::from_str(raw).unwrap())
    }

    #[test]
    fn parses_finished_reply() {
        let c = parse(r#"{"choices":[{"message":{"role":"assistant","content":"Revenue grew."},"finish_reason":"stop"}]}"#)
            .unwrap();
        assert_eq!(c.content, "Revenue grew.");
        assert!(!c.truncated);
    }

    #[test]
    fn flags_length_cutoff() {
        let c = parse(r#"{"choices":[{"message":{"content":"Revenue"},"finish_reason":"length"}]}"#).unwrap();
        assert!(c.truncated);
    }

    #[test]
    fn empty_choices_is_parse_error() {
        assert!(matches!(parse(r#"{"choices":[]}"#), Err(LlmError::Parse(_))));
    }

    #[test]
    fn null_content_is_parse_error() {
        let err = parse(r#"{"choices":[{"message":{"content":null},"finish_reason":"stop"}]}"#).unwrap_err();
        assert!(err.to_string().contains("message.content"));
    }
}
