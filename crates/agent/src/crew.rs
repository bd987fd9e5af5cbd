use std::time::Instant;

use async_trait::async_trait;
use tracing::{info, warn};

use finlens_core::config::LlmConfig;
use finlens_llm::{create_provider, LlmError, LlmProvider, Message};

use crate::config::{AgentConfig, TaskConfig};
use crate::pipeline::{AnalysisPipeline, BackendError};
use crate::rate_limit::RateLimiter;

const CONTINUE_PROMPT: &str =
    "Your previous answer was cut off. Continue exactly where it stopped, without repeating anything.";

/// Runs one agent on one task against an LLM provider.
pub struct Crew {
    agent: AgentConfig,
    task: TaskConfig,
    provider: Box<dyn LlmProvider>,
    limiter: RateLimiter,
    temperature: f32,
    max_tokens: u32,
}

impl Crew {
    pub fn new(
        agent: AgentConfig,
        task: TaskConfig,
        provider: Box<dyn LlmProvider>,
        temperature: f32,
        max_tokens: u32,
    ) -> Self {
        let limiter = RateLimiter::per_minute(agent.max_rpm);
        Self {
            agent,
            task,
            provider,
            limiter,
            temperature,
            max_tokens,
        }
    }

    /// Crew for `agent` and `task` backed by the provider named in `config`.
    pub fn from_config(
        agent: AgentConfig,
        task: TaskConfig,
        config: &LlmConfig,
    ) -> Result<Self, LlmError> {
        let provider = create_provider(config)?;
        Ok(Self::new(agent, task, provider, config.temperature, config.max_tokens))
    }

    pub fn agent(&self) -> &AgentConfig {
        &self.agent
    }
}

#[async_trait]
impl AnalysisPipeline for Crew {
    async fn analyze(&self, document_text: &str, query: &str) -> Result<String, BackendError> {
        let start = Instant::now();
        let max_rounds = self.agent.max_iter.max(1);

        let mut messages = vec![
            Message::system(self.agent.system_prompt(query)),
            Message::user(self.task.user_prompt(query, document_text)),
        ];
        let mut answer = String::new();

        info!(
            agent = %self.agent.role,
            model = self.provider.model(),
            document_chars = document_text.len(),
            "starting analysis"
        );

        for round in 1..=max_rounds {
            self.limiter.acquire().await;
            let completion = self
                .provider
                .complete(messages.clone(), self.temperature, self.max_tokens)
                .await?;
            answer.push_str(&completion.content);

            if !completion.truncated {
                break;
            }
            if round == max_rounds {
                warn!(rounds = round, "answer still truncated after max_iter rounds");
                break;
            }
            messages.push(Message::assistant(completion.content));
            messages.push(Message::user(CONTINUE_PROMPT));
        }

        let answer = answer.trim();
        if answer.is_empty() {
            return Err(BackendError::EmptyResponse);
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        info!(agent = %self.agent.role, elapsed_ms, chars = answer.len(), "analysis complete");
        Ok(answer.to_string())
    }
}
