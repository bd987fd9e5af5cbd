use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Load .env file (silently ignores if missing).
pub fn load_dotenv() {
    dotenvy::dotenv().ok();
}

fn env_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_opt(key: &str) -> Option<String> {
    env::var(key).ok().filter(|s| !s.is_empty())
}

/// Read a profiled env var: tries {PROFILE}_{KEY} first, falls back to {KEY}.
fn profiled_env_opt(profile: &str, key: &str) -> Option<String> {
    if !profile.is_empty() {
        let prefixed = format!("{}_{}", profile, key);
        if let Some(v) = env_opt(&prefixed) {
            return Some(v);
        }
    }
    env_opt(key)
}

fn profiled_env_or(profile: &str, key: &str, default: &str) -> String {
    profiled_env_opt(profile, key).unwrap_or_else(|| default.to_string())
}

fn profiled_env_parse<T: std::str::FromStr>(profile: &str, key: &str, default: T) -> T {
    profiled_env_opt(profile, key)
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ── Top-level config ──────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Active profile name (empty = default).
    pub profile: String,
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Build config from environment variables (call `load_dotenv()` first).
    /// Profile is read from `FINLENS_PROFILE`. When set (e.g. `PROD`),
    /// every key is first looked up as `{PROFILE}_{KEY}`, falling back to `{KEY}`.
    pub fn from_env() -> Self {
        let profile = env_or("FINLENS_PROFILE", "").to_uppercase();
        Self::for_profile(&profile)
    }

    /// Build config for a specific named profile (empty string = default).
    pub fn for_profile(profile: &str) -> Self {
        let p = profile.to_uppercase();
        let p = p.as_str();
        Self {
            profile: p.to_string(),
            server: ServerConfig::from_env_profiled(p),
            storage: StorageConfig::from_env_profiled(p),
            llm: LlmConfig::from_env_profiled(p),
        }
    }

    pub fn profile_label(&self) -> &str {
        if self.profile.is_empty() { "default" } else { &self.profile }
    }

    /// Print a redacted summary for startup logs.
    pub fn log_summary(&self) {
        tracing::info!("Config loaded (profile: {}):", self.profile_label());
        tracing::info!("  server:   {}:{} (max upload {} MB)", self.server.host, self.server.port, self.server.max_upload_mb);
        tracing::info!("  storage:  data_dir={}, db={}", self.storage.data_dir.display(), self.storage.database_file);
        tracing::info!(
            "  llm:      provider={}, model={}, configured={}",
            self.llm.provider,
            self.llm.model(),
            self.llm.is_configured()
        );
    }
}

// ── Server ────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    /// Upper bound for a multipart upload body, in megabytes.
    pub max_upload_mb: usize,
}

impl ServerConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            host: profiled_env_or(p, "HOST", "0.0.0.0"),
            port: profiled_env_parse(p, "PORT", 8000),
            cors_origin: profiled_env_or(p, "CORS_ORIGIN", "*"),
            max_upload_mb: profiled_env_parse(p, "MAX_UPLOAD_MB", 50),
        }
    }

    pub fn max_upload_bytes(&self) -> usize {
        self.max_upload_mb * 1024 * 1024
    }
}

// ── Storage ───────────────────────────────────────────────────

/// Name of the "last analyzed document" copy inside the data dir.
pub const SAMPLE_DOCUMENT_NAME: &str = "sample.pdf";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
    pub database_file: String,
}

impl StorageConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            data_dir: PathBuf::from(profiled_env_or(p, "DATA_DIR", "data")),
            database_file: profiled_env_or(p, "DATABASE_FILE", "results.db"),
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(&self.database_file)
    }

    pub fn sample_document_path(&self) -> PathBuf {
        self.data_dir.join(SAMPLE_DOCUMENT_NAME)
    }

    /// Per-request upload location, removed once the request finishes.
    pub fn upload_path(&self, request_id: &str) -> PathBuf {
        self.data_dir.join(format!("financial_document_{}.pdf", request_id))
    }
}

// ── LLM (OpenAI / Ollama) ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// "openai" or "ollama"
    pub provider: String,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub openai_base_url: Option<String>,
    pub ollama_url: String,
    pub ollama_model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Per-request timeout for the backend HTTP call.
    pub timeout_secs: u64,
}

impl LlmConfig {
    fn from_env_profiled(p: &str) -> Self {
        Self {
            provider: profiled_env_or(p, "LLM_PROVIDER", "openai"),
            openai_api_key: profiled_env_opt(p, "OPENAI_API_KEY"),
            openai_model: profiled_env_or(p, "OPENAI_MODEL", "gpt-4o-mini"),
            openai_base_url: profiled_env_opt(p, "OPENAI_BASE_URL"),
            ollama_url: profiled_env_or(p, "OLLAMA_URL", "http://localhost:11434"),
            ollama_model: profiled_env_or(p, "OLLAMA_MODEL", "llama3.2"),
            temperature: profiled_env_parse(p, "LLM_TEMPERATURE", 0.1),
            max_tokens: profiled_env_parse(p, "LLM_MAX_TOKENS", 4096),
            timeout_secs: profiled_env_parse(p, "LLM_TIMEOUT_SECS", 300),
        }
    }

    pub fn model(&self) -> &str {
        match self.provider.as_str() {
            "ollama" => &self.ollama_model,
            _ => &self.openai_model,
        }
    }

    pub fn is_configured(&self) -> bool {
        match self.provider.as_str() {
            "openai" => self.openai_api_key.is_some(),
            "ollama" => true,
            _ => false,
        }
    }
}
