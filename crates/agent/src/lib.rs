//! Single-agent analysis crew: declarative agent/task config, a rate-limited
//! completion loop, and the [`AnalysisPipeline`] seam the server calls.

pub mod config;
pub mod crew;
pub mod pipeline;
pub mod rate_limit;

pub use config::{analyze_financial_document, financial_analyst, AgentConfig, TaskConfig, ToolRef};
pub use crew::Crew;
pub use pipeline::{AnalysisPipeline, BackendError};
