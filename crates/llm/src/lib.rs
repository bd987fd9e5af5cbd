pub mod provider;
pub mod providers;

pub use provider::{Completion, LlmError, LlmProvider, Message, Role};
pub use providers::create_provider;
