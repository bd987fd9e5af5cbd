//! HTTP endpoint modules.

mod analyses;
mod health;

pub use analyses::{analyze, get_analysis, list_analyses};
pub use health::root;
