pub mod api;
pub mod config;
pub mod core;
pub mod domain;
pub mod text;
pub mod tools;
pub mod utils;

pub use api::GeminiClient;
pub use config::harness_config::HarnessConfig;
pub use config::{cli::LocalStorage, CliConfig};
pub use core::registry::ToolRegistry;
pub use core::session::{SessionReport, StopReason, ToolCallSession};
pub use utils::error::{ProbeError, Result};
