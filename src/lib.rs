pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod launcher;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::gemini::{GeminiClient, GeminiSettings};
pub use adapters::storage::LocalStorage;
pub use config::ProcessConfig;
pub use crate::core::{etl::EtlEngine, pipeline::InvoicePipeline};
pub use launcher::{Launcher, LauncherSettings};
pub use utils::error::{InvoiceError, Result};
