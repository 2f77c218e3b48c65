#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;

use crate::adapters::gemini::GeminiSettings;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};

/// Fully resolved settings for one `process` run.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub input_files: Vec<String>,
    pub output_path: String,
    pub bundle_filename: Option<String>,
    pub gemini: GeminiSettings,
    pub show_text: bool,
}

impl ConfigProvider for ProcessConfig {
    fn input_files(&self) -> &[String] {
        &self.input_files
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn bundle_filename(&self) -> Option<&str> {
        self.bundle_filename.as_deref()
    }
}

impl Validate for ProcessConfig {
    fn validate(&self) -> Result<()> {
        if self.input_files.is_empty() {
            return Err(crate::utils::error::InvoiceError::MissingConfigError {
                field: "inputs".to_string(),
            });
        }
        validation::validate_file_extensions("inputs", &self.input_files, &["pdf"])?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_url("gemini.api_base", &self.gemini.api_base)?;
        validation::validate_non_empty_string("gemini.model", &self.gemini.model)?;
        validation::validate_range("gemini.timeout_seconds", self.gemini.timeout_seconds, 1, 600)?;
        Ok(())
    }
}
