use crate::config::toml_config::TomlConfig;
use crate::config::ProcessConfig;
use crate::core::export::DEFAULT_BUNDLE_FILENAME;
use crate::launcher::LauncherSettings;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "invoice-etl")]
#[command(about = "Extract vendor, dates, totals and line items from PDF invoices with Gemini")]
pub struct CliConfig {
    /// Path to a TOML configuration file (default: ./invoice-etl.toml if present)
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Prepare the Python venv and start the Streamlit UI on localhost:8502
    Launch(LaunchArgs),
    /// Extract invoice data from PDF files
    Process(ProcessArgs),
    /// Report whether the Gemini API key is configured
    Check,
}

#[derive(Debug, Clone, Args)]
pub struct LaunchArgs {
    /// Directory holding the app script, requirements.txt and venv
    #[arg(long)]
    pub app_dir: Option<String>,

    /// Streamlit script to run
    #[arg(long)]
    pub script: Option<String>,

    /// Skip `pip install -r requirements.txt`
    #[arg(long)]
    pub skip_install: bool,
}

#[derive(Debug, Clone, Args)]
pub struct ProcessArgs {
    /// PDF invoices or receipts
    #[arg(required = true)]
    pub inputs: Vec<String>,

    #[arg(long)]
    pub output_path: Option<String>,

    #[arg(long)]
    pub model: Option<String>,

    #[arg(long)]
    pub api_base: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    /// Write a single ZIP bundle instead of loose files
    #[arg(long)]
    pub bundle: bool,

    /// Print a preview of the extracted PDF text
    #[arg(long)]
    pub show_text: bool,
}

impl LaunchArgs {
    /// CLI flags override the `[launcher]` section of the config file.
    pub fn into_settings(self, file: &TomlConfig) -> LauncherSettings {
        let mut settings = file.launcher_settings();
        if let Some(app_dir) = self.app_dir {
            settings.app_dir = PathBuf::from(app_dir);
        }
        if let Some(script) = self.script {
            settings.script = script;
        }
        settings.skip_install = self.skip_install;
        settings
    }
}

impl ProcessArgs {
    /// CLI flags override the config file; `api_key` comes from the environment
    /// and wins over a key written in the file.
    pub fn into_config(self, file: &TomlConfig, api_key: Option<String>) -> ProcessConfig {
        let mut gemini = file.gemini_settings();
        if let Some(model) = self.model {
            gemini.model = model;
        }
        if let Some(api_base) = self.api_base {
            gemini.api_base = api_base;
        }
        if let Some(timeout) = self.timeout_seconds {
            gemini.timeout_seconds = timeout;
        }
        if api_key.is_some() {
            gemini.api_key = api_key;
        }

        let bundle_filename = if self.bundle {
            file.bundle_filename()
                .or_else(|| Some(DEFAULT_BUNDLE_FILENAME.to_string()))
        } else {
            file.bundle_filename()
        };

        ProcessConfig {
            input_files: self.inputs,
            output_path: self.output_path.unwrap_or_else(|| file.output_path()),
            bundle_filename,
            gemini,
            show_text: self.show_text,
        }
    }
}
