//! Bootstraps the Python environment for the Streamlit UI and starts it.
//!
//! The sequence is linear: create `venv` if it is missing, install
//! `requirements.txt`, warn when no Gemini key can be found, then run
//! `streamlit run <script> --server.port 8502 --server.address localhost`.
//! Only the server's exit code is returned; earlier steps that fail are
//! logged and the sequence carries on.

pub mod runner;
pub mod venv;

use crate::config::env::{API_KEY_VAR, DOTENV_FILE};
use crate::utils::error::{InvoiceError, Result};
use runner::{LaunchCommand, ProcessRunner};
use std::io::Write;
use std::path::PathBuf;
use venv::VenvLayout;

pub const SERVER_PORT: u16 = 8502;
pub const SERVER_ADDRESS: &str = "localhost";
pub const API_KEY_WARNING: &str = "⚠️  Warning: GEMINI_API_KEY not set and no .env file found. Set GEMINI_API_KEY in your environment or create a .env file.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LauncherSettings {
    pub app_dir: PathBuf,
    pub script: String,
    pub venv_dir: String,
    pub requirements: String,
    pub skip_install: bool,
}

impl Default for LauncherSettings {
    fn default() -> Self {
        Self {
            app_dir: PathBuf::from("."),
            script: "invoice_processor.py".to_string(),
            venv_dir: "venv".to_string(),
            requirements: "requirements.txt".to_string(),
            skip_install: false,
        }
    }
}

/// The warning to print, if any. Only the presence of `.env` matters, not its contents.
pub fn api_key_warning(api_key_set: bool, dotenv_exists: bool) -> Option<&'static str> {
    if api_key_set || dotenv_exists {
        None
    } else {
        Some(API_KEY_WARNING)
    }
}

/// Whether `GEMINI_API_KEY` is set to something non-empty in this process.
pub fn api_key_in_env() -> bool {
    std::env::var_os(API_KEY_VAR).is_some_and(|v| !v.is_empty())
}

pub fn server_command(settings: &LauncherSettings, layout: &VenvLayout) -> LaunchCommand {
    LaunchCommand::new(layout.executable("streamlit"), &settings.app_dir)
        .args(["run", settings.script.as_str()])
        .args(["--server.port".to_string(), SERVER_PORT.to_string()])
        .args(["--server.address", SERVER_ADDRESS])
}

pub struct Launcher<R: ProcessRunner, W: Write> {
    settings: LauncherSettings,
    runner: R,
    out: W,
    api_key_set: bool,
}

impl<R: ProcessRunner, W: Write> Launcher<R, W> {
    pub fn new(settings: LauncherSettings, runner: R, out: W, api_key_set: bool) -> Self {
        Self {
            settings,
            runner,
            out,
            api_key_set,
        }
    }

    fn layout(&self) -> VenvLayout {
        VenvLayout::new(self.settings.app_dir.join(&self.settings.venv_dir))
    }

    fn ensure_venv(&self) {
        let layout = self.layout();
        if layout.exists() {
            tracing::debug!("Using existing venv at {}", layout.root().display());
            return;
        }

        tracing::info!("📦 Creating virtual environment in {}", layout.root().display());
        for python in venv::PYTHON_CANDIDATES {
            let command = venv::create_command(python, &self.settings.venv_dir, &self.settings.app_dir);
            match self.runner.run(&command) {
                Ok(0) => return,
                Ok(code) => {
                    tracing::warn!("'{}' exited with {}", command.display(), code);
                    return;
                }
                Err(e) => tracing::debug!("{} unavailable: {}", python, e),
            }
        }
        tracing::warn!("No Python interpreter found to create the virtual environment");
    }

    fn install_requirements(&self) {
        if self.settings.skip_install {
            return;
        }
        let requirements = self.settings.app_dir.join(&self.settings.requirements);
        if !requirements.is_file() {
            tracing::debug!("{} not found, skipping install", requirements.display());
            return;
        }

        tracing::info!("📥 Installing dependencies from {}", self.settings.requirements);
        let command = venv::install_command(
            &self.layout(),
            &self.settings.requirements,
            &self.settings.app_dir,
        );
        match self.runner.run(&command) {
            Ok(0) => {}
            Ok(code) => tracing::warn!("'{}' exited with {}", command.display(), code),
            Err(e) => tracing::warn!("Could not run '{}': {}", command.display(), e),
        }
    }

    fn check_api_key(&mut self) -> Result<()> {
        let dotenv_exists = self.settings.app_dir.join(DOTENV_FILE).exists();
        if let Some(warning) = api_key_warning(self.api_key_set, dotenv_exists) {
            writeln!(self.out, "{}", warning)?;
        }
        Ok(())
    }

    /// Runs every step and returns the server's exit code.
    pub fn run(&mut self) -> Result<i32> {
        self.ensure_venv();
        self.install_requirements();
        self.check_api_key()?;

        let command = server_command(&self.settings, &self.layout());
        writeln!(
            self.out,
            "🚀 Starting invoice processor on http://{}:{}",
            SERVER_ADDRESS, SERVER_PORT
        )?;
        self.out.flush()?;

        self.runner
            .run(&command)
            .map_err(|e| InvoiceError::LaunchError {
                step: "server".to_string(),
                message: format!("{}: {}", command.display(), e),
            })
    }
}
