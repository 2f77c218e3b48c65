use crate::adapters::gemini::GeminiSettings;
use crate::core::export::DEFAULT_BUNDLE_FILENAME;
use crate::launcher::LauncherSettings;
use crate::utils::error::{InvoiceError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "invoice-etl.toml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub gemini: GeminiSection,
    #[serde(default)]
    pub output: OutputSection,
    #[serde(default)]
    pub launcher: LauncherSection,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeminiSection {
    pub api_base: Option<String>,
    pub model: Option<String>,
    pub api_key: Option<String>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSection {
    pub path: Option<String>,
    pub bundle: Option<bool>,
    pub bundle_filename: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LauncherSection {
    pub app_dir: Option<String>,
    pub script: Option<String>,
    pub venv_dir: Option<String>,
    pub requirements: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(InvoiceError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when given, else `invoice-etl.toml` from the working
    /// directory if it exists, else an empty configuration.
    pub fn discover(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None if Path::new(DEFAULT_CONFIG_FILE).is_file() => {
                tracing::debug!("Using {}", DEFAULT_CONFIG_FILE);
                Self::from_file(DEFAULT_CONFIG_FILE)
            }
            None => Ok(Self::default()),
        }
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| InvoiceError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${GEMINI_API_KEY})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").map_err(|e| {
            InvoiceError::ConfigError {
                message: format!("invalid substitution pattern: {}", e),
            }
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Gemini settings from the file; an unresolved `${VAR}` key counts as missing.
    pub fn gemini_settings(&self) -> GeminiSettings {
        let defaults = GeminiSettings::default();
        GeminiSettings {
            api_base: self.gemini.api_base.clone().unwrap_or(defaults.api_base),
            model: self.gemini.model.clone().unwrap_or(defaults.model),
            api_key: self
                .gemini
                .api_key
                .clone()
                .filter(|k| !k.trim().is_empty() && !k.contains("${")),
            timeout_seconds: self
                .gemini
                .timeout_seconds
                .unwrap_or(defaults.timeout_seconds),
        }
    }

    pub fn output_path(&self) -> String {
        self.output
            .path
            .clone()
            .unwrap_or_else(|| "./output".to_string())
    }

    /// Bundle filename when bundling is switched on.
    pub fn bundle_filename(&self) -> Option<String> {
        if self.output.bundle.unwrap_or(false) {
            Some(
                self.output
                    .bundle_filename
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BUNDLE_FILENAME.to_string()),
            )
        } else {
            None
        }
    }

    pub fn launcher_settings(&self) -> LauncherSettings {
        let defaults = LauncherSettings::default();
        LauncherSettings {
            app_dir: self
                .launcher
                .app_dir
                .as_ref()
                .map(PathBuf::from)
                .unwrap_or(defaults.app_dir),
            script: self.launcher.script.clone().unwrap_or(defaults.script),
            venv_dir: self.launcher.venv_dir.clone().unwrap_or(defaults.venv_dir),
            requirements: self
                .launcher
                .requirements
                .clone()
                .unwrap_or(defaults.requirements),
            skip_install: defaults.skip_install,
        }
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        if let Some(api_base) = &self.gemini.api_base {
            validation::validate_url("gemini.api_base", api_base)?;
        }
        if let Some(model) = &self.gemini.model {
            validation::validate_non_empty_string("gemini.model", model)?;
        }
        if let Some(timeout) = self.gemini.timeout_seconds {
            validation::validate_range("gemini.timeout_seconds", timeout, 1, 600)?;
        }
        if let Some(path) = &self.output.path {
            validation::validate_path("output.path", path)?;
        }
        if let Some(name) = &self.output.bundle_filename {
            validation::validate_file_extensions("output.bundle_filename", &[name.clone()], &["zip"])?;
        }
        if let Some(dir) = &self.launcher.app_dir {
            validation::validate_path("launcher.app_dir", dir)?;
        }
        Ok(())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_full_config() {
        let toml_content = r#"
[gemini]
api_base = "https://gemini.internal.example"
model = "gemini-1.5-pro"
api_key = "literal-key"
timeout_seconds = 30

[output]
path = "./exports"
bundle = true

[launcher]
app_dir = "./app"
venv_dir = ".venv"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_ok());

        let gemini = config.gemini_settings();
        assert_eq!(gemini.model, "gemini-1.5-pro");
        assert_eq!(gemini.api_key.as_deref(), Some("literal-key"));
        assert_eq!(gemini.timeout_seconds, 30);

        assert_eq!(config.output_path(), "./exports");
        assert_eq!(config.bundle_filename().as_deref(), Some(DEFAULT_BUNDLE_FILENAME));

        let launcher = config.launcher_settings();
        assert_eq!(launcher.app_dir, PathBuf::from("./app"));
        assert_eq!(launcher.venv_dir, ".venv");
        assert_eq!(launcher.script, "invoice_processor.py");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = TomlConfig::from_toml_str("").unwrap();
        let gemini = config.gemini_settings();
        assert_eq!(gemini.model, "gemini-1.5-flash");
        assert!(gemini.api_key.is_none());
        assert_eq!(config.output_path(), "./output");
        assert!(config.bundle_filename().is_none());
        assert_eq!(config.launcher_settings().venv_dir, "venv");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("INVOICE_ETL_TEST_MODEL", "gemini-2.0-flash");

        let toml_content = r#"
[gemini]
model = "${INVOICE_ETL_TEST_MODEL}"
api_key = "${INVOICE_ETL_TEST_UNSET_KEY}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let gemini = config.gemini_settings();
        assert_eq!(gemini.model, "gemini-2.0-flash");
        assert!(gemini.api_key.is_none());
        assert_eq!(
            config.gemini.api_key.as_deref(),
            Some("${INVOICE_ETL_TEST_UNSET_KEY}")
        );

        std::env::remove_var("INVOICE_ETL_TEST_MODEL");
    }

    #[test]
    fn test_config_validation() {
        let bad_url = TomlConfig::from_toml_str("[gemini]\napi_base = \"invalid-url\"\n").unwrap();
        assert!(bad_url.validate().is_err());

        let bad_timeout = TomlConfig::from_toml_str("[gemini]\ntimeout_seconds = 0\n").unwrap();
        assert!(bad_timeout.validate().is_err());

        let bad_bundle =
            TomlConfig::from_toml_str("[output]\nbundle_filename = \"out.tar\"\n").unwrap();
        assert!(bad_bundle.validate().is_err());
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let result = TomlConfig::from_toml_str("[gemini\nmodel = 1");
        assert!(matches!(
            result,
            Err(InvoiceError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"[output]\npath = \"./from-file\"\n")
            .unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./from-file");

        let discovered = TomlConfig::discover(temp_file.path().to_str()).unwrap();
        assert_eq!(discovered.output_path(), "./from-file");
    }
}
