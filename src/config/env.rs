//! `.env` loading and Gemini key lookup.

use crate::utils::error::Result;
use std::env;
use std::path::Path;

pub const API_KEY_VAR: &str = "GEMINI_API_KEY";
/// Older deployments used this name.
pub const API_KEY_ALIAS: &str = "GEMINI_API";
pub const DOTENV_FILE: &str = ".env";

/// Parses `KEY=value` lines. Blank lines and `#` comments are ignored, an
/// optional `export ` prefix is accepted and matching quotes are stripped.
pub fn parse_dotenv(content: &str) -> Vec<(String, String)> {
    let mut pairs = Vec::new();

    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);

        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        let mut value = value.trim();

        // 行內註解 (# 不在引號內)
        if let Some(hash_pos) = value.find(" #") {
            let before_hash = value[..hash_pos].trim_end();
            if !before_hash.contains('"') && !before_hash.contains('\'') {
                value = before_hash;
            }
        }
        if value.len() >= 2
            && ((value.starts_with('"') && value.ends_with('"'))
                || (value.starts_with('\'') && value.ends_with('\'')))
        {
            value = &value[1..value.len() - 1];
        }

        if !key.is_empty() {
            pairs.push((key.to_string(), value.to_string()));
        }
    }

    pairs
}

/// Loads `<dir>/.env` into the process environment without overriding
/// variables that are already set. Returns how many variables were set.
pub fn load_dotenv(dir: &Path) -> Result<usize> {
    let path = dir.join(DOTENV_FILE);
    if !path.is_file() {
        return Ok(0);
    }

    let content = std::fs::read_to_string(&path)?;
    let mut loaded = 0;
    for (key, value) in parse_dotenv(&content) {
        if env::var_os(&key).is_none() {
            env::set_var(&key, value);
            loaded += 1;
        }
    }
    tracing::debug!("Loaded {} variable(s) from {}", loaded, path.display());
    Ok(loaded)
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// `GEMINI_API_KEY`, falling back to `GEMINI_API`.
pub fn resolve_api_key() -> Option<String> {
    non_empty_var(API_KEY_VAR).or_else(|| non_empty_var(API_KEY_ALIAS))
}

/// Result of the `check` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SetupCheck {
    pub api_key_configured: bool,
}

impl SetupCheck {
    pub fn new(api_key: Option<&str>) -> Self {
        Self {
            api_key_configured: api_key.is_some_and(|k| !k.trim().is_empty()),
        }
    }

    /// Lines printed to stdout.
    pub fn lines(&self) -> Vec<String> {
        if self.api_key_configured {
            vec!["✅ Gemini API configured".to_string()]
        } else {
            vec![
                format!("⚠️  Set {} in {} file", API_KEY_VAR, DOTENV_FILE),
                format!("    {}=your-key-here", API_KEY_VAR),
            ]
        }
    }

    pub fn exit_code(&self) -> i32 {
        if self.api_key_configured {
            0
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_dotenv() {
        let content = r#"
# Gemini
GEMINI_API_KEY="abc123"
export OUTPUT_DIR=./out # local only
EMPTY=
QUOTED='single'
not a pair
"#;
        let pairs = parse_dotenv(content);
        assert_eq!(
            pairs,
            vec![
                ("GEMINI_API_KEY".to_string(), "abc123".to_string()),
                ("OUTPUT_DIR".to_string(), "./out".to_string()),
                ("EMPTY".to_string(), String::new()),
                ("QUOTED".to_string(), "single".to_string()),
            ]
        );
    }

    #[test]
    fn test_load_dotenv_does_not_override() {
        let temp_dir = TempDir::new().unwrap();
        std::fs::write(
            temp_dir.path().join(DOTENV_FILE),
            "INVOICE_ETL_TEST_NEW=from-file\nINVOICE_ETL_TEST_SET=from-file\n",
        )
        .unwrap();
        env::set_var("INVOICE_ETL_TEST_SET", "from-env");

        let loaded = load_dotenv(temp_dir.path()).unwrap();

        assert_eq!(loaded, 1);
        assert_eq!(env::var("INVOICE_ETL_TEST_NEW").unwrap(), "from-file");
        assert_eq!(env::var("INVOICE_ETL_TEST_SET").unwrap(), "from-env");

        env::remove_var("INVOICE_ETL_TEST_NEW");
        env::remove_var("INVOICE_ETL_TEST_SET");
    }

    #[test]
    fn test_setup_check_with_key() {
        let check = SetupCheck::new(Some("abc123"));
        assert_eq!(check.exit_code(), 0);
        assert_eq!(check.lines(), vec!["✅ Gemini API configured"]);
    }

    #[test]
    fn test_setup_check_without_key_prints_dotenv_hint() {
        for key in [None, Some(""), Some("   ")] {
            let check = SetupCheck::new(key);
            assert_eq!(check.exit_code(), 1);
            assert_eq!(check.lines()[1], "    GEMINI_API_KEY=your-key-here");
        }
    }

    #[test]
    fn test_load_dotenv_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        assert_eq!(load_dotenv(temp_dir.path()).unwrap(), 0);
    }
}
