use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::path::PathBuf;

/// 從 PDF 抽出的原始文字
#[derive(Debug, Clone)]
pub struct SourceDocument {
    pub path: PathBuf,
    pub text: String,
    pub page_count: usize,
    /// Set when the file could not be read or parsed as PDF.
    pub extraction_error: Option<String>,
}

impl SourceDocument {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub quantity: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub unit_price: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
}

/// Structured invoice fields as returned by the model. Every field is optional;
/// the model answers `null` for anything it cannot find.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    #[serde(default)]
    pub vendor_name: Option<String>,
    #[serde(default)]
    pub vendor_address: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<String>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub subtotal: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub tax: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub total: Option<f64>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub payment_method: Option<String>,
    #[serde(default, deserialize_with = "lenient_line_items")]
    pub line_items: Vec<Option<LineItem>>,
    #[serde(default)]
    pub category_suggestion: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl Invoice {
    /// `invoice_date` parsed as `YYYY-MM-DD`, `None` when missing or in another format.
    pub fn parsed_invoice_date(&self) -> Option<NaiveDate> {
        self.invoice_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }

    pub fn parsed_due_date(&self) -> Option<NaiveDate> {
        self.due_date
            .as_deref()
            .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
    }
}

/// Result of analysing one document. Failures are values, not errors, so a
/// batch keeps going when a single invoice cannot be read.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Extracted(Invoice),
    Failed {
        error: String,
        raw_response: Option<String>,
    },
}

impl AnalysisOutcome {
    pub fn failed(error: impl Into<String>) -> Self {
        AnalysisOutcome::Failed {
            error: error.into(),
            raw_response: None,
        }
    }

    pub fn invoice(&self) -> Option<&Invoice> {
        match self {
            AnalysisOutcome::Extracted(invoice) => Some(invoice),
            AnalysisOutcome::Failed { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzedDocument {
    pub document: SourceDocument,
    pub outcome: AnalysisOutcome,
}

#[derive(Debug, Clone, Serialize)]
pub struct FailedDocument {
    pub file: String,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

#[derive(Debug, Clone)]
pub struct TransformResult {
    pub analyzed: Vec<AnalyzedDocument>,
    pub csv_output: String,
    pub failures: Vec<FailedDocument>,
}

impl TransformResult {
    pub fn extracted_count(&self) -> usize {
        self.analyzed
            .iter()
            .filter(|doc| doc.outcome.invoice().is_some())
            .count()
    }
}

/// Parses `12.5`, `"12.50"`, `"$1,200.00"` or `"EUR 30"` into a number.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok()
}

fn lenient_number<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => parse_amount(&s),
        _ => None,
    })
}

fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Ok(match value {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

// 模型偶爾會在 line_items 放入 null 或非物件
fn lenient_line_items<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<Option<LineItem>>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    let serde_json::Value::Array(items) = value else {
        return Ok(Vec::new());
    };
    Ok(items
        .into_iter()
        .map(|item| match item {
            serde_json::Value::Object(_) => serde_json::from_value(item).ok(),
            _ => None,
        })
        .collect())
}
