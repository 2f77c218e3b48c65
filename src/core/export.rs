use crate::domain::model::{AnalysisOutcome, AnalyzedDocument, Invoice};
use crate::utils::error::{InvoiceError, Result};

pub const SUMMARY_CSV_FILENAME: &str = "invoices.csv";
pub const ERRORS_FILENAME: &str = "errors.json";
pub const DEFAULT_BUNDLE_FILENAME: &str = "invoice_output.zip";
pub const CSV_HEADER: [&str; 4] = ["date", "vendor", "total", "category"];

/// `invoice_<number>.json`, or `invoice_data.json` when the number is unknown.
pub fn json_filename(invoice: &Invoice) -> String {
    let stem = invoice
        .invoice_number
        .as_deref()
        .map(sanitize_filename_part)
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "data".to_string());
    format!("invoice_{}.json", stem)
}

fn sanitize_filename_part(raw: &str) -> String {
    raw.trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.' {
                c
            } else {
                '_'
            }
        })
        .collect::<String>()
        .trim_matches('.')
        .to_string()
}

pub fn to_pretty_json(invoice: &Invoice) -> Result<String> {
    Ok(serde_json::to_string_pretty(invoice)?)
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Builds the `date,vendor,total,category` summary for all extracted invoices.
pub fn summary_csv<'a, I>(invoices: I) -> Result<String>
where
    I: IntoIterator<Item = &'a Invoice>,
{
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(CSV_HEADER)?;

    for invoice in invoices {
        writer.write_record([
            invoice.invoice_date.clone().unwrap_or_default(),
            invoice.vendor_name.clone().unwrap_or_default(),
            format_number(invoice.total),
            invoice.category_suggestion.clone().unwrap_or_default(),
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| InvoiceError::ProcessingError {
            message: format!("CSV buffer flush failed: {}", e),
        })?;
    String::from_utf8(bytes).map_err(|e| InvoiceError::ProcessingError {
        message: format!("CSV output is not UTF-8: {}", e),
    })
}

pub fn format_money(value: Option<f64>) -> String {
    match value {
        Some(v) if v != 0.0 => format!("${:.2}", v),
        _ => "N/A".to_string(),
    }
}

fn text_or_na(value: Option<&str>) -> &str {
    value.unwrap_or("N/A")
}

/// Human-readable block for one analyzed document, printed after a run.
pub fn render_summary(doc: &AnalyzedDocument) -> String {
    let mut out = format!("📄 {}\n", doc.document.file_name());

    match &doc.outcome {
        AnalysisOutcome::Failed {
            error,
            raw_response,
        } => {
            out.push_str(&format!("   ❌ Error: {}\n", error));
            if let Some(raw) = raw_response {
                out.push_str(&format!("   Raw response:\n{}\n", raw));
            }
        }
        AnalysisOutcome::Extracted(invoice) => {
            out.push_str(&format!(
                "   Vendor:   {}\n",
                text_or_na(invoice.vendor_name.as_deref())
            ));
            out.push_str(&format!("   Total:    {}\n", format_money(invoice.total)));
            out.push_str(&format!(
                "   Date:     {}\n",
                text_or_na(invoice.invoice_date.as_deref())
            ));
            out.push_str(&format!(
                "   Category: {}\n",
                text_or_na(invoice.category_suggestion.as_deref())
            ));

            if !invoice.line_items.is_empty() {
                out.push_str("   Line items:\n");
                for (i, item) in invoice.line_items.iter().enumerate() {
                    let Some(item) = item else { continue };
                    let description = text_or_na(item.description.as_deref());
                    match item.amount {
                        Some(amount) if amount != 0.0 => out.push_str(&format!(
                            "     {}. {} - ${:.2}\n",
                            i + 1,
                            description,
                            amount
                        )),
                        _ => out.push_str(&format!("     {}. {}\n", i + 1, description)),
                    }
                }
            }
        }
    }

    out
}
