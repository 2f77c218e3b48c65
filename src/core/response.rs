use crate::domain::model::{AnalysisOutcome, Invoice};

pub const PARSE_FAILURE: &str = "Failed to parse response";

/// Strips a markdown code fence around the model answer, if any.
///
/// A ```` ```json ```` fence wins over a bare ```` ``` ```` fence; without a
/// closing fence everything after the opening one is kept.
pub fn strip_code_fence(response: &str) -> &str {
    let inner = if let Some((_, rest)) = response.split_once("```json") {
        rest.split("```").next().unwrap_or(rest)
    } else if let Some((_, rest)) = response.split_once("```") {
        rest.split("```").next().unwrap_or(rest)
    } else {
        response
    };
    inner.trim()
}

/// Parses the model's answer into an invoice. Unparseable answers are kept as `raw_response`.
pub fn parse_invoice_response(response: &str) -> AnalysisOutcome {
    let candidate = strip_code_fence(response);
    match serde_json::from_str::<Invoice>(candidate) {
        Ok(invoice) => AnalysisOutcome::Extracted(invoice),
        Err(e) => {
            tracing::debug!("Model response is not valid invoice JSON: {}", e);
            AnalysisOutcome::Failed {
                error: PARSE_FAILURE.to_string(),
                raw_response: Some(response.to_string()),
            }
        }
    }
}
