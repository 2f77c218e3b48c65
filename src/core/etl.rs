use crate::core::{Pipeline, TransformResult};
use crate::utils::error::Result;

/// Outcome of a full extract → transform → load run.
#[derive(Debug)]
pub struct RunReport {
    pub output_path: String,
    pub result: TransformResult,
}

impl RunReport {
    /// 0 when at least one invoice was extracted or nothing failed, 1 when every document failed.
    pub fn exit_code(&self) -> i32 {
        if self.result.extracted_count() == 0 && !self.result.failures.is_empty() {
            1
        } else {
            0
        }
    }
}

pub struct EtlEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> EtlEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub async fn run(&self) -> Result<RunReport> {
        tracing::info!("Starting invoice extraction");

        // Extract
        let documents = self.pipeline.extract().await?;
        tracing::info!("Read {} document(s)", documents.len());

        // Transform
        let result = self.pipeline.transform(documents).await?;
        tracing::info!(
            "Extracted {} invoice(s), {} failure(s)",
            result.extracted_count(),
            result.failures.len()
        );

        // Load
        let output_path = self.pipeline.load(&result).await?;
        tracing::info!("Output saved to: {}", output_path);

        Ok(RunReport {
            output_path,
            result,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AnalysisOutcome, AnalyzedDocument, FailedDocument, SourceDocument};
    use crate::domain::model::Invoice;
    use std::path::PathBuf;

    fn analyzed(name: &str, outcome: AnalysisOutcome) -> AnalyzedDocument {
        AnalyzedDocument {
            document: SourceDocument {
                path: PathBuf::from(name),
                text: String::new(),
                page_count: 1,
                extraction_error: None,
            },
            outcome,
        }
    }

    fn report(outcomes: Vec<(&str, AnalysisOutcome)>) -> RunReport {
        let failures = outcomes
            .iter()
            .filter_map(|(name, outcome)| match outcome {
                AnalysisOutcome::Failed { error, .. } => Some(FailedDocument {
                    file: name.to_string(),
                    error: error.clone(),
                    raw_response: None,
                }),
                AnalysisOutcome::Extracted(_) => None,
            })
            .collect();
        RunReport {
            output_path: "out".to_string(),
            result: TransformResult {
                analyzed: outcomes
                    .into_iter()
                    .map(|(name, outcome)| analyzed(name, outcome))
                    .collect(),
                csv_output: String::new(),
                failures,
            },
        }
    }

    fn extracted() -> AnalysisOutcome {
        AnalysisOutcome::Extracted(Invoice {
            vendor_name: Some("Acme".to_string()),
            ..Default::default()
        })
    }

    #[test]
    fn test_exit_code_when_every_document_failed() {
        let report = report(vec![
            ("scan.pdf", AnalysisOutcome::failed("No extractable text found in PDF")),
            ("receipt.pdf", AnalysisOutcome::failed("Failed to parse response")),
        ]);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_exit_code_with_partial_success() {
        let report = report(vec![
            ("acme.pdf", extracted()),
            ("receipt.pdf", AnalysisOutcome::failed("Failed to parse response")),
        ]);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_exit_code_for_clean_and_empty_batches() {
        assert_eq!(report(vec![("acme.pdf", extracted())]).exit_code(), 0);
        assert_eq!(report(vec![]).exit_code(), 0);
    }
}
