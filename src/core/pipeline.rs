use crate::core::export::{
    json_filename, summary_csv, to_pretty_json, ERRORS_FILENAME, SUMMARY_CSV_FILENAME,
};
use crate::core::pdf;
use crate::core::{
    AnalysisOutcome, AnalyzedDocument, ConfigProvider, FailedDocument, InvoiceAnalyzer, Pipeline,
    SourceDocument, Storage, TransformResult,
};
use crate::utils::error::Result;
use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use zip::write::{FileOptions, ZipWriter};

pub const NO_TEXT_ERROR: &str = "No extractable text found in PDF";

pub struct InvoicePipeline<S: Storage, C: ConfigProvider, A: InvoiceAnalyzer> {
    storage: S,
    config: C,
    analyzer: A,
}

impl<S: Storage, C: ConfigProvider, A: InvoiceAnalyzer> InvoicePipeline<S, C, A> {
    pub fn new(storage: S, config: C, analyzer: A) -> Self {
        Self {
            storage,
            config,
            analyzer,
        }
    }
}

fn unique_name(name: String, used: &mut HashSet<String>) -> String {
    if used.insert(name.clone()) {
        return name;
    }
    let stem = name.trim_end_matches(".json");
    let mut n = 2;
    loop {
        let candidate = format!("{}_{}.json", stem, n);
        if used.insert(candidate.clone()) {
            return candidate;
        }
        n += 1;
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider, A: InvoiceAnalyzer> Pipeline for InvoicePipeline<S, C, A> {
    async fn extract(&self) -> Result<Vec<SourceDocument>> {
        let mut documents = Vec::new();

        for input in self.config.input_files() {
            let path = PathBuf::from(input);
            tracing::debug!("Reading PDF: {}", path.display());

            let document = match tokio::fs::read(&path).await {
                Ok(bytes) => match pdf::extract_text(&bytes) {
                    Ok(extracted) => {
                        tracing::debug!(
                            "Extracted {} chars from {} page(s) of {}",
                            extracted.text.len(),
                            extracted.page_count,
                            path.display()
                        );
                        SourceDocument {
                            path,
                            text: extracted.text,
                            page_count: extracted.page_count,
                            extraction_error: None,
                        }
                    }
                    Err(e) => {
                        tracing::warn!("Could not parse {}: {}", path.display(), e);
                        SourceDocument {
                            path,
                            text: String::new(),
                            page_count: 0,
                            extraction_error: Some(e.to_string()),
                        }
                    }
                },
                Err(e) => {
                    tracing::warn!("Could not read {}: {}", path.display(), e);
                    SourceDocument {
                        path,
                        text: String::new(),
                        page_count: 0,
                        extraction_error: Some(e.to_string()),
                    }
                }
            };

            documents.push(document);
        }

        Ok(documents)
    }

    async fn transform(&self, documents: Vec<SourceDocument>) -> Result<TransformResult> {
        let mut analyzed = Vec::with_capacity(documents.len());
        let mut failures = Vec::new();

        for document in documents {
            let outcome = if let Some(error) = &document.extraction_error {
                AnalysisOutcome::failed(error.clone())
            } else if document.text.trim().is_empty() {
                AnalysisOutcome::failed(NO_TEXT_ERROR)
            } else {
                tracing::info!("🔍 Analyzing {}", document.file_name());
                self.analyzer.analyze(&document.text).await
            };

            if let AnalysisOutcome::Failed {
                error,
                raw_response,
            } = &outcome
            {
                failures.push(FailedDocument {
                    file: document.path.display().to_string(),
                    error: error.clone(),
                    raw_response: raw_response.clone(),
                });
            }

            analyzed.push(AnalyzedDocument { document, outcome });
        }

        let csv_output = summary_csv(analyzed.iter().filter_map(|d| d.outcome.invoice()))?;

        Ok(TransformResult {
            analyzed,
            csv_output,
            failures,
        })
    }

    async fn load(&self, result: &TransformResult) -> Result<String> {
        let mut files: Vec<(String, Vec<u8>)> = Vec::new();
        let mut used_names = HashSet::new();

        for invoice in result.analyzed.iter().filter_map(|d| d.outcome.invoice()) {
            let name = unique_name(json_filename(invoice), &mut used_names);
            files.push((name, to_pretty_json(invoice)?.into_bytes()));
        }

        files.push((
            SUMMARY_CSV_FILENAME.to_string(),
            result.csv_output.clone().into_bytes(),
        ));

        if !result.failures.is_empty() {
            let report = serde_json::json!({
                "generated_at": chrono::Utc::now().to_rfc3339(),
                "failures": result.failures,
            });
            files.push((
                ERRORS_FILENAME.to_string(),
                serde_json::to_string_pretty(&report)?.into_bytes(),
            ));
        }

        if let Some(bundle) = self.config.bundle_filename() {
            tracing::debug!("Creating ZIP bundle with {} files", files.len());

            let zip_data = {
                let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));
                for (name, data) in &files {
                    zip.start_file::<_, ()>(name.as_str(), FileOptions::default())?;
                    zip.write_all(data)?;
                }
                zip.finish()?.into_inner()
            };

            self.storage.write_file(bundle, &zip_data).await?;
            return Ok(Path::new(self.config.output_path())
                .join(bundle)
                .display()
                .to_string());
        }

        for (name, data) in &files {
            tracing::debug!("Writing {} ({} bytes)", name, data.len());
            self.storage.write_file(name, data).await?;
        }

        Ok(self.config.output_path().to_string())
    }
}
