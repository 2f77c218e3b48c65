use crate::domain::model::{AnalysisOutcome, SourceDocument, TransformResult};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Output sink; paths are relative to the run's output location.
pub trait Storage: Send + Sync {
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_files(&self) -> &[String];
    fn output_path(&self) -> &str;
    fn bundle_filename(&self) -> Option<&str>;
}

/// Turns invoice text into structured fields.
#[async_trait]
pub trait InvoiceAnalyzer: Send + Sync {
    async fn analyze(&self, text: &str) -> AnalysisOutcome;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<SourceDocument>>;
    async fn transform(&self, documents: Vec<SourceDocument>) -> Result<TransformResult>;
    async fn load(&self, result: &TransformResult) -> Result<String>;
}
