pub mod etl;
pub mod export;
pub mod pdf;
pub mod pipeline;
pub mod prompt;
pub mod response;

pub use crate::domain::model::{
    AnalysisOutcome, AnalyzedDocument, FailedDocument, Invoice, LineItem, SourceDocument,
    TransformResult,
};
pub use crate::domain::ports::{ConfigProvider, InvoiceAnalyzer, Pipeline, Storage};
pub use crate::utils::error::Result;
