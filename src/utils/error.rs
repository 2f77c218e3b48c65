use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvoiceError {
    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("PDF error: {0}")]
    PdfError(#[from] lopdf::Error),

    #[error("Gemini API returned {status}: {message}")]
    GeminiError { status: u16, message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Data processing error: {message}")]
    ProcessingError { message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Launch step '{step}' failed: {message}")]
    LaunchError { step: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    FileSystem,
    Process,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl InvoiceError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            InvoiceError::ApiError(_) | InvoiceError::GeminiError { .. } => ErrorCategory::Network,
            InvoiceError::ConfigError { .. }
            | InvoiceError::MissingConfigError { .. }
            | InvoiceError::InvalidConfigValueError { .. }
            | InvoiceError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            InvoiceError::CsvError(_)
            | InvoiceError::SerializationError(_)
            | InvoiceError::PdfError(_)
            | InvoiceError::ProcessingError { .. }
            | InvoiceError::ValidationError { .. } => ErrorCategory::Data,
            InvoiceError::IoError(_) | InvoiceError::ZipError(_) => ErrorCategory::FileSystem,
            InvoiceError::LaunchError { .. } => ErrorCategory::Process,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            // 網路錯誤通常可以重試
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::FileSystem | ErrorCategory::Process => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            InvoiceError::ApiError(_) => {
                "Check your network connection and the Gemini API base URL".to_string()
            }
            InvoiceError::GeminiError { status, .. } if *status == 401 || *status == 403 => {
                "Verify GEMINI_API_KEY is valid for the Gemini API".to_string()
            }
            InvoiceError::GeminiError { status, .. } if *status == 429 => {
                "Rate limited by Gemini, wait a moment and retry".to_string()
            }
            InvoiceError::GeminiError { .. } => "Retry later or try another model".to_string(),
            InvoiceError::PdfError(_) => {
                "Make sure the file is a valid, unencrypted PDF document".to_string()
            }
            InvoiceError::MissingConfigError { field } => {
                format!("Provide '{}' via CLI flag, config file or environment", field)
            }
            InvoiceError::InvalidConfigValueError { field, .. } => {
                format!("Fix the value of '{}' and run again", field)
            }
            InvoiceError::ConfigError { .. } | InvoiceError::ConfigValidationError { .. } => {
                "Check the configuration file syntax and values".to_string()
            }
            InvoiceError::IoError(_) | InvoiceError::ZipError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            InvoiceError::LaunchError { .. } => {
                "Make sure python3 and the packages in requirements.txt are available".to_string()
            }
            InvoiceError::CsvError(_)
            | InvoiceError::SerializationError(_)
            | InvoiceError::ProcessingError { .. }
            | InvoiceError::ValidationError { .. } => {
                "Inspect the input documents and run again with --verbose".to_string()
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Network => format!("Could not reach Gemini: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
            ErrorCategory::Data => format!("Could not process invoice data: {}", self),
            ErrorCategory::FileSystem => format!("File system error: {}", self),
            ErrorCategory::Process => format!("Launcher failed: {}", self),
        }
    }

    /// 對應 CLI 的退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, InvoiceError>;
