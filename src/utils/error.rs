use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScoutError {
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Transport error: {0}")]
    TransportError(#[from] reqwest::Error),

    #[error("Upstream error from {source_name}: status {status}")]
    UpstreamError { source_name: String, status: String },

    #[error("Extraction error: {message}")]
    ExtractionError { message: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Network,
    Upstream,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ScoutError {
    pub fn config(message: impl Into<String>) -> Self {
        ScoutError::ConfigError {
            message: message.into(),
        }
    }

    pub fn extraction(message: impl Into<String>) -> Self {
        ScoutError::ExtractionError {
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            ScoutError::ConfigError { .. }
            | ScoutError::MissingConfigError { .. }
            | ScoutError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ScoutError::TransportError(_) => ErrorCategory::Network,
            ScoutError::UpstreamError { .. } => ErrorCategory::Upstream,
            ScoutError::ExtractionError { .. }
            | ScoutError::CsvError(_)
            | ScoutError::SerializationError(_) => ErrorCategory::Data,
            ScoutError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Configuration => ErrorSeverity::Critical,
            ErrorCategory::Network | ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::Low,
            ErrorCategory::System => ErrorSeverity::High,
        }
    }

    /// Only configuration problems abort a run; everything else is contained
    /// at the listing, job or fetch that produced it.
    pub fn is_fatal(&self) -> bool {
        self.category() == ErrorCategory::Configuration
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            ScoutError::ConfigError { .. } | ScoutError::MissingConfigError { .. } => {
                "Check the config file and make sure GOOGLE_MAPS_API_KEY is set when the places source is enabled"
            }
            ScoutError::InvalidConfigValueError { .. } => {
                "Fix the highlighted value in the config file or command line"
            }
            ScoutError::TransportError(_) => {
                "Check network connectivity; the source may be slow or blocking requests"
            }
            ScoutError::UpstreamError { .. } => {
                "Check the API quota and that the Places API is enabled for this key"
            }
            ScoutError::ExtractionError { .. } => {
                "The listing page layout may have changed; review the listing profile selectors"
            }
            ScoutError::CsvError(_) | ScoutError::SerializationError(_) => {
                "Check the input file format"
            }
            ScoutError::IoError(_) => "Check that the output directory exists and is writable",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Configuration => format!("Configuration problem: {}", self),
            ErrorCategory::Network => format!("Network problem: {}", self),
            ErrorCategory::Upstream => format!("Data source rejected the request: {}", self),
            ErrorCategory::Data => format!("Could not process data: {}", self),
            ErrorCategory::System => format!("System error: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, ScoutError>;
