use thiserror::Error;

#[derive(Error, Debug)]
pub enum SurgeError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Excel processing error: {0}")]
    ExcelError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Unsupported registry format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Registry is missing required columns: {}", missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("Registry repeats required columns: {}", duplicated.join(", "))]
    DuplicateColumns { duplicated: Vec<String> },

    #[error("Invalid value in row {row}, column '{column}': '{value}' ({reason})")]
    InvalidField {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },

    #[error("Invalid coordinate {field}={value}: {reason}")]
    InvalidCoordinate {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Io,
    Schema,
    Data,
    Input,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SurgeError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            SurgeError::IoError(_) => ErrorCategory::Io,
            SurgeError::CsvError(_)
            | SurgeError::ExcelError(_)
            | SurgeError::SerializationError(_)
            | SurgeError::InvalidField { .. } => ErrorCategory::Data,
            SurgeError::UnsupportedFormat { .. }
            | SurgeError::MissingColumns { .. }
            | SurgeError::DuplicateColumns { .. } => ErrorCategory::Schema,
            SurgeError::InvalidCoordinate { .. } | SurgeError::InvalidInput { .. } => {
                ErrorCategory::Input
            }
            SurgeError::MissingConfigError { .. }
            | SurgeError::InvalidConfigValueError { .. }
            | SurgeError::ConfigValidationError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::Config | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Schema | ErrorCategory::Io => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SurgeError::IoError(_) => "Check that the file exists and is readable",
            SurgeError::CsvError(_) | SurgeError::ExcelError(_) => {
                "Make sure the registry file is a well-formed CSV or XLSX sheet"
            }
            SurgeError::SerializationError(_) => "Check the output data for invalid values",
            SurgeError::UnsupportedFormat { .. } => "Export the registry as .csv or .xlsx",
            SurgeError::MissingColumns { .. } => {
                "Add the listed columns to the registry header row"
            }
            SurgeError::DuplicateColumns { .. } => {
                "Keep exactly one header for each listed column"
            }
            SurgeError::InvalidField { .. } => {
                "Fix the reported cell; counts must be non-negative whole numbers"
            }
            SurgeError::InvalidCoordinate { .. } => {
                "Latitude must be within [-90, 90] and longitude within [-180, 180]"
            }
            SurgeError::InvalidInput { .. } => "Check the command line arguments",
            SurgeError::MissingConfigError { .. } => {
                "Provide the value on the command line or in the config file"
            }
            SurgeError::InvalidConfigValueError { .. } | SurgeError::ConfigValidationError { .. } => {
                "Review the configuration file"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            SurgeError::MissingColumns { missing } => format!(
                "The hospital registry is missing {} required column(s): {}",
                missing.len(),
                missing.join(", ")
            ),
            SurgeError::DuplicateColumns { duplicated } => format!(
                "The hospital registry header repeats: {}",
                duplicated.join(", ")
            ),
            SurgeError::InvalidField { row, column, .. } => {
                format!("The hospital registry has a bad value in row {} ({})", row, column)
            }
            SurgeError::InvalidCoordinate { field, value, .. } => {
                format!("The event {} '{}' is not a valid coordinate", field, value)
            }
            other => other.to_string(),
        }
    }
}

#[cfg(feature = "xlsx")]
impl From<calamine::Error> for SurgeError {
    fn from(err: calamine::Error) -> Self {
        SurgeError::ExcelError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SurgeError>;
