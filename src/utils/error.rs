use thiserror::Error;

#[derive(Error, Debug)]
pub enum EtlError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing field {field} in {context}")]
    MissingField { field: String, context: String },

    #[error("Invalid field {field} ({value}): {reason}")]
    InvalidField {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Failed to find type in {payload}")]
    UnknownOperation { payload: String },

    #[error("Interrupted")]
    Interrupted,

    #[error("Absolutely failed {label} after {attempts} attempts")]
    RetriesExhausted {
        label: String,
        attempts: u32,
        #[source]
        source: Option<Box<EtlError>>,
    },

    #[error("Failed record gathering. Restart with {restart_url}")]
    RecordFailed {
        restart_url: String,
        #[source]
        source: Box<EtlError>,
    },
}

impl EtlError {
    pub fn missing(field: impl Into<String>, context: impl Into<String>) -> Self {
        EtlError::MissingField {
            field: field.into(),
            context: context.into(),
        }
    }

    /// Data and transport failures get another attempt, including an operation type
    /// that is not recognised. Configuration errors and outcomes of the retry loop
    /// itself end the run.
    pub fn is_retryable(&self) -> bool {
        match self {
            EtlError::ApiError(_)
            | EtlError::HttpStatusError { .. }
            | EtlError::CsvError(_)
            | EtlError::IoError(_)
            | EtlError::SerializationError(_)
            | EtlError::MissingField { .. }
            | EtlError::InvalidField { .. }
            | EtlError::UnknownOperation { .. } => true,
            EtlError::ConfigError { .. }
            | EtlError::InvalidConfigValueError { .. }
            | EtlError::Interrupted
            | EtlError::RetriesExhausted { .. }
            | EtlError::RecordFailed { .. } => false,
        }
    }

    /// True when the error, or anything it wraps, is a manual interrupt.
    pub fn is_interrupt(&self) -> bool {
        match self {
            EtlError::Interrupted => true,
            EtlError::RecordFailed { source, .. } => source.is_interrupt(),
            _ => false,
        }
    }

    /// Renders the error followed by its `source()` chain on a single line.
    pub fn chain(&self) -> String {
        let mut out = self.to_string();
        let mut current = std::error::Error::source(self);
        while let Some(cause) = current {
            out.push_str(": caused by: ");
            out.push_str(&cause.to_string());
            current = cause.source();
        }
        out
    }

    pub fn exit_code(&self) -> i32 {
        if self.is_interrupt() {
            0
        } else {
            1
        }
    }
}

pub type Result<T> = std::result::Result<T, EtlError>;
