use chrono::NaiveDate;

/// Failures surfaced by the generation/filter/aggregation pipeline.
///
/// Every variant carries the parameter that caused it so a caller can
/// re-prompt for a valid value. None of these are retryable.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Invalid generator configuration for `{parameter}`: {reason}")]
    InvalidConfiguration {
        parameter: &'static str,
        reason: String,
    },

    #[error("Invalid filter range: start {start} is after end {end}")]
    InvalidFilterRange { start: NaiveDate, end: NaiveDate },

    #[error("Unknown column `{column}` (expected one of: {expected})")]
    UnknownColumn { column: String, expected: String },

    #[error("Unknown {dimension} `{value}`")]
    UnknownValue {
        dimension: &'static str,
        value: String,
    },

    #[error("CSV error at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    pub(crate) fn invalid_config(parameter: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration {
            parameter,
            reason: reason.into(),
        }
    }
}

/// Error returned by the `dash` binary: a message plus the process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl From<PipelineError> for AppError {
    fn from(err: PipelineError) -> Self {
        let exit_code = match err {
            PipelineError::InvalidConfiguration { .. }
            | PipelineError::InvalidFilterRange { .. }
            | PipelineError::UnknownColumn { .. }
            | PipelineError::UnknownValue { .. } => 2,
            PipelineError::Csv { .. } | PipelineError::Io { .. } => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}
