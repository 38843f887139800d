//! Error types for station selection and run parameters.

use thiserror::Error;

/// Result type alias using MeteoError.
pub type MeteoResult<T> = Result<T, MeteoError>;

/// Primary error type for station data and invocation parameters.
#[derive(Debug, Error)]
pub enum MeteoError {
    // === Parameter Errors ===
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter value for '{param}': {message}")]
    InvalidParameter { param: String, message: String },

    #[error("Unknown variable: {0}")]
    UnknownVariable(String),

    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    // === Data Errors ===
    #[error("No stations with data for variable '{variable}' and period '{period}'")]
    NoData { variable: String, period: String },

    #[error("Failed to read station data: {0}")]
    DataReadError(String),
}

impl MeteoError {
    /// Create an InvalidParameter error.
    pub fn invalid_parameter(param: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            param: param.into(),
            message: message.into(),
        }
    }

    /// Whether the error comes from the caller's parameters rather than the data.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            MeteoError::MissingParameter(_)
                | MeteoError::InvalidParameter { .. }
                | MeteoError::UnknownVariable(_)
                | MeteoError::InvalidPeriod(_)
        )
    }
}

impl From<std::io::Error> for MeteoError {
    fn from(err: std::io::Error) -> Self {
        MeteoError::DataReadError(err.to_string())
    }
}

impl From<serde_json::Error> for MeteoError {
    fn from(err: serde_json::Error) -> Self {
        MeteoError::DataReadError(format!("JSON error: {}", err))
    }
}
