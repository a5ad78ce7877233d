use thiserror::Error;

/// Errors raised by indicator, feature, forecasting and scoring operations.
///
/// Every variant is a distinct condition for the caller; nothing in this crate
/// replaces a failure with a default value.
#[derive(Debug, Error)]
pub enum ForecastError {
    #[error("Invalid price series: {reason}")]
    Data { reason: String },

    #[error("Insufficient data: need at least {required} usable rows, got {available}")]
    InsufficientData { required: usize, available: usize },

    #[error("Shape mismatch: expected length {expected}, got {actual}")]
    Shape { expected: usize, actual: usize },

    #[error("Feature mismatch: model trained on [{}], received [{}]", .expected.join(", "), .actual.join(", "))]
    FeatureMismatch {
        expected: Vec<String>,
        actual: Vec<String>,
    },

    #[error("Invalid parameter: {reason}")]
    InvalidParameter { reason: String },

    #[error("Model failure: {reason}")]
    Model { reason: String },
}

impl ForecastError {
    pub fn data(reason: impl Into<String>) -> Self {
        ForecastError::Data {
            reason: reason.into(),
        }
    }

    pub fn invalid_parameter(reason: impl Into<String>) -> Self {
        ForecastError::InvalidParameter {
            reason: reason.into(),
        }
    }

    pub fn model(reason: impl std::fmt::Display) -> Self {
        ForecastError::Model {
            reason: reason.to_string(),
        }
    }
}

impl From<ta::errors::TaError> for ForecastError {
    fn from(err: ta::errors::TaError) -> Self {
        ForecastError::invalid_parameter(format!("{:?}", err))
    }
}

pub type ForecastResult<T> = Result<T, ForecastError>;
