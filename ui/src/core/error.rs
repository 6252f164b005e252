//! Error taxonomy shared by the chart, export and batch layers.

use api::ApiError;
use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChartError {
    /// Input rejected before any network call (file type, size).
    #[error("{0}")]
    Validation(String),

    /// Fetch failure or a non-success response body.
    #[error("{0}")]
    Network(String),

    /// Expected scene missing after render, or image decoding failed.
    #[error("render failed: {0}")]
    Render(String),

    /// Geometry parameters that cannot produce a radar chart.
    #[error("invalid chart configuration: {0}")]
    Config(String),
}

impl ChartError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }
}

impl From<ApiError> for ChartError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Validation(message) => ChartError::Validation(message),
            other => ChartError::Network(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_validation_stays_validation() {
        let err: ChartError = ApiError::Validation("too big".into()).into();
        assert_eq!(err, ChartError::Validation("too big".into()));
    }

    #[test]
    fn api_rejections_become_network_errors() {
        let err: ChartError = ApiError::Rejected("Person not found".into()).into();
        assert_eq!(err, ChartError::Network("Person not found".into()));
    }
}
