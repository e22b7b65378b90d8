use thiserror::Error;

/// Failure of a forecasting/optimization job.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ForecastError {
    #[error("invalid job input: {0}")]
    InvalidInput(String),

    /// The input series (or catalog) was empty.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),
}

impl ForecastError {
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    pub fn data_unavailable(msg: impl Into<String>) -> Self {
        Self::DataUnavailable(msg.into())
    }
}
