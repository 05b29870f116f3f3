use thiserror::Error;

#[derive(Debug, Error)]
pub enum CounterError {
    /// The counting service was unreachable or answered with a non-2xx status.
    #[error("counting service request failed: {0}")]
    NetworkFailure(String),

    /// The response body could not be decoded as JSON.
    #[error("malformed counter response: {0}")]
    MalformedResponse(String),

    #[error("display target not found on page")]
    MissingDisplayTarget,

    /// The page went away before it ever became visible.
    #[error("page closed before becoming visible")]
    PageClosed,

    #[error("storage error: {0}")]
    Storage(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl CounterError {
    pub fn network(err: impl std::error::Error) -> Self {
        Self::NetworkFailure(err.to_string())
    }

    pub fn storage(err: impl std::error::Error) -> Self {
        Self::Storage(err.to_string())
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }
}

impl From<std::io::Error> for CounterError {
    fn from(err: std::io::Error) -> Self {
        Self::storage(err)
    }
}
