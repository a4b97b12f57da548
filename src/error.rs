use thiserror::Error;

/// Errors returned by design-generation operations.
#[derive(Error, Debug)]
pub enum DesignError {
    /// The request was rejected before any network call was made.
    #[error("Invalid request: {0}")]
    Validation(String),

    /// The designer service returned a non-success HTTP status.
    #[error("Designer service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Network-level request failure with context.
    #[error("{context}: {source}")]
    Network {
        context: String,
        source: reqwest::Error,
    },

    /// The server reported a terminal error frame; the message is verbatim.
    #[error("{0}")]
    Remote(String),

    /// The stream ended without ever delivering a completed frame.
    #[error("Stream ended without a design result")]
    MissingResult,

    /// No bytes arrived within the idle-timeout window.
    #[error("Timed out waiting for the design stream")]
    Timeout,

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<anyhow::Error> for DesignError {
    fn from(err: anyhow::Error) -> Self {
        DesignError::Remote(err.to_string())
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, DesignError>;
