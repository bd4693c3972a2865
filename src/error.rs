use thiserror::Error;

/// Unified error type for tagger operations
#[derive(Error, Debug)]
pub enum TaggerError {
    #[error("invalid tag: {0}")]
    InvalidTag(String),

    #[error("{operation} failed: {message}")]
    Provider { operation: String, message: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in tagger
pub type Result<T> = std::result::Result<T, TaggerError>;

impl TaggerError {
    /// Create an invalid-tag error from the offending tag string
    pub fn invalid_tag(tag: impl Into<String>) -> Self {
        TaggerError::InvalidTag(tag.into())
    }

    /// Create a provider error naming the operation that failed
    pub fn provider(operation: impl Into<String>, message: impl Into<String>) -> Self {
        TaggerError::Provider {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TaggerError::Config(msg.into())
    }
}
