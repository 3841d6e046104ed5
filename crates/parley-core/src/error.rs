use std::time::Duration;
use thiserror::Error;

/// A convenience `Result` alias using [`ParleyError`].
pub type ParleyResult<T> = Result<T, ParleyError>;

/// Top-level error type for Parley.
///
/// Each variant corresponds to a subsystem that can produce errors.
#[derive(Error, Debug)]
pub enum ParleyError {
    /// The remote model rejected or could not answer a request.
    #[error("Agent error: {0}")]
    Agent(String),

    /// An error from an outbound HTTP request (model API or chat platform).
    #[error("HTTP error: {0}")]
    Http(String),

    /// An error in the conversation session lifecycle.
    #[error("Session error: {0}")]
    Session(String),

    /// An error in configuration parsing or validation.
    #[error("Config error: {0}")]
    Config(String),

    /// An error from a communication channel (Discord, terminal).
    #[error("Channel error: {0}")]
    Channel(String),

    /// A remote call did not complete within its deadline.
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    /// A JSON serialization or deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A standard I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
