//! Error types for the navigation assistant.

/// Top-level error type for the conversation and navigation core.
#[derive(Debug, thiserror::Error)]
pub enum NaviError {
    /// Configuration load/save error.
    #[error("config error: {0}")]
    Config(String),

    /// Transport-level HTTP failure (connection refused, timeout, bad body).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// Backend answered but reported a failure (`success = false`, missing data).
    #[error("service error: {0}")]
    Service(String),

    /// Speech capture or playback error.
    #[error("speech error: {0}")]
    Speech(String),

    /// Flow runtime coordination error (closed channels, dropped handles).
    #[error("flow error: {0}")]
    Flow(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, NaviError>;
