//! Error types for the account engine.

use thiserror::Error;

/// Error type for account-engine operations that can fail at the
/// persistence or construction boundary. Request-flow failures never
/// surface here; they are logged and routed to error callbacks.
#[derive(Error, Debug)]
pub enum AccountError {
    /// Settings store error
    #[error("Settings error: {0}")]
    Settings(#[from] client_settings::SettingsError),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias using AccountError.
pub type AccountResult<T> = Result<T, AccountError>;
