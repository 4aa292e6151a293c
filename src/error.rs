//! Munin error types

/// Munin error types
#[derive(Debug, thiserror::Error)]
pub enum MuninError {
    // Provider/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited")]
    RateLimited,

    #[error("authentication failed")]
    AuthenticationFailed,

    /// The identifier matched neither a model id nor an alias in the catalog.
    ///
    /// This is a normal, expected outcome for a browsable catalog — callers
    /// render an empty result rather than propagating it, except where a
    /// single-model lookup is the whole point of the request.
    #[error("model not found: {0}")]
    ModelNotFound(String),

    /// A model identifier string with no base model token at all.
    ///
    /// Fails fast: reconstructing a link from an empty identifier would be
    /// meaningless downstream.
    #[error("unparseable model identifier: {0:?}")]
    UnsupportedSpec(String),

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

/// Result type alias for munin operations
pub type Result<T> = std::result::Result<T, MuninError>;
