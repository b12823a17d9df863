//! Crate-level error types.
//!
//! [`UdfError`] unifies local validation failures (unknown symbol, unknown
//! resolution) and upstream failures (transport, malformed body, GraphQL
//! errors) behind a single enum so callers can match on the variant they
//! care about while still using the `?` operator for easy propagation.

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, UdfError>;

/// Top-level error type returned by all public APIs.
#[derive(Debug, thiserror::Error)]
pub enum UdfError {
    /// The requested symbol is absent from the current catalog snapshot.
    #[error("symbol not found: {0}")]
    SymbolNotFound(String),

    /// The requested resolution code is not in the resolution table.
    #[error("invalid resolution: {0}")]
    InvalidResolution(String),

    /// An upstream HTTP request failed or returned an error status.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The upstream GraphQL endpoint reported errors or returned no data.
    #[error("upstream error: {0}")]
    Upstream(String),

    /// A local I/O operation failed.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is missing or invalid.
    #[error("configuration error: {0}")]
    Config(String),
}

impl UdfError {
    /// Returns `true` for failures raised by local request validation,
    /// before any upstream call was made.
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::SymbolNotFound(_) | Self::InvalidResolution(_))
    }
}
