use propdocs_core::error::CoreError;

/// Errors from the client layer.
///
/// Wraps [`CoreError`] for rule violations and adds transport and gate
/// variants.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The HTTP request itself failed (network, DNS, TLS, decode).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The backend returned a non-2xx status code.
    #[error("API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// A required setting is missing or malformed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A permission or plan gate refused the action before any request.
    #[error("Not allowed: {0}")]
    Denied(String),

    /// A domain validation error from `propdocs_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status: 404, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }
}

/// Convenience alias for client return values.
pub type ClientResult<T> = Result<T, ClientError>;
