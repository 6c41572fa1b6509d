use thiserror::Error;

/// Errors returned by the Remote Campaign API client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-2xx status; `message` carries the `detail`
    /// field of the error body when one is present.
    #[error("campaign API error (HTTP {status}): {message}")]
    Api { status: u16, message: String },

    /// A request URL could not be constructed from the configured base.
    #[error("invalid request URL: {0}")]
    Url(String),

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl ApiError {
    /// Whether this error is a transport-level timeout. Callers use this to
    /// surface a distinct "took too long" message for the long-running ICP
    /// analysis call.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, ApiError::Http(e) if e.is_timeout())
    }
}
