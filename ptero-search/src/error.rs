//! Error types for the ptero-search crate.
//!
//! All errors use stable string messages suitable for display to users
//! and programmatic handling. The panel token never appears in error
//! messages.

/// Errors that can occur while talking to the panel or running a search.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// The caller supplied an argument that cannot be used (e.g. an empty query).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// The request never produced an HTTP response (connect, TLS, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(String),

    /// The panel answered with a non-success status.
    #[error("Pterodactyl API error {status}: {body}")]
    Api {
        /// HTTP status code returned by the panel.
        status: u16,
        /// Response body, JSON-rendered when the panel returned JSON.
        body: String,
    },

    /// Invalid or missing configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Returns true for failures of the transport collaborator
    /// ([`SearchError::Http`] and [`SearchError::Api`]).
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Api { .. })
    }
}

/// Convenience type alias for ptero-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
