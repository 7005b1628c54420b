use thiserror::Error;

/// Main error type for hypermedia client operations
#[derive(Debug, Error)]
pub enum ClientError {
    /// Field lookup miss: neither an instance override nor the body has the key
    #[error("no such field: {0}")]
    MissingField(String),

    /// Collection protocol misuse: body has no `collection` array
    #[error("body has no length")]
    NoLength,

    #[error("body is not iterable")]
    NotIterable,

    #[error("body has no indexed access")]
    NotIndexable,

    /// Indexed access past the end of the collection
    #[error("index {index} out of bounds for collection of length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    /// No link descriptor matched the requested relation
    #[error("link with rel {0} not found")]
    LinkNotFound(String),

    /// OAuth handshake failure (request token, authorize or access token step)
    #[error("OAuth handshake failed: {0}")]
    Handshake(String),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client error
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// URL parsing error
    #[error("URL parse error: {0}")]
    UrlParse(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Other errors
    #[error("{0}")]
    Other(String),
}

impl ClientError {
    /// Check if this error is a field lookup miss
    pub fn is_missing_field(&self) -> bool {
        matches!(self, ClientError::MissingField(_))
    }

    /// Check if this error is a collection-protocol misuse
    pub fn is_collection_misuse(&self) -> bool {
        matches!(
            self,
            ClientError::NoLength | ClientError::NotIterable | ClientError::NotIndexable
        )
    }

    /// Check if this error is a failed link lookup
    pub fn is_link_not_found(&self) -> bool {
        matches!(self, ClientError::LinkNotFound(_))
    }
}

/// Result type for client operations
pub type Result<T> = std::result::Result<T, ClientError>;
