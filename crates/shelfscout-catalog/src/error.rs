use thiserror::Error;

/// Classified failure of a single remote catalog query.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request timed out")]
    Timeout,

    #[error("catalog rate limit exceeded (HTTP 429)")]
    RateLimited,

    #[error("catalog unavailable (HTTP {status})")]
    UpstreamUnavailable { status: u16 },

    #[error("network error: {0}")]
    NetworkError(String),

    #[error("malformed catalog response: {0}")]
    MalformedResponse(String),

    #[error("invalid catalog URL {0}")]
    InvalidUrl(String),
}

impl CatalogError {
    /// Stable label used in diagnostic log fields.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::RateLimited => "rate_limited",
            Self::UpstreamUnavailable { .. } => "upstream_unavailable",
            Self::NetworkError(_) => "network_error",
            Self::MalformedResponse(_) => "malformed_response",
            Self::InvalidUrl(_) => "invalid_url",
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            CatalogError::Timeout
        } else if e.is_decode() {
            CatalogError::MalformedResponse(e.to_string())
        } else {
            CatalogError::NetworkError(e.to_string())
        }
    }
}

/// Failure of the local library lookup.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("local datastore unavailable: {0}")]
    DatastoreUnavailable(String),
}

impl InventoryError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DatastoreUnavailable(_) => "datastore_unavailable",
        }
    }
}

impl From<shelfscout_core::ShelfError> for InventoryError {
    fn from(e: shelfscout_core::ShelfError) -> Self {
        InventoryError::DatastoreUnavailable(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, CatalogError>;
