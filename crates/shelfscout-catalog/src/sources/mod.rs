use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::types::RemoteDocument;

pub mod openlibrary;

/// A remote bibliographic catalog that can be searched two ways.
///
/// Both queries return at most the catalog's configured result limit and
/// short-circuit to an empty list for blank input.
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    fn name(&self) -> &str;

    /// Searches title and author jointly.
    async fn query_general(&self, text: &str) -> Result<Vec<RemoteDocument>>;

    /// Searches the author field only.
    async fn query_by_author(&self, text: &str) -> Result<Vec<RemoteDocument>>;
}

#[derive(Debug, Clone)]
pub struct CatalogStatus {
    pub available: bool,
    pub latency_ms: Option<u64>,
    pub last_checked: DateTime<Utc>,
    pub error_kind: Option<&'static str>,
}
