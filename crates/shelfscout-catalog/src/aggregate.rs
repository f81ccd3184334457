use std::collections::HashSet;
use std::sync::Arc;

use shelfscout_core::{BookIdentity, CandidateBook, LocalRecord, MAX_CANDIDATES, config::AppConfig};
use tracing::{debug, warn};

use crate::inventory::LocalInventory;
use crate::merge::merge_remote;
use crate::sources::RemoteCatalog;
use crate::types::{CoverUrls, RemoteDocument};

/// Single entry point for candidate search: queries the remote catalog twice
/// and the local library once, concurrently, and reconciles the results.
///
/// A failing branch contributes nothing and is only logged; `search` itself
/// never fails.
#[derive(Clone)]
pub struct AggregationService {
    catalog: Arc<dyn RemoteCatalog>,
    inventory: Arc<dyn LocalInventory>,
    covers: CoverUrls,
    max_candidates: usize,
}

impl AggregationService {
    pub fn new(
        catalog: Arc<dyn RemoteCatalog>,
        inventory: Arc<dyn LocalInventory>,
        covers: CoverUrls,
    ) -> Self {
        Self {
            catalog,
            inventory,
            covers,
            max_candidates: MAX_CANDIDATES,
        }
    }

    pub fn from_config(
        catalog: Arc<dyn RemoteCatalog>,
        inventory: Arc<dyn LocalInventory>,
        config: &AppConfig,
    ) -> Self {
        Self::new(catalog, inventory, CoverUrls::from_config(&config.catalog))
            .with_max_candidates(config.search.max_candidates)
    }

    /// Caps the result size; values above [`MAX_CANDIDATES`] are clamped.
    pub fn with_max_candidates(mut self, max: usize) -> Self {
        self.max_candidates = max.min(MAX_CANDIDATES);
        self
    }

    pub async fn search(&self, text: &str) -> Vec<CandidateBook> {
        let text = text.trim();
        if text.is_empty() {
            return Vec::new();
        }

        let (author_res, general_res, local_res) = tokio::join!(
            self.catalog.query_by_author(text),
            self.catalog.query_general(text),
            self.inventory.search(text),
        );

        let author_docs = author_res.unwrap_or_else(|err| {
            warn!(branch = "author", kind = err.kind(), %err, "remote author query failed");
            Vec::new()
        });
        let general_docs = general_res.unwrap_or_else(|err| {
            warn!(branch = "general", kind = err.kind(), %err, "remote general query failed");
            Vec::new()
        });
        let local_records = local_res.unwrap_or_else(|err| {
            warn!(branch = "local", kind = err.kind(), %err, "local library search failed");
            Vec::new()
        });

        debug!(
            catalog = self.catalog.name(),
            author = author_docs.len(),
            general = general_docs.len(),
            local = local_records.len(),
            "search branches settled"
        );

        let remote = merge_remote(author_docs, general_docs);
        let candidates = self.reconcile(local_records, remote);
        debug!(candidates = candidates.len(), "search reconciled");
        candidates
    }

    /// Local candidates first, then remote documents not already owned.
    fn reconcile(
        &self,
        local: Vec<LocalRecord>,
        remote: Vec<RemoteDocument>,
    ) -> Vec<CandidateBook> {
        let owned: HashSet<BookIdentity> = local.iter().map(LocalRecord::identity).collect();

        let remote_candidates = remote
            .into_iter()
            .filter(|doc| !owned.contains(&doc.identity()))
            .map(|doc| doc.into_candidate(&self.covers));

        local
            .into_iter()
            .map(CandidateBook::from)
            .chain(remote_candidates)
            .take(self.max_candidates)
            .collect()
    }
}
