use serde::{Deserialize, Serialize};
use shelfscout_core::{BookIdentity, CandidateBook, DEFAULT_AUTHOR, DEFAULT_PAGE_COUNT, Origin};

/// Canonical shape of one remote catalog hit. `catalog_key` is its sole identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteDocument {
    pub catalog_key: String,
    pub title: String,
    pub author_names: Vec<String>,
    pub cover_id: Option<u64>,
    pub page_count_median: Option<u32>,
}

impl RemoteDocument {
    pub fn first_author(&self) -> Option<&str> {
        self.author_names.first().map(String::as_str)
    }

    pub fn identity(&self) -> BookIdentity {
        BookIdentity::new(&self.title, self.first_author().unwrap_or_default())
    }

    /// Converts into a display candidate, filling every missing field with its default.
    pub fn into_candidate(self, covers: &CoverUrls) -> CandidateBook {
        let cover_url = covers.resolve(self.cover_id);
        let author = self
            .author_names
            .into_iter()
            .next()
            .unwrap_or_else(|| DEFAULT_AUTHOR.to_string());

        CandidateBook {
            local_id: None,
            title: self.title,
            author,
            page_count: self.page_count_median.unwrap_or(DEFAULT_PAGE_COUNT),
            cover_url,
            origin: Origin::Remote,
            already_owned: false,
        }
    }
}

// ─── Wire format ──────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub(crate) struct SearchResponse {
    pub docs: Vec<SearchDoc>,
    #[serde(rename = "numFound", default)]
    pub num_found: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct SearchDoc {
    pub key: Option<String>,
    pub title: Option<String>,
    pub author_name: Option<Vec<String>>,
    pub cover_i: Option<i64>,
    pub number_of_pages_median: Option<i64>,
}

impl SearchDoc {
    /// `None` when the doc lacks a key or a non-blank title.
    pub fn into_document(self) -> Option<RemoteDocument> {
        let catalog_key = self.key.filter(|k| !k.trim().is_empty())?;
        let title = self
            .title
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())?;

        let author_names = self
            .author_name
            .unwrap_or_default()
            .into_iter()
            .map(|name| name.trim().to_string())
            .filter(|name| !name.is_empty())
            .collect();

        Some(RemoteDocument {
            catalog_key,
            title,
            author_names,
            cover_id: self.cover_i.and_then(|id| u64::try_from(id).ok()).filter(|id| *id > 0),
            page_count_median: self
                .number_of_pages_median
                .and_then(|n| u32::try_from(n).ok())
                .filter(|n| *n > 0),
        })
    }
}

// ─── Cover URLs ───────────────────────────────────────────────────────────────

/// Builds cover image URLs from catalog cover ids. Pure string construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverUrls {
    base_url: String,
    placeholder: String,
}

impl CoverUrls {
    pub fn new(base_url: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            placeholder: placeholder.into(),
        }
    }

    pub fn from_config(config: &shelfscout_core::config::CatalogConfig) -> Self {
        Self::new(&config.covers_base_url, &config.placeholder_cover_url)
    }

    pub fn resolve(&self, cover_id: Option<u64>) -> String {
        match cover_id {
            Some(id) => format!("{}/b/id/{id}-M.jpg", self.base_url),
            None => self.placeholder.clone(),
        }
    }
}

impl Default for CoverUrls {
    fn default() -> Self {
        Self::from_config(&shelfscout_core::config::CatalogConfig::default())
    }
}
