use serde::{Deserialize, Serialize};

/// Author shown when the source carries no author names.
pub const DEFAULT_AUTHOR: &str = "Unknown Author";

/// Page count assumed when the source carries none.
pub const DEFAULT_PAGE_COUNT: u32 = 200;

/// Upper bound on the number of candidates a single search returns.
pub const MAX_CANDIDATES: usize = 10;

// ─── LocalRecord ────────────────────────────────────────────

/// A book the user already owns, as stored in the local library.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalRecord {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub page_count: u32,
    pub cover_url: String,
}

impl LocalRecord {
    pub fn identity(&self) -> BookIdentity {
        BookIdentity::new(&self.title, &self.author)
    }
}

/// Fields for inserting a record into the local library; the id is assigned by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewLocalRecord {
    pub title: String,
    pub author: String,
    pub page_count: u32,
    pub cover_url: String,
}

// ─── BookIdentity ───────────────────────────────────────────

/// Normalized `(title, author)` pair used to match remote results against owned books.
/// Both parts are trimmed and lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BookIdentity {
    pub title: String,
    pub author: String,
}

impl BookIdentity {
    pub fn new(title: &str, author: &str) -> Self {
        Self {
            title: title.trim().to_lowercase(),
            author: author.trim().to_lowercase(),
        }
    }
}

// ─── CandidateBook ──────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Origin {
    Local,
    Remote,
}

/// Display-ready search candidate produced by the aggregation step.
///
/// `page_count` and `cover_url` are always populated; `local_id` is present
/// exactly when `origin` is [`Origin::Local`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateBook {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_id: Option<i64>,
    pub title: String,
    pub author: String,
    pub page_count: u32,
    pub cover_url: String,
    pub origin: Origin,
    pub already_owned: bool,
}

impl CandidateBook {
    /// Local records are copied as-is; they are assumed well-formed.
    pub fn from_local(record: LocalRecord) -> Self {
        Self {
            local_id: Some(record.id),
            title: record.title,
            author: record.author,
            page_count: record.page_count,
            cover_url: record.cover_url,
            origin: Origin::Local,
            already_owned: true,
        }
    }

    /// Whether the presentation layer should offer an "add" action.
    pub fn can_add(&self) -> bool {
        !self.already_owned
    }
}

impl From<LocalRecord> for CandidateBook {
    fn from(record: LocalRecord) -> Self {
        Self::from_local(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> LocalRecord {
        LocalRecord {
            id: 7,
            title: "Local Book".to_string(),
            author: "Local Author".to_string(),
            page_count: 312,
            cover_url: "https://example.test/cover.jpg".to_string(),
        }
    }

    #[test]
    fn identity_ignores_case_and_surrounding_whitespace() {
        assert_eq!(
            BookIdentity::new("  Local Book ", "LOCAL author"),
            BookIdentity::new("local book", "Local Author  "),
        );
        assert_ne!(
            BookIdentity::new("Local Book", "Other"),
            BookIdentity::new("Local Book", "Local Author"),
        );
    }

    #[test]
    fn local_identity_uses_title_and_author() {
        assert_eq!(record().identity(), BookIdentity::new("local book", "LOCAL AUTHOR"));
    }

    #[test]
    fn local_candidate_is_owned_and_keeps_fields() {
        let candidate = CandidateBook::from_local(record());
        assert_eq!(candidate.local_id, Some(7));
        assert_eq!(candidate.origin, Origin::Local);
        assert!(candidate.already_owned);
        assert!(!candidate.can_add());
        assert_eq!(candidate.page_count, 312);
        assert_eq!(candidate.cover_url, "https://example.test/cover.jpg");
    }

    #[test]
    fn origin_serializes_lowercase() {
        let candidate: CandidateBook = record().into();
        let json = serde_json::to_value(&candidate).unwrap();
        assert_eq!(json["origin"], "local");
        assert_eq!(json["already_owned"], true);
        assert_eq!(serde_json::to_value(Origin::Remote).unwrap(), "remote");
    }
}
