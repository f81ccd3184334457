//! Shelfscout Core — shared book types, configuration and the local library store.

pub mod config;
pub mod error;
pub mod models;
pub mod storage;

pub use config::AppConfig;
pub use error::{Result, ShelfError};
pub use models::{
    BookIdentity, CandidateBook, DEFAULT_AUTHOR, DEFAULT_PAGE_COUNT, LocalRecord, MAX_CANDIDATES, NewLocalRecord,
    Origin,
};
pub use storage::Database;
