//! Shelfscout Catalog — remote catalog search merged with the user's own library.

pub mod aggregate;
pub mod error;
pub mod http;
pub mod inventory;
pub mod merge;
pub mod request;
pub mod sources;
pub mod types;

pub use aggregate::AggregationService;
pub use error::{CatalogError, InventoryError, Result};
pub use inventory::{DisconnectedInventory, LocalInventory, SqliteInventory};
pub use merge::merge_remote;
pub use request::{RequestTicket, RequestTracker};
pub use sources::openlibrary::RemoteCatalogClient;
pub use sources::{CatalogStatus, RemoteCatalog};
pub use types::{CoverUrls, RemoteDocument};
