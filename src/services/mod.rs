// Service exports
pub mod cache;
pub mod connections;
pub mod store;

pub use cache::{CacheError, CacheKey, CacheManager, CacheStats};
pub use connections::{
    ConnectionError, ConnectionStats, ConnectionStatus, ConnectionStore, RequestOutcome,
};
pub use store::{enrich_with_club_ids, StoreClient, StoreCollections, StoreError};
