//! Database layer - facility stores and search

pub mod memory;
pub mod metrics;
pub mod search;
pub mod store;
pub mod traits;

pub use memory::InMemoryFacilityStore;
pub use metrics::PoolMetrics;
pub use search::{FilterOptions, FilterSet, GeoQuery, ListParams};
pub use store::PostgresFacilityStore;
pub use traits::FacilityStore;
