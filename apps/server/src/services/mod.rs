//! Business logic layer
//!
//! Services sit between the HTTP handlers and the [`FacilityStore`](crate::db::FacilityStore):
//! they parse and clamp request parameters, fan out concurrent store reads and
//! shape the results.

pub mod facilities;
pub mod geocoding;
pub mod metrics;
pub mod search;
pub mod stats;

pub use facilities::FacilityService;
pub use geocoding::{GeocodeResult, GeocodingService};
pub use metrics::MetricsService;
pub use search::{ListingPage, NearbyResult, Pagination, SearchService};
pub use stats::StatsService;
