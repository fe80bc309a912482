//! Facility search: filter compilation, SQL rendering and distance ranking

pub mod escape;
pub mod filter;
pub mod params;
pub mod query_builder;
pub mod ranking;

pub use filter::{FilterOptions, FilterSet, PredicateKind};
pub use params::{GeoQuery, GeoQueryEcho, ListParams};
pub use query_builder::{BindValue, ListingQuery, NearbyQuery};
