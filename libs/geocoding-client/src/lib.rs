//! Geocoding client
//!
//! Async client translating free-text addresses into candidate coordinates
//! through a Nominatim-compatible search API.
//!
//! ```rust,no_run
//! use sportmap_geocoding::{GeocodeQuery, GeocodingClient};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = GeocodingClient::new()?;
//! let candidates = client
//!     .search(&GeocodeQuery {
//!         text: "Stade de France".to_string(),
//!         country_codes: "fr".to_string(),
//!         limit: 5,
//!     })
//!     .await?;
//! # Ok(())
//! # }
//! ```
pub mod client;
pub mod error;
pub mod models;

pub use client::{GeocodingClient, DEFAULT_PROVIDER_URL, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
pub use error::{Error, Result};
pub use models::{GeocodeCandidate, GeocodeQuery, PROVIDER_NAME};
