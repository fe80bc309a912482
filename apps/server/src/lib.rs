//! sportmap - locate public sports facilities near a point of interest
//!
//! - Filter compiler turning loose query options into parameterized predicates
//! - Great-circle distance ranking with radius cut and limit
//! - Paginated listing with concurrent count, and registry-wide statistics
//! - Facility CRUD and a geocoding proxy over HTTP

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
