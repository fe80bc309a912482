//! Request handlers for API endpoints
//!
//! Handlers extract request parts, call a service and shape the JSON response.
//! Errors convert to responses through [`crate::Error`].

pub mod facilities;
pub mod location;
pub mod metrics;
pub mod search;
pub mod stats;

pub use facilities::*;
pub use location::*;
pub use metrics::*;
pub use search::*;
pub use stats::*;
