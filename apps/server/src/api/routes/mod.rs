//! Route tables

pub mod facilities;
pub mod location;
pub mod metrics;
