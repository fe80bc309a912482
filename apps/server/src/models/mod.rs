//! Domain models for the facility service

pub mod facility;
pub mod stats;

pub use facility::{wire_field_name, Facility, FacilityPatch, NewFacility, RankedFacility};
pub use stats::{CommuneCount, FacilityStats, TypeFamilyCount};
