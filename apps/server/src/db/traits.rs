//! Storage trait for facility backends

use async_trait::async_trait;

use crate::{
    db::search::FilterSet,
    models::{CommuneCount, Facility, FacilityPatch, NewFacility, RankedFacility, TypeFamilyCount},
    Result,
};
use sportmap_geo::Coordinate;

/// Storage operations behind the facility API.
///
/// Implemented by PostgreSQL ([`crate::db::PostgresFacilityStore`]) and by an
/// in-memory store used for tests and database-less runs. Filtering semantics
/// are carried by the [`FilterSet`], so both backends agree on what matches.
#[async_trait]
pub trait FacilityStore: Send + Sync {
    /// Current record, or `None` for an unknown id.
    async fn get(&self, id: i64) -> Result<Option<Facility>>;

    /// Insert a validated record.
    ///
    /// # Errors
    /// * `Conflict` - `equip_numero` already exists; nothing is written
    async fn create(&self, input: NewFacility) -> Result<Facility>;

    /// Apply a partial update and refresh `updated_at`. `None` for an unknown id.
    async fn update(&self, id: i64, patch: FacilityPatch) -> Result<Option<Facility>>;

    /// Remove a record, returning it. `None` for an unknown id.
    async fn delete(&self, id: i64) -> Result<Option<Facility>>;

    /// Number of records matching `filters`.
    async fn count(&self, filters: &FilterSet) -> Result<i64>;

    /// A window of matching records ordered by descending id.
    async fn list(&self, filters: &FilterSet, limit: i64, offset: i64) -> Result<Vec<Facility>>;

    /// Matching records within `radius_km` of `origin`, nearest first, at most `limit`.
    async fn nearby(
        &self,
        filters: &FilterSet,
        origin: Coordinate,
        radius_km: f64,
        limit: i64,
    ) -> Result<Vec<RankedFacility>>;

    async fn count_all(&self) -> Result<i64>;

    async fn count_distinct_communes(&self) -> Result<i64>;

    async fn count_accessible(&self) -> Result<i64>;

    /// Largest type families, nulls excluded, count desc then name asc.
    async fn top_type_families(&self, limit: i64) -> Result<Vec<TypeFamilyCount>>;

    /// Largest communes, nulls excluded, count desc then name asc.
    async fn top_communes(&self, limit: i64) -> Result<Vec<CommuneCount>>;

    /// Round-trip to the backend, for readiness checks.
    async fn ping(&self) -> Result<()>;
}
