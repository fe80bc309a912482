//! Aggregate statistics over the whole registry

use std::sync::Arc;

use crate::{db::FacilityStore, models::FacilityStats, Result};

/// Length of the per-type and per-commune breakdowns.
pub const TOP_N: i64 = 10;

pub struct StatsService {
    store: Arc<dyn FacilityStore>,
}

impl StatsService {
    pub fn new(store: Arc<dyn FacilityStore>) -> Self {
        Self { store }
    }

    /// Run the five aggregate reads concurrently. Any failure fails the whole
    /// result; there is no partial response.
    #[tracing::instrument(skip(self))]
    pub async fn compute(&self) -> Result<FacilityStats> {
        let (total, communes, accessible, by_type, by_commune) = tokio::try_join!(
            self.store.count_all(),
            self.store.count_distinct_communes(),
            self.store.count_accessible(),
            self.store.top_type_families(TOP_N),
            self.store.top_communes(TOP_N),
        )?;

        Ok(FacilityStats {
            total,
            communes,
            accessible,
            by_type,
            by_commune,
        })
    }
}
