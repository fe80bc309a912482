//! Search service - listing and nearby ranking
//!
//! Listing runs its count and window reads concurrently against the same
//! compiled filters. They are not wrapped in a transaction, so `total` may
//! briefly disagree with `data` while writes are in flight.

use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

use crate::{
    config::SearchConfig,
    db::search::{FilterOptions, FilterSet, GeoQuery, GeoQueryEcho, ListParams},
    db::FacilityStore,
    metrics,
    models::{Facility, RankedFacility},
    Result,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: u64,
    pub limit: u32,
    pub total: u64,
    pub pages: u64,
}

/// One page of the filtered listing.
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub pagination: Pagination,
    /// The filter options as received.
    pub filters: FilterOptions,
    pub count: usize,
    pub data: Vec<Facility>,
}

/// Facilities around a point, nearest first.
#[derive(Debug, Clone, Serialize)]
pub struct NearbyResult {
    pub input: GeoQueryEcho,
    pub count: usize,
    pub data: Vec<RankedFacility>,
}

pub struct SearchService {
    store: Arc<dyn FacilityStore>,
    config: SearchConfig,
}

impl SearchService {
    pub fn new(store: Arc<dyn FacilityStore>, config: SearchConfig) -> Self {
        Self { store, config }
    }

    /// Filtered, paginated listing ordered by descending id.
    #[tracing::instrument(skip(self, query))]
    pub async fn list(&self, query: &HashMap<String, String>) -> Result<ListingPage> {
        let params = ListParams::from_query(query, &self.config);
        let options = FilterOptions::from_query(query);
        let filters = FilterSet::compile(&options);

        let result = tokio::try_join!(
            self.store.count(&filters),
            self.store
                .list(&filters, i64::from(params.limit), params.offset()),
        );
        let (total, data) = match result {
            Ok(r) => r,
            Err(e) => {
                metrics::SEARCH_TOTAL.with_label_values(&["list", "error"]).inc();
                return Err(e);
            }
        };

        let total = u64::try_from(total).unwrap_or(0);
        metrics::SEARCH_TOTAL.with_label_values(&["list", "ok"]).inc();
        metrics::SEARCH_RESULTS
            .with_label_values(&["list"])
            .observe(data.len() as f64);
        tracing::debug!(
            page = params.page,
            limit = params.limit,
            total,
            returned = data.len(),
            "Listed facilities"
        );

        Ok(ListingPage {
            pagination: Pagination {
                page: params.page,
                limit: params.limit,
                total,
                pages: params.pages(total),
            },
            filters: options,
            count: data.len(),
            data,
        })
    }

    /// Facilities within the requested radius of `lat`/`lon`.
    ///
    /// Coordinates are validated before any store access.
    #[tracing::instrument(skip(self, query))]
    pub async fn nearby(&self, query: &HashMap<String, String>) -> Result<NearbyResult> {
        let geo = GeoQuery::from_query(query, &self.config)?;
        let filters = FilterSet::compile(&FilterOptions::sport(geo.sport.clone()));

        let data = match self
            .store
            .nearby(&filters, geo.origin, geo.radius_km, i64::from(geo.limit))
            .await
        {
            Ok(data) => data,
            Err(e) => {
                metrics::SEARCH_TOTAL.with_label_values(&["nearby", "error"]).inc();
                return Err(e);
            }
        };

        metrics::SEARCH_TOTAL.with_label_values(&["nearby", "ok"]).inc();
        metrics::SEARCH_RESULTS
            .with_label_values(&["nearby"])
            .observe(data.len() as f64);
        tracing::debug!(
            radius_km = geo.radius_km,
            limit = geo.limit,
            returned = data.len(),
            "Ranked nearby facilities"
        );

        Ok(NearbyResult {
            input: geo.echo(),
            count: data.len(),
            data,
        })
    }
}
