//! Shared application state

use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    config::Config,
    db::{FacilityStore, InMemoryFacilityStore, PoolMetrics, PostgresFacilityStore},
    services::{FacilityService, GeocodingService, MetricsService, SearchService, StatsService},
    Result,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn FacilityStore>,
    pub search_service: Arc<SearchService>,
    pub stats_service: Arc<StatsService>,
    pub facility_service: Arc<FacilityService>,
    pub geocoding_service: Arc<GeocodingService>,
    pub metrics_service: Arc<MetricsService>,
}

impl AppState {
    /// Connect to PostgreSQL, run pending migrations and wire the services.
    pub async fn new(config: Config) -> Result<Self> {
        let pool = connect_pool(&config).await?;

        if config.database.run_migrations {
            run_migrations(&pool).await?;
        }

        let store = Arc::new(PostgresFacilityStore::new(pool.clone()));
        Self::from_store(config, store, Some(PoolMetrics::new(pool)))
    }

    /// Database-less state over an empty in-memory store.
    pub fn in_memory(config: Config) -> Result<Self> {
        Self::from_store(config, Arc::new(InMemoryFacilityStore::new()), None)
    }

    pub fn from_store(
        config: Config,
        store: Arc<dyn FacilityStore>,
        pool: Option<PoolMetrics>,
    ) -> Result<Self> {
        let geocoding_service = GeocodingService::new(config.geocoding.clone())?;

        Ok(Self {
            search_service: Arc::new(SearchService::new(store.clone(), config.search.clone())),
            stats_service: Arc::new(StatsService::new(store.clone())),
            facility_service: Arc::new(FacilityService::new(store.clone())),
            geocoding_service: Arc::new(geocoding_service),
            metrics_service: Arc::new(MetricsService::new(pool)),
            store,
            config: Arc::new(config),
        })
    }
}

/// Build the pool. Every new connection gets the configured `statement_timeout`.
pub async fn connect_pool(config: &Config) -> Result<sqlx::PgPool> {
    let db = &config.database;
    let statement_timeout_ms = db.statement_timeout_seconds.saturating_mul(1000);

    let pool = PgPoolOptions::new()
        .min_connections(db.pool_min_size)
        .max_connections(db.pool_max_size)
        .acquire_timeout(Duration::from_secs(db.pool_timeout_seconds))
        .after_connect(move |conn, _meta| {
            Box::pin(async move {
                if statement_timeout_ms > 0 {
                    sqlx::query(&format!("SET statement_timeout = {statement_timeout_ms}"))
                        .execute(&mut *conn)
                        .await?;
                }
                Ok(())
            })
        })
        .connect(&db.url)
        .await?;

    tracing::info!(
        min = db.pool_min_size,
        max = db.pool_max_size,
        statement_timeout_seconds = db.statement_timeout_seconds,
        "Database pool ready"
    );
    Ok(pool)
}

/// Apply the embedded migrations under `migrations/`.
pub async fn run_migrations(pool: &sqlx::PgPool) -> Result<()> {
    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
