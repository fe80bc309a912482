pub mod assertions;
pub mod builders;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, Method, Request, StatusCode},
    Router,
};
use futures::FutureExt as _;
use serde_json::Value;
use sportmap::{
    api::create_router,
    db::{PoolMetrics, PostgresFacilityStore},
    state::run_migrations,
    AppState, Config,
};
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    Connection as _, PgPool,
};
use std::future::Future;
use std::pin::Pin;
use std::str::FromStr as _;
use std::sync::Arc;
use tower::ServiceExt as _;
use uuid::Uuid;

pub use assertions::*;
pub use builders::*;

/// Per-test PostgreSQL schema, dropped by [`TestApp::cleanup`].
struct PgSchema {
    pool: PgPool,
    schema: String,
    admin_database_url: String,
}

/// Router over a fresh store: in-memory, or a private PostgreSQL schema.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pg: Option<PgSchema>,
}

impl TestApp {
    pub fn new() -> anyhow::Result<Self> {
        Self::new_with_config(|_| {})
    }

    pub fn new_with_config(configure: impl FnOnce(&mut Config)) -> anyhow::Result<Self> {
        let mut config = Config::default();
        configure(&mut config);

        let state = AppState::in_memory(config).context("initialize AppState")?;
        let router = create_router(state.clone());
        Ok(Self {
            router,
            state,
            pg: None,
        })
    }

    /// App over a new schema in the database named by `DATABASE_URL`.
    /// `None` when the variable is unset.
    pub async fn postgres_with_config(
        configure: impl FnOnce(&mut Config),
    ) -> anyhow::Result<Option<Self>> {
        let Ok(admin_database_url) = std::env::var("DATABASE_URL") else {
            return Ok(None);
        };

        let schema = format!("test_{}", Uuid::new_v4().simple());
        let mut admin_conn = sqlx::PgConnection::connect(&admin_database_url)
            .await
            .context("connect admin db for schema create")?;
        sqlx::query(&format!(r#"CREATE SCHEMA "{schema}""#))
            .execute(&mut admin_conn)
            .await
            .context("create test schema")?;

        let options = PgConnectOptions::from_str(&admin_database_url)
            .context("parse DATABASE_URL")?
            .options([("search_path", schema.as_str())]);
        // Small pools: every test opens its own.
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("connect test pool")?;
        run_migrations(&pool).await.context("migrate test schema")?;

        let mut config = Config::default();
        configure(&mut config);
        config.database.url = admin_database_url.clone();

        let store = Arc::new(PostgresFacilityStore::new(pool.clone()));
        let state = AppState::from_store(config, store, Some(PoolMetrics::new(pool.clone())))
            .context("initialize AppState")?;
        let router = create_router(state.clone());

        Ok(Some(Self {
            router,
            state,
            pg: Some(PgSchema {
                pool,
                schema,
                admin_database_url,
            }),
        }))
    }

    pub fn backend(&self) -> &'static str {
        if self.pg.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    pub fn is_postgres(&self) -> bool {
        self.pg.is_some()
    }

    pub async fn cleanup(self) -> anyhow::Result<()> {
        let Some(pg) = self.pg else {
            return Ok(());
        };
        pg.pool.close().await;

        let mut admin_conn = sqlx::PgConnection::connect(&pg.admin_database_url)
            .await
            .context("connect admin db for schema drop")?;
        sqlx::query(&format!(r#"DROP SCHEMA "{}" CASCADE"#, pg.schema))
            .execute(&mut admin_conn)
            .await
            .context("drop test schema")?;
        Ok(())
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "example.org")
            .header("accept", "application/json")
            .header("content-type", "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }

    /// Request and decode a JSON body.
    pub async fn json(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
    ) -> anyhow::Result<(StatusCode, Value)> {
        let (status, _headers, body) = self.request(method, path_and_query, body).await?;
        let value = serde_json::from_slice(&body)
            .with_context(|| format!("decode JSON from {path_and_query}"))?;
        Ok((status, value))
    }

    pub async fn get(&self, path_and_query: &str) -> anyhow::Result<(StatusCode, Value)> {
        self.json(Method::GET, path_and_query, None).await
    }

    /// POST a facility and return the stored record.
    pub async fn create(&self, facility: &Value) -> anyhow::Result<Value> {
        let (status, body) = self
            .json(Method::POST, "/equipements", Some(to_json_body(facility)?))
            .await?;
        assert_status(
            status,
            StatusCode::CREATED,
            &format!("create facility ({})", self.backend()),
        );
        Ok(body["data"].clone())
    }
}

pub type Scenario<'a> = Pin<Box<dyn Future<Output = anyhow::Result<()>> + 'a>>;

/// Run `f` against the in-memory store, then against PostgreSQL when
/// `DATABASE_URL` is set.
pub async fn with_each_backend<F>(f: F) -> anyhow::Result<()>
where
    F: for<'a> Fn(&'a TestApp) -> Scenario<'a>,
{
    with_each_backend_with_config(|_| {}, f).await
}

pub async fn with_each_backend_with_config<C, F>(configure: C, f: F) -> anyhow::Result<()>
where
    C: Fn(&mut Config),
    F: for<'a> Fn(&'a TestApp) -> Scenario<'a>,
{
    let memory = TestApp::new_with_config(&configure)?;
    f(&memory).await.context("in-memory store")?;

    let Some(app) = TestApp::postgres_with_config(&configure).await? else {
        return Ok(());
    };

    let result = std::panic::AssertUnwindSafe(f(&app)).catch_unwind().await;
    if let Err(e) = app.cleanup().await {
        eprintln!("test schema cleanup failed: {e:?}");
    }

    match result {
        Ok(r) => r.context("postgres store"),
        Err(panic) => std::panic::resume_unwind(panic),
    }
}
