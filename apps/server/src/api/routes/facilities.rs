//! Facility routes

use crate::api::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

/// Static segments (`nearby`, `stats`) take precedence over `:id`.
pub fn facility_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/equipements",
            get(handlers::list_facilities).post(handlers::create_facility),
        )
        .route("/equipements/nearby", get(handlers::nearby_facilities))
        .route("/equipements/stats", get(handlers::facility_stats))
        .route(
            "/equipements/:id",
            get(handlers::get_facility)
                .put(handlers::update_facility)
                .delete(handlers::delete_facility),
        )
}
