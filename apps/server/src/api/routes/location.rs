use crate::api::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn location_routes() -> Router<AppState> {
    Router::new().route("/location/geocode", get(handlers::geocode))
}
