//! Listing and nearby search handlers

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

use crate::{state::AppState, Result};

/// GET /equipements
///
/// `page`, `limit`, `commune`, `type`, `accessible`, `sport`, `search`.
/// Unrecognized or malformed options are ignored. `accessible` only filters
/// when it is exactly `true`.
pub async fn list_facilities(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let page = state.search_service.list(&params).await?;
    Ok(Json(page))
}

/// GET /equipements/nearby
///
/// `lat` and `lon` are required; `radius` (or `radius_km`), `limit` and
/// `sport` are optional.
pub async fn nearby_facilities(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let result = state.search_service.nearby(&params).await?;
    Ok(Json(result))
}
