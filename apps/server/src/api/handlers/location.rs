//! Geocoding proxy handler

use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use std::collections::HashMap;

use crate::{state::AppState, Result};

/// GET /location/geocode?query=...&countrycodes=...&limit=...
///
/// Provider failures surface as 502, provider timeouts as 504.
pub async fn geocode(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse> {
    let result = state.geocoding_service.geocode(&params).await?;
    Ok(Json(result))
}
