use axum::{extract::State, response::IntoResponse, Json};

use crate::{state::AppState, Result};

/// GET /equipements/stats
pub async fn facility_stats(State(state): State<AppState>) -> Result<impl IntoResponse> {
    let stats = state.stats_service.compute().await?;
    Ok(Json(stats))
}
