//! Facility detail and write handlers

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::json;

use crate::{
    models::{FacilityPatch, NewFacility},
    state::AppState,
    Error, Result,
};

pub(crate) fn parse_id(raw: &str) -> Result<i64> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| Error::Validation(format!("id must be an integer, got '{raw}'")))
}

fn parse_body<T: DeserializeOwned>(body: &Bytes) -> Result<T> {
    serde_json::from_slice(body).map_err(|e| Error::Validation(format!("Invalid JSON body: {e}")))
}

/// GET /equipements/:id
pub async fn get_facility(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let facility = state.facility_service.get(parse_id(&id)?).await?;
    Ok(Json(json!({ "data": facility })))
}

/// POST /equipements
pub async fn create_facility(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let input: NewFacility = parse_body(&body)?;
    let facility = state.facility_service.create(input).await?;
    Ok((StatusCode::CREATED, Json(json!({ "data": facility }))))
}

/// PUT /equipements/:id
pub async fn update_facility(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let id = parse_id(&id)?;
    let patch: FacilityPatch = parse_body(&body)?;
    let facility = state.facility_service.update(id, patch).await?;
    Ok(Json(json!({ "data": facility })))
}

/// DELETE /equipements/:id
pub async fn delete_facility(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let facility = state.facility_service.delete(parse_id(&id)?).await?;
    Ok(Json(json!({
        "message": "Facility deleted",
        "data": facility,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_must_be_integers() {
        assert_eq!(parse_id("42").unwrap(), 42);
        assert!(matches!(parse_id("abc"), Err(Error::Validation(_))));
    }
}
