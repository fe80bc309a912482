//! Error types for the facility service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::models::wire_field_name;

pub type Result<T> = std::result::Result<T, Error>;

/// SQLSTATE for `unique_violation`.
const PG_UNIQUE_VIOLATION: &str = "23505";

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Facility not found: {0}")]
    FacilityNotFound(i64),

    #[error(transparent)]
    Upstream(#[from] sportmap_geocoding::Error),

}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        let is_unique_violation = err
            .as_database_error()
            .and_then(|db| db.code())
            .is_some_and(|code| code == PG_UNIQUE_VIOLATION);

        if is_unique_violation {
            Error::Conflict("A facility with this equip_numero already exists".to_string())
        } else {
            Error::Database(err)
        }
    }
}

impl From<sportmap_geo::GeoError> for Error {
    fn from(err: sportmap_geo::GeoError) -> Self {
        Error::Validation(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let detail = errs
                    .iter()
                    .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                    .next()
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{} {detail}", wire_field_name(&field))
            })
            .collect();
        fields.sort();
        Error::Validation(fields.join("; "))
    }
}

impl Error {
    /// HTTP status plus the machine-readable kind exposed to clients.
    pub fn status_and_kind(&self) -> (StatusCode, &'static str) {
        match self {
            Error::Validation(_) => (StatusCode::BAD_REQUEST, "validation"),
            Error::Conflict(_) => (StatusCode::CONFLICT, "conflict"),
            Error::FacilityNotFound(_) => (StatusCode::NOT_FOUND, "not-found"),
            Error::Upstream(e) if e.is_timeout() => (StatusCode::GATEWAY_TIMEOUT, "upstream-timeout"),
            Error::Upstream(_) => (StatusCode::BAD_GATEWAY, "upstream"),
            Error::Database(_) | Error::Migration(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "storage")
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status, kind) = self.status_and_kind();

        // Store failures may carry SQL or connection details; keep them in the logs.
        let message = if status.is_server_error() && !matches!(self, Error::Upstream(_)) {
            tracing::error!(error = %self, "Internal error");
            "Internal server error".to_string()
        } else {
            if status.is_server_error() {
                tracing::warn!(error = %self, "Upstream failure");
            }
            self.to_string()
        };

        (status, Json(json!({ "error": kind, "message": message }))).into_response()
    }
}
