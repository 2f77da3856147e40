//! Health check endpoint.

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::error::Result;
use crate::state::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// GET /health
///
/// Verifies database connectivity.
///
/// # Errors
///
/// Returns a repository error when the database is unreachable.
pub async fn check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    sqlx::query("SELECT 1")
        .execute(state.pool())
        .await
        .map_err(crate::db::RepositoryError::from)?;

    Ok(Json(HealthResponse { status: "ok" }))
}
