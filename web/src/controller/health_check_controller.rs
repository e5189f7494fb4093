use crate::AppState;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::Utc;
use serde_json::json;

use log::*;

/// GET report whether the API and its database are reachable
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "API router is up; `database` tells whether the database answered"),
    )
)]
pub async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    let timestamp = Utc::now().to_rfc3339();

    let body = match app_state.db_conn_ref().ping().await {
        Ok(()) => json!({
            "status": "ok",
            "database": "connected",
            "timestamp": timestamp,
        }),
        Err(e) => {
            warn!("Health check could not reach the database: {e}");
            json!({
                "status": "error",
                "database": "disconnected",
                "error": e.to_string(),
                "timestamp": timestamp,
            })
        }
    };

    (StatusCode::OK, Json(body))
}
