// GET handlers: version, api/info, api/snapshot

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::AppState;
use crate::version::{NAME, VERSION};

/// GET /version: returns service name and version (from Cargo.toml at build time).
pub(super) async fn version_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "name": NAME,
        "version": VERSION,
    }))
}

/// GET /api/info: static system identity.
pub(super) async fn api_info_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.system_info.as_ref().clone())
}

/// GET /api/snapshot: one assembled snapshot. Counts as a regular tick for rates and history.
pub(super) async fn api_snapshot_handler(State(state): State<AppState>) -> Response {
    match state.scheduler.assembler().assemble().await {
        Ok(snapshot) => Json(snapshot.as_ref()).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, operation = "api_snapshot", "snapshot assembly failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
