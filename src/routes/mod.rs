// HTTP + WebSocket routes

mod http;
mod ws;

use axum::{Router, routing::get};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::models::SystemInfo;
use crate::session::SessionScheduler;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) scheduler: Arc<SessionScheduler>,
    pub(crate) system_info: Arc<SystemInfo>,
}

pub fn app(scheduler: Arc<SessionScheduler>) -> Router {
    let system_info = Arc::new(scheduler.assembler().system_info());
    let state = AppState {
        scheduler,
        system_info,
    };
    Router::new()
        .route("/", get(|| async { crate::version::banner() })) // GET /
        .route("/version", get(http::version_handler)) // GET /version
        .route("/api/info", get(http::api_info_handler)) // GET /api/info
        .route("/api/snapshot", get(http::api_snapshot_handler)) // GET /api/snapshot
        .route("/ws", get(ws::ws_metrics)) // WS /ws
        .layer(CorsLayer::new().allow_origin(Any))
        .with_state(state)
}
