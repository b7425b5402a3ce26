// Integration tests: HTTP and WebSocket endpoints

mod common;

use axum_test::TestServer;
use common::{TickingSource, scheduler_with};
use resmon::models::{Snapshot, SystemInfo};
use resmon::routes;
use resmon::session::SessionScheduler;
use std::sync::Arc;

fn test_app() -> (axum::Router, Arc<SessionScheduler>) {
    let scheduler = scheduler_with(Arc::new(TickingSource::default()), 1000, 1000);
    (routes::app(scheduler.clone()), scheduler)
}

/// Build TestServer with http_transport (required for WebSocket tests).
fn test_server_with_http() -> (TestServer, Arc<SessionScheduler>) {
    let (app, scheduler) = test_app();
    let server = TestServer::builder().http_transport().try_build(app).unwrap();
    (server, scheduler)
}

/// Polls `check` until it holds or two seconds pass.
async fn eventually(mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + tokio::time::Duration::from_secs(2);
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(tokio::time::Duration::from_millis(20)).await;
    }
    check()
}

#[tokio::test]
async fn test_root_endpoint() {
    let (app, _) = test_app();
    let server = TestServer::try_new(app).unwrap();
    let response = server.get("/").await;
    response.assert_status_ok();
    assert!(response.text().starts_with("resmon "));
}

#[tokio::test]
async fn test_version_endpoint() {
    let (app, _) = test_app();
    let server = TestServer::try_new(app).unwrap();
    let response = server.get("/version").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert_eq!(json.get("name").and_then(|v| v.as_str()), Some("resmon"));
    assert!(json.get("version").and_then(|v| v.as_str()).is_some());
}

#[tokio::test]
async fn test_api_info_returns_identity() {
    let (app, _) = test_app();
    let server = TestServer::try_new(app).unwrap();
    let response = server.get("/api/info").await;
    response.assert_status_ok();
    let info: SystemInfo = response.json();
    assert_eq!(info.hostname, "testhost");
}

#[tokio::test]
async fn test_api_snapshot_returns_full_document() {
    let (app, _) = test_app();
    let server = TestServer::try_new(app).unwrap();
    let response = server.get("/api/snapshot").await;
    response.assert_status_ok();
    let json: serde_json::Value = response.json();
    assert!(json["network"]["history"]["timestamps"].is_array());
    assert!(json["memory"]["swap"]["usagePercent"].is_number());
    let snapshot: Snapshot = serde_json::from_value(json).unwrap();
    assert_eq!(snapshot.network.interfaces[0].name, "eth0");
}

#[tokio::test]
async fn test_ws_streams_snapshot_on_connect() {
    let (server, scheduler) = test_server_with_http();
    let mut ws = server.get_websocket("/ws").await.into_websocket().await;
    let text = ws.receive_text().await;
    let snapshot: Snapshot = serde_json::from_str(&text).unwrap();
    assert_eq!(snapshot.system.hostname, "testhost");
    assert_eq!(scheduler.active_sessions(), 1);
}

#[tokio::test]
async fn test_ws_interval_message_reconfigures_session() {
    let (server, scheduler) = test_server_with_http();
    let mut ws = server.get_websocket("/ws").await.into_websocket().await;
    let _first = ws.receive_text().await;

    // Fresh scheduler: the first session id is 1.
    ws.send_text(r#"{"interval": 10}"#).await;
    ws.send_text("not json").await;
    ws.send_text(r#"{"interval": 2500}"#).await;
    assert!(eventually(|| scheduler.interval_of(1) == Some(2500)).await);
}

#[tokio::test]
async fn test_ws_disconnect_releases_session() {
    let (server, scheduler) = test_server_with_http();
    let mut ws = server.get_websocket("/ws").await.into_websocket().await;
    let _first = ws.receive_text().await;
    assert_eq!(scheduler.active_sessions(), 1);

    drop(ws);
    assert!(eventually(|| scheduler.active_sessions() == 0).await);
    assert!(eventually(|| scheduler.live_timers() == 0).await);
}
