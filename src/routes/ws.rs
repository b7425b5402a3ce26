// WebSocket transport: one scheduler session per socket

use axum::{
    extract::{
        State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    response::IntoResponse,
};
use bytes::Bytes;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::time::{Duration, timeout};

use super::AppState;
use crate::session::{SessionId, SessionScheduler};

pub(super) const WS_PING_INTERVAL: Duration = Duration::from_secs(30);
pub(super) const WS_SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Tears the session down however the socket loop exits.
struct SessionGuard {
    scheduler: Arc<SessionScheduler>,
    id: SessionId,
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.scheduler.disconnect(self.id);
    }
}

pub(super) async fn ws_metrics(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    let scheduler = state.scheduler.clone();
    ws.on_upgrade(move |socket| async move {
        if let Err(e) = stream_metrics(socket, scheduler).await {
            tracing::info!("Metrics stream error: {}", e);
        }
    })
}

async fn stream_metrics(socket: WebSocket, scheduler: Arc<SessionScheduler>) -> anyhow::Result<()> {
    let (mut sink, mut stream) = socket.split();
    let (id, mut snapshots) = scheduler.connect();
    let _guard = SessionGuard {
        scheduler: scheduler.clone(),
        id,
    };

    let mut ping_interval = tokio::time::interval(WS_PING_INTERVAL);
    ping_interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
    ping_interval.tick().await;
    loop {
        tokio::select! {
            next = snapshots.recv() => {
                let Some(snapshot) = next else { break };
                let json = serde_json::to_string(snapshot.as_ref())?;
                if !send_with_timeout(&mut sink, Message::Text(json.into())).await {
                    break;
                }
            }
            incoming = stream.next() => {
                match incoming {
                    Some(Ok(Message::Text(text))) => handle_control(&scheduler, id, text.as_str()),
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::debug!(session_id = id, error = %e, "socket read failed");
                        break;
                    }
                }
            }
            _ = ping_interval.tick() => {
                if !send_with_timeout(&mut sink, Message::Ping(Bytes::new())).await {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Viewer control message: `{"interval": <ms>}`. Anything else is ignored.
fn handle_control(scheduler: &SessionScheduler, id: SessionId, text: &str) {
    let request: serde_json::Value = match serde_json::from_str(text) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!(session_id = id, error = %e, "ignoring non-JSON message");
            return;
        }
    };
    let interval = request
        .get("interval")
        .cloned()
        .unwrap_or(serde_json::Value::Null);
    if let Err(e) = scheduler.reconfigure(id, &interval) {
        tracing::debug!(session_id = id, error = %e, "reconfigure request ignored");
    }
}

async fn send_with_timeout(sink: &mut SplitSink<WebSocket, Message>, msg: Message) -> bool {
    matches!(timeout(WS_SEND_TIMEOUT, sink.send(msg)).await, Ok(Ok(())))
}
