// Per-viewer streaming sessions. Each session owns exactly one timer task; the task assembles a
// snapshot on every tick and pushes it to the session's outbound channel.

use crate::assembler::SnapshotAssembler;
use crate::error::ReconfigureError;
use crate::models::Snapshot;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior, interval_at};

pub type SessionId = u64;

#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub default_interval_ms: u64,
    /// Smallest interval a viewer may ask for.
    pub min_interval_ms: u64,
    /// Snapshots buffered per session before its timer waits on the viewer.
    pub outbound_capacity: usize,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            default_interval_ms: 1000,
            min_interval_ms: 1000,
            outbound_capacity: 16,
        }
    }
}

struct Session {
    interval_ms: u64,
    timer: JoinHandle<()>,
    /// Bumped on every re-arm; a timer only pushes while its generation is current.
    generation: u64,
    outbound: mpsc::Sender<Arc<Snapshot>>,
}

type SessionMap = HashMap<SessionId, Session>;

fn lock(sessions: &Mutex<SessionMap>) -> MutexGuard<'_, SessionMap> {
    sessions.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Clone, Copy)]
enum FirstTick {
    Immediate,
    AfterPeriod,
}

/// Decrements the live timer count when a timer task ends or is aborted.
struct TimerGuard(Arc<AtomicUsize>);

impl TimerGuard {
    fn new(live: Arc<AtomicUsize>) -> Self {
        live.fetch_add(1, Ordering::Relaxed);
        Self(live)
    }
}

impl Drop for TimerGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::Relaxed);
    }
}

pub struct SessionScheduler {
    assembler: Arc<SnapshotAssembler>,
    config: SchedulerConfig,
    sessions: Arc<Mutex<SessionMap>>,
    next_id: AtomicU64,
    live_timers: Arc<AtomicUsize>,
    pushes: Arc<AtomicU64>,
}

impl SessionScheduler {
    pub fn new(assembler: Arc<SnapshotAssembler>, config: SchedulerConfig) -> Self {
        Self {
            assembler,
            config,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
            live_timers: Arc::new(AtomicUsize::new(0)),
            pushes: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn assembler(&self) -> &Arc<SnapshotAssembler> {
        &self.assembler
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    /// Starts a session at the default interval. The first snapshot is pushed right away, then
    /// one per interval. Must be called inside a tokio runtime.
    ///
    /// The session ends on `disconnect` or as soon as the returned receiver is dropped.
    pub fn connect(&self) -> (SessionId, mpsc::Receiver<Arc<Snapshot>>) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let (outbound, rx) = mpsc::channel(self.config.outbound_capacity.max(1));
        let interval_ms = self.config.default_interval_ms;
        // Registered under the lock before the timer can look itself up.
        let mut sessions = lock(&self.sessions);
        let timer = self.spawn_timer(id, 0, interval_ms, FirstTick::Immediate, outbound.clone());
        sessions.insert(
            id,
            Session {
                interval_ms,
                timer,
                generation: 0,
                outbound,
            },
        );
        drop(sessions);
        tracing::info!(session_id = id, interval_ms, "session connected");
        (id, rx)
    }

    /// Applies a viewer's interval request. The old timer is cancelled and a new one armed;
    /// the next push comes one full new interval later. Invalid requests leave the session as is.
    pub fn reconfigure(
        &self,
        id: SessionId,
        interval: &serde_json::Value,
    ) -> Result<u64, ReconfigureError> {
        let interval_ms = validate_interval(interval, self.config.min_interval_ms)?;
        let mut sessions = lock(&self.sessions);
        let session = sessions
            .get_mut(&id)
            .ok_or(ReconfigureError::UnknownSession(id))?;

        session.timer.abort();
        session.generation += 1;
        session.timer = self.spawn_timer(
            id,
            session.generation,
            interval_ms,
            FirstTick::AfterPeriod,
            session.outbound.clone(),
        );
        let previous_ms = std::mem::replace(&mut session.interval_ms, interval_ms);
        drop(sessions);
        tracing::info!(session_id = id, previous_ms, interval_ms, "session interval changed");
        Ok(interval_ms)
    }

    /// Cancels the session's timer and releases its state. Once this returns no further snapshot
    /// enters the session's channel. Returns false if the session was already gone; calling it
    /// again is harmless.
    pub fn disconnect(&self, id: SessionId) -> bool {
        let Some(session) = lock(&self.sessions).remove(&id) else {
            return false;
        };
        session.timer.abort();
        tracing::info!(session_id = id, "session disconnected");
        true
    }

    /// Disconnects every session (process shutdown).
    pub fn shutdown(&self) {
        let drained: Vec<(SessionId, Session)> = lock(&self.sessions).drain().collect();
        for (_, session) in &drained {
            session.timer.abort();
        }
        tracing::debug!(sessions = drained.len(), "scheduler shut down");
    }

    pub fn interval_of(&self, id: SessionId) -> Option<u64> {
        lock(&self.sessions).get(&id).map(|s| s.interval_ms)
    }

    pub fn active_sessions(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Timer tasks that have not yet finished or been dropped.
    pub fn live_timers(&self) -> usize {
        self.live_timers.load(Ordering::Relaxed)
    }

    /// Snapshots handed to viewers since startup.
    pub fn pushes_total(&self) -> u64 {
        self.pushes.load(Ordering::Relaxed)
    }

    fn spawn_timer(
        &self,
        id: SessionId,
        generation: u64,
        interval_ms: u64,
        first: FirstTick,
        outbound: mpsc::Sender<Arc<Snapshot>>,
    ) -> JoinHandle<()> {
        let assembler = self.assembler.clone();
        let sessions = self.sessions.clone();
        let pushes = self.pushes.clone();
        // Created outside the task so an abort before the first poll still releases it.
        let guard = TimerGuard::new(self.live_timers.clone());
        let period = Duration::from_millis(interval_ms.max(1));
        let start = match first {
            FirstTick::Immediate => Instant::now(),
            FirstTick::AfterPeriod => Instant::now() + period,
        };

        tokio::spawn(async move {
            let _guard = guard;
            let mut tick = interval_at(start, period);
            tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tick.tick().await;
                let snapshot = match assembler.assemble().await {
                    Ok(s) => s,
                    Err(e) => {
                        tracing::warn!(
                            session_id = id,
                            error = %e,
                            operation = "assemble",
                            "skipping tick"
                        );
                        continue;
                    }
                };
                let Ok(permit) = outbound.reserve().await else {
                    let mut registry = lock(&sessions);
                    if registry.get(&id).is_some_and(|s| s.generation == generation) {
                        registry.remove(&id);
                    }
                    tracing::debug!(session_id = id, "viewer gone; session released");
                    break;
                };
                // Checked and sent under the sessions lock so a concurrent disconnect lands
                // either before or after this push, never between check and send.
                {
                    let registry = lock(&sessions);
                    if !registry.get(&id).is_some_and(|s| s.generation == generation) {
                        break;
                    }
                    permit.send(snapshot);
                    pushes.fetch_add(1, Ordering::Relaxed);
                }
            }
        })
    }
}

/// Accepts a whole, non-negative number of milliseconds no smaller than `floor_ms`.
pub fn validate_interval(raw: &serde_json::Value, floor_ms: u64) -> Result<u64, ReconfigureError> {
    let serde_json::Value::Number(n) = raw else {
        return Err(ReconfigureError::NotNumeric);
    };
    let ms = if let Some(ms) = n.as_u64() {
        ms
    } else if let Some(neg) = n.as_i64() {
        return Err(ReconfigureError::Negative(neg));
    } else {
        match n.as_f64() {
            Some(f) if f < 0.0 => return Err(ReconfigureError::Negative(f as i64)),
            Some(f) if f.fract() == 0.0 && f <= u64::MAX as f64 => f as u64,
            _ => return Err(ReconfigureError::NotNumeric),
        }
    };
    if ms < floor_ms {
        return Err(ReconfigureError::BelowFloor {
            requested: ms,
            floor: floor_ms,
        });
    }
    Ok(ms)
}
