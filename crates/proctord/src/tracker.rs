use std::time::Instant;

use proctor_core::overlay::overlay;
use proctor_core::{
    ConfigError, CounterSet, HeadState, LandmarkSnapshot, Presenter, ProctorConfig, ProctorSession,
};
use serde::Serialize;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("invalid detector config: {0}")]
    Config(#[from] ConfigError),
    #[error("failed to spawn tracker thread: {0}")]
    Spawn(#[source] std::io::Error),
    #[error("tracker thread exited")]
    ChannelClosed,
}

/// Presenter that also receives the end-of-session summary.
pub trait SessionSink: Presenter {
    fn summary(&mut self, snapshot: &TrackerSnapshot, frames_dropped: u64);
}

/// One frame from the landmark source.
pub struct Frame {
    /// First face of the frame, if any.
    pub snapshot: Option<LandmarkSnapshot>,
    pub at: Instant,
}

/// Point-in-time view of the session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackerSnapshot {
    pub counters: CounterSet,
    pub head_state: HeadState,
    pub current_alert: Option<String>,
    pub frames_seen: u64,
    pub frames_processed: u64,
}

impl TrackerSnapshot {
    fn of(session: &ProctorSession) -> Self {
        Self {
            counters: *session.counters(),
            head_state: session.head_state(),
            current_alert: session.current_alert().map(str::to_string),
            frames_seen: session.frames_seen(),
            frames_processed: session.frames_processed(),
        }
    }
}

/// Messages sent from the feed loop to the tracker thread.
enum TrackerRequest {
    Frame(Frame),
    Snapshot {
        reply: oneshot::Sender<TrackerSnapshot>,
    },
    /// Reply carries the state just before the reset.
    Restart {
        reply: oneshot::Sender<TrackerSnapshot>,
    },
    Shutdown {
        frames_dropped: u64,
        reply: oneshot::Sender<TrackerSnapshot>,
    },
}

/// Clone-safe handle to the tracker thread.
#[derive(Clone)]
pub struct TrackerHandle {
    tx: mpsc::Sender<TrackerRequest>,
}

impl TrackerHandle {
    /// Hand a frame to the tracker without waiting. Returns `Ok(false)` when
    /// the tracker is behind and the frame was dropped.
    pub fn submit_frame(&self, frame: Frame) -> Result<bool, TrackerError> {
        match self.tx.try_send(TrackerRequest::Frame(frame)) {
            Ok(()) => Ok(true),
            Err(mpsc::error::TrySendError::Full(_)) => Ok(false),
            Err(mpsc::error::TrySendError::Closed(_)) => Err(TrackerError::ChannelClosed),
        }
    }

    pub async fn snapshot(&self) -> Result<TrackerSnapshot, TrackerError> {
        self.request(|reply| TrackerRequest::Snapshot { reply }).await
    }

    /// Restart the session, returning the state it had before.
    pub async fn restart(&self) -> Result<TrackerSnapshot, TrackerError> {
        self.request(|reply| TrackerRequest::Restart { reply }).await
    }

    /// Emit the summary and stop the tracker thread.
    pub async fn shutdown(&self, frames_dropped: u64) -> Result<TrackerSnapshot, TrackerError> {
        self.request(|reply| TrackerRequest::Shutdown {
            frames_dropped,
            reply,
        })
        .await
    }

    async fn request(
        &self,
        make: impl FnOnce(oneshot::Sender<TrackerSnapshot>) -> TrackerRequest,
    ) -> Result<TrackerSnapshot, TrackerError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.tx
            .send(make(reply_tx))
            .await
            .map_err(|_| TrackerError::ChannelClosed)?;
        reply_rx.await.map_err(|_| TrackerError::ChannelClosed)
    }
}

/// Spawn the tracker on a dedicated OS thread.
///
/// The thread owns the session and the presenter; frames are classified one
/// at a time in arrival order. Fails fast if the config does not validate.
/// `overlay_surface` enables overlay output scaled to that size.
pub fn spawn_tracker<S>(
    config: ProctorConfig,
    overlay_surface: Option<(f64, f64)>,
    mut sink: S,
    frame_queue: usize,
) -> Result<TrackerHandle, TrackerError>
where
    S: SessionSink + Send + 'static,
{
    let mut session = ProctorSession::new(config)?;
    let (tx, mut rx) = mpsc::channel::<TrackerRequest>(frame_queue.max(1));

    std::thread::Builder::new()
        .name("proctor-tracker".into())
        .spawn(move || {
            tracing::info!("tracker thread started");
            while let Some(req) = rx.blocking_recv() {
                match req {
                    TrackerRequest::Frame(frame) => {
                        let outcome = session.process_frame(frame.snapshot.as_ref(), frame.at);
                        outcome.present_to(&mut sink);
                        if outcome.is_processed() {
                            if let (Some((w, h)), Some(snapshot)) =
                                (overlay_surface, frame.snapshot.as_ref())
                            {
                                sink.draw_overlay(&overlay(snapshot, w, h));
                            }
                        }
                    }
                    TrackerRequest::Snapshot { reply } => {
                        let _ = reply.send(TrackerSnapshot::of(&session));
                    }
                    TrackerRequest::Restart { reply } => {
                        let before = TrackerSnapshot::of(&session);
                        session.restart();
                        if before.current_alert.is_some() {
                            sink.hide_alert();
                        }
                        sink.update_stats(session.counters());
                        let _ = reply.send(before);
                    }
                    TrackerRequest::Shutdown {
                        frames_dropped,
                        reply,
                    } => {
                        let last = TrackerSnapshot::of(&session);
                        sink.summary(&last, frames_dropped);
                        let _ = reply.send(last);
                        break;
                    }
                }
            }
            tracing::info!("tracker thread exiting");
        })
        .map_err(TrackerError::Spawn)?;

    Ok(TrackerHandle { tx })
}
