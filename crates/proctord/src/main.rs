use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal::unix::{signal, SignalKind};
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

mod config;
mod feed;
mod presenter;
mod tracker;

use config::Config;
use feed::FrameClock;
use presenter::JsonLinesPresenter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        tracing::error!(error = %format!("{e:#}"), "proctord terminated");
        return Err(e);
    }
    Ok(())
}

async fn run() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;
    let session_id = Uuid::new_v4();
    tracing::info!(
        %session_id,
        config = ?config.config_path,
        frame_queue = config.frame_queue,
        overlay = config.emit_overlay,
        "proctord starting"
    );

    let mut presenter = JsonLinesPresenter::new(std::io::stdout(), session_id);
    presenter.announce_source(&config.detector.source);

    let tracker = tracker::spawn_tracker(
        config.detector.clone(),
        config.overlay_surface(),
        presenter,
        config.frame_queue,
    )
    .context("failed to start tracker")?;

    tracing::info!("proctord ready, reading frames from stdin");

    let clock = FrameClock::start();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut hangup = signal(SignalKind::hangup()).context("failed to install SIGHUP handler")?;
    let mut status = signal(SignalKind::user_defined1()).context("failed to install SIGUSR1 handler")?;
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut frames_dropped = 0u64;
    let mut malformed = 0u64;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("failed to read frame feed")? else {
                    tracing::info!("frame feed closed");
                    break;
                };
                match feed::decode_line(&line) {
                    None => {}
                    Some(Err(e)) => {
                        malformed += 1;
                        tracing::warn!(error = %e, malformed, "skipping malformed frame");
                    }
                    Some(Ok(record)) => {
                        if !tracker.submit_frame(clock.frame(&record))? {
                            frames_dropped += 1;
                            tracing::debug!(frames_dropped, "tracker busy, frame dropped");
                        }
                    }
                }
            }
            _ = hangup.recv() => {
                let before = tracker.restart().await?;
                tracing::info!(
                    frames = before.frames_seen,
                    events = before.counters.total(),
                    "SIGHUP: session restarted"
                );
            }
            _ = status.recv() => {
                let now = tracker.snapshot().await?;
                tracing::info!(
                    frames = now.frames_seen,
                    processed = now.frames_processed,
                    frames_dropped,
                    events = now.counters.total(),
                    head = ?now.head_state,
                    alert = ?now.current_alert,
                    "status"
                );
            }
            _ = &mut ctrl_c => {
                tracing::info!("interrupted");
                break;
            }
        }
    }

    let last = tracker.shutdown(frames_dropped).await?;
    tracing::info!(
        %session_id,
        frames = last.frames_seen,
        processed = last.frames_processed,
        frames_dropped,
        malformed,
        blink = last.counters.blink,
        mouth_open = last.counters.mouth_open,
        head_left = last.counters.head_left,
        head_right = last.counters.head_right,
        head_up = last.counters.head_up,
        head_down = last.counters.head_down,
        "proctord shutting down"
    );

    Ok(())
}
