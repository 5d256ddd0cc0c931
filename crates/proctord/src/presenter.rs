//! JSON-lines presenter: one event object per line on the output stream.

use std::io::Write;

use chrono::{DateTime, Utc};
use proctor_core::config::SourceOptions;
use proctor_core::overlay::OverlayPoint;
use proctor_core::{CounterSet, Presenter};
use serde::Serialize;
use uuid::Uuid;

use crate::tracker::{SessionSink, TrackerSnapshot};

#[derive(Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum OutputEvent<'a> {
    SourceOptions {
        options: &'a SourceOptions,
    },
    Alert {
        message: &'a str,
    },
    AlertHidden,
    Stats {
        counters: &'a CounterSet,
    },
    Overlay {
        points: &'a [OverlayPoint],
    },
    Summary {
        #[serde(flatten)]
        snapshot: &'a TrackerSnapshot,
        frames_dropped: u64,
    },
}

#[derive(Serialize)]
struct Envelope<'a> {
    session: Uuid,
    at: DateTime<Utc>,
    #[serde(flatten)]
    event: OutputEvent<'a>,
}

pub struct JsonLinesPresenter<W> {
    out: W,
    session: Uuid,
}

impl<W: Write> JsonLinesPresenter<W> {
    pub fn new(out: W, session: Uuid) -> Self {
        Self { out, session }
    }

    /// Tell the landmark source how to configure itself.
    pub fn announce_source(&mut self, options: &SourceOptions) {
        self.emit(OutputEvent::SourceOptions { options });
    }

    fn emit(&mut self, event: OutputEvent<'_>) {
        let envelope = Envelope {
            session: self.session,
            at: Utc::now(),
            event,
        };
        let result = serde_json::to_writer(&mut self.out, &envelope)
            .map_err(std::io::Error::from)
            .and_then(|()| self.out.write_all(b"\n"))
            .and_then(|()| self.out.flush());
        if let Err(e) = result {
            tracing::warn!(error = %e, "failed to write presenter event");
        }
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Presenter for JsonLinesPresenter<W> {
    fn show_alert(&mut self, message: &str) {
        self.emit(OutputEvent::Alert { message });
    }

    fn hide_alert(&mut self) {
        self.emit(OutputEvent::AlertHidden);
    }

    fn update_stats(&mut self, counters: &CounterSet) {
        self.emit(OutputEvent::Stats { counters });
    }

    fn draw_overlay(&mut self, points: &[OverlayPoint]) {
        self.emit(OutputEvent::Overlay { points });
    }
}

impl<W: Write> SessionSink for JsonLinesPresenter<W> {
    fn summary(&mut self, snapshot: &TrackerSnapshot, frames_dropped: u64) {
        self.emit(OutputEvent::Summary {
            snapshot,
            frames_dropped,
        });
    }
}
