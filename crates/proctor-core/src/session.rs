//! Per-session event classifier.
//!
//! One [`ProctorSession`] owns every piece of mutable state for a tracking
//! session and is driven one frame at a time. Frame order within
//! [`ProctorSession::process_frame`]:
//!
//! 1. hide the banner if the temporary alert's deadline has passed (the first
//!    frame of a session also opens every debounce window here, so no event
//!    fires before a full interval has passed);
//! 2. run the visibility check and the absence timer, stopping here unless
//!    the face is present;
//! 3. extract features and evaluate blink, mouth-open and head pose, in that
//!    order, offering each fired event's alert to the single banner slot;
//! 4. report the counters.

use std::time::Instant;

use crate::absence::{AbsenceTimer, PresenceVerdict};
use crate::alert::AlertSlot;
use crate::channels::{BlinkChannel, MouthChannel};
use crate::config::{ConfigError, ProctorConfig};
use crate::features::FeatureSet;
use crate::head_pose::{HeadObservation, HeadPoseChannel, HeadState};
use crate::landmarks::LandmarkSnapshot;
use crate::stats::{CounterSet, EventKind};
use crate::visibility;

/// Everything one frame changed.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameOutcome {
    pub presence: PresenceVerdict,
    /// Set only for processed frames.
    pub features: Option<FeatureSet>,
    pub head: Option<HeadObservation>,
    /// Events fired this frame, in channel order.
    pub events: Vec<EventKind>,
    /// The banner was hidden at the start of this frame.
    pub alert_hidden: bool,
    /// Text newly put on the banner this frame.
    pub alert_shown: Option<String>,
    /// Counters to push to the display; set only for processed frames.
    pub stats: Option<CounterSet>,
}

impl FrameOutcome {
    pub(crate) fn skipped(presence: PresenceVerdict, alert_hidden: bool) -> Self {
        Self {
            presence,
            features: None,
            head: None,
            events: Vec::new(),
            alert_hidden,
            alert_shown: None,
            stats: None,
        }
    }

    pub fn is_processed(&self) -> bool {
        self.presence == PresenceVerdict::Present
    }
}

pub struct ProctorSession {
    config: ProctorConfig,
    absence: AbsenceTimer,
    blink: BlinkChannel,
    mouth: MouthChannel,
    head: HeadPoseChannel,
    counters: CounterSet,
    alerts: AlertSlot,
    /// Time of the first frame since construction or the last restart.
    started: Option<Instant>,
    frames_seen: u64,
    frames_processed: u64,
}

impl ProctorSession {
    /// Start a session. Fails if `config` does not validate.
    pub fn new(config: ProctorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let t = config.thresholds;
        let w = config.timings;
        Ok(Self {
            absence: AbsenceTimer::new(w.absence_grace()),
            blink: BlinkChannel::new(t.eye_aperture, w.blink_debounce()),
            mouth: MouthChannel::new(t.mouth_aperture, w.mouth_debounce()),
            head: HeadPoseChannel::new(t, w.head_debounce()),
            counters: CounterSet::default(),
            alerts: AlertSlot::new(),
            started: None,
            frames_seen: 0,
            frames_processed: 0,
            config,
        })
    }

    pub fn config(&self) -> &ProctorConfig {
        &self.config
    }

    pub fn counters(&self) -> &CounterSet {
        &self.counters
    }

    pub fn current_alert(&self) -> Option<&str> {
        self.alerts.message()
    }

    pub fn head_state(&self) -> HeadState {
        self.head.current()
    }

    pub fn frames_seen(&self) -> u64 {
        self.frames_seen
    }

    pub fn frames_processed(&self) -> u64 {
        self.frames_processed
    }

    pub fn started(&self) -> Option<Instant> {
        self.started
    }

    /// Classify one frame. `snapshot` is the first face of the frame, if any.
    pub fn process_frame(
        &mut self,
        snapshot: Option<&LandmarkSnapshot>,
        now: Instant,
    ) -> FrameOutcome {
        self.frames_seen += 1;
        if self.started.is_none() {
            self.started = Some(now);
            self.blink.arm(now);
            self.mouth.arm(now);
            self.head.arm(now);
        }
        let alert_hidden = self.alerts.expire(now);

        let located = visibility::locate(snapshot);
        let presence = self.absence.observe(located.is_ok(), now);

        let face = match (presence, located) {
            (PresenceVerdict::Present, Ok(face)) => face,
            (PresenceVerdict::Absent, _) => {
                let message = self.config.messages.face_absent.clone();
                self.alerts.show(&message);
                let mut outcome = FrameOutcome::skipped(presence, alert_hidden);
                outcome.alert_shown = Some(message);
                return outcome;
            }
            (_, located) => {
                if let Err(reason) = located {
                    tracing::debug!(%reason, "frame skipped");
                }
                return FrameOutcome::skipped(presence, alert_hidden);
            }
        };

        self.frames_processed += 1;
        let features = FeatureSet::extract(&face);

        let mut events = Vec::new();
        events.extend(self.blink.observe(&features, now, &mut self.counters));
        events.extend(self.mouth.observe(&features, now, &mut self.counters));
        let head = self.head.observe(&features, now, &mut self.counters);
        events.extend(head.event());

        let mut alert_shown = None;
        let display = self.config.timings.alert_display();
        for &kind in &events {
            let message = self.config.messages.for_event(kind);
            let accepted = self.alerts.offer(message, display, now);
            tracing::info!(kind = %kind, count = self.counters.get(kind), accepted, "event fired");
            if accepted {
                alert_shown = Some(message.to_string());
            }
        }

        FrameOutcome {
            presence,
            features: Some(features),
            head: Some(head),
            events,
            alert_hidden,
            alert_shown,
            stats: Some(self.counters),
        }
    }

    /// Restart the session: all channels, counters and the banner go back to
    /// their initial state. The next frame starts the debounce windows again.
    pub fn restart(&mut self) {
        tracing::info!(
            frames = self.frames_seen,
            events = self.counters.total(),
            "session restarted"
        );
        self.absence.reset();
        self.blink.reset();
        self.mouth.reset();
        self.head.reset();
        self.alerts.reset();
        self.counters = CounterSet::default();
        self.started = None;
        self.frames_seen = 0;
        self.frames_processed = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::landmarks::{index, Point, FACE_MESH_POINTS};
    use std::time::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    /// A neutral, front-facing face with open eyes and a closed mouth.
    fn neutral() -> Vec<Point> {
        let mut p = vec![Point::new(0.5, 0.5); FACE_MESH_POINTS];
        p[index::NOSE_TIP] = Point::new(0.5, 0.5);
        p[index::FOREHEAD] = Point::new(0.5, 0.2);
        p[index::CHIN] = Point::new(0.5, 0.8);
        p[index::UPPER_LIP] = Point::new(0.5, 0.65);
        p[index::LOWER_LIP] = Point::new(0.5, 0.66);
        p[index::LEFT_EYE_UPPER] = Point::new(0.4, 0.38);
        p[index::LEFT_EYE_LOWER] = Point::new(0.4, 0.41);
        p[index::RIGHT_EYE_UPPER] = Point::new(0.6, 0.38);
        p[index::RIGHT_EYE_LOWER] = Point::new(0.6, 0.41);
        p[index::LEFT_CHEEK] = Point::new(0.3, 0.5);
        p[index::RIGHT_CHEEK] = Point::new(0.7, 0.5);
        p
    }

    fn snapshot(edit: impl FnOnce(&mut Vec<Point>)) -> LandmarkSnapshot {
        let mut p = neutral();
        edit(&mut p);
        LandmarkSnapshot::new(p)
    }

    fn eyes_closed(p: &mut Vec<Point>) {
        p[index::LEFT_EYE_LOWER] = Point::new(0.4, 0.39);
        p[index::RIGHT_EYE_LOWER] = Point::new(0.6, 0.39);
    }

    fn mouth_open(p: &mut Vec<Point>) {
        p[index::LOWER_LIP] = Point::new(0.5, 0.70);
    }

    fn turned_left(p: &mut Vec<Point>) {
        // Nose moves towards the left cheek.
        p[index::NOSE_TIP] = Point::new(0.42, 0.5);
    }

    fn session() -> ProctorSession {
        ProctorSession::new(ProctorConfig::default()).unwrap()
    }

    #[test]
    fn test_neutral_face_fires_nothing() {
        let t0 = Instant::now();
        let mut s = session();
        let out = s.process_frame(Some(&snapshot(|_| {})), t0);
        assert!(out.is_processed());
        assert!(out.events.is_empty());
        assert_eq!(out.head.map(|h| h.classified), Some(HeadState::Stable));
        assert_eq!(out.stats, Some(CounterSet::default()));
        assert_eq!(s.current_alert(), None);
    }

    #[test]
    fn test_nothing_fires_on_first_frame() {
        let t0 = Instant::now();
        let mut s = session();
        let snap = snapshot(|p| {
            eyes_closed(p);
            mouth_open(p);
            turned_left(p);
        });
        let out = s.process_frame(Some(&snap), t0);
        assert!(out.events.is_empty());
        assert_eq!(out.alert_shown, None);
        assert_eq!(s.started(), Some(t0));
        assert_eq!(s.head_state(), HeadState::Stable);
    }

    #[test]
    fn test_blink_fires_and_shows_alert() {
        let t0 = Instant::now();
        let mut s = session();
        s.process_frame(Some(&snapshot(|_| {})), t0);
        let out = s.process_frame(Some(&snapshot(eyes_closed)), t0 + ms(1001));
        assert_eq!(out.events, [EventKind::Blink]);
        assert_eq!(out.alert_shown.as_deref(), Some(s.config().messages.eyes_closed.as_str()));
        assert_eq!(s.counters().blink, 1);
    }

    #[test]
    fn test_eyes_closed_for_1500ms_from_start_is_one_blink() {
        let t0 = Instant::now();
        let mut s = session();
        let closed = snapshot(eyes_closed);
        let mut fired_at = Vec::new();
        for i in 0..=45 {
            let out = s.process_frame(Some(&closed), t0 + ms(i * 33));
            if out.events.contains(&EventKind::Blink) {
                fired_at.push(i * 33);
            }
        }
        assert_eq!(s.counters().blink, 1);
        assert_eq!(fired_at, [1023]);
    }

    #[test]
    fn test_concurrent_events_count_but_share_one_banner() {
        let t0 = Instant::now();
        let mut s = session();
        let snap = snapshot(|p| {
            eyes_closed(p);
            mouth_open(p);
            turned_left(p);
        });
        s.process_frame(Some(&snapshot(|_| {})), t0);
        let out = s.process_frame(Some(&snap), t0 + ms(3001));
        assert_eq!(
            out.events,
            [EventKind::Blink, EventKind::MouthOpen, EventKind::HeadLeft]
        );
        assert_eq!(s.counters().total(), 3);
        // Only the first event reaches the banner.
        assert_eq!(s.current_alert(), Some(s.config().messages.eyes_closed.as_str()));
    }

    #[test]
    fn test_banner_hides_after_display_time() {
        let t0 = Instant::now();
        let mut s = session();
        s.process_frame(Some(&snapshot(|_| {})), t0);
        let shown = t0 + ms(1001);
        s.process_frame(Some(&snapshot(eyes_closed)), shown);

        let out = s.process_frame(Some(&snapshot(|_| {})), shown + ms(2999));
        assert!(!out.alert_hidden);

        let out = s.process_frame(Some(&snapshot(|_| {})), shown + ms(3000));
        assert!(out.alert_hidden);
        assert_eq!(s.current_alert(), None);
    }

    #[test]
    fn test_mouth_alert_dropped_while_banner_busy() {
        let t0 = Instant::now();
        let mut s = session();
        s.process_frame(Some(&snapshot(|_| {})), t0);
        s.process_frame(Some(&snapshot(eyes_closed)), t0 + ms(1001));
        let out = s.process_frame(Some(&snapshot(mouth_open)), t0 + ms(3001));
        assert_eq!(out.events, [EventKind::MouthOpen]);
        assert_eq!(out.alert_shown, None);
        assert_eq!(s.counters().mouth_open, 1);
        assert_eq!(s.current_alert(), Some(s.config().messages.eyes_closed.as_str()));
    }

    #[test]
    fn test_short_absence_skips_quietly() {
        let t0 = Instant::now();
        let mut s = session();
        let out = s.process_frame(None, t0);
        assert_eq!(out.presence, PresenceVerdict::Pending);
        assert_eq!(out.features, None);
        assert_eq!(out.stats, None);

        let out = s.process_frame(None, t0 + ms(1900));
        assert_eq!(out.presence, PresenceVerdict::Pending);
        assert_eq!(out.alert_shown, None);
        assert_eq!(s.frames_processed(), 0);
    }

    #[test]
    fn test_long_absence_alerts_every_frame() {
        let t0 = Instant::now();
        let mut s = session();
        s.process_frame(None, t0);
        let absent = s.config().messages.face_absent.clone();

        let out = s.process_frame(None, t0 + ms(2100));
        assert_eq!(out.presence, PresenceVerdict::Absent);
        assert_eq!(out.alert_shown.as_deref(), Some(absent.as_str()));
        assert_eq!(out.features, None);

        let out = s.process_frame(None, t0 + ms(2133));
        assert_eq!(out.alert_shown.as_deref(), Some(absent.as_str()));
        assert_eq!(s.counters().total(), 0);
    }

    #[test]
    fn test_unusable_snapshot_counts_as_absent() {
        let t0 = Instant::now();
        let mut s = session();
        // Would be a blink, but the chin is NaN so nothing is evaluated.
        let snap = snapshot(|p| {
            eyes_closed(p);
            p[index::CHIN] = Point::new(f64::NAN, 0.8);
        });
        let out = s.process_frame(Some(&snap), t0);
        assert_eq!(out.presence, PresenceVerdict::Pending);
        assert!(out.events.is_empty());
        assert_eq!(s.counters().blink, 0);
    }

    #[test]
    fn test_absence_does_not_block_temporary_alerts() {
        let t0 = Instant::now();
        let mut s = session();
        s.process_frame(None, t0);
        s.process_frame(None, t0 + ms(2500));
        let out = s.process_frame(Some(&snapshot(turned_left)), t0 + ms(2600));
        assert_eq!(out.events, [EventKind::HeadLeft]);
        assert_eq!(out.alert_shown.as_deref(), Some(s.config().messages.head_left.as_str()));
    }

    #[test]
    fn test_head_turn_counted_once_per_move() {
        let t0 = Instant::now();
        let mut s = session();
        let left = snapshot(turned_left);
        s.process_frame(Some(&snapshot(|_| {})), t0);
        let first = s.process_frame(Some(&left), t0 + ms(2001));
        assert_eq!(first.events, [EventKind::HeadLeft]);
        assert!(first.alert_shown.is_some());

        let held = s.process_frame(Some(&left), t0 + ms(2034));
        assert!(held.events.is_empty());
        assert_eq!(held.alert_shown, None);
        assert_eq!(s.counters().head_left, 1);
        assert_eq!(s.head_state(), HeadState::Left);
    }

    #[test]
    fn test_restart_clears_everything() {
        let t0 = Instant::now();
        let mut s = session();
        s.process_frame(Some(&snapshot(|_| {})), t0);
        s.process_frame(Some(&snapshot(eyes_closed)), t0 + ms(1001));
        assert_eq!(s.counters().blink, 1);
        s.restart();
        assert_eq!(*s.counters(), CounterSet::default());
        assert_eq!(s.current_alert(), None);
        assert_eq!(s.frames_seen(), 0);
        assert_eq!(s.started(), None);

        // The first frame after a restart opens a fresh window.
        let restarted = t0 + ms(1011);
        let out = s.process_frame(Some(&snapshot(eyes_closed)), restarted);
        assert!(out.events.is_empty());
        let out = s.process_frame(Some(&snapshot(eyes_closed)), restarted + ms(1001));
        assert_eq!(out.events, [EventKind::Blink]);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = ProctorConfig::default();
        config.thresholds.eye_aperture = f64::INFINITY;
        assert!(ProctorSession::new(config).is_err());
    }
}
