use crate::overlay::OverlayPoint;
use crate::session::FrameOutcome;
use crate::stats::CounterSet;

/// Presentation layer fed by the frame loop.
pub trait Presenter {
    /// Put `message` on the alert banner, replacing any current text.
    fn show_alert(&mut self, message: &str);
    fn hide_alert(&mut self);
    /// Called once per processed frame with the current counters.
    fn update_stats(&mut self, counters: &CounterSet);
    fn draw_overlay(&mut self, _points: &[OverlayPoint]) {}
}

impl FrameOutcome {
    /// Replay this frame's visible effects onto `presenter`: hide, then show,
    /// then stats.
    pub fn present_to<P: Presenter + ?Sized>(&self, presenter: &mut P) {
        if self.alert_hidden {
            presenter.hide_alert();
        }
        if let Some(message) = &self.alert_shown {
            presenter.show_alert(message);
        }
        if let Some(counters) = &self.stats {
            presenter.update_stats(counters);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::absence::PresenceVerdict;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Presenter for Recorder {
        fn show_alert(&mut self, message: &str) {
            self.calls.push(format!("show:{message}"));
        }
        fn hide_alert(&mut self) {
            self.calls.push("hide".to_string());
        }
        fn update_stats(&mut self, counters: &CounterSet) {
            self.calls.push(format!("stats:{}", counters.total()));
        }
    }

    #[test]
    fn test_present_order() {
        let outcome = FrameOutcome {
            presence: PresenceVerdict::Present,
            features: None,
            head: None,
            events: Vec::new(),
            alert_hidden: true,
            alert_shown: Some("next".to_string()),
            stats: Some(CounterSet::default()),
        };
        let mut recorder = Recorder::default();
        outcome.present_to(&mut recorder);
        assert_eq!(recorder.calls, ["hide", "show:next", "stats:0"]);
    }

    #[test]
    fn test_skipped_frame_presents_nothing() {
        let outcome = FrameOutcome::skipped(PresenceVerdict::Pending, false);
        let mut recorder = Recorder::default();
        outcome.present_to(&mut recorder);
        assert!(recorder.calls.is_empty());
    }
}
