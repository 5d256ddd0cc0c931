//! Single-slot alert banner.
//!
//! Only one temporary alert is visible at a time. While one is showing, any
//! other temporary alert is dropped outright: nothing is queued and the hide
//! deadline is not extended. Persistent alerts (face absent) bypass the gate
//! and simply replace the banner text.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Default)]
pub struct AlertSlot {
    message: Option<String>,
    /// Pending hide deadline of the temporary alert; `Some` means the gate is shut.
    hide_at: Option<Instant>,
}

impl AlertSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show `message` immediately, replacing whatever is on screen. Does not
    /// touch the temporary-alert gate.
    pub fn show(&mut self, message: &str) {
        self.message = Some(message.to_string());
    }

    /// Show `message` for `duration` if no temporary alert is showing.
    /// Returns whether the alert was accepted.
    pub fn offer(&mut self, message: &str, duration: Duration, now: Instant) -> bool {
        if self.hide_at.is_some() {
            tracing::debug!(dropped = message, "alert dropped, another is showing");
            return false;
        }
        self.message = Some(message.to_string());
        self.hide_at = Some(now + duration);
        true
    }

    /// Hide the banner once the temporary alert's deadline has passed.
    /// Returns whether the banner was hidden.
    pub fn expire(&mut self, now: Instant) -> bool {
        match self.hide_at {
            Some(deadline) if now >= deadline => {
                self.message = None;
                self.hide_at = None;
                true
            }
            _ => false,
        }
    }

    /// Text currently on the banner, if visible.
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Whether a temporary alert is holding the slot.
    pub fn is_shown(&self) -> bool {
        self.hide_at.is_some()
    }

    pub fn hide_at(&self) -> Option<Instant> {
        self.hide_at
    }

    pub fn reset(&mut self) {
        self.message = None;
        self.hide_at = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn test_offer_into_empty_slot() {
        let t0 = Instant::now();
        let mut slot = AlertSlot::new();
        assert!(slot.offer("eyes", ms(3000), t0));
        assert_eq!(slot.message(), Some("eyes"));
        assert!(slot.is_shown());
        assert_eq!(slot.hide_at(), Some(t0 + ms(3000)));
    }

    #[test]
    fn test_second_offer_dropped_without_extending() {
        let t0 = Instant::now();
        let mut slot = AlertSlot::new();
        slot.offer("eyes", ms(3000), t0);
        assert!(!slot.offer("mouth", ms(3000), t0 + ms(1000)));
        assert_eq!(slot.message(), Some("eyes"));
        assert_eq!(slot.hide_at(), Some(t0 + ms(3000)));
    }

    #[test]
    fn test_expire_reopens_slot() {
        let t0 = Instant::now();
        let mut slot = AlertSlot::new();
        slot.offer("eyes", ms(3000), t0);
        assert!(!slot.expire(t0 + ms(2999)));
        assert!(slot.expire(t0 + ms(3000)));
        assert_eq!(slot.message(), None);
        assert!(!slot.is_shown());
        assert!(slot.offer("mouth", ms(3000), t0 + ms(3001)));
    }

    #[test]
    fn test_persistent_alert_replaces_text_only() {
        let t0 = Instant::now();
        let mut slot = AlertSlot::new();
        slot.offer("eyes", ms(3000), t0);
        slot.show("absent");
        assert_eq!(slot.message(), Some("absent"));
        // The temporary alert's deadline still governs the gate.
        assert!(slot.is_shown());
        assert!(slot.expire(t0 + ms(3000)));
        assert_eq!(slot.message(), None);
    }

    #[test]
    fn test_persistent_alert_does_not_block_offers() {
        let t0 = Instant::now();
        let mut slot = AlertSlot::new();
        slot.show("absent");
        assert!(!slot.is_shown());
        assert!(!slot.expire(t0));
        assert!(slot.offer("head left", ms(3000), t0));
        assert_eq!(slot.message(), Some("head left"));
    }
}
