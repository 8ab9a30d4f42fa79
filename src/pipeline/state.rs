//! What the overlay is showing and until when.
//!
//! [`OverlayState`] holds the last reported [`VolumeState`] and the instant
//! at which the overlay should disappear.  It contains no GUI types, so the
//! auto-hide behaviour is tested without opening a window; the egui app
//! asks it every frame whether to be visible.
//!
//! ```text
//! Hidden ──show()──▶ Visible(deadline = now + hide_after)
//! Visible ──show()──▶ Visible(deadline reset)
//! Visible ──now ≥ deadline──▶ Hidden
//! ```

use std::time::{Duration, Instant};

use crate::volume::VolumeState;

/// Overlay content plus the auto-hide deadline.
#[derive(Debug, Clone)]
pub struct OverlayState {
    /// Last state reported by the mixer; `None` until the first update.
    current: Option<VolumeState>,
    /// When the overlay should hide; `None` while hidden.
    hide_at: Option<Instant>,
    /// Auto-hide timeout.
    hide_after: Duration,
}

impl OverlayState {
    pub fn new(hide_after: Duration) -> Self {
        Self {
            current: None,
            hide_at: None,
            hide_after,
        }
    }

    /// Display `state` and restart the hide timer.
    pub fn show(&mut self, state: VolumeState, now: Instant) {
        self.current = Some(state);
        self.hide_at = Some(now + self.hide_after);
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        self.hide_at.is_some_and(|t| now < t)
    }

    /// Time left before the overlay hides; `None` when already hidden.
    pub fn remaining(&self, now: Instant) -> Option<Duration> {
        self.hide_at
            .filter(|&t| now < t)
            .map(|t| t.saturating_duration_since(now))
    }

    /// Label text; a placeholder until the mixer has been queried.
    pub fn label(&self) -> String {
        self.current
            .map(|s| s.label())
            .unwrap_or_else(|| "Volume: ??%".to_string())
    }

    /// Progress-bar fill in `0.0..=1.0`.
    pub fn fraction(&self) -> f32 {
        self.current.map(|s| s.fraction()).unwrap_or(0.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    const HIDE: Duration = Duration::from_millis(2_000);

    #[test]
    fn starts_hidden_with_placeholder() {
        let overlay = OverlayState::new(HIDE);
        let now = Instant::now();
        assert!(!overlay.is_visible(now));
        assert_eq!(overlay.remaining(now), None);
        assert_eq!(overlay.label(), "Volume: ??%");
        assert_eq!(overlay.fraction(), 0.0);
    }

    #[test]
    fn show_makes_visible_until_timeout() {
        let mut overlay = OverlayState::new(HIDE);
        let t0 = Instant::now();
        overlay.show(VolumeState::new(40, false), t0);

        assert!(overlay.is_visible(t0));
        assert!(overlay.is_visible(t0 + Duration::from_millis(1_999)));
        assert!(!overlay.is_visible(t0 + HIDE));
        assert_eq!(overlay.label(), "Volume: 40%");
        assert_eq!(overlay.fraction(), 0.4);
    }

    #[test]
    fn new_update_resets_the_timer() {
        let mut overlay = OverlayState::new(HIDE);
        let t0 = Instant::now();
        overlay.show(VolumeState::new(40, false), t0);

        let t1 = t0 + Duration::from_millis(1_500);
        overlay.show(VolumeState::new(45, false), t1);

        assert!(overlay.is_visible(t0 + Duration::from_millis(3_000)));
        assert!(!overlay.is_visible(t1 + HIDE));
        assert_eq!(overlay.remaining(t1), Some(HIDE));
        assert_eq!(overlay.label(), "Volume: 45%");
    }

    #[test]
    fn muted_state_shows_muted_with_empty_bar() {
        let mut overlay = OverlayState::new(HIDE);
        overlay.show(VolumeState::new(70, true), Instant::now());
        assert_eq!(overlay.label(), "Muted");
        assert_eq!(overlay.fraction(), 0.0);
    }

    #[test]
    fn content_survives_the_timeout() {
        let mut overlay = OverlayState::new(HIDE);
        let t0 = Instant::now();
        overlay.show(VolumeState::new(10, false), t0);

        let later = t0 + HIDE + Duration::from_millis(1);
        assert!(!overlay.is_visible(later));
        assert_eq!(overlay.remaining(later), None);
        assert_eq!(overlay.label(), "Volume: 10%");
    }
}
