//! System volume control through external command-line utilities.
//!
//! This module provides:
//! * [`VolumeState`] — level + mute flag as reported by the mixer.
//! * [`step_level`] — the saturating step arithmetic.
//! * [`VolumeController`] — async trait implemented by every backend.
//! * [`PactlController`] / [`WpctlController`] — `pactl` and `wpctl` backends.
//! * [`VolumeError`] — error variants for volume operations.
//!
//! The program keeps no volume state of its own: every action queries the
//! mixer, changes it, and reports what the mixer now says.
//!
//! # Quick start
//!
//! ```rust,no_run
//! use volume_osd::config::MixerBackend;
//! use volume_osd::volume::controller_for;
//!
//! #[tokio::main]
//! async fn main() {
//!     let mixer = controller_for(MixerBackend::Pactl);
//!     let state = mixer.adjust(5).await.unwrap();
//!     println!("{}", state.label());
//! }
//! ```

pub mod command;
pub mod controller;
pub mod pactl;
pub mod wpctl;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use controller::{controller_for, VolumeController, VolumeError};
pub use pactl::PactlController;
pub use wpctl::WpctlController;

#[cfg(test)]
pub use controller::MemoryMixer;

// ---------------------------------------------------------------------------
// VolumeState
// ---------------------------------------------------------------------------

/// Highest level the overlay will set or display, in percent.
pub const MAX_LEVEL: u8 = 100;

/// Output volume and mute flag of the default sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VolumeState {
    /// Volume in percent, `0..=100`.
    pub level: u8,
    /// Whether the sink is silenced.  Muting never changes `level`.
    pub muted: bool,
}

impl VolumeState {
    pub fn new(level: u8, muted: bool) -> Self {
        Self {
            level: level.min(MAX_LEVEL),
            muted,
        }
    }

    /// Text shown in the overlay.
    ///
    /// ```
    /// use volume_osd::volume::VolumeState;
    ///
    /// assert_eq!(VolumeState::new(65, false).label(), "Volume: 65%");
    /// assert_eq!(VolumeState::new(65, true).label(), "Muted");
    /// ```
    pub fn label(&self) -> String {
        if self.muted {
            "Muted".to_string()
        } else {
            format!("Volume: {}%", self.level)
        }
    }

    /// Progress-bar fill in `0.0..=1.0`; an empty bar while muted.
    pub fn fraction(&self) -> f32 {
        if self.muted {
            0.0
        } else {
            f32::from(self.level) / f32::from(MAX_LEVEL)
        }
    }
}

// ---------------------------------------------------------------------------
// step_level
// ---------------------------------------------------------------------------

/// Apply a signed step to `current`, saturating at `0` and [`MAX_LEVEL`].
///
/// `current` is clamped first because mixers happily report levels above
/// 100 %.
///
/// ```
/// use volume_osd::volume::step_level;
///
/// assert_eq!(step_level(50, 5), 55);
/// assert_eq!(step_level(98, 5), 100);
/// assert_eq!(step_level(3, -5), 0);
/// assert_eq!(step_level(150, -5), 95);
/// ```
pub fn step_level(current: u8, delta: i16) -> u8 {
    let current = i16::from(current.min(MAX_LEVEL));
    let next = current.saturating_add(delta).clamp(0, i16::from(MAX_LEVEL));
    // In range after the clamp.
    next as u8
}

/// Parse a percentage token such as `65%`, clamping to `0..=100`.
pub(crate) fn parse_percent(token: &str) -> Option<u8> {
    let digits = token.strip_suffix('%')?;
    let value: u32 = digits.parse().ok()?;
    Some(value.min(u32::from(MAX_LEVEL)) as u8)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
