//! Key action → volume command → overlay update.
//!
//! # Architecture
//!
//! ```text
//! InputListener thread ──KeyAction (mpsc)──▶ VolumeDispatcher::run()  ← tokio task
//!                                                   │
//!                                                   ├─ VolumeController (pactl / wpctl)
//!                                                   │
//!                                                   └─VolumeState (mpsc)──▶ VolumeOsdApp
//!                                                                            └─ OverlayState
//! ```
//!
//! The dispatcher is the only place that talks to the mixer; the UI only
//! ever sees finished [`VolumeState`](crate::volume::VolumeState)s.

pub mod runner;
pub mod state;

// ---------------------------------------------------------------------------
// Public re-exports
// ---------------------------------------------------------------------------

pub use runner::{Notifier, VolumeDispatcher};
pub use state::OverlayState;
