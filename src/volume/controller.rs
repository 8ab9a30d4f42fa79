//! Core `VolumeController` trait and backend selection.
//!
//! Backends only implement the three primitives the utilities offer (query,
//! set an absolute level, toggle mute); the step logic lives in the provided
//! methods so every backend saturates the same way.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use super::{step_level, PactlController, VolumeState, WpctlController};
use crate::config::MixerBackend;

// ---------------------------------------------------------------------------
// VolumeError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the mixer.
#[derive(Debug, Error)]
pub enum VolumeError {
    /// The utility could not be started (usually: not installed).
    #[error("failed to run {program}: {source}")]
    Spawn {
        program: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// The utility ran but exited unsuccessfully.
    #[error("{program} exited with {status}: {stderr}")]
    CommandFailed {
        program: &'static str,
        status: std::process::ExitStatus,
        stderr: String,
    },

    /// The utility's output did not contain what we were looking for.
    #[error("unexpected mixer output: {0}")]
    Parse(String),
}

// ---------------------------------------------------------------------------
// VolumeController trait
// ---------------------------------------------------------------------------

/// Async trait for a system mixer.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// (e.g. wrapped in `Arc<dyn VolumeController>`).
#[async_trait]
pub trait VolumeController: Send + Sync {
    /// Current level and mute flag of the default sink.
    async fn query(&self) -> Result<VolumeState, VolumeError>;

    /// Set the default sink to `level` percent (`0..=100`).
    async fn set_level(&self, level: u8) -> Result<(), VolumeError>;

    /// Flip the default sink's mute flag.
    async fn toggle_mute(&self) -> Result<(), VolumeError>;

    /// Move the level by `delta` percent, saturating at the bounds.
    ///
    /// Returns the new level with the mute flag as it was; changing the
    /// level does not unmute.
    async fn adjust(&self, delta: i16) -> Result<VolumeState, VolumeError> {
        let current = self.query().await?;
        let level = step_level(current.level, delta);
        self.set_level(level).await?;
        Ok(VolumeState::new(level, current.muted))
    }

    /// Toggle mute and report the state the mixer ends up in.
    async fn flip_mute(&self) -> Result<VolumeState, VolumeError> {
        self.toggle_mute().await?;
        self.query().await
    }
}

/// Build the controller for the configured backend.
pub fn controller_for(backend: MixerBackend) -> Arc<dyn VolumeController> {
    match backend {
        MixerBackend::Pactl => Arc::new(PactlController::new()),
        MixerBackend::Wpctl => Arc::new(WpctlController::new()),
    }
}

// ---------------------------------------------------------------------------
// MemoryMixer  (test-only)
// ---------------------------------------------------------------------------

/// An in-process mixer for tests: no external utility, optional failure.
#[cfg(test)]
pub struct MemoryMixer {
    state: std::sync::Mutex<VolumeState>,
    fail: bool,
}

#[cfg(test)]
impl MemoryMixer {
    pub fn new(level: u8, muted: bool) -> Self {
        Self {
            state: std::sync::Mutex::new(VolumeState::new(level, muted)),
            fail: false,
        }
    }

    /// A mixer whose every call fails, like a missing `pactl`.
    pub fn broken() -> Self {
        Self {
            state: std::sync::Mutex::new(VolumeState::new(0, false)),
            fail: true,
        }
    }

    pub fn snapshot(&self) -> VolumeState {
        *self.state.lock().unwrap()
    }

    fn check(&self) -> Result<(), VolumeError> {
        if self.fail {
            Err(VolumeError::Spawn {
                program: "memory",
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
        } else {
            Ok(())
        }
    }
}

#[cfg(test)]
#[async_trait]
impl VolumeController for MemoryMixer {
    async fn query(&self) -> Result<VolumeState, VolumeError> {
        self.check()?;
        Ok(self.snapshot())
    }

    async fn set_level(&self, level: u8) -> Result<(), VolumeError> {
        self.check()?;
        self.state.lock().unwrap().level = level.min(super::MAX_LEVEL);
        Ok(())
    }

    async fn toggle_mute(&self) -> Result<(), VolumeError> {
        self.check()?;
        let mut state = self.state.lock().unwrap();
        state.muted = !state.muted;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn adjust_steps_and_saturates() {
        let mixer = MemoryMixer::new(90, false);

        assert_eq!(mixer.adjust(5).await.unwrap().level, 95);
        assert_eq!(mixer.adjust(5).await.unwrap().level, 100);
        assert_eq!(mixer.adjust(5).await.unwrap().level, 100);
        assert_eq!(mixer.snapshot().level, 100);

        assert_eq!(mixer.adjust(-5).await.unwrap().level, 95);
    }

    #[tokio::test]
    async fn adjust_keeps_mute_flag() {
        let mixer = MemoryMixer::new(40, true);
        let state = mixer.adjust(5).await.unwrap();
        assert_eq!(state, VolumeState::new(45, true));
    }

    #[tokio::test]
    async fn toggling_mute_twice_restores_audible_state() {
        let mixer = MemoryMixer::new(60, false);

        let muted = mixer.flip_mute().await.unwrap();
        assert!(muted.muted);
        assert_eq!(muted.level, 60);

        let restored = mixer.flip_mute().await.unwrap();
        assert_eq!(restored, VolumeState::new(60, false));
    }

    #[tokio::test]
    async fn failures_propagate() {
        let mixer = MemoryMixer::broken();
        assert!(matches!(
            mixer.adjust(5).await,
            Err(VolumeError::Spawn { .. })
        ));
        assert!(mixer.flip_mute().await.is_err());
    }
}
