//! Dispatcher — turns key actions into mixer commands and overlay updates.
//!
//! [`VolumeDispatcher`] receives [`KeyAction`]s over a `tokio::sync::mpsc`
//! channel, runs the matching [`VolumeController`] call and forwards the
//! resulting [`VolumeState`] to the overlay.
//!
//! # Flow
//!
//! ```text
//! KeyAction::VolumeUp    ──▶ controller.adjust(+step) ─┐
//! KeyAction::VolumeDown  ──▶ controller.adjust(-step) ─┼─ Ok  ─▶ update_tx + notify
//! KeyAction::ToggleMute  ──▶ controller.flip_mute()  ──┘
//!                                                      └─ Err ─▶ log::warn, no overlay
//! ```
//!
//! Actions are handled one at a time, in arrival order.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::input::KeyAction;
use crate::volume::{VolumeController, VolumeError, VolumeState};

/// Callback run after every overlay update (used to wake the UI thread).
pub type Notifier = Box<dyn Fn() + Send + Sync>;

/// Drives the key → mixer → overlay loop.
pub struct VolumeDispatcher {
    controller: Arc<dyn VolumeController>,
    step: u8,
    announce_on_start: bool,
    notifier: Option<Notifier>,
}

impl VolumeDispatcher {
    /// Create a dispatcher that moves the volume by `step` percent per key
    /// press.
    pub fn new(controller: Arc<dyn VolumeController>, step: u8) -> Self {
        Self {
            controller,
            step,
            announce_on_start: false,
            notifier: None,
        }
    }

    /// Publish the current mixer state once before handling any action.
    pub fn announce_on_start(mut self, enabled: bool) -> Self {
        self.announce_on_start = enabled;
        self
    }

    /// Run `notify` after each update is sent.
    pub fn with_notifier(mut self, notify: impl Fn() + Send + Sync + 'static) -> Self {
        self.notifier = Some(Box::new(notify));
        self
    }

    /// Run until `action_rx` is closed.
    ///
    /// Spawn this as a tokio task from `main()`.
    pub async fn run(
        self,
        mut action_rx: mpsc::Receiver<KeyAction>,
        update_tx: mpsc::Sender<VolumeState>,
    ) {
        if self.announce_on_start {
            match self.controller.query().await {
                Ok(state) => self.publish(&update_tx, state).await,
                Err(e) => log::warn!("dispatch: cannot read initial volume: {e}"),
            }
        }

        while let Some(action) = action_rx.recv().await {
            match self.apply(action).await {
                Ok(state) => {
                    log::debug!("dispatch: {action:?} -> {state:?}");
                    self.publish(&update_tx, state).await;
                }
                Err(e) => log::warn!("dispatch: {action:?} failed: {e}"),
            }
        }

        log::info!("dispatch: action channel closed, dispatcher shutting down");
    }

    /// Perform one action against the mixer.
    pub async fn apply(&self, action: KeyAction) -> Result<VolumeState, VolumeError> {
        let step = i16::from(self.step);
        match action {
            KeyAction::VolumeUp => self.controller.adjust(step).await,
            KeyAction::VolumeDown => self.controller.adjust(-step).await,
            KeyAction::ToggleMute => self.controller.flip_mute().await,
        }
    }

    async fn publish(&self, update_tx: &mpsc::Sender<VolumeState>, state: VolumeState) {
        if update_tx.send(state).await.is_err() {
            log::debug!("dispatch: overlay gone, dropping update");
            return;
        }
        if let Some(notify) = &self.notifier {
            notify();
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
