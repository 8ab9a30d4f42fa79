//! Dedicated OS-thread keyboard listener reading an evdev device.
//!
//! [`InputListener`] opens the device up front (so a missing or unreadable
//! node is reported to the caller), then moves it onto its own thread where
//! `fetch_events` blocks until the kernel delivers key events.
//!
//! # Shutdown caveat
//!
//! A blocking `fetch_events` cannot be interrupted.  Dropping the handle sets
//! a stop flag; the thread notices it after the next batch of events arrives
//! and exits, releasing the device.  Until then it holds no locks and costs
//! no CPU.

use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use evdev::{Device, InputEvent, InputEventKind};
use thiserror::Error;
use tokio::sync::mpsc;

use super::{KeyAction, KeyInterpreter, KeyState};

// ---------------------------------------------------------------------------
// InputError
// ---------------------------------------------------------------------------

/// Errors that can occur while starting the listener.
#[derive(Debug, Error)]
pub enum InputError {
    /// The device node could not be opened (missing, renumbered, or no
    /// permission; see the `input` group).
    #[error("cannot open input device {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The OS refused to create the listener thread.
    #[error("cannot spawn input listener thread: {0}")]
    Thread(#[source] std::io::Error),
}

// ---------------------------------------------------------------------------
// InputListener
// ---------------------------------------------------------------------------

/// Handle to a running listener thread.
///
/// Construct one with [`InputListener::start`].  Drop it to stop forwarding
/// actions.
pub struct InputListener {
    /// Shared stop flag — set `true` on [`Drop`].
    stop: Arc<AtomicBool>,
    /// Kept so the thread is not detached; never joined because the read
    /// may block indefinitely.
    _thread: std::thread::JoinHandle<()>,
}

impl InputListener {
    /// Open `path` and spawn a thread that forwards recognised shortcuts as
    /// [`KeyAction`]s on `tx`.
    ///
    /// `tx` is a `tokio::sync::mpsc` sender; the thread uses `blocking_send`
    /// so it works from a non-async context.
    ///
    /// # Errors
    ///
    /// [`InputError::Open`] if the device cannot be opened,
    /// [`InputError::Thread`] if the thread cannot be spawned.
    pub fn start(path: &Path, tx: mpsc::Sender<KeyAction>) -> Result<Self, InputError> {
        let device = Device::open(path).map_err(|source| InputError::Open {
            path: path.to_path_buf(),
            source,
        })?;

        log::info!(
            "input: listening on {} ({})",
            path.display(),
            device.name().unwrap_or("unnamed device")
        );

        let stop = Arc::new(AtomicBool::new(false));
        let stop_clone = Arc::clone(&stop);
        let thread_path = path.to_path_buf();

        let thread = std::thread::Builder::new()
            .name("input-listener".into())
            .spawn(move || read_loop(device, &thread_path, &stop_clone, &tx))
            .map_err(InputError::Thread)?;

        Ok(Self {
            stop,
            _thread: thread,
        })
    }
}

impl Drop for InputListener {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

// ---------------------------------------------------------------------------
// Read loop
// ---------------------------------------------------------------------------

/// Block on the device until it fails, the stop flag is set, or the
/// receiving side goes away.
fn read_loop(
    mut device: Device,
    path: &Path,
    stop: &AtomicBool,
    tx: &mpsc::Sender<KeyAction>,
) {
    let mut interpreter = KeyInterpreter::new();

    loop {
        let events = match device.fetch_events() {
            Ok(events) => events,
            Err(e) => {
                log::error!("input: reading {} failed: {e}", path.display());
                return;
            }
        };

        if forward(events, &mut interpreter, stop, tx).is_break() {
            return;
        }
    }
}

/// Interpret one batch of raw events and send the resulting actions.
///
/// Non-key events and unknown key values are skipped.  Breaks when the stop
/// flag is set or the receiving side is gone.
fn forward(
    events: impl IntoIterator<Item = InputEvent>,
    interpreter: &mut KeyInterpreter,
    stop: &AtomicBool,
    tx: &mpsc::Sender<KeyAction>,
) -> ControlFlow<()> {
    for event in events {
        if stop.load(Ordering::Relaxed) {
            log::debug!("input: listener stopped");
            return ControlFlow::Break(());
        }

        let InputEventKind::Key(key) = event.kind() else {
            continue;
        };
        let Some(state) = KeyState::from_value(event.value()) else {
            continue;
        };

        if let Some(action) = interpreter.feed(key, state) {
            log::debug!("input: {key:?} -> {action:?}");
            if tx.blocking_send(action).is_err() {
                log::debug!("input: action channel closed, listener exiting");
                return ControlFlow::Break(());
            }
        }
    }
    ControlFlow::Continue(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::{EventType, Key};
    use tempfile::tempdir;

    fn key(key: Key, value: i32) -> InputEvent {
        InputEvent::new(EventType::KEY, key.code(), value)
    }

    fn syn() -> InputEvent {
        InputEvent::new(EventType::SYNCHRONIZATION, 0, 0)
    }

    fn drain(rx: &mut mpsc::Receiver<KeyAction>) -> Vec<KeyAction> {
        let mut out = Vec::new();
        while let Ok(action) = rx.try_recv() {
            out.push(action);
        }
        out
    }

    #[test]
    fn alt_up_batch_sends_one_action() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut interp = KeyInterpreter::new();
        let stop = AtomicBool::new(false);

        let batch = [
            key(Key::KEY_LEFTALT, 1),
            syn(),
            key(Key::KEY_UP, 1),
            syn(),
            key(Key::KEY_UP, 0),
            key(Key::KEY_LEFTALT, 0),
        ];

        assert!(forward(batch, &mut interp, &stop, &tx).is_continue());
        assert_eq!(drain(&mut rx), vec![KeyAction::VolumeUp]);
        assert!(!interp.alt_held());
    }

    #[test]
    fn alt_state_carries_across_batches() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut interp = KeyInterpreter::new();
        let stop = AtomicBool::new(false);

        let _ = forward([key(Key::KEY_RIGHTALT, 1)], &mut interp, &stop, &tx);
        let _ = forward([key(Key::KEY_M, 1)], &mut interp, &stop, &tx);

        assert_eq!(drain(&mut rx), vec![KeyAction::ToggleMute]);
    }

    #[test]
    fn non_key_repeat_unknown_value_and_unmapped_keys_send_nothing() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut interp = KeyInterpreter::new();
        let stop = AtomicBool::new(false);

        let batch = [
            syn(),
            InputEvent::new(EventType::RELATIVE, 0, 5),
            key(Key::KEY_VOLUMEUP, 2),
            key(Key::KEY_VOLUMEUP, 7),
            key(Key::KEY_A, 1),
            key(Key::KEY_UP, 1),
            key(Key::KEY_VOLUMEDOWN, 0),
        ];

        assert!(forward(batch, &mut interp, &stop, &tx).is_continue());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn media_keys_send_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut interp = KeyInterpreter::new();
        let stop = AtomicBool::new(false);

        let batch = [
            key(Key::KEY_VOLUMEDOWN, 1),
            key(Key::KEY_VOLUMEDOWN, 0),
            key(Key::KEY_MUTE, 1),
        ];

        let _ = forward(batch, &mut interp, &stop, &tx);
        assert_eq!(
            drain(&mut rx),
            vec![KeyAction::VolumeDown, KeyAction::ToggleMute]
        );
    }

    #[test]
    fn closed_channel_breaks() {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        let mut interp = KeyInterpreter::new();
        let stop = AtomicBool::new(false);

        assert!(forward([key(Key::KEY_MUTE, 1)], &mut interp, &stop, &tx).is_break());
    }

    #[test]
    fn stop_flag_breaks_before_sending() {
        let (tx, mut rx) = mpsc::channel(8);
        let mut interp = KeyInterpreter::new();
        let stop = AtomicBool::new(true);

        assert!(forward([key(Key::KEY_VOLUMEUP, 1)], &mut interp, &stop, &tx).is_break());
        assert!(drain(&mut rx).is_empty());
    }

    #[test]
    fn empty_batch_continues() {
        let (tx, _rx) = mpsc::channel(1);
        let mut interp = KeyInterpreter::new();
        let stop = AtomicBool::new(false);

        assert!(forward(Vec::new(), &mut interp, &stop, &tx).is_continue());
    }

    #[test]
    fn missing_device_reports_open_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("event99");
        let (tx, _rx) = mpsc::channel(1);

        match InputListener::start(&path, tx) {
            Err(InputError::Open { path: p, .. }) => assert_eq!(p, path),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("opening a missing device must fail"),
        }
    }

    #[test]
    fn open_error_message_names_the_path() {
        let err = InputError::Open {
            path: PathBuf::from("/dev/input/event2"),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        };
        assert!(err.to_string().contains("/dev/input/event2"));
    }
}
