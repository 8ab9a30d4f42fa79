//! Keyboard capture and key interpretation, backed by `evdev`.
//!
//! # Design
//!
//! Reading an event device is a blocking call, so it runs on a **dedicated
//! OS thread** owned by [`InputListener`].  Each raw key event is passed
//! through a [`KeyInterpreter`], which turns the small fixed table of volume
//! shortcuts into [`KeyAction`]s that are forwarded over a
//! `tokio::sync::mpsc` channel.
//!
//! | Key | Needs Alt | Action |
//! |-----|-----------|--------|
//! | `KEY_VOLUMEUP`   | no  | [`KeyAction::VolumeUp`] |
//! | `KEY_VOLUMEDOWN` | no  | [`KeyAction::VolumeDown`] |
//! | `KEY_MUTE`       | no  | [`KeyAction::ToggleMute`] |
//! | `KEY_UP`         | yes | [`KeyAction::VolumeUp`] |
//! | `KEY_DOWN`       | yes | [`KeyAction::VolumeDown`] |
//! | `KEY_M`          | yes | [`KeyAction::ToggleMute`] |
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use volume_osd::input::{resolve_device, InputListener};
//! use volume_osd::config::InputConfig;
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let path = resolve_device(&InputConfig::default()).expect("no keyboard");
//! let _listener = InputListener::start(&path, tx).expect("cannot open device");
//!
//! // In your async loop:
//! // while let Some(action) = rx.recv().await { ... }
//! ```

pub mod discover;
pub mod listener;

pub use discover::{is_volume_keyboard, resolve_device};
pub use listener::{InputError, InputListener};

use evdev::Key;

// ---------------------------------------------------------------------------
// KeyAction
// ---------------------------------------------------------------------------

/// One of the three things a recognised shortcut can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    /// Raise the volume by one step.
    VolumeUp,
    /// Lower the volume by one step.
    VolumeDown,
    /// Flip between muted and audible.
    ToggleMute,
}

// ---------------------------------------------------------------------------
// KeyState
// ---------------------------------------------------------------------------

/// The `value` field of an `EV_KEY` event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    Released,
    Pressed,
    /// Autorepeat while the key is held.
    Repeat,
}

impl KeyState {
    /// Decode the kernel's key value (`0`, `1`, `2`).
    pub fn from_value(value: i32) -> Option<Self> {
        match value {
            0 => Some(Self::Released),
            1 => Some(Self::Pressed),
            2 => Some(Self::Repeat),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// action_for
// ---------------------------------------------------------------------------

/// Look up the action bound to `key`.
///
/// Dedicated multimedia keys work on their own; the arrow keys and `M` only
/// count while Alt is held.
///
/// ```
/// use evdev::Key;
/// use volume_osd::input::{action_for, KeyAction};
///
/// assert_eq!(action_for(Key::KEY_VOLUMEUP, false), Some(KeyAction::VolumeUp));
/// assert_eq!(action_for(Key::KEY_UP, true), Some(KeyAction::VolumeUp));
/// assert_eq!(action_for(Key::KEY_UP, false), None);
/// ```
pub fn action_for(key: Key, alt_held: bool) -> Option<KeyAction> {
    match key {
        Key::KEY_VOLUMEUP => Some(KeyAction::VolumeUp),
        Key::KEY_VOLUMEDOWN => Some(KeyAction::VolumeDown),
        Key::KEY_MUTE => Some(KeyAction::ToggleMute),
        Key::KEY_UP if alt_held => Some(KeyAction::VolumeUp),
        Key::KEY_DOWN if alt_held => Some(KeyAction::VolumeDown),
        Key::KEY_M if alt_held => Some(KeyAction::ToggleMute),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// KeyInterpreter
// ---------------------------------------------------------------------------

/// Turns a stream of key events into [`KeyAction`]s.
///
/// The only state is whether each Alt key is currently down.  Actions fire
/// on the initial press only; autorepeat and release events never trigger.
#[derive(Debug, Default)]
pub struct KeyInterpreter {
    left_alt: bool,
    right_alt: bool,
}

impl KeyInterpreter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `true` while either Alt key is held.
    pub fn alt_held(&self) -> bool {
        self.left_alt || self.right_alt
    }

    /// Feed one key event; returns the action it triggers, if any.
    pub fn feed(&mut self, key: Key, state: KeyState) -> Option<KeyAction> {
        let down = state != KeyState::Released;
        match key {
            Key::KEY_LEFTALT => {
                self.left_alt = down;
                None
            }
            Key::KEY_RIGHTALT => {
                self.right_alt = down;
                None
            }
            _ if state == KeyState::Pressed => action_for(key, self.alt_held()),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
