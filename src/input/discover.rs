//! Picking which event device to read.
//!
//! `/dev/input/eventN` numbering changes between boots and when devices are
//! plugged in, so the configured path is only a first guess.  When it is
//! missing and auto-discovery is enabled, every readable event device is
//! checked for the keys the overlay reacts to and the first match (by path)
//! wins.  There is no hot-plug tracking: the choice is made once at startup.

use std::path::{Path, PathBuf};

use evdev::{AttributeSetRef, Key};

use crate::config::InputConfig;

/// Resolve the device to listen on.
///
/// Returns the configured path when it exists, otherwise (if enabled) the
/// first discovered volume-capable keyboard, otherwise `None`.
pub fn resolve_device(config: &InputConfig) -> Option<PathBuf> {
    let configured = Path::new(&config.device_path);
    if configured.exists() {
        return Some(configured.to_path_buf());
    }

    log::warn!(
        "input: configured device {} does not exist",
        configured.display()
    );

    if !config.auto_discover {
        return None;
    }

    let found = discover_keyboard();
    match &found {
        Some(path) => log::info!("input: auto-discovered keyboard at {}", path.display()),
        None => log::warn!("input: no volume-capable keyboard found in /dev/input"),
    }
    found
}

/// Scan all event devices and return the first volume-capable keyboard.
fn discover_keyboard() -> Option<PathBuf> {
    let mut candidates: Vec<(PathBuf, String)> = evdev::enumerate()
        .filter(|(_, dev)| dev.supported_keys().is_some_and(is_volume_keyboard))
        .map(|(path, dev)| (path, dev.name().unwrap_or_default().to_string()))
        .collect();

    candidates.sort_by(|a, b| a.0.cmp(&b.0));

    for (path, name) in &candidates {
        log::debug!("input: candidate {} ({name})", path.display());
    }

    candidates.into_iter().next().map(|(path, _)| path)
}

/// `true` when a device can produce at least one of the overlay's shortcuts:
/// a dedicated volume-up key, or Alt together with Up, Down and M.
pub fn is_volume_keyboard(keys: &AttributeSetRef<Key>) -> bool {
    if keys.contains(Key::KEY_VOLUMEUP) {
        return true;
    }
    [Key::KEY_LEFTALT, Key::KEY_UP, Key::KEY_DOWN, Key::KEY_M]
        .into_iter()
        .all(|key| keys.contains(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use evdev::AttributeSet;
    use tempfile::tempdir;

    fn keys(list: &[Key]) -> AttributeSet<Key> {
        list.iter().copied().collect()
    }

    #[test]
    fn media_keyboard_qualifies() {
        assert!(is_volume_keyboard(&keys(&[Key::KEY_VOLUMEUP, Key::KEY_VOLUMEDOWN])));
    }

    #[test]
    fn full_keyboard_qualifies() {
        assert!(is_volume_keyboard(&keys(&[
            Key::KEY_A,
            Key::KEY_M,
            Key::KEY_LEFTALT,
            Key::KEY_UP,
            Key::KEY_DOWN,
        ])));
    }

    #[test]
    fn mouse_and_partial_keypads_do_not_qualify() {
        assert!(!is_volume_keyboard(&keys(&[Key::BTN_LEFT, Key::BTN_RIGHT])));
        assert!(!is_volume_keyboard(&keys(&[Key::KEY_UP, Key::KEY_DOWN])));
        assert!(!is_volume_keyboard(&keys(&[])));
    }

    #[test]
    fn existing_configured_path_wins() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("event5");
        std::fs::write(&path, b"").unwrap();

        let config = InputConfig {
            device_path: path.to_string_lossy().into_owned(),
            auto_discover: true,
        };

        assert_eq!(resolve_device(&config), Some(path));
    }

    #[test]
    fn missing_path_without_discovery_resolves_to_none() {
        let dir = tempdir().expect("temp dir");
        let config = InputConfig {
            device_path: dir.path().join("event42").to_string_lossy().into_owned(),
            auto_discover: false,
        };

        assert_eq!(resolve_device(&config), None);
    }
}
