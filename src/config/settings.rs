//! Application settings structs, defaults and TOML persistence.
//!
//! All structs implement `Serialize`, `Deserialize`, `Default` and `Clone`
//! so they can be round-tripped through TOML files and shared across threads.
//! Every struct is `#[serde(default)]`: a settings file only needs the keys
//! the user wants to change.

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// MixerBackend
// ---------------------------------------------------------------------------

/// Which command-line audio utility drives the system mixer.
///
/// | Variant | Utility | Sink |
/// |---------|---------|------|
/// | Pactl   | `pactl` (PulseAudio / pipewire-pulse) | `@DEFAULT_SINK@` |
/// | Wpctl   | `wpctl` (WirePlumber) | `@DEFAULT_AUDIO_SINK@` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MixerBackend {
    Pactl,
    Wpctl,
}

impl Default for MixerBackend {
    fn default() -> Self {
        Self::Pactl
    }
}

// ---------------------------------------------------------------------------
// InputConfig
// ---------------------------------------------------------------------------

/// Keyboard device settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Event device to read key presses from.
    ///
    /// Device numbering is not stable across reboots; use `evtest` to find
    /// the keyboard's current node.
    pub device_path: String,
    /// Scan `/dev/input` for a volume-capable keyboard when `device_path`
    /// does not exist.
    pub auto_discover: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            device_path: "/dev/input/event2".into(),
            auto_discover: true,
        }
    }
}

// ---------------------------------------------------------------------------
// VolumeConfig
// ---------------------------------------------------------------------------

/// Volume adjustment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    /// Percentage points added or removed per key press.
    pub step_percent: u8,
    /// Audio utility used to query and change the volume.
    pub backend: MixerBackend,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            step_percent: 5,
            backend: MixerBackend::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// OsdConfig
// ---------------------------------------------------------------------------

/// Overlay window appearance and behaviour.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OsdConfig {
    /// How long the overlay stays up after the last volume change.
    pub hide_after_ms: u64,
    /// Window width in logical pixels.
    pub width: f32,
    /// Window height in logical pixels.
    pub height: f32,
    /// Keep the overlay above all other windows.
    pub always_on_top: bool,
    /// Flash the current volume once when the program starts.
    pub show_on_startup: bool,
}

impl Default for OsdConfig {
    fn default() -> Self {
        Self {
            hide_after_ms: 2_000,
            width: 300.0,
            height: 80.0,
            always_on_top: true,
            show_on_startup: true,
        }
    }
}

impl OsdConfig {
    /// The auto-hide timeout as a [`std::time::Duration`].
    pub fn hide_after(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.hide_after_ms)
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, serialised as `settings.toml`.
///
/// ```rust,no_run
/// use volume_osd::config::AppConfig;
///
/// // Load (returns Default when file is missing)
/// let config = AppConfig::load().unwrap();
/// assert!(config.step() >= 1);
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Keyboard device settings.
    pub input: InputConfig,
    /// Volume adjustment settings.
    pub volume: VolumeConfig,
    /// Overlay settings.
    pub osd: OsdConfig,
}

impl AppConfig {
    /// Load configuration from `settings.toml` in the config directory.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Write the configuration to `path`, creating parent directories as
    /// needed.
    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Effective volume step in percent, clamped to `1..=100`.
    pub fn step(&self) -> u8 {
        self.volume.step_percent.clamp(1, 100)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn default_values() {
        let cfg = AppConfig::default();

        assert_eq!(cfg.input.device_path, "/dev/input/event2");
        assert!(cfg.input.auto_discover);
        assert_eq!(cfg.volume.step_percent, 5);
        assert_eq!(cfg.volume.backend, MixerBackend::Pactl);
        assert_eq!(cfg.osd.hide_after_ms, 2_000);
        assert_eq!(cfg.osd.width, 300.0);
        assert_eq!(cfg.osd.height, 80.0);
        assert!(cfg.osd.always_on_top);
        assert!(cfg.osd.show_on_startup);
    }

    /// `load_from` on a non-existent path must return `Default` without error.
    #[test]
    fn load_missing_returns_default() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nonexistent.toml");

        let config = AppConfig::load_from(&path).expect("should not error");

        assert_eq!(config.input.device_path, "/dev/input/event2");
        assert_eq!(config.volume.step_percent, 5);
    }

    #[test]
    fn modified_values_survive_save_and_load() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("nested").join("settings.toml");

        let mut cfg = AppConfig::default();
        cfg.input.device_path = "/dev/input/event7".into();
        cfg.input.auto_discover = false;
        cfg.volume.step_percent = 10;
        cfg.volume.backend = MixerBackend::Wpctl;
        cfg.osd.hide_after_ms = 1_500;

        cfg.save_to(&path).expect("save");
        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.input.device_path, "/dev/input/event7");
        assert!(!loaded.input.auto_discover);
        assert_eq!(loaded.volume.step_percent, 10);
        assert_eq!(loaded.volume.backend, MixerBackend::Wpctl);
        assert_eq!(loaded.osd.hide_after_ms, 1_500);
    }

    /// A file with only the device path fills everything else from defaults.
    #[test]
    fn partial_file_uses_defaults_for_missing_keys() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[input]\ndevice_path = \"/dev/input/event4\"\n").unwrap();

        let loaded = AppConfig::load_from(&path).expect("load");

        assert_eq!(loaded.input.device_path, "/dev/input/event4");
        assert!(loaded.input.auto_discover);
        assert_eq!(loaded.volume.step_percent, 5);
        assert_eq!(loaded.osd.hide_after_ms, 2_000);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let dir = tempdir().expect("temp dir");
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "[volume]\nstep_percent = \"loud\"\n").unwrap();

        assert!(AppConfig::load_from(&path).is_err());
    }

    #[test]
    fn step_is_clamped() {
        let mut cfg = AppConfig::default();
        cfg.volume.step_percent = 0;
        assert_eq!(cfg.step(), 1);
        cfg.volume.step_percent = 250;
        assert_eq!(cfg.step(), 100);
        cfg.volume.step_percent = 5;
        assert_eq!(cfg.step(), 5);
    }
}
