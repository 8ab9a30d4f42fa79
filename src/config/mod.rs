//! Configuration module for the volume OSD.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for input capture,
//! volume control and the overlay, `AppPaths` for the settings location, and
//! TOML persistence via `AppConfig::load` / `AppConfig::save`.
//!
//! Every field has a default, so a missing `settings.toml` means "use the
//! built-in device path and step".

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, InputConfig, MixerBackend, OsdConfig, VolumeConfig};
