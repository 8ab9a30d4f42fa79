//! `wpctl` backend (WirePlumber).
//!
//! `wpctl` reports and accepts volume as a linear factor (`0.45`) rather
//! than a percentage.

use async_trait::async_trait;

use super::command::run;
use super::{VolumeController, VolumeError, VolumeState, MAX_LEVEL};

const WPCTL: &str = "wpctl";
const DEFAULT_SINK: &str = "@DEFAULT_AUDIO_SINK@";

/// Drives the default audio sink through `wpctl`.
#[derive(Debug, Clone)]
pub struct WpctlController {
    sink: String,
}

impl WpctlController {
    pub fn new() -> Self {
        Self {
            sink: DEFAULT_SINK.to_string(),
        }
    }
}

impl Default for WpctlController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VolumeController for WpctlController {
    async fn query(&self) -> Result<VolumeState, VolumeError> {
        let out = run(WPCTL, &["get-volume", &self.sink]).await?;
        parse_get_volume(&out)
    }

    async fn set_level(&self, level: u8) -> Result<(), VolumeError> {
        let factor = f32::from(level.min(MAX_LEVEL)) / 100.0;
        let arg = format!("{factor:.2}");
        run(WPCTL, &["set-volume", &self.sink, &arg]).await?;
        Ok(())
    }

    async fn toggle_mute(&self) -> Result<(), VolumeError> {
        run(WPCTL, &["set-mute", &self.sink, "toggle"]).await?;
        Ok(())
    }
}

/// Parse `Volume: 0.45` or `Volume: 0.45 [MUTED]`.
fn parse_get_volume(output: &str) -> Result<VolumeState, VolumeError> {
    let parse_err = || VolumeError::Parse(output.trim().to_string());

    let mut parts = output.split_whitespace();
    if parts.next() != Some("Volume:") {
        return Err(parse_err());
    }
    let factor: f32 = parts
        .next()
        .and_then(|v| v.parse().ok())
        .ok_or_else(parse_err)?;

    let percent = (factor * 100.0).round().clamp(0.0, f32::from(MAX_LEVEL));
    let muted = output.contains("[MUTED]");

    Ok(VolumeState::new(percent as u8, muted))
}
