//! `pactl` backend (PulseAudio, or PipeWire through pipewire-pulse).

use async_trait::async_trait;

use super::command::run;
use super::{parse_percent, VolumeController, VolumeError, VolumeState, MAX_LEVEL};

const PACTL: &str = "pactl";
const DEFAULT_SINK: &str = "@DEFAULT_SINK@";

/// Drives the default sink through `pactl`.
#[derive(Debug, Clone)]
pub struct PactlController {
    sink: String,
}

impl PactlController {
    pub fn new() -> Self {
        Self {
            sink: DEFAULT_SINK.to_string(),
        }
    }
}

impl Default for PactlController {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VolumeController for PactlController {
    async fn query(&self) -> Result<VolumeState, VolumeError> {
        let volume = run(PACTL, &["get-sink-volume", &self.sink]).await?;
        let mute = run(PACTL, &["get-sink-mute", &self.sink]).await?;
        Ok(VolumeState::new(parse_volume(&volume)?, parse_mute(&mute)))
    }

    async fn set_level(&self, level: u8) -> Result<(), VolumeError> {
        let arg = format!("{}%", level.min(MAX_LEVEL));
        run(PACTL, &["set-sink-volume", &self.sink, &arg]).await?;
        Ok(())
    }

    async fn toggle_mute(&self) -> Result<(), VolumeError> {
        run(PACTL, &["set-sink-mute", &self.sink, "toggle"]).await?;
        Ok(())
    }
}

/// Extract the level from `pactl get-sink-volume` output.
///
/// ```text
/// Volume: front-left: 42598 /  65% / -11.22 dB,   front-right: 42598 /  65% / -11.22 dB
///         balance 0.00
/// ```
///
/// The first whitespace-separated token ending in `%` is taken (the
/// front-left channel).
fn parse_volume(output: &str) -> Result<u8, VolumeError> {
    output
        .split_whitespace()
        .filter(|token| token.ends_with('%'))
        .find_map(parse_percent)
        .ok_or_else(|| VolumeError::Parse(output.trim().to_string()))
}

/// `Mute: yes` / `Mute: no`.
fn parse_mute(output: &str) -> bool {
    output.to_lowercase().contains("yes")
}
