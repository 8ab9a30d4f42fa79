//! On-screen volume display for Linux desktops.
//!
//! Reads key presses straight from a keyboard event device, changes the
//! system volume through `pactl` or `wpctl`, and flashes a small overlay with
//! the new level or mute state.

pub mod app;
pub mod config;
pub mod input;
pub mod pipeline;
pub mod volume;
