//! Volume overlay window — egui/eframe application.
//!
//! # Architecture
//!
//! [`VolumeOsdApp`] is the top-level [`eframe::App`].  It owns the receiving
//! end of the update channel fed by the
//! [`VolumeDispatcher`](crate::pipeline::VolumeDispatcher) and an
//! [`OverlayState`] that decides what to draw and for how long.
//!
//! The window is a small borderless, always-on-top, click-through panel
//! centred on the monitor.  The panel is painted when an update arrives and
//! left blank again once the hide timer runs out; each new update restarts
//! the timer.
//!
//! | State | Visual |
//! |-------|--------|
//! | audible | "Volume: N%" + bar filled to N % |
//! | muted   | "Muted" + empty bar |

use std::time::{Duration, Instant};

use eframe::egui;
use tokio::sync::mpsc;

use crate::config::OsdConfig;
use crate::pipeline::OverlayState;
use crate::volume::VolumeState;

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Dark panel background.
const BACKGROUND: egui::Color32 = egui::Color32::from_rgb(0x12, 0x12, 0x12);
/// Progress-bar trough.
const TROUGH: egui::Color32 = egui::Color32::from_rgb(0x1a, 0x1a, 0x1a);
/// Neon cyan used for text, the bar border and the left end of the fill.
const ACCENT: egui::Color32 = egui::Color32::from_rgb(0x00, 0xff, 0xff);
/// Right end of the fill gradient.
const ACCENT_DIM: egui::Color32 = egui::Color32::from_rgb(0x00, 0x5f, 0x5f);

const BAR_HEIGHT: f32 = 18.0;
const BAR_RADIUS: f32 = 4.0;
const BAR_BORDER: f32 = 2.0;

/// Longest gap between frames while nothing is on screen.
const IDLE_POLL: Duration = Duration::from_millis(250);

// ---------------------------------------------------------------------------
// VolumeOsdApp
// ---------------------------------------------------------------------------

/// eframe application — the transient volume overlay.
///
/// The OS window stays mapped for the whole session; "hidden" means an
/// empty frame over the transparent clear colour.  Wayland compositors
/// ignore `set_visible`, and an unmapped window may stop receiving redraws,
/// so visibility is decided here at paint time.
pub struct VolumeOsdApp {
    /// What is displayed and until when.
    overlay: OverlayState,
    /// Whether the previous frame drew the panel.
    shown: bool,
    /// Receive new mixer states from the dispatcher.
    update_rx: mpsc::Receiver<VolumeState>,
    /// Overlay configuration (read-only after startup).
    config: OsdConfig,
}

impl VolumeOsdApp {
    /// Create a new [`VolumeOsdApp`].  Nothing is drawn until the first
    /// update arrives.
    pub fn new(update_rx: mpsc::Receiver<VolumeState>, config: OsdConfig) -> Self {
        Self {
            overlay: OverlayState::new(config.hide_after()),
            shown: false,
            update_rx,
            config,
        }
    }

    /// Drain all pending updates (non-blocking).
    fn poll_updates(&mut self, now: Instant) {
        while let Ok(state) = self.update_rx.try_recv() {
            self.overlay.show(state, now);
        }
    }

    /// Label and bar fill to draw this frame; `None` paints nothing.
    fn content(&self, now: Instant) -> Option<(String, f32)> {
        self.overlay
            .is_visible(now)
            .then(|| (self.overlay.label(), self.overlay.fraction()))
    }

    /// Delay before the next frame: the hide deadline while shown, capped by
    /// the idle poll so channel updates are picked up even if no wake-up
    /// reaches the event loop.
    fn next_repaint(&self, now: Instant) -> Duration {
        self.overlay
            .remaining(now)
            .map_or(IDLE_POLL, |remaining| remaining.min(IDLE_POLL))
    }

    /// Move the window to the middle of the monitor it is on.  Best effort:
    /// Wayland does not let clients position their windows.
    fn center_on_screen(&self, ctx: &egui::Context) {
        let Some(monitor) = ctx.input(|i| i.viewport().monitor_size) else {
            return;
        };
        let size = egui::vec2(self.config.width, self.config.height);
        let pos = ((monitor - size) / 2.0).max(egui::Vec2::ZERO);
        ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(pos.to_pos2()));
    }
}

/// Draw the trough, border and gradient fill of the volume bar.
fn draw_bar(ui: &mut egui::Ui, fraction: f32) {
    let (rect, _) = ui.allocate_exact_size(
        egui::vec2(ui.available_width(), BAR_HEIGHT),
        egui::Sense::hover(),
    );
    let painter = ui.painter();

    painter.rect_filled(rect, BAR_RADIUS, TROUGH);

    if let Some(fill) = fill_rect(rect, fraction) {
        painter.add(gradient_rect(fill, ACCENT, ACCENT_DIM));
    }

    painter.rect_stroke(
        rect,
        BAR_RADIUS,
        egui::Stroke::new(2.0, ACCENT),
        egui::StrokeKind::Inside,
    );
}

/// The filled part of `bar`, inset by the border width; `None` when nothing
/// would be left to draw.
fn fill_rect(bar: egui::Rect, fraction: f32) -> Option<egui::Rect> {
    let fraction = fraction.clamp(0.0, 1.0);
    let fill = egui::Rect::from_min_size(
        bar.min,
        egui::vec2(bar.width() * fraction, bar.height()),
    )
    .shrink(BAR_BORDER);
    (fill.width() > 0.0 && fill.height() > 0.0).then_some(fill)
}

/// A rectangle shaded left-to-right from `left` to `right`.
fn gradient_rect(rect: egui::Rect, left: egui::Color32, right: egui::Color32) -> egui::Shape {
    let mut mesh = egui::Mesh::default();
    mesh.colored_vertex(rect.left_top(), left);
    mesh.colored_vertex(rect.right_top(), right);
    mesh.colored_vertex(rect.right_bottom(), right);
    mesh.colored_vertex(rect.left_bottom(), left);
    mesh.add_triangle(0, 1, 2);
    mesh.add_triangle(0, 2, 3);
    egui::Shape::mesh(mesh)
}

// ---------------------------------------------------------------------------
// eframe::App impl
// ---------------------------------------------------------------------------

impl eframe::App for VolumeOsdApp {
    /// Called every frame by eframe.  Polls the update channel, then either
    /// renders the panel or leaves the window fully transparent.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.poll_updates(now);
        ctx.request_repaint_after(self.next_repaint(now));

        let Some((label, fraction)) = self.content(now) else {
            self.shown = false;
            egui::CentralPanel::default()
                .frame(egui::Frame::new())
                .show(ctx, |_| {});
            return;
        };

        if !self.shown {
            self.shown = true;
            self.center_on_screen(ctx);
        }

        let frame = egui::Frame::new()
            .fill(BACKGROUND)
            .corner_radius(egui::CornerRadius::same(6))
            .inner_margin(egui::Margin::same(20));

        egui::CentralPanel::default().frame(frame).show(ctx, |ui| {
            ui.vertical_centered(|ui| {
                ui.label(egui::RichText::new(label).color(ACCENT).size(16.0));
            });
            ui.add_space(10.0);
            draw_bar(ui, fraction);
        });
    }

    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        egui::Rgba::TRANSPARENT.to_array()
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        log::info!("volume overlay closing");
    }
}

// ---------------------------------------------------------------------------
// Native options builder
// ---------------------------------------------------------------------------

/// Window options for the overlay: borderless, transparent, fixed size, no
/// taskbar entry, click-through.
pub fn native_options(config: &OsdConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_title("Volume OSD")
        .with_decorations(false)
        .with_transparent(true)
        .with_inner_size([config.width, config.height])
        .with_resizable(false)
        .with_taskbar(false)
        .with_mouse_passthrough(true);

    if config.always_on_top {
        vp = vp.with_always_on_top();
    }

    eframe::NativeOptions {
        viewport: vp,
        centered: true,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
