//! Application entry point — volume OSD.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create [`tokio`] runtime for the dispatcher.
//! 4. Create channels (`action`, `update`).
//! 5. Resolve the keyboard device and spawn the input listener thread.
//! 6. Inside the eframe creator: spawn the [`VolumeDispatcher`] with a
//!    repaint notifier bound to the egui context.
//! 7. Run [`eframe::run_native`] — blocks the main thread until the window
//!    is closed.

use anyhow::{anyhow, Context as _};
use tokio::sync::mpsc;
use volume_osd::{
    app::{native_options, VolumeOsdApp},
    config::AppConfig,
    input::{resolve_device, InputListener, KeyAction},
    pipeline::VolumeDispatcher,
    volume::{controller_for, VolumeState},
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("volume OSD starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime (one worker is plenty: mixer calls are sequential)
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4. Channel setup
    let (action_tx, action_rx) = mpsc::channel::<KeyAction>(16);
    let (update_tx, update_rx) = mpsc::channel::<VolumeState>(16);

    // 5. Input listener thread.  Without a device the overlay still runs; it
    //    just never receives key actions.
    let _listener = match resolve_device(&config.input) {
        Some(path) => match InputListener::start(&path, action_tx) {
            Ok(listener) => Some(listener),
            Err(e) => {
                log::error!("{e}");
                None
            }
        },
        None => {
            log::error!(
                "no keyboard device available (configured: {}); \
                 set input.device_path in the settings file",
                config.input.device_path
            );
            None
        }
    };

    // 6 + 7. Overlay window; the dispatcher starts once the egui context
    //        exists so it can wake the UI after each update.
    let controller = controller_for(config.volume.backend);
    let dispatcher = VolumeDispatcher::new(controller, config.step())
        .announce_on_start(config.osd.show_on_startup);
    let handle = rt.handle().clone();
    let options = native_options(&config.osd);
    let osd_config = config.osd.clone();

    eframe::run_native(
        "Volume OSD",
        options,
        Box::new(move |cc| {
            let ctx = cc.egui_ctx.clone();
            let dispatcher = dispatcher.with_notifier(move || ctx.request_repaint());
            handle.spawn(dispatcher.run(action_rx, update_tx));

            Ok(Box::new(VolumeOsdApp::new(update_rx, osd_config)))
        }),
    )
    .map_err(|e| anyhow!("overlay window failed: {e}"))
}
