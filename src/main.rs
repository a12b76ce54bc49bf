use mouse_tracker::canvas::FALLBACK_SIZE;
use mouse_tracker::gui::TrackerApp;
use mouse_tracker::hook::{primary_display_size, DefaultHookBackend};
use mouse_tracker::logging;

use eframe::egui;

const WINDOW_TITLE: &str = "Mouse Tracker";

fn main() -> anyhow::Result<()> {
    let _log_guard = logging::init(cfg!(debug_assertions), None);

    let canvas_size = primary_display_size().unwrap_or_else(|err| {
        tracing::warn!(?err, "using fallback canvas size");
        FALLBACK_SIZE
    });

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(WINDOW_TITLE)
            .with_inner_size([1280.0, 1080.0]),
        ..Default::default()
    };

    eframe::run_native(
        WINDOW_TITLE,
        native_options,
        Box::new(move |cc| {
            Box::new(TrackerApp::new(
                cc,
                Box::new(DefaultHookBackend::default()),
                canvas_size,
            ))
        }),
    )
    .map_err(|e| anyhow::anyhow!("failed to run tracker window: {e}"))
}
