use crate::canvas::Canvas;
use crate::hook::HookBackend;
use crate::preview::{self, PreviewCanvas};
use crate::session::{SessionController, SessionState};
use crate::tracker::{Palette, Toggle};
use eframe::egui;

/// Viewport calls the control panel makes, so tests can observe them
/// without a window.
pub trait ViewportCtx {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand);
}

impl ViewportCtx for egui::Context {
    fn send_viewport_cmd(&self, cmd: egui::ViewportCommand) {
        egui::Context::send_viewport_cmd(self, cmd);
    }
}

/// Which control buttons accept clicks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlState {
    pub start_enabled: bool,
    pub stop_enabled: bool,
}

impl ControlState {
    pub fn for_state(state: SessionState) -> Self {
        match state {
            SessionState::Idle => Self {
                start_enabled: true,
                stop_enabled: false,
            },
            SessionState::Recording => Self {
                start_enabled: false,
                stop_enabled: true,
            },
        }
    }
}

pub struct TrackerApp {
    controller: SessionController,
    preview: PreviewCanvas,
    status: Option<String>,
}

impl TrackerApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        backend: Box<dyn HookBackend>,
        canvas_size: (u32, u32),
    ) -> Self {
        let (width, height) = canvas_size;
        let canvas = Canvas::new(width, height).into_shared();
        let (queue, preview) = preview::channel(canvas_size, Some(cc.egui_ctx.clone()));
        let controller =
            SessionController::with_preview(backend, canvas, queue, &Palette::standard());
        tracing::info!(width, height, "tracker window ready");
        Self::from_parts(controller, preview)
    }

    pub fn from_parts(controller: SessionController, preview: PreviewCanvas) -> Self {
        Self {
            controller,
            preview,
            status: None,
        }
    }

    pub fn controller(&self) -> &SessionController {
        &self.controller
    }

    pub fn preview(&self) -> &PreviewCanvas {
        &self.preview
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn controls(&self) -> ControlState {
        ControlState::for_state(self.controller.state())
    }

    pub fn start_tracking(&mut self) {
        match self.controller.start() {
            Ok(()) => self.status = Some("Recording...".into()),
            Err(e) => {
                tracing::error!(error = %e, "failed to start tracking");
                self.status = Some(format!("Failed: {e}"));
            }
        }
    }

    pub fn stop_tracking(&mut self) {
        match self.controller.stop() {
            Ok(path) => self.status = Some(format!("Saved {}", path.display())),
            Err(e) => {
                tracing::error!(error = %e, "failed to stop tracking");
                self.status = Some(format!("Failed: {e}"));
            }
        }
    }

    /// Stops a running session before asking the viewport to close.
    pub fn exit<C: ViewportCtx>(&mut self, ctx: &C) {
        if self.controller.is_recording() {
            self.stop_tracking();
        }
        ctx.send_viewport_cmd(egui::ViewportCommand::Close);
    }

    pub fn ui(&mut self, ctx: &egui::Context) {
        if self.preview.drain() > 0 {
            ctx.request_repaint();
        }
        let controls = self.controls();

        egui::TopBottomPanel::top("controls").show(ctx, |ui| {
            ui.horizontal(|ui| {
                if ui
                    .add_enabled(controls.start_enabled, egui::Button::new("Start Tracking"))
                    .clicked()
                {
                    self.start_tracking();
                }
                if ui
                    .add_enabled(controls.stop_enabled, egui::Button::new("Stop Tracking"))
                    .clicked()
                {
                    self.stop_tracking();
                }
                if ui.button("Exit Program").clicked() {
                    self.exit(ctx);
                }
            });
            if let Some(switches) = self.controller.switches() {
                ui.horizontal(|ui| {
                    for (label, switch) in switches.labeled() {
                        let mut enabled = switch.is_enabled();
                        if ui.checkbox(&mut enabled, label).changed() {
                            tracing::debug!(label, enabled, "tracker toggled");
                            switch.set_enabled(enabled);
                        }
                    }
                });
            }
            if let Some(status) = &self.status {
                ui.label(status);
            }
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            egui::ScrollArea::both().show(ui, |ui| self.preview.paint(ui));
        });
    }
}

impl eframe::App for TrackerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.ui(ctx);
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if self.controller.is_recording() {
            self.stop_tracking();
        }
    }
}
