pub mod palette;

use crate::canvas::{Canvas, Point, SharedCanvas};
use crate::preview::{PreviewColor, PreviewSurface};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub use palette::{ButtonStyle, Palette};

pub trait Toggle {
    fn set_enabled(&self, enabled: bool);
    fn is_enabled(&self) -> bool;

    fn enable(&self) {
        self.set_enabled(true);
    }

    fn disable(&self) {
        self.set_enabled(false);
    }
}

/// Enable flag shared between a tracker on the session thread and its
/// checkbox on the UI thread. Read on every event, so a change applies from
/// the next event on.
#[derive(Debug, Clone)]
pub struct TrackerSwitch(Arc<AtomicBool>);

impl Default for TrackerSwitch {
    fn default() -> Self {
        Self(Arc::new(AtomicBool::new(true)))
    }
}

impl Toggle for TrackerSwitch {
    fn set_enabled(&self, enabled: bool) {
        self.0.store(enabled, Ordering::SeqCst);
    }

    fn is_enabled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub trait Tracker {
    fn switch(&self) -> &TrackerSwitch;
    fn track(&mut self, point: Point);
}

fn with_canvas(canvas: &SharedCanvas, f: impl FnOnce(&mut Canvas)) {
    match canvas.lock() {
        Ok(mut guard) => f(&mut guard),
        Err(err) => tracing::error!(?err, "failed to lock canvas"),
    }
}

pub struct ClickTracker {
    switch: TrackerSwitch,
    canvas: SharedCanvas,
    preview: Box<dyn PreviewSurface>,
    style: ButtonStyle,
    radius: i32,
    preview_dot: i32,
}

impl ClickTracker {
    pub fn new(
        canvas: SharedCanvas,
        preview: Box<dyn PreviewSurface>,
        style: ButtonStyle,
        palette: &Palette,
    ) -> Self {
        Self {
            switch: TrackerSwitch::default(),
            canvas,
            preview,
            style,
            radius: palette.click_radius,
            preview_dot: palette.preview_dot,
        }
    }
}

impl Tracker for ClickTracker {
    fn switch(&self) -> &TrackerSwitch {
        &self.switch
    }

    fn track(&mut self, point: Point) {
        if !self.switch.is_enabled() {
            return;
        }
        with_canvas(&self.canvas, |canvas| {
            canvas.draw_circle(point, self.style.fill, self.radius)
        });
        let d = self.preview_dot;
        self.preview.draw_oval(
            point.x - d,
            point.y - d,
            point.x + d,
            point.y + d,
            self.style.preview,
        );
    }
}

pub struct MoveTracker {
    switch: TrackerSwitch,
    canvas: SharedCanvas,
    preview: Box<dyn PreviewSurface>,
    last_position: Option<Point>,
    preview_color: PreviewColor,
    preview_width: f32,
}

impl MoveTracker {
    pub fn new(canvas: SharedCanvas, preview: Box<dyn PreviewSurface>, palette: &Palette) -> Self {
        Self {
            switch: TrackerSwitch::default(),
            canvas,
            preview,
            last_position: None,
            preview_color: palette.move_preview,
            preview_width: palette.move_preview_width,
        }
    }

    pub fn last_position(&self) -> Option<Point> {
        self.last_position
    }

    /// Forgets the previous position so the next move starts a new stroke.
    pub fn reset(&mut self) {
        self.last_position = None;
    }
}

impl Tracker for MoveTracker {
    fn switch(&self) -> &TrackerSwitch {
        &self.switch
    }

    fn track(&mut self, point: Point) {
        if !self.switch.is_enabled() {
            return;
        }
        if let Some(previous) = self.last_position {
            with_canvas(&self.canvas, |canvas| canvas.draw_line(previous, point));
            self.preview.draw_line(
                previous.x,
                previous.y,
                point.x,
                point.y,
                self.preview_color,
                self.preview_width,
            );
        }
        self.last_position = Some(point);
    }
}
