//! Live preview of the tracked strokes.
//!
//! Trackers run on the session worker thread while egui only allows the UI
//! thread to paint, so draw calls are turned into [`PreviewCommand`]s and
//! queued. The UI thread drains the queue every frame in FIFO order.

use crate::canvas::Point;
use eframe::egui::{self, Color32, Pos2, Sense, Stroke, Vec2};
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PreviewColor {
    Green,
    Red,
    Blue,
    White,
}

impl PreviewColor {
    pub fn to_color32(self) -> Color32 {
        match self {
            PreviewColor::Green => Color32::from_rgb(0, 255, 0),
            PreviewColor::Red => Color32::from_rgb(255, 0, 0),
            PreviewColor::Blue => Color32::from_rgb(0, 0, 255),
            PreviewColor::White => Color32::WHITE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PreviewCommand {
    Oval {
        min: Point,
        max: Point,
        color: PreviewColor,
    },
    Line {
        start: Point,
        end: Point,
        color: PreviewColor,
        width: f32,
    },
}

pub trait PreviewSurface: Send {
    fn draw_oval(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: PreviewColor);
    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: PreviewColor, width: f32);
}

/// Sending half handed to the trackers.
#[derive(Clone)]
pub struct PreviewQueue {
    tx: Sender<PreviewCommand>,
    repaint: Option<egui::Context>,
}

impl PreviewQueue {
    fn push(&self, command: PreviewCommand) {
        if self.tx.send(command).is_err() {
            tracing::debug!("preview closed, dropping draw command");
            return;
        }
        if let Some(ctx) = &self.repaint {
            ctx.request_repaint();
        }
    }
}

impl PreviewSurface for PreviewQueue {
    fn draw_oval(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: PreviewColor) {
        self.push(PreviewCommand::Oval {
            min: Point::new(x1, y1),
            max: Point::new(x2, y2),
            color,
        });
    }

    fn draw_line(&mut self, x1: i32, y1: i32, x2: i32, y2: i32, color: PreviewColor, width: f32) {
        self.push(PreviewCommand::Line {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
            color,
            width,
        });
    }
}

/// UI-thread half: an append-only list of shapes painted on black.
pub struct PreviewCanvas {
    rx: Receiver<PreviewCommand>,
    shapes: Vec<PreviewCommand>,
    size: (u32, u32),
}

/// `repaint` wakes the egui loop whenever a command is queued.
pub fn channel(size: (u32, u32), repaint: Option<egui::Context>) -> (PreviewQueue, PreviewCanvas) {
    let (tx, rx) = mpsc::channel();
    (
        PreviewQueue { tx, repaint },
        PreviewCanvas {
            rx,
            shapes: Vec::new(),
            size,
        },
    )
}

impl PreviewCanvas {
    /// Moves every queued command into the shape list; returns how many.
    pub fn drain(&mut self) -> usize {
        let mut drained = 0;
        loop {
            match self.rx.try_recv() {
                Ok(command) => {
                    self.shapes.push(command);
                    drained += 1;
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        drained
    }

    pub fn shapes(&self) -> &[PreviewCommand] {
        &self.shapes
    }

    pub fn paint(&self, ui: &mut egui::Ui) {
        let size = Vec2::new(self.size.0 as f32, self.size.1 as f32);
        let (response, painter) = ui.allocate_painter(size, Sense::hover());
        let origin = response.rect.min;
        painter.rect_filled(response.rect, 0.0, Color32::BLACK);

        let to_screen = |p: Point| Pos2::new(origin.x + p.x as f32, origin.y + p.y as f32);
        for shape in &self.shapes {
            match *shape {
                PreviewCommand::Oval { min, max, color } => {
                    let min = to_screen(min);
                    let max = to_screen(max);
                    let center = Pos2::new((min.x + max.x) / 2.0, (min.y + max.y) / 2.0);
                    let radius = ((max.x - min.x).abs().min((max.y - min.y).abs())) / 2.0;
                    let color = color.to_color32();
                    painter.circle(center, radius, color, Stroke::new(1.0, color));
                }
                PreviewCommand::Line {
                    start,
                    end,
                    color,
                    width,
                } => {
                    painter.line_segment(
                        [to_screen(start), to_screen(end)],
                        Stroke::new(width, color.to_color32()),
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_preserves_fifo_order() {
        let (mut queue, mut canvas) = channel((100, 100), None);
        queue.draw_line(0, 0, 10, 10, PreviewColor::White, 2.0);
        queue.draw_oval(5, 5, 15, 15, PreviewColor::Green);
        queue.draw_line(10, 10, 20, 5, PreviewColor::White, 2.0);

        assert_eq!(canvas.drain(), 3);
        let shapes = canvas.shapes();
        assert!(matches!(shapes[0], PreviewCommand::Line { end, .. } if end == Point::new(10, 10)));
        assert!(matches!(shapes[1], PreviewCommand::Oval { color: PreviewColor::Green, .. }));
        assert!(matches!(shapes[2], PreviewCommand::Line { end, .. } if end == Point::new(20, 5)));
    }

    #[test]
    fn shapes_accumulate_across_drains() {
        let (mut queue, mut canvas) = channel((10, 10), None);
        queue.draw_oval(0, 0, 2, 2, PreviewColor::Red);
        canvas.drain();
        queue.draw_oval(3, 3, 5, 5, PreviewColor::Blue);
        assert_eq!(canvas.drain(), 1);
        assert_eq!(canvas.shapes().len(), 2);
    }

    #[test]
    fn queue_from_worker_thread_reaches_canvas() {
        let (queue, mut canvas) = channel((10, 10), None);
        let handle = std::thread::spawn(move || {
            let mut queue = queue;
            for i in 0..5 {
                queue.draw_oval(i, i, i + 1, i + 1, PreviewColor::Red);
            }
        });
        handle.join().expect("worker");
        assert_eq!(canvas.drain(), 5);
    }

    #[test]
    fn paint_runs_headless() {
        let (mut queue, mut canvas) = channel((64, 48), None);
        queue.draw_oval(1, 1, 11, 11, PreviewColor::Blue);
        queue.draw_line(0, 0, 63, 47, PreviewColor::White, 2.0);
        canvas.drain();

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| canvas.paint(ui));
        });
    }
}
