use crate::canvas::{Rgba, DEFAULT_CIRCLE_RADIUS, LINE_WIDTH};
use crate::hook::MouseButton;
use crate::preview::PreviewColor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStyle {
    /// Translucent fill composited on the canvas.
    pub fill: Rgba,
    /// Solid color of the dot on the live preview.
    pub preview: PreviewColor,
}

/// Fixed drawing table shared by all trackers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub primary: ButtonStyle,
    pub secondary: ButtonStyle,
    pub middle: ButtonStyle,
    pub click_radius: i32,
    /// Half the side of the preview dot's bounding box.
    pub preview_dot: i32,
    pub move_preview: PreviewColor,
    pub move_preview_width: f32,
}

impl Palette {
    pub const fn standard() -> Self {
        Self {
            primary: ButtonStyle {
                fill: Rgba::rgba(0, 255, 0, 100),
                preview: PreviewColor::Green,
            },
            secondary: ButtonStyle {
                fill: Rgba::rgba(255, 0, 0, 100),
                preview: PreviewColor::Red,
            },
            // The preview dot for the middle button has always been blue even
            // though the canvas fill is yellow.
            middle: ButtonStyle {
                fill: Rgba::rgba(255, 255, 0, 100),
                preview: PreviewColor::Blue,
            },
            click_radius: DEFAULT_CIRCLE_RADIUS,
            preview_dot: 5,
            move_preview: PreviewColor::White,
            move_preview_width: LINE_WIDTH as f32,
        }
    }

    pub fn for_button(&self, button: MouseButton) -> ButtonStyle {
        match button {
            MouseButton::Primary => self.primary,
            MouseButton::Secondary => self.secondary,
            MouseButton::Middle => self.middle,
        }
    }
}
