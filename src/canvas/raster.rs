//! Scan conversion of the two primitives the canvas supports. Both write
//! with replace semantics into a [`Layer`], so a pixel covered twice by the
//! same primitive is not blended with itself.

use crate::canvas::composite::{Layer, Rgba};
use crate::canvas::Point;

/// Fills the ellipse inscribed in the inclusive bounding box `min..=max`.
pub fn fill_ellipse(layer: &mut Layer, min: Point, max: Point, color: Rgba) {
    let cx = (min.x as f32 + max.x as f32) / 2.0;
    let cy = (min.y as f32 + max.y as f32) / 2.0;
    // Degenerate boxes still cover their centre line.
    let rx = ((max.x - min.x) as f32 / 2.0).max(0.5);
    let ry = ((max.y - min.y) as f32 / 2.0).max(0.5);

    let rect = layer.rect();
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            let nx = (x as f32 - cx) / rx;
            let ny = (y as f32 - cy) / ry;
            if nx * nx + ny * ny <= 1.0 {
                layer.put(x, y, color);
            }
        }
    }
}

/// Strokes a `width`-pixel line with round caps from `start` to `end`.
/// A pixel is covered when its centre lies within `width / 2` of the segment.
pub fn stroke_line(layer: &mut Layer, start: Point, end: Point, width: u32, color: Rgba) {
    let half = (width as f32 / 2.0).max(0.5);
    let (ax, ay) = (start.x as f32, start.y as f32);
    let (bx, by) = (end.x as f32, end.y as f32);
    let (dx, dy) = (bx - ax, by - ay);
    let len_sq = dx * dx + dy * dy;

    let rect = layer.rect();
    for y in rect.y..rect.y + rect.height {
        for x in rect.x..rect.x + rect.width {
            let px = x as f32 + 0.5;
            let py = y as f32 + 0.5;
            let t = if len_sq <= f32::EPSILON {
                0.0
            } else {
                (((px - ax) * dx + (py - ay) * dy) / len_sq).clamp(0.0, 1.0)
            };
            let ex = px - (ax + dx * t);
            let ey = py - (ay + dy * t);
            if ex * ex + ey * ey <= half * half {
                layer.put(x, y, color);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::composite::DirtyRect;

    const RED: Rgba = Rgba::rgba(255, 0, 0, 255);

    fn layer(width: i32, height: i32) -> Layer {
        Layer::new(DirtyRect {
            x: 0,
            y: 0,
            width,
            height,
        })
    }

    #[test]
    fn ellipse_covers_centre_and_extremes_but_not_corners() {
        let mut layer = layer(30, 30);
        fill_ellipse(&mut layer, Point::new(5, 5), Point::new(25, 25), RED);

        assert_eq!(layer.get(15, 15), RED);
        assert_eq!(layer.get(5, 15), RED);
        assert_eq!(layer.get(25, 15), RED);
        assert_eq!(layer.get(15, 5), RED);
        assert_eq!(layer.get(5, 5), Rgba::TRANSPARENT);
        assert_eq!(layer.get(25, 25), Rgba::TRANSPARENT);
        assert_eq!(layer.get(4, 15), Rgba::TRANSPARENT);
    }

    #[test]
    fn horizontal_line_is_two_pixels_thick() {
        let mut layer = layer(20, 20);
        stroke_line(&mut layer, Point::new(2, 10), Point::new(17, 10), 2, RED);

        assert_eq!(layer.get(8, 9), RED);
        assert_eq!(layer.get(8, 10), RED);
        assert_eq!(layer.get(8, 8), Rgba::TRANSPARENT);
        assert_eq!(layer.get(8, 11), Rgba::TRANSPARENT);
    }

    #[test]
    fn zero_length_line_paints_a_dot() {
        let mut layer = layer(10, 10);
        stroke_line(&mut layer, Point::new(4, 4), Point::new(4, 4), 2, RED);
        assert_eq!(layer.get(4, 4), RED);
        assert_eq!(layer.get(7, 7), Rgba::TRANSPARENT);
    }
}
