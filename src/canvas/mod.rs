//! Persistent raster the tracked strokes accumulate on.
//!
//! Every primitive is painted onto its own transparent [`Layer`] and then
//! alpha-composited over the buffer, so overlapping translucent strokes get
//! denser instead of replacing one another.

pub mod composite;
pub mod raster;
pub mod save;

use chrono::{DateTime, Local};
use image::{ImageFormat, RgbaImage};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub use composite::{DirtyRect, Layer, Rgba};
pub use save::{SaveError, SaveOptions};

pub const BACKGROUND: Rgba = Rgba::BLACK;
pub const LINE_COLOR: Rgba = Rgba::rgba(255, 255, 255, 50);
pub const LINE_WIDTH: u32 = 2;
pub const DEFAULT_CIRCLE_RADIUS: i32 = 10;

/// Used when the primary display size cannot be queried.
pub const FALLBACK_SIZE: (u32, u32) = (800, 600);

pub type SharedCanvas = Arc<Mutex<Canvas>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<(i32, i32)> for Point {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbaImage,
}

impl Canvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::from_pixel(width.max(1), height.max(1), BACKGROUND.to_pixel()),
        }
    }

    pub fn into_shared(self) -> SharedCanvas {
        Arc::new(Mutex::new(self))
    }

    pub fn size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        Rgba::from_pixel(self.image.get_pixel(x, y))
    }

    pub fn is_blank(&self) -> bool {
        let background = BACKGROUND.to_pixel();
        self.image.pixels().all(|px| *px == background)
    }

    pub fn reset(&mut self) {
        let background = BACKGROUND.to_pixel();
        for px in self.image.pixels_mut() {
            *px = background;
        }
    }

    pub fn draw_line(&mut self, start: Point, end: Point) {
        let pad = (LINE_WIDTH as i32 + 1) / 2 + 1;
        let rect = DirtyRect::from_points((start.x, start.y), (end.x, end.y), pad);
        self.composite_primitive(rect, |layer| {
            raster::stroke_line(layer, start, end, LINE_WIDTH, LINE_COLOR)
        });
    }

    pub fn draw_circle(&mut self, center: Point, color: Rgba, radius: i32) {
        let radius = radius.max(0);
        let min = Point::new(center.x.saturating_sub(radius), center.y.saturating_sub(radius));
        let max = Point::new(center.x.saturating_add(radius), center.y.saturating_add(radius));
        let rect = DirtyRect::from_points((min.x, min.y), (max.x, max.y), 0);
        self.composite_primitive(rect, |layer| raster::fill_ellipse(layer, min, max, color));
    }

    fn composite_primitive(&mut self, rect: DirtyRect, paint: impl FnOnce(&mut Layer)) {
        let (width, height) = self.size();
        let Some(rect) = rect.clamp(width, height) else {
            return;
        };
        let mut layer = Layer::new(rect);
        paint(&mut layer);
        composite::composite_layer(&mut self.image, &layer);
    }

    /// Writes the buffer as a timestamped PNG and returns its path.
    pub fn save(&mut self, options: &SaveOptions) -> Result<PathBuf, SaveError> {
        self.save_at(options, Local::now())
    }

    pub fn save_at(
        &mut self,
        options: &SaveOptions,
        now: DateTime<Local>,
    ) -> Result<PathBuf, SaveError> {
        let directory = save::resolve_output_dir(&options.directory)?;
        save::prepare_output_dir(&directory, options.create_directory)?;

        let path = directory.join(save::timestamped_filename(now));
        self.image
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|source| SaveError::Encode {
                path: path.clone(),
                source,
            })?;

        if options.reset_after {
            self.reset();
        }
        tracing::info!(path = %path.display(), "mouse track image saved");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const GREEN: Rgba = Rgba::rgba(0, 255, 0, 100);

    fn at(second: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2026, 3, 4, 5, 6, second)
            .single()
            .expect("date time")
    }

    fn options_in(dir: &std::path::Path) -> SaveOptions {
        SaveOptions {
            directory: dir.to_path_buf(),
            create_directory: true,
            reset_after: true,
        }
    }

    #[test]
    fn new_canvas_is_opaque_black() {
        let canvas = Canvas::new(4, 3);
        assert_eq!(canvas.size(), (4, 3));
        assert!(canvas.is_blank());
        assert_eq!(canvas.pixel(3, 2), Rgba::BLACK);
    }

    #[test]
    fn line_composites_translucent_white() {
        let mut canvas = Canvas::new(300, 200);
        canvas.draw_line(Point::new(100, 100), Point::new(200, 150));

        assert_eq!(canvas.pixel(150, 125), Rgba::rgba(50, 50, 50, 255));
        assert_eq!(canvas.pixel(150, 140), Rgba::BLACK);
    }

    #[test]
    fn circle_covers_radius_around_centre() {
        let mut canvas = Canvas::new(100, 100);
        canvas.draw_circle(Point::new(50, 50), GREEN, DEFAULT_CIRCLE_RADIUS);

        assert_eq!(canvas.pixel(50, 50), Rgba::rgba(0, 100, 0, 255));
        assert_eq!(canvas.pixel(60, 50), Rgba::rgba(0, 100, 0, 255));
        assert_eq!(canvas.pixel(61, 50), Rgba::BLACK);
        assert_eq!(canvas.pixel(58, 58), Rgba::BLACK);
    }

    #[test]
    fn repeated_circles_get_denser() {
        let mut canvas = Canvas::new(40, 40);
        canvas.draw_circle(Point::new(20, 20), GREEN, 5);
        let once = canvas.pixel(20, 20);
        canvas.draw_circle(Point::new(20, 20), GREEN, 5);
        let twice = canvas.pixel(20, 20);

        assert!(twice.g > once.g, "{twice:?} should be denser than {once:?}");
    }

    #[test]
    fn out_of_bounds_primitives_are_clipped_silently() {
        let mut canvas = Canvas::new(50, 50);
        canvas.draw_line(Point::new(-500, -500), Point::new(-400, -10));
        canvas.draw_circle(Point::new(1000, 1000), GREEN, 10);
        assert!(canvas.is_blank());

        canvas.draw_circle(Point::new(-3, -3), GREEN, 10);
        assert_eq!(canvas.pixel(0, 0), Rgba::rgba(0, 100, 0, 255));
        canvas.draw_line(Point::new(-20, 25), Point::new(70, 25));
        assert_ne!(canvas.pixel(49, 25), Rgba::BLACK);
    }

    #[test]
    fn save_writes_png_and_resets() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut canvas = Canvas::new(64, 48);
        canvas.draw_circle(Point::new(10, 10), GREEN, 4);

        let path = canvas.save_at(&options_in(dir.path()), at(7)).expect("save");

        assert_eq!(path, dir.path().join("mouse_track-2026-3-4-5-6-7.png"));
        assert!(canvas.is_blank());
        let written = image::open(&path).expect("open").to_rgba8();
        assert_eq!(written.dimensions(), (64, 48));
        assert_eq!(written.get_pixel(10, 10).0, [0, 100, 0, 255]);
    }

    #[test]
    fn save_without_reset_keeps_content() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut canvas = Canvas::new(20, 20);
        canvas.draw_circle(Point::new(10, 10), GREEN, 2);

        let options = SaveOptions {
            reset_after: false,
            ..options_in(dir.path())
        };
        canvas.save_at(&options, at(1)).expect("save");
        assert!(!canvas.is_blank());
    }

    #[test]
    fn second_save_only_contains_post_reset_strokes() {
        let dir = tempfile::tempdir().expect("tempdir");
        let mut canvas = Canvas::new(60, 60);
        canvas.draw_circle(Point::new(10, 10), GREEN, 3);
        canvas.save_at(&options_in(dir.path()), at(1)).expect("first save");

        canvas.draw_line(Point::new(40, 40), Point::new(50, 40));
        let path = canvas.save_at(&options_in(dir.path()), at(2)).expect("second save");

        let written = image::open(&path).expect("open").to_rgba8();
        assert_eq!(written.get_pixel(10, 10).0, [0, 0, 0, 255]);
        assert_eq!(written.get_pixel(45, 40).0, [50, 50, 50, 255]);
    }

    #[test]
    fn save_into_missing_directory_without_create_fails() {
        let dir = tempfile::tempdir().expect("tempdir");
        let missing = dir.path().join("missing");
        let mut canvas = Canvas::new(10, 10);
        canvas.draw_circle(Point::new(5, 5), GREEN, 2);

        let options = SaveOptions {
            directory: missing.clone(),
            create_directory: false,
            reset_after: true,
        };
        let err = canvas.save_at(&options, at(3)).expect_err("missing dir");

        assert!(matches!(err, SaveError::DirectoryNotFound(_)));
        assert!(!missing.exists());
        assert!(!canvas.is_blank(), "failed save must not reset");
    }
}
