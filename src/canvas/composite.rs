use image::RgbaImage;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_pixel(self) -> image::Rgba<u8> {
        image::Rgba([self.r, self.g, self.b, self.a])
    }

    pub fn from_pixel(pixel: &image::Rgba<u8>) -> Self {
        let [r, g, b, a] = pixel.0;
        Self { r, g, b, a }
    }
}

/// Inclusive-exclusive pixel rectangle in canvas coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirtyRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DirtyRect {
    pub fn from_points(a: (i32, i32), b: (i32, i32), pad: i32) -> Self {
        let min_x = a.0.min(b.0).saturating_sub(pad);
        let max_x = a.0.max(b.0).saturating_add(pad);
        let min_y = a.1.min(b.1).saturating_sub(pad);
        let max_y = a.1.max(b.1).saturating_add(pad);
        Self {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x).saturating_add(1).max(1),
            height: max_y.saturating_sub(min_y).saturating_add(1).max(1),
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<DirtyRect> {
        let max_w = i32::try_from(width).unwrap_or(i32::MAX);
        let max_h = i32::try_from(height).unwrap_or(i32::MAX);
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = self.x.saturating_add(self.width).clamp(0, max_w);
        let y1 = self.y.saturating_add(self.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(DirtyRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x
            && y >= self.y
            && x < self.x.saturating_add(self.width)
            && y < self.y.saturating_add(self.height)
    }
}

/// Transparent scratch raster a single primitive is painted onto before it
/// is composited over the canvas. Only the primitive's clipped bounds are
/// allocated; everything outside them is implicitly transparent.
#[derive(Debug, Clone)]
pub struct Layer {
    rect: DirtyRect,
    pixels: RgbaImage,
}

impl Layer {
    /// `rect` must already be clamped to the target canvas.
    pub fn new(rect: DirtyRect) -> Self {
        Self {
            rect,
            pixels: RgbaImage::from_pixel(
                rect.width as u32,
                rect.height as u32,
                Rgba::TRANSPARENT.to_pixel(),
            ),
        }
    }

    pub fn full(width: u32, height: u32) -> Self {
        Self::new(DirtyRect {
            x: 0,
            y: 0,
            width: width as i32,
            height: height as i32,
        })
    }

    pub fn rect(&self) -> DirtyRect {
        self.rect
    }

    /// Replaces the pixel at canvas coordinates `(x, y)`; points outside the
    /// layer are dropped.
    pub fn put(&mut self, x: i32, y: i32, color: Rgba) {
        if !self.rect.contains(x, y) {
            return;
        }
        let lx = (x - self.rect.x) as u32;
        let ly = (y - self.rect.y) as u32;
        self.pixels.put_pixel(lx, ly, color.to_pixel());
    }

    pub fn get(&self, x: i32, y: i32) -> Rgba {
        if !self.rect.contains(x, y) {
            return Rgba::TRANSPARENT;
        }
        let lx = (x - self.rect.x) as u32;
        let ly = (y - self.rect.y) as u32;
        Rgba::from_pixel(self.pixels.get_pixel(lx, ly))
    }
}

/// Alpha-composites `layer` over `base` in place ("over" operator).
pub fn composite_layer(base: &mut RgbaImage, layer: &Layer) {
    let rect = layer.rect;
    for (lx, ly, src) in layer.pixels.enumerate_pixels() {
        let x = rect.x as u32 + lx;
        let y = rect.y as u32 + ly;
        if x >= base.width() || y >= base.height() {
            continue;
        }
        let dst = base.get_pixel_mut(x, y);
        *dst = blend_pixel(Rgba::from_pixel(dst), Rgba::from_pixel(src)).to_pixel();
    }
}

fn blend_pixel(bottom: Rgba, top: Rgba) -> Rgba {
    if top.a == 0 {
        return bottom;
    }

    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Rgba::TRANSPARENT;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Rgba {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}
