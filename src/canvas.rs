// ============================================================================
// RGBA RASTER SURFACE
// ============================================================================

use crate::color::Color;
use crate::error::{Error, Result};
use crate::geometry::{normalize_degrees, EastZeroClockwise, Point2D};
use crate::surface::{BBox, GlyphMask, Style, Surface};
use crate::text::{FontSize, Typesetter};

/// Immediate-mode rasterizer over an RGBA8 frame buffer, row-major,
/// `width * height * 4` bytes. Everything is clipped to the buffer.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
    fonts: &'a dyn Typesetter,
}

impl<'a> Canvas<'a> {
    /// Fails with [`Error::FrameSize`] unless `frame` holds exactly
    /// `width * height` RGBA pixels.
    pub fn new(
        frame: &'a mut [u8],
        width: usize,
        height: usize,
        fonts: &'a dyn Typesetter,
    ) -> Result<Self> {
        let expected = width * height * 4;
        if frame.len() != expected {
            return Err(Error::FrameSize {
                expected,
                actual: frame.len(),
            });
        }
        Ok(Self {
            frame,
            width,
            height,
            fonts,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Color at `(x, y)`, if inside the buffer.
    pub fn pixel(&self, x: usize, y: usize) -> Option<Color> {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) * 4;
            Some(Color::new(
                self.frame[idx],
                self.frame[idx + 1],
                self.frame[idx + 2],
            ))
        } else {
            None
        }
    }

    fn blend(&mut self, x: i32, y: i32, color: Color, alpha: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let a = alpha.clamp(0.0, 1.0);
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (channel, value) in src.iter().enumerate() {
            let dst = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (value * a + dst * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    /// Pixel rows and columns covered by `bbox`, grown by `pad`, clipped.
    fn span(&self, bbox: BBox, pad: f64) -> (i32, i32, i32, i32) {
        let x0 = ((bbox.left - pad).floor() as i32).max(0);
        let y0 = ((bbox.top - pad).floor() as i32).max(0);
        let x1 = ((bbox.right + pad).ceil() as i32).min(self.width as i32 - 1);
        let y1 = ((bbox.bottom + pad).ceil() as i32).min(self.height as i32 - 1);
        (x0, y0, x1, y1)
    }

    fn thick_line_aa(&mut self, from: Point2D, to: Point2D, thickness: f32, color: Color) {
        let half = (thickness.max(1.0) / 2.0) as f64;
        let bbox = BBox::new(
            from.x.min(to.x),
            from.y.min(to.y),
            from.x.max(to.x),
            from.y.max(to.y),
        );
        let (x0, y0, x1, y1) = self.span(bbox, half + 1.0);
        let dx = to.x - from.x;
        let dy = to.y - from.y;
        let len_sq = dx * dx + dy * dy;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let px = x as f64 - from.x;
                let py = y as f64 - from.y;
                let t = if len_sq > 0.0 {
                    ((px * dx + py * dy) / len_sq).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let lx = from.x + t * dx;
                let ly = from.y + t * dy;
                let dist = ((lx - x as f64).powi(2) + (ly - y as f64).powi(2)).sqrt();
                let aa = (1.0 - (dist - half + 0.5).clamp(0.0, 1.0)) as f32;
                if aa > 0.01 {
                    self.blend(x, y, color, aa);
                }
            }
        }
    }

    fn fill_polygon(&mut self, points: &[Point2D], color: Color) {
        let top = points.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
        let bottom = points.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);
        let y0 = (top.floor() as i32).max(0);
        let y1 = (bottom.ceil() as i32).min(self.height as i32 - 1);
        let mut crossings = Vec::with_capacity(points.len());
        for y in y0..=y1 {
            let scan = y as f64 + 0.5;
            crossings.clear();
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                if (a.y <= scan && b.y > scan) || (b.y <= scan && a.y > scan) {
                    crossings.push(a.x + (scan - a.y) / (b.y - a.y) * (b.x - a.x));
                }
            }
            crossings.sort_by(|a, b| a.total_cmp(b));
            for pair in crossings.chunks_exact(2) {
                let start = ((pair[0] - 0.5).ceil() as i32).max(0);
                let end = ((pair[1] - 0.5).floor() as i32).min(self.width as i32 - 1);
                for x in start..=end {
                    self.blend(x, y, color, 1.0);
                }
            }
        }
    }

    /// Signed distance in pixels from the ellipse edge, negative inside.
    fn ellipse_distance(bbox: BBox, x: f64, y: f64) -> f64 {
        let center = bbox.center();
        let rx = (bbox.width() / 2.0).max(0.5);
        let ry = (bbox.height() / 2.0).max(0.5);
        let nx = (x - center.x) / rx;
        let ny = (y - center.y) / ry;
        ((nx * nx + ny * ny).sqrt() - 1.0) * (rx + ry) / 2.0
    }

    fn paint_band(&mut self, bbox: BBox, style: Style, accept: impl Fn(f64, f64) -> bool) {
        let width = style.width.max(1.0) as f64;
        let (x0, y0, x1, y1) = self.span(bbox, 1.0);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if !accept(x as f64, y as f64) {
                    continue;
                }
                let edge = Self::ellipse_distance(bbox, x as f64, y as f64);
                if let Some(fill) = style.fill {
                    let alpha = (0.5 - edge).clamp(0.0, 1.0) as f32;
                    if alpha > 0.01 {
                        self.blend(x, y, fill, alpha);
                    }
                }
                if let Some(outline) = style.outline {
                    let alpha = ((0.5 - edge).clamp(0.0, 1.0)
                        * (edge + width + 0.5).clamp(0.0, 1.0)) as f32;
                    if alpha > 0.01 {
                        self.blend(x, y, outline, alpha);
                    }
                }
            }
        }
    }

    fn inside_rounded(bbox: BBox, radius: f64, x: f64, y: f64) -> bool {
        if x < bbox.left || x > bbox.right || y < bbox.top || y > bbox.bottom {
            return false;
        }
        let r = radius.min(bbox.width() / 2.0).min(bbox.height() / 2.0).max(0.0);
        let cx = x.clamp(bbox.left + r, bbox.right - r);
        let cy = y.clamp(bbox.top + r, bbox.bottom - r);
        (x - cx).powi(2) + (y - cy).powi(2) <= r * r
    }
}

impl Surface for Canvas<'_> {
    fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    fn draw_line(&mut self, points: &[Point2D], style: Style) {
        let Some(color) = style.outline.or(style.fill) else {
            return;
        };
        for pair in points.windows(2) {
            self.thick_line_aa(pair[0], pair[1], style.width, color);
        }
    }

    fn draw_polygon(&mut self, points: &[Point2D], style: Style) {
        if points.len() < 3 {
            return;
        }
        if let Some(fill) = style.fill {
            self.fill_polygon(points, fill);
        }
        if let Some(outline) = style.outline {
            for (i, a) in points.iter().enumerate() {
                let b = points[(i + 1) % points.len()];
                self.thick_line_aa(*a, b, style.width, outline);
            }
        }
    }

    fn draw_arc(&mut self, bbox: BBox, start: EastZeroClockwise, end: EastZeroClockwise, style: Style) {
        let start = start.degrees();
        let sweep = end.degrees() - start;
        let full_circle = sweep.abs() >= 360.0;
        let sweep = normalize_degrees(sweep);
        let center = bbox.center();
        let stroke = Style {
            fill: None,
            outline: style.outline.or(style.fill),
            width: style.width,
        };
        self.paint_band(bbox, stroke, |x, y| {
            if full_circle {
                return true;
            }
            let angle = (y - center.y).atan2(x - center.x).to_degrees();
            normalize_degrees(angle - start) <= sweep
        });
    }

    fn draw_ellipse(&mut self, bbox: BBox, style: Style) {
        self.paint_band(bbox, style, |_, _| true);
    }

    fn draw_rectangle(&mut self, bbox: BBox, style: Style) {
        let (x0, y0, x1, y1) = self.span(bbox, 0.0);
        let width = style.width.max(1.0) as f64;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (fx, fy) = (x as f64, y as f64);
                if fx < bbox.left || fx > bbox.right || fy < bbox.top || fy > bbox.bottom {
                    continue;
                }
                let border = fx < bbox.left + width
                    || fx > bbox.right - width
                    || fy < bbox.top + width
                    || fy > bbox.bottom - width;
                match (style.outline, style.fill) {
                    (Some(outline), _) if border => self.blend(x, y, outline, 1.0),
                    (_, Some(fill)) => self.blend(x, y, fill, 1.0),
                    _ => {}
                }
            }
        }
    }

    fn draw_rounded_rectangle(&mut self, bbox: BBox, radius: f64, style: Style) {
        let (x0, y0, x1, y1) = self.span(bbox, 0.0);
        let width = style.width.max(1.0) as f64;
        let inner = BBox::new(
            bbox.left + width,
            bbox.top + width,
            bbox.right - width,
            bbox.bottom - width,
        );
        for y in y0..=y1 {
            for x in x0..=x1 {
                let (fx, fy) = (x as f64, y as f64);
                if !Self::inside_rounded(bbox, radius, fx, fy) {
                    continue;
                }
                let border = !Self::inside_rounded(inner, (radius - width).max(0.0), fx, fy);
                match (style.outline, style.fill) {
                    (Some(outline), _) if border => self.blend(x, y, outline, 1.0),
                    (_, Some(fill)) => self.blend(x, y, fill, 1.0),
                    _ => {}
                }
            }
        }
    }

    fn draw_text(&mut self, position: Point2D, text: &str, font: FontSize, color: Color) {
        let fonts = self.fonts;
        let mut plotted = Vec::new();
        fonts.rasterize(text, font, position, &mut |x, y, v| plotted.push((x, y, v)));
        for (x, y, v) in plotted {
            self.blend(x, y, color, v);
        }
    }

    fn measure_text_width(&self, text: &str, font: FontSize) -> f64 {
        self.fonts.text_width(text, font)
    }

    fn composite_mask(&mut self, position: Point2D, mask: &GlyphMask, color: Color) {
        let origin = position.round();
        for (x, y) in mask.set_pixels() {
            self.blend(origin.x as i32 + x as i32, origin.y as i32 + y as i32, color, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::test_support::FixedPitch;

    fn with_canvas(width: usize, height: usize, draw: impl FnOnce(&mut Canvas)) -> Vec<u8> {
        let mut buffer = vec![0u8; width * height * 4];
        let mut canvas = Canvas::new(&mut buffer, width, height, &FixedPitch).unwrap();
        canvas.clear(Color::BLACK);
        draw(&mut canvas);
        buffer
    }

    fn at(buffer: &[u8], width: usize, x: usize, y: usize) -> Color {
        let idx = (y * width + x) * 4;
        Color::new(buffer[idx], buffer[idx + 1], buffer[idx + 2])
    }

    #[test]
    fn polygon_fills_interior_only() {
        let buffer = with_canvas(40, 40, |canvas| {
            canvas.draw_polygon(
                &[
                    Point2D::new(10.0, 10.0),
                    Point2D::new(30.0, 10.0),
                    Point2D::new(30.0, 30.0),
                    Point2D::new(10.0, 30.0),
                ],
                Style::fill(Color::BLUE),
            );
        });
        assert_eq!(at(&buffer, 40, 20, 20), Color::BLUE);
        assert_eq!(at(&buffer, 40, 5, 5), Color::BLACK);
        assert_eq!(at(&buffer, 40, 35, 20), Color::BLACK);
    }

    #[test]
    fn ellipse_outline_leaves_centre_untouched() {
        let buffer = with_canvas(60, 60, |canvas| {
            canvas.draw_ellipse(
                BBox::around(Point2D::new(30.0, 30.0), 20.0),
                Style::stroke(Color::YELLOW, 3.0),
            );
        });
        assert_eq!(at(&buffer, 60, 30, 30), Color::BLACK);
        assert_eq!(at(&buffer, 60, 30, 11), Color::YELLOW);
        assert_eq!(at(&buffer, 60, 49, 30), Color::YELLOW);
    }

    #[test]
    fn arc_covers_only_its_sweep() {
        // lower half only: 0 (east) clockwise to 180 (west)
        let buffer = with_canvas(60, 60, |canvas| {
            canvas.draw_arc(
                BBox::around(Point2D::new(30.0, 30.0), 20.0),
                EastZeroClockwise(0.0),
                EastZeroClockwise(180.0),
                Style::stroke(Color::WHITE, 2.0),
            );
        });
        assert_eq!(at(&buffer, 60, 30, 49), Color::WHITE);
        assert_eq!(at(&buffer, 60, 30, 11), Color::BLACK);
    }

    #[test]
    fn mask_composites_in_color_and_clips() {
        let mut mask = GlyphMask::new(4, 4);
        mask.set(0, 0);
        mask.set(3, 3);
        let buffer = with_canvas(8, 8, |canvas| {
            canvas.composite_mask(Point2D::new(2.0, 2.0), &mask, Color::YELLOW);
            canvas.composite_mask(Point2D::new(6.0, 6.0), &mask, Color::RED);
        });
        assert_eq!(at(&buffer, 8, 2, 2), Color::YELLOW);
        assert_eq!(at(&buffer, 8, 5, 5), Color::YELLOW);
        assert_eq!(at(&buffer, 8, 6, 6), Color::RED);
        assert_eq!(at(&buffer, 8, 3, 3), Color::BLACK);
    }

    #[test]
    fn rectangle_outline_and_fill() {
        let buffer = with_canvas(20, 20, |canvas| {
            canvas.draw_rectangle(
                BBox::new(2.0, 2.0, 17.0, 17.0),
                Style::filled(Color::GREEN, Color::WHITE, 1.0),
            );
        });
        assert_eq!(at(&buffer, 20, 2, 10), Color::WHITE);
        assert_eq!(at(&buffer, 20, 10, 10), Color::GREEN);
        assert_eq!(at(&buffer, 20, 1, 10), Color::BLACK);
    }

    #[test]
    fn pixel_reads_inside_buffer_only() {
        let mut buffer = vec![0u8; 4 * 4 * 4];
        let mut canvas = Canvas::new(&mut buffer, 4, 4, &FixedPitch).unwrap();
        canvas.clear(Color::CYAN);
        assert_eq!(canvas.pixel(3, 3), Some(Color::CYAN));
        assert_eq!(canvas.pixel(4, 0), None);
    }

    #[test]
    fn short_buffer_is_rejected() {
        let mut buffer = vec![0u8; 4 * 4 * 4 - 1];
        match Canvas::new(&mut buffer, 4, 4, &FixedPitch) {
            Err(Error::FrameSize { expected, actual }) => {
                assert_eq!((expected, actual), (64, 63));
            }
            Err(other) => panic!("unexpected error {other}"),
            Ok(_) => panic!("short buffer accepted"),
        }
    }
}
