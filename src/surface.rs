// ============================================================================
// DRAWING CAPABILITY & RETAINED FRAME
// ============================================================================

use crate::color::Color;
use crate::geometry::{EastZeroClockwise, Point2D};
use crate::text::{FontSize, Typesetter};

/// Fill and outline for one primitive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Style {
    pub fill: Option<Color>,
    pub outline: Option<Color>,
    pub width: f32,
}

impl Style {
    pub const fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            outline: None,
            width: 1.0,
        }
    }

    pub const fn stroke(color: Color, width: f32) -> Self {
        Self {
            fill: None,
            outline: Some(color),
            width,
        }
    }

    pub const fn filled(fill: Color, outline: Color, width: f32) -> Self {
        Self {
            fill: Some(fill),
            outline: Some(outline),
            width,
        }
    }
}

/// Inclusive pixel box, `left/top` to `right/bottom`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl BBox {
    pub const fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn around(center: Point2D, radius: f64) -> Self {
        Self::new(
            center.x - radius,
            center.y - radius,
            center.x + radius,
            center.y + radius,
        )
    }

    pub fn center(&self) -> Point2D {
        Point2D::new(
            (self.left + self.right) / 2.0,
            (self.top + self.bottom) / 2.0,
        )
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }

    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }
}

/// The raster capability instruments are drawn onto. Implementations clip
/// internally; callers never pre-clip.
pub trait Surface {
    fn clear(&mut self, color: Color);
    /// Open polyline through `points`.
    fn draw_line(&mut self, points: &[Point2D], style: Style);
    fn draw_polygon(&mut self, points: &[Point2D], style: Style);
    /// Arc of the ellipse inscribed in `bbox`, swept clockwise from `start` to `end`.
    fn draw_arc(&mut self, bbox: BBox, start: EastZeroClockwise, end: EastZeroClockwise, style: Style);
    fn draw_ellipse(&mut self, bbox: BBox, style: Style);
    fn draw_rectangle(&mut self, bbox: BBox, style: Style);
    fn draw_rounded_rectangle(&mut self, bbox: BBox, radius: f64, style: Style);
    fn draw_text(&mut self, position: Point2D, text: &str, font: FontSize, color: Color);
    fn measure_text_width(&self, text: &str, font: FontSize) -> f64;
    /// Paints `color` through every set pixel of `mask`, its top-left at `position`.
    fn composite_mask(&mut self, position: Point2D, mask: &GlyphMask, color: Color);
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line {
        points: Vec<Point2D>,
        style: Style,
    },
    Polygon {
        points: Vec<Point2D>,
        style: Style,
    },
    Arc {
        bbox: BBox,
        start: EastZeroClockwise,
        end: EastZeroClockwise,
        style: Style,
    },
    Ellipse {
        bbox: BBox,
        style: Style,
    },
    Rectangle {
        bbox: BBox,
        style: Style,
    },
    RoundedRectangle {
        bbox: BBox,
        radius: f64,
        style: Style,
    },
    Text {
        position: Point2D,
        text: String,
        font: FontSize,
        color: Color,
    },
    Mask {
        position: Point2D,
        mask: GlyphMask,
        color: Color,
    },
}

/// Primitives produced by one render pass, replayed onto a [`Surface`] in
/// the order they were issued and then dropped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InstrumentFrame {
    commands: Vec<DrawCommand>,
}

impl InstrumentFrame {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn clear(&mut self, color: Color) {
        self.push(DrawCommand::Clear(color));
    }

    pub fn line(&mut self, points: impl Into<Vec<Point2D>>, style: Style) {
        self.push(DrawCommand::Line {
            points: points.into(),
            style,
        });
    }

    pub fn polygon(&mut self, points: impl Into<Vec<Point2D>>, style: Style) {
        self.push(DrawCommand::Polygon {
            points: points.into(),
            style,
        });
    }

    pub fn arc(&mut self, bbox: BBox, start: EastZeroClockwise, end: EastZeroClockwise, style: Style) {
        self.push(DrawCommand::Arc {
            bbox,
            start,
            end,
            style,
        });
    }

    pub fn ellipse(&mut self, bbox: BBox, style: Style) {
        self.push(DrawCommand::Ellipse { bbox, style });
    }

    pub fn rectangle(&mut self, bbox: BBox, style: Style) {
        self.push(DrawCommand::Rectangle { bbox, style });
    }

    pub fn rounded_rectangle(&mut self, bbox: BBox, radius: f64, style: Style) {
        self.push(DrawCommand::RoundedRectangle {
            bbox,
            radius,
            style,
        });
    }

    pub fn text(&mut self, position: Point2D, text: impl Into<String>, font: FontSize, color: Color) {
        self.push(DrawCommand::Text {
            position,
            text: text.into(),
            font,
            color,
        });
    }

    pub fn mask(&mut self, position: Point2D, mask: GlyphMask, color: Color) {
        self.push(DrawCommand::Mask {
            position,
            mask,
            color,
        });
    }

    /// Replays every primitive onto `surface`.
    pub fn present<S: Surface + ?Sized>(&self, surface: &mut S) {
        log::debug!("presenting {} primitives", self.commands.len());
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => surface.clear(*color),
                DrawCommand::Line { points, style } => surface.draw_line(points, *style),
                DrawCommand::Polygon { points, style } => surface.draw_polygon(points, *style),
                DrawCommand::Arc {
                    bbox,
                    start,
                    end,
                    style,
                } => surface.draw_arc(*bbox, *start, *end, *style),
                DrawCommand::Ellipse { bbox, style } => surface.draw_ellipse(*bbox, *style),
                DrawCommand::Rectangle { bbox, style } => surface.draw_rectangle(*bbox, *style),
                DrawCommand::RoundedRectangle {
                    bbox,
                    radius,
                    style,
                } => surface.draw_rounded_rectangle(*bbox, *radius, *style),
                DrawCommand::Text {
                    position,
                    text,
                    font,
                    color,
                } => surface.draw_text(*position, text, *font, *color),
                DrawCommand::Mask {
                    position,
                    mask,
                    color,
                } => surface.composite_mask(*position, mask, *color),
            }
        }
    }
}

// ============================================================================
// MONOCHROME GLYPH MASK
// ============================================================================

/// A small one-bit bitmap. Text is drawn into it upright and the bitmap is
/// rotated afterwards, since the rasterizer only lays out horizontal text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GlyphMask {
    width: usize,
    height: usize,
    bits: Vec<bool>,
}

impl GlyphMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            bits: vec![false; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Resets every pixel so nothing from a previous label survives.
    pub fn clear(&mut self) {
        self.bits.iter_mut().for_each(|bit| *bit = false);
    }

    pub fn get(&self, x: i32, y: i32) -> bool {
        self.index(x, y).map(|i| self.bits[i]).unwrap_or(false)
    }

    pub fn set(&mut self, x: i32, y: i32) {
        if let Some(i) = self.index(x, y) {
            self.bits[i] = true;
        }
    }

    pub fn count_set(&self) -> usize {
        self.bits.iter().filter(|bit| **bit).count()
    }

    /// Coordinates of every set pixel, row by row.
    pub fn set_pixels(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.bits
            .iter()
            .enumerate()
            .filter(|(_, bit)| **bit)
            .map(move |(i, _)| (i % self.width, i / self.width))
    }

    /// Renders `text` upright with its line box starting at `origin`.
    /// Half-covered pixels and above become set.
    pub fn draw_text(&mut self, fonts: &dyn Typesetter, text: &str, font: FontSize, origin: Point2D) {
        fonts.rasterize(text, font, origin, &mut |x, y, coverage| {
            if coverage >= 0.5 {
                self.set(x, y);
            }
        });
    }

    /// Copy of this mask turned clockwise by `degrees` about its center. The
    /// canvas keeps its size; corners that leave it are cut off.
    pub fn rotated(&self, degrees: f64) -> GlyphMask {
        let mut out = GlyphMask::new(self.width, self.height);
        let (sin, cos) = degrees.to_radians().sin_cos();
        let cx = self.width as f64 / 2.0;
        let cy = self.height as f64 / 2.0;
        for y in 0..self.height {
            for x in 0..self.width {
                // inverse mapping: sample the source pixel that lands here
                let dx = x as f64 + 0.5 - cx;
                let dy = y as f64 + 0.5 - cy;
                let sx = dx * cos + dy * sin + cx;
                let sy = -dx * sin + dy * cos + cy;
                if self.get(sx.floor() as i32, sy.floor() as i32) {
                    out.bits[y * self.width + x] = true;
                }
            }
        }
        out
    }

    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            None
        } else {
            Some(y as usize * self.width + x as usize)
        }
    }
}
