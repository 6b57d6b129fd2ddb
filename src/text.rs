//! Font handles and the text capability the renderers lean on.

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::error::{Error, Result};
use crate::geometry::Point2D;

/// The fixed set of type sizes a panel uses. `Icon` selects the symbol font.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FontSize {
    VeryLarge,
    Large,
    Medium,
    Small,
    VerySmall,
    Icon,
}

impl FontSize {
    /// Nominal line height in pixels.
    pub const fn pixels(self) -> f64 {
        match self {
            FontSize::VeryLarge => 43.0,
            FontSize::Large => 25.0,
            FontSize::Medium => 23.0,
            FontSize::Small => 21.0,
            FontSize::VerySmall => 18.0,
            FontSize::Icon => 21.0,
        }
    }
}

/// Measures and rasterizes axis-aligned text. Text is positioned by the
/// top-left corner of its line box.
pub trait Typesetter {
    /// Advance width of `text` in pixels.
    fn text_width(&self, text: &str, font: FontSize) -> f64;

    /// Calls `plot(x, y, coverage)` for every covered pixel of `text` laid out
    /// at `origin`. Coverage is in `0.0..=1.0`.
    fn rasterize(
        &self,
        text: &str,
        font: FontSize,
        origin: Point2D,
        plot: &mut dyn FnMut(i32, i32, f32),
    );
}

/// rusttype-backed typesetter holding one text face and one icon face.
pub struct FontSet {
    text: Font<'static>,
    icons: Font<'static>,
}

impl std::fmt::Debug for FontSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FontSet")
            .field("text_glyphs", &self.text.glyph_count())
            .field("icon_glyphs", &self.icons.glyph_count())
            .finish()
    }
}

impl FontSet {
    pub fn from_bytes(text: Vec<u8>, icons: Vec<u8>) -> Result<Self> {
        let text = Font::try_from_vec(text).ok_or(Error::FontLoad("text"))?;
        let icons = Font::try_from_vec(icons).ok_or(Error::FontLoad("icon"))?;
        Ok(Self { text, icons })
    }

    fn face(&self, font: FontSize) -> &Font<'static> {
        match font {
            FontSize::Icon => &self.icons,
            _ => &self.text,
        }
    }

    fn layout(&self, text: &str, font: FontSize, origin: Point2D) -> Vec<PositionedGlyph<'static>> {
        let face = self.face(font);
        let scale = Scale::uniform(font.pixels() as f32);
        let ascent = face.v_metrics(scale).ascent;
        face.layout(
            text,
            scale,
            point(origin.x as f32, origin.y as f32 + ascent),
        )
        .collect()
    }
}

impl Typesetter for FontSet {
    fn text_width(&self, text: &str, font: FontSize) -> f64 {
        let glyphs = self.layout(text, font, Point2D::default());
        glyphs
            .last()
            .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
            .unwrap_or(0.0) as f64
    }

    fn rasterize(
        &self,
        text: &str,
        font: FontSize,
        origin: Point2D,
        plot: &mut dyn FnMut(i32, i32, f32),
    ) {
        for glyph in self.layout(text, font, origin) {
            if let Some(bb) = glyph.pixel_bounding_box() {
                glyph.draw(|gx, gy, v| {
                    if v > 0.001 {
                        plot(bb.min.x + gx as i32, bb.min.y + gy as i32, v);
                    }
                });
            }
        }
    }
}

/// Scale labels print integral values without a fraction, like `-3` or `25`,
/// and everything else in shortest form, like `0.25`.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    /// Every character is a solid cell 60% as wide as the font is tall.
    pub struct FixedPitch;

    impl FixedPitch {
        pub fn advance(font: FontSize) -> f64 {
            (font.pixels() * 0.6).round()
        }
    }

    impl Typesetter for FixedPitch {
        fn text_width(&self, text: &str, font: FontSize) -> f64 {
            text.chars().count() as f64 * Self::advance(font)
        }

        fn rasterize(
            &self,
            text: &str,
            font: FontSize,
            origin: Point2D,
            plot: &mut dyn FnMut(i32, i32, f32),
        ) {
            let advance = Self::advance(font) as i32;
            let height = font.pixels() as i32;
            let (x0, y0) = (origin.x.round() as i32, origin.y.round() as i32);
            for (i, _) in text.chars().enumerate() {
                for y in 2..height - 2 {
                    for x in 1..advance - 1 {
                        plot(x0 + i as i32 * advance + x, y0 + y, 1.0);
                    }
                }
            }
        }
    }

    #[test]
    fn numbers_drop_integral_fractions() {
        assert_eq!(format_number(-3.0), "-3");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.25), "0.25");
        assert_eq!(format_number(45.3), "45.3");
    }

    #[test]
    fn fixed_pitch_measures_per_character() {
        assert_eq!(FixedPitch.text_width("N", FontSize::Large), 15.0);
        assert_eq!(FixedPitch.text_width("+12", FontSize::Large), 45.0);
        assert_eq!(FixedPitch.text_width("", FontSize::Small), 0.0);
    }
}
