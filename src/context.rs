use bon::Builder;

use crate::color::Color;
use crate::config::Layout;
use crate::geometry::Point2D;
use crate::surface::InstrumentFrame;
use crate::text::{FontSize, Typesetter};

/// Panel dimensions, fixed for a session once the device reports its size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenGeometry {
    pub width: f64,
    pub height: f64,
    pub center: Point2D,
    /// Radius of the largest circle centred on the panel.
    pub max_radius: f64,
}

impl ScreenGeometry {
    pub fn new(width: u32, height: u32) -> Self {
        let (width, height) = (width as f64, height as f64);
        Self {
            width,
            height,
            center: Point2D::new(width / 2.0, height / 2.0),
            max_radius: width.min(height) / 2.0,
        }
    }
}

/// Everything a renderer reads: screen geometry, fonts and layout. Built
/// once at startup and shared immutably by every frame.
#[derive(Builder)]
pub struct RenderContext<'a> {
    pub screen: ScreenGeometry,
    pub fonts: &'a dyn Typesetter,
    #[builder(default)]
    pub layout: Layout,
}

impl<'a> RenderContext<'a> {
    pub fn new(screen: ScreenGeometry, fonts: &'a dyn Typesetter) -> Self {
        Self {
            screen,
            fonts,
            layout: Layout::default(),
        }
    }

    pub fn text_width(&self, text: &str, font: FontSize) -> f64 {
        self.fonts.text_width(text, font)
    }

    /// Text horizontally centred on the screen with its top at `y`.
    pub fn centered_text(
        &self,
        frame: &mut InstrumentFrame,
        y: f64,
        text: &str,
        font: FontSize,
        color: Color,
    ) {
        let width = self.text_width(text, font);
        frame.text(
            Point2D::new(self.screen.center.x - width / 2.0, y),
            text,
            font,
            color,
        );
    }

    /// Text flush with the right screen edge.
    pub fn right_text(
        &self,
        frame: &mut InstrumentFrame,
        y: f64,
        text: &str,
        font: FontSize,
        color: Color,
    ) {
        let width = self.text_width(text, font);
        frame.text(Point2D::new(self.screen.width - width, y), text, font, color);
    }

    /// Red overlay text. Rendering around it carries on regardless.
    pub fn error_message(
        &self,
        frame: &mut InstrumentFrame,
        y: f64,
        message: Option<&str>,
        font: FontSize,
    ) {
        if let Some(message) = message.filter(|m| !m.is_empty()) {
            self.centered_text(frame, y, message, font, Color::RED);
        }
    }

    /// Labels for the three buttons under the panel.
    pub fn soft_keys(
        &self,
        frame: &mut InstrumentFrame,
        y: f64,
        left: &str,
        middle: &str,
        right: &str,
    ) {
        frame.text(Point2D::new(0.0, y), left, FontSize::Small, Color::GREEN);
        self.right_text(frame, y, right, FontSize::Small, Color::GREEN);
        self.centered_text(frame, y, middle, FontSize::Small, Color::GREEN);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::DrawCommand;
    use crate::text::test_support::FixedPitch;

    #[test]
    fn geometry_is_derived_from_panel_size() {
        let screen = ScreenGeometry::new(320, 240);
        assert_eq!(screen.center, Point2D::new(160.0, 120.0));
        assert_eq!(screen.max_radius, 120.0);
    }

    #[test]
    fn right_text_is_flush_with_edge() {
        let ctx = RenderContext::builder()
            .screen(ScreenGeometry::new(320, 240))
            .fonts(&FixedPitch)
            .build();
        let mut frame = InstrumentFrame::new();
        ctx.right_text(&mut frame, 10.0, "abc", FontSize::Small, Color::WHITE);
        match &frame.commands()[0] {
            DrawCommand::Text { position, .. } => {
                assert_eq!(position.x + FixedPitch.text_width("abc", FontSize::Small), 320.0)
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn empty_error_message_draws_nothing() {
        let ctx = RenderContext::new(ScreenGeometry::new(320, 240), &FixedPitch);
        let mut frame = InstrumentFrame::new();
        ctx.error_message(&mut frame, 30.0, Some(""), FontSize::Small);
        ctx.error_message(&mut frame, 30.0, None, FontSize::Small);
        assert!(frame.is_empty());
    }
}
