//! Rotating compass rose.
//!
//! Labels are rendered upright into an off-screen [`GlyphMask`], turned with
//! the rose and composited onto the frame, since the text rasterizer only
//! lays out horizontal text.

use crate::color::Color;
use crate::context::RenderContext;
use crate::geometry::{polar_offset, NorthZeroClockwise, Point2D};
use crate::surface::{BBox, GlyphMask, InstrumentFrame, Style};
use crate::text::FontSize;

/// Where one rose label lands this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelPlacement {
    /// Screen point the label's mask is centred on.
    pub anchor: Point2D,
    /// Clockwise turn applied to the upright label.
    pub rotation: f64,
}

/// Text and colour of the label at `mark` degrees, if that mark carries one.
pub fn mark_label(ctx: &RenderContext, mark: u32) -> Option<(String, Color)> {
    let layout = &ctx.layout.compass;
    let cardinal = match mark {
        0 => "N",
        90 => "E",
        180 => "S",
        270 => "W",
        m if m % 30 == 0 => return Some(((m / 10).to_string(), layout.numeral_color)),
        _ => return None,
    };
    Some((cardinal.to_string(), layout.cardinal_color))
}

/// Placement of the label for `mark` with the aircraft on `heading`. The
/// label sits just inside the tick ring and turns with it.
pub fn label_placement(ctx: &RenderContext, mark: f64, heading: f64) -> LabelPlacement {
    let layout = &ctx.layout.compass;
    let radius = rose_radius(ctx);
    let angle = NorthZeroClockwise(mark - heading);
    let inset = radius - layout.tick_length - layout.label_font.pixels() / 2.0;
    LabelPlacement {
        anchor: ctx.screen.center + polar_offset(angle, inset),
        rotation: angle.degrees(),
    }
}

fn rose_radius(ctx: &RenderContext) -> f64 {
    ctx.screen.height / 2.0
}

/// Draws the rose for `heading` degrees: rim, ticks every 10°, labels every
/// 30° with cardinals highlighted, fixed lubber line, aircraft silhouette and
/// numeric heading readout.
pub fn render_compass(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    heading: f64,
    error: Option<&str>,
) {
    let layout = &ctx.layout.compass;
    let screen = ctx.screen;
    let center = screen.center;
    let radius = rose_radius(ctx);

    frame.ellipse(
        BBox::new(
            screen.width / 2.0 - radius,
            0.0,
            screen.width / 2.0 + radius - 1.0,
            screen.height - 1.0,
        ),
        Style::filled(Color::BLACK, Color::WHITE, layout.rim_width),
    );
    frame.polygon(aircraft_silhouette(center, layout.aircraft_span), Style::fill(Color::WHITE));
    frame.line(
        vec![
            Point2D::new(center.x, layout.lubber_top),
            Point2D::new(center.x, layout.lubber_bottom),
        ],
        Style::stroke(Color::ORANGE, 3.0),
    );

    let readout = format!("{heading:.0}°");
    let readout_width = ctx.text_width(&readout, FontSize::Small);
    frame.text(
        Point2D::new(screen.width - readout_width, screen.height - FontSize::Small.pixels()),
        readout,
        FontSize::Small,
        Color::FLORAL_WHITE,
    );

    let font = layout.label_font;
    let cell = font.pixels() * 2.0;
    let mut mask = GlyphMask::new(cell as usize, cell as usize);
    for mark in (0..360).step_by(10) {
        let angle = NorthZeroClockwise(mark as f64 - heading);
        let label = mark_label(ctx, mark);
        let width = if label.is_some() { 3.0 } else { 1.0 };
        frame.line(
            vec![
                center + polar_offset(angle, radius - 1.0),
                center + polar_offset(angle, radius - layout.tick_length),
            ],
            Style::stroke(Color::WHITE, width),
        );

        let Some((text, color)) = label else {
            continue;
        };
        mask.clear();
        let text_width = ctx.text_width(&text, font);
        mask.draw_text(
            ctx.fonts,
            &text,
            font,
            Point2D::new((cell - text_width) / 2.0, (cell - font.pixels()) / 2.0),
        );
        let placement = label_placement(ctx, mark as f64, heading);
        let corner = (placement.anchor - Point2D::new(cell / 2.0, cell / 2.0)).round();
        frame.mask(corner, mask.rotated(placement.rotation), color);
    }

    ctx.error_message(frame, layout.error_y, error, FontSize::Large);
}

/// Top view of a light aircraft, nose up, `half_span` from centre to tip.
fn aircraft_silhouette(center: Point2D, half_span: f64) -> Vec<Point2D> {
    const OUTLINE: [(f64, f64); 18] = [
        (0.0, -45.0),
        (5.0, -38.0),
        (5.0, -12.0),
        (60.0, 2.0),
        (60.0, 10.0),
        (5.0, 4.0),
        (4.0, 30.0),
        (20.0, 40.0),
        (20.0, 46.0),
        (0.0, 42.0),
        (-20.0, 46.0),
        (-20.0, 40.0),
        (-4.0, 30.0),
        (-5.0, 4.0),
        (-60.0, 10.0),
        (-60.0, 2.0),
        (-5.0, -12.0),
        (-5.0, -38.0),
    ];
    let scale = half_span / 60.0;
    OUTLINE
        .iter()
        .map(|&(x, y)| center.offset(x * scale, y * scale))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScreenGeometry;
    use crate::surface::DrawCommand;
    use crate::text::test_support::FixedPitch;

    fn context() -> RenderContext<'static> {
        RenderContext::new(ScreenGeometry::new(320, 240), &FixedPitch)
    }

    #[test]
    fn north_label_sits_at_top_when_heading_north() {
        let ctx = context();
        let placement = label_placement(&ctx, 0.0, 0.0);
        assert_eq!(placement.anchor, Point2D::new(160.0, 27.0));
        assert_eq!(placement.rotation, 0.0);
    }

    #[test]
    fn heading_east_turns_rose_left() {
        let ctx = context();
        let east = label_placement(&ctx, 90.0, 90.0);
        assert_eq!(east.anchor, Point2D::new(160.0, 27.0));
        assert_eq!(east.rotation, 0.0);

        let north = label_placement(&ctx, 0.0, 90.0);
        assert_eq!(north.anchor, Point2D::new(67.0, 120.0));
        assert_eq!(north.rotation, -90.0);
    }

    #[test]
    fn labels_every_thirty_degrees() {
        let ctx = context();
        assert_eq!(mark_label(&ctx, 0), Some(("N".to_string(), Color::YELLOW)));
        assert_eq!(mark_label(&ctx, 270), Some(("W".to_string(), Color::YELLOW)));
        assert_eq!(mark_label(&ctx, 120), Some(("12".to_string(), Color::WHITE)));
        assert_eq!(mark_label(&ctx, 40), None);
    }

    #[test]
    fn rose_composites_twelve_labels() {
        let ctx = context();
        let mut frame = InstrumentFrame::new();
        render_compass(&ctx, &mut frame, 37.0, None);
        let masks: Vec<&GlyphMask> = frame
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Mask { mask, .. } => Some(mask),
                _ => None,
            })
            .collect();
        assert_eq!(masks.len(), 12);
        assert!(masks.iter().all(|m| m.count_set() > 0));
        // one glyph never bleeds into the next label
        assert!(masks[0].count_set() < masks[4].count_set());
    }
}
