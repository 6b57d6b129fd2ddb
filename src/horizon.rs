// ============================================================================
// ATTITUDE INDICATOR
// ============================================================================

use crate::color::Color;
use crate::context::RenderContext;
use crate::geometry::{clamp_to_domain, polar_offset, NorthZeroClockwise, Point2D, Rotation};
use crate::surface::{BBox, InstrumentFrame, Style};
use crate::text::FontSize;

/// Maps pitch-ladder offsets to screen segments for one frame. The roll
/// rotation is computed once and shared by the horizon, both fills and
/// every rung.
#[derive(Debug, Clone, Copy)]
pub struct HorizonTransform {
    rotation: Rotation,
    pitch: f64,
    pitch_scale: f64,
    center: Point2D,
}

impl HorizonTransform {
    pub fn new(pitch: f64, roll: f64, pitch_scale: f64, center: Point2D) -> Self {
        Self {
            rotation: Rotation::degrees(-roll),
            pitch,
            pitch_scale,
            center,
        }
    }

    /// End points of the ladder line `offset` degrees above the horizon,
    /// `half_length` either side of the centre line. The first point is the
    /// right-hand end when wings are level.
    pub fn segment(&self, offset: f64, half_length: f64) -> [Point2D; 2] {
        let distance = (offset - self.pitch) * self.pitch_scale;
        [
            self.rotation
                .apply(Point2D::new(half_length, -distance), self.center),
            self.rotation
                .apply(Point2D::new(-half_length, -distance), self.center),
        ]
    }
}

/// Length of the roll scale tick at `mark` degrees; every 30° is long.
pub fn roll_tick_length(ctx: &RenderContext, mark: f64) -> f64 {
    let layout = &ctx.layout.horizon;
    if mark.rem_euclid(30.0) == 0.0 {
        layout.roll_long_tick
    } else {
        layout.roll_short_tick
    }
}

/// Sky, earth, horizon line, pitch ladder, fixed aircraft symbol, roll
/// scale and slip ball. Heading is accepted for call-site symmetry with the
/// compass and not drawn.
pub fn render_attitude(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    pitch: f64,
    roll: f64,
    _heading: f64,
    slip: f64,
    error: Option<&str>,
) {
    let layout = &ctx.layout.horizon;
    let center = ctx.screen.center;
    let transform = HorizonTransform::new(pitch, roll, layout.pitch_scale, center);
    let half = layout.horizon_half_length;

    let [h1, h2] = transform.segment(0.0, half);
    let [e1, e2] = transform.segment(-layout.fill_offset, half);
    frame.polygon(vec![h1, h2, e2, e1], Style::fill(layout.earth));
    let [s1, s2] = transform.segment(layout.fill_offset, half);
    frame.polygon(vec![h1, h2, s2, s1], Style::fill(layout.sky));
    frame.line(vec![h1, h2], Style::stroke(Color::WHITE, 2.0));

    for &mark in &layout.pitch_marks {
        let rung = transform.segment(mark, layout.rung_half_length);
        frame.line(rung.to_vec(), Style::stroke(Color::WHITE, 2.0));
    }

    render_aircraft_symbol(frame, center);
    render_roll_scale(ctx, frame, roll);
    render_slip(ctx, frame, slip);

    ctx.error_message(frame, layout.error_y, error, FontSize::Small);
}

fn render_aircraft_symbol(frame: &mut InstrumentFrame, center: Point2D) {
    let (cx, cy) = (center.x, center.y);
    frame.line(
        vec![Point2D::new(cx - 60.0, cy), Point2D::new(cx - 25.0, cy)],
        Style::stroke(Color::WHITE, 5.0),
    );
    frame.line(
        vec![Point2D::new(cx + 60.0, cy), Point2D::new(cx + 25.0, cy)],
        Style::stroke(Color::WHITE, 5.0),
    );
    frame.polygon(
        vec![
            Point2D::new(cx, cy + 3.0),
            Point2D::new(cx - 15.0, cy + 12.0),
            Point2D::new(cx + 15.0, cy + 12.0),
        ],
        Style::fill(Color::WHITE),
    );
}

fn render_roll_scale(ctx: &RenderContext, frame: &mut InstrumentFrame, roll: f64) {
    let layout = &ctx.layout.horizon;
    let center = ctx.screen.center;
    let radius = center.x.min(center.y);
    for &mark in &layout.roll_marks {
        let angle = NorthZeroClockwise(mark - roll);
        let outer = center + polar_offset(angle, radius);
        let inner = center + polar_offset(angle, radius - roll_tick_length(ctx, mark));
        frame.line(vec![outer, inner], Style::stroke(Color::WHITE, layout.roll_tick_width));
    }

    let top = layout.roll_pointer_top;
    let bottom = top + layout.roll_pointer_height;
    frame.polygon(
        vec![
            Point2D::new(center.x, top),
            Point2D::new(center.x - layout.roll_pointer_half_width, bottom),
            Point2D::new(center.x + layout.roll_pointer_half_width, bottom),
        ],
        Style::fill(Color::WHITE),
    );
}

fn render_slip(ctx: &RenderContext, frame: &mut InstrumentFrame, slip: f64) {
    let layout = &ctx.layout.horizon;
    let screen = ctx.screen;
    let slip = clamp_to_domain(slip, -layout.slip_limit, layout.slip_limit);
    let top = screen.height - layout.slip_ball_radius * 2.0;
    let bottom = screen.height - 1.0;

    frame.rectangle(
        BBox::new(
            screen.center.x - layout.slip_track_half_width,
            top,
            screen.center.x + layout.slip_track_half_width,
            bottom,
        ),
        Style::fill(Color::BLACK),
    );
    let ball = screen.center.x - slip * layout.slip_scale;
    frame.ellipse(
        BBox::new(
            ball - layout.slip_ball_radius,
            top,
            ball + layout.slip_ball_radius,
            bottom,
        ),
        Style::fill(Color::WHITE),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScreenGeometry;
    use crate::surface::DrawCommand;
    use crate::text::test_support::FixedPitch;
    use pretty_assertions::assert_eq;

    const CENTER: Point2D = Point2D::new(160.0, 120.0);

    #[test]
    fn level_flight_horizon_is_centred() {
        let transform = HorizonTransform::new(0.0, 0.0, 3.0, CENTER);
        let [p1, p2] = transform.segment(0.0, 200.0);
        assert_eq!(p1, Point2D::new(360.0, 120.0));
        assert_eq!(p2, Point2D::new(-40.0, 120.0));
    }

    #[test]
    fn nose_up_moves_horizon_down() {
        let transform = HorizonTransform::new(10.0, 0.0, 3.0, CENTER);
        let [p1, _] = transform.segment(0.0, 200.0);
        assert_eq!(p1.y, 150.0);
        let [rung, _] = transform.segment(10.0, 20.0);
        assert_eq!(rung, Point2D::new(180.0, 120.0));
    }

    #[test]
    fn right_bank_raises_right_end() {
        let transform = HorizonTransform::new(0.0, 90.0, 3.0, CENTER);
        let [p1, p2] = transform.segment(0.0, 100.0);
        assert_eq!(p1, Point2D::new(160.0, 20.0));
        assert_eq!(p2, Point2D::new(160.0, 220.0));
    }

    #[test]
    fn every_thirty_degrees_gets_a_long_tick() {
        let ctx = RenderContext::new(ScreenGeometry::new(320, 240), &FixedPitch);
        assert_eq!(roll_tick_length(&ctx, 0.0), 24.0);
        assert_eq!(roll_tick_length(&ctx, -60.0), 24.0);
        assert_eq!(roll_tick_length(&ctx, 90.0), 24.0);
        assert_eq!(roll_tick_length(&ctx, 20.0), 16.0);
        assert_eq!(roll_tick_length(&ctx, -10.0), 16.0);
    }

    #[test]
    fn slip_ball_is_clamped_to_track() {
        let ctx = RenderContext::new(ScreenGeometry::new(320, 240), &FixedPitch);
        let mut frame = InstrumentFrame::new();
        render_attitude(&ctx, &mut frame, 0.0, 0.0, 0.0, -40.0, None);
        let ball = frame
            .commands()
            .iter()
            .rev()
            .find_map(|c| match c {
                DrawCommand::Ellipse { bbox, .. } => Some(*bbox),
                _ => None,
            });
        assert_eq!(ball, Some(BBox::new(270.0, 220.0, 290.0, 239.0)));
    }

    #[test]
    fn earth_is_drawn_before_sky() {
        let ctx = RenderContext::new(ScreenGeometry::new(320, 240), &FixedPitch);
        let mut frame = InstrumentFrame::new();
        render_attitude(&ctx, &mut frame, 5.0, -15.0, 0.0, 0.0, Some("AHRS stale"));
        let fills: Vec<Color> = frame
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polygon { style, .. } => style.fill,
                _ => None,
            })
            .collect();
        assert_eq!(fills[..2].to_vec(), vec![Color::BROWN, Color::BLUE]);
        assert!(frame.commands().iter().any(|c| matches!(
            c,
            DrawCommand::Text { color, .. } if *color == Color::RED
        )));
    }
}
