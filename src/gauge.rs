//! Declarative radial dials.
//!
//! A [`GaugeSpec`] pairs a value domain with an angular domain; ticks, labels
//! and the needle are all placed through it, so one routine draws every
//! round instrument. Dial angles live in [`NorthZeroClockwise`] space: zero
//! straight up, growing clockwise.

use bon::Builder;

use crate::color::Color;
use crate::context::RenderContext;
use crate::geometry::{
    clamp_to_domain, polar_offset, rotate_batch, EastZeroClockwise, NorthZeroClockwise, Point2D,
};
use crate::surface::{BBox, InstrumentFrame, Style};
use crate::text::{format_number, FontSize};

/// Scale of one radial dial. Passed per call, never retained.
///
/// `start == end` is a caller error; the result is drawn but meaningless.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct GaugeSpec {
    pub start: f64,
    pub end: f64,
    /// Dial angle of `start`, degrees clockwise from up.
    pub from_degree: f64,
    /// Dial angle of `end`.
    pub to_degree: f64,
    pub major_spacing: f64,
    pub minor_spacing: f64,
    pub center: Point2D,
    pub radius: f64,
}

impl GaugeSpec {
    pub fn degrees_per_value(&self) -> f64 {
        let span = self.end - self.start;
        if span == 0.0 {
            0.0
        } else {
            (self.to_degree - self.from_degree) / span
        }
    }

    /// Dial angle of `value`, clamped to the domain first so the needle
    /// never passes the end ticks.
    pub fn angle_at(&self, value: f64) -> NorthZeroClockwise {
        let value = clamp_to_domain(value, self.start, self.end);
        NorthZeroClockwise(self.degrees_per_value() * (value - self.start) + self.from_degree)
    }

    /// Tick positions from `start` in steps of `spacing`, end inclusive.
    /// When the spacing leaves a remainder the end value still gets a tick.
    pub fn tick_values(&self, spacing: f64, epsilon: f64) -> Vec<f64> {
        let (low, high) = (self.start.min(self.end), self.start.max(self.end));
        if spacing.is_nan() || spacing <= 0.0 {
            return vec![low, high];
        }
        let steps = ((high - low) / spacing + epsilon).floor() as usize;
        let mut values: Vec<f64> = (0..=steps).map(|i| low + i as f64 * spacing).collect();
        if values.last().is_some_and(|last| high - last > epsilon * spacing.max(1.0)) {
            values.push(high);
        }
        values
    }
}

/// Draws a complete dial: arc, minor and major ticks, major labels, needle,
/// hub and up to two captions.
pub fn render_gauge(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    spec: &GaugeSpec,
    current: f64,
    caption_above: Option<&str>,
    caption_below: Option<&str>,
) {
    let layout = &ctx.layout.gauge;
    let (center, radius) = (spec.center, spec.radius);

    frame.arc(
        BBox::around(center, radius),
        NorthZeroClockwise(spec.from_degree).into(),
        NorthZeroClockwise(spec.to_degree).into(),
        Style::stroke(Color::WHITE, layout.arc_width),
    );

    let minor = [
        Point2D::new(0.0, -radius),
        Point2D::new(0.0, -radius + layout.minor_tick_length),
    ];
    for value in spec.tick_values(spec.minor_spacing, layout.tick_epsilon) {
        let angle = spec.angle_at(value);
        frame.line(rotate_batch(angle.degrees(), &minor, center), Style::stroke(Color::WHITE, 1.0));
    }

    let major = [
        Point2D::new(0.0, -radius),
        Point2D::new(0.0, -radius + layout.major_tick_length),
    ];
    let label_height = FontSize::Large.pixels();
    let label_radius = radius - layout.major_tick_length - label_height / 2.0 - layout.label_gap;
    for value in spec.tick_values(spec.major_spacing, layout.tick_epsilon) {
        let angle = spec.angle_at(value);
        frame.line(rotate_batch(angle.degrees(), &major, center), Style::stroke(Color::WHITE, 2.0));

        let text = format_number(value);
        let width = ctx.text_width(&text, FontSize::Large);
        let anchor = center + polar_offset(angle, label_radius);
        frame.text(
            Point2D::new(anchor.x - width / 2.0, anchor.y - label_height / 2.0),
            text,
            FontSize::Large,
            Color::WHITE,
        );
    }

    if current < spec.start.min(spec.end) || current > spec.start.max(spec.end) {
        log::trace!("gauge value {current} clamped to [{}, {}]", spec.start, spec.end);
    }
    let needle = needle_outline(ctx, radius);
    frame.line(
        rotate_batch(spec.angle_at(current).degrees(), &needle, center),
        Style::stroke(Color::WHITE, 1.0),
    );
    frame.ellipse(BBox::around(center, layout.hub_radius), Style::fill(Color::WHITE));

    if let Some(text) = caption_above {
        let width = ctx.text_width(text, FontSize::Small);
        frame.text(
            Point2D::new(
                center.x - width / 2.0,
                center.y - FontSize::Small.pixels() - layout.caption_gap,
            ),
            text,
            FontSize::Small,
            Color::YELLOW,
        );
    }
    if let Some(text) = caption_below {
        let width = ctx.text_width(text, FontSize::Small);
        frame.text(
            Point2D::new(center.x - width / 2.0, center.y + layout.caption_gap),
            text,
            FontSize::Small,
            Color::YELLOW,
        );
    }
}

/// Closed arrow outline pointing straight up from the hub.
fn needle_outline(ctx: &RenderContext, radius: f64) -> [Point2D; 6] {
    let layout = &ctx.layout.gauge;
    let half = layout.needle_width / 2.0;
    let shoulder = -radius + layout.needle_head_length;
    [
        Point2D::new(half, 0.0),
        Point2D::new(-half, 0.0),
        Point2D::new(-half, shoulder),
        Point2D::new(0.0, -radius + layout.needle_tip_gap),
        Point2D::new(half, shoulder),
        Point2D::new(half, 0.0),
    ]
}

/// Acceleration dial from -3 g to +5 g with the session extremes beside it.
pub fn render_gmeter(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    current: f64,
    max_g: f64,
    min_g: f64,
    error: Option<&str>,
) {
    let screen = ctx.screen;
    let spec = GaugeSpec::builder()
        .start(-3.0)
        .end(5.0)
        .from_degree(120.0)
        .to_degree(420.0)
        .major_spacing(1.0)
        .minor_spacing(0.25)
        .center(screen.center)
        .radius((screen.height - 2.0) / 2.0)
        .build();
    render_gauge(ctx, frame, &spec, current, Some("G-Meter"), None);

    let x = screen.center.x + 8.0;
    frame.text(Point2D::new(x, 52.0), "max", FontSize::Small, Color::CYAN);
    ctx.right_text(frame, 52.0, &format!("{max_g:+.2}"), FontSize::Small, Color::MAGENTA);
    ctx.error_message(frame, 57.0, error, FontSize::Large);
    frame.text(Point2D::new(x, 68.0), "min", FontSize::Small, Color::CYAN);
    ctx.right_text(frame, 68.0, &format!("{min_g:+.2}"), FontSize::Small, Color::MAGENTA);

    let y = screen.height - FontSize::Small.pixels() - ctx.layout.panel.soft_key_inset;
    ctx.right_text(frame, y, "Reset", FontSize::Small, Color::GREEN);
}

// ============================================================================
// VERTICAL SPEED INDICATOR
// ============================================================================

/// Direction of the VSI needle. Zero climb points left, climbs turn
/// clockwise (upward) and descents counter-clockwise; the deflection is
/// clamped to the printed scale before projection.
pub fn vsi_needle_angle(ctx: &RenderContext, vertical_speed: f64) -> EastZeroClockwise {
    let layout = &ctx.layout.vsi;
    let deflection = clamp_to_domain(
        vertical_speed * layout.degrees_per_fpm(),
        -layout.sweep_degrees,
        layout.sweep_degrees,
    );
    vsi_angle(deflection)
}

fn vsi_angle(deflection: f64) -> EastZeroClockwise {
    EastZeroClockwise(180.0 + deflection)
}

/// Centre of the scale number printed at `fpm`. The ring is narrower
/// vertically than horizontally, so the two axes use separate insets.
pub fn vsi_label_center(ctx: &RenderContext, fpm: f64) -> Point2D {
    let layout = &ctx.layout.vsi;
    let direction = vsi_angle(fpm * layout.degrees_per_fpm()).direction();
    let base = ctx.screen.height / 2.0 - layout.major_tick_length - FontSize::Large.pixels() / 2.0;
    ctx.screen.center
        + Point2D::new(
            (direction.x * (base - layout.label_inset_x)).round(),
            (direction.y * (base - layout.label_inset_y)).round(),
        )
}

/// Vertical speed in ft/min on a ±2000 scale.
pub fn render_vsi(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    vertical_speed: f64,
    error: Option<&str>,
) {
    let layout = &ctx.layout.vsi;
    let screen = ctx.screen;
    let center = screen.center;
    let radius = screen.height / 2.0;
    let small = FontSize::VerySmall.pixels();

    frame.arc(
        BBox::new(center.x - radius, 0.0, center.x + radius - 1.0, screen.height - 1.0),
        EastZeroClockwise(10.0),
        EastZeroClockwise(350.0),
        Style::stroke(Color::WHITE, 2.0),
    );
    frame.text(Point2D::new(12.0, center.y - small - 12.0), "up", FontSize::VerySmall, Color::WHITE);
    frame.text(Point2D::new(12.0, center.y + 12.0), "dn", FontSize::VerySmall, Color::WHITE);
    for (text, y) in [
        ("Vert Spd", center.y - small - 10.0),
        ("100 ft/min", center.y + 10.0),
    ] {
        let width = ctx.text_width(text, FontSize::VerySmall);
        frame.text(Point2D::new(center.x - width / 2.0, y), text, FontSize::VerySmall, Color::WHITE);
    }

    let scale = layout.degrees_per_fpm();
    let steps = (layout.range_fpm / layout.minor_step_fpm).round() as i64;
    let major_every = (layout.major_step_fpm / layout.minor_step_fpm).round().max(1.0) as i64;
    let label_height = FontSize::Large.pixels();
    for i in -steps..=steps {
        let fpm = i as f64 * layout.minor_step_fpm;
        let angle = vsi_angle(fpm * scale);
        let outer = center + polar_offset(angle, radius - 1.0);
        if i % major_every != 0 {
            let inner = center + polar_offset(angle, radius - layout.minor_tick_length);
            frame.line(vec![outer, inner], Style::stroke(Color::WHITE, 1.0));
            continue;
        }
        let inner = center + polar_offset(angle, radius - layout.major_tick_length);
        frame.line(vec![outer, inner], Style::stroke(Color::WHITE, 3.0));

        let text = format_number((fpm / 100.0).abs().round());
        let width = ctx.text_width(&text, FontSize::Large);
        if i == steps {
            // top and bottom of the scale meet at the gap; one label serves both
            let x = center.x + (radius - layout.label_inset_x - layout.major_tick_length - label_height / 2.0);
            frame.text(
                Point2D::new(x - width / 2.0, center.y - 1.0 - label_height / 2.0),
                text,
                FontSize::Large,
                Color::WHITE,
            );
        } else if i != -steps {
            let anchor = vsi_label_center(ctx, fpm);
            frame.text(
                Point2D::new(anchor.x - width / 2.0, anchor.y - label_height / 2.0),
                text,
                FontSize::Large,
                Color::WHITE,
            );
        }
    }

    ctx.error_message(frame, 30.0, error, FontSize::Large);

    let angle = vsi_needle_angle(ctx, vertical_speed);
    frame.line(
        vec![
            center + polar_offset(angle, radius - layout.minor_tick_length - 3.0),
            center,
        ],
        Style::stroke(Color::WHITE, 1.0),
    );
    frame.line(
        vec![
            center + polar_offset(angle, radius - layout.major_tick_length - 3.0),
            center - polar_offset(angle, layout.needle_tail),
        ],
        Style::stroke(Color::WHITE, 5.0),
    );
    frame.ellipse(
        BBox::around(center, layout.hub_radius),
        Style::filled(Color::BLACK, Color::WHITE, 2.0),
    );
}
