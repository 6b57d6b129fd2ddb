// ============================================================================
// TRAFFIC OVERLAY
// ============================================================================

use bon::Builder;

use crate::color::Color;
use crate::context::RenderContext;
use crate::geometry::{
    clamp_to_domain, normalize_degrees, polar_offset, EastZeroClockwise, NorthZeroClockwise,
    Point2D,
};
use crate::surface::{BBox, InstrumentFrame, Style};
use crate::text::FontSize;

/// A contact with a known bearing and distance.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Contact {
    /// Pixel offset from the radar centre, before calibration.
    pub offset: Point2D,
    /// Track in degrees clockwise from up.
    pub direction: f64,
    /// Altitude relative to own ship, in feet or hundreds as the caller prefers.
    pub relative_altitude: i64,
    pub vertical_speed: f64,
    /// Length of the speed vector in pixels.
    #[builder(default)]
    pub speed_length: f64,
    #[builder(into)]
    pub tail: Option<String>,
}

/// A contact with altitude but no position, shown as a range ring.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct ModeSContact {
    /// Estimated range in pixels.
    pub radius: f64,
    pub relative_altitude: i64,
    pub vertical_speed: f64,
    /// East-zero angle at which the label orbits the ring this frame.
    #[builder(default)]
    pub arc_position: f64,
    #[builder(into)]
    pub tail: Option<String>,
}

/// Signed altitude with a climb or descent arrow.
pub fn altitude_label(relative_altitude: i64, vertical_speed: f64) -> String {
    let sign = if relative_altitude >= 0 { '+' } else { '-' };
    with_trend(sign, relative_altitude, vertical_speed)
}

/// Same as [`altitude_label`], but co-altitude Mode-S traffic reads `-0`.
pub fn mode_s_altitude_label(relative_altitude: i64, vertical_speed: f64) -> String {
    let sign = if relative_altitude > 0 { '+' } else { '-' };
    with_trend(sign, relative_altitude, vertical_speed)
}

fn with_trend(sign: char, relative_altitude: i64, vertical_speed: f64) -> String {
    let mut label = format!("{sign}{}", relative_altitude.unsigned_abs());
    if vertical_speed > 0.0 {
        label.push('\u{2191}');
    } else if vertical_speed < 0.0 {
        label.push('\u{2193}');
    }
    label
}

/// Orbital angle for a Mode-S label on the next frame. Stepping by a fixed
/// odd fraction of the circle spreads a few stacked labels apart; it does
/// not detect collisions.
pub fn next_arc_position(ctx: &RenderContext, current: f64) -> f64 {
    normalize_degrees(current + ctx.layout.radar.declutter_step)
}

/// Top-left corner of a contact's altitude label. The label goes right of
/// the glyph unless it would run off the screen, then it flips left.
pub fn label_anchor(ctx: &RenderContext, glyph: Point2D, label_width: f64) -> Point2D {
    let glyph_offset = 4.0 * ctx.layout.radar.aircraft_size;
    let top = (glyph.y - FontSize::Large.pixels() / 2.0).trunc();
    if label_width + glyph.x + glyph_offset - 2.0 > ctx.screen.width {
        Point2D::new(glyph.x - glyph_offset - label_width, top)
    } else {
        Point2D::new(glyph.x + glyph_offset + 1.0, top)
    }
}

/// Ring radius actually drawn for a Mode-S range estimate.
pub fn mode_s_radius(ctx: &RenderContext, radius: f64) -> f64 {
    let layout = &ctx.layout.radar;
    clamp_to_domain(radius, layout.min_ring_radius, layout.max_ring_radius)
}

/// Arrow glyph on the contact's track, speed vector and altitude label.
pub fn render_aircraft(ctx: &RenderContext, frame: &mut InstrumentFrame, contact: &Contact) {
    let layout = &ctx.layout.radar;
    let position = ctx.screen.center
        + Point2D::new(
            contact.offset.x * layout.position_correction,
            contact.offset.y * layout.position_correction,
        );
    let heading = NorthZeroClockwise(contact.direction);
    let along = |turn: f64, length: f64| {
        position + polar_offset(NorthZeroClockwise(heading.degrees() + turn), length)
    };

    let size = layout.aircraft_size;
    let nose = along(0.0, 2.0 * size);
    frame.polygon(
        vec![
            nose,
            along(150.0, 4.0 * size),
            along(180.0, 2.0 * size),
            along(210.0, 4.0 * size),
        ],
        Style::filled(layout.contact_color, Color::WHITE, 1.0),
    );
    frame.line(
        vec![nose, along(0.0, contact.speed_length)],
        Style::stroke(Color::WHITE, 1.0),
    );

    let label = altitude_label(contact.relative_altitude, contact.vertical_speed);
    let width = ctx.text_width(&label, FontSize::Large);
    let anchor = label_anchor(ctx, position, width);
    label_with_background(frame, anchor, width, label, FontSize::Large, Color::WHITE);
    if let Some(tail) = &contact.tail {
        let tail_width = ctx.text_width(tail, FontSize::VerySmall);
        label_with_background(
            frame,
            anchor.offset(0.0, FontSize::Large.pixels()),
            tail_width,
            tail.clone(),
            FontSize::VerySmall,
            Color::WHITE,
        );
    }
}

/// Range ring around own ship with the altitude label riding on it.
pub fn render_mode_s(ctx: &RenderContext, frame: &mut InstrumentFrame, contact: &ModeSContact) {
    let layout = &ctx.layout.radar;
    let center = ctx.screen.center;
    let radius = mode_s_radius(ctx, contact.radius);
    if radius != contact.radius {
        log::trace!("mode-s ring {} clamped to {radius}", contact.radius);
    }
    frame.ellipse(
        BBox::around(center, radius),
        Style::stroke(layout.mode_s_color, layout.ring_width),
    );

    let label = mode_s_altitude_label(contact.relative_altitude, contact.vertical_speed);
    let width = ctx.text_width(&label, FontSize::Large);
    let on_ring = center + polar_offset(EastZeroClockwise(contact.arc_position), radius);
    let anchor = Point2D::new(
        on_ring.x - width / 2.0,
        on_ring.y - FontSize::Large.pixels() / 2.0,
    );
    label_with_background(frame, anchor, width, label, FontSize::Large, layout.mode_s_color);

    if let Some(tail) = &contact.tail {
        let tail_anchor = anchor.offset(0.0, FontSize::Large.pixels());
        let tail_width = ctx.text_width(tail, FontSize::VerySmall);
        label_with_background(
            frame,
            tail_anchor,
            tail_width,
            tail.clone(),
            FontSize::VerySmall,
            Color::WHITE,
        );
    }
}

fn label_with_background(
    frame: &mut InstrumentFrame,
    anchor: Point2D,
    width: f64,
    text: String,
    font: FontSize,
    color: Color,
) {
    frame.rectangle(
        BBox::new(anchor.x, anchor.y, anchor.x + width, anchor.y + font.pixels()),
        Style::fill(Color::BLACK),
    );
    frame.text(anchor, text, font, color);
}

// ============================================================================
// SITUATION BACKGROUND
// ============================================================================

/// Receiver and own-ship state shown around the radar picture.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Situation {
    #[builder(default = true)]
    pub connected: bool,
    #[builder(default = true)]
    pub gps_connected: bool,
    /// Own pressure altitude in feet.
    pub own_altitude: f64,
    pub course: i32,
    /// Display range in nautical miles.
    pub range: u32,
    /// Half height of the altitude window in feet.
    pub altitude_difference: u32,
    #[builder(default)]
    pub bluetooth_devices: u32,
    #[builder(default)]
    pub sound_active: bool,
    #[builder(default)]
    pub external_sound: bool,
    #[builder(default)]
    pub ground_mode: bool,
    #[builder(default)]
    pub co_alarm_level: u8,
    #[builder(into)]
    pub co_alarm_text: Option<String>,
}

/// Altitude window readout, thousands shortened to `k` from 10000 up.
pub fn altitude_window_label(altitude_difference: u32) -> String {
    if altitude_difference >= 10_000 {
        format!("{}k", altitude_difference / 1000)
    } else {
        altitude_difference.to_string()
    }
}

/// Glyph and colour of the sound status icon, if one is shown.
pub fn sound_icon(situation: &Situation) -> Option<(&'static str, Color)> {
    let bluetooth = situation.bluetooth_devices > 0;
    if !situation.external_sound && !bluetooth {
        return None;
    }
    if !situation.sound_active {
        return Some(("\u{f1f6}", Color::RED));
    }
    if situation.external_sound {
        let color = if bluetooth { Color::BLUE } else { Color::ORANGE };
        Some(("\u{f028}", color))
    } else {
        Some(("\u{f293}", Color::BLUE))
    }
}

/// Range rings, own flight level, range, altitude window, course, sound
/// status and warnings. Contacts are drawn on top by the caller.
pub fn render_situation(ctx: &RenderContext, frame: &mut InstrumentFrame, situation: &Situation) {
    let screen = ctx.screen;
    let center = screen.center;
    let ring = screen.height;
    let small = FontSize::Small.pixels();
    let ink = Color::FLORAL_WHITE;

    frame.ellipse(
        BBox::new(
            center.x - ring / 2.0,
            1.0 + center.y - ring / 2.0,
            center.x + ring / 2.0,
            center.y + ring / 2.0,
        ),
        Style::stroke(ink, 1.0),
    );
    frame.ellipse(BBox::around(center, ring / 4.0), Style::stroke(ink, 1.0));
    frame.ellipse(BBox::around(center, 2.0), Style::stroke(ink, 1.0));

    let flight_level = format!("FL{}", (situation.own_altitude / 100.0).round() as i64);
    frame.text(Point2D::new(0.0, screen.height - small), flight_level, FontSize::Small, ink);
    frame.text(Point2D::default(), situation.range.to_string(), FontSize::Small, ink);
    frame.text(Point2D::new(0.0, small), "nm", FontSize::VerySmall, ink);

    ctx.right_text(frame, 0.0, &altitude_window_label(situation.altitude_difference), FontSize::Small, ink);
    ctx.right_text(frame, small, "ft", FontSize::VerySmall, ink);
    ctx.right_text(
        frame,
        screen.height - small,
        &format!("{}°", situation.course),
        FontSize::Small,
        ink,
    );

    if let Some((icon, color)) = sound_icon(situation) {
        ctx.right_text(frame, screen.height - 2.0 * small, icon, FontSize::Icon, color);
    }

    if !situation.gps_connected {
        ctx.centered_text(frame, 0.0, "No GPS", FontSize::Small, Color::RED);
    }
    if !situation.connected {
        ctx.centered_text(frame, center.y, "No Connection!", FontSize::Small, Color::RED);
    }
    if situation.co_alarm_level > 0 {
        ctx.centered_text(frame, screen.height - 3.0 * small, "CO Alarm!", FontSize::Small, Color::RED);
        if let Some(text) = &situation.co_alarm_text {
            ctx.centered_text(frame, screen.height - 2.0 * small, text, FontSize::Small, Color::RED);
        }
    }
    if situation.ground_mode {
        ctx.centered_text(frame, screen.height - small, "Ground mode", FontSize::Small, Color::RED);
    }
}
