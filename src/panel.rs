//! Text panels: capacity bars, rounded labels, time-series graphs and the
//! status, flight-log, CO, distance, timer and message screens built from
//! them.

use bon::Builder;
use chrono::{DateTime, Duration, Timelike, Utc};

use crate::color::Color;
use crate::context::RenderContext;
use crate::geometry::{clamp_to_domain, Point2D};
use crate::surface::{BBox, InstrumentFrame, Style};
use crate::text::{format_number, FontSize};

// ============================================================================
// BARS & LABELS
// ============================================================================

/// One horizontal capacity bar with its label and full-scale value.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct Bar {
    #[builder(into)]
    pub label: String,
    pub value: f64,
    pub max: f64,
    pub yellow: f64,
    /// Zero disables threshold colouring.
    pub red: f64,
    #[builder(into, default)]
    pub unit: String,
    /// Shown instead of the value, e.g. when the value was floored.
    #[builder(into)]
    pub value_text: Option<String>,
    #[builder(default)]
    pub min_value: f64,
}

/// Fill colour for `value` against the warning thresholds.
pub fn bar_color(value: f64, yellow: f64, red: f64) -> Color {
    if red == 0.0 {
        Color::DIM_GRAY
    } else if value >= red {
        Color::RED
    } else if value >= yellow {
        Color::DARK_ORANGE
    } else {
        Color::GREEN
    }
}

/// Right edge of the filled part. Saturates at the bar end; an empty scale
/// fills nothing.
pub fn bar_fill_end(ctx: &RenderContext, value: f64, max: f64) -> f64 {
    let layout = &ctx.layout.panel;
    if max == 0.0 {
        return layout.bar_start;
    }
    let end = layout.bar_start + (layout.bar_end - layout.bar_start) * value / max;
    clamp_to_domain(end, layout.bar_start, layout.bar_end)
}

impl Bar {
    /// Draws the bar with its top at `y` and returns the top of the next row.
    pub fn render(&self, ctx: &RenderContext, frame: &mut InstrumentFrame, y: f64) -> f64 {
        let layout = &ctx.layout.panel;
        let font = FontSize::VerySmall;
        let height = font.pixels();

        frame.text(Point2D::new(0.0, y), self.label.as_str(), font, Color::WHITE);
        let full_scale = format!("{}{}", self.max.trunc() as i64, self.unit);
        ctx.right_text(frame, y, &full_scale, font, Color::WHITE);
        frame.rounded_rectangle(
            BBox::new(layout.bar_start - 2.0, y - 2.0, layout.bar_end + 2.0, y + height + 2.0),
            layout.bar_corner_radius,
            Style::stroke(Color::WHITE, 1.0),
        );

        let color = bar_color(self.value, self.yellow, self.red);
        let value = self.value.max(self.min_value);
        frame.rectangle(
            BBox::new(layout.bar_start, y, bar_fill_end(ctx, value, self.max), y + height),
            Style::fill(color),
        );

        let text = self
            .value_text
            .clone()
            .unwrap_or_else(|| format_number(value));
        let width = ctx.text_width(&text, font);
        let middle = layout.bar_start + (layout.bar_end - layout.bar_start) / 2.0;
        frame.text(Point2D::new(middle - width / 2.0, y), text, font, Color::WHITE);

        y + height + layout.bar_gap
    }
}

/// Text on a filled pill. Returns the x where the next pill may start.
pub fn round_text(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    x: f64,
    y: f64,
    text: &str,
    color: Color,
) -> f64 {
    let font = FontSize::VerySmall;
    let width = ctx.text_width(text, font);
    frame.rounded_rectangle(
        BBox::new(x - 2.0, y - 1.0, x + width + 2.0, y + font.pixels() + 1.0),
        4.0,
        Style::fill(color),
    );
    frame.text(Point2D::new(x, y), text, font, Color::WHITE);
    x + width + 5.0
}

/// Label/value rows, values flush with the right edge of the `width` wide
/// column. Returns the y below the last row.
pub fn dashboard(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    x: f64,
    y: f64,
    width: f64,
    lines: &[(&str, String)],
) -> f64 {
    let font = FontSize::Small;
    let mut y = y;
    for (label, value) in lines {
        frame.text(Point2D::new(x, y), *label, font, Color::WHITE);
        let value_width = ctx.text_width(value, font);
        frame.text(Point2D::new(x + width - value_width, y), value.as_str(), font, Color::WHITE);
        y += font.pixels() + 2.0;
    }
    y
}

// ============================================================================
// TIME-SERIES GRAPH
// ============================================================================

/// Where and how a sample series is plotted.
#[derive(Debug, Clone, Copy, PartialEq, Builder)]
pub struct GraphSpec {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub min: f64,
    pub max: f64,
    /// Dashed guide lines, typically warning and alarm levels.
    pub thresholds: (f64, f64),
    /// Seconds between two samples.
    pub sample_interval: f64,
}

/// The plot box left after making room for the axis labels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub min: f64,
    pub max: f64,
}

impl PlotArea {
    pub fn new(ctx: &RenderContext, spec: &GraphSpec) -> Self {
        let space = ctx.layout.panel.graph_label_space;
        let label_width = ctx.text_width(&format_number(spec.max), FontSize::VerySmall);
        let label_height = FontSize::VerySmall.pixels();
        Self {
            x: spec.x + label_width + space,
            y: spec.y + label_height / 2.0,
            width: spec.width - label_width - space,
            height: spec.height - label_height,
            min: spec.min,
            max: spec.max,
        }
    }

    fn fraction(&self, value: f64) -> f64 {
        let span = self.max - self.min;
        if span == 0.0 {
            0.0
        } else {
            (value - self.min) / span
        }
    }

    /// Pixel row of a sample. Out-of-range samples stick to the box edge.
    pub fn sample_y(&self, value: f64) -> f64 {
        let y = self.y - 1.0 + self.height - self.height * self.fraction(value);
        clamp_to_domain(y, self.y, self.y + self.height - 1.0)
    }

    /// Pixel row of a guide line.
    pub fn level_y(&self, value: f64) -> f64 {
        self.y + self.height - self.height * self.fraction(value)
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height - 1.0
    }
}

/// Plots `samples` (oldest first, evenly spaced) with labelled guide lines
/// and time-of-day ticks ending at `now`.
pub fn graph(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    spec: &GraphSpec,
    samples: &[f64],
    now: DateTime<Utc>,
) {
    let layout = &ctx.layout.panel;
    let font = FontSize::VerySmall;
    let label_height = font.pixels();
    let area = PlotArea::new(ctx, spec);

    let mut scale_label = |value: f64, y: f64| {
        let text = format_number(value);
        let width = ctx.text_width(&text, font);
        frame.text(
            Point2D::new(area.x - width - layout.graph_label_space, y),
            text,
            font,
            Color::WHITE,
        );
    };
    scale_label(spec.min, area.bottom() - label_height);
    scale_label(spec.thresholds.0, area.level_y(spec.thresholds.0) - label_height / 2.0);
    scale_label(spec.thresholds.1, area.level_y(spec.thresholds.1) - label_height / 2.0);
    scale_label(spec.max, area.y - label_height / 2.0);

    frame.rectangle(
        BBox::new(area.x, area.y, area.x + area.width - 1.0, area.bottom()),
        Style::filled(Color::BLACK, Color::WHITE, 1.0),
    );

    time_ticks(ctx, frame, &area, spec.sample_interval * samples.len() as f64, now);

    if samples.len() >= 2 {
        let step = area.width / (samples.len() - 1) as f64;
        let points: Vec<Point2D> = samples
            .iter()
            .enumerate()
            .map(|(i, value)| Point2D::new(area.x + i as f64 * step, area.sample_y(*value)))
            .collect();
        frame.line(points, Style::stroke(Color::CYAN, 2.0));
    }

    for level in [spec.thresholds.0, spec.thresholds.1] {
        let y = area.level_y(level);
        let mut x = area.x;
        while x < area.x + area.width {
            frame.line(
                vec![Point2D::new(x, y), Point2D::new(x + layout.dash_length, y)],
                Style::stroke(Color::WHITE, 1.0),
            );
            x += layout.dash_period as f64;
        }
    }
}

/// As many `HH:MM` ticks along the bottom edge as fit without overlapping.
fn time_ticks(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    area: &PlotArea,
    full_time: f64,
    now: DateTime<Utc>,
) {
    let layout = &ctx.layout.panel;
    let font = FontSize::VerySmall;
    let label_width = ctx.text_width(&now.format("%H:%M").to_string(), font).max(1.0);
    let count = (area.width / label_width / 2.0).floor() as i64 + 1;
    let seconds_per_tick = full_time / count as f64;
    let spacing = ((area.width - 1.0) / count as f64).floor();

    let bottom = area.bottom();
    for i in 0..=count {
        let x = area.x + i as f64 * spacing;
        frame.line(
            vec![
                Point2D::new(x, bottom - layout.graph_tick_above),
                Point2D::new(x, bottom + layout.graph_tick_below),
            ],
            Style::stroke(Color::WHITE, 1.0),
        );
        let back = Duration::seconds(((count - i) as f64 * seconds_per_tick).floor() as i64);
        frame.text(
            Point2D::new(x - label_width / 2.0, bottom + 1.0),
            (now - back).format("%H:%M").to_string(),
            font,
            Color::WHITE,
        );
    }
}

// ============================================================================
// STATUS SCREEN
// ============================================================================

/// Message counters of one receiver.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ReceiverStats {
    pub messages_last_minute: f64,
    pub messages_max: f64,
}

/// OGN receiver counters plus its noise floor.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OgnStats {
    pub receiver: ReceiverStats,
    pub noise_db: f64,
    pub gain_db: f64,
}

/// Receiver health as reported by the traffic receiver.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct StatusReport {
    #[builder(into)]
    pub version: String,
    pub es: ReceiverStats,
    pub ogn: Option<OgnStats>,
    pub uat: Option<ReceiverStats>,
    /// Current and session maximum CPU temperature in °C.
    pub cpu_temperature: Option<(f64, f64)>,
    #[builder(default)]
    pub gps_quality: u8,
    #[builder(default)]
    pub satellites_locked: u32,
    #[builder(default)]
    pub satellites_seen: u32,
    #[builder(default)]
    pub satellites_tracked: u32,
    /// Horizontal accuracy in metres, `None` without a fix.
    pub position_accuracy: Option<f64>,
    #[builder(default)]
    pub imu_connected: bool,
    #[builder(default)]
    pub bmp_connected: bool,
}

fn one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Receiver bars, GPS satellites and sensor pills.
pub fn render_status(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    report: &StatusReport,
    altitude: f64,
    gps_altitude: f64,
) {
    let font = FontSize::VerySmall;
    let row = font.pixels();
    ctx.centered_text(frame, 0.0, &format!("Stratux {}", report.version), FontSize::Small, Color::YELLOW);
    let mut y = FontSize::Small.pixels() + 8.0;

    let counter = |label: &str, stats: &ReceiverStats| {
        Bar::builder()
            .label(label)
            .value(stats.messages_last_minute)
            .max(stats.messages_max)
            .yellow(0.0)
            .red(0.0)
            .build()
    };
    y = counter("1090", &report.es).render(ctx, frame, y);
    if let Some(ogn) = &report.ogn {
        y = counter("OGN", &ogn.receiver).render(ctx, frame, y);
        let noise = format!(
            "{}@{}dB",
            format_number(one_decimal(ogn.noise_db)),
            format_number(one_decimal(ogn.gain_db))
        );
        y = Bar::builder()
            .label("noise")
            .value(ogn.noise_db)
            .max(25.0)
            .yellow(12.0)
            .red(18.0)
            .unit("dB")
            .min_value(1.0)
            .value_text(noise)
            .build()
            .render(ctx, frame, y);
    }
    if let Some(uat) = &report.uat {
        y = counter("UAT", uat).render(ctx, frame, y);
    }
    y += 6.0;
    if let Some((temperature, max)) = report.cpu_temperature {
        y = Bar::builder()
            .label("temp")
            .value(one_decimal(temperature))
            .max(max.round())
            .yellow(70.0)
            .red(80.0)
            .unit("°C")
            .build()
            .render(ctx, frame, y);
        y += 3.0;
    }

    let fix = match report.gps_quality {
        1 => "3D GPS",
        2 => "DGNSS",
        _ => "GPS",
    };
    frame.text(Point2D::new(0.0, y), fix, font, Color::WHITE);
    let satellites = [
        (35.0, Color::GREEN, report.satellites_locked),
        (55.0, Color::DARK_ORANGE, report.satellites_seen),
        (75.0, Color::RED, report.satellites_tracked),
    ];
    for (left, color, count) in satellites {
        frame.rounded_rectangle(BBox::new(left, y, left + 20.0, y + row), 4.0, Style::fill(color));
        let text = count.to_string();
        let width = ctx.text_width(&text, font);
        frame.text(Point2D::new(left + 12.0 - width / 2.0, y), text, font, Color::WHITE);
    }
    let accuracy = match report.position_accuracy {
        Some(metres) => format!("{}m", format_number(one_decimal(metres))),
        None => "NoFix".to_string(),
    };
    ctx.right_text(frame, y, &accuracy, font, Color::WHITE);
    y += row + 5.0;

    let flight_level = format!("FL{:3.0}", altitude.round() / 100.0);
    let mut x = round_text(ctx, frame, 3.0, y, &flight_level, Color::DARK_BLUE);
    let gps_altitude = match report.position_accuracy {
        Some(_) => format!("{gps_altitude:5.0}"),
        None => " --- ".to_string(),
    };
    x = round_text(ctx, frame, x, y, &format!("Alt{gps_altitude}ft"), Color::DIM_GRAY);
    let sensor = |ok: bool| if ok { Color::GREEN } else { Color::RED };
    x = round_text(ctx, frame, x, y, "IMU", sensor(report.imu_connected));
    round_text(ctx, frame, x, y, "BMP", sensor(report.bmp_connected));
}

// ============================================================================
// FLIGHT LOGS
// ============================================================================

/// One logged flight. `landing` is `None` while still airborne.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlightRecord {
    pub takeoff: DateTime<Utc>,
    pub landing: Option<DateTime<Utc>>,
}

impl FlightRecord {
    /// Flight time as `HH:MM`, counted up to `now` while airborne.
    pub fn duration_label(&self, now: DateTime<Utc>) -> String {
        let end = self.landing.unwrap_or(now);
        let minutes = (end - self.takeoff).num_minutes().max(0);
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }
}

/// Most recent flights, newest first as supplied, up to the configured row
/// count.
pub fn render_flight_logs(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    flights: &[FlightRecord],
    now: DateTime<Utc>,
) {
    let font = FontSize::VerySmall;
    ctx.centered_text(frame, 0.0, "Flight Logs", FontSize::Small, Color::YELLOW);
    let mut y = FontSize::Small.pixels() + 8.0;
    for (x, heading) in [(15.0, "Date"), (100.0, "Start"), (160.0, "Dur"), (220.0, "Ldg")] {
        frame.text(Point2D::new(x, y), heading, font, Color::WHITE);
    }
    y += font.pixels() + 8.0;

    for flight in flights.iter().take(ctx.layout.panel.flight_log_rows) {
        let takeoff = flight.takeoff;
        frame.text(Point2D::new(15.0, y), takeoff.format("%d.%m.").to_string(), font, Color::GREEN);
        frame.text(Point2D::new(100.0, y), takeoff.format("%H:%M").to_string(), font, Color::WHITE);
        match flight.landing {
            Some(landing) => frame.text(
                Point2D::new(220.0, y),
                landing.format("%H:%M").to_string(),
                font,
                Color::WHITE,
            ),
            None => frame.text(Point2D::new(220.0, y), "in air", font, Color::RED),
        }
        round_text(ctx, frame, 160.0, y, &flight.duration_label(now), Color::DARK_BLUE);
        y += font.pixels() + 1.0;
    }
}

// ============================================================================
// CO WARNER
// ============================================================================

/// Carbon monoxide sensor history and alarm state.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct CoStatus {
    /// Readings in ppm, oldest first.
    #[builder(default)]
    pub values: Vec<u32>,
    pub max: u32,
    /// Seconds between two readings.
    pub sample_interval: f64,
    #[builder(default)]
    pub alarm_level: u8,
    #[builder(default)]
    pub alarm_ppm: u32,
    /// Seconds the alarm concentration has been exceeded.
    #[builder(default)]
    pub alarm_period: f64,
}

const CO_WARNING_PPM: u32 = 50;

impl CoStatus {
    /// Headline text and colour.
    pub fn headline(&self) -> (String, Color) {
        if self.alarm_level == 0 {
            return ("CO: No CO alarm".to_string(), Color::YELLOW);
        }
        let text = if self.alarm_period > 60.0 {
            format!("CO: {}ppm>{}min", self.alarm_ppm, (self.alarm_period / 60.0).floor())
        } else {
            format!("CO: {}ppm>{} sec", self.alarm_ppm, self.alarm_period.floor())
        };
        (text, Color::RED)
    }
}

fn co_color(ppm: u32) -> Color {
    if ppm < CO_WARNING_PPM {
        Color::GREEN
    } else {
        Color::RED
    }
}

/// Alarm headline, 0..120 ppm history with 50/100 ppm guides, current and
/// maximum readings.
pub fn render_co_warner(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    status: &CoStatus,
    now: DateTime<Utc>,
) {
    let screen = ctx.screen;
    let small = FontSize::Small.pixels();
    let (headline, color) = status.headline();
    ctx.centered_text(frame, 0.0, &headline, FontSize::Small, color);

    let spec = GraphSpec::builder()
        .x(0.0)
        .y(small + 5.0)
        .width(screen.width - 12.0)
        .height(screen.height - 55.0)
        .min(0.0)
        .max(120.0)
        .thresholds((CO_WARNING_PPM as f64, 100.0))
        .sample_interval(status.sample_interval)
        .build();
    let samples: Vec<f64> = status.values.iter().map(|v| *v as f64).collect();
    graph(ctx, frame, &spec, &samples, now);

    let y = screen.height - 2.0 * small - 5.0;
    if let Some(&current) = status.values.last() {
        round_text(ctx, frame, 5.0, y, &format!("CO act: {current:3}"), co_color(current));
    }
    round_text(
        ctx,
        frame,
        screen.width / 2.0 + 5.0,
        y,
        &format!("CO max: {:3}", status.max),
        co_color(status.max),
    );
    ctx.soft_keys(frame, screen.height - small, "Cal", "Mode", "Reset");
}

// ============================================================================
// DISTANCE SCREEN
// ============================================================================

/// GPS and barometric readings for the take-off distance screen. Absent
/// values print as `---`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Builder)]
pub struct DistanceReport {
    /// Metres since the measurement started.
    pub distance: Option<f64>,
    /// Ground speed in knots.
    pub speed: Option<f64>,
    /// Barometric vertical speed in ft/min; `None` without a barometer.
    pub vertical_speed: Option<f64>,
    /// Barometric height above the take-off point in feet.
    pub takeoff_difference: Option<f64>,
    /// Ground sensor distance in millimetres.
    pub ground_distance: Option<f64>,
}

/// `HH:MM:SS,t` with tenths of a second.
pub fn clock_with_tenths(time: DateTime<Utc>) -> String {
    format!(
        "{:02}:{:02}:{:02},{}",
        time.hour(),
        time.minute(),
        time.second(),
        time.timestamp_subsec_millis() / 100
    )
}

pub fn render_distance(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    now: DateTime<Utc>,
    report: &DistanceReport,
    error: Option<&str>,
) {
    let screen = ctx.screen;
    let small = FontSize::Small.pixels();
    let missing = || "---".to_string();
    ctx.centered_text(frame, 0.0, "GPS-Distance", FontSize::Small, Color::YELLOW);

    let lines = [
        ("UTC", clock_with_tenths(now)),
        ("GPS-Dist[m]", report.distance.map_or_else(missing, |d| format!("{d:4.0}"))),
        ("GPS-Spd[kts]", report.speed.map_or_else(missing, |s| format!("{s:3.1}"))),
    ];
    let mut y = dashboard(ctx, frame, 0.0, small + 2.0, screen.width, &lines);
    if let Some(vertical_speed) = report.vertical_speed {
        let lines = [
            ("VSpeed [ft]", format!("{vertical_speed:+4.0}")),
            (
                "BaDif tof [ft]",
                report
                    .takeoff_difference
                    .map_or_else(missing, |d| format!("{d:+5.1}")),
            ),
        ];
        y = dashboard(ctx, frame, 0.0, y, screen.width, &lines);
    }
    if let Some(ground) = report.ground_distance {
        let lines = [("GrdDist [cm]", format!("{:+3.1}", ground / 10.0))];
        dashboard(ctx, frame, 0.0, y, screen.width, &lines);
    }

    ctx.error_message(frame, 80.0, error, FontSize::VeryLarge);
    ctx.soft_keys(frame, screen.height - small, "Stats", "Mode", "Start");
}

// ============================================================================
// TAKE-OFF / LANDING STATISTICS
// ============================================================================

/// Results of the last measured take-off and landing. Absent values print
/// as `---`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Builder)]
pub struct LandingStatistics {
    pub takeoff_time: Option<DateTime<Utc>>,
    /// Ground roll in metres.
    pub takeoff_distance: Option<f64>,
    /// Distance until clearing a 15 m obstacle, in metres.
    pub takeoff_obstacle_distance: Option<f64>,
    pub landing_time: Option<DateTime<Utc>>,
    pub landing_distance: Option<f64>,
    pub landing_obstacle_distance: Option<f64>,
}

fn metres(value: Option<f64>) -> String {
    value.map_or_else(|| "---".to_string(), |v| format!("{v:3.1}"))
}

fn clock(time: Option<DateTime<Utc>>) -> String {
    time.map_or_else(|| "---".to_string(), clock_with_tenths)
}

pub fn render_distance_statistics(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    stats: &LandingStatistics,
) {
    let screen = ctx.screen;
    let small = FontSize::Small.pixels();
    ctx.centered_text(frame, 0.0, "Start-/Landing", FontSize::Small, Color::YELLOW);

    let takeoff = [
        ("t-off time", clock(stats.takeoff_time)),
        ("t-off dist [m]", metres(stats.takeoff_distance)),
        ("obst dist [m]", metres(stats.takeoff_obstacle_distance)),
    ];
    let y = dashboard(ctx, frame, 0.0, small + 2.0, screen.width, &takeoff);
    let landing = [
        ("ldg time", clock(stats.landing_time)),
        ("ldg dist [m]", metres(stats.landing_distance)),
        ("obst dist [m]", metres(stats.landing_obstacle_distance)),
    ];
    dashboard(ctx, frame, 0.0, y, screen.width, &landing);

    let keys_y = screen.height - small - ctx.layout.panel.soft_key_inset;
    ctx.centered_text(frame, keys_y, "Back", FontSize::Small, Color::GREEN);
}

// ============================================================================
// STOPWATCH
// ============================================================================

/// What the lower timer row is counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LapMode {
    #[default]
    Laptimer,
    Countdown,
}

impl LapMode {
    pub fn heading(self) -> &'static str {
        match self {
            LapMode::Laptimer => "Laptimer",
            LapMode::Countdown => "Countdown",
        }
    }

    fn color(self) -> Color {
        match self {
            LapMode::Laptimer => Color::POWDER_BLUE,
            LapMode::Countdown => Color::MAGENTA,
        }
    }
}

/// Clock, stopwatch and lap time, already formatted by the caller.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct TimerReport {
    #[builder(into)]
    pub stop_time: String,
    #[builder(into)]
    pub lap_time: String,
    #[builder(default)]
    pub lap_mode: LapMode,
    pub running: bool,
    #[builder(into, default)]
    pub left_key: String,
    #[builder(into, default)]
    pub middle_key: String,
    #[builder(into, default)]
    pub right_key: String,
}

pub fn render_timer(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    now: DateTime<Utc>,
    report: &TimerReport,
) {
    let small = FontSize::Small.pixels();
    let large = FontSize::VeryLarge.pixels();
    let heading = |frame: &mut InstrumentFrame, y: f64, text: &str| {
        frame.text(Point2D::new(0.0, y), text, FontSize::Small, Color::CYAN);
    };

    heading(frame, 0.0, "UTC");
    let utc = now.format("%H:%M:%S").to_string();
    ctx.centered_text(frame, small, &utc, FontSize::VeryLarge, Color::YELLOW);

    heading(frame, small + large, "Timer");
    let stop_color = if report.running {
        Color::LAVENDER
    } else {
        Color::ORANGE_RED
    };
    ctx.centered_text(frame, 2.0 * small + large, &report.stop_time, FontSize::VeryLarge, stop_color);

    heading(frame, 2.0 * (small + large), report.lap_mode.heading());
    ctx.centered_text(
        frame,
        3.0 * small + 2.0 * large,
        &report.lap_time,
        FontSize::VeryLarge,
        report.lap_mode.color(),
    );

    let keys_y = ctx.screen.height - small - ctx.layout.panel.soft_key_inset;
    ctx.soft_keys(frame, keys_y, &report.left_key, &report.middle_key, &report.right_key);
}

// ============================================================================
// SHUTDOWN & MESSAGES
// ============================================================================

/// What happens when the shutdown countdown runs out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownMode {
    /// Receiver and display both power off.
    All,
    DisplayOnly,
    Reboot,
}

impl ShutdownMode {
    pub fn message(self) -> &'static str {
        match self {
            ShutdownMode::All => "Shutdown all",
            ShutdownMode::DisplayOnly => "Shtdwn displ",
            ShutdownMode::Reboot => "Reboot",
        }
    }
}

pub fn render_shutdown(
    ctx: &RenderContext,
    frame: &mut InstrumentFrame,
    countdown: u32,
    mode: ShutdownMode,
) {
    ctx.centered_text(frame, 10.0, mode.message(), FontSize::Large, Color::WHITE);
    let remaining = format!("in {countdown} seconds!");
    ctx.centered_text(frame, 30.0, &remaining, FontSize::Large, Color::WHITE);
    for (y, hint) in [
        (60.0, "Left to cancel ..."),
        (75.0, "Middle display only ..."),
        (90.0, "Right for reboot all ..."),
    ] {
        ctx.centered_text(frame, y, hint, FontSize::Small, Color::WHITE);
    }

    let keys_y = ctx.screen.height - FontSize::Small.pixels() - ctx.layout.panel.soft_key_inset;
    ctx.soft_keys(frame, keys_y, "Canc", "Displ", "Rebo");
}

/// Free text page with a headline, an optional subline and soft keys.
#[derive(Debug, Clone, PartialEq, Builder)]
pub struct TextScreen {
    #[builder(into)]
    pub headline: String,
    #[builder(into)]
    pub subline: Option<String>,
    /// Body, one display line per `\n`.
    #[builder(into, default)]
    pub body: String,
    #[builder(into, default)]
    pub left_key: String,
    #[builder(into, default)]
    pub middle_key: String,
    #[builder(into, default)]
    pub right_key: String,
}

pub fn render_text_screen(ctx: &RenderContext, frame: &mut InstrumentFrame, screen: &TextScreen) {
    let large = FontSize::Large.pixels();
    ctx.centered_text(frame, 0.0, &screen.headline, FontSize::Medium, Color::YELLOW);
    let mut y = large;
    if let Some(subline) = &screen.subline {
        ctx.centered_text(frame, large, subline, FontSize::Small, Color::YELLOW);
        y += large;
    }
    for line in screen.body.lines() {
        frame.text(Point2D::new(0.0, y), line, FontSize::Small, Color::WHITE);
        y += FontSize::Small.pixels() + ctx.layout.panel.text_line_spacing;
    }

    let keys_y = ctx.screen.height - FontSize::Small.pixels() - ctx.layout.panel.soft_key_inset;
    ctx.soft_keys(frame, keys_y, &screen.left_key, &screen.middle_key, &screen.right_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ScreenGeometry;
    use crate::surface::DrawCommand;
    use crate::text::test_support::FixedPitch;
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    fn context() -> RenderContext<'static> {
        RenderContext::new(ScreenGeometry::new(320, 240), &FixedPitch)
    }

    fn texts(frame: &InstrumentFrame) -> Vec<String> {
        frame
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn zero_red_threshold_keeps_bar_neutral() {
        let ctx = context();
        let bar = Bar::builder()
            .label("1090")
            .value(150.0)
            .max(100.0)
            .yellow(50.0)
            .red(0.0)
            .build();
        let mut frame = InstrumentFrame::new();
        let next = bar.render(&ctx, &mut frame, 30.0);
        assert_eq!(next, 53.0);

        let fill = frame.commands().iter().find_map(|c| match c {
            DrawCommand::Rectangle { bbox, style } => Some((*bbox, style.fill)),
            _ => None,
        });
        assert_eq!(
            fill,
            Some((BBox::new(60.0, 30.0, 240.0, 48.0), Some(Color::DIM_GRAY)))
        );
    }

    #[test]
    fn bar_colours_follow_thresholds() {
        assert_eq!(bar_color(10.0, 70.0, 80.0), Color::GREEN);
        assert_eq!(bar_color(70.0, 70.0, 80.0), Color::DARK_ORANGE);
        assert_eq!(bar_color(80.0, 70.0, 80.0), Color::RED);
    }

    #[test]
    fn floored_bar_shows_override_text() {
        let ctx = context();
        let bar = Bar::builder()
            .label("noise")
            .value(-4.0)
            .max(25.0)
            .yellow(12.0)
            .red(18.0)
            .min_value(1.0)
            .value_text("-4@48dB")
            .build();
        let mut frame = InstrumentFrame::new();
        bar.render(&ctx, &mut frame, 0.0);
        assert!((bar_fill_end(&ctx, 1.0, 25.0) - 67.2).abs() < 1e-9);
        assert!(texts(&frame).contains(&"-4@48dB".to_string()));
        assert_eq!(bar_fill_end(&ctx, 10.0, 0.0), 60.0);
    }

    #[test]
    fn graph_samples_stay_inside_box() {
        let ctx = context();
        let spec = GraphSpec::builder()
            .x(0.0)
            .y(26.0)
            .width(308.0)
            .height(185.0)
            .min(0.0)
            .max(120.0)
            .thresholds((50.0, 100.0))
            .sample_interval(1.0)
            .build();
        let area = PlotArea::new(&ctx, &spec);
        assert_eq!(area.y, 35.0);
        assert_eq!(area.height, 167.0);
        assert_eq!(area.sample_y(-50.0), area.bottom());
        assert_eq!(area.sample_y(500.0), area.y);
        assert_eq!(area.sample_y(120.0), area.y);
        let middle = area.sample_y(60.0);
        assert!(middle > area.y && middle < area.bottom());
    }

    #[test]
    fn flat_domain_does_not_divide_by_zero() {
        let ctx = context();
        let spec = GraphSpec {
            x: 0.0,
            y: 0.0,
            width: 100.0,
            height: 50.0,
            min: 5.0,
            max: 5.0,
            thresholds: (5.0, 5.0),
            sample_interval: 1.0,
        };
        let area = PlotArea::new(&ctx, &spec);
        assert!(area.sample_y(9.0).is_finite());
    }

    #[test]
    fn graph_ticks_end_at_now() {
        let ctx = context();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        let spec = GraphSpec::builder()
            .x(0.0)
            .y(26.0)
            .width(308.0)
            .height(185.0)
            .min(0.0)
            .max(120.0)
            .thresholds((50.0, 100.0))
            .sample_interval(60.0)
            .build();
        let mut frame = InstrumentFrame::new();
        graph(&ctx, &mut frame, &spec, &[10.0, 60.0, 130.0, 20.0], now);
        let labels = texts(&frame);
        assert_eq!(labels[..4].to_vec(), vec!["0", "50", "100", "120"]);
        assert_eq!(labels.last().map(String::as_str), Some("14:30"));
        assert!(labels.contains(&"14:26".to_string()));
    }

    #[test]
    fn round_text_returns_next_slot() {
        let ctx = context();
        let mut frame = InstrumentFrame::new();
        let next = round_text(&ctx, &mut frame, 3.0, 100.0, "IMU", Color::GREEN);
        assert_eq!(next, 3.0 + 33.0 + 5.0);
    }

    #[test]
    fn airborne_flight_counts_to_now() {
        let takeoff = Utc.with_ymd_and_hms(2024, 6, 1, 10, 5, 0).unwrap();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 11, 50, 30).unwrap();
        let airborne = FlightRecord { takeoff, landing: None };
        assert_eq!(airborne.duration_label(now), "01:45");
        let landed = FlightRecord {
            takeoff,
            landing: Some(Utc.with_ymd_and_hms(2024, 6, 1, 10, 47, 0).unwrap()),
        };
        assert_eq!(landed.duration_label(now), "00:42");

        let ctx = context();
        let mut frame = InstrumentFrame::new();
        render_flight_logs(&ctx, &mut frame, &[landed, airborne], now);
        let labels = texts(&frame);
        assert!(labels.contains(&"in air".to_string()));
        assert!(labels.contains(&"01.06.".to_string()));
    }

    #[test]
    fn co_headline_switches_to_minutes() {
        let status = CoStatus::builder()
            .max(80)
            .sample_interval(5.0)
            .alarm_level(2)
            .alarm_ppm(70)
            .alarm_period(150.0)
            .build();
        assert_eq!(status.headline(), ("CO: 70ppm>2min".to_string(), Color::RED));
        let quiet = CoStatus { alarm_level: 0, ..status };
        assert_eq!(quiet.headline().0, "CO: No CO alarm");
    }

    #[test]
    fn missing_distance_values_print_dashes() {
        let ctx = context();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 3, 7).unwrap();
        let mut frame = InstrumentFrame::new();
        render_distance(&ctx, &mut frame, now, &DistanceReport::default(), None);
        let labels = texts(&frame);
        assert!(labels.contains(&"09:03:07,0".to_string()));
        assert_eq!(labels.iter().filter(|t| *t == "---").count(), 2);
        assert!(!labels.contains(&"VSpeed [ft]".to_string()));
    }

    #[test]
    fn statistics_fill_in_what_was_measured() {
        let ctx = context();
        let stats = LandingStatistics::builder()
            .takeoff_time(Utc.with_ymd_and_hms(2024, 6, 1, 14, 5, 30).unwrap())
            .takeoff_distance(212.46)
            .build();
        let mut frame = InstrumentFrame::new();
        render_distance_statistics(&ctx, &mut frame, &stats);
        let labels = texts(&frame);
        assert!(labels.contains(&"14:05:30,0".to_string()));
        assert!(labels.contains(&"212.5".to_string()));
        assert_eq!(labels.iter().filter(|t| *t == "---").count(), 4);
        assert_eq!(labels.last().map(String::as_str), Some("Back"));
    }

    #[test]
    fn timer_colours_follow_state() {
        let ctx = context();
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 9, 3, 7).unwrap();
        let colour_of = |frame: &InstrumentFrame, wanted: &str| {
            frame.commands().iter().find_map(|c| match c {
                DrawCommand::Text { text, color, .. } if text == wanted => Some(*color),
                _ => None,
            })
        };

        let running = TimerReport::builder()
            .stop_time("00:12:40")
            .lap_time("00:01:05")
            .running(true)
            .build();
        let mut frame = InstrumentFrame::new();
        render_timer(&ctx, &mut frame, now, &running);
        assert!(texts(&frame).contains(&"09:03:07".to_string()));
        assert!(texts(&frame).contains(&"Laptimer".to_string()));
        assert_eq!(colour_of(&frame, "00:12:40"), Some(Color::LAVENDER));
        assert_eq!(colour_of(&frame, "00:01:05"), Some(Color::POWDER_BLUE));

        let stopped = TimerReport {
            running: false,
            lap_mode: LapMode::Countdown,
            ..running
        };
        let mut frame = InstrumentFrame::new();
        render_timer(&ctx, &mut frame, now, &stopped);
        assert_eq!(colour_of(&frame, "00:12:40"), Some(Color::ORANGE_RED));
        assert_eq!(colour_of(&frame, "00:01:05"), Some(Color::MAGENTA));
        assert!(texts(&frame).contains(&"Countdown".to_string()));
    }

    #[test]
    fn shutdown_names_mode_and_countdown() {
        let ctx = context();
        let mut frame = InstrumentFrame::new();
        render_shutdown(&ctx, &mut frame, 7, ShutdownMode::DisplayOnly);
        let labels = texts(&frame);
        assert_eq!(&labels[..2], &["Shtdwn displ".to_string(), "in 7 seconds!".to_string()]);
        assert_eq!(&labels[labels.len() - 3..], &["Canc", "Rebo", "Displ"]);
    }

    #[test]
    fn text_screen_body_starts_below_subline() {
        let ctx = context();
        let body_top = |screen: &TextScreen| {
            let mut frame = InstrumentFrame::new();
            render_text_screen(&ctx, &mut frame, screen);
            frame.commands().iter().find_map(|c| match c {
                DrawCommand::Text { text, position, font, .. } if text == "first" => {
                    assert_eq!(*font, FontSize::Small);
                    Some(position.y)
                }
                _ => None,
            })
        };

        let plain = TextScreen::builder()
            .headline("Info")
            .body("first\nsecond")
            .middle_key("Back")
            .build();
        assert_eq!(body_top(&plain), Some(25.0));
        let with_subline = TextScreen {
            subline: Some("Receiver".to_string()),
            ..plain.clone()
        };
        assert_eq!(body_top(&with_subline), Some(50.0));

        let mut frame = InstrumentFrame::new();
        render_text_screen(&ctx, &mut frame, &plain);
        let headline = frame.commands().iter().find_map(|c| match c {
            DrawCommand::Text { text, font, .. } if text == "Info" => Some(*font),
            _ => None,
        });
        assert_eq!(headline, Some(FontSize::Medium));
        assert!(texts(&frame).contains(&"second".to_string()));
    }
}
