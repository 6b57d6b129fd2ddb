use chrono::{TimeZone, Utc};
use flightdeck::panel::{
    Bar, CoStatus, DistanceReport, FlightRecord, LandingStatistics, ReceiverStats, ShutdownMode,
    StatusReport, TextScreen, TimerReport,
};
use flightdeck::radar::{Contact, ModeSContact, Situation};
use flightdeck::{
    compass, gauge, horizon, panel, radar, Canvas, Color, Device, FontSize, HeadlessDevice,
    InstrumentFrame, Point2D, RenderContext, ScreenGeometry, Typesetter,
};

const WIDTH: usize = 320;
const HEIGHT: usize = 240;

/// Ten pixel wide solid blocks, one per character.
struct BlockFont;

impl Typesetter for BlockFont {
    fn text_width(&self, text: &str, _font: FontSize) -> f64 {
        text.chars().count() as f64 * 10.0
    }

    fn rasterize(
        &self,
        text: &str,
        font: FontSize,
        origin: Point2D,
        plot: &mut dyn FnMut(i32, i32, f32),
    ) {
        let (x0, y0) = (origin.x.round() as i32, origin.y.round() as i32);
        for i in 0..text.chars().count() as i32 {
            for y in 2..font.pixels() as i32 - 2 {
                for x in 1..9 {
                    plot(x0 + i * 10 + x, y0 + y, 1.0);
                }
            }
        }
    }
}

fn context() -> RenderContext<'static> {
    RenderContext::new(ScreenGeometry::new(WIDTH as u32, HEIGHT as u32), &BlockFont)
}

fn paint(draw: impl FnOnce(&RenderContext, &mut InstrumentFrame)) -> Vec<u8> {
    let ctx = context();
    let mut frame = InstrumentFrame::new();
    frame.clear(Color::BLACK);
    draw(&ctx, &mut frame);
    let mut rgba = vec![0u8; WIDTH * HEIGHT * 4];
    frame.present(&mut Canvas::new(&mut rgba, WIDTH, HEIGHT, &BlockFont).unwrap());
    rgba
}

fn pixel(rgba: &[u8], x: usize, y: usize) -> Color {
    let idx = (y * WIDTH + x) * 4;
    Color::new(rgba[idx], rgba[idx + 1], rgba[idx + 2])
}

fn lit_pixels(rgba: &[u8]) -> usize {
    rgba.chunks_exact(4).filter(|p| p[..3] != [0, 0, 0]).count()
}

#[test]
fn level_attitude_splits_sky_and_earth() {
    let rgba = paint(|ctx, frame| horizon::render_attitude(ctx, frame, 0.0, 0.0, 0.0, 0.0, None));
    assert_eq!(pixel(&rgba, 10, 60), Color::BLUE);
    assert_eq!(pixel(&rgba, 10, 200), Color::BROWN);
    assert_eq!(pixel(&rgba, 310, 60), Color::BLUE);
}

#[test]
fn compass_lubber_line_stays_fixed() {
    let rgba = paint(|ctx, frame| compass::render_compass(ctx, frame, 45.0, None));
    assert_eq!(pixel(&rgba, 160, 45), Color::ORANGE);
    assert!(lit_pixels(&rgba) > 1000);
}

#[test]
fn tiny_mode_s_range_draws_minimum_ring() {
    let rgba = paint(|ctx, frame| {
        let contact = ModeSContact::builder()
            .radius(5.0)
            .relative_altitude(0)
            .vertical_speed(0.0)
            .arc_position(180.0)
            .build();
        radar::render_mode_s(ctx, frame, &contact);
    });
    assert_eq!(pixel(&rgba, 177, 120), Color::YELLOW);
    assert_eq!(pixel(&rgba, 165, 120), Color::BLACK);
}

#[test]
fn overfull_bar_without_alarm_is_grey_to_the_end() {
    let rgba = paint(|ctx, frame| {
        Bar::builder()
            .label("1090")
            .value(150.0)
            .max(100.0)
            .yellow(50.0)
            .red(0.0)
            .build()
            .render(ctx, frame, 30.0);
    });
    assert_eq!(pixel(&rgba, 70, 40), Color::DIM_GRAY);
    assert_eq!(pixel(&rgba, 238, 40), Color::DIM_GRAY);
}

const PAGES: usize = 13;

fn render_page(page: usize, ctx: &RenderContext, frame: &mut InstrumentFrame) {
    let now = Utc.with_ymd_and_hms(2024, 7, 14, 15, 42, 10).unwrap();
    match page {
        0 => horizon::render_attitude(ctx, frame, 8.0, -25.0, 90.0, 3.0, Some("AHRS")),
        1 => compass::render_compass(ctx, frame, 312.0, Some("No heading")),
        2 => gauge::render_gmeter(ctx, frame, 2.4, 3.1, -0.6, None),
        3 => gauge::render_vsi(ctx, frame, -1250.0, None),
        4 => {
            let situation = Situation::builder()
                .own_altitude(3500.0)
                .course(182)
                .range(5)
                .altitude_difference(10_000)
                .gps_connected(false)
                .co_alarm_level(1)
                .co_alarm_text("120ppm")
                .build();
            radar::render_situation(ctx, frame, &situation);
            let contact = Contact::builder()
                .offset(Point2D::new(150.0, 0.0))
                .direction(270.0)
                .relative_altitude(-14)
                .vertical_speed(-300.0)
                .speed_length(20.0)
                .build();
            radar::render_aircraft(ctx, frame, &contact);
        }
        5 => {
            let report = StatusReport::builder()
                .version("v1.6")
                .es(ReceiverStats {
                    messages_last_minute: 80.0,
                    messages_max: 400.0,
                })
                .uat(ReceiverStats::default())
                .cpu_temperature((75.0, 81.0))
                .build();
            panel::render_status(ctx, frame, &report, 2500.0, 2480.0);
        }
        6 => {
            let flights = [FlightRecord {
                takeoff: now - chrono::Duration::minutes(30),
                landing: None,
            }];
            panel::render_flight_logs(ctx, frame, &flights, now);
        }
        7 => {
            let status = CoStatus::builder()
                .values(vec![5, 20, 60, 130, 40])
                .max(130)
                .sample_interval(30.0)
                .alarm_level(1)
                .alarm_ppm(60)
                .alarm_period(45.0)
                .build();
            panel::render_co_warner(ctx, frame, &status, now);
        }
        8 => panel::render_distance(ctx, frame, now, &DistanceReport::default(), Some("No GPS")),
        9 => panel::render_distance_statistics(ctx, frame, &LandingStatistics::default()),
        10 => {
            let report = TimerReport::builder()
                .stop_time("00:00:00")
                .lap_time("00:00")
                .running(false)
                .build();
            panel::render_timer(ctx, frame, now, &report);
        }
        11 => {
            let screen = TextScreen::builder()
                .headline("Update")
                .body("Restart required")
                .build();
            panel::render_text_screen(ctx, frame, &screen);
        }
        _ => panel::render_shutdown(ctx, frame, 3, ShutdownMode::Reboot),
    }
}

#[test]
fn every_page_presents_to_a_device() {
    let mut device = HeadlessDevice::new(WIDTH as u32, HEIGHT as u32);
    for page in 0..PAGES {
        let rgba = paint(|ctx, frame| render_page(page, ctx, frame));
        assert!(lit_pixels(&rgba) > 0, "page {page} drew nothing");
        device.present(&rgba).unwrap();
    }
    assert_eq!(device.frames_presented(), PAGES);
}
