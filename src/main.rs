use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chrono::Utc;
use rand::Rng;
use winit::event::{Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};

use flightdeck::panel::{
    CoStatus, DistanceReport, FlightRecord, LandingStatistics, OgnStats, ReceiverStats,
    ShutdownMode, StatusReport, TextScreen, TimerReport,
};
use flightdeck::radar::{Contact, ModeSContact, Situation};
use flightdeck::{
    compass, gauge, horizon, panel, radar, Canvas, Color, Device, FontSet, InstrumentFrame,
    Point2D, RenderContext, ScreenGeometry, WindowConfig, WindowDevice,
};

/// One sample from the simulated sensors.
#[derive(Debug, Clone, Copy, Default)]
struct Telemetry {
    pitch: f64,
    roll: f64,
    heading: f64,
    slip: f64,
    load_factor: f64,
    vertical_speed: f64,
    co_ppm: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Page {
    Attitude,
    Compass,
    GMeter,
    VerticalSpeed,
    Radar,
    Status,
    FlightLogs,
    CoWarner,
    Distance,
    LandingStatistics,
    Timer,
    Message,
    Shutdown,
}

impl Page {
    const ALL: [Page; 13] = [
        Page::Attitude,
        Page::Compass,
        Page::GMeter,
        Page::VerticalSpeed,
        Page::Radar,
        Page::Status,
        Page::FlightLogs,
        Page::CoWarner,
        Page::Distance,
        Page::LandingStatistics,
        Page::Timer,
        Page::Message,
        Page::Shutdown,
    ];
}

/// Everything the pages show, folded from the telemetry stream.
struct DisplayState {
    latest: Telemetry,
    max_g: f64,
    min_g: f64,
    co_history: VecDeque<u32>,
    co_max: u32,
    arc_position: f64,
    flights: Vec<FlightRecord>,
}

impl DisplayState {
    const CO_SAMPLES: usize = 120;

    fn new() -> Self {
        let now = Utc::now();
        Self {
            latest: Telemetry {
                load_factor: 1.0,
                ..Telemetry::default()
            },
            max_g: 1.0,
            min_g: 1.0,
            co_history: VecDeque::with_capacity(Self::CO_SAMPLES),
            co_max: 0,
            arc_position: 0.0,
            flights: vec![
                FlightRecord {
                    takeoff: now - chrono::Duration::minutes(47),
                    landing: None,
                },
                FlightRecord {
                    takeoff: now - chrono::Duration::hours(26),
                    landing: Some(now - chrono::Duration::hours(25)),
                },
            ],
        }
    }

    fn update(&mut self, receiver: &Receiver<Telemetry>) {
        for sample in receiver.try_iter() {
            self.max_g = self.max_g.max(sample.load_factor);
            self.min_g = self.min_g.min(sample.load_factor);
            if self.co_history.len() == Self::CO_SAMPLES {
                self.co_history.pop_front();
            }
            self.co_history.push_back(sample.co_ppm);
            self.co_max = self.co_max.max(sample.co_ppm);
            self.latest = sample;
        }
    }
}

fn render_page(ctx: &RenderContext, frame: &mut InstrumentFrame, page: Page, state: &mut DisplayState) {
    let t = state.latest;
    let now = Utc::now();
    frame.clear(Color::BLACK);
    match page {
        Page::Attitude => horizon::render_attitude(ctx, frame, t.pitch, t.roll, t.heading, t.slip, None),
        Page::Compass => compass::render_compass(ctx, frame, t.heading, None),
        Page::GMeter => gauge::render_gmeter(ctx, frame, t.load_factor, state.max_g, state.min_g, None),
        Page::VerticalSpeed => gauge::render_vsi(ctx, frame, t.vertical_speed, None),
        Page::Radar => {
            let situation = Situation::builder()
                .own_altitude(4500.0 + t.vertical_speed)
                .course(t.heading.round() as i32)
                .range(10)
                .altitude_difference(2000)
                .bluetooth_devices(1)
                .sound_active(true)
                .build();
            radar::render_situation(ctx, frame, &situation);
            let contact = Contact::builder()
                .offset(Point2D::new(60.0 * t.roll.to_radians().sin(), -70.0))
                .direction(t.heading + 40.0)
                .relative_altitude(-3)
                .vertical_speed(t.vertical_speed)
                .speed_length(24.0)
                .tail("D-EFLY")
                .build();
            radar::render_aircraft(ctx, frame, &contact);
            let mode_s = ModeSContact::builder()
                .radius(55.0)
                .relative_altitude(12)
                .vertical_speed(0.0)
                .arc_position(state.arc_position)
                .build();
            radar::render_mode_s(ctx, frame, &mode_s);
            state.arc_position = radar::next_arc_position(ctx, state.arc_position);
        }
        Page::Status => {
            let report = StatusReport::builder()
                .version("v1.6r1")
                .es(ReceiverStats {
                    messages_last_minute: 420.0,
                    messages_max: 1000.0,
                })
                .ogn(OgnStats {
                    receiver: ReceiverStats {
                        messages_last_minute: 35.0,
                        messages_max: 120.0,
                    },
                    noise_db: 4.2,
                    gain_db: 48.0,
                })
                .cpu_temperature((52.3, 61.0))
                .gps_quality(1)
                .satellites_locked(9)
                .satellites_seen(14)
                .satellites_tracked(11)
                .position_accuracy(3.4)
                .imu_connected(true)
                .bmp_connected(true)
                .build();
            panel::render_status(ctx, frame, &report, 4500.0, 4620.0);
        }
        Page::FlightLogs => panel::render_flight_logs(ctx, frame, &state.flights, now),
        Page::CoWarner => {
            let status = CoStatus::builder()
                .values(state.co_history.iter().copied().collect())
                .max(state.co_max)
                .sample_interval(0.1)
                .build();
            panel::render_co_warner(ctx, frame, &status, now);
        }
        Page::Distance => {
            let report = DistanceReport::builder()
                .distance(312.0)
                .speed(54.5)
                .vertical_speed(t.vertical_speed)
                .build();
            panel::render_distance(ctx, frame, now, &report, None);
        }
        Page::LandingStatistics => {
            let stats = LandingStatistics::builder()
                .takeoff_time(now - chrono::Duration::minutes(47))
                .takeoff_distance(184.0)
                .takeoff_obstacle_distance(402.5)
                .build();
            panel::render_distance_statistics(ctx, frame, &stats);
        }
        Page::Timer => {
            let elapsed = state
                .flights
                .first()
                .map_or(0, |flight| (now - flight.takeoff).num_seconds().max(0));
            let report = TimerReport::builder()
                .stop_time(format!(
                    "{:02}:{:02}:{:02}",
                    elapsed / 3600,
                    elapsed / 60 % 60,
                    elapsed % 60
                ))
                .lap_time(format!("{:02}:{:02}", elapsed / 60 % 60, elapsed % 60))
                .running(true)
                .left_key("Stop")
                .middle_key("Mode")
                .right_key("Lap")
                .build();
            panel::render_timer(ctx, frame, now, &report);
        }
        Page::Message => {
            let screen = TextScreen::builder()
                .headline("Flightdeck")
                .subline("Simulated sensors")
                .body(format!(
                    "Pitch {:+.1}\nRoll {:+.1}\nCO {} ppm",
                    t.pitch, t.roll, t.co_ppm
                ))
                .middle_key("Next")
                .build();
            panel::render_text_screen(ctx, frame, &screen);
        }
        Page::Shutdown => {
            let remaining = page_countdown(now);
            panel::render_shutdown(ctx, frame, remaining, ShutdownMode::DisplayOnly);
        }
    }
}

/// Seconds left in a ten second countdown that restarts every ten seconds.
fn page_countdown(now: chrono::DateTime<Utc>) -> u32 {
    10 - (now.timestamp().rem_euclid(10) as u32)
}

fn rasterize(
    frame: &InstrumentFrame,
    buffer: &mut [u8],
    width: u32,
    height: u32,
    fonts: &FontSet,
) -> flightdeck::Result<()> {
    let mut canvas = Canvas::new(buffer, width as usize, height as usize, fonts)?;
    frame.present(&mut canvas);
    Ok(())
}

/// Random walk standing in for the sensor feed.
fn spawn_telemetry(sender: mpsc::Sender<Telemetry>) {
    thread::spawn(move || {
        let mut rng = rand::rng();
        let mut t = Telemetry {
            load_factor: 1.0,
            co_ppm: 8,
            ..Telemetry::default()
        };
        loop {
            t.pitch = (t.pitch + rng.random_range(-0.8..0.8)).clamp(-25.0, 25.0);
            t.roll = (t.roll + rng.random_range(-2.0..2.0)).clamp(-60.0, 60.0);
            t.heading = (t.heading + t.roll / 20.0).rem_euclid(360.0);
            t.slip = (t.slip + rng.random_range(-0.5..0.5)).clamp(-12.0, 12.0);
            t.load_factor = 1.0 / t.roll.to_radians().cos() + rng.random_range(-0.1..0.1);
            t.vertical_speed = t.pitch * 90.0;
            t.co_ppm = (t.co_ppm as i64 + rng.random_range(-3..=3)).clamp(0, 140) as u32;
            if sender.send(t).is_err() {
                break;
            }
            thread::sleep(Duration::from_millis(100));
        }
    });
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut args = std::env::args().skip(1);
    let (text_font, icon_font) = match (args.next(), args.next()) {
        (Some(text), Some(icons)) => (PathBuf::from(text), PathBuf::from(icons)),
        _ => anyhow::bail!("usage: flightdeck <text-font.ttf> <icon-font.ttf>"),
    };
    let font_set = FontSet::from_bytes(
        std::fs::read(&text_font).with_context(|| format!("reading {}", text_font.display()))?,
        std::fs::read(&icon_font).with_context(|| format!("reading {}", icon_font.display()))?,
    )?;
    let fonts = &font_set;

    let config = WindowConfig::default();
    let event_loop = EventLoop::new()?;
    let mut device = WindowDevice::open(&event_loop, "Flightdeck", &config)?;
    let (width, height) = device.screen_size();
    let ctx = RenderContext::new(ScreenGeometry::new(width, height), fonts);
    let mut buffer = vec![0u8; width as usize * height as usize * 4];

    let (sender, receiver) = mpsc::channel();
    spawn_telemetry(sender);
    let mut state = DisplayState::new();

    let frame_duration = Duration::from_secs_f64(1.0 / config.max_framerate);
    let page_duration = Duration::from_secs_f64(config.page_seconds);
    let started = Instant::now();
    let mut last_frame = Instant::now();

    event_loop.run(move |event, window_target| {
        window_target.set_control_flow(ControlFlow::Poll);
        match event {
            Event::WindowEvent { event, .. } => match event {
                WindowEvent::CloseRequested => window_target.exit(),
                WindowEvent::Resized(size) => device.resize_surface(size.width, size.height),
                WindowEvent::RedrawRequested => {
                    state.update(&receiver);
                    let index = (started.elapsed().as_secs_f64() / page_duration.as_secs_f64()) as usize;
                    let page = Page::ALL[index % Page::ALL.len()];

                    let mut frame = InstrumentFrame::new();
                    render_page(&ctx, &mut frame, page, &mut state);
                    let shown = rasterize(&frame, &mut buffer, width, height, fonts)
                        .and_then(|()| device.present(&buffer));
                    if let Err(e) = shown {
                        log::error!("presenting {page:?} failed: {e}");
                        window_target.exit();
                    }
                }
                _ => {}
            },
            Event::AboutToWait => {
                if last_frame.elapsed() >= frame_duration {
                    device.window().request_redraw();
                    last_frame = Instant::now();
                }
            }
            _ => {}
        }
    })?;

    Ok(())
}
