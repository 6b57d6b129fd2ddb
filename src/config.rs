use crate::color::Color;
use crate::text::FontSize;

/// Attitude indicator layout
#[derive(Debug, Clone)]
pub struct HorizonLayout {
    /// Pixels per degree of pitch.
    pub pitch_scale: f64,
    pub horizon_half_length: f64,
    pub rung_half_length: f64,
    /// Offset used for the far edge of the sky and earth quads.
    pub fill_offset: f64,
    pub pitch_marks: Vec<f64>,
    pub roll_marks: Vec<f64>,
    pub roll_long_tick: f64,
    pub roll_short_tick: f64,
    pub roll_tick_width: f32,
    pub roll_pointer_top: f64,
    pub roll_pointer_half_width: f64,
    pub roll_pointer_height: f64,
    pub slip_limit: f64,
    pub slip_scale: f64,
    pub slip_ball_radius: f64,
    pub slip_track_half_width: f64,
    pub sky: Color,
    pub earth: Color,
    pub error_y: f64,
}

impl Default for HorizonLayout {
    fn default() -> Self {
        Self {
            pitch_scale: 3.0,
            horizon_half_length: 200.0,
            rung_half_length: 20.0,
            fill_offset: 180.0,
            pitch_marks: vec![-30.0, -20.0, -10.0, 10.0, 20.0, 30.0],
            roll_marks: vec![
                -90.0, -60.0, -30.0, -20.0, -10.0, 0.0, 10.0, 20.0, 30.0, 60.0, 90.0,
            ],
            roll_long_tick: 24.0,
            roll_short_tick: 16.0,
            roll_tick_width: 3.0,
            roll_pointer_top: 20.0,
            roll_pointer_half_width: 12.0,
            roll_pointer_height: 8.0,
            slip_limit: 10.0,
            slip_scale: 12.0,
            slip_ball_radius: 10.0,
            slip_track_half_width: 120.0,
            sky: Color::BLUE,
            earth: Color::BROWN,
            error_y: 30.0,
        }
    }
}

/// Compass rose layout
#[derive(Debug, Clone)]
pub struct CompassLayout {
    pub tick_length: f64,
    pub rim_width: f32,
    pub label_font: FontSize,
    pub lubber_top: f64,
    pub lubber_bottom: f64,
    pub aircraft_span: f64,
    pub cardinal_color: Color,
    pub numeral_color: Color,
    pub error_y: f64,
}

impl Default for CompassLayout {
    fn default() -> Self {
        Self {
            tick_length: 15.0,
            rim_width: 3.0,
            label_font: FontSize::Large,
            lubber_top: 20.0,
            lubber_bottom: 50.0,
            aircraft_span: 60.0,
            cardinal_color: Color::YELLOW,
            numeral_color: Color::WHITE,
            error_y: 57.0,
        }
    }
}

/// Radial dial layout shared by every gauge built from a `GaugeSpec`
#[derive(Debug, Clone)]
pub struct GaugeLayout {
    pub major_tick_length: f64,
    pub minor_tick_length: f64,
    pub label_gap: f64,
    /// Needle shaft width, kept even so the shaft centres on the hub.
    pub needle_width: f64,
    pub needle_head_length: f64,
    pub needle_tip_gap: f64,
    pub caption_gap: f64,
    pub hub_radius: f64,
    pub arc_width: f32,
    /// Loop tolerance so accumulated spacing never drops the end value.
    pub tick_epsilon: f64,
}

impl Default for GaugeLayout {
    fn default() -> Self {
        Self {
            major_tick_length: 14.0,
            minor_tick_length: 7.0,
            label_gap: 7.0,
            needle_width: 8.0,
            needle_head_length: 15.0,
            needle_tip_gap: 5.0,
            caption_gap: 15.0,
            hub_radius: 5.0,
            arc_width: 2.0,
            tick_epsilon: 1e-9,
        }
    }
}

/// Vertical speed indicator layout
#[derive(Debug, Clone)]
pub struct VsiLayout {
    pub range_fpm: f64,
    pub sweep_degrees: f64,
    pub minor_step_fpm: f64,
    pub major_step_fpm: f64,
    pub minor_tick_length: f64,
    pub major_tick_length: f64,
    pub needle_tail: f64,
    pub hub_radius: f64,
    /// Rim clearance of the scale numbers, horizontal and vertical.
    pub label_inset_x: f64,
    pub label_inset_y: f64,
}

impl Default for VsiLayout {
    fn default() -> Self {
        Self {
            range_fpm: 2000.0,
            sweep_degrees: 170.0,
            minor_step_fpm: 100.0,
            major_step_fpm: 500.0,
            minor_tick_length: 8.0,
            major_tick_length: 14.0,
            needle_tail: 16.0,
            hub_radius: 4.0,
            label_inset_x: 1.0,
            label_inset_y: 5.0,
        }
    }
}

impl VsiLayout {
    pub fn degrees_per_fpm(&self) -> f64 {
        self.sweep_degrees / self.range_fpm
    }
}

/// Traffic overlay layout
#[derive(Debug, Clone)]
pub struct RadarLayout {
    pub aircraft_size: f64,
    /// Both axes of a contact offset are scaled by this before drawing.
    /// Empirical: contacts were otherwise plotted too far out.
    pub position_correction: f64,
    pub min_ring_radius: f64,
    pub max_ring_radius: f64,
    pub ring_width: f32,
    /// Angle a Mode-S label advances by each frame. Best effort only, it
    /// spreads two or three stacked labels but guarantees nothing.
    pub declutter_step: f64,
    pub contact_color: Color,
    pub mode_s_color: Color,
}

impl Default for RadarLayout {
    fn default() -> Self {
        Self {
            aircraft_size: 4.0,
            position_correction: 0.9,
            min_ring_radius: 18.0,
            max_ring_radius: 100.0,
            ring_width: 3.0,
            declutter_step: 210.0,
            contact_color: Color::RED,
            mode_s_color: Color::YELLOW,
        }
    }
}

/// Text panels, bars and graphs
#[derive(Debug, Clone)]
pub struct PanelLayout {
    pub bar_start: f64,
    pub bar_end: f64,
    pub bar_corner_radius: f64,
    pub bar_gap: f64,
    pub graph_label_space: f64,
    pub graph_tick_above: f64,
    pub graph_tick_below: f64,
    pub dash_period: usize,
    pub dash_length: f64,
    pub flight_log_rows: usize,
    pub soft_key_inset: f64,
    /// Gap between body lines of a text screen.
    pub text_line_spacing: f64,
}

impl Default for PanelLayout {
    fn default() -> Self {
        Self {
            bar_start: 60.0,
            bar_end: 240.0,
            bar_corner_radius: 3.0,
            bar_gap: 5.0,
            graph_label_space: 3.0,
            graph_tick_above: 5.0,
            graph_tick_below: 3.0,
            dash_period: 6,
            dash_length: 3.0,
            flight_log_rows: 8,
            soft_key_inset: 3.0,
            text_line_spacing: 4.0,
        }
    }
}

/// Every layout parameter of every instrument
#[derive(Debug, Clone, Default)]
pub struct Layout {
    pub horizon: HorizonLayout,
    pub compass: CompassLayout,
    pub gauge: GaugeLayout,
    pub vsi: VsiLayout,
    pub radar: RadarLayout,
    pub panel: PanelLayout,
}

/// Configuration for the demo window
#[derive(Debug, Clone)]
pub struct WindowConfig {
    pub width: u32,
    pub height: u32,
    pub max_framerate: f64,
    /// Seconds each instrument page stays up before the demo moves on.
    pub page_seconds: f64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            width: 320,
            height: 240,
            max_framerate: 30.0,
            page_seconds: 6.0,
        }
    }
}
