//! Rendering core for a small cockpit display.
//!
//! Every instrument is a function that reads a [`RenderContext`] and appends
//! primitives to an [`InstrumentFrame`]. A frame is then replayed onto any
//! [`Surface`], usually a [`Canvas`] over an RGBA buffer that a [`Device`]
//! shows.
//!
//! ```no_run
//! use flightdeck::{Canvas, FontSet, InstrumentFrame, RenderContext, ScreenGeometry};
//!
//! # fn main() -> flightdeck::Result<()> {
//! let fonts = FontSet::from_bytes(std::fs::read("text.ttf").unwrap_or_default(),
//!                                 std::fs::read("icons.ttf").unwrap_or_default())?;
//! let ctx = RenderContext::new(ScreenGeometry::new(320, 240), &fonts);
//! let mut frame = InstrumentFrame::new();
//! flightdeck::compass::render_compass(&ctx, &mut frame, 274.0, None);
//!
//! let mut rgba = vec![0; 320 * 240 * 4];
//! frame.present(&mut Canvas::new(&mut rgba, 320, 240, &fonts)?);
//! # Ok(())
//! # }
//! ```

pub mod canvas;
pub mod color;
pub mod compass;
pub mod config;
pub mod context;
pub mod device;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod horizon;
pub mod panel;
pub mod radar;
pub mod surface;
pub mod text;

pub use canvas::Canvas;
pub use color::Color;
pub use config::{Layout, WindowConfig};
pub use context::{RenderContext, ScreenGeometry};
pub use device::{Device, HeadlessDevice, WindowDevice};
pub use error::{Error, Result};
pub use gauge::GaugeSpec;
pub use geometry::{EastZeroClockwise, NorthZeroClockwise, Point2D};
pub use surface::{BBox, DrawCommand, GlyphMask, InstrumentFrame, Style, Surface};
pub use text::{FontSet, FontSize, Typesetter};
