//! Builds a custom dial with the `GaugeSpec` builder, renders it headless
//! and writes the result as a binary PPM image.
//!
//! cargo run --example tachometer -- <text-font.ttf> <icon-font.ttf> out.ppm

use std::io::Write;

use anyhow::{Context, Result};
use flightdeck::gauge::render_gauge;
use flightdeck::{
    Canvas, Color, Device, FontSet, GaugeSpec, HeadlessDevice, InstrumentFrame, RenderContext,
    ScreenGeometry,
};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [text_font, icon_font, output] = args.as_slice() else {
        anyhow::bail!("usage: tachometer <text-font.ttf> <icon-font.ttf> <out.ppm>");
    };
    let fonts = FontSet::from_bytes(
        std::fs::read(text_font).with_context(|| format!("reading {text_font}"))?,
        std::fs::read(icon_font).with_context(|| format!("reading {icon_font}"))?,
    )?;

    let mut device = HeadlessDevice::new(320, 240);
    let (width, height) = device.screen_size();
    let ctx = RenderContext::new(ScreenGeometry::new(width, height), &fonts);

    // engine speed in hundreds of rpm over a 270 degree sweep
    let spec = GaugeSpec::builder()
        .start(0.0)
        .end(30.0)
        .from_degree(225.0)
        .to_degree(495.0)
        .major_spacing(5.0)
        .minor_spacing(1.0)
        .center(ctx.screen.center)
        .radius(ctx.screen.max_radius - 2.0)
        .build();

    let mut frame = InstrumentFrame::new();
    frame.clear(Color::BLACK);
    render_gauge(&ctx, &mut frame, &spec, 23.5, Some("RPM"), Some("x100"));

    let mut rgba = vec![0u8; width as usize * height as usize * 4];
    frame.present(&mut Canvas::new(&mut rgba, width as usize, height as usize, &fonts)?);
    device.present(&rgba)?;

    let mut file = std::fs::File::create(output).with_context(|| format!("creating {output}"))?;
    write!(file, "P6\n{width} {height}\n255\n")?;
    for pixel in device.last_frame().chunks_exact(4) {
        file.write_all(&pixel[..3])?;
    }
    log::info!("wrote {} primitives to {output}", frame.len());
    Ok(())
}
