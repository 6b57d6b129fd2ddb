// ============================================================================
// DISPLAY DEVICES
// ============================================================================

use std::sync::Arc;

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

use crate::config::WindowConfig;
use crate::error::{Error, Result};

/// Where finished frames go. The size is queried once at startup and fixes
/// the screen geometry for the session.
pub trait Device {
    fn screen_size(&self) -> (u32, u32);

    /// Shows one RGBA frame of exactly `width * height * 4` bytes.
    fn present(&mut self, rgba: &[u8]) -> Result<()>;
}

fn check_frame(expected: usize, rgba: &[u8]) -> Result<()> {
    if rgba.len() != expected {
        return Err(Error::FrameSize {
            expected,
            actual: rgba.len(),
        });
    }
    Ok(())
}

/// A fixed-size desktop window standing in for the cockpit panel.
pub struct WindowDevice {
    window: Arc<Window>,
    pixels: Pixels<'static>,
    width: u32,
    height: u32,
}

impl WindowDevice {
    pub fn open(event_loop: &EventLoop<()>, title: &str, config: &WindowConfig) -> Result<Self> {
        let window = WindowBuilder::new()
            .with_title(title)
            .with_inner_size(LogicalSize::new(config.width as f64, config.height as f64))
            .with_resizable(false)
            .build(event_loop)
            .map_err(|e| Error::Device(e.to_string()))?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, window.clone());
        let pixels = Pixels::new(config.width, config.height, surface_texture)
            .map_err(|e| Error::Device(e.to_string()))?;
        log::info!(
            "opened {}x{} panel in a {}x{} window",
            config.width,
            config.height,
            size.width,
            size.height
        );

        Ok(Self {
            window,
            pixels,
            width: config.width,
            height: config.height,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    pub fn resize_surface(&mut self, width: u32, height: u32) {
        if let Err(e) = self.pixels.resize_surface(width, height) {
            log::warn!("surface resize to {width}x{height} failed: {e}");
        }
    }
}

impl Device for WindowDevice {
    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, rgba: &[u8]) -> Result<()> {
        let frame = self.pixels.frame_mut();
        check_frame(frame.len(), rgba)?;
        frame.copy_from_slice(rgba);
        self.pixels
            .render()
            .map_err(|e| Error::Device(e.to_string()))
    }
}

/// Keeps the last presented frame in memory. Used where no display exists.
#[derive(Debug, Clone)]
pub struct HeadlessDevice {
    width: u32,
    height: u32,
    last_frame: Vec<u8>,
    frames: usize,
}

impl HeadlessDevice {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            last_frame: vec![0; width as usize * height as usize * 4],
            frames: 0,
        }
    }

    pub fn last_frame(&self) -> &[u8] {
        &self.last_frame
    }

    pub fn frames_presented(&self) -> usize {
        self.frames
    }
}

impl Device for HeadlessDevice {
    fn screen_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn present(&mut self, rgba: &[u8]) -> Result<()> {
        check_frame(self.last_frame.len(), rgba)?;
        self.last_frame.copy_from_slice(rgba);
        self.frames += 1;
        Ok(())
    }
}
