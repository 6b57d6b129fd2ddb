/// Failures at the edges of the crate. Renderers themselves never fail:
/// out-of-domain telemetry is clamped, not rejected.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("{0} font data could not be parsed")]
    FontLoad(&'static str),
    #[error("frame of {actual} bytes does not match the {expected} byte device buffer")]
    FrameSize { expected: usize, actual: usize },
    #[error("display device: {0}")]
    Device(String),
}

pub type Result<T> = std::result::Result<T, Error>;
