use thiserror::Error;

/// Errors raised by the compositing and degradation engine
#[derive(Error, Debug)]
pub enum FryError {
    /// Image bytes could not be decoded into a bitmap
    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),
    /// The current frame could not be re-encoded
    #[error("failed to encode frame: {0}")]
    Encode(String),
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid font data: {0}")]
    Font(String),
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
    /// The glyph source could not provide a bitmap for the key
    #[error("glyph {key} unavailable: {reason}")]
    GlyphFetch { key: String, reason: String },
    /// A zero-sized or oversized surface was requested
    #[error("invalid frame size {width}x{height}")]
    InvalidFrame { width: u32, height: u32 },
}

pub type Result<T> = std::result::Result<T, FryError>;
