use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BoardError {
    #[error("Invalid board dimensions {width}x{height}")]
    InvalidDimension { width: f64, height: f64 },

    #[error("Cell index {index} out of range (board has {len} cells)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Alpha must be within 0..=1, got {0}")]
    InvalidAlpha(f64),

    #[error("Could not decode board: {0}")]
    Decode(String),

    #[error("Corrupt payload: expected {expected} cell bytes, found {actual}")]
    CorruptPayload { expected: usize, actual: usize },

    #[error("Board must be initialized with either dimensions or encoded data")]
    MissingSource,

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, BoardError>;
