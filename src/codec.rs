//! Text-safe board payloads.
//!
//! Layout before compression: `[width: i32 (LE), height: i32 (LE), cells...]`
//! where `cells` is the row-major RGB buffer. The bytes are raw-deflated and
//! then base64 encoded with the standard alphabet.

use std::io::{Read, Write};
use std::time::Instant;

use base64::{engine::general_purpose::STANDARD, Engine};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;
use serde::{Deserialize, Serialize};

use crate::buffer::{cell_count, PixelBuffer, CELL_SIZE};
use crate::error::{BoardError, Result};

/// Size of the dimension header in bytes
pub const HEADER_SIZE: usize = 8;

/// What to do when the decoded cell bytes do not match the declared dimensions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadPolicy {
    /// Refuse the payload with `CorruptPayload`
    #[default]
    Reject,
    /// Truncate extra bytes, pad missing cells with white
    Fit,
}

/// Raw result of decoding a payload. `cells` is not checked against the
/// dimensions; see [`decode_buffer`] for the validated form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decoded {
    pub width: i32,
    pub height: i32,
    pub cells: Vec<u8>,
}

/// Serialize a buffer into its compressed base64 form
pub fn encode(buffer: &PixelBuffer) -> String {
    let start = Instant::now();

    let mut bytes = Vec::with_capacity(HEADER_SIZE + buffer.raw().len());
    bytes.extend_from_slice(&(buffer.width() as i32).to_le_bytes());
    bytes.extend_from_slice(&(buffer.height() as i32).to_le_bytes());
    bytes.extend_from_slice(buffer.raw());

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder.write_all(&bytes).expect("deflate into Vec");
    let deflated = encoder.finish().expect("deflate into Vec");
    let text = STANDARD.encode(deflated);

    debug!(
        size = %format_size(text.len()),
        elapsed_ms = start.elapsed().as_secs_f32() * 1000.0,
        "encoded board"
    );
    text
}

/// Reverse of [`encode`], without validating the cell length.
///
/// The declared dimensions must be in range. Inflation stops one byte past
/// the cell bytes they call for, so `cells` is never longer than that.
pub fn decode(text: &str) -> Result<Decoded> {
    let start = Instant::now();

    let compressed = STANDARD
        .decode(text.trim())
        .map_err(|e| BoardError::Decode(format!("invalid base64: {e}")))?;

    let mut inflater = DeflateDecoder::new(compressed.as_slice());
    let mut header = Vec::with_capacity(HEADER_SIZE);
    (&mut inflater)
        .take(HEADER_SIZE as u64)
        .read_to_end(&mut header)
        .map_err(|e| BoardError::Decode(format!("invalid deflate stream: {e}")))?;
    if header.len() < HEADER_SIZE {
        return Err(BoardError::Decode(format!(
            "payload too short for header ({} bytes)",
            header.len()
        )));
    }

    let width = i32::from_le_bytes([header[0], header[1], header[2], header[3]]);
    let height = i32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    let expected = cell_count(width, height)? * CELL_SIZE;

    let mut cells = Vec::new();
    inflater
        .take(expected as u64 + 1)
        .read_to_end(&mut cells)
        .map_err(|e| BoardError::Decode(format!("invalid deflate stream: {e}")))?;

    debug!(
        size = %format_size(text.len()),
        elapsed_ms = start.elapsed().as_secs_f32() * 1000.0,
        "decoded board {width}x{height}"
    );
    Ok(Decoded {
        width,
        height,
        cells,
    })
}

/// Decode a payload into a buffer, applying `policy` to length mismatches
pub fn decode_buffer(text: &str, policy: PayloadPolicy) -> Result<PixelBuffer> {
    let Decoded {
        width,
        height,
        mut cells,
    } = decode(text)?;

    let expected = cell_count(width, height)? * CELL_SIZE;
    if cells.len() != expected {
        match policy {
            PayloadPolicy::Reject => {
                return Err(BoardError::CorruptPayload {
                    expected,
                    actual: cells.len(),
                })
            }
            PayloadPolicy::Fit => {
                warn!(
                    expected,
                    actual = cells.len(),
                    "payload length does not match {width}x{height}, fitting"
                );
                cells.resize(expected, 255);
            }
        }
    }

    PixelBuffer::from_raw(width, height, cells)
}

/// Human readable byte size
pub fn format_size(bytes: usize) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut size = bytes as f64 / 1024.0;
    let mut unit = 0;
    while size >= 1024.0 && unit < UNITS.len() - 1 {
        size /= 1024.0;
        unit += 1;
    }
    format!("{size:.1} {}", UNITS[unit])
}
