//! Shared pixel board: an RGB cell grid that is painted cell by cell and
//! travels as a compact base64 string.

#[macro_use]
extern crate tracing;

pub mod autosave;
pub mod board;
pub mod buffer;
pub mod codec;
pub mod config;
pub mod coords;
pub mod error;
pub mod layout;
pub mod paint;
pub mod render;
pub mod route;
pub mod store;
pub mod swatches;

pub use board::{Board, BoardSource, Redraw};
pub use buffer::{PixelBuffer, Rgb};
pub use codec::{decode, decode_buffer, encode, PayloadPolicy};
pub use coords::{index_from_point, SurfaceGeometry};
pub use error::{BoardError, Result};
pub use layout::Layout;
pub use paint::{BoardAction, PaintEngine, PaintedAction};
