use serde::{Deserialize, Serialize};

use crate::error::{BoardError, Result};

/// Bytes per cell (R, G, B)
pub const CELL_SIZE: usize = 3;

/// Largest accepted width or height of a board
pub const MAX_DIMENSION: i32 = 10_000;

/// A single cell color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// Row-major RGB storage for a `width` x `height` grid of cells.
///
/// The backing array always holds exactly `width * height * 3` bytes.
/// A buffer never changes size: loading a board of different dimensions
/// builds a new buffer and swaps it in with [`PixelBuffer::replace`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    cells: Vec<u8>,
}

/// Validate a dimension pair and return the number of cells it describes
pub(crate) fn cell_count(width: i32, height: i32) -> Result<usize> {
    if width <= 0 || height <= 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(BoardError::InvalidDimension {
            width: width as f64,
            height: height as f64,
        });
    }
    Ok(width as usize * height as usize)
}

/// Convert a numeric size pair into whole dimensions. Fractional or
/// non-finite values are `InvalidDimension`; range is checked on construction.
pub fn whole_dimensions(width: f64, height: f64) -> Result<(i32, i32)> {
    let whole = |v: f64| v.fract() == 0.0 && v >= i32::MIN as f64 && v <= i32::MAX as f64;
    if !whole(width) || !whole(height) {
        return Err(BoardError::InvalidDimension { width, height });
    }
    Ok((width as i32, height as i32))
}

impl PixelBuffer {
    /// Create a new all-white buffer
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let count = cell_count(width, height)?;
        Ok(PixelBuffer {
            width: width as u32,
            height: height as u32,
            cells: vec![255u8; count * CELL_SIZE],
        })
    }

    /// Build a buffer around existing cell bytes
    pub fn from_raw(width: i32, height: i32, cells: Vec<u8>) -> Result<Self> {
        let expected = cell_count(width, height)? * CELL_SIZE;
        if cells.len() != expected {
            return Err(BoardError::CorruptPayload {
                expected,
                actual: cells.len(),
            });
        }
        Ok(PixelBuffer {
            width: width as u32,
            height: height as u32,
            cells,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells in the grid
    pub fn len(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    fn check(&self, index: usize) -> Result<usize> {
        let len = self.len();
        if index >= len {
            return Err(BoardError::IndexOutOfRange { index, len });
        }
        Ok(index * CELL_SIZE)
    }

    /// Color stored at `index`
    pub fn get(&self, index: usize) -> Result<Rgb> {
        let offset = self.check(index)?;
        let c = &self.cells[offset..offset + CELL_SIZE];
        Ok(Rgb::new(c[0], c[1], c[2]))
    }

    pub(crate) fn set(&mut self, index: usize, color: Rgb) -> Result<()> {
        let offset = self.check(index)?;
        self.cells[offset..offset + CELL_SIZE].copy_from_slice(&color.to_array());
        Ok(())
    }

    /// Column and row of a cell index
    pub fn coords(&self, index: usize) -> (u32, u32) {
        let w = self.width as usize;
        ((index % w) as u32, (index / w) as u32)
    }

    /// Read-only view of the backing cell bytes
    pub fn raw(&self) -> &[u8] {
        &self.cells
    }

    /// Paint every cell with the same color
    pub fn fill(&mut self, color: Rgb) {
        let rgb = color.to_array();
        for cell in self.cells.chunks_exact_mut(CELL_SIZE) {
            cell.copy_from_slice(&rgb);
        }
    }

    /// Swap in another buffer wholesale, returning the old one
    pub fn replace(&mut self, other: PixelBuffer) -> PixelBuffer {
        std::mem::replace(self, other)
    }
}
