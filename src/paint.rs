use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, Rgb};
use crate::error::{BoardError, Result};

/// One committed color change at one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaintedAction {
    pub index: usize,
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PaintedAction {
    pub fn color(&self) -> Rgb {
        Rgb::new(self.r, self.g, self.b)
    }
}

/// Change records forwarded to whatever keeps other sessions in sync
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BoardAction {
    Paint(PaintedAction),
}

/// Blend `src` over `dst` with opacity `alpha`
#[inline]
fn blend_channel(src: u8, dst: u8, alpha: f64) -> u8 {
    (src as f64 * alpha + dst as f64 * (1.0 - alpha))
        .round()
        .clamp(0.0, 255.0) as u8
}

/// Applies alpha-blended writes to a buffer.
///
/// Remembers the last cell it changed so a drag that stays inside one cell
/// only paints it once.
#[derive(Debug, Default, Clone)]
pub struct PaintEngine {
    last_painted: Option<usize>,
}

impl PaintEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_painted(&self) -> Option<usize> {
        self.last_painted
    }

    /// Forget the most recent painted cell
    pub fn reset(&mut self) {
        self.last_painted = None;
    }

    /// Paint `color` over the cell at `index`.
    ///
    /// Returns `Ok(None)` when the cell already holds `color` or when `index`
    /// is the cell painted by the previous successful call.
    pub fn paint(
        &mut self,
        buffer: &mut PixelBuffer,
        index: usize,
        color: Rgb,
        alpha: f64,
    ) -> Result<Option<PaintedAction>> {
        let current = buffer.get(index)?;
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return Err(BoardError::InvalidAlpha(alpha));
        }

        if current == color {
            return Ok(None);
        }
        if self.last_painted == Some(index) {
            return Ok(None);
        }
        self.last_painted = Some(index);

        let blended = Rgb::new(
            blend_channel(color.r, current.r, alpha),
            blend_channel(color.g, current.g, alpha),
            blend_channel(color.b, current.b, alpha),
        );
        buffer.set(index, blended)?;

        Ok(Some(PaintedAction {
            index,
            r: blended.r,
            g: blended.g,
            b: blended.b,
        }))
    }
}
