use std::path::Path;

use crate::buffer::{PixelBuffer, Rgb};
use crate::codec::{self, PayloadPolicy};
use crate::error::{BoardError, Result};
use crate::paint::{BoardAction, PaintEngine, PaintedAction};

/// Where a board's initial state comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardSource {
    Dimensions { width: i32, height: i32 },
    Encoded(String),
}

impl BoardSource {
    /// Pick a source from optional inputs. An encoded payload wins over
    /// dimensions; having neither is an error.
    pub fn resolve(size: Option<(i32, i32)>, from: Option<String>) -> Result<Self> {
        match (from, size) {
            (Some(encoded), _) => Ok(BoardSource::Encoded(encoded)),
            (None, Some((width, height))) => Ok(BoardSource::Dimensions { width, height }),
            (None, None) => Err(BoardError::MissingSource),
        }
    }
}

/// What the renderer has to redraw since it last asked
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Redraw {
    #[default]
    None,
    Cells(Vec<usize>),
    Full,
}

impl Redraw {
    fn push(&mut self, index: usize) {
        match self {
            Redraw::None => *self = Redraw::Cells(vec![index]),
            Redraw::Cells(cells) => cells.push(index),
            Redraw::Full => {}
        }
    }
}

/// One drawing session: the pixel buffer plus its paint state
pub struct Board {
    buffer: PixelBuffer,
    engine: PaintEngine,
    policy: PayloadPolicy,
    redraw: Redraw,
}

impl Board {
    pub fn new(source: BoardSource, policy: PayloadPolicy) -> Result<Self> {
        let buffer = match source {
            BoardSource::Dimensions { width, height } => PixelBuffer::new(width, height)?,
            BoardSource::Encoded(encoded) => codec::decode_buffer(&encoded, policy)?,
        };
        info!("board ready: {}x{}", buffer.width(), buffer.height());

        Ok(Board {
            buffer,
            engine: PaintEngine::new(),
            policy,
            redraw: Redraw::Full,
        })
    }

    /// Load a saved board, falling back to a blank `width` x `height` grid
    /// when the payload cannot be used. The load error is handed back next
    /// to the fallback board.
    pub fn restore(
        encoded: &str,
        width: i32,
        height: i32,
        policy: PayloadPolicy,
    ) -> Result<(Self, Option<BoardError>)> {
        match Board::new(BoardSource::Encoded(encoded.to_string()), policy) {
            Ok(board) => Ok((board, None)),
            Err(e) => {
                warn!("could not restore board ({e}), starting blank {width}x{height}");
                let board = Board::new(BoardSource::Dimensions { width, height }, policy)?;
                Ok((board, Some(e)))
            }
        }
    }

    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    pub fn height(&self) -> u32 {
        self.buffer.height()
    }

    pub fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    pub fn color(&self, index: usize) -> Result<Rgb> {
        self.buffer.get(index)
    }

    /// Blend `color` into a cell; see [`PaintEngine::paint`]
    pub fn paint(&mut self, index: usize, color: Rgb, alpha: f64) -> Result<Option<PaintedAction>> {
        let action = self.engine.paint(&mut self.buffer, index, color, alpha)?;
        if action.is_some() {
            self.redraw.push(index);
        }
        Ok(action)
    }

    /// Apply a change record produced by another session
    pub fn apply(&mut self, action: &BoardAction) -> Result<Option<PaintedAction>> {
        match action {
            BoardAction::Paint(paint) => self.paint(paint.index, paint.color(), 1.0),
        }
    }

    pub fn encode(&self) -> String {
        codec::encode(&self.buffer)
    }

    pub fn state(&self) -> String {
        self.encode()
    }

    /// Replace the whole board with a decoded payload. On error the current
    /// board is left untouched.
    pub fn import(&mut self, encoded: &str) -> Result<()> {
        let buffer = codec::decode_buffer(encoded, self.policy)?;
        info!(
            "imported board {}x{} (was {}x{})",
            buffer.width(),
            buffer.height(),
            self.buffer.width(),
            self.buffer.height()
        );
        self.buffer.replace(buffer);
        self.engine.reset();
        self.redraw = Redraw::Full;
        Ok(())
    }

    pub fn set_state(&mut self, encoded: &str) -> Result<()> {
        self.import(encoded)
    }

    /// Reset every cell to white
    pub fn clear(&mut self) {
        self.buffer.fill(Rgb::WHITE);
        self.engine.reset();
        self.redraw = Redraw::Full;
    }

    /// Ask for a full redraw, e.g. after the surfaces were resized
    pub fn invalidate(&mut self) {
        self.redraw = Redraw::Full;
    }

    /// Pending redraw work, leaving nothing pending
    pub fn take_redraw(&mut self) -> Redraw {
        std::mem::take(&mut self.redraw)
    }

    /// Write the board as a PNG with one pixel per cell
    pub fn export_png(&self, path: &Path) -> Result<()> {
        let image = image::RgbImage::from_raw(self.width(), self.height(), self.buffer.raw().to_vec())
            .ok_or(BoardError::CorruptPayload {
                expected: self.buffer.len() * 3,
                actual: self.buffer.raw().len(),
            })?;
        image.save(path)?;
        info!("exported {}x{} board to {}", self.width(), self.height(), path.display());
        Ok(())
    }
}
