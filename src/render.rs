//! Software surfaces the board is drawn into.
//!
//! Two RGBA layers share one [`Layout`]: the board layer holds the cell
//! colors and the overlay holds the grid lines. Both are resized together
//! and composited into the window frame.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::buffer::{PixelBuffer, CELL_SIZE};
use crate::error::Result;
use crate::layout::Layout;

/// Grid line appearance
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridStyle {
    /// Line width in backing pixels, 0 hides the grid
    pub line_width: u32,
    pub color: [u8; 3],
    pub opacity: f32,
}

impl Default for GridStyle {
    fn default() -> Self {
        GridStyle {
            line_width: 1,
            color: [128, 128, 128],
            opacity: 0.2,
        }
    }
}

impl GridStyle {
    fn rgba(&self) -> [u8; 4] {
        let alpha = (self.opacity.clamp(0.0, 1.0) * 255.0).round() as u8;
        [self.color[0], self.color[1], self.color[2], alpha]
    }
}

/// Board layer plus grid overlay, kept pixel aligned
pub struct Surfaces {
    layout: Option<Layout>,
    board: Vec<u8>,
    overlay: Vec<u8>,
    style: GridStyle,
    background: [u8; 4],
}

/// Cell edge positions along one axis, in backing pixels
fn edges(backing: u32, cells: u32) -> Vec<u32> {
    let cell = backing as f64 / cells as f64;
    (0..=cells)
        .map(|c| ((c as f64 * cell).floor() as u32).min(backing))
        .collect()
}

/// Cell column (or row) covering each backing pixel along one axis
fn cell_lookup(backing: u32, cells: u32) -> Vec<usize> {
    let cell = backing as f64 / cells as f64;
    (0..backing)
        .map(|p| ((p as f64 / cell) as usize).min(cells as usize - 1))
        .collect()
}

impl Surfaces {
    pub fn new(style: GridStyle, background: [u8; 4]) -> Self {
        Surfaces {
            layout: None,
            board: Vec::new(),
            overlay: Vec::new(),
            style,
            background,
        }
    }

    pub fn layout(&self) -> Option<&Layout> {
        self.layout.as_ref()
    }

    pub fn style(&self) -> GridStyle {
        self.style
    }

    pub fn board_layer(&self) -> &[u8] {
        &self.board
    }

    pub fn overlay_layer(&self) -> &[u8] {
        &self.overlay
    }

    /// Resize both layers to `layout`. Contents are discarded, so a full
    /// redraw must follow.
    pub fn resize(&mut self, layout: Layout) {
        let size = layout.backing_width as usize * layout.backing_height as usize * 4;
        self.board = vec![0u8; size];
        self.overlay = vec![0u8; size];
        self.layout = Some(layout);
    }

    /// Fill a single cell's rectangle on the board layer
    pub fn draw_cell(&mut self, buffer: &PixelBuffer, index: usize) -> Result<()> {
        let color = buffer.get(index)?;
        let Some(layout) = self.layout else {
            warn!("cannot draw cell {index}: surfaces not sized");
            return Ok(());
        };

        let (cx, cy) = buffer.coords(index);
        let xs = edges(layout.backing_width, buffer.width());
        let ys = edges(layout.backing_height, buffer.height());
        let (x0, x1) = (xs[cx as usize] as usize, xs[cx as usize + 1] as usize);
        let (y0, y1) = (ys[cy as usize] as usize, ys[cy as usize + 1] as usize);

        let stride = layout.backing_width as usize * 4;
        let pixel = [color.r, color.g, color.b, 255];
        for y in y0..y1 {
            let row = &mut self.board[y * stride..(y + 1) * stride];
            for x in x0..x1 {
                row[x * 4..x * 4 + 4].copy_from_slice(&pixel);
            }
        }
        Ok(())
    }

    /// Redraw every cell of the board layer
    pub fn draw_all(&mut self, buffer: &PixelBuffer) {
        let Some(layout) = self.layout else {
            warn!("cannot draw board: surfaces not sized");
            return;
        };
        if layout.backing_width == 0 || layout.backing_height == 0 {
            return;
        }

        let columns = cell_lookup(layout.backing_width, buffer.width());
        let rows = cell_lookup(layout.backing_height, buffer.height());
        let grid_width = buffer.width() as usize;
        let cells = buffer.raw();

        // Parallel row fill
        self.board
            .par_chunks_mut(layout.backing_width as usize * 4)
            .enumerate()
            .for_each(|(y, row)| {
                let row_start = rows[y] * grid_width;
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    let offset = (row_start + columns[x]) * CELL_SIZE;
                    pixel[..3].copy_from_slice(&cells[offset..offset + CELL_SIZE]);
                    pixel[3] = 255;
                }
            });
    }

    /// Clear the overlay and stroke every cell outline
    pub fn draw_grid(&mut self) {
        let Some(layout) = self.layout else {
            warn!("cannot draw grid: surfaces not sized");
            return;
        };
        self.overlay.fill(0);
        if self.style.line_width == 0 || layout.backing_width == 0 || layout.backing_height == 0 {
            return;
        }

        let width = layout.backing_width as usize;
        let height = layout.backing_height as usize;
        let line = self.style.line_width as usize;
        let half = line / 2;
        let color = self.style.rgba();

        let mut on_x = vec![false; width];
        for edge in edges(layout.backing_width, layout.grid_width) {
            let start = (edge as usize)
                .saturating_sub(half)
                .min(width.saturating_sub(line));
            for flag in on_x.iter_mut().skip(start).take(line) {
                *flag = true;
            }
        }
        let mut on_y = vec![false; height];
        for edge in edges(layout.backing_height, layout.grid_height) {
            let start = (edge as usize)
                .saturating_sub(half)
                .min(height.saturating_sub(line));
            for flag in on_y.iter_mut().skip(start).take(line) {
                *flag = true;
            }
        }

        self.overlay
            .par_chunks_mut(width * 4)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, pixel) in row.chunks_exact_mut(4).enumerate() {
                    if on_y[y] || on_x[x] {
                        pixel.copy_from_slice(&color);
                    }
                }
            });
    }

    /// Change the grid line width and redraw the overlay
    pub fn set_grid(&mut self, line_width: u32) {
        self.style.line_width = line_width;
        self.draw_grid();
    }

    /// Change the grid line color and redraw the overlay
    pub fn set_grid_color(&mut self, color: [u8; 3], opacity: f32) {
        self.style.color = color;
        self.style.opacity = opacity;
        self.draw_grid();
    }

    /// Top-left corner of the board when centered in a frame
    pub fn origin(&self, frame_width: u32, frame_height: u32) -> (u32, u32) {
        match self.layout {
            Some(layout) => (
                frame_width.saturating_sub(layout.backing_width) / 2,
                frame_height.saturating_sub(layout.backing_height) / 2,
            ),
            None => (0, 0),
        }
    }

    /// Paint the background, then the board with its grid overlay, into an
    /// RGBA frame
    pub fn compose(&self, frame: &mut [u8], frame_width: u32, frame_height: u32) {
        if frame_width == 0 {
            return;
        }
        let background = self.background;
        let (ox, oy) = self.origin(frame_width, frame_height);
        let (bw, bh) = self
            .layout
            .map(|l| (l.backing_width as usize, l.backing_height as usize))
            .unwrap_or((0, 0));
        let (ox, oy) = (ox as usize, oy as usize);
        let board = &self.board;
        let overlay = &self.overlay;

        frame
            .par_chunks_mut(frame_width as usize * 4)
            .take(frame_height as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for pixel in row.chunks_exact_mut(4) {
                    pixel.copy_from_slice(&background);
                }
                if y < oy || y >= oy + bh {
                    return;
                }
                let src_row = (y - oy) * bw * 4;
                let visible = bw.min((row.len() / 4).saturating_sub(ox));
                for x in 0..visible {
                    let src = src_row + x * 4;
                    let dst = (ox + x) * 4;
                    row[dst..dst + 4].copy_from_slice(&board[src..src + 4]);

                    let alpha = overlay[src + 3];
                    if alpha == 255 {
                        row[dst..dst + 3].copy_from_slice(&overlay[src..src + 3]);
                    } else if alpha > 0 {
                        // Partial transparency - integer blend
                        let inv_alpha = 255 - alpha as u16;
                        for c in 0..3 {
                            row[dst + c] = ((overlay[src + c] as u16 * alpha as u16
                                + row[dst + c] as u16 * inv_alpha)
                                / 255) as u8;
                        }
                    }
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Rgb;
    use crate::paint::PaintEngine;

    fn sized(grid: (u32, u32), size: f64) -> Surfaces {
        let mut surfaces = Surfaces::new(GridStyle::default(), [15, 15, 15, 255]);
        surfaces.resize(Layout::fit(size, size, grid.0, grid.1, 1.0));
        surfaces
    }

    fn pixel(layer: &[u8], width: u32, x: u32, y: u32) -> [u8; 4] {
        let i = ((y * width + x) * 4) as usize;
        [layer[i], layer[i + 1], layer[i + 2], layer[i + 3]]
    }

    #[test]
    fn layers_resize_in_lockstep() {
        let surfaces = sized((20, 10), 400.0);
        let layout = surfaces.layout().unwrap();
        assert_eq!((layout.backing_width, layout.backing_height), (400, 200));
        assert_eq!(surfaces.board_layer().len(), 400 * 200 * 4);
        assert_eq!(surfaces.overlay_layer().len(), surfaces.board_layer().len());
    }

    #[test]
    fn draw_all_fills_cell_rectangles() {
        let mut buffer = PixelBuffer::new(2, 2).unwrap();
        PaintEngine::new()
            .paint(&mut buffer, 3, Rgb::new(10, 20, 30), 1.0)
            .unwrap();
        let mut surfaces = sized((2, 2), 8.0);
        surfaces.draw_all(&buffer);

        assert_eq!(pixel(surfaces.board_layer(), 8, 0, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(surfaces.board_layer(), 8, 3, 3), [255, 255, 255, 255]);
        assert_eq!(pixel(surfaces.board_layer(), 8, 4, 4), [10, 20, 30, 255]);
        assert_eq!(pixel(surfaces.board_layer(), 8, 7, 7), [10, 20, 30, 255]);
    }

    #[test]
    fn draw_cell_touches_only_that_cell() {
        let mut buffer = PixelBuffer::new(2, 2).unwrap();
        let mut surfaces = sized((2, 2), 8.0);
        surfaces.draw_all(&buffer);
        buffer.set(1, Rgb::BLACK).unwrap();
        surfaces.draw_cell(&buffer, 1).unwrap();

        assert_eq!(pixel(surfaces.board_layer(), 8, 4, 0), [0, 0, 0, 255]);
        assert_eq!(pixel(surfaces.board_layer(), 8, 7, 3), [0, 0, 0, 255]);
        assert_eq!(pixel(surfaces.board_layer(), 8, 3, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(surfaces.board_layer(), 8, 4, 4), [255, 255, 255, 255]);
    }

    #[test]
    fn grid_lines_sit_on_cell_edges() {
        let mut surfaces = sized((2, 2), 8.0);
        surfaces.draw_grid();
        let overlay = surfaces.overlay_layer();
        assert_eq!(pixel(overlay, 8, 0, 2), [128, 128, 128, 51]);
        assert_eq!(pixel(overlay, 8, 4, 2), [128, 128, 128, 51]);
        assert_eq!(pixel(overlay, 8, 2, 2), [0, 0, 0, 0]);

        surfaces.set_grid(0);
        assert!(surfaces.overlay_layer().iter().all(|&b| b == 0));
    }

    #[test]
    fn compose_centers_board_over_background() {
        let buffer = PixelBuffer::new(2, 2).unwrap();
        let mut surfaces = sized((2, 2), 4.0);
        surfaces.set_grid(0);
        surfaces.draw_all(&buffer);

        let mut frame = vec![0u8; 8 * 4 * 4];
        surfaces.compose(&mut frame, 8, 4);
        assert_eq!(surfaces.origin(8, 4), (2, 0));
        assert_eq!(pixel(&frame, 8, 0, 0), [15, 15, 15, 255]);
        assert_eq!(pixel(&frame, 8, 2, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&frame, 8, 5, 3), [255, 255, 255, 255]);
        assert_eq!(pixel(&frame, 8, 6, 0), [15, 15, 15, 255]);
    }

    #[test]
    fn compose_tolerates_frame_shorter_than_its_size() {
        let buffer = PixelBuffer::new(2, 2).unwrap();
        let mut surfaces = sized((2, 2), 4.0);
        surfaces.set_grid(0);
        surfaces.draw_all(&buffer);

        // A full 20px row, then a 5px stub that ends before the board starts
        let mut frame = vec![0u8; 25 * 4];
        surfaces.compose(&mut frame, 20, 4);
        assert_eq!(surfaces.origin(20, 4), (8, 0));
        assert_eq!(pixel(&frame, 20, 8, 0), [255, 255, 255, 255]);
        assert_eq!(pixel(&frame, 20, 7, 0), [15, 15, 15, 255]);
        assert_eq!(pixel(&frame, 20, 4, 1), [15, 15, 15, 255]);
    }

    #[test]
    fn compose_blends_grid_overlay() {
        let mut buffer = PixelBuffer::new(1, 1).unwrap();
        buffer.fill(Rgb::BLACK);
        let mut surfaces = Surfaces::new(
            GridStyle {
                line_width: 1,
                color: [255, 255, 255],
                opacity: 0.2,
            },
            [0, 0, 0, 255],
        );
        surfaces.resize(Layout::fit(4.0, 4.0, 1, 1, 1.0));
        surfaces.draw_all(&buffer);
        surfaces.draw_grid();

        let mut frame = vec![0u8; 4 * 4 * 4];
        surfaces.compose(&mut frame, 4, 4);
        assert_eq!(pixel(&frame, 4, 0, 0), [51, 51, 51, 255]);
        assert_eq!(pixel(&frame, 4, 1, 1), [0, 0, 0, 255]);
    }
}
