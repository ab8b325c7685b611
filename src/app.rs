use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow};
use winit::keyboard::{KeyCode, ModifiersState, PhysicalKey};
use winit::window::{Window, WindowId};

use pixboard::autosave::Autosave;
use pixboard::config::Config;
use pixboard::render::Surfaces;
use pixboard::store::Persistable;
use pixboard::swatches::Swatches;
use pixboard::{index_from_point, Board, Layout, Redraw};

/// Window, input and persistence around one board
pub struct App {
    window: Option<Arc<Window>>,
    pixels: Option<Pixels<'static>>,
    board: Board,
    surfaces: Surfaces,
    swatches: Persistable<Swatches>,
    saved_board: Persistable<String>,
    config: Config,
    mouse_down: bool,
    cursor_pos: (f64, f64), // physical pixels
    render_width: u32,
    render_height: u32,
    modifiers: ModifiersState,
    autosave: Autosave,
}

impl App {
    pub fn new(
        board: Board,
        swatches: Persistable<Swatches>,
        saved_board: Persistable<String>,
        config: Config,
    ) -> Self {
        App {
            window: None,
            pixels: None,
            board,
            surfaces: Surfaces::new(config.grid, config.background),
            swatches,
            saved_board,
            render_width: config.window_width,
            render_height: config.window_height,
            mouse_down: false,
            cursor_pos: (0.0, 0.0),
            modifiers: ModifiersState::empty(),
            autosave: Autosave::new(Duration::from_secs(config.autosave_secs), Instant::now()),
            config,
        }
    }

    fn title(&self) -> String {
        format!("pixboard - {}x{}", self.board.width(), self.board.height())
    }

    fn request_redraw(&self) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    /// Fit both surfaces to the current window and schedule a full redraw
    fn relayout(&mut self) {
        let scale = self
            .window
            .as_ref()
            .map(|w| w.scale_factor())
            .unwrap_or(1.0);
        let layout = Layout::fit(
            self.render_width as f64 / scale,
            self.render_height as f64 / scale,
            self.board.width(),
            self.board.height(),
            scale,
        );
        debug!(
            "layout: {} units per cell, {}x{} backing",
            layout.cell_size, layout.backing_width, layout.backing_height
        );
        self.surfaces.resize(layout);
        self.surfaces.draw_grid();
        self.board.invalidate();
        self.request_redraw();
    }

    /// Paint the selected swatch into the cell under the cursor
    fn paint_at_cursor(&mut self) {
        let Some(layout) = self.surfaces.layout().copied() else {
            return;
        };
        let Some(swatch) = self.swatches.get().current() else {
            return;
        };

        let (ox, oy) = self.surfaces.origin(self.render_width, self.render_height);
        let scale = layout.device_pixel_ratio;
        let px = (self.cursor_pos.0 - ox as f64) / scale;
        let py = (self.cursor_pos.1 - oy as f64) / scale;

        let Some(index) = index_from_point(
            px,
            py,
            &layout.geometry(),
            self.board.width(),
            self.board.height(),
        ) else {
            return;
        };

        match self.board.paint(index, swatch.rgb(), swatch.a) {
            Ok(Some(action)) => {
                trace!(?action, "painted");
                self.autosave.mark_dirty();
                self.request_redraw();
            }
            Ok(None) => {}
            Err(e) => error!("paint error: {e}"),
        }
    }

    fn save(&mut self) {
        let result = self.saved_board.set(self.board.encode());
        match &result {
            Ok(()) => info!("board saved"),
            Err(e) => error!("save error: {e}"),
        }
        self.autosave.saved(result.is_ok(), Instant::now());
    }

    fn select_swatch(&mut self, index: usize) {
        if let Err(e) = self.swatches.update(|s| s.select(Some(index))) {
            error!("could not store swatch selection: {e}");
        }
        match self.swatches.get().current() {
            Some(swatch) => info!("swatch {index}: {:?}", swatch),
            None => info!("no swatch {index}"),
        }
    }

    fn import_file(&mut self, path: &Path) {
        let encoded = match fs::read_to_string(path) {
            Ok(encoded) => encoded,
            Err(e) => {
                error!("could not read {}: {e}", path.display());
                return;
            }
        };
        if let Err(e) = self.board.import(&encoded) {
            error!("could not import {}: {e}", path.display());
            return;
        }
        if let Some(window) = &self.window {
            window.set_title(&self.title());
        }
        self.autosave.mark_dirty();
        self.relayout();
    }

    fn redraw(&mut self) {
        match self.board.take_redraw() {
            Redraw::None => {}
            Redraw::Cells(cells) => {
                for index in cells {
                    if let Err(e) = self.surfaces.draw_cell(self.board.buffer(), index) {
                        error!("draw error: {e}");
                    }
                }
            }
            Redraw::Full => self.surfaces.draw_all(self.board.buffer()),
        }

        if let Some(pixels) = &mut self.pixels {
            self.surfaces
                .compose(pixels.frame_mut(), self.render_width, self.render_height);
            if let Err(e) = pixels.render() {
                error!("render error: {e}");
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.pixels.is_some() {
            return;
        }

        let window_attrs = Window::default_attributes()
            .with_title(self.title())
            .with_inner_size(winit::dpi::LogicalSize::new(
                self.config.window_width,
                self.config.window_height,
            ));
        let window = match event_loop.create_window(window_attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("could not create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, Arc::clone(&window));
        let pixels = match Pixels::new(size.width, size.height, surface_texture) {
            Ok(pixels) => pixels,
            Err(e) => {
                error!("could not create pixel surface: {e}");
                event_loop.exit();
                return;
            }
        };

        self.render_width = size.width;
        self.render_height = size.height;
        self.window = Some(window);
        self.pixels = Some(pixels);
        self.relayout();
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                info!("closing pixboard");
                self.save();
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if new_size.width == 0 || new_size.height == 0 {
                    return;
                }
                if let Some(pixels) = &mut self.pixels {
                    if let Err(e) = pixels.resize_surface(new_size.width, new_size.height) {
                        error!("failed to resize surface: {e}");
                    }
                    // The frame keeps its old size when this fails
                    if let Err(e) = pixels.resize_buffer(new_size.width, new_size.height) {
                        error!("failed to resize buffer: {e}");
                        return;
                    }
                }
                self.render_width = new_size.width;
                self.render_height = new_size.height;
                self.relayout();
            }

            WindowEvent::ScaleFactorChanged { .. } => self.relayout(),

            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.modifiers = new_modifiers.state();
            }

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => match state {
                ElementState::Pressed => {
                    self.mouse_down = true;
                    self.paint_at_cursor();
                }
                ElementState::Released => self.mouse_down = false,
            },

            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_pos = (position.x, position.y);
                if self.mouse_down {
                    self.paint_at_cursor();
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed {
                    return;
                }
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return;
                };
                match keycode {
                    KeyCode::Escape => {
                        self.save();
                        event_loop.exit();
                    }
                    KeyCode::Digit1 => self.select_swatch(0),
                    KeyCode::Digit2 => self.select_swatch(1),
                    KeyCode::Digit3 => self.select_swatch(2),
                    KeyCode::Digit4 => self.select_swatch(3),
                    KeyCode::Digit5 => self.select_swatch(4),
                    KeyCode::Digit6 => self.select_swatch(5),
                    KeyCode::Digit7 => self.select_swatch(6),
                    KeyCode::Digit8 => self.select_swatch(7),
                    KeyCode::Digit9 => self.select_swatch(8),
                    KeyCode::Digit0 => self.select_swatch(9),
                    KeyCode::KeyG => {
                        let width = if self.surfaces.style().line_width == 0 {
                            self.config.grid.line_width.max(1)
                        } else {
                            0
                        };
                        self.surfaces.set_grid(width);
                        self.request_redraw();
                    }
                    KeyCode::KeyC => {
                        self.board.clear();
                        self.autosave.mark_dirty();
                        self.request_redraw();
                    }
                    KeyCode::KeyP => self.save(),
                    KeyCode::KeyS if self.modifiers.control_key() => self.save(),
                    KeyCode::KeyE if self.modifiers.control_key() => {
                        // Share string goes to stdout so it can be piped
                        println!("{}", self.board.encode());
                    }
                    _ => {}
                }
            }

            WindowEvent::DroppedFile(path) => self.import_file(&path),

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        // Autosave a changed board, then sleep until the next save is due
        if self.autosave.is_due(Instant::now()) {
            self.save();
        }
        match self.autosave.deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}
