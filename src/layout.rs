use crate::coords::SurfaceGeometry;

/// Placement of a grid inside a display box
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub grid_width: u32,
    pub grid_height: u32,
    /// Display units per cell, identical on both axes
    pub cell_size: u32,
    pub display_width: u32,
    pub display_height: u32,
    pub backing_width: u32,
    pub backing_height: u32,
    pub device_pixel_ratio: f64,
}

impl Layout {
    /// Largest undistorted fit of a `grid_width` x `grid_height` grid inside
    /// a `box_width` x `box_height` box.
    ///
    /// The cell size is a whole number of display units (at least one) so
    /// every cell edge lands on a pixel boundary.
    pub fn fit(
        box_width: f64,
        box_height: f64,
        grid_width: u32,
        grid_height: u32,
        device_pixel_ratio: f64,
    ) -> Self {
        let grid_width = grid_width.max(1);
        let grid_height = grid_height.max(1);
        let dpr = if device_pixel_ratio.is_finite() && device_pixel_ratio > 0.0 {
            device_pixel_ratio
        } else {
            1.0
        };

        let raw_cell_width = box_width / grid_width as f64;
        let raw_cell_height = box_height / grid_height as f64;
        let scale = raw_cell_width.min(raw_cell_height);
        let cell_size = if scale.is_finite() {
            (scale.floor() as u32).max(1)
        } else {
            1
        };
        // Keep the display size representable
        let cell_size = cell_size.min(u32::MAX / grid_width.max(grid_height));

        let display_width = cell_size * grid_width;
        let display_height = cell_size * grid_height;

        Layout {
            grid_width,
            grid_height,
            cell_size,
            display_width,
            display_height,
            backing_width: (display_width as f64 * dpr).floor() as u32,
            backing_height: (display_height as f64 * dpr).floor() as u32,
            device_pixel_ratio: dpr,
        }
    }

    /// Geometry for mapping pointer positions onto this layout
    pub fn geometry(&self) -> SurfaceGeometry {
        SurfaceGeometry {
            display_width: self.display_width as f64,
            display_height: self.display_height as f64,
            backing_width: self.backing_width,
            backing_height: self.backing_height,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn huge_box_saturates_instead_of_overflowing() {
        let layout = Layout::fit(1e12, 1e12, 20, 20, 1.0);
        assert_eq!(layout.cell_size, u32::MAX / 20);
        assert_eq!(layout.display_width, layout.cell_size * 20);
        assert_eq!(layout.backing_width, layout.display_width);

        let layout = Layout::fit(1e12, 1e12, 20, 20, 3.0);
        assert_eq!(layout.backing_width, u32::MAX);
    }

    #[test]
    fn fills_tighter_axis() {
        // Height is the limiting axis: 600 / 20 = 30 < 1000 / 20 = 50
        let layout = Layout::fit(1000.0, 600.0, 20, 20, 1.0);
        assert_eq!(layout.cell_size, 30);
        assert_eq!((layout.display_width, layout.display_height), (600, 600));

        // Width is the limiting axis
        let layout = Layout::fit(300.0, 900.0, 10, 5, 1.0);
        assert_eq!(layout.cell_size, 30);
        assert_eq!((layout.display_width, layout.display_height), (300, 150));
    }

    #[test]
    fn preserves_aspect_ratio() {
        let layout = Layout::fit(1024.0, 768.0, 64, 32, 1.0);
        assert_eq!(layout.display_width, layout.display_height * 2);
    }

    #[test]
    fn backing_size_scales_with_pixel_ratio() {
        let layout = Layout::fit(400.0, 400.0, 20, 20, 1.5);
        assert_eq!((layout.display_width, layout.display_height), (400, 400));
        assert_eq!((layout.backing_width, layout.backing_height), (600, 600));

        let geometry = layout.geometry();
        assert_eq!(geometry.display_width, 400.0);
        assert_eq!(geometry.backing_width, 600);
    }

    #[test]
    fn tiny_box_keeps_one_unit_cells() {
        let layout = Layout::fit(5.0, 5.0, 20, 20, 1.0);
        assert_eq!(layout.cell_size, 1);
        assert_eq!(layout.display_width, 20);
    }

    #[test]
    fn invalid_pixel_ratio_falls_back_to_one() {
        let layout = Layout::fit(100.0, 100.0, 10, 10, 0.0);
        assert_eq!(layout.device_pixel_ratio, 1.0);
        assert_eq!(layout.backing_width, 100);
    }
}
