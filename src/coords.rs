/// Size of a rendering surface: its displayed (logical) size and its
/// backing resolution in physical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceGeometry {
    pub display_width: f64,
    pub display_height: f64,
    pub backing_width: u32,
    pub backing_height: u32,
}

impl SurfaceGeometry {
    /// Surface displayed at its backing size
    pub fn unscaled(width: u32, height: u32) -> Self {
        SurfaceGeometry {
            display_width: width as f64,
            display_height: height as f64,
            backing_width: width,
            backing_height: height,
        }
    }
}

/// Map a point in display units to the cell under it.
///
/// Returns `None` when the point lies outside the grid.
pub fn index_from_point(
    px: f64,
    py: f64,
    geometry: &SurfaceGeometry,
    grid_width: u32,
    grid_height: u32,
) -> Option<usize> {
    if !px.is_finite() || !py.is_finite() {
        return None;
    }
    if geometry.display_width <= 0.0
        || geometry.display_height <= 0.0
        || geometry.backing_width == 0
        || geometry.backing_height == 0
        || grid_width == 0
        || grid_height == 0
    {
        return None;
    }

    let scale_x = geometry.backing_width as f64 / geometry.display_width;
    let scale_y = geometry.backing_height as f64 / geometry.display_height;

    let cell_width = geometry.backing_width as f64 / grid_width as f64;
    let cell_height = geometry.backing_height as f64 / grid_height as f64;

    let cx = ((px * scale_x) / cell_width).floor();
    let cy = ((py * scale_y) / cell_height).floor();

    if cx < 0.0 || cx >= grid_width as f64 || cy < 0.0 || cy >= grid_height as f64 {
        return None;
    }

    Some(cy as usize * grid_width as usize + cx as usize)
}

/// [`index_from_point`] with `-1` standing in for "no cell"
pub fn index_from_point_raw(
    px: f64,
    py: f64,
    geometry: &SurfaceGeometry,
    grid_width: u32,
    grid_height: u32,
) -> i64 {
    index_from_point(px, py, geometry, grid_width, grid_height).map_or(-1, |i| i as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_corners_of_unscaled_surface() {
        let geometry = SurfaceGeometry::unscaled(400, 400);
        assert_eq!(index_from_point(0.0, 0.0, &geometry, 20, 20), Some(0));
        assert_eq!(index_from_point(399.0, 399.0, &geometry, 20, 20), Some(399));
        assert_eq!(index_from_point(25.0, 19.9, &geometry, 20, 20), Some(1));
        assert_eq!(index_from_point(0.0, 20.0, &geometry, 20, 20), Some(20));
    }

    #[test]
    fn outside_points_map_to_sentinel() {
        let geometry = SurfaceGeometry::unscaled(400, 400);
        assert_eq!(index_from_point_raw(400.0, 400.0, &geometry, 20, 20), -1);
        assert_eq!(index_from_point_raw(-1.0, 10.0, &geometry, 20, 20), -1);
        assert_eq!(index_from_point_raw(10.0, -0.5, &geometry, 20, 20), -1);
        assert_eq!(index_from_point_raw(399.0, 399.0, &geometry, 20, 20), 399);
    }

    #[test]
    fn accounts_for_display_scaling() {
        // 2x device pixels: 200x100 logical over 400x200 physical
        let geometry = SurfaceGeometry {
            display_width: 200.0,
            display_height: 100.0,
            backing_width: 400,
            backing_height: 200,
        };
        assert_eq!(index_from_point(199.0, 99.0, &geometry, 4, 2), Some(7));
        assert_eq!(index_from_point(50.0, 0.0, &geometry, 4, 2), Some(1));
        assert_eq!(index_from_point(200.0, 0.0, &geometry, 4, 2), None);
    }

    #[test]
    fn non_square_grid_uses_row_major_index() {
        let geometry = SurfaceGeometry::unscaled(30, 20);
        assert_eq!(index_from_point(25.0, 15.0, &geometry, 3, 2), Some(5));
    }

    #[test]
    fn degenerate_geometry_maps_nowhere() {
        let geometry = SurfaceGeometry::unscaled(0, 0);
        assert_eq!(index_from_point(0.0, 0.0, &geometry, 20, 20), None);
        let geometry = SurfaceGeometry::unscaled(10, 10);
        assert_eq!(index_from_point(f64::NAN, 0.0, &geometry, 2, 2), None);
    }
}
