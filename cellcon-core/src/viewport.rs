use cellcon_data::AtlasGeometry;
use tracing::debug;

use crate::mat4::Mat4;

/// Row and column capacity of the output surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Grid {
    /// Columns that fit the surface width
    pub cols: i32,
    /// Rows that fit the surface height
    pub rows: i32,
}

impl Grid {
    /// A grid of `cols` x `rows` cells.
    pub fn new(cols: i32, rows: i32) -> Self {
        Self { cols, rows }
    }

    /// Returns true if the cell at column `x`, row `y` lies within the grid.
    ///
    /// Coordinates may be fractional; a cell is inside when
    /// `0 <= x <= cols - 1` and `0 <= y <= rows - 1`.
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= 0.0 && y >= 0.0 && x <= (self.cols - 1) as f32 && y <= (self.rows - 1) as f32
    }
}

/// Viewport state: the surface size, the derived grid and the pixel-space
/// projection. Recomputed as a whole on every resize so the grid never lags
/// behind the surface.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    size: (u32, u32),
    grid: Grid,
    projection: Mat4,
}

impl Viewport {
    /// Creates the viewport state for a surface of `width` x `height` pixels.
    pub fn new(geometry: &AtlasGeometry, width: u32, height: u32) -> Self {
        let mut viewport = Self {
            size: (0, 0),
            grid: Grid::default(),
            projection: Mat4::IDENTITY,
        };
        viewport.resize(geometry, width, height);
        viewport
    }

    /// Recomputes grid capacity and projection for a new surface size.
    ///
    /// `rows = height / cell_height` and `cols = width / cell_width`, truncating;
    /// partial trailing cells are clipped. Returns true if the grid changed.
    ///
    /// A zero width or height (a minimized window) empties the grid but keeps
    /// the previous projection, which would otherwise divide by zero.
    pub fn resize(&mut self, geometry: &AtlasGeometry, width: u32, height: u32) -> bool {
        let (cols, rows) = geometry.grid_size(width, height);
        let grid = Grid::new(cols, rows);
        let grid_changed = grid != self.grid;

        self.size = (width, height);
        self.grid = grid;
        if width > 0 && height > 0 {
            self.projection = Mat4::orthographic_from_size(width as f32, height as f32);
        }

        debug!(width, height, cols, rows, "viewport resized");
        grid_changed
    }

    /// Surface width and height in pixels.
    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Rows and columns that fit the surface.
    pub fn grid(&self) -> Grid {
        self.grid
    }

    /// Projection mapping pixel space onto the surface, origin bottom-left.
    pub fn projection(&self) -> &Mat4 {
        &self.projection
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn font_16() -> AtlasGeometry {
        AtlasGeometry::new(16, 16).unwrap()
    }

    #[test]
    fn test_resize_recomputes_grid() {
        let geometry = font_16();
        let mut viewport = Viewport::new(&geometry, 640, 400);
        assert_eq!(viewport.grid(), Grid::new(40, 25));

        assert!(viewport.resize(&geometry, 320, 200));
        assert_eq!(viewport.grid(), Grid::new(20, 12));
        assert_eq!(viewport.size(), (320, 200));
    }

    #[test]
    fn test_resize_truncates_partial_cells() {
        let geometry = font_16();
        let viewport = Viewport::new(&geometry, 640, 399);
        assert_eq!(viewport.grid().rows, 24);

        let viewport = Viewport::new(&geometry, 720, 400);
        assert_eq!(viewport.grid(), Grid::new(45, 25));
    }

    #[test]
    fn test_resize_without_grid_change() {
        let geometry = font_16();
        let mut viewport = Viewport::new(&geometry, 640, 400);

        assert!(!viewport.resize(&geometry, 650, 410));
        assert_eq!(viewport.size(), (650, 410));
        assert_eq!(viewport.projection(), &Mat4::orthographic_from_size(650.0, 410.0));
    }

    #[test]
    fn test_resize_to_zero_keeps_projection() {
        let geometry = font_16();
        let mut viewport = Viewport::new(&geometry, 640, 400);
        let projection = *viewport.projection();

        assert!(viewport.resize(&geometry, 0, 0));
        assert_eq!(viewport.grid(), Grid::new(0, 0));
        assert_eq!(viewport.size(), (0, 0));
        assert_eq!(viewport.projection(), &projection);
        assert!(viewport.projection().data.iter().all(|v| v.is_finite()));

        viewport.resize(&geometry, 640, 0);
        assert_eq!(viewport.grid(), Grid::new(40, 0));
        assert_eq!(viewport.projection(), &projection);
    }

    #[test]
    fn test_grid_contains() {
        let grid = Grid::new(45, 25);
        assert!(grid.contains(0.0, 0.0));
        assert!(grid.contains(44.0, 24.0));
        assert!(!grid.contains(45.0, 0.0));
        assert!(!grid.contains(0.0, 25.0));
        assert!(!grid.contains(-1.0, 0.0));
        assert!(!grid.contains(0.0, -0.5));

        assert!(!Grid::default().contains(0.0, 0.0));
    }
}
