use crate::AtlasError;

/// Number of glyph cells along each axis of an atlas image.
pub const ATLAS_GRID: i32 = 16;

/// Geometry of a bitmap-font atlas: a single image holding 16x16 equally sized
/// glyph cells, one per byte value.
///
/// The glyph for byte `b` lives in atlas row `b >> 4`, column `b & 0x0F`, so the
/// atlas image is exactly `16 * cell_width` by `16 * cell_height` pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasGeometry {
    cell_size: (i32, i32),
}

impl AtlasGeometry {
    /// Creates the geometry for glyph cells of `cell_width` x `cell_height` pixels.
    ///
    /// # Errors
    /// Returns [`AtlasError::InvalidCellSize`] when either dimension is not positive.
    pub fn new(cell_width: i32, cell_height: i32) -> Result<Self, AtlasError> {
        if cell_width <= 0 || cell_height <= 0 {
            return Err(AtlasError::InvalidCellSize { width: cell_width, height: cell_height });
        }

        Ok(Self { cell_size: (cell_width, cell_height) })
    }

    /// Width and height of one glyph cell in pixels.
    pub fn cell_size(&self) -> (i32, i32) {
        self.cell_size
    }

    /// Width and height of the whole atlas image in pixels.
    pub fn atlas_size(&self) -> (i32, i32) {
        (self.cell_size.0 * ATLAS_GRID, self.cell_size.1 * ATLAS_GRID)
    }

    /// Calculates how many columns and rows of cells fit in the given viewport.
    ///
    /// Partial trailing cells are truncated away.
    ///
    /// # Returns
    /// A tuple of (columns, rows)
    pub fn grid_size(&self, viewport_width: u32, viewport_height: u32) -> (i32, i32) {
        (
            (viewport_width / self.cell_size.0 as u32) as i32,
            (viewport_height / self.cell_size.1 as u32) as i32,
        )
    }

    /// Normalized texture rectangle of an atlas cell.
    pub fn tex_rect(&self, cell: AtlasCell) -> TexRect {
        let (cell_w, cell_h) = (self.cell_size.0 as f32, self.cell_size.1 as f32);
        let (atlas_w, atlas_h) = (self.atlas_size().0 as f32, self.atlas_size().1 as f32);

        let left = cell.col as f32 * cell_w / atlas_w;
        let top = cell.row as f32 * cell_h / atlas_h;

        TexRect {
            left,
            right: left + cell_w / atlas_w,
            top,
            bottom: top + cell_h / atlas_h,
        }
    }

    /// Checks that an image of `width` x `height` pixels is a 16x16 grid of cells
    /// of this geometry's size.
    ///
    /// # Errors
    /// Returns [`AtlasError::DimensionMismatch`] when the image size differs.
    pub fn validate_image(&self, width: u32, height: u32) -> Result<(), AtlasError> {
        let expected = self.atlas_size();
        let actual = (width as i32, height as i32);
        if expected != actual {
            return Err(AtlasError::DimensionMismatch { expected, actual });
        }

        Ok(())
    }
}

/// Row and column of a glyph inside the 16x16 atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtlasCell {
    /// Atlas row, `0..16`
    pub row: u8,
    /// Atlas column, `0..16`
    pub col: u8,
}

impl AtlasCell {
    /// Resolves the atlas cell of a character code.
    ///
    /// Only the low byte of `code` is used: codes above 255 are truncated rather
    /// than rejected, so `0x141` lands on the same cell as `0x41`.
    pub fn from_code(code: u32) -> Self {
        let byte = code as u8;
        Self { row: byte >> 4, col: byte & 0x0F }
    }

    /// Resolves the atlas cell of a `char`, with the same byte truncation as
    /// [`AtlasCell::from_code`].
    pub fn from_char(ch: char) -> Self {
        Self::from_code(ch as u32)
    }
}

/// Normalized texture coordinates of a rectangle within a texture.
///
/// `top` is the smaller `v` coordinate: image row 0 maps to `v = 0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexRect {
    /// Left edge `u`
    pub left: f32,
    /// Right edge `u`
    pub right: f32,
    /// Top edge `v`
    pub top: f32,
    /// Bottom edge `v`
    pub bottom: f32,
}

impl TexRect {
    /// The whole texture, `0..1` on both axes.
    pub const FULL: TexRect = TexRect { left: 0.0, right: 1.0, top: 0.0, bottom: 1.0 };
}
