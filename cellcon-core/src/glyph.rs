use cellcon_data::{AtlasCell, AtlasGeometry, Color};
use tracing::{debug, warn};

use crate::{
    backend::{LoadedTexture, TextureHandle},
    quad::Quad,
    viewport::Grid,
};

/// Unit of the coordinates handed to [`GlyphAtlas::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Unit {
    /// Grid cells; multiplied by the cell size to get pixels.
    #[default]
    Cell,
    /// Pixels, used as-is.
    Pixel,
}

/// A bitmap font stored as a 16x16 grid of glyph cells in a single texture.
///
/// Immutable after construction. The atlas holds no grid state of its own:
/// the current [`Grid`] is passed to every lookup, so a resize can never leave
/// an atlas with stale row/column counts.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphAtlas {
    texture: TextureHandle,
    geometry: AtlasGeometry,
}

impl GlyphAtlas {
    /// Wraps a loaded atlas texture.
    ///
    /// A texture that is not exactly a 16x16 grid of `geometry`-sized cells is
    /// accepted, but renders incorrectly; the mismatch is logged.
    pub fn new(texture: LoadedTexture, geometry: AtlasGeometry) -> Self {
        match geometry.validate_image(texture.width, texture.height) {
            Ok(()) => debug!(
                texture = texture.handle.id(),
                width = texture.width,
                height = texture.height,
                "glyph atlas loaded"
            ),
            Err(e) => warn!(texture = texture.handle.id(), "glyph atlas misaligned: {e}"),
        }

        Self { texture: texture.handle, geometry }
    }

    /// The atlas texture glyph quads are drawn with.
    pub fn texture(&self) -> TextureHandle {
        self.texture
    }

    /// Cell size and layout of the atlas.
    pub fn geometry(&self) -> &AtlasGeometry {
        &self.geometry
    }

    /// Maps a character code at a cell position to a textured quad.
    ///
    /// Returns `None` when `(x, y)` falls outside `grid`; the bounds check runs
    /// on the unflipped row. Rows are then flipped (`rows - 1 - y`) because the
    /// projection's origin is the bottom-left corner. In [`Unit::Cell`] mode the
    /// coordinates are scaled by the cell size, in [`Unit::Pixel`] mode they are
    /// used directly.
    ///
    /// Only the low byte of `code` selects the glyph; see [`AtlasCell::from_code`].
    pub fn locate(&self, code: u32, x: f32, y: f32, grid: Grid, unit: Unit) -> Option<Quad> {
        if !grid.contains(x, y) {
            return None;
        }

        let y = (grid.rows - 1) as f32 - y;

        let (cell_w, cell_h) = self.cell_size_f32();
        let (px, py) = match unit {
            Unit::Cell => (x * cell_w, y * cell_h),
            Unit::Pixel => (x, y),
        };

        let tex = self.geometry.tex_rect(AtlasCell::from_code(code));
        Some(Quad::new(px, py, cell_w, cell_h, tex))
    }

    /// Lays out `text` starting at `(row, col)`, advancing the column by one
    /// per character, and yields a colored quad for every glyph inside `grid`.
    ///
    /// The advance is one in both units, so in [`Unit::Pixel`] mode successive
    /// glyphs start one pixel apart and overlap.
    pub fn glyph_run<'a>(
        &'a self,
        text: &'a str,
        row: f32,
        col: f32,
        colors: (Color, Color),
        grid: Grid,
        unit: Unit,
    ) -> impl Iterator<Item = Quad> + 'a {
        let (fg, bg) = colors;

        text.chars()
            .enumerate()
            .filter_map(move |(i, ch)| {
                let x = col + i as f32;
                self.locate(ch as u32, x, row, grid, unit)
            })
            .map(move |quad| quad.with_colors(fg, bg))
    }

    fn cell_size_f32(&self) -> (f32, f32) {
        let (w, h) = self.geometry.cell_size();
        (w as f32, h as f32)
    }
}
