use cellcon_data::{AtlasGeometry, Color, PixelImage};
use tracing::debug;

use crate::{
    backend::{LoadedTexture, RenderBackend, TextureHandle, TextureLoader},
    compositor::{Frame, FrameState, FrameStats},
    error::Error,
    glyph::GlyphAtlas,
    position::CellPos,
    quad::Quad,
    sprite::{Sprite, SpriteId, SpriteList},
    text::{TextBuffer, TextCell},
    viewport::{Grid, Viewport},
};

/// Configuration for a [`Console`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConsoleConfig {
    /// Glyph cell width and height in pixels
    pub cell_size: (i32, i32),
    /// Color the surface is cleared to at the start of every frame
    pub clear_color: Color,
    /// Foreground used by [`Console::write`]
    pub default_fg: Color,
    /// Background used by [`Console::write`]
    pub default_bg: Color,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            cell_size: (16, 16),
            clear_color: Color::BLACK,
            default_fg: Color::WHITE,
            default_bg: Color::BLACK,
        }
    }
}

impl ConsoleConfig {
    /// Sets the glyph cell size in pixels.
    #[must_use]
    pub fn with_cell_size(mut self, width: i32, height: i32) -> Self {
        self.cell_size = (width, height);
        self
    }

    /// Sets the color the surface is cleared to each frame.
    #[must_use]
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Sets the colors used by [`Console::write`].
    #[must_use]
    pub fn with_default_colors(mut self, fg: Color, bg: Color) -> Self {
        self.default_fg = fg;
        self.default_bg = bg;
        self
    }
}

/// A character-grid console: buffered text rendered from a 16x16 bitmap-font
/// atlas, with freely positioned sprites layered on top.
///
/// The host drives it with [`Console::on_resize`] and
/// [`Console::render_frame`], and mutates content between frames through
/// [`Console::write`], [`Console::add_sprite`] and [`Console::sprite_mut`].
/// All access is single-threaded; resizes must be applied between frames.
#[derive(Debug)]
pub struct Console {
    pub(crate) config: ConsoleConfig,
    pub(crate) atlas: GlyphAtlas,
    pub(crate) viewport: Viewport,
    pub(crate) text: TextBuffer,
    pub(crate) sprites: SpriteList,
    pub(crate) state: FrameState,
    /// Reused per-frame quad storage
    pub(crate) glyph_scratch: Vec<Quad>,
    pub(crate) sprite_scratch: Vec<(TextureHandle, Quad)>,
}

impl Console {
    /// Creates a console around an already loaded atlas texture.
    ///
    /// # Errors
    /// Returns an error if the configured cell size is not positive.
    pub fn new(
        config: ConsoleConfig,
        atlas_texture: LoadedTexture,
        viewport_size: (u32, u32),
    ) -> Result<Self, Error> {
        let geometry = AtlasGeometry::new(config.cell_size.0, config.cell_size.1)?;
        let atlas = GlyphAtlas::new(atlas_texture, geometry);
        let viewport = Viewport::new(&geometry, viewport_size.0, viewport_size.1);

        Ok(Self {
            config,
            atlas,
            viewport,
            text: TextBuffer::new(),
            sprites: SpriteList::new(),
            state: FrameState::Idle,
            glyph_scratch: Vec::new(),
            sprite_scratch: Vec::new(),
        })
    }

    /// Uploads the atlas image through `loader` and creates the console.
    ///
    /// # Errors
    /// Fails if the atlas texture cannot be created; there is no fallback font.
    pub fn load<L: TextureLoader>(
        config: ConsoleConfig,
        loader: &mut L,
        atlas_image: &PixelImage,
        viewport_size: (u32, u32),
    ) -> Result<Self, Error> {
        let texture = loader.load_texture(atlas_image)?;
        Self::new(config, texture, viewport_size)
    }

    /// The configuration this console was created with.
    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    /// The glyph atlas text is drawn from.
    pub fn atlas(&self) -> &GlyphAtlas {
        &self.atlas
    }

    /// Surface size, grid capacity and projection.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current row and column capacity.
    pub fn grid(&self) -> Grid {
        self.viewport.grid()
    }

    /// Whether a frame is currently open.
    pub fn frame_state(&self) -> FrameState {
        self.state
    }

    /// Writes `text` at `(row, col)` in the default colors.
    ///
    /// See [`Console::write_colored`].
    pub fn write(&mut self, row: i32, col: i32, text: &str) {
        let (fg, bg) = (self.config.default_fg, self.config.default_bg);
        self.write_colored(row, col, text, fg, bg);
    }

    /// Writes `text` at `(row, col)`, replacing any text anchored there.
    ///
    /// Positions outside the grid are accepted and produce no output until
    /// a resize brings them into view.
    pub fn write_colored(&mut self, row: i32, col: i32, text: &str, fg: Color, bg: Color) {
        self.text.upsert(CellPos::new(row, col), text, fg, bg);
    }

    /// Returns the text anchored at `(row, col)`.
    pub fn text_at(&self, row: i32, col: i32) -> Option<&TextCell> {
        self.text.get(CellPos::new(row, col))
    }

    /// Moves the text anchored at `from` to `to`, replacing any text already
    /// anchored at `to`. Returns false if nothing is anchored at `from`.
    pub fn move_text(&mut self, from: impl Into<CellPos>, to: impl Into<CellPos>) -> bool {
        self.text.relocate(from.into(), to.into())
    }

    /// All buffered text entries.
    pub fn text(&self) -> &TextBuffer {
        &self.text
    }

    /// Adds a `width` x `height` sprite with its bottom-left corner at `(x, y)`.
    pub fn add_sprite(
        &mut self,
        texture: TextureHandle,
        width: i32,
        height: i32,
        x: i32,
        y: i32,
    ) -> SpriteId {
        let id = self.sprites.add(texture, width, height, x, y);
        debug!(texture = texture.id(), width, height, x, y, "sprite added");
        id
    }

    /// Returns the sprite behind `id`, if it belongs to this console.
    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(id)
    }

    /// Mutable access to a sprite, e.g. to move it between frames.
    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(id)
    }

    /// All sprites, in draw order.
    pub fn sprites(&self) -> &SpriteList {
        &self.sprites
    }

    /// Applies a new surface size: recomputes grid capacity and projection.
    ///
    /// # Errors
    /// Returns an error if called while a frame is being rendered.
    pub fn on_resize(&mut self, width: u32, height: u32) -> Result<(), Error> {
        if self.state == FrameState::Rendering {
            return Err(Error::frame_in_progress());
        }

        let geometry = *self.atlas.geometry();
        self.viewport.resize(&geometry, width, height);
        Ok(())
    }

    /// Renders one frame: clear, all text, then all sprites, then present.
    ///
    /// # Errors
    /// Returns an error if a frame is already open or presentation fails.
    pub fn render_frame<B: RenderBackend>(
        &mut self,
        backend: &mut B,
    ) -> Result<FrameStats, Error> {
        let mut frame = self.begin_frame(backend)?;
        frame.draw_text_layer();
        frame.draw_sprite_layer();
        frame.present()
    }

    /// Opens a frame for custom composition; the surface is cleared.
    ///
    /// # Errors
    /// Returns an error if a frame is already open.
    pub fn begin_frame<'a, B: RenderBackend>(
        &'a mut self,
        backend: &'a mut B,
    ) -> Result<Frame<'a, B>, Error> {
        Frame::begin(self, backend)
    }
}
