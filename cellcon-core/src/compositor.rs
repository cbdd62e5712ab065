use std::mem;

use cellcon_data::Color;
use tracing::{trace, warn};

use crate::{
    backend::{RenderBackend, TextureHandle},
    console::Console,
    error::Error,
    glyph::Unit,
    quad::Quad,
    sprite::{SpriteDraw, SpriteId},
};

/// Compositor state: between frames, or inside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FrameState {
    /// No frame is open.
    #[default]
    Idle,
    /// A frame has begun and not yet been presented.
    Rendering,
}

/// Counters for a presented frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameStats {
    /// Glyph quads emitted, clipped glyphs excluded
    pub glyph_quads: usize,
    /// Sprite quads emitted, including immediate sprites
    pub sprite_quads: usize,
    /// Calls to [`RenderBackend::draw_quads`]
    pub draw_calls: usize,
}

/// An open frame.
///
/// Created by [`Console::begin_frame`], which clears the surface. Layers are
/// drawn in call order, so text drawn after sprites ends up above them; the
/// regular [`Console::render_frame`] always draws the text layer first.
/// [`Frame::present`] closes the frame. Dropping a frame without presenting
/// abandons it and returns the console to [`FrameState::Idle`].
#[must_use = "a frame must be presented with `Frame::present`"]
pub struct Frame<'a, B: RenderBackend> {
    console: &'a mut Console,
    backend: &'a mut B,
    stats: FrameStats,
    presented: bool,
}

impl<'a, B: RenderBackend> Frame<'a, B> {
    pub(crate) fn begin(console: &'a mut Console, backend: &'a mut B) -> Result<Self, Error> {
        if console.state == FrameState::Rendering {
            return Err(Error::frame_in_progress());
        }

        let (width, height) = console.viewport.size();
        backend.set_viewport(width, height);
        backend.clear(console.config.clear_color);
        console.state = FrameState::Rendering;

        Ok(Self {
            console,
            backend,
            stats: FrameStats::default(),
            presented: false,
        })
    }

    /// Draws every buffered text entry through the glyph atlas.
    pub fn draw_text_layer(&mut self) {
        let console = &mut *self.console;
        let mut quads = mem::take(&mut console.glyph_scratch);
        quads.clear();

        console
            .text
            .draw_all(&console.atlas, console.viewport.grid(), &mut quads);
        let texture = self.console.atlas.texture();
        self.emit(texture, &quads);
        self.stats.glyph_quads += quads.len();

        self.console.glyph_scratch = quads;
    }

    /// Draws `text` immediately, without buffering it.
    ///
    /// `row` and `col` are grid cells in [`Unit::Cell`] mode and pixels in
    /// [`Unit::Pixel`] mode; either may be fractional.
    pub fn draw_text(&mut self, row: f32, col: f32, text: &str, fg: Color, bg: Color, unit: Unit) {
        let console = &mut *self.console;
        let mut quads = mem::take(&mut console.glyph_scratch);
        quads.clear();

        let grid = console.viewport.grid();
        quads.extend(console.atlas.glyph_run(text, row, col, (fg, bg), grid, unit));
        let texture = self.console.atlas.texture();
        self.emit(texture, &quads);
        self.stats.glyph_quads += quads.len();

        self.console.glyph_scratch = quads;
    }

    /// Redraws every sprite at its current position and intrinsic size, in
    /// list order. Consecutive sprites sharing a texture are batched.
    pub fn draw_sprite_layer(&mut self) {
        let mut sprites = mem::take(&mut self.console.sprite_scratch);
        sprites.clear();
        self.console.sprites.draw_all(&mut sprites);

        let mut batch = mem::take(&mut self.console.glyph_scratch);
        for run in sprites.chunk_by(|a, b| a.0 == b.0) {
            batch.clear();
            batch.extend(run.iter().map(|(_, quad)| *quad));
            self.emit(run[0].0, &batch);
        }
        self.stats.sprite_quads += sprites.len();

        self.console.glyph_scratch = batch;
        self.console.sprite_scratch = sprites;
    }

    /// Draws a single sprite immediately, updating its stored position.
    ///
    /// # Errors
    /// Returns an error if `id` does not belong to this console.
    pub fn draw_sprite(&mut self, id: SpriteId, how: SpriteDraw) -> Result<(), Error> {
        let (texture, quad) = self
            .console
            .sprites
            .draw(id, how)
            .ok_or_else(|| Error::unknown_sprite(id.index()))?;

        self.emit(texture, &[quad]);
        self.stats.sprite_quads += 1;
        Ok(())
    }

    /// Presents the frame and returns the console to [`FrameState::Idle`].
    ///
    /// # Errors
    /// Propagates presentation failures from the backend; the frame is
    /// abandoned in that case.
    pub fn present(mut self) -> Result<FrameStats, Error> {
        self.backend.present()?;
        self.presented = true;
        self.console.state = FrameState::Idle;

        trace!(
            glyph_quads = self.stats.glyph_quads,
            sprite_quads = self.stats.sprite_quads,
            draw_calls = self.stats.draw_calls,
            "frame presented"
        );
        Ok(self.stats)
    }

    /// Counters accumulated so far.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }

    fn emit(&mut self, texture: TextureHandle, quads: &[Quad]) {
        if quads.is_empty() {
            return;
        }

        let projection = self.console.viewport.projection();
        self.backend.draw_quads(texture, projection, quads);
        self.stats.draw_calls += 1;
    }
}

impl<B: RenderBackend> Drop for Frame<'_, B> {
    fn drop(&mut self) {
        if !self.presented {
            warn!("frame dropped without being presented");
            self.console.state = FrameState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        backend::LoadedTexture,
        console::ConsoleConfig,
        headless::{Command, RecordingBackend},
        mat4::Mat4,
    };

    const ATLAS: TextureHandle = TextureHandle::new(0);

    fn console(width: u32, height: u32) -> Console {
        let atlas = LoadedTexture { handle: ATLAS, width: 256, height: 256 };
        Console::new(ConsoleConfig::default(), atlas, (width, height)).unwrap()
    }

    #[test]
    fn test_empty_frame_commands() {
        let mut console = console(160, 160);
        let mut backend = RecordingBackend::new();

        let stats = console.render_frame(&mut backend).unwrap();
        assert_eq!(stats, FrameStats::default());
        assert_eq!(backend.commands(), &[
            Command::Viewport { width: 160, height: 160 },
            Command::Clear(Color::BLACK),
            Command::Present,
        ]);
    }

    #[test]
    fn test_text_layer_precedes_sprites() {
        let mut console = console(160, 160);
        let sprite_tex = TextureHandle::new(1);
        console.add_sprite(sprite_tex, 32, 32, 0, 0);
        console.write(0, 0, "A");

        let mut backend = RecordingBackend::new();
        let stats = console.render_frame(&mut backend).unwrap();

        let textures: Vec<_> = backend.draw_calls().map(|(tex, _)| tex).collect();
        assert_eq!(textures, vec![ATLAS, sprite_tex]);
        assert_eq!(stats.glyph_quads, 1);
        assert_eq!(stats.sprite_quads, 1);
        assert_eq!(stats.draw_calls, 2);
        assert!(matches!(backend.commands().last(), Some(Command::Present)));
    }

    #[test]
    fn test_sprites_batched_by_texture_run() {
        let mut console = console(160, 160);
        let (a, b) = (TextureHandle::new(1), TextureHandle::new(2));
        console.add_sprite(a, 8, 8, 0, 0);
        console.add_sprite(a, 8, 8, 10, 0);
        console.add_sprite(b, 8, 8, 20, 0);
        console.add_sprite(a, 8, 8, 30, 0);

        let mut backend = RecordingBackend::new();
        let stats = console.render_frame(&mut backend).unwrap();

        let calls: Vec<_> = backend
            .draw_calls()
            .map(|(tex, quads)| (tex, quads.len()))
            .collect();
        assert_eq!(calls, vec![(a, 2), (b, 1), (a, 1)]);
        assert_eq!(stats.sprite_quads, 4);
    }

    #[test]
    fn test_frames_use_current_projection() {
        let mut console = console(160, 160);
        console.write(0, 0, "A");
        let mut backend = RecordingBackend::new();
        console.render_frame(&mut backend).unwrap();

        let projection = backend.commands().iter().find_map(|cmd| match cmd {
            Command::DrawQuads { projection, .. } => Some(*projection),
            _ => None,
        });
        assert_eq!(projection, Some(Mat4::orthographic_from_size(160.0, 160.0)));
    }

    #[test]
    fn test_failed_present_returns_to_idle() {
        let mut console = console(160, 160);
        console.write(0, 0, "A");
        let mut backend = RecordingBackend::failing_present();

        assert!(console.render_frame(&mut backend).is_err());
        assert_eq!(console.frame_state(), FrameState::Idle);
        assert_eq!(backend.presents(), 0);
    }

    #[test]
    fn test_dropped_frame_returns_to_idle() {
        let mut console = console(160, 160);
        let mut backend = RecordingBackend::new();

        let frame = console.begin_frame(&mut backend).unwrap();
        drop(frame);

        assert_eq!(console.frame_state(), FrameState::Idle);
        assert!(console.render_frame(&mut backend).is_ok());
    }

    #[test]
    fn test_begin_rejects_open_frame() {
        let mut console = console(160, 160);
        console.state = FrameState::Rendering;
        let mut backend = RecordingBackend::new();

        assert!(console.begin_frame(&mut backend).is_err());
        assert!(backend.commands().is_empty());
    }

    #[test]
    fn test_immediate_text_in_pixels() {
        let mut console = console(160, 160);
        let mut backend = RecordingBackend::new();

        let mut frame = console.begin_frame(&mut backend).unwrap();
        frame.draw_text(2.5, 3.0, "abc", Color::WHITE, Color::BLACK, Unit::Pixel);
        assert_eq!(frame.stats().glyph_quads, 3);
        frame.present().unwrap();

        let quads = backend.quads_for(ATLAS);
        let origins: Vec<(f32, f32)> = quads.iter().map(Quad::origin).collect();
        assert_eq!(origins, vec![(3.0, 6.5), (4.0, 6.5), (5.0, 6.5)]);
        assert_eq!(quads[0].size(), (16.0, 16.0));
        assert!(console.text().is_empty());
    }

    #[test]
    fn test_immediate_sprite_zoom() {
        let mut console = console(160, 160);
        let tex = TextureHandle::new(1);
        let id = console.add_sprite(tex, 10, 20, 0, 0);
        let mut backend = RecordingBackend::new();

        let mut frame = console.begin_frame(&mut backend).unwrap();
        frame
            .draw_sprite(id, SpriteDraw::Zoomed { y: 5, x: 7, zoom: 2.0 })
            .unwrap();
        frame.present().unwrap();

        let quads = backend.quads_for(tex);
        assert_eq!(quads[0].origin(), (7.0, 5.0));
        assert_eq!(quads[0].size(), (20.0, 40.0));
        let sprite = console.sprite(id).unwrap();
        assert_eq!(sprite.position(), (7, 5));
        assert!(sprite.was_zoomed());
    }

    #[test]
    fn test_immediate_sprite_foreign_id() {
        let mut other = console(160, 160);
        let foreign = other.add_sprite(TextureHandle::new(1), 1, 1, 50, 50);

        let mut console = console(160, 160);
        let mine = console.add_sprite(TextureHandle::new(1), 1, 1, 3, 4);
        let mut backend = RecordingBackend::new();

        let mut frame = console.begin_frame(&mut backend).unwrap();
        // same index as `mine`, issued by another console
        assert!(frame.draw_sprite(foreign, SpriteDraw::At { y: 9, x: 9 }).is_err());
        assert_eq!(frame.stats().draw_calls, 0);
        frame.present().unwrap();

        assert_eq!(console.sprite(mine).unwrap().position(), (3, 4));
    }
}
