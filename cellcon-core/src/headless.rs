//! A backend that records draw commands instead of issuing GL calls.
//!
//! Useful for testing console content without a GL context, and for hosts
//! that want to inspect the geometry of a frame.

use cellcon_data::{Color, PixelImage};

use crate::{
    backend::{LoadedTexture, RenderBackend, TextureHandle, TextureLoader},
    error::Error,
    mat4::Mat4,
    quad::Quad,
};

/// A command received by a [`RecordingBackend`].
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// [`RenderBackend::set_viewport`]
    Viewport {
        /// Surface width in pixels
        width: u32,
        /// Surface height in pixels
        height: u32,
    },
    /// [`RenderBackend::clear`]
    Clear(Color),
    /// [`RenderBackend::draw_quads`]
    DrawQuads {
        /// Texture the batch samples
        texture: TextureHandle,
        /// Projection in effect for the batch
        projection: Mat4,
        /// Quads in submission order
        quads: Vec<Quad>,
    },
    /// [`RenderBackend::present`]
    Present,
}

/// Records every backend call in order.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    commands: Vec<Command>,
    textures: Vec<(u32, u32)>,
    fail_present: bool,
}

impl RecordingBackend {
    /// An empty backend with no textures loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend whose `present` always fails.
    pub fn failing_present() -> Self {
        Self { fail_present: true, ..Self::default() }
    }

    /// Commands recorded since creation or the last drain.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Drains the recorded commands.
    pub fn take_commands(&mut self) -> Vec<Command> {
        std::mem::take(&mut self.commands)
    }

    /// Iterates over recorded draw calls as `(texture, quads)`.
    pub fn draw_calls(&self) -> impl Iterator<Item = (TextureHandle, &[Quad])> {
        self.commands.iter().filter_map(|cmd| match cmd {
            Command::DrawQuads { texture, quads, .. } => Some((*texture, quads.as_slice())),
            _ => None,
        })
    }

    /// All recorded quads sampling `texture`, in draw order.
    pub fn quads_for(&self, texture: TextureHandle) -> Vec<Quad> {
        self.draw_calls()
            .filter(|(t, _)| *t == texture)
            .flat_map(|(_, quads)| quads.iter().copied())
            .collect()
    }

    /// Number of presented frames.
    pub fn presents(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, Command::Present))
            .count()
    }

    /// Pixel size of a texture loaded through this backend.
    pub fn texture_size(&self, texture: TextureHandle) -> Option<(u32, u32)> {
        self.textures.get(texture.id() as usize).copied()
    }
}

impl RenderBackend for RecordingBackend {
    fn set_viewport(&mut self, width: u32, height: u32) {
        self.commands.push(Command::Viewport { width, height });
    }

    fn clear(&mut self, color: Color) {
        self.commands.push(Command::Clear(color));
    }

    fn draw_quads(&mut self, texture: TextureHandle, projection: &Mat4, quads: &[Quad]) {
        self.commands.push(Command::DrawQuads {
            texture,
            projection: *projection,
            quads: quads.to_vec(),
        });
    }

    fn present(&mut self) -> Result<(), Error> {
        if self.fail_present {
            return Err(Error::present_failed("recording backend configured to fail"));
        }

        self.commands.push(Command::Present);
        Ok(())
    }
}

impl TextureLoader for RecordingBackend {
    fn load_texture(&mut self, image: &PixelImage) -> Result<LoadedTexture, Error> {
        let handle = TextureHandle::new(self.textures.len() as u32);
        self.textures.push(image.size());

        Ok(LoadedTexture { handle, width: image.width(), height: image.height() })
    }
}
