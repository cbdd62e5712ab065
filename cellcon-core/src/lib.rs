/// Error types.
pub mod error;
/// OpenGL backend built on `glow`.
pub mod gl;
pub mod headless;

mod backend;
mod compositor;
mod console;
mod glyph;
mod mat4;
mod position;
mod quad;
mod sprite;
mod text;
mod viewport;

pub use backend::{LoadedTexture, RenderBackend, TextureHandle, TextureLoader};
pub use cellcon_data::{AtlasCell, AtlasGeometry, Color, PixelImage, TexRect};
pub use compositor::{Frame, FrameState, FrameStats};
pub use console::{Console, ConsoleConfig};
pub use error::Error;
pub use gl::{GlBackend, GlRenderer, GlState, GlTextureLoader, RenderContext};
pub use glyph::{GlyphAtlas, Unit};
pub use mat4::Mat4;
pub use position::CellPos;
pub use quad::{Quad, Vertex};
pub use sprite::{Sprite, SpriteDraw, SpriteId, SpriteList};
pub use text::{TextBuffer, TextCell};
pub use viewport::{Grid, Viewport};

/// GL shader language target for version injection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlslVersion {
    /// WebGL2 / OpenGL ES 3.0: `#version 300 es`
    Es300,
    /// OpenGL 3.3 Core: `#version 330 core`
    Gl330,
}

impl GlslVersion {
    /// Version line and precision qualifiers prepended to vertex shaders.
    pub fn vertex_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision highp float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }

    /// Version line and precision qualifiers prepended to fragment shaders.
    pub fn fragment_preamble(&self) -> &'static str {
        match self {
            Self::Es300 => "#version 300 es\nprecision mediump float;\n",
            Self::Gl330 => "#version 330 core\n",
        }
    }
}
