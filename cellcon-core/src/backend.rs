use cellcon_data::{Color, PixelImage};

use crate::{error::Error, mat4::Mat4, quad::Quad};

/// Opaque handle to a texture owned by a [`TextureLoader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

impl TextureHandle {
    /// Wraps a backend-assigned texture id.
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// The backend-assigned texture id.
    pub fn id(self) -> u32 {
        self.0
    }
}

/// A texture handle together with the pixel size of its image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadedTexture {
    /// Backend handle for the texture
    pub handle: TextureHandle,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
}

/// Uploads decoded images and hands out texture handles.
pub trait TextureLoader {
    /// Uploads `image` and returns its handle and pixel size.
    ///
    /// # Errors
    /// Returns an error if the texture cannot be created.
    fn load_texture(&mut self, image: &PixelImage) -> Result<LoadedTexture, Error>;
}

/// Receives the geometry of a frame.
///
/// The projection is passed with every batch; backends keep no matrix state
/// between calls.
pub trait RenderBackend {
    /// Sets the output surface size in pixels.
    fn set_viewport(&mut self, width: u32, height: u32);

    /// Clears the color buffer.
    fn clear(&mut self, color: Color);

    /// Draws `quads` sampling `texture`, in order. Each quad's vertices are in
    /// top-left, top-right, bottom-right, bottom-left order.
    fn draw_quads(&mut self, texture: TextureHandle, projection: &Mat4, quads: &[Quad]);

    /// Presents the finished frame.
    ///
    /// # Errors
    /// Returns an error if the frame could not be presented.
    fn present(&mut self) -> Result<(), Error>;
}
