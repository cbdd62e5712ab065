use cellcon_data::PixelImage;
use glow::HasContext;

use crate::error::Error;

/// An RGBA8 2d texture.
#[derive(Debug)]
pub(crate) struct Texture {
    gl_texture: glow::Texture,
    /// Texture dimensions (width, height)
    dimensions: (u32, u32),
}

impl Texture {
    pub(crate) fn from_image(gl: &glow::Context, image: &PixelImage) -> Result<Self, Error> {
        let (width, height) = image.size();

        let gl_texture =
            unsafe { gl.create_texture() }.map_err(|e| Error::texture_creation_failed(&e))?;

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(gl_texture));
            gl.pixel_store_i32(glow::UNPACK_ALIGNMENT, 1);
            gl.tex_image_2d(
                glow::TEXTURE_2D,
                0, // level
                glow::RGBA8 as i32,
                width as i32,
                height as i32,
                0, // border
                glow::RGBA,
                glow::UNSIGNED_BYTE,
                glow::PixelUnpackData::Slice(Some(image.pixels())),
            );
        }

        Self::setup_sampling(gl);
        unsafe { gl.bind_texture(glow::TEXTURE_2D, None) };

        Ok(Self { gl_texture, dimensions: (width, height) })
    }

    /// Returns the texture dimensions (width, height)
    pub(crate) fn dimensions(&self) -> (u32, u32) {
        self.dimensions
    }

    pub(crate) fn gl_texture(&self) -> glow::Texture {
        self.gl_texture
    }

    pub(crate) fn delete(&self, gl: &glow::Context) {
        unsafe { gl.delete_texture(self.gl_texture) };
    }

    /// Pixel-exact sampling: glyph cells must not bleed into their neighbours.
    fn setup_sampling(gl: &glow::Context) {
        let params = [
            (glow::TEXTURE_MIN_FILTER, glow::NEAREST),
            (glow::TEXTURE_MAG_FILTER, glow::NEAREST),
            (glow::TEXTURE_WRAP_S, glow::CLAMP_TO_EDGE),
            (glow::TEXTURE_WRAP_T, glow::CLAMP_TO_EDGE),
        ];

        for (param, value) in params {
            unsafe { gl.tex_parameter_i32(glow::TEXTURE_2D, param, value as i32) };
        }
    }
}
