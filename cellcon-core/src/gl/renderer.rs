use cellcon_data::{Color, PixelImage};
use glow::HasContext;
use tracing::{debug, warn};

use crate::{
    GlslVersion,
    backend::{LoadedTexture, RenderBackend, TextureHandle, TextureLoader},
    error::Error,
    gl::{GlState, ShaderProgram, buffer_upload_array, texture::Texture},
    mat4::Mat4,
    quad::{Quad, Vertex},
};

/// Rendering context that provides access to GL state.
pub struct RenderContext<'a> {
    /// The GL context draws are issued on
    pub gl: &'a glow::Context,
    /// Cached GL state shared across draws
    pub state: &'a mut GlState,
}

/// GL resources for drawing textured quads, plus the textures it has loaded.
///
/// Quads are streamed into a dynamic vertex buffer and drawn as indexed
/// triangles, one draw call per batch. Call [`GlRenderer::delete`] before
/// dropping to release GPU resources.
#[derive(Debug)]
#[must_use = "call `delete(gl)` before dropping to avoid GPU resource leaks"]
pub struct GlRenderer {
    shader: ShaderProgram,
    buffers: QuadBuffers,
    projection_loc: glow::UniformLocation,
    sampler_loc: glow::UniformLocation,
    /// Textures indexed by [`TextureHandle::id`]
    textures: Vec<Texture>,
}

#[derive(Debug)]
struct QuadBuffers {
    vao: glow::VertexArray,
    vertices: glow::Buffer,
    indices: glow::Buffer,
    /// Number of quads the index buffer currently covers
    index_capacity: usize,
}

impl GlRenderer {
    const FRAGMENT_GLSL: &'static str = include_str!("../shaders/quad.frag");
    const VERTEX_GLSL: &'static str = include_str!("../shaders/quad.vert");

    /// Blend factors for the premultiplied output of the fragment shader.
    const BLEND: (u32, u32) = (glow::ONE, glow::ONE_MINUS_SRC_ALPHA);

    /// Compiles the quad shader and creates the vertex and index buffers.
    ///
    /// # Errors
    /// Returns an error if shader compilation or buffer creation fails.
    pub fn new(gl: &glow::Context, glsl_version: &GlslVersion) -> Result<Self, Error> {
        let shader =
            ShaderProgram::create(gl, glsl_version, Self::VERTEX_GLSL, Self::FRAGMENT_GLSL)?;
        let projection_loc = shader.uniform_location(gl, "u_projection")?;
        let sampler_loc = shader.uniform_location(gl, "u_sampler")?;

        let buffers = QuadBuffers::new(gl)?;
        debug!(?glsl_version, "quad renderer created");

        Ok(Self {
            shader,
            buffers,
            projection_loc,
            sampler_loc,
            textures: Vec::new(),
        })
    }

    /// Uploads `image` as a new texture.
    ///
    /// # Errors
    /// Returns an error if the GL texture cannot be created.
    pub fn load_texture(
        &mut self,
        gl: &glow::Context,
        image: &PixelImage,
    ) -> Result<LoadedTexture, Error> {
        let texture = Texture::from_image(gl, image)?;
        let (width, height) = texture.dimensions();
        let handle = TextureHandle::new(self.textures.len() as u32);
        self.textures.push(texture);

        debug!(texture = handle.id(), width, height, "texture uploaded");
        Ok(LoadedTexture { handle, width, height })
    }

    /// Returns a [`TextureLoader`] uploading through this renderer.
    pub fn loader<'a>(&'a mut self, gl: &'a glow::Context) -> GlTextureLoader<'a> {
        GlTextureLoader { gl, renderer: self }
    }

    /// Returns a [`RenderBackend`] drawing through this renderer. `swap` is
    /// called to present each frame, typically swapping the window buffers.
    pub fn backend<'a>(
        &'a mut self,
        ctx: RenderContext<'a>,
        swap: &'a mut dyn FnMut() -> Result<(), Error>,
    ) -> GlBackend<'a> {
        GlBackend { ctx, renderer: self, swap }
    }

    /// Deletes all GPU resources owned by this renderer, including textures.
    pub fn delete(self, gl: &glow::Context) {
        self.shader.delete(gl);
        self.buffers.delete(gl);
        for texture in &self.textures {
            texture.delete(gl);
        }
    }

    fn draw(
        &mut self,
        ctx: &mut RenderContext,
        texture: TextureHandle,
        projection: &Mat4,
        quads: &[Quad],
    ) {
        let Some(gl_texture) = self
            .textures
            .get(texture.id() as usize)
            .map(Texture::gl_texture)
        else {
            warn!("skipping draw: {}", Error::unknown_texture(texture.id()));
            return;
        };

        self.prepare(ctx, gl_texture, projection);
        self.buffers.upload(ctx.gl, quads);

        let index_count = (quads.len() * Quad::TRIANGLE_INDICES.len()) as i32;
        unsafe {
            ctx.gl
                .draw_elements(glow::TRIANGLES, index_count, glow::UNSIGNED_INT, 0);
        }

        Self::cleanup(ctx);
    }

    fn prepare(&self, ctx: &mut RenderContext, texture: glow::Texture, projection: &Mat4) {
        let gl = ctx.gl;

        self.shader.use_program(gl);
        unsafe { gl.bind_vertex_array(Some(self.buffers.vao)) };

        ctx.state
            .blend(gl, Some(Self::BLEND))
            .active_texture(gl, glow::TEXTURE0);

        unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(texture));
            gl.uniform_matrix_4_f32_slice(Some(&self.projection_loc), false, &projection.data);
            gl.uniform_1_i32(Some(&self.sampler_loc), 0);
        }
    }

    fn cleanup(ctx: &mut RenderContext) {
        let gl = ctx.gl;
        unsafe {
            gl.bind_vertex_array(None);
            gl.bind_texture(glow::TEXTURE_2D, None);
            gl.use_program(None);
        }
        ctx.state.reset(gl);
    }
}

impl QuadBuffers {
    const MIN_QUADS: usize = 256;

    fn new(gl: &glow::Context) -> Result<Self, Error> {
        let vao =
            unsafe { gl.create_vertex_array() }.map_err(Error::vertex_array_creation_failed)?;
        unsafe { gl.bind_vertex_array(Some(vao)) };

        let vertices =
            unsafe { gl.create_buffer() }.map_err(|e| Error::buffer_creation_failed("vertex", e))?;
        unsafe { gl.bind_buffer(glow::ARRAY_BUFFER, Some(vertices)) };

        // vertex attributes, captured by the VAO
        let stride = size_of::<Vertex>() as i32;
        enable_vertex_attrib(gl, attrib::POS, 2, 0, stride);
        enable_vertex_attrib(gl, attrib::UV, 2, 8, stride);
        enable_vertex_attrib(gl, attrib::FG, 4, 16, stride);
        enable_vertex_attrib(gl, attrib::BG, 4, 32, stride);

        let indices =
            unsafe { gl.create_buffer() }.map_err(|e| Error::buffer_creation_failed("index", e))?;
        unsafe { gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(indices)) };
        buffer_upload_array(
            gl,
            glow::ELEMENT_ARRAY_BUFFER,
            &quad_indices(Self::MIN_QUADS),
            glow::STATIC_DRAW,
        );

        // unbind VAO to prevent accidental modification
        unsafe { gl.bind_vertex_array(None) };

        Ok(Self { vao, vertices, indices, index_capacity: Self::MIN_QUADS })
    }

    /// Streams `quads` into the vertex buffer, growing the index buffer when
    /// needed. Expects the VAO to be bound.
    fn upload(&mut self, gl: &glow::Context, quads: &[Quad]) {
        unsafe { gl.bind_buffer(glow::ARRAY_BUFFER, Some(self.vertices)) };
        buffer_upload_array(gl, glow::ARRAY_BUFFER, quads, glow::STREAM_DRAW);

        if quads.len() > self.index_capacity {
            let capacity = quads.len().next_power_of_two();
            unsafe { gl.bind_buffer(glow::ELEMENT_ARRAY_BUFFER, Some(self.indices)) };
            buffer_upload_array(
                gl,
                glow::ELEMENT_ARRAY_BUFFER,
                &quad_indices(capacity),
                glow::STATIC_DRAW,
            );
            self.index_capacity = capacity;
        }
    }

    fn delete(&self, gl: &glow::Context) {
        unsafe {
            gl.delete_vertex_array(self.vao);
            gl.delete_buffer(self.vertices);
            gl.delete_buffer(self.indices);
        }
    }
}

/// Index data turning `count` quads into triangle pairs.
fn quad_indices(count: usize) -> Vec<u32> {
    (0..count as u32)
        .flat_map(|quad| Quad::TRIANGLE_INDICES.map(|i| quad * 4 + i))
        .collect()
}

fn enable_vertex_attrib(gl: &glow::Context, index: u32, size: i32, offset: i32, stride: i32) {
    unsafe {
        gl.enable_vertex_attrib_array(index);
        gl.vertex_attrib_pointer_f32(index, size, glow::FLOAT, false, stride, offset);
    }
}

/// A [`RenderBackend`] drawing with a [`GlRenderer`].
pub struct GlBackend<'a> {
    ctx: RenderContext<'a>,
    renderer: &'a mut GlRenderer,
    swap: &'a mut dyn FnMut() -> Result<(), Error>,
}

impl RenderBackend for GlBackend<'_> {
    fn set_viewport(&mut self, width: u32, height: u32) {
        self.ctx
            .state
            .viewport(self.ctx.gl, 0, 0, width as i32, height as i32);
    }

    fn clear(&mut self, color: Color) {
        let [r, g, b, a] = color.to_f32();
        self.ctx.state.clear_color(self.ctx.gl, r, g, b, a);
        unsafe { self.ctx.gl.clear(glow::COLOR_BUFFER_BIT) };
    }

    fn draw_quads(&mut self, texture: TextureHandle, projection: &Mat4, quads: &[Quad]) {
        self.renderer
            .draw(&mut self.ctx, texture, projection, quads);
    }

    fn present(&mut self) -> Result<(), Error> {
        (self.swap)()
    }
}

impl TextureLoader for GlBackend<'_> {
    fn load_texture(&mut self, image: &PixelImage) -> Result<LoadedTexture, Error> {
        self.renderer.load_texture(self.ctx.gl, image)
    }
}

/// A [`TextureLoader`] uploading through a [`GlRenderer`].
pub struct GlTextureLoader<'a> {
    gl: &'a glow::Context,
    renderer: &'a mut GlRenderer,
}

impl TextureLoader for GlTextureLoader<'_> {
    fn load_texture(&mut self, image: &PixelImage) -> Result<LoadedTexture, Error> {
        self.renderer.load_texture(self.gl, image)
    }
}

mod attrib {
    pub const POS: u32 = 0;
    pub const UV: u32 = 1;
    pub const FG: u32 = 2;
    pub const BG: u32 = 3;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quad_indices() {
        assert_eq!(quad_indices(2), vec![0, 1, 2, 0, 2, 3, 4, 5, 6, 4, 6, 7]);
        assert!(quad_indices(0).is_empty());
    }
}
