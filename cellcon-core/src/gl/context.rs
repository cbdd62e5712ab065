use glow::HasContext;

/// Manages simple GL state to reduce redundant state changes
#[derive(Debug, Clone, PartialEq)]
pub struct GlState {
    // Viewport dimensions
    viewport: [i32; 4], // [x, y, width, height]

    // Clear color
    clear_color: [f32; 4],

    // Blending enabled, with (src_factor, dst_factor)
    blend: Option<(u32, u32)>,

    // Active texture unit
    active_texture_unit: u32,
}

impl GlState {
    /// Create a new GLState object with GL defaults
    pub fn new() -> Self {
        Self {
            viewport: [0, 0, 0, 0],
            clear_color: [0.0, 0.0, 0.0, 0.0],
            blend: None,
            active_texture_unit: glow::TEXTURE0,
        }
    }

    /// Set viewport dimensions
    pub fn viewport(
        &mut self,
        gl: &glow::Context,
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    ) -> &mut Self {
        let new_viewport = [x, y, width, height];
        if self.viewport != new_viewport {
            unsafe { gl.viewport(x, y, width, height) };
            self.viewport = new_viewport;
        }
        self
    }

    /// Set clear color
    pub fn clear_color(&mut self, gl: &glow::Context, r: f32, g: f32, b: f32, a: f32) -> &mut Self {
        let new_color = [r, g, b, a];
        if self.clear_color != new_color {
            unsafe { gl.clear_color(r, g, b, a) };
            self.clear_color = new_color;
        }
        self
    }

    /// Enable blending with the given factors, or disable it with `None`
    pub fn blend(&mut self, gl: &glow::Context, factors: Option<(u32, u32)>) -> &mut Self {
        if self.blend == factors {
            return self;
        }

        match factors {
            Some((src, dst)) => unsafe {
                gl.enable(glow::BLEND);
                gl.blend_func(src, dst);
            },
            None => unsafe { gl.disable(glow::BLEND) },
        }
        self.blend = factors;
        self
    }

    /// Set active texture unit
    pub fn active_texture(&mut self, gl: &glow::Context, texture_unit: u32) -> &mut Self {
        if self.active_texture_unit != texture_unit {
            unsafe { gl.active_texture(texture_unit) };
            self.active_texture_unit = texture_unit;
        }
        self
    }

    /// Reset blending and the active texture unit to GL defaults
    pub fn reset(&mut self, gl: &glow::Context) {
        self.blend(gl, None);

        if self.active_texture_unit != glow::TEXTURE0 {
            unsafe { gl.active_texture(glow::TEXTURE0) };
            self.active_texture_unit = glow::TEXTURE0;
        }

        // Note: We don't reset viewport or clear_color as these are typically
        // set based on surface dimensions or application needs
    }
}

impl Default for GlState {
    fn default() -> Self {
        Self::new()
    }
}
