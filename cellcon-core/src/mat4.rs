/// A column-major 4x4 matrix, laid out the way GL uniforms expect it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mat4 {
    /// Elements in column-major order
    pub data: [f32; 16],
}

impl Mat4 {
    /// The identity matrix.
    pub const IDENTITY: Mat4 = Mat4 {
        data: [
            1.0, 0.0, 0.0, 0.0,
            0.0, 1.0, 0.0, 0.0,
            0.0, 0.0, 1.0, 0.0,
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    /// Orthographic projection mapping the given box onto normalized device
    /// coordinates.
    pub fn orthographic(left: f32, right: f32, bottom: f32, top: f32, near: f32, far: f32) -> Self {
        let w = right - left;
        let h = top - bottom;
        let d = far - near;

        #[rustfmt::skip]
        let data = [
            2.0 / w,              0.0,                  0.0,                 0.0,
            0.0,                  2.0 / h,              0.0,                 0.0,
            0.0,                  0.0,                 -2.0 / d,             0.0,
            -(right + left) / w, -(top + bottom) / h,  -(far + near) / d,    1.0,
        ];

        Self { data }
    }

    /// Pixel-space projection for a surface of `width` x `height` pixels.
    ///
    /// The origin `(0, 0)` is the bottom-left corner and `(width, height)` the
    /// top-right corner, which is why glyph rows are flipped before emission.
    pub fn orthographic_from_size(width: f32, height: f32) -> Self {
        Self::orthographic(0.0, width, 0.0, height, -1.0, 1.0)
    }

    /// Transforms a 2d point (z = 0, w = 1) and returns its x and y.
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.data;
        (m[0] * x + m[4] * y + m[12], m[1] * x + m[5] * y + m[13])
    }
}

impl Default for Mat4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}
