use cellcon_data::{Color, TexRect};

/// A single vertex as uploaded to the GPU.
///
/// # Memory Layout
/// 12 tightly packed `f32`s: position (2), texture coordinate (2),
/// foreground tint (4) and background color (4).
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Vertex {
    /// Pixel-space position, origin at the bottom-left of the viewport
    pub pos: [f32; 2],
    /// Normalized texture coordinate
    pub uv: [f32; 2],
    /// Foreground (glyph) color, normalized RGBA
    pub fg: [f32; 4],
    /// Background color, normalized RGBA
    pub bg: [f32; 4],
}

/// A textured rectangle, emitted as four vertices in the order top-left,
/// top-right, bottom-right, bottom-left.
///
/// Backends must preserve this winding so faces and texture orientation stay
/// consistent.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Quad {
    /// Corners in top-left, top-right, bottom-right, bottom-left order
    pub vertices: [Vertex; 4],
}

impl Quad {
    /// Index of the top-left vertex.
    pub const TOP_LEFT: usize = 0;
    /// Index of the top-right vertex.
    pub const TOP_RIGHT: usize = 1;
    /// Index of the bottom-right vertex.
    pub const BOTTOM_RIGHT: usize = 2;
    /// Index of the bottom-left vertex.
    pub const BOTTOM_LEFT: usize = 3;

    /// Index pattern splitting a quad into two triangles.
    pub const TRIANGLE_INDICES: [u32; 6] = [0, 1, 2, 0, 2, 3];

    /// Creates a quad spanning `(x, y)` to `(x + width, y + height)`, where
    /// `(x, y)` is the bottom-left corner, sampling `tex` with a white tint
    /// over a transparent background.
    pub fn new(x: f32, y: f32, width: f32, height: f32, tex: TexRect) -> Self {
        let fg = Color::WHITE.to_f32();
        let bg = Color::TRANSPARENT.to_f32();
        let vertex =
            |px: f32, py: f32, u: f32, v: f32| Vertex { pos: [px, py], uv: [u, v], fg, bg };

        Self {
            vertices: [
                vertex(x, y + height, tex.left, tex.top),
                vertex(x + width, y + height, tex.right, tex.top),
                vertex(x + width, y, tex.right, tex.bottom),
                vertex(x, y, tex.left, tex.bottom),
            ],
        }
    }

    /// Returns the quad with the given foreground tint and background color.
    #[must_use]
    pub fn with_colors(mut self, fg: Color, bg: Color) -> Self {
        let (fg, bg) = (fg.to_f32(), bg.to_f32());
        for v in &mut self.vertices {
            v.fg = fg;
            v.bg = bg;
        }
        self
    }

    /// The bottom-left corner in pixels.
    pub fn origin(&self) -> (f32, f32) {
        let [x, y] = self.vertices[Self::BOTTOM_LEFT].pos;
        (x, y)
    }

    /// Width and height in pixels.
    pub fn size(&self) -> (f32, f32) {
        let [x0, y0] = self.vertices[Self::BOTTOM_LEFT].pos;
        let [x1, y1] = self.vertices[Self::TOP_RIGHT].pos;
        (x1 - x0, y1 - y0)
    }
}
