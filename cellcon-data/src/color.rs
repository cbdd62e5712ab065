/// An 8-bit-per-channel RGBA color.
///
/// Colors are usually written as packed `0xRRGGBB` values, which are fully
/// opaque; see [`Color::rgb`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red
    pub r: u8,
    /// Green
    pub g: u8,
    /// Blue
    pub b: u8,
    /// Alpha; 255 is opaque
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Color = Color::rgb(0x00ff_ffff);
    /// Opaque black.
    pub const BLACK: Color = Color::rgb(0x0000_0000);
    /// Fully transparent black.
    pub const TRANSPARENT: Color = Color::rgba(0x0000_0000);

    /// Creates an opaque color from a packed `0xRRGGBB` value.
    pub const fn rgb(rgb: u32) -> Self {
        Self {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
            a: 0xff,
        }
    }

    /// Creates a color from a packed `0xRRGGBBAA` value.
    pub const fn rgba(rgba: u32) -> Self {
        Self {
            r: (rgba >> 24) as u8,
            g: (rgba >> 16) as u8,
            b: (rgba >> 8) as u8,
            a: rgba as u8,
        }
    }

    /// Returns the color as normalized `[r, g, b, a]` floats.
    pub fn to_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl From<u32> for Color {
    fn from(rgb: u32) -> Self {
        Color::rgb(rgb)
    }
}
