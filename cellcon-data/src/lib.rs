//! GL-free data types shared by the cellcon renderer.

mod atlas;
mod color;
mod image;

pub use atlas::{ATLAS_GRID, AtlasCell, AtlasGeometry, TexRect};
pub use color::Color;
pub use image::PixelImage;

/// Errors raised while decoding an image.
#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    /// The PNG stream could not be decoded.
    #[error("Failed to decode png: {0}")]
    Decode(#[from] png::DecodingError),

    /// The decoded image uses a pixel layout that cannot be expanded to RGBA8.
    #[error("Unsupported pixel format: {0:?}")]
    UnsupportedFormat(png::ColorType),

    /// The pixel buffer length does not match `width * height * 4`.
    #[error("Pixel buffer holds {actual} bytes, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

/// Errors raised while describing or validating a glyph atlas.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AtlasError {
    /// Glyph cells must be at least one pixel in each dimension.
    #[error("Invalid glyph cell size {width}x{height}")]
    InvalidCellSize { width: i32, height: i32 },

    /// The atlas image is not a 16x16 grid of cells of the configured size.
    #[error("Atlas image is {actual:?} pixels, expected {expected:?} for a 16x16 cell grid")]
    DimensionMismatch { expected: (i32, i32), actual: (i32, i32) },
}
