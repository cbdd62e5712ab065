use std::{fmt::Debug, io::Cursor};

use png::{ColorType, Transformations};

use crate::ImageError;

/// A decoded RGBA8 image, ready for texture upload.
#[derive(PartialEq, Eq)]
pub struct PixelImage {
    width: u32,
    height: u32,
    /// Tightly packed RGBA8 rows, top row first
    pixels: Vec<u8>,
}

impl Debug for PixelImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelImage")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pixels_kb", &(self.pixels.len() / 1024))
            .finish()
    }
}

impl PixelImage {
    const BYTES_PER_PIXEL: usize = 4;

    /// Wraps an already decoded RGBA8 pixel buffer.
    ///
    /// # Errors
    /// Returns [`ImageError::BufferSize`] if `pixels` is not exactly
    /// `width * height * 4` bytes long.
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ImageError> {
        let expected = width as usize * height as usize * Self::BYTES_PER_PIXEL;
        if pixels.len() != expected {
            return Err(ImageError::BufferSize { expected, actual: pixels.len() });
        }

        Ok(Self { width, height, pixels })
    }

    /// Decodes a PNG image and expands it to RGBA8.
    ///
    /// Palette, grayscale and 16-bit images are normalized to 8 bits per
    /// channel; missing alpha is filled in as opaque.
    ///
    /// # Errors
    /// Returns an [`ImageError`] if the stream is not a valid PNG.
    pub fn from_png(bytes: &[u8]) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(Cursor::new(bytes));
        decoder.set_transformations(Transformations::EXPAND | Transformations::STRIP_16);

        let mut reader = decoder.read_info()?;
        let (width, height) = (reader.info().width, reader.info().height);
        let (color_type, _) = reader.output_color_type();

        let samples = color_type.samples();
        let mut buf = vec![0; width as usize * height as usize * samples];
        reader.next_frame(&mut buf)?;

        let pixels = match color_type {
            ColorType::Rgba => buf,
            ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|px| [px[0], px[1], px[2], 0xff])
                .collect(),
            ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|px| [px[0], px[0], px[0], px[1]])
                .collect(),
            ColorType::Grayscale => buf
                .iter()
                .flat_map(|&v| [v, v, v, 0xff])
                .collect(),
            other => return Err(ImageError::UnsupportedFormat(other)),
        };

        Self::from_rgba(width, height, pixels)
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width and height in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// The RGBA8 pixel data, top row first.
    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_png(width: u32, height: u32, color: ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, width, height);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_from_rgba_checks_length() {
        assert!(PixelImage::from_rgba(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            PixelImage::from_rgba(2, 2, vec![0; 15]),
            Err(ImageError::BufferSize { expected: 16, actual: 15 })
        ));
    }

    #[test]
    fn test_decode_rgba_png() {
        let data = [255, 0, 0, 255, 0, 255, 0, 128];
        let png = encode_png(2, 1, ColorType::Rgba, &data);

        let image = PixelImage::from_png(&png).unwrap();
        assert_eq!(image.size(), (2, 1));
        assert_eq!(image.pixels(), &data);
    }

    #[test]
    fn test_decode_expands_rgb_and_gray() {
        let png = encode_png(1, 1, ColorType::Rgb, &[10, 20, 30]);
        let image = PixelImage::from_png(&png).unwrap();
        assert_eq!(image.pixels(), &[10, 20, 30, 255]);

        let png = encode_png(2, 1, ColorType::Grayscale, &[7, 200]);
        let image = PixelImage::from_png(&png).unwrap();
        assert_eq!(image.pixels(), &[7, 7, 7, 255, 200, 200, 200, 255]);
    }

    #[test]
    fn test_decode_garbage_fails() {
        assert!(matches!(
            PixelImage::from_png(b"definitely not a png"),
            Err(ImageError::Decode(_))
        ));
    }
}
