//! Borrowed raster views used as frame input.

use crate::color::ColorType;
use crate::error::{Error, Result};

/// A validated, borrowed view over row-major pixel data.
#[derive(Debug, Clone, Copy)]
pub struct Raster<'a> {
    pixels: &'a [u8],
    width: u32,
    height: u32,
    color_type: ColorType,
}

impl<'a> Raster<'a> {
    /// Wrap raw pixel data.
    ///
    /// Fails with [`Error::InvalidDimensions`] for a zero width or height and
    /// with [`Error::InvalidDataLength`] when `pixels` is not exactly
    /// `width * height * bytes_per_pixel` bytes long.
    pub fn new(pixels: &'a [u8], width: u32, height: u32, color_type: ColorType) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize * color_type.bytes_per_pixel();
        if pixels.len() != expected {
            return Err(Error::InvalidDataLength {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            pixels,
            width,
            height,
            color_type,
        })
    }

    /// Width in pixels.
    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Color type of the underlying bytes.
    #[inline]
    pub fn color_type(&self) -> ColorType {
        self.color_type
    }

    /// The raw pixel bytes.
    #[inline]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.pixels
    }

    /// Number of pixels.
    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// The pixel at (`x`, `y`) expanded to RGBA. Panics when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        assert!(x < self.width && y < self.height, "pixel out of bounds");
        let bpp = self.color_type.bytes_per_pixel();
        let start = (y as usize * self.width as usize + x as usize) * bpp;
        self.color_type.to_rgba(&self.pixels[start..start + bpp])
    }

    /// Iterate all pixels in row-major order, expanded to RGBA.
    pub fn rgba_pixels(&self) -> impl Iterator<Item = [u8; 4]> + 'a {
        let color_type = self.color_type;
        self.pixels
            .chunks_exact(color_type.bytes_per_pixel())
            .map(move |px| color_type.to_rgba(px))
    }
}
