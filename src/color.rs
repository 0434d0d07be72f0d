//! Color type definitions and conversions.

/// An RGB color table entry.
pub type Rgb = [u8; 3];

/// Supported color types for raster input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorType {
    /// Grayscale, 1 byte per pixel.
    Gray,
    /// Grayscale with alpha, 2 bytes per pixel.
    GrayAlpha,
    /// RGB, 3 bytes per pixel.
    Rgb,
    /// RGBA, 4 bytes per pixel.
    Rgba,
}

impl ColorType {
    /// Returns the number of bytes per pixel for this color type.
    #[inline]
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            ColorType::Gray => 1,
            ColorType::GrayAlpha => 2,
            ColorType::Rgb => 3,
            ColorType::Rgba => 4,
        }
    }

    /// Returns true if pixels of this type carry an alpha channel.
    #[inline]
    pub const fn has_alpha(self) -> bool {
        matches!(self, ColorType::GrayAlpha | ColorType::Rgba)
    }

    /// Expand one pixel's bytes to RGBA.
    ///
    /// `pixel` must hold exactly [`bytes_per_pixel`](Self::bytes_per_pixel) bytes.
    #[inline]
    pub(crate) fn to_rgba(self, pixel: &[u8]) -> [u8; 4] {
        match (self, pixel) {
            (ColorType::Gray, &[l]) => [l, l, l, 255],
            (ColorType::GrayAlpha, &[l, a]) => [l, l, l, a],
            (ColorType::Rgb, &[r, g, b]) => [r, g, b, 255],
            (ColorType::Rgba, &[r, g, b, a]) => [r, g, b, a],
            _ => unreachable!("pixel slice does not match color type"),
        }
    }
}

/// Squared Euclidean distance between two RGB colors.
#[inline]
pub fn rgb_distance_sq(a: Rgb, b: Rgb) -> u32 {
    let dr = a[0] as i32 - b[0] as i32;
    let dg = a[1] as i32 - b[1] as i32;
    let db = a[2] as i32 - b[2] as i32;
    (dr * dr + dg * dg + db * db) as u32
}
