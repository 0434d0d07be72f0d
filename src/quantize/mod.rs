//! Color quantization: reducing a raster to an index grid plus a palette.
//!
//! The GIF encoder only depends on the [`Quantizer`] trait. Two quantizers
//! ship with the crate:
//!
//! - [`UniformQuantizer`]: a fixed RGB lattice, fast and image-independent.
//! - [`MedianCutQuantizer`]: an image-adaptive palette with optional dithering.
//!
//! Functions and closures of the shape `Fn(&Raster, usize, u8) -> QuantizedFrame`
//! are quantizers too.

pub mod median_cut;
pub mod uniform;

pub use median_cut::MedianCutQuantizer;
pub use uniform::UniformQuantizer;

use crate::color::Rgb;
use crate::raster::Raster;

/// Pixels with alpha below this value are mapped to the transparent index.
pub const ALPHA_THRESHOLD: u8 = 128;

/// An indexed frame: one palette index per pixel plus the palette itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizedFrame {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major palette indices, `width * height` entries.
    pub indices: Vec<u8>,
    /// Palette; entry `i` is the color of index `i`. At most 256 entries.
    pub color_table: Vec<Rgb>,
}

impl QuantizedFrame {
    /// Bundle an index grid with its palette.
    ///
    /// Panics if `indices` does not hold `width * height` entries or the
    /// palette has more than 256 entries.
    pub fn new(width: u32, height: u32, indices: Vec<u8>, color_table: Vec<Rgb>) -> Self {
        assert_eq!(
            indices.len(),
            width as usize * height as usize,
            "index grid does not match {width}x{height}"
        );
        assert!(color_table.len() <= 256, "color table exceeds 256 entries");
        Self {
            width,
            height,
            indices,
            color_table,
        }
    }

    /// The palette index at (`x`, `y`).
    pub fn index(&self, x: u32, y: u32) -> u8 {
        self.indices[y as usize * self.width as usize + x as usize]
    }
}

/// Something that can reduce a raster to at most `max_colors` palette entries.
///
/// Implementations must return a frame with the raster's dimensions, a color
/// table of at most `max_colors` entries, and must never assign
/// `transparent_index` to an opaque pixel.
pub trait Quantizer {
    /// Quantize `image`.
    fn quantize(&self, image: &Raster<'_>, max_colors: usize, transparent_index: u8)
        -> QuantizedFrame;
}

impl<F> Quantizer for F
where
    F: Fn(&Raster<'_>, usize, u8) -> QuantizedFrame,
{
    fn quantize(
        &self,
        image: &Raster<'_>,
        max_colors: usize,
        transparent_index: u8,
    ) -> QuantizedFrame {
        self(image, max_colors, transparent_index)
    }
}

/// Palette indices usable by opaque colors, in assignment order.
pub(crate) fn opaque_slots(max_colors: usize, transparent_index: u8) -> Vec<u8> {
    (0..max_colors.min(256))
        .filter(|&i| i != transparent_index as usize)
        .map(|i| i as u8)
        .collect()
}

/// Lay `palette` out on `slots`; holes below the highest used slot stay black.
pub(crate) fn build_color_table(palette: &[Rgb], slots: &[u8]) -> Vec<Rgb> {
    debug_assert!(palette.len() <= slots.len());
    let len = slots[..palette.len()]
        .iter()
        .map(|&slot| slot as usize + 1)
        .max()
        .unwrap_or(0);
    let mut table = vec![[0u8; 3]; len];
    for (color, &slot) in palette.iter().zip(slots) {
        table[slot as usize] = *color;
    }
    table
}

#[inline]
pub(crate) fn is_transparent(rgba: [u8; 4]) -> bool {
    rgba[3] < ALPHA_THRESHOLD
}
