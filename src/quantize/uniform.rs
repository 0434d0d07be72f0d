//! Fixed-lattice quantization.
//!
//! Every channel is rounded to one of a few evenly spaced levels. The lattice
//! depends only on the color budget, so every frame of an animation shares the
//! same palette layout.

use super::{build_color_table, is_transparent, opaque_slots, QuantizedFrame, Quantizer};
use crate::color::Rgb;
use crate::raster::Raster;

/// Image-independent quantizer over an RGB lattice.
///
/// With the full 256-entry budget and one transparent slot, the lattice is
/// 6 red × 7 green × 6 blue levels (252 colors).
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformQuantizer;

impl UniformQuantizer {
    /// Create a uniform quantizer.
    pub fn new() -> Self {
        Self
    }
}

/// Levels per channel (R, G, B) whose product fits `budget`.
///
/// Channels grow round-robin, green first since the eye is most sensitive to it.
fn lattice_levels(budget: usize) -> [usize; 3] {
    let mut levels = [1usize; 3];
    loop {
        let mut grew = false;
        for ch in [1, 0, 2] {
            levels[ch] += 1;
            if levels.iter().product::<usize>() <= budget {
                grew = true;
            } else {
                levels[ch] -= 1;
            }
        }
        if !grew {
            return levels;
        }
    }
}

#[inline]
fn level_of(value: u8, levels: usize) -> usize {
    if levels == 1 {
        return 0;
    }
    (value as usize * (levels - 1) + 127) / 255
}

#[inline]
fn level_value(level: usize, levels: usize) -> u8 {
    if levels == 1 {
        return 128;
    }
    (level * 255 / (levels - 1)) as u8
}

fn lattice_palette(levels: [usize; 3]) -> Vec<Rgb> {
    let [rn, gn, bn] = levels;
    let mut palette = Vec::with_capacity(rn * gn * bn);
    for r in 0..rn {
        for g in 0..gn {
            for b in 0..bn {
                palette.push([
                    level_value(r, rn),
                    level_value(g, gn),
                    level_value(b, bn),
                ]);
            }
        }
    }
    palette
}

impl Quantizer for UniformQuantizer {
    fn quantize(
        &self,
        image: &Raster<'_>,
        max_colors: usize,
        transparent_index: u8,
    ) -> QuantizedFrame {
        let slots = opaque_slots(max_colors, transparent_index);
        if slots.is_empty() {
            return QuantizedFrame::new(
                image.width(),
                image.height(),
                vec![transparent_index; image.pixel_count()],
                Vec::new(),
            );
        }

        let levels = lattice_levels(slots.len());
        let [_, gn, bn] = levels;
        let palette = lattice_palette(levels);
        let indices = image
            .rgba_pixels()
            .map(|px| {
                if is_transparent(px) {
                    return transparent_index;
                }
                let r = level_of(px[0], levels[0]);
                let g = level_of(px[1], gn);
                let b = level_of(px[2], bn);
                slots[(r * gn + g) * bn + b]
            })
            .collect();

        QuantizedFrame::new(
            image.width(),
            image.height(),
            indices,
            build_color_table(&palette, &slots),
        )
    }
}
