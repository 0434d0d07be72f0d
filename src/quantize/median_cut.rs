//! Median-cut palette selection.
//!
//! Builds a histogram of opaque colors, keeps it as-is when it already fits
//! the budget, and otherwise splits the color box with the widest channel
//! range at its weighted median until the budget is reached.

use std::collections::HashMap;

use super::{build_color_table, is_transparent, opaque_slots, QuantizedFrame, Quantizer};
use crate::color::{rgb_distance_sq, Rgb};
use crate::raster::Raster;

/// Image-adaptive quantizer.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCutQuantizer {
    /// Enable Floyd–Steinberg dithering (on RGB channels only).
    pub dithering: bool,
}

impl MedianCutQuantizer {
    /// Quantizer without dithering.
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantizer with Floyd–Steinberg dithering.
    pub fn dithered() -> Self {
        Self { dithering: true }
    }
}

#[derive(Clone)]
struct ColorCount {
    rgb: Rgb,
    count: u32,
}

struct ColorBox {
    colors: Vec<ColorCount>,
    min: Rgb,
    max: Rgb,
}

impl ColorBox {
    fn from_colors(colors: Vec<ColorCount>) -> Self {
        let mut min = [255u8; 3];
        let mut max = [0u8; 3];
        for c in &colors {
            for ch in 0..3 {
                min[ch] = min[ch].min(c.rgb[ch]);
                max[ch] = max[ch].max(c.rgb[ch]);
            }
        }
        Self { colors, min, max }
    }

    /// Widest channel and its range.
    fn range(&self) -> (usize, u8) {
        let mut channel = 0;
        let mut widest = 0u8;
        for ch in 0..3 {
            let r = self.max[ch].saturating_sub(self.min[ch]);
            if r > widest {
                widest = r;
                channel = ch;
            }
        }
        (channel, widest)
    }

    fn can_split(&self) -> bool {
        self.colors.len() > 1
    }

    fn split(self) -> (ColorBox, ColorBox) {
        let (channel, _) = self.range();
        let mut colors = self.colors;
        colors.sort_by_key(|c| c.rgb[channel]);

        let total: u64 = colors.iter().map(|c| c.count as u64).sum();
        let mut acc = 0u64;
        let mut split_idx = 0;
        for (i, c) in colors.iter().enumerate() {
            acc += c.count as u64;
            if acc >= total / 2 {
                split_idx = i;
                break;
            }
        }
        // Both halves must be non-empty.
        let split_idx = split_idx.min(colors.len() - 2);
        let right = colors.split_off(split_idx + 1);
        (ColorBox::from_colors(colors), ColorBox::from_colors(right))
    }

    fn mean_color(&self) -> Rgb {
        let mut sums = [0u64; 3];
        let mut total = 0u64;
        for c in &self.colors {
            let cnt = c.count as u64;
            for ch in 0..3 {
                sums[ch] += c.rgb[ch] as u64 * cnt;
            }
            total += cnt;
        }
        if total == 0 {
            return [0, 0, 0];
        }
        [
            (sums[0] / total) as u8,
            (sums[1] / total) as u8,
            (sums[2] / total) as u8,
        ]
    }
}

fn median_cut_palette(colors: Vec<ColorCount>, max_colors: usize) -> Vec<Rgb> {
    if colors.is_empty() || max_colors == 0 {
        return Vec::new();
    }
    let mut boxes = vec![ColorBox::from_colors(colors)];
    while boxes.len() < max_colors {
        let widest = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.can_split())
            .max_by_key(|(_, b)| b.range().1)
            .map(|(i, _)| i);
        let Some(idx) = widest else {
            break;
        };
        let (l, r) = boxes.swap_remove(idx).split();
        boxes.push(l);
        boxes.push(r);
    }

    boxes.iter().map(ColorBox::mean_color).collect()
}

fn nearest_palette_index(color: Rgb, palette: &[Rgb]) -> usize {
    let mut best_idx = 0;
    let mut best_dist = u32::MAX;
    for (i, &p) in palette.iter().enumerate() {
        let dist = rgb_distance_sq(color, p);
        if dist < best_dist {
            best_dist = dist;
            best_idx = i;
            if dist == 0 {
                break;
            }
        }
    }
    best_idx
}

#[inline]
fn rgb_key(rgb: Rgb) -> u32 {
    (rgb[0] as u32) << 16 | (rgb[1] as u32) << 8 | rgb[2] as u32
}

fn histogram(image: &Raster<'_>) -> Vec<ColorCount> {
    let mut hist = HashMap::<u32, u32>::new();
    for px in image.rgba_pixels().filter(|&px| !is_transparent(px)) {
        *hist.entry(rgb_key([px[0], px[1], px[2]])).or_insert(0) += 1;
    }
    let mut colors: Vec<ColorCount> = hist
        .into_iter()
        .map(|(k, count)| ColorCount {
            rgb: [(k >> 16) as u8, (k >> 8) as u8, k as u8],
            count,
        })
        .collect();
    // Most frequent first; ties by value so output does not depend on hash order.
    colors.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| rgb_key(a.rgb).cmp(&rgb_key(b.rgb)))
    });
    colors
}

impl Quantizer for MedianCutQuantizer {
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
        let colors = histogram(image);
        let exact = colors.len() <= slots.len();

        let palette: Vec<Rgb> = if exact {
            colors.iter().map(|c| c.rgb).collect()
        } else {
            median_cut_palette(colors.clone(), slots.len())
        };

        let indices = if self.dithering && !exact {
            dither(image, &palette, &slots, transparent_index)
        } else {
            let mut color_to_slot = HashMap::with_capacity(colors.len());
            for c in &colors {
                let slot = slots[nearest_palette_index(c.rgb, &palette)];
                color_to_slot.insert(rgb_key(c.rgb), slot);
            }
            image
                .rgba_pixels()
                .map(|px| {
                    if is_transparent(px) {
                        transparent_index
                    } else {
                        color_to_slot[&rgb_key([px[0], px[1], px[2]])]
                    }
                })
                .collect()
        };

        log::trace!(
            "median cut: {} distinct colors -> {} palette entries",
            colors.len(),
            palette.len()
        );
        QuantizedFrame::new(
            image.width(),
            image.height(),
            indices,
            build_color_table(&palette, &slots),
        )
    }
}

/// Floyd–Steinberg dithering on RGB; transparent pixels neither take nor spread error.
fn dither(image: &Raster<'_>, palette: &[Rgb], slots: &[u8], transparent_index: u8) -> Vec<u8> {
    let width = image.width() as usize;
    let mut indices = Vec::with_capacity(image.pixel_count());
    let mut err = vec![[0f32; 3]; width + 2];
    let mut next_err = vec![[0f32; 3]; width + 2];

    let mut pixels = image.rgba_pixels();
    for _y in 0..image.height() {
        for x in 0..width {
            let Some(px) = pixels.next() else {
                break;
            };
            if is_transparent(px) {
                indices.push(transparent_index);
                continue;
            }

            let mut adjusted = [0u8; 3];
            for ch in 0..3 {
                adjusted[ch] = (px[ch] as f32 + err[x + 1][ch]).clamp(0.0, 255.0) as u8;
            }
            let idx = nearest_palette_index(adjusted, palette);
            indices.push(slots[idx]);

            let p = palette[idx];
            for ch in 0..3 {
                let e = adjusted[ch] as f32 - p[ch] as f32;
                //       * 7
                // 3 5 1
                err[x + 2][ch] += e * 7.0 / 16.0;
                next_err[x][ch] += e * 3.0 / 16.0;
                next_err[x + 1][ch] += e * 5.0 / 16.0;
                next_err[x + 2][ch] += e * 1.0 / 16.0;
            }
        }
        err.fill([0.0; 3]);
        std::mem::swap(&mut err, &mut next_err);
    }
    indices
}
