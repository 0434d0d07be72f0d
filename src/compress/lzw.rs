//! GIF-flavored LZW compression.
//!
//! LZW builds a dictionary of index sequences seen so far and emits one code
//! per longest known prefix. GIF's variant starts codes one bit wider than the
//! minimum code size, widens them as the table grows (up to 12 bits), reserves
//! a clear code and an end-of-information code right after the literal
//! range, and packs codes LSB first.
//!
//! Every stream produced here is self-contained: it opens with a clear code
//! and the dictionary is never shared between streams.

use std::collections::HashMap;

use crate::bits::BitWriter;

/// Widest code GIF allows.
pub const MAX_CODE_BITS: u8 = 12;

/// Number of codes addressable with [`MAX_CODE_BITS`].
pub const MAX_TABLE_SIZE: u16 = 1 << MAX_CODE_BITS;

/// Counters collected while compressing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LzwStats {
    /// Total codes written, including clear and end codes.
    pub codes_emitted: usize,
    /// Clear codes written, including the leading one.
    pub clear_codes: usize,
}

/// A finished LZW stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LzwOutput {
    /// The minimum code size byte that precedes the image data.
    pub min_code_size: u8,
    /// Packed codes, not yet split into sub-blocks.
    pub bytes: Vec<u8>,
    /// Counters for this stream.
    pub stats: LzwStats,
}

/// Smallest code size (at least 2) whose literal range covers `color_count` indices.
pub fn min_code_size(color_count: usize) -> u8 {
    let mut bits = 2u8;
    while (1usize << bits) < color_count {
        bits += 1;
    }
    bits
}

/// Incremental GIF LZW encoder.
///
/// ```rust
/// use animgif::compress::lzw::LzwEncoder;
///
/// let mut encoder = LzwEncoder::new(256);
/// encoder.extend([0u8]);
/// let out = encoder.finish();
/// assert_eq!(out.min_code_size, 8);
/// // clear, 0, end at 9 bits each, LSB first
/// assert_eq!(out.bytes, vec![0x00, 0x01, 0x04, 0x04]);
/// ```
#[derive(Debug)]
pub struct LzwEncoder {
    color_count: u16,
    min_code_size: u8,
    clear_code: u16,
    end_code: u16,
    code_size: u8,
    next_code: u16,
    /// (prefix code << 8 | index) -> code
    table: HashMap<u32, u16>,
    prefix: Option<u16>,
    writer: BitWriter,
    stats: LzwStats,
}

impl LzwEncoder {
    /// Start a stream over indices in `0..color_count`. Writes the leading clear code.
    ///
    /// Panics unless `1 <= color_count <= 256`.
    pub fn new(color_count: usize) -> Self {
        assert!(
            (1..=256).contains(&color_count),
            "LZW color count must be within 1..=256, got {color_count}"
        );
        let min_code_size = min_code_size(color_count);
        let clear_code = 1u16 << min_code_size;
        let mut encoder = Self {
            color_count: color_count as u16,
            min_code_size,
            clear_code,
            end_code: clear_code + 1,
            code_size: min_code_size + 1,
            next_code: clear_code + 2,
            table: HashMap::with_capacity(MAX_TABLE_SIZE as usize),
            prefix: None,
            writer: BitWriter::with_capacity(4096),
            stats: LzwStats::default(),
        };
        encoder.emit(clear_code);
        encoder.stats.clear_codes += 1;
        encoder
    }

    /// The minimum code size of this stream.
    #[inline]
    pub fn min_code_size(&self) -> u8 {
        self.min_code_size
    }

    /// Current code width in bits.
    #[inline]
    pub fn code_size(&self) -> u8 {
        self.code_size
    }

    /// Feed one color index.
    ///
    /// Panics if `index` is outside `0..color_count`.
    pub fn push(&mut self, index: u8) {
        assert!(
            (index as u16) < self.color_count,
            "LZW index {index} out of range for {} colors",
            self.color_count
        );

        let prefix = match self.prefix {
            Some(prefix) => prefix,
            None => {
                self.prefix = Some(index as u16);
                return;
            }
        };

        let key = (prefix as u32) << 8 | index as u32;
        if let Some(&code) = self.table.get(&key) {
            self.prefix = Some(code);
            return;
        }

        self.emit(prefix);
        if self.next_code < MAX_TABLE_SIZE {
            self.table.insert(key, self.next_code);
            self.next_code += 1;
            // The decoder lags one entry behind, so widen only once the
            // entry numbered 2^code_size exists.
            if self.next_code > (1 << self.code_size) && self.code_size < MAX_CODE_BITS {
                self.code_size += 1;
            }
        } else {
            self.emit(self.clear_code);
            self.stats.clear_codes += 1;
            self.reset_table();
        }
        self.prefix = Some(index as u16);
    }

    /// Feed a sequence of color indices.
    pub fn extend<I: IntoIterator<Item = u8>>(&mut self, indices: I) {
        for index in indices {
            self.push(index);
        }
    }

    /// Flush the pending prefix, write the end code and return the packed stream.
    #[must_use]
    pub fn finish(mut self) -> LzwOutput {
        if let Some(prefix) = self.prefix.take() {
            self.emit(prefix);
        }
        self.emit(self.end_code);

        let stats = self.stats;
        let bytes = self.writer.finish();
        log::trace!(
            "LZW stream: {} codes, {} clear codes, {} bytes",
            stats.codes_emitted,
            stats.clear_codes,
            bytes.len()
        );
        LzwOutput {
            min_code_size: self.min_code_size,
            bytes,
            stats,
        }
    }

    fn reset_table(&mut self) {
        self.table.clear();
        self.next_code = self.clear_code + 2;
        self.code_size = self.min_code_size + 1;
    }

    #[inline]
    fn emit(&mut self, code: u16) {
        self.writer.write_bits(code, self.code_size);
        self.stats.codes_emitted += 1;
    }
}

/// Compress a full index stream in one call.
pub fn lzw_compress(indices: &[u8], color_count: usize) -> LzwOutput {
    let mut encoder = LzwEncoder::new(color_count);
    encoder.extend(indices.iter().copied());
    encoder.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal GIF LZW decoder. Returns the indices and the number of clear codes seen.
    fn decode(bytes: &[u8], min_code_size: u8) -> (Vec<u8>, usize) {
        let clear = 1u16 << min_code_size;
        let end = clear + 1;
        let initial: Vec<Vec<u8>> = (0..clear + 2)
            .map(|c| if c < clear { vec![c as u8] } else { Vec::new() })
            .collect();

        let mut table = initial.clone();
        let mut width = min_code_size + 1;
        let mut bit_pos = 0usize;
        let mut prev: Option<Vec<u8>> = None;
        let mut out = Vec::new();
        let mut clears = 0;

        loop {
            let mut code = 0u16;
            for i in 0..width {
                let bit = (bytes[bit_pos / 8] >> (bit_pos % 8)) & 1;
                code |= (bit as u16) << i;
                bit_pos += 1;
            }

            if code == clear {
                table = initial.clone();
                width = min_code_size + 1;
                prev = None;
                clears += 1;
                continue;
            }
            if code == end {
                break;
            }

            let entry = if (code as usize) < table.len() {
                table[code as usize].clone()
            } else {
                let p = prev.clone().expect("code before any literal");
                let mut e = p.clone();
                e.push(p[0]);
                e
            };
            out.extend_from_slice(&entry);

            if let Some(mut p) = prev.take() {
                if table.len() < MAX_TABLE_SIZE as usize {
                    p.push(entry[0]);
                    table.push(p);
                }
            }
            if table.len() == (1 << width) && width < MAX_CODE_BITS {
                width += 1;
            }
            prev = Some(entry);
        }

        (out, clears)
    }

    fn pseudo_random(len: usize, mut seed: u32, modulus: u32) -> Vec<u8> {
        let mut out = Vec::with_capacity(len);
        while out.len() < len {
            seed = seed.wrapping_mul(1664525).wrapping_add(1013904223);
            out.push(((seed >> 16) % modulus) as u8);
        }
        out
    }

    #[test]
    fn test_min_code_size() {
        assert_eq!(min_code_size(1), 2);
        assert_eq!(min_code_size(2), 2);
        assert_eq!(min_code_size(4), 2);
        assert_eq!(min_code_size(5), 3);
        assert_eq!(min_code_size(16), 4);
        assert_eq!(min_code_size(17), 5);
        assert_eq!(min_code_size(256), 8);
    }

    #[test]
    fn test_single_pixel_stream() {
        let out = lzw_compress(&[0], 256);
        assert_eq!(out.min_code_size, 8);
        assert_eq!(out.bytes, vec![0x00, 0x01, 0x04, 0x04]);
        assert_eq!(
            out.stats,
            LzwStats {
                codes_emitted: 3,
                clear_codes: 1
            }
        );
    }

    #[test]
    fn test_empty_input_is_clear_then_end() {
        let out = lzw_compress(&[], 256);
        // clear (256) then end (257), 9 bits each
        assert_eq!(out.bytes, vec![0x00, 0x03, 0x02]);
        assert_eq!(out.stats.codes_emitted, 2);
    }

    #[test]
    fn test_small_palette_known_stream() {
        // Classic 2-bit example: codes clear(4) 1 1 end(5) at 3 bits.
        // Indices [1, 1]: clear=4, then 1, insert 6, then 1, end=5.
        let out = lzw_compress(&[1, 1], 4);
        assert_eq!(out.min_code_size, 2);
        // 100 | 001 | 001 | 101 packed LSB first: bits 0-11 = 0,0,1,1,0,0,1,0,0,1,0,1
        assert_eq!(out.bytes, vec![0b0100_1100, 0b0000_1010]);
    }

    #[test]
    fn test_roundtrip_repetitive() {
        let data: Vec<u8> = (0..10_000).map(|i| ((i / 7) % 3) as u8).collect();
        let out = lzw_compress(&data, 256);
        let (decoded, _) = decode(&out.bytes, out.min_code_size);
        assert_eq!(decoded, data);
        assert!(out.bytes.len() < data.len() / 4);
    }

    #[test]
    fn test_roundtrip_small_alphabet() {
        let data = pseudo_random(5000, 7, 4);
        let out = lzw_compress(&data, 4);
        assert_eq!(out.min_code_size, 2);
        let (decoded, _) = decode(&out.bytes, 2);
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_table_overflow_emits_mid_stream_clear() {
        let data = pseudo_random(50_000, 0x1234_5678, 256);
        let out = lzw_compress(&data, 256);
        assert!(
            out.stats.clear_codes >= 2,
            "expected a mid-stream clear, got {:?}",
            out.stats
        );

        let (decoded, clears) = decode(&out.bytes, out.min_code_size);
        assert_eq!(clears, out.stats.clear_codes);
        assert_eq!(decoded, data);
    }

    #[test]
    fn test_code_size_resets_after_clear() {
        let mut encoder = LzwEncoder::new(256);
        assert_eq!(encoder.code_size(), 9);

        let mut saw_twelve = false;
        let mut saw_reset = false;
        for index in pseudo_random(50_000, 99, 256) {
            let before = encoder.code_size();
            encoder.push(index);
            if encoder.code_size() == 12 {
                saw_twelve = true;
            }
            if before == 12 && encoder.code_size() == 9 {
                saw_reset = true;
            }
        }
        assert!(saw_twelve);
        assert!(saw_reset);
    }

    #[test]
    fn test_code_size_growth_point() {
        // With 4 colors: first free code is 6, width 3. Distinct pairs force
        // one insertion per emitted code. Width reaches 4 only after code 8 is
        // inserted.
        let mut encoder = LzwEncoder::new(4);
        assert_eq!(encoder.code_size(), 3);
        // 0 1 -> insert 6; 2 -> insert 7; 3 -> insert 8 (width 4)
        for index in [0u8, 1, 2] {
            encoder.push(index);
        }
        assert_eq!(encoder.code_size(), 3);
        encoder.push(3);
        assert_eq!(encoder.code_size(), 4);
    }

    #[test]
    fn test_extend_matches_push() {
        let data = pseudo_random(300, 3, 16);
        let mut a = LzwEncoder::new(16);
        for &i in &data {
            a.push(i);
        }
        let mut b = LzwEncoder::new(16);
        b.extend(data.iter().copied());
        assert_eq!(a.finish(), b.finish());
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_out_of_range_index_panics() {
        let mut encoder = LzwEncoder::new(4);
        encoder.push(4);
    }
}
