//! Bit-level packing utilities for GIF encoding.
//!
//! GIF uses two opposite bit orders: the flag bytes in its block headers are
//! filled from the most significant bit down, while LZW codes in the image
//! data are packed least significant bit first. [`PackedFieldByte`] covers the
//! former and [`BitWriter`] the latter.

/// A single flag byte assembled from sub-byte fields, MSB first.
///
/// The first field pushed occupies the highest bits. Fields are masked to
/// their declared width, so oversized values lose their upper bits. Pushing
/// more than 8 bits in total is a programming error and panics.
///
/// ```rust
/// use animgif::bits::PackedFieldByte;
///
/// let flags = PackedFieldByte::new()
///     .push_flag(true)
///     .push(0b101, 3)
///     .push(0, 4)
///     .value();
/// assert_eq!(flags, 0b1101_0000);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PackedFieldByte {
    value: u8,
    bits_used: u8,
}

impl PackedFieldByte {
    /// Create an empty flag byte.
    pub const fn new() -> Self {
        Self {
            value: 0,
            bits_used: 0,
        }
    }

    /// Append the low `bit_width` bits of `value` below the fields written so far.
    #[must_use]
    pub const fn push(self, value: u8, bit_width: u8) -> Self {
        assert!(
            self.bits_used + bit_width <= 8,
            "packed field byte overflow: more than 8 bits pushed"
        );
        if bit_width == 0 {
            return self;
        }
        let mask = ((1u16 << bit_width) - 1) as u8;
        let shift = 8 - self.bits_used - bit_width;
        Self {
            value: self.value | ((value & mask) << shift),
            bits_used: self.bits_used + bit_width,
        }
    }

    /// Append a single-bit field.
    #[must_use]
    pub const fn push_flag(self, flag: bool) -> Self {
        self.push(flag as u8, 1)
    }

    /// The accumulated byte. Unwritten low bits read as zero.
    #[inline]
    pub const fn value(self) -> u8 {
        self.value
    }

    /// Number of bits consumed so far (0-8).
    #[inline]
    pub const fn bits_used(self) -> u8 {
        self.bits_used
    }
}

/// A bit writer that packs variable-width codes into bytes, LSB first (for GIF LZW).
#[derive(Debug)]
pub struct BitWriter {
    buffer: Vec<u8>,
    acc: u32,
    bits_in_acc: u8,
}

impl BitWriter {
    /// Create a new bit writer with default capacity.
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create a new bit writer with specified byte capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
            acc: 0,
            bits_in_acc: 0,
        }
    }

    /// Write the low `num_bits` bits of `value`, LSB first.
    ///
    /// # Arguments
    /// * `value` - The value to write (only lower `num_bits` are used)
    /// * `num_bits` - Number of bits to write (0-16)
    #[inline]
    pub fn write_bits(&mut self, value: u16, num_bits: u8) {
        debug_assert!(num_bits <= 16);
        let masked = value as u32 & ((1u32 << num_bits) - 1);
        self.acc |= masked << self.bits_in_acc;
        self.bits_in_acc += num_bits;

        while self.bits_in_acc >= 8 {
            self.buffer.push(self.acc as u8);
            self.acc >>= 8;
            self.bits_in_acc -= 8;
        }
    }

    /// Pads the final partial byte with zeros.
    pub fn flush(&mut self) {
        if self.bits_in_acc > 0 {
            self.buffer.push(self.acc as u8);
            self.acc = 0;
            self.bits_in_acc = 0;
        }
    }

    /// Flush and return the packed bytes.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        self.flush();
        self.buffer
    }

    /// Returns length in bytes (not counting partial byte).
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// True when nothing has been written, not even a partial byte.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty() && self.bits_in_acc == 0
    }

    /// Bits pending in the partial byte (0-7).
    pub fn bit_position(&self) -> u8 {
        self.bits_in_acc
    }
}

impl Default for BitWriter {
    fn default() -> Self {
        Self::new()
    }
}
