//! Animated GIF89a encoder.
//!
//! The encoder owns an append-only byte buffer. The header, logical screen
//! descriptor and looping extension are written at construction; every
//! appended frame adds a graphic control extension, an image descriptor, a
//! full 256-entry local color table and LZW image data; the trailer closes
//! the stream. No block is ever revisited, so the buffer always holds a
//! structurally valid prefix of a GIF stream.
//!
//! ```rust
//! use animgif::gif::{DisposalMethod, GifEncoder};
//! use animgif::{ColorType, Raster};
//!
//! let red = [255u8, 0, 0].repeat(4);
//! let blue = [0u8, 0, 255].repeat(4);
//!
//! let mut gif = GifEncoder::new(2, 2, 0);
//! for pixels in [&red, &blue] {
//!     let frame = Raster::new(pixels, 2, 2, ColorType::Rgb).unwrap();
//!     gif.append_frame(&frame, 50, DisposalMethod::ClearCanvas).unwrap();
//! }
//! let bytes = gif.finish();
//! assert_eq!(&bytes[..6], b"GIF89a");
//! assert_eq!(*bytes.last().unwrap(), 0x3B);
//! ```

pub mod block;

use crate::compress::LzwEncoder;
use crate::error::{Error, Result};
use crate::quantize::{QuantizedFrame, Quantizer, UniformQuantizer};
use crate::raster::Raster;

/// Palette entries per frame; the local color table is always written at this size.
pub const COLOR_COUNT: usize = 256;

/// Palette index reserved for transparent pixels.
pub const TRANSPARENT_INDEX: u8 = 0xFF;

/// How a renderer moves on from a frame to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DisposalMethod {
    /// Leave the frame in place and draw the next one over it.
    KeepCanvas = 1,
    /// Clear the frame's area to the background before the next frame.
    #[default]
    ClearCanvas = 2,
    /// Restore the canvas to its state before the frame was drawn.
    RestoreCanvas = 3,
}

/// Which disposal method ends up in each graphic control extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisposalPolicy {
    /// Always write [`DisposalMethod::ClearCanvas`], whatever the caller asked for.
    #[default]
    AlwaysClear,
    /// Write the disposal method passed with each frame.
    Honor,
}

/// GIF encoding options.
#[derive(Debug, Clone, Default)]
pub struct GifOptions {
    /// Netscape loop count; 0 loops forever.
    pub loop_count: u16,
    /// Disposal method selection.
    pub disposal: DisposalPolicy,
}

impl GifOptions {
    /// Loop forever and keep the always-clear disposal behavior.
    pub fn infinite() -> Self {
        Self::default()
    }

    /// Honor per-frame disposal methods.
    pub fn honoring_disposal(loop_count: u16) -> Self {
        Self {
            loop_count,
            disposal: DisposalPolicy::Honor,
        }
    }
}

/// One frame of a batch passed to [`GifEncoder::append_frames`] or [`encode`].
#[derive(Debug, Clone, Copy)]
pub struct AnimationFrame<'a> {
    /// Frame pixels; must match the canvas size.
    pub image: Raster<'a>,
    /// Display time in hundredths of a second.
    pub delay_cs: u16,
    /// Requested disposal method.
    pub disposal: DisposalMethod,
}

impl<'a> AnimationFrame<'a> {
    /// Frame with the default (clear canvas) disposal.
    pub fn new(image: Raster<'a>, delay_cs: u16) -> Self {
        Self {
            image,
            delay_cs,
            disposal: DisposalMethod::default(),
        }
    }
}

/// Builder for animated GIF streams.
#[derive(Debug)]
pub struct GifEncoder<Q = UniformQuantizer> {
    width: u16,
    height: u16,
    options: GifOptions,
    quantizer: Q,
    data: Vec<u8>,
    frame_count: u32,
    trailer_written: bool,
}

impl GifEncoder<UniformQuantizer> {
    /// Start a stream with the given canvas size. A `loop_count` of 0 loops forever.
    pub fn new(width: u16, height: u16, loop_count: u16) -> Self {
        let options = GifOptions {
            loop_count,
            ..Default::default()
        };
        Self::with_options(width, height, options, UniformQuantizer)
    }
}

impl<Q: Quantizer> GifEncoder<Q> {
    /// Start a stream with custom options and quantizer.
    pub fn with_options(width: u16, height: u16, options: GifOptions, quantizer: Q) -> Self {
        let mut data = Vec::with_capacity(64 * 1024);
        block::write_header(&mut data);
        block::write_logical_screen_descriptor(&mut data, width, height);
        block::write_loop_extension(&mut data, options.loop_count);
        log::debug!(
            "GIF stream started: {}x{}, loop count {}",
            width,
            height,
            options.loop_count
        );

        Self {
            width,
            height,
            options,
            quantizer,
            data,
            frame_count: 0,
            trailer_written: false,
        }
    }

    /// Canvas width.
    pub fn width(&self) -> u16 {
        self.width
    }

    /// Canvas height.
    pub fn height(&self) -> u16 {
        self.height
    }

    /// The options this stream was started with.
    pub fn options(&self) -> &GifOptions {
        &self.options
    }

    /// Number of frames appended so far.
    pub fn frame_count(&self) -> u32 {
        self.frame_count
    }

    /// Bytes written so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Number of bytes written so far.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false; the header is written at construction.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Quantize `image` with the encoder's quantizer and append it as a frame.
    ///
    /// `delay_cs` is the display time in hundredths of a second. Fails with
    /// [`Error::FrameSizeMismatch`] when `image` does not match the canvas; the
    /// buffer is left untouched in that case.
    pub fn append_frame(
        &mut self,
        image: &Raster<'_>,
        delay_cs: u16,
        disposal: DisposalMethod,
    ) -> Result<()> {
        self.check_size(image.width(), image.height())?;
        log::debug!("quantizing frame {}", self.frame_count);
        let quantized = self
            .quantizer
            .quantize(image, COLOR_COUNT, TRANSPARENT_INDEX);
        self.write_frame(&quantized, delay_cs, disposal);
        Ok(())
    }

    /// Like [`append_frame`](Self::append_frame) with a quantizer chosen for this call.
    pub fn append_frame_with<R: Quantizer + ?Sized>(
        &mut self,
        quantizer: &R,
        image: &Raster<'_>,
        delay_cs: u16,
        disposal: DisposalMethod,
    ) -> Result<()> {
        self.check_size(image.width(), image.height())?;
        log::debug!("quantizing frame {}", self.frame_count);
        let quantized = quantizer.quantize(image, COLOR_COUNT, TRANSPARENT_INDEX);
        self.write_frame(&quantized, delay_cs, disposal);
        Ok(())
    }

    /// Append a frame that is already indexed.
    ///
    /// Index [`TRANSPARENT_INDEX`] renders as transparent. Panics if the frame's
    /// index grid does not match its dimensions or its table exceeds 256 colors.
    pub fn append_indexed_frame(
        &mut self,
        frame: &QuantizedFrame,
        delay_cs: u16,
        disposal: DisposalMethod,
    ) -> Result<()> {
        self.check_size(frame.width, frame.height)?;
        self.write_frame(frame, delay_cs, disposal);
        Ok(())
    }

    /// Append a batch of frames in slice order.
    ///
    /// All sizes are checked before anything is written, so a mismatch leaves
    /// the buffer untouched. With the `parallel` feature the frames are
    /// quantized concurrently.
    pub fn append_frames(&mut self, frames: &[AnimationFrame<'_>]) -> Result<()>
    where
        Q: Sync,
    {
        for frame in frames {
            self.check_size(frame.image.width(), frame.image.height())?;
        }
        log::debug!("quantizing batch of {} frames", frames.len());
        let quantized = quantize_batch(&self.quantizer, frames);
        for (frame, indexed) in frames.iter().zip(&quantized) {
            self.write_frame(indexed, frame.delay_cs, frame.disposal);
        }
        Ok(())
    }

    /// Write the trailer byte. Call exactly once, after the last frame.
    pub fn append_trailer(&mut self) {
        debug_assert!(!self.trailer_written, "GIF trailer already written");
        self.data.push(block::TRAILER);
        self.trailer_written = true;
        log::debug!(
            "GIF stream finished: {} frames, {} bytes",
            self.frame_count,
            self.data.len()
        );
    }

    /// Write the trailer if it is still missing and return the stream.
    #[must_use]
    pub fn finish(mut self) -> Vec<u8> {
        if !self.trailer_written {
            self.append_trailer();
        }
        self.data
    }

    /// Return the bytes written so far without adding a trailer.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    fn check_size(&self, width: u32, height: u32) -> Result<()> {
        if width != self.width as u32 || height != self.height as u32 {
            return Err(Error::FrameSizeMismatch {
                width,
                height,
                expected_width: self.width as u32,
                expected_height: self.height as u32,
            });
        }
        Ok(())
    }

    fn write_frame(&mut self, frame: &QuantizedFrame, delay_cs: u16, disposal: DisposalMethod) {
        debug_assert!(!self.trailer_written, "frame appended after GIF trailer");
        assert_eq!(
            frame.indices.len(),
            self.width as usize * self.height as usize,
            "quantized frame does not cover the canvas"
        );
        assert!(
            frame.color_table.len() <= COLOR_COUNT,
            "color table exceeds {COLOR_COUNT} entries"
        );

        let disposal = match self.options.disposal {
            DisposalPolicy::AlwaysClear => DisposalMethod::ClearCanvas,
            DisposalPolicy::Honor => disposal,
        };

        log::debug!("LZW-encoding frame {}", self.frame_count);
        let mut lzw = LzwEncoder::new(COLOR_COUNT);
        lzw.extend(frame.indices.iter().copied());
        let lzw = lzw.finish();

        let start = self.data.len();
        block::write_graphic_control_extension(
            &mut self.data,
            disposal,
            delay_cs,
            TRANSPARENT_INDEX,
        );
        block::write_image_descriptor(&mut self.data, self.width, self.height);
        block::write_local_color_table(&mut self.data, &frame.color_table, COLOR_COUNT);
        block::write_image_data(&mut self.data, &lzw);

        log::debug!(
            "appended frame {}: {} colors, min code size {}, {} bytes",
            self.frame_count,
            frame.color_table.len(),
            lzw.min_code_size,
            self.data.len() - start
        );
        self.frame_count += 1;
    }
}

#[cfg(feature = "parallel")]
fn quantize_batch<Q: Quantizer + Sync>(
    quantizer: &Q,
    frames: &[AnimationFrame<'_>],
) -> Vec<QuantizedFrame> {
    use rayon::prelude::*;

    frames
        .par_iter()
        .map(|frame| quantizer.quantize(&frame.image, COLOR_COUNT, TRANSPARENT_INDEX))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn quantize_batch<Q: Quantizer>(
    quantizer: &Q,
    frames: &[AnimationFrame<'_>],
) -> Vec<QuantizedFrame> {
    frames
        .iter()
        .map(|frame| quantizer.quantize(&frame.image, COLOR_COUNT, TRANSPARENT_INDEX))
        .collect()
}

/// Encode a complete animation with the default uniform quantizer.
pub fn encode(
    frames: &[AnimationFrame<'_>],
    width: u16,
    height: u16,
    options: &GifOptions,
) -> Result<Vec<u8>> {
    encode_with_quantizer(frames, width, height, options, UniformQuantizer)
}

/// Encode a complete animation: header, every frame in order, trailer.
pub fn encode_with_quantizer<Q: Quantizer + Sync>(
    frames: &[AnimationFrame<'_>],
    width: u16,
    height: u16,
    options: &GifOptions,
    quantizer: Q,
) -> Result<Vec<u8>> {
    let mut encoder = GifEncoder::with_options(width, height, options.clone(), quantizer);
    encoder.append_frames(frames)?;
    Ok(encoder.finish())
}
