//! # animgif
//!
//! A small, from-scratch animated GIF encoder.
//!
//! This library assembles raster frames into a single GIF89a stream with a
//! hand-implemented, GIF-flavored LZW compressor. Color quantization is a
//! pluggable [`Quantizer`]; a uniform lattice quantizer and a median-cut
//! quantizer ship with the crate.
//!
//! ## Features
//!
//! - **Append-only encoder**: every call only appends complete blocks
//! - **Looping animations** via the NETSCAPE2.0 application extension
//! - **Per-frame local color tables** with a reserved transparent index
//! - Optional parallel quantization of frame batches via the `parallel` feature
//!
//! ## Example
//!
//! ```rust
//! use animgif::gif::{DisposalMethod, GifEncoder};
//! use animgif::{ColorType, Raster};
//!
//! let pixels: Vec<u8> = vec![255, 0, 0, 255]; // 1x1 red RGBA pixel
//! let frame = Raster::new(&pixels, 1, 1, ColorType::Rgba).unwrap();
//!
//! let mut gif = GifEncoder::new(1, 1, 0);
//! gif.append_frame(&frame, 10, DisposalMethod::ClearCanvas).unwrap();
//! gif.append_trailer();
//! let bytes = gif.into_bytes();
//! assert_eq!(&bytes[..6], b"GIF89a");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod bits;
pub mod color;
pub mod compress;
pub mod error;
pub mod gif;
pub mod quantize;
pub mod raster;

pub use color::{ColorType, Rgb};
pub use error::{Error, Result};
pub use gif::{AnimationFrame, DisposalMethod, DisposalPolicy, GifEncoder, GifOptions};
pub use quantize::{MedianCutQuantizer, QuantizedFrame, Quantizer, UniformQuantizer};
pub use raster::Raster;
