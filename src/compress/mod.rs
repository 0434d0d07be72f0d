//! Compression algorithms.
//!
//! GIF image data is always LZW-compressed; see [`lzw`] for the variable
//! code width variant it uses.

pub mod lzw;

pub use lzw::{lzw_compress, LzwEncoder, LzwOutput, LzwStats};
