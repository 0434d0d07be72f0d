//! Error types for the animgif library.

use std::fmt;

/// Result type alias for animgif operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building rasters or appending frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An appended frame does not match the canvas fixed at construction.
    FrameSizeMismatch {
        /// Supplied frame width.
        width: u32,
        /// Supplied frame height.
        height: u32,
        /// Canvas width.
        expected_width: u32,
        /// Canvas height.
        expected_height: u32,
    },
    /// Invalid raster dimensions (zero width or height).
    InvalidDimensions {
        /// Raster width.
        width: u32,
        /// Raster height.
        height: u32,
    },
    /// Pixel data length doesn't match expected size.
    InvalidDataLength {
        /// Expected number of bytes.
        expected: usize,
        /// Actual number of bytes provided.
        actual: usize,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::FrameSizeMismatch {
                width,
                height,
                expected_width,
                expected_height,
            } => {
                write!(
                    f,
                    "Frame size mismatch: got {}x{}, canvas is {}x{}",
                    width, height, expected_width, expected_height
                )
            }
            Error::InvalidDimensions { width, height } => {
                write!(f, "Invalid image dimensions: {}x{}", width, height)
            }
            Error::InvalidDataLength { expected, actual } => {
                write!(
                    f,
                    "Invalid pixel data length: expected {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl std::error::Error for Error {}
