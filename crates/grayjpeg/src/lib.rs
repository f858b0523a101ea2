//! # grayjpeg
//!
//! A decoder for baseline, grayscale JPEG images (sequential DCT, Huffman
//! coding, 8-bit samples, one component) producing a raw 8-bit raster that
//! can be written out as binary PGM.
//!
//! # Usage Examples
//!
//! ## Decode in memory
//!
//! ```rust,ignore
//! let jpeg = std::fs::read("photo.jpg")?;
//! let image = grayjpeg::decode(&jpeg)?;
//!
//! let mut pgm = Vec::new();
//! image.write_pnm(&mut pgm)?;
//! ```
//!
//! ## Decode a file
//!
//! ```rust,ignore
//! use grayjpeg::{commands, DecodeOptions, TransformMode};
//!
//! let options = DecodeOptions::default().with_transform(TransformMode::Legacy);
//! commands::decode_to_pgm("photo.jpg".as_ref(), "photo.pgm".as_ref(), options)?;
//! ```

#![warn(clippy::redundant_else)]

pub mod commands;
pub mod error;
pub mod jpeg;
pub mod pixels;

pub use crate::error::{ErrorKind, JpegError, Result};
pub use crate::jpeg::{
    decode, decode_with_options, inspect, DecodeOptions, Decoder, JpegInfo, TransformMode,
};
pub use crate::pixels::PixelBuffer;
