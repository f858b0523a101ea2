//! Baseline grayscale JPEG decoding.
//!
//! # Architecture
//!
//! ```text
//! JPEG → segments → de-stuff → Huffman decode → dequantize → IDCT → PixelBuffer
//! ```
//!
//! Only sequential Huffman-coded frames (SOF0) with 8-bit samples and a
//! single component are handled. Anything else is reported as
//! [`ErrorKind::Unsupported`](crate::ErrorKind::Unsupported).

pub mod bit_reader;
pub mod block;
pub mod decoder;
pub mod huffman;
pub mod idct;
pub mod marker;
pub mod parser;
pub mod quantization;
pub mod scan;

pub use bit_reader::{BitReader, EntropyCodedData, RestartMarker};
pub use block::{BlockDecoder, NATURAL_TO_ZIGZAG, ZIGZAG_TO_NATURAL};
pub use decoder::{DecodeOptions, Decoder, JpegInfo, SegmentInfo};
pub use huffman::{HuffmanCode, HuffmanTable, TableClass};
pub use idct::{inverse_dct, TransformMode};
pub use marker::Marker;
pub use parser::{Component, FrameHeader, ScanHeader, Segment, SegmentReader};
pub use quantization::QuantizationTable;
pub use scan::ImageAssembler;

use crate::error::Result;
use crate::pixels::PixelBuffer;

/// Decode a baseline grayscale JPEG with default options.
///
/// # Example
/// ```ignore
/// let jpeg = std::fs::read("photo.jpg")?;
/// let image = grayjpeg::decode(&jpeg)?;
/// println!("{}x{}", image.width(), image.height());
/// ```
pub fn decode(data: &[u8]) -> Result<PixelBuffer> {
    Decoder::new().decode(data)
}

/// Decode a baseline grayscale JPEG.
pub fn decode_with_options(data: &[u8], options: DecodeOptions) -> Result<PixelBuffer> {
    Decoder::with_options(options).decode(data)
}

/// Report the segments, tables and frame geometry of a JPEG stream.
pub fn inspect(data: &[u8]) -> Result<JpegInfo> {
    Decoder::new().inspect(data)
}
