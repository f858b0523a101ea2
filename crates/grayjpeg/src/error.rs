//! Error types for JPEG decoding and PGM output.

use std::fmt;
use thiserror::Error;

use crate::jpeg::marker::Marker;

/// Result type alias for decoding operations.
pub type Result<T> = std::result::Result<T, JpegError>;

/// Coarse classification of a [`JpegError`].
///
/// Callers use this to tell a broken file apart from a valid JPEG that this
/// decoder does not handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The stream violates the JPEG marker or entropy-coding structure.
    Format,
    /// The stream is a valid JPEG using a feature outside baseline grayscale.
    Unsupported,
    /// The entropy-coded data cannot be decoded with the given tables.
    Decode,
    /// Reading the input or writing the output failed.
    Io,
}

/// Errors that can occur while decoding a JPEG or writing the result.
#[derive(Error)]
pub enum JpegError {
    /// The stream does not start with SOI (0xFFD8).
    #[error("not a JPEG stream (missing SOI marker)")]
    MissingSoi,

    /// A marker was expected but a different byte was found.
    #[error("expected a marker at offset {offset}, found byte 0x{found:02X}")]
    ExpectedMarker { offset: usize, found: u8 },

    /// The byte following 0xFF is not a marker code.
    #[error("invalid marker byte 0xFF{0:02X}")]
    InvalidMarker(u8),

    /// A marker that may not appear at this point of the stream.
    #[error("unexpected marker {0}")]
    UnexpectedMarker(Marker),

    /// The stream ended in the middle of a segment or before EOI.
    #[error("unexpected end of data while reading {0}")]
    UnexpectedEof(&'static str),

    /// A segment declares a length that does not fit the remaining data.
    #[error("{marker} segment declares {declared} bytes but only {available} remain")]
    SegmentOverrun {
        marker: Marker,
        declared: usize,
        available: usize,
    },

    /// A segment payload is inconsistent with its marker type.
    #[error("malformed {segment} segment: {reason}")]
    MalformedSegment {
        segment: &'static str,
        reason: String,
    },

    /// A Huffman count table that cannot form a prefix code.
    #[error("invalid Huffman table: {0}")]
    InvalidHuffmanTable(String),

    /// A scan references a table slot that was never defined.
    #[error("missing {kind} table {id}")]
    MissingTable { kind: &'static str, id: u8 },

    /// SOS or EOI was reached before a SOF0 frame header.
    #[error("missing frame header (SOF0)")]
    MissingFrame,

    /// EOI was reached without any entropy-coded scan.
    #[error("missing scan data (SOS)")]
    MissingScan,

    /// DC magnitude category outside 0..=11.
    #[error("invalid DC magnitude category {0}")]
    InvalidDcCategory(u8),

    /// An AC symbol with size 0 that is neither EOB nor ZRL.
    #[error("invalid AC run/size symbol 0x{0:02X}")]
    InvalidAcSymbol(u8),

    /// A run of zeros would place a coefficient past index 63.
    #[error("coefficient index {0} runs past the end of the block")]
    CoefficientOverrun(usize),

    /// The restart marker after an interval is missing or out of sequence.
    #[error("expected RST{expected} at scan byte {offset}, found {found}")]
    RestartMismatch {
        expected: u8,
        offset: usize,
        found: String,
    },

    /// A defined JPEG marker this decoder does not handle.
    #[error("unsupported JPEG marker {0}")]
    UnsupportedMarker(Marker),

    /// Sample precision other than 8 bits.
    #[error("unsupported sample precision: {0}-bit")]
    UnsupportedPrecision(u8),

    /// More than one image component (colour JPEG).
    #[error("unsupported component count {0}, only grayscale images are supported")]
    UnsupportedComponentCount(u8),

    /// A 16-bit quantization table.
    #[error("unsupported quantization table precision {0}")]
    UnsupportedTablePrecision(u8),

    /// Scan parameters other than the baseline ones.
    #[error("unsupported scan parameters: Ss={ss}, Se={se}, Ah/Al=0x{approx:02X}")]
    UnsupportedScan { ss: u8, se: u8, approx: u8 },

    /// The bit stream has no Huffman code matching the next 16 bits.
    #[error("invalid Huffman code in scan data")]
    InvalidHuffmanCode,

    /// Bits were requested past the end of the entropy-coded data.
    #[error("entropy-coded data is truncated")]
    TruncatedStream,

    /// Represents a failure to read from input.
    #[error("Read error")]
    ReadError { source: std::io::Error },

    /// Represents a failure to write target file.
    #[error("Write error")]
    WriteError { source: std::io::Error },
}

impl JpegError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        use JpegError::*;
        match self {
            UnsupportedMarker(_)
            | UnsupportedPrecision(_)
            | UnsupportedComponentCount(_)
            | UnsupportedTablePrecision(_)
            | UnsupportedScan { .. } => ErrorKind::Unsupported,
            InvalidHuffmanCode | TruncatedStream => ErrorKind::Decode,
            ReadError { .. } | WriteError { .. } => ErrorKind::Io,
            _ => ErrorKind::Format,
        }
    }

    pub(crate) fn malformed(segment: &'static str, reason: impl Into<String>) -> Self {
        JpegError::MalformedSegment {
            segment,
            reason: reason.into(),
        }
    }
}

impl fmt::Debug for JpegError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Use Display for Debug so unwrap() shows user-friendly messages
        write!(f, "{self}")
    }
}
