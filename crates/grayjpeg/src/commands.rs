//! File-level operations.

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

use crate::error::{JpegError, Result};
use crate::jpeg::{self, DecodeOptions, JpegInfo};
use crate::pixels::PixelBuffer;

/// Decode `input` and write it to `output` as binary PGM (P5).
///
/// The whole image is decoded before `output` is created, so a broken or
/// unsupported JPEG never leaves a file behind. If writing fails the
/// partial file is removed.
pub fn decode_to_pgm(input: &Path, output: &Path, options: DecodeOptions) -> Result<PixelBuffer> {
    let data = fs::read(input).map_err(|source| JpegError::ReadError { source })?;
    let pixels = jpeg::decode_with_options(&data, options)?;

    if let Err(source) = write_pgm(&pixels, output) {
        let _ = fs::remove_file(output);
        return Err(JpegError::WriteError { source });
    }

    Ok(pixels)
}

fn write_pgm(pixels: &PixelBuffer, output: &Path) -> std::io::Result<()> {
    let mut writer = BufWriter::new(File::create(output)?);
    pixels.write_pnm(&mut writer)
}

/// Read `input` and report its JPEG structure.
pub fn inspect_file(input: &Path) -> Result<JpegInfo> {
    let data = fs::read(input).map_err(|source| JpegError::ReadError { source })?;
    jpeg::inspect(&data)
}
