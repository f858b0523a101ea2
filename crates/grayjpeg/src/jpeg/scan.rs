//! Baseline scan reconstruction.
//!
//! Walks the blocks of a single-component, non-interleaved scan in raster
//! order, decodes each one and writes its samples into the image. Restart
//! markers are verified against the positions recorded while de-stuffing.

use super::bit_reader::{EntropyCodedData, RestartMarker};
use super::block::BlockDecoder;
use super::idct::{inverse_dct, TransformMode};
use crate::error::{JpegError, Result};
use crate::pixels::PixelBuffer;

/// Where the assembler is within the scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
    /// The next block is decoded.
    Decoding,
    /// A restart interval just ended; a RSTn marker must follow.
    AtRestart,
    /// Every block has been written.
    Done,
}

/// Rebuilds an image from the entropy-coded data of one scan.
#[derive(Debug, Clone, Copy)]
pub struct ImageAssembler<'t> {
    blocks: BlockDecoder<'t>,
    transform: TransformMode,
    restart_interval: usize,
}

impl<'t> ImageAssembler<'t> {
    /// `restart_interval` is the number of blocks between RST markers,
    /// 0 if restarts are disabled.
    pub fn new(blocks: BlockDecoder<'t>, transform: TransformMode, restart_interval: u16) -> Self {
        ImageAssembler {
            blocks,
            transform,
            restart_interval: restart_interval as usize,
        }
    }

    /// Decode every block of the scan into `pixels`.
    pub fn assemble(&self, data: &EntropyCodedData, pixels: &mut PixelBuffer) -> Result<()> {
        let blocks_wide = pixels.width().div_ceil(8);
        let total_blocks = blocks_wide * pixels.height().div_ceil(8);

        log::debug!(
            "Scan: {} blocks ({} per row), restart interval {}, {} bytes, {} restart markers",
            total_blocks,
            blocks_wide,
            self.restart_interval,
            data.bytes().len(),
            data.restarts().len()
        );

        let mut reader = data.reader();
        let mut restarts = data.restarts().iter();
        let mut predictor = 0i32;
        let mut expected_rst = 0u8;
        let mut decoded = 0usize;

        let mut state = if total_blocks == 0 {
            ScanState::Done
        } else {
            ScanState::Decoding
        };

        while state != ScanState::Done {
            state = match state {
                ScanState::Decoding => {
                    let coefficients = self.blocks.decode(&mut reader, &mut predictor)?;
                    let samples = inverse_dct(&coefficients, self.transform);
                    pixels.put_block(decoded % blocks_wide, decoded / blocks_wide, &samples);
                    log::trace!("Block {}: DC={}", decoded, predictor);

                    decoded += 1;
                    if decoded == total_blocks {
                        ScanState::Done
                    } else if self.restart_interval > 0 && decoded % self.restart_interval == 0 {
                        ScanState::AtRestart
                    } else {
                        ScanState::Decoding
                    }
                }
                ScanState::AtRestart => {
                    reader.align_to_byte();
                    let offset = reader.position();

                    match restarts.next() {
                        Some(marker) if marker.offset == offset && marker.number == expected_rst => {}
                        other => {
                            return Err(JpegError::RestartMismatch {
                                expected: expected_rst,
                                offset,
                                found: describe_restart(other),
                            })
                        }
                    }

                    log::debug!("RST{} at scan byte {}, after block {}", expected_rst, offset, decoded);
                    predictor = 0;
                    expected_rst = (expected_rst + 1) % 8;
                    ScanState::Decoding
                }
                ScanState::Done => ScanState::Done,
            };
        }

        Ok(())
    }
}

fn describe_restart(marker: Option<&RestartMarker>) -> String {
    match marker {
        Some(marker) => format!("RST{} at scan byte {}", marker.number, marker.offset),
        None => "no restart marker".to_string(),
    }
}
