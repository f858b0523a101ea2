//! Per-block coefficient decoding.
//!
//! Turns the Huffman-coded DC difference and AC run/size symbols of one 8x8
//! block into 64 dequantized coefficients in natural (row-major) order.

use super::bit_reader::BitReader;
use super::huffman::HuffmanCode;
use super::quantization::QuantizationTable;
use crate::error::{JpegError, Result};

/// Zigzag order to natural (row-major) order mapping.
/// JPEG stores quantization/coefficient values in zigzag order.
pub const ZIGZAG_TO_NATURAL: [usize; 64] = [
    0, 1, 8, 16, 9, 2, 3, 10, 17, 24, 32, 25, 18, 11, 4, 5, 12, 19, 26, 33, 40, 48, 41, 34, 27, 20,
    13, 6, 7, 14, 21, 28, 35, 42, 49, 56, 57, 50, 43, 36, 29, 22, 15, 23, 30, 37, 44, 51, 58, 59,
    52, 45, 38, 31, 39, 46, 53, 60, 61, 54, 47, 55, 62, 63,
];

/// Natural (row-major) order to zigzag order mapping.
pub const NATURAL_TO_ZIGZAG: [usize; 64] = {
    let mut table = [0usize; 64];
    let mut i = 0;
    while i < 64 {
        table[ZIGZAG_TO_NATURAL[i]] = i;
        i += 1;
    }
    table
};

/// Largest DC difference category in 8-bit baseline JPEG.
const MAX_DC_CATEGORY: u8 = 11;

/// AC symbol: end of block.
const EOB: u8 = 0x00;

/// AC symbol: run of 16 zeros.
const ZRL: u8 = 0xF0;

/// Decodes 8x8 blocks of one component.
#[derive(Debug, Clone, Copy)]
pub struct BlockDecoder<'t> {
    dc_table: &'t HuffmanCode,
    ac_table: &'t HuffmanCode,
    quant_table: &'t QuantizationTable,
}

impl<'t> BlockDecoder<'t> {
    pub fn new(
        dc_table: &'t HuffmanCode,
        ac_table: &'t HuffmanCode,
        quant_table: &'t QuantizationTable,
    ) -> Self {
        BlockDecoder {
            dc_table,
            ac_table,
            quant_table,
        }
    }

    /// Decode one block into dequantized coefficients in natural order.
    ///
    /// `dc_predictor` holds the previous block's DC value and is updated.
    pub fn decode(&self, reader: &mut BitReader, dc_predictor: &mut i32) -> Result<[i32; 64]> {
        let zigzag = decode_coefficients(reader, self.dc_table, self.ac_table, dc_predictor)?;
        Ok(dequantize(&zigzag, self.quant_table))
    }
}

/// Decode the quantized coefficients of one block, in zigzag order.
pub fn decode_coefficients(
    reader: &mut BitReader,
    dc_table: &HuffmanCode,
    ac_table: &HuffmanCode,
    dc_predictor: &mut i32,
) -> Result<[i32; 64]> {
    let mut block = [0i32; 64];

    let dc_size = dc_table.decode(reader)?;
    if dc_size > MAX_DC_CATEGORY {
        return Err(JpegError::InvalidDcCategory(dc_size));
    }
    let dc_diff = reader.receive_extend(dc_size)?;
    *dc_predictor = dc_predictor.wrapping_add(dc_diff);
    block[0] = *dc_predictor;

    let mut k = 1;
    while k < 64 {
        let symbol = ac_table.decode(reader)?;
        let run = (symbol >> 4) as usize;
        let size = symbol & 0x0F;

        match symbol {
            EOB => break,
            ZRL => {
                k += 16;
                if k > 64 {
                    return Err(JpegError::CoefficientOverrun(k - 1));
                }
            }
            _ if size == 0 => return Err(JpegError::InvalidAcSymbol(symbol)),
            _ => {
                k += run;
                if k >= 64 {
                    return Err(JpegError::CoefficientOverrun(k));
                }
                block[k] = reader.receive_extend(size)?;
                k += 1;
            }
        }
    }

    Ok(block)
}

/// Multiply zigzag-ordered coefficients by the table and scatter them
/// into natural order.
pub fn dequantize(zigzag: &[i32; 64], quant_table: &QuantizationTable) -> [i32; 64] {
    let mut natural = [0i32; 64];
    for (i, &coefficient) in zigzag.iter().enumerate() {
        natural[ZIGZAG_TO_NATURAL[i]] =
            coefficient.saturating_mul(quant_table.get_zigzag(i) as i32);
    }
    natural
}
