//! Canonical Huffman codes for JPEG entropy decoding.
//!
//! A DHT segment only transmits how many codes exist for each length and the
//! symbols in code-length order. The codes themselves are implied by the
//! canonical assignment of ITU T.81 Annex C, which is what
//! [`HuffmanCode::from_table`] reconstructs.

use super::bit_reader::BitReader;
use crate::error::{JpegError, Result};

/// Longest code length a JPEG Huffman table can describe.
pub const MAX_CODE_LENGTH: usize = 16;

/// Table class as given in the high nibble of the DHT table header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableClass {
    /// Codes for DC difference categories.
    Dc,
    /// Codes for AC run/size symbols.
    Ac,
}

impl TableClass {
    pub(crate) fn from_u8(class: u8) -> Option<Self> {
        match class {
            0 => Some(TableClass::Dc),
            1 => Some(TableClass::Ac),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TableClass::Dc => "DC Huffman",
            TableClass::Ac => "AC Huffman",
        }
    }
}

/// Huffman table as transmitted in a DHT segment.
#[derive(Debug, Clone)]
pub struct HuffmanTable {
    /// Table class.
    pub class: TableClass,
    /// Table ID (0-3).
    pub id: u8,
    /// Number of codes of each length (1-16 bits).
    pub code_lengths: [u8; 16],
    /// Symbol values in code-length order (up to 256).
    pub values: Vec<u8>,
}

/// Compiled canonical code, decodable bit by bit.
///
/// For every code length `L` the codes of that length form one contiguous
/// range starting at `first_code[L]`, and their symbols form one contiguous
/// range of `values` starting at `first_index[L]`.
#[derive(Debug, Clone)]
pub struct HuffmanCode {
    first_code: [u16; MAX_CODE_LENGTH + 1],
    first_index: [u16; MAX_CODE_LENGTH + 1],
    count: [u16; MAX_CODE_LENGTH + 1],
    values: Vec<u8>,
}

impl HuffmanCode {
    /// Build the canonical code for a parsed Huffman table.
    pub fn from_table(table: &HuffmanTable) -> Result<Self> {
        Self::new(&table.code_lengths, &table.values)
    }

    /// Build the canonical code from the 16 length counts and the symbols.
    ///
    /// Implements JPEG specification Figure C.1 and C.2 without
    /// materializing the per-symbol size and code lists.
    pub fn new(code_lengths: &[u8; 16], values: &[u8]) -> Result<Self> {
        let total: usize = code_lengths.iter().map(|&n| n as usize).sum();
        if total > 256 {
            return Err(JpegError::InvalidHuffmanTable(format!(
                "{total} symbols, at most 256 allowed"
            )));
        }
        if total != values.len() {
            return Err(JpegError::InvalidHuffmanTable(format!(
                "counts announce {total} symbols but {} were given",
                values.len()
            )));
        }

        let mut huffman = HuffmanCode {
            first_code: [0; MAX_CODE_LENGTH + 1],
            first_index: [0; MAX_CODE_LENGTH + 1],
            count: [0; MAX_CODE_LENGTH + 1],
            values: values.to_vec(),
        };

        let mut code: u32 = 0;
        let mut index: u16 = 0;
        for len in 1..=MAX_CODE_LENGTH {
            let count = code_lengths[len - 1] as u32;

            huffman.first_code[len] = code as u16;
            huffman.first_index[len] = index;
            huffman.count[len] = count as u16;

            code += count;
            if code > (1u32 << len) {
                return Err(JpegError::InvalidHuffmanTable(format!(
                    "codes of length {len} overflow the code space"
                )));
            }
            index += count as u16;
            code <<= 1;
        }

        Ok(huffman)
    }

    /// Symbol values in code-length order.
    #[inline]
    pub fn values(&self) -> &[u8] {
        &self.values
    }

    /// All `(length, code, symbol)` triples in canonical order.
    pub fn codes(&self) -> impl Iterator<Item = (u8, u16, u8)> + '_ {
        (1..=MAX_CODE_LENGTH).flat_map(move |len| {
            (0..self.count[len]).map(move |offset| {
                let symbol = self.values[(self.first_index[len] + offset) as usize];
                (len as u8, self.first_code[len] + offset, symbol)
            })
        })
    }

    /// Look up the symbol of a complete code, if `code` of `len` bits is one.
    #[inline]
    pub fn lookup(&self, len: usize, code: u16) -> Option<u8> {
        if len == 0 || len > MAX_CODE_LENGTH {
            return None;
        }
        let offset = code.checked_sub(self.first_code[len])?;
        if offset < self.count[len] {
            Some(self.values[(self.first_index[len] + offset) as usize])
        } else {
            None
        }
    }

    /// Decode one symbol, reading one bit at a time.
    pub fn decode(&self, reader: &mut BitReader) -> Result<u8> {
        let mut code: u16 = 0;
        for len in 1..=MAX_CODE_LENGTH {
            code = (code << 1) | reader.next_bit()? as u16;
            if let Some(symbol) = self.lookup(len, code) {
                return Ok(symbol);
            }
        }

        Err(JpegError::InvalidHuffmanCode)
    }
}
