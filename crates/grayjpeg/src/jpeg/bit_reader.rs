//! Bit-level access to entropy-coded scan data.
//!
//! Scan data goes through two stages:
//! - [`EntropyCodedData::destuff`] removes byte stuffing (0xFF00 → 0xFF),
//!   fill bytes and restart markers, remembering where each RSTn was.
//! - [`BitReader`] hands out the remaining bits MSB first.

use crate::error::{JpegError, Result};

/// Position of a restart marker inside de-stuffed scan data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RestartMarker {
    /// Byte offset in the de-stuffed data at which the marker sat.
    pub offset: usize,
    /// Marker number (0-7).
    pub number: u8,
}

/// De-stuffed entropy-coded data of one scan.
#[derive(Debug, Clone, Default)]
pub struct EntropyCodedData {
    bytes: Vec<u8>,
    restarts: Vec<RestartMarker>,
}

impl EntropyCodedData {
    /// De-stuff a raw scan byte range.
    ///
    /// The range must already be cut at the first marker that ends the
    /// scan; only stuffed bytes, fill bytes and RST0-RST7 may follow a 0xFF.
    pub fn destuff(raw: &[u8]) -> Self {
        let mut bytes = Vec::with_capacity(raw.len());
        let mut restarts = Vec::new();
        let mut i = 0;

        while i < raw.len() {
            let byte = raw[i];
            i += 1;

            if byte != 0xFF {
                bytes.push(byte);
                continue;
            }

            match raw.get(i).copied() {
                Some(0x00) => {
                    bytes.push(0xFF);
                    i += 1;
                }
                Some(n @ 0xD0..=0xD7) => {
                    restarts.push(RestartMarker {
                        offset: bytes.len(),
                        number: n - 0xD0,
                    });
                    i += 1;
                }
                // Fill byte, the next 0xFF is looked at on the next turn
                Some(0xFF) => {}
                _ => break,
            }
        }

        EntropyCodedData { bytes, restarts }
    }

    /// De-stuffed data bytes.
    #[inline]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Restart markers in order of appearance.
    #[inline]
    pub fn restarts(&self) -> &[RestartMarker] {
        &self.restarts
    }

    /// Create a bit reader over the de-stuffed bytes.
    pub fn reader(&self) -> BitReader<'_> {
        BitReader::new(&self.bytes)
    }
}

/// Bit reader over de-stuffed entropy-coded data.
#[derive(Debug, Clone)]
pub struct BitReader<'a> {
    /// Source data.
    data: &'a [u8],
    /// Current byte position.
    pos: usize,
    /// Number of bits already consumed from `data[pos]` (0-7).
    bit: u8,
}

impl<'a> BitReader<'a> {
    /// Create a new bit reader.
    pub fn new(data: &'a [u8]) -> Self {
        BitReader {
            data,
            pos: 0,
            bit: 0,
        }
    }

    /// Current byte position.
    ///
    /// Right after [`align_to_byte`](Self::align_to_byte) this is the offset
    /// of the next unread byte.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Check if all bits have been consumed.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Read one bit.
    #[inline]
    pub fn next_bit(&mut self) -> Result<u8> {
        let byte = *self.data.get(self.pos).ok_or(JpegError::TruncatedStream)?;
        let value = (byte >> (7 - self.bit)) & 1;

        self.bit += 1;
        if self.bit == 8 {
            self.bit = 0;
            self.pos += 1;
        }

        Ok(value)
    }

    /// Read `count` bits (at most 16), MSB first.
    pub fn read_bits(&mut self, count: u8) -> Result<u16> {
        debug_assert!(count <= 16);
        let mut value = 0u16;
        for _ in 0..count {
            value = (value << 1) | self.next_bit()? as u16;
        }
        Ok(value)
    }

    /// Read and sign-extend a value of `size` bits (ITU T.81 Figure F.12).
    ///
    /// Values below `2^(size-1)` are negative: `V - (2^size - 1)`.
    pub fn receive_extend(&mut self, size: u8) -> Result<i32> {
        if size == 0 {
            return Ok(0);
        }

        let value = self.read_bits(size)? as i32;
        let vt = 1 << (size - 1);
        if value < vt {
            Ok(value - (1 << size) + 1)
        } else {
            Ok(value)
        }
    }

    /// Discard the rest of a partially consumed byte.
    pub fn align_to_byte(&mut self) {
        if self.bit != 0 {
            self.bit = 0;
            self.pos += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bit_reader_basic() {
        let data = [0b10110100, 0b11001010];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.next_bit().unwrap(), 1);
        assert_eq!(reader.next_bit().unwrap(), 0);
        assert_eq!(reader.read_bits(2).unwrap(), 0b11);
        assert_eq!(reader.read_bits(4).unwrap(), 0b0100);
        assert_eq!(reader.read_bits(8).unwrap(), 0b11001010);
        assert!(reader.is_eof());
    }

    #[test]
    fn test_read_past_end() {
        let data = [0xAB];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(8).unwrap(), 0xAB);
        assert!(matches!(reader.next_bit(), Err(JpegError::TruncatedStream)));
    }

    #[test]
    fn test_align_to_byte() {
        let data = [0b1010_0000, 0b0111_1111];
        let mut reader = BitReader::new(&data);

        assert_eq!(reader.read_bits(3).unwrap(), 0b101);
        reader.align_to_byte();
        assert_eq!(reader.position(), 1);
        assert_eq!(reader.read_bits(4).unwrap(), 0b0111);

        // Already aligned: no-op
        let mut reader = BitReader::new(&data);
        reader.align_to_byte();
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_receive_extend() {
        // Data: bits from MSB = 1, 0, 01, 11, ...
        let data = [0b10011100, 0b00000000];
        let mut reader = BitReader::new(&data);

        // Size 1, value 1 → positive → +1
        assert_eq!(reader.receive_extend(1).unwrap(), 1);
        // Size 1, value 0 → negative → -1
        assert_eq!(reader.receive_extend(1).unwrap(), -1);
        // Size 2, value 1 → negative → -2
        assert_eq!(reader.receive_extend(2).unwrap(), -2);
        // Size 2, value 3 → positive → +3
        assert_eq!(reader.receive_extend(2).unwrap(), 3);
    }

    #[test]
    fn test_receive_extend_zero() {
        let data: [u8; 0] = [];
        let mut reader = BitReader::new(&data);

        // Size 0 reads nothing and yields 0
        assert_eq!(reader.receive_extend(0).unwrap(), 0);
    }

    #[test]
    fn test_destuff_stuffed_byte() {
        let ecd = EntropyCodedData::destuff(&[0xFF, 0x00, 0x12]);
        assert_eq!(ecd.bytes(), &[0xFF, 0x12]);
        assert!(ecd.restarts().is_empty());

        let mut reader = ecd.reader();
        assert_eq!(reader.read_bits(8).unwrap(), 0xFF);
        assert_eq!(reader.read_bits(8).unwrap(), 0x12);
    }

    #[test]
    fn test_destuff_restart_markers() {
        let ecd = EntropyCodedData::destuff(&[0x12, 0xFF, 0xD0, 0x34, 0x56, 0xFF, 0xD1, 0x78]);
        assert_eq!(ecd.bytes(), &[0x12, 0x34, 0x56, 0x78]);
        assert_eq!(
            ecd.restarts(),
            &[
                RestartMarker { offset: 1, number: 0 },
                RestartMarker { offset: 3, number: 1 },
            ]
        );
    }

    #[test]
    fn test_destuff_fill_bytes() {
        let ecd = EntropyCodedData::destuff(&[0x12, 0xFF, 0xFF, 0xFF, 0xD7, 0x34, 0xFF]);
        assert_eq!(ecd.bytes(), &[0x12, 0x34]);
        assert_eq!(ecd.restarts(), &[RestartMarker { offset: 1, number: 7 }]);
    }
}
