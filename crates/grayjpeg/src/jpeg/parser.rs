//! JPEG marker stream parsing.
//!
//! [`SegmentReader`] walks the marker-delimited structure of a JPEG byte
//! slice without copying; the `parse_*` functions interpret the payloads of
//! the segments a baseline grayscale decoder needs:
//! - Quantization tables (DQT)
//! - Huffman tables (DHT)
//! - Frame header (SOF0)
//! - Restart interval (DRI)
//! - Scan header (SOS)

use byteorder::{BigEndian, ReadBytesExt};
use std::io::Read;

use super::huffman::{HuffmanTable, TableClass};
use super::marker::Marker;
use super::quantization::QuantizationTable;
use crate::error::{JpegError, Result};

/// Highest table slot id (two bits in the table headers).
const MAX_TABLE_ID: u8 = 3;

/// A marker together with its payload.
#[derive(Debug, Clone, Copy)]
pub struct Segment<'a> {
    /// The marker type.
    pub marker: Marker,
    /// Payload (excluding marker and length bytes). Empty for markers
    /// without a length field.
    pub payload: &'a [u8],
}

/// Sequential reader over the segments of a JPEG stream.
#[derive(Debug, Clone)]
pub struct SegmentReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> SegmentReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        SegmentReader { data, pos: 0 }
    }

    /// Byte offset of the next unread byte.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Consume the SOI marker that every JPEG stream starts with.
    pub fn read_soi(&mut self) -> Result<()> {
        if self.data.get(self.pos..self.pos + 2) != Some(&[0xFF, 0xD8][..]) {
            return Err(JpegError::MissingSoi);
        }
        self.pos += 2;
        Ok(())
    }

    /// Read the next marker, skipping fill bytes (0xFF) in front of it.
    pub fn read_marker(&mut self) -> Result<Marker> {
        match self.data.get(self.pos) {
            None => return Err(JpegError::UnexpectedEof("marker")),
            Some(&0xFF) => {}
            Some(&found) => {
                return Err(JpegError::ExpectedMarker {
                    offset: self.pos,
                    found,
                })
            }
        }

        while self.data.get(self.pos) == Some(&0xFF) {
            self.pos += 1;
        }

        let code = *self
            .data
            .get(self.pos)
            .ok_or(JpegError::UnexpectedEof("marker"))?;
        self.pos += 1;

        Marker::from_u8(code).ok_or(JpegError::InvalidMarker(code))
    }

    /// Read the length field of `marker` and return the payload after it.
    ///
    /// The length is big-endian and counts its own two bytes.
    pub fn read_payload(&mut self, marker: Marker) -> Result<&'a [u8]> {
        let mut rest = &self.data[self.pos..];
        let length = rest
            .read_u16::<BigEndian>()
            .map_err(|_| JpegError::UnexpectedEof("segment length"))? as usize;
        if length < 2 {
            return Err(JpegError::malformed(
                "segment",
                format!("{marker} declares length {length}"),
            ));
        }

        let declared = length - 2;
        if declared > rest.len() {
            return Err(JpegError::SegmentOverrun {
                marker,
                declared,
                available: rest.len(),
            });
        }

        let start = self.pos + 2;
        self.pos = start + declared;
        Ok(&self.data[start..self.pos])
    }

    /// Read the next marker and, if it has one, its payload.
    pub fn read_segment(&mut self) -> Result<Segment<'a>> {
        let marker = self.read_marker()?;
        let payload = if marker.has_length() {
            self.read_payload(marker)?
        } else {
            &[]
        };

        Ok(Segment { marker, payload })
    }

    /// Take the entropy-coded data that follows an SOS header.
    ///
    /// Byte stuffing, fill bytes and RST0-RST7 stay in the returned range;
    /// it ends in front of the first other marker (or at the end of data).
    pub fn read_entropy_coded_data(&mut self) -> &'a [u8] {
        let start = self.pos;
        let mut i = start;

        while i < self.data.len() {
            if self.data[i] != 0xFF {
                i += 1;
                continue;
            }

            match self.data.get(i + 1).copied() {
                Some(0x00) | Some(0xD0..=0xD7) => i += 2,
                Some(0xFF) => i += 1,
                _ => break,
            }
        }

        self.pos = i;
        &self.data[start..i]
    }
}

/// The single image component of a grayscale frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Component {
    /// Component ID.
    pub id: u8,
    /// Horizontal sampling factor.
    pub h_sampling: u8,
    /// Vertical sampling factor.
    pub v_sampling: u8,
    /// Quantization table ID to use.
    pub quant_table_id: u8,
}

/// Frame information from the SOF0 marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHeader {
    /// Sample precision (always 8 once parsed).
    pub precision: u8,
    /// Image height in pixels.
    pub height: u16,
    /// Image width in pixels.
    pub width: u16,
    /// The grayscale component.
    pub component: Component,
}

impl FrameHeader {
    /// Number of 8x8 blocks per block row.
    pub fn blocks_wide(&self) -> usize {
        (self.width as usize).div_ceil(8)
    }

    /// Number of block rows.
    pub fn blocks_high(&self) -> usize {
        (self.height as usize).div_ceil(8)
    }

    /// Total number of blocks (MCUs) in the scan.
    pub fn block_count(&self) -> usize {
        self.blocks_wide() * self.blocks_high()
    }
}

/// Scan header from the SOS marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanHeader {
    /// Component selector.
    pub component_id: u8,
    /// DC Huffman table ID.
    pub dc_table_id: u8,
    /// AC Huffman table ID.
    pub ac_table_id: u8,
}

fn too_short(segment: &'static str) -> impl Fn(std::io::Error) -> JpegError {
    move |_| JpegError::malformed(segment, "payload too short")
}

fn ensure_consumed(segment: &'static str, rest: &[u8]) -> Result<()> {
    if rest.is_empty() {
        Ok(())
    } else {
        Err(JpegError::malformed(
            segment,
            format!("{} trailing bytes", rest.len()),
        ))
    }
}

/// Parse DQT (Define Quantization Table) segment.
///
/// One payload may carry several tables back to back.
pub fn parse_dqt(payload: &[u8]) -> Result<Vec<QuantizationTable>> {
    let mut data = payload;
    let mut tables = Vec::new();

    while !data.is_empty() {
        let pq_tq = data.read_u8().map_err(too_short("DQT"))?;
        let precision = pq_tq >> 4;
        let id = pq_tq & 0x0F;

        if precision != 0 {
            return Err(JpegError::UnsupportedTablePrecision(precision));
        }
        if id > MAX_TABLE_ID {
            return Err(JpegError::malformed(
                "DQT",
                format!("invalid quantization table ID: {id}"),
            ));
        }

        let mut raw = [0u8; 64];
        data.read_exact(&mut raw).map_err(too_short("DQT"))?;

        let mut values = [0u16; 64];
        for (value, &byte) in values.iter_mut().zip(raw.iter()) {
            *value = byte as u16;
        }
        tables.push(QuantizationTable { id, values });
    }

    Ok(tables)
}

/// Parse DHT (Define Huffman Table) segment.
///
/// One payload may carry several tables back to back and must be consumed
/// exactly.
pub fn parse_dht(payload: &[u8]) -> Result<Vec<HuffmanTable>> {
    let mut data = payload;
    let mut tables = Vec::new();

    while !data.is_empty() {
        let tc_th = data.read_u8().map_err(too_short("DHT"))?;
        let class_bits = tc_th >> 4;
        let id = tc_th & 0x0F;

        let class = TableClass::from_u8(class_bits).ok_or_else(|| {
            JpegError::malformed("DHT", format!("invalid table class {class_bits}"))
        })?;
        if id > MAX_TABLE_ID {
            return Err(JpegError::malformed(
                "DHT",
                format!("invalid Huffman table ID: {id}"),
            ));
        }

        let mut code_lengths = [0u8; 16];
        data.read_exact(&mut code_lengths)
            .map_err(too_short("DHT"))?;

        let total: usize = code_lengths.iter().map(|&n| n as usize).sum();
        if total > data.len() {
            return Err(JpegError::malformed(
                "DHT",
                format!("{total} symbols announced, {} bytes left", data.len()),
            ));
        }
        let (values, rest) = data.split_at(total);
        data = rest;

        tables.push(HuffmanTable {
            class,
            id,
            code_lengths,
            values: values.to_vec(),
        });
    }

    Ok(tables)
}

/// Parse SOF0 (baseline Start of Frame) segment.
pub fn parse_sof(payload: &[u8]) -> Result<FrameHeader> {
    let mut data = payload;

    let precision = data.read_u8().map_err(too_short("SOF0"))?;
    let height = data.read_u16::<BigEndian>().map_err(too_short("SOF0"))?;
    let width = data.read_u16::<BigEndian>().map_err(too_short("SOF0"))?;
    let count = data.read_u8().map_err(too_short("SOF0"))?;

    if precision != 8 {
        return Err(JpegError::UnsupportedPrecision(precision));
    }
    match count {
        0 => return Err(JpegError::malformed("SOF0", "no components")),
        1 => {}
        _ => return Err(JpegError::UnsupportedComponentCount(count)),
    }
    if width == 0 || height == 0 {
        return Err(JpegError::malformed(
            "SOF0",
            format!("image dimensions {width}x{height}"),
        ));
    }

    let id = data.read_u8().map_err(too_short("SOF0"))?;
    let sampling = data.read_u8().map_err(too_short("SOF0"))?;
    let quant_table_id = data.read_u8().map_err(too_short("SOF0"))?;
    ensure_consumed("SOF0", data)?;

    let h_sampling = sampling >> 4;
    let v_sampling = sampling & 0x0F;
    if !(1..=4).contains(&h_sampling) || !(1..=4).contains(&v_sampling) {
        return Err(JpegError::malformed(
            "SOF0",
            format!("sampling factors {h_sampling}x{v_sampling}"),
        ));
    }
    if quant_table_id > MAX_TABLE_ID {
        return Err(JpegError::malformed(
            "SOF0",
            format!("invalid quantization table ID: {quant_table_id}"),
        ));
    }

    Ok(FrameHeader {
        precision,
        height,
        width,
        component: Component {
            id,
            h_sampling,
            v_sampling,
            quant_table_id,
        },
    })
}

/// Parse DRI (Define Restart Interval) segment. 0 disables restarts.
pub fn parse_dri(payload: &[u8]) -> Result<u16> {
    let mut data = payload;
    let interval = data.read_u16::<BigEndian>().map_err(too_short("DRI"))?;
    ensure_consumed("DRI", data)?;
    Ok(interval)
}

/// Parse SOS (Start of Scan) header.
///
/// Only a single-component scan with baseline spectral parameters
/// (Ss = 0, Se = 63, Ah = Al = 0) is accepted.
pub fn parse_sos(payload: &[u8]) -> Result<ScanHeader> {
    let mut data = payload;

    let count = data.read_u8().map_err(too_short("SOS"))?;
    match count {
        0 => return Err(JpegError::malformed("SOS", "no components")),
        1 => {}
        _ => return Err(JpegError::UnsupportedComponentCount(count)),
    }

    let component_id = data.read_u8().map_err(too_short("SOS"))?;
    let table_ids = data.read_u8().map_err(too_short("SOS"))?;
    let ss = data.read_u8().map_err(too_short("SOS"))?;
    let se = data.read_u8().map_err(too_short("SOS"))?;
    let approx = data.read_u8().map_err(too_short("SOS"))?;
    ensure_consumed("SOS", data)?;

    let dc_table_id = table_ids >> 4;
    let ac_table_id = table_ids & 0x0F;
    if dc_table_id > MAX_TABLE_ID || ac_table_id > MAX_TABLE_ID {
        return Err(JpegError::malformed(
            "SOS",
            format!("invalid Huffman table IDs: DC {dc_table_id}, AC {ac_table_id}"),
        ));
    }
    if ss != 0 || se != 63 || approx != 0 {
        return Err(JpegError::UnsupportedScan { ss, se, approx });
    }

    Ok(ScanHeader {
        component_id,
        dc_table_id,
        ac_table_id,
    })
}
