//! The segment-level driver of the decoder.
//!
//! [`Decoder`] walks the marker stream once, fills its table slots as DQT and
//! DHT segments arrive, allocates the image at SOF0 and hands the scan to
//! the [`ImageAssembler`].

use super::bit_reader::EntropyCodedData;
use super::block::BlockDecoder;
use super::huffman::{HuffmanCode, HuffmanTable, TableClass};
use super::idct::TransformMode;
use super::marker::Marker;
use super::parser::{
    parse_dht, parse_dqt, parse_dri, parse_sof, parse_sos, FrameHeader, ScanHeader,
    SegmentReader,
};
use super::quantization::QuantizationTable;
use super::scan::ImageAssembler;
use crate::error::{JpegError, Result};
use crate::pixels::PixelBuffer;

/// Options for decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Inverse transform variant used to reconstruct samples.
    pub transform: TransformMode,
}

impl DecodeOptions {
    pub fn with_transform(mut self, transform: TransformMode) -> Self {
        self.transform = transform;
        self
    }
}

/// A segment as seen while inspecting a stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SegmentInfo {
    /// The marker type.
    pub marker: Marker,
    /// Offset of the marker's 0xFF byte.
    pub offset: usize,
    /// Payload length (excluding marker and length bytes).
    pub length: usize,
}

/// Structure of a JPEG stream, gathered without decoding the scan.
#[derive(Debug, Clone, Default)]
pub struct JpegInfo {
    /// All segments in order.
    pub segments: Vec<SegmentInfo>,
    /// Frame header, if an SOF0 segment was found.
    pub frame: Option<FrameHeader>,
    /// Restart interval (0 if not set).
    pub restart_interval: u16,
    /// Quantization tables in order of definition.
    pub quant_tables: Vec<QuantizationTable>,
    /// Huffman tables in order of definition.
    pub huffman_tables: Vec<HuffmanTable>,
    /// Scan header, if an SOS segment was found.
    pub scan: Option<ScanHeader>,
    /// Size of the entropy-coded data, stuffing and RST markers included.
    pub scan_bytes: usize,
}

/// Baseline grayscale JPEG decoder.
///
/// One instance decodes one image.
#[derive(Debug, Default)]
pub struct Decoder {
    options: DecodeOptions,
    quant_tables: [Option<QuantizationTable>; 4],
    dc_tables: [Option<HuffmanCode>; 4],
    ac_tables: [Option<HuffmanCode>; 4],
    frame: Option<FrameHeader>,
    restart_interval: u16,
    pixels: Option<PixelBuffer>,
    scan: Option<ScanHeader>,
    /// Collected only when inspecting.
    info: Option<JpegInfo>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: DecodeOptions) -> Self {
        Decoder {
            options,
            ..Self::default()
        }
    }

    pub fn options(&self) -> DecodeOptions {
        self.options
    }

    /// Decode a complete JPEG stream into a grayscale image.
    pub fn decode(mut self, data: &[u8]) -> Result<PixelBuffer> {
        self.walk(data)?;
        self.pixels.take().ok_or(JpegError::MissingFrame)
    }

    /// Walk the segments of a JPEG stream and report its structure.
    ///
    /// Tables and headers are parsed and validated, the entropy-coded data
    /// is skipped. A stream without a scan is accepted.
    pub fn inspect(mut self, data: &[u8]) -> Result<JpegInfo> {
        self.info = Some(JpegInfo::default());
        self.walk(data)?;

        let mut info = self.info.take().unwrap_or_default();
        info.frame = self.frame;
        info.restart_interval = self.restart_interval;
        info.scan = self.scan;
        Ok(info)
    }

    fn walk(&mut self, data: &[u8]) -> Result<()> {
        let mut reader = SegmentReader::new(data);
        reader.read_soi()?;

        loop {
            let offset = reader.position();
            let segment = reader.read_segment()?;
            log::debug!(
                "Segment {} at {}, {} bytes",
                segment.marker,
                offset,
                segment.payload.len()
            );
            if let Some(info) = self.info.as_mut() {
                info.segments.push(SegmentInfo {
                    marker: segment.marker,
                    offset,
                    length: segment.payload.len(),
                });
            }

            match segment.marker {
                Marker::SOF(0) => self.define_frame(segment.payload)?,
                Marker::DHT => self.define_huffman_tables(segment.payload)?,
                Marker::DQT => self.define_quantization_tables(segment.payload)?,
                Marker::DRI => {
                    self.restart_interval = parse_dri(segment.payload)?;
                    log::debug!("Restart interval: {}", self.restart_interval);
                }
                Marker::SOS => {
                    let scan = self.start_scan(segment.payload)?;
                    let raw = reader.read_entropy_coded_data();
                    self.decode_scan(scan, raw)?;
                }
                Marker::EOI => {
                    if self.scan.is_none() && self.info.is_none() {
                        return Err(JpegError::MissingScan);
                    }
                    return Ok(());
                }
                Marker::APP(_) | Marker::COM => {}
                Marker::SOF(_)
                | Marker::DAC
                | Marker::DNL
                | Marker::DHP
                | Marker::EXP
                | Marker::JPG
                | Marker::JPGn(_) => return Err(JpegError::UnsupportedMarker(segment.marker)),
                Marker::SOI | Marker::RST(_) | Marker::TEM => {
                    return Err(JpegError::UnexpectedMarker(segment.marker))
                }
            }
        }
    }

    fn define_frame(&mut self, payload: &[u8]) -> Result<()> {
        if self.frame.is_some() {
            return Err(JpegError::UnexpectedMarker(Marker::SOF(0)));
        }

        let frame = parse_sof(payload)?;
        log::debug!(
            "Frame: {}x{}, component {} sampling {}x{}, quantization table {}",
            frame.width,
            frame.height,
            frame.component.id,
            frame.component.h_sampling,
            frame.component.v_sampling,
            frame.component.quant_table_id
        );

        if self.info.is_none() {
            self.pixels = Some(PixelBuffer::new(
                frame.width as usize,
                frame.height as usize,
            ));
        }
        self.frame = Some(frame);
        Ok(())
    }

    fn define_huffman_tables(&mut self, payload: &[u8]) -> Result<()> {
        for table in parse_dht(payload)? {
            let code = HuffmanCode::from_table(&table)?;
            log::debug!(
                "{} table {}: {} symbols",
                table.class.name(),
                table.id,
                table.values.len()
            );

            let slots = match table.class {
                TableClass::Dc => &mut self.dc_tables,
                TableClass::Ac => &mut self.ac_tables,
            };
            slots[table.id as usize] = Some(code);

            if let Some(info) = self.info.as_mut() {
                info.huffman_tables.push(table);
            }
        }
        Ok(())
    }

    fn define_quantization_tables(&mut self, payload: &[u8]) -> Result<()> {
        for table in parse_dqt(payload)? {
            log::debug!("Quantization table {}", table.id);
            if let Some(info) = self.info.as_mut() {
                info.quant_tables.push(table.clone());
            }
            let id = table.id as usize;
            self.quant_tables[id] = Some(table);
        }
        Ok(())
    }

    fn start_scan(&mut self, payload: &[u8]) -> Result<ScanHeader> {
        let frame = self.frame.ok_or(JpegError::MissingFrame)?;
        if self.scan.is_some() {
            return Err(JpegError::UnexpectedMarker(Marker::SOS));
        }

        let scan = parse_sos(payload)?;
        if scan.component_id != frame.component.id {
            return Err(JpegError::malformed(
                "SOS",
                format!(
                    "component {} is not in the frame (expected {})",
                    scan.component_id, frame.component.id
                ),
            ));
        }
        log::debug!(
            "Scan: component {}, DC table {}, AC table {}",
            scan.component_id,
            scan.dc_table_id,
            scan.ac_table_id
        );

        self.scan = Some(scan);
        Ok(scan)
    }

    fn decode_scan(&mut self, scan: ScanHeader, raw: &[u8]) -> Result<()> {
        if let Some(info) = self.info.as_mut() {
            info.scan_bytes = raw.len();
            return Ok(());
        }

        let frame = self.frame.ok_or(JpegError::MissingFrame)?;
        let dc_table = self.dc_tables[scan.dc_table_id as usize]
            .as_ref()
            .ok_or(JpegError::MissingTable {
                kind: TableClass::Dc.name(),
                id: scan.dc_table_id,
            })?;
        let ac_table = self.ac_tables[scan.ac_table_id as usize]
            .as_ref()
            .ok_or(JpegError::MissingTable {
                kind: TableClass::Ac.name(),
                id: scan.ac_table_id,
            })?;
        let quant_id = frame.component.quant_table_id;
        let quant_table = self.quant_tables[quant_id as usize]
            .as_ref()
            .ok_or(JpegError::MissingTable {
                kind: "quantization",
                id: quant_id,
            })?;
        let pixels = self.pixels.as_mut().ok_or(JpegError::MissingFrame)?;

        let data = EntropyCodedData::destuff(raw);
        ImageAssembler::new(
            BlockDecoder::new(dc_table, ac_table, quant_table),
            self.options.transform,
            self.restart_interval,
        )
        .assemble(&data, pixels)
    }
}
