//! Builds small baseline grayscale JPEG streams from quantized coefficients.

#![allow(dead_code)]

use std::collections::HashMap;

use grayjpeg::jpeg::HuffmanCode;

/// MSB-first bit writer with byte stuffing.
pub struct BitWriter {
    data: Vec<u8>,
    bits: u32,
    num_bits: u8,
}

impl BitWriter {
    pub fn new() -> Self {
        BitWriter {
            data: Vec::new(),
            bits: 0,
            num_bits: 0,
        }
    }

    pub fn write_bits(&mut self, value: u16, count: u8) {
        self.bits = (self.bits << count) | (value as u32 & ((1u32 << count) - 1));
        self.num_bits += count;

        while self.num_bits >= 8 {
            self.num_bits -= 8;
            let byte = (self.bits >> self.num_bits) as u8;
            self.write_byte(byte);
        }
        self.bits &= (1u32 << self.num_bits) - 1;
    }

    fn write_byte(&mut self, byte: u8) {
        self.data.push(byte);
        if byte == 0xFF {
            self.data.push(0x00);
        }
    }

    /// Pad to a byte boundary with 1 bits.
    pub fn flush(&mut self) {
        if self.num_bits > 0 {
            let padding = 8 - self.num_bits;
            let value = (self.bits << padding) | ((1u32 << padding) - 1);
            self.write_byte(value as u8);
            self.num_bits = 0;
            self.bits = 0;
        }
    }

    /// Flush, then write RSTn unstuffed.
    pub fn write_restart(&mut self, number: u8) {
        self.flush();
        self.data.extend([0xFF, 0xD0 + number]);
    }

    pub fn into_bytes(mut self) -> Vec<u8> {
        self.flush();
        self.data
    }
}

/// Size category and additional bits of a coefficient value.
pub fn encode_coefficient(value: i32) -> (u8, u16) {
    if value == 0 {
        return (0, 0);
    }

    let abs_value = value.unsigned_abs();
    let size = (32 - abs_value.leading_zeros()) as u8;
    let bits = if value < 0 {
        ((1u32 << size) - 1) - abs_value
    } else {
        abs_value
    };

    (size, bits as u16)
}

/// Huffman table in DHT form.
#[derive(Clone)]
pub struct Table {
    pub counts: [u8; 16],
    pub values: Vec<u8>,
}

impl Table {
    /// Every DC category, 4-bit codes.
    pub fn dc() -> Self {
        let mut counts = [0u8; 16];
        counts[3] = 12;
        Table {
            counts,
            values: (0..12).collect(),
        }
    }

    /// EOB, ZRL and every run/size symbol with sizes 1-10, 8-bit codes.
    pub fn ac() -> Self {
        let mut values = vec![0x00, 0xF0];
        for run in 0..16u8 {
            for size in 1..=10u8 {
                values.push((run << 4) | size);
            }
        }

        let mut counts = [0u8; 16];
        counts[7] = values.len() as u8;
        Table { counts, values }
    }

    fn encoder(&self) -> HashMap<u8, (u16, u8)> {
        HuffmanCode::new(&self.counts, &self.values)
            .unwrap()
            .codes()
            .map(|(len, code, symbol)| (symbol, (code, len)))
            .collect()
    }
}

/// A baseline grayscale JPEG under construction.
#[derive(Clone)]
pub struct JpegBuilder {
    pub width: u16,
    pub height: u16,
    pub precision: u8,
    /// Quantization table in zigzag order.
    pub quant: [u8; 64],
    pub restart_interval: u16,
    pub dc: Table,
    pub ac: Table,
    pub comment: Option<Vec<u8>>,
}

impl JpegBuilder {
    pub fn new(width: u16, height: u16) -> Self {
        JpegBuilder {
            width,
            height,
            precision: 8,
            quant: [1; 64],
            restart_interval: 0,
            dc: Table::dc(),
            ac: Table::ac(),
            comment: None,
        }
    }

    pub fn block_count(&self) -> usize {
        (self.width as usize).div_ceil(8) * (self.height as usize).div_ceil(8)
    }

    /// SOI up to and including DRI.
    pub fn headers(&self) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8];

        segment(&mut out, 0xE0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0");
        if let Some(comment) = &self.comment {
            segment(&mut out, 0xFE, comment);
        }

        let mut dqt = vec![0x00];
        dqt.extend(self.quant);
        segment(&mut out, 0xDB, &dqt);

        let [h_hi, h_lo] = self.height.to_be_bytes();
        let [w_hi, w_lo] = self.width.to_be_bytes();
        segment(
            &mut out,
            0xC0,
            &[self.precision, h_hi, h_lo, w_hi, w_lo, 1, 1, 0x11, 0],
        );

        for (class, table) in [(0x00, &self.dc), (0x10, &self.ac)] {
            let mut dht = vec![class];
            dht.extend(table.counts);
            dht.extend(&table.values);
            segment(&mut out, 0xC4, &dht);
        }

        if self.restart_interval > 0 {
            segment(&mut out, 0xDD, &self.restart_interval.to_be_bytes());
        }

        out
    }

    /// SOS header for component 1 with tables 0/0.
    pub fn sos(&self) -> Vec<u8> {
        let mut out = Vec::new();
        segment(&mut out, 0xDA, &[1, 1, 0x00, 0, 63, 0]);
        out
    }

    /// Entropy-coded data for `blocks` of quantized coefficients in zigzag
    /// order, including RST markers.
    pub fn scan(&self, blocks: &[[i32; 64]]) -> Vec<u8> {
        let dc = self.dc.encoder();
        let ac = self.ac.encoder();
        let mut writer = BitWriter::new();
        let mut predictor = 0;
        let mut next_rst = 0u8;

        for (i, block) in blocks.iter().enumerate() {
            let interval = self.restart_interval as usize;
            if interval > 0 && i > 0 && i % interval == 0 {
                writer.write_restart(next_rst);
                next_rst = (next_rst + 1) % 8;
                predictor = 0;
            }

            let (size, bits) = encode_coefficient(block[0] - predictor);
            predictor = block[0];
            let (code, len) = dc[&size];
            writer.write_bits(code, len);
            writer.write_bits(bits, size);

            let mut run = 0u8;
            for &coefficient in &block[1..] {
                if coefficient == 0 {
                    run += 1;
                    continue;
                }
                while run >= 16 {
                    let (code, len) = ac[&0xF0];
                    writer.write_bits(code, len);
                    run -= 16;
                }
                let (size, bits) = encode_coefficient(coefficient);
                let (code, len) = ac[&((run << 4) | size)];
                writer.write_bits(code, len);
                writer.write_bits(bits, size);
                run = 0;
            }
            if run > 0 {
                let (code, len) = ac[&0x00];
                writer.write_bits(code, len);
            }
        }

        writer.into_bytes()
    }

    /// Complete stream.
    pub fn build(&self, blocks: &[[i32; 64]]) -> Vec<u8> {
        let mut out = self.headers();
        out.extend(self.sos());
        out.extend(self.scan(blocks));
        out.extend([0xFF, 0xD9]);
        out
    }
}

/// Append a marker segment with its length field.
pub fn segment(out: &mut Vec<u8>, marker: u8, payload: &[u8]) {
    out.extend([0xFF, marker]);
    out.extend(((payload.len() + 2) as u16).to_be_bytes());
    out.extend(payload);
}

/// A block with only a DC coefficient.
pub fn dc_block(dc: i32) -> [i32; 64] {
    let mut block = [0; 64];
    block[0] = dc;
    block
}

/// Deterministic pseudo-random blocks with small AC coefficients.
pub fn textured_blocks(count: usize) -> Vec<[i32; 64]> {
    let mut state = 0x2545_F491u32;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        state
    };

    (0..count)
        .map(|_| {
            let mut block = [0i32; 64];
            block[0] = (next() % 200) as i32 - 100;
            for coefficient in block.iter_mut().take(20).skip(1) {
                *coefficient = (next() % 9) as i32 - 4;
            }
            block
        })
        .collect()
}
