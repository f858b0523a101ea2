//! Single-channel 8-bit raster and its PGM (P5) serialization.

use std::io::Write;

/// Maximum sample value written to the PNM header.
pub const MAX_DEPTH: u8 = 255;

/// Grayscale image, row-major, one byte per sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a `width` x `height` buffer filled with zeros.
    pub fn new(width: usize, height: usize) -> Self {
        PixelBuffer {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Samples per pixel, always 1.
    #[inline]
    pub fn channels(&self) -> usize {
        1
    }

    /// Maximum sample value.
    #[inline]
    pub fn depth(&self) -> u8 {
        MAX_DEPTH
    }

    /// Sample at column `x`, row `y`.
    pub fn get(&self, x: usize, y: usize) -> Option<u8> {
        if x < self.width && y < self.height {
            Some(self.data[y * self.width + x])
        } else {
            None
        }
    }

    /// Iterate over the rows of the image.
    pub fn rows(&self) -> impl Iterator<Item = &[u8]> {
        // chunks() panics on 0, an empty buffer has no rows anyway
        self.data.chunks(self.width.max(1))
    }

    /// Raw samples, row-major.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Copy an 8x8 block of samples into place, clipping at the right and
    /// bottom edges.
    pub fn put_block(&mut self, block_x: usize, block_y: usize, samples: &[u8; 64]) {
        let x0 = block_x * 8;
        let y0 = block_y * 8;
        if x0 >= self.width || y0 >= self.height {
            return;
        }

        let cols = (self.width - x0).min(8);
        let rows = (self.height - y0).min(8);
        for row in 0..rows {
            let start = (y0 + row) * self.width + x0;
            self.data[start..start + cols].copy_from_slice(&samples[row * 8..row * 8 + cols]);
        }
    }

    /// Write the image as binary PGM: `P5\n<w> <h>\n255\n` followed by the
    /// samples.
    pub fn write_pnm<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        write!(writer, "P5\n{} {}\n{}\n", self.width, self.height, self.depth())?;
        writer.write_all(&self.data)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer() {
        let buffer = PixelBuffer::new(3, 2);
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.channels(), 1);
        assert_eq!(buffer.depth(), 255);
        assert_eq!(buffer.as_bytes().len(), 6);
        assert_eq!(buffer.rows().count(), 2);
    }

    #[test]
    fn test_put_block_clips() {
        let mut buffer = PixelBuffer::new(10, 9);
        let mut samples = [0u8; 64];
        for (i, s) in samples.iter_mut().enumerate() {
            *s = i as u8;
        }

        buffer.put_block(1, 1, &samples);
        // Block (1, 1) covers x 8..10, y 8..9
        assert_eq!(buffer.get(8, 8), Some(0));
        assert_eq!(buffer.get(9, 8), Some(1));
        assert_eq!(buffer.get(7, 8), Some(0));
        assert_eq!(buffer.get(10, 8), None);

        buffer.put_block(0, 0, &samples);
        assert_eq!(buffer.get(7, 7), Some(63));
        assert_eq!(buffer.get(0, 1), Some(8));

        // Entirely outside: ignored
        buffer.put_block(2, 0, &samples);
    }

    #[test]
    fn test_write_pnm() {
        let mut buffer = PixelBuffer::new(2, 1);
        buffer.put_block(0, 0, &[0x80; 64]);

        let mut out = Vec::new();
        buffer.write_pnm(&mut out).unwrap();
        assert_eq!(out, b"P5\n2 1\n255\n\x80\x80");
    }
}
