//! Quantization tables (DQT).

use std::fmt::Write;

use super::block::NATURAL_TO_ZIGZAG;

/// 64 step sizes of one DQT table, kept in the zigzag order they arrive in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuantizationTable {
    /// Slot 0-3 the table is stored in.
    pub id: u8,
    pub values: [u16; 64],
}

impl QuantizationTable {
    #[inline]
    pub fn get_zigzag(&self, index: usize) -> u16 {
        self.values[index]
    }

    /// Step size of the coefficient at `row`, `col` of the 8x8 block.
    #[inline]
    pub fn get_natural(&self, row: usize, col: usize) -> u16 {
        self.values[NATURAL_TO_ZIGZAG[row * 8 + col]]
    }

    /// Markdown grid of the step sizes, one row of the block per line.
    pub fn to_ascii_table(&self) -> String {
        let mut out = String::from("|    |");
        for col in 0..8 {
            let _ = write!(out, "   x{col} |");
        }
        out.push_str("\n|----|");
        out.push_str(&"------|".repeat(8));
        out.push('\n');

        for row in 0..8 {
            let _ = write!(out, "| y{row} ");
            for col in 0..8 {
                let _ = write!(out, "| {:4} ", self.get_natural(row, col));
            }
            out.push_str("|\n");
        }

        out
    }
}
