//! Marker codes, the byte following an 0xFF outside entropy-coded data.

use std::fmt;

/// Every marker assigned by ITU T.81 Table B.1.
///
/// Families carry their index: `SOF(2)` is 0xFFC2, `RST(3)` is 0xFFD3,
/// `APP(1)` is 0xFFE1 and `JPGn(0)` is 0xFFF0.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[allow(clippy::upper_case_acronyms)]
pub enum Marker {
    SOF(u8),
    DHT,
    JPG,
    DAC,
    RST(u8),
    SOI,
    EOI,
    SOS,
    DQT,
    DNL,
    DRI,
    DHP,
    EXP,
    APP(u8),
    JPGn(u8),
    COM,
    TEM,
}

impl Marker {
    /// Stand-alone markers have no length field after them.
    pub fn has_length(self) -> bool {
        !matches!(self, Marker::SOI | Marker::EOI | Marker::RST(_) | Marker::TEM)
    }

    /// `None` for the stuffing byte 0x00, the fill byte 0xFF and the
    /// reserved codes 0x02-0xBF.
    pub fn from_u8(code: u8) -> Option<Marker> {
        let marker = match code {
            0x01 => Marker::TEM,
            0xC4 => Marker::DHT,
            0xC8 => Marker::JPG,
            0xCC => Marker::DAC,
            0xC0..=0xCF => Marker::SOF(code - 0xC0),
            0xD0..=0xD7 => Marker::RST(code - 0xD0),
            0xD8 => Marker::SOI,
            0xD9 => Marker::EOI,
            0xDA => Marker::SOS,
            0xDB => Marker::DQT,
            0xDC => Marker::DNL,
            0xDD => Marker::DRI,
            0xDE => Marker::DHP,
            0xDF => Marker::EXP,
            0xE0..=0xEF => Marker::APP(code - 0xE0),
            0xF0..=0xFD => Marker::JPGn(code - 0xF0),
            0xFE => Marker::COM,
            _ => return None,
        };
        Some(marker)
    }

    pub fn to_u8(self) -> u8 {
        match self {
            Marker::TEM => 0x01,
            Marker::SOF(n) => 0xC0 | (n & 0x0F),
            Marker::DHT => 0xC4,
            Marker::JPG => 0xC8,
            Marker::DAC => 0xCC,
            Marker::RST(n) => 0xD0 | (n & 0x07),
            Marker::SOI => 0xD8,
            Marker::EOI => 0xD9,
            Marker::SOS => 0xDA,
            Marker::DQT => 0xDB,
            Marker::DNL => 0xDC,
            Marker::DRI => 0xDD,
            Marker::DHP => 0xDE,
            Marker::EXP => 0xDF,
            Marker::APP(n) => 0xE0 | (n & 0x0F),
            Marker::JPGn(n) => 0xF0 + n.min(0x0D),
            Marker::COM => 0xFE,
        }
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Marker::SOF(n) => write!(f, "SOF{n}")?,
            Marker::RST(n) => write!(f, "RST{n}")?,
            Marker::APP(n) => write!(f, "APP{n}")?,
            Marker::JPGn(n) => write!(f, "JPG{n}")?,
            other => write!(f, "{other:?}")?,
        }
        write!(f, " (0xFF{:02X})", self.to_u8())
    }
}
