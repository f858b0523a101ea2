//! Inverse DCT for 8x8 blocks.
//!
//! Turns dequantized coefficients (natural order) back into 8-bit samples:
//! 2-D inverse DCT-II, +128 level shift, rounding and clamping to 0..=255.

use std::sync::OnceLock;

/// Pre-computed 8×8 cosine table.
/// `COSINE[u][x] = cos((2*x + 1) * u * PI / 16)`
static COSINE: OnceLock<[[f64; 8]; 8]> = OnceLock::new();

/// Normalization constants: C(0) = 1/sqrt(8), C(u>0) = 1/2.
///
/// The product C(u) * C(v) equals α(u) * α(v) / 4 of the textbook formula.
static NORM: OnceLock<[f64; 8]> = OnceLock::new();

fn cosine_table() -> &'static [[f64; 8]; 8] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; 8]; 8];
        for (u, row) in table.iter_mut().enumerate() {
            for (x, value) in row.iter_mut().enumerate() {
                *value = ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

fn norm_table() -> &'static [f64; 8] {
    NORM.get_or_init(|| {
        let mut n = [0.5f64; 8];
        n[0] = 1.0 / (8.0f64).sqrt();
        n
    })
}

/// How the inverse transform reconstructs samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransformMode {
    /// All 64 frequencies, round to nearest.
    #[default]
    Standard,
    /// Frequencies 0..=6 in each direction only, rounding up.
    ///
    /// Reproduces the output of older lab decoders byte for byte.
    Legacy,
}

impl TransformMode {
    /// Number of frequencies summed per direction.
    fn frequency_limit(self) -> usize {
        match self {
            TransformMode::Standard => 8,
            TransformMode::Legacy => 7,
        }
    }

    fn to_sample(self, value: f64) -> u8 {
        let level = match self {
            TransformMode::Standard => (value + 128.0).round(),
            TransformMode::Legacy => value.ceil() + 128.0,
        };
        level.clamp(0.0, 255.0) as u8
    }
}

/// Inverse-transform one block of dequantized coefficients.
///
/// Input is in natural order, row index = vertical frequency. Output is
/// 64 samples in row-major order.
pub fn inverse_dct(coefficients: &[i32; 64], mode: TransformMode) -> [u8; 64] {
    let cos = cosine_table();
    let c = norm_table();
    let limit = mode.frequency_limit();

    // Columns first: temp[y][u] = sum_v C(v) F[v][u] cos[v][y]
    let mut temp = [0.0f64; 64];
    for u in 0..limit {
        for y in 0..8 {
            let mut sum = 0.0;
            for v in 0..limit {
                sum += c[v] * coefficients[v * 8 + u] as f64 * cos[v][y];
            }
            temp[y * 8 + u] = sum;
        }
    }

    let mut samples = [0u8; 64];
    for y in 0..8 {
        for x in 0..8 {
            let mut sum = 0.0;
            for u in 0..limit {
                sum += c[u] * temp[y * 8 + u] * cos[u][x];
            }
            samples[y * 8 + x] = mode.to_sample(sum);
        }
    }

    samples
}
