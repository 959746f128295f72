//! Forward DCT.
//!
//! Separable floating-point type-II DCT computed as `C · X · Cᵀ`, where `X`
//! is the level-shifted block (`sample - 128`) and
//!
//! ```text
//! C[u][i] = c(u) * cos((2i + 1) * u * π / 16)
//! c(0) = 1 / (2 * sqrt(2)),  c(u > 0) = 1 / 2
//! ```
//!
//! With this normalization a flat block of value `128 + k` produces a DC
//! coefficient of `8k` and no AC energy.

use multiversion::multiversion;

use crate::block::Block;
use crate::consts::{DCTSIZE, DCTSIZE2};
use crate::error::{Error, Result};

/// Level shift applied before the transform
const CENTERJSAMPLE: f64 = 128.0;

#[allow(clippy::excessive_precision)]
mod basis {
    pub const A: f64 = 0.35355339059327378;
    pub const C1: f64 = 0.49039264020161522;
    pub const C2: f64 = 0.46193976625564337;
    pub const C3: f64 = 0.41573480615127262;
    pub const C5: f64 = 0.27778511650980114;
    pub const C6: f64 = 0.19134171618254492;
    pub const C7: f64 = 0.09754516100806417;
}

use basis::{A, C1, C2, C3, C5, C6, C7};

/// DCT-II basis, `DCT_MATRIX[u][i]`.
#[rustfmt::skip]
pub(crate) const DCT_MATRIX: [[f64; DCTSIZE]; DCTSIZE] = [
    [ A,   A,   A,   A,   A,   A,   A,   A ],
    [ C1,  C3,  C5,  C7, -C7, -C5, -C3, -C1],
    [ C2,  C6, -C6, -C2, -C2, -C6,  C6,  C2],
    [ C3, -C7, -C1, -C5,  C5,  C1,  C7, -C3],
    [ A,  -A,  -A,   A,   A,  -A,  -A,   A ],
    [ C5, -C1,  C7,  C3, -C3, -C7,  C1, -C5],
    [ C6, -C2,  C2, -C6, -C6,  C2, -C2,  C6],
    [ C7, -C5,  C3, -C1,  C1, -C3,  C5, -C7],
];

/// 64 DCT coefficients, row-major (row = vertical frequency).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DctBlock(pub [f64; DCTSIZE2]);

impl DctBlock {
    /// Build from exactly 64 coefficients.
    pub fn from_slice(coeffs: &[f64]) -> Result<Self> {
        <[f64; DCTSIZE2]>::try_from(coeffs)
            .map(DctBlock)
            .map_err(|_| Error::InvalidBlockSize { len: coeffs.len() })
    }

    /// The coefficients, row-major.
    pub fn coefficients(&self) -> &[f64; DCTSIZE2] {
        &self.0
    }

    /// The DC coefficient.
    pub fn dc(&self) -> f64 {
        self.0[0]
    }
}

impl TryFrom<&[f64]> for DctBlock {
    type Error = Error;

    fn try_from(coeffs: &[f64]) -> Result<Self> {
        DctBlock::from_slice(coeffs)
    }
}

/// 2-D DCT of an already level-shifted block.
#[multiversion(targets(
    "x86_64+avx2+fma",
    "x86_64+sse4.1",
    "x86+avx2",
    "x86+sse4.1",
    "aarch64+neon",
))]
#[allow(clippy::needless_range_loop)]
fn dct_2d(input: &[f64; DCTSIZE2], output: &mut [f64; DCTSIZE2]) {
    // Columns: tmp = C · X
    let mut tmp = [0f64; DCTSIZE2];
    for u in 0..DCTSIZE {
        for j in 0..DCTSIZE {
            let mut sum = 0.0;
            for i in 0..DCTSIZE {
                sum += DCT_MATRIX[u][i] * input[i * DCTSIZE + j];
            }
            tmp[u * DCTSIZE + j] = sum;
        }
    }

    // Rows: out = tmp · Cᵀ
    for u in 0..DCTSIZE {
        let row = &tmp[u * DCTSIZE..(u + 1) * DCTSIZE];
        for v in 0..DCTSIZE {
            let mut sum = 0.0;
            for j in 0..DCTSIZE {
                sum += row[j] * DCT_MATRIX[v][j];
            }
            output[u * DCTSIZE + v] = sum;
        }
    }
}

/// Level-shift and transform one block.
pub fn forward_dct(block: &Block) -> DctBlock {
    let mut shifted = [0f64; DCTSIZE2];
    for (dst, &sample) in shifted.iter_mut().zip(block.samples()) {
        *dst = sample as f64 - CENTERJSAMPLE;
    }
    let mut coeffs = [0f64; DCTSIZE2];
    dct_2d(&shifted, &mut coeffs);
    DctBlock(coeffs)
}
