//! Zigzag run-length coding of AC coefficients.

use crate::consts::{DCTSIZE2, JPEG_NATURAL_ORDER, JPEG_ZIGZAG_ORDER};
use crate::error::{Error, Result};
use crate::quant::QuantizedBlock;

/// A run of zeros followed by a non-zero level.
///
/// A zero `level` marks the end of the block and may only appear last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunLevel {
    /// Zero coefficients preceding `level`
    pub run: u8,
    /// Coefficient value
    pub level: i16,
}

impl RunLevel {
    /// Create a pair.
    pub const fn new(run: u8, level: i16) -> Self {
        Self { run, level }
    }

    /// Whether this pair is the end-of-block sentinel.
    pub const fn is_end_of_block(&self) -> bool {
        self.level == 0
    }
}

/// Reorder row-major coefficients into zigzag order.
pub fn natural_to_zigzag<T: Copy + Default>(natural: &[T; DCTSIZE2]) -> [T; DCTSIZE2] {
    let mut out = [T::default(); DCTSIZE2];
    for (dst, &idx) in out.iter_mut().zip(JPEG_NATURAL_ORDER.iter()) {
        *dst = natural[idx];
    }
    out
}

/// Reorder zigzag-ordered coefficients back to row-major.
pub fn zigzag_to_natural<T: Copy + Default>(zigzag: &[T; DCTSIZE2]) -> [T; DCTSIZE2] {
    let mut out = [T::default(); DCTSIZE2];
    for (dst, &pos) in out.iter_mut().zip(JPEG_ZIGZAG_ORDER.iter()) {
        *dst = zigzag[pos];
    }
    out
}

/// Run-length code the 63 AC coefficients of `block` in zigzag order.
///
/// Trailing zeros produce one `(run, 0)` sentinel; a block whose last AC
/// coefficient is non-zero has none.
pub fn run_length_encode(block: &QuantizedBlock) -> Vec<RunLevel> {
    let coeffs = block.coefficients();
    let mut pairs = Vec::new();
    let mut run = 0u8;

    for &natural in &JPEG_NATURAL_ORDER[1..] {
        let level = coeffs[natural];
        if level == 0 {
            run += 1;
        } else {
            pairs.push(RunLevel::new(run, level));
            run = 0;
        }
    }

    if run > 0 {
        pairs.push(RunLevel::new(run, 0));
    }
    pairs
}

/// Check that only the final pair of a sequence is a sentinel.
pub fn validate_run_levels(pairs: &[RunLevel]) -> Result<()> {
    let body = pairs.len().saturating_sub(1);
    match pairs[..body].iter().position(RunLevel::is_end_of_block) {
        Some(index) => Err(Error::InvalidRunLevelSequence { index }),
        None => Ok(()),
    }
}
