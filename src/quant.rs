//! Quality-scaled quantization.
//!
//! The Annex K base matrices are scaled by a percentage derived from the
//! quality level (`5000 / q` below 50, `200 - 2q` from 50 up) with
//! rounding, then clamped to 1..=255 so they fit 8-bit DQT entries.
//! Coefficients are divided by the matching entry and truncated toward
//! zero.

use crate::consts::{BASE_CHROMA_QUANT, BASE_LUMA_QUANT, DCTSIZE2, JPEG_NATURAL_ORDER};
use crate::dct::DctBlock;
use crate::error::{Error, Result};
use crate::types::{ComponentType, Quality, TableClass};

/// A quantization table, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantTable {
    values: [u16; DCTSIZE2],
}

impl QuantTable {
    /// Scale a base matrix to `quality`.
    pub fn scaled(base: &[u16; DCTSIZE2], quality: Quality) -> Self {
        let scale = quality.scale_factor();
        let mut values = [0u16; DCTSIZE2];
        for (dst, &b) in values.iter_mut().zip(base.iter()) {
            let v = (b as u32 * scale + 50) / 100;
            *dst = v.clamp(1, 255) as u16;
        }
        Self { values }
    }

    /// Entries in row-major order.
    pub fn values(&self) -> &[u16; DCTSIZE2] {
        &self.values
    }

    /// Entries in zigzag order, as written to DQT.
    pub fn to_zigzag(&self) -> [u16; DCTSIZE2] {
        let mut out = [0u16; DCTSIZE2];
        for (dst, &natural) in out.iter_mut().zip(JPEG_NATURAL_ORDER.iter()) {
            *dst = self.values[natural];
        }
        out
    }
}

/// Quantized coefficients, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuantizedBlock(pub [i16; DCTSIZE2]);

impl QuantizedBlock {
    /// Build from exactly 64 coefficients.
    pub fn from_slice(coeffs: &[i16]) -> Result<Self> {
        <[i16; DCTSIZE2]>::try_from(coeffs)
            .map(QuantizedBlock)
            .map_err(|_| Error::InvalidBlockSize { len: coeffs.len() })
    }

    /// The coefficients, row-major.
    pub fn coefficients(&self) -> &[i16; DCTSIZE2] {
        &self.0
    }

    /// The DC coefficient.
    pub fn dc(&self) -> i16 {
        self.0[0]
    }
}

impl TryFrom<&[i16]> for QuantizedBlock {
    type Error = Error;

    fn try_from(coeffs: &[i16]) -> Result<Self> {
        QuantizedBlock::from_slice(coeffs)
    }
}

/// Luma and chroma tables for one quality level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quantizer {
    quality: Quality,
    luma: QuantTable,
    chroma: QuantTable,
}

impl Quantizer {
    /// Scale both base matrices to `quality`.
    pub fn new(quality: Quality) -> Self {
        Self {
            quality,
            luma: QuantTable::scaled(&BASE_LUMA_QUANT, quality),
            chroma: QuantTable::scaled(&BASE_CHROMA_QUANT, quality),
        }
    }

    /// Quality the tables were scaled to.
    pub fn quality(&self) -> Quality {
        self.quality
    }

    /// Table used for Y.
    pub fn luma_table(&self) -> &QuantTable {
        &self.luma
    }

    /// Table used for Cb and Cr.
    pub fn chroma_table(&self) -> &QuantTable {
        &self.chroma
    }

    /// Table for a table family.
    pub fn table(&self, class: TableClass) -> &QuantTable {
        match class {
            TableClass::Luma => &self.luma,
            TableClass::Chroma => &self.chroma,
        }
    }

    /// Quantize a block with the table of `class`.
    pub fn quantize(&self, coeffs: &DctBlock, class: TableClass) -> QuantizedBlock {
        let table = self.table(class).values();
        let mut out = [0i16; DCTSIZE2];
        for ((dst, &c), &q) in out.iter_mut().zip(coeffs.coefficients()).zip(table) {
            // `as` truncates toward zero
            *dst = (c / q as f64) as i16;
        }
        QuantizedBlock(out)
    }

    /// Quantize a block of `component`.
    pub fn quantize_block(&self, coeffs: &DctBlock, component: ComponentType) -> QuantizedBlock {
        self.quantize(coeffs, component.table_class())
    }
}

impl Default for Quantizer {
    fn default() -> Self {
        Self::new(Quality::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quality(q: u8) -> Quality {
        Quality::new(q).unwrap()
    }

    #[test]
    fn test_quality_100_is_all_ones() {
        let q = Quantizer::new(Quality::MAX);
        assert!(q.luma_table().values().iter().all(|&v| v == 1));
        assert!(q.chroma_table().values().iter().all(|&v| v == 1));
    }

    #[test]
    fn test_quality_50_is_base() {
        let q = Quantizer::new(quality(50));
        assert_eq!(q.luma_table().values(), &BASE_LUMA_QUANT);
        assert_eq!(q.chroma_table().values(), &BASE_CHROMA_QUANT);
    }

    #[test]
    fn test_quality_80_rounds() {
        let q = Quantizer::default();
        assert_eq!(q.quality().value(), 80);
        // 16 * 0.4 = 6.4, 11 * 0.4 = 4.4, 10 * 0.4 = 4.0
        assert_eq!(&q.luma_table().values()[..3], &[6, 4, 4]);
        // 12 * 0.4 = 4.8 rounds up
        assert_eq!(q.luma_table().values()[8], 5);
        // 99 * 0.4 = 39.6
        assert_eq!(q.chroma_table().values()[63], 40);
        // 109 * 40 = 4360 -> 44.1 -> 44
        assert_eq!(q.luma_table().values()[37], 44);
    }

    #[test]
    fn test_low_quality_clamps_to_255() {
        let q = Quantizer::new(quality(1));
        assert!(q.luma_table().values().iter().all(|&v| v == 255));
        assert!(q.chroma_table().values().iter().all(|&v| v == 255));
    }

    #[test]
    fn test_to_zigzag() {
        let table = QuantTable::scaled(&BASE_LUMA_QUANT, quality(50));
        let zz = table.to_zigzag();
        assert_eq!(&zz[..6], &[16, 11, 12, 14, 12, 10]);
        assert_eq!(zz[63], 99);
    }

    #[test]
    fn test_quantize_truncates_toward_zero() {
        let q = Quantizer::new(quality(50));
        let mut coeffs = [0f64; DCTSIZE2];
        coeffs[0] = 31.9; // / 16
        coeffs[1] = -21.9; // / 11
        coeffs[2] = 9.99; // / 10
        let out = q.quantize_block(&DctBlock(coeffs), ComponentType::Y);
        assert_eq!(&out.0[..3], &[1, -1, 0]);

        // Chroma uses the chroma table: 17 at index 0
        coeffs[0] = 34.0;
        let out = q.quantize_block(&DctBlock(coeffs), ComponentType::Cr);
        assert_eq!(out.dc(), 2);
    }

    #[test]
    fn test_quantize_is_deterministic() {
        let q = Quantizer::new(quality(73));
        let mut coeffs = [0f64; DCTSIZE2];
        for (i, c) in coeffs.iter_mut().enumerate() {
            *c = (i as f64 - 32.0) * 7.3;
        }
        let block = DctBlock(coeffs);
        assert_eq!(
            q.quantize(&block, TableClass::Chroma),
            q.quantize(&block, TableClass::Chroma)
        );
    }

    #[test]
    fn test_quantized_block_from_slice() {
        assert!(QuantizedBlock::from_slice(&[0i16; 64]).is_ok());
        assert_eq!(
            QuantizedBlock::try_from(&[0i16; 3][..]),
            Err(Error::InvalidBlockSize { len: 3 })
        );
    }
}
