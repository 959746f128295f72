//! Huffman entropy encoder for baseline JPEG.
//!
//! - DC coefficients are coded as differences from the previous block of the
//!   same component (DPCM), as a category code followed by value bits.
//! - AC coefficients arrive as run/level pairs; runs over 15 are split with
//!   ZRL symbols and the end-of-block sentinel becomes an EOB symbol.
//!
//! Reference: ITU-T T.81 Section F.1.2

use std::io::Write;

use crate::bitstream::BitWriter;
use crate::consts::NUM_COMPONENTS;
use crate::error::{Error, Result};
use crate::huffman::{DerivedTable, HuffmanTables};
use crate::quant::QuantizedBlock;
use crate::rle::{run_length_encode, validate_run_levels, RunLevel};
use crate::types::ComponentType;

/// EOB (End of Block) symbol - run=0, size=0
const EOB: u8 = 0x00;

/// ZRL (Zero Run Length 16) symbol - 16 consecutive zeros
const ZRL: u8 = 0xF0;

/// Longest run a single AC symbol can carry
const MAX_RUN: u8 = 15;

/// Calculate the number of bits needed to represent a value.
///
/// This is the "category" in JPEG terminology:
/// - 0 → 0 bits (value must be 0)
/// - 1 → 1 bit (values -1, 1)
/// - 2 → 2 bits (values -3..-2, 2..3)
/// - etc.
#[inline]
pub fn jpeg_nbits(value: i16) -> u8 {
    if value == 0 {
        return 0;
    }
    16 - value.unsigned_abs().leading_zeros() as u8
}

/// Category and value bits for `value`.
///
/// Negative values are written as `value - 1` masked to the category, so
/// their leading bit is 0.
#[inline]
pub fn fold_value(value: i16) -> (u8, u16) {
    let nbits = jpeg_nbits(value);
    if nbits == 0 {
        return (0, 0);
    }
    let mask = ((1u32 << nbits) - 1) as u16;
    let bits = if value < 0 {
        (value as u16).wrapping_sub(1) & mask
    } else {
        value as u16
    };
    (nbits, bits)
}

/// Inverse of [`fold_value`].
#[inline]
pub fn unfold_value(bits: u16, nbits: u8) -> i16 {
    if nbits == 0 {
        return 0;
    }
    if bits >> (nbits - 1) != 0 {
        bits as i16
    } else {
        (bits as i32 - (1i32 << nbits) + 1) as i16
    }
}

/// Last DC value of each component.
///
/// Starts at zero for every scan and is threaded through the encoder by
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DcPredictor {
    last_dc_val: [i16; NUM_COMPONENTS],
}

impl DcPredictor {
    /// A predictor at the start of a scan.
    pub const fn new() -> Self {
        Self {
            last_dc_val: [0; NUM_COMPONENTS],
        }
    }

    /// Last DC value recorded for `component`.
    pub fn last(&self, component: ComponentType) -> i16 {
        self.last_dc_val[component.index()]
    }

    /// Difference of `dc` from the prediction, and the predictor after
    /// recording `dc`.
    pub fn predict(self, component: ComponentType, dc: i16) -> (i16, DcPredictor) {
        let idx = component.index();
        let diff = dc.wrapping_sub(self.last_dc_val[idx]);
        let mut next = self;
        next.last_dc_val[idx] = dc;
        (diff, next)
    }
}

/// Entropy encoder for a single scan.
pub struct EntropyEncoder<'a, W: Write> {
    /// Bitstream writer
    writer: &'a mut BitWriter<W>,
    /// Tables built at encoder construction
    tables: &'a HuffmanTables,
}

impl<'a, W: Write> EntropyEncoder<'a, W> {
    /// Create a new entropy encoder.
    pub fn new(writer: &'a mut BitWriter<W>, tables: &'a HuffmanTables) -> Self {
        Self { writer, tables }
    }

    /// Encode every block of one region.
    pub fn encode_region(
        &mut self,
        predictor: DcPredictor,
        component: ComponentType,
        blocks: &[QuantizedBlock],
    ) -> Result<DcPredictor> {
        let (dc_table, ac_table) = self.tables.derived(component.table_class());
        let mut predictor = predictor;
        for block in blocks {
            let (diff, next) = predictor.predict(component, block.dc());
            self.encode_dc(diff, dc_table)?;
            self.encode_ac(&run_length_encode(block), ac_table)?;
            predictor = next;
        }
        Ok(predictor)
    }

    /// Encode a single block of `component`.
    pub fn encode_block(
        &mut self,
        predictor: DcPredictor,
        component: ComponentType,
        block: &QuantizedBlock,
    ) -> Result<DcPredictor> {
        self.encode_region(predictor, component, std::slice::from_ref(block))
    }

    /// Emit the Huffman code of `symbol`.
    fn emit_symbol(&mut self, table: &DerivedTable, symbol: u8) -> Result<()> {
        let (code, size) = table
            .get_code(symbol)
            .ok_or(Error::InternalError("symbol has no Huffman code"))?;
        self.writer.put_bits(code, size)?;
        Ok(())
    }

    /// Encode a DC difference: category code, then value bits.
    fn encode_dc(&mut self, diff: i16, dc_table: &DerivedTable) -> Result<()> {
        let (nbits, value) = fold_value(diff);
        self.emit_symbol(dc_table, nbits)?;
        self.writer.put_bits(value as u32, nbits)?;
        Ok(())
    }

    /// Encode a block's run/level pairs.
    pub fn encode_ac(&mut self, pairs: &[RunLevel], ac_table: &DerivedTable) -> Result<()> {
        validate_run_levels(pairs)?;

        for pair in pairs {
            if pair.is_end_of_block() {
                self.emit_symbol(ac_table, EOB)?;
                continue;
            }

            let mut run = pair.run;
            while run > MAX_RUN {
                self.emit_symbol(ac_table, ZRL)?;
                run -= 16;
            }

            let (nbits, value) = fold_value(pair.level);
            // size must fit the low nibble of the symbol
            if nbits > 0x0F {
                return Err(Error::InternalError("AC coefficient out of range"));
            }
            self.emit_symbol(ac_table, (run << 4) | nbits)?;
            self.writer.put_bits(value as u32, nbits)?;
        }

        Ok(())
    }

    /// Flush any remaining bits to the output.
    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Encode one MCU's quantized regions, in Y, Cb, Cr order.
pub fn encode_mcu<W: Write>(
    encoder: &mut EntropyEncoder<'_, W>,
    predictor: DcPredictor,
    regions: &[(ComponentType, Vec<QuantizedBlock>)],
) -> Result<DcPredictor> {
    regions
        .iter()
        .try_fold(predictor, |pred, (component, blocks)| {
            encoder.encode_region(pred, *component, blocks)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bitstream::VecBitWriter;
    use crate::consts::DCTSIZE2;
    use crate::types::TableClass;

    fn encode(blocks: &[(ComponentType, QuantizedBlock)]) -> (Vec<u8>, DcPredictor) {
        let tables = HuffmanTables::new().unwrap();
        let mut writer = VecBitWriter::new_vec();
        let mut pred = DcPredictor::new();
        {
            let mut enc = EntropyEncoder::new(&mut writer, &tables);
            for (component, block) in blocks {
                pred = enc.encode_block(pred, *component, block).unwrap();
            }
            enc.flush().unwrap();
        }
        (writer.into_bytes(), pred)
    }

    #[test]
    fn test_jpeg_nbits() {
        assert_eq!(jpeg_nbits(0), 0);
        assert_eq!(jpeg_nbits(1), 1);
        assert_eq!(jpeg_nbits(-1), 1);
        assert_eq!(jpeg_nbits(2), 2);
        assert_eq!(jpeg_nbits(-3), 2);
        assert_eq!(jpeg_nbits(255), 8);
        assert_eq!(jpeg_nbits(-1024), 11);
        assert_eq!(jpeg_nbits(2047), 11);
    }

    #[test]
    fn test_fold_value() {
        assert_eq!(fold_value(0), (0, 0));
        assert_eq!(fold_value(5), (3, 0b101));
        assert_eq!(fold_value(-5), (3, 0b010));
        assert_eq!(fold_value(-1), (1, 0));
        assert_eq!(fold_value(-2047), (11, 0));
        for v in [-300i16, -2, 1, 77, 2047] {
            let (n, b) = fold_value(v);
            assert_eq!(unfold_value(b, n), v);
        }
    }

    #[test]
    fn test_predictor_updates_unconditionally() {
        let pred = DcPredictor::new();
        let (diff, pred) = pred.predict(ComponentType::Cb, 10);
        assert_eq!(diff, 10);
        let (diff, pred) = pred.predict(ComponentType::Cb, 10);
        assert_eq!(diff, 0);
        assert_eq!(pred.last(ComponentType::Cb), 10);
        let (diff, pred) = pred.predict(ComponentType::Cb, 4);
        assert_eq!(diff, -6);
        assert_eq!(pred.last(ComponentType::Cb), 4);
        assert_eq!(pred.last(ComponentType::Y), 0);
    }

    #[test]
    fn test_zero_block() {
        // DC luma category 0 = 00, EOB = 1010 -> 0010 10 + 11 padding
        let (bytes, pred) = encode(&[(ComponentType::Y, QuantizedBlock([0; DCTSIZE2]))]);
        assert_eq!(bytes, vec![0b0010_1011]);
        assert_eq!(pred, DcPredictor::new());
    }

    #[test]
    fn test_dc_only_block() {
        // diff 5: category 3 -> 100, bits 101, then EOB 1010
        let mut coeffs = [0i16; DCTSIZE2];
        coeffs[0] = 5;
        let (bytes, pred) = encode(&[(ComponentType::Y, QuantizedBlock(coeffs))]);
        assert_eq!(bytes, vec![0b1001_0110, 0b1011_1111]);
        assert_eq!(pred.last(ComponentType::Y), 5);
    }

    #[test]
    fn test_predictor_is_per_component() {
        let mut coeffs = [0i16; DCTSIZE2];
        coeffs[0] = 5;
        let block = QuantizedBlock(coeffs);
        let (_, pred) = encode(&[
            (ComponentType::Y, block),
            (ComponentType::Cb, block),
            (ComponentType::Y, QuantizedBlock([0; DCTSIZE2])),
        ]);
        assert_eq!(pred.last(ComponentType::Y), 0);
        assert_eq!(pred.last(ComponentType::Cb), 5);
        assert_eq!(pred.last(ComponentType::Cr), 0);
    }

    #[test]
    fn test_long_run_emits_zrl() {
        let tables = HuffmanTables::new().unwrap();
        let (_, ac) = tables.derived(TableClass::Luma);
        let mut writer = VecBitWriter::new_vec();
        {
            let mut enc = EntropyEncoder::new(&mut writer, &tables);
            // run of 20 before a 1: ZRL then (4, 1)
            enc.encode_ac(&[RunLevel::new(20, 1), RunLevel::new(42, 0)], ac)
                .unwrap();
            enc.flush().unwrap();
        }

        let mut expected = VecBitWriter::new_vec();
        for symbol in [ZRL, 0x41] {
            let (code, size) = ac.get_code(symbol).unwrap();
            expected.put_bits(code, size).unwrap();
        }
        expected.put_bits(1, 1).unwrap();
        let (code, size) = ac.get_code(EOB).unwrap();
        expected.put_bits(code, size).unwrap();
        expected.flush().unwrap();

        assert_eq!(writer.into_bytes(), expected.into_bytes());
    }

    #[test]
    fn test_malformed_sequence_aborts() {
        let tables = HuffmanTables::new().unwrap();
        let (_, ac) = tables.derived(TableClass::Chroma);
        let mut writer = VecBitWriter::new_vec();
        let mut enc = EntropyEncoder::new(&mut writer, &tables);
        let result = enc.encode_ac(&[RunLevel::new(1, 0), RunLevel::new(0, 3)], ac);
        assert_eq!(result, Err(Error::InvalidRunLevelSequence { index: 0 }));
    }

    #[test]
    fn test_encode_mcu_threads_predictor() {
        let tables = HuffmanTables::new().unwrap();
        let mut writer = VecBitWriter::new_vec();
        let mut enc = EntropyEncoder::new(&mut writer, &tables);
        let mut coeffs = [0i16; DCTSIZE2];
        coeffs[0] = -3;
        let regions = vec![
            (ComponentType::Y, vec![QuantizedBlock(coeffs); 4]),
            (ComponentType::Cb, vec![QuantizedBlock([0; DCTSIZE2])]),
            (ComponentType::Cr, vec![QuantizedBlock(coeffs)]),
        ];
        let pred = encode_mcu(&mut enc, DcPredictor::new(), &regions).unwrap();
        assert_eq!(pred.last(ComponentType::Y), -3);
        assert_eq!(pred.last(ComponentType::Cr), -3);
    }
}
