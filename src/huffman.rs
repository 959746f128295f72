//! Canonical Huffman table construction.
//!
//! Raw tables (code-length counts plus symbols) are expanded into
//! symbol-indexed `(code, length)` lookups following Figures C.1-C.3 of
//! ITU-T T.81.

use crate::consts::{
    AC_CHROMINANCE_BITS, AC_CHROMINANCE_VALUES, AC_LUMINANCE_BITS, AC_LUMINANCE_VALUES,
    DC_CHROMINANCE_BITS, DC_CHROMINANCE_VALUES, DC_LUMINANCE_BITS, DC_LUMINANCE_VALUES,
    MAX_DC_CATEGORY,
};
use crate::error::{Error, Result};
use crate::types::TableClass;

/// Maximum code length allowed by JPEG (16 bits)
pub const MAX_CODE_LENGTH: usize = 16;

/// DC or AC table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableKind {
    /// DC difference categories
    Dc,
    /// AC run/size symbols
    Ac,
}

impl TableKind {
    /// Table class nibble of the DHT `Tc` field.
    pub const fn class_nibble(self) -> u8 {
        match self {
            TableKind::Dc => 0,
            TableKind::Ac => 1,
        }
    }

    const fn max_symbol(self) -> usize {
        match self {
            TableKind::Dc => MAX_DC_CATEGORY as usize,
            TableKind::Ac => 255,
        }
    }
}

/// A Huffman table in the form stored in DHT.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HuffTable {
    /// Number of codes of each length (`bits[0]` is unused)
    pub bits: [u8; 17],
    /// Symbols in order of increasing code length
    pub huffval: Vec<u8>,
}

impl HuffTable {
    /// Build a raw table from counts and symbols.
    pub fn new(bits: [u8; 17], huffval: &[u8]) -> Self {
        Self {
            bits,
            huffval: huffval.to_vec(),
        }
    }

    /// Total number of codes the counts describe.
    pub fn num_symbols(&self) -> usize {
        self.bits[1..].iter().map(|&b| b as usize).sum()
    }
}

/// Symbol-indexed encoding table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DerivedTable {
    /// Code for each symbol
    pub ehufco: [u32; 256],
    /// Code length for each symbol (0 means no code assigned)
    pub ehufsi: [u8; 256],
}

impl DerivedTable {
    /// Build a derived table from a raw table.
    ///
    /// Fails if the counts describe more than 256 codes or overflow the code
    /// space, if the symbols do not match the counts, if a DC table holds a
    /// symbol above 11, or if a symbol appears twice.
    pub fn from_huff_table(htbl: &HuffTable, kind: TableKind) -> Result<Self> {
        let num_symbols = htbl.num_symbols();
        if num_symbols > 256 || num_symbols != htbl.huffval.len() {
            return Err(Error::InvalidHuffmanTable);
        }

        // Figure C.1: code length of each symbol position
        let mut huffsize = Vec::with_capacity(num_symbols);
        for (len, &count) in htbl.bits.iter().enumerate().skip(1) {
            huffsize.extend(std::iter::repeat(len as u8).take(count as usize));
        }

        // Figure C.2: assign codes sequentially, shifting when the length grows
        let mut huffcode = Vec::with_capacity(num_symbols);
        let mut code = 0u32;
        let mut si = huffsize.first().copied().unwrap_or(0);
        for &size in &huffsize {
            while si < size {
                code <<= 1;
                si += 1;
            }
            huffcode.push(code);
            code += 1;
            if code > (1 << si) {
                return Err(Error::InvalidHuffmanTable);
            }
        }

        // Figure C.3: index by symbol
        let mut dtbl = DerivedTable {
            ehufco: [0; 256],
            ehufsi: [0; 256],
        };
        let max_symbol = kind.max_symbol();
        for ((&symbol, &code), &size) in htbl.huffval.iter().zip(&huffcode).zip(&huffsize) {
            let idx = symbol as usize;
            if idx > max_symbol || dtbl.ehufsi[idx] != 0 {
                return Err(Error::InvalidHuffmanTable);
            }
            dtbl.ehufco[idx] = code;
            dtbl.ehufsi[idx] = size;
        }

        Ok(dtbl)
    }

    /// The code and length for a symbol, or `None` if it has no code.
    #[inline]
    pub fn get_code(&self, symbol: u8) -> Option<(u32, u8)> {
        let idx = symbol as usize;
        match self.ehufsi[idx] {
            0 => None,
            size => Some((self.ehufco[idx], size)),
        }
    }
}

/// A raw table and its derived lookup.
#[derive(Clone, Debug)]
pub struct HuffmanTable {
    /// Table as written to DHT
    pub raw: HuffTable,
    /// Lookup used while encoding
    pub derived: DerivedTable,
}

impl HuffmanTable {
    fn build(bits: [u8; 17], values: &[u8], kind: TableKind) -> Result<Self> {
        let raw = HuffTable::new(bits, values);
        let derived = DerivedTable::from_huff_table(&raw, kind)?;
        Ok(Self { raw, derived })
    }
}

/// The four tables of a baseline frame.
#[derive(Clone, Debug)]
pub struct HuffmanTables {
    dc_luma: HuffmanTable,
    ac_luma: HuffmanTable,
    dc_chroma: HuffmanTable,
    ac_chroma: HuffmanTable,
}

impl HuffmanTables {
    /// Build the DC and AC tables for luma and chroma.
    pub fn new() -> Result<Self> {
        Ok(Self {
            dc_luma: HuffmanTable::build(DC_LUMINANCE_BITS, &DC_LUMINANCE_VALUES, TableKind::Dc)?,
            ac_luma: HuffmanTable::build(AC_LUMINANCE_BITS, &AC_LUMINANCE_VALUES, TableKind::Ac)?,
            dc_chroma: HuffmanTable::build(
                DC_CHROMINANCE_BITS,
                &DC_CHROMINANCE_VALUES,
                TableKind::Dc,
            )?,
            ac_chroma: HuffmanTable::build(
                AC_CHROMINANCE_BITS,
                &AC_CHROMINANCE_VALUES,
                TableKind::Ac,
            )?,
        })
    }

    /// Table for a kind and family.
    pub fn table(&self, kind: TableKind, class: TableClass) -> &HuffmanTable {
        match (kind, class) {
            (TableKind::Dc, TableClass::Luma) => &self.dc_luma,
            (TableKind::Ac, TableClass::Luma) => &self.ac_luma,
            (TableKind::Dc, TableClass::Chroma) => &self.dc_chroma,
            (TableKind::Ac, TableClass::Chroma) => &self.ac_chroma,
        }
    }

    /// Derived DC and AC tables for a family.
    pub fn derived(&self, class: TableClass) -> (&DerivedTable, &DerivedTable) {
        (
            &self.table(TableKind::Dc, class).derived,
            &self.table(TableKind::Ac, class).derived,
        )
    }

    /// All tables in DHT order: DC luma, AC luma, DC chroma, AC chroma.
    pub fn dht_order(&self) -> [(TableKind, TableClass, &HuffTable); 4] {
        [
            (TableKind::Dc, TableClass::Luma, &self.dc_luma.raw),
            (TableKind::Ac, TableClass::Luma, &self.ac_luma.raw),
            (TableKind::Dc, TableClass::Chroma, &self.dc_chroma.raw),
            (TableKind::Ac, TableClass::Chroma, &self.ac_chroma.raw),
        ]
    }
}
