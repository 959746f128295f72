//! JFIF marker segments.
//!
//! A baseline file is laid out as
//! SOI, APP0, COM, DQT, SOF0, DHT, SOS, entropy-coded data, EOI.
//!
//! Reference: ITU-T T.81 Annex B

use std::io::Write;

use crate::consts::{
    DCTSIZE2, JPEG_APP0, JPEG_COM, JPEG_DHT, JPEG_DQT, JPEG_EOI, JPEG_SOF0, JPEG_SOI, JPEG_SOS,
};
use crate::huffman::{HuffTable, TableKind};
use crate::quant::QuantTable;
use crate::types::{ComponentInfo, PixelDensity};

/// JFIF identifier
const JFIF_ID: [u8; 5] = *b"JFIF\0";

/// JFIF version 1.01
const JFIF_VERSION: [u8; 2] = [1, 1];

/// Longest payload a segment length field can describe
const MAX_SEGMENT_PAYLOAD: usize = 65533;

/// Marker writer for JPEG encoding.
pub struct MarkerWriter<W: Write> {
    output: W,
    bytes_written: usize,
}

impl<W: Write> MarkerWriter<W> {
    /// Create a new marker writer.
    pub fn new(output: W) -> Self {
        Self {
            output,
            bytes_written: 0,
        }
    }

    fn emit_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        self.output.write_all(bytes)?;
        self.bytes_written += bytes.len();
        Ok(())
    }

    fn emit_byte(&mut self, byte: u8) -> std::io::Result<()> {
        self.emit_bytes(&[byte])
    }

    /// Write a 2-byte value in big-endian order.
    fn emit_2bytes(&mut self, value: u16) -> std::io::Result<()> {
        self.emit_bytes(&value.to_be_bytes())
    }

    fn emit_marker(&mut self, marker: u8) -> std::io::Result<()> {
        self.emit_bytes(&[0xFF, marker])
    }

    /// Write Start of Image marker.
    pub fn write_soi(&mut self) -> std::io::Result<()> {
        self.emit_marker(JPEG_SOI)
    }

    /// Write End of Image marker.
    pub fn write_eoi(&mut self) -> std::io::Result<()> {
        self.emit_marker(JPEG_EOI)
    }

    /// Write the JFIF APP0 segment, without thumbnail.
    pub fn write_jfif_app0(&mut self, density: &PixelDensity) -> std::io::Result<()> {
        self.emit_marker(JPEG_APP0)?;

        // 2 (length) + 5 (identifier) + 2 (version) + 1 (units) +
        // 2 + 2 (density) + 1 + 1 (thumbnail size) = 16
        self.emit_2bytes(16)?;
        self.emit_bytes(&JFIF_ID)?;
        self.emit_bytes(&JFIF_VERSION)?;
        self.emit_byte(density.unit as u8)?;
        self.emit_2bytes(density.x)?;
        self.emit_2bytes(density.y)?;
        self.emit_bytes(&[0, 0])
    }

    /// Write a COM segment. Text beyond what a segment holds is cut off.
    pub fn write_com(&mut self, comment: &str) -> std::io::Result<()> {
        let bytes = &comment.as_bytes()[..comment.len().min(MAX_SEGMENT_PAYLOAD)];
        self.emit_marker(JPEG_COM)?;
        self.emit_2bytes(2 + bytes.len() as u16)?;
        self.emit_bytes(bytes)
    }

    /// Write one DQT segment holding 8-bit tables.
    ///
    /// # Arguments
    /// * `tables` - Slice of (destination slot, table)
    pub fn write_dqt(&mut self, tables: &[(u8, &QuantTable)]) -> std::io::Result<()> {
        if tables.is_empty() {
            return Ok(());
        }

        self.emit_marker(JPEG_DQT)?;
        self.emit_2bytes(2 + tables.len() as u16 * (1 + DCTSIZE2 as u16))?;

        for (slot, table) in tables {
            // Pq = 0 (8-bit) in the high nibble
            self.emit_byte(*slot & 0x0F)?;
            for value in table.to_zigzag() {
                self.emit_byte(value.min(255) as u8)?;
            }
        }

        Ok(())
    }

    /// Write a baseline Start of Frame segment.
    ///
    /// `height` and `width` are the dimensions of the source image, before
    /// any padding.
    pub fn write_sof0(
        &mut self,
        height: u16,
        width: u16,
        components: &[ComponentInfo],
    ) -> std::io::Result<()> {
        self.emit_marker(JPEG_SOF0)?;

        // 2 (length) + 1 (precision) + 2 (height) + 2 (width) +
        // 1 (component count) + 3 per component
        let num_components = components.len() as u16;
        self.emit_2bytes(8 + 3 * num_components)?;

        self.emit_byte(8)?;
        self.emit_2bytes(height)?;
        self.emit_2bytes(width)?;
        self.emit_byte(num_components as u8)?;

        for comp in components {
            self.emit_byte(comp.component_id)?;
            self.emit_byte((comp.h_samp_factor << 4) | comp.v_samp_factor)?;
            self.emit_byte(comp.quant_tbl_no)?;
        }

        Ok(())
    }

    /// Write one DHT segment holding several tables.
    ///
    /// # Arguments
    /// * `tables` - Slice of (kind, destination slot, table)
    pub fn write_dht(&mut self, tables: &[(TableKind, u8, &HuffTable)]) -> std::io::Result<()> {
        if tables.is_empty() {
            return Ok(());
        }

        let total_len: usize = 2 + tables
            .iter()
            .map(|(_, _, table)| 1 + 16 + table.num_symbols())
            .sum::<usize>();

        self.emit_marker(JPEG_DHT)?;
        self.emit_2bytes(total_len as u16)?;

        for (kind, slot, table) in tables {
            // Tc in the high nibble, Th in the low nibble
            self.emit_byte((kind.class_nibble() << 4) | (*slot & 0x0F))?;
            self.emit_bytes(&table.bits[1..=16])?;
            self.emit_bytes(&table.huffval[..table.num_symbols()])?;
        }

        Ok(())
    }

    /// Write a Start of Scan segment covering `components` and the full
    /// spectrum (Ss = 0, Se = 63, no successive approximation).
    pub fn write_sos(&mut self, components: &[ComponentInfo]) -> std::io::Result<()> {
        self.emit_marker(JPEG_SOS)?;

        // 2 (length) + 1 (Ns) + 2 per component + 3 (Ss, Se, Ah/Al)
        let num_components = components.len() as u16;
        self.emit_2bytes(6 + 2 * num_components)?;
        self.emit_byte(num_components as u8)?;

        for comp in components {
            self.emit_byte(comp.component_id)?;
            self.emit_byte((comp.dc_tbl_no << 4) | comp.ac_tbl_no)?;
        }

        self.emit_bytes(&[0, (DCTSIZE2 - 1) as u8, 0])
    }

    /// Get total bytes written.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Consume the writer and return the underlying output.
    pub fn into_inner(self) -> W {
        self.output
    }
}
