//! Bitstream writer for JPEG entropy coding.
//!
//! Codes are packed MSB-first into a 32-bit accumulator. Whenever a whole
//! byte is pending it goes to the output, and every 0xFF data byte is
//! followed by a stuffed 0x00 so it cannot be mistaken for a marker.

use std::io::Write;

/// Bitstream writer for one entropy-coded segment.
pub struct BitWriter<W: Write> {
    /// Output destination
    output: W,
    /// Pending bits, right-aligned
    put_buffer: u32,
    /// Number of valid bits in `put_buffer` (always < 8 between calls)
    put_bits: u32,
    /// Total bytes written, stuffing included
    bytes_written: usize,
}

impl<W: Write> BitWriter<W> {
    /// Create a new bitstream writer.
    pub fn new(output: W) -> Self {
        Self {
            output,
            put_buffer: 0,
            put_bits: 0,
            bytes_written: 0,
        }
    }

    /// Append the low `size` bits of `code` (`size` <= 16).
    #[inline]
    pub fn put_bits(&mut self, code: u32, size: u8) -> std::io::Result<()> {
        debug_assert!(size <= 16, "Size must be <= 16 bits");
        debug_assert!(code < (1 << size), "Code exceeds size bits");

        if size == 0 {
            return Ok(());
        }
        let size = size as u32;
        self.put_buffer = (self.put_buffer << size) | (code & ((1 << size) - 1));
        self.put_bits += size;

        while self.put_bits >= 8 {
            self.put_bits -= 8;
            let byte = (self.put_buffer >> self.put_bits) as u8;
            self.emit_byte_stuffed(byte)?;
        }
        self.put_buffer &= (1 << self.put_bits) - 1;

        Ok(())
    }

    /// Emit a single byte with 0xFF stuffing.
    #[inline]
    fn emit_byte_stuffed(&mut self, byte: u8) -> std::io::Result<()> {
        if byte == 0xFF {
            self.output.write_all(&[0xFF, 0x00])?;
            self.bytes_written += 2;
        } else {
            self.output.write_all(&[byte])?;
            self.bytes_written += 1;
        }
        Ok(())
    }

    /// Pad the pending bits with 1s to a byte boundary and write them out.
    pub fn flush(&mut self) -> std::io::Result<()> {
        if self.put_bits > 0 {
            let padding = 8 - self.put_bits;
            let byte = ((self.put_buffer << padding) | ((1 << padding) - 1)) as u8;
            self.emit_byte_stuffed(byte)?;
            self.put_buffer = 0;
            self.put_bits = 0;
        }
        Ok(())
    }

    /// Number of bits waiting for a byte boundary.
    pub fn pending_bits(&self) -> u32 {
        self.put_bits
    }

    /// Write raw bytes directly (not bit-stuffed).
    ///
    /// Used for markers. The writer must be byte-aligned.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        debug_assert!(
            self.put_bits == 0,
            "Buffer must be flushed before writing raw bytes"
        );
        self.output.write_all(bytes)?;
        self.bytes_written += bytes.len();
        Ok(())
    }

    /// Get the number of bytes written so far.
    pub fn bytes_written(&self) -> usize {
        self.bytes_written
    }

    /// Consume the writer and return the underlying output.
    pub fn into_inner(self) -> W {
        self.output
    }

    /// Get a reference to the underlying output.
    pub fn get_ref(&self) -> &W {
        &self.output
    }
}

/// An in-memory bitstream.
pub type VecBitWriter = BitWriter<Vec<u8>>;

impl VecBitWriter {
    /// Create a new bitstream writer backed by a Vec.
    pub fn new_vec() -> Self {
        Self::new(Vec::new())
    }

    /// Get the written bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_bits() {
        let mut writer = VecBitWriter::new_vec();
        writer.put_bits(0b10101010, 8).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_bytes(), vec![0b10101010]);
    }

    #[test]
    fn test_multiple_small_writes() {
        let mut writer = VecBitWriter::new_vec();
        writer.put_bits(0b101, 3).unwrap();
        writer.put_bits(0b11, 2).unwrap();
        writer.put_bits(0b000, 3).unwrap();
        assert_eq!(writer.pending_bits(), 0);
        writer.flush().unwrap();
        assert_eq!(writer.into_bytes(), vec![0b10111000]);
    }

    #[test]
    fn test_flush_pads_with_ones() {
        let mut writer = VecBitWriter::new_vec();
        writer.put_bits(0b101, 3).unwrap();
        assert_eq!(writer.pending_bits(), 3);
        writer.flush().unwrap();
        assert_eq!(writer.into_bytes(), vec![0b10111111]);
    }

    #[test]
    fn test_flush_when_aligned_writes_nothing() {
        let mut writer = VecBitWriter::new_vec();
        writer.flush().unwrap();
        writer.put_bits(0x42, 8).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_bytes(), vec![0x42]);
    }

    #[test]
    fn test_byte_stuffing() {
        let mut writer = VecBitWriter::new_vec();
        writer.put_bits(0xFF, 8).unwrap();
        writer.put_bits(0x12, 8).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.bytes_written(), 3);
        assert_eq!(writer.into_bytes(), vec![0xFF, 0x00, 0x12]);
    }

    #[test]
    fn test_cross_byte_boundary() {
        let mut writer = VecBitWriter::new_vec();
        // 1111 0000 | 1111 1111 | 1111 (+ 1111 padding)
        writer.put_bits(0b1111, 4).unwrap();
        writer.put_bits(0b0000_1111_1111_1111, 16).unwrap();
        assert_eq!(writer.pending_bits(), 4);
        writer.flush().unwrap();
        assert_eq!(writer.into_bytes(), vec![0xF0, 0xFF, 0x00, 0xFF, 0x00]);
    }

    #[test]
    fn test_padding_can_produce_stuffed_ff() {
        let mut writer = VecBitWriter::new_vec();
        writer.put_bits(0b1111111, 7).unwrap();
        writer.flush().unwrap();
        assert_eq!(writer.into_bytes(), vec![0xFF, 0x00]);
    }

    #[test]
    fn test_zero_size_is_noop() {
        let mut writer = VecBitWriter::new_vec();
        writer.put_bits(0, 0).unwrap();
        assert_eq!(writer.pending_bits(), 0);
        writer.flush().unwrap();
        assert!(writer.into_bytes().is_empty());
    }

    #[test]
    fn test_write_bytes_after_flush() {
        let mut writer = VecBitWriter::new_vec();
        writer.put_bits(0b1, 1).unwrap();
        writer.flush().unwrap();
        writer.write_bytes(&[0xFF, 0xD9]).unwrap();
        assert_eq!(writer.bytes_written(), 4);
        assert_eq!(writer.get_ref(), &vec![0xFF, 0x00, 0xFF, 0xD9]);
    }

    #[test]
    fn test_io_error_propagates() {
        struct Closed;
        impl Write for Closed {
            fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }
        let mut writer = BitWriter::new(Closed);
        assert!(writer.put_bits(0b101, 3).is_ok());
        assert!(writer.put_bits(0xFF, 8).is_err());
    }
}
