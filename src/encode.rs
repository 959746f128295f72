//! Baseline JPEG encoder.
//!
//! [`Encoder`] holds the configuration of an encode plus the quantization
//! and Huffman tables derived from it. Each call runs the full pipeline:
//!
//! 1. pad the raster to MCU alignment by edge replication
//! 2. convert RGB to YCbCr
//! 3. subsample the chroma planes
//! 4. cut the planes into MCUs
//! 5. DCT and quantize every block
//! 6. entropy-code the blocks in MCU order into a single scan
//!
//! Without the `parallel` feature steps 4 to 6 run one MCU at a time. With
//! it, step 5 runs for the whole image on the rayon pool before step 6.
//!
//! The encoder itself is immutable while encoding and can be shared between
//! threads.

use std::io::Write;

use log::{debug, trace};
#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::bitstream::BitWriter;
use crate::block::{iter_mcus, MinimumCodedUnit};
use crate::color::convert_to_ycbcr;
use crate::consts::ENCODER_COMMENT;
use crate::dct::forward_dct;
use crate::entropy::{encode_mcu, DcPredictor, EntropyEncoder};
use crate::error::{Error, Result};
use crate::huffman::{HuffTable, HuffmanTables, TableKind};
use crate::image::{PixelSource, RasterImage};
use crate::marker::MarkerWriter;
use crate::quant::{QuantizedBlock, Quantizer};
use crate::sample::downsample;
use crate::scale::pad_to_alignment;
use crate::types::{ComponentInfo, ComponentType, PixelDensity, Quality, Subsampling, TableClass};

/// Largest dimension a frame header can hold
const MAX_DIMENSION: u32 = u16::MAX as u32;

/// Quantized regions of one MCU, in Y, Cb, Cr order.
type QuantizedMcu = Vec<(ComponentType, Vec<QuantizedBlock>)>;

/// Baseline JPEG encoder.
#[derive(Debug, Clone)]
pub struct Encoder {
    /// Chroma subsampling mode
    subsampling: Subsampling,
    /// Pixel density for JFIF APP0 marker
    pixel_density: PixelDensity,
    /// Text of the COM segment (none if empty)
    comment: String,
    /// Tables scaled to the configured quality
    quantizer: Quantizer,
    /// DC/AC tables for luma and chroma
    huffman: HuffmanTables,
}

impl Encoder {
    /// Create an encoder with default settings: 4:4:4, quality 80, 1:1
    /// aspect ratio and an identification comment.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use seqjpeg::{Encoder, Subsampling};
    ///
    /// # fn main() -> Result<(), seqjpeg::Error> {
    /// let pixels: Vec<u8> = vec![128; 64 * 48 * 3];
    /// let jpeg = Encoder::new()?
    ///     .quality(90)?
    ///     .subsampling(Subsampling::S420)
    ///     .encode_rgb(&pixels, 64, 48)?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn new() -> Result<Self> {
        Ok(Self {
            subsampling: Subsampling::default(),
            pixel_density: PixelDensity::default(),
            comment: ENCODER_COMMENT.to_string(),
            quantizer: Quantizer::new(Quality::default()),
            huffman: HuffmanTables::new()?,
        })
    }

    /// Set quality level (1-100).
    ///
    /// Higher values produce larger, higher-quality images.
    pub fn quality(mut self, quality: u8) -> Result<Self> {
        self.quantizer = Quantizer::new(Quality::new(quality)?);
        Ok(self)
    }

    /// Set chroma subsampling mode.
    pub fn subsampling(mut self, mode: Subsampling) -> Self {
        self.subsampling = mode;
        self
    }

    /// Set the pixel density written into the JFIF APP0 marker.
    pub fn pixel_density(mut self, density: PixelDensity) -> Self {
        self.pixel_density = density;
        self
    }

    /// Set the COM segment text. An empty string omits the segment.
    pub fn comment(mut self, text: impl Into<String>) -> Self {
        self.comment = text.into();
        self
    }

    /// The quantization tables in use.
    pub fn quantizer(&self) -> &Quantizer {
        &self.quantizer
    }

    /// The configured subsampling mode.
    pub fn subsampling_mode(&self) -> Subsampling {
        self.subsampling
    }

    /// Encode RGB image data to JPEG.
    ///
    /// # Arguments
    /// * `rgb_data` - RGB pixel data (3 bytes per pixel, row-major)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    ///
    /// # Returns
    /// JPEG-encoded data as a `Vec<u8>`.
    pub fn encode_rgb(&self, rgb_data: &[u8], width: u32, height: u32) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.encode_rgb_to_writer(rgb_data, width, height, &mut output)?;
        Ok(output)
    }

    /// Encode RGB image data to JPEG, writing to `output`.
    ///
    /// On error, whatever was already written is not a valid JPEG.
    pub fn encode_rgb_to_writer<W: Write>(
        &self,
        rgb_data: &[u8],
        width: u32,
        height: u32,
        output: W,
    ) -> Result<()> {
        validate_dimensions(width, height)?;
        let image = RasterImage::from_slice(width, height, rgb_data)?;
        self.encode_raster(&image, output)
    }

    /// Encode any pixel source to JPEG.
    pub fn encode_image(&self, source: &impl PixelSource) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        self.encode_image_to_writer(source, &mut output)?;
        Ok(output)
    }

    /// Encode any pixel source to JPEG, writing to `output`.
    pub fn encode_image_to_writer<W: Write>(
        &self,
        source: &impl PixelSource,
        output: W,
    ) -> Result<()> {
        let (width, height) = source.dimensions();
        self.encode_rgb_to_writer(source.rgb_bytes(), width, height, output)
    }

    /// Run the pipeline on a raster.
    ///
    /// The sink is flushed after EOI, so a failure inside a buffered
    /// writer is reported here rather than lost on drop.
    pub fn encode_raster<W: Write>(&self, image: &RasterImage<'_>, output: W) -> Result<()> {
        let (width, height) = (image.width(), image.height());
        validate_dimensions(width, height)?;

        let padded = pad_to_alignment(image, self.subsampling.alignment())?;
        let planar = downsample(convert_to_ycbcr(&*padded)?, self.subsampling)?;
        let mcus = iter_mcus(&planar)?;
        debug!(
            "encoding {}x{} (padded {}x{}), {}, quality {}, {} MCUs",
            width,
            height,
            padded.width(),
            padded.height(),
            self.subsampling,
            self.quantizer.quality().value(),
            mcus.len()
        );

        let output = self.write_headers(output, width as u16, height as u16)?;

        let mut bit_writer = BitWriter::new(output);
        let mut encoder = EntropyEncoder::new(&mut bit_writer, &self.huffman);
        self.encode_scan(&mut encoder, mcus)?;
        encoder.flush()?;
        trace!("entropy-coded payload: {} bytes", bit_writer.bytes_written());

        let mut markers = MarkerWriter::new(bit_writer.into_inner());
        markers.write_eoi()?;
        markers.into_inner().flush()?;
        Ok(())
    }

    /// Transform and entropy-code MCUs one at a time, so only the MCU in
    /// flight is held in quantized form.
    #[cfg(not(feature = "parallel"))]
    fn encode_scan<W: Write>(
        &self,
        encoder: &mut EntropyEncoder<'_, W>,
        mut mcus: impl Iterator<Item = MinimumCodedUnit>,
    ) -> Result<()> {
        mcus.try_fold(DcPredictor::new(), |predictor, mcu| {
            encode_mcu(encoder, predictor, &self.transform_mcu(&mcu))
        })
        .map(|_| ())
    }

    /// Transform every MCU on the rayon pool, then entropy-code them in
    /// order. DC prediction chains across MCUs, so coding stays serial.
    #[cfg(feature = "parallel")]
    fn encode_scan<W: Write>(
        &self,
        encoder: &mut EntropyEncoder<'_, W>,
        mcus: impl Iterator<Item = MinimumCodedUnit>,
    ) -> Result<()> {
        let mcus: Vec<MinimumCodedUnit> = mcus.collect();
        let quantized: Vec<QuantizedMcu> =
            mcus.par_iter().map(|mcu| self.transform_mcu(mcu)).collect();
        quantized
            .iter()
            .try_fold(DcPredictor::new(), |predictor, mcu| encode_mcu(encoder, predictor, mcu))
            .map(|_| ())
    }

    fn transform_mcu(&self, mcu: &MinimumCodedUnit) -> QuantizedMcu {
        mcu.regions()
            .iter()
            .map(|region| {
                let class = region.component.table_class();
                let blocks = region
                    .blocks
                    .iter()
                    .map(|block| self.quantizer.quantize(&forward_dct(block), class))
                    .collect();
                (region.component, blocks)
            })
            .collect()
    }

    /// Write everything up to and including SOS.
    fn write_headers<W: Write>(&self, output: W, width: u16, height: u16) -> Result<W> {
        let components = ComponentInfo::frame(self.subsampling);
        let mut markers = MarkerWriter::new(output);

        markers.write_soi()?;
        markers.write_jfif_app0(&self.pixel_density)?;
        if !self.comment.is_empty() {
            markers.write_com(&self.comment)?;
        }
        markers.write_dqt(&[
            (TableClass::Luma.slot(), self.quantizer.luma_table()),
            (TableClass::Chroma.slot(), self.quantizer.chroma_table()),
        ])?;
        markers.write_sof0(height, width, &components)?;

        let dht: Vec<(TableKind, u8, &HuffTable)> = self
            .huffman
            .dht_order()
            .into_iter()
            .map(|(kind, class, table)| (kind, class.slot(), table))
            .collect();
        markers.write_dht(&dht)?;
        markers.write_sos(&components)?;

        trace!("headers: {} bytes", markers.bytes_written());
        Ok(markers.into_inner())
    }
}

fn validate_dimensions(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 || width > MAX_DIMENSION || height > MAX_DIMENSION {
        return Err(Error::InvalidDimensions { width, height });
    }
    Ok(())
}
