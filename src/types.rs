//! Configuration and frame description types.

use std::fmt;
use std::str::FromStr;

use crate::consts::{DCTSIZE, DEFAULT_QUALITY, NUM_COMPONENTS};
use crate::error::{Error, Result};

// =============================================================================
// Sampling Factor / Subsampling
// =============================================================================

/// Chroma subsampling ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Subsampling {
    /// 4:4:4 - chroma at full resolution
    #[default]
    S444,
    /// 4:2:2 - chroma at half width
    S422,
    /// 4:2:0 - chroma at half width and half height
    S420,
}

impl Subsampling {
    /// All supported ratios.
    pub const ALL: [Subsampling; 3] = [Subsampling::S444, Subsampling::S422, Subsampling::S420];

    /// Side length in pixels of one MCU, and the alignment the padded
    /// image must satisfy.
    pub const fn alignment(self) -> usize {
        match self {
            Subsampling::S444 => DCTSIZE,
            Subsampling::S422 | Subsampling::S420 => 2 * DCTSIZE,
        }
    }

    /// Returns (h_samp_factor, v_samp_factor) for the luminance component.
    pub const fn luma_factors(self) -> (u8, u8) {
        match self {
            Subsampling::S444 => (1, 1),
            Subsampling::S422 | Subsampling::S420 => (2, 2),
        }
    }

    /// Returns (h_samp_factor, v_samp_factor) for the chroma components.
    pub const fn chroma_factors(self) -> (u8, u8) {
        match self {
            Subsampling::S444 | Subsampling::S420 => (1, 1),
            Subsampling::S422 => (1, 2),
        }
    }

    /// Returns how much the chroma planes shrink (horizontal, vertical).
    pub const fn chroma_divisors(self) -> (usize, usize) {
        match self {
            Subsampling::S444 => (1, 1),
            Subsampling::S422 => (2, 1),
            Subsampling::S420 => (2, 2),
        }
    }

    /// Number of blocks per MCU for Y, Cb and Cr.
    pub const fn blocks_per_mcu(self) -> [usize; NUM_COMPONENTS] {
        match self {
            Subsampling::S444 => [1, 1, 1],
            Subsampling::S422 => [4, 2, 2],
            Subsampling::S420 => [4, 1, 1],
        }
    }

    /// Canonical `J:a:b` notation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Subsampling::S444 => "4:4:4",
            Subsampling::S422 => "4:2:2",
            Subsampling::S420 => "4:2:0",
        }
    }
}

impl fmt::Display for Subsampling {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Subsampling {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Subsampling::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidSamplingRatio(s.to_string()))
    }
}

// =============================================================================
// Quality
// =============================================================================

/// Quality level in 1..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quality(u8);

impl Quality {
    /// Lowest accepted quality.
    pub const MIN: Quality = Quality(1);
    /// Highest accepted quality (all-ones quantization tables).
    pub const MAX: Quality = Quality(100);

    /// Validate a quality level.
    pub fn new(quality: u8) -> Result<Self> {
        if (1..=100).contains(&quality) {
            Ok(Quality(quality))
        } else {
            Err(Error::InvalidQuality(quality))
        }
    }

    /// The raw level.
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Percentage the base matrices are scaled by.
    pub const fn scale_factor(self) -> u32 {
        let q = self.0 as u32;
        if q < 50 {
            5000 / q
        } else {
            200 - 2 * q
        }
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality(DEFAULT_QUALITY)
    }
}

impl TryFrom<u8> for Quality {
    type Error = Error;

    fn try_from(quality: u8) -> Result<Self> {
        Quality::new(quality)
    }
}

// =============================================================================
// Components
// =============================================================================

/// The three planes of a YCbCr image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentType {
    /// Luminance
    Y,
    /// Blue-difference chroma
    Cb,
    /// Red-difference chroma
    Cr,
}

impl ComponentType {
    /// Components in frame and MCU order.
    pub const ALL: [ComponentType; NUM_COMPONENTS] =
        [ComponentType::Y, ComponentType::Cb, ComponentType::Cr];

    /// Position in frame order (0 = Y).
    pub const fn index(self) -> usize {
        match self {
            ComponentType::Y => 0,
            ComponentType::Cb => 1,
            ComponentType::Cr => 2,
        }
    }

    /// Component identifier written into SOF/SOS.
    pub const fn id(self) -> u8 {
        self.index() as u8 + 1
    }

    /// Which quantization/Huffman table family this component uses.
    pub const fn table_class(self) -> TableClass {
        match self {
            ComponentType::Y => TableClass::Luma,
            ComponentType::Cb | ComponentType::Cr => TableClass::Chroma,
        }
    }
}

/// Table family shared by components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TableClass {
    /// Tables for Y
    Luma,
    /// Tables for Cb and Cr
    Chroma,
}

impl TableClass {
    /// Destination slot for both the quantization and the Huffman tables.
    pub const fn slot(self) -> u8 {
        match self {
            TableClass::Luma => 0,
            TableClass::Chroma => 1,
        }
    }
}

/// Per-component frame parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentInfo {
    /// Component identifier (1-3)
    pub component_id: u8,
    /// Horizontal sampling factor
    pub h_samp_factor: u8,
    /// Vertical sampling factor
    pub v_samp_factor: u8,
    /// Quantization table slot
    pub quant_tbl_no: u8,
    /// DC Huffman table slot
    pub dc_tbl_no: u8,
    /// AC Huffman table slot
    pub ac_tbl_no: u8,
}

impl ComponentInfo {
    /// Describe one component of a frame with the given ratio.
    pub const fn new(kind: ComponentType, subsampling: Subsampling) -> Self {
        let (h, v) = match kind {
            ComponentType::Y => subsampling.luma_factors(),
            ComponentType::Cb | ComponentType::Cr => subsampling.chroma_factors(),
        };
        let slot = kind.table_class().slot();
        Self {
            component_id: kind.id(),
            h_samp_factor: h,
            v_samp_factor: v,
            quant_tbl_no: slot,
            dc_tbl_no: slot,
            ac_tbl_no: slot,
        }
    }

    /// Y, Cb and Cr descriptions for a frame.
    pub const fn frame(subsampling: Subsampling) -> [ComponentInfo; NUM_COMPONENTS] {
        [
            ComponentInfo::new(ComponentType::Y, subsampling),
            ComponentInfo::new(ComponentType::Cb, subsampling),
            ComponentInfo::new(ComponentType::Cr, subsampling),
        ]
    }
}

// =============================================================================
// Pixel Density
// =============================================================================

/// Units of the JFIF density fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DensityUnit {
    /// No units; the densities only give the pixel aspect ratio
    #[default]
    None = 0,
    /// Dots per inch
    DotsPerInch = 1,
    /// Dots per centimeter
    DotsPerCm = 2,
}

/// Pixel density written into the JFIF APP0 segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelDensity {
    /// Units of `x` and `y`
    pub unit: DensityUnit,
    /// Horizontal density
    pub x: u16,
    /// Vertical density
    pub y: u16,
}

impl PixelDensity {
    /// Density in dots per inch.
    pub const fn dpi(x: u16, y: u16) -> Self {
        Self {
            unit: DensityUnit::DotsPerInch,
            x,
            y,
        }
    }

    /// Density in dots per centimeter.
    pub const fn dpcm(x: u16, y: u16) -> Self {
        Self {
            unit: DensityUnit::DotsPerCm,
            x,
            y,
        }
    }

    /// Unitless pixel aspect ratio.
    pub const fn aspect_ratio(x: u16, y: u16) -> Self {
        Self {
            unit: DensityUnit::None,
            x,
            y,
        }
    }
}

impl Default for PixelDensity {
    fn default() -> Self {
        Self::aspect_ratio(1, 1)
    }
}
