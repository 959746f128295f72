//! # seqjpeg
//!
//! Baseline sequential JPEG encoder in pure Rust.
//!
//! Images are encoded as JFIF files with three YCbCr components, the
//! Annex K quantization and Huffman tables, and a single interleaved scan:
//!
//! - **Chroma subsampling** - 4:4:4, 4:2:2 or 4:2:0
//! - **Quality scaling** - the familiar 1-100 quality scale
//! - **Any dimensions** - images are padded to whole MCUs by edge replication
//!   and the frame header keeps the original size
//!
//! ## Quick Start
//!
//! ```no_run
//! use seqjpeg::Encoder;
//!
//! # fn main() -> Result<(), seqjpeg::Error> {
//! // RGB pixel data (3 bytes per pixel, row-major order)
//! let rgb_pixels: Vec<u8> = vec![0; 640 * 480 * 3];
//!
//! let jpeg_data = Encoder::new()?
//!     .quality(85)?
//!     .encode_rgb(&rgb_pixels, 640, 480)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing to a File or Stream
//!
//! ```no_run
//! use seqjpeg::{Encoder, Subsampling};
//! use std::fs::File;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! # let rgb_pixels: Vec<u8> = vec![0; 100 * 100 * 3];
//! let mut file = File::create("output.jpg")?;
//!
//! Encoder::new()?
//!     .subsampling(Subsampling::S420)
//!     .encode_rgb_to_writer(&rgb_pixels, 100, 100, &mut file)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Metadata
//!
//! ```no_run
//! use seqjpeg::{Encoder, PixelDensity};
//!
//! # fn main() -> Result<(), seqjpeg::Error> {
//! # let rgb_pixels: Vec<u8> = vec![0; 100 * 100 * 3];
//! let jpeg_data = Encoder::new()?
//!     .pixel_density(PixelDensity::dpi(300, 300))
//!     .comment("scanned page 4")
//!     .encode_rgb(&rgb_pixels, 100, 100)?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `parallel`: transform MCUs on the rayon thread pool. Output is
//!   byte-identical to the sequential path.

#![deny(unsafe_code)]
#![warn(missing_docs)]

// ============================================================================
// Pipeline stages - hidden from public docs but accessible for tests
// ============================================================================

/// Bitstream writing with byte stuffing (internal).
#[doc(hidden)]
pub mod bitstream;

/// Block and MCU decomposition (internal).
#[doc(hidden)]
pub mod block;

/// RGB to YCbCr conversion (internal).
#[doc(hidden)]
pub mod color;

/// Constants and standard tables (internal).
#[doc(hidden)]
pub mod consts;

/// Forward DCT (internal).
#[doc(hidden)]
pub mod dct;

/// Entropy encoding (internal).
#[doc(hidden)]
pub mod entropy;

/// Huffman table construction (internal).
#[doc(hidden)]
pub mod huffman;

/// Raster and planar image containers.
pub mod image;

/// JPEG marker writing (internal).
#[doc(hidden)]
pub mod marker;

/// Quantization (internal).
#[doc(hidden)]
pub mod quant;

/// Zigzag run-length coding (internal).
#[doc(hidden)]
pub mod rle;

/// Chroma subsampling (internal).
#[doc(hidden)]
pub mod sample;

/// Edge padding to MCU alignment (internal).
#[doc(hidden)]
pub mod scale;

/// Type definitions.
pub mod types;

mod encode;
mod error;

// ============================================================================
// Public API
// ============================================================================

/// The JPEG encoder.
///
/// Configure with the builder methods, then call
/// [`encode_rgb()`](Encoder::encode_rgb) or
/// [`encode_image()`](Encoder::encode_image).
///
/// # Example
///
/// ```no_run
/// use seqjpeg::{Encoder, Subsampling};
///
/// # fn main() -> Result<(), seqjpeg::Error> {
/// let pixels: Vec<u8> = vec![0; 640 * 480 * 3];
///
/// let jpeg = Encoder::new()?
///     .quality(75)?
///     .subsampling(Subsampling::S422)
///     .encode_rgb(&pixels, 640, 480)?;
/// # Ok(())
/// # }
/// ```
pub use encode::Encoder;

/// Error type for encoding operations.
///
/// # Example
///
/// ```no_run
/// use seqjpeg::{Encoder, Error};
///
/// # fn example() -> Result<(), Error> {
/// let result = Encoder::new()?.encode_rgb(&[], 0, 0);
/// match result {
///     Ok(data) => println!("Encoded {} bytes", data.len()),
///     Err(Error::InvalidDimensions { width, height }) => {
///         eprintln!("Invalid dimensions: {}x{}", width, height);
///     }
///     Err(e) => eprintln!("Encoding failed: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
pub use error::Error;

/// Result type alias for encoding operations.
pub use error::Result;

/// Chroma subsampling mode.
///
/// | Mode | Ratio | Luma blocks per MCU |
/// |------|-------|---------------------|
/// | [`S444`](Subsampling::S444) | 4:4:4 | 1 |
/// | [`S422`](Subsampling::S422) | 4:2:2 | 4 |
/// | [`S420`](Subsampling::S420) | 4:2:0 | 4 |
pub use types::Subsampling;

/// Quality level, 1 to 100.
pub use types::Quality;

/// Color component of a frame.
pub use types::ComponentType;

/// Pixel density for JFIF metadata.
///
/// # Example
///
/// ```no_run
/// use seqjpeg::{Encoder, PixelDensity};
///
/// # fn main() -> Result<(), seqjpeg::Error> {
/// # let pixels: Vec<u8> = vec![0; 100 * 100 * 3];
/// // 2:1 pixel aspect ratio
/// let jpeg = Encoder::new()?
///     .pixel_density(PixelDensity::aspect_ratio(2, 1))
///     .encode_rgb(&pixels, 100, 100)?;
/// # Ok(())
/// # }
/// ```
pub use types::PixelDensity;

/// Pixel density unit for JFIF metadata.
pub use types::DensityUnit;

/// Owned RGB raster.
pub use image::RasterImage;

/// Anything that can hand out packed RGB rows.
pub use image::PixelSource;
