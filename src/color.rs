//! RGB to YCbCr conversion.
//!
//! ```text
//! Y  =        0.2990 * R + 0.5870 * G + 0.1140 * B
//! Cb = 128 -  0.1687 * R - 0.3313 * G + 0.5000 * B
//! Cr = 128 +  0.5000 * R - 0.4187 * G - 0.0813 * B
//! ```
//!
//! Coefficients are 16-bit fixed point. Each row sums to exactly 1.0 (Y) or
//! 0.0 (Cb, Cr), so neutral greys map to `(v, 128, 128)` without drift.
//! Chroma terms are truncated toward zero before the 128 offset is added.

use crate::error::{Error, Result};
use crate::image::{rgb_len, Component, PixelSource, PlanarImage};
use crate::types::{ComponentType, Subsampling};

/// Fixed-point precision bits
const SCALEBITS: i32 = 16;

const ONE: i32 = 1 << SCALEBITS;

/// Offset added to Cb and Cr
const CBCR_CENTER: i32 = 128;

const fn fix(x: f64) -> i32 {
    (x * ONE as f64 + 0.5) as i32
}

const FIX_0_2990: i32 = fix(0.2990);
const FIX_0_5870: i32 = fix(0.5870);
const FIX_0_1140: i32 = fix(0.1140);
const FIX_0_1687: i32 = fix(0.1687);
const FIX_0_3313: i32 = fix(0.3313);
const FIX_0_5000: i32 = fix(0.5000);
const FIX_0_4187: i32 = fix(0.4187);
const FIX_0_0813: i32 = fix(0.0813);

/// Convert a single RGB pixel to YCbCr.
#[inline]
pub fn rgb_to_ycbcr(r: u8, g: u8, b: u8) -> (u8, u8, u8) {
    let (r, g, b) = (r as i32, g as i32, b as i32);

    let y = (FIX_0_2990 * r + FIX_0_5870 * g + FIX_0_1140 * b) >> SCALEBITS;
    // `/` truncates toward zero for the signed chroma terms.
    let cb = (-FIX_0_1687 * r - FIX_0_3313 * g + FIX_0_5000 * b) / ONE + CBCR_CENTER;
    let cr = (FIX_0_5000 * r - FIX_0_4187 * g - FIX_0_0813 * b) / ONE + CBCR_CENTER;

    (
        y.clamp(0, 255) as u8,
        cb.clamp(0, 255) as u8,
        cr.clamp(0, 255) as u8,
    )
}

/// Convert a whole raster into full-resolution Y, Cb and Cr planes.
///
/// The result is tagged 4:4:4; subsampling happens in a later stage.
pub fn convert_to_ycbcr(source: &impl PixelSource) -> Result<PlanarImage> {
    let (width, height) = source.dimensions();
    let rgb = source.rgb_bytes();
    let expected = rgb_len(width, height)?;
    if rgb.len() != expected {
        return Err(Error::UnreadablePixelData {
            expected,
            actual: rgb.len(),
        });
    }

    let num_pixels = expected / 3;
    let mut y_plane = Vec::with_capacity(num_pixels);
    let mut cb_plane = Vec::with_capacity(num_pixels);
    let mut cr_plane = Vec::with_capacity(num_pixels);

    for px in rgb.chunks_exact(3) {
        let (y, cb, cr) = rgb_to_ycbcr(px[0], px[1], px[2]);
        y_plane.push(y);
        cb_plane.push(cb);
        cr_plane.push(cr);
    }

    let (w, h) = (width as usize, height as usize);
    PlanarImage::new(
        Component::new(ComponentType::Y, w, h, y_plane)?,
        Component::new(ComponentType::Cb, w, h, cb_plane)?,
        Component::new(ComponentType::Cr, w, h, cr_plane)?,
        Subsampling::S444,
    )
}
