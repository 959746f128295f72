//! Chroma downsampling.
//!
//! Cb and Cr planes are reduced by averaging: horizontal pairs for 4:2:2,
//! 2x2 windows for 4:2:0. Rounding alternates its bias along a row
//! (0,1,0,1 for pairs; 1,2,1,2 for windows) so the output does not drift
//! upward on average. Luma is never touched.

use crate::error::{Error, Result};
use crate::image::{Component, PlanarImage};
use crate::types::Subsampling;

/// Average horizontal pairs of `input` into `output` (4:2:2).
///
/// `input` must hold exactly `2 * output.len()` samples.
pub fn downsample_h2v1_row(input: &[u8], output: &mut [u8]) {
    debug_assert_eq!(input.len(), output.len() * 2);
    let mut bias = 0u16;
    for (out, pair) in output.iter_mut().zip(input.chunks_exact(2)) {
        *out = ((pair[0] as u16 + pair[1] as u16 + bias) >> 1) as u8;
        bias ^= 1;
    }
}

/// Average 2x2 windows spanning `row0` and `row1` into `output` (4:2:0).
pub fn downsample_h2v2_rows(row0: &[u8], row1: &[u8], output: &mut [u8]) {
    debug_assert_eq!(row0.len(), row1.len());
    debug_assert_eq!(row0.len(), output.len() * 2);
    let mut bias = 1u16;
    for ((out, top), bottom) in output
        .iter_mut()
        .zip(row0.chunks_exact(2))
        .zip(row1.chunks_exact(2))
    {
        let sum = top[0] as u16 + top[1] as u16 + bottom[0] as u16 + bottom[1] as u16;
        *out = ((sum + bias) >> 2) as u8;
        bias ^= 3;
    }
}

/// Shrink one chroma plane by the ratio's divisors.
fn downsample_plane(plane: &Component, ratio: Subsampling) -> Result<Component> {
    let (dh, dv) = ratio.chroma_divisors();
    let out_width = plane.width() / dh;
    let out_height = plane.height() / dv;
    let mut samples = vec![0u8; out_width * out_height];

    for (y, out_row) in samples.chunks_exact_mut(out_width.max(1)).enumerate() {
        match ratio {
            Subsampling::S444 => out_row.copy_from_slice(plane.row(y)),
            Subsampling::S422 => downsample_h2v1_row(plane.row(y), out_row),
            Subsampling::S420 => {
                downsample_h2v2_rows(plane.row(2 * y), plane.row(2 * y + 1), out_row)
            }
        }
    }

    Component::new(plane.kind(), out_width, out_height, samples)
}

/// Reduce the chroma planes of a full-resolution image to `ratio`.
///
/// The input must be a 4:4:4 image whose dimensions are divisible by the
/// ratio's divisors; padding to MCU alignment guarantees this.
pub fn downsample(image: PlanarImage, ratio: Subsampling) -> Result<PlanarImage> {
    if image.subsampling() != Subsampling::S444 {
        return Err(Error::InternalError("chroma planes are already subsampled"));
    }
    if ratio == Subsampling::S444 {
        return Ok(image);
    }

    let (dh, dv) = ratio.chroma_divisors();
    let (width, height) = (image.width(), image.height());
    if width % dh != 0 || height % dv != 0 {
        return Err(Error::UnsupportedDimensions {
            width,
            height,
            alignment: dh.max(dv),
        });
    }

    let [y, cb, cr] = image.into_components();
    let cb = downsample_plane(&cb, ratio)?;
    let cr = downsample_plane(&cr, ratio)?;
    PlanarImage::new(y, cb, cr, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ComponentType;

    fn planar(width: usize, height: usize, chroma: impl Fn(usize, usize) -> u8) -> PlanarImage {
        let luma: Vec<u8> = (0..width * height).map(|i| i as u8).collect();
        let mut cb = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cb.push(chroma(x, y));
            }
        }
        PlanarImage::new(
            Component::new(ComponentType::Y, width, height, luma).unwrap(),
            Component::new(ComponentType::Cb, width, height, cb.clone()).unwrap(),
            Component::new(ComponentType::Cr, width, height, cb).unwrap(),
            Subsampling::S444,
        )
        .unwrap()
    }

    #[test]
    fn test_h2v1_alternating_bias() {
        let mut out = [0u8; 4];
        // Every pair sums to an odd value: the bias decides the rounding.
        downsample_h2v1_row(&[0, 1, 0, 1, 0, 1, 0, 1], &mut out);
        assert_eq!(out, [0, 1, 0, 1]);
        downsample_h2v1_row(&[10, 20, 30, 40, 50, 60, 70, 80], &mut out);
        assert_eq!(out, [15, 35, 55, 75]);
    }

    #[test]
    fn test_h2v2_alternating_bias() {
        let mut out = [0u8; 2];
        // Sums of 2: (2 + 1) >> 2 = 0, (2 + 2) >> 2 = 1
        downsample_h2v2_rows(&[1, 0, 1, 0], &[0, 1, 0, 1], &mut out);
        assert_eq!(out, [0, 1]);
        downsample_h2v2_rows(&[10, 20, 30, 40], &[30, 40, 50, 60], &mut out);
        assert_eq!(out, [25, 45]);
    }

    #[test]
    fn test_444_is_identity() {
        let img = planar(8, 8, |x, y| (x * 7 + y) as u8);
        let out = downsample(img.clone(), Subsampling::S444).unwrap();
        assert_eq!(out, img);
    }

    #[test]
    fn test_422_halves_width() {
        let img = planar(16, 16, |x, _| if x % 2 == 0 { 100 } else { 102 });
        let out = downsample(img, Subsampling::S422).unwrap();
        let cb = out.component(ComponentType::Cb);
        assert_eq!((cb.width(), cb.height()), (8, 16));
        assert!(cb.samples().iter().all(|&v| v == 101));
        assert_eq!(out.component(ComponentType::Y).width(), 16);
        assert_eq!(out.subsampling(), Subsampling::S422);
    }

    #[test]
    fn test_420_halves_both() {
        let img = planar(16, 16, |_, y| if y % 2 == 0 { 40 } else { 80 });
        let out = downsample(img, Subsampling::S420).unwrap();
        let cr = out.component(ComponentType::Cr);
        assert_eq!((cr.width(), cr.height()), (8, 8));
        assert!(cr.samples().iter().all(|&v| v == 60));
    }

    #[test]
    fn test_odd_dimensions_rejected() {
        let img = planar(9, 8, |_, _| 128);
        assert!(matches!(
            downsample(img, Subsampling::S420),
            Err(Error::UnsupportedDimensions { .. })
        ));
    }
}
