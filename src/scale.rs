//! Edge-replicating padding to MCU alignment.

use std::borrow::Cow;

use crate::error::{Error, Result};
use crate::image::RasterImage;

/// Round `value` up to the next multiple of `alignment`.
#[inline]
pub fn align_up(value: usize, alignment: usize) -> usize {
    value.div_ceil(alignment) * alignment
}

/// Pad `image` so both dimensions are multiples of `alignment`.
///
/// New columns repeat the last column of their row and new rows repeat the
/// last row, so the bottom-right corner is filled with the source's
/// bottom-right pixel. Already aligned images are returned borrowed.
pub fn pad_to_alignment<'a, 'b>(
    image: &'a RasterImage<'b>,
    alignment: usize,
) -> Result<Cow<'a, RasterImage<'b>>> {
    if alignment == 0 {
        return Err(Error::InvalidAlignment(alignment));
    }

    let width = image.width() as usize;
    let height = image.height() as usize;
    if width == 0 || height == 0 {
        return Err(Error::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        });
    }
    let padded_width = align_up(width, alignment);
    let padded_height = align_up(height, alignment);

    if padded_width == width && padded_height == height {
        return Ok(Cow::Borrowed(image));
    }

    let src = image.as_bytes();
    let src_stride = width * 3;
    let mut data = Vec::with_capacity(padded_width * padded_height * 3);

    for y in 0..padded_height {
        let row = &src[y.min(height - 1) * src_stride..][..src_stride];
        data.extend_from_slice(row);
        let last = &row[src_stride - 3..];
        for _ in width..padded_width {
            data.extend_from_slice(last);
        }
    }

    let padded: RasterImage<'b> = RasterImage::new(
        u32::try_from(padded_width).map_err(|_| Error::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        })?,
        u32::try_from(padded_height).map_err(|_| Error::InvalidDimensions {
            width: image.width(),
            height: image.height(),
        })?,
        data,
    )?;
    Ok(Cow::Owned(padded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(width: u32, height: u32) -> RasterImage<'static> {
        let mut data = Vec::new();
        for y in 0..height {
            for x in 0..width {
                data.extend_from_slice(&[x as u8, y as u8, (x * y) as u8]);
            }
        }
        RasterImage::new(width, height, data).unwrap()
    }

    #[test]
    fn test_aligned_image_is_borrowed() {
        let img = gradient(16, 8);
        let padded = pad_to_alignment(&img, 8).unwrap();
        assert!(matches!(padded, Cow::Borrowed(_)));
    }

    #[test]
    fn test_aligned_slice_is_not_copied() {
        let data = vec![3u8; 16 * 16 * 3];
        let img = RasterImage::from_slice(16, 16, &data).unwrap();
        let padded = pad_to_alignment(&img, 16).unwrap();
        assert!(matches!(padded, Cow::Borrowed(_)));
        assert_eq!(padded.as_bytes().as_ptr(), data.as_ptr());
    }

    #[test]
    fn test_unaligned_slice_pads_like_owned() {
        let owned = gradient(18, 9);
        let borrowed = RasterImage::from_slice(18, 9, owned.as_bytes()).unwrap();
        let a = pad_to_alignment(&owned, 16).unwrap();
        let b = pad_to_alignment(&borrowed, 16).unwrap();
        assert_eq!((b.width(), b.height()), (32, 16));
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn test_pad_18_to_24() {
        let img = gradient(18, 18);
        let padded = pad_to_alignment(&img, 8).unwrap();
        assert_eq!((padded.width(), padded.height()), (24, 24));

        // Source region untouched
        for y in 0..18 {
            for x in 0..18 {
                assert_eq!(padded.pixel(x, y), img.pixel(x, y));
            }
        }
        // Columns 18..24 repeat column 17, rows 18..24 repeat row 17
        for y in 0..18 {
            for x in 18..24 {
                assert_eq!(padded.pixel(x, y), img.pixel(17, y));
            }
        }
        for y in 18..24 {
            for x in 0..18 {
                assert_eq!(padded.pixel(x, y), img.pixel(x, 17));
            }
        }
        // Corner holds the bottom-right source pixel
        for y in 18..24 {
            for x in 18..24 {
                assert_eq!(padded.pixel(x, y), img.pixel(17, 17));
            }
        }
    }

    #[test]
    fn test_pad_single_pixel() {
        let img = RasterImage::new(1, 1, vec![9, 8, 7]).unwrap();
        let padded = pad_to_alignment(&img, 16).unwrap();
        assert_eq!((padded.width(), padded.height()), (16, 16));
        assert!(padded.as_bytes().chunks(3).all(|p| p == [9, 8, 7]));
    }

    #[test]
    fn test_zero_alignment_rejected() {
        let img = gradient(4, 4);
        assert_eq!(pad_to_alignment(&img, 0), Err(Error::InvalidAlignment(0)));
    }

    #[test]
    fn test_align_up() {
        assert_eq!(align_up(1, 8), 8);
        assert_eq!(align_up(8, 8), 8);
        assert_eq!(align_up(17, 16), 32);
    }
}
