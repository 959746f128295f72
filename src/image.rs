//! Raster and planar image containers.
//!
//! [`RasterImage`] is the interleaved RGB input to the encoder. Anything that
//! can hand over a full RGB raster implements [`PixelSource`].
//! [`PlanarImage`] holds the Y, Cb and Cr planes after color conversion.

use std::borrow::Cow;

use rgb::RGB8;

use crate::consts::NUM_COMPONENTS;
use crate::error::{Error, Result};
use crate::types::{ComponentType, Subsampling};

/// A source of interleaved 8-bit RGB pixels.
pub trait PixelSource {
    /// Width and height in pixels.
    fn dimensions(&self) -> (u32, u32);

    /// Row-major RGB bytes, three per pixel.
    fn rgb_bytes(&self) -> &[u8];
}

/// An immutable interleaved RGB raster, owning its bytes or borrowing them
/// from the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage<'a> {
    width: u32,
    height: u32,
    data: Cow<'a, [u8]>,
}

impl RasterImage<'static> {
    /// Wrap interleaved RGB bytes.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        Self::from_cow(width, height, Cow::Owned(data))
    }

    /// Build from `rgb` crate pixels.
    pub fn from_rgb8(width: u32, height: u32, pixels: &[RGB8]) -> Result<Self> {
        let data = pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect();
        Self::new(width, height, data)
    }

    /// Build from packed `0xAARRGGBB` pixels. Alpha is dropped.
    pub fn from_packed_argb(width: u32, height: u32, pixels: &[u32]) -> Result<Self> {
        let data = pixels
            .iter()
            .flat_map(|&argb| [(argb >> 16) as u8, (argb >> 8) as u8, argb as u8])
            .collect();
        Self::new(width, height, data)
    }
}

impl<'a> RasterImage<'a> {
    /// View interleaved RGB bytes in place.
    pub fn from_slice(width: u32, height: u32, data: &'a [u8]) -> Result<Self> {
        Self::from_cow(width, height, Cow::Borrowed(data))
    }

    fn from_cow(width: u32, height: u32, data: Cow<'a, [u8]>) -> Result<Self> {
        let expected = rgb_len(width, height)?;
        if data.len() != expected {
            return Err(Error::UnreadablePixelData {
                expected,
                actual: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Image width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// The pixel at `(x, y)`.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> [u8; 3] {
        let i = (y * self.width as usize + x) * 3;
        [self.data[i], self.data[i + 1], self.data[i + 2]]
    }

    /// Interleaved RGB bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Whether the bytes are borrowed from the caller.
    pub fn is_borrowed(&self) -> bool {
        matches!(self.data, Cow::Borrowed(_))
    }

    /// Take back the interleaved RGB bytes, copying them if borrowed.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data.into_owned()
    }
}

impl PixelSource for RasterImage<'_> {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn rgb_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// Byte length of a `width` x `height` RGB raster.
pub(crate) fn rgb_len(width: u32, height: u32) -> Result<usize> {
    (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(Error::InvalidDimensions { width, height })
}

/// One plane of a YCbCr image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    kind: ComponentType,
    width: usize,
    height: usize,
    samples: Vec<u8>,
}

impl Component {
    /// Wrap row-major samples.
    pub fn new(kind: ComponentType, width: usize, height: usize, samples: Vec<u8>) -> Result<Self> {
        if samples.len() != width * height {
            return Err(Error::UnreadablePixelData {
                expected: width * height,
                actual: samples.len(),
            });
        }
        Ok(Self {
            kind,
            width,
            height,
            samples,
        })
    }

    /// Which plane this is.
    pub fn kind(&self) -> ComponentType {
        self.kind
    }

    /// Plane width in samples.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Plane height in samples.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Sample at `(x, y)`.
    #[inline]
    pub fn sample(&self, x: usize, y: usize) -> u8 {
        self.samples[y * self.width + x]
    }

    /// Row `y` of the plane.
    #[inline]
    pub fn row(&self, y: usize) -> &[u8] {
        &self.samples[y * self.width..(y + 1) * self.width]
    }

    /// All samples, row-major.
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }
}

/// Y, Cb and Cr planes with the ratio that relates their sizes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanarImage {
    components: [Component; NUM_COMPONENTS],
    subsampling: Subsampling,
}

impl PlanarImage {
    /// Assemble planes, checking that the chroma planes have the size the
    /// ratio derives from the luma plane.
    pub fn new(y: Component, cb: Component, cr: Component, subsampling: Subsampling) -> Result<Self> {
        let (dh, dv) = subsampling.chroma_divisors();
        let (width, height) = (y.width(), y.height());
        if width % dh != 0 || height % dv != 0 {
            return Err(Error::UnsupportedDimensions {
                width,
                height,
                alignment: dh.max(dv),
            });
        }
        for chroma in [&cb, &cr] {
            if chroma.width() != width / dh || chroma.height() != height / dv {
                return Err(Error::UnsupportedDimensions {
                    width: chroma.width(),
                    height: chroma.height(),
                    alignment: dh.max(dv),
                });
            }
        }
        if y.kind() != ComponentType::Y
            || cb.kind() != ComponentType::Cb
            || cr.kind() != ComponentType::Cr
        {
            return Err(Error::InternalError("planes out of Y, Cb, Cr order"));
        }
        Ok(Self {
            components: [y, cb, cr],
            subsampling,
        })
    }

    /// Chroma ratio of this image.
    pub fn subsampling(&self) -> Subsampling {
        self.subsampling
    }

    /// Luma width.
    pub fn width(&self) -> usize {
        self.components[0].width()
    }

    /// Luma height.
    pub fn height(&self) -> usize {
        self.components[0].height()
    }

    /// Plane for `kind`.
    pub fn component(&self, kind: ComponentType) -> &Component {
        &self.components[kind.index()]
    }

    /// All planes in Y, Cb, Cr order.
    pub fn components(&self) -> &[Component; NUM_COMPONENTS] {
        &self.components
    }

    /// Split back into planes.
    pub fn into_components(self) -> [Component; NUM_COMPONENTS] {
        self.components
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_length_checked() {
        assert!(RasterImage::new(2, 2, vec![0; 12]).is_ok());
        assert_eq!(
            RasterImage::new(2, 2, vec![0; 11]),
            Err(Error::UnreadablePixelData {
                expected: 12,
                actual: 11
            })
        );
    }

    #[test]
    fn test_from_slice_borrows() {
        let data = [7u8; 2 * 3 * 3];
        let img = RasterImage::from_slice(2, 3, &data).unwrap();
        assert!(img.is_borrowed());
        assert_eq!(img.as_bytes().as_ptr(), data.as_ptr());
        assert_eq!(img.pixel(1, 2), [7, 7, 7]);
        assert_eq!(
            RasterImage::from_slice(2, 3, &data[1..]),
            Err(Error::UnreadablePixelData {
                expected: 18,
                actual: 17
            })
        );
        assert!(!RasterImage::new(1, 1, vec![0; 3]).unwrap().is_borrowed());
    }

    #[test]
    fn test_from_packed_argb_drops_alpha() {
        let img = RasterImage::from_packed_argb(2, 1, &[0xFF112233, 0x00445566]).unwrap();
        assert_eq!(img.as_bytes(), &[0x11, 0x22, 0x33, 0x44, 0x55, 0x66]);
        assert_eq!(img.pixel(1, 0), [0x44, 0x55, 0x66]);
    }

    #[test]
    fn test_from_rgb8() {
        let pixels = [RGB8::new(1, 2, 3), RGB8::new(4, 5, 6)];
        let img = RasterImage::from_rgb8(1, 2, &pixels).unwrap();
        assert_eq!(img.dimensions(), (1, 2));
        assert_eq!(img.pixel(0, 1), [4, 5, 6]);
    }

    #[test]
    fn test_planar_validates_chroma_size() {
        let y = Component::new(ComponentType::Y, 16, 16, vec![0; 256]).unwrap();
        let cb = Component::new(ComponentType::Cb, 8, 16, vec![0; 128]).unwrap();
        let cr = Component::new(ComponentType::Cr, 8, 16, vec![0; 128]).unwrap();

        assert!(PlanarImage::new(y.clone(), cb.clone(), cr.clone(), Subsampling::S422).is_ok());
        assert!(matches!(
            PlanarImage::new(y, cb, cr, Subsampling::S420),
            Err(Error::UnsupportedDimensions { .. })
        ));
    }

    #[test]
    fn test_component_rows() {
        let c = Component::new(ComponentType::Cr, 3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(c.row(1), &[4, 5, 6]);
        assert_eq!(c.sample(2, 0), 3);
        assert!(Component::new(ComponentType::Cr, 3, 2, vec![0; 5]).is_err());
    }
}
