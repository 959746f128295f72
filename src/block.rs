//! Block and MCU decomposition.
//!
//! A padded, subsampled image is cut into minimum coded units (MCUs) in
//! raster order. Each MCU holds one region per component, in Y, Cb, Cr
//! order, and each region holds that component's 8x8 blocks in the order
//! the frame header's sampling factors describe: left to right, then top
//! to bottom.
//!
//! | Ratio | MCU size | Y blocks | Cb blocks | Cr blocks |
//! |-------|----------|----------|-----------|-----------|
//! | 4:4:4 | 8x8      | 1        | 1         | 1         |
//! | 4:2:2 | 16x16    | 4        | 2         | 2         |
//! | 4:2:0 | 16x16    | 4        | 1         | 1         |
//!
//! For 4:2:2 the chroma area of an MCU is 8 wide and 16 tall, so its two
//! blocks are the upper and lower halves; each covers a full row of luma
//! blocks.

use crate::consts::{DCTSIZE, DCTSIZE2, NUM_COMPONENTS};
use crate::error::{Error, Result};
use crate::image::{Component, PlanarImage};
use crate::types::{ComponentType, Subsampling};

/// 64 samples of one component, row-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Block(pub [u8; DCTSIZE2]);

impl Block {
    /// Build a block from exactly 64 samples.
    pub fn from_slice(samples: &[u8]) -> Result<Self> {
        <[u8; DCTSIZE2]>::try_from(samples)
            .map(Block)
            .map_err(|_| Error::InvalidBlockSize { len: samples.len() })
    }

    /// The samples, row-major.
    pub fn samples(&self) -> &[u8; DCTSIZE2] {
        &self.0
    }
}

impl TryFrom<&[u8]> for Block {
    type Error = Error;

    fn try_from(samples: &[u8]) -> Result<Self> {
        Block::from_slice(samples)
    }
}

/// The blocks of one component inside one MCU.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region {
    /// Component the blocks belong to
    pub component: ComponentType,
    /// Blocks in encoding order
    pub blocks: Vec<Block>,
}

/// One MCU: a Y, a Cb and a Cr region, in that order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MinimumCodedUnit {
    regions: [Region; NUM_COMPONENTS],
}

impl MinimumCodedUnit {
    /// Regions in Y, Cb, Cr order.
    pub fn regions(&self) -> &[Region; NUM_COMPONENTS] {
        &self.regions
    }

    /// Region of a given component.
    pub fn region(&self, component: ComponentType) -> &Region {
        &self.regions[component.index()]
    }
}

/// Number of MCUs a `width` x `height` image decomposes into after padding.
pub fn mcu_count(width: usize, height: usize, ratio: Subsampling) -> usize {
    let mcu = ratio.alignment();
    width.div_ceil(mcu) * height.div_ceil(mcu)
}

/// Copy the 8x8 block whose top-left sample is `(x0, y0)`.
fn extract_block(plane: &Component, x0: usize, y0: usize) -> Block {
    let mut block = [0u8; DCTSIZE2];
    for (row, dst) in block.chunks_exact_mut(DCTSIZE).enumerate() {
        dst.copy_from_slice(&plane.row(y0 + row)[x0..x0 + DCTSIZE]);
    }
    Block(block)
}

/// Cut one component's area of MCU `(mcu_x, mcu_y)` into blocks.
fn extract_region(plane: &Component, factors: (u8, u8), mcu_x: usize, mcu_y: usize) -> Region {
    let (h, v) = (factors.0 as usize, factors.1 as usize);
    let x0 = mcu_x * h * DCTSIZE;
    let y0 = mcu_y * v * DCTSIZE;
    let mut blocks = Vec::with_capacity(h * v);
    for by in 0..v {
        for bx in 0..h {
            blocks.push(extract_block(plane, x0 + bx * DCTSIZE, y0 + by * DCTSIZE));
        }
    }
    Region {
        component: plane.kind(),
        blocks,
    }
}

/// Decompose an image into MCUs in raster order.
///
/// Luma dimensions must be multiples of the MCU size (8 for 4:4:4, 16
/// otherwise).
pub fn decompose(image: &PlanarImage) -> Result<Vec<MinimumCodedUnit>> {
    Ok(iter_mcus(image)?.collect())
}

/// Lazily cut an image into MCUs in raster order.
///
/// Same order and alignment rules as [`decompose`], but each MCU is only
/// extracted when the iterator reaches it.
pub fn iter_mcus(
    image: &PlanarImage,
) -> Result<impl ExactSizeIterator<Item = MinimumCodedUnit> + '_> {
    let ratio = image.subsampling();
    let mcu_size = ratio.alignment();
    let (width, height) = (image.width(), image.height());
    if width % mcu_size != 0 || height % mcu_size != 0 {
        return Err(Error::UnsupportedDimensions {
            width,
            height,
            alignment: mcu_size,
        });
    }

    let mcus_x = width / mcu_size;
    let [y, cb, cr] = image.components();
    let luma = ratio.luma_factors();
    let chroma = ratio.chroma_factors();

    Ok((0..mcus_x * (height / mcu_size)).map(move |i| {
        let (mcu_x, mcu_y) = (i % mcus_x, i / mcus_x);
        MinimumCodedUnit {
            regions: [
                extract_region(y, luma, mcu_x, mcu_y),
                extract_region(cb, chroma, mcu_x, mcu_y),
                extract_region(cr, chroma, mcu_x, mcu_y),
            ],
        }
    }))
}
