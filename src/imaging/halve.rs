//! 2:1 box reduction.
//!
//! Bilinear interpolation only ever looks at four source pixels, so a large
//! reduction in one pass skips most of the source and aliases. Halving first
//! (mipmap style) averages every pixel into the result; the final bilinear
//! pass then only covers a factor below 2.

use super::calculations::halved_dimensions;
use super::error::ResizeError;
use super::raster::{CHANNELS, RasterImage};

/// Halve both dimensions (floor, minimum 1) by area averaging.
///
/// Output pixel `(x, y)` is the per-channel mean of the source block
/// `[2x, min(2x+2, w)) x [2y, min(2y+2, h))`, alpha included, rounded half-up.
/// On an odd dimension the trailing row or column is dropped; a dimension of 1
/// stays 1 and its blocks shrink to one pixel on that axis.
///
/// A raster with a zero dimension is rejected with
/// [`ResizeError::InvalidImage`].
pub fn halve(image: &RasterImage) -> Result<RasterImage, ResizeError> {
    image.validate()?;
    let (src_w, src_h) = image.dimensions();
    let (dst_w, dst_h) = halved_dimensions((src_w, src_h));
    let src = image.pixels();

    let mut out = Vec::with_capacity(dst_w as usize * dst_h as usize * CHANNELS);
    for y in 0..dst_h {
        let y0 = y * 2;
        let y1 = (y0 + 2).min(src_h);
        for x in 0..dst_w {
            let x0 = x * 2;
            let x1 = (x0 + 2).min(src_w);

            let mut sum = [0u32; CHANNELS];
            for sy in y0..y1 {
                for sx in x0..x1 {
                    let i = image.offset(sx, sy);
                    for (c, acc) in sum.iter_mut().enumerate() {
                        *acc += u32::from(src[i + c]);
                    }
                }
            }

            let count = (x1 - x0) * (y1 - y0);
            for acc in sum {
                out.push(((acc + count / 2) / count) as u8);
            }
        }
    }

    RasterImage::new(dst_w, dst_h, out)
}
