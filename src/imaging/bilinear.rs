//! Four-tap bilinear resampling.
//!
//! Golden-image comparisons downstream depend on the exact arithmetic here:
//! source coordinate `j / scale`, taps at `floor` and `min(ceil, last)`, the
//! weighted blend below, then clamp and round half-up per channel. Channels
//! are blended independently; alpha is not premultiplied.

use super::calculations::scaled_dimension;
use super::error::ResizeError;
use super::raster::{CHANNELS, RasterImage};

/// Resample by `scale`, where `0 < scale <= 1`.
///
/// Output is `round(w * scale) x round(h * scale)` (half-up, minimum 1).
/// `scale == 1` returns a copy bit-identical to the input.
pub fn resample(image: &RasterImage, scale: f64) -> Result<RasterImage, ResizeError> {
    if !scale.is_finite() || scale <= 0.0 || scale > 1.0 {
        return Err(ResizeError::Config(format!(
            "resample scale must be in (0, 1], got {scale}"
        )));
    }
    image.validate()?;
    if scale == 1.0 {
        return Ok(image.clone());
    }
    let out_w = scaled_dimension(image.width(), scale);
    let out_h = scaled_dimension(image.height(), scale);
    Ok(interpolate(image, out_w, out_h, scale))
}

#[inline]
fn blend(f00: u8, f10: u8, f01: u8, f11: u8, dx: f64, dy: f64) -> u8 {
    let un_x = 1.0 - dx;
    let un_y = 1.0 - dy;
    let value = f64::from(f00) * un_x * un_y
        + f64::from(f10) * dx * un_y
        + f64::from(f01) * un_x * dy
        + f64::from(f11) * dx * dy;
    value.clamp(0.0, 255.0).round() as u8
}

/// Source taps and fractional offset for one output coordinate.
#[inline]
fn taps(out_coord: u32, scale: f64, src_len: u32) -> (u32, u32, f64) {
    let last = src_len - 1;
    let v = f64::from(out_coord) / scale;
    let i0 = (v.floor() as u32).min(last);
    let i1 = (v.ceil() as u32).min(last);
    (i0, i1, v - f64::from(i0))
}

/// Bilinear kernel with explicit output dimensions.
///
/// Accepts any positive scale; the thumbnail path uses it to reach an exact
/// size, including enlargement of sources smaller than the thumbnail.
pub(crate) fn interpolate(image: &RasterImage, out_w: u32, out_h: u32, scale: f64) -> RasterImage {
    let (src_w, src_h) = image.dimensions();
    let src = image.pixels();

    let columns: Vec<(u32, u32, f64)> = (0..out_w).map(|j| taps(j, scale, src_w)).collect();

    let mut out = vec![0u8; out_w as usize * out_h as usize * CHANNELS];
    for i in 0..out_h {
        let (iy0, iy1, dy) = taps(i, scale, src_h);
        for (j, &(ix0, ix1, dx)) in columns.iter().enumerate() {
            let s00 = image.offset(ix0, iy0);
            let s10 = image.offset(ix1, iy0);
            let s01 = image.offset(ix0, iy1);
            let s11 = image.offset(ix1, iy1);
            let d = (i as usize * out_w as usize + j) * CHANNELS;
            for c in 0..CHANNELS {
                out[d + c] = blend(src[s00 + c], src[s10 + c], src[s01 + c], src[s11 + c], dx, dy);
            }
        }
    }

    RasterImage::new(out_w, out_h, out).expect("interpolated buffer matches output dimensions")
}
