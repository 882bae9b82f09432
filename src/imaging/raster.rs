//! In-memory RGBA8 raster.
//!
//! A [`RasterImage`] is plain data: dimensions plus a row-major buffer of
//! `width * height * 4` bytes. Every pipeline stage takes one by reference and
//! returns a new one; nothing mutates its input.

use super::error::ResizeError;

/// Bytes per pixel (R, G, B, A).
pub const CHANNELS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RasterImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl RasterImage {
    /// Wrap an RGBA8 buffer.
    ///
    /// Zero dimensions are accepted here (an undecoded source reports 0x0);
    /// the pipeline rejects them in [`RasterImage::validate`]. A buffer whose
    /// length does not match the dimensions is rejected immediately.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, ResizeError> {
        let expected = width as usize * height as usize * CHANNELS;
        if pixels.len() != expected {
            return Err(ResizeError::InvalidImage(format!(
                "unrecognized pixel format: {width}x{height} RGBA8 needs {expected} bytes, got {}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// A raster filled with one color.
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * CHANNELS)
            .collect();
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Build a raster by evaluating `f(x, y)` for every pixel.
    pub fn from_fn(width: u32, height: u32, mut f: impl FnMut(u32, u32) -> [u8; 4]) -> Self {
        let mut pixels = Vec::with_capacity(width as usize * height as usize * CHANNELS);
        for y in 0..height {
            for x in 0..width {
                pixels.extend_from_slice(&f(x, y));
            }
        }
        Self {
            width,
            height,
            pixels,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn into_pixels(self) -> Vec<u8> {
        self.pixels
    }

    /// Byte offset of pixel `(x, y)`.
    #[inline]
    pub(crate) fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * CHANNELS
    }

    /// The four channels of pixel `(x, y)`.
    ///
    /// # Panics
    /// When `(x, y)` lies outside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        let i = self.offset(x, y);
        [
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ]
    }

    /// Check the raster can enter the pipeline: both dimensions nonzero.
    pub fn validate(&self) -> Result<(), ResizeError> {
        check_dimensions(self.width, self.height)
    }

    /// Copy the `size x size` square whose top-left corner is `(x0, y0)`.
    ///
    /// Straight pixel copy, no resampling. The caller guarantees the window
    /// fits inside the raster.
    pub(crate) fn square_window(&self, x0: u32, y0: u32, size: u32) -> Self {
        let row_bytes = size as usize * CHANNELS;
        let mut pixels = Vec::with_capacity(row_bytes * size as usize);
        for y in y0..y0 + size {
            let start = self.offset(x0, y);
            pixels.extend_from_slice(&self.pixels[start..start + row_bytes]);
        }
        Self {
            width: size,
            height: size,
            pixels,
        }
    }
}

/// Both dimensions nonzero, else [`ResizeError::InvalidImage`].
pub(crate) fn check_dimensions(width: u32, height: u32) -> Result<(), ResizeError> {
    if width == 0 || height == 0 {
        return Err(ResizeError::InvalidImage(format!(
            "source is not a valid image: {width}x{height} has no decoded pixels"
        )));
    }
    Ok(())
}

impl From<image::RgbaImage> for RasterImage {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            pixels: img.into_raw(),
        }
    }
}

impl From<RasterImage> for image::RgbaImage {
    fn from(raster: RasterImage) -> Self {
        image::RgbaImage::from_raw(raster.width, raster.height, raster.pixels)
            .expect("RasterImage buffer length is checked on construction")
    }
}
