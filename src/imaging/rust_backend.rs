//! Pure Rust collaborator backend built on the `image` crate.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` with content sniffing |
//! | MIME type | `image::ImageFormat::to_mime_type` |
//! | Encode → JPEG | `image::codecs::jpeg::JpegEncoder` (quality 1-100, alpha dropped) |
//! | Encode → PNG | `image::codecs::png::PngEncoder` |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder` (lossless) |
//! | Data URI | `base64` standard alphabet |
//!
//! Resampling never goes through `image::imageops`; the crate's own kernels do
//! all pixel work between decode and encode.

use super::backend::{BackendError, Encoder, ImageSource, SourceImage};
use super::params::Quality;
use super::raster::RasterImage;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::{ExtendedColorType, ImageEncoder, ImageFormat, ImageReader};
use std::path::Path;
use std::sync::LazyLock;

/// Input extensions mapped to the decoders compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// MIME types [`RustBackend`] can encode, with their file extensions.
pub const OUTPUT_FORMATS: &[(&str, &str)] = &[
    ("image/jpeg", "jpg"),
    ("image/png", "png"),
    ("image/webp", "webp"),
];

/// File extension for an encodable MIME type.
pub fn extension_for_mime(mime: &str) -> Option<&'static str> {
    OUTPUT_FORMATS
        .iter()
        .find(|(m, _)| *m == mime)
        .map(|(_, ext)| *ext)
}

/// Wrap an encoded payload as a `data:` URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Backend using the `image` crate for decode and encode.
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_error(path: &Path, reason: impl ToString) -> BackendError {
    BackendError::Decode {
        name: path.display().to_string(),
        reason: reason.to_string(),
    }
}

fn encode_error(mime: &str, e: image::ImageError) -> BackendError {
    BackendError::Encode(format!("{mime}: {e}"))
}

/// RGB bytes with alpha dropped, for encoders without an alpha channel.
fn rgb_bytes(image: &RasterImage) -> Vec<u8> {
    image
        .pixels()
        .chunks_exact(4)
        .flat_map(|px| [px[0], px[1], px[2]])
        .collect()
}

impl ImageSource for RustBackend {
    fn load(&self, path: &Path) -> Result<SourceImage, BackendError> {
        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let format = reader
            .format()
            .ok_or_else(|| decode_error(path, "unrecognized image format"))?;
        let decoded = reader.decode().map_err(|e| decode_error(path, e))?;

        Ok(SourceImage {
            name: path.display().to_string(),
            mime: format.to_mime_type().to_string(),
            raster: decoded.to_rgba8().into(),
        })
    }
}

impl Encoder for RustBackend {
    fn encode(
        &self,
        image: &RasterImage,
        mime: &str,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError> {
        let (width, height) = image.dimensions();
        let mut out = Vec::new();
        match mime {
            "image/jpeg" => JpegEncoder::new_with_quality(&mut out, quality.percent())
                .write_image(&rgb_bytes(image), width, height, ExtendedColorType::Rgb8)
                .map_err(|e| encode_error(mime, e))?,
            "image/png" => PngEncoder::new(&mut out)
                .write_image(image.pixels(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| encode_error(mime, e))?,
            "image/webp" => WebPEncoder::new_lossless(&mut out)
                .write_image(image.pixels(), width, height, ExtendedColorType::Rgba8)
                .map_err(|e| encode_error(mime, e))?,
            other => return Err(BackendError::UnsupportedFormat(other.to_string())),
        }
        Ok(out)
    }
}
