//! Collaborator traits at the edges of the pipeline.
//!
//! The resampling core only ever sees decoded [`RasterImage`]s. Getting pixels
//! in and bytes out is delegated to two traits:
//!
//! - [`ImageSource`] — produce a fully decoded [`SourceImage`] plus its MIME type
//! - [`Encoder`] — turn a raster into a compressed payload for a MIME type
//!
//! The production implementation of both is
//! [`RustBackend`](super::rust_backend::RustBackend). Tests use the recording
//! mocks in this module's test submodule.

use super::params::Quality;
use super::raster::RasterImage;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode {name}: {reason}")]
    Decode { name: String, reason: String },
    #[error("Encoding failed: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// A decoded source together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceImage {
    /// Identifier used in error messages and output naming (usually the path).
    pub name: String,
    /// Reported MIME type, e.g. `image/png`.
    pub mime: String,
    pub raster: RasterImage,
}

/// True when `mime` names an image type (`image/<subtype>`).
pub fn is_image_type(mime: &str) -> bool {
    mime.starts_with("image/")
}

/// Supplies decoded rasters.
///
/// Implementations must only return once pixel data is fully available; the
/// pipeline never waits on a source.
pub trait ImageSource: Sync {
    fn load(&self, path: &Path) -> Result<SourceImage, BackendError>;
}

/// Encodes a raster for a MIME type.
pub trait Encoder: Sync {
    fn encode(
        &self,
        image: &RasterImage,
        mime: &str,
        quality: Quality,
    ) -> Result<Vec<u8>, BackendError>;
}
