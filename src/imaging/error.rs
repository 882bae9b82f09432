//! Errors raised by the resampling core.
//!
//! Both kinds are terminal for the call that raised them: the pipeline never
//! returns partial output and never retries.
//!
//! [`ResizeError::Config`] is about one call: no fit target, no thumbnail
//! size, or a bad scale factor for a given image. Problems with the settings
//! themselves (unreadable file, bad TOML, quality out of range) are
//! [`ConfigError`](crate::config::ConfigError) and surface before any image
//! is touched.

use super::backend::BackendError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResizeError {
    /// Nothing to fit to, no thumbnail size, or an out-of-range scale factor.
    #[error("Resize parameters error: {0}")]
    Config(String),
    /// Zero dimensions, a malformed pixel buffer, or a non-image MIME type.
    #[error("Invalid image: {0}")]
    InvalidImage(String),
}

impl ResizeError {
    /// Prefix the message with the identifier of the offending source.
    pub fn for_source(self, name: &str) -> Self {
        match self {
            Self::Config(msg) => Self::Config(format!("{name}: {msg}")),
            Self::InvalidImage(msg) => Self::InvalidImage(format!("{name}: {msg}")),
        }
    }
}

/// Failure of a resize-then-encode call: either the core or the encoder.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Resize(#[from] ResizeError),
    #[error(transparent)]
    Backend(#[from] BackendError),
}
