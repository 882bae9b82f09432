//! Batch processing of image files.
//!
//! Takes a list of input paths and runs one job per image: decode, fit or
//! thumbnail, encode, then write the payload next to the others in the output
//! directory (or keep it as a `data:` URI).
//!
//! ## Output Structure
//!
//! ```text
//! resized/
//! ├── manifest.json          # Every output and every failure
//! ├── dawn-fit.jpg           # `fit` job
//! └── dawn-thumb.jpg         # `thumb` job
//! ```
//!
//! ## Parallel Processing
//!
//! Images are processed in parallel using [rayon](https://docs.rs/rayon), one
//! task per image. The resampling core is synchronous and owns its buffers, so
//! jobs share nothing. A failure is recorded for that image and the rest of the
//! batch carries on.

use crate::config::{ConfigError, ScaleConfig};
use crate::imaging::rust_backend::extension_for_mime;
use crate::imaging::{
    BackendError, EncodedImage, Encoder, ImageSource, PipelineError, ResizeError, RustBackend,
    encode_fit, encode_thumbnail,
};
use rayon::prelude::*;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),
    #[error("Image backend failed: {0}")]
    Backend(#[from] BackendError),
    #[error("{0}")]
    Resize(#[from] ResizeError),
    #[error("Source image not found: {0}")]
    SourceNotFound(PathBuf),
}

impl From<PipelineError> for ProcessError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::Resize(e) => Self::Resize(e),
            PipelineError::Backend(e) => Self::Backend(e),
        }
    }
}

/// What to produce for each input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Job {
    /// Scale to fit the configured bounds.
    Fit,
    /// Square thumbnail of `thumb_size`.
    Thumbnail,
}

impl Job {
    /// Filename suffix for this job's outputs.
    pub fn suffix(self) -> &'static str {
        match self {
            Job::Fit => "fit",
            Job::Thumbnail => "thumb",
        }
    }
}

/// Where encoded payloads go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
    /// Write `<stem>-<suffix>.<ext>` files into this directory.
    Directory(PathBuf),
    /// Keep payloads in memory as `data:` URIs.
    DataUri,
}

/// Configuration for a batch run.
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    pub job: Job,
    pub scale: ScaleConfig,
    /// Output MIME type, e.g. `image/jpeg`.
    pub mime: String,
    pub destination: Destination,
}

/// One successfully processed input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedImage {
    pub source: String,
    /// Source dimensions (width, height)
    pub source_dimensions: (u32, u32),
    /// Output dimensions (width, height)
    pub dimensions: (u32, u32),
    pub mime: String,
    /// Encoded payload size in bytes.
    pub bytes: usize,
    /// Written file, for [`Destination::Directory`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Payload as a data URI, for [`Destination::DataUri`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_uri: Option<String>,
}

/// One input that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedImage {
    pub source: String,
    pub error: String,
}

/// Progress reported while a batch runs.
#[derive(Debug, Clone)]
pub enum ProcessEvent {
    Finished(ProcessedImage),
    Failed(FailedImage),
}

/// Summary of a batch run, written as `manifest.json`.
#[derive(Debug, Clone, Serialize)]
pub struct Manifest {
    pub job: Job,
    pub mime: String,
    pub outputs: Vec<ProcessedImage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<FailedImage>,
}

/// Output filename for a source path: `<stem>-<suffix>.<ext>`.
pub fn output_filename(source: &Path, job: Job, extension: &str) -> String {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy())
        .unwrap_or_else(|| "image".into());
    format!("{}-{}.{}", stem, job.suffix(), extension)
}

pub fn process(
    inputs: &[PathBuf],
    config: &ProcessConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<Manifest, ProcessError> {
    let backend = RustBackend::new();
    process_with_backend(&backend, inputs, config, events)
}

/// Process images using a specific backend (allows testing with mock).
///
/// Fails up front only for batch-wide problems (invalid config, unsupported
/// output format, unwritable output directory); per-image failures land in
/// [`Manifest::failures`].
pub fn process_with_backend<B: ImageSource + Encoder>(
    backend: &B,
    inputs: &[PathBuf],
    config: &ProcessConfig,
    events: Option<Sender<ProcessEvent>>,
) -> Result<Manifest, ProcessError> {
    config.scale.validate()?;
    let extension = extension_for_mime(&config.mime)
        .ok_or_else(|| BackendError::UnsupportedFormat(config.mime.clone()))?;

    if let Destination::Directory(dir) = &config.destination {
        std::fs::create_dir_all(dir)?;
    }

    let results: Vec<Result<ProcessedImage, FailedImage>> = inputs
        .par_iter()
        .map(|path| {
            let result = process_one(backend, path, extension, config).map_err(|e| {
                warn!(source = %path.display(), error = %e, "image failed");
                FailedImage {
                    source: path.display().to_string(),
                    error: e.to_string(),
                }
            });
            if let Some(tx) = &events {
                let event = match &result {
                    Ok(done) => ProcessEvent::Finished(done.clone()),
                    Err(failed) => ProcessEvent::Failed(failed.clone()),
                };
                tx.send(event).ok();
            }
            result
        })
        .collect();

    let mut outputs = Vec::new();
    let mut failures = Vec::new();
    for result in results {
        match result {
            Ok(done) => outputs.push(done),
            Err(failed) => failures.push(failed),
        }
    }

    Ok(Manifest {
        job: config.job,
        mime: config.mime.clone(),
        outputs,
        failures,
    })
}

fn process_one<B: ImageSource + Encoder>(
    backend: &B,
    path: &Path,
    extension: &str,
    config: &ProcessConfig,
) -> Result<ProcessedImage, ProcessError> {
    if !path.exists() {
        return Err(ProcessError::SourceNotFound(path.to_path_buf()));
    }

    let source = backend.load(path)?;
    let source_dimensions = source.raster.dimensions();
    debug!(source = %source.name, mime = %source.mime, dimensions = ?source_dimensions, "decoded");

    let encoded: EncodedImage = match config.job {
        Job::Fit => encode_fit(backend, &source, &config.mime, &config.scale)?,
        Job::Thumbnail => encode_thumbnail(backend, &source, &config.mime, &config.scale)?,
    };

    let (output, data_uri) = match &config.destination {
        Destination::Directory(dir) => {
            let out_path = dir.join(output_filename(path, config.job, extension));
            std::fs::write(&out_path, &encoded.bytes)?;
            (Some(out_path.display().to_string()), None)
        }
        Destination::DataUri => (None, Some(encoded.to_data_uri())),
    };

    Ok(ProcessedImage {
        source: source.name,
        source_dimensions,
        dimensions: (encoded.width, encoded.height),
        mime: encoded.mime,
        bytes: encoded.bytes.len(),
        output,
        data_uri,
    })
}
