//! High-level image operations.
//!
//! These functions combine calculations with the pixel kernels. The fit path
//! runs `Validate → SelectFit → ProgressiveHalve* → FinalResample`; the
//! thumbnail path crops to a centered square and makes one bilinear pass.
//! Every call is synchronous and owns its buffers, so independent images can
//! be processed concurrently by the caller.

use super::backend::{Encoder, SourceImage, is_image_type};
use super::bilinear::{interpolate, resample};
use super::calculations::{halving_steps, resolve_fit, scaled_dimension, square_crop};
use super::error::{PipelineError, ResizeError};
use super::halve::halve;
use super::params::FitPlan;
use super::raster::{RasterImage, check_dimensions};
use crate::config::ScaleConfig;
use tracing::debug;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, ResizeError>;

/// Plan a fit without touching pixels.
///
/// Useful for reporting and for testing dimension logic in isolation.
pub fn plan_fit(width: u32, height: u32, config: &ScaleConfig) -> Result<FitPlan> {
    check_dimensions(width, height)?;
    let fit = resolve_fit(config, width, height)?;
    let target = fit.snap_target();

    let (halvings, halved) = halving_steps((width, height), fit.snap, target);

    let scale = f64::from(target) / f64::from(fit.snap.of(halved));
    let (final_scale, output) = if scale < 1.0 {
        (
            Some(scale),
            (
                scaled_dimension(halved.0, scale),
                scaled_dimension(halved.1, scale),
            ),
        )
    } else {
        // Never upscale.
        (None, halved)
    };

    Ok(FitPlan {
        fit,
        source: (width, height),
        halvings,
        halved,
        final_scale,
        output,
    })
}

/// Scale an image to fit the configured bounds.
///
/// Halves while the snap axis is at least twice its target, then makes one
/// bilinear pass down to the target. When the target is not smaller than the
/// (halved) image, that image is returned as is.
pub fn scale_to_fit(image: &RasterImage, config: &ScaleConfig) -> Result<RasterImage> {
    image.validate()?;
    let plan = plan_fit(image.width(), image.height(), config)?;
    debug!(
        source = ?plan.source,
        mode = ?plan.fit.mode,
        snap = ?plan.fit.snap,
        target = plan.fit.snap_target(),
        "fit selected"
    );

    let mut halved: Option<RasterImage> = None;
    for step in 1..=plan.halvings {
        let next = halve(halved.as_ref().unwrap_or(image))?;
        debug!(step, dimensions = ?next.dimensions(), "halved");
        halved = Some(next);
    }

    let result = match plan.final_scale {
        Some(scale) => {
            let current = halved.as_ref().unwrap_or(image);
            let out = resample(current, scale)?;
            debug!(scale, dimensions = ?out.dimensions(), "resampled");
            out
        }
        None => {
            debug!("final resample skipped, target is not smaller than source");
            halved.unwrap_or_else(|| image.clone())
        }
    };

    debug_assert_eq!(result.dimensions(), plan.output);
    Ok(result)
}

/// Center-crop to a square and resample it to `thumb_size x thumb_size`.
///
/// The crop is a straight pixel copy; the single bilinear pass that follows
/// reaches the exact size whatever the source aspect ratio. No halving is
/// applied on this path.
pub fn crop_to_square_and_scale(image: &RasterImage, thumb_size: u32) -> Result<RasterImage> {
    if thumb_size == 0 {
        return Err(ResizeError::Config(
            "no thumbnail size defined: thumbSize must be greater than 0".to_string(),
        ));
    }
    image.validate()?;

    let (width, height) = image.dimensions();
    let (offset_x, offset_y, size) = square_crop(width, height);
    let cropped;
    let square = if width == height {
        image
    } else {
        cropped = image.square_window(offset_x, offset_y, size);
        &cropped
    };

    let scale = f64::from(thumb_size) / f64::from(size);
    debug!(
        crop = size,
        offset = ?(offset_x, offset_y),
        thumb_size,
        scale,
        "thumbnail"
    );
    Ok(interpolate(square, thumb_size, thumb_size, scale))
}

/// Make a square thumbnail using `config.thumb_size`.
pub fn make_thumbnail(image: &RasterImage, config: &ScaleConfig) -> Result<RasterImage> {
    crop_to_square_and_scale(image, config.thumb_size)
}

fn check_source(source: &SourceImage) -> Result<()> {
    if !is_image_type(&source.mime) {
        return Err(ResizeError::InvalidImage(format!(
            "{}: unrecognized MIME type '{}', expected image/*",
            source.name, source.mime
        )));
    }
    Ok(())
}

/// [`scale_to_fit`] for a loaded source; errors name the source.
pub fn fit_source(source: &SourceImage, config: &ScaleConfig) -> Result<RasterImage> {
    check_source(source)?;
    scale_to_fit(&source.raster, config).map_err(|e| e.for_source(&source.name))
}

/// [`make_thumbnail`] for a loaded source; errors name the source.
pub fn thumbnail_source(source: &SourceImage, config: &ScaleConfig) -> Result<RasterImage> {
    check_source(source)?;
    make_thumbnail(&source.raster, config).map_err(|e| e.for_source(&source.name))
}

/// An encoded output payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    pub mime: String,
    pub width: u32,
    pub height: u32,
    pub bytes: Vec<u8>,
}

impl EncodedImage {
    /// The payload as a `data:` URI.
    pub fn to_data_uri(&self) -> String {
        super::rust_backend::to_data_uri(&self.mime, &self.bytes)
    }
}

fn encode(
    encoder: &impl Encoder,
    image: RasterImage,
    mime: &str,
    config: &ScaleConfig,
) -> std::result::Result<EncodedImage, PipelineError> {
    let bytes = encoder.encode(&image, mime, config.quality)?;
    Ok(EncodedImage {
        mime: mime.to_string(),
        width: image.width(),
        height: image.height(),
        bytes,
    })
}

/// Fit a source and encode the result as `mime` with the configured quality.
pub fn encode_fit(
    encoder: &impl Encoder,
    source: &SourceImage,
    mime: &str,
    config: &ScaleConfig,
) -> std::result::Result<EncodedImage, PipelineError> {
    let image = fit_source(source, config)?;
    encode(encoder, image, mime, config)
}

/// Thumbnail a source and encode the result as `mime` with the configured quality.
pub fn encode_thumbnail(
    encoder: &impl Encoder,
    source: &SourceImage,
    mime: &str,
    config: &ScaleConfig,
) -> std::result::Result<EncodedImage, PipelineError> {
    let image = thumbnail_source(source, config)?;
    encode(encoder, image, mime, config)
}
