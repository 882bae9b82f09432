//! Image resampling — pure Rust, no native dependencies.
//!
//! | Operation | Module / function |
//! |---|---|
//! | **Fit resolution** | [`resolve_fit`] |
//! | **Box downscale** | [`halve`] — 2:1 area average |
//! | **Bilinear resample** | [`resample`] — four-tap, ceil-clamped edges |
//! | **Fit to box** | [`scale_to_fit`] — halve while ≥ 2× target, then one bilinear pass |
//! | **Thumbnail** | [`make_thumbnail`] — center square crop + bilinear to exact size |
//! | **Decode / encode** | [`RustBackend`] via the `image` crate |
//!
//! The module is split into:
//! - **Raster**: [`RasterImage`], the only pixel container
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing a fit
//! - **Kernels**: [`halve`] and [`resample`]
//! - **Backend**: [`ImageSource`] and [`Encoder`] traits + [`RustBackend`]
//! - **Operations**: High-level functions combining calculations + kernels

pub mod backend;
mod bilinear;
mod calculations;
mod error;
mod halve;
pub mod operations;
mod params;
mod raster;
pub mod rust_backend;

pub use backend::{BackendError, Encoder, ImageSource, SourceImage, is_image_type};
pub use bilinear::resample;
pub use calculations::{halving_steps, resolve_fit, scaled_dimension, square_crop};
pub use error::{PipelineError, ResizeError};
pub use halve::halve;
pub use operations::{
    EncodedImage, crop_to_square_and_scale, encode_fit, encode_thumbnail, fit_source,
    make_thumbnail, plan_fit, scale_to_fit, thumbnail_source,
};
pub use params::{FitMode, FitPlan, Quality, ResolvedFit, SnapAxis};
pub use raster::RasterImage;
pub use rust_backend::{RustBackend, to_data_uri};
