//! # Resizer
//!
//! Fit-to-box image downscaling and fixed-size square thumbnails.
//!
//! # Architecture: Plan, Halve, Resample
//!
//! Every fit goes through the same short pipeline over an in-memory RGBA8
//! raster:
//!
//! ```text
//! 1. Resolve   config + source size  →  snap axis and target   (pure math)
//! 2. Halve     raster                →  raster / 2              (while ≥ 2× target)
//! 3. Resample  raster                →  exact target            (one bilinear pass)
//! ```
//!
//! Thumbnails skip step 2: the source is center-cropped to a square and
//! resampled straight to `thumb_size × thumb_size`.
//!
//! The dimension logic is a pure function ([`imaging::plan_fit`]), so the whole
//! pipeline can be checked without touching a pixel, and the kernels can be
//! tested against hand-computed values.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Raster model, fit resolver, box downscaler, bilinear resampler, thumbnails, decode/encode backend |
//! | [`config`] | Layered `ScaleConfig` loading, validation and shallow merging |
//! | [`process`] | Parallel batch runs over files, progress events, JSON manifest |
//! | [`output`] | CLI output formatting for batch results |
//!
//! # Design Decisions
//!
//! ## Box Averaging Before Bilinear
//!
//! A single bilinear pass only ever looks at four source pixels, so a large
//! reduction skips most of the image and aliases. Halving first with a 2×2
//! area average brings the image within 2× of the target, where four taps are
//! enough. The final pass is the only fractional step.
//!
//! ## Never Upscale
//!
//! `fit` returns the source unchanged when it is already within the bounds.
//! The thumbnail path is the exception: it always produces the exact size.
//!
//! ## Own Kernels, `image` for I/O
//!
//! The `image` crate decodes and encodes, and nothing more. Keeping the
//! kernels in this crate pins their rounding: every derived dimension and every
//! stored channel is rounded half-up.
//!
//! ## Immutable Config
//!
//! [`config::ScaleConfig`] is a plain value. Changing settings means building a
//! new one via [`config::ScaleConfig::merged`] or [`config::merge_config`];
//! nothing is shared or mutated behind the pipeline's back.

pub mod config;
pub mod imaging;
pub mod output;
pub mod process;

#[cfg(test)]
pub(crate) mod test_helpers;
