//! Shared test utilities for the resizer test suite.
//!
//! Provides synthetic rasters, config shorthands and tolerance assertions.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let img = gradient(1000, 500);
//! let out = scale_to_fit(&img, &fit_config(300, 0)).unwrap();
//! assert_within(out.height(), 150, 2);
//! ```

use crate::config::{ScaleConfig, ScaleConfigUpdate};
use crate::imaging::{RasterImage, SourceImage};

// =========================================================================
// Synthetic rasters
// =========================================================================

/// Opaque raster with red following x, green following y, constant blue.
pub fn gradient(width: u32, height: u32) -> RasterImage {
    let span = |n: u32| n.saturating_sub(1).max(1);
    RasterImage::from_fn(width, height, |x, y| {
        [
            (x * 255 / span(width)) as u8,
            (y * 255 / span(height)) as u8,
            96,
            255,
        ]
    })
}

/// Wrap a raster as a loaded source.
pub fn source_image(name: &str, mime: &str, raster: RasterImage) -> SourceImage {
    SourceImage {
        name: name.to_string(),
        mime: mime.to_string(),
        raster,
    }
}

// =========================================================================
// Config shorthands
// =========================================================================

/// Default config with both fit bounds replaced (0 = unset).
pub fn fit_config(max_width: u32, max_height: u32) -> ScaleConfig {
    ScaleConfig::default().merged(&ScaleConfigUpdate {
        max_width: Some(max_width),
        max_height: Some(max_height),
        ..ScaleConfigUpdate::default()
    })
}

// =========================================================================
// Assertions
// =========================================================================

/// Assert `actual` is within `delta` of `expected`.
pub fn assert_within(actual: u32, expected: u32, delta: u32) {
    assert!(
        actual.abs_diff(expected) <= delta,
        "expected {actual} to be within {expected} ± {delta}"
    );
}
