//! Pure calculation functions for fit dimensions.
//!
//! All functions here are pure and testable without any pixels. Every derived
//! dimension is rounded half-up and kept at least 1.

use super::error::ResizeError;
use super::params::{FitMode, ResolvedFit, SnapAxis};
use crate::config::ScaleConfig;

/// Scale a dimension, rounding half-up, never below 1.
///
/// # Examples
/// ```
/// # use resizer::imaging::scaled_dimension;
/// assert_eq!(scaled_dimension(500, 0.6), 300);
/// assert_eq!(scaled_dimension(5, 0.5), 3); // 2.5 rounds up
/// assert_eq!(scaled_dimension(3, 0.01), 1);
/// ```
pub fn scaled_dimension(dimension: u32, scale: f64) -> u32 {
    let scaled = (dimension as f64 * scale).round();
    if scaled < 1.0 { 1 } else { scaled as u32 }
}

/// The dimension on the free axis when the snap axis goes from `snap_dim` to `target`.
fn proportional(other_dim: u32, target: u32, snap_dim: u32) -> u32 {
    scaled_dimension(other_dim, target as f64 / snap_dim as f64)
}

/// Resolve fit parameters against the source dimensions.
///
/// - Only `max_width` set → [`FitMode::SnapToWidth`]
/// - Only `max_height` set → [`FitMode::SnapToHeight`]
/// - Both set → [`FitMode::Box`], snapping to width when the source is at
///   least as wide as it is tall (a square snaps to width)
///
/// The returned targets are nominal: the orchestrator still refuses to
/// upscale, so a source smaller than the target comes back unchanged.
pub fn resolve_fit(
    config: &ScaleConfig,
    source_width: u32,
    source_height: u32,
) -> Result<ResolvedFit, ResizeError> {
    let (max_w, max_h) = (config.max_width, config.max_height);

    let mode = match (max_w > 0, max_h > 0) {
        (false, false) => {
            return Err(ResizeError::Config(format!(
                "nothing to fit {source_width}x{source_height} to: maxWidth and maxHeight are both unset"
            )));
        }
        (true, false) => FitMode::SnapToWidth,
        (false, true) => FitMode::SnapToHeight,
        (true, true) => FitMode::Box,
    };

    let snap = match mode {
        FitMode::SnapToWidth => SnapAxis::Width,
        FitMode::SnapToHeight => SnapAxis::Height,
        FitMode::Box if source_width >= source_height => SnapAxis::Width,
        FitMode::Box => SnapAxis::Height,
    };

    let (target_width, target_height) = match snap {
        SnapAxis::Width => (max_w, proportional(source_height, max_w, source_width.max(1))),
        SnapAxis::Height => (proportional(source_width, max_h, source_height.max(1)), max_h),
    };

    Ok(ResolvedFit {
        mode,
        snap,
        target_width,
        target_height,
    })
}

/// Dimensions after one 2:1 box reduction.
pub fn halved_dimensions((width, height): (u32, u32)) -> (u32, u32) {
    ((width / 2).max(1), (height / 2).max(1))
}

/// How many halvings bring the snap axis under twice its target.
///
/// Halving continues while `dimension >= 2 * target`, so the result lands in
/// `[target, 2 * target)` on the snap axis, or stays put when the source is
/// already below that band.
///
/// # Returns
/// * `(count, dimensions after the last halving)`
pub fn halving_steps(source: (u32, u32), snap: SnapAxis, target: u32) -> (u32, (u32, u32)) {
    let limit = 2 * u64::from(target.max(1));
    let mut dims = source;
    let mut count = 0;
    while u64::from(snap.of(dims)) >= limit {
        dims = halved_dimensions(dims);
        count += 1;
    }
    (count, dims)
}

/// Centered square crop window for a thumbnail.
///
/// # Returns
/// * `(offset_x, offset_y, size)` where `size = min(width, height)`
///
/// # Examples
/// ```
/// # use resizer::imaging::square_crop;
/// assert_eq!(square_crop(640, 480), (80, 0, 480));
/// assert_eq!(square_crop(300, 501), (0, 100, 300));
/// ```
pub fn square_crop(width: u32, height: u32) -> (u32, u32, u32) {
    let size = width.min(height);
    let offset_x = width.saturating_sub(height) / 2;
    let offset_y = height.saturating_sub(width) / 2;
    (offset_x, offset_y, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScaleConfigUpdate;

    fn bounds(max_width: u32, max_height: u32) -> ScaleConfig {
        ScaleConfig::default().merged(&ScaleConfigUpdate {
            max_width: Some(max_width),
            max_height: Some(max_height),
            ..ScaleConfigUpdate::default()
        })
    }

    // =========================================================================
    // scaled_dimension tests
    // =========================================================================

    #[test]
    fn scaled_rounds_half_up() {
        assert_eq!(scaled_dimension(5, 0.5), 3);
        assert_eq!(scaled_dimension(7, 0.5), 4);
        assert_eq!(scaled_dimension(9, 0.5), 5);
    }

    #[test]
    fn scaled_never_below_one() {
        assert_eq!(scaled_dimension(1, 0.1), 1);
        assert_eq!(scaled_dimension(10, 0.0001), 1);
    }

    #[test]
    fn scaled_identity() {
        assert_eq!(scaled_dimension(1234, 1.0), 1234);
    }

    // =========================================================================
    // resolve_fit tests
    // =========================================================================

    #[test]
    fn resolve_rejects_no_bounds() {
        let err = resolve_fit(&bounds(0, 0), 640, 480).unwrap_err();
        match err {
            ResizeError::Config(msg) => {
                assert!(msg.contains("maxWidth"));
                assert!(msg.contains("640x480"));
            }
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn resolve_width_only() {
        let fit = resolve_fit(&bounds(300, 0), 1000, 500).unwrap();
        assert_eq!(fit.mode, FitMode::SnapToWidth);
        assert_eq!(fit.snap, SnapAxis::Width);
        assert_eq!((fit.target_width, fit.target_height), (300, 150));
    }

    #[test]
    fn resolve_height_only() {
        let fit = resolve_fit(&bounds(0, 300), 1000, 500).unwrap();
        assert_eq!(fit.mode, FitMode::SnapToHeight);
        assert_eq!(fit.snap, SnapAxis::Height);
        assert_eq!((fit.target_width, fit.target_height), (600, 300));
    }

    #[test]
    fn resolve_box_landscape_snaps_width() {
        let fit = resolve_fit(&bounds(300, 300), 800, 600).unwrap();
        assert_eq!(fit.mode, FitMode::Box);
        assert_eq!(fit.snap, SnapAxis::Width);
        assert_eq!(fit.snap_target(), 300);
    }

    #[test]
    fn resolve_box_portrait_snaps_height() {
        let fit = resolve_fit(&bounds(300, 300), 600, 800).unwrap();
        assert_eq!(fit.mode, FitMode::Box);
        assert_eq!(fit.snap, SnapAxis::Height);
        assert_eq!((fit.target_width, fit.target_height), (225, 300));
    }

    #[test]
    fn resolve_box_square_tie_snaps_width() {
        let fit = resolve_fit(&bounds(200, 400), 500, 500).unwrap();
        assert_eq!(fit.snap, SnapAxis::Width);
        assert_eq!((fit.target_width, fit.target_height), (200, 200));
    }

    // =========================================================================
    // halving_steps tests
    // =========================================================================

    #[test]
    fn halving_stops_inside_two_x_band() {
        let (count, dims) = halving_steps((1000, 500), SnapAxis::Width, 300);
        assert_eq!(count, 1);
        assert_eq!(dims, (500, 250));
    }

    #[test]
    fn halving_exactly_double_halves_once() {
        let (count, dims) = halving_steps((600, 400), SnapAxis::Width, 300);
        assert_eq!(count, 1);
        assert_eq!(dims, (300, 200));
    }

    #[test]
    fn halving_noop_below_band() {
        let (count, dims) = halving_steps((599, 400), SnapAxis::Width, 300);
        assert_eq!(count, 0);
        assert_eq!(dims, (599, 400));
    }

    #[test]
    fn halving_many_steps_on_height() {
        let (count, dims) = halving_steps((2000, 4000), SnapAxis::Height, 100);
        // 4000 → 2000 → 1000 → 500 → 250 → 125
        assert_eq!(count, 5);
        assert_eq!(dims, (62, 125));
    }

    #[test]
    fn halving_keeps_free_axis_at_least_one() {
        let (count, dims) = halving_steps((4000, 3), SnapAxis::Width, 100);
        assert_eq!(count, 5);
        assert_eq!(dims, (125, 1));
    }

    // =========================================================================
    // square_crop tests
    // =========================================================================

    #[test]
    fn crop_landscape_centers_horizontally() {
        assert_eq!(square_crop(640, 480), (80, 0, 480));
    }

    #[test]
    fn crop_portrait_centers_vertically() {
        assert_eq!(square_crop(480, 640), (0, 80, 480));
    }

    #[test]
    fn crop_odd_difference_floors() {
        assert_eq!(square_crop(101, 100), (0, 0, 100));
        assert_eq!(square_crop(103, 100), (1, 0, 100));
    }

    #[test]
    fn crop_square_is_whole_image() {
        assert_eq!(square_crop(25, 25), (0, 0, 25));
    }
}
