//! Parameter types for image operations.
//!
//! These types describe *what* the pipeline will do, not *how*. The
//! [`calculations`](super::calculations) module produces them from a config and
//! source dimensions; [`operations`](super::operations) executes them against
//! pixels.
//!
//! ## Types
//!
//! - [`Quality`] — Lossy encoding quality in `[0, 1]` (default 0.8). Clamped on construction.
//! - [`FitMode`] — Which bounds are set: width only, height only, or both (box).
//! - [`SnapAxis`] — The axis forced to its target once box mode is resolved.
//! - [`ResolvedFit`] — Output of the config resolver: mode, axis, nominal target size.
//! - [`FitPlan`] — A full dry run of the fit pipeline: halvings, final scale, output size.

use serde::{Deserialize, Serialize};

/// Quality setting for lossy encoding, `0.0` (worst) to `1.0` (best).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quality(pub f64);

impl Quality {
    pub fn new(value: f64) -> Self {
        if value.is_nan() {
            return Self::default();
        }
        Self(value.clamp(0.0, 1.0))
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Quality as an encoder percentage, 1-100.
    pub fn percent(self) -> u8 {
        (self.0 * 100.0).round().clamp(1.0, 100.0) as u8
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(0.8)
    }
}

/// Fitting policy derived from which bounds are configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FitMode {
    /// Only `max_width` set.
    SnapToWidth,
    /// Only `max_height` set.
    SnapToHeight,
    /// Both set; resolves to an axis by the source aspect ratio.
    Box,
}

/// The axis that is forced to its target dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SnapAxis {
    Width,
    Height,
}

impl SnapAxis {
    /// Pick this axis' component out of a `(width, height)` pair.
    pub fn of(self, (width, height): (u32, u32)) -> u32 {
        match self {
            SnapAxis::Width => width,
            SnapAxis::Height => height,
        }
    }
}

/// Result of resolving a config against source dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedFit {
    pub mode: FitMode,
    pub snap: SnapAxis,
    /// Nominal output width: the bound itself, or the proportional width.
    pub target_width: u32,
    /// Nominal output height: the bound itself, or the proportional height.
    pub target_height: u32,
}

impl ResolvedFit {
    /// Target dimension on the snap axis.
    pub fn snap_target(&self) -> u32 {
        self.snap.of((self.target_width, self.target_height))
    }
}

/// Dry run of `scale_to_fit`: everything the pipeline will do, computed from
/// dimensions alone.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitPlan {
    pub fit: ResolvedFit,
    pub source: (u32, u32),
    /// Number of 2:1 box reductions before the final pass.
    pub halvings: u32,
    /// Dimensions after the last halving.
    pub halved: (u32, u32),
    /// Bilinear scale factor, `None` when the final pass is skipped (never upscale).
    pub final_scale: Option<f64>,
    pub output: (u32, u32),
}

impl FitPlan {
    /// True when the pipeline hands back the source untouched.
    pub fn is_identity(&self) -> bool {
        self.halvings == 0 && self.final_scale.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_clamps_to_unit_range() {
        assert_eq!(Quality::new(-0.5).value(), 0.0);
        assert_eq!(Quality::new(0.5).value(), 0.5);
        assert_eq!(Quality::new(3.0).value(), 1.0);
    }

    #[test]
    fn quality_nan_falls_back_to_default() {
        assert_eq!(Quality::new(f64::NAN), Quality::default());
    }

    #[test]
    fn quality_default_is_0_8() {
        assert_eq!(Quality::default().value(), 0.8);
        assert_eq!(Quality::default().percent(), 80);
    }

    #[test]
    fn quality_percent_never_zero() {
        assert_eq!(Quality::new(0.0).percent(), 1);
        assert_eq!(Quality::new(1.0).percent(), 100);
    }

    #[test]
    fn snap_axis_selects_component() {
        assert_eq!(SnapAxis::Width.of((640, 480)), 640);
        assert_eq!(SnapAxis::Height.of((640, 480)), 480);
    }
}
