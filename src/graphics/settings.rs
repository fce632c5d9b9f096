//! Tunable tessellation settings.
//!
//! Everything here has a default in [`super::defaults`]; hosts that need
//! denser curves or a different batching threshold pass their own copy to
//! `Graphics::with_settings`.

use super::defaults;

/// Curve and arc flattening controls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CurveSettings {
    /// Maximum control-point distance from the chord before a Bezier stops subdividing.
    pub tolerance: f64,
    /// Recursion cap for Bezier subdivision.
    pub max_depth: u32,
    /// Scale arc segment counts with arc length.
    pub adaptive: bool,
    /// Target length of one arc segment when `adaptive` is set.
    pub max_length: f64,
    pub min_segments: usize,
    pub max_segments: usize,
}

impl Default for CurveSettings {
    fn default() -> Self {
        CurveSettings {
            tolerance: defaults::CURVE_TOLERANCE,
            max_depth: defaults::CURVE_MAX_DEPTH,
            adaptive: true,
            max_length: defaults::ARC_MAX_LENGTH,
            min_segments: defaults::ARC_MIN_SEGMENTS,
            max_segments: defaults::ARC_MAX_SEGMENTS,
        }
    }
}

impl CurveSettings {
    /// Number of segments for an arc of `length` units.
    ///
    /// Non-adaptive settings, or a zero/non-finite length, fall back to a
    /// fixed count per full turn of `sweep`, capped at `max_segments`.
    pub fn arc_segments(&self, length: f64, sweep: f64) -> usize {
        let turns = (sweep.abs() / std::f64::consts::TAU).ceil().max(1.0);
        let fixed = (turns * defaults::ARC_FIXED_SEGMENTS as f64).min(self.max_segments as f64) as usize;
        if !self.adaptive || length == 0.0 || !length.is_finite() {
            return fixed;
        }
        let n = (length / self.max_length).ceil();
        (n as usize).clamp(self.min_segments, self.max_segments)
    }
}

/// Settings for one `Graphics` owner.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TessellationSettings {
    pub curves: CurveSettings,
    pub close_point_eps: f64,
    pub batchable_size: usize,
}

impl Default for TessellationSettings {
    fn default() -> Self {
        TessellationSettings {
            curves: CurveSettings::default(),
            close_point_eps: defaults::CLOSE_POINT_EPS,
            batchable_size: defaults::BATCHABLE_SIZE,
        }
    }
}
