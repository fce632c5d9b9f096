//! Fill and line styles snapshotted onto every emitted path.

use crate::errors::StyleError;
use crate::types::Matrix;

use super::defaults;

/// How two stroked segments meet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineJoin {
    #[default]
    Miter,
    Bevel,
    Round,
}

/// How an open stroke ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

/// Stroke style.
#[derive(Clone, Debug, PartialEq)]
pub struct LineStyle {
    pub width: f64,
    pub color: u32,
    pub alpha: f64,
    pub join: LineJoin,
    pub cap: LineCap,
    pub miter_limit: f64,
    /// 0 puts the ribbon on the inner (minus) side, 1 on the outer side.
    pub alignment: f64,
    /// Draw as a one-pixel line list instead of a ribbon.
    pub native: bool,
}

impl Default for LineStyle {
    fn default() -> Self {
        LineStyle {
            width: defaults::LINE_WIDTH,
            color: defaults::LINE_COLOR,
            alpha: defaults::ALPHA,
            join: LineJoin::default(),
            cap: LineCap::default(),
            miter_limit: defaults::MITER_LIMIT,
            alignment: defaults::LINE_ALIGNMENT,
            native: false,
        }
    }
}

impl LineStyle {
    /// Build a style, rejecting values the tessellator cannot honor.
    pub fn try_new(width: f64, color: u32, alpha: f64) -> Result<Self, StyleError> {
        LineStyle {
            width,
            color,
            alpha,
            ..LineStyle::default()
        }
        .validated()
    }

    /// Check every numeric field.
    pub fn validated(self) -> Result<Self, StyleError> {
        if !self.width.is_finite() || self.width < 0.0 {
            return Err(StyleError::InvalidWidth { width: self.width });
        }
        if !(0.0..=1.0).contains(&self.alpha) {
            return Err(StyleError::InvalidAlpha { alpha: self.alpha });
        }
        if !(0.0..=1.0).contains(&self.alignment) {
            return Err(StyleError::InvalidAlignment {
                alignment: self.alignment,
            });
        }
        if !(self.miter_limit >= 1.0) {
            return Err(StyleError::InvalidMiterLimit {
                limit: self.miter_limit,
            });
        }
        Ok(self)
    }

    /// Clamp every numeric field into its valid range.
    ///
    /// The chainable builder uses this so drawing never fails.
    pub fn sanitized(mut self) -> Self {
        self.width = if self.width.is_finite() { self.width.max(0.0) } else { 0.0 };
        self.alpha = clamp_unit(self.alpha, defaults::ALPHA);
        self.alignment = clamp_unit(self.alignment, defaults::LINE_ALIGNMENT);
        if !(self.miter_limit >= 1.0) {
            self.miter_limit = defaults::MITER_LIMIT;
        }
        self
    }

    pub fn visible(&self) -> bool {
        self.width > 0.0 && self.alpha > 0.0
    }

    pub fn half_width(&self) -> f64 {
        self.width / 2.0
    }
}

/// Fill style.
#[derive(Clone, Debug, PartialEq)]
pub struct FillStyle {
    pub color: u32,
    pub alpha: f64,
    pub visible: bool,
    /// Maps local positions to texture coordinates; uvs are zero without it.
    pub matrix: Option<Matrix>,
}

impl Default for FillStyle {
    fn default() -> Self {
        FillStyle {
            color: defaults::FILL_COLOR,
            alpha: defaults::ALPHA,
            visible: false,
            matrix: None,
        }
    }
}

impl FillStyle {
    pub fn solid(color: u32, alpha: f64) -> Self {
        FillStyle {
            color,
            alpha: clamp_unit(alpha, defaults::ALPHA),
            visible: true,
            matrix: None,
        }
    }

    /// Whether this fill produces geometry and hit-test area.
    pub fn is_drawn(&self) -> bool {
        self.visible && self.alpha > 0.0
    }
}

fn clamp_unit(value: f64, fallback: f64) -> f64 {
    if value.is_nan() { fallback } else { value.clamp(0.0, 1.0) }
}
