//! Shared geometric primitives: the affine `Matrix` fed in by the host,
//! plus small color helpers used when filling vertex attributes.

use glam::{DAffine2, DMat2, DVec2, dvec2};

/// A 2D point in local or world space.
pub type Point = DVec2;

/// Shorthand constructor mirroring `glam::dvec2`.
#[inline]
pub fn pt(x: f64, y: f64) -> Point {
    dvec2(x, y)
}

/// 2D affine transform in the host's six-coefficient layout.
///
/// A point maps as `x' = a*x + c*y + tx`, `y' = b*x + d*y + ty`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Matrix {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub tx: f64,
    pub ty: f64,
}

impl Default for Matrix {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Matrix {
    pub const IDENTITY: Matrix = Matrix {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    pub const fn new(a: f64, b: f64, c: f64, d: f64, tx: f64, ty: f64) -> Self {
        Matrix { a, b, c, d, tx, ty }
    }

    pub const fn translation(tx: f64, ty: f64) -> Self {
        Matrix::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn scale(sx: f64, sy: f64) -> Self {
        Matrix::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    #[inline]
    pub fn apply(&self, p: Point) -> Point {
        dvec2(
            self.a * p.x + self.c * p.y + self.tx,
            self.b * p.x + self.d * p.y + self.ty,
        )
    }

    /// Map a world-space point back into local space.
    ///
    /// Returns `None` when the transform collapses space (zero determinant).
    pub fn apply_inverse(&self, p: Point) -> Option<Point> {
        let det = self.a * self.d - self.b * self.c;
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        Some(self.to_affine().inverse().transform_point2(p))
    }

    /// Length of the transformed x axis.
    pub fn scale_x(&self) -> f64 {
        dvec2(self.a, self.b).length()
    }

    /// Length of the transformed y axis.
    pub fn scale_y(&self) -> f64 {
        dvec2(self.c, self.d).length()
    }

    /// `self` applied after `other`.
    pub fn then(&self, other: &Matrix) -> Matrix {
        Matrix::from(other.to_affine() * self.to_affine())
    }

    pub fn to_affine(&self) -> DAffine2 {
        DAffine2 {
            matrix2: DMat2::from_cols(dvec2(self.a, self.b), dvec2(self.c, self.d)),
            translation: dvec2(self.tx, self.ty),
        }
    }
}

impl From<DAffine2> for Matrix {
    fn from(affine: DAffine2) -> Self {
        let m = affine.matrix2;
        Matrix::new(
            m.x_axis.x,
            m.x_axis.y,
            m.y_axis.x,
            m.y_axis.y,
            affine.translation.x,
            affine.translation.y,
        )
    }
}

/// Split a packed `0xRRGGBB` color into normalized channels.
pub fn hex_to_rgb(hex: u32) -> [f32; 3] {
    [
        ((hex >> 16) & 0xff) as f32 / 255.0,
        ((hex >> 8) & 0xff) as f32 / 255.0,
        (hex & 0xff) as f32 / 255.0,
    ]
}

/// Normalized RGBA with the color channels multiplied by alpha.
pub fn premultiply(hex: u32, alpha: f64) -> [f32; 4] {
    let [r, g, b] = hex_to_rgb(hex);
    let a = alpha.clamp(0.0, 1.0) as f32;
    [r * a, g * a, b * a, a]
}
