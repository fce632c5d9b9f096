//! Axis-aligned bounds over raw vertex buffers.

use crate::types::{Matrix, Point, pt};

/// Axis-aligned bounding box.
///
/// Starts empty (min above max) and grows as points are added.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bounds {
    pub min: Point,
    pub max: Point,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new()
    }
}

impl Bounds {
    /// Create an empty bounding box (will expand on first point)
    pub fn new() -> Self {
        Bounds {
            min: pt(f64::MAX, f64::MAX),
            max: pt(-f64::MAX, -f64::MAX),
        }
    }

    pub fn from_rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Bounds {
            min: pt(x, y),
            max: pt(x + width, y + height),
        }
    }

    /// Check if the bounds are empty (never expanded)
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn add_point(&mut self, p: Point) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    /// Scan a flat vertex buffer once.
    ///
    /// `stride` counts floats per vertex; the first two floats of each vertex
    /// are x and y. When `transform` is given, each point is mapped before it
    /// is added.
    pub fn add_vertex_data(&mut self, data: &[f32], stride: usize, transform: Option<&Matrix>) {
        let stride = stride.max(2);
        for vertex in data.chunks_exact(stride) {
            let p = pt(vertex[0] as f64, vertex[1] as f64);
            match transform {
                Some(m) => self.add_point(m.apply(p)),
                None => self.add_point(p),
            }
        }
    }

    pub fn add_bounds(&mut self, other: &Bounds) {
        if other.is_empty() {
            return;
        }
        self.add_point(other.min);
        self.add_point(other.max);
    }

    /// Bounds of the four corners of `self` mapped through `m`.
    pub fn transformed(&self, m: &Matrix) -> Bounds {
        let mut out = Bounds::new();
        if self.is_empty() {
            return out;
        }
        for corner in [
            self.min,
            pt(self.max.x, self.min.y),
            self.max,
            pt(self.min.x, self.max.y),
        ] {
            out.add_point(m.apply(corner));
        }
        out
    }

    pub fn pad(&mut self, amount: f64) {
        if self.is_empty() {
            return;
        }
        self.min -= pt(amount, amount);
        self.max += pt(amount, amount);
    }

    /// Inclusive containment test.
    pub fn contains(&self, p: Point) -> bool {
        !self.is_empty() && p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    pub fn width(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max.x - self.min.x }
    }

    pub fn height(&self) -> f64 {
        if self.is_empty() { 0.0 } else { self.max.y - self.min.y }
    }
}
