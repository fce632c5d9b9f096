//! Stroke tessellation.
//!
//! A polyline becomes a ribbon of vertex pairs, one pair per input point
//! plus extra pairs for joins and caps. Pairs are always emitted as
//! `[minus side, plus side]` where the per-segment normal is `(d.y, -d.x)`
//! scaled to half the line width; round fans swap the pair order on the plus
//! side so the strip keeps its winding.
//!
//! Every interior vertex picks its join from the turn direction:
//! a positive cross product puts the minus side on the inside of the turn.

use std::f64::consts::PI;

use crate::target::DrawMode;
use crate::types::Point;

use super::defaults;
use super::style::{LineCap, LineJoin, LineStyle};

/// Tessellated stroke for one datum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrokeGeometry {
    pub vertices: Vec<Point>,
    /// Indices into `vertices`, laid out for `mode`.
    pub indices: Vec<u32>,
    pub mode: DrawMode,
}

impl StrokeGeometry {
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Tessellate `outline` with `style`.
///
/// `eps` is the distance under which two points are merged. Outlines whose
/// first and last points meet are stroked as closed loops without caps.
pub fn tessellate_stroke(outline: &[Point], style: &LineStyle, eps: f64) -> StrokeGeometry {
    if !style.visible() {
        return StrokeGeometry::default();
    }
    if style.native {
        let vertices = native_line(outline, eps);
        let indices = (0..vertices.len() as u32).collect();
        return StrokeGeometry {
            vertices,
            indices,
            mode: DrawMode::Lines,
        };
    }
    let vertices = ribbon(outline, style, eps);
    let indices = strip_to_triangles(0, vertices.len());
    StrokeGeometry {
        vertices,
        indices,
        mode: DrawMode::Triangles,
    }
}

/// Triangle-list indices for a strip of `count` vertices starting at `base`.
pub fn strip_to_triangles(base: u32, count: usize) -> Vec<u32> {
    let count = count as u32;
    (0..count.saturating_sub(2))
        .flat_map(|i| [base + i, base + i + 1, base + i + 2])
        .collect()
}

/// One vertex pair per segment, for one-pixel line lists.
pub fn native_line(outline: &[Point], eps: f64) -> Vec<Point> {
    let points = merge_close_points(outline, eps);
    points.windows(2).flat_map(|w| [w[0], w[1]]).collect()
}

#[inline]
fn close(a: Point, b: Point, eps: f64) -> bool {
    (a - b).abs().max_element() < eps
}

fn merge_close_points(outline: &[Point], eps: f64) -> Vec<Point> {
    let mut points: Vec<Point> = Vec::with_capacity(outline.len());
    for &p in outline {
        match points.last() {
            Some(&last) if close(last, p, eps) => {}
            _ => points.push(p),
        }
    }
    points
}

/// Unit normal of `d` scaled to `half_width`.
#[inline]
fn normal(d: Point, half_width: f64) -> Point {
    Point::new(d.y, -d.x).normalize() * half_width
}

/// Intersection of the line through `a` along `da` with the line through `b` along `db`.
#[inline]
fn intersect(a: Point, da: Point, b: Point, db: Point) -> Point {
    let t = (b - a).perp_dot(db) / da.perp_dot(db);
    a + da * t
}

/// Which way a round fan sweeps, and so how its pairs are ordered.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sweep {
    /// Decreasing angle, pairs are `[center, rim]`.
    Negative,
    /// Increasing angle, pairs are `[rim, center]`.
    Positive,
}

/// Fan of rim points from `from` to `to` around `center`, each paired with the center.
///
/// Angles are measured as `atan2(dx, dy)`, so a rim point at angle `a` is
/// `center + r * (sin a, cos a)`.
fn round_fan(verts: &mut Vec<Point>, center: Point, from: Point, to: Point, sweep: Sweep) {
    let a = from - center;
    let b = to - center;
    let radius = a.length();
    let start = a.x.atan2(a.y);
    let end = b.x.atan2(b.y);
    let mut diff = end - start;
    match sweep {
        Sweep::Negative if diff > 0.0 => diff -= 2.0 * PI,
        Sweep::Positive if diff < 0.0 => diff += 2.0 * PI,
        _ => {}
    }

    let raw = (15.0 * diff.abs() * radius.sqrt() / PI).floor();
    let extra = if raw.is_finite() { (raw as usize).min(defaults::ARC_MAX_SEGMENTS) } else { 0 };
    let segments = extra + 1;
    let step = diff / segments as f64;

    let mut push = |rim: Point| match sweep {
        Sweep::Negative => verts.extend([center, rim]),
        Sweep::Positive => verts.extend([rim, center]),
    };
    push(from);
    let mut angle = start;
    for _ in 1..segments {
        angle += step;
        push(center + Point::new(angle.sin(), angle.cos()) * radius);
    }
    push(to);
}

/// Side weights: how much of the width lies on the minus and plus side.
#[derive(Clone, Copy, Debug)]
struct Weights {
    inner: f64,
    outer: f64,
}

impl Weights {
    fn new(alignment: f64) -> Self {
        Weights {
            inner: (1.0 - alignment) * 2.0,
            outer: alignment * 2.0,
        }
    }

    fn minus(&self, p: Point, n: Point) -> Point {
        p - n * self.inner
    }

    fn plus(&self, p: Point, n: Point) -> Point {
        p + n * self.outer
    }

    /// Midpoint between the two offsets.
    fn center(&self, p: Point, n: Point) -> Point {
        p - n * ((self.inner - self.outer) * 0.5)
    }
}

/// Build the ribbon vertices for `outline`.
pub fn ribbon(outline: &[Point], style: &LineStyle, eps: f64) -> Vec<Point> {
    let mut points = merge_close_points(outline, eps);
    if points.len() < 2 {
        return Vec::new();
    }

    let first = points[0];
    let last = points[points.len() - 1];
    let closed = points.len() > 2 && close(first, last, eps);
    if closed {
        // restart the loop halfway along its closing edge
        points.pop();
        let tail = points[points.len() - 1];
        let midpoint = (first + tail) * 0.5;
        points.insert(0, midpoint);
        points.push(midpoint);
    }
    let cap = if closed { LineCap::Butt } else { style.cap };

    let half_width = style.half_width();
    let weights = Weights::new(style.alignment);
    let mut verts = Vec::with_capacity(points.len() * 4);

    // start cap
    let dir = points[1] - points[0];
    let n = normal(dir, half_width);
    let mut start = points[0];
    match cap {
        LineCap::Butt => {}
        LineCap::Square => start -= dir.normalize() * half_width,
        LineCap::Round => round_fan(
            &mut verts,
            weights.center(start, n),
            weights.minus(start, n),
            weights.plus(start, n),
            Sweep::Negative,
        ),
    }
    verts.extend([weights.minus(start, n), weights.plus(start, n)]);

    for w in points.windows(3) {
        join(&mut verts, w[0], w[1], w[2], style, &weights);
    }

    // end cap
    let count = points.len();
    let dir = points[count - 1] - points[count - 2];
    let n = normal(dir, half_width);
    let mut end = points[count - 1];
    if cap == LineCap::Square {
        end += dir.normalize() * half_width;
    }
    verts.extend([weights.minus(end, n), weights.plus(end, n)]);
    if cap == LineCap::Round {
        round_fan(
            &mut verts,
            weights.center(end, n),
            weights.minus(end, n),
            weights.plus(end, n),
            Sweep::Positive,
        );
    }

    verts
}

fn join(verts: &mut Vec<Point>, p0: Point, p1: Point, p2: Point, style: &LineStyle, weights: &Weights) {
    let half_width = style.half_width();
    let d1 = p1 - p0;
    let d2 = p2 - p1;
    let n1 = normal(d1, half_width);
    let n2 = normal(d2, half_width);
    let cross = d1.perp_dot(d2);

    if (cross / (d1.length() * d2.length())).abs() < defaults::PARALLEL_EPS {
        if d1.dot(d2) >= 0.0 {
            verts.extend([weights.minus(p1, n1), weights.plus(p1, n1)]);
            return;
        }
        // the path folds back onto itself
        let center = weights.center(p1, n1);
        let from = weights.plus(p1, n1);
        let to = weights.plus(p1, n2);
        if style.join == LineJoin::Round {
            round_fan(verts, center, from, to, Sweep::Negative);
        } else {
            verts.extend([center, from, center, to]);
        }
        return;
    }

    let minus_x = intersect(weights.minus(p0, n1), d1, weights.minus(p1, n2), d2);
    let plus_x = intersect(weights.plus(p0, n1), d1, weights.plus(p1, n2), d2);
    let minus_inner = cross > 0.0;
    let (inner, outer) = if minus_inner { (minus_x, plus_x) } else { (plus_x, minus_x) };

    // inner corner would overshoot a short segment
    let reach = half_width * weights.inner.max(weights.outer);
    let limit = d1.length_squared().min(d2.length_squared()) + reach * reach;
    if (inner - p1).length_squared() > limit {
        verts.extend([
            weights.minus(p1, n1),
            weights.plus(p1, n1),
            weights.minus(p1, n2),
            weights.plus(p1, n2),
        ]);
        return;
    }

    let miter_reach = style.miter_limit * half_width;
    match style.join {
        LineJoin::Miter if (outer - p1).length_squared() <= miter_reach * miter_reach => {
            verts.extend([minus_x, plus_x]);
        }
        LineJoin::Round if minus_inner => {
            round_fan(verts, inner, weights.plus(p1, n1), weights.plus(p1, n2), Sweep::Negative);
        }
        LineJoin::Round => {
            round_fan(verts, inner, weights.minus(p1, n1), weights.minus(p1, n2), Sweep::Positive);
        }
        _ if minus_inner => {
            verts.extend([inner, weights.plus(p1, n1), inner, weights.plus(p1, n2)]);
        }
        _ => {
            verts.extend([weights.minus(p1, n1), inner, weights.minus(p1, n2), inner]);
        }
    }
}
