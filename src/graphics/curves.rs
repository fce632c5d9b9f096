//! Curve flattening.
//!
//! Beziers subdivide with De Casteljau until the control points sit within
//! `tolerance` of the chord. Arcs use a segment count proportional to arc
//! length. Every function appends points *after* the curve's start point;
//! the caller owns the start.

use std::f64::consts::TAU;

use crate::types::Point;

use super::defaults;
use super::settings::CurveSettings;

/// Distance from `p` to the line through `a` and `b`.
///
/// Falls back to point distance when the baseline is degenerate.
fn distance_to_line(p: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let len = ab.length();
    if len < f64::EPSILON {
        return (p - a).length();
    }
    ab.perp_dot(p - a).abs() / len
}

#[inline]
fn mid(a: Point, b: Point) -> Point {
    (a + b) * 0.5
}

#[inline]
fn angle_of(v: Point) -> f64 {
    v.y.atan2(v.x)
}

pub fn flatten_quadratic(
    from: Point,
    cp: Point,
    to: Point,
    settings: &CurveSettings,
    out: &mut Vec<Point>,
) {
    quadratic_step(from, cp, to, settings, 0, out);
}

fn quadratic_step(
    p0: Point,
    p1: Point,
    p2: Point,
    settings: &CurveSettings,
    depth: u32,
    out: &mut Vec<Point>,
) {
    if depth >= settings.max_depth || distance_to_line(p1, p0, p2) <= settings.tolerance {
        out.push(p2);
        return;
    }
    let p01 = mid(p0, p1);
    let p12 = mid(p1, p2);
    let p012 = mid(p01, p12);
    quadratic_step(p0, p01, p012, settings, depth + 1, out);
    quadratic_step(p012, p12, p2, settings, depth + 1, out);
}

pub fn flatten_cubic(
    from: Point,
    cp1: Point,
    cp2: Point,
    to: Point,
    settings: &CurveSettings,
    out: &mut Vec<Point>,
) {
    cubic_step(from, cp1, cp2, to, settings, 0, out);
}

fn cubic_step(
    p0: Point,
    p1: Point,
    p2: Point,
    p3: Point,
    settings: &CurveSettings,
    depth: u32,
    out: &mut Vec<Point>,
) {
    let deviation = distance_to_line(p1, p0, p3).max(distance_to_line(p2, p0, p3));
    if depth >= settings.max_depth || deviation <= settings.tolerance {
        out.push(p3);
        return;
    }
    let p01 = mid(p0, p1);
    let p12 = mid(p1, p2);
    let p23 = mid(p2, p3);
    let p012 = mid(p01, p12);
    let p123 = mid(p12, p23);
    let p0123 = mid(p012, p123);
    cubic_step(p0, p01, p012, p0123, settings, depth + 1, out);
    cubic_step(p0123, p123, p23, p3, settings, depth + 1, out);
}

/// Uniformly sample a quadratic curve at `segments + 1` parameters, start included.
///
/// Used for shape outlines whose vertex layout must not depend on tolerance.
pub fn sample_quadratic(from: Point, cp: Point, to: Point, segments: usize, out: &mut Vec<Point>) {
    let segments = segments.max(1);
    for i in 0..=segments {
        let t = i as f64 / segments as f64;
        let a = from.lerp(cp, t);
        let b = cp.lerp(to, t);
        let p = a.lerp(b, t);
        // adjacent corners can share their joining point
        if i == 0 && out.last() == Some(&p) {
            continue;
        }
        out.push(p);
    }
}

/// A normalized arc request: `start` plus a signed, non-zero `sweep`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Arc {
    pub center: Point,
    pub radius: f64,
    pub start: f64,
    pub sweep: f64,
}

impl Arc {
    /// Resolve canvas-style arc angles into a sweep.
    ///
    /// Returns `None` for the no-op cases: equal angles or a zero sweep.
    pub fn new(center: Point, radius: f64, start: f64, end: f64, anticlockwise: bool) -> Option<Arc> {
        if start == end {
            return None;
        }
        let (mut start, mut end) = (start, end);
        if !anticlockwise && end <= start {
            end += TAU;
        } else if anticlockwise && start <= end {
            start += TAU;
        }
        let sweep = end - start;
        if sweep == 0.0 {
            return None;
        }
        Some(Arc {
            center,
            radius,
            start,
            sweep,
        })
    }

    pub fn point_at(&self, angle: f64) -> Point {
        self.center + Point::new(angle.cos(), angle.sin()) * self.radius
    }

    pub fn start_point(&self) -> Point {
        self.point_at(self.start)
    }

    /// Append the arc's points after its start point, ending exactly on the sweep end.
    pub fn flatten(&self, settings: &CurveSettings, out: &mut Vec<Point>) {
        let n = settings.arc_segments(self.sweep.abs() * self.radius, self.sweep);
        for k in 1..=n {
            let angle = self.start + self.sweep * (k as f64 / n as f64);
            out.push(self.point_at(angle));
        }
    }
}

/// What `arc_to` resolves to for a given cursor.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ArcTo {
    /// Tangents are collinear or the radius is zero: draw straight to the corner.
    Line(Point),
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    },
}

/// Fit a circle of `radius` tangent to `from -> p1` and `p1 -> p2`.
pub fn arc_to(from: Point, p1: Point, p2: Point, radius: f64) -> ArcTo {
    let a = from - p1;
    let b = p2 - p1;
    let cross = a.perp_dot(b);
    if cross.abs() < defaults::ARC_TO_EPS || radius == 0.0 {
        return ArcTo::Line(p1);
    }
    let mm = cross.abs();
    let dd = a.length_squared();
    let cc = b.length_squared();
    let tt = a.dot(b);
    let k1 = radius * dd.sqrt() / mm;
    let k2 = radius * cc.sqrt() / mm;
    let j1 = k1 * tt / dd;
    let j2 = k2 * tt / cc;
    let center = b * k1 + a * k2;
    let tangent_in = a * (k2 + j1);
    let tangent_out = b * (k1 + j2);
    let start = angle_of(tangent_in - center);
    let end = angle_of(tangent_out - center);
    ArcTo::Arc {
        center: center + p1,
        radius,
        start,
        end,
        anticlockwise: cross > 0.0,
    }
}
