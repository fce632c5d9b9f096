//! Shape descriptors
//!
//! Each shape knows how to:
//! - Build the closed polyline used for stroking and fill triangulation
//! - Test whether a local-space point lies inside it
//!
//! Closed outlines end on their first point so the stroker treats them as loops.

use std::f64::consts::{FRAC_PI_2, TAU};

use enum_dispatch::enum_dispatch;

use crate::types::{Point, pt};

use super::curves::sample_quadratic;
use super::defaults;

/// Common behavior for all shapes
#[enum_dispatch]
pub trait ShapeOutline {
    /// Polyline approximating the outline.
    fn outline(&self) -> Vec<Point>;

    /// Analytic containment in the shape's own space.
    fn contains(&self, p: Point) -> bool;

    /// Whether the stroke wraps back to the first point.
    fn closes_stroke(&self) -> bool {
        true
    }
}

/// Every shape a datum can carry.
#[enum_dispatch(ShapeOutline)]
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Rectangle,
    RoundedRectangle,
    Circle,
    Ellipse,
    Polygon,
}

/// Append the first point again unless the ring already ends on it.
fn close_ring(mut points: Vec<Point>) -> Vec<Point> {
    if let (Some(&first), Some(&last)) = (points.first(), points.last()) {
        if first != last {
            points.push(first);
        }
    }
    points
}

// ============================================================================
// Rectangle
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rectangle { x, y, width, height }
    }
}

impl ShapeOutline for Rectangle {
    fn outline(&self) -> Vec<Point> {
        let Rectangle { x, y, width, height } = *self;
        close_ring(vec![
            pt(x, y),
            pt(x + width, y),
            pt(x + width, y + height),
            pt(x, y + height),
        ])
    }

    /// Half-open: the left and top edges are inside, right and bottom are not.
    fn contains(&self, p: Point) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

// ============================================================================
// Rounded rectangle
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundedRectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub radius: f64,
}

impl RoundedRectangle {
    pub fn new(x: f64, y: f64, width: f64, height: f64, radius: f64) -> Self {
        RoundedRectangle {
            x,
            y,
            width,
            height,
            radius,
        }
    }

    /// Corner radius limited to half the shorter side.
    pub fn effective_radius(&self) -> f64 {
        self.radius.min(self.width.min(self.height) / 2.0).max(0.0)
    }
}

impl ShapeOutline for RoundedRectangle {
    fn outline(&self) -> Vec<Point> {
        let RoundedRectangle { x, y, width, height, .. } = *self;
        let r = self.effective_radius();
        if r == 0.0 {
            return Rectangle::new(x, y, width, height).outline();
        }
        let n = defaults::ROUNDED_CORNER_SEGMENTS;
        let mut points = Vec::with_capacity(4 * (n + 1) + 1);
        sample_quadratic(pt(x, y + r), pt(x, y), pt(x + r, y), n, &mut points);
        sample_quadratic(pt(x + width - r, y), pt(x + width, y), pt(x + width, y + r), n, &mut points);
        sample_quadratic(
            pt(x + width, y + height - r),
            pt(x + width, y + height),
            pt(x + width - r, y + height),
            n,
            &mut points,
        );
        sample_quadratic(pt(x + r, y + height), pt(x, y + height), pt(x, y + height - r), n, &mut points);
        close_ring(points)
    }

    fn contains(&self, p: Point) -> bool {
        if self.width <= 0.0 || self.height <= 0.0 {
            return false;
        }
        let (left, top) = (self.x, self.y);
        let (right, bottom) = (self.x + self.width, self.y + self.height);
        if p.x < left || p.x > right || p.y < top || p.y > bottom {
            return false;
        }
        let r = self.effective_radius();
        let in_band = (p.y >= top + r && p.y <= bottom - r) || (p.x >= left + r && p.x <= right - r);
        if in_band {
            return true;
        }
        [
            pt(left + r, top + r),
            pt(right - r, top + r),
            pt(right - r, bottom - r),
            pt(left + r, bottom - r),
        ]
        .iter()
        .any(|&corner| (p - corner).length_squared() <= r * r)
    }
}

// ============================================================================
// Circle and ellipse
// ============================================================================

/// Sample count for an elliptical outline, rounded up to a multiple of four
/// so the axis extremes are always vertices.
///
/// Capped at `ARC_MAX_SEGMENTS`; a non-finite size takes the cap.
fn ellipse_segments(size: f64) -> usize {
    let cap = defaults::ARC_MAX_SEGMENTS;
    let raw = (size.sqrt() / 2.3).ceil();
    let raw = if raw.is_finite() { (raw.max(2.0) as usize).min(cap) } else { cap };
    raw.div_ceil(4) * 4
}

fn ellipse_outline(center: Point, rx: f64, ry: f64, segments: usize) -> Vec<Point> {
    if rx == 0.0 || ry == 0.0 {
        return Vec::new();
    }
    let mut points: Vec<Point> = (0..segments)
        .map(|i| {
            let angle = TAU * i as f64 / segments as f64;
            center + pt(angle.cos() * rx, angle.sin() * ry)
        })
        .collect();
    if let Some(&first) = points.first() {
        points.push(first);
    }
    points
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl Circle {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Circle { x, y, radius }
    }
}

impl ShapeOutline for Circle {
    fn outline(&self) -> Vec<Point> {
        let segments = ellipse_segments(900.0 * self.radius.abs());
        ellipse_outline(pt(self.x, self.y), self.radius, self.radius, segments)
    }

    fn contains(&self, p: Point) -> bool {
        if self.radius <= 0.0 {
            return false;
        }
        (p - pt(self.x, self.y)).length_squared() <= self.radius * self.radius
    }
}

/// Axis-aligned ellipse; `half_width`/`half_height` are the semi-axes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ellipse {
    pub x: f64,
    pub y: f64,
    pub half_width: f64,
    pub half_height: f64,
}

impl Ellipse {
    pub fn new(x: f64, y: f64, half_width: f64, half_height: f64) -> Self {
        Ellipse {
            x,
            y,
            half_width,
            half_height,
        }
    }
}

impl ShapeOutline for Ellipse {
    fn outline(&self) -> Vec<Point> {
        let segments = ellipse_segments(225.0 * (self.half_width.abs() + self.half_height.abs()));
        ellipse_outline(pt(self.x, self.y), self.half_width, self.half_height, segments)
    }

    fn contains(&self, p: Point) -> bool {
        if self.half_width <= 0.0 || self.half_height <= 0.0 {
            return false;
        }
        let nx = (p.x - self.x) / self.half_width;
        let ny = (p.y - self.y) / self.half_height;
        nx * nx + ny * ny <= 1.0
    }
}

// ============================================================================
// Polygon
// ============================================================================

/// Arbitrary polyline. Paths built with `move_to`/`line_to` land here with
/// `close_stroke` unset; `draw_polygon` and stars set it.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Polygon {
    pub points: Vec<Point>,
    pub close_stroke: bool,
}

impl Polygon {
    pub fn new(points: Vec<Point>, close_stroke: bool) -> Self {
        Polygon { points, close_stroke }
    }

    /// Build from interleaved `x, y` coordinates; a trailing odd value is ignored.
    pub fn from_flat(coords: &[f64], close_stroke: bool) -> Self {
        let points = coords.chunks_exact(2).map(|c| pt(c[0], c[1])).collect();
        Polygon::new(points, close_stroke)
    }

    /// A star with `count` tips alternating between `radius` and `inner_radius`.
    ///
    /// An `inner_radius` of zero uses half of `radius`. The first tip points up
    /// (negative y) before `rotation` is applied.
    pub fn star(center: Point, count: u32, radius: f64, inner_radius: f64, rotation: f64) -> Self {
        let inner = if inner_radius == 0.0 { radius / 2.0 } else { inner_radius };
        let start = -FRAC_PI_2 + rotation;
        let len = count as usize * 2;
        let delta = TAU / len as f64;
        let points = (0..len)
            .map(|i| {
                let r = if i % 2 == 1 { inner } else { radius };
                let angle = i as f64 * delta + start;
                center + pt(r * angle.cos(), r * angle.sin())
            })
            .collect();
        Polygon::new(points, true)
    }

    /// Flatten back to interleaved coordinates.
    pub fn flat(&self) -> Vec<f64> {
        self.points.iter().flat_map(|p| [p.x, p.y]).collect()
    }
}

impl ShapeOutline for Polygon {
    fn outline(&self) -> Vec<Point> {
        if self.close_stroke {
            close_ring(self.points.clone())
        } else {
            self.points.clone()
        }
    }

    /// Even-odd ray casting; the ring closes implicitly.
    fn contains(&self, p: Point) -> bool {
        let pts = &self.points;
        let mut inside = false;
        let mut j = pts.len().wrapping_sub(1);
        for i in 0..pts.len() {
            let (pi, pj) = (pts[i], pts[j]);
            if (pi.y > p.y) != (pj.y > p.y) && p.x < (pj.x - pi.x) * ((p.y - pi.y) / (pj.y - pi.y)) + pi.x {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    fn closes_stroke(&self) -> bool {
        self.close_stroke
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_point_eq(actual: Point, expected: Point) {
        const EPSILON: f64 = 1e-10;
        assert!(
            (actual - expected).length() < EPSILON,
            "point mismatch: {actual} != {expected}"
        );
    }

    #[test]
    fn rectangle_outline_is_closed() {
        let outline = Shape::from(Rectangle::new(0.0, 0.0, 10.0, 5.0)).outline();
        assert_eq!(
            outline,
            vec![pt(0.0, 0.0), pt(10.0, 0.0), pt(10.0, 5.0), pt(0.0, 5.0), pt(0.0, 0.0)]
        );
    }

    #[test]
    fn rectangle_contains_is_half_open() {
        let rect = Rectangle::new(0.0, 0.0, 10.0, 10.0);
        assert!(rect.contains(pt(0.0, 0.0)));
        assert!(rect.contains(pt(1.0, 1.0)));
        assert!(!rect.contains(pt(10.0, 5.0)));
        assert!(!rect.contains(pt(5.0, 10.0)));
        assert!(!Rectangle::new(0.0, 0.0, 0.0, 10.0).contains(pt(0.0, 1.0)));
    }

    #[test]
    fn circle_outline_has_no_gap() {
        let outline = Circle::new(100.0, 100.0, 30.0).outline();
        assert!(outline.len() > 8);
        assert_eq!(outline.first(), outline.last());
        for p in &outline {
            assert!(((*p - pt(100.0, 100.0)).length() - 30.0).abs() < 1e-9);
        }
    }

    #[test]
    fn circle_outline_reaches_axis_extremes() {
        let outline = Circle::new(50.0, 50.0, 50.0).outline();
        let max_x = outline.iter().map(|p| p.x).fold(f64::MIN, f64::max);
        let min_y = outline.iter().map(|p| p.y).fold(f64::MAX, f64::min);
        assert!((max_x - 100.0).abs() < 1e-9);
        assert!(min_y.abs() < 1e-9);
    }

    #[test]
    fn degenerate_circle_has_no_outline() {
        assert!(Circle::new(0.0, 0.0, 0.0).outline().is_empty());
        assert!(Ellipse::new(0.0, 0.0, 5.0, 0.0).outline().is_empty());
    }

    #[test]
    fn huge_radius_outline_is_capped() {
        let cap = defaults::ARC_MAX_SEGMENTS + 1;
        assert_eq!(Circle::new(0.0, 0.0, 1.0e20).outline().len(), cap);
        assert_eq!(Circle::new(0.0, 0.0, f64::INFINITY).outline().len(), cap);
        assert_eq!(Ellipse::new(0.0, 0.0, f64::NAN, 4.0).outline().len(), cap);
        assert_eq!(ellipse_segments(f64::INFINITY) % 4, 0);
    }

    #[test]
    fn ellipse_contains() {
        let e = Ellipse::new(0.0, 0.0, 20.0, 10.0);
        assert!(e.contains(pt(19.0, 0.0)));
        assert!(!e.contains(pt(0.0, 11.0)));
    }

    #[test]
    fn rounded_rect_corners() {
        let rr = RoundedRectangle::new(0.0, 0.0, 100.0, 50.0, 10.0);
        assert!(rr.contains(pt(50.0, 1.0)));
        assert!(rr.contains(pt(3.0, 3.0)));
        // corner cut away
        assert!(!rr.contains(pt(0.5, 0.5)));

        let outline = rr.outline();
        assert_eq!(outline.first(), outline.last());
        assert_point_eq(outline[0], pt(0.0, 10.0));
        assert_point_eq(outline[20], pt(10.0, 0.0));
    }

    #[test]
    fn rounded_rect_radius_is_clamped() {
        let rr = RoundedRectangle::new(0.0, 0.0, 10.0, 4.0, 15.0);
        assert_eq!(rr.effective_radius(), 2.0);
        let square = RoundedRectangle::new(0.0, 0.0, 10.0, 10.0, 0.0);
        assert_eq!(square.outline().len(), 5);
    }

    #[test]
    fn polygon_contains_even_odd() {
        let square = Polygon::from_flat(&[0.0, 0.0, 10.0, 0.0, 10.0, 10.0, 0.0, 10.0], false);
        assert!(square.contains(pt(5.0, 5.0)));
        assert!(!square.contains(pt(15.0, 5.0)));

        // self-overlapping pentagram leaves its center outside
        let star = Polygon::star(pt(0.0, 0.0), 5, 10.0, 10.0, 0.0);
        let pentagram: Vec<Point> = (0..5).map(|i| star.points[(i * 4) % 10]).collect();
        let pentagram = Polygon::new(pentagram, true);
        assert!(!pentagram.contains(pt(0.0, 0.0)));
    }

    #[test]
    fn empty_polygon_contains_nothing() {
        assert!(!Polygon::default().contains(pt(0.0, 0.0)));
    }

    #[test]
    fn star_points_alternate() {
        let star = Polygon::star(pt(0.0, 0.0), 4, 10.0, 0.0, 0.0);
        assert_eq!(star.points.len(), 8);
        assert_point_eq(star.points[0], pt(0.0, -10.0));
        assert!((star.points[1].length() - 5.0).abs() < 1e-10);
        assert!(star.closes_stroke());
    }

    #[test]
    fn open_polygon_outline_is_unchanged() {
        let poly = Polygon::from_flat(&[50.0, 50.0, 250.0, 50.0], false);
        assert_eq!(poly.outline(), vec![pt(50.0, 50.0), pt(250.0, 50.0)]);
        assert_eq!(poly.flat(), vec![50.0, 50.0, 250.0, 50.0]);
    }
}
