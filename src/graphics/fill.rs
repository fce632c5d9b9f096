//! Fill triangulation.
//!
//! Outlines and their holes are flattened into one coordinate buffer and
//! handed to earcut. Degenerate rings are dropped before triangulation, and a
//! triangulation failure yields an empty fill instead of an error.

use earcutr::earcut;

use crate::log::warn;
use crate::types::Point;

use super::defaults;

/// Triangulated fill for one datum.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FillGeometry {
    /// Outline points followed by every kept hole's points.
    pub vertices: Vec<Point>,
    /// Triangle list into `vertices`.
    pub indices: Vec<u32>,
}

impl FillGeometry {
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Drop near-duplicate neighbors and any closing repeat of the first point.
pub fn normalize_ring(points: &[Point], eps: f64) -> Vec<Point> {
    let near = |a: Point, b: Point| (a - b).abs().max_element() < eps;
    let mut ring: Vec<Point> = Vec::with_capacity(points.len());
    for &p in points {
        if ring.last().is_none_or(|&last| !near(last, p)) {
            ring.push(p);
        }
    }
    while ring.len() >= 2 && near(ring[0], ring[ring.len() - 1]) {
        ring.pop();
    }
    ring
}

/// Shoelace area, positive for counter-clockwise rings in y-up space.
pub fn signed_area(ring: &[Point]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n).map(|i| ring[i].perp_dot(ring[(i + 1) % n])).sum();
    twice / 2.0
}

fn is_fillable(ring: &[Point]) -> bool {
    ring.len() >= 3 && ring.iter().all(|p| p.is_finite()) && signed_area(ring).abs() >= defaults::AREA_EPS
}

/// Triangulate `outline` minus `holes`.
pub fn tessellate_fill<H: AsRef<[Point]>>(outline: &[Point], holes: &[H], eps: f64) -> FillGeometry {
    let outer = normalize_ring(outline, eps);
    if !is_fillable(&outer) {
        return FillGeometry::default();
    }

    let mut vertices = outer;
    let mut hole_starts = Vec::with_capacity(holes.len());
    for hole in holes {
        let ring = normalize_ring(hole.as_ref(), eps);
        if !is_fillable(&ring) {
            continue;
        }
        hole_starts.push(vertices.len());
        vertices.extend(ring);
    }

    let coords: Vec<f64> = vertices.iter().flat_map(|p| [p.x, p.y]).collect();
    let indices = match earcut(&coords, &hole_starts, 2) {
        Ok(indices) => indices.into_iter().map(|i| i as u32).collect(),
        Err(_err) => {
            warn!(error = ?_err, vertices = vertices.len(), "fill triangulation failed");
            Vec::new()
        }
    };

    FillGeometry { vertices, indices }
}
