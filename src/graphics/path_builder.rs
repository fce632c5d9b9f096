//! Path builder for incremental drawing commands.
//!
//! This module implements the state machine behind `move_to`/`line_to` and
//! the implicit path splits caused by style changes.
//!
//! # Key Concepts
//!
//! - **State**: either no path is open, or one path is open and accumulating
//!   points. Emitting a path is the transition out of the open state.
//!
//! - **Cursor**: the last point issued. `line_to` and curves with no open path
//!   start from it, so a render or style change between two `line_to` calls
//!   never loses continuity.
//!
//! - **Duplicate suppression**: a point equal to the last stored point is
//!   dropped, so an open path never holds two identical consecutive points.
//!
//! - **Emission**: a path is only emitted with at least two points. Shorter
//!   paths are discarded by `move_to` and `finish`, but survive a style
//!   `restart` so `move_to(..); line_style(..); line_to(..)` still draws.

use crate::types::{Point, pt};

/// Whether a path is open, and its points if so.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PathState {
    #[default]
    NoPath,
    Open(Vec<Point>),
}

/// Builder for sub-paths issued through the drawing API.
///
/// ```ignore
/// let mut builder = PathBuilder::new();
/// builder.move_to(pt(0.0, 0.0));
/// builder.line_to(pt(10.0, 0.0));
/// builder.line_to(pt(10.0, 0.0)); // duplicate, dropped
/// let emitted = builder.finish();
/// // emitted = Some([(0, 0), (10, 0)])
/// ```
#[derive(Debug, Clone, Default)]
pub struct PathBuilder {
    state: PathState,
    cursor: Point,
    hole_mode: bool,
}

impl PathBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &PathState {
        &self.state
    }

    /// Points of the open path, if any.
    pub fn current(&self) -> Option<&[Point]> {
        match &self.state {
            PathState::NoPath => None,
            PathState::Open(points) => Some(points),
        }
    }

    pub fn cursor(&self) -> Point {
        self.cursor
    }

    pub fn last_point(&self) -> Option<Point> {
        self.current().and_then(|points| points.last().copied())
    }

    pub fn is_hole_mode(&self) -> bool {
        self.hole_mode
    }

    pub fn set_hole_mode(&mut self, hole_mode: bool) {
        self.hole_mode = hole_mode;
    }

    /// Start a new path at `p`, emitting the previous one if it is long enough.
    pub fn move_to(&mut self, p: Point) -> Option<Vec<Point>> {
        let emitted = self.take_emittable();
        self.state = PathState::Open(vec![p]);
        self.cursor = p;
        emitted
    }

    /// Append `p`, opening a path at the cursor if none is open.
    pub fn line_to(&mut self, p: Point) {
        self.push_point(p);
    }

    /// Make sure a path is open, starting at the cursor.
    pub fn ensure_open(&mut self) {
        if self.state == PathState::NoPath {
            self.state = PathState::Open(vec![self.cursor]);
        }
    }

    /// Duplicate-suppressing append.
    pub fn push_point(&mut self, p: Point) {
        match &mut self.state {
            PathState::Open(points) => {
                if points.last() != Some(&p) {
                    points.push(p);
                }
            }
            PathState::NoPath => {
                let mut points = vec![self.cursor];
                if self.cursor != p {
                    points.push(p);
                }
                self.state = PathState::Open(points);
            }
        }
        self.cursor = p;
    }

    pub fn extend(&mut self, points: impl IntoIterator<Item = Point>) {
        for p in points {
            self.push_point(p);
        }
    }

    /// Close the open path. Returns it when it has at least two points.
    pub fn finish(&mut self) -> Option<Vec<Point>> {
        let emitted = self.take_emittable();
        self.state = PathState::NoPath;
        emitted
    }

    /// Split the path at its last point, as a style change does.
    ///
    /// A path with two or more points is emitted and a new one reopens on its
    /// last point. A single-point path is kept open untouched.
    pub fn restart(&mut self) -> Option<Vec<Point>> {
        let last = self.last_point()?;
        let emitted = self.take_emittable();
        if emitted.is_some() {
            self.state = PathState::Open(vec![last]);
        }
        emitted
    }

    /// Drop everything and return the cursor to the origin.
    pub fn clear(&mut self) {
        self.state = PathState::NoPath;
        self.cursor = pt(0.0, 0.0);
        self.hole_mode = false;
    }

    fn take_emittable(&mut self) -> Option<Vec<Point>> {
        match std::mem::take(&mut self.state) {
            PathState::Open(points) if points.len() >= 2 => Some(points),
            other => {
                self.state = other;
                None
            }
        }
    }
}
