//! Default styles and tessellation settings

/// Fill color used until `begin_fill` picks one.
pub const FILL_COLOR: u32 = 0xFFFFFF;
pub const LINE_COLOR: u32 = 0x000000;
pub const ALPHA: f64 = 1.0;
pub const LINE_WIDTH: f64 = 0.0;
/// Centered stroke.
pub const LINE_ALIGNMENT: f64 = 0.5;
pub const MITER_LIMIT: f64 = 10.0;

/// Geometry with fewer vertices than this goes through the batcher.
pub const BATCHABLE_SIZE: usize = 100;

/// Two points closer than this are treated as the same point.
pub const CLOSE_POINT_EPS: f64 = 1e-4;
/// Turn sine below which two segments count as parallel.
pub const PARALLEL_EPS: f64 = 1e-6;
/// Polygons with a smaller absolute area are not filled.
pub const AREA_EPS: f64 = 1e-9;
/// Cross product threshold under which `arc_to` degrades to a line.
pub const ARC_TO_EPS: f64 = 1e-8;

// Curve flattening
pub const CURVE_TOLERANCE: f64 = 0.05;
pub const CURVE_MAX_DEPTH: u32 = 10;
pub const ARC_MAX_LENGTH: f64 = 10.0;
pub const ARC_MIN_SEGMENTS: usize = 8;
pub const ARC_MAX_SEGMENTS: usize = 2048;
/// Segments per full turn when adaptive arcs are off.
pub const ARC_FIXED_SEGMENTS: usize = 40;

// Shape outlines
/// Samples per corner of a rounded rectangle.
pub const ROUNDED_CORNER_SEGMENTS: usize = 20;
