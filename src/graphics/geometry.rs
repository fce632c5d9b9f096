//! Datum list and the tessellated buffers built from it.
//!
//! Every mutation bumps the dirty id. Buffers and local bounds are memoized
//! on that id, so asking for them twice between mutations never re-tessellates.

use crate::bounds::Bounds;
use crate::log::debug;
use crate::memo::Memo;
use crate::target::DrawMode;
use crate::types::{Matrix, Point, premultiply};

use super::fill::tessellate_fill;
use super::settings::TessellationSettings;
use super::shapes::{Shape, ShapeOutline};
use super::stroke::tessellate_stroke;
use super::style::{FillStyle, LineStyle};

// ============================================================================
// Datums
// ============================================================================

/// A shape cut out of a datum's fill.
#[derive(Clone, Debug, PartialEq)]
pub struct Hole {
    pub shape: Shape,
    pub points: Vec<Point>,
}

impl Hole {
    pub fn new(shape: Shape) -> Self {
        let points = shape.outline();
        Hole { shape, points }
    }
}

/// One emitted path or shape with the styles active when it was drawn.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphicsDatum {
    pub shape: Shape,
    pub fill: FillStyle,
    pub line: LineStyle,
    pub holes: Vec<Hole>,
    /// Built outline of `shape`.
    pub points: Vec<Point>,
}

impl GraphicsDatum {
    pub fn new(shape: Shape, fill: FillStyle, line: LineStyle) -> Self {
        let points = shape.outline();
        GraphicsDatum {
            shape,
            fill,
            line,
            holes: Vec::new(),
            points,
        }
    }
}

// ============================================================================
// Built buffers
// ============================================================================

/// A contiguous run of indices drawn with one mode and one style color.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BatchPart {
    pub mode: DrawMode,
    /// First index in [`BuiltGeometry::indices`].
    pub start: usize,
    pub size: usize,
    pub color: u32,
    pub alpha: f64,
}

impl BatchPart {
    pub fn range(&self) -> std::ops::Range<usize> {
        self.start..self.start + self.size
    }
}

/// Flat vertex, uv, color and index buffers for the whole geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuiltGeometry {
    /// Interleaved x/y in local space.
    pub points: Vec<f32>,
    pub uvs: Vec<f32>,
    /// Premultiplied RGBA, four floats per vertex.
    pub colors: Vec<f32>,
    pub indices: Vec<u32>,
    pub batches: Vec<BatchPart>,
}

impl BuiltGeometry {
    pub fn vertex_count(&self) -> usize {
        self.points.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Whether any part is drawn as a one-pixel line list.
    pub fn has_native_lines(&self) -> bool {
        self.batches.iter().any(|b| b.mode == DrawMode::Lines)
    }

    pub fn vertex(&self, index: usize) -> Option<Point> {
        let x = *self.points.get(index * 2)?;
        let y = *self.points.get(index * 2 + 1)?;
        Some(Point::new(x as f64, y as f64))
    }

    fn push_part(
        &mut self,
        mode: DrawMode,
        vertices: &[Point],
        indices: &[u32],
        color: u32,
        alpha: f64,
        uv_matrix: Option<&Matrix>,
    ) {
        if indices.is_empty() {
            return;
        }
        let base = self.vertex_count() as u32;
        let rgba = premultiply(color, alpha);
        for &p in vertices {
            self.points.extend([p.x as f32, p.y as f32]);
            let uv = uv_matrix.map_or(Point::ZERO, |m| m.apply(p));
            self.uvs.extend([uv.x as f32, uv.y as f32]);
            self.colors.extend(rgba);
        }

        let start = self.indices.len();
        self.indices.extend(indices.iter().map(|i| i + base));

        // merge with the previous run when nothing about the draw changes
        if let Some(last) = self.batches.last_mut() {
            if last.mode == mode && last.color == color && last.alpha == alpha && last.range().end == start {
                last.size += indices.len();
                return;
            }
        }
        self.batches.push(BatchPart {
            mode,
            start,
            size: indices.len(),
            color,
            alpha,
        });
    }
}

/// Tessellate every datum, fills before strokes within each datum.
pub fn build(datums: &[GraphicsDatum], settings: &TessellationSettings) -> BuiltGeometry {
    let eps = settings.close_point_eps;
    let mut built = BuiltGeometry::default();

    for datum in datums {
        if datum.points.is_empty() {
            continue;
        }
        if datum.fill.is_drawn() {
            let holes: Vec<&[Point]> = datum.holes.iter().map(|h| h.points.as_slice()).collect();
            let fill = tessellate_fill(&datum.points, &holes, eps);
            built.push_part(
                DrawMode::Triangles,
                &fill.vertices,
                &fill.indices,
                datum.fill.color,
                datum.fill.alpha,
                datum.fill.matrix.as_ref(),
            );
        }
        if datum.line.visible() {
            let stroke = tessellate_stroke(&datum.points, &datum.line, eps);
            built.push_part(
                stroke.mode,
                &stroke.vertices,
                &stroke.indices,
                datum.line.color,
                datum.line.alpha,
                None,
            );
        }
    }

    debug!(
        datums = datums.len(),
        vertices = built.vertex_count(),
        indices = built.indices.len(),
        batches = built.batches.len(),
        "rebuilt graphics geometry"
    );
    built
}

// ============================================================================
// Geometry
// ============================================================================

/// Owned datums plus their memoized tessellation.
#[derive(Debug, Clone, Default)]
pub struct GraphicsGeometry {
    datums: Vec<GraphicsDatum>,
    dirty: u64,
    settings: TessellationSettings,
    built: Memo<u64, BuiltGeometry>,
    bounds: Memo<u64, Bounds>,
    builds: u64,
    bounds_scans: u64,
}

impl GraphicsGeometry {
    pub fn new(settings: TessellationSettings) -> Self {
        GraphicsGeometry {
            settings,
            ..Self::default()
        }
    }

    pub fn datums(&self) -> &[GraphicsDatum] {
        &self.datums
    }

    pub fn settings(&self) -> &TessellationSettings {
        &self.settings
    }

    /// Bumped on every mutation.
    pub fn dirty(&self) -> u64 {
        self.dirty
    }

    pub fn is_empty(&self) -> bool {
        self.datums.is_empty()
    }

    pub fn invalidate(&mut self) {
        self.dirty += 1;
    }

    pub fn push_datum(&mut self, datum: GraphicsDatum) {
        self.datums.push(datum);
        self.invalidate();
    }

    /// Attach `hole` to the most recent datum.
    ///
    /// Returns `false`, leaving everything untouched, when there is no datum.
    pub fn add_hole(&mut self, hole: Hole) -> bool {
        let Some(last) = self.datums.last_mut() else {
            return false;
        };
        last.holes.push(hole);
        self.invalidate();
        true
    }

    pub fn clear(&mut self) {
        self.datums.clear();
        self.invalidate();
    }

    /// Tessellated buffers for the current dirty id.
    pub fn built(&mut self) -> &BuiltGeometry {
        let Self {
            datums,
            settings,
            built,
            builds,
            dirty,
            ..
        } = self;
        built.get_or_update(*dirty, || {
            *builds += 1;
            build(datums, settings)
        })
    }

    /// Bounds of the tessellated vertices in local space.
    pub fn local_bounds(&mut self) -> Bounds {
        let dirty = self.dirty;
        self.built();
        let Self {
            built,
            bounds,
            bounds_scans,
            ..
        } = self;
        *bounds.get_or_update(dirty, || {
            *bounds_scans += 1;
            let mut out = Bounds::new();
            if let Some(built) = built.get(dirty) {
                out.add_vertex_data(&built.points, 2, None);
            }
            out
        })
    }

    /// How many times the buffers were tessellated.
    pub fn build_count(&self) -> u64 {
        self.builds
    }

    /// How many times local bounds were scanned from the vertex buffer.
    pub fn bounds_scan_count(&self) -> u64 {
        self.bounds_scans
    }
}
