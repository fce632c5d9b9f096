//! Vector drawing surface.
//!
//! [`Graphics`] records path commands and shape primitives into a list of
//! [`GraphicsDatum`]s, then tessellates them lazily on render, bounds
//! queries or an explicit [`Graphics::update_geometry`].
//!
//! ```ignore
//! let mut g = Graphics::new();
//! g.begin_fill(0xFF0000, 1.0)
//!     .line_style(2.0, 0x000000, 1.0)
//!     .draw_rect(0.0, 0.0, 100.0, 50.0)
//!     .end_fill();
//! assert!(g.contains_point(pt(10.0, 10.0)));
//! ```

pub mod curves;
pub mod defaults;
pub mod fill;
pub mod geometry;
pub mod path_builder;
pub mod settings;
pub mod shapes;
pub mod stroke;
pub mod style;

use crate::bounds::Bounds;
use crate::errors::RenderError;
use crate::log::{trace, warn};
use crate::memo::Memo;
use crate::target::{BlendMode, DrawCall, DrawTarget};
use crate::types::{Matrix, Point, pt};

use curves::{Arc, ArcTo};
use geometry::{BuiltGeometry, GraphicsDatum, GraphicsGeometry, Hole};
use path_builder::PathBuilder;
use settings::TessellationSettings;
use shapes::{Circle, Ellipse, Polygon, Rectangle, RoundedRectangle, Shape};
use style::{FillStyle, LineCap, LineJoin, LineStyle};

/// Owner of drawing commands, styles and the resulting geometry.
#[derive(Debug, Clone)]
pub struct Graphics {
    builder: PathBuilder,
    fill: FillStyle,
    line: LineStyle,
    geometry: GraphicsGeometry,
    settings: TessellationSettings,
    transform: Matrix,
    transform_id: u64,
    world_bounds: Memo<(u64, u64), Bounds>,
    tint: u32,
    alpha: f64,
    blend_mode: BlendMode,
}

impl Default for Graphics {
    fn default() -> Self {
        Self::new()
    }
}

impl Graphics {
    pub fn new() -> Self {
        Self::with_settings(TessellationSettings::default())
    }

    pub fn with_settings(settings: TessellationSettings) -> Self {
        Graphics {
            builder: PathBuilder::new(),
            fill: FillStyle::default(),
            line: LineStyle::default(),
            geometry: GraphicsGeometry::new(settings),
            settings,
            transform: Matrix::IDENTITY,
            transform_id: 0,
            world_bounds: Memo::new(),
            tint: 0xFFFFFF,
            alpha: 1.0,
            blend_mode: BlendMode::Normal,
        }
    }

    // ------------------------------------------------------------------------
    // Styles
    // ------------------------------------------------------------------------

    pub fn current_fill_style(&self) -> &FillStyle {
        &self.fill
    }

    pub fn current_line_style(&self) -> &LineStyle {
        &self.line
    }

    /// Set the stroke for subsequent drawing. Other line settings reset to defaults.
    pub fn line_style(&mut self, width: f64, color: u32, alpha: f64) -> &mut Self {
        self.set_line_style(LineStyle {
            width,
            color,
            alpha,
            ..LineStyle::default()
        })
    }

    /// Replace the whole line style; out-of-range values are clamped.
    pub fn set_line_style(&mut self, style: LineStyle) -> &mut Self {
        self.restart_path();
        self.line = style.sanitized();
        self
    }

    pub fn set_line_join(&mut self, join: LineJoin) -> &mut Self {
        let style = LineStyle {
            join,
            ..self.line.clone()
        };
        self.set_line_style(style)
    }

    pub fn set_line_cap(&mut self, cap: LineCap) -> &mut Self {
        let style = LineStyle {
            cap,
            ..self.line.clone()
        };
        self.set_line_style(style)
    }

    pub fn set_miter_limit(&mut self, miter_limit: f64) -> &mut Self {
        let style = LineStyle {
            miter_limit,
            ..self.line.clone()
        };
        self.set_line_style(style)
    }

    pub fn begin_fill(&mut self, color: u32, alpha: f64) -> &mut Self {
        self.set_fill_style(FillStyle::solid(color, alpha))
    }

    /// Fill with a full style, including a uv matrix.
    pub fn set_fill_style(&mut self, style: FillStyle) -> &mut Self {
        self.restart_path();
        self.fill = style;
        self
    }

    pub fn end_fill(&mut self) -> &mut Self {
        self.restart_path();
        self.fill = FillStyle::default();
        self
    }

    // ------------------------------------------------------------------------
    // Path commands
    // ------------------------------------------------------------------------

    pub fn move_to(&mut self, x: f64, y: f64) -> &mut Self {
        if let Some(points) = self.builder.move_to(pt(x, y)) {
            self.emit_path(points);
        }
        self
    }

    pub fn line_to(&mut self, x: f64, y: f64) -> &mut Self {
        self.builder.line_to(pt(x, y));
        self
    }

    pub fn quadratic_curve_to(&mut self, cpx: f64, cpy: f64, x: f64, y: f64) -> &mut Self {
        let from = self.path_start();
        let mut points = Vec::new();
        curves::flatten_quadratic(from, pt(cpx, cpy), pt(x, y), &self.settings.curves, &mut points);
        self.builder.extend(points);
        self
    }

    pub fn bezier_curve_to(
        &mut self,
        cp1x: f64,
        cp1y: f64,
        cp2x: f64,
        cp2y: f64,
        x: f64,
        y: f64,
    ) -> &mut Self {
        let from = self.path_start();
        let mut points = Vec::new();
        curves::flatten_cubic(
            from,
            pt(cp1x, cp1y),
            pt(cp2x, cp2y),
            pt(x, y),
            &self.settings.curves,
            &mut points,
        );
        self.builder.extend(points);
        self
    }

    /// Round a corner from the current point through `(x1, y1)` toward `(x2, y2)`.
    pub fn arc_to(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, radius: f64) -> &mut Self {
        let from = self.path_start();
        match curves::arc_to(from, pt(x1, y1), pt(x2, y2), radius) {
            ArcTo::Line(corner) => {
                self.builder.push_point(corner);
                self
            }
            ArcTo::Arc {
                center,
                radius,
                start,
                end,
                anticlockwise,
            } => self.arc(center.x, center.y, radius, start, end, anticlockwise),
        }
    }

    /// Canvas-style arc. Equal angles or a zero sweep draw nothing.
    pub fn arc(
        &mut self,
        cx: f64,
        cy: f64,
        radius: f64,
        start: f64,
        end: f64,
        anticlockwise: bool,
    ) -> &mut Self {
        let Some(arc) = Arc::new(pt(cx, cy), radius, start, end, anticlockwise) else {
            return self;
        };
        let start_point = arc.start_point();
        match self.builder.last_point() {
            Some(last) => {
                let eps = self.settings.close_point_eps;
                let gap = (last - start_point).abs();
                if gap.x >= eps || gap.y >= eps {
                    self.builder.push_point(start_point);
                }
            }
            None => {
                self.move_to(start_point.x, start_point.y);
            }
        }
        let mut points = Vec::new();
        arc.flatten(&self.settings.curves, &mut points);
        self.builder.extend(points);
        self
    }

    // ------------------------------------------------------------------------
    // Shape primitives
    // ------------------------------------------------------------------------

    pub fn draw_rect(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.draw_shape(Rectangle::new(x, y, width, height).into())
    }

    pub fn draw_rounded_rect(&mut self, x: f64, y: f64, width: f64, height: f64, radius: f64) -> &mut Self {
        self.draw_shape(RoundedRectangle::new(x, y, width, height, radius).into())
    }

    pub fn draw_circle(&mut self, x: f64, y: f64, radius: f64) -> &mut Self {
        self.draw_shape(Circle::new(x, y, radius).into())
    }

    /// `width` and `height` are the semi-axes.
    pub fn draw_ellipse(&mut self, x: f64, y: f64, width: f64, height: f64) -> &mut Self {
        self.draw_shape(Ellipse::new(x, y, width, height).into())
    }

    /// Closed polygon from interleaved `x, y` coordinates.
    pub fn draw_polygon(&mut self, coords: &[f64]) -> &mut Self {
        self.draw_shape(Polygon::from_flat(coords, true).into())
    }

    pub fn draw_star(
        &mut self,
        x: f64,
        y: f64,
        points: u32,
        radius: f64,
        inner_radius: f64,
        rotation: f64,
    ) -> &mut Self {
        self.draw_shape(Polygon::star(pt(x, y), points, radius, inner_radius, rotation).into())
    }

    /// Draw any shape under the current styles, or cut it as a hole.
    ///
    /// Shapes without an outline, such as a zero-radius circle, are discarded.
    pub fn draw_shape(&mut self, shape: Shape) -> &mut Self {
        self.finish_path();
        self.push_shape(shape);
        self
    }

    // ------------------------------------------------------------------------
    // Holes and reset
    // ------------------------------------------------------------------------

    /// Following paths and shapes cut holes in the most recent datum.
    pub fn begin_hole(&mut self) -> &mut Self {
        self.restart_path();
        self.builder.set_hole_mode(true);
        self
    }

    pub fn end_hole(&mut self) -> &mut Self {
        self.restart_path();
        self.builder.set_hole_mode(false);
        self
    }

    pub fn is_hole_mode(&self) -> bool {
        self.builder.is_hole_mode()
    }

    /// Drop every datum, the open path and all styles.
    pub fn clear(&mut self) -> &mut Self {
        self.builder.clear();
        self.geometry.clear();
        self.fill = FillStyle::default();
        self.line = LineStyle::default();
        self
    }

    /// Emit the open path, if it has at least two points.
    pub fn finish_path(&mut self) -> &mut Self {
        if let Some(points) = self.builder.finish() {
            self.emit_path(points);
        }
        self
    }

    fn restart_path(&mut self) {
        if let Some(points) = self.builder.restart() {
            self.emit_path(points);
        }
    }

    fn emit_path(&mut self, points: Vec<Point>) {
        trace!(points = points.len(), hole = self.builder.is_hole_mode(), "emit path");
        self.push_shape(Polygon::new(points, false).into());
    }

    /// Store `shape` as a datum, or as a hole in hole mode. Empty outlines are dropped.
    fn push_shape(&mut self, shape: Shape) {
        if self.builder.is_hole_mode() {
            let hole = Hole::new(shape);
            if hole.points.is_empty() {
                trace!("empty hole outline, discarding");
            } else if !self.geometry.add_hole(hole) {
                warn!("hole drawn before any shape, dropping it");
            }
        } else {
            let datum = GraphicsDatum::new(shape, self.fill.clone(), self.line.clone());
            if datum.points.is_empty() {
                trace!("empty shape outline, discarding");
            } else {
                self.geometry.push_datum(datum);
            }
        }
    }

    /// Start point for a curve command, opening a path at the cursor if needed.
    fn path_start(&mut self) -> Point {
        self.builder.ensure_open();
        self.builder.last_point().unwrap_or(self.builder.cursor())
    }

    // ------------------------------------------------------------------------
    // Display state
    // ------------------------------------------------------------------------

    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    /// Set the local-to-world transform fed in by the host.
    pub fn set_transform(&mut self, transform: Matrix) -> &mut Self {
        if transform != self.transform {
            self.transform = transform;
            self.transform_id += 1;
        }
        self
    }

    pub fn transform_id(&self) -> u64 {
        self.transform_id
    }

    pub fn tint(&self) -> u32 {
        self.tint
    }

    pub fn set_tint(&mut self, tint: u32) -> &mut Self {
        self.tint = tint;
        self
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn set_alpha(&mut self, alpha: f64) -> &mut Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn blend_mode(&self) -> BlendMode {
        self.blend_mode
    }

    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) -> &mut Self {
        self.blend_mode = blend_mode;
        self
    }

    // ------------------------------------------------------------------------
    // Queries
    // ------------------------------------------------------------------------

    /// Every emitted datum, excluding the open path.
    pub fn graphics_data(&self) -> &[GraphicsDatum] {
        self.geometry.datums()
    }

    /// Points of the path still being built.
    pub fn current_path(&self) -> Option<&[Point]> {
        self.builder.current()
    }

    pub fn dirty(&self) -> u64 {
        self.geometry.dirty()
    }

    pub fn settings(&self) -> &TessellationSettings {
        &self.settings
    }

    /// The datum store, for inspecting memo counters.
    pub fn graphics_geometry(&self) -> &GraphicsGeometry {
        &self.geometry
    }

    /// Emit the open path and rebuild buffers if anything changed.
    pub fn update_geometry(&mut self) -> &mut Self {
        self.finish_path();
        self.geometry.built();
        self
    }

    /// Tessellated buffers, rebuilt when the dirty id moved.
    pub fn geometry(&mut self) -> &BuiltGeometry {
        self.finish_path();
        self.geometry.built()
    }

    /// Whether a world-space point falls inside any filled datum.
    ///
    /// Only emitted datums are tested; holes cancel hits and strokes never count.
    pub fn contains_point(&self, point: Point) -> bool {
        let Some(local) = self.transform.apply_inverse(point) else {
            return false;
        };
        hit_test::any_datum_contains(self.geometry.datums(), local)
    }

    pub fn local_bounds(&mut self) -> Bounds {
        self.finish_path();
        self.geometry.local_bounds()
    }

    /// Bounds of the tessellated vertices under the current transform.
    pub fn bounds(&mut self) -> Bounds {
        self.finish_path();
        let key = (self.geometry.dirty(), self.transform_id);
        let transform = self.transform;
        let Self {
            geometry,
            world_bounds,
            ..
        } = self;
        *world_bounds.get_or_update(key, || {
            let mut bounds = Bounds::new();
            bounds.add_vertex_data(&geometry.built().points, 2, Some(&transform));
            bounds
        })
    }

    pub fn width(&mut self) -> f64 {
        self.local_bounds().width() * self.transform.scale_x()
    }

    pub fn height(&mut self) -> f64 {
        self.local_bounds().height() * self.transform.scale_y()
    }

    /// Whether the next render goes through the batcher.
    pub fn is_batchable(&mut self) -> bool {
        let limit = self.settings.batchable_size;
        let built = self.geometry();
        built.vertex_count() < limit && !built.has_native_lines()
    }

    // ------------------------------------------------------------------------
    // Rendering
    // ------------------------------------------------------------------------

    /// Hand the tessellated geometry to `target`, one call per batch part.
    ///
    /// Small geometry is pre-transformed and batched; anything larger, or
    /// with native lines, is drawn directly with the transform.
    pub fn render(&mut self, target: &mut dyn DrawTarget) -> Result<(), RenderError> {
        let batchable = self.is_batchable();
        let (transform, tint, alpha, blend_mode) = (self.transform, self.tint, self.alpha, self.blend_mode);
        let built = self.geometry.built();
        if built.is_empty() {
            return Ok(());
        }

        let world: Vec<f32>;
        let vertices = if batchable {
            world = built
                .points
                .chunks_exact(2)
                .flat_map(|v| {
                    let p = transform.apply(pt(v[0] as f64, v[1] as f64));
                    [p.x as f32, p.y as f32]
                })
                .collect();
            &world
        } else {
            &built.points
        };

        for part in &built.batches {
            let call = DrawCall {
                mode: part.mode,
                vertices,
                uvs: &built.uvs,
                colors: &built.colors,
                indices: &built.indices[part.range()],
                tint,
                alpha,
                blend_mode,
            };
            if batchable {
                target.batch(&call)?;
            } else {
                target.draw(&call, &transform)?;
            }
        }
        Ok(())
    }
}
