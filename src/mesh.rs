//! Triangle meshes over shared, reference-counted geometry.
//!
//! # Key Concepts
//!
//! - **Shared geometry**: several [`Mesh`] owners can draw the same
//!   [`MeshGeometry`] through cloned [`SharedGeometry`] handles. The geometry
//!   is disposed when the last handle goes away.
//!
//! - **Vertex data**: each mesh keeps its own world-space copy of the
//!   geometry's vertices, recomputed only when the geometry's vertices or the
//!   mesh's transform changed since the last computation.
//!
//! - **Batching**: small triangle-list meshes are handed to the draw target
//!   pre-transformed; anything else is drawn directly with its transform.

use std::cell::{Ref, RefCell};
use std::rc::Rc;

use crate::bounds::Bounds;
use crate::errors::{GeometryError, RenderError};
use crate::graphics::defaults;
use crate::graphics::hit_test::triangle_contains;
use crate::log::debug;
use crate::memo::Memo;
use crate::target::{BlendMode, DrawCall, DrawMode, DrawTarget};
use crate::types::{Matrix, Point, pt};

// ============================================================================
// Geometry
// ============================================================================

/// Vertex, uv and index buffers of a mesh.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshGeometry {
    vertices: Vec<f32>,
    uvs: Vec<f32>,
    indices: Vec<u32>,
    vertex_dirty_id: u64,
}

impl MeshGeometry {
    /// Validate and wrap buffers.
    ///
    /// `uvs` may be empty; otherwise it must match `vertices` in length.
    pub fn new(vertices: Vec<f32>, uvs: Vec<f32>, indices: Vec<u32>) -> Result<Self, GeometryError> {
        if vertices.len() % 2 != 0 {
            return Err(GeometryError::OddVertexBuffer { len: vertices.len() });
        }
        if !uvs.is_empty() && uvs.len() != vertices.len() {
            return Err(GeometryError::UvMismatch {
                uvs: uvs.len(),
                vertices: vertices.len(),
            });
        }
        check_indices(&indices, vertices.len() / 2)?;
        Ok(MeshGeometry {
            vertices,
            uvs,
            indices,
            vertex_dirty_id: 0,
        })
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn uvs(&self) -> &[f32] {
        &self.uvs
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    /// Bumped whenever the vertex buffer is replaced.
    pub fn vertex_dirty_id(&self) -> u64 {
        self.vertex_dirty_id
    }

    fn vertex(&self, index: u32) -> Option<Point> {
        let i = index as usize * 2;
        let x = *self.vertices.get(i)?;
        let y = *self.vertices.get(i + 1)?;
        Some(pt(x as f64, y as f64))
    }

    /// Replace the vertex buffer, keeping uvs and indices.
    pub fn set_vertices(&mut self, vertices: Vec<f32>) -> Result<(), GeometryError> {
        if vertices.len() % 2 != 0 {
            return Err(GeometryError::OddVertexBuffer { len: vertices.len() });
        }
        if !self.uvs.is_empty() && self.uvs.len() != vertices.len() {
            return Err(GeometryError::UvMismatch {
                uvs: self.uvs.len(),
                vertices: vertices.len(),
            });
        }
        check_indices(&self.indices, vertices.len() / 2)?;
        self.vertices = vertices;
        self.vertex_dirty_id += 1;
        Ok(())
    }
}

impl Drop for MeshGeometry {
    fn drop(&mut self) {
        debug!(vertices = self.vertex_count(), "disposing mesh geometry");
    }
}

fn check_indices(indices: &[u32], vertex_count: usize) -> Result<(), GeometryError> {
    match indices.iter().find(|&&i| i as usize >= vertex_count) {
        Some(&index) => Err(GeometryError::IndexOutOfRange { index, vertex_count }),
        None => Ok(()),
    }
}

/// Cloneable handle to a [`MeshGeometry`]; each clone counts as one owner.
#[derive(Debug, Clone)]
pub struct SharedGeometry(Rc<RefCell<MeshGeometry>>);

impl SharedGeometry {
    pub fn new(geometry: MeshGeometry) -> Self {
        SharedGeometry(Rc::new(RefCell::new(geometry)))
    }

    /// Number of live handles.
    pub fn ref_count(&self) -> usize {
        Rc::strong_count(&self.0)
    }

    pub fn ptr_eq(&self, other: &SharedGeometry) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    pub fn borrow(&self) -> Result<Ref<'_, MeshGeometry>, GeometryError> {
        self.0.try_borrow().map_err(|_| GeometryError::Busy)
    }

    /// Replace the vertices seen by every owner.
    pub fn update_vertices(&self, vertices: Vec<f32>) -> Result<(), GeometryError> {
        let mut geometry = self.0.try_borrow_mut().map_err(|_| GeometryError::Busy)?;
        geometry.set_vertices(vertices)
    }
}

impl From<MeshGeometry> for SharedGeometry {
    fn from(geometry: MeshGeometry) -> Self {
        SharedGeometry::new(geometry)
    }
}

// ============================================================================
// Mesh
// ============================================================================

/// World-space vertices plus their bounds, cached together.
#[derive(Debug, Clone, Default)]
struct WorldVertices {
    data: Vec<f32>,
    bounds: Bounds,
}

/// Key for [`WorldVertices`]: geometry vertex id, transform id, pixel rounding.
type WorldKey = (u64, u64, bool);

/// A drawable owner of shared mesh geometry.
#[derive(Debug, Clone)]
pub struct Mesh {
    geometry: SharedGeometry,
    draw_mode: DrawMode,
    batchable: bool,
    transform: Matrix,
    transform_id: u64,
    round_pixels: bool,
    world: Memo<WorldKey, WorldVertices>,
    tint: u32,
    alpha: f64,
    blend_mode: BlendMode,
}

impl Mesh {
    pub fn new(geometry: SharedGeometry, draw_mode: DrawMode) -> Self {
        Mesh {
            geometry,
            draw_mode,
            batchable: true,
            transform: Matrix::IDENTITY,
            transform_id: 0,
            round_pixels: false,
            world: Memo::new(),
            tint: 0xFFFFFF,
            alpha: 1.0,
            blend_mode: BlendMode::Normal,
        }
    }

    pub fn geometry(&self) -> &SharedGeometry {
        &self.geometry
    }

    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    pub fn set_draw_mode(&mut self, draw_mode: DrawMode) -> &mut Self {
        self.draw_mode = draw_mode;
        self
    }

    /// Whether the material allows batching at all.
    pub fn set_batchable(&mut self, batchable: bool) -> &mut Self {
        self.batchable = batchable;
        self
    }

    pub fn transform(&self) -> &Matrix {
        &self.transform
    }

    pub fn set_transform(&mut self, transform: Matrix) -> &mut Self {
        if transform != self.transform {
            self.transform = transform;
            self.transform_id += 1;
        }
        self
    }

    pub fn round_pixels(&self) -> bool {
        self.round_pixels
    }

    /// Snap world-space vertices to whole pixels.
    pub fn set_round_pixels(&mut self, round_pixels: bool) -> &mut Self {
        self.round_pixels = round_pixels;
        self
    }

    pub fn set_tint(&mut self, tint: u32) -> &mut Self {
        self.tint = tint;
        self
    }

    pub fn set_alpha(&mut self, alpha: f64) -> &mut Self {
        self.alpha = alpha.clamp(0.0, 1.0);
        self
    }

    pub fn set_blend_mode(&mut self, blend_mode: BlendMode) -> &mut Self {
        self.blend_mode = blend_mode;
        self
    }

    fn world_vertices(&mut self) -> Result<&WorldVertices, GeometryError> {
        let geometry = self.geometry.borrow()?;
        let key = (geometry.vertex_dirty_id(), self.transform_id, self.round_pixels);
        let (transform, round) = (self.transform, self.round_pixels);
        Ok(self.world.get_or_update(key, || {
            let data: Vec<f32> = geometry
                .vertices()
                .chunks_exact(2)
                .flat_map(|v| {
                    let p = transform.apply(pt(v[0] as f64, v[1] as f64));
                    if round { [p.x.round() as f32, p.y.round() as f32] } else { [p.x as f32, p.y as f32] }
                })
                .collect();
            let mut bounds = Bounds::new();
            bounds.add_vertex_data(&data, 2, None);
            WorldVertices { data, bounds }
        }))
    }

    /// Transformed vertices, recomputed only when the geometry or transform moved.
    pub fn calculate_vertices(&mut self) -> Result<&[f32], GeometryError> {
        Ok(&self.world_vertices()?.data)
    }

    pub fn bounds(&mut self) -> Result<Bounds, GeometryError> {
        Ok(self.world_vertices()?.bounds)
    }

    /// Whether a world-space point lies on any triangle of the mesh.
    pub fn contains_point(&mut self, point: Point) -> Result<bool, GeometryError> {
        if !self.bounds()?.contains(point) {
            return Ok(false);
        }
        let Some(local) = self.transform.apply_inverse(point) else {
            return Ok(false);
        };
        let geometry = self.geometry.borrow()?;
        let indices = geometry.indices();
        let step = match self.draw_mode {
            DrawMode::Triangles => 3,
            DrawMode::TriangleStrip => 1,
            DrawMode::Lines => return Ok(false),
        };
        let hit = (0..indices.len().saturating_sub(2)).step_by(step).any(|i| {
            let corners = (
                geometry.vertex(indices[i]),
                geometry.vertex(indices[i + 1]),
                geometry.vertex(indices[i + 2]),
            );
            match corners {
                (Some(a), Some(b), Some(c)) => triangle_contains(a, b, c, local),
                _ => false,
            }
        });
        Ok(hit)
    }

    /// Batched when allowed, a triangle list, and small enough.
    pub fn is_batchable(&self) -> Result<bool, GeometryError> {
        let geometry = self.geometry.borrow()?;
        Ok(self.batchable
            && self.draw_mode == DrawMode::Triangles
            && geometry.vertices().len() < defaults::BATCHABLE_SIZE * 2)
    }

    pub fn render(&mut self, target: &mut dyn DrawTarget) -> Result<(), RenderError> {
        if self.is_batchable()? {
            let (tint, alpha, blend_mode, mode) = (self.tint, self.alpha, self.blend_mode, self.draw_mode);
            let geometry = self.geometry.clone();
            let world = self.calculate_vertices()?;
            let geometry = geometry.borrow()?;
            target.batch(&DrawCall {
                mode,
                vertices: world,
                uvs: geometry.uvs(),
                colors: &[],
                indices: geometry.indices(),
                tint,
                alpha,
                blend_mode,
            })
        } else {
            let geometry = self.geometry.borrow()?;
            target.draw(
                &DrawCall {
                    mode: self.draw_mode,
                    vertices: geometry.vertices(),
                    uvs: geometry.uvs(),
                    colors: &[],
                    indices: geometry.indices(),
                    tint: self.tint,
                    alpha: self.alpha,
                    blend_mode: self.blend_mode,
                },
                &self.transform,
            )
        }
    }
}
