//! The seam between tessellated geometry and whatever draws it.
//!
//! Owners never talk to a GPU. They hand a [`DrawCall`] to a [`DrawTarget`]
//! either pre-transformed (`batch`) or with the transform alongside (`draw`).

use crate::errors::RenderError;
use crate::types::Matrix;

/// Primitive topology of an index buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum DrawMode {
    #[default]
    Triangles,
    TriangleStrip,
    Lines,
}

/// How a draw call composites onto what is already there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum BlendMode {
    #[default]
    Normal,
    Add,
    Multiply,
    Screen,
}

/// Buffers for one draw.
///
/// `vertices` and `uvs` hold interleaved x/y pairs, `colors` holds one
/// premultiplied RGBA quad per vertex and may be empty when the owner has no
/// per-vertex color.
#[derive(Clone, Copy, Debug)]
pub struct DrawCall<'a> {
    pub mode: DrawMode,
    pub vertices: &'a [f32],
    pub uvs: &'a [f32],
    pub colors: &'a [f32],
    pub indices: &'a [u32],
    /// Packed `0xRRGGBB` multiplied into every vertex color.
    pub tint: u32,
    pub alpha: f64,
    pub blend_mode: BlendMode,
}

impl DrawCall<'_> {
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 2
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

/// Something that accepts geometry.
pub trait DrawTarget {
    /// Accept world-space vertices for merging with other small draws.
    fn batch(&mut self, call: &DrawCall<'_>) -> Result<(), RenderError>;

    /// Accept local-space vertices drawn under `transform`.
    fn draw(&mut self, call: &DrawCall<'_>, transform: &Matrix) -> Result<(), RenderError>;
}

/// A target that records every call it receives.
///
/// Useful for inspecting what an owner submits without a renderer.
#[derive(Clone, Debug, Default)]
pub struct RecordingTarget {
    pub calls: Vec<RecordedCall>,
}

/// Owned copy of a [`DrawCall`], tagged with the path it arrived through.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordedCall {
    pub mode: DrawMode,
    pub vertices: Vec<f32>,
    pub uvs: Vec<f32>,
    pub colors: Vec<f32>,
    pub indices: Vec<u32>,
    pub tint: u32,
    pub alpha: f64,
    pub blend_mode: BlendMode,
    /// `None` for batched calls.
    pub transform: Option<Matrix>,
}

impl RecordedCall {
    fn new(call: &DrawCall<'_>, transform: Option<Matrix>) -> Self {
        RecordedCall {
            mode: call.mode,
            vertices: call.vertices.to_vec(),
            uvs: call.uvs.to_vec(),
            colors: call.colors.to_vec(),
            indices: call.indices.to_vec(),
            tint: call.tint,
            alpha: call.alpha,
            blend_mode: call.blend_mode,
            transform,
        }
    }

    pub fn is_batched(&self) -> bool {
        self.transform.is_none()
    }
}

impl RecordingTarget {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn batched(&self) -> impl Iterator<Item = &RecordedCall> {
        self.calls.iter().filter(|c| c.is_batched())
    }

    pub fn direct(&self) -> impl Iterator<Item = &RecordedCall> {
        self.calls.iter().filter(|c| !c.is_batched())
    }
}

impl DrawTarget for RecordingTarget {
    fn batch(&mut self, call: &DrawCall<'_>) -> Result<(), RenderError> {
        self.calls.push(RecordedCall::new(call, None));
        Ok(())
    }

    fn draw(&mut self, call: &DrawCall<'_>, transform: &Matrix) -> Result<(), RenderError> {
        self.calls.push(RecordedCall::new(call, Some(*transform)));
        Ok(())
    }
}
