//! Error types with diagnostics using miette
//!
//! Tessellation itself never fails: degenerate input yields empty geometry.
//! These errors cover the few fallible surfaces around it: validated style
//! construction, shared mesh buffers, and handing geometry to a draw target.

use miette::Diagnostic;
use thiserror::Error;

// ============================================================================
// Style Errors
// ============================================================================

/// Errors raised by validated style constructors
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum StyleError {
    #[error("line width must be finite and non-negative, got {width}")]
    #[diagnostic(code(pathtess::style::invalid_width))]
    InvalidWidth { width: f64 },

    #[error("line alignment must lie in [0, 1], got {alignment}")]
    #[diagnostic(
        code(pathtess::style::invalid_alignment),
        help("0 puts the stroke on the inner side, 1 on the outer side, 0.5 centers it")
    )]
    InvalidAlignment { alignment: f64 },

    #[error("miter limit must be at least 1, got {limit}")]
    #[diagnostic(code(pathtess::style::invalid_miter_limit))]
    InvalidMiterLimit { limit: f64 },

    #[error("alpha must lie in [0, 1], got {alpha}")]
    #[diagnostic(code(pathtess::style::invalid_alpha))]
    InvalidAlpha { alpha: f64 },
}

// ============================================================================
// Geometry Errors
// ============================================================================

/// Errors raised when building or mutating shared mesh geometry
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum GeometryError {
    #[error("vertex buffer holds {len} floats, expected pairs of x/y")]
    #[diagnostic(code(pathtess::geometry::odd_vertex_buffer))]
    OddVertexBuffer { len: usize },

    #[error("uv buffer holds {uvs} floats but the vertex buffer holds {vertices}")]
    #[diagnostic(code(pathtess::geometry::uv_mismatch))]
    UvMismatch { uvs: usize, vertices: usize },

    #[error("index {index} is out of range for {vertex_count} vertices")]
    #[diagnostic(code(pathtess::geometry::index_out_of_range))]
    IndexOutOfRange { index: u32, vertex_count: usize },

    #[error("geometry is borrowed by another owner")]
    #[diagnostic(
        code(pathtess::geometry::busy),
        help("finish the render pass that holds the geometry before updating it")
    )]
    Busy,
}

// ============================================================================
// Render Errors
// ============================================================================

/// Errors raised while submitting geometry to a draw target
#[derive(Error, Diagnostic, Debug)]
pub enum RenderError {
    #[error("draw target rejected the call: {message}")]
    #[diagnostic(code(pathtess::render::target))]
    Target { message: String },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Geometry(#[from] GeometryError),
}

impl RenderError {
    /// Convenience constructor for draw-target implementations
    pub fn target(message: impl Into<String>) -> Self {
        RenderError::Target {
            message: message.into(),
        }
    }
}
