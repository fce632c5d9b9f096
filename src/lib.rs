//! Vector path tessellation for 2D scene graphs.
//!
//! Path commands and shape primitives recorded on a [`Graphics`] are turned
//! into triangle buffers: strokes become offset ribbons with joins and caps,
//! fills are ear-clipped around their holes. The same path data answers
//! bounds and point-containment queries. [`Mesh`] covers the other drawable:
//! prebuilt triangle buffers shared between owners.
//!
//! Nothing here talks to a GPU; tessellated buffers are handed to a
//! [`DrawTarget`] supplied by the host.

pub mod bounds;
pub mod errors;
pub mod graphics;
pub mod log;
pub mod memo;
pub mod mesh;
pub mod target;
pub mod types;

pub use bounds::Bounds;
pub use errors::{GeometryError, RenderError, StyleError};
pub use graphics::Graphics;
pub use graphics::geometry::{BatchPart, BuiltGeometry, GraphicsDatum, Hole};
pub use graphics::settings::{CurveSettings, TessellationSettings};
pub use graphics::shapes::{Circle, Ellipse, Polygon, Rectangle, RoundedRectangle, Shape, ShapeOutline};
pub use graphics::style::{FillStyle, LineCap, LineJoin, LineStyle};
pub use mesh::{Mesh, MeshGeometry, SharedGeometry};
pub use target::{BlendMode, DrawCall, DrawMode, DrawTarget, RecordedCall, RecordingTarget};
pub use types::{Matrix, Point, pt};
