//! Core mesh data structures.
//!
//! - [`ReferenceSurface`] - the character body hair is grown from, with normals,
//!   shape keys and a world transform
//! - [`HairMesh`] - particle hair as an edge mesh, one path per strand
//! - [`PolyMesh`] - a polygon mesh with optional UV and color layers, used for
//!   generated haircards and the haircap
//! - [`VertexGroup`] - sparse named per-vertex weights
//!
//! Vertices are addressed by plain `usize` indices into the owning mesh.

mod hair;
mod poly;
mod surface;

pub use hair::HairMesh;
pub use poly::{Color, PolyMesh};
pub use surface::{ReferenceSurface, ShapeKey, VertexGroup};
