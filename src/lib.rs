//! # Haircards
//!
//! Procedural conversion of dense particle hair into game-ready haircards.
//!
//! A character's hair system is given as an edge mesh holding thousands of
//! hair strands. Haircards reduces it to a handful of quad-strip meshes whose
//! ribbons follow the strands, taper from root to tip and carry UVs into a
//! hair texture atlas. A haircap mesh is fitted onto the scalp underneath,
//! painted with hair density.
//!
//! ## Pipeline
//!
//! 1. index the (shape-key deformed) body with a [`spatial::KdTree`]
//! 2. walk the hair edge mesh into strands
//! 3. bucket strands by length and thin large buckets per [`config::QualityTier`]
//! 4. simplify each strand and group strands by remaining point count
//! 5. build one flat and one volume ribbon per strand, one mesh per group
//! 6. map every ribbon onto a random rectangle of the UV zone atlas
//! 7. bind the card material and optionally fit the haircap
//!
//! ## Quick Start
//!
//! ```
//! use haircards::prelude::*;
//! use nalgebra::{Point3, Vector3};
//!
//! // A flat scalp patch facing +z
//! let scalp = PolyMesh::from_quads(
//!     vec![
//!         Point3::new(-1.0, -1.0, 0.0),
//!         Point3::new(1.0, -1.0, 0.0),
//!         Point3::new(1.0, 1.0, 0.0),
//!         Point3::new(-1.0, 1.0, 0.0),
//!     ],
//!     &[[0, 1, 2, 3]],
//! )
//! .unwrap();
//! let surface = ReferenceSurface::new(scalp, vec![Vector3::z(); 4]).unwrap();
//!
//! // One curved strand of five points
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.01),
//!     Point3::new(0.05, 0.0, 0.02),
//!     Point3::new(0.10, 0.0, 0.03),
//!     Point3::new(0.15, 0.0, 0.02),
//!     Point3::new(0.20, 0.0, 0.01),
//! ];
//! let edges = vec![[0, 1], [1, 2], [2, 3], [3, 4]];
//! let hair = HairMesh::new(points, edges).unwrap();
//!
//! let mut collection = HairCollection::new(hair, &surface).unwrap();
//! let objects = collection.create_mesh(QualityTier::High).unwrap();
//!
//! assert_eq!(objects.len(), 1);
//! assert_eq!(objects[0].name, "hair_3");
//! assert_eq!(objects[0].mesh.num_faces(), 4);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algo;
pub mod collection;
pub mod config;
pub mod error;
pub mod io;
pub mod material;
pub mod mesh;
pub mod spatial;

/// Prelude module for convenient imports.
///
/// This module re-exports the most commonly used types:
///
/// ```
/// use haircards::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algo::progress::{Progress, Stage};
    pub use crate::algo::strands::{LengthClass, Strand};
    pub use crate::algo::uv_zones::UvZoneAtlas;
    pub use crate::collection::{
        GenerationOptions, HairCollection, HaircapObject, HaircapTemplate, HaircardObject,
    };
    pub use crate::config::{AssetLibrary, QualityTier};
    pub use crate::error::{HairError, Result};
    pub use crate::material::Material;
    pub use crate::mesh::{HairMesh, PolyMesh, ReferenceSurface, ShapeKey, VertexGroup};
    pub use crate::spatial::KdTree;
}

// Re-export nalgebra types for convenience
pub use nalgebra;
