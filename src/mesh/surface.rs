//! The character body surface hair is grown from.
//!
//! A [`ReferenceSurface`] holds the undeformed body vertices and normals,
//! optional shape keys that deform it, and the world transform of the body
//! object. Named [`VertexGroup`]s carry sparse per-vertex weights such as the
//! hair density groups painted on the scalp.

use std::collections::HashMap;

use nalgebra::{Matrix4, Point3, Vector3};

use super::poly::PolyMesh;
use crate::error::{HairError, Result};

/// A shape key stored as absolute key positions and a blend value.
#[derive(Debug, Clone)]
pub struct ShapeKey {
    /// Shape key name.
    pub name: String,
    /// Blend value, usually in `[0, 1]`.
    pub value: f64,
    /// Key position of every surface vertex.
    pub positions: Vec<Point3<f64>>,
}

/// The character body surface.
#[derive(Debug, Clone)]
pub struct ReferenceSurface {
    mesh: PolyMesh,
    normals: Vec<Vector3<f64>>,
    shape_keys: Vec<ShapeKey>,
    transform: Matrix4<f64>,
}

impl ReferenceSurface {
    /// Create a surface from a mesh and per-vertex normals.
    ///
    /// Normals are normalized on construction. The mesh must have vertices.
    pub fn new(mesh: PolyMesh, normals: Vec<Vector3<f64>>) -> Result<Self> {
        if mesh.num_vertices() == 0 {
            return Err(HairError::empty("reference surface"));
        }
        if normals.len() != mesh.num_vertices() {
            return Err(HairError::AttributeMismatch {
                attribute: "normals",
                found: normals.len(),
                expected: mesh.num_vertices(),
            });
        }

        let normals = normals
            .into_iter()
            .map(|n| n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros))
            .collect();

        Ok(Self {
            mesh,
            normals,
            shape_keys: Vec::new(),
            transform: Matrix4::identity(),
        })
    }

    /// Create a surface with area-weighted normals computed from its faces.
    pub fn from_mesh(mesh: PolyMesh) -> Result<Self> {
        let normals = mesh.vertex_normals();
        Self::new(mesh, normals)
    }

    /// Set the object-to-world transform.
    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// Add a shape key. Its position count must match the vertex count.
    pub fn add_shape_key(&mut self, key: ShapeKey) -> Result<()> {
        if key.positions.len() != self.mesh.num_vertices() {
            return Err(HairError::AttributeMismatch {
                attribute: "shape key positions",
                found: key.positions.len(),
                expected: self.mesh.num_vertices(),
            });
        }
        self.shape_keys.push(key);
        Ok(())
    }

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.mesh.num_vertices()
    }

    /// The undeformed surface mesh, in object space.
    pub fn mesh(&self) -> &PolyMesh {
        &self.mesh
    }

    /// The shape keys applied by [`evaluated_world_coords`](Self::evaluated_world_coords).
    pub fn shape_keys(&self) -> &[ShapeKey] {
        &self.shape_keys
    }

    /// The unit normal of vertex `v`, in object space.
    #[inline]
    pub fn normal(&self, v: usize) -> Vector3<f64> {
        self.normals[v]
    }

    /// Undeformed vertex positions in world space.
    pub fn world_coords(&self) -> Vec<Point3<f64>> {
        self.mesh
            .positions()
            .iter()
            .map(|p| self.transform.transform_point(p))
            .collect()
    }

    /// Vertex positions with every shape key blended in, in world space.
    pub fn evaluated_world_coords(&self) -> Vec<Point3<f64>> {
        let base = self.mesh.positions();
        let mut coords: Vec<Point3<f64>> = base.to_vec();
        for key in &self.shape_keys {
            if key.value == 0.0 {
                continue;
            }
            for ((co, b), k) in coords.iter_mut().zip(base).zip(&key.positions) {
                *co += (k - b) * key.value;
            }
        }
        coords
            .iter()
            .map(|p| self.transform.transform_point(p))
            .collect()
    }
}

/// A named set of sparse per-vertex weights.
#[derive(Debug, Clone, Default)]
pub struct VertexGroup {
    /// Group name.
    pub name: String,
    weights: HashMap<usize, f32>,
}

impl VertexGroup {
    /// Create an empty group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            weights: HashMap::new(),
        }
    }

    /// Create a group from `(vertex, weight)` pairs.
    pub fn from_weights(
        name: impl Into<String>,
        weights: impl IntoIterator<Item = (usize, f32)>,
    ) -> Self {
        Self {
            name: name.into(),
            weights: weights.into_iter().collect(),
        }
    }

    /// Assign a weight to a vertex.
    pub fn set(&mut self, vertex: usize, weight: f32) {
        self.weights.insert(vertex, weight);
    }

    /// The weight of a vertex, or `None` if it is not in the group.
    pub fn weight(&self, vertex: usize) -> Option<f32> {
        self.weights.get(&vertex).copied()
    }

    /// Number of assigned vertices.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Check if no vertex is assigned.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }
}
