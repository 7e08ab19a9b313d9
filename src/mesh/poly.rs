//! Polygon mesh with per-vertex attributes.
//!
//! [`PolyMesh`] stores an indexed face-vertex list with optional per-vertex UV
//! coordinates and RGBA colors. It is the output type of the haircard builder
//! and the representation of the haircap template.

use std::collections::{BTreeMap, BTreeSet};

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{HairError, Result};

/// An RGBA vertex color.
pub type Color = [f32; 4];

/// A polygon mesh stored as a face-vertex list.
#[derive(Debug, Clone, Default)]
pub struct PolyMesh {
    positions: Vec<Point3<f64>>,
    faces: Vec<Vec<usize>>,
    uvs: Option<Vec<Point2<f64>>>,
    colors: Option<Vec<Color>>,
    smooth: bool,
}

impl PolyMesh {
    /// Create a new empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from vertex positions and polygon faces.
    ///
    /// Every face must have at least three distinct, in-range vertex indices.
    ///
    /// # Example
    /// ```
    /// use haircards::mesh::PolyMesh;
    /// use nalgebra::Point3;
    ///
    /// let positions = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(1.0, 0.0, 0.0),
    ///     Point3::new(1.0, 1.0, 0.0),
    ///     Point3::new(0.0, 1.0, 0.0),
    /// ];
    /// let mesh = PolyMesh::from_polygons(positions, vec![vec![0, 1, 2, 3]]).unwrap();
    /// assert_eq!(mesh.boundary_edges().len(), 4);
    /// ```
    pub fn from_polygons(positions: Vec<Point3<f64>>, faces: Vec<Vec<usize>>) -> Result<Self> {
        for (fi, face) in faces.iter().enumerate() {
            if face.len() < 3 {
                return Err(HairError::invalid_param(
                    "face",
                    fi,
                    "faces need at least three vertices",
                ));
            }
            for &vi in face {
                if vi >= positions.len() {
                    return Err(HairError::InvalidVertexIndex { face: fi, vertex: vi });
                }
            }
            let unique: BTreeSet<usize> = face.iter().copied().collect();
            if unique.len() != face.len() {
                return Err(HairError::invalid_param(
                    "face",
                    fi,
                    "face has duplicate vertices",
                ));
            }
        }

        Ok(Self {
            positions,
            faces,
            ..Self::default()
        })
    }

    /// Build a mesh from vertex positions and quad faces.
    pub fn from_quads(positions: Vec<Point3<f64>>, quads: &[[usize; 4]]) -> Result<Self> {
        let faces = quads.iter().map(|q| q.to_vec()).collect();
        Self::from_polygons(positions, faces)
    }

    // ==================== Accessors ====================

    /// Get the number of vertices.
    #[inline]
    pub fn num_vertices(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of faces.
    #[inline]
    pub fn num_faces(&self) -> usize {
        self.faces.len()
    }

    /// Vertex positions.
    #[inline]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Mutable vertex positions. Topology cannot be changed through this.
    #[inline]
    pub fn positions_mut(&mut self) -> &mut [Point3<f64>] {
        &mut self.positions
    }

    /// Faces as vertex index lists.
    #[inline]
    pub fn faces(&self) -> &[Vec<usize>] {
        &self.faces
    }

    /// Per-vertex UV coordinates, if a UV layer exists.
    pub fn uvs(&self) -> Option<&[Point2<f64>]> {
        self.uvs.as_deref()
    }

    /// Set the per-vertex UV layer.
    pub fn set_uvs(&mut self, uvs: Vec<Point2<f64>>) -> Result<()> {
        if uvs.len() != self.positions.len() {
            return Err(HairError::AttributeMismatch {
                attribute: "uv layer",
                found: uvs.len(),
                expected: self.positions.len(),
            });
        }
        self.uvs = Some(uvs);
        Ok(())
    }

    /// Per-vertex colors, if a color layer exists.
    pub fn colors(&self) -> Option<&[Color]> {
        self.colors.as_deref()
    }

    /// Mutable per-vertex colors, if a color layer exists.
    pub fn colors_mut(&mut self) -> Option<&mut [Color]> {
        self.colors.as_deref_mut()
    }

    /// Set the per-vertex color layer.
    pub fn set_colors(&mut self, colors: Vec<Color>) -> Result<()> {
        if colors.len() != self.positions.len() {
            return Err(HairError::AttributeMismatch {
                attribute: "color layer",
                found: colors.len(),
                expected: self.positions.len(),
            });
        }
        self.colors = Some(colors);
        Ok(())
    }

    /// Whether faces are shaded smooth.
    pub fn is_smooth(&self) -> bool {
        self.smooth
    }

    /// Set smooth shading on all faces.
    pub fn set_smooth(&mut self, smooth: bool) {
        self.smooth = smooth;
    }

    /// Check if every face is a quad.
    pub fn is_quad_mesh(&self) -> bool {
        self.faces.iter().all(|f| f.len() == 4)
    }

    // ==================== Topology ====================

    /// Undirected edges with the number of faces using each one.
    ///
    /// Keys are `(low, high)` vertex pairs.
    pub fn edge_face_counts(&self) -> BTreeMap<(usize, usize), usize> {
        let mut counts = BTreeMap::new();
        for face in &self.faces {
            for i in 0..face.len() {
                let a = face[i];
                let b = face[(i + 1) % face.len()];
                *counts.entry((a.min(b), a.max(b))).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Edges used by exactly one face.
    pub fn boundary_edges(&self) -> Vec<[usize; 2]> {
        self.edge_face_counts()
            .into_iter()
            .filter(|&(_, count)| count == 1)
            .map(|((a, b), _)| [a, b])
            .collect()
    }

    /// Grow a vertex selection by its one-ring neighbors.
    ///
    /// Returns the sorted, deduplicated union of `vertices` and every vertex
    /// sharing an edge with one of them.
    pub fn expand_region(&self, vertices: &[usize]) -> Vec<usize> {
        let selected: BTreeSet<usize> = vertices.iter().copied().collect();
        let mut region = selected.clone();
        for face in &self.faces {
            let n = face.len();
            for i in 0..n {
                let a = face[i];
                let b = face[(i + 1) % n];
                if selected.contains(&a) {
                    region.insert(b);
                }
                if selected.contains(&b) {
                    region.insert(a);
                }
            }
        }
        region.into_iter().collect()
    }

    // ==================== Geometry ====================

    /// Translate all vertices.
    pub fn translate(&mut self, offset: &Vector3<f64>) {
        for p in &mut self.positions {
            *p += offset;
        }
    }

    /// Compute the area-weighted normal at every vertex.
    ///
    /// Polygons are fan-triangulated from their first corner.
    pub fn vertex_normals(&self) -> Vec<Vector3<f64>> {
        let mut normals = vec![Vector3::zeros(); self.positions.len()];
        for face in &self.faces {
            let p0 = self.positions[face[0]];
            let mut face_normal = Vector3::zeros();
            for i in 1..face.len() - 1 {
                let e1 = self.positions[face[i]] - p0;
                let e2 = self.positions[face[i + 1]] - p0;
                face_normal += e1.cross(&e2); // Area-weighted (not normalized)
            }
            for &v in face {
                normals[v] += face_normal;
            }
        }
        for n in &mut normals {
            *n = n.try_normalize(1e-12).unwrap_or_else(Vector3::zeros);
        }
        normals
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Two quads sharing the edge (1, 4).
    fn two_quads() -> PolyMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(2.0, 1.0, 0.0),
        ];
        PolyMesh::from_quads(positions, &[[0, 1, 4, 3], [1, 2, 5, 4]]).unwrap()
    }

    #[test]
    fn test_from_quads() {
        let mesh = two_quads();
        assert_eq!(mesh.num_vertices(), 6);
        assert_eq!(mesh.num_faces(), 2);
        assert!(mesh.is_quad_mesh());
        assert!(mesh.uvs().is_none());
        assert!(mesh.colors().is_none());
    }

    #[test]
    fn test_invalid_vertex_index() {
        let positions = vec![Point3::origin(); 3];
        let result = PolyMesh::from_polygons(positions, vec![vec![0, 1, 5]]);
        assert!(matches!(
            result,
            Err(HairError::InvalidVertexIndex { face: 0, vertex: 5 })
        ));
    }

    #[test]
    fn test_degenerate_face() {
        let positions = vec![Point3::origin(); 4];
        assert!(PolyMesh::from_polygons(positions.clone(), vec![vec![0, 1, 1, 2]]).is_err());
        assert!(PolyMesh::from_polygons(positions, vec![vec![0, 1]]).is_err());
    }

    #[test]
    fn test_boundary_edges() {
        let mesh = two_quads();
        let boundary = mesh.boundary_edges();
        // 7 unique edges, the shared (1, 4) is interior
        assert_eq!(mesh.edge_face_counts().len(), 7);
        assert_eq!(boundary.len(), 6);
        assert!(!boundary.contains(&[1, 4]));
    }

    #[test]
    fn test_expand_region() {
        let mesh = two_quads();
        assert_eq!(mesh.expand_region(&[0]), vec![0, 1, 3]);
        assert_eq!(mesh.expand_region(&[1]), vec![0, 1, 2, 4]);
        assert_eq!(mesh.expand_region(&[]), Vec::<usize>::new());
    }

    #[test]
    fn test_vertex_normals_planar() {
        let mesh = two_quads();
        for n in mesh.vertex_normals() {
            assert!((n - Vector3::z()).norm() < 1e-12);
        }
    }

    #[test]
    fn test_attribute_length_checked() {
        let mut mesh = two_quads();
        assert!(mesh.set_uvs(vec![Point2::origin(); 5]).is_err());
        assert!(mesh.set_uvs(vec![Point2::origin(); 6]).is_ok());
        assert!(mesh.set_colors(vec![[0.0; 4]; 2]).is_err());
        assert!(mesh.set_colors(vec![[1.0; 4]; 6]).is_ok());
        assert_eq!(mesh.colors().unwrap()[0], [1.0; 4]);
    }
}
