//! Particle hair represented as an edge mesh.

use nalgebra::{Matrix4, Point3};

use crate::error::{HairError, Result};

/// An edge mesh where every connected path is one hair strand.
#[derive(Debug, Clone)]
pub struct HairMesh {
    points: Vec<Point3<f64>>,
    edges: Vec<[usize; 2]>,
    transform: Matrix4<f64>,
}

impl HairMesh {
    /// Build a hair mesh from points and edges.
    ///
    /// Edges must reference existing points and may not be self-loops.
    ///
    /// # Example
    /// ```
    /// use haircards::mesh::HairMesh;
    /// use nalgebra::Point3;
    ///
    /// let points = vec![
    ///     Point3::new(0.0, 0.0, 0.0),
    ///     Point3::new(0.0, 0.0, 0.01),
    ///     Point3::new(0.0, 0.0, 0.02),
    /// ];
    /// let hair = HairMesh::new(points, vec![[0, 1], [1, 2]]).unwrap();
    /// assert_eq!(hair.degree(1), 2);
    /// ```
    pub fn new(points: Vec<Point3<f64>>, edges: Vec<[usize; 2]>) -> Result<Self> {
        for (ei, edge) in edges.iter().enumerate() {
            for &vi in edge {
                if vi >= points.len() {
                    return Err(HairError::InvalidEdge { edge: ei, vertex: vi });
                }
            }
            if edge[0] == edge[1] {
                return Err(HairError::invalid_param(
                    "edge",
                    ei,
                    "edge connects a vertex to itself",
                ));
            }
        }

        Ok(Self {
            points,
            edges,
            transform: Matrix4::identity(),
        })
    }

    /// Set the object-to-world transform.
    pub fn with_transform(mut self, transform: Matrix4<f64>) -> Self {
        self.transform = transform;
        self
    }

    /// Get the number of points.
    #[inline]
    pub fn num_points(&self) -> usize {
        self.points.len()
    }

    /// Get the number of edges.
    #[inline]
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Object-space points.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Edges as point index pairs.
    pub fn edges(&self) -> &[[usize; 2]] {
        &self.edges
    }

    /// Points transformed to world space.
    pub fn world_coords(&self) -> Vec<Point3<f64>> {
        self.points
            .iter()
            .map(|p| self.transform.transform_point(p))
            .collect()
    }

    /// Number of edges using vertex `v`.
    pub fn degree(&self, v: usize) -> usize {
        self.edges.iter().filter(|e| e[0] == v || e[1] == v).count()
    }

    /// Linked vertices of every vertex, in edge order.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut linked = vec![Vec::new(); self.points.len()];
        for &[a, b] in &self.edges {
            linked[a].push(b);
            linked[b].push(a);
        }
        linked
    }
}
