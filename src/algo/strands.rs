//! Strand discovery in hair edge meshes.
//!
//! Every path in a [`HairMesh`] that starts at a tip vertex (a vertex with a
//! single edge) is one hair strand. [`extract_strands`] walks those paths
//! depth-first and yields them lazily as [`Strand`]s.

use nalgebra::Point3;

use crate::error::{HairError, Result};
use crate::mesh::HairMesh;

/// Length bucket of a strand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LengthClass {
    /// `length <= 0.05`
    Short,
    /// `0.05 < length <= 0.1`
    Medium,
    /// `length > 0.1`
    Long,
}

impl LengthClass {
    /// Upper bound (inclusive) of short strands.
    pub const SHORT_MAX: f64 = 0.05;
    /// Upper bound (inclusive) of medium strands.
    pub const MEDIUM_MAX: f64 = 0.1;

    /// Classify a strand length.
    pub fn of(length: f64) -> Self {
        if length <= Self::SHORT_MAX {
            LengthClass::Short
        } else if length <= Self::MEDIUM_MAX {
            LengthClass::Medium
        } else {
            LengthClass::Long
        }
    }
}

/// One hair strand: ordered indices into the hair coordinate array.
#[derive(Debug, Clone, PartialEq)]
pub struct Strand {
    indices: Vec<usize>,
    length: f64,
}

impl Strand {
    /// Create a strand from point indices and a precomputed length.
    pub fn new(indices: Vec<usize>, length: f64) -> Self {
        Self { indices, length }
    }

    /// Point indices from root to tip.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Check if the strand has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Measured strand length, see [`extract_strands`].
    #[inline]
    pub fn length(&self) -> f64 {
        self.length
    }

    /// The length bucket of this strand.
    #[inline]
    pub fn length_class(&self) -> LengthClass {
        LengthClass::of(self.length)
    }
}

/// Lazy iterator over the strands of a hair mesh.
///
/// Created by [`extract_strands`].
#[derive(Debug)]
pub struct StrandIter<'a> {
    adjacency: Vec<Vec<usize>>,
    coords: &'a [Point3<f64>],
    seeds: std::vec::IntoIter<usize>,
    visited: Vec<bool>,
    stack: Vec<usize>,
}

/// Depth-first walk of all unvisited vertices linked to `seed`.
fn walk_island(
    adjacency: &[Vec<usize>],
    visited: &mut [bool],
    stack: &mut Vec<usize>,
    seed: usize,
) -> Vec<usize> {
    let mut island = Vec::new();
    stack.push(seed);

    while let Some(v) = stack.pop() {
        if visited[v] {
            continue;
        }
        visited[v] = true;
        island.push(v);

        // Reversed so the first linked vertex is walked first.
        for &other in adjacency[v].iter().rev() {
            if !visited[other] {
                stack.push(other);
            }
        }
    }

    island
}

impl Iterator for StrandIter<'_> {
    type Item = Strand;

    fn next(&mut self) -> Option<Strand> {
        for seed in self.seeds.by_ref() {
            if self.visited[seed] {
                continue;
            }

            let island = walk_island(&self.adjacency, &mut self.visited, &mut self.stack, seed);

            // Measured to the second-to-last point, not the last. Length
            // buckets were tuned against this, keep it.
            let last = island.len().saturating_sub(2);
            let length = (self.coords[island[0]] - self.coords[island[last]]).norm();

            return Some(Strand::new(island, length));
        }
        None
    }
}

/// Walk the strands of `hair`.
///
/// Strands are seeded at tip vertices in vertex order and walked depth-first,
/// so each vertex appears in at most one strand. `coords` are the hair
/// coordinates lengths are measured in, usually
/// [`HairMesh::world_coords`]; it must have one entry per hair point.
///
/// A strand's length is the distance between its first and second-to-last
/// point.
///
/// # Errors
///
/// `AttributeMismatch` if `coords` and the hair mesh differ in point count.
///
/// # Example
///
/// ```
/// use haircards::algo::strands::extract_strands;
/// use haircards::mesh::HairMesh;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(0.0, 0.0, 0.02),
///     Point3::new(0.0, 0.0, 0.04),
/// ];
/// let hair = HairMesh::new(points, vec![[0, 1], [1, 2]]).unwrap();
/// let coords = hair.world_coords();
///
/// let strands: Vec<_> = extract_strands(&hair, &coords).unwrap().collect();
/// assert_eq!(strands.len(), 1);
/// assert_eq!(strands[0].indices(), &[0, 1, 2]);
/// assert!((strands[0].length() - 0.02).abs() < 1e-12);
/// ```
pub fn extract_strands<'a>(hair: &HairMesh, coords: &'a [Point3<f64>]) -> Result<StrandIter<'a>> {
    if coords.len() != hair.num_points() {
        return Err(HairError::AttributeMismatch {
            attribute: "hair coordinates",
            found: coords.len(),
            expected: hair.num_points(),
        });
    }

    let adjacency = hair.adjacency();
    let seeds: Vec<usize> = adjacency
        .iter()
        .enumerate()
        .filter(|(_, linked)| linked.len() == 1)
        .map(|(v, _)| v)
        .collect();

    Ok(StrandIter {
        visited: vec![false; adjacency.len()],
        adjacency,
        coords,
        seeds: seeds.into_iter(),
        stack: Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Straight vertical strands rooted at `x = i`, with `points[i]` points
    /// spaced `spacing[i]` apart.
    fn vertical_strands(points: &[usize], spacing: &[f64]) -> HairMesh {
        let mut coords = Vec::new();
        let mut edges = Vec::new();
        for (s, (&n, &step)) in points.iter().zip(spacing).enumerate() {
            let base = coords.len();
            for j in 0..n {
                coords.push(Point3::new(s as f64, 0.0, j as f64 * step));
                if j > 0 {
                    edges.push([base + j - 1, base + j]);
                }
            }
        }
        HairMesh::new(coords, edges).unwrap()
    }

    #[test]
    fn test_length_class_boundaries() {
        assert_eq!(LengthClass::of(0.0), LengthClass::Short);
        assert_eq!(LengthClass::of(0.05), LengthClass::Short);
        assert_eq!(LengthClass::of(0.050001), LengthClass::Medium);
        assert_eq!(LengthClass::of(0.1), LengthClass::Medium);
        assert_eq!(LengthClass::of(0.100001), LengthClass::Long);
    }

    #[test]
    fn test_strands_partition_vertices() {
        let hair = vertical_strands(&[4, 2, 7, 3], &[0.01, 0.01, 0.02, 0.05]);
        let coords = hair.world_coords();
        let strands: Vec<_> = extract_strands(&hair, &coords).unwrap().collect();

        assert_eq!(strands.len(), 4);

        let mut seen = vec![0usize; hair.num_points()];
        for strand in &strands {
            for &v in strand.indices() {
                seen[v] += 1;
            }
        }
        assert!(seen.iter().all(|&count| count == 1), "{:?}", seen);
    }

    #[test]
    fn test_strand_order_follows_edges() {
        let hair = vertical_strands(&[5], &[0.01]);
        let coords = hair.world_coords();
        let strand = extract_strands(&hair, &coords).unwrap().next().unwrap();
        assert_eq!(strand.indices(), &[0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_length_uses_second_to_last_point() {
        let hair = vertical_strands(&[4], &[0.1]);
        let coords = hair.world_coords();
        let strand = extract_strands(&hair, &coords).unwrap().next().unwrap();
        // Points at 0.0, 0.1, 0.2, 0.3; measured to 0.2
        assert!((strand.length() - 0.2).abs() < 1e-12);
        assert_eq!(strand.length_class(), LengthClass::Long);

        let hair = vertical_strands(&[2], &[0.1]);
        let coords = hair.world_coords();
        let strand = extract_strands(&hair, &coords).unwrap().next().unwrap();
        assert_eq!(strand.length(), 0.0);
    }

    #[test]
    fn test_edge_order_independent_partition() {
        // Strand 0-1-2-3 with edges listed out of order
        let coords = vec![Point3::origin(); 4];
        let hair = HairMesh::new(coords, vec![[2, 3], [0, 1], [2, 1]]).unwrap();
        let coords = hair.world_coords();
        let strands: Vec<_> = extract_strands(&hair, &coords).unwrap().collect();
        assert_eq!(strands.len(), 1);
        assert_eq!(strands[0].indices(), &[0, 1, 2, 3]);
    }

    #[test]
    fn test_closed_loops_and_isolated_points_skipped() {
        let coords = vec![Point3::origin(); 6];
        // Triangle loop 0-1-2, isolated point 3, strand 4-5
        let hair = HairMesh::new(coords, vec![[0, 1], [1, 2], [2, 0], [4, 5]]).unwrap();
        let coords = hair.world_coords();
        let strands: Vec<_> = extract_strands(&hair, &coords).unwrap().collect();
        assert_eq!(strands.len(), 1);
        assert_eq!(strands[0].indices(), &[4, 5]);
    }

    #[test]
    fn test_long_strand_does_not_overflow() {
        let hair = vertical_strands(&[200_000], &[1e-6]);
        let coords = hair.world_coords();
        let strands: Vec<_> = extract_strands(&hair, &coords).unwrap().collect();
        assert_eq!(strands.len(), 1);
        assert_eq!(strands[0].len(), 200_000);
    }

    #[test]
    fn test_coordinate_count_mismatch() {
        let hair = vertical_strands(&[3], &[0.01]);
        let coords = vec![Point3::origin(); 2];
        let err = extract_strands(&hair, &coords).unwrap_err();
        assert!(matches!(
            err,
            HairError::AttributeMismatch { found: 2, expected: 3, .. }
        ));
    }
}
