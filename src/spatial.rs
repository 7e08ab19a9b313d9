//! Nearest-neighbor search over point sets.
//!
//! [`KdTree`] is a static, balanced 3D kd-tree built once over the vertices of
//! a reference surface and queried for every hair point and haircap vertex of
//! a generation run.
//!
//! # Example
//!
//! ```
//! use haircards::spatial::KdTree;
//! use nalgebra::Point3;
//!
//! let points = vec![
//!     Point3::new(0.0, 0.0, 0.0),
//!     Point3::new(1.0, 0.0, 0.0),
//!     Point3::new(0.0, 1.0, 0.0),
//! ];
//! let tree = KdTree::build(&points).unwrap();
//!
//! let nearest = tree.find(&Point3::new(0.9, 0.1, 0.0));
//! assert_eq!(nearest.index, 1);
//! ```

use nalgebra::Point3;

use crate::error::{HairError, Result};

/// Result of a nearest-neighbor query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Nearest {
    /// Position of the nearest point.
    pub point: Point3<f64>,
    /// Index of the nearest point in the input array.
    pub index: usize,
    /// Euclidean distance from the query to the nearest point.
    pub distance: f64,
}

/// A balanced kd-tree over a fixed set of 3D points.
///
/// The tree is stored implicitly: `order` is a permutation of the input
/// indices where every range `[lo, hi)` has its splitting point at the range
/// midpoint, split on axis `depth % 3`.
#[derive(Debug, Clone)]
pub struct KdTree {
    points: Vec<Point3<f64>>,
    order: Vec<usize>,
}

impl KdTree {
    /// Build a kd-tree over the given points.
    ///
    /// Returns [`HairError::EmptyInput`] if `points` is empty.
    pub fn build(points: &[Point3<f64>]) -> Result<Self> {
        if points.is_empty() {
            return Err(HairError::empty("kd-tree point set"));
        }

        let mut order: Vec<usize> = (0..points.len()).collect();
        let mut ranges = vec![(0usize, order.len(), 0usize)];

        while let Some((lo, hi, depth)) = ranges.pop() {
            if hi - lo <= 1 {
                continue;
            }
            let axis = depth % 3;
            let mid = lo + (hi - lo) / 2;
            order[lo..hi].select_nth_unstable_by(mid - lo, |&a, &b| {
                points[a][axis].total_cmp(&points[b][axis])
            });
            ranges.push((lo, mid, depth + 1));
            ranges.push((mid + 1, hi, depth + 1));
        }

        Ok(Self {
            points: points.to_vec(),
            order,
        })
    }

    /// Number of points in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a tree cannot be built from an empty point set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// The indexed points, in input order.
    pub fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    /// Find the point nearest to `query`.
    ///
    /// Ties are broken towards the lowest input index so results do not depend
    /// on the tree layout.
    pub fn find(&self, query: &Point3<f64>) -> Nearest {
        let mut best_index = usize::MAX;
        let mut best_dist_sq = f64::INFINITY;

        // (lo, hi, depth, lower bound on squared distance to the range)
        let mut stack = vec![(0usize, self.order.len(), 0usize, 0.0f64)];

        while let Some((lo, hi, depth, bound)) = stack.pop() {
            if lo >= hi || bound > best_dist_sq {
                continue;
            }

            let axis = depth % 3;
            let mid = lo + (hi - lo) / 2;
            let index = self.order[mid];
            let point = &self.points[index];

            let dist_sq = (point - query).norm_squared();
            if dist_sq < best_dist_sq || (dist_sq == best_dist_sq && index < best_index) {
                best_index = index;
                best_dist_sq = dist_sq;
            }

            let diff = query[axis] - point[axis];
            let (near, far) = if diff < 0.0 {
                ((lo, mid), (mid + 1, hi))
            } else {
                ((mid + 1, hi), (lo, mid))
            };

            // Near side is popped first.
            stack.push((far.0, far.1, depth + 1, diff * diff));
            stack.push((near.0, near.1, depth + 1, bound));
        }

        Nearest {
            point: self.points[best_index],
            index: best_index,
            distance: best_dist_sq.sqrt(),
        }
    }
}
