//! Polyline simplification for hair strands.
//!
//! Strands are reduced with the Ramer–Douglas–Peucker algorithm and then
//! grouped by their remaining point count, so that each group can be turned
//! into cards with uniformly shaped buffers.
//!
//! # References
//!
//! - Douglas, D. & Peucker, T. (1973). "Algorithms for the reduction of the
//!   number of points required to represent a digitized line or its
//!   caricature." Cartographica.

use std::collections::BTreeMap;

use nalgebra::Point3;

use super::strands::Strand;

/// Simplified strands keyed by point count.
///
/// Each value lists the hair coordinate indices of every strand with that
/// many points.
pub type StrandGroups = BTreeMap<usize, Vec<Vec<usize>>>;

/// Distance from `point` to the infinite line through `start` and `end`.
///
/// Falls back to the distance to `start` when the line is degenerate.
fn line_distance(point: &Point3<f64>, start: &Point3<f64>, end: &Point3<f64>) -> f64 {
    let axis = end - start;
    let axis_len = axis.norm();
    if axis_len == 0.0 {
        return (point - start).norm();
    }
    axis.cross(&(start - point)).norm() / axis_len
}

/// Compute the Ramer–Douglas–Peucker keep-mask of a polyline.
///
/// Point `i` is kept when `mask[i]` is true. The first and last points are
/// always kept. Ranges are split at their farthest point as long as that
/// distance exceeds `epsilon`.
///
/// # Example
///
/// ```
/// use haircards::algo::simplify::rdp_mask;
/// use nalgebra::Point3;
///
/// let points = vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.001, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
///     Point3::new(3.0, 1.0, 0.0),
/// ];
/// assert_eq!(rdp_mask(&points, 0.01), vec![true, false, true, true]);
/// ```
pub fn rdp_mask(points: &[Point3<f64>], epsilon: f64) -> Vec<bool> {
    let n = points.len();
    let mut keep = vec![true; n];
    if n < 3 {
        return keep;
    }

    let mut ranges = vec![(0usize, n - 1)];
    while let Some((start, last)) = ranges.pop() {
        let mut max_dist = 0.0;
        let mut split = start;

        for i in start + 1..last {
            if !keep[i] {
                continue;
            }
            let d = line_distance(&points[i], &points[start], &points[last]);
            if d > max_dist {
                max_dist = d;
                split = i;
            }
        }

        if max_dist > epsilon {
            ranges.push((start, split));
            ranges.push((split, last));
        } else {
            for flag in &mut keep[start + 1..last] {
                *flag = false;
            }
        }
    }

    keep
}

/// Simplify a strand, returning the retained hair coordinate indices.
pub fn simplify_strand(strand: &Strand, coords: &[Point3<f64>], epsilon: f64) -> Vec<usize> {
    let points: Vec<Point3<f64>> = strand.indices().iter().map(|&i| coords[i]).collect();
    let mask = rdp_mask(&points, epsilon);
    strand
        .indices()
        .iter()
        .zip(mask)
        .filter_map(|(&i, keep)| keep.then_some(i))
        .collect()
}

/// Simplify strands and group them by resulting point count.
pub fn simplify_and_group<'a, I>(strands: I, coords: &[Point3<f64>], epsilon: f64) -> StrandGroups
where
    I: IntoIterator<Item = &'a Strand>,
{
    let mut groups = StrandGroups::new();
    for strand in strands {
        let simplified = simplify_strand(strand, coords, epsilon);
        groups.entry(simplified.len()).or_default().push(simplified);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag(n: usize, amplitude: f64) -> Vec<Point3<f64>> {
        (0..n)
            .map(|i| {
                let y = if i % 2 == 0 { 0.0 } else { amplitude };
                Point3::new(i as f64 * 0.01, y, 0.0)
            })
            .collect()
    }

    #[test]
    fn test_straight_line_collapses_to_endpoints() {
        let points: Vec<_> = (0..10).map(|i| Point3::new(0.0, 0.0, i as f64)).collect();
        let mask = rdp_mask(&points, 1e-6);
        assert!(mask[0] && mask[9]);
        assert_eq!(mask.iter().filter(|&&k| k).count(), 2);
    }

    #[test]
    fn test_endpoints_always_kept() {
        for n in 0..12 {
            let points = zigzag(n, 0.5);
            for &eps in &[0.0, 0.003, 10.0] {
                let mask = rdp_mask(&points, eps);
                assert_eq!(mask.len(), n);
                if n > 0 {
                    assert!(mask[0]);
                    assert!(mask[n - 1]);
                }
            }
        }
    }

    #[test]
    fn test_large_features_survive() {
        let points = zigzag(7, 0.5);
        let mask = rdp_mask(&points, 0.003);
        assert!(mask.iter().all(|&k| k));
    }

    #[test]
    fn test_degenerate_range_uses_point_distance() {
        // Loop returning to its start
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ];
        assert_eq!(rdp_mask(&points, 0.5), vec![true, true, true]);
        assert_eq!(rdp_mask(&points, 2.0), vec![true, false, true]);
    }

    #[test]
    fn test_simplify_strand_maps_indices() {
        let coords = vec![
            Point3::new(9.0, 9.0, 9.0), // unused
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 2.0),
        ];
        let strand = Strand::new(vec![1, 2, 3], 1.0);
        assert_eq!(simplify_strand(&strand, &coords, 0.001), vec![1, 3]);
    }

    #[test]
    fn test_group_by_point_count() {
        let coords = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 2.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.5, 0.0, 1.0),
            Point3::new(1.0, 0.0, 2.0),
        ];
        let strands = vec![
            Strand::new(vec![0, 1, 2], 2.0),
            Strand::new(vec![3, 4, 5], 2.0),
        ];
        let groups = simplify_and_group(&strands, &coords, 0.01);
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[&2], vec![vec![0, 2]]);
        assert_eq!(groups[&3], vec![vec![3, 4, 5]]);
    }
}
