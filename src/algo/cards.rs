//! Quad-strip card geometry.
//!
//! Every simplified strand becomes two crossed ribbons:
//!
//! - a **flat** ribbon offset sideways along `normal × direction`
//! - a **volume** ribbon offset along the scalp normal, at 0.3× the width
//!
//! Both ribbons taper from root to tip. A ribbon of a `k`-point strand has
//! `2k` vertices: side A runs tip to root, side B runs root to tip, so that
//! vertex `i` and vertex `2k - 1 - i` sit on the same strand point.
//!
//! ```text
//!   A: a(k-1) ... a(1) a(0)        (tip ... root)
//!   B: b(0)   b(1) ... b(k-1)      (root ... tip)
//!   quad j: [A j, A j+1, B k-j-2, B k-j-1]
//! ```
//!
//! Side A of the flat ribbon takes its offsets root first, so its tip vertex
//! carries the root half-width. The distance between the first and last
//! vertex of a flat ribbon is then the root plus tip width, which is what UV
//! zone classification measures. The volume ribbon keeps every offset on its
//! own point.
//!
//! All strands of a group share `k`, so the whole group is built with flat
//! buffers in a few passes.

use nalgebra::{Point3, Vector3};

/// Card half-width at the tip, before width scaling.
pub const TIP_WIDTH: f64 = 0.01;

/// Extra half-width added from tip to root, before width scaling.
pub const TAPER_RANGE: f64 = 0.02;

/// Volume ribbon offset relative to the flat ribbon.
pub const VOLUME_SCALE: f64 = 0.3;

/// Card vertices and quads for one group of equal-length strands.
#[derive(Debug, Clone, Default)]
pub struct CardGeometry {
    /// All flat ribbons, then all volume ribbons.
    pub positions: Vec<Point3<f64>>,
    /// Quads indexing into `positions`.
    pub quads: Vec<[usize; 4]>,
}

/// Per-point half-width of a `k`-point strand, root first.
///
/// Decreases linearly from `TIP_WIDTH + TAPER_RANGE * (k - 1) / k` at the root
/// to `TIP_WIDTH` at the tip.
pub fn segment_taper(k: usize) -> Vec<f64> {
    let step = TAPER_RANGE / k as f64;
    (0..k)
        .map(|j| TIP_WIDTH + (k - 1 - j) as f64 * step)
        .collect()
}

/// Width multiplier for very short strands.
///
/// `length` is the distance between the first and last strand point.
pub fn length_correction(length: f64) -> f64 {
    if length < 0.005 {
        0.6
    } else if length < 0.01 {
        0.8
    } else {
        1.0
    }
}

/// Normalized direction from each point to the next.
///
/// The last point reuses the direction of the previous one. Coincident points
/// produce a zero vector.
pub fn growth_directions(points: &[Point3<f64>]) -> Vec<Vector3<f64>> {
    let k = points.len();
    let mut directions: Vec<Vector3<f64>> = (0..k)
        .map(|j| {
            let next = points[(j + 1) % k];
            (next - points[j])
                .try_normalize(1e-12)
                .unwrap_or_else(Vector3::zeros)
        })
        .collect();
    if k > 1 {
        directions[k - 1] = directions[k - 2];
    }
    directions
}

/// Quad indices for `ribbons` consecutive ribbons of `k` points each.
pub fn ribbon_quads(ribbons: usize, k: usize) -> Vec<[usize; 4]> {
    let mut quads = Vec::with_capacity(ribbons * k.saturating_sub(1));
    for r in 0..ribbons {
        let c = r * k * 2;
        for j in 0..k.saturating_sub(1) {
            quads.push([c + j, c + j + 1, c + 2 * k - j - 2, c + 2 * k - j - 1]);
        }
    }
    quads
}

/// Append a flat ribbon: side A is the reversed points pushed by `-offset`
/// in root-first order, side B the points in order pushed by `+offset`.
fn push_flat_ribbon(out: &mut Vec<Point3<f64>>, points: &[Point3<f64>], offsets: &[Vector3<f64>]) {
    out.extend(points.iter().rev().zip(offsets).map(|(p, o)| p - o));
    out.extend(points.iter().zip(offsets).map(|(p, o)| p + o));
}

/// Append a volume ribbon: like [`push_flat_ribbon`] but side A keeps each
/// offset with its point.
fn push_volume_ribbon(out: &mut Vec<Point3<f64>>, points: &[Point3<f64>], offsets: &[Vector3<f64>]) {
    out.extend(points.iter().zip(offsets).rev().map(|(p, o)| p - o));
    out.extend(points.iter().zip(offsets).map(|(p, o)| p + o));
}

/// Build the cards of one group of `k`-point strands.
///
/// # Arguments
///
/// * `strands` - hair coordinate indices of each strand, all of length `k`
/// * `coords` - hair coordinates
/// * `normals` - unit scalp normal at every hair coordinate
/// * `width_scale` - multiplier on card width from the quality tier
///
/// # Returns
///
/// `4k` vertices and `2(k - 1)` quads per strand.
pub fn build_card_group(
    strands: &[Vec<usize>],
    coords: &[Point3<f64>],
    normals: &[Vector3<f64>],
    width_scale: f64,
) -> CardGeometry {
    let Some(k) = strands.first().map(Vec::len) else {
        return CardGeometry::default();
    };
    debug_assert!(strands.iter().all(|s| s.len() == k));

    let taper: Vec<f64> = segment_taper(k).into_iter().map(|t| t * width_scale).collect();

    let mut flat = Vec::with_capacity(strands.len() * 2 * k);
    let mut volume = Vec::with_capacity(strands.len() * 2 * k);

    for strand in strands {
        let points: Vec<Point3<f64>> = strand.iter().map(|&i| coords[i]).collect();
        let scalp: Vec<Vector3<f64>> = strand.iter().map(|&i| normals[i]).collect();
        let directions = growth_directions(&points);
        let correction = length_correction((points[0] - points[k - 1]).norm());

        let lateral: Vec<Vector3<f64>> = (0..k)
            .map(|j| scalp[j].cross(&directions[j]) * taper[j] * correction)
            .collect();
        let lift: Vec<Vector3<f64>> = (0..k)
            .map(|j| scalp[j].abs() * taper[j] * correction * VOLUME_SCALE)
            .collect();

        push_flat_ribbon(&mut flat, &points, &lateral);
        push_volume_ribbon(&mut volume, &points, &lift);
    }

    let mut quads = ribbon_quads(strands.len(), k);
    let offset = flat.len();
    quads.extend(
        ribbon_quads(strands.len(), k)
            .into_iter()
            .map(|q| q.map(|v| v + offset)),
    );

    flat.extend(volume);
    CardGeometry {
        positions: flat,
        quads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A straight strand along +x over a +z scalp.
    fn straight_strand(k: usize, step: f64) -> (Vec<Point3<f64>>, Vec<Vector3<f64>>) {
        let coords = (0..k)
            .map(|j| Point3::new(j as f64 * step, 0.0, 0.0))
            .collect();
        (coords, vec![Vector3::z(); k])
    }

    #[test]
    fn test_segment_taper() {
        let taper = segment_taper(4);
        assert_eq!(taper.len(), 4);
        assert!((taper[0] - 0.025).abs() < 1e-12);
        assert!((taper[3] - 0.01).abs() < 1e-12);
        assert!(taper.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_length_correction() {
        assert_eq!(length_correction(0.2), 1.0);
        assert_eq!(length_correction(0.01), 1.0);
        assert_eq!(length_correction(0.009), 0.8);
        assert_eq!(length_correction(0.004), 0.6);
    }

    #[test]
    fn test_growth_directions_repeat_last() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 2.0, 0.0),
        ];
        let dirs = growth_directions(&points);
        assert_eq!(dirs[0], Vector3::x());
        assert_eq!(dirs[1], Vector3::y());
        assert_eq!(dirs[2], Vector3::y());
    }

    #[test]
    fn test_vertex_and_face_counts() {
        for k in 2..7 {
            let mut coords = Vec::new();
            let mut normals = Vec::new();
            let mut strands = Vec::new();
            for s in 0..3 {
                let (c, n) = straight_strand(k, 0.02);
                let base = coords.len();
                coords.extend(c.into_iter().map(|p| p + Vector3::new(0.0, s as f64, 0.0)));
                normals.extend(n);
                strands.push((base..base + k).collect::<Vec<_>>());
            }

            let cards = build_card_group(&strands, &coords, &normals, 1.0);
            assert_eq!(cards.positions.len(), 3 * 4 * k);
            assert_eq!(cards.quads.len(), 3 * 2 * (k - 1));
        }
    }

    #[test]
    fn test_quads_are_valid() {
        let (coords, normals) = straight_strand(5, 0.03);
        let cards = build_card_group(&[(0..5).collect()], &coords, &normals, 1.0);

        for quad in &cards.quads {
            let mut sorted = quad.to_vec();
            sorted.sort_unstable();
            sorted.dedup();
            assert_eq!(sorted.len(), 4, "quad {:?} has repeated corners", quad);
            assert!(quad.iter().all(|&v| v < cards.positions.len()));

            // Straight strand over a flat scalp: both ribbons are planar
            let p: Vec<_> = quad.iter().map(|&v| cards.positions[v]).collect();
            let n = (p[1] - p[0]).cross(&(p[3] - p[0]));
            assert!(n.norm() > 0.0);
            assert!((p[2] - p[0]).dot(&n).abs() < 1e-12);
        }
    }

    #[test]
    fn test_flat_ribbon_layout() {
        let k = 3;
        let (coords, normals) = straight_strand(k, 0.05);
        let cards = build_card_group(&[(0..k).collect()], &coords, &normals, 1.0);
        let taper = segment_taper(k);

        // z × x = y: side B is pushed to +y, side A to -y with root-first offsets
        for i in 0..k {
            let a = cards.positions[i];
            let b = cards.positions[2 * k - 1 - i];
            let point = k - 1 - i;
            assert!((a.x - coords[point].x).abs() < 1e-12);
            assert!((b.x - coords[point].x).abs() < 1e-12);
            assert!((a.y + taper[i]).abs() < 1e-12);
            assert!((b.y - taper[point]).abs() < 1e-12);
        }
    }

    #[test]
    fn test_flat_ribbon_end_width_spans_root_and_tip() {
        let k = 5;
        let (coords, normals) = straight_strand(k, 0.05);
        let taper = segment_taper(k);

        for width_scale in [0.5, 1.0, 2.0] {
            let cards = build_card_group(&[(0..k).collect()], &coords, &normals, width_scale);
            let width = (cards.positions[0] - cards.positions[2 * k - 1]).norm();
            let expected = (taper[0] + taper[k - 1]) * width_scale;
            assert!((width - expected).abs() < 1e-12, "{} != {}", width, expected);
        }
    }

    #[test]
    fn test_volume_ribbon_offset_along_normal() {
        let k = 3;
        let (coords, normals) = straight_strand(k, 0.05);
        let cards = build_card_group(&[(0..k).collect()], &coords, &normals, 2.0);
        let taper = segment_taper(k);

        let volume = &cards.positions[2 * k..];
        let root_top = volume[2 * k - 1 - (k - 1)];
        assert!((root_top.z - taper[0] * 2.0 * VOLUME_SCALE).abs() < 1e-12);
        assert!(volume.iter().all(|p| p.y == 0.0));
    }

    #[test]
    fn test_short_strands_are_thinner() {
        let (long, normals) = straight_strand(2, 0.02);
        let (short, _) = straight_strand(2, 0.004);
        let wide = build_card_group(&[vec![0, 1]], &long, &normals, 1.0);
        let thin = build_card_group(&[vec![0, 1]], &short, &normals, 1.0);
        let ratio = thin.positions[3].y / wide.positions[3].y;
        assert!((ratio - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_empty_group() {
        let cards = build_card_group(&[], &[], &[], 1.0);
        assert!(cards.positions.is_empty());
        assert!(cards.quads.is_empty());
    }
}
