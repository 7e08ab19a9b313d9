//! Haircap fitting and density painting.
//!
//! The haircap is a template mesh that covers the scalp under the cards. It
//! is fitted in three steps:
//!
//! 1. translate the template to the character location
//! 2. move every vertex by the shape-key displacement of its nearest body
//!    vertex, so the cap follows the deformed head
//! 3. paint each vertex with the summed hair density of the nearest evaluated
//!    body vertex, then blacken the open rim of the cap

use nalgebra::{Point3, Vector3};

use crate::error::{HairError, Result};
use crate::mesh::{Color, PolyMesh, VertexGroup};
use crate::spatial::KdTree;

/// Color of haircap boundary vertices.
pub const BOUNDARY_COLOR: Color = [0.0, 0.0, 0.0, 1.0];

/// Sum the weights of `groups` for every body vertex.
///
/// Unassigned vertices count as weight 0. Sums are rounded to four decimals
/// and clamped to `[0, 1]`.
///
/// # Example
///
/// ```
/// use haircards::algo::haircap::aggregate_density;
/// use haircards::mesh::VertexGroup;
///
/// let crown = VertexGroup::from_weights("crown", [(0, 0.3), (1, 0.9)]);
/// let sides = VertexGroup::from_weights("sides", [(0, 0.4), (1, 0.5)]);
///
/// let density = aggregate_density(&[crown, sides], 3);
/// assert_eq!(density, vec![0.7, 1.0, 0.0]);
/// ```
pub fn aggregate_density(groups: &[VertexGroup], vertex_count: usize) -> Vec<f32> {
    (0..vertex_count)
        .map(|v| {
            let sum: f32 = groups.iter().filter_map(|g| g.weight(v)).sum();
            ((sum * 10_000.0).round() / 10_000.0).clamp(0.0, 1.0)
        })
        .collect()
}

/// Move every vertex by the displacement of its nearest base vertex.
///
/// `base` indexes the undeformed body vertices and `evaluated` holds the same
/// vertices with deformation applied.
pub fn displace_by_nearest(
    positions: &mut [Point3<f64>],
    base: &KdTree,
    evaluated: &[Point3<f64>],
) -> Result<()> {
    if evaluated.len() != base.len() {
        return Err(HairError::AttributeMismatch {
            attribute: "evaluated coordinates",
            found: evaluated.len(),
            expected: base.len(),
        });
    }

    for p in positions.iter_mut() {
        let nearest = base.find(p);
        *p += evaluated[nearest.index] - nearest.point;
    }
    Ok(())
}

/// Per-vertex density color sampled at `samples`.
pub fn density_colors(samples: &[Point3<f64>], evaluated: &KdTree, density: &[f32]) -> Vec<Color> {
    samples
        .iter()
        .map(|p| {
            let d = density[evaluated.find(p).index];
            [d, d, d, 1.0]
        })
        .collect()
}

/// Set both endpoints of every boundary edge to [`BOUNDARY_COLOR`].
///
/// Meshes without a color layer are left unchanged.
pub fn zero_boundary_colors(mesh: &mut PolyMesh) {
    let boundary = mesh.boundary_edges();
    if let Some(colors) = mesh.colors_mut() {
        for [a, b] in boundary {
            colors[a] = BOUNDARY_COLOR;
            colors[b] = BOUNDARY_COLOR;
        }
    }
}

/// Fit a haircap template onto a character and paint its density colors.
///
/// # Arguments
///
/// * `template` - the haircap mesh in object space
/// * `location` - world location of the character
/// * `base` - kd-tree over the undeformed body world coordinates
/// * `evaluated` - kd-tree over the deformed body world coordinates, in the
///   same vertex order as `base`
/// * `density` - aggregated density per body vertex, see [`aggregate_density`]
pub fn fit_haircap(
    mut template: PolyMesh,
    location: &Vector3<f64>,
    base: &KdTree,
    evaluated: &KdTree,
    density: &[f32],
) -> Result<PolyMesh> {
    if density.len() != evaluated.len() {
        return Err(HairError::AttributeMismatch {
            attribute: "density",
            found: density.len(),
            expected: evaluated.len(),
        });
    }

    template.translate(location);
    let samples = template.positions().to_vec();

    displace_by_nearest(template.positions_mut(), base, evaluated.points())?;

    template.set_colors(density_colors(&samples, evaluated, density))?;
    zero_boundary_colors(&mut template);

    log::debug!(
        "fitted haircap: {} vertices, {} boundary edges",
        template.num_vertices(),
        template.boundary_edges().len()
    );

    Ok(template)
}
