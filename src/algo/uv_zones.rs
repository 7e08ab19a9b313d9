//! UV zone assignment for haircards.
//!
//! The hair texture is an atlas of strand images. Each image rectangle is
//! registered in a [`UvZoneAtlas`] under a length class (`long`/`short`), a
//! zone group name and a width class (`wide`/`narrow`). Every card ribbon is
//! measured, classified and mapped onto one rectangle picked at random from
//! the matching bucket.
//!
//! # Atlas format
//!
//! ```json
//! {
//!   "long":  { "zone_a": { "wide": [[[0.0, 0.0], [0.1, 0.5]]], "narrow": [] } },
//!   "short": { "zone_b": { "wide": [], "narrow": [[[0.5, 0.5], [0.55, 0.7]]] } }
//! }
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use nalgebra::Point2;
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{HairError, Result};
use crate::mesh::PolyMesh;

/// Ribbons longer than this use the `long` zones.
pub const LONG_CARD_MIN: f64 = 0.05;

/// Long ribbons wider than this use `wide` rectangles.
pub const LONG_WIDE_MIN: f64 = 0.02;

/// Short ribbons wider than this use `wide` rectangles.
pub const SHORT_WIDE_MIN: f64 = 0.01;

/// Axis-aligned rectangle in UV space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[[f64; 2]; 2]", into = "[[f64; 2]; 2]")]
pub struct UvRect {
    /// Bottom-left corner.
    pub min: Point2<f64>,
    /// Top-right corner.
    pub max: Point2<f64>,
}

impl From<[[f64; 2]; 2]> for UvRect {
    fn from([min, max]: [[f64; 2]; 2]) -> Self {
        Self {
            min: Point2::new(min[0], min[1]),
            max: Point2::new(max[0], max[1]),
        }
    }
}

impl From<UvRect> for [[f64; 2]; 2] {
    fn from(rect: UvRect) -> Self {
        [[rect.min.x, rect.min.y], [rect.max.x, rect.max.y]]
    }
}

/// Length class of a card ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardLength {
    /// Root-to-tip distance above [`LONG_CARD_MIN`].
    Long,
    /// Everything else.
    Short,
}

/// Width class of a card ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardWidth {
    /// Root width above the class threshold.
    Wide,
    /// Everything else.
    Narrow,
}

impl fmt::Display for CardLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CardLength::Long => "long",
            CardLength::Short => "short",
        })
    }
}

impl fmt::Display for CardWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CardWidth::Wide => "wide",
            CardWidth::Narrow => "narrow",
        })
    }
}

/// Rectangles of one zone group, split by width class.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ZoneGroup {
    /// Rectangles for wide ribbons.
    #[serde(default)]
    pub wide: Vec<UvRect>,
    /// Rectangles for narrow ribbons.
    #[serde(default)]
    pub narrow: Vec<UvRect>,
}

impl ZoneGroup {
    /// Rectangles for `width`.
    pub fn rects(&self, width: CardWidth) -> &[UvRect] {
        match width {
            CardWidth::Wide => &self.wide,
            CardWidth::Narrow => &self.narrow,
        }
    }
}

/// Texture atlas zones keyed by length class and zone group name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UvZoneAtlas {
    /// Zone groups for long ribbons.
    #[serde(default)]
    pub long: BTreeMap<String, ZoneGroup>,
    /// Zone groups for short ribbons.
    #[serde(default)]
    pub short: BTreeMap<String, ZoneGroup>,
}

impl UvZoneAtlas {
    /// Load an atlas from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::io::json::load(path)
    }

    /// Parse an atlas from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Zone groups for `length`.
    pub fn groups(&self, length: CardLength) -> &BTreeMap<String, ZoneGroup> {
        match length {
            CardLength::Long => &self.long,
            CardLength::Short => &self.short,
        }
    }

    /// Pick a rectangle for a ribbon class.
    ///
    /// A zone group is drawn uniformly among the groups that have rectangles
    /// for `width`, then a rectangle uniformly from that group.
    pub fn choose<R: Rng + ?Sized>(
        &self,
        length: CardLength,
        width: CardWidth,
        rng: &mut R,
    ) -> Result<UvRect> {
        let candidates: Vec<&ZoneGroup> = self
            .groups(length)
            .values()
            .filter(|group| !group.rects(width).is_empty())
            .collect();

        candidates
            .choose(rng)
            .and_then(|group| group.rects(width).choose(rng))
            .copied()
            .ok_or_else(|| HairError::MissingZone {
                category: format!("{}/{}", length, width),
            })
    }
}

/// Classify a ribbon by its root-to-tip length and root width.
pub fn classify_card(length: f64, width: f64) -> (CardLength, CardWidth) {
    if length > LONG_CARD_MIN {
        let width = if width > LONG_WIDE_MIN {
            CardWidth::Wide
        } else {
            CardWidth::Narrow
        };
        (CardLength::Long, width)
    } else {
        let width = if width > SHORT_WIDE_MIN {
            CardWidth::Wide
        } else {
            CardWidth::Narrow
        };
        (CardLength::Short, width)
    }
}

/// UV coordinates of one `k`-point ribbon mapped onto `rect`.
///
/// Vertex `i` and vertex `2k - 1 - i` share a height; side A sits on the
/// right edge of the rectangle and side B on the left.
pub fn ribbon_uvs(rect: &UvRect, k: usize) -> Vec<Point2<f64>> {
    let span = rect.max.y - rect.min.y;
    let denom = k.saturating_sub(1).max(1) as f64;
    let mut uvs = vec![Point2::origin(); 2 * k];
    for i in 0..k {
        let v = rect.min.y + span * i as f64 / denom;
        uvs[i] = Point2::new(rect.max.x, v);
        uvs[2 * k - 1 - i] = Point2::new(rect.min.x, v);
    }
    uvs
}

/// Give every ribbon of a card mesh a UV layer.
///
/// `k` is the strand point count the card was built from. Meshes without
/// faces are left untouched and `Ok(false)` is returned.
///
/// # Errors
///
/// * `InvalidParameter` if `k < 2` or the vertex count is not a multiple of
///   `2k`
/// * `MissingZone` if the atlas has no rectangle for a ribbon's class
pub fn assign_uvs<R: Rng + ?Sized>(
    mesh: &mut PolyMesh,
    k: usize,
    atlas: &UvZoneAtlas,
    rng: &mut R,
) -> Result<bool> {
    if mesh.num_faces() == 0 {
        return Ok(false);
    }
    if k < 2 {
        return Err(HairError::invalid_param(
            "point_count",
            k,
            "ribbons need at least two points",
        ));
    }
    let ribbon = 2 * k;
    if mesh.num_vertices() % ribbon != 0 {
        return Err(HairError::invalid_param(
            "point_count",
            k,
            "vertex count is not a multiple of the ribbon size",
        ));
    }

    let mut uvs = Vec::with_capacity(mesh.num_vertices());
    for verts in mesh.positions().chunks_exact(ribbon) {
        let length = (verts[0] - verts[k]).norm();
        let width = (verts[0] - verts[ribbon - 1]).norm();
        let (length_class, width_class) = classify_card(length, width);
        let rect = atlas.choose(length_class, width_class, rng)?;
        uvs.extend(ribbon_uvs(&rect, k));
    }

    mesh.set_uvs(uvs)?;
    Ok(true)
}
