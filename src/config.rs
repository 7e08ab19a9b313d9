//! Quality presets and asset locations.
//!
//! [`QualityTier`] selects how aggressively strands are thinned and
//! simplified. [`AssetLibrary`] resolves the bundled assets (UV zone atlas,
//! card material, haircap template) below an explicit content root.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::HairError;

/// Named quality preset for haircard generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityTier {
    /// Densest cards, thinnest width.
    Ultra,
    /// Default preset.
    #[default]
    High,
    /// Fewer strands, coarser curves.
    Medium,
    /// Fewest strands, widest cards.
    Low,
}

/// Parameters controlled by a [`QualityTier`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QualitySettings {
    /// Keep every Nth short strand when the short bucket is large.
    pub short_stride: usize,
    /// Keep every Nth medium strand when the medium bucket is large.
    pub medium_stride: usize,
    /// Keep every Nth long strand when the long bucket is large.
    pub long_stride: usize,
    /// Curve simplification tolerance, in world units.
    pub epsilon: f64,
    /// Multiplier on card width.
    pub width_scale: f64,
}

impl QualityTier {
    /// All tiers, densest first.
    pub const ALL: [QualityTier; 4] = [
        QualityTier::Ultra,
        QualityTier::High,
        QualityTier::Medium,
        QualityTier::Low,
    ];

    /// The parameters for this tier.
    pub fn settings(self) -> QualitySettings {
        let (short_stride, medium_stride, long_stride, epsilon, width_scale) = match self {
            QualityTier::Ultra => (1, 5, 6, 0.002, 0.5),
            QualityTier::High => (3, 6, 6, 0.003, 1.0),
            QualityTier::Medium => (6, 12, 14, 0.005, 1.0),
            QualityTier::Low => (15, 20, 20, 0.005, 2.0),
        };
        QualitySettings {
            short_stride,
            medium_stride,
            long_stride,
            epsilon,
            width_scale,
        }
    }

    /// Lowercase name of the tier.
    pub fn name(self) -> &'static str {
        match self {
            QualityTier::Ultra => "ultra",
            QualityTier::High => "high",
            QualityTier::Medium => "medium",
            QualityTier::Low => "low",
        }
    }
}

impl fmt::Display for QualityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for QualityTier {
    type Err = HairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QualityTier::ALL
            .into_iter()
            .find(|tier| tier.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| HairError::invalid_param("quality", s, "expected ultra, high, medium or low"))
    }
}

/// Location of the bundled content used during generation.
///
/// All paths are relative to a content root directory:
///
/// | Asset | Path |
/// |-------|------|
/// | UV zone atlas | `hair/haircards/HairMediumLength_zones.json` |
/// | Card material | `hair/haircards/haircards_material.json` |
/// | Haircap template | `hair/haircards/haircap.ply` |
/// | Haircap material | `hair/haircards/haircap_material.json` |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLibrary {
    root: PathBuf,
}

impl AssetLibrary {
    /// Create a library rooted at `root`.
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// The content root.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn haircards_dir(&self) -> PathBuf {
        self.root.join("hair").join("haircards")
    }

    /// Path of the UV zone atlas descriptor.
    pub fn zone_atlas(&self) -> PathBuf {
        self.haircards_dir().join("HairMediumLength_zones.json")
    }

    /// Path of the haircard material template.
    pub fn card_material(&self) -> PathBuf {
        self.haircards_dir().join("haircards_material.json")
    }

    /// Path of the haircap template mesh.
    pub fn haircap(&self) -> PathBuf {
        self.haircards_dir().join("haircap.ply")
    }

    /// Path of the haircap material.
    pub fn haircap_material(&self) -> PathBuf {
        self.haircards_dir().join("haircap_material.json")
    }
}
