//! Haircard generation for one character.
//!
//! A [`HairCollection`] owns everything derived from a hair mesh: the world
//! space hair coordinates, the scalp normal under every hair point and the
//! extracted strands. From there it builds the haircard objects, maps their
//! UVs, binds the card material and fits the haircap.
//!
//! # Example
//!
//! ```no_run
//! use haircards::prelude::*;
//! use rand::SeedableRng;
//! use rand_pcg::Pcg32;
//!
//! let assets = AssetLibrary::new("content");
//! let surface = haircards::io::ply::load_surface("body.ply").unwrap();
//! let hair = haircards::io::ply::load_hair("hair.ply").unwrap();
//!
//! let mut collection = HairCollection::new(hair, &surface).unwrap();
//! collection.create_mesh(QualityTier::High).unwrap();
//!
//! let atlas = UvZoneAtlas::load(assets.zone_atlas()).unwrap();
//! collection.add_uvs(&atlas, &mut Pcg32::seed_from_u64(0)).unwrap();
//! collection.add_material(Material::load(assets.card_material()).unwrap());
//!
//! for object in collection.objects() {
//!     println!("{}: {} quads", object.name, object.mesh.num_faces());
//! }
//! ```

use nalgebra::{Point3, Vector3};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::algo::cards::build_card_group;
use crate::algo::classify::downsample;
use crate::algo::haircap::{aggregate_density, fit_haircap};
use crate::algo::progress::{Progress, Stage};
use crate::algo::simplify::simplify_and_group;
use crate::algo::strands::{extract_strands, Strand};
use crate::algo::uv_zones::{assign_uvs, UvZoneAtlas};
use crate::config::QualityTier;
use crate::error::{HairError, Result};
use crate::material::Material;
use crate::mesh::{HairMesh, PolyMesh, ReferenceSurface, VertexGroup};
use crate::spatial::KdTree;

/// Options for a full generation run, see [`HairCollection::generate`].
#[derive(Debug, Default)]
pub struct GenerationOptions {
    /// Quality preset.
    pub quality: QualityTier,
    /// Seed of the UV zone choice.
    pub seed: u64,
    /// Progress callback.
    pub progress: Progress,
}

impl GenerationOptions {
    /// Set the quality preset.
    pub fn with_quality(mut self, quality: QualityTier) -> Self {
        self.quality = quality;
        self
    }

    /// Set the UV seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set the progress callback.
    pub fn with_progress(mut self, progress: Progress) -> Self {
        self.progress = progress;
        self
    }
}

/// One generated haircard mesh, holding every card built from strands that
/// simplified to the same point count.
#[derive(Debug, Clone)]
pub struct HaircardObject {
    /// Object name, `hair_<point_count>`.
    pub name: String,
    /// Points per simplified strand.
    pub point_count: usize,
    /// Number of strands in the mesh.
    pub strand_count: usize,
    /// Card geometry: flat ribbons, then volume ribbons.
    pub mesh: PolyMesh,
    /// Name of the bound material.
    pub material: Option<String>,
}

/// Haircap template as loaded from the asset library.
#[derive(Debug, Clone)]
pub struct HaircapTemplate {
    /// Cap mesh in object space.
    pub mesh: PolyMesh,
    /// Cap material, if the template has one.
    pub material: Option<Material>,
}

/// A haircap fitted onto the character.
#[derive(Debug, Clone)]
pub struct HaircapObject {
    /// Deformed cap mesh with density colors.
    pub mesh: PolyMesh,
    /// Cap material, if any.
    pub material: Option<Material>,
}

/// Haircard generator for one hair system.
#[derive(Debug)]
pub struct HairCollection {
    coords: Vec<Point3<f64>>,
    normals: Vec<Vector3<f64>>,
    strands: Vec<Strand>,
    evaluated: KdTree,
    objects: Vec<HaircardObject>,
    material: Option<Material>,
    haircap: Option<HaircapObject>,
}

impl HairCollection {
    /// Prepare a hair mesh grown on `surface`.
    ///
    /// Builds the nearest-vertex index over the deformed body, looks up the
    /// scalp normal under every hair point and extracts the strands. The hair
    /// mesh is consumed.
    pub fn new(hair: HairMesh, surface: &ReferenceSurface) -> Result<Self> {
        let evaluated = KdTree::build(&surface.evaluated_world_coords())?;
        let coords = hair.world_coords();
        let normals = coords
            .iter()
            .map(|p| surface.normal(evaluated.find(p).index))
            .collect();
        let strands: Vec<Strand> = extract_strands(&hair, &coords)?.collect();

        log::info!(
            "extracted {} strands from {} hair points",
            strands.len(),
            coords.len()
        );

        Ok(Self {
            coords,
            normals,
            strands,
            evaluated,
            objects: Vec::new(),
            material: None,
            haircap: None,
        })
    }

    /// Hair coordinates in world space.
    pub fn coords(&self) -> &[Point3<f64>] {
        &self.coords
    }

    /// Extracted strands.
    pub fn strands(&self) -> &[Strand] {
        &self.strands
    }

    /// Generated haircard objects, ordered by point count.
    pub fn objects(&self) -> &[HaircardObject] {
        &self.objects
    }

    /// Take ownership of the generated haircard objects.
    pub fn into_objects(self) -> Vec<HaircardObject> {
        self.objects
    }

    /// The bound card material.
    pub fn material(&self) -> Option<&Material> {
        self.material.as_ref()
    }

    /// The fitted haircap.
    pub fn haircap(&self) -> Option<&HaircapObject> {
        self.haircap.as_ref()
    }

    /// Remove and return the fitted haircap.
    pub fn take_haircap(&mut self) -> Option<HaircapObject> {
        self.haircap.take()
    }

    /// Build the haircard objects for `quality`.
    ///
    /// Replaces any previously generated objects.
    pub fn create_mesh(&mut self, quality: QualityTier) -> Result<&[HaircardObject]> {
        self.create_mesh_with_progress(quality, &Progress::none())
    }

    /// [`create_mesh`](Self::create_mesh) with progress reporting.
    pub fn create_mesh_with_progress(
        &mut self,
        quality: QualityTier,
        progress: &Progress,
    ) -> Result<&[HaircardObject]> {
        let settings = quality.settings();
        progress.report(Stage::Extract, self.strands.len(), self.strands.len());

        let kept = downsample(&self.strands, &settings);
        progress.report(Stage::Downsample, kept.len(), self.strands.len());

        let groups = simplify_and_group(kept, &self.coords, settings.epsilon);
        progress.report(Stage::Simplify, groups.len(), groups.len());

        let mut objects = Vec::with_capacity(groups.len());
        for (i, (&point_count, strands)) in groups.iter().enumerate() {
            progress.report(Stage::Build, i, groups.len());
            if point_count < 2 {
                log::debug!("skipping {} strands with {} points", strands.len(), point_count);
                continue;
            }

            let cards =
                build_card_group(strands, &self.coords, &self.normals, settings.width_scale);
            let mut mesh = PolyMesh::from_quads(cards.positions, &cards.quads)?;
            mesh.set_smooth(true);

            log::debug!(
                "hair_{}: {} strands, {} quads",
                point_count,
                strands.len(),
                mesh.num_faces()
            );

            objects.push(HaircardObject {
                name: format!("hair_{}", point_count),
                point_count,
                strand_count: strands.len(),
                mesh,
                material: self.material.as_ref().map(|m| m.name.clone()),
            });
        }
        progress.report(Stage::Build, groups.len(), groups.len());

        log::info!(
            "created {} haircard objects at {} quality",
            objects.len(),
            quality
        );

        self.objects = objects;
        Ok(&self.objects)
    }

    /// Give every haircard object a UV layer mapped onto `atlas`.
    ///
    /// Objects without faces are skipped.
    pub fn add_uvs<R: Rng + ?Sized>(&mut self, atlas: &UvZoneAtlas, rng: &mut R) -> Result<()> {
        self.add_uvs_with_progress(atlas, rng, &Progress::none())
    }

    fn add_uvs_with_progress<R: Rng + ?Sized>(
        &mut self,
        atlas: &UvZoneAtlas,
        rng: &mut R,
        progress: &Progress,
    ) -> Result<()> {
        let total = self.objects.len();
        for (i, object) in self.objects.iter_mut().enumerate() {
            progress.report(Stage::Uv, i, total);
            if !assign_uvs(&mut object.mesh, object.point_count, atlas, rng)? {
                log::debug!("{} has no faces, no UV layer added", object.name);
            }
        }
        progress.report(Stage::Uv, total, total);
        Ok(())
    }

    /// Build the haircards for `options.quality` and map their UVs with a
    /// generator seeded from `options.seed`.
    pub fn generate(&mut self, atlas: &UvZoneAtlas, options: &GenerationOptions) -> Result<()> {
        self.create_mesh_with_progress(options.quality, &options.progress)?;
        let mut rng = Pcg32::seed_from_u64(options.seed);
        self.add_uvs_with_progress(atlas, &mut rng, &options.progress)
    }

    /// Bind the card material to every haircard object.
    ///
    /// The collection keeps its own instance, so node values set later do
    /// not leak into the material the caller loaded.
    pub fn add_material(&mut self, material: Material) {
        for object in &mut self.objects {
            object.material = Some(material.name.clone());
        }
        self.material = Some(material);
    }

    /// Fit `template` onto the scalp and paint it with hair density.
    ///
    /// # Arguments
    ///
    /// * `surface` - the body the collection was created from
    /// * `template` - haircap mesh and material
    /// * `location` - world location of the character
    /// * `density_groups` - vertex groups whose summed weights give density
    pub fn add_haircap(
        &mut self,
        surface: &ReferenceSurface,
        template: HaircapTemplate,
        location: &Vector3<f64>,
        density_groups: &[VertexGroup],
    ) -> Result<&HaircapObject> {
        let base = KdTree::build(&surface.world_coords())?;
        let density = aggregate_density(density_groups, surface.num_vertices());
        let mesh = fit_haircap(template.mesh, location, &base, &self.evaluated, &density)?;

        log::info!(
            "fitted haircap with {} vertices from {} density groups",
            mesh.num_vertices(),
            density_groups.len()
        );

        Ok(&*self.haircap.insert(HaircapObject {
            mesh,
            material: template.material,
        }))
    }

    /// Copy hair tint inputs from the character's hair material into the
    /// card material and the haircap material.
    ///
    /// # Errors
    ///
    /// * `MissingMaterial` if no card material is bound
    /// * `MissingNode` if a material involved has no node group
    pub fn set_node_values(&mut self, hair_material: &Material) -> Result<()> {
        let cards = self
            .material
            .as_mut()
            .ok_or(HairError::MissingMaterial("haircards"))?;
        cards.copy_node_values(hair_material)?;

        match self.haircap.as_mut().and_then(|cap| cap.material.as_mut()) {
            Some(cap) => cap.copy_node_values(hair_material)?,
            None => log::debug!("no haircap material, skipping node values"),
        }
        Ok(())
    }
}
