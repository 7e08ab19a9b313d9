//! Haircards CLI - haircard generation command-line tool.
//!
//! Usage: haircards <COMMAND> [OPTIONS]
//!
//! Run `haircards --help` for available commands.

use std::cell::Cell;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::{Parser, Subcommand, ValueEnum};
use nalgebra::Vector3;

use haircards::algo::classify::{classify, downsample};
use haircards::algo::progress::{Progress, Stage};
use haircards::algo::strands::extract_strands;
use haircards::algo::uv_zones::UvZoneAtlas;
use haircards::collection::{GenerationOptions, HairCollection, HaircapTemplate};
use haircards::config::{AssetLibrary, QualityTier};
use haircards::io::{self, Format};
use haircards::material::Material;
use haircards::mesh::ShapeKey;

#[derive(Parser)]
#[command(name = "haircards")]
#[command(author, version, about = "Haircard generation CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display strand statistics of a hair mesh
    Info {
        /// Hair edge mesh (PLY with an edge element)
        hair: PathBuf,

        /// Also show how many strands each quality tier keeps
        #[arg(long)]
        tiers: bool,
    },

    /// Generate haircards (and optionally a haircap) for a character
    Generate {
        /// Body surface mesh (PLY)
        #[arg(long)]
        body: PathBuf,

        /// Hair edge mesh (PLY with an edge element)
        #[arg(long)]
        hair: PathBuf,

        /// Content root holding hair/haircards/
        #[arg(long)]
        assets: PathBuf,

        /// Output directory
        #[arg(short, long)]
        out_dir: PathBuf,

        /// Quality preset
        #[arg(short, long, value_enum, default_value = "high")]
        quality: Quality,

        /// Seed of the UV zone choice
        #[arg(short, long, default_value = "0")]
        seed: u64,

        /// Output mesh format
        #[arg(short, long, value_enum, default_value = "obj")]
        format: OutputFormat,

        /// Body shape key as PATH=VALUE, PATH being a PLY copy of the body
        #[arg(long = "shape-key", value_parser = parse_shape_key)]
        shape_keys: Vec<(PathBuf, f64)>,

        /// Density vertex groups (JSON); fits the haircap when given
        #[arg(long)]
        groups: Option<PathBuf>,

        /// Character location as X,Y,Z
        #[arg(long, value_delimiter = ',', num_args = 3, default_value = "0,0,0")]
        location: Vec<f64>,

        /// Character hair material (JSON) to copy Lightness and Redness from
        #[arg(long)]
        hair_material: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Quality {
    /// Densest cards, thinnest width
    Ultra,
    /// Default preset
    High,
    /// Fewer strands, coarser curves
    Medium,
    /// Fewest strands, widest cards
    Low,
}

impl From<Quality> for QualityTier {
    fn from(quality: Quality) -> Self {
        match quality {
            Quality::Ultra => QualityTier::Ultra,
            Quality::High => QualityTier::High,
            Quality::Medium => QualityTier::Medium,
            Quality::Low => QualityTier::Low,
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Wavefront OBJ with UVs and material reference
    Obj,
    /// ASCII PLY with UVs
    Ply,
}

impl From<OutputFormat> for Format {
    fn from(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Obj => Format::Obj,
            OutputFormat::Ply => Format::Ply,
        }
    }
}

fn parse_shape_key(s: &str) -> Result<(PathBuf, f64), String> {
    let (path, value) = s
        .rsplit_once('=')
        .ok_or_else(|| format!("expected PATH=VALUE, got '{}'", s))?;
    let value: f64 = value
        .parse()
        .map_err(|e| format!("invalid shape key value '{}': {}", value, e))?;
    Ok((PathBuf::from(path), value))
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { hair, tiers } => {
            cmd_info(&hair, tiers)?;
        }

        Commands::Generate {
            body,
            hair,
            assets,
            out_dir,
            quality,
            seed,
            format,
            shape_keys,
            groups,
            location,
            hair_material,
        } => {
            let location = Vector3::new(location[0], location[1], location[2]);
            let request = GenerateRequest {
                body,
                hair,
                assets: AssetLibrary::new(assets),
                out_dir,
                options: GenerationOptions::default()
                    .with_quality(quality.into())
                    .with_seed(seed)
                    .with_progress(create_progress()),
                format: format.into(),
                shape_keys,
                groups,
                location,
                hair_material,
            };
            cmd_generate(request)?;
        }
    }

    Ok(())
}

/// Create a progress reporter that draws a bar for the whole run on stderr.
fn create_progress() -> Progress {
    let last_percent = Cell::new(0usize);

    Progress::new(move |event| {
        let percent = (event.overall() * 100.0).round() as usize;

        // Only move forward, and only redraw on change
        if percent <= last_percent.get() && event.stage != Stage::Uv {
            return;
        }
        last_percent.set(percent.max(last_percent.get()));

        let bar_width = 30;
        let filled = (last_percent.get() * bar_width) / 100;
        let empty = bar_width - filled;

        eprint!(
            "\r[{}{}] {:3}% {:<20}",
            "=".repeat(filled),
            " ".repeat(empty),
            last_percent.get(),
            event.stage.label()
        );
        let _ = std::io::stderr().flush();

        if event.stage == Stage::Uv && event.current >= event.total {
            eprintln!();
        }
    })
}

fn cmd_info(input: &Path, show_tiers: bool) -> Result<(), Box<dyn std::error::Error>> {
    let hair = io::ply::load_hair(input)?;
    let coords = hair.world_coords();
    let strands: Vec<_> = extract_strands(&hair, &coords)?.collect();

    println!("File: {}", input.display());
    println!("Points: {}", hair.num_points());
    println!("Edges: {}", hair.num_edges());
    println!("Strands: {}", strands.len());

    if strands.is_empty() {
        return Ok(());
    }

    let buckets = classify(&strands);
    println!("  Short  (<= 0.05): {}", buckets.short.len());
    println!("  Medium (<= 0.1):  {}", buckets.medium.len());
    println!("  Long   (> 0.1):   {}", buckets.long.len());

    let min_len = strands.iter().map(|s| s.length()).fold(f64::INFINITY, f64::min);
    let max_len = strands.iter().map(|s| s.length()).fold(0.0_f64, f64::max);
    let avg_points = strands.iter().map(|s| s.len()).sum::<usize>() as f64 / strands.len() as f64;
    println!("Strand length range: [{:.4}, {:.4}]", min_len, max_len);
    println!("Average points per strand: {:.1}", avg_points);

    if show_tiers {
        println!("\nStrands kept per quality tier:");
        for tier in QualityTier::ALL {
            let kept = downsample(&strands, &tier.settings());
            println!("  {:<6} {}", tier, kept.len());
        }
    }

    Ok(())
}

struct GenerateRequest {
    body: PathBuf,
    hair: PathBuf,
    assets: AssetLibrary,
    out_dir: PathBuf,
    options: GenerationOptions,
    format: Format,
    shape_keys: Vec<(PathBuf, f64)>,
    groups: Option<PathBuf>,
    location: Vector3<f64>,
    hair_material: Option<PathBuf>,
}

fn cmd_generate(request: GenerateRequest) -> Result<(), Box<dyn std::error::Error>> {
    let start = Instant::now();

    let mut surface = io::ply::load_surface(&request.body)?;
    for (path, value) in &request.shape_keys {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("shape_key")
            .to_string();
        surface.add_shape_key(ShapeKey {
            name,
            value: *value,
            positions: io::ply::load_positions(path)?,
        })?;
    }
    let hair = io::ply::load_hair(&request.hair)?;
    log::info!(
        "loaded body ({} vertices) and hair ({} points)",
        surface.num_vertices(),
        hair.num_points()
    );

    let mut collection = HairCollection::new(hair, &surface)?;
    let atlas = UvZoneAtlas::load(request.assets.zone_atlas())?;
    collection.generate(&atlas, &request.options)?;
    collection.add_material(Material::load(request.assets.card_material())?);

    if let Some(groups) = &request.groups {
        let density_groups = io::json::load_vertex_groups(groups)?;
        let material_path = request.assets.haircap_material();
        let material = if material_path.exists() {
            Some(Material::load(material_path)?)
        } else {
            log::warn!("no haircap material at {}", material_path.display());
            None
        };
        let template = HaircapTemplate {
            mesh: io::ply::load_poly(request.assets.haircap())?,
            material,
        };
        collection.add_haircap(&surface, template, &request.location, &density_groups)?;
    }

    if let Some(path) = &request.hair_material {
        collection.set_node_values(&Material::load(path)?)?;
    }

    fs::create_dir_all(&request.out_dir)?;
    for object in collection.objects() {
        let path = request
            .out_dir
            .join(format!("{}.{}", object.name, request.format.extension()));
        io::save_mesh(&object.mesh, &object.name, object.material.as_deref(), &path)?;
        println!(
            "{}: {} strands, {} vertices, {} quads -> {}",
            object.name,
            object.strand_count,
            object.mesh.num_vertices(),
            object.mesh.num_faces(),
            path.display()
        );
    }

    if let Some(material) = collection.material() {
        write_json(&request.out_dir.join("haircards_material.json"), material)?;
    }

    if let Some(cap) = collection.haircap() {
        let path = request.out_dir.join("haircap.ply");
        io::ply::save(&cap.mesh, &path)?;
        println!("haircap: {} vertices -> {}", cap.mesh.num_vertices(), path.display());
        if let Some(material) = &cap.material {
            write_json(&request.out_dir.join("haircap_material.json"), material)?;
        }
    }

    println!(
        "Generated {} haircard objects in {:.2?}",
        collection.objects().len(),
        start.elapsed()
    );

    Ok(())
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn std::error::Error>> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}
