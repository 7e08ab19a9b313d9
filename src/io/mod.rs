//! File I/O.
//!
//! Haircard generation reads its inputs from PLY and JSON files and writes
//! the generated meshes as OBJ or PLY.
//!
//! # Supported Formats
//!
//! | Data | Format | Load | Save |
//! |------|--------|------|------|
//! | Body surface, hair edges, haircap template | PLY | ✓ | |
//! | Haircard / haircap meshes | OBJ | | ✓ |
//! | Haircard / haircap meshes | PLY | ✓ | ✓ |
//! | Atlas, materials, vertex groups | JSON | ✓ | |
//!
//! # Usage
//!
//! ```no_run
//! use haircards::io;
//!
//! let surface = io::ply::load_surface("body.ply").unwrap();
//! let hair = io::ply::load_hair("hair.ply").unwrap();
//! let groups = io::json::load_vertex_groups("density.json").unwrap();
//! # let _ = (surface, hair, groups);
//! ```

pub mod json;
pub mod obj;
pub mod ply;

use std::path::Path;

use crate::error::{HairError, Result};
use crate::mesh::PolyMesh;

/// Supported mesh output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Wavefront OBJ format.
    Obj,
    /// PLY (Stanford polygon) format.
    Ply,
}

impl Format {
    /// Detect format from file extension.
    pub fn from_extension(ext: &str) -> Option<Format> {
        match ext.to_lowercase().as_str() {
            "obj" => Some(Format::Obj),
            "ply" => Some(Format::Ply),
            _ => None,
        }
    }

    /// Detect format from file path.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Format> {
        path.as_ref()
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(Format::from_extension)
    }

    /// File extension for this format.
    pub fn extension(self) -> &'static str {
        match self {
            Format::Obj => "obj",
            Format::Ply => "ply",
        }
    }
}

/// Save a named mesh with automatic format detection.
///
/// The format is determined by the file extension. PLY output carries no
/// object name or material.
///
/// # Example
///
/// ```no_run
/// use haircards::io::save_mesh;
/// use haircards::mesh::PolyMesh;
///
/// let mesh = PolyMesh::new();
/// save_mesh(&mesh, "hair_4", None, "hair_4.obj").unwrap();
/// ```
pub fn save_mesh<P: AsRef<Path>>(
    mesh: &PolyMesh,
    name: &str,
    material: Option<&str>,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let format = Format::from_path(path).ok_or_else(|| HairError::UnsupportedFormat {
        extension: path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("(none)")
            .to_string(),
    })?;

    match format {
        Format::Obj => obj::save(mesh, name, material, path),
        Format::Ply => ply::save(mesh, path),
    }
}
