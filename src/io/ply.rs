//! PLY (Stanford polygon) format support.
//!
//! Loading covers the three inputs of haircard generation:
//!
//! - [`load_surface`]: the body, with `nx ny nz` normals when present
//! - [`load_hair`]: the hair edge mesh, from an `edge` element with `vertex1`
//!   and `vertex2` properties
//! - [`load_poly`]: a plain polygon mesh such as the haircap template
//!
//! [`save`] writes ASCII PLY with optional `s t` texture coordinates and
//! `red green blue alpha` vertex colors.

use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use nalgebra::{Point3, Vector3};
use ply_rs::parser::Parser;
use ply_rs::ply::{DefaultElement, Ply, Property};

use crate::error::{HairError, Result};
use crate::mesh::{HairMesh, PolyMesh, ReferenceSurface};

fn load_error(path: &Path, message: impl Into<String>) -> HairError {
    HairError::LoadError {
        path: path.to_path_buf(),
        message: message.into(),
    }
}

fn read_ply(path: &Path) -> Result<Ply<DefaultElement>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);

    let parser = Parser::<DefaultElement>::new();
    parser
        .read_ply(&mut reader)
        .map_err(|e| load_error(path, e.to_string()))
}

fn elements<'a>(ply: &'a Ply<DefaultElement>, path: &Path, name: &str) -> Result<&'a [DefaultElement]> {
    ply.payload
        .get(name)
        .map(Vec::as_slice)
        .ok_or_else(|| load_error(path, format!("PLY file has no {} element", name)))
}

fn read_positions(vertices: &[DefaultElement], path: &Path) -> Result<Vec<Point3<f64>>> {
    vertices
        .iter()
        .map(|vertex| -> Result<Point3<f64>> {
            let coord = |axis: &str| {
                get_float_property(vertex, axis)
                    .ok_or_else(|| load_error(path, format!("vertex missing {} coordinate", axis)))
            };
            Ok(Point3::new(coord("x")?, coord("y")?, coord("z")?))
        })
        .collect()
}

fn read_normals(vertices: &[DefaultElement]) -> Option<Vec<Vector3<f64>>> {
    vertices
        .iter()
        .map(|vertex| {
            Some(Vector3::new(
                get_float_property(vertex, "nx")?,
                get_float_property(vertex, "ny")?,
                get_float_property(vertex, "nz")?,
            ))
        })
        .collect()
}

fn read_faces(ply: &Ply<DefaultElement>, path: &Path) -> Result<Vec<Vec<usize>>> {
    let Some(faces) = ply.payload.get("face") else {
        return Ok(Vec::new());
    };
    faces
        .iter()
        .map(|face| {
            get_list_property(face, "vertex_indices")
                .or_else(|| get_list_property(face, "vertex_index"))
                .ok_or_else(|| load_error(path, "face missing vertex_indices property"))
        })
        .collect()
}

/// Load vertex positions only.
///
/// Used for shape keys stored as a copy of the body with moved vertices.
pub fn load_positions<P: AsRef<Path>>(path: P) -> Result<Vec<Point3<f64>>> {
    let path = path.as_ref();
    let ply = read_ply(path)?;
    read_positions(elements(&ply, path, "vertex")?, path)
}

/// Load a polygon mesh. Faces are kept as polygons, not triangulated.
///
/// # Example
///
/// ```no_run
/// use haircards::io::ply;
///
/// let haircap = ply::load_poly("haircap.ply").unwrap();
/// println!("{} faces", haircap.num_faces());
/// ```
pub fn load_poly<P: AsRef<Path>>(path: P) -> Result<PolyMesh> {
    let path = path.as_ref();
    let ply = read_ply(path)?;
    let positions = read_positions(elements(&ply, path, "vertex")?, path)?;
    let faces = read_faces(&ply, path)?;
    PolyMesh::from_polygons(positions, faces)
}

/// Load the reference body surface.
///
/// Vertex normals are read from `nx ny nz` when every vertex has them and
/// computed from the faces otherwise.
pub fn load_surface<P: AsRef<Path>>(path: P) -> Result<ReferenceSurface> {
    let path = path.as_ref();
    let ply = read_ply(path)?;
    let vertices = elements(&ply, path, "vertex")?;
    let positions = read_positions(vertices, path)?;
    let faces = read_faces(&ply, path)?;
    let mesh = PolyMesh::from_polygons(positions, faces)?;

    match read_normals(vertices) {
        Some(normals) => ReferenceSurface::new(mesh, normals),
        None => {
            log::debug!("{} has no vertex normals, computing them", path.display());
            ReferenceSurface::from_mesh(mesh)
        }
    }
}

/// Load a hair edge mesh.
pub fn load_hair<P: AsRef<Path>>(path: P) -> Result<HairMesh> {
    let path = path.as_ref();
    let ply = read_ply(path)?;
    let points = read_positions(elements(&ply, path, "vertex")?, path)?;

    let edges = elements(&ply, path, "edge")?
        .iter()
        .map(|edge| -> Result<[usize; 2]> {
            let end = |name: &str| {
                get_index_property(edge, name)
                    .ok_or_else(|| load_error(path, format!("edge missing {} property", name)))
            };
            Ok([end("vertex1")?, end("vertex2")?])
        })
        .collect::<Result<Vec<_>>>()?;

    HairMesh::new(points, edges)
}

fn get_float_property(element: &DefaultElement, name: &str) -> Option<f64> {
    match element.get(name)? {
        Property::Float(v) => Some(*v as f64),
        Property::Double(v) => Some(*v),
        Property::Int(v) => Some(*v as f64),
        Property::UInt(v) => Some(*v as f64),
        Property::Short(v) => Some(*v as f64),
        Property::UShort(v) => Some(*v as f64),
        Property::Char(v) => Some(*v as f64),
        Property::UChar(v) => Some(*v as f64),
        _ => None,
    }
}

fn get_index_property(element: &DefaultElement, name: &str) -> Option<usize> {
    match element.get(name)? {
        Property::Int(v) => usize::try_from(*v).ok(),
        Property::UInt(v) => Some(*v as usize),
        Property::Short(v) => usize::try_from(*v).ok(),
        Property::UShort(v) => Some(*v as usize),
        Property::Char(v) => usize::try_from(*v).ok(),
        Property::UChar(v) => Some(*v as usize),
        _ => None,
    }
}

fn get_list_property(element: &DefaultElement, name: &str) -> Option<Vec<usize>> {
    match element.get(name)? {
        Property::ListInt(v) => v.iter().map(|&x| usize::try_from(x).ok()).collect(),
        Property::ListUInt(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListShort(v) => v.iter().map(|&x| usize::try_from(x).ok()).collect(),
        Property::ListUShort(v) => Some(v.iter().map(|&x| x as usize).collect()),
        Property::ListChar(v) => v.iter().map(|&x| usize::try_from(x).ok()).collect(),
        Property::ListUChar(v) => Some(v.iter().map(|&x| x as usize).collect()),
        _ => None,
    }
}

/// Convert a `[0, 1]` color channel to a byte.
fn channel_byte(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

/// Save a polygon mesh to a PLY file (ASCII format).
///
/// UVs are written as `s t` and colors as `uchar` RGBA when the mesh has
/// those layers.
pub fn save<P: AsRef<Path>>(mesh: &PolyMesh, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let uvs = mesh.uvs();
    let colors = mesh.colors();

    // Write header
    writeln!(writer, "ply")?;
    writeln!(writer, "format ascii 1.0")?;
    writeln!(writer, "comment Generated by haircards")?;
    writeln!(writer, "element vertex {}", mesh.num_vertices())?;
    writeln!(writer, "property float x")?;
    writeln!(writer, "property float y")?;
    writeln!(writer, "property float z")?;
    if uvs.is_some() {
        writeln!(writer, "property float s")?;
        writeln!(writer, "property float t")?;
    }
    if colors.is_some() {
        for channel in ["red", "green", "blue", "alpha"] {
            writeln!(writer, "property uchar {}", channel)?;
        }
    }
    writeln!(writer, "element face {}", mesh.num_faces())?;
    writeln!(writer, "property list uchar int vertex_indices")?;
    writeln!(writer, "end_header")?;

    // Write vertices
    for (i, p) in mesh.positions().iter().enumerate() {
        write!(writer, "{} {} {}", p.x, p.y, p.z)?;
        if let Some(uvs) = uvs {
            write!(writer, " {} {}", uvs[i].x, uvs[i].y)?;
        }
        if let Some(colors) = colors {
            let [r, g, b, a] = colors[i].map(channel_byte);
            write!(writer, " {} {} {} {}", r, g, b, a)?;
        }
        writeln!(writer)?;
    }

    // Write faces
    for face in mesh.faces() {
        write!(writer, "{}", face.len())?;
        for v in face {
            write!(writer, " {}", v)?;
        }
        writeln!(writer)?;
    }

    writer.flush()?;
    Ok(())
}
