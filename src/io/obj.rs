//! Wavefront OBJ export for haircard meshes.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::Result;
use crate::mesh::PolyMesh;

/// Save a polygon mesh as a named OBJ object.
///
/// Writes `vt` texture coordinates when the mesh has a UV layer, an `s 1`
/// line for smooth-shaded meshes and a `usemtl` line when `material` is set.
/// Vertex colors are not part of OBJ and are dropped.
///
/// # Example
///
/// ```no_run
/// use haircards::io::obj;
/// use haircards::mesh::PolyMesh;
///
/// let mesh = PolyMesh::new();
/// obj::save(&mesh, "hair_5", Some("HG_Haircards"), "hair_5.obj").unwrap();
/// ```
pub fn save<P: AsRef<Path>>(
    mesh: &PolyMesh,
    name: &str,
    material: Option<&str>,
    path: P,
) -> Result<()> {
    let file = File::create(path.as_ref())?;
    let mut writer = BufWriter::new(file);
    write_obj(&mut writer, mesh, name, material)?;
    writer.flush()?;
    Ok(())
}

/// Write a mesh as OBJ text.
pub fn write_obj<W: Write>(
    writer: &mut W,
    mesh: &PolyMesh,
    name: &str,
    material: Option<&str>,
) -> Result<()> {
    writeln!(writer, "# Generated by haircards")?;
    writeln!(writer, "o {}", name)?;

    for p in mesh.positions() {
        writeln!(writer, "v {} {} {}", p.x, p.y, p.z)?;
    }

    let uvs = mesh.uvs();
    if let Some(uvs) = uvs {
        for uv in uvs {
            writeln!(writer, "vt {} {}", uv.x, uv.y)?;
        }
    }

    if let Some(material) = material {
        writeln!(writer, "usemtl {}", material)?;
    }
    writeln!(writer, "s {}", if mesh.is_smooth() { "1" } else { "off" })?;

    // OBJ uses 1-based indexing
    for face in mesh.faces() {
        write!(writer, "f")?;
        for &v in face {
            if uvs.is_some() {
                write!(writer, " {}/{}", v + 1, v + 1)?;
            } else {
                write!(writer, " {}", v + 1)?;
            }
        }
        writeln!(writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Point2, Point3};

    fn quad() -> PolyMesh {
        let positions = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ];
        PolyMesh::from_quads(positions, &[[0, 1, 2, 3]]).unwrap()
    }

    #[test]
    fn test_write_plain() {
        let mut out = Vec::new();
        write_obj(&mut out, &quad(), "hair_2", None).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("o hair_2\n"));
        assert!(text.contains("v 1 1 0\n"));
        assert!(text.contains("s off\n"));
        assert!(text.contains("f 1 2 3 4\n"));
        assert!(!text.contains("vt"));
        assert!(!text.contains("usemtl"));
    }

    #[test]
    fn test_write_uvs_and_material() {
        let mut mesh = quad();
        mesh.set_smooth(true);
        mesh.set_uvs(vec![
            Point2::new(0.5, 0.0),
            Point2::new(0.5, 1.0),
            Point2::new(0.25, 1.0),
            Point2::new(0.25, 0.0),
        ])
        .unwrap();

        let mut out = Vec::new();
        write_obj(&mut out, &mesh, "hair_2", Some("HG_Haircards")).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert_eq!(text.matches("\nvt ").count(), 4);
        assert!(text.contains("vt 0.25 1\n"));
        assert!(text.contains("usemtl HG_Haircards\n"));
        assert!(text.contains("s 1\n"));
        assert!(text.contains("f 1/1 2/2 3/3 4/4\n"));
    }

    #[test]
    fn test_save_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("card.obj");
        save(&quad(), "card", None, &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("# Generated by haircards\no card\n"));
    }
}
