//! JSON descriptor loading.
//!
//! UV zone atlases, material descriptors and density vertex groups are plain
//! JSON files read with `serde_json`.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::error::{HairError, Result};
use crate::mesh::VertexGroup;

/// Load and deserialize a JSON file.
///
/// A missing or unreadable file is an `Io` error; malformed content is a
/// `LoadError` carrying the path.
pub fn load<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> Result<T> {
    let path = path.as_ref();
    let file = File::open(path)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|e| HairError::LoadError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Parse vertex groups from `{ "<group>": { "<vertex>": weight } }`.
pub fn parse_vertex_groups(json: &str) -> Result<Vec<VertexGroup>> {
    let raw: BTreeMap<String, BTreeMap<String, f32>> = serde_json::from_str(json)?;
    to_vertex_groups(raw).map_err(|key| {
        HairError::invalid_param("vertex", key, "vertex keys must be non-negative integers")
    })
}

/// Load vertex groups from a JSON file, see [`parse_vertex_groups`].
///
/// # Example
///
/// ```no_run
/// use haircards::io::json;
///
/// let groups = json::load_vertex_groups("density.json").unwrap();
/// for group in &groups {
///     println!("{}: {} vertices", group.name, group.len());
/// }
/// ```
pub fn load_vertex_groups<P: AsRef<Path>>(path: P) -> Result<Vec<VertexGroup>> {
    let path = path.as_ref();
    let raw: BTreeMap<String, BTreeMap<String, f32>> = load(path)?;
    to_vertex_groups(raw).map_err(|key| HairError::LoadError {
        path: path.to_path_buf(),
        message: format!("invalid vertex index '{}'", key),
    })
}

fn to_vertex_groups(
    raw: BTreeMap<String, BTreeMap<String, f32>>,
) -> std::result::Result<Vec<VertexGroup>, String> {
    raw.into_iter()
        .map(|(name, weights)| {
            let mut group = VertexGroup::new(name);
            for (key, weight) in weights {
                let vertex: usize = key.trim().parse().map_err(|_| key.clone())?;
                group.set(vertex, weight);
            }
            Ok(group)
        })
        .collect()
}
