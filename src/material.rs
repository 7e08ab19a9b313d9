//! Material descriptors.
//!
//! Materials are not shaded here. Only the parts haircard generation touches
//! are kept: a name and the scalar inputs of the material's shader node
//! group, which carry hair tint parameters such as `Lightness` and `Redness`.
//!
//! ```json
//! { "name": "HG_Haircards", "node_group": { "inputs": { "Lightness": 0.1, "Redness": 0.8 } } }
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{HairError, Result};

/// Node group inputs copied from the character hair material.
pub const COPIED_INPUTS: [&str; 2] = ["Lightness", "Redness"];

/// Named scalar inputs of a shader node group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeGroup {
    /// Input values by name.
    #[serde(default)]
    pub inputs: BTreeMap<String, f64>,
}

/// A named material with an optional shader node group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name.
    pub name: String,
    /// The shader node group, if the material has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub node_group: Option<NodeGroup>,
}

impl Material {
    /// Create a material without a node group.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            node_group: None,
        }
    }

    /// Attach a node group with the given inputs.
    pub fn with_inputs<I, S>(mut self, inputs: I) -> Self
    where
        I: IntoIterator<Item = (S, f64)>,
        S: Into<String>,
    {
        self.node_group = Some(NodeGroup {
            inputs: inputs.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        });
        self
    }

    /// Load a material descriptor from a JSON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        crate::io::json::load(path)
    }

    /// Value of a node group input.
    pub fn input(&self, name: &str) -> Option<f64> {
        self.node_group.as_ref()?.inputs.get(name).copied()
    }

    fn node_group(&self) -> Result<&NodeGroup> {
        self.node_group.as_ref().ok_or_else(|| HairError::MissingNode {
            material: self.name.clone(),
        })
    }

    fn node_group_mut(&mut self) -> Result<&mut NodeGroup> {
        let name = &self.name;
        self.node_group.as_mut().ok_or_else(|| HairError::MissingNode {
            material: name.clone(),
        })
    }

    /// Copy the [`COPIED_INPUTS`] values of `source` into this material.
    ///
    /// Inputs missing on either side are skipped with a warning.
    ///
    /// # Errors
    ///
    /// `MissingNode` if either material has no node group.
    pub fn copy_node_values(&mut self, source: &Material) -> Result<()> {
        let from = source.node_group()?;
        let target_name = self.name.clone();
        let to = self.node_group_mut()?;

        for input in COPIED_INPUTS {
            let Some(&value) = from.inputs.get(input) else {
                log::warn!("material '{}' has no input '{}'", source.name, input);
                continue;
            };
            match to.inputs.get_mut(input) {
                Some(slot) => *slot = value,
                None => log::warn!("material '{}' has no input '{}'", target_name, input),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hair_material() -> Material {
        Material::new("HG_Hair").with_inputs([("Lightness", 0.25), ("Redness", 0.9), ("Roughness", 0.4)])
    }

    #[test]
    fn test_parse_material() {
        let json = r#"{ "name": "HG_Haircards", "node_group": { "inputs": { "Lightness": 0.1 } } }"#;
        let material: Material = serde_json::from_str(json).unwrap();
        assert_eq!(material.name, "HG_Haircards");
        assert_eq!(material.input("Lightness"), Some(0.1));
        assert_eq!(material.input("Redness"), None);

        let bare: Material = serde_json::from_str(r#"{ "name": "plain" }"#).unwrap();
        assert!(bare.node_group.is_none());
    }

    #[test]
    fn test_copy_node_values() {
        let mut cards =
            Material::new("HG_Haircards").with_inputs([("Lightness", 0.0), ("Redness", 0.0), ("Roughness", 1.0)]);
        cards.copy_node_values(&hair_material()).unwrap();
        assert_eq!(cards.input("Lightness"), Some(0.25));
        assert_eq!(cards.input("Redness"), Some(0.9));
        assert_eq!(cards.input("Roughness"), Some(1.0));
    }

    #[test]
    fn test_missing_target_input_skipped() {
        let mut cap = Material::new("HG_Haircap").with_inputs([("Lightness", 0.0)]);
        cap.copy_node_values(&hair_material()).unwrap();
        assert_eq!(cap.input("Lightness"), Some(0.25));
        assert_eq!(cap.input("Redness"), None);
    }

    #[test]
    fn test_missing_node_group() {
        let mut plain = Material::new("plain");
        let err = plain.copy_node_values(&hair_material()).unwrap_err();
        assert!(matches!(err, HairError::MissingNode { ref material } if material == "plain"));

        let mut cards = Material::new("cards").with_inputs([("Lightness", 0.0)]);
        assert!(cards.copy_node_values(&Material::new("source")).is_err());
    }
}
