//! Error types for haircards.
//!
//! This module defines all error types used throughout the library.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using [`HairError`].
pub type Result<T> = std::result::Result<T, HairError>;

/// Errors that can occur while generating haircards.
#[derive(Error, Debug)]
pub enum HairError {
    /// A point set that must be non-empty was empty.
    #[error("{what} is empty")]
    EmptyInput {
        /// What was empty.
        what: &'static str,
    },

    /// A face references an invalid vertex index.
    #[error("face {face} references invalid vertex index {vertex}")]
    InvalidVertexIndex {
        /// The face index.
        face: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// An edge references an invalid vertex index.
    #[error("edge {edge} references invalid vertex index {vertex}")]
    InvalidEdge {
        /// The edge index.
        edge: usize,
        /// The invalid vertex index.
        vertex: usize,
    },

    /// A per-vertex attribute does not match the vertex count.
    #[error("{attribute} has {found} entries, expected {expected}")]
    AttributeMismatch {
        /// Attribute name.
        attribute: &'static str,
        /// Number of entries found.
        found: usize,
        /// Number of vertices.
        expected: usize,
    },

    /// The UV zone atlas has no entry for a card classification.
    #[error("UV zone atlas has no {category} zones")]
    MissingZone {
        /// The missing category, e.g. `long/wide`.
        category: String,
    },

    /// A material lacks the shader node group values are copied through.
    #[error("material '{material}' has no shader node group")]
    MissingNode {
        /// The material name.
        material: String,
    },

    /// A required material has not been bound.
    #[error("no material bound for {0}")]
    MissingMaterial(&'static str),

    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error loading data from file.
    #[error("failed to load {path}: {message}")]
    LoadError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Error saving data to file.
    #[error("failed to save {path}: {message}")]
    SaveError {
        /// The file path.
        path: PathBuf,
        /// Error message.
        message: String,
    },

    /// Unsupported file format.
    #[error("unsupported file format: {extension}")]
    UnsupportedFormat {
        /// The file extension.
        extension: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter: {name} = {value} ({reason})")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// The invalid value (as string).
        value: String,
        /// Reason the value is invalid.
        reason: &'static str,
    },
}

impl HairError {
    /// Create an invalid parameter error.
    pub fn invalid_param<T: std::fmt::Display>(
        name: &'static str,
        value: T,
        reason: &'static str,
    ) -> Self {
        HairError::InvalidParameter {
            name,
            value: value.to_string(),
            reason,
        }
    }

    /// Create an empty input error.
    pub fn empty(what: &'static str) -> Self {
        HairError::EmptyInput { what }
    }
}
