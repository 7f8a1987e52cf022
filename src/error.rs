//! Error types for loading and validating host input.
//!
//! The editing core itself never fails: malformed actions are ignored. These
//! errors only surface where the host hands data to a session.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or validating a session configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error while reading a file
    #[error("IO error reading {path:?}: {source}")]
    Io {
        /// The file being read
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Two regions in one image share an id
    #[error("Duplicate region id: {id}")]
    DuplicateRegionId {
        /// The repeated region id
        id: String,
    },

    /// A region violates its shape invariants
    #[error("Invalid geometry for region '{region}' in image '{image}': {message}")]
    InvalidGeometry {
        /// Name of the image holding the region
        image: String,
        /// The offending region id
        region: String,
        /// Description of the violation
        message: String,
    },

    /// The selected tool is not in the enabled tool list
    #[error("Selected tool '{tool}' is not enabled")]
    ToolNotEnabled {
        /// Name of the tool
        tool: String,
    },

    /// Version mismatch between expected and found
    #[error("Version mismatch: expected {expected}, found {found}")]
    VersionMismatch {
        /// Supported version
        expected: u32,
        /// Version in the file
        found: u32,
    },
}

impl ConfigError {
    /// Create an I/O error for `path`.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a duplicate region id error.
    pub fn duplicate_region(id: impl Into<String>) -> Self {
        Self::DuplicateRegionId { id: id.into() }
    }

    /// Create an invalid geometry error.
    pub fn invalid_geometry(
        image: impl Into<String>,
        region: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidGeometry {
            image: image.into(),
            region: region.into(),
            message: message.into(),
        }
    }
}
