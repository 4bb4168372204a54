//! Error types for imgfilter.
//!
//! Uses thiserror for structured errors with context. Every stage of a run
//! (resolve, load, save) has its own error type; [`PipelineError`] wraps them
//! so a caller receives exactly one typed failure per run.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for a pipeline run.
#[derive(Error, Debug, Clone)]
pub enum PipelineError {
    /// The filter name did not resolve.
    #[error("{0}")]
    Registry(#[from] RegistryError),

    /// Loading or saving the image failed.
    #[error("{0}")]
    Image(#[from] HandleError),
}

/// Errors from the image handle: decoding, encoding and file access.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum HandleError {
    /// The source path is not an existing file.
    #[error("Input file not found: {}", .path.display())]
    NotFound {
        /// Source path that was requested.
        path: PathBuf,
    },

    /// The source exists but could not be read or decoded.
    #[error("Failed to decode {}: {message}", .path.display())]
    Decode {
        /// Source path.
        path: PathBuf,
        /// Reason reported by the codec.
        message: String,
    },

    /// Save was called on an empty handle.
    #[error("No image data to save; load an image first")]
    NoImageLoaded,

    /// The raster could not be encoded for the destination format.
    #[error("Failed to encode {}: {message}", .path.display())]
    Encode {
        /// Destination path.
        path: PathBuf,
        /// Reason reported by the codec.
        message: String,
    },

    /// The encoded bytes could not be written.
    #[error("Failed to write {}: {message}", .path.display())]
    Write {
        /// Destination path.
        path: PathBuf,
        /// Underlying I/O error.
        message: String,
    },
}

/// Errors from filter name resolution.
#[derive(Error, Debug, Clone, Serialize, Deserialize)]
pub enum RegistryError {
    /// No filter is registered under this name.
    #[error("Unknown filter '{name}'. Available: {}", .available.join(", "))]
    UnknownFilter {
        /// The name as given by the caller.
        name: String,
        /// Every canonical filter name, in registry order.
        available: Vec<String>,
    },
}

/// Errors while loading or validating a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("Failed to read config {}: {source}", .path.display())]
    Io {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid TOML or has unknown keys.
    #[error("Invalid config syntax: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be rendered as TOML.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("Invalid config value for '{key}': {reason}")]
    Invalid {
        /// Dotted key, e.g. `output.jpeg_quality`.
        key: String,
        /// What is wrong with the value.
        reason: String,
    },
}

/// Failure classes a caller can branch on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Source file missing.
    NotFound,
    /// Source unreadable or corrupt.
    DecodeError,
    /// Save without a raster.
    NoImageLoaded,
    /// Destination format cannot hold the raster.
    EncodeError,
    /// Destination cannot be written.
    WriteError,
    /// Filter name not registered.
    UnknownFilter,
}

/// The pipeline stage a failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Filter name lookup.
    Resolve,
    /// Reading the source.
    Load,
    /// Writing the destination.
    Save,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Resolve => write!(f, "resolve"),
            Stage::Load => write!(f, "load"),
            Stage::Save => write!(f, "save"),
        }
    }
}

// ============================================================================
// Error Utilities
// ============================================================================

impl HandleError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            HandleError::NotFound { .. } => ErrorKind::NotFound,
            HandleError::Decode { .. } => ErrorKind::DecodeError,
            HandleError::NoImageLoaded => ErrorKind::NoImageLoaded,
            HandleError::Encode { .. } => ErrorKind::EncodeError,
            HandleError::Write { .. } => ErrorKind::WriteError,
        }
    }

    /// The file involved, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            HandleError::NotFound { path }
            | HandleError::Decode { path, .. }
            | HandleError::Encode { path, .. }
            | HandleError::Write { path, .. } => Some(path),
            HandleError::NoImageLoaded => None,
        }
    }
}

impl RegistryError {
    /// Valid filter names to offer the user.
    pub fn available(&self) -> &[String] {
        match self {
            RegistryError::UnknownFilter { available, .. } => available,
        }
    }
}

impl PipelineError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            PipelineError::Registry(RegistryError::UnknownFilter { .. }) => ErrorKind::UnknownFilter,
            PipelineError::Image(error) => error.kind(),
        }
    }

    /// The stage that failed.
    pub fn stage(&self) -> Stage {
        match self.kind() {
            ErrorKind::UnknownFilter => Stage::Resolve,
            ErrorKind::NotFound | ErrorKind::DecodeError => Stage::Load,
            ErrorKind::NoImageLoaded | ErrorKind::EncodeError | ErrorKind::WriteError => {
                Stage::Save
            }
        }
    }

    /// Get suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            PipelineError::Registry(RegistryError::UnknownFilter { available, .. }) => {
                Some(format!("Use one of: {}", available.join(", ")))
            }
            PipelineError::Image(HandleError::NotFound { path }) => {
                Some(format!("Check that the file '{}' exists", path.display()))
            }
            PipelineError::Image(HandleError::Encode { path, .. }) => Some(format!(
                "Check that the extension of '{}' names a supported format for this image",
                path.display()
            )),
            PipelineError::Image(HandleError::Write { path, .. }) => Some(format!(
                "Check that the directory for '{}' exists and is writable",
                path.display()
            )),
            _ => None,
        }
    }
}

/// Result type alias for pipeline runs.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Result type alias for image handle operations.
pub type HandleResult<T> = Result<T, HandleError>;
