//! Core types for imgfilter.
//!
//! This module contains the foundational pieces of a run:
//! - The image handle that loads and saves rasters
//! - The closed set of filters and their metadata
//! - Error types
//! - Configuration

pub mod config;
pub mod error;
pub mod filter;
pub mod image;
pub mod types;

// Re-export commonly used types
pub use config::{OutputConfig, ToolConfig};
pub use error::{ConfigError, ErrorKind, HandleError, PipelineError, RegistryError, Stage};
pub use filter::{Category, Filter, FilterMetadata};
pub use image::{ImageHandle, SaveOptions};
pub use types::{ImageMetadata, PixelFormat};
