//! # imgfilter - Single-filter Image Processing
//!
//! imgfilter applies one named effect to an image file and writes the result
//! to another file.
//!
//! ## Features
//!
//! - **13 built-in filters**: color effects, histogram stretch, Gaussian blur,
//!   3x3 convolution kernels and lossless flips/rotations
//! - **Case-insensitive lookup**: `"Sepia"`, `"SEPIA"` and `"sepia"` all resolve
//! - **Typed failures**: every run returns a summary or exactly one error naming
//!   the stage that failed
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use imgfilter::prelude::*;
//!
//! // Build the registry once and share it by reference
//! let registry = FilterRegistry::with_builtins();
//!
//! let summary = Pipeline::new(&registry)
//!     .run("input.png", "output.png", "sepia")
//!     .unwrap();
//! println!("{}", summary);
//! ```
//!
//! Filters can also be applied to in-memory images directly:
//!
//! ```rust
//! use imgfilter::prelude::*;
//! use image::DynamicImage;
//!
//! let image = DynamicImage::new_rgb8(4, 2);
//! let rotated = Filter::Rotate90.apply(&image);
//! assert_eq!((rotated.width(), rotated.height()), (2, 4));
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: Image handle, filter type, errors and configuration
//! - [`filters`]: Filter registry and built-in pixel algorithms
//! - [`execution`]: The load → filter → save pipeline and progress events

#![deny(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod execution;
pub mod filters;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust,ignore
/// use imgfilter::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{ImageMetadata, PixelFormat};

    // Image handle
    pub use crate::core::image::{ImageHandle, SaveOptions};

    // Filters
    pub use crate::core::filter::{Category, Filter, FilterMetadata};

    // Errors
    pub use crate::core::error::{
        ConfigError, ErrorKind, HandleError, PipelineError, PipelineResult, RegistryError, Stage,
    };

    // Configuration
    pub use crate::core::config::{OutputConfig, ToolConfig};

    // Execution
    pub use crate::execution::engine::{Pipeline, PipelineOptions, RunSummary};
    pub use crate::execution::progress::{ProgressCallback, ProgressUpdate, Step};

    // Registry
    pub use crate::filters::registry::{FilterRegistry, RegistryEntry};
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
