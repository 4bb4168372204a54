//! Execution module.
//!
//! This module drives a single filter run from source file to destination file.

pub mod engine;
pub mod progress;

pub use engine::{Pipeline, PipelineOptions, RunSummary};
pub use progress::{ProgressTracker, ProgressUpdate, Step};
