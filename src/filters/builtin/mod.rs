//! Built-in filter implementations.
//!
//! Each submodule holds the pixel algorithms for one family of filters. The
//! [`Filter`](crate::core::filter::Filter) enum dispatches into them.

pub mod color;
pub mod convolution;
pub mod transform;

use crate::core::filter::Filter;
use crate::filters::registry::FilterRegistry;

/// Register all built-in filters.
pub fn register_all(registry: &mut FilterRegistry) {
    for filter in Filter::ALL {
        registry.register(filter);
    }
}

pub use convolution::Kernel3x3;
