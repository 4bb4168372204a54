//! The `Filter` type and filter metadata.
//!
//! The set of filters is closed: every effect is one variant of [`Filter`],
//! and [`Filter::apply`] dispatches to the implementation in
//! [`crate::filters::builtin`]. Filters carry no parameters; any constants
//! (sepia coefficients, solarize threshold, blur sigma) are fixed.

use crate::filters::builtin::{color, convolution, transform};
use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named, stateless image transformation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Filter {
    /// Single-channel luminance.
    Grayscale,
    /// Negative of the RGB channels.
    Invert,
    /// Warm brown tone.
    Sepia,
    /// Four bits per channel.
    Posterize,
    /// Invert values above 128.
    Solarize,
    /// Per-channel histogram stretch.
    Autocontrast,
    /// Gaussian blur, sigma 5.
    Blur,
    /// 3x3 sharpening kernel.
    Sharpen,
    /// Laplacian edge map.
    FindEdges,
    /// Outline on white.
    Contour,
    /// Relief on mid-gray.
    Emboss,
    /// Left-right flip.
    Mirror,
    /// Quarter turn clockwise.
    Rotate90,
}

impl Filter {
    /// Every filter, in canonical order.
    pub const ALL: [Filter; 13] = [
        Filter::Grayscale,
        Filter::Invert,
        Filter::Sepia,
        Filter::Posterize,
        Filter::Solarize,
        Filter::Autocontrast,
        Filter::Blur,
        Filter::Sharpen,
        Filter::FindEdges,
        Filter::Contour,
        Filter::Emboss,
        Filter::Mirror,
        Filter::Rotate90,
    ];

    /// Canonical (lowercase) name used to select the filter.
    pub fn name(&self) -> &'static str {
        match self {
            Filter::Grayscale => "grayscale",
            Filter::Invert => "invert",
            Filter::Sepia => "sepia",
            Filter::Posterize => "posterize",
            Filter::Solarize => "solarize",
            Filter::Autocontrast => "autocontrast",
            Filter::Blur => "blur",
            Filter::Sharpen => "sharpen",
            Filter::FindEdges => "find_edges",
            Filter::Contour => "contour",
            Filter::Emboss => "emboss",
            Filter::Mirror => "mirror",
            Filter::Rotate90 => "rotate90",
        }
    }

    /// Apply the filter, producing a new image. The input is left untouched.
    pub fn apply(&self, image: &DynamicImage) -> DynamicImage {
        log::debug!("Applying filter '{}' to {}x{} image", self, image.width(), image.height());

        match self {
            Filter::Grayscale => color::grayscale(image),
            Filter::Invert => color::invert(image),
            Filter::Sepia => color::sepia(image),
            Filter::Posterize => color::posterize(image),
            Filter::Solarize => color::solarize(image),
            Filter::Autocontrast => color::autocontrast(image),
            Filter::Blur => convolution::blur(image),
            Filter::Sharpen => convolution::sharpen(image),
            Filter::FindEdges => convolution::find_edges(image),
            Filter::Contour => convolution::contour(image),
            Filter::Emboss => convolution::emboss(image),
            Filter::Mirror => transform::mirror(image),
            Filter::Rotate90 => transform::rotate90(image),
        }
    }

    /// Describe the filter for listings and help output.
    pub fn metadata(&self) -> FilterMetadata {
        let builder = FilterMetadata::builder(self.name());
        let builder = match self {
            Filter::Grayscale => builder
                .display_name("Grayscale")
                .category(Category::Color)
                .description("Convert to a single 8-bit luminance channel")
                .tags(["gray", "monochrome", "luma"]),
            Filter::Invert => builder
                .display_name("Invert")
                .category(Category::Color)
                .description("Photographic negative of the RGB channels; alpha is kept")
                .tags(["negative"]),
            Filter::Sepia => builder
                .display_name("Sepia")
                .category(Category::Color)
                .description("Warm brown vintage tone")
                .tags(["vintage", "tone"]),
            Filter::Posterize => builder
                .display_name("Posterize")
                .category(Category::Color)
                .description("Reduce each RGB channel to 4 bits (16 levels)")
                .tags(["quantize", "levels"]),
            Filter::Solarize => builder
                .display_name("Solarize")
                .category(Category::Color)
                .description("Invert channel values above 128")
                .tags(["threshold"]),
            Filter::Autocontrast => builder
                .display_name("Auto Contrast")
                .category(Category::Adjust)
                .description("Stretch each RGB channel to the full 0-255 range")
                .tags(["contrast", "normalize", "histogram"]),
            Filter::Blur => builder
                .display_name("Blur")
                .category(Category::Blur)
                .description("Gaussian blur with a standard deviation of 5 pixels")
                .tags(["gaussian", "smooth"]),
            Filter::Sharpen => builder
                .display_name("Sharpen")
                .category(Category::Sharpen)
                .description("Fixed 3x3 sharpening kernel")
                .tags(["detail"]),
            Filter::FindEdges => builder
                .display_name("Find Edges")
                .category(Category::Edge)
                .description("Highlight intensity discontinuities with a Laplacian kernel")
                .tags(["laplacian", "outline"]),
            Filter::Contour => builder
                .display_name("Contour")
                .category(Category::Edge)
                .description("Sketch-like outline on a white background")
                .tags(["sketch", "outline"]),
            Filter::Emboss => builder
                .display_name("Emboss")
                .category(Category::Edge)
                .description("Relief effect on a mid-gray background")
                .tags(["relief", "engrave"]),
            Filter::Mirror => builder
                .display_name("Mirror")
                .category(Category::Transform)
                .description("Flip the image left to right")
                .tags(["flip", "horizontal"]),
            Filter::Rotate90 => builder
                .display_name("Rotate 90")
                .category(Category::Transform)
                .description("Rotate 90 degrees clockwise, swapping width and height")
                .tags(["rotate", "clockwise"]),
        };
        builder.build()
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Category for grouping filters in listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Per-pixel color manipulation
    Color,
    /// Histogram-based adjustments
    Adjust,
    /// Blur effects
    Blur,
    /// Sharpening effects
    Sharpen,
    /// Edge detection and relief effects
    Edge,
    /// Geometric transformations
    Transform,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Color => "Color",
            Category::Adjust => "Adjust",
            Category::Blur => "Blur",
            Category::Sharpen => "Sharpen",
            Category::Edge => "Edge",
            Category::Transform => "Transform",
        }
    }
}

/// Metadata describing a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterMetadata {
    /// Canonical name (e.g., "find_edges")
    pub id: String,
    /// Human-readable name (e.g., "Find Edges")
    pub name: String,
    /// Category for grouping
    pub category: Category,
    /// One-line description
    pub description: String,
    /// Searchable tags
    pub tags: Vec<String>,
}

impl FilterMetadata {
    /// Create a new metadata builder.
    pub fn builder(id: impl Into<String>) -> FilterMetadataBuilder {
        FilterMetadataBuilder::new(id)
    }
}

/// Builder for FilterMetadata.
pub struct FilterMetadataBuilder {
    id: String,
    name: Option<String>,
    category: Category,
    description: String,
    tags: Vec<String>,
}

impl FilterMetadataBuilder {
    /// Create a new builder. The display name defaults to the id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            category: Category::Color,
            description: String::new(),
            tags: Vec::new(),
        }
    }

    /// Set the display name.
    pub fn display_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Build the metadata.
    pub fn build(self) -> FilterMetadata {
        let name = self.name.unwrap_or_else(|| self.id.clone());
        FilterMetadata {
            id: self.id,
            name,
            category: self.category,
            description: self.description,
            tags: self.tags,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_names_are_unique_and_lowercase() {
        let names: HashSet<&str> = Filter::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names.len(), 13);
        for name in names {
            assert_eq!(name, name.to_lowercase());
        }
    }

    #[test]
    fn test_metadata_matches_name() {
        for filter in Filter::ALL {
            let metadata = filter.metadata();
            assert_eq!(metadata.id, filter.name());
            assert!(!metadata.description.is_empty());
        }
        assert_eq!(Filter::FindEdges.metadata().name, "Find Edges");
        assert_eq!(Filter::Rotate90.metadata().category, Category::Transform);
    }

    #[test]
    fn test_builder_defaults_name_to_id() {
        let metadata = FilterMetadata::builder("custom").build();
        assert_eq!(metadata.name, "custom");
        assert!(metadata.tags.is_empty());
    }

    #[test]
    fn test_serde_name_matches_canonical_name() {
        let json = serde_json::to_string(&Filter::FindEdges).unwrap();
        assert_eq!(json, "\"find_edges\"");
        let json = serde_json::to_string(&Filter::Rotate90).unwrap();
        assert_eq!(json, "\"rotate90\"");
    }
}
