//! Raster description types.
//!
//! The decoded pixel data itself is an [`image::DynamicImage`]; the types here
//! describe it without holding pixels, so they can be logged, compared and
//! serialized into run reports.

use image::DynamicImage;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Pixel layout of a decoded raster.
///
/// The filters in this crate operate on 8-bit grayscale, RGB and RGBA data.
/// Anything else the codec hands back (16-bit, float, luma+alpha) is reported
/// as [`PixelFormat::Other`] and normalized by each filter as needed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PixelFormat {
    /// 8-bit single channel luminance.
    Luma8,
    /// 8-bit luminance with alpha.
    LumaA8,
    /// 24-bit RGB.
    Rgb8,
    /// 32-bit RGBA.
    Rgba8,
    /// Any other layout supported by the codec.
    Other,
}

impl PixelFormat {
    /// Classify a decoded image.
    pub fn of(image: &DynamicImage) -> Self {
        match image {
            DynamicImage::ImageLuma8(_) => PixelFormat::Luma8,
            DynamicImage::ImageLumaA8(_) => PixelFormat::LumaA8,
            DynamicImage::ImageRgb8(_) => PixelFormat::Rgb8,
            DynamicImage::ImageRgba8(_) => PixelFormat::Rgba8,
            _ => PixelFormat::Other,
        }
    }

    /// Number of channels per pixel, if the layout is one of the 8-bit ones.
    pub fn channel_count(&self) -> Option<u8> {
        match self {
            PixelFormat::Luma8 => Some(1),
            PixelFormat::LumaA8 => Some(2),
            PixelFormat::Rgb8 => Some(3),
            PixelFormat::Rgba8 => Some(4),
            PixelFormat::Other => None,
        }
    }

    /// Whether the layout carries an alpha channel.
    pub fn has_alpha(&self) -> bool {
        matches!(self, PixelFormat::LumaA8 | PixelFormat::Rgba8)
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PixelFormat::Luma8 => write!(f, "L8"),
            PixelFormat::LumaA8 => write!(f, "LA8"),
            PixelFormat::Rgb8 => write!(f, "RGB8"),
            PixelFormat::Rgba8 => write!(f, "RGBA8"),
            PixelFormat::Other => write!(f, "other"),
        }
    }
}

/// Image metadata without the pixel data.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ImageMetadata {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Pixel layout
    pub format: PixelFormat,
    /// Whether the image has an alpha channel
    pub has_alpha: bool,
}

impl ImageMetadata {
    /// Describe a decoded image.
    pub fn of(image: &DynamicImage) -> Self {
        Self {
            width: image.width(),
            height: image.height(),
            format: PixelFormat::of(image),
            has_alpha: image.color().has_alpha(),
        }
    }

    /// Size of the decoded pixel buffer in bytes.
    pub fn byte_size(&self) -> usize {
        let channels = self.format.channel_count().unwrap_or(4) as usize;
        (self.width as usize) * (self.height as usize) * channels
    }
}

impl fmt::Display for ImageMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{} {}", self.width, self.height, self.format)
    }
}
