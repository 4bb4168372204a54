//! Convolution filters: Blur, Sharpen, FindEdges, Contour, Emboss
//!
//! These keep the input's channel layout. The 3x3 kernels touch only the color
//! channels and carry alpha through unchanged; blur smooths every channel,
//! alpha included. Layouts other than the 8-bit ones are converted to RGB or
//! RGBA first.

use image::{DynamicImage, ImageBuffer, Pixel};

/// Standard deviation of the blur, in pixels.
const BLUR_SIGMA: f32 = 5.0;

/// A 3x3 kernel applied as `sum(weights * window) / scale + offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Kernel3x3 {
    /// Row-major weights, top-left first.
    pub weights: [i32; 9],
    /// Divisor applied to the weighted sum.
    pub scale: i32,
    /// Constant added after scaling.
    pub offset: i32,
}

/// Sharpens by weighting the center against its eight neighbours.
pub const SHARPEN: Kernel3x3 = Kernel3x3 {
    weights: [-2, -2, -2, -2, 32, -2, -2, -2, -2],
    scale: 16,
    offset: 0,
};

/// Laplacian edge detector.
pub const FIND_EDGES: Kernel3x3 = Kernel3x3 {
    weights: [-1, -1, -1, -1, 8, -1, -1, -1, -1],
    scale: 1,
    offset: 0,
};

/// Inverted Laplacian: flat areas become white, edges dark.
pub const CONTOUR: Kernel3x3 = Kernel3x3 {
    weights: [-1, -1, -1, -1, 8, -1, -1, -1, -1],
    scale: 1,
    offset: 255,
};

/// Directional difference around mid-gray.
pub const EMBOSS: Kernel3x3 = Kernel3x3 {
    weights: [-1, 0, 0, 0, 1, 0, 0, 0, 0],
    scale: 1,
    offset: 128,
};

/// Gaussian blur with a fixed sigma of [`BLUR_SIGMA`].
pub fn blur(image: &DynamicImage) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(buf) => {
            DynamicImage::ImageLuma8(imageproc::filter::gaussian_blur_f32(buf, BLUR_SIGMA))
        }
        DynamicImage::ImageLumaA8(buf) => {
            DynamicImage::ImageLumaA8(imageproc::filter::gaussian_blur_f32(buf, BLUR_SIGMA))
        }
        DynamicImage::ImageRgb8(buf) => {
            DynamicImage::ImageRgb8(imageproc::filter::gaussian_blur_f32(buf, BLUR_SIGMA))
        }
        DynamicImage::ImageRgba8(buf) => {
            DynamicImage::ImageRgba8(imageproc::filter::gaussian_blur_f32(buf, BLUR_SIGMA))
        }
        other if other.color().has_alpha() => {
            DynamicImage::ImageRgba8(imageproc::filter::gaussian_blur_f32(&other.to_rgba8(), BLUR_SIGMA))
        }
        other => {
            DynamicImage::ImageRgb8(imageproc::filter::gaussian_blur_f32(&other.to_rgb8(), BLUR_SIGMA))
        }
    }
}

/// Apply the [`SHARPEN`] kernel.
pub fn sharpen(image: &DynamicImage) -> DynamicImage {
    convolve_dynamic(image, &SHARPEN)
}

/// Apply the [`FIND_EDGES`] kernel.
pub fn find_edges(image: &DynamicImage) -> DynamicImage {
    convolve_dynamic(image, &FIND_EDGES)
}

/// Apply the [`CONTOUR`] kernel.
pub fn contour(image: &DynamicImage) -> DynamicImage {
    convolve_dynamic(image, &CONTOUR)
}

/// Apply the [`EMBOSS`] kernel.
pub fn emboss(image: &DynamicImage) -> DynamicImage {
    convolve_dynamic(image, &EMBOSS)
}

/// Convolve any decoded image, keeping its 8-bit layout.
pub fn convolve_dynamic(image: &DynamicImage, kernel: &Kernel3x3) -> DynamicImage {
    match image {
        DynamicImage::ImageLuma8(buf) => DynamicImage::ImageLuma8(convolve(buf, kernel)),
        DynamicImage::ImageLumaA8(buf) => DynamicImage::ImageLumaA8(convolve(buf, kernel)),
        DynamicImage::ImageRgb8(buf) => DynamicImage::ImageRgb8(convolve(buf, kernel)),
        DynamicImage::ImageRgba8(buf) => DynamicImage::ImageRgba8(convolve(buf, kernel)),
        other if other.color().has_alpha() => {
            DynamicImage::ImageRgba8(convolve(&other.to_rgba8(), kernel))
        }
        other => DynamicImage::ImageRgb8(convolve(&other.to_rgb8(), kernel)),
    }
}

/// Convolve the color channels of an 8-bit buffer with a 3x3 kernel.
///
/// Only interior pixels are filtered: the outermost row and column on each
/// side are copied from the input, as is the last channel of a layout with
/// alpha. Images narrower or shorter than three pixels come back unchanged.
pub fn convolve<P>(src: &ImageBuffer<P, Vec<u8>>, kernel: &Kernel3x3) -> ImageBuffer<P, Vec<u8>>
where
    P: Pixel<Subpixel = u8>,
{
    let (width, height) = src.dimensions();
    let (width, height) = (width as usize, height as usize);
    let channels = P::CHANNEL_COUNT as usize;
    let color_channels = if P::COLOR_MODEL.ends_with('A') {
        channels - 1
    } else {
        channels
    };

    let mut out = src.clone();
    if width < 3 || height < 3 {
        return out;
    }

    let input: &[u8] = src;
    let output: &mut [u8] = &mut out;
    let row_stride = width * channels;
    let scale = kernel.scale as f32;

    for y in 1..height - 1 {
        for x in 1..width - 1 {
            let base = y * row_stride + x * channels;

            for channel in 0..color_channels {
                let mut sum = 0i32;
                for (k, weight) in kernel.weights.iter().enumerate() {
                    if *weight == 0 {
                        continue;
                    }
                    let sx = x + k % 3 - 1;
                    let sy = y + k / 3 - 1;
                    sum += weight * input[sy * row_stride + sx * channels + channel] as i32;
                }

                let value = sum as f32 / scale + kernel.offset as f32;
                output[base + channel] = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }

    out
}
