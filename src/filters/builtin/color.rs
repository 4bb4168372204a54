//! Color filters: Grayscale, Invert, Sepia, Posterize, Solarize, Autocontrast
//!
//! Everything except grayscale and alpha-carrying invert works on an RGB copy
//! of the input, so alpha and any extra precision are dropped.

use image::{DynamicImage, GrayImage, Luma, Rgb, RgbImage, RgbaImage};

/// Sepia color-mixing matrix, one row per output channel (R', G', B').
const SEPIA: [[f64; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Channel values strictly above this are inverted by solarize.
const SOLARIZE_THRESHOLD: u8 = 128;

/// Bits of precision kept per channel by posterize.
const POSTERIZE_BITS: u8 = 4;

/// Convert to 8-bit luminance using ITU-R 601-2 weights
/// (`L = 0.299 R + 0.587 G + 0.114 B`), rounded to nearest.
pub fn grayscale(image: &DynamicImage) -> DynamicImage {
    let rgb = image.to_rgb8();
    let gray = GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        Luma([luma(r, g, b)])
    });

    DynamicImage::ImageLuma8(gray)
}

/// Fixed-point luma: the weights are scaled by 2^16 and sum to exactly 65536.
fn luma(r: u8, g: u8, b: u8) -> u8 {
    let weighted = r as u32 * 19595 + g as u32 * 38470 + b as u32 * 7471;
    ((weighted + 0x8000) >> 16) as u8
}

/// Photographic negative of the RGB channels.
///
/// Four-channel input keeps its alpha: the alpha plane is split off, the RGB
/// planes are inverted, and the two are merged again. Every other layout,
/// grayscale included, is converted to RGB first.
pub fn invert(image: &DynamicImage) -> DynamicImage {
    if image.color().channel_count() == 4 {
        let rgba = image.to_rgba8();
        let (mut rgb, alpha) = split_alpha(&rgba);
        image::imageops::invert(&mut rgb);
        DynamicImage::ImageRgba8(merge_alpha(&rgb, &alpha))
    } else {
        let mut rgb = image.to_rgb8();
        image::imageops::invert(&mut rgb);
        DynamicImage::ImageRgb8(rgb)
    }
}

fn split_alpha(rgba: &RgbaImage) -> (RgbImage, GrayImage) {
    let (width, height) = rgba.dimensions();
    let rgb = RgbImage::from_fn(width, height, |x, y| {
        let [r, g, b, _] = rgba.get_pixel(x, y).0;
        Rgb([r, g, b])
    });
    let alpha = GrayImage::from_fn(width, height, |x, y| Luma([rgba.get_pixel(x, y)[3]]));
    (rgb, alpha)
}

fn merge_alpha(rgb: &RgbImage, alpha: &GrayImage) -> RgbaImage {
    RgbaImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        image::Rgba([r, g, b, alpha.get_pixel(x, y)[0]])
    })
}

/// Sepia tone.
///
/// Each output channel is a linear mix of the input R, G and B using the
/// [`SEPIA`] matrix. Results are truncated toward zero and capped at 255; the
/// coefficients are all positive so the lower bound never needs clamping.
pub fn sepia(image: &DynamicImage) -> DynamicImage {
    let mut rgb = image.to_rgb8();

    for pixel in rgb.pixels_mut() {
        pixel.0 = sepia_pixel(pixel.0);
    }

    DynamicImage::ImageRgb8(rgb)
}

pub(crate) fn sepia_pixel([r, g, b]: [u8; 3]) -> [u8; 3] {
    let (r, g, b) = (r as f64, g as f64, b as f64);
    let mix = |row: &[f64; 3]| -> u8 {
        let value = row[0] * r + row[1] * g + row[2] * b;
        (value as u32).min(255) as u8
    };

    [mix(&SEPIA[0]), mix(&SEPIA[1]), mix(&SEPIA[2])]
}

/// Keep the top [`POSTERIZE_BITS`] bits of every RGB channel.
pub fn posterize(image: &DynamicImage) -> DynamicImage {
    let mask = !((1u8 << (8 - POSTERIZE_BITS)) - 1);
    map_rgb(image, |value| value & mask)
}

/// Invert channel values above [`SOLARIZE_THRESHOLD`]; the threshold itself
/// passes through unchanged.
pub fn solarize(image: &DynamicImage) -> DynamicImage {
    map_rgb(image, |value| {
        if value > SOLARIZE_THRESHOLD {
            255 - value
        } else {
            value
        }
    })
}

/// Stretch each RGB channel so its darkest value maps to 0 and its lightest
/// to 255. A channel with a single value is left as is.
pub fn autocontrast(image: &DynamicImage) -> DynamicImage {
    let mut rgb = image.to_rgb8();

    let mut low = [u8::MAX; 3];
    let mut high = [u8::MIN; 3];
    for pixel in rgb.pixels() {
        for channel in 0..3 {
            low[channel] = low[channel].min(pixel[channel]);
            high[channel] = high[channel].max(pixel[channel]);
        }
    }

    let tables: [[u8; 256]; 3] =
        std::array::from_fn(|channel| stretch_table(low[channel], high[channel]));
    log::debug!("Autocontrast channel ranges: low {:?}, high {:?}", low, high);

    for pixel in rgb.pixels_mut() {
        for channel in 0..3 {
            pixel[channel] = tables[channel][pixel[channel] as usize];
        }
    }

    DynamicImage::ImageRgb8(rgb)
}

fn stretch_table(low: u8, high: u8) -> [u8; 256] {
    if high <= low {
        return std::array::from_fn(|value| value as u8);
    }

    let (low, span) = (low as u32, (high - low) as u32);
    std::array::from_fn(|value| {
        let shifted = (value as u32).saturating_sub(low);
        (shifted * 255 / span).min(255) as u8
    })
}

/// Run every RGB channel value through a 256-entry lookup table built from `f`.
fn map_rgb(image: &DynamicImage, f: impl Fn(u8) -> u8) -> DynamicImage {
    let table: [u8; 256] = std::array::from_fn(|value| f(value as u8));
    let mut rgb = image.to_rgb8();

    for value in rgb.iter_mut() {
        *value = table[*value as usize];
    }

    DynamicImage::ImageRgb8(rgb)
}
