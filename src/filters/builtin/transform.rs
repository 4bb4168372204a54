//! Transform filters: Mirror, Rotate90

use image::DynamicImage;

/// Flip the image left to right. Layout and dimensions are unchanged.
pub fn mirror(image: &DynamicImage) -> DynamicImage {
    image.fliph()
}

/// Rotate 90 degrees clockwise. The canvas grows to fit, so width and height
/// swap and nothing is cropped.
pub fn rotate90(image: &DynamicImage) -> DynamicImage {
    image.rotate90()
}
