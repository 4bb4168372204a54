//! Image handle: load, hold and save one decoded raster.
//!
//! Decoding and encoding are delegated to the `image` crate. The container
//! format is sniffed from the file contents on load and inferred from the
//! destination extension on save.

use crate::core::error::{HandleError, HandleResult};
use crate::core::types::{ImageMetadata, PixelFormat};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, ImageFormat, ImageReader};
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};

/// Encoder settings used by [`ImageHandle::save_with`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveOptions {
    /// JPEG quality (1-100). `None` uses the encoder default.
    pub jpeg_quality: Option<u8>,
    /// Create missing parent directories of the destination.
    pub create_missing_dirs: bool,
}

impl SaveOptions {
    /// Create default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JPEG quality.
    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = Some(quality);
        self
    }

    /// Enable/disable creating missing parent directories.
    pub fn with_create_missing_dirs(mut self, create: bool) -> Self {
        self.create_missing_dirs = create;
        self
    }
}

/// Owns at most one decoded raster, tied to a source path.
///
/// A handle starts empty. [`load`](Self::load) populates it from the source
/// path, [`replace_raster`](Self::replace_raster) swaps in a new raster (for
/// example a filter's output), and [`save`](Self::save) writes the current
/// raster out.
#[derive(Debug, Clone)]
pub struct ImageHandle {
    source: PathBuf,
    destination: Option<PathBuf>,
    raster: Option<DynamicImage>,
}

impl ImageHandle {
    /// Create an empty handle for a source path. Nothing is read yet.
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            destination: None,
            raster: None,
        }
    }

    /// Create a handle around an in-memory raster.
    pub fn from_raster(source: impl Into<PathBuf>, raster: DynamicImage) -> Self {
        Self {
            source: source.into(),
            destination: None,
            raster: Some(raster),
        }
    }

    /// The path the raster is loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Where the raster was last saved, if it has been.
    pub fn destination(&self) -> Option<&Path> {
        self.destination.as_deref()
    }

    /// The current raster, if one is loaded.
    pub fn raster(&self) -> Option<&DynamicImage> {
        self.raster.as_ref()
    }

    /// Check if a raster is present.
    pub fn is_loaded(&self) -> bool {
        self.raster.is_some()
    }

    /// Describe the current raster.
    pub fn metadata(&self) -> Option<ImageMetadata> {
        self.raster.as_ref().map(ImageMetadata::of)
    }

    /// Replace the current raster, returning the previous one.
    pub fn replace_raster(&mut self, raster: DynamicImage) -> Option<DynamicImage> {
        self.raster.replace(raster)
    }

    /// Take the raster out, leaving the handle empty.
    pub fn take_raster(&mut self) -> Option<DynamicImage> {
        self.raster.take()
    }

    /// Decode the source file and return the loaded raster.
    ///
    /// Fails with [`HandleError::NotFound`] if the source is not an existing
    /// file and [`HandleError::Decode`] for anything else. On failure the
    /// handle holds no raster.
    pub fn load(&mut self) -> HandleResult<&DynamicImage> {
        log::info!("Loading image from: {}", self.source.display());
        self.raster = None;

        match decode(&self.source) {
            Ok(raster) => {
                log::info!("Image loaded: {}", ImageMetadata::of(&raster));
                Ok(&*self.raster.insert(raster))
            }
            Err(error) => {
                log::error!("{}", error);
                Err(error)
            }
        }
    }

    /// Save the raster with default options.
    pub fn save(&mut self, destination: impl AsRef<Path>) -> HandleResult<()> {
        self.save_with(destination, &SaveOptions::default())
    }

    /// Encode the raster to `destination`, picking the format from its extension.
    ///
    /// Fails with [`HandleError::NoImageLoaded`] when the handle is empty.
    /// Creates or overwrites the destination file.
    pub fn save_with(
        &mut self,
        destination: impl AsRef<Path>,
        options: &SaveOptions,
    ) -> HandleResult<()> {
        let destination = destination.as_ref();

        let Some(raster) = self.raster.as_ref() else {
            log::error!("No image data to save; was the image loaded first?");
            return Err(HandleError::NoImageLoaded);
        };

        log::info!("Saving image to: {}", destination.display());
        match encode(raster, destination, options) {
            Ok(()) => {
                log::info!("Image saved: {}", destination.display());
                self.destination = Some(destination.to_path_buf());
                Ok(())
            }
            Err(error) => {
                log::error!("{}", error);
                Err(error)
            }
        }
    }
}

fn decode(path: &Path) -> HandleResult<DynamicImage> {
    if !path.is_file() {
        return Err(HandleError::NotFound {
            path: path.to_path_buf(),
        });
    }

    let decode_error = |message: String| HandleError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => HandleError::NotFound {
                path: path.to_path_buf(),
            },
            _ => decode_error(e.to_string()),
        })?
        .with_guessed_format()
        .map_err(|e| decode_error(e.to_string()))?;

    reader.decode().map_err(|e| decode_error(e.to_string()))
}

fn encode(raster: &DynamicImage, destination: &Path, options: &SaveOptions) -> HandleResult<()> {
    let write_error = |message: String| HandleError::Write {
        path: destination.to_path_buf(),
        message,
    };
    let encode_error = |message: String| HandleError::Encode {
        path: destination.to_path_buf(),
        message,
    };

    let format = ImageFormat::from_path(destination).map_err(|e| encode_error(e.to_string()))?;
    if !format.writing_enabled() {
        return Err(encode_error(format!("writing {:?} images is not supported", format)));
    }

    // Encode fully in memory so a rejected raster never leaves a file behind.
    let raster = encodable(raster, format);
    let mut bytes = Cursor::new(Vec::new());
    let result = match (format, options.jpeg_quality) {
        (ImageFormat::Jpeg, Some(quality)) => {
            raster.write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality))
        }
        _ => raster.write_to(&mut bytes, format),
    };
    result.map_err(|e| encode_error(e.to_string()))?;

    if options.create_missing_dirs {
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| write_error(e.to_string()))?;
        }
    }

    std::fs::write(destination, bytes.into_inner()).map_err(|e| write_error(e.to_string()))
}

/// Convert the raster to a layout the format's encoder accepts.
///
/// The GIF encoder only takes RGB8 and RGBA8, so grayscale and wide layouts
/// are expanded first. Every other format gets the raster as is.
fn encodable(raster: &DynamicImage, format: ImageFormat) -> Cow<'_, DynamicImage> {
    match (format, raster) {
        (ImageFormat::Gif, DynamicImage::ImageRgb8(_) | DynamicImage::ImageRgba8(_)) => {
            Cow::Borrowed(raster)
        }
        (ImageFormat::Gif, other) => {
            log::debug!("Expanding {} raster for GIF output", PixelFormat::of(other));
            if other.color().has_alpha() {
                Cow::Owned(DynamicImage::ImageRgba8(other.to_rgba8()))
            } else {
                Cow::Owned(DynamicImage::ImageRgb8(other.to_rgb8()))
            }
        }
        _ => Cow::Borrowed(raster),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use image::{Rgb, RgbImage};

    fn sample() -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_pixel(3, 2, Rgb([9, 8, 7])))
    }

    #[test]
    fn test_new_handle_is_empty() {
        let handle = ImageHandle::new("input.png");
        assert!(!handle.is_loaded());
        assert!(handle.metadata().is_none());
        assert!(handle.destination().is_none());
        assert_eq!(handle.source(), Path::new("input.png"));
    }

    #[test]
    fn test_save_before_load_fails() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out.png");

        let mut handle = ImageHandle::new("input.png");
        let error = handle.save(&out).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::NoImageLoaded);
        assert!(!out.exists());
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = ImageHandle::new(dir.path().join("missing.png"));

        let error = handle.load().unwrap_err();
        assert!(matches!(error, HandleError::NotFound { .. }));
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_load_directory_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let mut handle = ImageHandle::new(dir.path());
        assert_eq!(handle.load().unwrap_err().kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_load_corrupt_file_clears_raster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.png");
        std::fs::write(&path, b"definitely not an image").unwrap();

        let mut handle = ImageHandle::from_raster(&path, sample());
        let error = handle.load().unwrap_err();
        assert_eq!(error.kind(), ErrorKind::DecodeError);
        assert!(!handle.is_loaded());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.png");

        let mut handle = ImageHandle::from_raster("memory", sample());
        handle.save(&path).unwrap();
        assert_eq!(handle.destination(), Some(path.as_path()));

        let mut reloaded = ImageHandle::new(&path);
        let loaded = reloaded.load().unwrap();
        assert_eq!(loaded, &sample());
        assert_eq!(reloaded.raster(), Some(&sample()));
    }

    #[test]
    fn test_save_grayscale_gif() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gray.gif");

        let gray = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(4, 4, image::Luma([77])));
        let mut handle = ImageHandle::from_raster("memory", gray);
        handle.save(&path).unwrap();

        let mut reloaded = ImageHandle::new(&path);
        let loaded = reloaded.load().unwrap();
        assert_eq!((loaded.width(), loaded.height()), (4, 4));
    }

    #[test]
    fn test_encodable_only_touches_gif() {
        let gray = DynamicImage::new_luma8(2, 2);
        assert!(matches!(encodable(&gray, ImageFormat::Png), Cow::Borrowed(_)));
        assert_eq!(PixelFormat::of(&encodable(&gray, ImageFormat::Gif)), PixelFormat::Rgb8);

        let gray_alpha = DynamicImage::new_luma_a8(2, 2);
        assert_eq!(PixelFormat::of(&encodable(&gray_alpha, ImageFormat::Gif)), PixelFormat::Rgba8);

        let rgba = DynamicImage::new_rgba8(2, 2);
        assert!(matches!(encodable(&rgba, ImageFormat::Gif), Cow::Borrowed(_)));
    }

    #[test]
    fn test_failed_encode_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("float.bmp");

        let mut handle = ImageHandle::from_raster("memory", DynamicImage::new_rgb32f(2, 2));
        match handle.save(&path) {
            Ok(()) => assert!(path.is_file()),
            Err(error) => {
                assert_eq!(error.kind(), ErrorKind::EncodeError);
                assert!(!path.exists());
            }
        }
    }

    #[test]
    fn test_save_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.unknownext");

        let mut handle = ImageHandle::from_raster("memory", sample());
        let error = handle.save(&path).unwrap_err();
        assert_eq!(error.kind(), ErrorKind::EncodeError);
    }

    #[test]
    fn test_save_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.png");

        let mut handle = ImageHandle::from_raster("memory", sample());
        assert_eq!(handle.save(&path).unwrap_err().kind(), ErrorKind::WriteError);

        let options = SaveOptions::new().with_create_missing_dirs(true);
        handle.save_with(&path, &options).unwrap();
        assert!(path.is_file());
    }

    #[test]
    fn test_save_jpeg_with_quality() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.jpg");

        let mut handle = ImageHandle::from_raster("memory", sample());
        handle
            .save_with(&path, &SaveOptions::new().with_jpeg_quality(80))
            .unwrap();

        let mut reloaded = ImageHandle::new(&path);
        reloaded.load().unwrap();
        assert_eq!(reloaded.metadata().map(|m| (m.width, m.height)), Some((3, 2)));
    }

    #[test]
    fn test_replace_raster() {
        let mut handle = ImageHandle::new("input.png");
        assert!(handle.replace_raster(sample()).is_none());
        assert!(handle.replace_raster(sample()).is_some());
        assert!(handle.take_raster().is_some());
        assert!(!handle.is_loaded());
    }
}
