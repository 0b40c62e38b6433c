use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::metadata::Orientation;
use image::{DynamicImage, ImageDecoder, ImageFormat, ImageReader};
use tracing::debug;

use crate::error::{CropperError, Result};

/// Encoded image bytes plus where they came from.
#[derive(Clone, Debug)]
pub struct ImageInput {
    pub bytes: Vec<u8>,
    /// Used as a format hint when the bytes alone are ambiguous.
    pub path: Option<PathBuf>,
    /// Opaque key for settings lookup and commit events.
    pub source_id: String,
}

impl ImageInput {
    /// Read a file; its path doubles as the source id.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(Self {
            bytes,
            path: Some(path.to_path_buf()),
            source_id: path.to_string_lossy().into_owned(),
        })
    }

    /// Drain a stream into memory.
    pub fn from_reader(mut reader: impl Read, source_id: impl Into<String>) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Ok(Self {
            bytes,
            path: None,
            source_id: source_id.into(),
        })
    }
}

/// Decode an image and apply its embedded orientation.
///
/// The returned pixels are ready for display as-is. Orientation metadata that
/// cannot be read is treated as "no correction".
pub fn decode_with_orientation(bytes: &[u8], path_hint: Option<&Path>) -> Result<DynamicImage> {
    let mut reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    if reader.format().is_none() {
        if let Some(format) = path_hint.and_then(|p| ImageFormat::from_path(p).ok()) {
            reader.set_format(format);
        }
    }

    let mut decoder = reader.into_decoder().map_err(CropperError::Decode)?;
    let orientation = decoder.orientation().unwrap_or_else(|e| {
        debug!(error = %e, "Unreadable orientation metadata, assuming none");
        Orientation::NoTransforms
    });

    let mut image = DynamicImage::from_decoder(decoder).map_err(CropperError::Decode)?;
    image.apply_orientation(orientation);
    debug!(
        width = image.width(),
        height = image.height(),
        ?orientation,
        "Decoded source image"
    );
    Ok(image)
}

/// Read and decode an image file.
pub fn decode_file(path: &Path) -> Result<DynamicImage> {
    let bytes = std::fs::read(path)?;
    decode_with_orientation(&bytes, Some(path))
}

/// Scale down so the longer side equals `max_dimension`; smaller images pass through.
pub fn downscale_if_oversized(image: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (w, h) = (image.width(), image.height());
    if w <= max_dimension && h <= max_dimension {
        return image;
    }

    let (new_w, new_h) = if w >= h {
        let scaled = (h as f64 * max_dimension as f64 / w as f64).round() as u32;
        (max_dimension, scaled.max(1))
    } else {
        let scaled = (w as f64 * max_dimension as f64 / h as f64).round() as u32;
        (scaled.max(1), max_dimension)
    };

    debug!(from_w = w, from_h = h, to_w = new_w, to_h = new_h, "Downscaling oversized source");
    image.resize_exact(new_w, new_h, FilterType::Lanczos3)
}
