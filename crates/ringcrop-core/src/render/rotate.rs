use image::imageops;
use image::RgbaImage;

use crate::error::{CropperError, Result};

/// Rotate clockwise by a multiple of 90°, losslessly.
///
/// Takes ownership of the input; callers hold only the returned bitmap
/// afterwards. Quarter and three-quarter turns swap width and height.
pub fn rotate_by_90_multiple(image: RgbaImage, degrees: i32) -> Result<RgbaImage> {
    if degrees % 90 != 0 {
        return Err(CropperError::InvalidRotation(degrees));
    }

    let rotated = match degrees.rem_euclid(360) {
        0 => image,
        90 => imageops::rotate90(&image),
        180 => imageops::rotate180(&image),
        _ => imageops::rotate270(&image),
    };
    Ok(rotated)
}
