use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::{CropperError, Result};

/// Encode as PNG, which keeps the transparent corners outside the circle.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(CropperError::Encode)?;
    Ok(bytes)
}
