//! Decoding, circular crop rendering and lossless quarter-turn rotation.

mod crop;
mod decode;
mod encode;
mod rotate;

use image::imageops::{self, FilterType};
use image::RgbaImage;

pub use crop::{render_crop, RenderQuality};
pub use decode::{decode_file, decode_with_orientation, downscale_if_oversized, ImageInput};
pub use encode::encode_png;
pub use rotate::rotate_by_90_multiple;

/// Reduced copy of the source used for cheap live previews.
pub fn display_copy(full: &RgbaImage, max_dimension: u32) -> RgbaImage {
    let (w, h) = full.dimensions();
    if w <= max_dimension && h <= max_dimension {
        return full.clone();
    }
    let scale = max_dimension as f64 / w.max(h) as f64;
    let new_w = ((w as f64 * scale).round() as u32).max(1);
    let new_h = ((h as f64 * scale).round() as u32).max(1);
    imageops::resize(full, new_w, new_h, FilterType::Triangle)
}
