use image::imageops::{self, FilterType};
use image::RgbaImage;
use rayon::prelude::*;

use crate::consts::{PARALLEL_PIXEL_THRESHOLD, ROTATION_EPSILON_DEGREES};
use crate::geometry::{snap_to_outer_pixels, Rect};

/// Rendering tier. `Low` is the live-preview path, `High` the commit path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderQuality {
    /// Nearest-neighbour sampling, hard circle edge.
    Low,
    /// Bilinear/Lanczos sampling, anti-aliased circle edge.
    #[default]
    High,
}

impl RenderQuality {
    fn resize_filter(self) -> FilterType {
        match self {
            Self::Low => FilterType::Nearest,
            Self::High => FilterType::Lanczos3,
        }
    }
}

const TRANSPARENT: [u8; 4] = [0, 0, 0, 0];

/// Render the circular crop of `source` into an `output_size` square.
///
/// `crop` is in source-pixel space. Rotation is applied around the crop's own
/// center. Everything outside the inscribed circle is transparent. Returns
/// `None` for states that cannot be rendered (empty crop, empty source, zero
/// output size).
pub fn render_crop(
    source: &RgbaImage,
    crop: Rect,
    rotation_degrees: f64,
    output_size: u32,
    quality: RenderQuality,
) -> Option<RgbaImage> {
    if output_size == 0 || !crop.is_valid() || source.width() == 0 || source.height() == 0 {
        return None;
    }
    if !rotation_degrees.is_finite() {
        return None;
    }

    if rotation_degrees.abs() <= ROTATION_EPSILON_DEGREES {
        if let Some(mut out) = blit_axis_aligned(source, crop, output_size, quality) {
            apply_circle_mask(&mut out, quality);
            return Some(out);
        }
    }

    let prefiltered = match quality {
        RenderQuality::High => prefilter(source, crop, output_size),
        RenderQuality::Low => None,
    };
    let out = match prefiltered {
        Some((reduced, reduced_crop)) => {
            sample_transformed(&reduced, reduced_crop, rotation_degrees, output_size, quality)
        }
        None => sample_transformed(source, crop, rotation_degrees, output_size, quality),
    };
    Some(out)
}

/// Copy the crop region and scale it to fill the output.
///
/// Only whole-pixel regions inside the source qualify; anything else returns
/// `None` and goes through the sampled path, which honours fractional edges.
fn blit_axis_aligned(
    source: &RgbaImage,
    crop: Rect,
    output_size: u32,
    quality: RenderQuality,
) -> Option<RgbaImage> {
    let whole = [crop.x, crop.y, crop.width, crop.height]
        .iter()
        .all(|v| v.fract() == 0.0);
    if !whole
        || crop.x < 0.0
        || crop.y < 0.0
        || crop.right() > source.width() as f64
        || crop.bottom() > source.height() as f64
    {
        return None;
    }

    let region = imageops::crop_imm(
        source,
        crop.x as u32,
        crop.y as u32,
        crop.width as u32,
        crop.height as u32,
    )
    .to_image();
    Some(imageops::resize(
        &region,
        output_size,
        output_size,
        quality.resize_filter(),
    ))
}

/// Shrink the neighbourhood of `crop` so one output pixel spans about one
/// source pixel, and re-express `crop` in the reduced image.
///
/// Returns `None` when the crop is not being minified.
fn prefilter(source: &RgbaImage, crop: Rect, output_size: u32) -> Option<(RgbaImage, Rect)> {
    let scale = crop.width.max(crop.height) / output_size as f64;
    if scale <= 1.0 {
        return None;
    }

    // Lanczos3 reaches three output pixels out.
    let margin = 3.0 * scale;
    let covering = snap_to_outer_pixels(Rect::new(
        crop.x - margin,
        crop.y - margin,
        crop.width + 2.0 * margin,
        crop.height + 2.0 * margin,
    ));
    let x0 = covering.x.max(0.0);
    let y0 = covering.y.max(0.0);
    let x1 = covering.right().min(source.width() as f64);
    let y1 = covering.bottom().min(source.height() as f64);
    if x1 <= x0 || y1 <= y0 {
        return None;
    }

    let (region_w, region_h) = ((x1 - x0) as u32, (y1 - y0) as u32);
    let reduced_w = ((region_w as f64 / scale).round() as u32).max(1);
    let reduced_h = ((region_h as f64 / scale).round() as u32).max(1);
    let region = imageops::crop_imm(source, x0 as u32, y0 as u32, region_w, region_h).to_image();
    let reduced = imageops::resize(&region, reduced_w, reduced_h, FilterType::Lanczos3);

    let sx = reduced_w as f64 / region_w as f64;
    let sy = reduced_h as f64 / region_h as f64;
    let reduced_crop = Rect::new(
        (crop.x - x0) * sx,
        (crop.y - y0) * sy,
        crop.width * sx,
        crop.height * sy,
    );
    Some((reduced, reduced_crop))
}

/// Inverse-map every output pixel inside the circle through
/// translate(-crop center) → rotate → scale → translate(output center).
fn sample_transformed(
    source: &RgbaImage,
    crop: Rect,
    rotation_degrees: f64,
    output_size: u32,
    quality: RenderQuality,
) -> RgbaImage {
    let n = output_size as usize;
    let half = output_size as f64 / 2.0;
    let center = crop.center();
    let scale_x = crop.width / output_size as f64;
    let scale_y = crop.height / output_size as f64;
    let (sin, cos) = (-rotation_degrees).to_radians().sin_cos();

    let render_row = |v: usize, row: &mut [u8]| {
        let dy = (v as f64 + 0.5 - half) * scale_y;
        for (u, px) in row.chunks_exact_mut(4).enumerate() {
            let coverage = circle_coverage(u, v, output_size, quality);
            if coverage <= 0.0 {
                px.copy_from_slice(&TRANSPARENT);
                continue;
            }

            let dx = (u as f64 + 0.5 - half) * scale_x;
            let sx = center.x + dx * cos - dy * sin;
            let sy = center.y + dx * sin + dy * cos;
            let mut sample = match quality {
                RenderQuality::Low => sample_nearest(source, sx, sy),
                RenderQuality::High => sample_bilinear(source, sx, sy),
            };
            sample[3] = (sample[3] as f64 * coverage).round() as u8;
            px.copy_from_slice(&sample);
        }
    };

    let mut out = RgbaImage::new(output_size, output_size);
    let raw: &mut [u8] = &mut out;
    if n * n >= PARALLEL_PIXEL_THRESHOLD {
        raw.par_chunks_mut(n * 4)
            .enumerate()
            .for_each(|(v, row)| render_row(v, row));
    } else {
        raw.chunks_mut(n * 4)
            .enumerate()
            .for_each(|(v, row)| render_row(v, row));
    }
    out
}

/// Fraction of the output pixel at (u, v) covered by the inscribed circle.
fn circle_coverage(u: usize, v: usize, output_size: u32, quality: RenderQuality) -> f64 {
    let radius = output_size as f64 / 2.0;
    let dx = u as f64 + 0.5 - radius;
    let dy = v as f64 + 0.5 - radius;
    let distance = dx.hypot(dy);
    match quality {
        RenderQuality::Low => {
            if distance <= radius {
                1.0
            } else {
                0.0
            }
        }
        RenderQuality::High => (radius - distance + 0.5).clamp(0.0, 1.0),
    }
}

fn apply_circle_mask(image: &mut RgbaImage, quality: RenderQuality) {
    let size = image.width();
    for (u, v, px) in image.enumerate_pixels_mut() {
        let coverage = circle_coverage(u as usize, v as usize, size, quality);
        if coverage <= 0.0 {
            px.0 = TRANSPARENT;
        } else if coverage < 1.0 {
            px.0[3] = (px.0[3] as f64 * coverage).round() as u8;
        }
    }
}

fn inside(source: &RgbaImage, x: f64, y: f64) -> bool {
    x >= 0.0 && y >= 0.0 && x < source.width() as f64 && y < source.height() as f64
}

fn sample_nearest(source: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    if !inside(source, x, y) {
        return TRANSPARENT;
    }
    source.get_pixel(x.floor() as u32, y.floor() as u32).0
}

/// Bilinear sample at continuous coordinates where pixel `i` spans `[i, i + 1)`.
fn sample_bilinear(source: &RgbaImage, x: f64, y: f64) -> [u8; 4] {
    if !inside(source, x, y) {
        return TRANSPARENT;
    }

    let max_x = source.width() as i64 - 1;
    let max_y = source.height() as i64 - 1;
    let fx = x - 0.5;
    let fy = y - 0.5;
    let x0 = fx.floor();
    let y0 = fy.floor();
    let tx = fx - x0;
    let ty = fy - y0;

    let fetch = |xi: f64, yi: f64| {
        let cx = (xi as i64).clamp(0, max_x) as u32;
        let cy = (yi as i64).clamp(0, max_y) as u32;
        source.get_pixel(cx, cy).0
    };
    let p00 = fetch(x0, y0);
    let p10 = fetch(x0 + 1.0, y0);
    let p01 = fetch(x0, y0 + 1.0);
    let p11 = fetch(x0 + 1.0, y0 + 1.0);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f64 * (1.0 - tx) + p10[c] as f64 * tx;
        let bottom = p01[c] as f64 * (1.0 - tx) + p11[c] as f64 * tx;
        out[c] = (top * (1.0 - ty) + bottom * ty).round().clamp(0.0, 255.0) as u8;
    }
    out
}
