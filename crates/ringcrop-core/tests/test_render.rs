mod common;

use std::path::Path;

use image::{DynamicImage, RgbaImage};

use ringcrop_core::error::CropperError;
use ringcrop_core::geometry::Rect;
use ringcrop_core::render::{
    decode_with_orientation, display_copy, downscale_if_oversized, encode_png, render_crop,
    rotate_by_90_multiple, RenderQuality,
};

use common::{gradient_image, jpeg_with_orientation, png_bytes, split_image, split_rgb};

fn is_reddish(px: [u8; 4]) -> bool {
    px[0] > 180 && px[2] < 80
}

fn is_bluish(px: [u8; 4]) -> bool {
    px[2] > 180 && px[0] < 80
}

// ---------------------------------------------------------------------------
// Circular crop rendering
// ---------------------------------------------------------------------------

#[test]
fn test_render_is_deterministic() {
    let source = gradient_image(300, 200);
    let crop = Rect::new(50.0, 40.0, 120.0, 120.0);

    let a = render_crop(&source, crop, 17.5, 128, RenderQuality::High).unwrap();
    let b = render_crop(&source, crop, 17.5, 128, RenderQuality::High).unwrap();
    assert_eq!(a.as_raw(), b.as_raw());
    assert_eq!(encode_png(&a).unwrap(), encode_png(&b).unwrap());
}

#[test]
fn test_render_output_is_square_with_transparent_corners() {
    let source = gradient_image(300, 200);
    let crop = Rect::new(50.0, 40.0, 120.0, 120.0);

    for rotation in [0.0, 33.0] {
        let out = render_crop(&source, crop, rotation, 64, RenderQuality::High).unwrap();
        assert_eq!(out.dimensions(), (64, 64));
        for (x, y) in [(0, 0), (63, 0), (0, 63), (63, 63)] {
            assert_eq!(out.get_pixel(x, y).0[3], 0, "corner ({x}, {y}) at {rotation}°");
        }
        assert_eq!(out.get_pixel(32, 32).0[3], 255);
    }
}

#[test]
fn test_axis_aligned_render_keeps_layout() {
    let source = split_image(100, 100);
    let out = render_crop(&source, Rect::new(0.0, 0.0, 100.0, 100.0), 0.0, 100, RenderQuality::High)
        .unwrap();
    assert!(is_reddish(out.get_pixel(25, 50).0));
    assert!(is_bluish(out.get_pixel(75, 50).0));
}

#[test]
fn test_fractional_crop_ignores_tiny_rotation() {
    let source = RgbaImage::from_fn(64, 64, |x, y| image::Rgba([(4 * x) as u8, (4 * y) as u8, 0, 255]));
    let crop = Rect::new(10.5, 10.5, 20.0, 20.0);

    let flat = render_crop(&source, crop, 0.0, 200, RenderQuality::Low).unwrap();
    let tilted = render_crop(&source, crop, 0.02, 200, RenderQuality::Low).unwrap();
    for (a, b) in flat.pixels().zip(tilted.pixels()) {
        for c in 0..4 {
            assert!((a.0[c] as i32 - b.0[c] as i32).abs() <= 4);
        }
    }

    // Left and right edges of the circle land on source columns 10 and 30.
    assert_eq!(flat.get_pixel(0, 100).0[0], 40);
    assert_eq!(flat.get_pixel(199, 100).0[0], 120);
    assert_eq!(flat.get_pixel(100, 100).0[1], 80);
}

#[test]
fn test_minified_render_filters_fine_detail() {
    let source = RgbaImage::from_fn(1536, 1536, |x, y| {
        let v = if (x + y) % 2 == 0 { 255 } else { 0 };
        image::Rgba([v, v, v, 255])
    });
    let crop = Rect::new(0.0, 0.0, 1536.0, 1536.0);

    let flat = render_crop(&source, crop, 0.0, 512, RenderQuality::High).unwrap();
    let tilted = render_crop(&source, crop, 0.02, 512, RenderQuality::High).unwrap();
    for y in 200..312 {
        for x in 200..312 {
            let a = flat.get_pixel(x, y).0[0] as i32;
            let b = tilted.get_pixel(x, y).0[0] as i32;
            assert!((a - 128).abs() <= 32, "0° pixel ({x}, {y}) = {a}");
            assert!((b - 128).abs() <= 32, "0.02° pixel ({x}, {y}) = {b}");
            assert!((a - b).abs() <= 32);
        }
    }
}

#[test]
fn test_half_turn_swaps_sides() {
    let source = split_image(100, 100);
    let out =
        render_crop(&source, Rect::new(0.0, 0.0, 100.0, 100.0), 180.0, 100, RenderQuality::High)
            .unwrap();
    assert!(is_bluish(out.get_pixel(25, 50).0));
    assert!(is_reddish(out.get_pixel(75, 50).0));
}

#[test]
fn test_samples_outside_source_are_transparent() {
    let source = split_image(100, 100);
    let out = render_crop(&source, Rect::new(-50.0, 0.0, 100.0, 100.0), 0.0, 100, RenderQuality::High)
        .unwrap();
    assert_eq!(out.get_pixel(10, 50).0[3], 0);
    assert!(is_reddish(out.get_pixel(75, 50).0));
    assert_eq!(out.get_pixel(75, 50).0[3], 255);
}

#[test]
fn test_low_quality_has_hard_edge() {
    let source = gradient_image(300, 200);
    let out = render_crop(&source, Rect::new(60.0, 30.0, 140.0, 140.0), 30.0, 140, RenderQuality::Low)
        .unwrap();
    assert_eq!(out.dimensions(), (140, 140));
    assert!(out.pixels().all(|p| p.0[3] == 0 || p.0[3] == 255));
    assert_eq!(out.get_pixel(70, 70).0[3], 255);
}

#[test]
fn test_unrenderable_states() {
    let source = gradient_image(30, 30);
    assert!(render_crop(&source, Rect::new(0.0, 0.0, 0.0, 10.0), 0.0, 64, RenderQuality::High).is_none());
    assert!(render_crop(&source, Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, 0, RenderQuality::High).is_none());
    assert!(render_crop(&source, Rect::new(0.0, 0.0, 10.0, 10.0), f64::NAN, 64, RenderQuality::Low).is_none());
    assert!(render_crop(&RgbaImage::new(0, 0), Rect::new(0.0, 0.0, 10.0, 10.0), 0.0, 64, RenderQuality::Low).is_none());
}

// ---------------------------------------------------------------------------
// Quarter turns
// ---------------------------------------------------------------------------

#[test]
fn test_four_quarter_turns_restore_image() {
    let original = gradient_image(7, 5);
    let mut image = original.clone();
    for _ in 0..4 {
        image = rotate_by_90_multiple(image, 90).unwrap();
    }
    assert_eq!(image, original);

    let there = rotate_by_90_multiple(original.clone(), 90).unwrap();
    assert_eq!(there.dimensions(), (5, 7));
    let back = rotate_by_90_multiple(there, -90).unwrap();
    assert_eq!(back, original);
}

#[test]
fn test_invalid_quarter_turn() {
    let err = rotate_by_90_multiple(gradient_image(4, 4), 100).unwrap_err();
    assert!(matches!(err, CropperError::InvalidRotation(100)));
}

// ---------------------------------------------------------------------------
// Decoding
// ---------------------------------------------------------------------------

#[test]
fn test_decode_png() {
    let bytes = png_bytes(&gradient_image(40, 30));
    let decoded = decode_with_orientation(&bytes, Some(Path::new("photo.png"))).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (40, 30));
    assert_eq!(decoded.into_rgba8(), gradient_image(40, 30));
}

#[test]
fn test_decode_applies_exif_rotation() {
    let bytes = jpeg_with_orientation(&split_rgb(32, 16), 6);
    let decoded = decode_with_orientation(&bytes, None).unwrap().into_rgba8();

    // Orientation 6 needs a clockwise quarter turn: the red left half ends up on top.
    assert_eq!(decoded.dimensions(), (16, 32));
    assert!(is_reddish(decoded.get_pixel(8, 4).0));
    assert!(is_bluish(decoded.get_pixel(8, 28).0));
}

#[test]
fn test_decode_without_orientation_keeps_layout() {
    let bytes = jpeg_with_orientation(&split_rgb(32, 16), 1);
    let decoded = decode_with_orientation(&bytes, None).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (32, 16));
}

#[test]
fn test_decode_garbage_fails() {
    let err = decode_with_orientation(b"definitely not an image", None).unwrap_err();
    assert!(matches!(err, CropperError::Decode(_)), "got {err:?}");
}

// ---------------------------------------------------------------------------
// Downscaling
// ---------------------------------------------------------------------------

#[test]
fn test_downscale_long_side() {
    let wide = DynamicImage::ImageRgba8(gradient_image(300, 150));
    let out = downscale_if_oversized(wide, 100);
    assert_eq!((out.width(), out.height()), (100, 50));

    let tall = DynamicImage::ImageRgba8(gradient_image(150, 300));
    let out = downscale_if_oversized(tall, 100);
    assert_eq!((out.width(), out.height()), (50, 100));
}

#[test]
fn test_downscale_leaves_small_images() {
    let small = DynamicImage::ImageRgba8(gradient_image(80, 60));
    let out = downscale_if_oversized(small, 100);
    assert_eq!((out.width(), out.height()), (80, 60));
}

#[test]
fn test_display_copy_bounds() {
    let full = gradient_image(400, 100);
    let copy = display_copy(&full, 200);
    assert_eq!(copy.dimensions(), (200, 50));
    assert_eq!(display_copy(&full, 1024).dimensions(), (400, 100));
}
