#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgb, RgbImage, Rgba, RgbaImage};

use ringcrop_core::config::CropperConfig;
use ringcrop_core::editor::Cropper;
use ringcrop_core::render::{encode_png, ImageInput};
use ringcrop_core::settings::{MemoryImageSink, MemorySettingsStore};

pub type TestCropper = Cropper<MemorySettingsStore, MemoryImageSink>;

/// Opaque image whose red channel ramps along x and green along y.
pub fn gradient_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        Rgba([
            (x * 255 / width.max(1)) as u8,
            (y * 255 / height.max(1)) as u8,
            128,
            255,
        ])
    })
}

/// Left half red, right half blue.
pub fn split_image(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    })
}

pub fn png_bytes(image: &RgbaImage) -> Vec<u8> {
    encode_png(image).expect("encode png")
}

pub fn png_input(image: &RgbaImage, source_id: &str) -> ImageInput {
    ImageInput {
        bytes: png_bytes(image),
        path: None,
        source_id: source_id.to_owned(),
    }
}

/// Minimal big-endian EXIF APP1 segment carrying only an orientation tag.
fn exif_app1(orientation: u16) -> Vec<u8> {
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"MM\0\x2A");
    tiff.extend_from_slice(&8u32.to_be_bytes());
    // One IFD entry: Orientation (0x0112), SHORT, count 1.
    tiff.extend_from_slice(&1u16.to_be_bytes());
    tiff.extend_from_slice(&0x0112u16.to_be_bytes());
    tiff.extend_from_slice(&3u16.to_be_bytes());
    tiff.extend_from_slice(&1u32.to_be_bytes());
    tiff.extend_from_slice(&orientation.to_be_bytes());
    tiff.extend_from_slice(&[0, 0]);
    // No next IFD.
    tiff.extend_from_slice(&0u32.to_be_bytes());

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);

    let mut segment = vec![0xFF, 0xE1];
    segment.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    segment.extend_from_slice(&payload);
    segment
}

/// Encode `image` as JPEG and splice in an EXIF orientation tag right after SOI.
pub fn jpeg_with_orientation(image: &RgbImage, orientation: u16) -> Vec<u8> {
    let mut jpeg = Vec::new();
    DynamicImage::ImageRgb8(image.clone())
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .expect("encode jpeg");
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);

    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&exif_app1(orientation));
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Left half red, right half blue, RGB.
pub fn split_rgb(width: u32, height: u32) -> RgbImage {
    RgbImage::from_fn(width, height, |x, _| {
        if x < width / 2 {
            Rgb([255, 0, 0])
        } else {
            Rgb([0, 0, 255])
        }
    })
}

pub fn new_cropper() -> TestCropper {
    Cropper::new(
        CropperConfig::default(),
        MemorySettingsStore::new(),
        MemoryImageSink::new(),
    )
}
