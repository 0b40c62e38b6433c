use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::consts::{
    DEFAULT_CROP_FRACTION, DISPLAY_COPY_MAX_DIMENSION, MAXIMUM_CROP_RATIO, MAXIMUM_CROP_SIZE,
    MAXIMUM_IMAGE_SIZE, MINIMUM_CROP_SIZE, PREVIEW_OUTPUT_SIZE, PREVIEW_THROTTLE_MS,
    PROFILE_IMAGE_OUTPUT_SIZE, RESIZE_BAND_INNER, RESIZE_BAND_OUTER, ROTATE_HANDLE_RADIUS,
};

/// Size limits and hit-test tolerances for the crop selection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CropLimits {
    /// Smallest crop side, display pixels.
    #[serde(default = "default_min_size")]
    pub min_size: f64,
    /// Largest crop side, display pixels.
    #[serde(default = "default_max_size")]
    pub max_size: f64,
    /// Largest crop side as a fraction of the shorter display dimension.
    #[serde(default = "default_max_ratio")]
    pub max_ratio: f64,
    /// Side of a freshly created selection as a fraction of the shorter display dimension.
    #[serde(default = "default_crop_fraction")]
    pub default_fraction: f64,
    /// Resize band width inside the circle edge.
    #[serde(default = "default_band_inner")]
    pub resize_band_inner: f64,
    /// Resize band width outside the circle edge.
    #[serde(default = "default_band_outer")]
    pub resize_band_outer: f64,
    /// Hit radius of the corner rotation handle.
    #[serde(default = "default_handle_radius")]
    pub rotate_handle_radius: f64,
}

fn default_min_size() -> f64 {
    MINIMUM_CROP_SIZE
}
fn default_max_size() -> f64 {
    MAXIMUM_CROP_SIZE
}
fn default_max_ratio() -> f64 {
    MAXIMUM_CROP_RATIO
}
fn default_crop_fraction() -> f64 {
    DEFAULT_CROP_FRACTION
}
fn default_band_inner() -> f64 {
    RESIZE_BAND_INNER
}
fn default_band_outer() -> f64 {
    RESIZE_BAND_OUTER
}
fn default_handle_radius() -> f64 {
    ROTATE_HANDLE_RADIUS
}

impl Default for CropLimits {
    fn default() -> Self {
        Self {
            min_size: MINIMUM_CROP_SIZE,
            max_size: MAXIMUM_CROP_SIZE,
            max_ratio: MAXIMUM_CROP_RATIO,
            default_fraction: DEFAULT_CROP_FRACTION,
            resize_band_inner: RESIZE_BAND_INNER,
            resize_band_outer: RESIZE_BAND_OUTER,
            rotate_handle_radius: ROTATE_HANDLE_RADIUS,
        }
    }
}

/// Output sizes and resource caps for decoding and rendering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    /// Side of the committed circular image.
    #[serde(default = "default_output_size")]
    pub output_size: u32,
    /// Side of the live preview image.
    #[serde(default = "default_preview_size")]
    pub preview_size: u32,
    /// Decoded sources are downscaled so neither side exceeds this.
    #[serde(default = "default_max_image_size")]
    pub max_image_size: u32,
    /// Cap for the display-resolution copy used by previews.
    #[serde(default = "default_display_copy_max")]
    pub display_copy_max: u32,
    /// Minimum milliseconds between two live previews.
    #[serde(default = "default_preview_interval_ms")]
    pub preview_interval_ms: u64,
}

fn default_output_size() -> u32 {
    PROFILE_IMAGE_OUTPUT_SIZE
}
fn default_preview_size() -> u32 {
    PREVIEW_OUTPUT_SIZE
}
fn default_max_image_size() -> u32 {
    MAXIMUM_IMAGE_SIZE
}
fn default_display_copy_max() -> u32 {
    DISPLAY_COPY_MAX_DIMENSION
}
fn default_preview_interval_ms() -> u64 {
    PREVIEW_THROTTLE_MS
}

impl RenderConfig {
    pub fn preview_interval(&self) -> Duration {
        Duration::from_millis(self.preview_interval_ms)
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            output_size: PROFILE_IMAGE_OUTPUT_SIZE,
            preview_size: PREVIEW_OUTPUT_SIZE,
            max_image_size: MAXIMUM_IMAGE_SIZE,
            display_copy_max: DISPLAY_COPY_MAX_DIMENSION,
            preview_interval_ms: PREVIEW_THROTTLE_MS,
        }
    }
}

/// Top-level cropper configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CropperConfig {
    #[serde(default)]
    pub limits: CropLimits,
    #[serde(default)]
    pub render: RenderConfig,
}
