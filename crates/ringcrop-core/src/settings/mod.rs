//! Persisted crop parameters and their remapping onto new display geometry.

mod store;

use serde::{Deserialize, Serialize};
use tracing::debug;

pub use store::{ImageSink, MemoryImageSink, MemorySettingsStore, SettingsStore};

use crate::consts::CROP_SETTINGS_VERSION;
use crate::geometry::{normalize_angle, CropRectangle, DisplayMetrics, Size};

/// Snapshot of a crop together with the display geometry it was made against.
///
/// Display metrics depend on the container size, so a saved rectangle is only
/// meaningful next to the metrics it was computed in. Always go through
/// [`remap`] before applying one.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CropSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub rotation_angle: f64,
    pub image_display_width: f64,
    pub image_display_height: f64,
    #[serde(default)]
    pub image_display_offset_x: f64,
    #[serde(default)]
    pub image_display_offset_y: f64,
    /// Lossless 90° clockwise turns applied to the source before cropping.
    #[serde(default)]
    pub quarter_turns: u8,
}

fn default_version() -> u32 {
    CROP_SETTINGS_VERSION
}

impl CropSettings {
    pub fn with_quarter_turns(mut self, quarter_turns: u8) -> Self {
        self.quarter_turns = quarter_turns % 4;
        self
    }
}

/// A crop rectangle and rotation recovered from saved settings.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RestoredCrop {
    pub rect: CropRectangle,
    pub rotation: f64,
}

/// Capture the current crop and the metrics it lives in.
pub fn serialize(rect: &CropRectangle, rotation: f64, metrics: &DisplayMetrics) -> CropSettings {
    CropSettings {
        version: CROP_SETTINGS_VERSION,
        x: rect.x,
        y: rect.y,
        width: rect.width,
        height: rect.height,
        rotation_angle: rotation,
        image_display_width: metrics.display_size.width,
        image_display_height: metrics.display_size.height,
        image_display_offset_x: metrics.display_offset.x,
        image_display_offset_y: metrics.display_offset.y,
        quarter_turns: 0,
    }
}

/// Re-express saved settings against new display metrics.
///
/// The rectangle's position relative to its own saved image offset is scaled
/// per axis and re-anchored at the new offset, then clamped into the new
/// display area. Returns `None` when either geometry is degenerate.
pub fn remap(saved: &CropSettings, metrics: &DisplayMetrics) -> Option<RestoredCrop> {
    let saved_size = Size::new(saved.image_display_width, saved.image_display_height);
    if saved_size.is_degenerate()
        || metrics.container.is_degenerate()
        || metrics.display_size.is_degenerate()
    {
        debug!(
            saved_w = saved.image_display_width,
            saved_h = saved.image_display_height,
            "Saved crop settings cannot be remapped"
        );
        return None;
    }

    let scale_x = metrics.display_size.width / saved_size.width;
    let scale_y = metrics.display_size.height / saved_size.height;

    // Written as `v * s + (new_off - old_off * s)` so unchanged metrics give back the exact input.
    let x = saved.x * scale_x + (metrics.display_offset.x - saved.image_display_offset_x * scale_x);
    let y = saved.y * scale_y + (metrics.display_offset.y - saved.image_display_offset_y * scale_y);

    let width = (saved.width * scale_x).max(1.0).min(metrics.display_size.width);
    let height = (saved.height * scale_y).max(1.0).min(metrics.display_size.height);
    let side = width.min(height);

    let x = x.min(metrics.right() - side).max(metrics.left());
    let y = y.min(metrics.bottom() - side).max(metrics.top());

    Some(RestoredCrop {
        rect: CropRectangle::new(x, y, side, side),
        rotation: normalize_angle(saved.rotation_angle),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_optional_fields_use_defaults() {
        let json = r#"{"x":1.0,"y":2.0,"width":50.0,"height":50.0,
            "imageDisplayWidth":300.0,"imageDisplayHeight":200.0}"#;
        let s: CropSettings = serde_json::from_str(json).unwrap();
        assert_eq!(s.version, CROP_SETTINGS_VERSION);
        assert_eq!(s.rotation_angle, 0.0);
        assert_eq!(s.image_display_offset_x, 0.0);
        assert_eq!(s.quarter_turns, 0);
    }

    #[test]
    fn test_quarter_turns_wrap() {
        let s = CropSettings {
            version: 1,
            x: 0.0,
            y: 0.0,
            width: 10.0,
            height: 10.0,
            rotation_angle: 0.0,
            image_display_width: 10.0,
            image_display_height: 10.0,
            image_display_offset_x: 0.0,
            image_display_offset_y: 0.0,
            quarter_turns: 0,
        };
        assert_eq!(s.with_quarter_turns(5).quarter_turns, 1);
    }
}
