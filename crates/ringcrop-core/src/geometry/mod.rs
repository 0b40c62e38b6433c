//! Pure geometry for the circular cropper: fitting, coordinate mapping,
//! angles and the clamping rules that keep a selection valid.

pub mod gesture;
mod types;

use tracing::warn;

pub use gesture::{classify_press, drag_to, resize_to, rotate_handle_position, rotation_for, GestureKind};
pub use types::{CropRectangle, DisplayMetrics, Point, Rect, Size};

use crate::config::CropLimits;

/// Fit an image into a container, preserving aspect ratio and centering it.
///
/// Returns `None` when either size is degenerate; callers fall back to their
/// last known-good metrics.
pub fn fit_to_container(container: Size, image: Size) -> Option<DisplayMetrics> {
    if container.is_degenerate() || image.is_degenerate() {
        warn!(
            container_w = container.width,
            container_h = container.height,
            image_w = image.width,
            image_h = image.height,
            "Cannot fit image into degenerate bounds"
        );
        return None;
    }

    let image_aspect = image.aspect();
    let display_size = if image_aspect > container.aspect() {
        Size::new(container.width, container.width / image_aspect)
    } else {
        Size::new(container.height * image_aspect, container.height)
    };

    let display_offset = Point::new(
        ((container.width - display_size.width) / 2.0).max(0.0),
        ((container.height - display_size.height) / 2.0).max(0.0),
    );

    Some(DisplayMetrics {
        container,
        display_size,
        display_offset,
    })
}

/// Map a display-space point into source-pixel space (independent scale per axis).
pub fn map_display_to_source(point: Point, metrics: &DisplayMetrics, source: Size) -> Point {
    let scale_x = source.width / metrics.display_size.width;
    let scale_y = source.height / metrics.display_size.height;
    Point::new(
        (point.x - metrics.display_offset.x) * scale_x,
        (point.y - metrics.display_offset.y) * scale_y,
    )
}

/// Map a display-space crop rectangle into source-pixel space.
pub fn map_rect_to_source(rect: &CropRectangle, metrics: &DisplayMetrics, source: Size) -> Rect {
    let top_left = map_display_to_source(Point::new(rect.x, rect.y), metrics, source);
    let bottom_right = map_display_to_source(Point::new(rect.right(), rect.bottom()), metrics, source);
    Rect::new(
        top_left.x,
        top_left.y,
        bottom_right.x - top_left.x,
        bottom_right.y - top_left.y,
    )
}

/// Largest crop side allowed for a given display size.
pub fn max_crop_size(display_size: Size, limits: &CropLimits) -> f64 {
    limits.max_size.min(display_size.min_side() * limits.max_ratio)
}

/// Angle of `point` around `center`, in degrees (screen coordinates, y down).
pub fn angle_of_point(center: Point, point: Point) -> f64 {
    (point.y - center.y).atan2(point.x - center.x).to_degrees()
}

/// Normalize an angle into `(-180, 180]`. Non-finite input maps to 0.
pub fn normalize_angle(angle: f64) -> f64 {
    if !angle.is_finite() {
        return 0.0;
    }
    if angle > -180.0 && angle <= 180.0 {
        return angle;
    }

    let wrapped = angle.rem_euclid(360.0);
    if wrapped > 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}

/// Expand a rectangle to whole pixels: floor the top-left, ceil the bottom-right.
pub fn snap_to_outer_pixels(rect: Rect) -> Rect {
    let x0 = rect.x.floor();
    let y0 = rect.y.floor();
    let x1 = rect.right().ceil();
    let y1 = rect.bottom().ceil();
    Rect::new(x0, y0, x1 - x0, y1 - y0)
}

/// Centered default selection for freshly loaded or re-oriented images.
pub fn default_crop(metrics: &DisplayMetrics, limits: &CropLimits) -> CropRectangle {
    let shorter = metrics.display_size.min_side();
    let side = (shorter * limits.default_fraction)
        .max(limits.min_size)
        .min(max_crop_size(metrics.display_size, limits))
        .min(shorter);
    CropRectangle::from_center(metrics.center(), side)
}

/// Force a rectangle back into the selection invariants: square, size limits,
/// fully inside the displayed image. Rectangles that already satisfy them come
/// back bit-for-bit unchanged.
pub fn constrain(rect: &CropRectangle, metrics: &DisplayMetrics, limits: &CropLimits) -> CropRectangle {
    let shorter = metrics.display_size.min_side();
    let side = rect
        .width
        .min(rect.height)
        .max(limits.min_size)
        .min(max_crop_size(metrics.display_size, limits))
        .min(shorter);
    if rect.width == side && rect.height == side && metrics.contains(rect, 0.0) {
        return *rect;
    }

    let center = rect.center();
    let x = (center.x - side / 2.0).min(metrics.right() - side).max(metrics.left());
    let y = (center.y - side / 2.0).min(metrics.bottom() - side).max(metrics.top());
    CropRectangle::new(x, y, side, side)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_boundaries() {
        assert_eq!(normalize_angle(180.0), 180.0);
        assert_eq!(normalize_angle(-180.0), 180.0);
        assert_eq!(normalize_angle(540.0), 180.0);
        assert_eq!(normalize_angle(360.0), 0.0);
        assert!((normalize_angle(190.0) + 170.0).abs() < 1e-9);
        assert!((normalize_angle(-190.0) - 170.0).abs() < 1e-9);
    }

    #[test]
    fn test_normalize_non_finite() {
        assert_eq!(normalize_angle(f64::NAN), 0.0);
        assert_eq!(normalize_angle(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_snap_to_outer_pixels() {
        let snapped = snap_to_outer_pixels(Rect::new(10.4, 3.9, 20.2, 5.0));
        assert_eq!(snapped, Rect::new(10.0, 3.0, 21.0, 6.0));
    }

    #[test]
    fn test_constrain_pulls_inside() {
        let metrics = fit_to_container(Size::new(400.0, 400.0), Size::new(400.0, 400.0)).unwrap();
        let limits = CropLimits::default();
        let r = constrain(&CropRectangle::new(-30.0, 380.0, 100.0, 100.0), &metrics, &limits);
        assert_eq!(r, CropRectangle::new(0.0, 300.0, 100.0, 100.0));
    }

    #[test]
    fn test_constrain_keeps_valid_rect_exactly() {
        let metrics = fit_to_container(Size::new(800.0, 800.0), Size::new(1000.0, 500.0)).unwrap();
        let limits = CropLimits::default();
        for rect in [
            CropRectangle::new(100.1, 200.7, 150.3, 150.3),
            CropRectangle::new(0.3, 449.8, 150.1, 150.1),
            CropRectangle::new(123.456789, 333.333333, 77.7, 77.7),
        ] {
            assert_eq!(constrain(&rect, &metrics, &limits), rect);
        }
    }
}
