use crate::config::CropLimits;
use crate::consts::EPSILON;

use super::{angle_of_point, max_crop_size, normalize_angle, CropRectangle, DisplayMetrics, Point};

/// What a pointer press on the selection starts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GestureKind {
    Move,
    Resize,
    Rotate,
}

/// Position of the rotation handle: the selection's top-right corner, turned
/// with the selection around its center.
pub fn rotate_handle_position(rect: &CropRectangle, rotation: f64) -> Point {
    let center = rect.center();
    let (dx, dy) = (rect.width / 2.0, -rect.height / 2.0);
    let (sin, cos) = rotation.to_radians().sin_cos();
    Point::new(center.x + dx * cos - dy * sin, center.y + dx * sin + dy * cos)
}

/// Inner and outer radii of the resize ring.
///
/// The inner tolerance is capped at half the radius so small selections keep
/// a move zone in the middle.
fn resize_band(radius: f64, limits: &CropLimits) -> (f64, f64) {
    let inner = limits.resize_band_inner.min(radius / 2.0);
    (radius - inner, radius + limits.resize_band_outer)
}

/// Decide which gesture a press at `point` begins, if any.
///
/// The rotation handle wins over everything, then the resize ring, then the
/// interior. The ring is wider on the inside, which favours moves for presses
/// near the inner edge.
pub fn classify_press(
    rect: &CropRectangle,
    rotation: f64,
    point: Point,
    limits: &CropLimits,
) -> Option<GestureKind> {
    let handle = rotate_handle_position(rect, rotation);
    if handle.distance_to(point) <= limits.rotate_handle_radius {
        return Some(GestureKind::Rotate);
    }

    let distance = rect.center().distance_to(point);
    let (inner, outer) = resize_band(rect.radius(), limits);
    if distance > inner && distance < outer {
        Some(GestureKind::Resize)
    } else if distance <= inner {
        Some(GestureKind::Move)
    } else {
        None
    }
}

/// Translate the gesture-start rectangle by the pointer delta, keeping it inside the display.
pub fn drag_to(
    start_rect: &CropRectangle,
    press: Point,
    current: Point,
    metrics: &DisplayMetrics,
) -> CropRectangle {
    let x = (start_rect.x + current.x - press.x)
        .min(metrics.right() - start_rect.width)
        .max(metrics.left());
    let y = (start_rect.y + current.y - press.y)
        .min(metrics.bottom() - start_rect.height)
        .max(metrics.top());
    CropRectangle::new(x, y, start_rect.width, start_rect.height)
}

/// Radial resize anchored at the gesture-start center.
///
/// The half-size scales with the ratio of the pointer's current to initial
/// distance from the center, is clamped to the size limits and then to the
/// nearest display edge so the circle never leaves the image.
pub fn resize_to(
    start_rect: &CropRectangle,
    press: Point,
    current: Point,
    metrics: &DisplayMetrics,
    limits: &CropLimits,
) -> CropRectangle {
    let center = start_rect.center();
    let start_distance = center.distance_to(press);
    if start_distance < EPSILON {
        return *start_rect;
    }

    let ratio = center.distance_to(current) / start_distance;
    let max_half = max_crop_size(metrics.display_size, limits) / 2.0;
    let edge_half = (center.x - metrics.left())
        .min(metrics.right() - center.x)
        .min(center.y - metrics.top())
        .min(metrics.bottom() - center.y)
        .max(0.0);

    let half = (start_rect.radius() * ratio)
        .max(limits.min_size / 2.0)
        .min(max_half)
        .min(edge_half);

    CropRectangle::from_center(center, half * 2.0)
}

/// Rotation after the handle moved to `current`, given the rotation and the
/// pointer angle recorded when the gesture started.
pub fn rotation_for(start_rotation: f64, start_angle: f64, center: Point, current: Point) -> f64 {
    normalize_angle(start_rotation + angle_of_point(center, current) - start_angle)
}
