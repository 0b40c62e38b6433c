//! The crop state machine: one editing session over one source image.

mod interaction;
mod throttle;

use tracing::{debug, warn};

pub use interaction::{GestureSnapshot, Interaction};
pub use throttle::PreviewThrottle;

use crate::config::CropLimits;
use crate::geometry::{
    angle_of_point, classify_press, constrain, default_crop, drag_to, fit_to_container,
    map_rect_to_source, resize_to, rotation_for, CropRectangle, DisplayMetrics, GestureKind, Point,
    Rect, Size,
};
use crate::settings::{self, CropSettings};

/// Owns the crop rectangle, rotation, display metrics and gesture state.
///
/// Every operation is a no-op until [`CropSession::initialize`] has succeeded
/// with a valid source size.
#[derive(Clone, Debug)]
pub struct CropSession {
    limits: CropLimits,
    source_size: Option<Size>,
    metrics: Option<DisplayMetrics>,
    rect: CropRectangle,
    rotation: f64,
    interaction: Interaction,
    last_good: Option<(DisplayMetrics, CropRectangle)>,
    /// Saved settings that arrived while the container had no usable size.
    pending_restore: Option<CropSettings>,
}

impl CropSession {
    pub fn new(limits: CropLimits) -> Self {
        Self {
            limits,
            source_size: None,
            metrics: None,
            rect: CropRectangle::default(),
            rotation: 0.0,
            interaction: Interaction::Idle,
            last_good: None,
            pending_restore: None,
        }
    }

    /// Fit the source into `container` and set up the selection.
    ///
    /// Saved settings are remapped onto the new metrics when possible; otherwise
    /// a centered default selection with no rotation is used. Returns whether
    /// the session ended up with usable metrics.
    pub fn initialize(
        &mut self,
        container: Size,
        source_size: Size,
        restore: Option<&CropSettings>,
    ) -> bool {
        self.interaction = Interaction::Idle;
        self.pending_restore = None;

        if source_size.is_degenerate() {
            warn!(
                width = source_size.width,
                height = source_size.height,
                "Ignoring degenerate source size"
            );
            return false;
        }

        if self.source_size != Some(source_size) {
            self.last_good = None;
        }
        self.source_size = Some(source_size);

        let Some(metrics) = fit_to_container(container, source_size) else {
            if restore.is_some() {
                debug!("Container not laid out yet, deferring saved crop");
            }
            self.pending_restore = restore.cloned();
            return self.restore_last_good();
        };

        let restored = restore.and_then(|saved| settings::remap(saved, &metrics));
        match restored {
            Some(restored) => {
                self.rect = constrain(&restored.rect, &metrics, &self.limits);
                self.rotation = restored.rotation;
                debug!(x = self.rect.x, y = self.rect.y, side = self.rect.width, "Restored saved crop");
            }
            None => {
                if restore.is_some() {
                    debug!("Saved crop could not be remapped, using default selection");
                }
                self.rect = default_crop(&metrics, &self.limits);
                self.rotation = 0.0;
            }
        }

        self.metrics = Some(metrics);
        self.last_good = Some((metrics, self.rect));
        true
    }

    fn restore_last_good(&mut self) -> bool {
        match self.last_good {
            Some((metrics, rect)) => {
                self.metrics = Some(metrics);
                self.rect = rect;
                true
            }
            None => {
                self.metrics = None;
                false
            }
        }
    }

    /// Start a gesture if the press lands on the selection.
    pub fn on_pointer_down(&mut self, position: Point) -> Option<GestureKind> {
        self.metrics?;

        let kind = classify_press(&self.rect, self.rotation, position, &self.limits)?;
        let snapshot = GestureSnapshot {
            press: position,
            start_rect: self.rect,
            start_rotation: self.rotation,
            start_angle: angle_of_point(self.rect.center(), position),
        };
        self.interaction = Interaction::begin(kind, snapshot);
        debug!(?kind, x = position.x, y = position.y, "Gesture started");
        Some(kind)
    }

    /// Apply the active gesture. Returns whether the selection changed.
    pub fn on_pointer_move(&mut self, position: Point) -> bool {
        let Some(metrics) = self.metrics else {
            return false;
        };

        let (rect, rotation) = match self.interaction {
            Interaction::Idle => return false,
            Interaction::Dragging(s) => (drag_to(&s.start_rect, s.press, position, &metrics), self.rotation),
            Interaction::Resizing(s) => (
                resize_to(&s.start_rect, s.press, position, &metrics, &self.limits),
                self.rotation,
            ),
            Interaction::Rotating(s) => (
                self.rect,
                rotation_for(s.start_rotation, s.start_angle, s.start_rect.center(), position),
            ),
        };

        let changed = rect != self.rect || rotation != self.rotation;
        self.rect = rect;
        self.rotation = rotation;
        if changed {
            self.last_good = Some((metrics, rect));
        }
        changed
    }

    /// Finish the active gesture. Returns whether one was active.
    pub fn on_pointer_up(&mut self) -> bool {
        let was_active = !self.interaction.is_idle();
        self.interaction = Interaction::Idle;
        was_active
    }

    /// Cancel the active gesture. Deltas already applied are kept.
    pub fn on_capture_lost(&mut self) -> bool {
        let was_active = !self.interaction.is_idle();
        if was_active {
            debug!(gesture = ?self.interaction.kind(), "Pointer capture lost, gesture cancelled");
        }
        self.interaction = Interaction::Idle;
        was_active
    }

    /// Refit after the container changed size, carrying the selection over proportionally.
    pub fn on_container_resized(&mut self, container: Size) {
        let Some(source_size) = self.source_size else {
            return;
        };
        self.interaction = Interaction::Idle;

        let Some(metrics) = fit_to_container(container, source_size) else {
            self.restore_last_good();
            return;
        };

        // Carry the live selection over, or apply settings deferred by `initialize`.
        let carried = match self.metrics {
            Some(old) => settings::remap(&settings::serialize(&self.rect, self.rotation, &old), &metrics),
            None => self
                .pending_restore
                .take()
                .and_then(|saved| settings::remap(&saved, &metrics)),
        };

        match carried {
            Some(restored) => {
                self.rect = constrain(&restored.rect, &metrics, &self.limits);
                self.rotation = restored.rotation;
            }
            None => {
                self.rect = default_crop(&metrics, &self.limits);
                self.rotation = 0.0;
            }
        }
        self.metrics = Some(metrics);
        self.last_good = Some((metrics, self.rect));
    }

    /// Drop everything tied to the current source.
    pub fn clear(&mut self) {
        *self = Self::new(self.limits.clone());
    }

    pub fn is_initialized(&self) -> bool {
        self.metrics.is_some()
    }

    pub fn limits(&self) -> &CropLimits {
        &self.limits
    }

    pub fn rect(&self) -> CropRectangle {
        self.rect
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn metrics(&self) -> Option<DisplayMetrics> {
        self.metrics
    }

    pub fn source_size(&self) -> Option<Size> {
        self.source_size
    }

    pub fn interaction(&self) -> Interaction {
        self.interaction
    }

    /// Current crop as persisted settings.
    pub fn settings(&self) -> Option<CropSettings> {
        self.metrics
            .map(|m| settings::serialize(&self.rect, self.rotation, &m))
    }

    /// Current selection mapped into the pixel space of a bitmap of `pixel_size`.
    pub fn source_rect(&self, pixel_size: Size) -> Option<Rect> {
        let metrics = self.metrics?;
        if pixel_size.is_degenerate() || !self.rect.is_valid() {
            return None;
        }
        Some(map_rect_to_source(&self.rect, &metrics, pixel_size))
    }
}
