use crate::geometry::{CropRectangle, GestureKind, Point};

/// State captured when a gesture starts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GestureSnapshot {
    /// Pointer position at press time.
    pub press: Point,
    /// Selection at press time.
    pub start_rect: CropRectangle,
    /// Rotation at press time.
    pub start_rotation: f64,
    /// Angle of the press around the selection center, degrees.
    pub start_angle: f64,
}

/// Current pointer gesture.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum Interaction {
    #[default]
    Idle,
    Dragging(GestureSnapshot),
    Resizing(GestureSnapshot),
    Rotating(GestureSnapshot),
}

impl Interaction {
    pub(crate) fn begin(kind: GestureKind, snapshot: GestureSnapshot) -> Self {
        match kind {
            GestureKind::Move => Self::Dragging(snapshot),
            GestureKind::Resize => Self::Resizing(snapshot),
            GestureKind::Rotate => Self::Rotating(snapshot),
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn kind(&self) -> Option<GestureKind> {
        match self {
            Self::Idle => None,
            Self::Dragging(_) => Some(GestureKind::Move),
            Self::Resizing(_) => Some(GestureKind::Resize),
            Self::Rotating(_) => Some(GestureKind::Rotate),
        }
    }
}
