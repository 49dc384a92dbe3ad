use serde::{Deserialize, Serialize};

/// Identifies the pointer driving a gesture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PointerId {
    Mouse,
    Touch(i64),
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TouchPoint {
    pub identifier: i64,
    pub position: f32,
}

impl TouchPoint {
    pub fn new(identifier: i64, position: f32) -> Self {
        Self {
            identifier,
            position,
        }
    }
}

/// A pointer position paired with the pointer that produced it.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointerSample {
    pub position: f32,
    pub pointer: PointerId,
}

impl PointerSample {
    pub fn mouse(position: f32) -> Self {
        Self {
            position,
            pointer: PointerId::Mouse,
        }
    }

    pub fn touch(identifier: i64, position: f32) -> Self {
        Self {
            position,
            pointer: PointerId::Touch(identifier),
        }
    }
}

impl From<TouchPoint> for PointerSample {
    fn from(touch: TouchPoint) -> Self {
        Self::touch(touch.identifier, touch.position)
    }
}

/// A raw move/press/release event as delivered by the event source.
///
/// Touch events may batch several changed touch points; only the one that
/// belongs to the active gesture is relevant.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PointerInput {
    Mouse { position: f32 },
    Touch { changed: Vec<TouchPoint> },
}

impl PointerInput {
    pub fn mouse(position: f32) -> Self {
        Self::Mouse { position }
    }

    pub fn touches(changed: impl Into<Vec<TouchPoint>>) -> Self {
        Self::Touch {
            changed: changed.into(),
        }
    }

    /// The sample that starts a gesture: the mouse position, or the first changed touch.
    pub fn first_sample(&self) -> Option<PointerSample> {
        match self {
            Self::Mouse { position } => Some(PointerSample::mouse(*position)),
            Self::Touch { changed } => changed.first().copied().map(PointerSample::from),
        }
    }

    /// The sample for `pointer`, if this event carries one.
    ///
    /// Mouse events always yield a mouse sample; whether it matches the active
    /// gesture is decided by the session.
    pub fn sample_for(&self, pointer: PointerId) -> Option<PointerSample> {
        match (self, pointer) {
            (Self::Mouse { position }, _) => Some(PointerSample::mouse(*position)),
            (Self::Touch { changed }, PointerId::Touch(identifier)) => changed
                .iter()
                .find(|touch| touch.identifier == identifier)
                .copied()
                .map(PointerSample::from),
            (Self::Touch { .. }, PointerId::Mouse) => None,
        }
    }
}
