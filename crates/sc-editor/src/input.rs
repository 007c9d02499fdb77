//! Input abstraction layer.
//!
//! Normalizes mouse and touch events into a unified `InputEvent` enum.
//! Pointer coordinates are client (viewport) coordinates; the canvas
//! translates them into surface-local space with its `SurfaceOffset`.

use sc_core::model::Point;

/// Keyboard modifier state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
        meta: false,
    };
}

/// A normalized input event from any pointing device or the keyboard.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse down or touch start.
    PointerDown { x: f32, y: f32 },

    /// Mouse move or touch move.
    PointerMove { x: f32, y: f32 },

    /// Mouse up or touch end.
    PointerUp,

    /// Pointer left the surface (mouse out). Ends the stroke like `PointerUp`.
    PointerLeave,

    /// Key press.
    Key { key: String, modifiers: Modifiers },
}

impl InputEvent {
    pub fn from_pointer_down(x: f32, y: f32) -> Self {
        Self::PointerDown { x, y }
    }

    pub fn from_pointer_move(x: f32, y: f32) -> Self {
        Self::PointerMove { x, y }
    }

    /// Touch start, using the first active touch. `None` if no touches.
    pub fn from_touch_start(touches: &[(f32, f32)]) -> Option<Self> {
        touches.first().map(|&(x, y)| Self::PointerDown { x, y })
    }

    /// Touch move, using the first active touch. `None` if no touches.
    pub fn from_touch_move(touches: &[(f32, f32)]) -> Option<Self> {
        touches.first().map(|&(x, y)| Self::PointerMove { x, y })
    }

    pub fn from_key(key: &str, modifiers: Modifiers) -> Self {
        Self::Key {
            key: key.to_string(),
            modifiers,
        }
    }

    /// Extract position if this is a positioned pointer event.
    pub fn position(&self) -> Option<(f32, f32)> {
        match self {
            Self::PointerDown { x, y } | Self::PointerMove { x, y } => Some((*x, *y)),
            _ => None,
        }
    }
}

/// On-screen position of the surface's top-left corner.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SurfaceOffset {
    pub left: f32,
    pub top: f32,
}

impl SurfaceOffset {
    pub fn new(left: f32, top: f32) -> Self {
        Self { left, top }
    }

    /// Translate client coordinates into surface-local coordinates.
    pub fn to_local(&self, client_x: f32, client_y: f32) -> Point {
        Point::new(client_x - self.left, client_y - self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn offset_subtracts_surface_origin() {
        let offset = SurfaceOffset::new(100.0, 40.0);
        assert_eq!(offset.to_local(110.0, 50.0), Point::new(10.0, 10.0));
        assert_eq!(SurfaceOffset::default().to_local(3.0, 4.0), Point::new(3.0, 4.0));
    }

    #[test]
    fn touch_uses_first_touch() {
        let event = InputEvent::from_touch_start(&[(5.0, 6.0), (70.0, 80.0)]).unwrap();
        assert_eq!(event, InputEvent::PointerDown { x: 5.0, y: 6.0 });
        assert!(InputEvent::from_touch_move(&[]).is_none());
    }

    #[test]
    fn position_only_for_positioned_events() {
        assert_eq!(InputEvent::from_pointer_move(1.0, 2.0).position(), Some((1.0, 2.0)));
        assert_eq!(InputEvent::PointerUp.position(), None);
        assert_eq!(InputEvent::from_key("r", Modifiers::NONE).position(), None);
    }
}
