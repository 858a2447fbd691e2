#![forbid(unsafe_code)]

//! Canonical input/event types.
//!
//! Hosts translate their native pointer and window events into these types
//! before handing them to a tile container. All events derive `Clone`,
//! `PartialEq`, and `Eq` for use in tests and pattern matching.
//!
//! # Design Notes
//!
//! - Pointer coordinates are in the container's coordinate space.
//! - `Modifiers` and `PointerButtons` use bitflags for easy combination.
//! - A pointer event carries the button state sampled by the host, so the
//!   engine never polls the host for it.

use bitflags::bitflags;

use crate::geometry::{Point, Rect};

/// Canonical input event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A pointer event.
    Pointer(PointerEvent),

    /// The host asked the container to take new outer bounds.
    Resize(Rect),

    /// Focus gained or lost.
    ///
    /// `true` = focus gained, `false` = focus lost.
    Focus(bool),

    /// The host lost pointer capture (grab broken, window hidden, ...).
    CaptureLost,
}

bitflags! {
    /// Modifier keys held during a pointer event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// No modifiers.
        const NONE  = 0b0000;
        /// Shift key.
        const SHIFT = 0b0001;
        /// Alt/Option key.
        const ALT   = 0b0010;
        /// Control key.
        const CTRL  = 0b0100;
        /// Super/Meta/Command key.
        const SUPER = 0b1000;
    }
}

impl Default for Modifiers {
    fn default() -> Self {
        Self::NONE
    }
}

bitflags! {
    /// Pointer buttons currently held down.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PointerButtons: u8 {
        const NONE   = 0b000;
        const LEFT   = 0b001;
        const RIGHT  = 0b010;
        const MIDDLE = 0b100;
    }
}

impl Default for PointerButtons {
    fn default() -> Self {
        Self::NONE
    }
}

/// Pointer button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerButton {
    /// Left (primary) button.
    Left,

    /// Right button.
    Right,

    /// Middle button (scroll wheel click).
    Middle,
}

impl PointerButton {
    /// The held-button mask corresponding to this button.
    #[must_use]
    pub const fn mask(self) -> PointerButtons {
        match self {
            Self::Left => PointerButtons::LEFT,
            Self::Right => PointerButtons::RIGHT,
            Self::Middle => PointerButtons::MIDDLE,
        }
    }
}

/// The type of pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed down.
    Down(PointerButton),

    /// Button released.
    Up(PointerButton),

    /// Pointer moved while a button is held.
    Drag(PointerButton),

    /// Pointer moved with no button held.
    Moved,

    /// Pointer left the container.
    Leave,
}

/// A pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    /// The type of pointer event.
    pub kind: PointerEventKind,

    /// X coordinate.
    pub x: i32,

    /// Y coordinate.
    pub y: i32,

    /// Buttons held at the time of the event.
    pub buttons: PointerButtons,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl PointerEvent {
    /// Create a new pointer event. The held-button mask is derived from the
    /// event kind.
    #[must_use]
    pub const fn new(kind: PointerEventKind, x: i32, y: i32) -> Self {
        let buttons = match kind {
            PointerEventKind::Down(button) | PointerEventKind::Drag(button) => button.mask(),
            PointerEventKind::Up(_) | PointerEventKind::Moved | PointerEventKind::Leave => {
                PointerButtons::NONE
            }
        };
        Self {
            kind,
            x,
            y,
            buttons,
            modifiers: Modifiers::NONE,
        }
    }

    /// Shorthand for a hover move.
    #[must_use]
    pub const fn moved(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Moved, x, y)
    }

    /// Shorthand for a primary-button press.
    #[must_use]
    pub const fn down(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Down(PointerButton::Left), x, y)
    }

    /// Shorthand for a primary-button drag.
    #[must_use]
    pub const fn drag(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Drag(PointerButton::Left), x, y)
    }

    /// Shorthand for a primary-button release.
    #[must_use]
    pub const fn up(x: i32, y: i32) -> Self {
        Self::new(PointerEventKind::Up(PointerButton::Left), x, y)
    }

    /// Create a pointer event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Override the held-button mask reported by the host.
    #[must_use]
    pub const fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Get the position as a point.
    #[must_use]
    pub const fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl From<PointerEvent> for Event {
    fn from(event: PointerEvent) -> Self {
        Self::Pointer(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_event_position() {
        let event = PointerEvent::down(10, -20);
        assert_eq!(event.position(), Point::new(10, -20));
        assert_eq!(event.kind, PointerEventKind::Down(PointerButton::Left));
    }

    #[test]
    fn buttons_follow_kind() {
        assert_eq!(PointerEvent::drag(0, 0).buttons, PointerButtons::LEFT);
        assert_eq!(PointerEvent::up(0, 0).buttons, PointerButtons::NONE);
        let right = PointerEvent::new(PointerEventKind::Down(PointerButton::Right), 1, 1);
        assert_eq!(right.buttons, PointerButtons::RIGHT);
    }

    #[test]
    fn pointer_event_with_modifiers() {
        let event = PointerEvent::moved(0, 0).with_modifiers(Modifiers::ALT | Modifiers::SHIFT);
        assert!(event.modifiers.contains(Modifiers::ALT));
        assert!(!event.modifiers.contains(Modifiers::CTRL));
    }

    #[test]
    fn defaults_are_empty() {
        assert_eq!(Modifiers::default(), Modifiers::NONE);
        assert_eq!(PointerButtons::default(), PointerButtons::NONE);
    }

    #[test]
    fn pointer_converts_into_event() {
        let event: Event = PointerEvent::moved(3, 4).into();
        assert!(matches!(event, Event::Pointer(p) if p.x == 3 && p.y == 4));
    }
}
