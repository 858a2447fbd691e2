#![forbid(unsafe_code)]

//! Cursor shapes requested from the host.
//!
//! The engine only decides *which* cursor is appropriate; bitmap selection
//! and platform calls stay with the host.

use serde::{Deserialize, Serialize};

/// Cursor shape a host should display over the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorKind {
    /// The host's normal pointer.
    #[default]
    Default,
    /// Horizontal resize (dragging a vertical edge left/right).
    ResizeH,
    /// Vertical resize (dragging a horizontal edge up/down).
    ResizeV,
    /// Two-axis move (dragging an intersection of edges).
    Move,
}

impl CursorKind {
    /// Whether this cursor advertises a resize affordance.
    #[must_use]
    pub const fn is_resize(self) -> bool {
        !matches!(self, Self::Default)
    }
}

#[cfg(test)]
mod tests {
    use super::CursorKind;

    #[test]
    fn default_is_not_resize() {
        assert_eq!(CursorKind::default(), CursorKind::Default);
        assert!(!CursorKind::Default.is_resize());
        assert!(CursorKind::Move.is_resize());
    }

    #[test]
    fn serializes_snake_case() {
        let json = serde_json::to_string(&CursorKind::ResizeH).expect("serialize");
        assert_eq!(json, "\"resize_h\"");
    }
}
