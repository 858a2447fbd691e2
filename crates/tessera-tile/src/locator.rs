//! Edge and intersection hit-testing.
//!
//! A region's right edge is a horizontal-resize candidate and its bottom
//! edge a vertical-resize candidate. Each axis picks its closest candidate
//! independently; the two together form a corner grab.

use serde::{Deserialize, Serialize};
use tessera_core::cursor::CursorKind;
use tessera_core::geometry::{Point, Rect};

use crate::engine::EdgeTarget;

/// Which edges a grab holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CursorClass {
    #[default]
    None,
    /// A vertical edge line; the pointer resizes horizontally.
    Horizontal,
    /// A horizontal edge line; the pointer resizes vertically.
    Vertical,
    /// Both.
    Corner,
}

impl CursorClass {
    #[must_use]
    pub const fn from_target(target: EdgeTarget) -> Self {
        match (target.x, target.y) {
            (None, None) => Self::None,
            (Some(_), None) => Self::Horizontal,
            (None, Some(_)) => Self::Vertical,
            (Some(_), Some(_)) => Self::Corner,
        }
    }

    /// Cursor shape the host should show for this grab.
    #[must_use]
    pub const fn cursor(self) -> CursorKind {
        match self {
            Self::None => CursorKind::Default,
            Self::Horizontal => CursorKind::ResizeH,
            Self::Vertical => CursorKind::ResizeV,
            Self::Corner => CursorKind::Move,
        }
    }
}

impl From<CursorClass> for CursorKind {
    fn from(class: CursorClass) -> Self {
        class.cursor()
    }
}

/// A located grab: the edge coordinates under the pointer and where the
/// pointer sits relative to them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DragSession {
    pub old: EdgeTarget,
    /// Pointer minus edge coordinate, per active axis (zero otherwise).
    pub offset: Point,
    pub cursor: CursorClass,
}

impl DragSession {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !self.old.is_empty()
    }

    /// Edge coordinates the pointer at `pointer` asks for, before clamping.
    #[must_use]
    pub const fn candidate(&self, pointer: Point) -> Point {
        Point::new(pointer.x - self.offset.x, pointer.y - self.offset.y)
    }
}

#[derive(Debug, Clone, Copy)]
struct Best {
    coord: i32,
    distance: i32,
}

fn consider(best: &mut Option<Best>, coord: i32, distance: i32) {
    // First match wins ties.
    if best.is_none_or(|current| distance < current.distance) {
        *best = Some(Best { coord, distance });
    }
}

/// Find the draggable edges within `tolerance` of `pointer`.
///
/// `skip` excludes one region by index (the anchor in classic mode). Edges
/// on the container's right or bottom boundary are never returned.
#[must_use]
pub fn locate(
    rects: &[Rect],
    skip: Option<usize>,
    container: Rect,
    pointer: Point,
    tolerance: i32,
) -> DragSession {
    let tolerance = tolerance.max(0);
    let mut best_x: Option<Best> = None;
    let mut best_y: Option<Best> = None;

    for (idx, rect) in rects.iter().enumerate() {
        if skip == Some(idx) {
            continue;
        }

        let right = rect.right();
        let dx = (pointer.x - right).abs();
        if dx <= tolerance
            && right != container.right()
            && pointer.y >= rect.top() - tolerance
            && pointer.y <= rect.bottom() + tolerance
        {
            consider(&mut best_x, right, dx);
        }

        let bottom = rect.bottom();
        let dy = (pointer.y - bottom).abs();
        if dy <= tolerance
            && bottom != container.bottom()
            && pointer.x >= rect.left() - tolerance
            && pointer.x <= rect.right() + tolerance
        {
            consider(&mut best_y, bottom, dy);
        }
    }

    let old = EdgeTarget::new(best_x.map(|b| b.coord), best_y.map(|b| b.coord));
    let offset = Point::new(
        old.x.map_or(0, |x| pointer.x - x),
        old.y.map_or(0, |y| pointer.y - y),
    );
    DragSession {
        old,
        offset,
        cursor: CursorClass::from_target(old),
    }
}
