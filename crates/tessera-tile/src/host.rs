//! The host side of a tile container.
//!
//! The container never reaches into a widget toolkit. Everything it needs
//! from the outside world (bounds pushes, cursor changes, change
//! notifications, preferred minimum sizes) goes through [`TileHost`].

use serde::{Deserialize, Serialize};
use tessera_core::cursor::CursorKind;
use tessera_core::geometry::{Rect, Size};

use crate::registry::RegionId;

/// Why the container is notifying the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallbackReason {
    /// A live drag preview moved some edges.
    Dragged,
    /// A drag was committed.
    Changed,
}

/// Callbacks a host implements to embed a tile container.
///
/// Every method has a no-op default so hosts only implement what they use.
pub trait TileHost<W> {
    /// Push new bounds for a region's widget.
    fn set_bounds(&mut self, region: RegionId, widget: &W, bounds: Rect) {
        let _ = (region, widget, bounds);
    }

    /// Preferred minimum size of a widget, consulted by
    /// [`Tile::sync_min_sizes`](crate::Tile::sync_min_sizes).
    fn min_size(&self, widget: &W) -> Option<Size> {
        let _ = widget;
        None
    }

    /// Change the pointer cursor. Only called when the shape changes.
    fn set_cursor(&mut self, cursor: CursorKind) {
        let _ = cursor;
    }

    fn invoke_callback(&mut self, reason: CallbackReason) {
        let _ = reason;
    }
}

/// Host that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullHost;

impl<W> TileHost<W> for NullHost {}

/// One call observed by a [`RecordingHost`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum HostCall {
    SetBounds { region: RegionId, bounds: Rect },
    SetCursor { cursor: CursorKind },
    Callback { reason: CallbackReason },
}

/// Host that logs every call, for tests and replay tooling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordingHost<W> {
    pub calls: Vec<HostCall>,
    /// Minimum sizes reported by [`TileHost::min_size`], keyed by widget.
    pub min_sizes: Vec<(W, Size)>,
}

impl<W> Default for RecordingHost<W> {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            min_sizes: Vec::new(),
        }
    }
}

impl<W> RecordingHost<W> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: report `size` as the preferred minimum of `widget`.
    #[must_use]
    pub fn with_min_size(mut self, widget: W, size: Size) -> Self {
        self.min_sizes.push((widget, size));
        self
    }

    /// Drain recorded calls.
    pub fn take(&mut self) -> Vec<HostCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn callbacks(&self) -> impl Iterator<Item = CallbackReason> + '_ {
        self.calls.iter().filter_map(|call| match call {
            HostCall::Callback { reason } => Some(*reason),
            _ => None,
        })
    }

    pub fn cursors(&self) -> impl Iterator<Item = CursorKind> + '_ {
        self.calls.iter().filter_map(|call| match call {
            HostCall::SetCursor { cursor } => Some(*cursor),
            _ => None,
        })
    }

    /// Last bounds pushed for `region`.
    #[must_use]
    pub fn last_bounds(&self, region: RegionId) -> Option<Rect> {
        self.calls.iter().rev().find_map(|call| match call {
            HostCall::SetBounds { region: id, bounds } if *id == region => Some(*bounds),
            _ => None,
        })
    }
}

impl<W: PartialEq> TileHost<W> for RecordingHost<W> {
    fn set_bounds(&mut self, region: RegionId, _widget: &W, bounds: Rect) {
        self.calls.push(HostCall::SetBounds { region, bounds });
    }

    fn min_size(&self, widget: &W) -> Option<Size> {
        self.min_sizes
            .iter()
            .find(|(candidate, _)| candidate == widget)
            .map(|(_, size)| *size)
    }

    fn set_cursor(&mut self, cursor: CursorKind) {
        self.calls.push(HostCall::SetCursor { cursor });
    }

    fn invoke_callback(&mut self, reason: CallbackReason) {
        self.calls.push(HostCall::Callback { reason });
    }
}
