//! Interactive edge dragging.
//!
//! ```text
//! Idle -> Armed -> Dragging -> Idle (commit)
//!    \       \---------\-----> Idle (release without motion / cancel)
//! ```
//!
//! Every event handed to [`Tile::handle_pointer_event`] or
//! [`Tile::handle_event`] produces one [`DragTransition`], retrievable with
//! [`Tile::last_transition`].

use serde::{Deserialize, Serialize};
use tessera_core::cursor::CursorKind;
use tessera_core::event::{Event, PointerEvent, PointerEventKind};
use tessera_core::geometry::{Point, Rect};

use crate::engine::EdgeTarget;
use crate::error::TileError;
use crate::host::{CallbackReason, TileHost};
use crate::locator::{CursorClass, DragSession};
use crate::snapshot::TileSnapshot;
use crate::tile::Tile;

/// Lifecycle state of the drag controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum DragState {
    #[default]
    Idle,
    /// Pressed on an edge; nothing has moved yet. `limits` is the clamp
    /// rectangle captured at press time.
    Armed {
        session: DragSession,
        origin: Point,
        limits: Rect,
    },
    Dragging {
        session: DragSession,
        origin: Point,
        current: Point,
        limits: Rect,
    },
}

impl DragState {
    #[must_use]
    pub const fn session(&self) -> Option<DragSession> {
        match self {
            Self::Idle => None,
            Self::Armed { session, .. } | Self::Dragging { session, .. } => Some(*session),
        }
    }

    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }
}

/// Why an active drag ended without a commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelReason {
    FocusLost,
    CaptureLost,
    /// [`Tile::cancel_drag`] was called.
    Programmatic,
    /// A region was removed mid-drag.
    RegionRemoved,
    /// The container was resized mid-drag.
    ContainerResized,
}

/// Events that were handled but changed nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DragNoopReason {
    IdleWithoutActiveDrag,
    ActiveDragAlreadyInProgress,
    NoEdgeUnderPointer,
    ButtonMismatch,
    /// The engine could not allocate its commit buffer.
    CommitFailed,
}

/// What one transition did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum DragEffect {
    Hovered {
        cursor: CursorClass,
    },
    Left,
    Armed {
        target: EdgeTarget,
        origin: Point,
    },
    Dragged {
        target: EdgeTarget,
        requested: Point,
        achieved: EdgeTarget,
    },
    Committed {
        target: EdgeTarget,
        achieved: EdgeTarget,
    },
    /// Released while armed: no callbacks.
    Released {
        target: EdgeTarget,
    },
    Canceled {
        target: Option<EdgeTarget>,
        reason: CancelReason,
        restored: bool,
    },
    Noop {
        reason: DragNoopReason,
    },
}

/// One controller step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DragTransition {
    pub transition_id: u64,
    pub from: DragState,
    pub to: DragState,
    pub effect: DragEffect,
}

/// Drag lifecycle bookkeeping owned by a [`Tile`].
#[derive(Debug, Clone, Default)]
pub struct DragController {
    state: DragState,
    cursor: CursorKind,
    transition_counter: u64,
    last: Option<DragTransition>,
    /// Geometry at press time, kept when cancel should restore it.
    pressed: Option<TileSnapshot>,
}

impl DragController {
    #[must_use]
    pub const fn state(&self) -> DragState {
        self.state
    }

    /// Cursor last requested from the host.
    #[must_use]
    pub const fn cursor(&self) -> CursorKind {
        self.cursor
    }

    #[must_use]
    pub const fn last_transition(&self) -> Option<&DragTransition> {
        self.last.as_ref()
    }

    fn record(&mut self, from: DragState, effect: DragEffect) -> DragTransition {
        self.transition_counter = self.transition_counter.saturating_add(1);
        let transition = DragTransition {
            transition_id: self.transition_counter,
            from,
            to: self.state,
            effect,
        };
        tessera_core::debug!(
            transition_id = transition.transition_id,
            from = ?transition.from,
            to = ?transition.to,
            effect = ?transition.effect,
            "drag transition"
        );
        self.last = Some(transition);
        transition
    }

    /// Returns the new cursor if it differs from the current one.
    fn change_cursor(&mut self, cursor: CursorKind) -> Option<CursorKind> {
        if self.cursor == cursor {
            return None;
        }
        self.cursor = cursor;
        Some(cursor)
    }

    /// Drop an active drag without restoring anything.
    pub(crate) fn abandon(&mut self) {
        let from = self.state;
        if !from.is_active() {
            return;
        }
        self.state = DragState::Idle;
        self.pressed = None;
        self.record(
            from,
            DragEffect::Canceled {
                target: from.session().map(|session| session.old),
                reason: CancelReason::RegionRemoved,
                restored: false,
            },
        );
    }
}

impl<W> Tile<W> {
    #[must_use]
    pub const fn drag_state(&self) -> DragState {
        self.drag.state()
    }

    /// The most recent controller transition.
    #[must_use]
    pub const fn last_transition(&self) -> Option<&DragTransition> {
        self.drag.last_transition()
    }

    /// Feed one pointer event. Returns whether the container consumed it.
    pub fn handle_pointer_event<H: TileHost<W>>(
        &mut self,
        event: &PointerEvent,
        host: &mut H,
    ) -> bool {
        let from = self.drag.state;
        let pointer = event.position();
        let drag_button = self.config.drag_button;

        let (consumed, effect) = match (from, event.kind) {
            (DragState::Idle, PointerEventKind::Moved) => {
                let session = self.locate(pointer);
                self.show_cursor(session.cursor.cursor(), host);
                (
                    session.is_active(),
                    DragEffect::Hovered {
                        cursor: session.cursor,
                    },
                )
            }
            (DragState::Idle, PointerEventKind::Leave) => {
                self.show_cursor(CursorKind::Default, host);
                (false, DragEffect::Left)
            }
            (
                _,
                PointerEventKind::Down(button)
                | PointerEventKind::Drag(button)
                | PointerEventKind::Up(button),
            ) if button != drag_button => (
                from.is_active(),
                DragEffect::Noop {
                    reason: DragNoopReason::ButtonMismatch,
                },
            ),
            (DragState::Idle, PointerEventKind::Down(_)) => {
                let session = self.locate(pointer);
                if session.is_active() {
                    self.drag.pressed = self.config.restore_on_cancel.then(|| self.snapshot());
                    self.drag.state = DragState::Armed {
                        session,
                        origin: pointer,
                        limits: self.drag_limits(),
                    };
                    self.show_cursor(session.cursor.cursor(), host);
                    (
                        true,
                        DragEffect::Armed {
                            target: session.old,
                            origin: pointer,
                        },
                    )
                } else {
                    (
                        false,
                        DragEffect::Noop {
                            reason: DragNoopReason::NoEdgeUnderPointer,
                        },
                    )
                }
            }
            (
                DragState::Armed {
                    session,
                    origin,
                    limits,
                }
                | DragState::Dragging {
                    session,
                    origin,
                    limits,
                    ..
                },
                PointerEventKind::Drag(_),
            ) => {
                let requested = limits.clamp_point(session.candidate(pointer));
                let effect = match self.preview(session, requested, host) {
                    Ok(achieved) => {
                        let mut session = session;
                        session.old = achieved;
                        self.drag.state = DragState::Dragging {
                            session,
                            origin,
                            current: pointer,
                            limits,
                        };
                        host.invoke_callback(CallbackReason::Dragged);
                        DragEffect::Dragged {
                            target: session.old,
                            requested,
                            achieved,
                        }
                    }
                    Err(err) => commit_failed(&err),
                };
                (true, effect)
            }
            (DragState::Dragging { session, limits, .. }, PointerEventKind::Up(_)) => {
                let requested = limits.clamp_point(session.candidate(pointer));
                let before = self.registry.bounds();
                let result = self.move_intersection(session.old, requested);
                let changed = self.changed_since(&before);
                self.push_bounds(&changed, host);
                self.drag.state = DragState::Idle;
                self.drag.pressed = None;
                let effect = match result {
                    Ok(achieved) => {
                        host.invoke_callback(CallbackReason::Changed);
                        DragEffect::Committed {
                            target: session.old,
                            achieved,
                        }
                    }
                    Err(err) => commit_failed(&err),
                };
                (true, effect)
            }
            (DragState::Armed { session, .. }, PointerEventKind::Up(_)) => {
                self.drag.state = DragState::Idle;
                self.drag.pressed = None;
                (
                    true,
                    DragEffect::Released {
                        target: session.old,
                    },
                )
            }
            (DragState::Armed { .. } | DragState::Dragging { .. }, PointerEventKind::Down(_)) => (
                true,
                DragEffect::Noop {
                    reason: DragNoopReason::ActiveDragAlreadyInProgress,
                },
            ),
            (DragState::Idle, PointerEventKind::Drag(_) | PointerEventKind::Up(_)) => (
                false,
                DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                },
            ),
            // Capture keeps hover and leave from interrupting an active drag.
            (
                DragState::Armed { .. } | DragState::Dragging { .. },
                PointerEventKind::Moved | PointerEventKind::Leave,
            ) => (
                true,
                DragEffect::Noop {
                    reason: DragNoopReason::ActiveDragAlreadyInProgress,
                },
            ),
        };

        self.drag.record(from, effect);
        consumed
    }

    /// Feed any canonical event. Returns whether the container consumed it.
    pub fn handle_event<H: TileHost<W>>(&mut self, event: &Event, host: &mut H) -> bool {
        match event {
            Event::Pointer(pointer) => self.handle_pointer_event(pointer, host),
            Event::Resize(bounds) => {
                if self.drag.state.is_active() {
                    self.cancel_with(CancelReason::ContainerResized, host);
                }
                let before = self.registry.bounds();
                if let Err(err) = self.resize_container(*bounds) {
                    tessera_core::error!(%err, "container resize failed");
                    return false;
                }
                let changed = self.changed_since(&before);
                self.push_bounds(&changed, host);
                true
            }
            Event::Focus(true) => false,
            Event::Focus(false) => self.cancel_with(CancelReason::FocusLost, host),
            Event::CaptureLost => self.cancel_with(CancelReason::CaptureLost, host),
        }
    }

    /// Abort an active drag without committing. Returns whether a drag was
    /// active.
    pub fn cancel_drag<H: TileHost<W>>(&mut self, host: &mut H) -> bool {
        self.cancel_with(CancelReason::Programmatic, host)
    }

    fn cancel_with<H: TileHost<W>>(&mut self, reason: CancelReason, host: &mut H) -> bool {
        let from = self.drag.state;
        let Some(session) = from.session() else {
            self.drag.record(
                from,
                DragEffect::Noop {
                    reason: DragNoopReason::IdleWithoutActiveDrag,
                },
            );
            return false;
        };

        self.drag.state = DragState::Idle;
        let mut restored = false;
        if let Some(snapshot) = self.drag.pressed.take() {
            match self.restore(&snapshot) {
                Ok(changed) => {
                    self.push_bounds(&changed, host);
                    restored = true;
                }
                Err(err) => tessera_core::warn!(%err, "could not restore pre-drag geometry"),
            }
        }
        self.show_cursor(CursorKind::Default, host);
        self.drag.record(
            from,
            DragEffect::Canceled {
                target: Some(session.old),
                reason,
                restored,
            },
        );
        true
    }

    fn preview<H: TileHost<W>>(
        &mut self,
        session: DragSession,
        requested: Point,
        host: &mut H,
    ) -> Result<EdgeTarget, TileError> {
        let before = self.registry.bounds();
        let achieved = self.drag_intersection(session.old, requested)?;
        let changed = self.changed_since(&before);
        self.push_bounds(&changed, host);
        Ok(achieved)
    }

    /// Rectangle drag targets are clamped to: the container in size-range
    /// mode, otherwise the anchor (or the container without one). Read once
    /// per press; the drag itself moves the anchor's edges.
    fn drag_limits(&self) -> Rect {
        if self.is_size_range_enabled() {
            return self.bounds;
        }
        self.anchor
            .and_then(|id| self.region_bounds(id))
            .unwrap_or(self.bounds)
    }

    fn show_cursor<H: TileHost<W>>(&mut self, cursor: CursorKind, host: &mut H) {
        if let Some(cursor) = self.drag.change_cursor(cursor) {
            host.set_cursor(cursor);
        }
    }
}

fn commit_failed(err: &TileError) -> DragEffect {
    tessera_core::error!(%err, "drag commit failed");
    DragEffect::Noop {
        reason: DragNoopReason::CommitFailed,
    }
}
