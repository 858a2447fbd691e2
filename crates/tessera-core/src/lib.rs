#![forbid(unsafe_code)]

//! Core: geometry, pointer events, cursor kinds, and logging.
//!
//! # Role in Tessera
//! `tessera-core` is the vocabulary shared between hosts and the tiling
//! engine. It owns no state; everything here is plain data.
//!
//! # Primary responsibilities
//! - **Geometry**: signed integer `Rect`, `Point`, `Size`, and `Axis`.
//! - **Event**: canonical pointer, focus, capture and resize events.
//! - **Cursor**: the cursor shapes the engine may request.
//! - **Logging**: optional `tracing` re-exports and subscriber setup.

pub mod cursor;
pub mod event;
pub mod geometry;
pub mod logging;

pub use cursor::CursorKind;
pub use event::{Event, Modifiers, PointerButton, PointerButtons, PointerEvent, PointerEventKind};
pub use geometry::{Axis, Point, Rect, Size};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
