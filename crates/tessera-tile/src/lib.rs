#![forbid(unsafe_code)]

//! Tiling container with constraint-propagating edge drags.
//!
//! A [`Tile`] holds rectangular regions that exactly partition its bounds.
//! Dragging a shared edge (or the intersection of two edges) moves every
//! region on that edge line; regions that would drop below their minimum
//! push their neighbors along until the container boundary stops the
//! cascade.
//!
//! # Modules
//! - [`registry`]: ordered region store with stable ids.
//! - [`locator`]: hit-testing of edges and intersections.
//! - [`engine`]: probe/commit propagation over a bounds snapshot.
//! - [`drag`]: pointer-driven drag state machine.
//! - [`resize`]: container resize in classic and size-range modes.
//! - [`invariant`], [`snapshot`]: validation and geometry capture.

pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod host;
pub mod invariant;
pub mod locator;
pub mod registry;
pub mod resize;
pub mod snapshot;
pub mod tile;

pub use config::{DEFAULT_GRAB_TOLERANCE, SizeRangeConfig, TileConfig};
pub use drag::{
    CancelReason, DragController, DragEffect, DragNoopReason, DragState, DragTransition,
};
pub use engine::{BoundsPatch, EdgeIndex, EdgeTarget, IntersectionPlan, Propagator, Side};
pub use error::{SnapshotError, TileConfigError, TileError};
pub use host::{CallbackReason, HostCall, NullHost, RecordingHost, TileHost};
pub use invariant::{InvariantCode, InvariantIssue, InvariantReport, InvariantSeverity};
pub use locator::{CursorClass, DragSession};
pub use registry::{Region, RegionId};
pub use snapshot::{RegionRecord, TILE_SNAPSHOT_SCHEMA_VERSION, TileSnapshot};
pub use tile::Tile;
