//! Error types for fallible tile operations.
//!
//! Malformed interaction (unknown region ids, drags with no edge under the
//! pointer, resizing an empty container) is never an error; those calls are
//! no-ops. Errors are reserved for configuration, snapshot restore, and
//! scratch-buffer allocation during a commit.

use std::fmt;

use crate::registry::RegionId;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileConfigError {
    NegativeGrabTolerance { value: i32 },
    NegativeMinimum { axis: &'static str, value: i32 },
    Parse { reason: String },
}

impl fmt::Display for TileConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeGrabTolerance { value } => {
                write!(f, "grab tolerance must be non-negative, got {value}")
            }
            Self::NegativeMinimum { axis, value } => {
                write!(f, "minimum {axis} must be non-negative, got {value}")
            }
            Self::Parse { reason } => write!(f, "invalid tile configuration: {reason}"),
        }
    }
}

impl std::error::Error for TileConfigError {}

/// Reasons a snapshot cannot be restored into a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnapshotError {
    UnsupportedSchemaVersion { found: u16, supported: u16 },
    UnknownRegion { region: RegionId },
    MissingRegion { region: RegionId },
    /// The restored bounds would break the exact-cover invariant.
    CoverViolation { issues: usize },
}

impl fmt::Display for SnapshotError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedSchemaVersion { found, supported } => write!(
                f,
                "unsupported snapshot schema version {found} (supported: {supported})"
            ),
            Self::UnknownRegion { region } => {
                write!(f, "snapshot references unknown region {}", region.get())
            }
            Self::MissingRegion { region } => {
                write!(f, "snapshot is missing region {}", region.get())
            }
            Self::CoverViolation { issues } => write!(
                f,
                "snapshot bounds do not tile the container ({issues} invariant issue(s))"
            ),
        }
    }
}

impl std::error::Error for SnapshotError {}

/// Top-level error for tile operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TileError {
    /// The commit scratch buffer could not be allocated. Live bounds are
    /// untouched.
    ScratchAllocation { regions: usize },
    Config(TileConfigError),
    Snapshot(SnapshotError),
    /// A patch was built for a different number of regions.
    PatchLength { expected: usize, actual: usize },
    /// A patch would break the cover or overlap invariants.
    RejectedPatch { issues: usize },
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ScratchAllocation { regions } => write!(
                f,
                "failed to allocate commit buffer for {regions} region(s)"
            ),
            Self::Config(err) => write!(f, "{err}"),
            Self::Snapshot(err) => write!(f, "{err}"),
            Self::PatchLength { expected, actual } => write!(
                f,
                "patch has {actual} region(s), container has {expected}"
            ),
            Self::RejectedPatch { issues } => write!(
                f,
                "patch does not tile the container ({issues} invariant issue(s))"
            ),
        }
    }
}

impl std::error::Error for TileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ScratchAllocation { .. }
            | Self::PatchLength { .. }
            | Self::RejectedPatch { .. } => None,
            Self::Config(err) => Some(err),
            Self::Snapshot(err) => Some(err),
        }
    }
}

impl From<TileConfigError> for TileError {
    fn from(err: TileConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<SnapshotError> for TileError {
    fn from(err: SnapshotError) -> Self {
        Self::Snapshot(err)
    }
}
