//! Serializable capture of a container's geometry.
//!
//! A snapshot records the container bounds, the anchor, and every region's
//! bounds and size metadata in insertion order. Widgets are not captured;
//! restoring a snapshot requires the same region set to be present.

use serde::{Deserialize, Serialize};
use tessera_core::geometry::{Rect, Size};

use crate::error::{SnapshotError, TileConfigError};
use crate::registry::RegionId;

/// Current snapshot schema version.
pub const TILE_SNAPSHOT_SCHEMA_VERSION: u16 = 1;

fn default_schema_version() -> u16 {
    TILE_SNAPSHOT_SCHEMA_VERSION
}

/// Geometry of one region inside a snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub id: RegionId,
    pub bounds: Rect,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_size: Option<Size>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_size: Option<Size>,
}

/// Full geometry capture of a tile container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u16,
    pub container: Rect,
    #[serde(default)]
    pub anchor: Option<RegionId>,
    pub regions: Vec<RegionRecord>,
}

impl TileSnapshot {
    /// Reject snapshots written by a newer schema.
    pub fn check_schema(&self) -> Result<(), SnapshotError> {
        if self.schema_version != TILE_SNAPSHOT_SCHEMA_VERSION {
            return Err(SnapshotError::UnsupportedSchemaVersion {
                found: self.schema_version,
                supported: TILE_SNAPSHOT_SCHEMA_VERSION,
            });
        }
        Ok(())
    }

    /// Record for `id`, if present.
    #[must_use]
    pub fn region(&self, id: RegionId) -> Option<&RegionRecord> {
        self.regions.iter().find(|record| record.id == id)
    }

    /// Deterministic FNV-1a hash over the captured geometry, for operation
    /// logs and replay diagnostics.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        const OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;
        const PRIME: u64 = 0x0000_0001_0000_01b3;

        fn mix(hash: &mut u64, byte: u8) {
            *hash ^= u64::from(byte);
            *hash = hash.wrapping_mul(PRIME);
        }

        fn mix_bytes(hash: &mut u64, bytes: &[u8]) {
            for byte in bytes {
                mix(hash, *byte);
            }
        }

        fn mix_i32(hash: &mut u64, value: i32) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        fn mix_u64(hash: &mut u64, value: u64) {
            mix_bytes(hash, &value.to_le_bytes());
        }

        fn mix_rect(hash: &mut u64, rect: Rect) {
            mix_i32(hash, rect.x);
            mix_i32(hash, rect.y);
            mix_i32(hash, rect.width);
            mix_i32(hash, rect.height);
        }

        fn mix_opt_size(hash: &mut u64, size: Option<Size>) {
            match size {
                Some(size) => {
                    mix(hash, 1);
                    mix_i32(hash, size.width);
                    mix_i32(hash, size.height);
                }
                None => mix(hash, 0),
            }
        }

        let mut hash = OFFSET_BASIS;
        mix_bytes(&mut hash, &self.schema_version.to_le_bytes());
        mix_rect(&mut hash, self.container);
        match self.anchor {
            Some(anchor) => {
                mix(&mut hash, 1);
                mix_u64(&mut hash, anchor.get());
            }
            None => mix(&mut hash, 0),
        }
        mix_u64(&mut hash, self.regions.len() as u64);
        for record in &self.regions {
            mix_u64(&mut hash, record.id.get());
            mix_rect(&mut hash, record.bounds);
            mix_opt_size(&mut hash, record.min_size);
            mix_opt_size(&mut hash, record.max_size);
        }
        hash
    }

    pub fn to_json(&self) -> Result<String, TileConfigError> {
        serde_json::to_string(self).map_err(|err| TileConfigError::Parse {
            reason: err.to_string(),
        })
    }

    pub fn from_json(json: &str) -> Result<Self, TileConfigError> {
        serde_json::from_str(json).map_err(|err| TileConfigError::Parse {
            reason: err.to_string(),
        })
    }
}
