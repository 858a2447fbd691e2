//! Container configuration.
//!
//! Configuration is plain data so hosts can ship it alongside their own
//! settings files:
//!
//! ```
//! use tessera_tile::TileConfig;
//!
//! let config = TileConfig::from_json(
//!     r#"{ "grab_tolerance": 6, "size_range": { "default_min_width": 40, "default_min_height": 20 } }"#,
//! )
//! .expect("valid config");
//! assert_eq!(config.grab_tolerance, 6);
//! assert!(config.size_range.is_some());
//! ```

use serde::{Deserialize, Serialize};
use tessera_core::event::PointerButton;
use tessera_core::geometry::Size;

use crate::error::TileConfigError;

/// Default distance (in units) within which a pointer grabs an edge. Also the
/// default per-region minimum size in size-range mode.
pub const DEFAULT_GRAB_TOLERANCE: i32 = 4;

/// Default minimum sizes applied to every region in size-range mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SizeRangeConfig {
    pub default_min_width: i32,
    pub default_min_height: i32,
}

impl SizeRangeConfig {
    #[must_use]
    pub const fn new(default_min_width: i32, default_min_height: i32) -> Self {
        Self {
            default_min_width,
            default_min_height,
        }
    }

    /// The default minimum as a size.
    #[must_use]
    pub const fn default_min(&self) -> Size {
        Size::new(self.default_min_width, self.default_min_height)
    }
}

impl Default for SizeRangeConfig {
    fn default() -> Self {
        Self::new(DEFAULT_GRAB_TOLERANCE, DEFAULT_GRAB_TOLERANCE)
    }
}

/// Behavior knobs for a tile container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileConfig {
    /// Grab tolerance around draggable edges.
    pub grab_tolerance: i32,
    /// `Some` enables size-range mode with these default minimums.
    pub size_range: Option<SizeRangeConfig>,
    /// Restore the pre-drag bounds when a drag is canceled instead of keeping
    /// the live preview.
    pub restore_on_cancel: bool,
    /// Button that starts an edge drag.
    pub drag_button: PointerButton,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            grab_tolerance: DEFAULT_GRAB_TOLERANCE,
            size_range: None,
            restore_on_cancel: false,
            drag_button: PointerButton::Left,
        }
    }
}

impl TileConfig {
    /// Builder: enable size-range mode with the given default minimums.
    #[must_use]
    pub const fn with_size_range(
        mut self,
        default_min_width: i32,
        default_min_height: i32,
    ) -> Self {
        self.size_range = Some(SizeRangeConfig::new(default_min_width, default_min_height));
        self
    }

    /// Builder: set the grab tolerance.
    #[must_use]
    pub const fn with_grab_tolerance(mut self, grab_tolerance: i32) -> Self {
        self.grab_tolerance = grab_tolerance;
        self
    }

    /// Builder: restore pre-drag bounds on cancel.
    #[must_use]
    pub const fn with_restore_on_cancel(mut self, restore: bool) -> Self {
        self.restore_on_cancel = restore;
        self
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), TileConfigError> {
        if self.grab_tolerance < 0 {
            return Err(TileConfigError::NegativeGrabTolerance {
                value: self.grab_tolerance,
            });
        }
        if let Some(range) = self.size_range {
            if range.default_min_width < 0 {
                return Err(TileConfigError::NegativeMinimum {
                    axis: "width",
                    value: range.default_min_width,
                });
            }
            if range.default_min_height < 0 {
                return Err(TileConfigError::NegativeMinimum {
                    axis: "height",
                    value: range.default_min_height,
                });
            }
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json(json: &str) -> Result<Self, TileConfigError> {
        let config: Self = serde_json::from_str(json).map_err(|err| TileConfigError::Parse {
            reason: err.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, TileConfigError> {
        serde_json::to_string_pretty(self).map_err(|err| TileConfigError::Parse {
            reason: err.to_string(),
        })
    }
}
