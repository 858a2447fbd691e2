//! Region registry: an ordered arena of tiles.
//!
//! Regions live in a contiguous `Vec` in insertion order; that order is the
//! tie-breaker everywhere the engine has to pick between equally good
//! candidates. Ids are handed out monotonically and never reused, so a stale
//! id held by a host simply stops resolving after the region is removed.

use serde::{Deserialize, Serialize};
use tessera_core::geometry::{Rect, Size};

/// Stable identifier for a region within one container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RegionId(u64);

impl RegionId {
    /// Wrap a raw id. Zero is reserved and rejected.
    #[must_use]
    pub const fn new(raw: u64) -> Option<Self> {
        if raw == 0 { None } else { Some(Self(raw)) }
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// One tile: the host widget handle plus its geometry and size metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Region<W> {
    id: RegionId,
    widget: W,
    bounds: Rect,
    min_size: Option<Size>,
    max_size: Option<Size>,
    dirty: bool,
}

impl<W> Region<W> {
    #[must_use]
    pub const fn id(&self) -> RegionId {
        self.id
    }

    #[must_use]
    pub const fn widget(&self) -> &W {
        &self.widget
    }

    pub fn widget_mut(&mut self) -> &mut W {
        &mut self.widget
    }

    #[must_use]
    pub fn into_widget(self) -> W {
        self.widget
    }

    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Explicit minimum, if one was set for this region.
    #[must_use]
    pub const fn min_size(&self) -> Option<Size> {
        self.min_size
    }

    /// Explicit maximum, if one was set for this region.
    #[must_use]
    pub const fn max_size(&self) -> Option<Size> {
        self.max_size
    }

    /// Whether the region changed since the host last drained dirty flags.
    #[must_use]
    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }
}

/// Ordered store of regions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionRegistry<W> {
    regions: Vec<Region<W>>,
    next_id: u64,
}

impl<W> Default for RegionRegistry<W> {
    fn default() -> Self {
        Self {
            regions: Vec::new(),
            next_id: 1,
        }
    }
}

impl<W> RegionRegistry<W> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    /// Append a region. New regions start dirty so the host places them.
    pub fn insert(&mut self, widget: W, bounds: Rect) -> RegionId {
        let id = RegionId(self.next_id);
        self.next_id = self.next_id.saturating_add(1);
        self.regions.push(Region {
            id,
            widget,
            bounds,
            min_size: None,
            max_size: None,
            dirty: true,
        });
        id
    }

    /// Remove a region, preserving the order of the rest.
    pub fn remove(&mut self, id: RegionId) -> Option<Region<W>> {
        let index = self.index_of(id)?;
        Some(self.regions.remove(index))
    }

    /// Position of `id` in insertion order.
    #[must_use]
    pub fn index_of(&self, id: RegionId) -> Option<usize> {
        self.regions.iter().position(|region| region.id == id)
    }

    #[must_use]
    pub fn get(&self, id: RegionId) -> Option<&Region<W>> {
        self.regions.iter().find(|region| region.id == id)
    }

    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut Region<W>> {
        self.regions.iter_mut().find(|region| region.id == id)
    }

    /// Region at an insertion-order index.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<&Region<W>> {
        self.regions.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Region<W>> + '_ {
        self.regions.iter()
    }

    /// Ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = RegionId> + '_ {
        self.regions.iter().map(|region| region.id)
    }

    /// Current bounds of every region, in insertion order.
    #[must_use]
    pub fn bounds(&self) -> Vec<Rect> {
        self.regions.iter().map(|region| region.bounds).collect()
    }

    /// Set bounds by index, flagging the region dirty when they change.
    /// Returns whether anything changed.
    pub fn set_bounds_at(&mut self, index: usize, bounds: Rect) -> bool {
        let Some(region) = self.regions.get_mut(index) else {
            return false;
        };
        if region.bounds == bounds {
            return false;
        }
        region.bounds = bounds;
        region.dirty = true;
        true
    }

    pub fn set_min_size(&mut self, id: RegionId, min: Option<Size>) -> bool {
        match self.get_mut(id) {
            Some(region) => {
                region.min_size = min;
                true
            }
            None => false,
        }
    }

    pub fn set_max_size(&mut self, id: RegionId, max: Option<Size>) -> bool {
        match self.get_mut(id) {
            Some(region) => {
                region.max_size = max;
                true
            }
            None => false,
        }
    }

    /// Clear dirty flags, returning the ids that were dirty in insertion
    /// order.
    pub fn take_dirty(&mut self) -> Vec<RegionId> {
        self.regions
            .iter_mut()
            .filter(|region| region.dirty)
            .map(|region| {
                region.dirty = false;
                region.id
            })
            .collect()
    }
}
