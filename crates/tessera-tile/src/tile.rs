//! The tile container.
//!
//! `Tile<W>` owns the region registry, the container bounds, the optional
//! anchor, and the drag controller. Geometry changes are planned by the
//! [`Propagator`] against a snapshot of the bounds and applied here in one
//! step, so a failed plan never leaves half-moved edges behind.

use tessera_core::geometry::{Point, Rect, Size, bounding_box};

use crate::config::TileConfig;
use crate::drag::DragController;
use crate::engine::{BoundsPatch, EdgeTarget, IntersectionPlan, Propagator};
use crate::error::{SnapshotError, TileError};
use crate::host::TileHost;
use crate::invariant::{self, CheckedRegion, InvariantReport};
use crate::locator::{self, DragSession};
use crate::registry::{Region, RegionId, RegionRegistry};
use crate::snapshot::{RegionRecord, TILE_SNAPSHOT_SCHEMA_VERSION, TileSnapshot};

/// A container whose regions exactly partition its bounds.
///
/// # Example
///
/// ```
/// use tessera_core::geometry::{Point, Rect};
/// use tessera_tile::{EdgeTarget, Tile, TileConfig};
///
/// let config = TileConfig::default().with_size_range(50, 50);
/// let mut tile = Tile::new(Rect::new(0, 0, 300, 300), config).expect("valid config");
/// let left = tile.add_region("left", Rect::new(0, 0, 150, 300));
/// let right = tile.add_region("right", Rect::new(150, 0, 150, 300));
///
/// let achieved = tile
///     .move_intersection(EdgeTarget::vertical(150), Point::new(280, 0))
///     .expect("commit");
/// assert_eq!(achieved, EdgeTarget::vertical(250));
/// assert_eq!(tile.region_bounds(left), Some(Rect::new(0, 0, 250, 300)));
/// assert_eq!(tile.region_bounds(right), Some(Rect::new(250, 0, 50, 300)));
/// ```
#[derive(Debug, Clone)]
pub struct Tile<W> {
    pub(crate) config: TileConfig,
    pub(crate) bounds: Rect,
    pub(crate) registry: RegionRegistry<W>,
    pub(crate) anchor: Option<RegionId>,
    pub(crate) drag: DragController,
}

impl<W> Tile<W> {
    /// Create an empty container. Empty `bounds` are replaced by the union
    /// of the regions as they are added.
    pub fn new(bounds: Rect, config: TileConfig) -> Result<Self, TileError> {
        config.validate()?;
        Ok(Self {
            config,
            bounds,
            registry: RegionRegistry::new(),
            anchor: None,
            drag: DragController::default(),
        })
    }

    #[must_use]
    pub const fn config(&self) -> &TileConfig {
        &self.config
    }

    /// Container bounds.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.is_empty()
    }

    /// Regions in insertion order.
    pub fn regions(&self) -> impl Iterator<Item = &Region<W>> + '_ {
        self.registry.iter()
    }

    #[must_use]
    pub fn region(&self, id: RegionId) -> Option<&Region<W>> {
        self.registry.get(id)
    }

    #[must_use]
    pub fn region_bounds(&self, id: RegionId) -> Option<Rect> {
        self.registry.get(id).map(Region::bounds)
    }

    pub fn widget_mut(&mut self, id: RegionId) -> Option<&mut W> {
        self.registry.get_mut(id).map(Region::widget_mut)
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<RegionId> {
        self.anchor
    }

    #[must_use]
    pub const fn is_size_range_enabled(&self) -> bool {
        self.config.size_range.is_some()
    }

    /// Attach a region. While the container bounds are empty they track the
    /// union of all region bounds.
    pub fn add_region(&mut self, widget: W, bounds: Rect) -> RegionId {
        let id = self.registry.insert(widget, bounds);
        if self.bounds.is_empty() {
            let rects = self.registry.bounds();
            self.bounds = bounding_box(&rects).unwrap_or(bounds);
        }
        id
    }

    /// Detach a region, returning its widget. An active drag is abandoned
    /// because its edge lines may no longer exist.
    pub fn remove_region(&mut self, id: RegionId) -> Option<W> {
        let region = self.registry.remove(id)?;
        if self.anchor == Some(id) {
            self.anchor = None;
        }
        self.drag.abandon();
        Some(region.into_widget())
    }

    /// Designate the region that absorbs container resizes. Returns false for
    /// an unknown id.
    pub fn set_anchor(&mut self, id: RegionId) -> bool {
        if self.registry.get(id).is_none() {
            return false;
        }
        self.anchor = Some(id);
        true
    }

    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    /// Switch to size-range mode with the given default minimums.
    pub fn enable_size_range(
        &mut self,
        default_min_width: i32,
        default_min_height: i32,
    ) -> Result<(), TileError> {
        let config = self
            .config
            .with_size_range(default_min_width, default_min_height);
        config.validate()?;
        self.config = config;
        Ok(())
    }

    pub fn disable_size_range(&mut self) {
        self.config.size_range = None;
    }

    /// Explicit minimum for one region; overrides the default minimum in
    /// size-range mode.
    pub fn set_min_size(&mut self, id: RegionId, min: Size) -> bool {
        let min = Size::new(min.width.max(0), min.height.max(0));
        self.registry.set_min_size(id, Some(min))
    }

    /// Advisory maximum for one region. Not enforced by the engine; reported
    /// by [`Tile::invariant_report`].
    pub fn set_max_size(&mut self, id: RegionId, max: Size) -> bool {
        self.registry.set_max_size(id, Some(max))
    }

    /// Ask the host for every widget's preferred minimum and store the ones
    /// it reports.
    pub fn sync_min_sizes<H: TileHost<W>>(&mut self, host: &H) {
        let hints: Vec<(RegionId, Size)> = self
            .registry
            .iter()
            .filter_map(|region| host.min_size(region.widget()).map(|min| (region.id(), min)))
            .collect();
        for (id, min) in hints {
            self.set_min_size(id, min);
        }
    }

    /// Ids of regions whose bounds changed since the last call, clearing the
    /// flags.
    pub fn take_dirty(&mut self) -> Vec<RegionId> {
        self.registry.take_dirty()
    }

    /// Minimums the engine honors, indexed like the registry.
    pub(crate) fn effective_mins(&self) -> Vec<Size> {
        match self.config.size_range {
            Some(range) => self
                .registry
                .iter()
                .map(|region| region.min_size().unwrap_or_else(|| range.default_min()))
                .collect(),
            None => vec![Size::default(); self.registry.len()],
        }
    }

    /// Edges under `pointer`. The anchor's edges are not draggable in classic
    /// mode.
    #[must_use]
    pub fn locate(&self, pointer: Point) -> DragSession {
        let skip = if self.is_size_range_enabled() {
            None
        } else {
            self.anchor.and_then(|id| self.registry.index_of(id))
        };
        locator::locate(
            &self.registry.bounds(),
            skip,
            self.bounds,
            pointer,
            self.config.grab_tolerance,
        )
    }

    /// Plan a move of the `from` edge lines toward `to` without touching any
    /// live bounds.
    pub fn plan_intersection(
        &self,
        from: EdgeTarget,
        to: Point,
    ) -> Result<IntersectionPlan, TileError> {
        self.plan_within(from, to, self.bounds)
    }

    pub(crate) fn plan_within(
        &self,
        from: EdgeTarget,
        to: Point,
        limits: Rect,
    ) -> Result<IntersectionPlan, TileError> {
        let rects = self.registry.bounds();
        let mins = self.effective_mins();
        Propagator::new(&rects, &mins, limits).plan(from, to)
    }

    /// Move the `from` edge lines as far toward `to` as the minimums allow
    /// and apply the result. Used for live drag previews.
    pub fn drag_intersection(
        &mut self,
        from: EdgeTarget,
        to: Point,
    ) -> Result<EdgeTarget, TileError> {
        let _span = tessera_core::debug_span!(
            "tile.drag_intersection",
            from_x = ?from.x,
            from_y = ?from.y,
            to_x = to.x,
            to_y = to.y
        )
        .entered();
        self.commit_within(from, to, self.bounds)
    }

    /// Like [`Tile::drag_intersection`], followed by a re-validation pass in
    /// size-range mode.
    pub fn move_intersection(
        &mut self,
        from: EdgeTarget,
        to: Point,
    ) -> Result<EdgeTarget, TileError> {
        let _span = tessera_core::debug_span!(
            "tile.move_intersection",
            from_x = ?from.x,
            from_y = ?from.y,
            to_x = to.x,
            to_y = to.y
        )
        .entered();
        let achieved = self.commit_within(from, to, self.bounds)?;
        if self.is_size_range_enabled() {
            self.revalidate();
        }
        Ok(achieved)
    }

    /// Plan against `limits` and apply.
    pub(crate) fn commit_within(
        &mut self,
        from: EdgeTarget,
        to: Point,
        limits: Rect,
    ) -> Result<EdgeTarget, TileError> {
        let plan = self.plan_within(from, to, limits)?;
        Ok(self.write_plan(plan))
    }

    /// Like [`Tile::commit_within`] but lines on `limits` move too. Only
    /// container resizing may move the outer edges.
    pub(crate) fn commit_lines_within(
        &mut self,
        from: EdgeTarget,
        to: Point,
        limits: Rect,
    ) -> Result<EdgeTarget, TileError> {
        let rects = self.registry.bounds();
        let mins = self.effective_mins();
        let plan = Propagator::new(&rects, &mins, limits).plan_lines(from, to)?;
        Ok(self.write_plan(plan))
    }

    fn write_plan(&mut self, plan: IntersectionPlan) -> EdgeTarget {
        for (idx, rect) in plan.patch.into_rects().into_iter().enumerate() {
            self.registry.set_bounds_at(idx, rect);
        }
        plan.achieved
    }

    /// Check invariants after a commit and log what is off.
    pub(crate) fn revalidate(&self) -> InvariantReport {
        let report = self.invariant_report();
        if !report.is_clean() {
            tessera_core::warn!(
                issues = report.issues.len(),
                errors = report.has_errors(),
                container_too_small = report.container_too_small,
                "tile invariants violated after commit"
            );
            for issue in &report.issues {
                tessera_core::debug!(code = ?issue.code, region = ?issue.region, "{}", issue.message);
            }
        }
        report
    }

    /// Write planned bounds into the live regions. The patch must cover the
    /// live region set and tile the container without overlap; otherwise
    /// nothing is written. Returns the ids that changed.
    pub fn apply_patch(&mut self, patch: BoundsPatch) -> Result<Vec<RegionId>, TileError> {
        if patch.rects().len() != self.registry.len() {
            return Err(TileError::PatchLength {
                expected: self.registry.len(),
                actual: patch.rects().len(),
            });
        }
        let checked: Vec<CheckedRegion> = self
            .registry
            .iter()
            .zip(patch.rects())
            .map(|(region, rect)| CheckedRegion {
                id: region.id(),
                bounds: *rect,
                min: None,
                max: None,
            })
            .collect();
        let report = invariant::check(self.bounds, &checked);
        if report.has_errors() {
            return Err(TileError::RejectedPatch {
                issues: report.issues.len(),
            });
        }

        let mut changed = Vec::new();
        for (idx, rect) in patch.into_rects().into_iter().enumerate() {
            if self.registry.set_bounds_at(idx, rect)
                && let Some(region) = self.registry.at(idx)
            {
                changed.push(region.id());
            }
        }
        Ok(changed)
    }

    /// Structured check of cover, overlap, and size limits.
    #[must_use]
    pub fn invariant_report(&self) -> InvariantReport {
        let mins = self.is_size_range_enabled().then(|| self.effective_mins());
        let checked: Vec<CheckedRegion> = self
            .registry
            .iter()
            .enumerate()
            .map(|(idx, region)| CheckedRegion {
                id: region.id(),
                bounds: region.bounds(),
                min: mins.as_ref().and_then(|mins| mins.get(idx).copied()),
                max: region.max_size(),
            })
            .collect();
        invariant::check(self.bounds, &checked)
    }

    /// Capture the container geometry.
    #[must_use]
    pub fn snapshot(&self) -> TileSnapshot {
        TileSnapshot {
            schema_version: TILE_SNAPSHOT_SCHEMA_VERSION,
            container: self.bounds,
            anchor: self.anchor,
            regions: self
                .registry
                .iter()
                .map(|region| RegionRecord {
                    id: region.id(),
                    bounds: region.bounds(),
                    min_size: region.min_size(),
                    max_size: region.max_size(),
                })
                .collect(),
        }
    }

    /// Restore geometry captured by [`Tile::snapshot`]. The snapshot must
    /// name exactly the live regions and must tile its container. On error
    /// nothing changes. Returns the ids whose bounds changed.
    pub fn restore(&mut self, snapshot: &TileSnapshot) -> Result<Vec<RegionId>, TileError> {
        snapshot.check_schema()?;
        for record in &snapshot.regions {
            if self.registry.get(record.id).is_none() {
                return Err(SnapshotError::UnknownRegion { region: record.id }.into());
            }
        }
        if let Some(missing) = self.registry.ids().find(|id| snapshot.region(*id).is_none()) {
            return Err(SnapshotError::MissingRegion { region: missing }.into());
        }
        if let Some(anchor) = snapshot.anchor
            && self.registry.get(anchor).is_none()
        {
            return Err(SnapshotError::UnknownRegion { region: anchor }.into());
        }

        let checked: Vec<CheckedRegion> = snapshot
            .regions
            .iter()
            .map(|record| CheckedRegion {
                id: record.id,
                bounds: record.bounds,
                min: None,
                max: None,
            })
            .collect();
        let report = invariant::check(snapshot.container, &checked);
        if report.has_errors() {
            return Err(SnapshotError::CoverViolation {
                issues: report.issues.len(),
            }
            .into());
        }

        let mut changed = Vec::new();
        for idx in 0..self.registry.len() {
            let Some(id) = self.registry.at(idx).map(Region::id) else {
                continue;
            };
            let Some(record) = snapshot.region(id) else {
                continue;
            };
            if self.registry.set_bounds_at(idx, record.bounds) {
                changed.push(id);
            }
            self.registry.set_min_size(id, record.min_size);
            self.registry.set_max_size(id, record.max_size);
        }
        self.bounds = snapshot.container;
        self.anchor = snapshot.anchor;
        tessera_core::debug!(
            state_hash = snapshot.state_hash(),
            changed = changed.len(),
            "tile snapshot restored"
        );
        Ok(changed)
    }

    /// Ids whose bounds differ from `before`, which must be indexed like the
    /// registry.
    pub(crate) fn changed_since(&self, before: &[Rect]) -> Vec<RegionId> {
        self.registry
            .iter()
            .zip(before)
            .filter(|(region, rect)| region.bounds() != **rect)
            .map(|(region, _)| region.id())
            .collect()
    }

    /// Push the bounds of `ids` to the host.
    pub(crate) fn push_bounds<H: TileHost<W>>(&self, ids: &[RegionId], host: &mut H) {
        for id in ids {
            if let Some(region) = self.registry.get(*id) {
                host.set_bounds(*id, region.widget(), region.bounds());
            }
        }
    }
}
