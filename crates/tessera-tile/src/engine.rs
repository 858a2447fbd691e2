//! Constraint propagation engine.
//!
//! The engine moves *edge lines*: every region whose edge sits on the dragged
//! coordinate moves together, so the exact-cover property is preserved by
//! construction. Moving a line shrinks the regions on one side and grows the
//! regions on the other. Shrinking is limited by each region's minimum
//! extent; when a region would go below it, the region's opposite edge line
//! is pushed further in the same direction, recursively, until the container
//! boundary stops the cascade.
//!
//! Evaluation is split in two passes:
//!
//! 1. **Probe**: no buffer, computes the feasible target coordinate.
//! 2. **Commit**: writes the moves for the feasible target into a
//!    [`BoundsPatch`], which the caller applies atomically.
//!
//! ```text
//!  shrink_left(150 -> 280)        A | B          mins 50
//!    B.left can reach 300-50=250  0  150  300
//!    push B.right? already at the container edge -> feasible = 250
//! ```
//!
//! The engine is a pure function of the bounds slice, the per-region
//! minimums, and the container bounds; it holds no state across calls.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use tessera_core::geometry::{Axis, Point, Rect, Size};

use crate::error::TileError;

/// Which edge of a region an operation moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Left or top.
    Near,
    /// Right or bottom.
    Far,
}

impl Side {
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Near => Self::Far,
            Self::Far => Self::Near,
        }
    }

    /// Direction a *shrinking* edge on this side travels: near edges move
    /// toward increasing coordinates, far edges toward decreasing ones.
    const fn shrink_sign(self) -> i32 {
        match self {
            Self::Near => 1,
            Self::Far => -1,
        }
    }
}

/// Edge coordinates being dragged. `None` means the axis is not part of the
/// drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct EdgeTarget {
    pub x: Option<i32>,
    pub y: Option<i32>,
}

impl EdgeTarget {
    #[must_use]
    pub const fn new(x: Option<i32>, y: Option<i32>) -> Self {
        Self { x, y }
    }

    /// A vertical edge line at `x`.
    #[must_use]
    pub const fn vertical(x: i32) -> Self {
        Self::new(Some(x), None)
    }

    /// A horizontal edge line at `y`.
    #[must_use]
    pub const fn horizontal(y: i32) -> Self {
        Self::new(None, Some(y))
    }

    /// The intersection of a vertical and a horizontal edge line.
    #[must_use]
    pub const fn corner(x: i32, y: i32) -> Self {
        Self::new(Some(x), Some(y))
    }

    #[must_use]
    pub const fn along(&self, axis: Axis) -> Option<i32> {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.x.is_none() && self.y.is_none()
    }

    fn set(&mut self, axis: Axis, value: Option<i32>) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

/// Edge coordinate → region indices, per axis and side.
///
/// Built once per operation from the bounds snapshot; index lists keep
/// insertion order.
#[derive(Debug, Clone, Default)]
pub struct EdgeIndex {
    near: [FxHashMap<i32, Vec<usize>>; 2],
    far: [FxHashMap<i32, Vec<usize>>; 2],
}

impl EdgeIndex {
    #[must_use]
    pub fn build(rects: &[Rect]) -> Self {
        let mut index = Self::default();
        for (idx, rect) in rects.iter().enumerate() {
            for axis in Axis::ALL {
                let slot = axis_slot(axis);
                index.near[slot]
                    .entry(rect.near(axis))
                    .or_default()
                    .push(idx);
                index.far[slot].entry(rect.far(axis)).or_default().push(idx);
            }
        }
        index
    }

    /// Regions whose `side` edge lies at `coord` on `axis`.
    #[must_use]
    pub fn at(&self, axis: Axis, side: Side, coord: i32) -> &[usize] {
        let map = match side {
            Side::Near => &self.near[axis_slot(axis)],
            Side::Far => &self.far[axis_slot(axis)],
        };
        map.get(&coord).map_or(&[], Vec::as_slice)
    }
}

const fn axis_slot(axis: Axis) -> usize {
    match axis {
        Axis::X => 0,
        Axis::Y => 1,
    }
}

/// Scratch copy of all region bounds that commit passes write into.
///
/// Within one pass every edge on an axis moves in the same direction, so a
/// write keeps whichever displacement is furthest along that direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoundsPatch {
    rects: Vec<Rect>,
}

impl BoundsPatch {
    /// Copy `rects` into a freshly allocated buffer. Allocation failure is
    /// reported instead of aborting.
    pub fn try_from_rects(rects: &[Rect]) -> Result<Self, TileError> {
        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(rects.len())
            .map_err(|_| TileError::ScratchAllocation {
                regions: rects.len(),
            })?;
        buffer.extend_from_slice(rects);
        Ok(Self { rects: buffer })
    }

    #[must_use]
    pub fn rects(&self) -> &[Rect] {
        &self.rects
    }

    #[must_use]
    pub fn into_rects(self) -> Vec<Rect> {
        self.rects
    }

    /// Indices whose bounds differ from `original`.
    pub fn changed<'a>(&'a self, original: &'a [Rect]) -> impl Iterator<Item = usize> + 'a {
        self.rects
            .iter()
            .zip(original)
            .enumerate()
            .filter(|(_, (patched, before))| patched != before)
            .map(|(idx, _)| idx)
    }

    fn move_edge(&mut self, idx: usize, axis: Axis, side: Side, value: i32, direction: i32) {
        let Some(rect) = self.rects.get_mut(idx) else {
            return;
        };
        let (near, far) = (rect.near(axis), rect.far(axis));
        let further = |current: i32| {
            if direction > 0 {
                current.max(value)
            } else {
                current.min(value)
            }
        };
        *rect = match side {
            Side::Near => rect.with_span(axis, further(near), far),
            Side::Far => rect.with_span(axis, near, further(far)),
        };
    }

    fn move_marker(&mut self, idx: usize, axis: Axis, value: i32, direction: i32) {
        let Some(rect) = self.rects.get_mut(idx) else {
            return;
        };
        let position = if direction > 0 {
            rect.near(axis).max(value)
        } else {
            rect.near(axis).min(value)
        };
        *rect = rect.with_span(axis, position, position);
    }
}

/// Result of planning an intersection move: the achieved edge coordinates
/// and the bounds to apply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntersectionPlan {
    pub from: EdgeTarget,
    pub achieved: EdgeTarget,
    pub patch: BoundsPatch,
}

impl IntersectionPlan {
    /// Whether any edge actually moves.
    #[must_use]
    pub fn moves(&self) -> bool {
        self.from != self.achieved
    }
}

type ShrinkKey = (Axis, Side, i32, i32);

/// One propagation context over a bounds snapshot.
#[derive(Debug)]
pub struct Propagator<'a> {
    rects: &'a [Rect],
    mins: &'a [Size],
    bounds: Rect,
    index: EdgeIndex,
    probes: FxHashMap<ShrinkKey, i32>,
    commits: FxHashSet<ShrinkKey>,
}

impl<'a> Propagator<'a> {
    /// `mins` is indexed like `rects`; missing entries count as zero.
    #[must_use]
    pub fn new(rects: &'a [Rect], mins: &'a [Size], bounds: Rect) -> Self {
        Self {
            rects,
            mins,
            bounds,
            index: EdgeIndex::build(rects),
            probes: FxHashMap::default(),
            commits: FxHashSet::default(),
        }
    }

    /// Container bounds the cascade is confined to.
    #[must_use]
    pub const fn bounds(&self) -> Rect {
        self.bounds
    }

    /// Move left edges at `old_left` to the right, shrinking those regions.
    pub fn shrink_left(
        &mut self,
        old_left: i32,
        new_left: i32,
        buffer: Option<&mut BoundsPatch>,
    ) -> i32 {
        self.shrink(Axis::X, Side::Near, old_left, new_left, buffer)
    }

    /// Move right edges at `old_right` to the left, shrinking those regions.
    pub fn shrink_right(
        &mut self,
        old_right: i32,
        new_right: i32,
        buffer: Option<&mut BoundsPatch>,
    ) -> i32 {
        self.shrink(Axis::X, Side::Far, old_right, new_right, buffer)
    }

    /// Move top edges at `old_top` down, shrinking those regions.
    pub fn shrink_top(
        &mut self,
        old_top: i32,
        new_top: i32,
        buffer: Option<&mut BoundsPatch>,
    ) -> i32 {
        self.shrink(Axis::Y, Side::Near, old_top, new_top, buffer)
    }

    /// Move bottom edges at `old_bottom` up, shrinking those regions.
    pub fn shrink_bottom(
        &mut self,
        old_bottom: i32,
        new_bottom: i32,
        buffer: Option<&mut BoundsPatch>,
    ) -> i32 {
        self.shrink(Axis::Y, Side::Far, old_bottom, new_bottom, buffer)
    }

    pub fn grow_left(&mut self, old_left: i32, new_left: i32, buffer: &mut BoundsPatch) {
        self.grow(Axis::X, Side::Near, old_left, new_left, buffer);
    }

    pub fn grow_right(&mut self, old_right: i32, new_right: i32, buffer: &mut BoundsPatch) {
        self.grow(Axis::X, Side::Far, old_right, new_right, buffer);
    }

    pub fn grow_top(&mut self, old_top: i32, new_top: i32, buffer: &mut BoundsPatch) {
        self.grow(Axis::Y, Side::Near, old_top, new_top, buffer);
    }

    pub fn grow_bottom(&mut self, old_bottom: i32, new_bottom: i32, buffer: &mut BoundsPatch) {
        self.grow(Axis::Y, Side::Far, old_bottom, new_bottom, buffer);
    }

    /// Feasible destination for moving the edge line at `old` toward
    /// `candidate` on `axis`, without writing anything.
    pub fn probe_axis(&mut self, axis: Axis, old: i32, candidate: i32) -> i32 {
        if candidate > old {
            self.shrink(axis, Side::Near, old, candidate, None)
        } else if candidate < old {
            self.shrink(axis, Side::Far, old, candidate, None)
        } else {
            old
        }
    }

    /// Probe, then commit, a move of the given edge lines toward `to`.
    ///
    /// An axis whose line lies on (or outside) the container boundary, or
    /// that no region edge sits on, does not take part: its achieved
    /// coordinate is the old one and nothing is written for it.
    pub fn plan(&mut self, from: EdgeTarget, to: Point) -> Result<IntersectionPlan, TileError> {
        let mut moving = from;
        for axis in Axis::ALL {
            if let Some(old) = from.along(axis)
                && !self.is_interior_line(axis, old)
            {
                moving.set(axis, None);
            }
        }
        let mut plan = self.plan_lines(moving, to)?;
        for axis in Axis::ALL {
            if moving.along(axis).is_none() {
                plan.achieved.set(axis, from.along(axis));
            }
        }
        plan.from = from;
        Ok(plan)
    }

    fn is_interior_line(&self, axis: Axis, coord: i32) -> bool {
        coord > self.bounds.near(axis)
            && coord < self.bounds.far(axis)
            && (!self.index.at(axis, Side::Near, coord).is_empty()
                || !self.index.at(axis, Side::Far, coord).is_empty())
    }

    /// [`Propagator::plan`] without the boundary check. Container resizing
    /// uses this to move the outer edges themselves.
    pub(crate) fn plan_lines(
        &mut self,
        from: EdgeTarget,
        to: Point,
    ) -> Result<IntersectionPlan, TileError> {
        let mut achieved = EdgeTarget::default();
        for axis in Axis::ALL {
            if let Some(old) = from.along(axis) {
                let feasible = self.probe_axis(axis, old, to.along(axis));
                achieved.set(axis, Some(feasible));
            }
        }

        let mut patch = BoundsPatch::try_from_rects(self.rects)?;
        for axis in Axis::ALL {
            let (Some(old), Some(new)) = (from.along(axis), achieved.along(axis)) else {
                continue;
            };
            if new > old {
                self.shrink(axis, Side::Near, old, new, Some(&mut patch));
                self.grow(axis, Side::Far, old, new, &mut patch);
            } else if new < old {
                self.shrink(axis, Side::Far, old, new, Some(&mut patch));
                self.grow(axis, Side::Near, old, new, &mut patch);
            }
        }

        Ok(IntersectionPlan {
            from,
            achieved,
            patch,
        })
    }

    fn min_along(&self, idx: usize, axis: Axis) -> i32 {
        self.mins
            .get(idx)
            .map_or(0, |min| min.along(axis).max(0))
    }

    /// Shrink every region whose `side` edge lies at `old`, moving that edge
    /// toward `candidate`. Returns the feasible destination, which lies
    /// between `old` and `candidate`.
    fn shrink(
        &mut self,
        axis: Axis,
        side: Side,
        old: i32,
        candidate: i32,
        mut buffer: Option<&mut BoundsPatch>,
    ) -> i32 {
        let sign = side.shrink_sign();
        let boundary = match side {
            Side::Near => self.bounds.far(axis),
            Side::Far => self.bounds.near(axis),
        };
        let candidate = if sign > 0 {
            candidate.min(boundary)
        } else {
            candidate.max(boundary)
        };
        if (candidate - old) * sign <= 0 {
            return old;
        }

        let key = (axis, side, old, candidate);
        if buffer.is_none() {
            if let Some(&cached) = self.probes.get(&key) {
                return cached;
            }
        } else if !self.commits.insert(key) {
            // Same move already written; writes are idempotent.
            return candidate;
        }

        let tighter = |a: i32, b: i32| if sign > 0 { a.min(b) } else { a.max(b) };
        let mut feasible = candidate;

        let matched = self.index.at(axis, side, old).to_vec();
        for idx in matched {
            let rect = self.rects[idx];
            if rect.extent(axis) == 0 {
                if let Some(buf) = buffer.as_deref_mut() {
                    buf.move_marker(idx, axis, candidate, sign);
                }
                continue;
            }

            let min = self.min_along(idx, axis);
            let opposite = match side {
                Side::Near => rect.far(axis),
                Side::Far => rect.near(axis),
            };
            let allowed = tighter(candidate, opposite - sign * min);
            if allowed != candidate {
                let shortfall = candidate - allowed;
                let push = opposite.saturating_add(shortfall);
                let pushed = self.shrink(axis, side, opposite, push, None);
                tessera_core::trace!(
                    ?axis,
                    ?side,
                    edge = opposite,
                    requested = push,
                    pushed,
                    "cascade hop"
                );
                if let Some(buf) = buffer.as_deref_mut() {
                    self.shrink(axis, side, opposite, pushed, Some(&mut *buf));
                    self.grow(axis, side.flip(), opposite, pushed, buf);
                }
                feasible = tighter(feasible, pushed - sign * min);
            }

            if let Some(buf) = buffer.as_deref_mut() {
                buf.move_edge(idx, axis, side, candidate, sign);
            }
        }

        // Never report a destination behind the starting edge.
        let feasible = if sign > 0 {
            feasible.max(old)
        } else {
            feasible.min(old)
        };
        if buffer.is_none() {
            self.probes.insert(key, feasible);
        }
        feasible
    }

    /// Extend every region whose `side` edge lies at `old` out to `new`.
    fn grow(&mut self, axis: Axis, side: Side, old: i32, new: i32, buffer: &mut BoundsPatch) {
        if new == old {
            return;
        }
        let direction = if new > old { 1 } else { -1 };
        for &idx in self.index.at(axis, side, old) {
            if self.rects[idx].extent(axis) == 0 {
                buffer.move_marker(idx, axis, new, direction);
            } else {
                buffer.move_edge(idx, axis, side, new, direction);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mins(count: usize, min: i32) -> Vec<Size> {
        vec![Size::new(min, min); count]
    }

    fn plan(
        rects: &[Rect],
        min: i32,
        bounds: Rect,
        from: EdgeTarget,
        to: Point,
    ) -> IntersectionPlan {
        let mins = mins(rects.len(), min);
        Propagator::new(rects, &mins, bounds)
            .plan(from, to)
            .expect("plan should allocate")
    }

    #[test]
    fn edge_index_groups_by_coordinate_in_insertion_order() {
        let rects = [
            Rect::new(0, 0, 150, 100),
            Rect::new(0, 100, 150, 100),
            Rect::new(150, 0, 50, 200),
        ];
        let index = EdgeIndex::build(&rects);
        assert_eq!(index.at(Axis::X, Side::Far, 150), &[0, 1]);
        assert_eq!(index.at(Axis::X, Side::Near, 150), &[2]);
        assert_eq!(index.at(Axis::Y, Side::Near, 100), &[1]);
        assert!(index.at(Axis::X, Side::Near, 75).is_empty());
    }

    #[test]
    fn shrink_left_clamps_at_neighbor_minimum() {
        let rects = [Rect::new(0, 0, 150, 300), Rect::new(150, 0, 150, 300)];
        let mins = mins(2, 50);
        let mut engine = Propagator::new(&rects, &mins, Rect::new(0, 0, 300, 300));
        assert_eq!(engine.shrink_left(150, 280, None), 250);
        assert_eq!(engine.shrink_left(150, 200, None), 200);
    }

    #[test]
    fn shrink_right_mirrors_shrink_left() {
        let rects = [Rect::new(0, 0, 150, 300), Rect::new(150, 0, 150, 300)];
        let mins = mins(2, 50);
        let mut engine = Propagator::new(&rects, &mins, Rect::new(0, 0, 300, 300));
        assert_eq!(engine.shrink_right(150, 10, None), 50);
    }

    #[test]
    fn vertical_primitives_follow_by_symmetry() {
        let rects = [Rect::new(0, 0, 300, 100), Rect::new(0, 100, 300, 200)];
        let mins = mins(2, 30);
        let bounds = Rect::new(0, 0, 300, 300);
        let mut engine = Propagator::new(&rects, &mins, bounds);
        assert_eq!(engine.shrink_top(100, 290, None), 270);
        assert_eq!(engine.shrink_bottom(100, 0, None), 30);

        let mut patch = BoundsPatch::try_from_rects(&rects).expect("alloc");
        engine.shrink_top(100, 150, Some(&mut patch));
        engine.grow_bottom(100, 150, &mut patch);
        assert_eq!(
            patch.rects(),
            &[Rect::new(0, 0, 300, 150), Rect::new(0, 150, 300, 150)]
        );
    }

    #[test]
    fn cascade_pushes_chained_neighbors() {
        let rects = [
            Rect::new(0, 0, 67, 100),
            Rect::new(67, 0, 66, 100),
            Rect::new(133, 0, 67, 100),
        ];
        let out = plan(
            &rects,
            50,
            Rect::new(0, 0, 200, 100),
            EdgeTarget::vertical(67),
            Point::new(190, 0),
        );
        assert_eq!(out.achieved, EdgeTarget::vertical(100));
        assert_eq!(
            out.patch.rects(),
            &[
                Rect::new(0, 0, 100, 100),
                Rect::new(100, 0, 50, 100),
                Rect::new(150, 0, 50, 100),
            ]
        );
    }

    #[test]
    fn grow_never_recurses() {
        let rects = [Rect::new(0, 0, 100, 50), Rect::new(100, 0, 100, 50)];
        let mins = mins(2, 10);
        let mut engine = Propagator::new(&rects, &mins, Rect::new(0, 0, 200, 50));
        let mut patch = BoundsPatch::try_from_rects(&rects).expect("alloc");
        engine.grow_left(100, 20, &mut patch);
        assert_eq!(patch.rects()[1], Rect::new(20, 0, 180, 50));
        assert_eq!(patch.rects()[0], rects[0]);
    }

    #[test]
    fn zero_width_marker_moves_without_resizing_others() {
        let rects = [
            Rect::new(0, 0, 150, 300),
            Rect::new(150, 0, 150, 300),
            Rect::new(100, 0, 0, 300),
        ];
        let out = plan(
            &rects,
            4,
            Rect::new(0, 0, 300, 300),
            EdgeTarget::vertical(100),
            Point::new(120, 0),
        );
        assert_eq!(out.achieved, EdgeTarget::vertical(120));
        assert_eq!(
            out.patch.changed(&rects).collect::<Vec<_>>(),
            vec![2]
        );
        assert_eq!(out.patch.rects()[2], Rect::new(120, 0, 0, 300));
    }

    #[test]
    fn unchanged_target_is_a_noop() {
        let rects = [Rect::new(0, 0, 150, 300), Rect::new(150, 0, 150, 300)];
        let out = plan(
            &rects,
            50,
            Rect::new(0, 0, 300, 300),
            EdgeTarget::vertical(150),
            Point::new(150, 0),
        );
        assert!(!out.moves());
        assert_eq!(out.patch.changed(&rects).count(), 0);
    }

    #[test]
    fn corner_moves_both_axes() {
        let rects = [
            Rect::new(0, 0, 100, 100),
            Rect::new(100, 0, 100, 100),
            Rect::new(0, 100, 100, 100),
            Rect::new(100, 100, 100, 100),
        ];
        let out = plan(
            &rects,
            10,
            Rect::new(0, 0, 200, 200),
            EdgeTarget::corner(100, 100),
            Point::new(140, 60),
        );
        assert_eq!(out.achieved, EdgeTarget::corner(140, 60));
        assert_eq!(
            out.patch.rects(),
            &[
                Rect::new(0, 0, 140, 60),
                Rect::new(140, 0, 60, 60),
                Rect::new(0, 60, 140, 140),
                Rect::new(140, 60, 60, 140),
            ]
        );
    }

    #[test]
    fn cascade_respects_stacked_rows() {
        // Left column split in two rows; right column is one tall region.
        let rects = [
            Rect::new(0, 0, 100, 50),
            Rect::new(0, 50, 100, 50),
            Rect::new(100, 0, 100, 100),
        ];
        let out = plan(
            &rects,
            20,
            Rect::new(0, 0, 200, 100),
            EdgeTarget::vertical(100),
            Point::new(10, 0),
        );
        assert_eq!(out.achieved, EdgeTarget::vertical(20));
        assert_eq!(out.patch.rects()[0], Rect::new(0, 0, 20, 50));
        assert_eq!(out.patch.rects()[1], Rect::new(0, 50, 20, 50));
        assert_eq!(out.patch.rects()[2], Rect::new(20, 0, 180, 100));
    }

    #[test]
    fn boundary_and_unmatched_lines_stay_put() {
        let rects = [Rect::new(0, 0, 150, 300), Rect::new(150, 0, 150, 300)];
        let bounds = Rect::new(0, 0, 300, 300);
        for from in [
            EdgeTarget::vertical(300),
            EdgeTarget::vertical(0),
            EdgeTarget::vertical(77),
            EdgeTarget::horizontal(300),
        ] {
            let out = plan(&rects, 4, bounds, from, Point::new(250, 250));
            assert_eq!(out.achieved, from);
            assert_eq!(out.patch.changed(&rects).count(), 0, "{from:?}");
        }
    }

    #[test]
    fn corner_on_boundary_moves_only_interior_axis() {
        let rects = [Rect::new(0, 0, 150, 300), Rect::new(150, 0, 150, 300)];
        let out = plan(
            &rects,
            4,
            Rect::new(0, 0, 300, 300),
            EdgeTarget::corner(150, 300),
            Point::new(180, 200),
        );
        assert_eq!(out.achieved, EdgeTarget::corner(180, 300));
        assert_eq!(
            out.patch.rects(),
            &[Rect::new(0, 0, 180, 300), Rect::new(180, 0, 120, 300)]
        );
    }

    #[test]
    fn allocation_helper_copies_bounds() {
        let rects = [Rect::new(1, 2, 3, 4)];
        let patch = BoundsPatch::try_from_rects(&rects).expect("alloc");
        assert_eq!(patch.into_rects(), rects.to_vec());
    }
}
