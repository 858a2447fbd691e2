//! Container resizing.
//!
//! Classic mode remaps every edge coordinate in one pass: edges at or past
//! the anchor's far edge shift with the container, the rest are clamped so
//! they never cross the anchor's new far edge. Size-range mode instead
//! drives the propagation engine, so region minimums hold and the container
//! only shrinks as far as they allow.

use tessera_core::geometry::{Axis, Point, Rect, bounding_box};

use crate::engine::{EdgeTarget, Propagator};
use crate::error::TileError;
use crate::tile::Tile;

/// One-axis edge remap for classic resizing.
#[derive(Debug, Clone, Copy)]
struct Remap {
    old_near: i32,
    shift: i32,
    delta: i32,
    threshold: i32,
    limit: i32,
    near: i32,
    far: i32,
}

impl Remap {
    fn new(old: Rect, anchor: Rect, target: Rect, axis: Axis) -> Self {
        let shift = target.near(axis) - old.near(axis);
        let delta = target.extent(axis) - old.extent(axis);
        let threshold = anchor.far(axis);
        Self {
            old_near: old.near(axis),
            shift,
            delta,
            threshold,
            limit: threshold + shift + delta,
            near: target.near(axis),
            far: target.far(axis),
        }
    }

    fn apply(self, edge: i32) -> i32 {
        // Holds even when a collapsed anchor sits on the near edge.
        if edge <= self.old_near {
            return self.near;
        }
        let moved = edge + self.shift;
        let mapped = if edge >= self.threshold {
            moved + self.delta
        } else {
            moved.min(self.limit)
        };
        mapped.clamp(self.near, self.far.max(self.near))
    }
}

impl<W> Tile<W> {
    /// Resize the container to `target`, reflowing the regions. Returns the
    /// bounds actually taken, which in size-range mode may be larger than
    /// requested when minimums forbid shrinking further.
    pub fn resize_container(&mut self, target: Rect) -> Result<Rect, TileError> {
        // Rect::new clamps negative extents.
        let target = Rect::new(target.x, target.y, target.width, target.height);
        let _span = tessera_core::debug_span!(
            "tile.resize_container",
            x = target.x,
            y = target.y,
            width = target.width,
            height = target.height
        )
        .entered();

        if target == self.bounds {
            return Ok(self.bounds);
        }
        if self.registry.is_empty() {
            self.bounds = target;
            return Ok(target);
        }

        let achieved = if self.is_size_range_enabled() {
            let achieved = self.resize_within_minimums(target)?;
            self.bounds = achieved;
            self.revalidate();
            achieved
        } else {
            // A zero extent would merge every edge line on that axis.
            let target = Rect::new(
                target.x,
                target.y,
                target.width.max(1),
                target.height.max(1),
            );
            self.resize_classic(target);
            self.bounds = target;
            target
        };
        tessera_core::debug!(?achieved, requested = ?target, "container resized");
        Ok(achieved)
    }

    fn resize_classic(&mut self, target: Rect) {
        let old = self.bounds;
        let anchor = self
            .anchor
            .and_then(|id| self.region_bounds(id))
            .unwrap_or(old);
        let remap_x = Remap::new(old, anchor, target, Axis::X);
        let remap_y = Remap::new(old, anchor, target, Axis::Y);

        for idx in 0..self.registry.len() {
            let Some(rect) = self.registry.at(idx).map(|region| region.bounds()) else {
                continue;
            };
            let next = Rect::from_edges(
                remap_x.apply(rect.left()),
                remap_y.apply(rect.top()),
                remap_x.apply(rect.right()),
                remap_y.apply(rect.bottom()),
            );
            self.registry.set_bounds_at(idx, next);
        }
    }

    fn resize_within_minimums(&mut self, target: Rect) -> Result<Rect, TileError> {
        let dx = target.x - self.bounds.x;
        let dy = target.y - self.bounds.y;
        if dx != 0 || dy != 0 {
            for idx in 0..self.registry.len() {
                if let Some(rect) = self.registry.at(idx).map(|region| region.bounds()) {
                    self.registry.set_bounds_at(idx, rect.translate(dx, dy));
                }
            }
            self.bounds = self.bounds.translate(dx, dy);
        }

        let rects = self.registry.bounds();
        let Some(bbox) = bounding_box(&rects) else {
            return Ok(target);
        };
        let mut delta = [target.width - bbox.width, target.height - bbox.height];
        let limits = bbox.union(&Rect::new(bbox.x, bbox.y, target.width, target.height));

        let mins = self.effective_mins();
        {
            let mut engine = Propagator::new(&rects, &mins, limits);
            for (axis, d) in Axis::ALL.into_iter().zip(delta.iter_mut()) {
                if *d < 0 {
                    let far = bbox.far(axis);
                    *d = engine.probe_axis(axis, far, far + *d) - far;
                }
            }
        }

        // Shrinking: the anchor gives up its own slack before the corner moves.
        let anchor_index = self.anchor.and_then(|id| self.registry.index_of(id));
        if let Some((idx, &anchor)) = anchor_index.and_then(|idx| Some((idx, rects.get(idx)?))) {
            let min = mins.get(idx).copied().unwrap_or_default();
            let mut from = EdgeTarget::default();
            let mut to = Point::new(anchor.right(), anchor.bottom());
            for (axis, d) in Axis::ALL.into_iter().zip(delta) {
                if d < 0 && anchor.far(axis) < bbox.far(axis) {
                    let floor = anchor.near(axis) + min.along(axis);
                    let wanted = (anchor.far(axis) + d).max(floor);
                    if wanted < anchor.far(axis) {
                        set_axis(&mut from, &mut to, axis, anchor.far(axis), wanted);
                    }
                }
            }
            if !from.is_empty() {
                self.commit_within(from, to, limits)?;
            }
        }

        let mut corner = EdgeTarget::default();
        let mut to = Point::new(bbox.right(), bbox.bottom());
        for (axis, d) in Axis::ALL.into_iter().zip(delta) {
            if d != 0 {
                set_axis(&mut corner, &mut to, axis, bbox.far(axis), bbox.far(axis) + d);
            }
        }
        if !corner.is_empty() {
            let achieved = self.commit_lines_within(corner, to, limits)?;
            for (axis, d) in Axis::ALL.into_iter().zip(delta.iter_mut()) {
                if let Some(edge) = achieved.along(axis) {
                    *d = edge - bbox.far(axis);
                }
            }
        }

        // Growing: hand the new space from the outer regions to the anchor.
        if let Some(idx) = anchor_index {
            let anchor = self.registry.at(idx).map(|region| region.bounds());
            if let Some(anchor) = anchor {
                let mut from = EdgeTarget::default();
                let mut to = Point::new(anchor.right(), anchor.bottom());
                for (axis, d) in Axis::ALL.into_iter().zip(delta) {
                    if d > 0 && anchor.far(axis) < bbox.far(axis) {
                        let far = anchor.far(axis);
                        set_axis(&mut from, &mut to, axis, far, far + d);
                    }
                }
                if !from.is_empty() {
                    self.commit_within(from, to, limits)?;
                }
            }
        }

        Ok(Rect::new(
            bbox.x,
            bbox.y,
            bbox.width + delta[0],
            bbox.height + delta[1],
        ))
    }
}

fn set_axis(from: &mut EdgeTarget, to: &mut Point, axis: Axis, old: i32, new: i32) {
    match axis {
        Axis::X => {
            from.x = Some(old);
            to.x = new;
        }
        Axis::Y => {
            from.y = Some(old);
            to.y = new;
        }
    }
}
