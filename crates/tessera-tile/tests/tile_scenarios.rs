//! End-to-end scenarios for edge drags and container resizes.
//!
//! Each test builds a small layout through the public API, drives it the way
//! a host would, and checks the resulting geometry and invariants.

use tessera_core::event::{Event, PointerEvent};
use tessera_core::geometry::{Point, Rect, Size};
use tessera_tile::{
    CallbackReason, DragEffect, EdgeTarget, RecordingHost, RegionId, Tile, TileConfig,
};

fn tile_with(
    config: TileConfig,
    container: Rect,
    rects: &[Rect],
) -> (Tile<usize>, Vec<RegionId>) {
    let mut tile = Tile::new(container, config).expect("valid config");
    let ids = rects
        .iter()
        .enumerate()
        .map(|(idx, rect)| tile.add_region(idx, *rect))
        .collect();
    tile.take_dirty();
    (tile, ids)
}

fn bounds(tile: &Tile<usize>) -> Vec<Rect> {
    tile.regions().map(|region| region.bounds()).collect()
}

fn assert_clean(tile: &Tile<usize>) {
    let report = tile.invariant_report();
    assert!(!report.has_errors(), "invariants broken: {:?}", report.issues);
}

#[test]
fn split_drag_clamps_at_neighbor_minimum() {
    let (mut tile, ids) = tile_with(
        TileConfig::default().with_size_range(50, 50),
        Rect::new(0, 0, 300, 300),
        &[Rect::new(0, 0, 150, 300), Rect::new(150, 0, 150, 300)],
    );

    let achieved = tile
        .move_intersection(EdgeTarget::vertical(150), Point::new(280, 150))
        .expect("commit");

    assert_eq!(achieved, EdgeTarget::vertical(250));
    assert_eq!(tile.region_bounds(ids[0]), Some(Rect::new(0, 0, 250, 300)));
    assert_eq!(tile.region_bounds(ids[1]), Some(Rect::new(250, 0, 50, 300)));
    assert_eq!(tile.take_dirty(), ids);
    assert_clean(&tile);
}

#[test]
fn chained_neighbors_are_pushed_to_their_minimums() {
    let (mut tile, ids) = tile_with(
        TileConfig::default().with_size_range(50, 50),
        Rect::new(0, 0, 200, 100),
        &[
            Rect::new(0, 0, 67, 100),
            Rect::new(67, 0, 66, 100),
            Rect::new(133, 0, 67, 100),
        ],
    );

    let achieved = tile
        .move_intersection(EdgeTarget::vertical(67), Point::new(190, 0))
        .expect("commit");

    assert_eq!(achieved, EdgeTarget::vertical(100));
    assert_eq!(tile.region_bounds(ids[0]).map(|r| r.width), Some(100));
    assert_eq!(tile.region_bounds(ids[1]), Some(Rect::new(100, 0, 50, 100)));
    assert_eq!(tile.region_bounds(ids[2]), Some(Rect::new(150, 0, 50, 100)));
    assert_clean(&tile);
}

#[test]
fn anchor_absorbs_container_growth() {
    let (mut tile, ids) = tile_with(
        TileConfig::default().with_size_range(4, 4),
        Rect::new(0, 0, 300, 300),
        &[Rect::new(0, 0, 150, 300), Rect::new(150, 0, 150, 300)],
    );
    assert!(tile.set_anchor(ids[1]));

    let achieved = tile
        .resize_container(Rect::new(0, 0, 400, 350))
        .expect("resize");

    assert_eq!(achieved, Rect::new(0, 0, 400, 350));
    assert_eq!(tile.region_bounds(ids[0]), Some(Rect::new(0, 0, 150, 350)));
    assert_eq!(tile.region_bounds(ids[1]), Some(Rect::new(150, 0, 250, 350)));
    assert_clean(&tile);
}

#[test]
fn zero_width_marker_only_changes_position() {
    let (mut tile, ids) = tile_with(
        TileConfig::default().with_size_range(4, 4),
        Rect::new(0, 0, 300, 300),
        &[
            Rect::new(0, 0, 150, 300),
            Rect::new(150, 0, 150, 300),
            Rect::new(100, 0, 0, 300),
        ],
    );

    let achieved = tile
        .move_intersection(EdgeTarget::vertical(100), Point::new(120, 0))
        .expect("commit");

    assert_eq!(achieved, EdgeTarget::vertical(120));
    assert_eq!(tile.take_dirty(), vec![ids[2]]);
    assert_eq!(
        bounds(&tile),
        vec![
            Rect::new(0, 0, 150, 300),
            Rect::new(150, 0, 150, 300),
            Rect::new(120, 0, 0, 300),
        ]
    );
}

#[test]
fn moving_an_edge_onto_itself_changes_nothing() {
    let rects = [
        Rect::new(0, 0, 100, 100),
        Rect::new(100, 0, 100, 100),
        Rect::new(0, 100, 200, 100),
    ];
    for config in [TileConfig::default(), TileConfig::default().with_size_range(30, 30)] {
        let (mut tile, _ids) = tile_with(config, Rect::new(0, 0, 200, 200), &rects);
        for target in [
            EdgeTarget::vertical(100),
            EdgeTarget::horizontal(100),
            EdgeTarget::corner(100, 100),
        ] {
            let at = Point::new(target.x.unwrap_or(0), target.y.unwrap_or(0));
            let achieved = tile.move_intersection(target, at).expect("commit");
            assert_eq!(achieved, target);
            assert_eq!(bounds(&tile), rects.to_vec());
            assert!(tile.take_dirty().is_empty());
        }
    }
}

#[test]
fn container_boundary_lines_never_move() {
    let rects = [
        Rect::new(0, 0, 100, 100),
        Rect::new(100, 0, 100, 100),
        Rect::new(0, 100, 200, 100),
    ];
    for config in [TileConfig::default(), TileConfig::default().with_size_range(30, 30)] {
        let (mut tile, _ids) = tile_with(config, Rect::new(0, 0, 200, 200), &rects);
        for target in [
            EdgeTarget::vertical(0),
            EdgeTarget::vertical(200),
            EdgeTarget::horizontal(200),
            EdgeTarget::corner(200, 200),
        ] {
            let achieved = tile
                .move_intersection(target, Point::new(150, 150))
                .expect("commit");
            assert_eq!(achieved, target);
            assert_eq!(bounds(&tile), rects.to_vec());
        }

        // Only the interior line of a boundary corner moves.
        let achieved = tile
            .move_intersection(EdgeTarget::corner(100, 200), Point::new(130, 160))
            .expect("commit");
        assert_eq!(achieved, EdgeTarget::corner(130, 200));
        assert_eq!(bounds(&tile)[0], Rect::new(0, 0, 130, 100));
        assert_eq!(bounds(&tile)[2], Rect::new(0, 100, 200, 100));
        assert_clean(&tile);

        let mut host = RecordingHost::new();
        tile.handle_pointer_event(&PointerEvent::down(200, 50), &mut host);
        tile.handle_pointer_event(&PointerEvent::drag(170, 50), &mut host);
        tile.handle_pointer_event(&PointerEvent::up(170, 50), &mut host);
        assert_eq!(tile.bounds(), Rect::new(0, 0, 200, 200));
        assert_eq!(bounds(&tile)[1].right(), 200);
        assert_clean(&tile);
    }
}

#[test]
fn repeated_drags_converge_monotonically() {
    let (mut tile, _ids) = tile_with(
        TileConfig::default().with_size_range(40, 40),
        Rect::new(0, 0, 300, 100),
        &[
            Rect::new(0, 0, 100, 100),
            Rect::new(100, 0, 100, 100),
            Rect::new(200, 0, 100, 100),
        ],
    );

    let mut edge = 100;
    let mut history = Vec::new();
    for _ in 0..10 {
        let achieved = tile
            .move_intersection(EdgeTarget::vertical(edge), Point::new(edge + 30, 0))
            .expect("commit");
        let next = achieved.x.expect("x stays active");
        assert!(next >= edge, "edge moved backwards: {edge} -> {next}");
        history.push(next);
        edge = next;
    }
    assert_eq!(edge, 220);
    assert!(history.windows(2).all(|pair| pair[0] <= pair[1]));
    assert_eq!(history.last(), history.get(history.len() - 2));
    assert_clean(&tile);
}

#[test]
fn corner_drag_moves_both_edge_lines() {
    let (mut tile, ids) = tile_with(
        TileConfig::default().with_size_range(20, 20),
        Rect::new(0, 0, 200, 200),
        &[
            Rect::new(0, 0, 100, 100),
            Rect::new(100, 0, 100, 100),
            Rect::new(0, 100, 100, 100),
            Rect::new(100, 100, 100, 100),
        ],
    );
    let mut host = RecordingHost::new();

    assert!(tile.handle_pointer_event(&PointerEvent::down(101, 99), &mut host));
    assert!(tile.handle_pointer_event(&PointerEvent::drag(191, 9), &mut host));
    assert!(tile.handle_pointer_event(&PointerEvent::up(191, 9), &mut host));

    assert_eq!(tile.region_bounds(ids[0]), Some(Rect::new(0, 0, 180, 20)));
    assert_eq!(tile.region_bounds(ids[3]), Some(Rect::new(180, 20, 20, 180)));
    assert_eq!(
        host.callbacks().collect::<Vec<_>>(),
        vec![CallbackReason::Dragged, CallbackReason::Changed]
    );
    assert!(matches!(
        tile.last_transition().map(|t| t.effect),
        Some(DragEffect::Committed { .. })
    ));
    assert_clean(&tile);
}

#[test]
fn stacked_rows_move_together_on_a_shared_line() {
    let (mut tile, ids) = tile_with(
        TileConfig::default().with_size_range(10, 10),
        Rect::new(0, 0, 200, 200),
        &[
            Rect::new(0, 0, 100, 100),
            Rect::new(0, 100, 100, 100),
            Rect::new(100, 0, 100, 200),
        ],
    );

    tile.move_intersection(EdgeTarget::vertical(100), Point::new(60, 0))
        .expect("commit");

    assert_eq!(tile.region_bounds(ids[0]), Some(Rect::new(0, 0, 60, 100)));
    assert_eq!(tile.region_bounds(ids[1]), Some(Rect::new(0, 100, 60, 100)));
    assert_eq!(tile.region_bounds(ids[2]), Some(Rect::new(60, 0, 140, 200)));
    assert_clean(&tile);
}

#[test]
fn resize_event_pushes_new_bounds_to_host() {
    let (mut tile, ids) = tile_with(
        TileConfig::default(),
        Rect::new(0, 0, 200, 100),
        &[Rect::new(0, 0, 100, 100), Rect::new(100, 0, 100, 100)],
    );
    let mut host = RecordingHost::new();

    assert!(tile.handle_event(&Event::Resize(Rect::new(0, 0, 300, 100)), &mut host));

    assert_eq!(tile.bounds(), Rect::new(0, 0, 300, 100));
    assert_eq!(host.last_bounds(ids[1]), Some(Rect::new(100, 0, 200, 100)));
    assert_eq!(host.last_bounds(ids[0]), None);
    assert_clean(&tile);
}

#[test]
fn container_shrink_in_size_range_mode_is_clamped() {
    let (mut tile, _ids) = tile_with(
        TileConfig::default().with_size_range(60, 60),
        Rect::new(0, 0, 300, 200),
        &[
            Rect::new(0, 0, 150, 100),
            Rect::new(150, 0, 150, 100),
            Rect::new(0, 100, 300, 100),
        ],
    );

    let achieved = tile
        .resize_container(Rect::new(0, 0, 50, 50))
        .expect("resize");

    assert_eq!(achieved, Rect::new(0, 0, 120, 120));
    assert_eq!(tile.bounds(), achieved);
    assert!(tile.invariant_report().is_clean());
}

#[test]
fn host_minimums_feed_the_engine() {
    let (mut tile, ids) = tile_with(
        TileConfig::default().with_size_range(10, 10),
        Rect::new(0, 0, 300, 100),
        &[Rect::new(0, 0, 150, 100), Rect::new(150, 0, 150, 100)],
    );
    let host = RecordingHost::new().with_min_size(1, Size::new(120, 10));
    tile.sync_min_sizes(&host);

    let achieved = tile
        .move_intersection(EdgeTarget::vertical(150), Point::new(290, 0))
        .expect("commit");

    assert_eq!(achieved, EdgeTarget::vertical(180));
    assert_eq!(tile.region_bounds(ids[1]).map(|r| r.width), Some(120));
}
