#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use tessera_core::event::{Event, PointerEvent};
use tessera_core::geometry::{Axis, Point, Rect};
use tessera_tile::{EdgeTarget, NullHost, Tile, TileConfig};

const MIN: i32 = 4;

#[derive(Debug, Arbitrary)]
enum Op {
    Split { index: u8, vertical: bool, at: u8 },
    Move { index: u8, corner: bool, dx: i8, dy: i8 },
    Pointer { kind: u8, x: u16, y: u16 },
    Resize { dx: i8, dy: i8, width: u16, height: u16 },
    Anchor { index: u8 },
    FocusLost,
}

#[derive(Debug, Arbitrary)]
struct Input {
    size_range: bool,
    ops: Vec<Op>,
}

fuzz_target!(|input: Input| {
    let config = if input.size_range {
        TileConfig::default().with_size_range(MIN, MIN)
    } else {
        TileConfig::default()
    };
    let container = Rect::new(0, 0, 200, 120);
    let Ok(mut tile) = Tile::new(container, config) else {
        return;
    };
    tile.add_region(0_u32, container);
    let mut host = NullHost;

    for (serial, op) in input.ops.into_iter().take(256).enumerate() {
        let rects: Vec<Rect> = tile.regions().map(|region| region.bounds()).collect();
        let ids: Vec<_> = tile.regions().map(|region| region.id()).collect();
        let pick = |index: u8| usize::from(index) % ids.len();
        match op {
            Op::Split { index, vertical, at } => {
                let idx = pick(index);
                let rect = rects[idx];
                let axis = if vertical { Axis::X } else { Axis::Y };
                let extent = rect.extent(axis);
                if extent >= 2 * MIN {
                    let at = MIN + i32::from(at) % (extent - 2 * MIN + 1);
                    let near = rect.near(axis);
                    tile.remove_region(ids[idx]);
                    tile.add_region(serial as u32 * 2 + 1, rect.with_span(axis, near, near + at));
                    tile.add_region(
                        serial as u32 * 2 + 2,
                        rect.with_span(axis, near + at, rect.far(axis)),
                    );
                }
            }
            Op::Move { index, corner, dx, dy } => {
                let rect = rects[pick(index)];
                let from = if corner {
                    EdgeTarget::corner(rect.right(), rect.bottom())
                } else {
                    EdgeTarget::vertical(rect.right())
                };
                let to = Point::new(rect.right() + i32::from(dx), rect.bottom() + i32::from(dy));
                assert!(tile.move_intersection(from, to).is_ok());
            }
            Op::Pointer { kind, x, y } => {
                let (x, y) = (i32::from(x % 256), i32::from(y % 160));
                let event = match kind % 4 {
                    0 => PointerEvent::moved(x, y),
                    1 => PointerEvent::down(x, y),
                    2 => PointerEvent::drag(x, y),
                    _ => PointerEvent::up(x, y),
                };
                tile.handle_pointer_event(&event, &mut host);
            }
            Op::Resize { dx, dy, width, height } => {
                let bounds = tile.bounds();
                let target = Rect::new(
                    bounds.x + i32::from(dx),
                    bounds.y + i32::from(dy),
                    i32::from(width % 400),
                    i32::from(height % 400),
                );
                tile.handle_event(&Event::Resize(target), &mut host);
            }
            Op::Anchor { index } => {
                tile.set_anchor(ids[pick(index)]);
            }
            Op::FocusLost => {
                tile.handle_event(&Event::Focus(false), &mut host);
            }
        }

        // Post-conditions that must always hold:
        let report = tile.invariant_report();
        assert!(!report.has_errors(), "invariants broken: {:?}", report.issues);
        let area: i64 = tile.regions().map(|region| region.bounds().area()).sum();
        assert_eq!(area, tile.bounds().area(), "cover area mismatch");
    }
});
