//! Benchmarks for edge propagation and container resizing.
//!
//! Run with: cargo bench -p tessera-tile

use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use tessera_core::geometry::{Point, Rect};
use tessera_tile::{EdgeTarget, Propagator, Tile, TileConfig};

const CELL: i32 = 40;
const MIN: i32 = 10;

/// An `n` x `n` grid of equal cells in size-range mode.
fn make_grid(n: i32) -> Tile<i32> {
    let config = TileConfig::default().with_size_range(MIN, MIN);
    let mut tile = Tile::new(Rect::new(0, 0, n * CELL, n * CELL), config).expect("config");
    for row in 0..n {
        for col in 0..n {
            tile.add_region(row * n + col, Rect::new(col * CELL, row * CELL, CELL, CELL));
        }
    }
    tile
}

fn bench_plan_cascade(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile/plan_cascade");

    for n in [4, 8, 16, 32] {
        let tile = make_grid(n);
        let rects: Vec<Rect> = tile.regions().map(|region| region.bounds()).collect();
        let mins = vec![tessera_core::geometry::Size::new(MIN, MIN); rects.len()];
        let bounds = tile.bounds();
        // Drag the first vertical line all the way right so every column
        // collapses to its minimum.
        group.bench_with_input(BenchmarkId::new("full_push", n), &rects, |b, rects| {
            b.iter(|| {
                let mut engine = Propagator::new(rects, &mins, bounds);
                black_box(engine.plan(EdgeTarget::vertical(CELL), Point::new(n * CELL, 0)))
            })
        });
    }

    group.finish();
}

fn bench_corner_drag(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile/corner_drag");

    for n in [4, 8, 16] {
        let mid = (n / 2) * CELL;
        group.bench_function(BenchmarkId::new("move_intersection", n), |b| {
            b.iter_batched(
                || make_grid(n),
                |mut tile| {
                    black_box(
                        tile.move_intersection(
                            EdgeTarget::corner(mid, mid),
                            Point::new(mid + CELL * 3, mid - CELL * 3),
                        ),
                    )
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("tile/resize_container");

    for n in [4, 8, 16] {
        let size = n * CELL;
        group.bench_function(BenchmarkId::new("shrink_to_minimums", n), |b| {
            b.iter_batched(
                || make_grid(n),
                |mut tile| black_box(tile.resize_container(Rect::new(0, 0, size / 8, size / 8))),
                BatchSize::SmallInput,
            )
        });
        group.bench_function(BenchmarkId::new("grow_with_anchor", n), |b| {
            b.iter_batched(
                || {
                    let mut tile = make_grid(n);
                    let anchor = tile.regions().nth((n * n / 2) as usize).map(|r| r.id());
                    if let Some(id) = anchor {
                        tile.set_anchor(id);
                    }
                    tile
                },
                |mut tile| black_box(tile.resize_container(Rect::new(0, 0, size * 2, size * 2))),
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_pointer_storm(c: &mut Criterion) {
    use tessera_core::event::PointerEvent;
    use tessera_tile::NullHost;

    let mut group = c.benchmark_group("tile/pointer_storm");
    let n = 8;
    group.bench_function("drag_100_steps", |b| {
        b.iter_batched(
            || make_grid(n),
            |mut tile| {
                let mut host = NullHost;
                tile.handle_pointer_event(&PointerEvent::down(CELL, CELL / 2), &mut host);
                for step in 0..100 {
                    let x = CELL + (step % 40) * 4;
                    tile.handle_pointer_event(&PointerEvent::drag(x, CELL / 2), &mut host);
                }
                black_box(tile.handle_pointer_event(&PointerEvent::up(CELL, CELL / 2), &mut host))
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(
    benches,
    bench_plan_cascade,
    bench_corner_drag,
    bench_resize,
    bench_pointer_storm
);
criterion_main!(benches);
