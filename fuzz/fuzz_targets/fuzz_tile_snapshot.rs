#![no_main]

use libfuzzer_sys::fuzz_target;
use tessera_core::geometry::Rect;
use tessera_tile::{Tile, TileConfig, TileSnapshot};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(snapshot) = TileSnapshot::from_json(json) else {
        return;
    };
    // Must not panic on arbitrary payloads.
    let _ = snapshot.state_hash();

    let Ok(mut tile) = Tile::new(Rect::new(0, 0, 100, 100), TileConfig::default()) else {
        return;
    };
    tile.add_region((), Rect::new(0, 0, 50, 100));
    tile.add_region((), Rect::new(50, 0, 50, 100));
    let before = tile.snapshot();

    match tile.restore(&snapshot) {
        Ok(_) => {
            let report = tile.invariant_report();
            assert!(!report.has_errors(), "restored invalid geometry: {:?}", report.issues);
        }
        Err(_) => assert_eq!(tile.snapshot(), before, "failed restore mutated the tile"),
    }
});
