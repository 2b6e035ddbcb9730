use bc_core::factory::create_block_with;
use bc_core::{BlockKind, BlockOverrides, BlockStyle, TreeStore, export_canvas};
use std::time::Instant;

#[test]
#[ignore] // Run manually with `cargo test --test perf_benchmark -- --nocapture --ignored`
fn benchmark_store_and_export() {
    let mut store = TreeStore::default();

    // 500 frames with 100 rectangles each
    let start = Instant::now();
    for f in 0..500 {
        let frame = create_block_with(
            BlockKind::Frame,
            BlockOverrides::style(BlockStyle::geometry(f as f64 * 10.0, 0.0, 400.0, 300.0)),
        );
        let fid = frame.id;
        store.add_block(frame, None);
        for r in 0..100 {
            let rect = create_block_with(
                BlockKind::Rectangle,
                BlockOverrides::style(BlockStyle::geometry(r as f64, r as f64, 20.0, 20.0)),
            );
            store.add_block(rect, Some(fid));
        }
    }
    println!("Inserted {} blocks in {:?}", store.len(), start.elapsed());

    let start = Instant::now();
    let canvas = store.snapshot();
    println!("Snapshot in {:?}", start.elapsed());

    let start = Instant::now();
    let html = export_canvas(&canvas);
    println!("Exported {} bytes in {:?}", html.len(), start.elapsed());
}
