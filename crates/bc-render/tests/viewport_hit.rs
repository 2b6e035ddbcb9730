//! Integration tests: pointer → viewport → hit test / handles.

use bc_core::factory::create_block_with;
use bc_core::{BlockKind, BlockOverrides, BlockStyle, TreeStore};
use bc_render::{
    HandlePosition, Point, Viewport, ZoomDirection, find_block_at_position, handle_at,
    handles::default_radius,
};

// ─── Zoom about cursor ───────────────────────────────────────────────────

#[test]
fn zoom_about_cursor_is_invariant_for_any_start() {
    let pans = [(0.0, 0.0), (-250.0, 80.0), (33.5, -12.25)];
    let pointers = [Point::new(0.0, 0.0), Point::new(640.0, 360.0), Point::new(17.0, 903.0)];

    for start_zoom in (10..=400).step_by(30) {
        for &(pan_x, pan_y) in &pans {
            for &pointer in &pointers {
                for direction in [ZoomDirection::In, ZoomDirection::Out] {
                    let mut vp = Viewport {
                        pan_x,
                        pan_y,
                        zoom: f64::from(start_zoom),
                        origin_left: 48.0,
                        origin_top: 64.0,
                        ..Default::default()
                    };
                    let before = vp.to_canvas(pointer);
                    vp.zoom_at(pointer, direction);
                    let after = vp.to_canvas(pointer);

                    assert!((10.0..=400.0).contains(&vp.zoom));
                    assert!(
                        (before - after).hypot() < 1e-6,
                        "drift at zoom {start_zoom} pan ({pan_x}, {pan_y}) {pointer:?}: \
                         {before:?} -> {after:?}"
                    );
                }
            }
        }
    }
}

#[test]
fn repeated_zoom_does_not_drift() {
    let mut vp = Viewport::default();
    let pointer = Point::new(400.0, 300.0);
    let anchor = vp.to_canvas(pointer);
    for _ in 0..20 {
        vp.zoom_at(pointer, ZoomDirection::In);
    }
    for _ in 0..35 {
        vp.zoom_at(pointer, ZoomDirection::Out);
    }
    assert!((vp.to_canvas(pointer) - anchor).hypot() < 1e-6);
    assert_eq!(vp.zoom, 10.0);
}

// ─── Hit testing through the viewport ────────────────────────────────────

fn shape(kind: BlockKind, x: f64, y: f64, w: f64, h: f64) -> bc_core::Block {
    create_block_with(kind, BlockOverrides::style(BlockStyle::geometry(x, y, w, h)))
}

#[test]
fn pointer_hits_block_under_pan_and_zoom() {
    let mut store = TreeStore::default();
    let rect = shape(BlockKind::Rectangle, 100.0, 100.0, 50.0, 50.0);
    let rid = rect.id;
    store.add_block(rect, None);
    let canvas = store.snapshot();

    let vp = Viewport {
        pan_x: -50.0,
        pan_y: 20.0,
        zoom: 200.0,
        ..Default::default()
    };
    // Canvas (125, 125) → screen (-50 + 250, 20 + 250)
    let c = vp.to_canvas(Point::new(200.0, 270.0));
    assert_eq!(find_block_at_position(&canvas.blocks, c.x, c.y).map(|b| b.id), Some(rid));

    let miss = vp.to_canvas(Point::new(10.0, 10.0));
    assert!(find_block_at_position(&canvas.blocks, miss.x, miss.y).is_none());
}

#[test]
fn nested_child_inside_frame_is_selected_first() {
    let mut store = TreeStore::default();
    let frame = shape(BlockKind::Frame, 0.0, 0.0, 400.0, 300.0);
    let fid = frame.id;
    let circle = shape(BlockKind::Circle, 50.0, 50.0, 100.0, 100.0);
    let cid = circle.id;
    store.add_block(frame, None);
    store.add_block(circle, Some(fid));
    let canvas = store.snapshot();

    assert_eq!(find_block_at_position(&canvas.blocks, 60.0, 60.0).map(|b| b.id), Some(cid));
    assert_eq!(find_block_at_position(&canvas.blocks, 300.0, 250.0).map(|b| b.id), Some(fid));
}

#[test]
fn handle_grab_radius_is_screen_constant() {
    let style = BlockStyle::geometry(0.0, 0.0, 100.0, 100.0);
    for zoom in [10.0, 100.0, 400.0] {
        let vp = Viewport {
            zoom,
            ..Default::default()
        };
        let corner = vp.to_screen(Point::new(100.0, 100.0));
        let near = Point::new(corner.x + 8.0, corner.y + 8.0);
        assert_eq!(
            handle_at(near, &style, &vp, default_radius()),
            Some(HandlePosition::BottomRight),
            "zoom {zoom}"
        );
    }
}
