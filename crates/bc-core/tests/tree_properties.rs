//! Integration tests: factory → tree store → snapshot.
//!
//! Exercises the store operations the palette and the layers panel drive,
//! checking the tree invariants after each sequence.

use bc_core::factory::{create_block, create_block_from_slug};
use bc_core::{BlockId, BlockKind, BlockStyle, Length, MoveDirection, Sides, TreeStore};
use pretty_assertions::assert_eq;
use std::collections::HashSet;

fn all_ids(store: &TreeStore) -> Vec<BlockId> {
    store.get_all_blocks().iter().map(|n| n.id).collect()
}

fn assert_unique(store: &TreeStore) {
    let ids = all_ids(store);
    let set: HashSet<BlockId> = ids.iter().copied().collect();
    assert_eq!(set.len(), ids.len(), "duplicate ids in {ids:?}");
}

/// section > [card > [text, button], image]
fn landing(store: &mut TreeStore) -> (BlockId, BlockId) {
    let section = create_block(BlockKind::Section);
    let card = create_block(BlockKind::Card);
    let (sid, cid) = (section.id, card.id);
    store.add_block(section, None);
    store.add_block(card, Some(sid));
    store.add_block(create_block(BlockKind::Text), Some(cid));
    store.add_block(create_block(BlockKind::Button), Some(cid));
    store.add_block(create_block(BlockKind::Image), Some(sid));
    (sid, cid)
}

// ─── Uniqueness ──────────────────────────────────────────────────────────

#[test]
fn ids_stay_unique_across_creates_and_duplicates() {
    let mut store = TreeStore::default();
    let (sid, cid) = landing(&mut store);
    for _ in 0..3 {
        store.duplicate_block(sid);
        store.duplicate_block(cid);
    }
    for kind in BlockKind::ALL {
        store.add_block(create_block(kind), None);
    }
    assert_unique(&store);
}

// ─── Round-trip containment ──────────────────────────────────────────────

#[test]
fn added_block_is_reachable_under_parent() {
    let mut store = TreeStore::default();
    let (_sid, cid) = landing(&mut store);

    let block = create_block(BlockKind::Input);
    let expected = block.clone();
    assert!(store.add_block(block, Some(cid)));

    assert_eq!(store.get_block(expected.id), Some(expected.clone()));
    let parent = store.get_block(cid).unwrap();
    assert_eq!(parent.children.last(), Some(&expected));
}

// ─── Deletion ────────────────────────────────────────────────────────────

#[test]
fn removing_a_block_drops_exactly_its_subtree() {
    let mut store = TreeStore::default();
    let (_sid, cid) = landing(&mut store);

    let doomed = store.get_block(cid).unwrap();
    let doomed_ids: HashSet<BlockId> = doomed.ids().into_iter().collect();
    let before = store.get_all_blocks().len();

    assert!(store.remove_block(cid));

    let after = all_ids(&store);
    assert_eq!(after.len(), before - (doomed.descendant_count() + 1));
    assert!(after.iter().all(|id| !doomed_ids.contains(id)));
}

// ─── Duplication ─────────────────────────────────────────────────────────

#[test]
fn duplicate_is_isomorphic_with_disjoint_ids() {
    let mut store = TreeStore::default();
    let (sid, _cid) = landing(&mut store);

    let before: HashSet<BlockId> = all_ids(&store).into_iter().collect();
    let source = store.get_block(sid).unwrap();

    let clone_id = store.duplicate_block(sid).unwrap();
    let clone = store.get_block(clone_id).unwrap();

    assert_eq!(store.len(), before.len() + source.descendant_count() + 1);
    assert!(clone.ids().iter().all(|id| !before.contains(id)));

    // Same kinds, styles, and shape in the same order.
    let shape = |b: &bc_core::Block| {
        b.iter()
            .map(|n| (n.kind, n.style.clone(), n.children.len()))
            .collect::<Vec<_>>()
    };
    assert_eq!(shape(&clone), shape(&source));
    assert_eq!(store.top_level().last(), Some(&clone_id));
}

// ─── Ordering ────────────────────────────────────────────────────────────

#[test]
fn move_up_swaps_top_level_pair() {
    let mut store = TreeStore::default();
    let a = create_block(BlockKind::Header);
    let b = create_block(BlockKind::Footer);
    let (aid, bid) = (a.id, b.id);
    store.add_block(a, None);
    store.add_block(b, None);

    store.move_block(bid, MoveDirection::Up);
    assert_eq!(store.top_level(), vec![bid, aid]);
}

#[test]
fn move_is_noop_at_boundaries_of_nested_siblings() {
    let mut store = TreeStore::default();
    let (_sid, cid) = landing(&mut store);
    let siblings = store.children_of(cid);
    let rev = store.revision();

    assert!(!store.move_block(siblings[0], MoveDirection::Up));
    assert!(!store.move_block(siblings[siblings.len() - 1], MoveDirection::Down));
    assert_eq!(store.children_of(cid), siblings);
    assert_eq!(store.revision(), rev);
}

#[test]
fn move_stays_within_the_containing_list() {
    let mut store = TreeStore::default();
    let (sid, cid) = landing(&mut store);
    let text = store.children_of(cid)[0];

    store.move_block(text, MoveDirection::Down);
    assert_eq!(store.parent_of(text), Some(cid));
    assert_eq!(store.children_of(cid)[1], text);
    assert_eq!(store.top_level(), vec![sid]);
}

// ─── Style merges ────────────────────────────────────────────────────────

#[test]
fn repeated_style_update_is_idempotent() {
    let mut store = TreeStore::default();
    let (sid, _cid) = landing(&mut store);
    let patch = BlockStyle {
        padding: Some(Sides::uniform(12.0)),
        width: Some(Length::Percent(50.0)),
        ..Default::default()
    };

    store.update_block_style(sid, &patch);
    let once = store.node(sid).unwrap().style.clone();
    store.update_block_style(sid, &patch);
    assert_eq!(store.node(sid).unwrap().style, once);
    // Fields outside the patch are untouched.
    assert_eq!(once.min_height, Some(300.0));
}

// ─── Factory scenario ────────────────────────────────────────────────────

#[test]
fn palette_button_scenario() {
    let button = create_block_from_slug("button").unwrap();
    assert_eq!(button.kind, BlockKind::Button);
    assert_eq!(button.label, "Button");
    assert_eq!(button.content.text(), Some("Click me"));
    assert_eq!(button.style.padding, Some(Sides::new(10.0, 20.0, 10.0, 20.0)));
    assert!(button.children.is_empty());
}

// ─── Snapshots ───────────────────────────────────────────────────────────

#[test]
fn snapshots_are_distinct_values_per_revision() {
    let mut store = TreeStore::default();
    let (sid, _cid) = landing(&mut store);
    let first = store.snapshot();
    store.toggle_block_visibility(sid);
    let second = store.snapshot();

    assert_ne!(first, second);
    assert!(!first.blocks[0].hidden);
    assert!(second.blocks[0].hidden);
}

#[test]
fn canvas_json_roundtrip() {
    let mut store = TreeStore::default();
    landing(&mut store);
    let canvas = store.snapshot();
    let json = serde_json::to_string(&canvas).unwrap();
    let back: bc_core::Canvas = serde_json::from_str(&json).unwrap();
    assert_eq!(back, canvas);
}
