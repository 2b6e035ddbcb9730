//! Build a small landing page from palette blocks and print (or write) the
//! exported HTML.
//!
//! ```text
//! cargo run -p bc-core --example export_landing [out.html]
//! ```

use bc_core::factory::{create_block, create_block_with};
use bc_core::model::{BlockContent, BlockKind, BlockPatch};
use bc_core::{BlockOverrides, TreeStore, export_canvas};
use std::env;
use std::fs;

fn main() {
    env_logger::init();

    let mut store = TreeStore::new("Landing");
    let header = create_block(BlockKind::Header);
    let hero = create_block(BlockKind::Section);
    let hero_id = hero.id;
    store.add_block(header, None);
    store.add_block(hero, None);

    let title = create_block_with(
        BlockKind::Text,
        BlockOverrides {
            content: Some(BlockContent::Text {
                text: "Ship pages faster".into(),
            }),
            ..Default::default()
        },
    );
    let cta = create_block(BlockKind::Button);
    let cta_id = cta.id;
    store.add_block(title, Some(hero_id));
    store.add_block(cta, Some(hero_id));
    store.update_block(
        cta_id,
        &BlockPatch::content(BlockContent::Button {
            text: "Start building".into(),
        }),
    );
    store.add_block(create_block(BlockKind::Footer), None);

    let html = export_canvas(&store.snapshot());
    match env::args().nth(1) {
        Some(path) => match fs::write(&path, &html) {
            Ok(()) => println!("wrote {} bytes to {path}", html.len()),
            Err(e) => eprintln!("failed to write {path}: {e}"),
        },
        None => print!("{html}"),
    }
}
