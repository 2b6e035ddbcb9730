//! Hit testing: canvas point → block lookup.
//!
//! Reverse-walks sibling lists (last painted = topmost) and prefers a child
//! hit over its parent. Boxes come straight from each block's style with
//! `0/0/100/100` defaults; non-pixel widths and heights count as 100.
//! Child coordinates are read as canvas-space, the same as top-level blocks.

use bc_core::model::{Block, BlockStyle, Length};
use kurbo::{Point, Rect};

/// Size used when a block has no pixel width or height.
pub const DEFAULT_EXTENT: f64 = 100.0;

fn extent(len: Option<Length>) -> f64 {
    len.and_then(|l| l.as_pixels()).unwrap_or(DEFAULT_EXTENT)
}

/// Canvas-space bounding box of a block's style.
pub fn block_rect(style: &BlockStyle) -> Rect {
    let x = style.x.unwrap_or(0.0);
    let y = style.y.unwrap_or(0.0);
    Rect::new(x, y, x + extent(style.width), y + extent(style.height))
}

/// Edges are inclusive on all four sides.
fn contains(rect: Rect, p: Point) -> bool {
    p.x >= rect.x0 && p.x <= rect.x1 && p.y >= rect.y0 && p.y <= rect.y1
}

/// Topmost visible block containing canvas point `(x, y)`.
pub fn find_block_at_position(blocks: &[Block], x: f64, y: f64) -> Option<&Block> {
    let p = Point::new(x, y);
    for block in blocks.iter().rev() {
        if block.hidden || !contains(block_rect(&block.style), p) {
            continue;
        }
        if let Some(child) = find_block_at_position(&block.children, x, y) {
            return Some(child);
        }
        return Some(block);
    }
    None
}
