pub mod handles;
pub mod hit;
pub mod projection;
pub mod viewport;

pub use handles::{HANDLE_SIZE, HANDLE_SLACK, HandlePosition, handle_at};
pub use hit::{block_rect, find_block_at_position};
pub use projection::{Projection, RenderElement, RenderMode, RenderNode, render_block, render_canvas};
pub use viewport::{Viewport, ZoomDirection, ZoomLimits};

// Re-export kurbo geometry so downstream crates don't need a direct dependency
pub use kurbo::{Point, Rect, Vec2};
