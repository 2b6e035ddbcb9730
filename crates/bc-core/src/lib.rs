pub mod css;
pub mod error;
pub mod export;
pub mod factory;
pub mod id;
pub mod input;
pub mod model;
pub mod store;

pub use error::{BuilderError, BuilderResult};
pub use export::{ExportOptions, block_to_html, canvas_to_html, export_canvas};
pub use factory::{BlockOverrides, create_block, create_block_with};
pub use id::BlockId;
pub use model::*;
pub use store::{BlockMutation, MoveDirection, TreeStore};
