//! Error types for the block core.
//!
//! Store operations never fail: an unknown id is a no-op. Errors only come
//! out of parsing user or palette input and importing whole canvases.

use crate::id::BlockId;
use thiserror::Error;

pub type BuilderResult<T> = Result<T, BuilderError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuilderError {
    #[error("Unknown block kind: '{0}'")]
    UnknownBlockKind(String),

    #[error("Duplicate block id: {0}")]
    DuplicateId(BlockId),

    #[error("Invalid length '{0}': expected a number, 'auto', or a percentage")]
    InvalidLength(String),

    #[error("Unknown tool: '{0}'")]
    UnknownTool(String),

    #[error("Invalid zoom limits: min {min}, max {max}, step {step} (need 0 < min <= max and step > 0)")]
    InvalidZoomLimits { min: f64, max: f64, step: f64 },
}
