//! Errors reported by the renderer.

use thiserror::Error;

/// Errors that can occur while configuring, running or saving a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Unsupported batch size {0} (expected a power of two from 1 to 128)")]
    UnsupportedBatchSize(usize),

    #[error("Batch size {batch_size} does not divide the sphere count {sphere_count}")]
    BatchSizeMismatch {
        batch_size: usize,
        sphere_count: usize,
    },

    #[error("Unknown render mode: {0:?}")]
    UnknownMode(String),

    #[error("Renderer must be prepared before rendering")]
    NotPrepared,

    #[error("Nothing has been rendered yet")]
    NotRendered,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type RenderResult<T> = Result<T, RenderError>;
