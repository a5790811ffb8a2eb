//! Render setup errors.
//!
//! Everything here is detected before any worker starts. Numerical edge cases
//! inside a render (total internal reflection, degenerate scatter directions)
//! are handled in place and never surface as errors.

use thiserror::Error;

/// Errors that can occur when starting a render.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Worker count must be at least 1")]
    NoWorkers,

    #[error("Samples per pixel must be at least 1")]
    NoSamples,

    #[error("{samples} samples per pixel cannot be split across {workers} workers")]
    TooFewSamples { samples: u32, workers: usize },

    #[error("Image must have a nonzero size, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Framebuffer is {actual:?} but the render is configured for {expected:?}")]
    FramebufferMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },

    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Result type for render operations.
pub type RenderResult<T> = Result<T, RenderError>;
