//! Plane renderer error types.

use thiserror::Error;

/// Errors raised while rendering a plane.
#[derive(Debug, Error)]
pub enum PlaneError {
    /// The selector did not match any element in the document.
    #[error("container not found: {0}")]
    MountNotFound(String),
}
