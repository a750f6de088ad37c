//! Error types for policy rendering.

use thiserror::Error;

/// Result type alias for policy operations.
pub type Result<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while rendering a policy.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Writing into the output buffer failed.
    #[error("failed to build policy text: {0}")]
    Template(#[from] std::fmt::Error),
}
