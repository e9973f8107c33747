//! Engine error types.

use thiserror::Error;

/// Errors surfaced by engine operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// A screen-space computation (zoom anchoring) ran before a container
    /// rectangle was attached, or after it was detached.
    #[error("cropper is not attached to a container")]
    NotAttached,
}
