//! Error types for compositor operations.

use std::collections::TryReserveError;
use thiserror::Error;

/// Failure categories for surface-tree operations.
///
/// Nothing here is retried internally; every error propagates to the
/// caller unchanged.
#[derive(Error, Debug)]
pub enum Error {
    /// A crop or blend produced an empty intersection where a
    /// non-empty region was required.
    #[error("Region does not overlap the surface")]
    NoOverlap,

    /// `add_layer` on a surface that already has a parent.
    #[error("Surface is already attached to a parent")]
    AlreadyAttached,

    /// `remove_layer` / `move_layer` on a surface that is not a child
    /// of the given parent.
    #[error("Surface is not a layer of this parent")]
    NotAChild,

    /// A Z move on a surface with no parent.
    #[error("Surface is not attached to a parent")]
    Detached,

    /// `destroy` on a surface still linked into the tree.
    #[error("Surface must be detached before it can be destroyed")]
    StillAttached,

    /// A handle that outlived its surface.
    #[error("Surface handle is stale")]
    StaleHandle,

    /// Buffer storage could not be obtained.
    #[error("Failed to allocate surface buffer: {0}")]
    Alloc(#[from] TryReserveError),
}
