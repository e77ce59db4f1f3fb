//! Store error types.

use thiserror::Error;

use crate::model::LooId;

/// Errors surfaced by store implementations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Optimistic version check failed; the caller must re-read and
    /// re-merge before retrying
    #[error("version conflict on loo {id}: attempted {attempted}, current {current}")]
    VersionConflict {
        id: LooId,
        attempted: u64,
        current: u64,
    },

    /// The backing store could not be reached
    #[error("store unavailable: {0}")]
    Unavailable(String),
}
