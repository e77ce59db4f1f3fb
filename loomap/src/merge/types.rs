//! Merge engine configuration, outcomes, and errors.

use thiserror::Error;

use crate::model::{Loo, LooId, Report, ValidationError};
use crate::store::StoreError;
use crate::geohash::DEFAULT_PRECISION;

/// Merge engine tuning.
///
/// All engine-wide defaults live here rather than scattered through the
/// schema:
///
/// - `match_radius_m`: two reports within this great-circle distance
///   describe the same facility (default 25 m)
/// - `geohash_precision`: precision stamped on records (default 9, ~5 m)
/// - `max_put_retries`: re-merge attempts after a version conflict before
///   giving up (default 5)
/// - `default_access` / `default_active`: values applied to a merged loo
///   when no report states them (default "public" / true)
#[derive(Debug, Clone)]
pub struct MergeConfig {
    pub match_radius_m: f64,
    pub geohash_precision: usize,
    pub max_put_retries: u32,
    pub default_access: String,
    pub default_active: bool,
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            match_radius_m: 25.0,
            geohash_precision: DEFAULT_PRECISION,
            max_put_retries: 5,
            default_access: "public".to_string(),
            default_active: true,
        }
    }
}

impl MergeConfig {
    /// Set the match radius in metres.
    pub fn with_match_radius_m(mut self, radius: f64) -> Self {
        self.match_radius_m = radius;
        self
    }

    /// Set the geohash precision stamped on records.
    pub fn with_geohash_precision(mut self, precision: usize) -> Self {
        self.geohash_precision = precision;
        self
    }

    /// Set the number of re-merge attempts after version conflicts.
    pub fn with_max_put_retries(mut self, retries: u32) -> Self {
        self.max_put_retries = retries;
        self
    }
}

/// Non-fatal conditions recorded during a merge.
#[derive(Debug, Clone, PartialEq)]
pub enum MergeWarning {
    /// More than one canonical loo sat within the match radius. The write
    /// proceeded against the nearest; the ambiguity is recorded for
    /// operator review because it means prior data already violates the
    /// match-radius invariant.
    AmbiguousMatch {
        /// How many loos were within the radius
        matched: usize,
        /// The loo the report was merged into
        chosen: LooId,
        /// Distance to the chosen loo in metres
        nearest_m: f64,
    },
}

/// Result of a successful submission.
#[derive(Debug, Clone)]
pub struct SubmitOutcome {
    /// The canonical loo as committed by the store
    pub loo: Loo,
    /// The persisted report
    pub report: Report,
    /// Whether the loo was newly created rather than merged into
    pub created: bool,
    pub warnings: Vec<MergeWarning>,
}

/// Failures surfaced by [`MergeEngine::submit_report`](super::MergeEngine::submit_report).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MergeError {
    /// The candidate was rejected before any write
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Version conflicts persisted through every retry
    #[error("concurrent update conflict: gave up after {attempts} attempts")]
    ConcurrentUpdateConflict { attempts: u32 },

    /// The backing store failed
    #[error(transparent)]
    Store(#[from] StoreError),
}
