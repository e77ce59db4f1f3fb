//! Report-to-loo merge orchestration.
//!
//! [`MergeEngine::submit_report`] is the single write path into the
//! registry: it validates a submission, finds or creates the matching
//! canonical loo via geohash-prefix proximity plus a true-distance
//! filter, folds the report into the loo's merged view under the trust
//! policy, recomputes geohash and credibility, and commits both records.

mod engine;
mod fold;
mod types;

pub use engine::MergeEngine;
pub use types::{MergeConfig, MergeError, MergeWarning, SubmitOutcome};

#[cfg(test)]
mod tests;
