//! Store trait definitions for dependency injection.
//!
//! The engine is persistence-agnostic: production deployments back these
//! traits with a document store whose spatial index handles the prefix
//! scan; the in-memory implementations serve tests and embedding.

use super::types::StoreError;
use crate::model::{Loo, LooId, Report, ReportId};

/// Append-only storage for reports.
///
/// Reports are immutable: `put` is only ever called once per id, and
/// nothing here updates or deletes.
pub trait ReportStore: Send + Sync {
    /// Persist a new report.
    fn put(&self, report: Report) -> Result<(), StoreError>;

    /// Fetch a report by id.
    fn get(&self, id: &ReportId) -> Result<Option<Report>, StoreError>;

    /// Fetch several reports, preserving the requested order.
    ///
    /// Ids that are unknown to the store are skipped. This is the two-step
    /// fetch used when rebuilding a loo's merged view; the engine never
    /// assumes the store can join loo and report records itself.
    fn get_many(&self, ids: &[ReportId]) -> Result<Vec<Report>, StoreError> {
        let mut reports = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(report) = self.get(id)? {
                reports.push(report);
            }
        }
        Ok(reports)
    }
}

/// Versioned storage for canonical loos, with geohash-prefix lookup.
pub trait LooStore: Send + Sync {
    /// Persist a loo, subject to an optimistic version check.
    ///
    /// Accepted iff the incoming `version` matches the currently stored
    /// version (or the id is absent and `version` is 0). On success the
    /// store bumps the version and returns the committed record; on
    /// mismatch it returns [`StoreError::VersionConflict`] and writes
    /// nothing.
    fn put(&self, loo: Loo) -> Result<Loo, StoreError>;

    /// Fetch a loo by id.
    fn get(&self, id: &LooId) -> Result<Option<Loo>, StoreError>;

    /// All loos whose geohash starts with any of the given prefixes.
    ///
    /// A proximity pre-filter only: results may include loos far from the
    /// query point (prefix cells are large) and may be slightly stale with
    /// respect to concurrent writes. The engine post-filters by true
    /// distance and re-reads by id before merging.
    fn query_by_geohash_prefixes(&self, prefixes: &[String]) -> Result<Vec<Loo>, StoreError>;
}
