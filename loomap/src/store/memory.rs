//! In-memory store implementations.
//!
//! Backed by `DashMap`: concurrent reads, per-shard write locks, and an
//! entry API that gives `MemoryLooStore::put` its compare-and-swap. These
//! are the reference implementations used by tests and embedders; a
//! production deployment supplies its own document store behind the same
//! traits.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use super::r#trait::{LooStore, ReportStore};
use super::types::StoreError;
use crate::model::{Loo, LooId, Report, ReportId};

/// In-memory append-only report storage.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: DashMap<ReportId, Report>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }
}

impl ReportStore for MemoryReportStore {
    fn put(&self, report: Report) -> Result<(), StoreError> {
        self.reports.insert(report.id.clone(), report);
        Ok(())
    }

    fn get(&self, id: &ReportId) -> Result<Option<Report>, StoreError> {
        Ok(self.reports.get(id).map(|entry| entry.value().clone()))
    }
}

/// In-memory versioned loo storage with linear prefix scans.
///
/// The prefix scan is O(n) over all loos; fine for tests and small
/// embedded datasets, where a real store would use its geohash index.
#[derive(Debug, Default)]
pub struct MemoryLooStore {
    loos: DashMap<LooId, Loo>,
}

impl MemoryLooStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored loos.
    pub fn len(&self) -> usize {
        self.loos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.loos.is_empty()
    }
}

impl LooStore for MemoryLooStore {
    fn put(&self, loo: Loo) -> Result<Loo, StoreError> {
        match self.loos.entry(loo.id.clone()) {
            Entry::Occupied(mut occupied) => {
                let current = occupied.get().version;
                if loo.version != current {
                    return Err(StoreError::VersionConflict {
                        id: loo.id,
                        attempted: loo.version,
                        current,
                    });
                }
                let mut committed = loo;
                committed.version += 1;
                occupied.insert(committed.clone());
                Ok(committed)
            }
            Entry::Vacant(vacant) => {
                if loo.version != 0 {
                    return Err(StoreError::VersionConflict {
                        id: loo.id,
                        attempted: loo.version,
                        current: 0,
                    });
                }
                let mut committed = loo;
                committed.version = 1;
                vacant.insert(committed.clone());
                Ok(committed)
            }
        }
    }

    fn get(&self, id: &LooId) -> Result<Option<Loo>, StoreError> {
        Ok(self.loos.get(id).map(|entry| entry.value().clone()))
    }

    fn query_by_geohash_prefixes(&self, prefixes: &[String]) -> Result<Vec<Loo>, StoreError> {
        let mut matches = Vec::new();
        for entry in self.loos.iter() {
            let loo = entry.value();
            if prefixes.iter().any(|prefix| loo.geohash.starts_with(prefix)) {
                matches.push(loo.clone());
            }
        }
        Ok(matches)
    }
}
