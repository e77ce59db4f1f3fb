//! The merge orchestrator.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex};

use dashmap::DashMap;
use tracing::{debug, info, warn};

use super::fold::PropertyFold;
use super::types::{MergeConfig, MergeError, MergeWarning, SubmitOutcome};
use crate::clock::Clock;
use crate::credibility::CredibilityAggregator;
use crate::geohash;
use crate::model::{Loo, LooId, LooProperties, Report, ReportDraft, ValidationError};
use crate::store::{LooStore, ReportStore, StoreError};

/// Merges incoming reports into canonical loos.
///
/// Stateless apart from per-cell merge locks: each
/// [`submit_report`](Self::submit_report) call may run concurrently with
/// others. Submissions that could touch the same geohash cells are
/// serialized through those locks, and the store's optimistic version
/// check backstops writers that bypass this engine instance; together
/// they guarantee no two successful writes silently clobber each other's
/// merge. Submissions to disjoint cells proceed fully in parallel.
pub struct MergeEngine {
    reports: Arc<dyn ReportStore>,
    loos: Arc<dyn LooStore>,
    aggregator: CredibilityAggregator,
    clock: Arc<dyn Clock>,
    config: MergeConfig,
    cell_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl MergeEngine {
    pub fn new(
        reports: Arc<dyn ReportStore>,
        loos: Arc<dyn LooStore>,
        aggregator: CredibilityAggregator,
        clock: Arc<dyn Clock>,
        config: MergeConfig,
    ) -> Self {
        Self {
            reports,
            loos,
            aggregator,
            clock,
            config,
            cell_locks: DashMap::new(),
        }
    }

    /// Validate, persist, and merge a submission into the registry.
    ///
    /// Finds the canonical loo for the report's location (creating one if
    /// nothing is within the match radius), folds the report into its
    /// merged view, recomputes geohash and credibility, and commits both
    /// records. The loo write is the commit point: a report that never
    /// gets referenced by a committed loo is unobservable, so the pair is
    /// atomic from the caller's perspective without two-phase commit.
    ///
    /// # Errors
    ///
    /// - [`MergeError::Validation`] before any write, for a malformed
    ///   draft
    /// - [`MergeError::ConcurrentUpdateConflict`] when version conflicts
    ///   persist through every retry
    /// - [`MergeError::Store`] when the backing store fails
    pub fn submit_report(&self, draft: ReportDraft) -> Result<SubmitOutcome, MergeError> {
        let report = Report::new(draft, self.clock.now(), self.config.geohash_precision)?;
        let prefixes =
            geohash::prefixes_within_radius(&report.geometry, self.config.match_radius_m)
                .map_err(ValidationError::from)?;

        // Serialize against other submissions that could match the same
        // cells. The prefix list is sorted, so every thread acquires in
        // the same order and the guards cannot deadlock.
        let cells: Vec<Arc<Mutex<()>>> = prefixes
            .iter()
            .map(|prefix| {
                let entry = self.cell_locks.entry(prefix.clone()).or_default();
                Arc::clone(entry.value())
            })
            .collect();
        let _guards: Vec<_> = cells
            .iter()
            .map(|cell| cell.lock().expect("cell lock poisoned"))
            .collect();

        self.reports.put(report.clone())?;

        let attempts = self.config.max_put_retries.saturating_add(1);
        for attempt in 0..attempts {
            let mut warnings = Vec::new();
            let candidates = self.loos.query_by_geohash_prefixes(&prefixes)?;
            // Prefix matches include far-away loos in the same cells;
            // only true distance decides.
            let mut nearby: Vec<(f64, Loo)> = candidates
                .into_iter()
                .map(|loo| (geohash::distance_m(&report.geometry, &loo.geometry), loo))
                .filter(|(distance, _)| *distance <= self.config.match_radius_m)
                .collect();
            nearby.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(Ordering::Equal));

            let put_result = if let Some((distance, nearest)) = nearby.first() {
                if nearby.len() > 1 {
                    warn!(
                        report = %report.id,
                        chosen = %nearest.id,
                        matched = nearby.len(),
                        nearest_m = distance,
                        "ambiguous merge: multiple loos within match radius"
                    );
                    warnings.push(MergeWarning::AmbiguousMatch {
                        matched: nearby.len(),
                        chosen: nearest.id.clone(),
                        nearest_m: *distance,
                    });
                }
                // The prefix query may be stale; merge against the latest
                // committed version.
                let latest = self
                    .loos
                    .get(&nearest.id)?
                    .unwrap_or_else(|| nearest.clone());
                let merged = self.merge_into(latest, &report)?;
                self.loos.put(merged)
            } else {
                self.loos.put(self.seed_loo(&report)?)
            };

            match put_result {
                Ok(committed) => {
                    let created = committed.reports.len() == 1;
                    info!(
                        loo = %committed.id,
                        report = %report.id,
                        created,
                        credibility = committed.credibility,
                        "report merged"
                    );
                    return Ok(SubmitOutcome {
                        loo: committed,
                        report,
                        created,
                        warnings,
                    });
                }
                Err(StoreError::VersionConflict { id, .. }) => {
                    debug!(loo = %id, attempt, "version conflict, re-merging against latest");
                    continue;
                }
                Err(err) => return Err(err.into()),
            }
        }

        Err(MergeError::ConcurrentUpdateConflict { attempts })
    }

    /// Whether a loo is open at the given instant, by id.
    ///
    /// Convenience over [`Loo::is_open`] for callers holding only an id.
    pub fn is_open_now(&self, id: &LooId) -> Result<Option<crate::hours::OpenState>, MergeError> {
        let now = self.clock.now();
        Ok(self.loos.get(id)?.map(|loo| loo.is_open(&now)))
    }

    /// Build a brand-new loo seeded 1:1 from a single report.
    fn seed_loo(&self, report: &Report) -> Result<Loo, MergeError> {
        let reports = std::slice::from_ref(report);
        let fold = PropertyFold::fold(reports);
        let now = self.clock.now();
        let mut properties = fold.properties;
        self.apply_defaults(&mut properties);

        Ok(Loo {
            id: LooId::generate(),
            geohash: geohash::encode(&fold.geometry, self.config.geohash_precision)
                .map_err(ValidationError::from)?,
            geometry: fold.geometry,
            properties,
            sources: fold.sources,
            attributions: fold.attributions,
            reports: vec![report.id.clone()],
            credibility: self.aggregator.score(reports),
            version: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Re-derive a loo's merged view with one more report folded in.
    fn merge_into(&self, latest: Loo, report: &Report) -> Result<Loo, MergeError> {
        let mut constituents = self.reports.get_many(&latest.reports)?;
        constituents.push(report.clone());

        let fold = PropertyFold::fold(&constituents);
        let mut properties = fold.properties;
        self.apply_defaults(&mut properties);

        let mut loo = latest;
        loo.geometry = fold.geometry;
        loo.geohash = geohash::encode(&fold.geometry, self.config.geohash_precision)
            .map_err(ValidationError::from)?;
        loo.properties = properties;
        loo.sources = fold.sources;
        loo.attributions = fold.attributions;
        loo.reports.push(report.id.clone());
        loo.credibility = self.aggregator.score(&constituents);
        loo.updated_at = self.clock.now();
        Ok(loo)
    }

    /// Fill schema-level defaults for fields no report has stated.
    fn apply_defaults(&self, properties: &mut LooProperties) {
        if properties.access.is_none() {
            properties.access = Some(self.config.default_access.clone());
        }
        if properties.active.is_none() {
            properties.active = Some(self.config.default_active);
        }
    }
}
