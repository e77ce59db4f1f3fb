//! Credibility scoring for canonical loos.
//!
//! A loo's credibility is a pure function of its constituent reports and
//! the clock: recompute it from the same reports at the same instant and
//! you get the same number. The engine recomputes it on every merge, so
//! it can never drift from the reports it summarises.
//!
//! # Scoring
//!
//! 1. Reports are grouped by attribution and each attribution is reduced
//!    to its most recent report. A submitter repeating themselves does not
//!    gain weight; only their freshest claim counts.
//! 2. Each attribution contributes `trust * 0.5 ^ (age_days / half_life)`,
//!    so year-old corroboration (at the default 365-day half-life) counts
//!    half as much as today's.
//! 3. Contributions are sorted descending (ties broken by attribution
//!    string, for determinism) and the k-th one is weighted `1/2^k`:
//!    independent corroboration keeps raising the score, with diminishing
//!    returns, and the sum is bounded.
//! 4. The result is clamped to the per-report trust range, -1 to 10.
//!
//! Adding a report with a new, distinct attribution and non-negative trust
//! never lowers the score: the new contribution is non-negative, and every
//! contribution it displaces downward is no larger than itself, so the
//! halved tail loses less than the new term adds.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Arc;

use crate::clock::Clock;
use crate::model::Report;


/// Scoring constants.
///
/// The half-life controls recency decay; the bounds match the per-report
/// trust range.
#[derive(Debug, Clone)]
pub struct CredibilityConfig {
    /// Days for a contribution to decay to half weight (default 365)
    pub half_life_days: f64,
    /// Lower clamp for the final score (default -1)
    pub min_score: f64,
    /// Upper clamp for the final score (default 10)
    pub max_score: f64,
}

impl Default for CredibilityConfig {
    fn default() -> Self {
        Self {
            half_life_days: 365.0,
            min_score: -1.0,
            max_score: 10.0,
        }
    }
}

/// Computes a trust score for a set of reports.
pub struct CredibilityAggregator {
    config: CredibilityConfig,
    clock: Arc<dyn Clock>,
}

impl CredibilityAggregator {
    pub fn new(config: CredibilityConfig, clock: Arc<dyn Clock>) -> Self {
        Self { config, clock }
    }

    /// Score a loo's constituent reports.
    ///
    /// Deterministic for a fixed clock instant; bounded to
    /// `[min_score, max_score]`. An empty slice scores 0.
    pub fn score(&self, reports: &[Report]) -> f64 {
        if reports.is_empty() {
            return 0.0;
        }
        let now = self.clock.now();

        // Most recent report per attribution; later slice position wins a
        // created_at tie, matching arrival order.
        let mut freshest: HashMap<&str, &Report> = HashMap::new();
        for report in reports {
            freshest
                .entry(report.attribution.as_str())
                .and_modify(|held| {
                    if report.created_at >= held.created_at {
                        *held = report;
                    }
                })
                .or_insert(report);
        }

        let mut contributions: Vec<(f64, &str)> = freshest
            .into_iter()
            .map(|(attribution, report)| {
                let age_days = (now - report.created_at).num_seconds().max(0) as f64 / 86_400.0;
                let decay = 0.5_f64.powf(age_days / self.config.half_life_days);
                (f64::from(report.trust) * decay, attribution)
            })
            .collect();

        contributions.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.1.cmp(b.1))
        });

        let mut score = 0.0;
        let mut weight = 1.0;
        for (contribution, _) in contributions {
            score += contribution * weight;
            weight /= 2.0;
        }

        score.clamp(self.config.min_score, self.config.max_score)
    }
}
