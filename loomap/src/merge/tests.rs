//! Tests for the merge engine

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{TimeZone, Utc};

use super::*;
use crate::clock::FixedClock;
use crate::credibility::{CredibilityAggregator, CredibilityConfig};
use crate::geohash::{self, GeoPoint};
use crate::hours::OpenState;
use crate::model::{Loo, LooId, LooProperties, Report, ReportDraft};
use crate::store::{LooStore, MemoryLooStore, MemoryReportStore, ReportStore, StoreError};

struct Fixture {
    engine: MergeEngine,
    reports: Arc<MemoryReportStore>,
    loos: Arc<MemoryLooStore>,
    clock: Arc<FixedClock>,
}

// 2026-08-24 is a Monday
fn pinned_now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap()
}

fn fixture() -> Fixture {
    let reports = Arc::new(MemoryReportStore::new());
    let loos = Arc::new(MemoryLooStore::new());
    let clock = Arc::new(FixedClock::new(pinned_now()));
    let aggregator = CredibilityAggregator::new(CredibilityConfig::default(), clock.clone());
    let engine = MergeEngine::new(
        reports.clone(),
        loos.clone(),
        aggregator,
        clock.clone(),
        MergeConfig::default(),
    );
    Fixture {
        engine,
        reports,
        loos,
        clock,
    }
}

fn draft_at(point: GeoPoint, attribution: &str) -> ReportDraft {
    ReportDraft::new(point, attribution, "api")
}

#[test]
fn first_report_creates_loo() {
    let fx = fixture();
    let outcome = fx
        .engine
        .submit_report(draft_at(GeoPoint::new(-0.1, 51.5), "alice"))
        .unwrap();

    assert!(outcome.created);
    assert!(outcome.warnings.is_empty());
    let loo = &outcome.loo;
    assert_eq!(loo.reports, vec![outcome.report.id.clone()]);
    assert!(loo.contains_report(&outcome.report.id));
    assert_eq!(loo.attributions, BTreeSet::from(["alice".to_string()]));
    assert_eq!(loo.sources, BTreeSet::from(["api".to_string()]));
    assert_eq!(loo.geohash, geohash::encode(&loo.geometry, 9).unwrap());
    assert!((loo.credibility - 5.0).abs() < 1e-9);
    // Schema defaults applied when no report states them
    assert_eq!(loo.properties.access.as_deref(), Some("public"));
    assert_eq!(loo.properties.active, Some(true));

    assert_eq!(fx.reports.len(), 1);
    assert_eq!(fx.loos.len(), 1);
}

#[test]
fn nearby_report_merges_and_higher_trust_wins() {
    let fx = fixture();
    let first = fx
        .engine
        .submit_report(
            draft_at(GeoPoint::new(-0.1, 51.5), "alice")
                .with_trust(5)
                .with_properties(LooProperties {
                    fee: Some("none".to_string()),
                    ..Default::default()
                }),
        )
        .unwrap();

    // ~13 m away, inside the 25 m match radius
    let second = fx
        .engine
        .submit_report(
            draft_at(GeoPoint::new(-0.1001, 51.5001), "bob")
                .with_trust(8)
                .with_properties(LooProperties {
                    fee: Some("20p".to_string()),
                    ..Default::default()
                }),
        )
        .unwrap();

    assert!(!second.created);
    assert_eq!(second.loo.id, first.loo.id);
    assert_eq!(second.loo.properties.fee.as_deref(), Some("20p"));
    assert_eq!(
        second.loo.attributions,
        BTreeSet::from(["alice".to_string(), "bob".to_string()])
    );
    assert_eq!(second.loo.reports.len(), 2);
    assert_eq!(fx.loos.len(), 1);
}

#[test]
fn distant_report_creates_second_loo() {
    let fx = fixture();
    fx.engine
        .submit_report(draft_at(GeoPoint::new(-0.1, 51.5), "alice"))
        .unwrap();
    // ~220 m north, well outside the match radius
    let outcome = fx
        .engine
        .submit_report(draft_at(GeoPoint::new(-0.1, 51.502), "bob"))
        .unwrap();

    assert!(outcome.created);
    assert_eq!(fx.loos.len(), 2);
}

#[test]
fn duplicate_submission_is_idempotent_except_report_history() {
    let fx = fixture();
    let draft = draft_at(GeoPoint::new(-0.1, 51.5), "alice").with_properties(LooProperties {
        fee: Some("none".to_string()),
        ..Default::default()
    });

    let once = fx.engine.submit_report(draft.clone()).unwrap();
    let twice = fx.engine.submit_report(draft).unwrap();

    assert_eq!(twice.loo.id, once.loo.id);
    assert_eq!(twice.loo.properties, once.loo.properties);
    assert_eq!(twice.loo.attributions, once.loo.attributions);
    assert_eq!(twice.loo.geometry, once.loo.geometry);
    assert!((twice.loo.credibility - once.loo.credibility).abs() < 1e-9);
    assert_eq!(twice.loo.reports.len(), 2);
    assert_eq!(fx.loos.len(), 1);
}

#[test]
fn validation_failure_writes_nothing() {
    let fx = fixture();
    let result = fx
        .engine
        .submit_report(draft_at(GeoPoint::new(-0.1, 51.5), "  "));
    assert!(matches!(result, Err(MergeError::Validation(_))));
    assert!(fx.reports.is_empty());
    assert!(fx.loos.is_empty());
}

#[test]
fn ambiguous_match_merges_nearest_and_warns() {
    let fx = fixture();

    // Seed two loos 10 m apart, closer together than the match radius.
    // This state already violates the radius invariant, which is exactly
    // when ambiguity can arise.
    let near = seed_loo(&fx, GeoPoint::new(-0.1, 51.5), "alice");
    let far = seed_loo(&fx, GeoPoint::new(-0.1, 51.50009), "bob");

    // ~2 m from `near`, ~8 m from `far`
    let outcome = fx
        .engine
        .submit_report(draft_at(GeoPoint::new(-0.1, 51.50002), "carol"))
        .unwrap();

    assert!(!outcome.created);
    assert_eq!(outcome.loo.id, near);
    assert_ne!(outcome.loo.id, far);
    assert_eq!(outcome.warnings.len(), 1);
    match &outcome.warnings[0] {
        MergeWarning::AmbiguousMatch {
            matched,
            chosen,
            nearest_m,
        } => {
            assert_eq!(*matched, 2);
            assert_eq!(chosen, &near);
            assert!(*nearest_m < 5.0);
        }
    }
}

#[test]
fn exhausted_version_conflicts_surface() {
    let reports = Arc::new(MemoryReportStore::new());
    let loos = Arc::new(AlwaysConflicting);
    let clock = Arc::new(FixedClock::new(pinned_now()));
    let aggregator = CredibilityAggregator::new(CredibilityConfig::default(), clock.clone());
    let engine = MergeEngine::new(
        reports,
        loos,
        aggregator,
        clock,
        MergeConfig::default().with_max_put_retries(2),
    );

    let result = engine.submit_report(draft_at(GeoPoint::new(-0.1, 51.5), "alice"));
    assert_eq!(
        result.unwrap_err(),
        MergeError::ConcurrentUpdateConflict { attempts: 3 }
    );
}

#[test]
fn is_open_now_consults_merged_schedule() {
    let fx = fixture();
    let outcome = fx
        .engine
        .submit_report(
            draft_at(GeoPoint::new(-0.1, 51.5), "alice").with_properties(LooProperties {
                opening: Some("Mo-Fr 09:00-17:00".to_string()),
                ..Default::default()
            }),
        )
        .unwrap();

    // The clock is pinned to Monday noon
    assert_eq!(
        fx.engine.is_open_now(&outcome.loo.id).unwrap(),
        Some(OpenState::Open)
    );
    fx.clock.set(Utc.with_ymd_and_hms(2026, 8, 24, 17, 0, 0).unwrap());
    assert_eq!(
        fx.engine.is_open_now(&outcome.loo.id).unwrap(),
        Some(OpenState::Closed)
    );
    assert_eq!(fx.engine.is_open_now(&LooId::generate()).unwrap(), None);
}

/// Insert a loo (and its founding report) directly into the stores.
fn seed_loo(fx: &Fixture, point: GeoPoint, attribution: &str) -> LooId {
    let report = Report::new(
        ReportDraft::new(point, attribution, "seed"),
        pinned_now(),
        9,
    )
    .unwrap();
    fx.reports.put(report.clone()).unwrap();
    let loo = Loo {
        id: LooId::generate(),
        geometry: point,
        properties: LooProperties::default(),
        geohash: geohash::encode(&point, 9).unwrap(),
        sources: BTreeSet::from(["seed".to_string()]),
        attributions: BTreeSet::from([attribution.to_string()]),
        reports: vec![report.id.clone()],
        credibility: 5.0,
        version: 0,
        created_at: pinned_now(),
        updated_at: pinned_now(),
    };
    let committed = fx.loos.put(loo).unwrap();
    committed.id
}

/// A loo store whose writes always lose the optimistic version race.
struct AlwaysConflicting;

impl LooStore for AlwaysConflicting {
    fn put(&self, loo: Loo) -> Result<Loo, StoreError> {
        Err(StoreError::VersionConflict {
            id: loo.id,
            attempted: loo.version,
            current: loo.version + 1,
        })
    }

    fn get(&self, _id: &LooId) -> Result<Option<Loo>, StoreError> {
        Ok(None)
    }

    fn query_by_geohash_prefixes(&self, _prefixes: &[String]) -> Result<Vec<Loo>, StoreError> {
        Ok(Vec::new())
    }
}
