//! Integration tests for the full submission flow.
//!
//! These exercise the engine against the in-memory stores end to end:
//! proximity matching across geohash cell edges, and the no-lost-updates
//! guarantee under concurrent submissions to the same location.
//!
//! Run with: `cargo test --test merge_integration`

use std::collections::BTreeSet;
use std::sync::Arc;
use std::thread;

use chrono::{TimeZone, Utc};

use loomap::clock::FixedClock;
use loomap::credibility::{CredibilityAggregator, CredibilityConfig};
use loomap::geohash::GeoPoint;
use loomap::merge::{MergeConfig, MergeEngine};
use loomap::model::{LooProperties, ReportDraft};
use loomap::store::{LooStore, MemoryLooStore, MemoryReportStore};

fn engine_with_stores() -> (Arc<MergeEngine>, Arc<MemoryLooStore>) {
    let reports = Arc::new(MemoryReportStore::new());
    let loos = Arc::new(MemoryLooStore::new());
    let clock = Arc::new(FixedClock::new(
        Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap(),
    ));
    let aggregator = CredibilityAggregator::new(CredibilityConfig::default(), clock.clone());
    let engine = Arc::new(MergeEngine::new(
        reports,
        loos.clone(),
        aggregator,
        clock,
        MergeConfig::default(),
    ));
    (engine, loos)
}

#[test]
fn concurrent_submissions_to_one_location_lose_nothing() {
    let (engine, loos) = engine_with_stores();
    let submitters = 16;

    thread::scope(|scope| {
        for index in 0..submitters {
            let engine = engine.clone();
            scope.spawn(move || {
                // Jitter of a few metres, all inside the match radius
                let point = GeoPoint::new(
                    -0.1 + f64::from(index % 4) * 0.000_01,
                    51.5 + f64::from(index / 4) * 0.000_01,
                );
                let draft = ReportDraft::new(point, format!("witness-{}", index), "api");
                engine.submit_report(draft).unwrap();
            });
        }
    });

    assert_eq!(loos.len(), 1, "all submissions must converge on one loo");
    let loo = loos
        .query_by_geohash_prefixes(&["".to_string()])
        .unwrap()
        .pop()
        .unwrap();
    let expected: BTreeSet<String> = (0..submitters)
        .map(|index| format!("witness-{}", index))
        .collect();
    assert_eq!(loo.attributions, expected);
    assert_eq!(loo.reports.len(), submitters as usize);
}

#[test]
fn concurrent_submissions_to_distant_locations_stay_independent() {
    let (engine, loos) = engine_with_stores();

    thread::scope(|scope| {
        for index in 0..8 {
            let engine = engine.clone();
            scope.spawn(move || {
                // A kilometre apart each, far outside the match radius
                let point = GeoPoint::new(-0.1 + f64::from(index) * 0.015, 51.5);
                let draft = ReportDraft::new(point, format!("witness-{}", index), "api");
                let outcome = engine.submit_report(draft).unwrap();
                assert!(outcome.created);
            });
        }
    });

    assert_eq!(loos.len(), 8);
}

#[test]
fn merge_works_across_geohash_cell_edges() {
    let (engine, loos) = engine_with_stores();

    // Greenwich: points straddling the prime meridian share no geohash
    // prefix at all, yet sit a couple of metres apart.
    let west = engine
        .submit_report(ReportDraft::new(
            GeoPoint::new(-0.000_01, 51.48),
            "alice",
            "api",
        ))
        .unwrap();
    let east = engine
        .submit_report(ReportDraft::new(
            GeoPoint::new(0.000_01, 51.48),
            "bob",
            "api",
        ))
        .unwrap();

    assert!(west.created);
    assert!(!east.created, "meridian-straddling reports must merge");
    assert_eq!(east.loo.id, west.loo.id);
    assert_eq!(loos.len(), 1);
}

#[test]
fn submission_pipeline_end_to_end() {
    let (engine, _loos) = engine_with_stores();

    let outcome = engine
        .submit_report(
            ReportDraft::new(GeoPoint::new(-2.5879, 51.4545), "bristol-cc", "import")
                .with_trust(7)
                .with_properties(LooProperties {
                    name: Some("Harbourside toilets".to_string()),
                    opening: Some("Mo-Su 08:00-18:00".to_string()),
                    fee: Some("free".to_string()),
                    baby_change: Some(true),
                    ..Default::default()
                }),
        )
        .unwrap();

    let verification = engine
        .submit_report(
            ReportDraft::new(GeoPoint::new(-2.58791, 51.45451), "visitor-1", "web")
                .with_trust(5)
                .with_properties(LooProperties {
                    fee: Some("20p".to_string()),
                    ..Default::default()
                }),
        )
        .unwrap();

    let loo = &verification.loo;
    assert_eq!(loo.id, outcome.loo.id);
    // The importer's trust-7 fee claim survives the trust-5 correction
    assert_eq!(loo.properties.fee.as_deref(), Some("free"));
    assert_eq!(loo.properties.name.as_deref(), Some("Harbourside toilets"));
    assert_eq!(loo.properties.baby_change, Some(true));
    assert_eq!(loo.reports.len(), 2);
    assert!(loo.credibility > outcome.loo.credibility - 1e-9);
}
