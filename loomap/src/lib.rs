//! loomap - Report aggregation for a crowd-sourced facilities registry
//!
//! This library is the write path of a public-facilities map: individual
//! attributed submissions ([`model::Report`]) are merged into canonical,
//! spatially queryable records ([`model::Loo`]) whose attributes are
//! derived, never directly edited.
//!
//! # High-Level API
//!
//! Wire the engine up with stores, a clock, and configuration:
//!
//! ```
//! use std::sync::Arc;
//!
//! use loomap::clock::SystemClock;
//! use loomap::credibility::{CredibilityAggregator, CredibilityConfig};
//! use loomap::geohash::GeoPoint;
//! use loomap::merge::{MergeConfig, MergeEngine};
//! use loomap::model::ReportDraft;
//! use loomap::store::{MemoryLooStore, MemoryReportStore};
//!
//! let clock = Arc::new(SystemClock);
//! let aggregator = CredibilityAggregator::new(CredibilityConfig::default(), clock.clone());
//! let engine = MergeEngine::new(
//!     Arc::new(MemoryReportStore::new()),
//!     Arc::new(MemoryLooStore::new()),
//!     aggregator,
//!     clock,
//!     MergeConfig::default(),
//! );
//!
//! let draft = ReportDraft::new(GeoPoint::new(-0.1, 51.5), "alice", "api");
//! let outcome = engine.submit_report(draft)?;
//! assert!(outcome.created);
//! # Ok::<(), loomap::merge::MergeError>(())
//! ```

pub mod clock;
pub mod credibility;
pub mod geohash;
pub mod hours;
pub mod merge;
pub mod model;
pub mod store;

/// Version of the loomap library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
