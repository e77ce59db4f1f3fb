//! Canonical facility records.

use std::collections::BTreeSet;

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use super::{geojson, LooId, LooProperties, ReportId};
use crate::geohash::GeoPoint;
use crate::hours::{OpenState, WeeklySchedule};

/// The canonical record for one physical facility, derived entirely from
/// its reports.
///
/// Invariants, maintained by the merge engine and never hand-edited:
///
/// - `reports` is non-empty and in arrival order
/// - `geohash` always equals the encoding of `geometry`
/// - `sources` / `attributions` are the union over all constituent reports
/// - `credibility` is recomputable from the constituent reports alone
///
/// `version` is the optimistic-concurrency revision checked by
/// [`LooStore::put`](crate::store::LooStore::put); it is store-level
/// bookkeeping, not part of the facility data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loo {
    pub id: LooId,
    #[serde(with = "geojson")]
    pub geometry: GeoPoint,
    pub properties: LooProperties,
    pub geohash: String,
    pub sources: BTreeSet<String>,
    pub attributions: BTreeSet<String>,
    /// Constituent report ids, insertion order = arrival order
    pub reports: Vec<ReportId>,
    pub credibility: f64,
    #[serde(default)]
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Loo {
    /// Whether a report already contributes to this loo.
    pub fn contains_report(&self, id: &ReportId) -> bool {
        self.reports.iter().any(|existing| existing == id)
    }

    /// Parse this loo's opening-hours string into a weekly schedule.
    ///
    /// An absent `opening` property yields an all-unknown schedule.
    pub fn schedule(&self) -> WeeklySchedule {
        match &self.properties.opening {
            Some(opening) => WeeklySchedule::parse(opening),
            None => WeeklySchedule::default(),
        }
    }

    /// Whether the facility is open at the given instant.
    pub fn is_open<Tz: TimeZone>(&self, instant: &DateTime<Tz>) -> OpenState {
        self.schedule().is_open(instant)
    }
}
