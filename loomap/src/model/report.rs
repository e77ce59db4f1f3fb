//! Immutable user submissions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{geojson, LooProperties, ReportId, ValidationError, DEFAULT_TRUST, MAX_TRUST, MIN_TRUST};
use crate::geohash::{self, GeoPoint};

/// An unvalidated submission, as it arrives from a caller.
///
/// Turned into a [`Report`] by [`Report::new`], which is the only path
/// that stamps the geohash and timestamps.
#[derive(Debug, Clone)]
pub struct ReportDraft {
    pub geometry: GeoPoint,
    pub attribution: String,
    pub origin: String,
    pub trust: i8,
    pub properties: LooProperties,
}

impl ReportDraft {
    /// Create a draft with default trust and empty properties.
    pub fn new(
        geometry: GeoPoint,
        attribution: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            geometry,
            attribution: attribution.into(),
            origin: origin.into(),
            trust: DEFAULT_TRUST,
            properties: LooProperties::default(),
        }
    }

    /// Set the submitter's declared trust.
    pub fn with_trust(mut self, trust: i8) -> Self {
        self.trust = trust;
        self
    }

    /// Set the claimed facility attributes.
    pub fn with_properties(mut self, properties: LooProperties) -> Self {
        self.properties = properties;
        self
    }
}

/// A single attributed claim about a facility at a point in time.
///
/// Append-only: a report is never mutated after construction. Corrections
/// are new reports. All fields are public for read access; treat them as
/// frozen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    #[serde(with = "geojson")]
    pub geometry: GeoPoint,
    pub properties: LooProperties,
    /// Person or organisation responsible for the claim; never empty
    pub attribution: String,
    /// System or channel the report arrived through
    pub origin: String,
    /// Submitter's declared trust, -1..=10
    pub trust: i8,
    pub geohash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Report {
    /// Validate a draft and construct the immutable report.
    ///
    /// The geohash is computed here, before any store write; no store
    /// hook or save-time lifecycle recomputes it implicitly.
    ///
    /// # Errors
    ///
    /// Rejects an empty (after trimming) attribution, out-of-range or
    /// non-finite geometry, and trust outside -1..=10.
    pub fn new(
        draft: ReportDraft,
        now: DateTime<Utc>,
        geohash_precision: usize,
    ) -> Result<Self, ValidationError> {
        let attribution = draft.attribution.trim().to_string();
        if attribution.is_empty() {
            return Err(ValidationError::EmptyAttribution);
        }
        if !(MIN_TRUST..=MAX_TRUST).contains(&draft.trust) {
            return Err(ValidationError::TrustOutOfRange(draft.trust));
        }
        let geohash = geohash::encode(&draft.geometry, geohash_precision)?;

        Ok(Self {
            id: ReportId::generate(),
            geometry: draft.geometry,
            properties: draft.properties,
            attribution,
            origin: draft.origin.trim().to_string(),
            trust: draft.trust,
            geohash,
            created_at: now,
            updated_at: now,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use crate::geohash::{GeohashError, DEFAULT_PRECISION};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 8, 24, 12, 0, 0).unwrap()
    }

    #[test]
    fn new_stamps_geohash_and_timestamps() {
        let draft = ReportDraft::new(GeoPoint::new(-0.1, 51.5), "alice", "api");
        let report = Report::new(draft, now(), DEFAULT_PRECISION).unwrap();

        assert_eq!(report.geohash.len(), DEFAULT_PRECISION);
        assert_eq!(
            report.geohash,
            geohash::encode(&report.geometry, DEFAULT_PRECISION).unwrap()
        );
        assert_eq!(report.created_at, now());
        assert_eq!(report.updated_at, now());
        assert_eq!(report.trust, DEFAULT_TRUST);
    }

    #[test]
    fn new_rejects_empty_attribution() {
        let draft = ReportDraft::new(GeoPoint::new(-0.1, 51.5), "   ", "api");
        let result = Report::new(draft, now(), DEFAULT_PRECISION);
        assert_eq!(result.unwrap_err(), ValidationError::EmptyAttribution);
    }

    #[test]
    fn new_rejects_out_of_range_trust() {
        let draft = ReportDraft::new(GeoPoint::new(-0.1, 51.5), "alice", "api").with_trust(11);
        let result = Report::new(draft, now(), DEFAULT_PRECISION);
        assert_eq!(result.unwrap_err(), ValidationError::TrustOutOfRange(11));
    }

    #[test]
    fn new_rejects_invalid_geometry() {
        let draft = ReportDraft::new(GeoPoint::new(-0.1, 99.0), "alice", "api");
        let result = Report::new(draft, now(), DEFAULT_PRECISION);
        assert_eq!(
            result.unwrap_err(),
            ValidationError::Geometry(GeohashError::InvalidLatitude(99.0))
        );
    }
}
