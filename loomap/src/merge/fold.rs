//! Trust-weighted property fold.
//!
//! The merged view of a loo is a pure fold over its reports in arrival
//! order: each scalar property is held by the report that set it, and a
//! later report overwrites it only with trust at least as high as the
//! holder's (equal trust prefers the newer claim). Set-valued fields
//! union and never shrink. Folding from scratch on every merge keeps the
//! canonical record derivable from its reports alone.

use std::collections::{BTreeSet, HashMap};

use crate::geohash::GeoPoint;
use crate::model::{LooProperties, Report};

/// Accumulator for the merged view of a report sequence.
pub(super) struct PropertyFold {
    pub geometry: GeoPoint,
    pub properties: LooProperties,
    pub sources: BTreeSet<String>,
    pub attributions: BTreeSet<String>,
    geometry_trust: i8,
    field_trust: HashMap<&'static str, i8>,
}

impl PropertyFold {
    /// Fold a non-empty report sequence in arrival order.
    pub fn fold(reports: &[Report]) -> Self {
        debug_assert!(!reports.is_empty(), "a loo always has at least one report");
        let first = &reports[0];
        let mut state = Self {
            geometry: first.geometry,
            properties: LooProperties::default(),
            sources: BTreeSet::new(),
            attributions: BTreeSet::new(),
            geometry_trust: first.trust,
            field_trust: HashMap::new(),
        };
        for report in reports {
            state.absorb(report);
        }
        state
    }

    fn absorb(&mut self, report: &Report) {
        if report.trust >= self.geometry_trust {
            self.geometry = report.geometry;
            self.geometry_trust = report.trust;
        }

        self.attributions.insert(report.attribution.clone());
        if !report.origin.is_empty() {
            self.sources.insert(report.origin.clone());
        }

        let claimed = &report.properties;
        let trust = report.trust;
        self.merge_field("name", &claimed.name, trust, |p| &mut p.name);
        self.merge_field("active", &claimed.active, trust, |p| &mut p.active);
        self.merge_field("access", &claimed.access, trust, |p| &mut p.access);
        self.merge_field("opening", &claimed.opening, trust, |p| &mut p.opening);
        self.merge_field("type", &claimed.kind, trust, |p| &mut p.kind);
        self.merge_field("accessibleType", &claimed.accessible_type, trust, |p| {
            &mut p.accessible_type
        });
        self.merge_field("disposal", &claimed.disposal, trust, |p| &mut p.disposal);
        self.merge_field("babyChange", &claimed.baby_change, trust, |p| {
            &mut p.baby_change
        });
        self.merge_field(
            "babyChangeLocation",
            &claimed.baby_change_location,
            trust,
            |p| &mut p.baby_change_location,
        );
        self.merge_field("changingPlace", &claimed.changing_place, trust, |p| {
            &mut p.changing_place
        });
        self.merge_field("radar", &claimed.radar, trust, |p| &mut p.radar);
        self.merge_field("attended", &claimed.attended, trust, |p| &mut p.attended);
        self.merge_field("automatic", &claimed.automatic, trust, |p| &mut p.automatic);
        self.merge_field("parking", &claimed.parking, trust, |p| &mut p.parking);
        self.merge_field("fee", &claimed.fee, trust, |p| &mut p.fee);
        self.merge_field("streetAddress", &claimed.street_address, trust, |p| {
            &mut p.street_address
        });
        self.merge_field("postcode", &claimed.postcode, trust, |p| &mut p.postcode);
        self.merge_field("operator", &claimed.operator, trust, |p| &mut p.operator);
        self.merge_field("reportEmail", &claimed.report_email, trust, |p| {
            &mut p.report_email
        });
        self.merge_field("reportPhone", &claimed.report_phone, trust, |p| {
            &mut p.report_phone
        });
        self.merge_field("notes", &claimed.notes, trust, |p| &mut p.notes);
        self.merge_field("infoUrl", &claimed.info_url, trust, |p| &mut p.info_url);
        self.merge_field(
            "architecturalInterest",
            &claimed.architectural_interest,
            trust,
            |p| &mut p.architectural_interest,
        );
        self.merge_field(
            "historicalInterest",
            &claimed.historical_interest,
            trust,
            |p| &mut p.historical_interest,
        );
        self.merge_field("geocoded", &claimed.geocoded, trust, |p| &mut p.geocoded);
        self.merge_field("geocodingMethod", &claimed.geocoding_method, trust, |p| {
            &mut p.geocoding_method
        });
    }

    /// Apply one claimed value under the trust policy.
    ///
    /// `None` claims never clear a held value: absence means "unknown".
    fn merge_field<T: Clone>(
        &mut self,
        name: &'static str,
        claimed: &Option<T>,
        trust: i8,
        field: fn(&mut LooProperties) -> &mut Option<T>,
    ) {
        let Some(value) = claimed else {
            return;
        };
        let target = field(&mut self.properties);
        let unset = target.is_none();
        let held_trust = self.field_trust.get(name).copied();
        if unset || held_trust.map_or(true, |held| trust >= held) {
            *target = Some(value.clone());
            self.field_trust.insert(name, trust);
        }
    }
}
