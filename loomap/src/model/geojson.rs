//! Serde adapter for GeoJSON point geometry.
//!
//! Persists a [`GeoPoint`] as `{"type": "Point", "coordinates": [lon, lat]}`.
//! Coordinate order is longitude first, per GeoJSON; the adapter is the
//! single place that order is spelled out on the wire.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::geohash::GeoPoint;

#[derive(Serialize, Deserialize)]
struct PointGeometry {
    #[serde(rename = "type")]
    kind: String,
    coordinates: [f64; 2],
}

pub fn serialize<S>(point: &GeoPoint, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    PointGeometry {
        kind: "Point".to_string(),
        coordinates: [point.longitude, point.latitude],
    }
    .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<GeoPoint, D::Error>
where
    D: Deserializer<'de>,
{
    let geometry = PointGeometry::deserialize(deserializer)?;
    if geometry.kind != "Point" {
        return Err(D::Error::custom(format!(
            "geometry type must be \"Point\", got {:?}",
            geometry.kind
        )));
    }
    Ok(GeoPoint::new(geometry.coordinates[0], geometry.coordinates[1]))
}
