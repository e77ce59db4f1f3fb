//! Geohash type definitions

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Valid latitude range in degrees
pub const MIN_LAT: f64 = -90.0;
pub const MAX_LAT: f64 = 90.0;

/// Valid longitude range in degrees
pub const MIN_LON: f64 = -180.0;
pub const MAX_LON: f64 = 180.0;

/// Geohash precision bounds (characters).
///
/// Precision 9 resolves to roughly a 5 m × 5 m cell, which is finer than
/// any realistic submission accuracy, so it is the default for stamping
/// records. Coarser precisions are used for proximity bucketing.
pub const MIN_PRECISION: usize = 1;
pub const MAX_PRECISION: usize = 12;
pub const DEFAULT_PRECISION: usize = 9;

/// A geographic point in WGS-84 degrees.
///
/// Field order follows the GeoJSON convention: serialized coordinate pairs
/// are `[longitude, latitude]`. Swapping the two is the classic bug this
/// type exists to prevent, so construction goes through [`GeoPoint::new`]
/// and the serialized form is pinned by tests.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

impl GeoPoint {
    /// Create a point from longitude and latitude in degrees.
    ///
    /// Does not validate; call [`GeoPoint::validate`] before encoding or
    /// persisting.
    pub fn new(longitude: f64, latitude: f64) -> Self {
        Self {
            longitude,
            latitude,
        }
    }

    /// Check that both coordinates are finite and within range.
    pub fn validate(&self) -> Result<(), GeohashError> {
        if !self.latitude.is_finite() || !(MIN_LAT..=MAX_LAT).contains(&self.latitude) {
            return Err(GeohashError::InvalidLatitude(self.latitude));
        }
        if !self.longitude.is_finite() || !(MIN_LON..=MAX_LON).contains(&self.longitude) {
            return Err(GeohashError::InvalidLongitude(self.longitude));
        }
        Ok(())
    }
}

/// Bounding box of a geohash cell, in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lon: f64,
    pub max_lon: f64,
}

impl GeoBounds {
    /// Center point of the cell.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }

    /// Half the cell height in degrees (maximum latitude decode error).
    pub fn lat_error(&self) -> f64 {
        (self.max_lat - self.min_lat) / 2.0
    }

    /// Half the cell width in degrees (maximum longitude decode error).
    pub fn lon_error(&self) -> f64 {
        (self.max_lon - self.min_lon) / 2.0
    }
}

/// Errors that can occur during geohash encoding or decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeohashError {
    /// Latitude out of range or non-finite
    #[error("invalid latitude: {0} (must be finite, -90 to 90)")]
    InvalidLatitude(f64),

    /// Longitude out of range or non-finite
    #[error("invalid longitude: {0} (must be finite, -180 to 180)")]
    InvalidLongitude(f64),

    /// Requested precision outside the supported range
    #[error("invalid precision: {0} (must be 1 to 12)")]
    InvalidPrecision(usize),

    /// Geohash string is empty or contains a non-alphabet character
    #[error("invalid geohash character {character:?} at position {position}")]
    InvalidCharacter { character: char, position: usize },

    /// Geohash string is empty
    #[error("empty geohash string")]
    Empty,

    /// Search radius must be finite and positive
    #[error("invalid radius: {0} metres (must be finite and positive)")]
    InvalidRadius(f64),
}
