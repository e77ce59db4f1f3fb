//! Geohash encoding and proximity bucketing
//!
//! Encodes latitude/longitude pairs into base-32 geohash strings and back,
//! and derives the prefix sets used to pre-filter proximity queries.
//!
//! A geohash prefix match is necessary but not sufficient for proximity:
//! two points a metre apart can land in cells whose hashes share no prefix
//! at all (cell edges, and especially the antimeridian and equator).
//! Callers of [`prefixes_within_radius`] must post-filter candidates by
//! true distance with [`distance_m`].

mod types;

pub use types::{
    GeoBounds, GeoPoint, GeohashError, DEFAULT_PRECISION, MAX_LAT, MAX_LON, MAX_PRECISION,
    MIN_LAT, MIN_LON, MIN_PRECISION,
};


/// Base-32 alphabet used by the geohash scheme (no a, i, l, o).
const ALPHABET: &[u8; 32] = b"0123456789bcdefghjkmnpqrstuvwxyz";

/// Mean metres per degree of latitude.
const METRES_PER_DEG_LAT: f64 = 110_574.0;

/// Metres per degree of longitude at the equator.
const METRES_PER_DEG_LON_EQUATOR: f64 = 111_320.0;

/// Mean Earth radius in metres, for great-circle distance.
const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Encodes a geographic point as a geohash string.
///
/// Deterministic and pure: the same point and precision always produce the
/// same hash.
///
/// # Errors
///
/// Returns an error if either coordinate is non-finite or out of range, or
/// if `precision` is outside 1..=12.
pub fn encode(point: &GeoPoint, precision: usize) -> Result<String, GeohashError> {
    point.validate()?;
    if !(MIN_PRECISION..=MAX_PRECISION).contains(&precision) {
        return Err(GeohashError::InvalidPrecision(precision));
    }

    let (mut lat_lo, mut lat_hi) = (MIN_LAT, MAX_LAT);
    let (mut lon_lo, mut lon_hi) = (MIN_LON, MAX_LON);
    let mut hash = String::with_capacity(precision);
    let mut bits = 0u8;
    let mut index = 0usize;
    // Bits alternate longitude-first within each 5-bit character.
    let mut lon_bit = true;

    while hash.len() < precision {
        if lon_bit {
            let mid = (lon_lo + lon_hi) / 2.0;
            if point.longitude >= mid {
                index = (index << 1) | 1;
                lon_lo = mid;
            } else {
                index <<= 1;
                lon_hi = mid;
            }
        } else {
            let mid = (lat_lo + lat_hi) / 2.0;
            if point.latitude >= mid {
                index = (index << 1) | 1;
                lat_lo = mid;
            } else {
                index <<= 1;
                lat_hi = mid;
            }
        }
        lon_bit = !lon_bit;
        bits += 1;
        if bits == 5 {
            hash.push(ALPHABET[index] as char);
            bits = 0;
            index = 0;
        }
    }

    Ok(hash)
}

/// Decodes a geohash to the bounding box of its cell.
///
/// # Errors
///
/// Returns an error for an empty string or any character outside the
/// geohash alphabet.
pub fn decode_bounds(hash: &str) -> Result<GeoBounds, GeohashError> {
    if hash.is_empty() {
        return Err(GeohashError::Empty);
    }

    let (mut lat_lo, mut lat_hi) = (MIN_LAT, MAX_LAT);
    let (mut lon_lo, mut lon_hi) = (MIN_LON, MAX_LON);
    let mut lon_bit = true;

    for (position, character) in hash.chars().enumerate() {
        let lowered = character.to_ascii_lowercase();
        let index = ALPHABET
            .iter()
            .position(|&c| c as char == lowered)
            .ok_or(GeohashError::InvalidCharacter {
                character,
                position,
            })?;
        for shift in (0..5).rev() {
            let bit = (index >> shift) & 1;
            if lon_bit {
                let mid = (lon_lo + lon_hi) / 2.0;
                if bit == 1 {
                    lon_lo = mid;
                } else {
                    lon_hi = mid;
                }
            } else {
                let mid = (lat_lo + lat_hi) / 2.0;
                if bit == 1 {
                    lat_lo = mid;
                } else {
                    lat_hi = mid;
                }
            }
            lon_bit = !lon_bit;
        }
    }

    Ok(GeoBounds {
        min_lat: lat_lo,
        max_lat: lat_hi,
        min_lon: lon_lo,
        max_lon: lon_hi,
    })
}

/// Decodes a geohash to the center point of its cell.
///
/// The result is within the cell's error bound of any point that encodes
/// to the same hash.
pub fn decode(hash: &str) -> Result<GeoPoint, GeohashError> {
    Ok(decode_bounds(hash)?.center())
}

/// Returns the surrounding cells of a geohash, at the same precision.
///
/// Derived by offsetting the cell center by one cell dimension in each of
/// the eight compass directions and re-encoding. Longitude wraps across the
/// antimeridian; offsets that would leave the valid latitude range are
/// skipped, so cells adjacent to a pole have fewer than eight neighbours.
pub fn neighbors(hash: &str) -> Result<Vec<String>, GeohashError> {
    let bounds = decode_bounds(hash)?;
    let center = bounds.center();
    let lat_step = bounds.lat_error() * 2.0;
    let lon_step = bounds.lon_error() * 2.0;

    let mut cells = Vec::with_capacity(8);
    for dy in [-1i8, 0, 1] {
        for dx in [-1i8, 0, 1] {
            if dx == 0 && dy == 0 {
                continue;
            }
            let lat = center.latitude + f64::from(dy) * lat_step;
            if !(MIN_LAT..=MAX_LAT).contains(&lat) {
                continue;
            }
            let lon = wrap_longitude(center.longitude + f64::from(dx) * lon_step);
            let neighbor = encode(&GeoPoint::new(lon, lat), hash.len())?;
            if neighbor != hash && !cells.contains(&neighbor) {
                cells.push(neighbor);
            }
        }
    }
    Ok(cells)
}

/// Returns the minimal geohash prefix set covering a radius around a point.
///
/// Picks the coarsest precision whose cell is still at least `radius_m`
/// across in its smaller dimension, then returns the point's cell plus its
/// neighbours at that precision. Every point within `radius_m` of `point`
/// hashes to a string starting with one of the returned prefixes.
///
/// Prefix membership produces false positives near cell edges; callers
/// must post-filter by [`distance_m`].
///
/// # Errors
///
/// Returns an error for an invalid point or a non-positive radius.
pub fn prefixes_within_radius(
    point: &GeoPoint,
    radius_m: f64,
) -> Result<Vec<String>, GeohashError> {
    point.validate()?;
    if !radius_m.is_finite() || radius_m <= 0.0 {
        return Err(GeohashError::InvalidRadius(radius_m));
    }

    let precision = precision_for_radius(point.latitude, radius_m);
    let center = encode(point, precision)?;
    let mut prefixes = neighbors(&center)?;
    prefixes.push(center);
    prefixes.sort();
    Ok(prefixes)
}

/// Great-circle distance between two points in metres (haversine).
pub fn distance_m(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat_a = a.latitude.to_radians();
    let lat_b = b.latitude.to_radians();
    let d_lat = (b.latitude - a.latitude).to_radians();
    let d_lon = (b.longitude - a.longitude).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_M * h.sqrt().asin()
}

/// Coarsest precision whose minimum cell dimension still covers `radius_m`.
///
/// With the center cell plus its eight neighbours, a point anywhere in the
/// center cell is covered out to at least one full cell dimension in every
/// direction, so a cell at least `radius_m` across guarantees coverage.
fn precision_for_radius(latitude: f64, radius_m: f64) -> usize {
    for precision in (MIN_PRECISION..=MAX_PRECISION).rev() {
        let (width_m, height_m) = cell_size_m(latitude, precision);
        if width_m.min(height_m) >= radius_m {
            return precision;
        }
    }
    MIN_PRECISION
}

/// Approximate cell width and height in metres at the given latitude.
fn cell_size_m(latitude: f64, precision: usize) -> (f64, f64) {
    let total_bits = precision * 5;
    let lon_bits = total_bits.div_ceil(2);
    let lat_bits = total_bits / 2;

    let width_deg = 360.0 / 2f64.powi(lon_bits as i32);
    let height_deg = 180.0 / 2f64.powi(lat_bits as i32);

    let width_m = width_deg * METRES_PER_DEG_LON_EQUATOR * latitude.to_radians().cos().abs();
    let height_m = height_deg * METRES_PER_DEG_LAT;
    (width_m, height_m)
}

/// Normalize a longitude into [-180, 180).
fn wrap_longitude(longitude: f64) -> f64 {
    let wrapped = (longitude + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid can land exactly on 180.0 from floating error
    if wrapped >= 180.0 {
        wrapped - 360.0
    } else {
        wrapped
    }
}
