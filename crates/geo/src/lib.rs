//! Geospatial core for SaveMate.
//!
//! This crate provides:
//! - Validated, immutable coordinates
//! - Haversine great-circle distance
//! - Radius filtering and nearest-first ordering of located records
//! - Human-readable distance labels
//! - WASM bindings for the browser map view
//!
//! # Example
//!
//! ```
//! use savemate_geo::{haversine_distance, Coordinate};
//!
//! let warsaw = Coordinate::new(52.2297, 21.0122).unwrap();
//! let krakow = Coordinate::new(50.0647, 19.9450).unwrap();
//!
//! let distance_km = haversine_distance(&warsaw, &krakow);
//! assert!((distance_km - 252.0).abs() < 2.0);
//! ```

mod error;
mod format;
mod haversine;
pub mod radius;
pub mod records;

#[cfg(feature = "wasm")]
mod wasm;

pub use error::{GeoError, GeoErrorCode, Result};
pub use format::format_distance;
pub use haversine::{haversine_distance, EARTH_RADIUS_KM};
pub use radius::{filter_by_radius, filter_by_radius_sorted, sort_by_distance, FilterResult, Located};
pub use records::{filter_json_records, JsonRecord};

use serde::{Deserialize, Serialize};

/// A geographic coordinate with latitude and longitude.
///
/// Always within range: construction goes through [`Coordinate::new`], which
/// rejects out-of-range and non-finite values. Deserialization validates too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawCoordinate")]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawCoordinate {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    longitude: f64,
}

impl TryFrom<RawCoordinate> for Coordinate {
    type Error = GeoError;

    fn try_from(raw: RawCoordinate) -> Result<Self> {
        Self::new(raw.latitude, raw.longitude)
    }
}

impl Coordinate {
    /// Creates a new coordinate.
    ///
    /// # Arguments
    /// * `latitude` - Latitude in degrees (-90 to 90)
    /// * `longitude` - Longitude in degrees (-180 to 180)
    ///
    /// # Errors
    /// Returns [`GeoError::InvalidLatitude`] or [`GeoError::InvalidLongitude`]
    /// when a value is out of range or not finite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::InvalidLatitude(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::InvalidLongitude(longitude));
        }
        Ok(Self { latitude, longitude })
    }

    /// Builds a coordinate from optional parts, as found on deal records.
    ///
    /// Returns `None` when either part is missing or invalid.
    pub fn from_parts(latitude: Option<f64>, longitude: Option<f64>) -> Option<Self> {
        Self::new(latitude?, longitude?).ok()
    }

    /// Latitude in degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Converts degrees to radians for internal calculations.
    #[inline]
    pub(crate) fn to_radians(self) -> (f64, f64) {
        (self.latitude.to_radians(), self.longitude.to_radians())
    }
}

impl TryFrom<(f64, f64)> for Coordinate {
    type Error = GeoError;

    fn try_from((lat, lng): (f64, f64)) -> Result<Self> {
        Self::new(lat, lng)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.latitude, self.longitude)
    }
}
