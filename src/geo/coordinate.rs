//! Validated latitude/longitude pairs.

use serde::{Deserialize, Serialize};

use crate::error_handling::GeoError;

/// A point on the Earth's surface in decimal degrees.
///
/// Constructed through [`Coordinate::new`], which rejects out-of-range and
/// non-finite values; fields stay public so serialized reports remain flat.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Result<Self, GeoError> {
        let coordinate = Coordinate { lat, lon };
        coordinate.validate()?;
        Ok(coordinate)
    }

    /// Builds a coordinate from a GeoJSON-style `(lon, lat)` vertex.
    pub fn from_lon_lat((lon, lat): (f64, f64)) -> Result<Self, GeoError> {
        Self::new(lat, lon)
    }

    /// Checks latitude in [-90, 90] and longitude in [-180, 180].
    ///
    /// Values are never clamped: a coordinate just outside the range is a data
    /// error, not a rounding artifact.
    pub fn validate(&self) -> Result<(), GeoError> {
        let lat_ok = self.lat.is_finite() && (-90.0..=90.0).contains(&self.lat);
        let lon_ok = self.lon.is_finite() && (-180.0..=180.0).contains(&self.lon);
        if lat_ok && lon_ok {
            Ok(())
        } else {
            Err(GeoError::InvalidCoordinate {
                lat: self.lat,
                lon: self.lon,
            })
        }
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.lat, self.lon)
    }
}
