//! Great-circle distance.
//!
//! Haversine distance on a sphere. The sphere radius is a parameter
//! ([`EarthModel`]) so every caller measures with the same Earth.

use super::coordinate::Coordinate;
use crate::config::{EARTH_MEAN_RADIUS_KM, WGS84_FLATTENING, WGS84_SEMI_MAJOR_KM};
use crate::error_handling::GeoError;

/// Sphere used to approximate the Earth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EarthModel {
    /// Mean radius, 6371.0088 km.
    MeanSphere,
    /// WGS84 semi-minor axis, `a * (1 - f)` ≈ 6356.752 km.
    #[default]
    PolarSphere,
}

impl EarthModel {
    pub fn radius_km(self) -> f64 {
        match self {
            EarthModel::MeanSphere => EARTH_MEAN_RADIUS_KM,
            EarthModel::PolarSphere => WGS84_SEMI_MAJOR_KM * (1.0 - WGS84_FLATTENING),
        }
    }

    /// Distance in kilometers between two validated points.
    pub fn distance(self, a: Coordinate, b: Coordinate) -> Result<f64, GeoError> {
        a.validate()?;
        b.validate()?;

        let lat1 = a.lat.to_radians();
        let lat2 = b.lat.to_radians();
        let dlat = lat2 - lat1;
        let dlon = (b.lon - a.lon).to_radians();

        let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
        // rounding can push h a hair outside [0, 1] for identical or antipodal points
        let h = h.clamp(0.0, 1.0);
        let central_angle = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

        Ok(central_angle * self.radius_km())
    }
}

/// Great-circle distance in kilometers between `(lat1, lon1)` and `(lat2, lon2)`.
///
/// Fails with [`GeoError::InvalidCoordinate`] if any value is out of range or
/// non-finite (a missing coordinate is passed as NaN).
pub fn distance_km(
    model: EarthModel,
    lat1: f64,
    lon1: f64,
    lat2: f64,
    lon2: f64,
) -> Result<f64, GeoError> {
    model.distance(Coordinate { lat: lat1, lon: lon1 }, Coordinate { lat: lat2, lon: lon2 })
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODELS: [EarthModel; 2] = [EarthModel::MeanSphere, EarthModel::PolarSphere];

    #[test]
    fn test_identical_points_are_zero() {
        for model in MODELS {
            for (lat, lon) in [(0.0, 0.0), (52.52, 13.405), (-89.9, 179.9), (90.0, -180.0)] {
                let d = distance_km(model, lat, lon, lat, lon).unwrap();
                assert_eq!(d, 0.0, "{:?} at ({}, {})", model, lat, lon);
            }
        }
    }

    #[test]
    fn test_distance_is_symmetric() {
        for model in MODELS {
            let ab = distance_km(model, 48.8566, 2.3522, 40.7128, -74.0060).unwrap();
            let ba = distance_km(model, 40.7128, -74.0060, 48.8566, 2.3522).unwrap();
            assert!((ab - ba).abs() < 1e-9);
        }
    }

    #[test]
    fn test_antipodal_points_are_half_circumference() {
        for model in MODELS {
            let d = distance_km(model, 0.0, 0.0, 0.0, 180.0).unwrap();
            let half = std::f64::consts::PI * model.radius_km();
            assert!(d.is_finite());
            assert!((d - half).abs() < 1e-3, "{} vs {}", d, half);

            let poles = distance_km(model, 90.0, 0.0, -90.0, 0.0).unwrap();
            assert!((poles - half).abs() < 1e-3);
        }
    }

    #[test]
    fn test_known_distances() {
        // Paris - London is about 344 km
        let d = distance_km(EarthModel::MeanSphere, 48.8566, 2.3522, 51.5074, -0.1278).unwrap();
        assert!((d - 343.5).abs() < 2.0, "got {}", d);

        // One degree of longitude on the equator
        let d = distance_km(EarthModel::MeanSphere, 0.0, 0.0, 0.0, 1.0).unwrap();
        assert!((d - 111.195).abs() < 0.01, "got {}", d);
    }

    #[test]
    fn test_polar_sphere_is_shorter_than_mean() {
        let mean = distance_km(EarthModel::MeanSphere, 0.0, 0.0, 10.0, 10.0).unwrap();
        let polar = distance_km(EarthModel::PolarSphere, 0.0, 0.0, 10.0, 10.0).unwrap();
        assert!(polar < mean);
        assert!((EarthModel::PolarSphere.radius_km() - 6356.752).abs() < 0.001);
    }

    #[test]
    fn test_invalid_coordinates_fail() {
        let model = EarthModel::default();
        assert!(distance_km(model, 91.0, 0.0, 0.0, 0.0).is_err());
        assert!(distance_km(model, 0.0, 0.0, -90.5, 0.0).is_err());
        assert!(distance_km(model, 0.0, 181.0, 0.0, 0.0).is_err());
        assert!(distance_km(model, 0.0, 0.0, 0.0, -180.01).is_err());
        assert!(matches!(
            distance_km(model, f64::NAN, 0.0, 0.0, 0.0),
            Err(GeoError::InvalidCoordinate { .. })
        ));
    }
}
