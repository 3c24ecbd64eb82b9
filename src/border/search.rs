//! Exhaustive nearest-pair search between two point sets.

use serde::Serialize;

use crate::geo::{Coordinate, EarthModel};

/// Closest pair found between two boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct NearestPair {
    /// Point on the first country's boundary
    pub a: Coordinate,
    /// Point on the second country's boundary
    pub b: Coordinate,
    pub distance_km: f64,
}

impl NearestPair {
    /// `(lat_a, lon_a, lat_b, lon_b)`
    pub fn as_tuple(&self) -> (f64, f64, f64, f64) {
        (self.a.lat, self.a.lon, self.b.lat, self.b.lon)
    }
}

/// Minimum great-circle distance over all pairs, O(|a| * |b|).
///
/// Ties keep the first pair in iteration order (outer loop over `a`). Returns
/// `None` if either set is empty.
pub fn nearest_pair(a: &[Coordinate], b: &[Coordinate], earth: EarthModel) -> Option<NearestPair> {
    let mut best: Option<NearestPair> = None;
    for &pa in a {
        for &pb in b {
            let Ok(distance_km) = earth.distance(pa, pb) else {
                continue;
            };
            let closer = match best {
                Some(current) => distance_km < current.distance_km,
                None => true,
            };
            if closer {
                best = Some(NearestPair {
                    a: pa,
                    b: pb,
                    distance_km,
                });
            }
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    #[test]
    fn test_finds_minimum_pair() {
        let a = [c(0.0, 0.0), c(0.0, 1.0), c(0.0, 2.0)];
        let b = [c(0.0, 5.0), c(0.0, 2.5), c(1.0, 9.0)];
        let pair = nearest_pair(&a, &b, EarthModel::MeanSphere).unwrap();
        assert_eq!(pair.a, c(0.0, 2.0));
        assert_eq!(pair.b, c(0.0, 2.5));
        assert!((pair.distance_km - 55.6).abs() < 0.1);
        assert_eq!(pair.as_tuple(), (0.0, 2.0, 0.0, 2.5));
    }

    #[test]
    fn test_ties_keep_first_encountered() {
        let a = [c(0.0, -1.0), c(0.0, 1.0)];
        let b = [c(0.0, 0.0)];
        let pair = nearest_pair(&a, &b, EarthModel::MeanSphere).unwrap();
        assert_eq!(pair.a, c(0.0, -1.0));
    }

    #[test]
    fn test_empty_set_has_no_pair() {
        assert!(nearest_pair(&[], &[c(0.0, 0.0)], EarthModel::MeanSphere).is_none());
        assert!(nearest_pair(&[c(0.0, 0.0)], &[], EarthModel::MeanSphere).is_none());
    }

    #[test]
    fn test_shared_vertex_is_zero() {
        let a = [c(10.0, 10.0), c(11.0, 11.0)];
        let b = [c(20.0, 20.0), c(11.0, 11.0)];
        let pair = nearest_pair(&a, &b, EarthModel::PolarSphere).unwrap();
        assert_eq!(pair.distance_km, 0.0);
    }
}
