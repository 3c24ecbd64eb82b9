//! Border fallback: approximate a hop's location by the point of its country's
//! boundary nearest to a reference country.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use log::debug;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::sync::OnceCell;

use super::sample::BoundaryPointSet;
use super::search::{nearest_pair, NearestPair};
use crate::error_handling::BorderError;
use crate::gateway::BoundaryGateway;
use crate::geo::{Coordinate, EarthModel};

type Outline = Arc<Vec<(f64, f64)>>;

/// Samples two boundaries and searches them for the closest point pair.
///
/// Fetched outlines are cached by upper-cased country key; samples are drawn
/// again on every lookup. With a seed, every lookup draws from a fresh RNG
/// seeded identically, so results do not depend on call order.
pub struct BorderNearestPointFinder<B> {
    gateway: B,
    sample_size: usize,
    seed: Option<u64>,
    earth: EarthModel,
    outlines: Mutex<HashMap<String, Arc<OnceCell<Outline>>>>,
}

impl<B: BoundaryGateway> BorderNearestPointFinder<B> {
    pub fn new(gateway: B, sample_size: usize, seed: Option<u64>, earth: EarthModel) -> Self {
        Self {
            gateway,
            sample_size,
            seed,
            earth,
            outlines: Mutex::new(HashMap::new()),
        }
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    /// Nearest pair between the boundaries of `country_a` and `country_b`,
    /// using the configured sample size.
    pub async fn nearest(
        &self,
        country_a: &str,
        country_b: &str,
    ) -> Result<NearestPair, BorderError> {
        self.nearest_sampled(country_a, country_b, self.sample_size)
            .await
    }

    /// Nearest pair with an explicit per-country sample cap (0 = no cap).
    pub async fn nearest_sampled(
        &self,
        country_a: &str,
        country_b: &str,
        sample_size: usize,
    ) -> Result<NearestPair, BorderError> {
        let outline_a = self.outline(country_a).await?;
        let outline_b = self.outline(country_b).await?;

        let mut rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let set_a = BoundaryPointSet::from_vertices(country_a, &outline_a, sample_size, &mut rng)?;
        let set_b = BoundaryPointSet::from_vertices(country_b, &outline_b, sample_size, &mut rng)?;

        let pair = nearest_pair(&set_a.points, &set_b.points, self.earth)
            .ok_or_else(|| BorderError::EmptyBoundary(country_a.to_string()))?;
        debug!(
            "Nearest border points {} {} / {} {}: {:.1} km ({} x {} samples)",
            country_a,
            pair.a,
            country_b,
            pair.b,
            pair.distance_km,
            set_a.len(),
            set_b.len()
        );
        Ok(pair)
    }

    /// Approximate location for a hop known only by `country`: the point of its
    /// boundary closest to `reference_country`.
    pub async fn approximate_location(
        &self,
        country: &str,
        reference_country: &str,
    ) -> Result<Coordinate, BorderError> {
        Ok(self.nearest(country, reference_country).await?.a)
    }

    async fn outline(&self, country: &str) -> Result<Outline, BorderError> {
        let key = country.trim().to_uppercase();
        // one cell per country: concurrent lookups share a single fetch
        let cell = self
            .outlines
            .lock()
            .map(|mut cache| Arc::clone(cache.entry(key).or_default()))
            .unwrap_or_default();

        let outline = cell
            .get_or_try_init(|| async {
                self.gateway
                    .boundary(country)
                    .await
                    .map(Arc::new)
                    .map_err(|source| BorderError::Unavailable {
                        country: country.to_string(),
                        source,
                    })
            })
            .await?;
        Ok(Arc::clone(outline))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error_handling::GatewayError;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Closed square outline with `per_edge` vertices on each side.
    fn square(lon0: f64, lat0: f64, size: f64, per_edge: usize) -> Vec<(f64, f64)> {
        let step = size / per_edge as f64;
        let mut v = Vec::new();
        for i in 0..per_edge {
            v.push((lon0 + i as f64 * step, lat0));
        }
        for i in 0..per_edge {
            v.push((lon0 + size, lat0 + i as f64 * step));
        }
        for i in 0..per_edge {
            v.push((lon0 + size - i as f64 * step, lat0 + size));
        }
        for i in 0..per_edge {
            v.push((lon0, lat0 + size - i as f64 * step));
        }
        v
    }

    struct StaticBoundaries {
        outlines: HashMap<String, Vec<(f64, f64)>>,
        calls: AtomicUsize,
    }

    impl StaticBoundaries {
        fn new(outlines: &[(&str, Vec<(f64, f64)>)]) -> Self {
            Self {
                outlines: outlines
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.clone()))
                    .collect(),
                calls: AtomicUsize::new(0),
            }
        }
    }

    impl BoundaryGateway for StaticBoundaries {
        async fn boundary(&self, country: &str) -> Result<Vec<(f64, f64)>, GatewayError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // let concurrent lookups interleave
            tokio::task::yield_now().await;
            self.outlines
                .get(country)
                .cloned()
                .ok_or_else(|| GatewayError::NotFound(country.to_string()))
        }
    }

    #[tokio::test]
    async fn test_adjacent_countries_unsampled_touch() {
        // 25 vertices per edge: 100 per outline, no sampling needed
        let gateway = StaticBoundaries::new(&[
            ("AA", square(0.0, 0.0, 1.0, 25)),
            ("BB", square(1.0, 0.0, 1.0, 25)),
        ]);
        let finder = BorderNearestPointFinder::new(gateway, 100, Some(42), EarthModel::MeanSphere);
        let pair = finder.nearest("AA", "BB").await.unwrap();
        assert!(pair.distance_km < 1e-9, "got {}", pair.distance_km);
    }

    #[tokio::test]
    async fn test_adjacent_countries_sampled_within_tolerance() {
        // 1000 vertices per outline sampled down to 100
        let gateway = StaticBoundaries::new(&[
            ("AA", square(0.0, 0.0, 1.0, 250)),
            ("BB", square(1.0, 0.0, 1.0, 250)),
        ]);
        let finder = BorderNearestPointFinder::new(gateway, 100, Some(7), EarthModel::MeanSphere);
        let pair = finder.nearest("AA", "BB").await.unwrap();
        assert!(pair.distance_km < 20.0, "got {}", pair.distance_km);
        assert!(pair.a.lon <= 1.0 && pair.b.lon >= 1.0);
    }

    #[tokio::test]
    async fn test_seeded_lookups_are_deterministic() {
        let gateway = StaticBoundaries::new(&[
            ("AA", square(0.0, 0.0, 3.0, 300)),
            ("CC", square(10.0, 10.0, 2.0, 300)),
        ]);
        let finder = BorderNearestPointFinder::new(gateway, 30, Some(99), EarthModel::PolarSphere);
        let first = finder.nearest("AA", "CC").await.unwrap();
        let second = finder.nearest("AA", "CC").await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_distant_countries_pick_facing_corners() {
        let gateway = StaticBoundaries::new(&[
            ("AA", square(0.0, 0.0, 1.0, 10)),
            ("CC", square(10.0, 0.0, 1.0, 10)),
        ]);
        let finder = BorderNearestPointFinder::new(gateway, 0, None, EarthModel::MeanSphere);
        let pair = finder.nearest("AA", "CC").await.unwrap();
        assert!((pair.a.lon - 1.0).abs() < 1e-9);
        assert!((pair.b.lon - 10.0).abs() < 1e-9);
        assert!((pair.distance_km - 9.0 * 111.195).abs() < 1.0);
    }

    #[tokio::test]
    async fn test_missing_boundary_is_unavailable() {
        let gateway = StaticBoundaries::new(&[("AA", square(0.0, 0.0, 1.0, 10))]);
        let finder = BorderNearestPointFinder::new(gateway, 100, Some(1), EarthModel::MeanSphere);
        let err = finder.nearest("AA", "ZZ").await.unwrap_err();
        assert!(matches!(err, BorderError::Unavailable { ref country, .. } if country == "ZZ"));
    }

    #[tokio::test]
    async fn test_outlines_fetched_once_per_country() {
        let gateway = StaticBoundaries::new(&[
            ("AA", square(0.0, 0.0, 1.0, 10)),
            ("BB", square(1.0, 0.0, 1.0, 10)),
        ]);
        let finder = BorderNearestPointFinder::new(gateway, 100, Some(1), EarthModel::MeanSphere);
        finder.nearest("AA", "BB").await.unwrap();
        finder.approximate_location("AA", "BB").await.unwrap();
        assert_eq!(finder.gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_approximate_location_is_on_hop_country() {
        let gateway = StaticBoundaries::new(&[
            ("AA", square(0.0, 0.0, 1.0, 10)),
            ("CC", square(5.0, 0.0, 1.0, 10)),
        ]);
        let finder = BorderNearestPointFinder::new(gateway, 100, Some(1), EarthModel::MeanSphere);
        let location = finder.approximate_location("AA", "CC").await.unwrap();
        assert!((location.lon - 1.0).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_concurrent_lookups_share_one_fetch() {
        let gateway = StaticBoundaries::new(&[
            ("AA", square(0.0, 0.0, 1.0, 10)),
            ("BB", square(1.0, 0.0, 1.0, 10)),
        ]);
        let finder = BorderNearestPointFinder::new(gateway, 100, Some(1), EarthModel::MeanSphere);
        let (first, second) = futures::join!(
            finder.approximate_location("AA", "BB"),
            finder.approximate_location("AA", "BB")
        );
        assert_eq!(first.unwrap(), second.unwrap());
        assert_eq!(finder.gateway.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_is_retried_on_next_lookup() {
        let gateway = StaticBoundaries::new(&[("AA", square(0.0, 0.0, 1.0, 10))]);
        let finder = BorderNearestPointFinder::new(gateway, 100, Some(1), EarthModel::MeanSphere);
        assert!(finder.nearest("AA", "ZZ").await.is_err());
        assert!(finder.nearest("AA", "ZZ").await.is_err());
        // AA cached, ZZ asked twice
        assert_eq!(finder.gateway.calls.load(Ordering::SeqCst), 3);
    }
}
