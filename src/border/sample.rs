//! Size-capped samples of a country's boundary.

use rand::seq::index;
use rand::Rng;

use crate::error_handling::BorderError;
use crate::geo::Coordinate;

/// Boundary vertices of one country, possibly down-sampled.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryPointSet {
    pub country: String,
    pub points: Vec<Coordinate>,
}

impl BoundaryPointSet {
    /// Builds a point set from `(lon, lat)` vertices.
    ///
    /// Out-of-range vertices are dropped. When more than `sample_size` remain, a
    /// uniform random subset of exactly `sample_size` is kept, in outline order.
    /// A `sample_size` of 0 keeps every vertex.
    pub fn from_vertices<R: Rng + ?Sized>(
        country: &str,
        vertices: &[(f64, f64)],
        sample_size: usize,
        rng: &mut R,
    ) -> Result<Self, BorderError> {
        let valid: Vec<Coordinate> = vertices
            .iter()
            .filter_map(|v| Coordinate::from_lon_lat(*v).ok())
            .collect();
        if valid.is_empty() {
            return Err(BorderError::EmptyBoundary(country.to_string()));
        }

        let points = if sample_size > 0 && valid.len() > sample_size {
            let mut picked = index::sample(rng, valid.len(), sample_size).into_vec();
            picked.sort_unstable();
            picked.into_iter().map(|i| valid[i]).collect()
        } else {
            valid
        };

        Ok(Self {
            country: country.to_string(),
            points,
        })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
