//! Border-nearest-point fallback for hops known only by country.

mod finder;
mod sample;
mod search;

pub use finder::BorderNearestPointFinder;
pub use sample::BoundaryPointSet;
pub use search::{nearest_pair, NearestPair};
