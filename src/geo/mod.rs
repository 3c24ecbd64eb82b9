//! Geometry of the plausibility check.
//!
//! - [`Coordinate`]: validated latitude/longitude
//! - [`EarthModel`] / [`distance_km`]: great-circle distance in kilometers
//! - [`RadiusModel`]: RTT delta (ms) to maximum propagation radius (km)

mod coordinate;
mod distance;
mod radius;

pub use coordinate::Coordinate;
pub use distance::{distance_km, EarthModel};
pub use radius::RadiusModel;
