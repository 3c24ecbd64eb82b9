//! External gateways.
//!
//! The algorithms only see these traits; the HTTP providers and the GeoJSON
//! boundary index are the production implementations. Every gateway is
//! best-effort: callers recover from any `GatewayError` at hop granularity.

mod boundary;
mod http;
mod ipgeo;
mod opencage;

pub use boundary::GeoJsonBoundaries;
pub use ipgeo::{IpGeolocationIo, IpLocator, RipeIpmap};
pub use opencage::OpenCageGeocoder;

use crate::error_handling::GatewayError;
use crate::geo::Coordinate;

/// Resolves a place name to a coordinate.
#[allow(async_fn_in_trait)]
pub trait GeocodeGateway {
    /// `country` may be empty; `city` and `region` are always known.
    async fn geocode(
        &self,
        city: &str,
        region: &str,
        country: &str,
    ) -> Result<Coordinate, GatewayError>;
}

/// Resolves an IP address to a coordinate.
#[allow(async_fn_in_trait)]
pub trait IpGeolocateGateway {
    async fn locate(&self, ip_address: &str) -> Result<Coordinate, GatewayError>;
}

/// Returns a country's outline as ordered `(lon, lat)` vertices.
#[allow(async_fn_in_trait)]
pub trait BoundaryGateway {
    async fn boundary(&self, country: &str) -> Result<Vec<(f64, f64)>, GatewayError>;
}
