//! Hop data structures.

use serde::Serialize;

use crate::geo::Coordinate;

/// Place descriptor attached to a stored hop: `(city, region, country, continent)`.
///
/// Any field may be unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaceDescriptor {
    pub city: Option<String>,
    pub region: Option<String>,
    pub country: Option<String>,
    pub continent: Option<String>,
}

impl PlaceDescriptor {
    /// City and region together, when both are known.
    pub fn city_region(&self) -> Option<(&str, &str)> {
        Some((self.city.as_deref()?, self.region.as_deref()?))
    }
}

/// A hop as captured, before any geolocation lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct CapturedHop {
    pub ip_address: String,
    pub asn: Option<u32>,
    /// Milliseconds; `None` for an unmeasurable hop
    pub min_rtt: Option<f64>,
    pub place: Option<PlaceDescriptor>,
}

/// Where a resolved coordinate came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationSource {
    /// City/region/country geocoding
    City,
    /// IP geolocation
    Ip,
    /// Nearest boundary point to the reference country
    BorderFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ResolvedPoint {
    pub coordinate: Coordinate,
    pub source: LocationSource,
}

/// Geolocation of a hop after the lookup stage.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Geolocation {
    Resolved(ResolvedPoint),
    /// Only the country is known and no coordinate could be derived from it.
    Unresolved { country_code: String },
    Unknown,
}

impl Geolocation {
    pub fn point(&self) -> Option<Coordinate> {
        match self {
            Geolocation::Resolved(resolved) => Some(resolved.coordinate),
            _ => None,
        }
    }
}

/// One traceroute hop, ready for validation. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct HopRecord {
    pub ip_address: String,
    pub asn: Option<u32>,
    pub min_rtt: Option<f64>,
    pub geolocation: Geolocation,
}

impl HopRecord {
    pub fn new(captured: CapturedHop, geolocation: Geolocation) -> Self {
        Self {
            ip_address: captured.ip_address,
            asn: captured.asn,
            min_rtt: captured.min_rtt,
            geolocation,
        }
    }

    /// Hop resolved to `coordinate` by city geocoding.
    pub fn at(ip_address: &str, asn: Option<u32>, min_rtt: Option<f64>, coordinate: Coordinate) -> Self {
        Self {
            ip_address: ip_address.to_string(),
            asn,
            min_rtt,
            geolocation: Geolocation::Resolved(ResolvedPoint {
                coordinate,
                source: LocationSource::City,
            }),
        }
    }
}
