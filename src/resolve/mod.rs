//! Per-hop geolocation lookup.
//!
//! Each captured hop is turned into a [`HopRecord`] by trying, in order:
//! city/region geocoding (stored hops) or IP geolocation (live hops), then the
//! border fallback for hops whose country is known. Lookups run concurrently
//! but results keep path order, since the validator folds them sequentially.

use std::sync::Arc;

use futures::stream::{self, StreamExt};
use log::{debug, warn};

use crate::border::BorderNearestPointFinder;
use crate::error_handling::{
    record_gateway_error, BorderError, InfoType, ProcessingStats, WarningType,
};
use crate::gateway::{BoundaryGateway, GeocodeGateway, IpGeolocateGateway};
use crate::hop::{CapturedHop, Geolocation, HopRecord, LocationSource, ResolvedPoint};

/// Border fallback plus the reference country it measures against.
pub struct BorderFallback<B> {
    pub finder: BorderNearestPointFinder<B>,
    pub reference_country: String,
}

/// Resolves captured hops with whichever gateways are configured.
pub struct HopResolver<G, I, B> {
    geocoder: Option<G>,
    ip_locator: Option<I>,
    border: Option<BorderFallback<B>>,
    stats: Arc<ProcessingStats>,
}

impl<G, I, B> HopResolver<G, I, B>
where
    G: GeocodeGateway,
    I: IpGeolocateGateway,
    B: BoundaryGateway,
{
    pub fn new(stats: Arc<ProcessingStats>) -> Self {
        Self {
            geocoder: None,
            ip_locator: None,
            border: None,
            stats,
        }
    }

    pub fn with_geocoder(mut self, geocoder: G) -> Self {
        self.geocoder = Some(geocoder);
        self
    }

    pub fn with_ip_locator(mut self, ip_locator: I) -> Self {
        self.ip_locator = Some(ip_locator);
        self
    }

    pub fn with_border_fallback(
        mut self,
        finder: BorderNearestPointFinder<B>,
        reference_country: impl Into<String>,
    ) -> Self {
        self.border = Some(BorderFallback {
            finder,
            reference_country: reference_country.into(),
        });
        self
    }

    /// Resolves every hop with at most `max_concurrency` lookups in flight.
    /// The output has one record per input hop, in input order.
    pub async fn resolve_all(&self, hops: Vec<CapturedHop>, max_concurrency: usize) -> Vec<HopRecord> {
        stream::iter(hops)
            .map(|hop| self.resolve(hop))
            .buffered(max_concurrency.max(1))
            .collect()
            .await
    }

    /// Resolves one hop. Gateway failures are counted and fall through to the
    /// next source; they never fail the hop.
    pub async fn resolve(&self, hop: CapturedHop) -> HopRecord {
        if hop.min_rtt.is_none() {
            // excluded by the validator anyway
            return HopRecord::new(hop, Geolocation::Unknown);
        }

        if let Some(point) = self.direct_lookup(&hop).await {
            return HopRecord::new(hop, Geolocation::Resolved(point));
        }

        let country = hop
            .place
            .as_ref()
            .and_then(|place| place.country.clone());
        let Some(country) = country else {
            warn!("No geolocation for {}", hop.ip_address);
            return HopRecord::new(hop, Geolocation::Unknown);
        };

        match self.border_lookup(&hop.ip_address, &country).await {
            Some(point) => HopRecord::new(hop, Geolocation::Resolved(point)),
            None => {
                warn!("No coordinate for {} (country {} only)", hop.ip_address, country);
                HopRecord::new(
                    hop,
                    Geolocation::Unresolved {
                        country_code: country,
                    },
                )
            }
        }
    }

    async fn direct_lookup(&self, hop: &CapturedHop) -> Option<ResolvedPoint> {
        match &hop.place {
            Some(place) => {
                let (city, region) = place.city_region()?;
                let geocoder = self.geocoder.as_ref()?;
                let country = place.country.as_deref().unwrap_or_default();
                match geocoder.geocode(city, region, country).await {
                    Ok(coordinate) => Some(ResolvedPoint {
                        coordinate,
                        source: LocationSource::City,
                    }),
                    Err(e) => {
                        debug!("Geocoding {}, {} for {} failed: {}", city, region, hop.ip_address, e);
                        record_gateway_error(&self.stats, &e);
                        None
                    }
                }
            }
            None => {
                let locator = self.ip_locator.as_ref()?;
                match locator.locate(&hop.ip_address).await {
                    Ok(coordinate) => Some(ResolvedPoint {
                        coordinate,
                        source: LocationSource::Ip,
                    }),
                    Err(e) => {
                        debug!("IP geolocation for {} failed: {}", hop.ip_address, e);
                        record_gateway_error(&self.stats, &e);
                        None
                    }
                }
            }
        }
    }

    async fn border_lookup(&self, ip_address: &str, country: &str) -> Option<ResolvedPoint> {
        let border = self.border.as_ref()?;
        match border
            .finder
            .approximate_location(country, &border.reference_country)
            .await
        {
            Ok(coordinate) => {
                debug!(
                    "Border fallback for {}: {} (nearest {} point to {})",
                    ip_address, coordinate, country, border.reference_country
                );
                self.stats.increment_info(InfoType::BorderFallbackUsed);
                Some(ResolvedPoint {
                    coordinate,
                    source: LocationSource::BorderFallback,
                })
            }
            Err(e) => {
                debug!("Border fallback for {} failed: {}", ip_address, e);
                match &e {
                    BorderError::Unavailable { source, .. } => {
                        record_gateway_error(&self.stats, source)
                    }
                    BorderError::EmptyBoundary(_) => {
                        self.stats.increment_warning(WarningType::EmptyBoundary)
                    }
                }
                None
            }
        }
    }
}
