//! Gateway setup for a run.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use reqwest::Client;

use crate::border::BorderNearestPointFinder;
use crate::config::{Config, GatewayConfig, IpProvider};
use crate::error_handling::ProcessingStats;
use crate::gateway::{GeoJsonBoundaries, IpGeolocationIo, IpLocator, OpenCageGeocoder, RipeIpmap};
use crate::resolve::HopResolver;

/// Resolver wired to the production gateways.
pub type GatewayResolver = HopResolver<OpenCageGeocoder, IpLocator, GeoJsonBoundaries>;

/// Builds the resolver from `config`. Gateways without credentials are left
/// out with a warning; an unreadable boundary file is an error.
pub async fn init_resolver(
    config: &Config,
    gateway: &GatewayConfig,
    client: Arc<Client>,
    stats: Arc<ProcessingStats>,
) -> Result<GatewayResolver> {
    let mut resolver = GatewayResolver::new(stats);

    match config.opencage_api_key.as_deref() {
        Some(key) if !key.trim().is_empty() => {
            resolver = resolver.with_geocoder(OpenCageGeocoder::new(
                Arc::clone(&client),
                gateway,
                &config.opencage_url,
                key,
            ));
        }
        _ if !config.live => {
            warn!("No OpenCage API key set; city/region geocoding is disabled");
        }
        _ => {}
    }

    if config.live {
        match ip_locator(config, gateway, &client) {
            Some(locator) => resolver = resolver.with_ip_locator(locator),
            None => warn!("No ipgeolocation.io API key set; IP geolocation is disabled"),
        }
    }

    if let (Some(reference), Some(boundaries)) =
        (config.reference_country.as_deref(), config.boundaries.as_deref())
    {
        let index = GeoJsonBoundaries::load(boundaries, &client, &gateway.retry)
            .await
            .context(format!("Failed to load country boundaries from {}", boundaries))?;
        let finder = BorderNearestPointFinder::new(
            index,
            config.sample_size,
            config.sample_seed,
            config.earth_model.into(),
        );
        info!(
            "Border fallback enabled against {} (sample size {})",
            reference, config.sample_size
        );
        resolver = resolver.with_border_fallback(finder, reference);
    } else {
        info!("Border fallback disabled (needs --reference-country and --boundaries)");
    }

    Ok(resolver)
}

fn ip_locator(config: &Config, gateway: &GatewayConfig, client: &Arc<Client>) -> Option<IpLocator> {
    match config.ip_provider {
        IpProvider::RipeIpmap => Some(IpLocator::Ripe(RipeIpmap::new(
            Arc::clone(client),
            gateway,
            &config.ripe_ipmap_url,
        ))),
        IpProvider::Ipgeolocation => {
            let key = config
                .ipgeolocation_api_key
                .as_deref()
                .filter(|k| !k.trim().is_empty())?;
            Some(IpLocator::IpGeolocation(IpGeolocationIo::new(
                Arc::clone(client),
                gateway,
                &config.ipgeolocation_url,
                key,
            )))
        }
    }
}
