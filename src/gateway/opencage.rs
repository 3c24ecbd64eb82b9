//! City/region/country geocoding through the OpenCage API.

use std::sync::Arc;

use reqwest::Client;

use super::http::{coordinate_from_json, get_json, join_url};
use super::GeocodeGateway;
use crate::config::{GatewayConfig, RetryPolicy};
use crate::error_handling::GatewayError;
use crate::geo::Coordinate;

/// Forward geocoder backed by `GET /geocode/v1/json`.
pub struct OpenCageGeocoder {
    client: Arc<Client>,
    retry: RetryPolicy,
    endpoint: String,
    api_key: String,
}

impl OpenCageGeocoder {
    pub fn new(
        client: Arc<Client>,
        gateway: &GatewayConfig,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            retry: gateway.retry.clone(),
            endpoint: join_url(base_url, "geocode/v1/json"),
            api_key: api_key.into(),
        }
    }
}

impl GeocodeGateway for OpenCageGeocoder {
    async fn geocode(
        &self,
        city: &str,
        region: &str,
        country: &str,
    ) -> Result<Coordinate, GatewayError> {
        let place = [city, region, country]
            .iter()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(",");

        let body = get_json(
            &self.client,
            &self.retry,
            &self.endpoint,
            &[
                ("q", place.as_str()),
                ("key", self.api_key.as_str()),
                ("limit", "1"),
                ("no_annotations", "1"),
            ],
            &place,
        )
        .await?;

        let geometry = body
            .get("results")
            .and_then(|r| r.as_array())
            .and_then(|r| r.first())
            .and_then(|first| first.get("geometry"))
            .ok_or_else(|| GatewayError::NotFound(place.clone()))?;

        coordinate_from_json(geometry.get("lat"), geometry.get("lng"), &place)
    }
}
