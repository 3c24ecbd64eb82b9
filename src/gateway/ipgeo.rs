//! IP address geolocation providers.

use std::sync::Arc;

use reqwest::Client;

use super::http::{coordinate_from_json, get_json, join_url};
use super::IpGeolocateGateway;
use crate::config::{GatewayConfig, RetryPolicy};
use crate::error_handling::GatewayError;
use crate::geo::Coordinate;

/// ipgeolocation.io: `GET /ipgeo?apiKey=..&ip=..`, coordinates as strings.
pub struct IpGeolocationIo {
    client: Arc<Client>,
    retry: RetryPolicy,
    endpoint: String,
    api_key: String,
}

impl IpGeolocationIo {
    pub fn new(
        client: Arc<Client>,
        gateway: &GatewayConfig,
        base_url: &str,
        api_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            retry: gateway.retry.clone(),
            endpoint: join_url(base_url, "ipgeo"),
            api_key: api_key.into(),
        }
    }
}

impl IpGeolocateGateway for IpGeolocationIo {
    async fn locate(&self, ip_address: &str) -> Result<Coordinate, GatewayError> {
        let body = get_json(
            &self.client,
            &self.retry,
            &self.endpoint,
            &[("apiKey", self.api_key.as_str()), ("ip", ip_address)],
            ip_address,
        )
        .await?;
        coordinate_from_json(body.get("latitude"), body.get("longitude"), ip_address)
    }
}

/// RIPE IPmap: `GET /v1/locate/{ip}/best`, `location` is null when unknown.
pub struct RipeIpmap {
    client: Arc<Client>,
    retry: RetryPolicy,
    base_url: String,
}

impl RipeIpmap {
    pub fn new(client: Arc<Client>, gateway: &GatewayConfig, base_url: &str) -> Self {
        Self {
            client,
            retry: gateway.retry.clone(),
            base_url: base_url.to_string(),
        }
    }
}

impl IpGeolocateGateway for RipeIpmap {
    async fn locate(&self, ip_address: &str) -> Result<Coordinate, GatewayError> {
        let url = join_url(&self.base_url, &format!("v1/locate/{}/best", ip_address));
        let body = get_json(&self.client, &self.retry, &url, &[], ip_address).await?;
        let location = body
            .get("location")
            .filter(|l| !l.is_null())
            .ok_or_else(|| GatewayError::NotFound(ip_address.to_string()))?;
        coordinate_from_json(location.get("latitude"), location.get("longitude"), ip_address)
    }
}

/// The IP provider chosen at run time.
pub enum IpLocator {
    IpGeolocation(IpGeolocationIo),
    Ripe(RipeIpmap),
}

impl IpGeolocateGateway for IpLocator {
    async fn locate(&self, ip_address: &str) -> Result<Coordinate, GatewayError> {
        match self {
            IpLocator::IpGeolocation(g) => g.locate(ip_address).await,
            IpLocator::Ripe(g) => g.locate(ip_address).await,
        }
    }
}
