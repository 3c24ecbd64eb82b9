//! Shared HTTP plumbing for the gateways: one JSON GET with retry.

use log::debug;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use tokio_retry::RetryIf;

use crate::config::RetryPolicy;
use crate::error_handling::{get_retry_strategy, is_retriable, GatewayError};
use crate::geo::Coordinate;

/// Performs a GET returning a JSON body, retrying transient failures.
///
/// `label` names the query in errors and logs; it must not contain secrets
/// (API keys travel in `query` only).
pub(crate) async fn get_json(
    client: &Client,
    retry: &RetryPolicy,
    url: &str,
    query: &[(&str, &str)],
    label: &str,
) -> Result<Value, GatewayError> {
    RetryIf::spawn(
        get_retry_strategy(retry),
        || get_json_once(client, url, query, label),
        |e: &GatewayError| {
            let retriable = is_retriable(e);
            if retriable {
                debug!("Retrying gateway request for {}: {}", label, e);
            }
            retriable
        },
    )
    .await
}

async fn get_json_once(
    client: &Client,
    url: &str,
    query: &[(&str, &str)],
    label: &str,
) -> Result<Value, GatewayError> {
    let response = client.get(url).query(query).send().await?;
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(GatewayError::NotFound(label.to_string()));
    }
    if !status.is_success() {
        return Err(GatewayError::Status {
            status: status.as_u16(),
            query: label.to_string(),
        });
    }

    Ok(response.json::<Value>().await?)
}

/// Reads a number that providers send either as JSON number or as string.
fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Builds a validated coordinate from two JSON fields.
///
/// A missing or null pair means the provider has no location (`NotFound`);
/// anything unreadable or out of range is `Malformed`.
pub(crate) fn coordinate_from_json(
    lat: Option<&Value>,
    lon: Option<&Value>,
    label: &str,
) -> Result<Coordinate, GatewayError> {
    let (lat, lon) = match (lat, lon) {
        (Some(lat), Some(lon)) if !lat.is_null() && !lon.is_null() => (lat, lon),
        _ => return Err(GatewayError::NotFound(label.to_string())),
    };
    let (Some(lat), Some(lon)) = (as_f64(lat), as_f64(lon)) else {
        return Err(GatewayError::Malformed(format!(
            "non-numeric coordinate for {}: {}, {}",
            label, lat, lon
        )));
    };
    Coordinate::new(lat, lon)
        .map_err(|e| GatewayError::Malformed(format!("{} for {}", e, label)))
}

/// Joins a base URL and a path without doubling slashes.
pub(crate) fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}
