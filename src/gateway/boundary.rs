//! Country outlines from a GeoJSON FeatureCollection (e.g. Natural Earth
//! admin-0 countries).

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use reqwest::Client;
use serde_json::Value;

use super::http::get_json;
use super::BoundaryGateway;
use crate::config::RetryPolicy;
use crate::error_handling::GatewayError;

/// Feature properties that identify a country, checked in this order.
const COUNTRY_KEYS: &[&str] = &[
    "ISO_A2", "ISO_A2_EH", "ISO_A3", "ADM0_A3", "ADMIN", "NAME", "NAME_LONG", "iso_a2",
    "iso_a3", "admin", "name",
];

/// Natural Earth marks missing ISO codes with "-99".
const MISSING_CODE: &str = "-99";

type Outline = Arc<Vec<(f64, f64)>>;

/// In-memory boundary index keyed by upper-cased ISO codes and names.
#[derive(Debug, Default)]
pub struct GeoJsonBoundaries {
    index: HashMap<String, Outline>,
}

impl GeoJsonBoundaries {
    /// Loads a FeatureCollection from a local path or an http(s) URL.
    pub async fn load(
        source: &str,
        client: &Client,
        retry: &RetryPolicy,
    ) -> Result<Self, GatewayError> {
        let document = if source.starts_with("http://") || source.starts_with("https://") {
            get_json(client, retry, source, &[], "country boundaries").await?
        } else {
            let text = tokio::fs::read_to_string(source).await?;
            serde_json::from_str(&text)
                .map_err(|e| GatewayError::Malformed(format!("{}: {}", source, e)))?
        };
        let boundaries = Self::from_geojson(&document)?;
        info!(
            "Loaded {} country boundary keys from {}",
            boundaries.index.len(),
            source
        );
        Ok(boundaries)
    }

    /// Indexes every Polygon/MultiPolygon feature of a FeatureCollection.
    pub fn from_geojson(document: &Value) -> Result<Self, GatewayError> {
        let features = document
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| GatewayError::Malformed("GeoJSON has no features array".into()))?;

        let mut index = HashMap::new();
        for feature in features {
            let Some(outline) = feature.get("geometry").and_then(exterior_vertices) else {
                continue;
            };
            let outline = Arc::new(outline);
            let Some(properties) = feature.get("properties").and_then(Value::as_object) else {
                continue;
            };
            for key in COUNTRY_KEYS {
                let Some(name) = properties.get(*key).and_then(Value::as_str) else {
                    continue;
                };
                let name = name.trim();
                if name.is_empty() || name == MISSING_CODE {
                    continue;
                }
                index
                    .entry(name.to_uppercase())
                    .or_insert_with(|| Arc::clone(&outline));
            }
        }
        debug!("Indexed {} boundary keys", index.len());
        Ok(Self { index })
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl BoundaryGateway for GeoJsonBoundaries {
    async fn boundary(&self, country: &str) -> Result<Vec<(f64, f64)>, GatewayError> {
        self.index
            .get(&country.trim().to_uppercase())
            .map(|outline| outline.as_ref().clone())
            .ok_or_else(|| GatewayError::NotFound(country.to_string()))
    }
}

/// All exterior-ring vertices `(lon, lat)` of a Polygon or MultiPolygon.
/// Holes are ignored; the closing vertex of each ring is dropped.
fn exterior_vertices(geometry: &Value) -> Option<Vec<(f64, f64)>> {
    let coordinates = geometry.get("coordinates")?.as_array()?;
    let rings: Vec<&Value> = match geometry.get("type")?.as_str()? {
        "Polygon" => coordinates.first().into_iter().collect(),
        "MultiPolygon" => coordinates
            .iter()
            .filter_map(|polygon| polygon.as_array().and_then(|p| p.first()))
            .collect(),
        _ => return None,
    };

    let mut vertices = Vec::new();
    for ring in rings {
        let Some(ring) = ring.as_array() else { continue };
        let mut ring: Vec<(f64, f64)> = ring.iter().filter_map(vertex).collect();
        if ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        vertices.extend(ring);
    }
    (!vertices.is_empty()).then_some(vertices)
}

fn vertex(value: &Value) -> Option<(f64, f64)> {
    let pair = value.as_array()?;
    Some((pair.first()?.as_f64()?, pair.get(1)?.as_f64()?))
}
