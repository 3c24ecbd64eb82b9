//! HTTP client initialization.

use std::sync::Arc;

use reqwest::ClientBuilder;

use crate::config::GatewayConfig;

/// Builds the client shared by every HTTP gateway.
///
/// The per-request timeout and the User-Agent come from `gateway`; retries are
/// applied per call by the gateways themselves.
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(gateway: &GatewayConfig) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = ClientBuilder::new()
        .timeout(gateway.timeout)
        .user_agent(gateway.user_agent.clone())
        .build()?;
    Ok(Arc::new(client))
}
