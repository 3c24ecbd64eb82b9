//! Application configuration and constants.
//!
//! This module provides:
//! - Physical model constants (speed of light, Earth radii)
//! - Operational defaults (timeouts, retries, sampling)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{Config, EarthRadius, GatewayConfig, IpProvider, LogFormat, LogLevel, RetryPolicy};
