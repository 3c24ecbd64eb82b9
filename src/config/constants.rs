//! Configuration constants.
//!
//! This module defines the physical constants of the plausibility model and the
//! operational defaults (timeouts, retry policy, sampling) used throughout the
//! application. Units are fixed: distances in kilometers, times in milliseconds.

// Physical model
/// Speed of light in vacuum, in kilometers per millisecond.
///
/// Kept in km/ms so it can be multiplied directly with RTT values, which are
/// always milliseconds in this crate.
pub const SPEED_OF_LIGHT_KM_PER_MS: f64 = 299.792458;

/// Fraction of the vacuum speed of light reached by a signal in optical fiber
/// (refractive index of roughly 1.5).
pub const FIBER_VELOCITY_FACTOR: f64 = 2.0 / 3.0;

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_MEAN_RADIUS_KM: f64 = 6371.0088;

/// WGS84 semi-major axis in kilometers.
pub const WGS84_SEMI_MAJOR_KM: f64 = 6378.137;

/// WGS84 flattening.
pub const WGS84_FLATTENING: f64 = 1.0 / 298.257223563;

// Border fallback
/// Default number of boundary vertices kept per country when searching for the
/// nearest point pair. The search is quadratic in this value.
pub const DEFAULT_SAMPLE_SIZE: usize = 100;

// Gateway policy
/// Per-request gateway timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Maximum number of attempts per gateway request (initial attempt + retries)
pub const DEFAULT_MAX_ATTEMPTS: usize = 3;
/// Delay before the first retry in milliseconds; doubled on each further retry
pub const DEFAULT_RETRY_INITIAL_DELAY_MS: u64 = 250;
/// Upper bound on a single retry delay in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 10;
/// Maximum gateway requests in flight while resolving hops
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;

// Traceroute capture
pub const DEFAULT_MAX_HOPS: u8 = 30;
pub const DEFAULT_TRACEROUTE_BIN: &str = "traceroute";

// Report output
pub const DEFAULT_OUTPUT_PATH: &str = "floor_test_results.json";

// Gateway endpoints
pub const OPENCAGE_BASE_URL: &str = "https://api.opencagedata.com";
pub const IPGEOLOCATION_BASE_URL: &str = "https://api.ipgeolocation.io";
pub const RIPE_IPMAP_BASE_URL: &str = "https://ipmap-api.ripe.net";

/// Environment variable holding the OpenCage API key
pub const OPENCAGE_API_KEY_ENV: &str = "OPENCAGE_API_KEY";
/// Environment variable holding the ipgeolocation.io API key
pub const IPGEOLOCATION_API_KEY_ENV: &str = "IPGEOLOCATION_API_KEY";

// HTTP status codes
pub const HTTP_STATUS_TOO_MANY_REQUESTS: u16 = 429;

/// Default User-Agent sent to the geocoding providers.
pub const DEFAULT_USER_AGENT: &str = concat!("geofloor/", env!("CARGO_PKG_VERSION"));
