//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::*;
use crate::error_handling::ConfigError;
use crate::export::ExportFormat;
use crate::geo::EarthModel;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Earth radius used by the great-circle distance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum EarthRadius {
    /// Mean Earth radius (IUGG)
    Mean,
    /// WGS84 semi-minor (polar) axis
    Polar,
}

impl From<EarthRadius> for EarthModel {
    fn from(r: EarthRadius) -> Self {
        match r {
            EarthRadius::Mean => EarthModel::MeanSphere,
            EarthRadius::Polar => EarthModel::PolarSphere,
        }
    }
}

/// Provider used to geolocate hops captured live (which only carry an IP address).
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum IpProvider {
    /// RIPE IPmap `locate/{ip}/best` (no API key)
    RipeIpmap,
    /// ipgeolocation.io (requires `IPGEOLOCATION_API_KEY`)
    Ipgeolocation,
}

/// Retry policy applied to every gateway request.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Total attempts, including the first one
    pub max_attempts: usize,
    /// Delay before the first retry; doubles on each further retry
    pub initial_delay: Duration,
    /// Cap on a single delay
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            initial_delay: Duration::from_millis(DEFAULT_RETRY_INITIAL_DELAY_MS),
            max_delay: Duration::from_secs(RETRY_MAX_DELAY_SECS),
        }
    }
}

/// Settings shared by all HTTP gateways. Built once from [`Config`] and injected
/// into each gateway at construction.
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub timeout: Duration,
    pub retry: RetryPolicy,
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            retry: RetryPolicy::default(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Library and CLI configuration.
///
/// Parsed from the command line by `clap`, or constructed programmatically.
///
/// # Examples
///
/// ```no_run
/// use geofloor::Config;
/// use std::path::PathBuf;
///
/// let config = Config {
///     source: "hops.txt".to_string(),
///     output: PathBuf::from("report.json"),
///     reference_country: Some("DE".to_string()),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "geofloor",
    version,
    about = "Checks that hop geolocations along a network path are reachable at the speed of light in fiber."
)]
pub struct Config {
    /// Hop record file, or a traceroute target when --live is set
    #[arg(value_parser)]
    pub source: String,

    /// Capture hops by running traceroute against SOURCE
    #[arg(long)]
    pub live: bool,

    /// Report output path ("-" for stdout)
    #[arg(long, short, default_value = DEFAULT_OUTPUT_PATH)]
    pub output: PathBuf,

    /// Report format: json|jsonl
    #[arg(long, value_enum, default_value_t = ExportFormat::Json)]
    pub format: ExportFormat,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Boundary vertices sampled per country for the border fallback (0 = all)
    #[arg(long, default_value_t = DEFAULT_SAMPLE_SIZE)]
    pub sample_size: usize,

    /// Seed for boundary sampling; makes the border fallback deterministic
    #[arg(long)]
    pub sample_seed: Option<u64>,

    /// Reference country for the border fallback (ISO code or name)
    #[arg(long)]
    pub reference_country: Option<String>,

    /// Country outlines as a GeoJSON FeatureCollection (path or http(s) URL)
    #[arg(long)]
    pub boundaries: Option<String>,

    /// Earth radius used for great-circle distances: mean|polar
    #[arg(long, value_enum, default_value_t = EarthRadius::Polar)]
    pub earth_model: EarthRadius,

    /// Fraction of the speed of light assumed for propagation
    #[arg(long, default_value_t = FIBER_VELOCITY_FACTOR)]
    pub velocity_factor: f64,

    /// Stop verifying the chain at the first rejected hop
    #[arg(long)]
    pub stop_on_reject: bool,

    /// Maximum concurrent gateway requests
    #[arg(long, default_value_t = DEFAULT_MAX_CONCURRENCY)]
    pub max_concurrency: usize,

    /// Per-request gateway timeout in seconds
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_seconds: u64,

    /// Attempts per gateway request, including the first
    #[arg(long, default_value_t = DEFAULT_MAX_ATTEMPTS)]
    pub max_attempts: usize,

    /// Delay before the first retry in milliseconds
    #[arg(long, default_value_t = DEFAULT_RETRY_INITIAL_DELAY_MS)]
    pub retry_initial_delay_ms: u64,

    /// HTTP User-Agent header value
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// OpenCage API key for city/region geocoding
    #[arg(long, env = OPENCAGE_API_KEY_ENV, hide_env_values = true)]
    pub opencage_api_key: Option<String>,

    /// OpenCage API base URL
    #[arg(long, default_value = OPENCAGE_BASE_URL)]
    pub opencage_url: String,

    /// IP geolocation provider for live hops: ripe-ipmap|ipgeolocation
    #[arg(long, value_enum, default_value_t = IpProvider::RipeIpmap)]
    pub ip_provider: IpProvider,

    /// ipgeolocation.io API key
    #[arg(long, env = IPGEOLOCATION_API_KEY_ENV, hide_env_values = true)]
    pub ipgeolocation_api_key: Option<String>,

    /// ipgeolocation.io API base URL
    #[arg(long, default_value = IPGEOLOCATION_BASE_URL)]
    pub ipgeolocation_url: String,

    /// RIPE IPmap API base URL
    #[arg(long, default_value = RIPE_IPMAP_BASE_URL)]
    pub ripe_ipmap_url: String,

    /// Maximum TTL probed by live capture
    #[arg(long, default_value_t = DEFAULT_MAX_HOPS)]
    pub max_hops: u8,

    /// traceroute executable used by live capture
    #[arg(long, default_value = DEFAULT_TRACEROUTE_BIN)]
    pub traceroute_bin: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: "hops.txt".to_string(),
            live: false,
            output: PathBuf::from(DEFAULT_OUTPUT_PATH),
            format: ExportFormat::Json,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            sample_size: DEFAULT_SAMPLE_SIZE,
            sample_seed: None,
            reference_country: None,
            boundaries: None,
            earth_model: EarthRadius::Polar,
            velocity_factor: FIBER_VELOCITY_FACTOR,
            stop_on_reject: false,
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_initial_delay_ms: DEFAULT_RETRY_INITIAL_DELAY_MS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            opencage_api_key: None,
            opencage_url: OPENCAGE_BASE_URL.to_string(),
            ip_provider: IpProvider::RipeIpmap,
            ipgeolocation_api_key: None,
            ipgeolocation_url: IPGEOLOCATION_BASE_URL.to_string(),
            ripe_ipmap_url: RIPE_IPMAP_BASE_URL.to_string(),
            max_hops: DEFAULT_MAX_HOPS,
            traceroute_bin: DEFAULT_TRACEROUTE_BIN.to_string(),
        }
    }
}

impl Config {
    /// Checks option combinations that `clap` cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.source.trim().is_empty() {
            return Err(ConfigError::EmptySource);
        }
        if !(self.velocity_factor > 0.0 && self.velocity_factor <= 1.0) {
            return Err(ConfigError::VelocityFactorOutOfRange(self.velocity_factor));
        }
        if self.max_concurrency == 0 {
            return Err(ConfigError::ZeroConcurrency);
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::ZeroAttempts);
        }
        Ok(())
    }

    /// Gateway settings derived from this configuration.
    pub fn gateway_config(&self) -> GatewayConfig {
        GatewayConfig {
            timeout: Duration::from_secs(self.timeout_seconds),
            retry: RetryPolicy {
                max_attempts: self.max_attempts,
                initial_delay: Duration::from_millis(self.retry_initial_delay_ms),
                max_delay: Duration::from_secs(RETRY_MAX_DELAY_SECS),
            },
            user_agent: self.user_agent.clone(),
        }
    }

    /// Whether the border fallback has everything it needs.
    pub fn border_fallback_enabled(&self) -> bool {
        self.reference_country.is_some() && self.boundaries.is_some()
    }
}
