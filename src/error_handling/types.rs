//! Error type definitions.
//!
//! This module defines the typed errors raised by the library and the error,
//! warning, and info categories counted while processing a hop chain.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing the HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// Invalid option combinations.
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    #[error("Record source must not be empty")]
    EmptySource,

    #[error("Velocity factor must be in (0, 1], got {0}")]
    VelocityFactorOutOfRange(f64),

    #[error("Maximum concurrency must be at least 1")]
    ZeroConcurrency,

    #[error("Maximum attempts must be at least 1")]
    ZeroAttempts,
}

/// Errors raised by the geometry functions.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum GeoError {
    /// Latitude outside [-90, 90], longitude outside [-180, 180], or a non-finite value.
    #[error("Invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },
}

/// Errors returned by the external gateways (geocoding, IP geolocation, boundaries).
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The provider answered but has no result for the query.
    #[error("No result for {0}")]
    NotFound(String),

    /// Transport-level failure (timeout, connection, body read).
    #[error("Gateway request failed: {0}")]
    Transport(ReqwestError),

    /// The provider answered with a non-success status.
    #[error("Gateway returned HTTP {status} for {query}")]
    Status { status: u16, query: String },

    /// The response could not be interpreted.
    #[error("Malformed gateway response: {0}")]
    Malformed(String),

    /// Reading a local data source failed.
    #[error("Gateway I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Drops the request URL, which carries provider API keys in its query string.
impl From<ReqwestError> for GatewayError {
    fn from(error: ReqwestError) -> Self {
        GatewayError::Transport(error.without_url())
    }
}

impl GatewayError {
    /// True when the gateway did its job and simply has nothing for the query.
    pub fn is_not_found(&self) -> bool {
        matches!(self, GatewayError::NotFound(_))
    }
}

/// Errors returned by the border fallback.
#[derive(Error, Debug)]
pub enum BorderError {
    /// A country's boundary could not be fetched.
    #[error("Boundary for {country} unavailable: {source}")]
    Unavailable {
        country: String,
        #[source]
        source: GatewayError,
    },

    /// A boundary was fetched but had no valid vertex.
    #[error("Boundary for {0} has no valid vertices")]
    EmptyBoundary(String),
}

/// A hop line that could not be parsed.
#[derive(Error, Debug, PartialEq)]
pub enum HopParseError {
    #[error("Hop has too few fields: {0:?}")]
    TooFewFields(String),

    #[error("Invalid RTT value {0:?}")]
    InvalidRtt(String),

    #[error("Invalid geolocation descriptor {0:?}")]
    InvalidDescriptor(String),
}

/// Failures obtaining the hop records themselves. These abort the run.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Failed to read hop source: {0}")]
    Io(#[from] std::io::Error),

    #[error("traceroute exited with {status}: {stderr}")]
    TracerouteFailed { status: String, stderr: String },
}

/// Transport failures counted per gateway call.
///
/// These never abort a run; each one degrades a single hop to the next fallback
/// or to exclusion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorType {
    GatewayTimeout,
    GatewayConnect,
    GatewayTooManyRequests,
    GatewayServerError,
    GatewayClientError,
    GatewayDecode,
    GatewayMalformedResponse,
    GatewayIo,
    GatewayOther,
}

/// Data-availability problems that exclude a hop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum WarningType {
    UnresolvedGeolocation,
    InvalidCoordinate,
    MissingAsn,
    UnparseableHop,
    EmptyBoundary,
}

/// Notable, expected events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum InfoType {
    UnmeasurableHop,
    DuplicateAsn,
    GatewayNotFound,
    BorderFallbackUsed,
    RejectedHop,
    ChainHalted,
}

impl std::fmt::Display for ErrorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorType::GatewayTimeout => "Gateway timeout",
            ErrorType::GatewayConnect => "Gateway connection error",
            ErrorType::GatewayTooManyRequests => "Gateway rate limited (429)",
            ErrorType::GatewayServerError => "Gateway server error (5xx)",
            ErrorType::GatewayClientError => "Gateway client error (4xx)",
            ErrorType::GatewayDecode => "Gateway response decode error",
            ErrorType::GatewayMalformedResponse => "Gateway malformed response",
            ErrorType::GatewayIo => "Gateway I/O error",
            ErrorType::GatewayOther => "Gateway other error",
        }
    }
}

impl WarningType {
    /// Returns a human-readable string representation of the warning type.
    pub fn as_str(&self) -> &'static str {
        match self {
            WarningType::UnresolvedGeolocation => "Unresolved geolocation",
            WarningType::InvalidCoordinate => "Invalid coordinate",
            WarningType::MissingAsn => "Missing ASN",
            WarningType::UnparseableHop => "Unparseable hop record",
            WarningType::EmptyBoundary => "Country boundary without valid vertices",
        }
    }
}

impl InfoType {
    /// Returns a human-readable string representation of the info type.
    pub fn as_str(&self) -> &'static str {
        match self {
            InfoType::UnmeasurableHop => "Unmeasurable hop (no RTT)",
            InfoType::DuplicateAsn => "Same ASN as previous accepted hop",
            InfoType::GatewayNotFound => "Gateway had no result",
            InfoType::BorderFallbackUsed => "Border fallback used",
            InfoType::RejectedHop => "Rejected hop (implausible geolocation)",
            InfoType::ChainHalted => "Skipped after chain halted",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_error_type_as_str() {
        assert_eq!(ErrorType::GatewayTimeout.as_str(), "Gateway timeout");
        assert_eq!(
            ErrorType::GatewayTooManyRequests.as_str(),
            "Gateway rate limited (429)"
        );
        assert_eq!(format!("{}", ErrorType::GatewayIo), "Gateway I/O error");
    }

    #[test]
    fn test_all_categories_have_string_representation() {
        for error_type in ErrorType::iter() {
            assert!(!error_type.as_str().is_empty(), "{:?}", error_type);
        }
        for warning_type in WarningType::iter() {
            assert!(!warning_type.as_str().is_empty(), "{:?}", warning_type);
        }
        for info_type in InfoType::iter() {
            assert!(!info_type.as_str().is_empty(), "{:?}", info_type);
        }
    }

    #[test]
    fn test_gateway_error_not_found() {
        assert!(GatewayError::NotFound("x".into()).is_not_found());
        assert!(!GatewayError::Malformed("x".into()).is_not_found());
    }

    #[test]
    fn test_border_error_display_names_country() {
        let err = BorderError::Unavailable {
            country: "ZZ".to_string(),
            source: GatewayError::NotFound("ZZ".to_string()),
        };
        assert!(err.to_string().contains("ZZ"));
    }
}
