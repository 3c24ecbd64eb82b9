//! Error handling and processing statistics.
//!
//! This module provides:
//! - Typed errors for geometry, gateways, the border fallback and hop parsing
//! - Processing statistics tracking (errors, warnings, info metrics)
//! - Retry strategy configuration for gateway calls
//!
//! Counted categories are:
//! - **Errors**: gateway transport failures (recovered per hop, never fatal)
//! - **Warnings**: data-availability problems that exclude a hop
//! - **Info**: expected events (unmeasurable hops, fallbacks, rejections)

mod categorization;
mod stats;
mod types;

// Re-export public API
pub use categorization::{
    categorize_gateway_error, get_retry_strategy, is_retriable, record_gateway_error,
};
pub use stats::ProcessingStats;
pub use types::{
    BorderError, ConfigError, ErrorType, GatewayError, GeoError, HopParseError, InfoType,
    InitializationError, SourceError, WarningType,
};

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_processing_stats_initialization() {
        let stats = ProcessingStats::new();
        for error_type in ErrorType::iter() {
            assert_eq!(stats.get_error_count(error_type), 0);
        }
        for warning_type in WarningType::iter() {
            assert_eq!(stats.get_warning_count(warning_type), 0);
        }
        for info_type in InfoType::iter() {
            assert_eq!(stats.get_info_count(info_type), 0);
        }
    }

    #[test]
    fn test_processing_stats_totals() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::GatewayTimeout);
        stats.increment_error(ErrorType::GatewayTimeout);
        stats.increment_error(ErrorType::GatewayServerError);
        stats.increment_warning(WarningType::UnresolvedGeolocation);
        stats.increment_info(InfoType::RejectedHop);

        assert_eq!(stats.get_error_count(ErrorType::GatewayTimeout), 2);
        assert_eq!(stats.total_errors(), 3);
        assert_eq!(stats.total_warnings(), 1);
        assert_eq!(stats.total_info(), 1);
    }
}
