//! Statistics printing.

use log::info;
use strum::IntoEnumIterator;

use crate::error_handling::{ErrorType, InfoType, ProcessingStats, WarningType};
use crate::export::ReportSummary;

/// Prints the per-category counters and the one-line run summary.
pub fn print_final_summary(summary: &ReportSummary, stats: &ProcessingStats, elapsed_seconds: f64) {
    print_error_statistics(stats);

    let excluded: usize = summary.excluded.values().sum();
    info!(
        "Checked {} hop{} ({} accepted, {} rejected, {} excluded) in {:.1}s",
        summary.verified,
        if summary.verified == 1 { "" } else { "s" },
        summary.accepted,
        summary.rejected,
        excluded,
        elapsed_seconds
    );
    if summary.halted {
        info!("Chain halted at the first rejection");
    }
}

/// Prints error, warning, and info statistics to the log.
pub fn print_error_statistics(error_stats: &ProcessingStats) {
    for line in error_statistics_lines(error_stats) {
        info!("{}", line);
    }
}

/// One heading per non-empty category, followed by its non-zero counters.
fn error_statistics_lines(error_stats: &ProcessingStats) -> Vec<String> {
    let mut lines = Vec::new();

    let total_errors = error_stats.total_errors();
    if total_errors > 0 {
        lines.push(format!("Error Counts ({} total):", total_errors));
        for error_type in ErrorType::iter() {
            let count = error_stats.get_error_count(error_type);
            if count > 0 {
                lines.push(format!("   {}: {}", error_type.as_str(), count));
            }
        }
    }

    let total_warnings = error_stats.total_warnings();
    if total_warnings > 0 {
        lines.push(format!("Warning Counts ({} total):", total_warnings));
        for warning_type in WarningType::iter() {
            let count = error_stats.get_warning_count(warning_type);
            if count > 0 {
                lines.push(format!("   {}: {}", warning_type.as_str(), count));
            }
        }
    }

    let total_info = error_stats.total_info();
    if total_info > 0 {
        lines.push(format!("Info Counts ({} total):", total_info));
        for info_type in InfoType::iter() {
            let count = error_stats.get_info_count(info_type);
            if count > 0 {
                lines.push(format!("   {}: {}", info_type.as_str(), count));
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_error_statistics_lines_empty() {
        assert!(error_statistics_lines(&ProcessingStats::new()).is_empty());
    }

    #[test]
    fn test_error_statistics_lines_list_only_nonzero_counters() {
        let stats = ProcessingStats::new();
        stats.increment_error(ErrorType::GatewayTimeout);
        stats.increment_error(ErrorType::GatewayTimeout);
        stats.increment_warning(WarningType::UnresolvedGeolocation);
        stats.increment_info(InfoType::BorderFallbackUsed);

        assert_eq!(
            error_statistics_lines(&stats),
            vec![
                "Error Counts (2 total):".to_string(),
                "   Gateway timeout: 2".to_string(),
                "Warning Counts (1 total):".to_string(),
                "   Unresolved geolocation: 1".to_string(),
                "Info Counts (1 total):".to_string(),
                "   Border fallback used: 1".to_string(),
            ]
        );
    }

    #[test]
    fn test_print_final_summary_does_not_panic() {
        let summary = ReportSummary {
            captured: 4,
            unparseable: 0,
            verified: 1,
            accepted: 1,
            rejected: 0,
            excluded: BTreeMap::from([("unmeasurable_rtt".to_string(), 2)]),
            gateway_failures: 0,
            anchor_ip: Some("192.0.2.1".to_string()),
            halted: true,
        };
        print_final_summary(&summary, &ProcessingStats::new(), 0.25);
    }
}
