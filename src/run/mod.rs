//! End-to-end floor test: capture, resolve, validate, report.

mod init;

pub use init::{init_resolver, GatewayResolver};

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use log::info;

use crate::app::print_final_summary;
use crate::config::Config;
use crate::error_handling::{InfoType, ProcessingStats, WarningType};
use crate::export::{write_report, FloorTestReport};
use crate::geo::RadiusModel;
use crate::hop::HopSource;
use crate::initialization::init_client;
use crate::validator::{ChainOutcome, ExclusionReason, HopChainValidator, ValidatorOptions};

/// Runs a floor test with the provided configuration.
///
/// Reads the hops (stored file or live traceroute), geolocates them with the
/// configured gateways, validates the chain in path order and writes the report
/// to `config.output`.
///
/// # Errors
///
/// Fails on invalid configuration, an unreadable hop source, an unreadable
/// boundary file, or when the report cannot be written. Gateway failures for
/// individual hops never fail the run; they are counted in the report.
pub async fn run_floor_test(config: Config) -> Result<FloorTestReport> {
    config
        .validate()
        .map_err(|e| anyhow::anyhow!("Configuration validation failed: {}", e))?;
    let start = Instant::now();

    let source = HopSource::from_config(&config);
    let parsed = source
        .capture()
        .await
        .context(format!("Failed to read hops from {}", source.describe()))?;
    let captured = parsed.hops.len();
    info!("Captured {} hops from {}", captured, source.describe());

    let stats = Arc::new(ProcessingStats::new());
    for _ in &parsed.skipped {
        stats.increment_warning(WarningType::UnparseableHop);
    }

    let gateway = config.gateway_config();
    let client = init_client(&gateway).context("Failed to initialize HTTP client")?;
    let resolver = init_resolver(&config, &gateway, client, Arc::clone(&stats)).await?;
    let records = resolver
        .resolve_all(parsed.hops, config.max_concurrency)
        .await;

    let validator = HopChainValidator::new(
        RadiusModel::with_velocity_factor(config.velocity_factor),
        config.earth_model.into(),
        ValidatorOptions {
            stop_on_first_rejection: config.stop_on_reject,
            require_asn: source.requires_asn(),
        },
    );
    let outcome = validator.validate(&records);
    record_outcome(&stats, &outcome);

    let report = FloorTestReport::new(
        source.describe(),
        captured,
        parsed.skipped.len(),
        stats.total_errors(),
        outcome,
    );
    let written = write_report(&report, &config.output, config.format)
        .await
        .context("Failed to write report")?;
    info!(
        "Floor test results for {} hops written to {}",
        written,
        config.output.display()
    );

    print_final_summary(&report.summary, &stats, start.elapsed().as_secs_f64());
    Ok(report)
}

/// Counts exclusions and rejections in the processing statistics.
fn record_outcome(stats: &ProcessingStats, outcome: &ChainOutcome) {
    for excluded in &outcome.excluded {
        match excluded.reason {
            ExclusionReason::UnmeasurableRtt => stats.increment_info(InfoType::UnmeasurableHop),
            ExclusionReason::DuplicateAsn => stats.increment_info(InfoType::DuplicateAsn),
            ExclusionReason::ChainHalted => stats.increment_info(InfoType::ChainHalted),
            ExclusionReason::MissingAsn => stats.increment_warning(WarningType::MissingAsn),
            ExclusionReason::UnresolvedGeolocation => {
                stats.increment_warning(WarningType::UnresolvedGeolocation)
            }
            ExclusionReason::InvalidCoordinate => {
                stats.increment_warning(WarningType::InvalidCoordinate)
            }
        }
    }
    for _ in 0..outcome.rejected_count() {
        stats.increment_info(InfoType::RejectedHop);
    }
}
