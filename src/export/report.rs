//! Floor test report.

use std::collections::BTreeMap;

use serde::Serialize;
use strum::IntoEnumIterator;

use crate::validator::{ChainOutcome, ExcludedHop, ExclusionReason, VerifiedHop};

/// Everything a run produces, in the order it is written out.
#[derive(Debug, Clone, Serialize)]
pub struct FloorTestReport {
    /// Hop file path or `traceroute:<target>`
    pub source: String,
    /// RFC 3339, UTC
    pub generated_at: String,
    pub summary: ReportSummary,
    pub hops: Vec<VerifiedHop>,
    pub excluded: Vec<ExcludedHop>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportSummary {
    /// Hops read from the source, before any exclusion
    pub captured: usize,
    /// Source entries that could not be parsed
    pub unparseable: usize,
    pub verified: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub excluded: BTreeMap<String, usize>,
    /// Gateway calls that failed in transport (not-found answers are not failures)
    pub gateway_failures: usize,
    pub anchor_ip: Option<String>,
    pub halted: bool,
}

impl FloorTestReport {
    pub fn new(
        source: String,
        captured: usize,
        unparseable: usize,
        gateway_failures: usize,
        outcome: ChainOutcome,
    ) -> Self {
        let excluded = ExclusionReason::iter()
            .map(|reason| {
                (
                    reason.as_str().to_string(),
                    outcome.excluded_count(reason),
                )
            })
            .collect();

        let summary = ReportSummary {
            captured,
            unparseable,
            verified: outcome.verified.len(),
            accepted: outcome.accepted_count(),
            rejected: outcome.rejected_count(),
            excluded,
            gateway_failures,
            anchor_ip: outcome.anchor.as_ref().map(|a| a.ip_address.clone()),
            halted: outcome.halted,
        };

        Self {
            source,
            generated_at: chrono::Utc::now().to_rfc3339(),
            summary,
            hops: outcome.verified,
            excluded: outcome.excluded,
        }
    }
}
