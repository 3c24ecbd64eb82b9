//! Validator state and output types.

use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;

use crate::geo::Coordinate;

/// The last hop we trust: its point and RTT. Replaced wholesale on acceptance.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    pub ip_address: String,
    pub coordinate: Coordinate,
    pub min_rtt: f64,
    pub asn: Option<u32>,
}

/// Outcome for one hop that was compared against the anchor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerifiedHop {
    pub ip_address: String,
    /// Anchor RTT after the decision: the hop's own RTT when accepted
    pub rtt: f64,
    /// `None` when no radius could be derived (hop accepted by default)
    pub radius: Option<f64>,
    pub distance_km: Option<f64>,
    pub accepted: bool,
}

/// Why a hop never reached the comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, EnumIterMacro)]
#[serde(rename_all = "snake_case")]
pub enum ExclusionReason {
    UnmeasurableRtt,
    MissingAsn,
    DuplicateAsn,
    UnresolvedGeolocation,
    InvalidCoordinate,
    /// Processing stopped at an earlier rejection
    ChainHalted,
}

impl ExclusionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExclusionReason::UnmeasurableRtt => "unmeasurable_rtt",
            ExclusionReason::MissingAsn => "missing_asn",
            ExclusionReason::DuplicateAsn => "duplicate_asn",
            ExclusionReason::UnresolvedGeolocation => "unresolved_geolocation",
            ExclusionReason::InvalidCoordinate => "invalid_coordinate",
            ExclusionReason::ChainHalted => "chain_halted",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExcludedHop {
    pub ip_address: String,
    pub reason: ExclusionReason,
}

/// Result of folding a hop chain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChainOutcome {
    /// One entry per compared hop, in path order
    pub verified: Vec<VerifiedHop>,
    pub excluded: Vec<ExcludedHop>,
    /// Final anchor, if any hop could seed one
    pub anchor: Option<Anchor>,
    pub halted: bool,
}

impl ChainOutcome {
    pub fn accepted_count(&self) -> usize {
        self.verified.iter().filter(|hop| hop.accepted).count()
    }

    pub fn rejected_count(&self) -> usize {
        self.verified.len() - self.accepted_count()
    }

    pub fn excluded_count(&self, reason: ExclusionReason) -> usize {
        self.excluded.iter().filter(|hop| hop.reason == reason).count()
    }
}

/// Behavior switches for [`super::HopChainValidator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatorOptions {
    /// Stop comparing after the first rejection.
    pub stop_on_first_rejection: bool,
    /// Exclude hops that carry no ASN.
    pub require_asn: bool,
}

impl Default for ValidatorOptions {
    fn default() -> Self {
        Self {
            stop_on_first_rejection: false,
            require_asn: true,
        }
    }
}
