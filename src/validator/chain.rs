//! Rolling-anchor plausibility check over an ordered hop chain.

use log::{debug, warn};

use super::types::{
    Anchor, ChainOutcome, ExcludedHop, ExclusionReason, ValidatorOptions, VerifiedHop,
};
use crate::geo::{Coordinate, EarthModel, RadiusModel};
use crate::hop::HopRecord;

/// Validator state between hops.
#[derive(Debug, Clone, PartialEq)]
enum ChainState {
    NoAnchor,
    Anchored(Anchor),
    /// Stopped on a rejection; the anchor is kept for the report.
    Halted(Anchor),
}

impl ChainState {
    fn anchor(&self) -> Option<&Anchor> {
        match self {
            ChainState::NoAnchor => None,
            ChainState::Anchored(anchor) | ChainState::Halted(anchor) => Some(anchor),
        }
    }

    fn into_anchor(self) -> Option<Anchor> {
        match self {
            ChainState::NoAnchor => None,
            ChainState::Anchored(anchor) | ChainState::Halted(anchor) => Some(anchor),
        }
    }
}

/// A hop that passed every exclusion check.
struct EligibleHop<'a> {
    record: &'a HopRecord,
    point: Coordinate,
    min_rtt: f64,
}

/// Decides accept/reject for each hop against the last accepted hop.
///
/// A hop is accepted when its great-circle distance from the anchor is within
/// the radius light in fiber covers during half the RTT growth. Accepted hops
/// become the new anchor; rejected hops are reported and otherwise ignored.
#[derive(Debug, Clone, Default)]
pub struct HopChainValidator {
    radius_model: RadiusModel,
    earth_model: EarthModel,
    options: ValidatorOptions,
}

impl HopChainValidator {
    pub fn new(radius_model: RadiusModel, earth_model: EarthModel, options: ValidatorOptions) -> Self {
        Self {
            radius_model,
            earth_model,
            options,
        }
    }

    /// Folds `hops` in path order. Running twice on the same input yields the
    /// same outcome.
    pub fn validate(&self, hops: &[HopRecord]) -> ChainOutcome {
        let mut outcome = ChainOutcome::default();
        let mut state = ChainState::NoAnchor;
        for hop in hops {
            state = self.step(state, hop, &mut outcome);
        }
        outcome.halted = matches!(state, ChainState::Halted(_));
        outcome.anchor = state.into_anchor();
        outcome
    }

    fn step(&self, state: ChainState, hop: &HopRecord, outcome: &mut ChainOutcome) -> ChainState {
        if let ChainState::Halted(_) = state {
            exclude(outcome, hop, ExclusionReason::ChainHalted);
            return state;
        }

        let eligible = match self.eligibility(hop, state.anchor()) {
            Ok(eligible) => eligible,
            Err(reason) => {
                exclude(outcome, hop, reason);
                return state;
            }
        };

        match state {
            ChainState::NoAnchor => {
                debug!(
                    "Anchor seeded by {} at {} ({} ms)",
                    hop.ip_address, eligible.point, eligible.min_rtt
                );
                ChainState::Anchored(anchor_from(&eligible))
            }
            ChainState::Anchored(anchor) => self.compare(anchor, &eligible, outcome),
            halted @ ChainState::Halted(_) => halted,
        }
    }

    fn eligibility<'a>(
        &self,
        hop: &'a HopRecord,
        anchor: Option<&Anchor>,
    ) -> Result<EligibleHop<'a>, ExclusionReason> {
        let min_rtt = hop.min_rtt.ok_or(ExclusionReason::UnmeasurableRtt)?;
        if hop.asn.is_none() && self.options.require_asn {
            return Err(ExclusionReason::MissingAsn);
        }
        if hop.asn.is_some() && anchor.is_some_and(|a| a.asn == hop.asn) {
            return Err(ExclusionReason::DuplicateAsn);
        }
        let point = hop
            .geolocation
            .point()
            .ok_or(ExclusionReason::UnresolvedGeolocation)?;
        if let Err(e) = point.validate() {
            warn!("Excluding {}: {}", hop.ip_address, e);
            return Err(ExclusionReason::InvalidCoordinate);
        }
        Ok(EligibleHop {
            record: hop,
            point,
            min_rtt,
        })
    }

    fn compare(&self, anchor: Anchor, hop: &EligibleHop<'_>, outcome: &mut ChainOutcome) -> ChainState {
        let radius = self.radius_model.radius(Some(hop.min_rtt), anchor.min_rtt);
        let distance_km = match self.earth_model.distance(anchor.coordinate, hop.point) {
            Ok(d) => d,
            Err(e) => {
                warn!("Excluding {}: {}", hop.record.ip_address, e);
                exclude(outcome, hop.record, ExclusionReason::InvalidCoordinate);
                return ChainState::Anchored(anchor);
            }
        };

        let accepted = within_radius(radius, distance_km);
        let next = if accepted {
            ChainState::Anchored(anchor_from(hop))
        } else {
            warn!(
                "A wrong IP mapping has occurred: {} at {} is {:.1} km from {} but the RTT allows {:.1} km",
                hop.record.ip_address,
                hop.point,
                distance_km,
                anchor.ip_address,
                radius.unwrap_or_default()
            );
            if self.options.stop_on_first_rejection {
                ChainState::Halted(anchor)
            } else {
                ChainState::Anchored(anchor)
            }
        };

        let rtt = next.anchor().map_or(hop.min_rtt, |a| a.min_rtt);
        outcome.verified.push(VerifiedHop {
            ip_address: hop.record.ip_address.clone(),
            rtt,
            radius,
            distance_km: Some(distance_km),
            accepted,
        });
        next
    }
}

/// An unknown radius accepts: there is no evidence against the hop.
fn within_radius(radius: Option<f64>, distance_km: f64) -> bool {
    match radius {
        Some(radius) => distance_km <= radius,
        None => true,
    }
}

fn anchor_from(hop: &EligibleHop<'_>) -> Anchor {
    Anchor {
        ip_address: hop.record.ip_address.clone(),
        coordinate: hop.point,
        min_rtt: hop.min_rtt,
        asn: hop.record.asn,
    }
}

fn exclude(outcome: &mut ChainOutcome, hop: &HopRecord, reason: ExclusionReason) {
    debug!("Excluding {}: {}", hop.ip_address, reason.as_str());
    outcome.excluded.push(ExcludedHop {
        ip_address: hop.ip_address.clone(),
        reason,
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hop::{Geolocation, LocationSource, ResolvedPoint};

    fn c(lat: f64, lon: f64) -> Coordinate {
        Coordinate { lat, lon }
    }

    fn hop(ip: &str, asn: u32, rtt: f64, lat: f64, lon: f64) -> HopRecord {
        HopRecord::at(ip, Some(asn), Some(rtt), c(lat, lon))
    }

    fn validator() -> HopChainValidator {
        HopChainValidator::default()
    }

    #[test]
    fn test_nearby_hop_with_rtt_growth_is_accepted() {
        let hops = [
            hop("10.0.0.1", 1, 10.0, 0.0, 0.0),
            hop("10.0.0.2", 2, 15.0, 0.0, 0.001),
        ];
        let outcome = validator().validate(&hops);
        assert_eq!(outcome.verified.len(), 1);
        let v = &outcome.verified[0];
        assert!(v.accepted);
        assert_eq!(v.ip_address, "10.0.0.2");
        assert_eq!(v.rtt, 15.0);
        assert!((v.radius.unwrap() - 499.654).abs() < 1e-3);
        assert!(v.distance_km.unwrap() < 0.2);
        assert_eq!(outcome.anchor.unwrap().ip_address, "10.0.0.2");
    }

    #[test]
    fn test_transcontinental_jump_on_tiny_delta_is_rejected() {
        let hops = [
            hop("10.0.0.1", 1, 10.0, 0.0, 0.0),
            hop("10.0.0.2", 2, 10.1, 40.71, -74.00),
        ];
        let outcome = validator().validate(&hops);
        assert_eq!(outcome.verified.len(), 1);
        let v = &outcome.verified[0];
        assert!(!v.accepted);
        assert_eq!(v.rtt, 10.0);
        assert!(v.radius.unwrap() < 10.0);
        assert!(v.distance_km.unwrap() > 8000.0);
        assert_eq!(outcome.anchor.unwrap().ip_address, "10.0.0.1");
        assert!(!outcome.halted);
    }

    #[test]
    fn test_duplicate_asn_is_excluded_and_anchor_kept() {
        let hops = [
            hop("10.0.0.1", 7, 10.0, 0.0, 0.0),
            hop("10.0.0.2", 7, 20.0, 0.0, 0.1),
        ];
        let outcome = validator().validate(&hops);
        assert!(outcome.verified.is_empty());
        assert_eq!(outcome.excluded_count(ExclusionReason::DuplicateAsn), 1);
        assert_eq!(outcome.anchor.unwrap().ip_address, "10.0.0.1");
    }

    #[test]
    fn test_duplicate_asn_compares_with_last_accepted_hop() {
        // The rejected hop's ASN does not shadow the anchor's
        let hops = [
            hop("10.0.0.1", 1, 10.0, 0.0, 0.0),
            hop("10.0.0.2", 2, 10.0, 50.0, 50.0),
            hop("10.0.0.3", 1, 30.0, 0.0, 0.0),
            hop("10.0.0.4", 2, 40.0, 0.0, 0.1),
        ];
        let outcome = validator().validate(&hops);
        let ips: Vec<&str> = outcome.verified.iter().map(|v| v.ip_address.as_str()).collect();
        assert_eq!(ips, ["10.0.0.2", "10.0.0.4"]);
        assert_eq!(outcome.excluded[0].ip_address, "10.0.0.3");
        assert_eq!(outcome.excluded[0].reason, ExclusionReason::DuplicateAsn);
    }

    #[test]
    fn test_identical_coordinates_always_accepted() {
        for rtt in [10.0, 10.0 + 1e-9, 250.0] {
            let hops = [
                hop("10.0.0.1", 1, 10.0, 48.85, 2.35),
                hop("10.0.0.2", 2, rtt, 48.85, 2.35),
            ];
            let outcome = validator().validate(&hops);
            assert!(outcome.verified[0].accepted, "rtt {}", rtt);
            assert_eq!(outcome.verified[0].distance_km, Some(0.0));
        }
    }

    #[test]
    fn test_distant_points_with_zero_delta_rejected() {
        let hops = [
            hop("10.0.0.1", 1, 25.0, 0.0, 0.0),
            hop("10.0.0.2", 2, 25.0, 0.0, 0.01),
        ];
        let outcome = validator().validate(&hops);
        assert_eq!(outcome.verified[0].radius, Some(0.0));
        assert!(!outcome.verified[0].accepted);
    }

    #[test]
    fn test_seed_emits_nothing() {
        let outcome = validator().validate(&[hop("10.0.0.1", 1, 5.0, 0.0, 0.0)]);
        assert!(outcome.verified.is_empty());
        assert!(outcome.excluded.is_empty());
        let anchor = outcome.anchor.unwrap();
        assert_eq!(anchor.min_rtt, 5.0);
        assert_eq!(anchor.coordinate, c(0.0, 0.0));
    }

    #[test]
    fn test_first_resolvable_hop_seeds_anchor() {
        let unresolved = HopRecord {
            ip_address: "10.0.0.1".into(),
            asn: Some(1),
            min_rtt: Some(1.0),
            geolocation: Geolocation::Unresolved {
                country_code: "US".into(),
            },
        };
        let hops = [
            unresolved,
            hop("10.0.0.2", 2, 2.0, 0.0, 0.0),
            hop("10.0.0.3", 3, 12.0, 0.0, 1.0),
        ];
        let outcome = validator().validate(&hops);
        assert_eq!(outcome.excluded_count(ExclusionReason::UnresolvedGeolocation), 1);
        assert_eq!(outcome.verified.len(), 1);
        assert_eq!(outcome.verified[0].ip_address, "10.0.0.3");
        assert!(outcome.verified[0].accepted);
    }

    #[test]
    fn test_unmeasurable_hops_never_reported() {
        let hops = [
            hop("10.0.0.1", 1, 10.0, 0.0, 0.0),
            HopRecord::at("10.0.0.2", Some(2), None, c(0.0, 0.0)),
            hop("10.0.0.3", 3, 20.0, 0.0, 0.5),
        ];
        let outcome = validator().validate(&hops);
        assert!(outcome.verified.iter().all(|v| v.ip_address != "10.0.0.2"));
        assert_eq!(outcome.excluded_count(ExclusionReason::UnmeasurableRtt), 1);
        assert_eq!(outcome.verified.len(), 1);
    }

    #[test]
    fn test_missing_asn_depends_on_options() {
        let hops = [
            HopRecord::at("10.0.0.1", None, Some(1.0), c(0.0, 0.0)),
            HopRecord::at("10.0.0.2", None, Some(9.0), c(0.0, 0.1)),
        ];
        let strict = validator().validate(&hops);
        assert_eq!(strict.excluded_count(ExclusionReason::MissingAsn), 2);
        assert!(strict.anchor.is_none());

        let lenient = HopChainValidator::new(
            RadiusModel::default(),
            EarthModel::default(),
            ValidatorOptions {
                require_asn: false,
                ..ValidatorOptions::default()
            },
        )
        .validate(&hops);
        assert!(lenient.excluded.is_empty());
        assert_eq!(lenient.accepted_count(), 1);
    }

    #[test]
    fn test_rejection_keeps_scanning_against_old_anchor() {
        let hops = [
            hop("10.0.0.1", 1, 10.0, 0.0, 0.0),
            hop("10.0.0.2", 2, 10.5, 35.0, 139.0),
            hop("10.0.0.3", 3, 11.0, 0.0, 0.1),
        ];
        let outcome = validator().validate(&hops);
        assert_eq!(outcome.rejected_count(), 1);
        assert_eq!(outcome.accepted_count(), 1);
        let third = &outcome.verified[1];
        assert!(third.accepted);
        // radius from the first hop's RTT, not the rejected one's
        assert!((third.radius.unwrap() - 99.93).abs() < 0.01);
    }

    #[test]
    fn test_stop_on_first_rejection_halts_chain() {
        let hops = [
            hop("10.0.0.1", 1, 10.0, 0.0, 0.0),
            hop("10.0.0.2", 2, 10.5, 35.0, 139.0),
            hop("10.0.0.3", 3, 11.0, 0.0, 0.1),
            hop("10.0.0.4", 4, 12.0, 0.0, 0.2),
        ];
        let validator = HopChainValidator::new(
            RadiusModel::default(),
            EarthModel::default(),
            ValidatorOptions {
                stop_on_first_rejection: true,
                ..ValidatorOptions::default()
            },
        );
        let outcome = validator.validate(&hops);
        assert!(outcome.halted);
        assert_eq!(outcome.verified.len(), 1);
        assert_eq!(outcome.excluded_count(ExclusionReason::ChainHalted), 2);
        assert_eq!(outcome.anchor.unwrap().ip_address, "10.0.0.1");
    }

    #[test]
    fn test_invalid_coordinate_excluded() {
        let bad = HopRecord {
            ip_address: "10.0.0.2".into(),
            asn: Some(2),
            min_rtt: Some(20.0),
            geolocation: Geolocation::Resolved(ResolvedPoint {
                coordinate: c(95.0, 0.0),
                source: LocationSource::Ip,
            }),
        };
        let hops = [hop("10.0.0.1", 1, 10.0, 0.0, 0.0), bad];
        let outcome = validator().validate(&hops);
        assert!(outcome.verified.is_empty());
        assert_eq!(outcome.excluded_count(ExclusionReason::InvalidCoordinate), 1);
    }

    #[test]
    fn test_validation_is_idempotent() {
        let hops = [
            hop("10.0.0.1", 1, 10.0, 0.0, 0.0),
            hop("10.0.0.2", 2, 10.1, 40.71, -74.0),
            hop("10.0.0.3", 3, 30.0, 1.0, 1.0),
            HopRecord::at("10.0.0.4", Some(4), None, c(0.0, 0.0)),
        ];
        let v = validator();
        assert_eq!(v.validate(&hops), v.validate(&hops));
    }

    #[test]
    fn test_unknown_radius_accepts_by_default() {
        assert!(within_radius(None, 1e9));
        assert!(within_radius(Some(10.0), 10.0));
        assert!(!within_radius(Some(10.0), 10.0001));
    }
}
