//! Maximum propagation radius derived from an RTT increase.

use crate::config::{FIBER_VELOCITY_FACTOR, SPEED_OF_LIGHT_KM_PER_MS};

/// Converts RTT deltas (ms) into the farthest one-way distance (km) a signal can
/// cover in the medium.
///
/// `radius = |curr - prev| / 2 * c * velocity_factor`, with `c` in km/ms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusModel {
    speed_km_per_ms: f64,
}

impl Default for RadiusModel {
    fn default() -> Self {
        Self::fiber()
    }
}

impl RadiusModel {
    /// Light in optical fiber: two thirds of c, about 199.86 km/ms.
    pub fn fiber() -> Self {
        Self::with_velocity_factor(FIBER_VELOCITY_FACTOR)
    }

    /// Propagation at `factor * c`. `factor` is expected in (0, 1].
    pub fn with_velocity_factor(factor: f64) -> Self {
        Self {
            speed_km_per_ms: SPEED_OF_LIGHT_KM_PER_MS * factor,
        }
    }

    pub fn speed_km_per_ms(&self) -> f64 {
        self.speed_km_per_ms
    }

    /// Radius in km for the RTT growth from `prev_rtt` to `curr_rtt` (both ms).
    ///
    /// Returns `None` when `curr_rtt` is absent, or when either RTT is not a
    /// finite number.
    pub fn radius(&self, curr_rtt: Option<f64>, prev_rtt: f64) -> Option<f64> {
        let curr_rtt = curr_rtt?;
        if !curr_rtt.is_finite() || !prev_rtt.is_finite() {
            return None;
        }
        let one_way_ms = (curr_rtt - prev_rtt).abs() / 2.0;
        Some(one_way_ms * self.speed_km_per_ms)
    }
}
