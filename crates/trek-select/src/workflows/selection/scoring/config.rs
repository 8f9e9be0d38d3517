use serde::{Deserialize, Serialize};

/// Weights and thresholds for the five itinerary score components. The
/// defaults reproduce the crew workbook the service replaced; nothing in the
/// crew-facing model makes these configurable yet, so the service always
/// scores with `ScoringConfig::default()`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Multiplier applied to the summed program aggregates.
    pub program_factor: f64,
    /// Points granted when the crew accepts the itinerary's difficulty tier.
    pub difficulty_points: f64,
    /// Points per rank step for a covered, ranked region: `(5 - rank) * step`.
    pub area_rank_step: f64,
    /// Points granted when the itinerary stays under the altitude threshold.
    pub altitude_points: f64,
    /// Threshold used when the crew marks altitude important without one.
    pub default_altitude_threshold: u32,
    /// Center of the triangular distance preference curve, in miles.
    pub ideal_distance_miles: f64,
    /// Peak of the distance curve, awarded at exactly the ideal distance.
    pub distance_points: f64,
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            program_factor: 1.5,
            difficulty_points: 100.0,
            area_rank_step: 25.0,
            altitude_points: 50.0,
            default_altitude_threshold: 10_000,
            ideal_distance_miles: 50.0,
            distance_points: 100.0,
        }
    }
}
