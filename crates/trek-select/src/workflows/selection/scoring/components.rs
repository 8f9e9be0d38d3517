use std::collections::BTreeMap;

use super::super::domain::{CrewPreferences, Itinerary, ProgramId, Region};
use super::config::ScoringConfig;

/// Sum of the crew's aggregate scores over the programs this itinerary
/// offers, scaled by the program factor. Programs absent from the aggregate
/// table contribute nothing.
pub(crate) fn program_component(
    available: &[ProgramId],
    aggregates: &BTreeMap<ProgramId, f64>,
    config: &ScoringConfig,
) -> f64 {
    let offered: f64 = available
        .iter()
        .filter_map(|program_id| aggregates.get(program_id))
        .sum();
    offered * config.program_factor
}

/// Full points when the crew accepts the itinerary's difficulty tier.
/// Absent preferences accept every tier.
pub(crate) fn difficulty_component(
    itinerary: &Itinerary,
    preferences: Option<&CrewPreferences>,
    config: &ScoringConfig,
) -> f64 {
    let accepted = preferences.map_or(true, |prefs| prefs.accepts_difficulty(itinerary.difficulty));
    if accepted {
        config.difficulty_points
    } else {
        0.0
    }
}

/// Region coverage points: each covered region the crew ranked contributes
/// `(5 - rank) * step`, so rank 1 is worth 100 and rank 4 is worth 25 at the
/// default step. Zero unless the crew marked area important.
pub(crate) fn area_component(
    itinerary: &Itinerary,
    preferences: Option<&CrewPreferences>,
    config: &ScoringConfig,
) -> f64 {
    let Some(prefs) = preferences else {
        return 0.0;
    };
    if !prefs.area_important {
        return 0.0;
    }

    Region::ALL
        .iter()
        .filter(|&&region| itinerary.covers(region))
        .filter_map(|&region| prefs.area_rank(region))
        .map(|rank| (5.0 - f64::from(rank)) * config.area_rank_step)
        .sum()
}

/// Bonus when the crew cares about altitude and the itinerary stays at or
/// below the configured threshold. Unset itinerary altitude counts as zero.
pub(crate) fn altitude_component(
    itinerary: &Itinerary,
    preferences: Option<&CrewPreferences>,
    config: &ScoringConfig,
) -> f64 {
    let Some(prefs) = preferences else {
        return 0.0;
    };
    if !prefs.max_altitude_important {
        return 0.0;
    }

    let max_altitude = itinerary.max_altitude.unwrap_or(0);
    let threshold = prefs
        .max_altitude_threshold
        .unwrap_or(config.default_altitude_threshold);

    if max_altitude <= threshold {
        config.altitude_points
    } else {
        0.0
    }
}

/// Triangular preference curve centered on the ideal distance; one point
/// lost per mile of deviation, floored at zero. Itineraries without a
/// recorded distance are treated as exactly ideal.
pub(crate) fn distance_component(itinerary: &Itinerary, config: &ScoringConfig) -> f64 {
    let distance = itinerary
        .distance_miles
        .unwrap_or(config.ideal_distance_miles);
    (config.distance_points - (distance - config.ideal_distance_miles).abs()).max(0.0)
}
