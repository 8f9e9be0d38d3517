use serde::{Deserialize, Serialize};

use super::domain::Itinerary;
use super::scoring::ComponentScores;

/// One row of the ranked results: the itinerary, its component breakdown,
/// the summed total, and a 1-based rank. Derived per request, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedItinerary {
    pub itinerary: Itinerary,
    pub total_score: f64,
    pub components: ComponentScores,
    pub rank: u32,
}

/// Sort scored itineraries by total descending and assign ranks. The sort is
/// stable, so itineraries with equal totals keep their catalog order.
pub fn rank_itineraries(scored: Vec<(Itinerary, ComponentScores)>) -> Vec<RankedItinerary> {
    let mut ranked: Vec<RankedItinerary> = scored
        .into_iter()
        .map(|(itinerary, components)| RankedItinerary {
            total_score: components.total(),
            itinerary,
            components,
            rank: 0,
        })
        .collect();

    ranked.sort_by(|a, b| b.total_score.total_cmp(&a.total_score));

    for (index, entry) in ranked.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }

    ranked
}
