mod components;
mod config;

pub use config::ScoringConfig;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{CrewPreferences, Itinerary, ProgramId};

/// Stateless scorer applying the component weights to one itinerary at a
/// time. The five components are independent and purely additive.
pub struct ScoringEngine {
    config: ScoringConfig,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig) -> Self {
        Self { config }
    }

    pub fn score(
        &self,
        itinerary: &Itinerary,
        available_programs: &[ProgramId],
        aggregates: &BTreeMap<ProgramId, f64>,
        preferences: Option<&CrewPreferences>,
    ) -> ComponentScores {
        ComponentScores {
            program: components::program_component(available_programs, aggregates, &self.config),
            difficulty: components::difficulty_component(itinerary, preferences, &self.config),
            area: components::area_component(itinerary, preferences, &self.config),
            altitude: components::altitude_component(itinerary, preferences, &self.config),
            distance: components::distance_component(itinerary, &self.config),
        }
    }
}

impl Default for ScoringEngine {
    fn default() -> Self {
        Self::new(ScoringConfig::default())
    }
}

/// The five named contributions to an itinerary's total, kept separate so
/// rankings stay explainable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub program: f64,
    pub difficulty: f64,
    pub area: f64,
    pub altitude: f64,
    pub distance: f64,
}

impl ComponentScores {
    pub fn total(&self) -> f64 {
        self.program + self.difficulty + self.area + self.altitude + self.distance
    }
}
