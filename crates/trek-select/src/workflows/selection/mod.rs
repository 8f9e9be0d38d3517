//! Trek itinerary selection workflow.
//!
//! Crew members rate the catalog programs through a survey; the crew records
//! structured preferences (difficulty tolerance, region ranks, altitude,
//! distance); the scorer folds member ratings into one aggregate per program
//! and combines five independent component scores per itinerary; the ranker
//! orders the catalog by total score. All computation is request-scoped and
//! recomputed from storage on every call.

pub mod aggregation;
pub mod domain;
pub mod ranking;
pub mod repository;
pub mod router;
pub(crate) mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use aggregation::{aggregate, program_score_table};
pub use domain::{
    AggregationMethod, Camp, CampStop, Crew, CrewId, CrewMember, CrewMemberId, CrewPreferences,
    Difficulty, Itinerary, ItineraryId, Program, ProgramId, ProgramScore, Region,
    DEFAULT_INTEREST_SCORE, DEFAULT_SKILL_LEVEL,
};
pub use ranking::{rank_itineraries, RankedItinerary};
pub use repository::{
    CatalogRepository, CrewRepository, MemberProfile, RepositoryError,
};
pub use router::selection_router;
pub use scoring::{ComponentScores, ScoringConfig, ScoringEngine};
pub use service::{
    ItineraryDetail, MemberStatusView, SelectionService, SelectionServiceError, SurveyReceipt,
    SurveyScore, SurveySubmission,
};
