use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::aggregation::program_score_table;
use super::domain::{
    AggregationMethod, CampStop, Crew, CrewId, CrewMember, CrewMemberId, CrewPreferences,
    Itinerary, ProgramId, DEFAULT_INTEREST_SCORE, DEFAULT_SKILL_LEVEL,
};
use super::ranking::{rank_itineraries, RankedItinerary};
use super::repository::{
    CatalogRepository, CrewRepository, MemberProfile, RepositoryError,
};
use super::scoring::ScoringEngine;

/// Service composing the catalog, crew storage, and scoring engine. Every
/// operation is parameterized by an explicit crew id; there is no ambient
/// default crew.
pub struct SelectionService<C, R> {
    catalog: Arc<C>,
    crews: Arc<R>,
    engine: ScoringEngine,
}

impl<C, R> SelectionService<C, R>
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    pub fn new(catalog: Arc<C>, crews: Arc<R>) -> Self {
        Self::with_engine(catalog, crews, ScoringEngine::default())
    }

    pub fn with_engine(catalog: Arc<C>, crews: Arc<R>, engine: ScoringEngine) -> Self {
        Self {
            catalog,
            crews,
            engine,
        }
    }

    /// One aggregate score per program the crew has rated, using the
    /// requested method. Programs nobody scored are absent from the map.
    pub fn aggregate_program_scores(
        &self,
        crew: CrewId,
        method: AggregationMethod,
    ) -> Result<BTreeMap<ProgramId, f64>, SelectionServiceError> {
        let facts = self.crews.scores(crew)?;
        let catalog = self.catalog.programs()?;
        Ok(program_score_table(&facts, &catalog, method))
    }

    /// Score every catalog itinerary for the crew and return the full ranked
    /// set, highest total first. Recomputed from storage on every call.
    pub fn score_itineraries(
        &self,
        crew: CrewId,
        method: AggregationMethod,
    ) -> Result<Vec<RankedItinerary>, SelectionServiceError> {
        let aggregates = self.aggregate_program_scores(crew, method)?;
        let preferences = self.crews.preferences(crew)?;

        let mut scored = Vec::new();
        for itinerary in self.catalog.itineraries()? {
            let available = self.catalog.available_programs(itinerary.id)?;
            let components =
                self.engine
                    .score(&itinerary, &available, &aggregates, preferences.as_ref());
            scored.push((itinerary, components));
        }

        Ok(rank_itineraries(scored))
    }

    /// Process one member's survey: resolve the member (explicit id, email
    /// match, name match, or create), then replace that member's score rows
    /// with one row per catalog program.
    pub fn submit_survey(
        &self,
        crew: CrewId,
        submission: SurveySubmission,
    ) -> Result<SurveyReceipt, SelectionServiceError> {
        self.require_crew(crew)?;

        let (member, created) = self.resolve_member(crew, &submission)?;

        let submitted: HashMap<ProgramId, i32> = submission
            .scores
            .iter()
            .map(|entry| (entry.program_id, entry.score))
            .collect();

        let rows: Vec<(ProgramId, i32)> = self
            .catalog
            .programs()?
            .iter()
            .map(|program| {
                let score = submitted
                    .get(&program.id)
                    .copied()
                    .unwrap_or(DEFAULT_INTEREST_SCORE);
                (program.id, score)
            })
            .collect();

        self.crews.replace_member_scores(crew, member.id, &rows)?;
        self.recalculate_crew_scores(crew)?;

        Ok(SurveyReceipt {
            member,
            created,
            scored_programs: rows.len(),
        })
    }

    fn resolve_member(
        &self,
        crew: CrewId,
        submission: &SurveySubmission,
    ) -> Result<(CrewMember, bool), SelectionServiceError> {
        if let Some(member_id) = submission.member_id {
            let existing = self
                .crews
                .members(crew)?
                .into_iter()
                .find(|member| member.id == member_id)
                .ok_or(RepositoryError::NotFound)?;

            let profile = MemberProfile {
                name: non_empty(submission.name.as_deref()).unwrap_or_else(|| existing.name.clone()),
                email: non_empty(submission.email.as_deref()).or_else(|| existing.email.clone()),
                age: submission.age.or(existing.age),
                skill_level: submission.skill_level.unwrap_or(existing.skill_level),
            };
            let updated = self.crews.update_member(existing.id, profile)?;
            return Ok((updated, false));
        }

        let name = non_empty(submission.name.as_deref()).ok_or_else(|| {
            SelectionServiceError::Validation("name and email are required for new members".into())
        })?;
        let email = non_empty(submission.email.as_deref()).ok_or_else(|| {
            SelectionServiceError::Validation("name and email are required for new members".into())
        })?;

        let profile = MemberProfile {
            name: name.clone(),
            email: Some(email.clone()),
            age: submission.age,
            skill_level: submission.skill_level.unwrap_or(DEFAULT_SKILL_LEVEL),
        };

        let existing = match self.crews.find_member_by_email(crew, &email)? {
            Some(member) => Some(member),
            None => self.crews.find_member_by_name(crew, &name)?,
        };

        match existing {
            Some(member) => {
                let updated = self.crews.update_member(member.id, profile)?;
                Ok((updated, false))
            }
            None => {
                let inserted = self.crews.insert_member(crew, profile)?;
                Ok((inserted, true))
            }
        }
    }

    pub fn preferences(
        &self,
        crew: CrewId,
    ) -> Result<Option<CrewPreferences>, SelectionServiceError> {
        self.require_crew(crew)?;
        Ok(self.crews.preferences(crew)?)
    }

    /// Create or overwrite the crew's single preferences record.
    pub fn save_preferences(
        &self,
        crew: CrewId,
        preferences: CrewPreferences,
    ) -> Result<(), SelectionServiceError> {
        self.require_crew(crew)?;
        self.crews.upsert_preferences(crew, preferences)?;
        Ok(())
    }

    pub fn crews(&self) -> Result<Vec<Crew>, SelectionServiceError> {
        Ok(self.crews.crews()?)
    }

    pub fn add_crew(&self, name: &str, size: u8) -> Result<Crew, SelectionServiceError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(SelectionServiceError::Validation(
                "crew name is required".into(),
            ));
        }
        Ok(self.crews.insert_crew(name, size)?)
    }

    /// Admin insert. No recalculation: a fresh member has no score rows yet.
    pub fn add_member(
        &self,
        crew: CrewId,
        profile: MemberProfile,
    ) -> Result<CrewMember, SelectionServiceError> {
        self.require_crew(crew)?;
        if profile.name.trim().is_empty() {
            return Err(SelectionServiceError::Validation(
                "member name is required".into(),
            ));
        }
        Ok(self.crews.insert_member(crew, profile)?)
    }

    pub fn update_member(
        &self,
        crew: CrewId,
        member: CrewMemberId,
        profile: MemberProfile,
    ) -> Result<CrewMember, SelectionServiceError> {
        if profile.name.trim().is_empty() {
            return Err(SelectionServiceError::Validation(
                "member name is required".into(),
            ));
        }
        let updated = self.crews.update_member(member, profile)?;
        self.recalculate_crew_scores(crew)?;
        Ok(updated)
    }

    pub fn delete_member(
        &self,
        crew: CrewId,
        member: CrewMemberId,
    ) -> Result<(), SelectionServiceError> {
        self.crews.delete_member(member)?;
        self.recalculate_crew_scores(crew)?;
        Ok(())
    }

    /// Crew roster with a per-member flag showing whether a survey has been
    /// submitted for them.
    pub fn roster(&self, crew: CrewId) -> Result<Vec<MemberStatusView>, SelectionServiceError> {
        self.require_crew(crew)?;
        let mut roster = Vec::new();
        for member in self.crews.members(crew)? {
            let survey_completed = self.crews.member_has_scores(member.id)?;
            roster.push(MemberStatusView {
                member,
                survey_completed,
            });
        }
        Ok(roster)
    }

    pub fn itinerary_detail(
        &self,
        code: &str,
    ) -> Result<Option<ItineraryDetail>, SelectionServiceError> {
        let Some(itinerary) = self.catalog.itinerary_by_code(code)? else {
            return Ok(None);
        };
        let camps = self.catalog.camp_stops(itinerary.id)?;
        Ok(Some(ItineraryDetail { itinerary, camps }))
    }

    /// Eagerly recompute the crew's aggregate tables after a score write.
    /// Cheap and idempotent, so callers invoke it after every mutation
    /// rather than scheduling background work.
    pub fn recalculate_crew_scores(&self, crew: CrewId) -> Result<(), SelectionServiceError> {
        for method in [
            AggregationMethod::Total,
            AggregationMethod::Average,
            AggregationMethod::Median,
        ] {
            let table = self.aggregate_program_scores(crew, method)?;
            info!(
                crew = crew.0,
                method = method.as_str(),
                programs = table.len(),
                "recalculated aggregate program scores"
            );
        }

        self.crews.touch_crew(crew)?;
        self.invalidate_crew_cache(crew);
        Ok(())
    }

    /// Invalidation hook for a results cache. Nothing is cached today, so
    /// this is a deliberate pass-through; score writes are already routed
    /// through it should that change.
    pub fn invalidate_crew_cache(&self, _crew: CrewId) {}

    fn require_crew(&self, crew: CrewId) -> Result<Crew, SelectionServiceError> {
        Ok(self.crews.crew(crew)?.ok_or(RepositoryError::NotFound)?)
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|trimmed| !trimmed.is_empty())
        .map(str::to_string)
}

/// Parsed survey payload: who submitted, and their per-program ratings.
/// Programs missing from `scores` fall back to [`DEFAULT_INTEREST_SCORE`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveySubmission {
    /// Set when the respondent picked an existing roster entry.
    #[serde(default)]
    pub member_id: Option<CrewMemberId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub age: Option<u8>,
    #[serde(default)]
    pub skill_level: Option<u8>,
    #[serde(default)]
    pub scores: Vec<SurveyScore>,
}

/// One already-parsed `(program, score)` fact from a survey form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyScore {
    pub program_id: ProgramId,
    pub score: i32,
}

/// Outcome of a survey submission, echoed back to the caller.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyReceipt {
    pub member: CrewMember,
    /// True when the submission created a new roster entry.
    pub created: bool,
    pub scored_programs: usize,
}

/// Roster entry plus survey completion status for the admin view.
#[derive(Debug, Clone, Serialize)]
pub struct MemberStatusView {
    #[serde(flatten)]
    pub member: CrewMember,
    pub survey_completed: bool,
}

/// Itinerary plus its ordered camp assignments for the detail view.
#[derive(Debug, Clone, Serialize)]
pub struct ItineraryDetail {
    #[serde(flatten)]
    pub itinerary: Itinerary,
    pub camps: Vec<CampStop>,
}

/// Error raised by the selection service.
#[derive(Debug, thiserror::Error)]
pub enum SelectionServiceError {
    #[error("invalid request: {0}")]
    Validation(String),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
