use super::domain::{
    CampStop, Crew, CrewId, CrewMember, CrewMemberId, CrewPreferences, Itinerary, ItineraryId,
    Program, ProgramId, ProgramScore,
};

/// Read-only view of the shared catalog: programs, itineraries, availability,
/// and camp assignments. The selection workflow never writes through this
/// trait; the catalog is owned by an offline import step.
pub trait CatalogRepository: Send + Sync {
    fn programs(&self) -> Result<Vec<Program>, RepositoryError>;
    /// All itineraries in catalog order (by itinerary code).
    fn itineraries(&self) -> Result<Vec<Itinerary>, RepositoryError>;
    fn itinerary_by_code(&self, code: &str) -> Result<Option<Itinerary>, RepositoryError>;
    /// Program ids the itinerary makes available for the active trek year.
    fn available_programs(&self, itinerary: ItineraryId) -> Result<Vec<ProgramId>, RepositoryError>;
    /// Per-day camp assignments, ordered by day number. Display only.
    fn camp_stops(&self, itinerary: ItineraryId) -> Result<Vec<CampStop>, RepositoryError>;
}

/// Storage abstraction for crew-owned data so the service module can be
/// exercised in isolation. Writes are expected to be atomic per call; in
/// particular [`replace_member_scores`](CrewRepository::replace_member_scores)
/// is a delete-then-insert that must never expose a partial state.
pub trait CrewRepository: Send + Sync {
    fn crews(&self) -> Result<Vec<Crew>, RepositoryError>;
    fn crew(&self, id: CrewId) -> Result<Option<Crew>, RepositoryError>;
    /// Members of a crew ordered by member number.
    fn members(&self, crew: CrewId) -> Result<Vec<CrewMember>, RepositoryError>;
    fn find_member_by_email(
        &self,
        crew: CrewId,
        email: &str,
    ) -> Result<Option<CrewMember>, RepositoryError>;
    fn find_member_by_name(
        &self,
        crew: CrewId,
        name: &str,
    ) -> Result<Option<CrewMember>, RepositoryError>;
    fn preferences(&self, crew: CrewId) -> Result<Option<CrewPreferences>, RepositoryError>;
    /// All score facts for a crew in submission order. The aggregation layer
    /// relies on this order for the `Mode` tie-break, nothing else does.
    fn scores(&self, crew: CrewId) -> Result<Vec<ProgramScore>, RepositoryError>;
    fn member_has_scores(&self, member: CrewMemberId) -> Result<bool, RepositoryError>;

    fn insert_crew(&self, name: &str, size: u8) -> Result<Crew, RepositoryError>;
    /// Insert a member, assigning the next member number within the crew.
    fn insert_member(
        &self,
        crew: CrewId,
        profile: MemberProfile,
    ) -> Result<CrewMember, RepositoryError>;
    fn update_member(
        &self,
        member: CrewMemberId,
        profile: MemberProfile,
    ) -> Result<CrewMember, RepositoryError>;
    /// Delete a member and cascade to that member's score rows.
    fn delete_member(&self, member: CrewMemberId) -> Result<(), RepositoryError>;
    /// Replace all of a member's score rows with the given set, atomically.
    fn replace_member_scores(
        &self,
        crew: CrewId,
        member: CrewMemberId,
        rows: &[(ProgramId, i32)],
    ) -> Result<(), RepositoryError>;
    /// Create or overwrite the single preferences record for a crew.
    fn upsert_preferences(
        &self,
        crew: CrewId,
        preferences: CrewPreferences,
    ) -> Result<(), RepositoryError>;
    /// Bump the crew's `updated_at` timestamp after a recalculation.
    fn touch_crew(&self, crew: CrewId) -> Result<(), RepositoryError>;
}

/// Identity fields shared by survey and admin member writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberProfile {
    pub name: String,
    pub email: Option<String>,
    pub age: Option<u8>,
    pub skill_level: u8,
}

/// Error enumeration for repository failures. Failures surfaced by a real
/// backing store propagate unchanged through the service layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
