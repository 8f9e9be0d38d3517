use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::Utc;
use serde_json::Value;

use crate::workflows::selection::domain::{
    Camp, CampStop, Crew, CrewId, CrewMember, CrewMemberId, CrewPreferences, Difficulty,
    Itinerary, ItineraryId, Program, ProgramId, ProgramScore,
};
use crate::workflows::selection::repository::{
    CatalogRepository, CrewRepository, MemberProfile, RepositoryError,
};
use crate::workflows::selection::router::selection_router;
use crate::workflows::selection::service::{SelectionService, SurveyScore, SurveySubmission};

pub(super) const CLIMBING: ProgramId = ProgramId(1);
pub(super) const ARCHERY: ProgramId = ProgramId(2);
pub(super) const BLACKSMITHING: ProgramId = ProgramId(3);

pub(super) fn sample_programs() -> Vec<Program> {
    let entries = [
        (CLIMBING, "CLIMB_ROCK", "Climbing: Rock Climbing"),
        (ARCHERY, "SHOOT_ARCHERY", "Shooting Sports: Archery"),
        (BLACKSMITHING, "HOME_BLACKSMITH", "Homesteading: Blacksmithing"),
    ];

    entries
        .iter()
        .map(|&(id, code, name)| Program {
            id,
            code: code.to_string(),
            name: name.to_string(),
            category: Program::category_from_name(name),
            old_name_comments: None,
        })
        .collect()
}

pub(super) fn itinerary(
    id: i64,
    code: &str,
    difficulty: Difficulty,
    distance_miles: Option<f64>,
    max_altitude: Option<u32>,
) -> Itinerary {
    Itinerary {
        id: ItineraryId(id),
        code: code.to_string(),
        difficulty,
        distance_miles,
        max_altitude,
        covers_south: false,
        covers_central: false,
        covers_north: false,
        covers_valle_vidal: false,
        duration_days: Some(12),
        description: None,
    }
}

/// Three-itinerary catalog used across the workflow tests:
/// `12-1` Strenuous, 62 mi, 9800 ft, south+central, climbing+archery;
/// `12-2` Challenging, 50 mi, 8200 ft, south+north, archery;
/// `12-3` Super-Strenuous, 80 mi, 11500 ft, north+Valle Vidal,
/// climbing+blacksmithing.
pub(super) fn sample_catalog() -> MemoryCatalog {
    let mut first = itinerary(1, "12-1", Difficulty::Strenuous, Some(62.0), Some(9_800));
    first.covers_south = true;
    first.covers_central = true;

    let mut second = itinerary(2, "12-2", Difficulty::Challenging, Some(50.0), Some(8_200));
    second.covers_south = true;
    second.covers_north = true;

    let mut third = itinerary(
        3,
        "12-3",
        Difficulty::SuperStrenuous,
        Some(80.0),
        Some(11_500),
    );
    third.covers_north = true;
    third.covers_valle_vidal = true;

    let mut availability = HashMap::new();
    availability.insert(ItineraryId(1), vec![CLIMBING, ARCHERY]);
    availability.insert(ItineraryId(2), vec![ARCHERY]);
    availability.insert(ItineraryId(3), vec![CLIMBING, BLACKSMITHING]);

    let mut camps = HashMap::new();
    camps.insert(
        ItineraryId(1),
        vec![
            CampStop {
                day_number: 2,
                camp: Camp {
                    id: 1,
                    name: "Lovers Leap".to_string(),
                    elevation: Some(7_120),
                    country: Some("South".to_string()),
                    is_staffed: false,
                    is_trail_camp: true,
                },
            },
            CampStop {
                day_number: 3,
                camp: Camp {
                    id: 2,
                    name: "Crags".to_string(),
                    elevation: Some(8_000),
                    country: Some("South".to_string()),
                    is_staffed: true,
                    is_trail_camp: false,
                },
            },
        ],
    );

    MemoryCatalog {
        programs: sample_programs(),
        itineraries: vec![first, second, third],
        availability,
        camps,
    }
}

pub(super) fn build_service() -> (
    Arc<SelectionService<MemoryCatalog, MemoryCrewStore>>,
    Arc<MemoryCatalog>,
    Arc<MemoryCrewStore>,
    CrewId,
) {
    let catalog = Arc::new(sample_catalog());
    let crews = Arc::new(MemoryCrewStore::default());
    let crew = crews
        .insert_crew("Troop 118 Crew A", 9)
        .expect("crew inserts")
        .id;
    let service = Arc::new(SelectionService::new(catalog.clone(), crews.clone()));
    (service, catalog, crews, crew)
}

pub(super) fn submission(name: &str, email: &str, scores: &[(ProgramId, i32)]) -> SurveySubmission {
    SurveySubmission {
        member_id: None,
        name: Some(name.to_string()),
        email: Some(email.to_string()),
        age: Some(16),
        skill_level: Some(3),
        scores: scores
            .iter()
            .map(|&(program_id, score)| SurveyScore { program_id, score })
            .collect(),
    }
}

pub(super) fn router_with_service(
    service: Arc<SelectionService<MemoryCatalog, MemoryCrewStore>>,
) -> axum::Router {
    selection_router(service)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}

/// Fixed in-memory catalog mirroring the read-only reference data.
pub(super) struct MemoryCatalog {
    pub(super) programs: Vec<Program>,
    pub(super) itineraries: Vec<Itinerary>,
    pub(super) availability: HashMap<ItineraryId, Vec<ProgramId>>,
    pub(super) camps: HashMap<ItineraryId, Vec<CampStop>>,
}

impl CatalogRepository for MemoryCatalog {
    fn programs(&self) -> Result<Vec<Program>, RepositoryError> {
        Ok(self.programs.clone())
    }

    fn itineraries(&self) -> Result<Vec<Itinerary>, RepositoryError> {
        Ok(self.itineraries.clone())
    }

    fn itinerary_by_code(&self, code: &str) -> Result<Option<Itinerary>, RepositoryError> {
        Ok(self
            .itineraries
            .iter()
            .find(|itinerary| itinerary.code == code)
            .cloned())
    }

    fn available_programs(
        &self,
        itinerary: ItineraryId,
    ) -> Result<Vec<ProgramId>, RepositoryError> {
        Ok(self.availability.get(&itinerary).cloned().unwrap_or_default())
    }

    fn camp_stops(&self, itinerary: ItineraryId) -> Result<Vec<CampStop>, RepositoryError> {
        Ok(self.camps.get(&itinerary).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct CrewState {
    crews: Vec<Crew>,
    members: Vec<CrewMember>,
    scores: Vec<ProgramScore>,
    preferences: HashMap<CrewId, CrewPreferences>,
    next_crew_id: i64,
    next_member_id: i64,
}

/// Mutex-guarded crew store used by the workflow tests.
#[derive(Default)]
pub(super) struct MemoryCrewStore {
    state: Mutex<CrewState>,
}

impl CrewRepository for MemoryCrewStore {
    fn crews(&self) -> Result<Vec<Crew>, RepositoryError> {
        Ok(self.state.lock().expect("crew store poisoned").crews.clone())
    }

    fn crew(&self, id: CrewId) -> Result<Option<Crew>, RepositoryError> {
        let state = self.state.lock().expect("crew store poisoned");
        Ok(state.crews.iter().find(|crew| crew.id == id).cloned())
    }

    fn members(&self, crew: CrewId) -> Result<Vec<CrewMember>, RepositoryError> {
        let state = self.state.lock().expect("crew store poisoned");
        let mut members: Vec<CrewMember> = state
            .members
            .iter()
            .filter(|member| member.crew_id == crew)
            .cloned()
            .collect();
        members.sort_by_key(|member| member.member_number);
        Ok(members)
    }

    fn find_member_by_email(
        &self,
        crew: CrewId,
        email: &str,
    ) -> Result<Option<CrewMember>, RepositoryError> {
        let state = self.state.lock().expect("crew store poisoned");
        Ok(state
            .members
            .iter()
            .find(|member| member.crew_id == crew && member.email.as_deref() == Some(email))
            .cloned())
    }

    fn find_member_by_name(
        &self,
        crew: CrewId,
        name: &str,
    ) -> Result<Option<CrewMember>, RepositoryError> {
        let state = self.state.lock().expect("crew store poisoned");
        Ok(state
            .members
            .iter()
            .find(|member| member.crew_id == crew && member.name == name)
            .cloned())
    }

    fn preferences(&self, crew: CrewId) -> Result<Option<CrewPreferences>, RepositoryError> {
        let state = self.state.lock().expect("crew store poisoned");
        Ok(state.preferences.get(&crew).cloned())
    }

    fn scores(&self, crew: CrewId) -> Result<Vec<ProgramScore>, RepositoryError> {
        let state = self.state.lock().expect("crew store poisoned");
        Ok(state
            .scores
            .iter()
            .filter(|score| score.crew_id == crew)
            .copied()
            .collect())
    }

    fn member_has_scores(&self, member: CrewMemberId) -> Result<bool, RepositoryError> {
        let state = self.state.lock().expect("crew store poisoned");
        Ok(state
            .scores
            .iter()
            .any(|score| score.crew_member_id == member))
    }

    fn insert_crew(&self, name: &str, size: u8) -> Result<Crew, RepositoryError> {
        let mut state = self.state.lock().expect("crew store poisoned");
        state.next_crew_id += 1;
        let now = Utc::now();
        let crew = Crew {
            id: CrewId(state.next_crew_id),
            name: name.to_string(),
            size,
            created_at: now,
            updated_at: now,
        };
        state.crews.push(crew.clone());
        Ok(crew)
    }

    fn insert_member(
        &self,
        crew: CrewId,
        profile: MemberProfile,
    ) -> Result<CrewMember, RepositoryError> {
        let mut state = self.state.lock().expect("crew store poisoned");
        state.next_member_id += 1;
        let member_number = state
            .members
            .iter()
            .filter(|member| member.crew_id == crew)
            .map(|member| member.member_number)
            .max()
            .unwrap_or(0)
            + 1;
        let member = CrewMember {
            id: CrewMemberId(state.next_member_id),
            crew_id: crew,
            member_number,
            name: profile.name,
            email: profile.email,
            age: profile.age,
            skill_level: profile.skill_level,
        };
        state.members.push(member.clone());
        Ok(member)
    }

    fn update_member(
        &self,
        member: CrewMemberId,
        profile: MemberProfile,
    ) -> Result<CrewMember, RepositoryError> {
        let mut state = self.state.lock().expect("crew store poisoned");
        let entry = state
            .members
            .iter_mut()
            .find(|candidate| candidate.id == member)
            .ok_or(RepositoryError::NotFound)?;
        entry.name = profile.name;
        entry.email = profile.email;
        entry.age = profile.age;
        entry.skill_level = profile.skill_level;
        Ok(entry.clone())
    }

    fn delete_member(&self, member: CrewMemberId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("crew store poisoned");
        let before = state.members.len();
        state.members.retain(|candidate| candidate.id != member);
        if state.members.len() == before {
            return Err(RepositoryError::NotFound);
        }
        state.scores.retain(|score| score.crew_member_id != member);
        Ok(())
    }

    fn replace_member_scores(
        &self,
        crew: CrewId,
        member: CrewMemberId,
        rows: &[(ProgramId, i32)],
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("crew store poisoned");
        state.scores.retain(|score| score.crew_member_id != member);
        for &(program_id, score) in rows {
            state.scores.push(ProgramScore {
                crew_id: crew,
                crew_member_id: member,
                program_id,
                score,
            });
        }
        Ok(())
    }

    fn upsert_preferences(
        &self,
        crew: CrewId,
        preferences: CrewPreferences,
    ) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("crew store poisoned");
        state.preferences.insert(crew, preferences);
        Ok(())
    }

    fn touch_crew(&self, crew: CrewId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("crew store poisoned");
        if let Some(entry) = state.crews.iter_mut().find(|candidate| candidate.id == crew) {
            entry.updated_at = Utc::now();
        }
        Ok(())
    }
}
