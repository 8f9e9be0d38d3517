//! End-to-end exercise of the selection workflow against in-memory storage:
//! several members submit surveys, the crew records preferences, and the
//! ranked results reflect both.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use trek_select::workflows::selection::{
    AggregationMethod, Camp, CampStop, CatalogRepository, Crew, CrewId, CrewMember, CrewMemberId,
    CrewPreferences, CrewRepository, Difficulty, Itinerary, ItineraryId, MemberProfile, Program,
    ProgramId, ProgramScore, RepositoryError, SelectionService, SurveyScore, SurveySubmission,
};

const CLIMBING: ProgramId = ProgramId(1);
const ARCHERY: ProgramId = ProgramId(2);

struct FixedCatalog {
    programs: Vec<Program>,
    itineraries: Vec<Itinerary>,
    availability: HashMap<ItineraryId, Vec<ProgramId>>,
}

fn program(id: ProgramId, code: &str, name: &str) -> Program {
    Program {
        id,
        code: code.to_string(),
        name: name.to_string(),
        category: Program::category_from_name(name),
        old_name_comments: None,
    }
}

fn fixed_catalog() -> FixedCatalog {
    let south_loop = Itinerary {
        id: ItineraryId(1),
        code: "12-1".to_string(),
        difficulty: Difficulty::Rugged,
        distance_miles: Some(50.0),
        max_altitude: Some(9_200),
        covers_south: true,
        covers_central: true,
        covers_north: false,
        covers_valle_vidal: false,
        duration_days: Some(12),
        description: None,
    };
    let north_push = Itinerary {
        id: ItineraryId(2),
        code: "12-2".to_string(),
        difficulty: Difficulty::SuperStrenuous,
        distance_miles: Some(104.0),
        max_altitude: Some(12_441),
        covers_south: false,
        covers_central: false,
        covers_north: true,
        covers_valle_vidal: true,
        duration_days: Some(12),
        description: None,
    };

    let mut availability = HashMap::new();
    availability.insert(ItineraryId(1), vec![CLIMBING, ARCHERY]);
    availability.insert(ItineraryId(2), vec![CLIMBING]);

    FixedCatalog {
        programs: vec![
            program(CLIMBING, "CLIMB_ROCK", "Climbing: Rock Climbing"),
            program(ARCHERY, "SHOOT_ARCHERY", "Shooting Sports: Archery"),
        ],
        itineraries: vec![south_loop, north_push],
        availability,
    }
}

impl CatalogRepository for FixedCatalog {
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

    fn camp_stops(&self, _itinerary: ItineraryId) -> Result<Vec<CampStop>, RepositoryError> {
        Ok(vec![CampStop {
            day_number: 2,
            camp: Camp {
                id: 1,
                name: "Lovers Leap".to_string(),
                elevation: Some(7_120),
                country: Some("South".to_string()),
                is_staffed: false,
                is_trail_camp: true,
            },
        }])
    }
}

#[derive(Default)]
struct StoreState {
    crews: Vec<Crew>,
    members: Vec<CrewMember>,
    scores: Vec<ProgramScore>,
    preferences: HashMap<CrewId, CrewPreferences>,
    next_crew_id: i64,
    next_member_id: i64,
}

#[derive(Default)]
struct MemoryCrewStore {
    state: Mutex<StoreState>,
}

impl CrewRepository for MemoryCrewStore {
    fn crews(&self) -> Result<Vec<Crew>, RepositoryError> {
        Ok(self.state.lock().expect("store poisoned").crews.clone())
    }

    fn crew(&self, id: CrewId) -> Result<Option<Crew>, RepositoryError> {
        let state = self.state.lock().expect("store poisoned");
        Ok(state.crews.iter().find(|crew| crew.id == id).cloned())
    }

    fn members(&self, crew: CrewId) -> Result<Vec<CrewMember>, RepositoryError> {
        let state = self.state.lock().expect("store poisoned");
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
        let state = self.state.lock().expect("store poisoned");
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
        let state = self.state.lock().expect("store poisoned");
        Ok(state
            .members
            .iter()
            .find(|member| member.crew_id == crew && member.name == name)
            .cloned())
    }

    fn preferences(&self, crew: CrewId) -> Result<Option<CrewPreferences>, RepositoryError> {
        let state = self.state.lock().expect("store poisoned");
        Ok(state.preferences.get(&crew).cloned())
    }

    fn scores(&self, crew: CrewId) -> Result<Vec<ProgramScore>, RepositoryError> {
        let state = self.state.lock().expect("store poisoned");
        Ok(state
            .scores
            .iter()
            .filter(|score| score.crew_id == crew)
            .copied()
            .collect())
    }

    fn member_has_scores(&self, member: CrewMemberId) -> Result<bool, RepositoryError> {
        let state = self.state.lock().expect("store poisoned");
        Ok(state
            .scores
            .iter()
            .any(|score| score.crew_member_id == member))
    }

    fn insert_crew(&self, name: &str, size: u8) -> Result<Crew, RepositoryError> {
        let mut state = self.state.lock().expect("store poisoned");
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
        let mut state = self.state.lock().expect("store poisoned");
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
        let mut state = self.state.lock().expect("store poisoned");
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
        let mut state = self.state.lock().expect("store poisoned");
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
        let mut state = self.state.lock().expect("store poisoned");
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
        let mut state = self.state.lock().expect("store poisoned");
        state.preferences.insert(crew, preferences);
        Ok(())
    }

    fn touch_crew(&self, crew: CrewId) -> Result<(), RepositoryError> {
        let mut state = self.state.lock().expect("store poisoned");
        if let Some(entry) = state.crews.iter_mut().find(|candidate| candidate.id == crew) {
            entry.updated_at = Utc::now();
        }
        Ok(())
    }
}

fn survey(name: &str, email: &str, scores: &[(ProgramId, i32)]) -> SurveySubmission {
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

#[test]
fn crew_surveys_and_preferences_drive_the_ranking() {
    let catalog = Arc::new(fixed_catalog());
    let store = Arc::new(MemoryCrewStore::default());
    let service = SelectionService::new(catalog, store.clone());

    let crew = store.insert_crew("Troop 118 Crew A", 8).expect("crew").id;

    service
        .submit_survey(crew, survey("Sam", "sam@example.org", &[(CLIMBING, 20), (ARCHERY, 4)]))
        .expect("first survey");
    service
        .submit_survey(
            crew,
            survey("Riley", "riley@example.org", &[(CLIMBING, 16), (ARCHERY, 8)]),
        )
        .expect("second survey");
    service
        .submit_survey(
            crew,
            survey("Quinn", "quinn@example.org", &[(CLIMBING, 12), (ARCHERY, 6)]),
        )
        .expect("third survey");

    // The crew rules out the Super-Strenuous tier and cares about the south.
    service
        .save_preferences(
            crew,
            CrewPreferences {
                area_important: true,
                area_rank_south: Some(1),
                difficulty_super_strenuous: false,
                ..CrewPreferences::default()
            },
        )
        .expect("preferences saved");

    let ranked = service
        .score_itineraries(crew, AggregationMethod::Total)
        .expect("ranking succeeds");
    assert_eq!(ranked.len(), 2);

    let top = &ranked[0];
    assert_eq!(top.itinerary.code, "12-1");
    assert_eq!(top.rank, 1);

    // Climbing totals 48, archery 18: (48 + 18) * 1.5.
    assert_eq!(top.components.program, 99.0);
    assert_eq!(top.components.difficulty, 100.0);
    assert_eq!(top.components.area, 100.0);
    assert_eq!(top.components.distance, 100.0);

    let runner_up = &ranked[1];
    assert_eq!(runner_up.itinerary.code, "12-2");
    assert_eq!(runner_up.components.difficulty, 0.0);
    assert_eq!(runner_up.components.area, 0.0);
    // 104 miles sits 54 off the ideal 50.
    assert_eq!(runner_up.components.distance, 46.0);
    // Climbing only: 48 * 1.5.
    assert_eq!(runner_up.components.program, 72.0);

    // A member rethinks their survey; only the second set survives.
    service
        .submit_survey(crew, survey("Sam", "sam@example.org", &[(CLIMBING, 0), (ARCHERY, 0)]))
        .expect("resubmission");

    let table = service
        .aggregate_program_scores(crew, AggregationMethod::Total)
        .expect("table builds");
    assert_eq!(table.get(&CLIMBING), Some(&28.0));
    assert_eq!(table.get(&ARCHERY), Some(&14.0));

    let roster = service.roster(crew).expect("roster loads");
    assert_eq!(roster.len(), 3);
}

#[test]
fn median_and_mode_methods_change_the_aggregates_not_the_contract() {
    let catalog = Arc::new(fixed_catalog());
    let store = Arc::new(MemoryCrewStore::default());
    let service = SelectionService::new(catalog, store.clone());
    let crew = store.insert_crew("Troop 118 Crew B", 6).expect("crew").id;

    for (name, email, climbing) in [
        ("Sam", "sam@example.org", 10),
        ("Riley", "riley@example.org", 20),
        ("Quinn", "quinn@example.org", 10),
        ("Alex", "alex@example.org", 30),
    ] {
        service
            .submit_survey(crew, survey(name, email, &[(CLIMBING, climbing), (ARCHERY, 5)]))
            .expect("survey accepted");
    }

    let median = service
        .aggregate_program_scores(crew, AggregationMethod::Median)
        .expect("median table");
    assert_eq!(median.get(&CLIMBING), Some(&15.0));

    let mode = service
        .aggregate_program_scores(crew, AggregationMethod::Mode)
        .expect("mode table");
    assert_eq!(mode.get(&CLIMBING), Some(&10.0));

    let average = service
        .aggregate_program_scores(crew, AggregationMethod::Average)
        .expect("average table");
    assert_eq!(average.get(&CLIMBING), Some(&17.5));
}
