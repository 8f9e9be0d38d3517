use chrono::Utc;
use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use trek_select::workflows::selection::{
    Camp, CampStop, CatalogRepository, Crew, CrewId, CrewMember, CrewMemberId, CrewPreferences,
    CrewRepository, Difficulty, Itinerary, ItineraryId, MemberProfile, Program, ProgramId,
    ProgramScore, RepositoryError,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Catalog backed by a fixed in-process data set. Stands in for the imported
/// ranch catalog until a persistent backend is wired up; the selection
/// workflow only ever reads from it.
pub(crate) struct SeededCatalog {
    programs: Vec<Program>,
    itineraries: Vec<Itinerary>,
    availability: HashMap<ItineraryId, Vec<ProgramId>>,
    camp_stops: HashMap<ItineraryId, Vec<CampStop>>,
}

impl Default for SeededCatalog {
    fn default() -> Self {
        seeded_catalog()
    }
}

impl CatalogRepository for SeededCatalog {
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
        Ok(self.camp_stops.get(&itinerary).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
struct CrewStoreState {
    crews: Vec<Crew>,
    members: Vec<CrewMember>,
    scores: Vec<ProgramScore>,
    preferences: HashMap<CrewId, CrewPreferences>,
    next_crew_id: i64,
    next_member_id: i64,
}

/// Crew storage held entirely in process memory. Suitable for demos and a
/// single-node deployment; everything is lost on restart.
#[derive(Default)]
pub(crate) struct InMemoryCrewStore {
    state: Mutex<CrewStoreState>,
}

impl CrewRepository for InMemoryCrewStore {
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
        if let Some(entry) = state
            .crews
            .iter_mut()
            .find(|candidate| candidate.id == crew)
        {
            entry.updated_at = Utc::now();
        }
        Ok(())
    }
}

fn program(id: i64, code: &str, name: &str) -> Program {
    Program {
        id: ProgramId(id),
        code: code.to_string(),
        name: name.to_string(),
        category: Program::category_from_name(name),
        old_name_comments: None,
    }
}

struct ItinerarySeed {
    id: i64,
    code: &'static str,
    difficulty: Difficulty,
    distance_miles: f64,
    max_altitude: u32,
    regions: (bool, bool, bool, bool),
    duration_days: u8,
    programs: &'static [i64],
}

fn seeded_catalog() -> SeededCatalog {
    let programs = vec![
        program(1, "CLIMB_ROCK", "Climbing: Rock Climbing"),
        program(2, "SHOOT_RIFLE", "Shooting Sports: .30-06 Rifle"),
        program(3, "SHOOT_ARCHERY", "Shooting Sports: Archery"),
        program(4, "HORSE_RIDE", "Horsemanship: Horse Rides"),
        program(5, "CRAFT_BLACKSMITH", "Crafts: Blacksmithing"),
        program(6, "CONSERVATION_TRAIL", "Conservation: Trail Building"),
        program(7, "CHALLENGE_COPE", "Challenge: COPE Course"),
        program(8, "HOMESTEAD_LIVING", "Homestead Living"),
    ];

    let seeds = [
        ItinerarySeed {
            id: 1,
            code: "12-1",
            difficulty: Difficulty::Challenging,
            distance_miles: 52.0,
            max_altitude: 9_000,
            regions: (true, true, false, false),
            duration_days: 12,
            programs: &[1, 3, 4, 8],
        },
        ItinerarySeed {
            id: 2,
            code: "12-5",
            difficulty: Difficulty::Rugged,
            distance_miles: 58.0,
            max_altitude: 9_700,
            regions: (false, true, true, false),
            duration_days: 12,
            programs: &[1, 2, 5, 7],
        },
        ItinerarySeed {
            id: 3,
            code: "12-9",
            difficulty: Difficulty::Strenuous,
            distance_miles: 68.0,
            max_altitude: 11_000,
            regions: (false, false, true, false),
            duration_days: 12,
            programs: &[2, 6, 7],
        },
        ItinerarySeed {
            id: 4,
            code: "12-14",
            difficulty: Difficulty::SuperStrenuous,
            distance_miles: 92.0,
            max_altitude: 12_441,
            regions: (false, false, true, true),
            duration_days: 12,
            programs: &[6, 7],
        },
        ItinerarySeed {
            id: 5,
            code: "7-2",
            difficulty: Difficulty::Challenging,
            distance_miles: 28.0,
            max_altitude: 8_400,
            regions: (true, false, false, false),
            duration_days: 7,
            programs: &[3, 4, 5, 8],
        },
    ];

    let mut itineraries = Vec::new();
    let mut availability = HashMap::new();
    for seed in &seeds {
        let (covers_south, covers_central, covers_north, covers_valle_vidal) = seed.regions;
        itineraries.push(Itinerary {
            id: ItineraryId(seed.id),
            code: seed.code.to_string(),
            difficulty: seed.difficulty,
            distance_miles: Some(seed.distance_miles),
            max_altitude: Some(seed.max_altitude),
            covers_south,
            covers_central,
            covers_north,
            covers_valle_vidal,
            duration_days: Some(seed.duration_days),
            description: None,
        });
        availability.insert(
            ItineraryId(seed.id),
            seed.programs.iter().map(|&id| ProgramId(id)).collect(),
        );
    }

    let mut camp_stops = HashMap::new();
    camp_stops.insert(
        ItineraryId(1),
        vec![
            camp_stop(2, 101, "Lovers Leap", 7_120, "South", false, true),
            camp_stop(4, 102, "Crater Lake", 9_060, "South", true, false),
            camp_stop(7, 103, "Clarks Fork", 7_500, "Central", true, false),
        ],
    );
    camp_stops.insert(
        ItineraryId(2),
        vec![
            camp_stop(3, 104, "Cimarroncito", 7_800, "Central", true, false),
            camp_stop(6, 105, "Harlan", 8_260, "Central", true, false),
            camp_stop(9, 106, "Baldy Town", 9_700, "North", true, false),
        ],
    );
    camp_stops.insert(
        ItineraryId(3),
        vec![
            camp_stop(2, 106, "Baldy Town", 9_700, "North", true, false),
            camp_stop(5, 107, "Copper Park", 10_700, "North", false, true),
        ],
    );
    camp_stops.insert(
        ItineraryId(4),
        vec![
            camp_stop(3, 108, "Ring Place", 8_300, "Valle Vidal", true, false),
            camp_stop(6, 109, "Greenwood Canyon", 9_200, "Valle Vidal", false, true),
        ],
    );
    camp_stops.insert(
        ItineraryId(5),
        vec![camp_stop(2, 110, "Abreu", 6_750, "South", true, false)],
    );

    SeededCatalog {
        programs,
        itineraries,
        availability,
        camp_stops,
    }
}

#[allow(clippy::too_many_arguments)]
fn camp_stop(
    day_number: u8,
    id: i64,
    name: &str,
    elevation: u32,
    country: &str,
    is_staffed: bool,
    is_trail_camp: bool,
) -> CampStop {
    CampStop {
        day_number,
        camp: Camp {
            id,
            name: name.to_string(),
            elevation: Some(elevation),
            country: Some(country.to_string()),
            is_staffed,
            is_trail_camp,
        },
    }
}
