use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for catalog programs.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ProgramId(pub i64);

/// Identifier wrapper for crews.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CrewId(pub i64);

/// Identifier wrapper for crew members.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct CrewMemberId(pub i64);

/// Identifier wrapper for catalog itineraries.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct ItineraryId(pub i64);

/// Skill level assigned to a member when the survey leaves it blank.
pub const DEFAULT_SKILL_LEVEL: u8 = 3;

/// Interest score recorded for catalog programs a survey does not rate.
pub const DEFAULT_INTEREST_SCORE: i32 = 10;

/// Bookable backcountry activity offered by some itineraries. Catalog data,
/// immutable after import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Program {
    pub id: ProgramId,
    pub code: String,
    pub name: String,
    pub category: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub old_name_comments: Option<String>,
}

impl Program {
    /// Category label derived from the portion of the name before the `:`
    /// separator, e.g. `"Climbing: Bouldering Gym"` -> `"Climbing"`.
    pub fn category_from_name(name: &str) -> String {
        match name.split_once(':') {
            Some((category, _)) => category.trim().to_string(),
            None => "General".to_string(),
        }
    }
}

/// A group of members planning one shared trek; the scoring unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Crew {
    pub id: CrewId,
    pub name: String,
    pub size: u8,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Member of a crew, matched across survey submissions by email, then name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CrewMember {
    pub id: CrewMemberId,
    pub crew_id: CrewId,
    /// Sequential number unique within the crew, assigned on insert.
    pub member_number: u32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u8>,
    pub skill_level: u8,
}

/// One member's interest rating for one program. A member's rows are always
/// replaced wholesale on resubmission, never merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramScore {
    pub crew_id: CrewId,
    pub crew_member_id: CrewMemberId,
    pub program_id: ProgramId,
    pub score: i32,
}

/// Difficulty tiers an itinerary can carry, ordered easiest to hardest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Difficulty {
    #[serde(rename = "C")]
    Challenging,
    #[serde(rename = "R")]
    Rugged,
    #[serde(rename = "S")]
    Strenuous,
    #[serde(rename = "SS")]
    SuperStrenuous,
}

impl Difficulty {
    pub const fn code(self) -> &'static str {
        match self {
            Difficulty::Challenging => "C",
            Difficulty::Rugged => "R",
            Difficulty::Strenuous => "S",
            Difficulty::SuperStrenuous => "SS",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "C" => Some(Difficulty::Challenging),
            "R" => Some(Difficulty::Rugged),
            "S" => Some(Difficulty::Strenuous),
            "SS" => Some(Difficulty::SuperStrenuous),
            _ => None,
        }
    }
}

/// The four ranch regions an itinerary may cover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Region {
    South,
    Central,
    North,
    ValleVidal,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::South,
        Region::Central,
        Region::North,
        Region::ValleVidal,
    ];
}

/// Structured crew preferences consumed by the itinerary scorer. At most one
/// record exists per crew; when the record is absent every component that
/// depends on it falls back to the field defaults below.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrewPreferences {
    pub area_important: bool,
    pub area_rank_south: Option<u8>,
    pub area_rank_central: Option<u8>,
    pub area_rank_north: Option<u8>,
    pub area_rank_valle_vidal: Option<u8>,
    pub max_altitude_important: bool,
    pub max_altitude_threshold: Option<u32>,
    pub difficulty_challenging: bool,
    pub difficulty_rugged: bool,
    pub difficulty_strenuous: bool,
    pub difficulty_super_strenuous: bool,
    /// Stored with the record but not consumed by the scorer; the program
    /// component is always computed.
    pub programs_important: bool,
}

impl Default for CrewPreferences {
    fn default() -> Self {
        Self {
            area_important: false,
            area_rank_south: None,
            area_rank_central: None,
            area_rank_north: None,
            area_rank_valle_vidal: None,
            max_altitude_important: false,
            max_altitude_threshold: None,
            difficulty_challenging: true,
            difficulty_rugged: true,
            difficulty_strenuous: true,
            difficulty_super_strenuous: true,
            programs_important: true,
        }
    }
}

impl CrewPreferences {
    pub fn accepts_difficulty(&self, difficulty: Difficulty) -> bool {
        match difficulty {
            Difficulty::Challenging => self.difficulty_challenging,
            Difficulty::Rugged => self.difficulty_rugged,
            Difficulty::Strenuous => self.difficulty_strenuous,
            Difficulty::SuperStrenuous => self.difficulty_super_strenuous,
        }
    }

    /// Rank assigned to a region, 1 (most preferred) through 4. A stored
    /// zero means unranked and is reported as `None`.
    pub fn area_rank(&self, region: Region) -> Option<u8> {
        let rank = match region {
            Region::South => self.area_rank_south,
            Region::Central => self.area_rank_central,
            Region::North => self.area_rank_north,
            Region::ValleVidal => self.area_rank_valle_vidal,
        };
        rank.filter(|&value| value > 0)
    }
}

/// Fixed multi-day route through camps. Catalog data, immutable after
/// import; shared read-only across crews.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Itinerary {
    pub id: ItineraryId,
    pub code: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_miles: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_altitude: Option<u32>,
    pub covers_south: bool,
    pub covers_central: bool,
    pub covers_north: bool,
    pub covers_valle_vidal: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Itinerary {
    pub fn covers(&self, region: Region) -> bool {
        match region {
            Region::South => self.covers_south,
            Region::Central => self.covers_central,
            Region::North => self.covers_north,
            Region::ValleVidal => self.covers_valle_vidal,
        }
    }
}

/// Camp reference data shown on the itinerary detail view; never consumed by
/// the scoring path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Camp {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub elevation: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    pub is_staffed: bool,
    pub is_trail_camp: bool,
}

/// One night of an itinerary, ordered by day number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CampStop {
    pub day_number: u8,
    pub camp: Camp,
}

/// Statistical method used to fold several members' interest scores for one
/// program into a single representative value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregationMethod {
    Total,
    Average,
    Median,
    Mode,
}

impl AggregationMethod {
    /// Resolve a method from its exact, case-sensitive name. Anything else
    /// silently behaves as `Total`; callers that want stricter handling must
    /// validate up front.
    pub fn from_name(name: &str) -> Self {
        match name {
            "Average" => AggregationMethod::Average,
            "Median" => AggregationMethod::Median,
            "Mode" => AggregationMethod::Mode,
            _ => AggregationMethod::Total,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            AggregationMethod::Total => "Total",
            AggregationMethod::Average => "Average",
            AggregationMethod::Median => "Median",
            AggregationMethod::Mode => "Mode",
        }
    }
}

impl Default for AggregationMethod {
    fn default() -> Self {
        AggregationMethod::Total
    }
}
