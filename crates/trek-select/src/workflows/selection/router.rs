use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{
    AggregationMethod, CrewId, CrewMemberId, CrewPreferences, ProgramId, DEFAULT_SKILL_LEVEL,
};
use super::ranking::RankedItinerary;
use super::repository::{CatalogRepository, CrewRepository, MemberProfile, RepositoryError};
use super::service::{SelectionService, SelectionServiceError, SurveySubmission};

/// Router builder exposing the survey, preference, admin, and results
/// endpoints over a shared [`SelectionService`].
pub fn selection_router<C, R>(service: Arc<SelectionService<C, R>>) -> Router
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/crews",
            get(list_crews_handler::<C, R>).post(create_crew_handler::<C, R>),
        )
        .route(
            "/api/v1/crews/:crew_id/members",
            get(roster_handler::<C, R>).post(add_member_handler::<C, R>),
        )
        .route(
            "/api/v1/crews/:crew_id/members/:member_id",
            put(update_member_handler::<C, R>).delete(delete_member_handler::<C, R>),
        )
        .route(
            "/api/v1/crews/:crew_id/preferences",
            get(get_preferences_handler::<C, R>).put(put_preferences_handler::<C, R>),
        )
        .route(
            "/api/v1/crews/:crew_id/survey",
            post(survey_handler::<C, R>),
        )
        .route(
            "/api/v1/crews/:crew_id/program-scores",
            get(program_scores_handler::<C, R>),
        )
        .route(
            "/api/v1/crews/:crew_id/results",
            get(results_handler::<C, R>),
        )
        .route(
            "/api/v1/itineraries/:code",
            get(itinerary_detail_handler::<C, R>),
        )
        .with_state(service)
}

/// Query string carrying the aggregation method name. Unknown names resolve
/// to `Total`, matching the scorer's documented fallback.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct MethodQuery {
    #[serde(default)]
    method: Option<String>,
}

impl MethodQuery {
    fn resolve(&self) -> AggregationMethod {
        self.method
            .as_deref()
            .map(AggregationMethod::from_name)
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateCrewRequest {
    name: String,
    #[serde(default = "default_crew_size")]
    size: u8,
}

fn default_crew_size() -> u8 {
    9
}

#[derive(Debug, Deserialize)]
pub(crate) struct MemberRequest {
    name: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    age: Option<u8>,
    #[serde(default = "default_skill_level")]
    skill_level: u8,
}

fn default_skill_level() -> u8 {
    DEFAULT_SKILL_LEVEL
}

impl MemberRequest {
    fn into_profile(self) -> MemberProfile {
        MemberProfile {
            name: self.name,
            email: self.email,
            age: self.age,
            skill_level: self.skill_level,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgramScoresResponse {
    method: &'static str,
    scores: Vec<ProgramAggregateView>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ProgramAggregateView {
    program_id: ProgramId,
    score: f64,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultsResponse {
    method: &'static str,
    results: Vec<RankedItinerary>,
}

pub(crate) async fn list_crews_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.crews() {
        Ok(crews) => (StatusCode::OK, axum::Json(crews)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_crew_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    axum::Json(request): axum::Json<CreateCrewRequest>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.add_crew(&request.name, request.size) {
        Ok(crew) => (StatusCode::CREATED, axum::Json(crew)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn roster_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path(crew_id): Path<i64>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.roster(CrewId(crew_id)) {
        Ok(roster) => (StatusCode::OK, axum::Json(roster)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn add_member_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path(crew_id): Path<i64>,
    axum::Json(request): axum::Json<MemberRequest>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.add_member(CrewId(crew_id), request.into_profile()) {
        Ok(member) => (StatusCode::CREATED, axum::Json(member)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_member_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path((crew_id, member_id)): Path<(i64, i64)>,
    axum::Json(request): axum::Json<MemberRequest>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.update_member(
        CrewId(crew_id),
        CrewMemberId(member_id),
        request.into_profile(),
    ) {
        Ok(member) => (StatusCode::OK, axum::Json(member)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_member_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path((crew_id, member_id)): Path<(i64, i64)>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.delete_member(CrewId(crew_id), CrewMemberId(member_id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_preferences_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path(crew_id): Path<i64>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.preferences(CrewId(crew_id)) {
        // Absent preferences are not an error; the scorer degrades to its
        // per-field defaults, so the API reports null rather than 404.
        Ok(preferences) => (StatusCode::OK, axum::Json(preferences)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn put_preferences_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path(crew_id): Path<i64>,
    axum::Json(preferences): axum::Json<CrewPreferences>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.save_preferences(CrewId(crew_id), preferences) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn survey_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path(crew_id): Path<i64>,
    axum::Json(submission): axum::Json<SurveySubmission>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.submit_survey(CrewId(crew_id), submission) {
        Ok(receipt) => (StatusCode::ACCEPTED, axum::Json(receipt)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn program_scores_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path(crew_id): Path<i64>,
    Query(query): Query<MethodQuery>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    let method = query.resolve();
    match service.aggregate_program_scores(CrewId(crew_id), method) {
        Ok(table) => {
            let scores = table
                .into_iter()
                .map(|(program_id, score)| ProgramAggregateView { program_id, score })
                .collect();
            let payload = ProgramScoresResponse {
                method: method.as_str(),
                scores,
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn results_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path(crew_id): Path<i64>,
    Query(query): Query<MethodQuery>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    let method = query.resolve();
    match service.score_itineraries(CrewId(crew_id), method) {
        Ok(results) => {
            let payload = ResultsResponse {
                method: method.as_str(),
                results,
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn itinerary_detail_handler<C, R>(
    State(service): State<Arc<SelectionService<C, R>>>,
    Path(code): Path<String>,
) -> Response
where
    C: CatalogRepository + 'static,
    R: CrewRepository + 'static,
{
    match service.itinerary_detail(&code) {
        Ok(Some(detail)) => (StatusCode::OK, axum::Json(detail)).into_response(),
        Ok(None) => {
            let payload = json!({ "error": format!("itinerary {code} not found") });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: SelectionServiceError) -> Response {
    let status = match &error {
        SelectionServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        SelectionServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        SelectionServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        SelectionServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
