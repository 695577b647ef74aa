use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde_json::json;

use super::domain::AssessmentId;
use super::narrative::NarrativeScorer;
use super::repository::AssessmentRepository;
use super::service::{AssessmentScoringService, ResponseSubmission, ScoringServiceError};

/// Router builder exposing HTTP endpoints for response intake and scoring.
pub fn assessment_router<R, S>(service: Arc<AssessmentScoringService<R, S>>) -> Router
where
    R: AssessmentRepository + 'static,
    S: NarrativeScorer + 'static,
{
    Router::new()
        .route(
            "/api/v1/assessments/:assessment_id/responses",
            post(submit_response_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/scores/calculate",
            post(calculate_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/scores",
            get(scores_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/scores/breakdown",
            get(breakdown_handler::<R, S>),
        )
        .route(
            "/api/v1/assessments/:assessment_id/evidence/violations",
            get(violations_handler::<R, S>),
        )
        .with_state(service)
}

pub(crate) async fn submit_response_handler<R, S>(
    State(service): State<Arc<AssessmentScoringService<R, S>>>,
    Path(assessment_id): Path<u64>,
    axum::Json(submission): axum::Json<ResponseSubmission>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: NarrativeScorer + 'static,
{
    match service.submit_response(AssessmentId(assessment_id), submission) {
        Ok(response) => (StatusCode::CREATED, axum::Json(response)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn calculate_handler<R, S>(
    State(service): State<Arc<AssessmentScoringService<R, S>>>,
    Path(assessment_id): Path<u64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: NarrativeScorer + 'static,
{
    match service.calculate_scores(AssessmentId(assessment_id)) {
        Ok(scorecard) => (StatusCode::OK, axum::Json(scorecard)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn scores_handler<R, S>(
    State(service): State<Arc<AssessmentScoringService<R, S>>>,
    Path(assessment_id): Path<u64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: NarrativeScorer + 'static,
{
    match service.stored_scores(AssessmentId(assessment_id)) {
        Ok(rows) => (StatusCode::OK, axum::Json(rows)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn breakdown_handler<R, S>(
    State(service): State<Arc<AssessmentScoringService<R, S>>>,
    Path(assessment_id): Path<u64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: NarrativeScorer + 'static,
{
    match service.score_breakdown(AssessmentId(assessment_id)) {
        Ok(breakdown) => (StatusCode::OK, axum::Json(breakdown)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn violations_handler<R, S>(
    State(service): State<Arc<AssessmentScoringService<R, S>>>,
    Path(assessment_id): Path<u64>,
) -> Response
where
    R: AssessmentRepository + 'static,
    S: NarrativeScorer + 'static,
{
    match service.validate_evidence_requirements(AssessmentId(assessment_id)) {
        Ok(violations) => (StatusCode::OK, axum::Json(violations)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: ScoringServiceError) -> Response {
    let status = match &error {
        ScoringServiceError::AssessmentNotFound(_) | ScoringServiceError::QuestionNotFound(_) => {
            StatusCode::NOT_FOUND
        }
        ScoringServiceError::Normalize(_) => StatusCode::UNPROCESSABLE_ENTITY,
        ScoringServiceError::Repository(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
