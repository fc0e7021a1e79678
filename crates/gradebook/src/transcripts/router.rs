use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use super::domain::StudentId;
use super::error::GradeError;
use super::repository::{RepositoryError, TranscriptRepository};
use super::service::{TranscriptService, TranscriptServiceError};

/// Router builder exposing transcript issuance and single-course lookups.
pub fn transcript_router<R>(service: Arc<TranscriptService<R>>) -> Router
where
    R: TranscriptRepository + 'static,
{
    Router::new()
        .route(
            "/api/v1/students/:student_id/transcript",
            get(transcript_handler::<R>),
        )
        .route(
            "/api/v1/students/:student_id/courses/:course_id/grade",
            get(course_grade_handler::<R>),
        )
        .with_state(service)
}

pub(crate) async fn transcript_handler<R>(
    State(service): State<Arc<TranscriptService<R>>>,
    Path(student_id): Path<String>,
) -> Response
where
    R: TranscriptRepository + 'static,
{
    match service.generate(&StudentId(student_id)) {
        Ok(transcript) => (StatusCode::OK, axum::Json(transcript)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn course_grade_handler<R>(
    State(service): State<Arc<TranscriptService<R>>>,
    Path((student_id, course_id)): Path<(String, String)>,
) -> Response
where
    R: TranscriptRepository + 'static,
{
    match service.course_grade(&StudentId(student_id), &course_id) {
        Ok(course) => (StatusCode::OK, axum::Json(course)).into_response(),
        Err(error) => error_response(error),
    }
}

fn error_response(error: TranscriptServiceError) -> Response {
    let (status, message) = match &error {
        TranscriptServiceError::Grade(GradeError::StudentNotFound(_))
        | TranscriptServiceError::Grade(GradeError::LectureNotFound(_))
        | TranscriptServiceError::Repository(RepositoryError::NotFound) => {
            (StatusCode::NOT_FOUND, error.to_string())
        }
        TranscriptServiceError::Grade(GradeError::Structural(_)) => {
            (StatusCode::UNPROCESSABLE_ENTITY, error.to_string())
        }
        TranscriptServiceError::Grade(GradeError::GpaCalculation(_))
        | TranscriptServiceError::Repository(RepositoryError::Unavailable(_)) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "transcript could not be generated".to_string(),
        ),
    };

    let payload = json!({ "error": message });
    (status, axum::Json(payload)).into_response()
}
