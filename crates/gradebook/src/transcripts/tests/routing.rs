use super::common::*;
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{Request, StatusCode};
use std::sync::Arc;
use tower::ServiceExt;

use crate::config::GradingConfig;
use crate::transcripts::domain::{CourseStatus, StudentId};
use crate::transcripts::router::{course_grade_handler, transcript_handler};
use crate::transcripts::{transcript_router, TranscriptService};

#[tokio::test]
async fn transcript_route_returns_document() {
    let (service, _) = build_service();
    let router = transcript_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/students/stu-1/transcript")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["student"]["student_code"], "202400106114");
    assert_eq!(payload["overall_summary"]["cumulative_gpa"], "2.55");
    assert_eq!(payload["overall_summary"]["rank"], 2);
    assert_eq!(payload["semester_summaries"]["2024-1"]["semester_gpa"], "2.19");
    assert_eq!(payload["courses"][0]["letter_grade"], "A+");
    assert!(payload["issued_at"].is_string());
}

#[tokio::test]
async fn transcript_handler_returns_not_found_for_unknown_student() {
    let (service, _) = build_service();

    let response = transcript_handler::<MemoryRepository>(
        State(Arc::new(service)),
        Path("ghost".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn transcript_handler_returns_unprocessable_for_structural_errors() {
    let (service, repository) = build_service();
    repository
        .records
        .lock()
        .expect("repository mutex poisoned")
        .entry(StudentId(STUDENT.to_string()))
        .or_default()
        .push(record("CS301", 2025, 5, 3, CourseStatus::InProgress, None));

    let response = transcript_handler::<MemoryRepository>(
        State(Arc::new(service)),
        Path(STUDENT.to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .is_some_and(|message| message.contains("invalid term")));
}

#[tokio::test]
async fn internal_failures_surface_generic_message() {
    let service = TranscriptService::new(Arc::new(UnavailableRepository), GradingConfig::default());

    let response = transcript_handler::<UnavailableRepository>(
        State(Arc::new(service)),
        Path(STUDENT.to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], "transcript could not be generated");
}

#[tokio::test]
async fn course_grade_route_returns_graded_course() {
    let (service, _) = build_service();
    let router = transcript_router(Arc::new(service));

    let response = router
        .oneshot(
            Request::get("/api/v1/students/stu-1/courses/lec-math101/grade")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["course_code"], "MATH101");
    assert_eq!(payload["letter_grade"], "F");
    assert_eq!(payload["grade_point"], "0.0");
    assert_eq!(payload["included_in_gpa"], true);
}

#[tokio::test]
async fn course_grade_handler_returns_not_found_for_unknown_lecture() {
    let (service, _) = build_service();

    let response = course_grade_handler::<MemoryRepository>(
        State(Arc::new(service)),
        Path((STUDENT.to_string(), "lec-none".to_string())),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
