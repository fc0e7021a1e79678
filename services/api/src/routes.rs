use crate::infra::AppState;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use gradebook::error::AppError;
use gradebook::transcripts::{
    transcript_router, CourseRecordImporter, StudentInfo, Transcript, TranscriptAssembler,
    TranscriptRepository, TranscriptService,
};
use gradebook::workflow::workflow_router;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use std::io::Cursor;
use std::sync::Arc;

/// Ad hoc transcript built from an uploaded enrollment export rather than the
/// repository.
#[derive(Debug, Deserialize)]
pub(crate) struct TranscriptPreviewRequest {
    pub(crate) student: StudentInfo,
    pub(crate) records_csv: String,
    #[serde(default)]
    pub(crate) cohort_gpas: Option<Vec<Decimal>>,
}

pub(crate) fn with_gradebook_routes<R>(service: Arc<TranscriptService<R>>) -> axum::Router
where
    R: TranscriptRepository + 'static,
{
    let assembler = Arc::new(service.assembler().clone());

    transcript_router(service)
        .merge(workflow_router())
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/transcripts/preview",
            axum::routing::post(transcript_preview_endpoint).with_state(assembler),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn transcript_preview_endpoint(
    State(assembler): State<Arc<TranscriptAssembler>>,
    Json(payload): Json<TranscriptPreviewRequest>,
) -> Result<Json<Transcript>, AppError> {
    let TranscriptPreviewRequest {
        student,
        records_csv,
        cohort_gpas,
    } = payload;

    let records = CourseRecordImporter::from_reader(Cursor::new(records_csv.into_bytes()))?;
    let student = student.with_derived_fields_now();
    let transcript = assembler.assemble(&student, records, cohort_gpas.as_deref())?;

    Ok(Json(transcript))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::seed_repository;
    use axum::body::Body;
    use axum::http::Request;
    use gradebook::config::GradingConfig;
    use gradebook::transcripts::StudentId;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use rust_decimal_macros::dec;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    const HEADER: &str = "student_id,course_id,course_code,course_title,professor,year,term,credits,status,total_score,max_score,attendance_score,attendance_max_score,assignment_score,assignment_max_score,attendance_rate";

    fn app(ready: bool) -> axum::Router {
        let config = GradingConfig::default();
        let repository = Arc::new(seed_repository(config.clone()));
        let service = Arc::new(TranscriptService::new(repository, config));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_gradebook_routes(service).layer(Extension(state))
    }

    fn preview_student() -> StudentInfo {
        StudentInfo {
            student_id: StudentId("stu-77".to_string()),
            student_code: "202400109977".to_string(),
            name: "Dana Yoon".to_string(),
            department_code: None,
            department_name: None,
            grade_level: Some(3),
            admission_year: None,
        }
    }

    async fn read_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        serde_json::from_slice(&bytes).expect("json body")
    }

    #[tokio::test]
    async fn health_and_readiness_report_state() {
        let response = app(false)
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);

        let response = app(false)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = app(true)
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn seeded_transcript_is_served_with_rank() {
        let response = app(true)
            .oneshot(
                Request::get("/api/v1/students/stu-1001/transcript")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");

        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json(response).await;
        assert_eq!(payload["overall_summary"]["cumulative_gpa"], "3.79");
        assert_eq!(payload["overall_summary"]["rank"], 1);
        assert_eq!(payload["overall_summary"]["total_students"], 4);
        assert_eq!(payload["student"]["admission_year"], 2025);
    }

    #[tokio::test]
    async fn workflow_routes_are_mounted() {
        let response = app(true)
            .oneshot(
                Request::post("/api/v1/workflow/transitions")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        json!({ "current": "PENDING", "next": "APPROVED" }).to_string(),
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn preview_builds_transcript_from_csv() {
        let request = TranscriptPreviewRequest {
            student: preview_student(),
            records_csv: format!(
                "{HEADER}\nstu-77,lec-1,CS301,Operating Systems,,2026,1,3,COMPLETED,90,100,,,,,\nstu-77,lec-2,CS302,Networks,,2026,1,1,FAILED,30,100,,,,,\n"
            ),
            cohort_gpas: Some(vec![dec!(3.00), dec!(3.40)]),
        };

        let Json(transcript) = transcript_preview_endpoint(
            State(Arc::new(TranscriptAssembler::new(GradingConfig::default()))),
            Json(request),
        )
        .await
        .expect("preview builds");

        assert_eq!(transcript.overall_summary.cumulative_gpa, dec!(3.00));
        assert_eq!(transcript.overall_summary.rank, Some(2));
        assert_eq!(transcript.courses.len(), 2);
    }

    #[tokio::test]
    async fn preview_rejects_records_of_another_student() {
        let request = TranscriptPreviewRequest {
            student: preview_student(),
            records_csv: format!(
                "{HEADER}\nstu-12,lec-1,CS301,Operating Systems,,2026,1,3,COMPLETED,90,100,,,,,\n"
            ),
            cohort_gpas: None,
        };

        let error = transcript_preview_endpoint(
            State(Arc::new(TranscriptAssembler::new(GradingConfig::default()))),
            Json(request),
        )
        .await
        .expect_err("mismatched student");

        assert_eq!(error.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn preview_rejects_unrepresentable_scores() {
        let request = TranscriptPreviewRequest {
            student: preview_student(),
            records_csv: format!(
                "{HEADER}\nstu-77,lec-1,CS301,Operating Systems,,2026,1,3,COMPLETED,{},100,,,,,\n",
                Decimal::MAX
            ),
            cohort_gpas: None,
        };

        let error = transcript_preview_endpoint(
            State(Arc::new(TranscriptAssembler::new(GradingConfig::default()))),
            Json(request),
        )
        .await
        .expect_err("score overflows percentage");

        assert_eq!(error.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }
}
