use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::transcripts::{GradeError, RecordImportError, TranscriptServiceError};
use crate::workflow::TransitionError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Import(RecordImportError),
    Transcript(TranscriptServiceError),
    Workflow(TransitionError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Import(err) => write!(f, "import error: {}", err),
            AppError::Transcript(err) => write!(f, "transcript error: {}", err),
            AppError::Workflow(err) => write!(f, "workflow error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Transcript(err) => Some(err),
            AppError::Workflow(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Import(_) | AppError::Workflow(_) => StatusCode::BAD_REQUEST,
            AppError::Transcript(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            AppError::Transcript(err) if !err.is_internal() => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Transcript(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            "internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = Json(json!({ "error": message }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<RecordImportError> for AppError {
    fn from(value: RecordImportError) -> Self {
        Self::Import(value)
    }
}

impl From<TranscriptServiceError> for AppError {
    fn from(value: TranscriptServiceError) -> Self {
        Self::Transcript(value)
    }
}

impl From<TransitionError> for AppError {
    fn from(value: TransitionError) -> Self {
        Self::Workflow(value)
    }
}

impl From<GradeError> for AppError {
    fn from(value: GradeError) -> Self {
        Self::Transcript(TranscriptServiceError::Grade(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transcripts::{RecordRejection, RepositoryError};

    #[test]
    fn structural_errors_keep_their_message() {
        let error = AppError::from(GradeError::Structural(RecordRejection::MissingCourse));
        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn internal_errors_map_to_server_error() {
        let error = AppError::from(TranscriptServiceError::Repository(
            RepositoryError::Unavailable("offline".to_string()),
        ));
        assert_eq!(error.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);

        let missing = AppError::from(GradeError::LectureNotFound("lec-9".to_string()));
        assert_eq!(missing.into_response().status(), StatusCode::NOT_FOUND);

        let io = AppError::from(std::io::Error::new(std::io::ErrorKind::Other, "disk"));
        assert!(io.to_string().starts_with("io error"));
    }
}
