use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::Json;
use log::error;
use serde::Serialize;

use crate::error::AnnotateError;
use crate::render;

/// Error type for the HTML form handlers, rendered as an error page.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The annotator failed while generating questions.
    #[error(transparent)]
    Annotate(#[from] AnnotateError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    fn classify(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Annotate(err) => {
                error!("Annotator failed: {}", err);
                internal()
            }
            AppError::Internal(msg) => {
                error!("Internal error: {}", msg);
                internal()
            }
        }
    }
}

fn internal() -> (StatusCode, &'static str, String) {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, _, message) = self.classify();
        (status, Html(render::error_page(status.as_u16(), &message))).into_response()
    }
}

/// The same errors for the JSON API, as `{"error": ..., "code": ...}`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl From<AnnotateError> for ApiError {
    fn from(err: AnnotateError) -> Self {
        ApiError(AppError::Annotate(err))
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.0.classify();
        (status, Json(ErrorBody { error, code })).into_response()
    }
}
