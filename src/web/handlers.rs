use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::response::Html;
use axum::Json;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::extract::extract_upload_lossy;
use crate::quiz::{Question, SharedGenerator};
use crate::render;
use crate::web::error::{ApiError, AppError, AppResult};
use crate::web::state::AppState;

/// GET /
pub async fn index(State(state): State<AppState>) -> Html<String> {
    Html(render::index_page(state.config.default_questions))
}

/// GET /health
pub async fn health() -> &'static str {
    "ok"
}

/// What the form sent, before any text extraction.
#[derive(Default)]
struct QuizForm {
    text: Option<String>,
    num_questions: Option<String>,
    uploads: Vec<(String, Bytes)>,
}

/// POST /
///
/// Multipart form with `files[]` uploads, a `text` field and
/// `num_questions`. Uploaded files win over typed text.
pub async fn generate_form(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Html<String>> {
    let mut form = QuizForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "files[]" | "files" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                // Browsers send an empty part when no file was picked
                if !file_name.is_empty() {
                    form.uploads.push((file_name, data));
                }
            }
            "text" => {
                form.text = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                )
            }
            "num_questions" => {
                form.num_questions = Some(
                    field
                        .text()
                        .await
                        .map_err(|e| AppError::BadRequest(e.to_string()))?,
                )
            }
            other => debug!("Ignoring form field {:?}", other),
        }
    }

    let count = parse_count(form.num_questions.as_deref(), state.config.default_questions)?;
    let uploads = form.uploads;
    let typed = form.text.unwrap_or_default();
    let generator = state.generator.clone();

    let questions = tokio::task::spawn_blocking(move || {
        let text = if uploads.is_empty() {
            typed
        } else {
            info!("Reading {} uploaded file(s)", uploads.len());
            uploads
                .iter()
                .map(|(file_name, data)| extract_upload_lossy(file_name, data))
                .collect()
        };
        generate(&generator, &text, count)
    })
    .await
    .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Html(render::mcqs_page(&questions)))
}

#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    #[serde(default)]
    pub text: String,
    pub num_questions: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// POST /api/mcqs
pub async fn generate_json(
    State(state): State<AppState>,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<DataResponse<Vec<Question>>>, ApiError> {
    let count = match request.num_questions {
        Some(0) => {
            return Err(AppError::BadRequest("num_questions must be positive".to_string()).into())
        }
        Some(n) => n,
        None => state.config.default_questions,
    };
    let generator = state.generator.clone();

    let questions = tokio::task::spawn_blocking(move || generate(&generator, &request.text, count))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;

    Ok(Json(DataResponse { data: questions }))
}

fn generate(generator: &SharedGenerator, text: &str, count: usize) -> AppResult<Vec<Question>> {
    let questions = generator.generate(text, count, &mut rand::thread_rng())?;
    info!(
        "Generated {} of {} requested questions from {} bytes of text",
        questions.len(),
        count,
        text.len()
    );
    Ok(questions)
}

/// Missing or blank means the configured default; anything else must be a
/// positive integer.
fn parse_count(raw: Option<&str>, default: usize) -> AppResult<usize> {
    let raw = match raw.map(str::trim) {
        None | Some("") => return Ok(default),
        Some(raw) => raw,
    };
    match raw.parse::<usize>() {
        Ok(0) => Err(AppError::BadRequest(
            "num_questions must be positive".to_string(),
        )),
        Ok(n) => Ok(n),
        Err(_) => Err(AppError::BadRequest(format!(
            "num_questions must be a number, got {raw:?}"
        ))),
    }
}
