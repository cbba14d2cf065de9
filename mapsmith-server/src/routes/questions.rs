//! Supplementary quiz-question generation for a single subtopic.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use mapsmith::prompt::quiz_questions_prompt;
use mapsmith::{generate_with_retry, validate_question_list, QuizQuestion};

use crate::error::ApiError;
use crate::state::AppState;

fn default_num_questions() -> usize {
    3
}

/// Request body for `/generate-questions`.
///
/// `upload_id`, when present, points the prompt at the full source text of
/// a previous upload; an unknown or expired id simply yields no context.
#[derive(Debug, Deserialize)]
pub struct QuestionRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default = "default_num_questions")]
    pub num_questions: usize,
    #[serde(default)]
    pub upload_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct QuestionResponse {
    pub questions: Vec<QuizQuestion>,
}

pub async fn generate_questions(
    State(state): State<AppState>,
    Json(request): Json<QuestionRequest>,
) -> Result<Json<QuestionResponse>, ApiError> {
    for (field, blank) in [
        ("title", request.title.trim().is_empty()),
        ("description", request.description.trim().is_empty()),
        ("key_concepts", request.key_concepts.is_empty()),
    ] {
        if blank {
            return Err(ApiError::MissingInput(format!(
                "missing required field '{field}'"
            )));
        }
    }

    let context = request.upload_id.and_then(|id| {
        let stored = state.uploads.get(&id);
        if stored.is_none() {
            tracing::debug!(upload_id = %id, "no stored content for upload id");
        }
        stored
    });

    let prompt = quiz_questions_prompt(
        &request.title,
        &request.description,
        &request.key_concepts,
        request.num_questions,
        context.as_deref(),
    );

    tracing::info!(
        title = %request.title,
        num_questions = request.num_questions,
        with_context = context.is_some(),
        "generating supplementary questions"
    );

    let raw = generate_with_retry(&state.client, &prompt, state.settings.max_retries).await?;

    let report = validate_question_list(&raw);
    if !report.is_valid() {
        return Err(ApiError::MalformedOutput(report.diagnostics.join("; ")));
    }

    let questions: Vec<QuizQuestion> =
        serde_json::from_str(&raw).map_err(|err| ApiError::MalformedOutput(err.to_string()))?;

    Ok(Json(QuestionResponse { questions }))
}
