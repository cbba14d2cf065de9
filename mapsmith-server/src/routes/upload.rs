//! PDF upload: extract → chunk → batch-generate knowledge maps.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use uuid::Uuid;

use mapsmith::{chunk_text, generate_map_batch};

use crate::error::ApiError;
use crate::extract;
use crate::state::AppState;

/// Response for a processed upload.
///
/// `maps` holds one serialized knowledge map per surviving chunk, in input
/// chunk order; dropped chunks only show up as the gap between `maps.len()`
/// and `chunks_processed`.
#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub maps: Vec<String>,
    pub message: String,
    pub chunks_processed: usize,
    pub upload_id: Uuid,
}

pub async fn upload_pdf(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let mut file_bytes = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| ApiError::MissingInput(format!("unreadable multipart body: {err}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        if let Some(name) = field.file_name()
            && !name.to_lowercase().ends_with(".pdf")
        {
            return Err(ApiError::MissingInput(
                "only PDF files are supported".to_string(),
            ));
        }
        file_bytes = Some(field.bytes().await.map_err(|err| {
            ApiError::MissingInput(format!("unreadable file field: {err}"))
        })?);
    }

    let Some(bytes) = file_bytes else {
        return Err(ApiError::MissingInput("no file provided".to_string()));
    };

    let text = match extract::pdf_text(&bytes) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!(error = %err, "extraction failed");
            return Err(ApiError::NoExtractableText);
        }
    };
    if text.trim().is_empty() {
        return Err(ApiError::NoExtractableText);
    }

    let chunks = chunk_text(&text, state.settings.chunk_token_budget);
    let to_process = &chunks[..chunks.len().min(state.settings.max_chunks)];
    tracing::info!(
        total_chunks = chunks.len(),
        processing = to_process.len(),
        "upload chunked"
    );

    let batch = generate_map_batch(&state.client, to_process).await;

    let maps = batch
        .maps
        .iter()
        .map(serde_json::to_string)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|err| ApiError::MalformedOutput(err.to_string()))?;

    let upload_id = state.uploads.insert(text);

    Ok(Json(UploadResponse {
        message: format!("Successfully processed {} knowledge maps", maps.len()),
        maps,
        chunks_processed: batch.chunks_processed,
        upload_id,
    }))
}
