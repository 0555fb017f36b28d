use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tweetsmith_generate::GenerationRequest;

use crate::middleware::RequestId;

use super::{map_json_rejection, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct GenerateBody {
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    preferences: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct GenerateResponse {
    tweet: String,
    explanation: String,
}

/// `POST /api/generate`: draft a post for a topic.
///
/// Always 200 once the topic validates; a placeholder draft stands in when
/// no provider answers.
pub(super) async fn generate_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<GenerateBody>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(body) = body.map_err(|e| map_json_rejection(req_id.0.clone(), &e))?;

    let request = GenerationRequest::new(
        body.topic.as_deref().unwrap_or_default(),
        body.preferences.as_deref(),
    )
    .map_err(|_| ApiError::new(req_id.0.clone(), "validation_error", "Topic is required"))?;

    let report = state.generator.generate_traced(&request).await;
    tracing::info!(
        request_id = %req_id.0,
        source = report.source.as_deref().unwrap_or("placeholder"),
        attempts = report.attempts.len(),
        "draft generated"
    );

    Ok(Json(GenerateResponse {
        tweet: report.result.post_text,
        explanation: report.result.rationale,
    }))
}
