use axum::{
    extract::{rejection::JsonRejection, State},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use tweetsmith_generate::MAX_POST_CHARS;

use crate::middleware::RequestId;

use super::{map_json_rejection, ApiError, AppState};

#[derive(Debug, Deserialize)]
pub(super) struct TweetBody {
    #[serde(default)]
    tweet: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct TweetResponse {
    success: bool,
    id: String,
    text: String,
}

/// `POST /api/tweet`: publish the given text to X.
pub(super) async fn publish_post(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    body: Result<Json<TweetBody>, JsonRejection>,
) -> Result<Json<TweetResponse>, ApiError> {
    let rid = req_id.0;
    let Json(body) = body.map_err(|e| map_json_rejection(rid.clone(), &e))?;

    let text = body
        .tweet
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| {
            ApiError::new(rid.clone(), "validation_error", "Tweet content is required")
        })?;

    let Some(publisher) = state.publisher.as_ref() else {
        return Err(ApiError::new(
            rid,
            "configuration_error",
            "X API credentials are not configured; publishing is disabled",
        ));
    };

    let chars = text.chars().count();
    if chars > MAX_POST_CHARS {
        tracing::warn!(
            request_id = %rid,
            chars,
            limit = MAX_POST_CHARS,
            "post exceeds the character limit; X may reject it"
        );
    }

    match publisher.publish(&text).await {
        Ok(post) => Ok(Json(TweetResponse {
            success: true,
            id: post.id,
            text: post.text,
        })),
        Err(e) => {
            tracing::error!(request_id = %rid, error = %e, "publish failed");
            Err(ApiError::new(rid, "publish_failed", e.to_string()))
        }
    }
}
