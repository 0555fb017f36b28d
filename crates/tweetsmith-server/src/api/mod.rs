mod generate;
mod tweet;

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, Method, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tweetsmith_core::{AppConfig, Environment};
use tweetsmith_generate::Generator;
use tweetsmith_x::{Credentials, XClient};

use crate::middleware::{request_id, REQUEST_ID_HEADER};

/// Process-lifetime services shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<Generator>,
    /// `None` when X credentials are not configured.
    pub publisher: Option<Arc<XClient>>,
}

impl AppState {
    /// Builds the generation chain and, when credentials are present, the
    /// X client.
    ///
    /// Missing X credentials disable publishing outside production and fail
    /// startup in production.
    ///
    /// # Errors
    ///
    /// Returns an error if an HTTP client cannot be built, if the X credentials
    /// are invalid, or if they are missing in production.
    pub fn from_config(config: &AppConfig) -> anyhow::Result<Self> {
        let generator = Generator::from_config(config)?;

        let publisher = match &config.x_credentials {
            Some(x) => {
                let credentials = Credentials::try_from(x)?;
                let client = XClient::new(credentials, config.x_timeout_secs, config.x_post_api)?;
                Some(Arc::new(client))
            }
            None if matches!(config.env, Environment::Production) => {
                anyhow::bail!(
                    "TWITTER_API_KEY, TWITTER_API_SECRET, TWITTER_ACCESS_TOKEN and \
                     TWITTER_ACCESS_SECRET are required in production"
                );
            }
            None => {
                tracing::warn!(
                    env = %config.env,
                    "X credentials not set; publishing disabled"
                );
                None
            }
        };

        Ok(Self {
            generator: Arc::new(generator),
            publisher,
        })
    }
}

/// Error body for every non-2xx answer: `{"error", "code", "request_id"}`.
#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    pub request_id: String,
}

#[derive(Debug, Serialize, PartialEq, Eq)]
struct HealthData {
    status: &'static str,
    publishing: &'static str,
}

impl ApiError {
    pub fn new(
        request_id: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error: message.into(),
            code: code.into(),
            request_id: request_id.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = match self.code.as_str() {
            "validation_error" => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        (status, Json(self)).into_response()
    }
}

/// Unreadable or non-JSON bodies answer 400 in the same envelope as every
/// other error instead of axum's plain-text rejection.
pub(super) fn map_json_rejection(request_id: String, rejection: &JsonRejection) -> ApiError {
    tracing::debug!(error = %rejection, "rejected request body");
    ApiError::new(request_id, "validation_error", rejection.body_text())
}

fn build_cors() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(REQUEST_ID_HEADER),
        ])
        .expose_headers([HeaderName::from_static(REQUEST_ID_HEADER)])
}

pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/generate", post(generate::generate_post))
        .route("/api/tweet", post(tweet::publish_post))
        .layer(
            ServiceBuilder::new()
                .layer(build_cors())
                .layer(axum::middleware::from_fn(request_id))
                .layer(TraceLayer::new_for_http()),
        )
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthData {
        status: "ok",
        publishing: if state.publisher.is_some() {
            "enabled"
        } else {
            "disabled"
        },
    })
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use tweetsmith_core::PostApi;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::*;

    fn offline_generator() -> Arc<Generator> {
        Arc::new(Generator::new(Vec::new(), Duration::from_secs(1)))
    }

    fn state_without_publisher() -> AppState {
        AppState {
            generator: offline_generator(),
            publisher: None,
        }
    }

    fn state_with_x(base_url: &str) -> AppState {
        let credentials = Credentials::new("ck", "cs", "at", "as").expect("credentials");
        let client =
            XClient::with_base_url(credentials, 5, PostApi::V2, base_url).expect("x client");
        AppState {
            generator: offline_generator(),
            publisher: Some(Arc::new(client)),
        }
    }

    fn post_json(uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .header(REQUEST_ID_HEADER, "req-test")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let body = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body bytes");
        serde_json::from_slice(&body).expect("json parse")
    }

    #[test]
    fn api_error_validation_error_maps_to_bad_request() {
        let response = ApiError::new("req-1", "validation_error", "invalid input").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn api_error_other_codes_map_to_internal_error() {
        for code in ["configuration_error", "publish_failed", "internal_error"] {
            let response = ApiError::new("req-1", code, "boom").into_response();
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR, "{code}");
        }
    }

    #[tokio::test]
    async fn health_reports_publishing_disabled() {
        let response = build_app(state_without_publisher())
            .oneshot(
                Request::builder()
                    .uri("/api/health")
                    .body(Body::empty())
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "status": "ok", "publishing": "disabled" })
        );
    }

    #[tokio::test]
    async fn generate_returns_placeholder_when_no_candidate_answers() {
        let response = build_app(state_without_publisher())
            .oneshot(post_json(
                "/api/generate",
                &json!({ "topic": "future of AI agents" }),
            ))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        let tweet = body["tweet"].as_str().expect("tweet");
        assert!(tweet.contains("\"future of AI agents\""), "tweet: {tweet}");
        assert!(!body["explanation"].as_str().expect("explanation").is_empty());
    }

    #[tokio::test]
    async fn generate_without_topic_is_bad_request() {
        let response = build_app(state_without_publisher())
            .oneshot(post_json("/api/generate", &json!({ "preferences": "witty" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"], "Topic is required");
        assert_eq!(body["code"], "validation_error");
        assert_eq!(body["request_id"], "req-test");
    }

    #[tokio::test]
    async fn generate_with_blank_topic_is_bad_request() {
        let response = build_app(state_without_publisher())
            .oneshot(post_json("/api/generate", &json!({ "topic": "   " })))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_json_is_bad_request_with_error_envelope() {
        let response = build_app(state_without_publisher())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from("{not json"))
                    .expect("request"),
            )
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["code"], "validation_error");
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn tweet_without_text_is_bad_request() {
        let response = build_app(state_without_publisher())
            .oneshot(post_json("/api/tweet", &json!({})))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Tweet content is required");
    }

    #[tokio::test]
    async fn tweet_with_publishing_disabled_is_a_configuration_error() {
        let response = build_app(state_without_publisher())
            .oneshot(post_json("/api/tweet", &json!({ "tweet": "hello" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["code"], "configuration_error");
    }

    #[tokio::test]
    async fn tweet_publishes_and_returns_post_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/users/me"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "id": "1", "name": "Tweetsmith", "username": "tweetsmith" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "data": { "id": "555", "text": "hello world" }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = build_app(state_with_x(&server.uri()))
            .oneshot(post_json("/api/tweet", &json!({ "tweet": "hello world" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await,
            json!({ "success": true, "id": "555", "text": "hello world" })
        );
    }

    #[tokio::test]
    async fn tweet_over_quota_is_internal_error_with_quota_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/2/users/me"))
            .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/2/tweets"))
            .respond_with(ResponseTemplate::new(429).set_body_string("Too Many Requests"))
            .expect(1)
            .mount(&server)
            .await;

        let response = build_app(state_with_x(&server.uri()))
            .oneshot(post_json("/api/tweet", &json!({ "tweet": "one too many" })))
            .await
            .expect("response");

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = json_body(response).await;
        assert_eq!(body["code"], "publish_failed");
        let message = body["error"].as_str().expect("error message");
        assert!(message.contains("quota exceeded"), "message: {message}");
    }
}
