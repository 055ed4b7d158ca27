//! Axum route handlers for the content generation server.
//!
//! # Routes
//!
//! - `GET  /health`             — Returns `{"status": "ok", "version": "0.1.0", "service": "content-crew"}`
//! - `POST /generate-product`   — Generates a product listing
//! - `POST /generate-blog-post` — Generates a blog post

use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::pipelines::{ContentPipeline, PipelineError};
use crate::schemas::{BlogPost, ProductDescription};

/// Category hint used when a blog request does not name one.
pub const DEFAULT_BLOG_CATEGORY: &str = "the most fitting category for the topic";

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline behind `POST /generate-product`.
    pub product: Arc<ContentPipeline>,
    /// Pipeline behind `POST /generate-blog-post`.
    pub blog: Arc<ContentPipeline>,
}

impl AppState {
    pub fn new(product: ContentPipeline, blog: ContentPipeline) -> Self {
        Self {
            product: Arc::new(product),
            blog: Arc::new(blog),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductRequest {
    pub prompt: String,
    #[serde(default)]
    pub store_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlogPostRequest {
    pub prompt: String,
    pub store_id: String,
    #[serde(default)]
    pub category: Option<String>,
}

/// Error response carrying an HTTP status and a `{"detail": ...}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub detail: String,
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        let status = match err {
            PipelineError::Validation(_) => StatusCode::BAD_REQUEST,
            PipelineError::Generation(_) | PipelineError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        Self {
            status,
            detail: err.to_string(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        Self {
            status: rejection.status(),
            detail: rejection.body_text(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(serde_json::json!({ "detail": self.detail }))).into_response()
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/generate-product", post(generate_product_handler))
        .route("/generate-blog-post", post(generate_blog_post_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /health — liveness check.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "content-crew",
    }))
}

/// Template inputs handed to the crew. Every key is always present so task
/// templates may reference any of them.
fn generation_inputs(prompt: &str, store_id: &str, category: &str) -> HashMap<String, String> {
    HashMap::from([
        ("prompt".to_string(), prompt.to_string()),
        ("store_id".to_string(), store_id.to_string()),
        ("category".to_string(), category.to_string()),
    ])
}

/// POST /generate-product
async fn generate_product_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProductRequest>, JsonRejection>,
) -> Result<Json<ProductDescription>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(store_id = ?request.store_id, "Received product request: {}", request.prompt);

    let inputs = generation_inputs(
        &request.prompt,
        request.store_id.as_deref().unwrap_or_default(),
        "",
    );
    let object = state.product.run(&inputs).await.map_err(log_failure)?;
    tracing::debug!("Parsed product data: {:?}", object);

    let product = ProductDescription::from_validated(object)
        .map_err(|e| log_failure(PipelineError::Internal(e.to_string())))?;
    Ok(Json(product))
}

/// POST /generate-blog-post
async fn generate_blog_post_handler(
    State(state): State<AppState>,
    payload: Result<Json<BlogPostRequest>, JsonRejection>,
) -> Result<Json<BlogPost>, ApiError> {
    let Json(request) = payload?;
    tracing::info!(
        store_id = %request.store_id,
        category = ?request.category,
        "Received blog post request: {}",
        request.prompt
    );

    let inputs = generation_inputs(
        &request.prompt,
        &request.store_id,
        request.category.as_deref().unwrap_or(DEFAULT_BLOG_CATEGORY),
    );
    let object = state.blog.run(&inputs).await.map_err(log_failure)?;
    tracing::debug!("Parsed blog post data: {:?}", object);

    let post = BlogPost::from_validated(object)
        .map_err(|e| log_failure(PipelineError::Internal(e.to_string())))?;
    Ok(Json(post))
}

fn log_failure(err: PipelineError) -> ApiError {
    match &err {
        PipelineError::Validation(_) => tracing::warn!("Validation error: {}", err),
        _ => tracing::error!("Server error: {}", err),
    }
    ApiError::from(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use crate::pipelines::ContentGenerator;
    use crate::schemas::OutputSchema;

    struct StubGenerator(Result<String, String>);

    #[async_trait]
    impl ContentGenerator for StubGenerator {
        async fn generate(&self, _inputs: &HashMap<String, String>) -> Result<String, String> {
            self.0.clone()
        }
    }

    fn app(product: Result<String, String>, blog: Result<String, String>) -> Router {
        app_router(AppState::new(
            ContentPipeline::new(Arc::new(StubGenerator(product)), OutputSchema::Product),
            ContentPipeline::new(Arc::new(StubGenerator(blog)), OutputSchema::Blog),
        ))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn product_json() -> Value {
        json!({
            "title": "Walnut Desk",
            "description": "A solid walnut desk with brass fittings.",
            "category": "Furniture",
            "price_suggestion": 349.99,
            "sku_suggestion": "WD-349"
        })
    }

    fn blog_json(tags: Value, words: usize) -> Value {
        json!({
            "title": "Caring for Walnut",
            "content": vec!["word"; words].join(" "),
            "meta_description": "How to keep walnut furniture looking new.",
            "tags": tags,
            "category": "Guides"
        })
    }

    #[tokio::test]
    async fn test_generate_product_returns_exact_fields() {
        let raw = format!("```json\n{}\n```", product_json());
        let (status, body) = post_json(
            app(Ok(raw), Err("unused".to_string())),
            "/generate-product",
            json!({"prompt": "a walnut desk"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, product_json());
    }

    #[tokio::test]
    async fn test_generate_product_drops_unknown_fields() {
        let mut object = product_json();
        object["notes"] = json!("internal");
        let (status, body) = post_json(
            app(Ok(object.to_string()), Err("unused".to_string())),
            "/generate-product",
            json!({"prompt": "a walnut desk", "store_id": "s-1"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, product_json());
    }

    #[tokio::test]
    async fn test_generation_failure_is_500_with_detail() {
        let (status, body) = post_json(
            app(Err("NIM endpoint unreachable".to_string()), Ok(String::new())),
            "/generate-product",
            json!({"prompt": "a walnut desk"}),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .contains("NIM endpoint unreachable"));
    }

    #[tokio::test]
    async fn test_string_price_is_400() {
        let mut object = product_json();
        object["price_suggestion"] = json!("19.99");
        let (status, body) = post_json(
            app(Ok(object.to_string()), Err("unused".to_string())),
            "/generate-product",
            json!({"prompt": "a walnut desk"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["detail"],
            "Invalid response format: Field 'price_suggestion' must be a number"
        );
    }

    #[tokio::test]
    async fn test_generate_blog_post_ok() {
        let post = blog_json(json!(["walnut", "care", "furniture"]), 250);
        let (status, body) = post_json(
            app(Err("unused".to_string()), Ok(post.to_string())),
            "/generate-blog-post",
            json!({"prompt": "walnut care", "store_id": "s-1", "category": null}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, post);
    }

    #[tokio::test]
    async fn test_blog_post_with_two_tags_is_400() {
        let post = blog_json(json!(["walnut", "care"]), 250);
        let (status, body) = post_json(
            app(Err("unused".to_string()), Ok(post.to_string())),
            "/generate-blog-post",
            json!({"prompt": "walnut care", "store_id": "s-1"}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["detail"]
            .as_str()
            .unwrap()
            .starts_with("Invalid response format: Tags must be a list"));
    }

    #[tokio::test]
    async fn test_blog_request_requires_store_id() {
        let (status, body) = post_json(
            app(Ok(String::new()), Ok(String::new())),
            "/generate-blog-post",
            json!({"prompt": "walnut care"}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body["detail"].as_str().unwrap().contains("store_id"));
    }

    #[tokio::test]
    async fn test_malformed_body_gets_detail() {
        let response = app(Ok(String::new()), Ok(String::new()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate-product")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"prompt\": "))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_missing_content_type_gets_detail() {
        let response = app(Ok(String::new()), Ok(String::new()))
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/generate-product")
                    .body(Body::from(json!({"prompt": "a desk"}).to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["detail"].is_string());
    }

    #[tokio::test]
    async fn test_health() {
        let response = app(Ok(String::new()), Ok(String::new()))
            .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "ok");
        assert_eq!(body["service"], "content-crew");
    }

    #[test]
    fn test_api_error_status_mapping() {
        let err = ApiError::from(PipelineError::Internal("boom".to_string()));
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.detail, "boom");
    }
}
