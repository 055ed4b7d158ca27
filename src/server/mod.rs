//! HTTP server for the content generation endpoints.
//!
//! # Endpoints
//!
//! - `GET  /health`             — Liveness check
//! - `POST /generate-product`   — Product listing from a prompt
//! - `POST /generate-blog-post` — Blog post from a prompt

pub mod routes;

pub use routes::{app_router, ApiError, AppState, BlogPostRequest, ProductRequest};
