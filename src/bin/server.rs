//! content-crew HTTP server binary.
//!
//! # Environment Variables
//!
//! - `PORT` — HTTP port (default: 8000)
//! - `LLM_MODEL` — Model id (default: `nvidia_nim/meta/llama3-70b-instruct`)
//! - `LLM_TEMPERATURE` — Sampling temperature (default: 0.7)
//! - `LLM_API_KEY` — API key (falls back to `NVIDIA_NIM_API_KEY` / `OPENAI_API_KEY`)
//! - `LLM_BASE_URL` — Endpoint override
//! - `LLM_TIMEOUT_SECS` — LLM HTTP timeout (default: 120)
//! - `CREWS_CONFIG` — Crew definitions YAML (default: embedded)
//! - `DEBUG_ARTIFACT_DIR` — Where rejected responses are dumped (default: disabled)
//! - `RUST_LOG` — Tracing filter (default: "info,content_crew=debug")
//!
//! # Usage
//!
//! ```bash
//! NVIDIA_NIM_API_KEY=... cargo run --bin server
//! ```

use std::sync::Arc;

use anyhow::Context;
use content_crew::config::Settings;
use content_crew::pipelines::ContentPipeline;
use content_crew::project::CrewsConfig;
use content_crew::schemas::OutputSchema;
use content_crew::server::{app_router, AppState};
use content_crew::BaseLLM;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,content_crew=debug".into()),
        )
        .init();

    let settings = Settings::from_env().context("Invalid settings")?;

    let llm = settings.llm().context("Failed to configure the LLM client")?;
    if llm.api_key.is_none() {
        tracing::warn!(
            "No API key configured for provider '{}'; generation calls will fail",
            llm.infer_provider()
        );
    }
    tracing::info!(
        model = %llm.model,
        temperature = ?llm.temperature,
        "Using LLM"
    );
    let llm: Arc<dyn BaseLLM> = Arc::new(llm);

    let crews = CrewsConfig::load_or_default(settings.crews_config.as_deref())
        .context("Failed to load crew definitions")?;
    let (product_crew, blog_crew) = crews.build(llm)?;

    let artifacts = settings.artifact_handler();
    if let Some(handler) = &artifacts {
        tracing::info!("Debug artifacts will be written to {}", handler.directory.display());
    }

    let state = AppState::new(
        ContentPipeline::new(Arc::new(product_crew), OutputSchema::Product)
            .with_artifacts(artifacts.clone()),
        ContentPipeline::new(Arc::new(blog_crew), OutputSchema::Blog).with_artifacts(artifacts),
    );
    let app = app_router(state);

    let bind_addr = settings.bind_addr();
    tracing::info!("content-crew server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health             — liveness check");
    tracing::info!("  POST /generate-product   — product listing");
    tracing::info!("  POST /generate-blog-post — blog post");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
