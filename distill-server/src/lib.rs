// Copyright 2025 Distill (https://github.com/distill-kb/distill)
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

pub mod api;
pub mod config;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api::AppState;
use config::DistillConfig;
use distill_extraction::{
    AnthropicClient, CategoryCatalog, CategoryResolver, CompletionClient, ConceptPipeline,
    LearningStore, OpenAiClient, PipelineConfig, ResultCache, RetryPolicy,
};

/// Build the application router over an already-constructed state.
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut router = Router::new()
        .route("/", get(api::root))
        .route("/api/v1/extract-concepts", post(api::extract_concepts))
        .route(
            "/api/v1/manual-category-update",
            post(api::manual_category_update),
        )
        .route(
            "/api/v1/category-learning-stats",
            get(api::category_learning_stats),
        )
        .route("/api/v1/health", get(api::health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    if enable_cors {
        router = router.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        );
    }

    router
}

/// Construct every pipeline service from configuration. All state is
/// explicit and owned here; handlers receive it by handle.
pub fn build_state(config: &DistillConfig) -> Result<AppState> {
    let learning = Arc::new(LearningStore::new(config.learning_store_path()));
    tracing::info!(
        "Category learning store ready with {} learned mappings",
        learning.count()
    );

    let catalog = match &config.categories.remote_url {
        Some(url) => CategoryCatalog::with_remote(url.clone()),
        None => CategoryCatalog::static_only(),
    };

    let default_client: Arc<dyn CompletionClient> =
        if let Some(key) = &config.llm.openai_api_key {
            let mut client = OpenAiClient::new(key.clone(), config.llm.model.clone());
            if let Some(base_url) = &config.llm.base_url {
                client = client.with_base_url(base_url.clone());
            }
            tracing::info!(model = %config.llm.model, "using OpenAI completion client");
            Arc::new(client)
        } else if let Some(key) = &config.llm.anthropic_api_key {
            tracing::info!(model = %config.llm.model, "using Anthropic completion client");
            Arc::new(AnthropicClient::new(key.clone(), config.llm.model.clone()))
        } else {
            anyhow::bail!("no completion credentials configured");
        };

    let pipeline = Arc::new(ConceptPipeline::new(
        CategoryResolver::new(learning.clone()),
        catalog,
        Arc::new(ResultCache::new()),
        PipelineConfig {
            call_timeout: Duration::from_secs(config.server.request_timeout_secs),
            retry: RetryPolicy::default(),
            ..PipelineConfig::default()
        },
    ));

    Ok(AppState {
        pipeline,
        learning,
        default_client,
        llm: config.llm.clone(),
    })
}

pub async fn run_server(config: DistillConfig) -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "distill_server=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Distill Server");

    config.validate()?;

    let state = build_state(&config)?;
    let router = build_router(state, config.server.enable_cors);

    let addr = config.socket_addr()?;
    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
