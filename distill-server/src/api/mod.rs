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

mod analyze;
mod categories;
mod health;

pub use analyze::extract_concepts;
pub use categories::{category_learning_stats, manual_category_update};
pub use health::{health_check, root};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use distill_extraction::{
    AnthropicClient, CompletionClient, ConceptPipeline, LearningStore, OpenAiClient,
};
use serde::Serialize;
use std::sync::Arc;

use crate::config::LlmConfig;

/// API error type
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        (status, Json(ErrorResponse { error: message })).into_response()
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

/// Shared application state: every service the pipeline needs, owned here
/// at the application root and passed by handle.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<ConceptPipeline>,
    pub learning: Arc<LearningStore>,
    pub default_client: Arc<dyn CompletionClient>,
    pub llm: LlmConfig,
}

impl AppState {
    /// The completion client for one request: the shared default, or a
    /// per-request client carrying the caller's credential.
    pub fn client_for(&self, custom_api_key: Option<&str>) -> Arc<dyn CompletionClient> {
        let Some(key) = custom_api_key.filter(|key| !key.trim().is_empty()) else {
            return self.default_client.clone();
        };

        tracing::info!("using caller-supplied API key for this request");
        if self.llm.openai_api_key.is_some() || self.llm.anthropic_api_key.is_none() {
            let mut client = OpenAiClient::new(key.to_string(), self.llm.model.clone());
            if let Some(base_url) = &self.llm.base_url {
                client = client.with_base_url(base_url.clone());
            }
            Arc::new(client)
        } else {
            Arc::new(AnthropicClient::new(key.to_string(), self.llm.model.clone()))
        }
    }
}
