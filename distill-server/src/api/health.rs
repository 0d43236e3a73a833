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

use axum::{extract::State, response::IntoResponse, Json};
use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::api::AppState;

/// Health check response structure
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub model: String,
    pub timestamp: String,
}

/// GET /api/v1/health - liveness check.
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    debug!("Health check requested");
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model: state.llm.model.clone(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(Debug, Serialize)]
pub struct RootResponse {
    pub message: String,
    pub status: String,
    pub endpoints: Vec<String>,
}

/// GET / - service banner and endpoint listing.
pub async fn root() -> impl IntoResponse {
    Json(RootResponse {
        message: "Distill concept extraction API is running".to_string(),
        status: "healthy".to_string(),
        endpoints: vec![
            "/api/v1/extract-concepts".to_string(),
            "/api/v1/manual-category-update".to_string(),
            "/api/v1/category-learning-stats".to_string(),
            "/api/v1/health".to_string(),
        ],
    })
}
