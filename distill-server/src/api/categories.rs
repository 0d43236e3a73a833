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
use distill_extraction::LearningStats;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::api::{ApiError, AppState};

/// POST /api/v1/manual-category-update request body.
#[derive(Debug, Deserialize)]
pub struct ManualCategoryUpdateRequest {
    pub content_snippet: String,
    pub old_category: String,
    pub new_category: String,
}

#[derive(Debug, Serialize)]
pub struct ManualCategoryUpdateResponse {
    pub status: String,
    pub message: String,
    pub timestamp: String,
}

/// POST /api/v1/manual-category-update - record a correction for future
/// category resolution.
pub async fn manual_category_update(
    State(state): State<AppState>,
    Json(request): Json<ManualCategoryUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.content_snippet.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "content_snippet must not be empty".to_string(),
        ));
    }
    if request.new_category.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "new_category must not be empty".to_string(),
        ));
    }

    info!(
        old = %request.old_category,
        new = %request.new_category,
        "manual category update"
    );

    state
        .learning
        .record(
            &request.content_snippet,
            &request.old_category,
            &request.new_category,
        )
        .map_err(|e| ApiError::Internal(format!("Failed to record category update: {e}")))?;

    Ok(Json(ManualCategoryUpdateResponse {
        status: "success".to_string(),
        message: format!(
            "Recorded category update: '{}' -> '{}'",
            request.old_category, request.new_category
        ),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

/// GET /api/v1/category-learning-stats - aggregate view of the learned
/// mappings.
pub async fn category_learning_stats(
    State(state): State<AppState>,
) -> Result<Json<LearningStats>, ApiError> {
    Ok(Json(state.learning.stats()))
}
