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
use distill_core::{AnalysisResult, CategoryGuidance, ConversationInput};
use serde::Deserialize;
use tracing::info;

use crate::api::{ApiError, AppState};

/// POST /api/v1/extract-concepts request body.
#[derive(Debug, Deserialize)]
pub struct ExtractConceptsRequest {
    pub conversation_text: String,
    #[serde(default)]
    pub context: Option<serde_json::Value>,
    #[serde(default)]
    pub category_guidance: Option<CategoryGuidance>,
    #[serde(default)]
    pub custom_api_key: Option<String>,
}

/// POST /api/v1/extract-concepts - run the extraction pipeline.
///
/// The pipeline itself never fails: degraded runs come back with fallback
/// or emergency metadata rather than an error status.
pub async fn extract_concepts(
    State(state): State<AppState>,
    Json(request): Json<ExtractConceptsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.conversation_text.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "conversation_text must not be empty".to_string(),
        ));
    }

    info!(
        chars = request.conversation_text.len(),
        has_context = request.context.is_some(),
        has_guidance = request.category_guidance.is_some(),
        custom_key = request.custom_api_key.is_some(),
        "extraction request received"
    );

    let input = ConversationInput {
        text: request.conversation_text,
        context: request.context,
        category_guidance: request.category_guidance,
        api_key: request.custom_api_key,
    };
    let client = state.client_for(input.api_key.as_deref());

    let result: AnalysisResult = state.pipeline.analyze(client, &input).await;

    info!(
        concepts = result.metadata.concept_count,
        method = ?result.metadata.extraction_method,
        cache_hit = result.metadata.cache_hit,
        "extraction request finished"
    );
    Ok(Json(result))
}
