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

//! Canonical concept records and the assembled analysis result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A code sample attached to a concept.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CodeSnippet {
    pub language: String,
    pub description: String,
    pub code: String,
}

/// A structured knowledge unit extracted from a conversation.
///
/// This is the canonical, trusted form: everything that reaches a
/// [`Concept`] has passed through the normalizer's total mapping, so
/// fields are always present and well-typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    /// Non-empty display title; also the deduplication key.
    pub title: String,
    /// Taxonomy leaf, e.g. "LeetCode Problems" or "Finance > Investment".
    pub category: String,
    /// Ordered path whose last element equals `category`'s leaf.
    pub category_path: Vec<String>,
    pub summary: String,
    /// Long-form explanation, expected to exceed `summary` in length.
    pub details: String,
    pub key_points: Vec<String>,
    pub code_snippets: Vec<CodeSnippet>,
    /// Case-insensitive unique set, insertion order preserved.
    pub related_concepts: Vec<String>,
    /// Model confidence in [0, 1].
    pub confidence_score: f64,
    /// True for secondary concepts synthesized by technique enrichment.
    #[serde(default)]
    pub is_technique_derived: bool,
    pub last_updated: DateTime<Utc>,
}

impl Concept {
    /// Create a concept with the minimal required fields; list fields start
    /// empty and confidence defaults to the normalizer's 0.8.
    pub fn new(title: impl Into<String>, category: impl Into<String>) -> Self {
        let category = category.into();
        Self {
            title: title.into(),
            category_path: vec![category.clone()],
            category,
            summary: String::new(),
            details: String::new(),
            key_points: Vec::new(),
            code_snippets: Vec::new(),
            related_concepts: Vec::new(),
            confidence_score: 0.8,
            is_technique_derived: false,
            last_updated: Utc::now(),
        }
    }

    /// Add a related concept, skipping case-insensitive duplicates.
    pub fn add_related(&mut self, title: &str) {
        let lower = title.to_lowercase();
        if !self
            .related_concepts
            .iter()
            .any(|existing| existing.to_lowercase() == lower)
        {
            self.related_concepts.push(title.to_string());
        }
    }

    /// Remove case-insensitive duplicates from `related_concepts`,
    /// preserving first-seen order.
    pub fn dedupe_related(&mut self) {
        let mut seen = std::collections::HashSet::new();
        self.related_concepts
            .retain(|name| seen.insert(name.to_lowercase()));
    }

    /// Rewrite the category leaf, keeping `category_path` consistent.
    pub fn set_category(&mut self, category: &str) {
        self.category = category.to_string();
        let path: Vec<String> = category
            .split('>')
            .map(|part| part.trim().to_string())
            .filter(|part| !part.is_empty())
            .collect();
        if path.is_empty() {
            self.category_path = vec![self.category.clone()];
        } else {
            self.category_path = path;
        }
    }
}

/// How the final result was produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Normal path: segmentation plus per-segment model extraction.
    Segmented,
    /// Every segment was recovered heuristically.
    Fallback,
    /// The pipeline failed outright and synthesized a placeholder result.
    Emergency,
}

/// Bookkeeping attached to every analysis response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub extraction_method: ExtractionMethod,
    /// True when the response was served from the result cache.
    #[serde(default)]
    pub cache_hit: bool,
    pub model: String,
    pub concept_count: usize,
    pub segment_count: usize,
    /// Segments that fell back to heuristic recovery.
    #[serde(default)]
    pub fallback_segments: usize,
    pub duration_ms: u64,
    pub extraction_time: DateTime<Utc>,
}

/// The assembled output of one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Unique by title after deduplication.
    pub concepts: Vec<Concept>,
    pub conversation_title: String,
    pub conversation_summary: String,
    pub metadata: AnalysisMetadata,
}
