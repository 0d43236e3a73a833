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

//! Request-scoped conversation types: the analysis input, topic segments,
//! and the domain/segment classification enums.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One conversation submitted for analysis.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConversationInput {
    pub text: String,
    /// Free-form caller context, forwarded verbatim into prompts.
    #[serde(default)]
    pub context: Option<serde_json::Value>,
    #[serde(default)]
    pub category_guidance: Option<CategoryGuidance>,
    /// Caller-supplied completion credential; overrides the server key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl ConversationInput {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

/// Caller guidance for hierarchical categorization.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CategoryGuidance {
    #[serde(default)]
    pub use_hierarchical_categories: bool,
    /// Existing category paths, most specific last element.
    #[serde(default)]
    pub existing_categories: Vec<Vec<String>>,
    /// Keywords previously associated with each category.
    #[serde(default)]
    pub category_keywords: HashMap<String, Vec<String>>,
    #[serde(default)]
    pub instructions: Option<String>,
}

/// Coarse content classification driving prompt selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DomainType {
    Technical,
    NonTechnical,
    Mixed,
}

impl DomainType {
    pub fn as_label(&self) -> &'static str {
        match self {
            DomainType::Technical => "TECHNICAL",
            DomainType::NonTechnical => "NON_TECHNICAL",
            DomainType::Mixed => "MIXED",
        }
    }

    /// Parse a model-produced label. Anything unrecognized is `None`;
    /// callers decide the fail-safe default.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "TECHNICAL" => Some(DomainType::Technical),
            "NON_TECHNICAL" => Some(DomainType::NonTechnical),
            "MIXED" => Some(DomainType::Mixed),
            _ => None,
        }
    }
}

/// The conversation style of a segment, carried as a structured field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SegmentKind {
    /// A specific algorithm or coding problem is being worked through.
    ProblemSolving,
    /// Open-ended learning about a technology or concept.
    ExploratoryLearning,
}

impl SegmentKind {
    pub fn as_label(&self) -> &'static str {
        match self {
            SegmentKind::ProblemSolving => "PROBLEM_SOLVING",
            SegmentKind::ExploratoryLearning => "EXPLORATORY_LEARNING",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_uppercase().as_str() {
            "PROBLEM_SOLVING" => Some(SegmentKind::ProblemSolving),
            "EXPLORATORY_LEARNING" => Some(SegmentKind::ExploratoryLearning),
            _ => None,
        }
    }
}

/// A contiguous span of the conversation covering one coherent topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub topic: String,
    pub kind: SegmentKind,
    /// Dominant technique named by the segmenter, when any.
    #[serde(default)]
    pub technique: Option<String>,
    pub content: String,
    /// Ordinal position in the original conversation.
    pub position: usize,
}

impl Segment {
    /// The single-segment form every failure path collapses to.
    pub fn full_conversation(text: &str) -> Self {
        Self {
            topic: "Full Conversation".to_string(),
            kind: SegmentKind::ExploratoryLearning,
            technique: None,
            content: text.to_string(),
            position: 0,
        }
    }
}
