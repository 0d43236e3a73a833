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

//! Model response normalization: turn raw, possibly malformed completion
//! text into canonical [`Concept`] records.
//!
//! Parsing is total per concept: a malformed concept object is downgraded
//! to a minimal-fields concept instead of discarding the whole segment's
//! output. Only a response that is not JSON at all is an error, and that
//! error routes the caller to the fallback extractor.

use chrono::Utc;
use distill_core::{CodeSnippet, Concept};
use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;
use tracing::{debug, warn};

/// The model output could not be parsed as JSON at all.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("response is not valid JSON: {0}")]
    Format(#[from] serde_json::Error),
}

/// A segment's normalized extraction output.
#[derive(Debug, Clone, Default)]
pub struct NormalizedResponse {
    pub concepts: Vec<Concept>,
    pub conversation_title: Option<String>,
    pub conversation_summary: String,
}

/// Strip a markdown code fence wrapper, if present.
pub fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

fn tag_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[\w+\]\s*").expect("static tag regex"))
}

fn parenthetical_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\([^)]*\)").expect("static parenthetical regex"))
}

fn colon_spacing_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\s+:").expect("static colon regex"))
}

/// Remove formatting artifacts the model sometimes carries into the
/// conversation summary: bracketed tags, parenthetical asides, and stray
/// spacing before colons.
pub fn clean_summary(summary: &str) -> String {
    let without_tags = tag_regex().replace_all(summary, "");
    let without_parens = parenthetical_regex().replace_all(&without_tags, "");
    colon_spacing_regex()
        .replace_all(&without_parens, ":")
        .trim()
        .to_string()
}

/// Parse a raw extraction response into canonical concepts.
pub fn parse_response(raw: &str) -> Result<NormalizedResponse, NormalizeError> {
    let value: serde_json::Value = serde_json::from_str(strip_code_fences(raw))?;

    let conversation_summary = value
        .get("conversation_summary")
        .or_else(|| value.get("summary"))
        .and_then(|v| v.as_str())
        .map(clean_summary)
        .unwrap_or_default();

    let conversation_title = value
        .get("conversation_title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from);

    let mut concepts = Vec::new();
    match value.get("concepts").and_then(|v| v.as_array()) {
        Some(raw_concepts) => {
            debug!(count = raw_concepts.len(), "normalizing raw concepts");
            for raw_concept in raw_concepts {
                match concept_from_candidate(raw_concept, &conversation_summary) {
                    Some(concept) => concepts.push(concept),
                    None => warn!("dropping non-object concept candidate"),
                }
            }
        }
        None => warn!("response has no concepts array"),
    }

    Ok(NormalizedResponse {
        concepts,
        conversation_title,
        conversation_summary,
    })
}

/// Total mapping from one untrusted candidate object to a canonical
/// concept. Returns `None` only for candidates that are not JSON objects;
/// every object becomes a concept, however sparse.
pub fn concept_from_candidate(
    candidate: &serde_json::Value,
    conversation_summary: &str,
) -> Option<Concept> {
    let object = candidate.as_object()?;

    let title = object
        .get("title")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or("Untitled Concept")
        .to_string();

    let category = object
        .get("category")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .unwrap_or("General")
        .to_string();

    let category_path = object
        .get("categoryPath")
        .and_then(|v| v.as_array())
        .map(|path| {
            path.iter()
                .filter_map(|part| part.as_str())
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect::<Vec<_>>()
        })
        .filter(|path| !path.is_empty())
        .unwrap_or_else(|| split_category_path(&category));

    let summary = object
        .get("summary")
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .unwrap_or_else(|| truncate_chars(conversation_summary, 150));

    let details = extract_details(object, &summary);
    let key_points = string_list(object.get("keyPoints"));
    let related_concepts = string_list(object.get("relatedConcepts"));
    let code_snippets = extract_snippets(object);
    let confidence_score = extract_confidence(object);

    let mut concept = Concept {
        title,
        category,
        category_path,
        summary,
        details,
        key_points,
        code_snippets,
        related_concepts,
        confidence_score,
        is_technique_derived: false,
        last_updated: Utc::now(),
    };
    concept.dedupe_related();
    Some(concept)
}

/// Split a possibly ">"-delimited category string into its path.
pub fn split_category_path(category: &str) -> Vec<String> {
    let path: Vec<String> = category
        .split('>')
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect();
    if path.is_empty() {
        vec![category.to_string()]
    } else {
        path
    }
}

/// Unify the heterogeneous detail fields (`details`, `implementation`,
/// `insights`) into one long-form string. Object-shaped details are
/// flattened: an `implementation` key wins, anything else is pretty-printed.
fn extract_details(object: &serde_json::Map<String, serde_json::Value>, summary: &str) -> String {
    for field in ["details", "implementation", "insights"] {
        if let Some(value) = object.get(field) {
            match value {
                serde_json::Value::String(text) if !text.trim().is_empty() => {
                    return text.clone();
                }
                serde_json::Value::Object(map) => {
                    if let Some(serde_json::Value::String(text)) = map.get("implementation") {
                        return text.clone();
                    }
                    return serde_json::to_string_pretty(value).unwrap_or_default();
                }
                _ => continue,
            }
        }
    }
    summary.to_string()
}

/// Wrong-typed or missing list fields coerce to empty lists.
fn string_list(value: Option<&serde_json::Value>) -> Vec<String> {
    value
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str())
                .map(|item| item.trim().to_string())
                .filter(|item| !item.is_empty())
                .collect()
        })
        .unwrap_or_default()
}

fn extract_snippets(object: &serde_json::Map<String, serde_json::Value>) -> Vec<CodeSnippet> {
    let raw = ["codeSnippets", "code_examples", "codeExamples"]
        .iter()
        .find_map(|field| object.get(*field).and_then(|v| v.as_array()));

    let Some(raw) = raw else {
        return Vec::new();
    };

    raw.iter()
        .filter_map(|entry| {
            let entry = entry.as_object()?;
            let code = entry.get("code").and_then(|v| v.as_str()).unwrap_or("");
            let language = entry
                .get("language")
                .and_then(|v| v.as_str())
                .unwrap_or("text");
            let description = entry
                .get("description")
                .or_else(|| entry.get("explanation"))
                .and_then(|v| v.as_str())
                .unwrap_or("");
            Some(CodeSnippet {
                language: language.to_string(),
                description: description.to_string(),
                code: code.to_string(),
            })
        })
        .collect()
}

/// Confidence may arrive as a number or a numeric string; anything else
/// defaults to 0.8. The result is clamped to [0, 1].
fn extract_confidence(object: &serde_json::Map<String, serde_json::Value>) -> f64 {
    let raw = ["confidence_score", "confidenceScore", "confidence"]
        .iter()
        .find_map(|field| object.get(*field));

    let value = match raw {
        Some(serde_json::Value::Number(number)) => number.as_f64().unwrap_or(0.8),
        Some(serde_json::Value::String(text)) => text.trim().parse::<f64>().unwrap_or(0.8),
        _ => 0.8,
    };
    value.clamp(0.0, 1.0)
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
