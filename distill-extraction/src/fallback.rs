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

//! Heuristic recovery for model output that cannot be parsed as JSON at
//! all. Total: for any input this returns a well-formed (possibly empty)
//! concept list and never raises.

use crate::normalize::NormalizedResponse;
use chrono::Utc;
use distill_core::taxonomy::INSIGHT_KEYWORDS;
use distill_core::Concept;
use tracing::{info, warn};

/// Confidence assigned to concepts recovered from `Title:` markers.
const TITLED_CONFIDENCE: f64 = 0.5;
/// Confidence assigned to the last-resort insight concept.
const INSIGHT_CONFIDENCE: f64 = 0.3;

const MAX_INSIGHT_SENTENCES: usize = 3;
const MAX_INSIGHT_KEY_POINTS: usize = 5;

/// Pick a coarse category for unparseable text by scanning for domain
/// keywords. Technical-looking text lands in "General" like everything
/// else that matches nothing specific.
pub fn fallback_category(text: &str) -> &'static str {
    let lower = text.to_lowercase();
    let contains_any =
        |words: &[&str]| words.iter().any(|word| lower.contains(word));

    if contains_any(&["investment", "finance", "money", "stock", "budget"]) {
        "Finance"
    } else if contains_any(&["psychology", "mental", "behavior", "cognitive"]) {
        "Psychology"
    } else if contains_any(&["business", "strategy", "management", "marketing"]) {
        "Business"
    } else if contains_any(&["health", "fitness", "nutrition", "wellness"]) {
        "Health"
    } else {
        "General"
    }
}

/// Recover whatever structure the text holds.
///
/// Strategy one: treat `Title:` markers as concept boundaries. Strategy
/// two, when no markers exist: collect up to three insight-looking
/// sentences into a single generic concept. Either way the result is
/// well-formed.
pub fn extract(text: &str) -> NormalizedResponse {
    warn!("using heuristic fallback extraction");
    let category = fallback_category(text);

    let mut concepts = titled_concepts(text, category);
    if concepts.is_empty() {
        concepts = insight_concept(text, category).into_iter().collect();
    }

    info!(count = concepts.len(), category, "fallback extraction finished");
    NormalizedResponse {
        concepts,
        conversation_title: None,
        conversation_summary: format!(
            "Discussion covering {} concepts",
            category.to_lowercase()
        ),
    }
}

/// One concept per `Title:` marker; the marker's first line is the title
/// and the whole chunk becomes the details.
fn titled_concepts(text: &str, category: &str) -> Vec<Concept> {
    let mut concepts = Vec::new();
    let mut chunks = text.split("Title:");
    // Text before the first marker is preamble, not a concept.
    chunks.next();

    for chunk in chunks {
        let chunk = chunk.trim();
        if chunk.is_empty() {
            continue;
        }
        let title = chunk.lines().next().unwrap_or("").trim();
        if title.is_empty() {
            continue;
        }

        let summary = if chunk.chars().count() > 200 {
            let truncated: String = chunk.chars().take(200).collect();
            format!("{truncated}...")
        } else {
            chunk.to_string()
        };

        concepts.push(Concept {
            title: title.to_string(),
            category: category.to_string(),
            category_path: vec![category.to_string()],
            summary,
            details: chunk.to_string(),
            key_points: vec![
                "Extracted via fallback method".to_string(),
                "May require manual categorization".to_string(),
            ],
            code_snippets: Vec::new(),
            related_concepts: Vec::new(),
            confidence_score: TITLED_CONFIDENCE,
            is_technique_derived: false,
            last_updated: Utc::now(),
        });
    }
    concepts
}

/// Last resort: package insight-looking sentences into one concept.
/// Returns `None` when nothing in the text looks salvageable.
fn insight_concept(text: &str, category: &str) -> Option<Concept> {
    let insights: Vec<&str> = text
        .split(". ")
        .map(str::trim)
        .filter(|sentence| {
            sentence.len() > 50
                && INSIGHT_KEYWORDS
                    .iter()
                    .any(|keyword| sentence.to_lowercase().contains(keyword))
        })
        .collect();

    if insights.is_empty() {
        return None;
    }

    let details = insights
        .iter()
        .take(MAX_INSIGHT_SENTENCES)
        .copied()
        .collect::<Vec<_>>()
        .join(". ");

    Some(Concept {
        title: "Key Insights".to_string(),
        category: category.to_string(),
        category_path: vec![category.to_string()],
        summary: "Key insights extracted from the conversation.".to_string(),
        details,
        key_points: insights
            .iter()
            .take(MAX_INSIGHT_KEY_POINTS)
            .map(|s| s.to_string())
            .collect(),
        code_snippets: Vec::new(),
        related_concepts: Vec::new(),
        confidence_score: INSIGHT_CONFIDENCE,
        is_technique_derived: false,
        last_updated: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn titled_markers_become_concepts() {
        let text = "Some preamble.\n\
                    Title: Hash Table Basics\nHash tables map keys to values.\n\
                    Title: Set Operations\nSets keep unique members.";
        let response = extract(text);
        assert_eq!(response.concepts.len(), 2);
        assert_eq!(response.concepts[0].title, "Hash Table Basics");
        assert_eq!(response.concepts[1].title, "Set Operations");
        assert_eq!(response.concepts[0].confidence_score, 0.5);
    }

    #[test]
    fn insight_sentences_collapse_into_one_concept() {
        let text = "The important thing about this investment strategy is consistency over timing. \
                    Another key principle we discussed is that diversification reduces single-stock risk. \
                    Short filler. \
                    Remember that an emergency budget fund should come before any market exposure.";
        let response = extract(text);
        assert_eq!(response.concepts.len(), 1);
        let concept = &response.concepts[0];
        assert_eq!(concept.title, "Key Insights");
        assert_eq!(concept.category, "Finance");
        assert_eq!(concept.confidence_score, 0.3);
        assert!(concept.key_points.len() <= 5);
        assert!(!concept.key_points.is_empty());
    }

    #[test]
    fn hopeless_input_yields_empty_but_well_formed_result() {
        let response = extract("ok");
        assert!(response.concepts.is_empty());
        assert!(!response.conversation_summary.is_empty());
    }

    #[test]
    fn fallback_category_scans_whole_text() {
        assert_eq!(fallback_category("we discussed stock picks"), "Finance");
        assert_eq!(fallback_category("cognitive load theory"), "Psychology");
        assert_eq!(fallback_category("marketing funnels"), "Business");
        assert_eq!(fallback_category("nutrition plans"), "Health");
        assert_eq!(fallback_category("random chatter"), "General");
        assert_eq!(fallback_category("python code and algorithms"), "General");
    }

    #[test]
    fn never_errors_on_arbitrary_bytes_of_text() {
        for input in ["", "{", "Title:", "Title:\n\n", "\u{1F600} emoji only"] {
            let response = extract(input);
            assert!(response.concepts.len() <= 1, "input {input:?}");
        }
    }
}
