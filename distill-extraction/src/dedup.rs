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

//! Concept deduplication and technique enrichment.
//!
//! Dedup keeps one concept per exact title: the highest confidence wins,
//! ties broken by code-snippet count. Enrichment synthesizes secondary
//! "technique" concepts for problem-solving content, linked bidirectionally
//! to the problems they solve.

use chrono::Utc;
use distill_core::{CodeSnippet, Concept};
use std::collections::HashMap;
use tracing::{debug, info};

/// Most technique concepts synthesized per analysis.
const MAX_TECHNIQUE_CONCEPTS: usize = 3;

/// Confidence assigned to synthesized technique concepts, deliberately
/// below the main concepts they derive from.
const TECHNIQUE_CONFIDENCE: f64 = 0.7;

/// Tokens too generic to be promoted to technique concepts.
const GENERIC_TOKENS: &[&str] = &["array", "list", "string", "integer", "iteration", "loop"];

/// Merge same-titled concepts, preserving first-seen order.
pub fn dedupe_by_title(concepts: Vec<Concept>) -> Vec<Concept> {
    let mut order: Vec<String> = Vec::new();
    let mut by_title: HashMap<String, Concept> = HashMap::new();

    for concept in concepts {
        match by_title.get(&concept.title) {
            None => {
                order.push(concept.title.clone());
                by_title.insert(concept.title.clone(), concept);
            }
            Some(existing) => {
                let replace = concept.confidence_score > existing.confidence_score
                    || (concept.confidence_score == existing.confidence_score
                        && concept.code_snippets.len() > existing.code_snippets.len());
                if replace {
                    by_title.insert(concept.title.clone(), concept);
                }
            }
        }
    }

    order
        .into_iter()
        .filter_map(|title| by_title.remove(&title))
        .collect()
}

/// Does this concept look like a worked coding problem?
fn is_problem_concept(concept: &Concept) -> bool {
    let category = concept.category.to_lowercase();
    concept.title.to_lowercase().contains("problem")
        || matches!(
            category.as_str(),
            "problem-solving"
                | "algorithm"
                | "algorithms"
                | "leetcode"
                | "leetcode problems"
                | "coding challenge"
        )
}

/// The known technique vocabulary: (match keywords, canonical name).
const TECHNIQUE_PATTERNS: &[(&[&str], &str)] = &[
    (&["hash", "dictionary", "map"], "Hash Table"),
    (&["frequency", "count"], "Frequency Counting"),
    (&["pointer"], "Two Pointer Technique"),
    (&["window"], "Sliding Window"),
    (&["binary search"], "Binary Search"),
    (&["dynamic programming", "memoization"], "Dynamic Programming"),
];

fn technique_from_text(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    if GENERIC_TOKENS.contains(&lower.trim()) {
        return None;
    }
    TECHNIQUE_PATTERNS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|keyword| lower.contains(keyword)))
        .map(|(_, name)| *name)
}

/// Synthesize technique concepts for problem-solving content and link them
/// bidirectionally. `technique_hints` carries the segmenter's
/// `main_technique` values. Also de-duplicates every concept's related
/// list case-insensitively.
pub fn enrich_with_techniques(mut concepts: Vec<Concept>, technique_hints: &[String]) -> Vec<Concept> {
    let mut synthesized: Vec<Concept> = Vec::new();

    let problem_indices: Vec<usize> = concepts
        .iter()
        .enumerate()
        .filter(|(_, concept)| is_problem_concept(concept))
        .map(|(index, _)| index)
        .collect();

    for index in problem_indices {
        let mut techniques: Vec<&'static str> = Vec::new();
        let push_unique = |name: &'static str, techniques: &mut Vec<&'static str>| {
            if !techniques.contains(&name) {
                techniques.push(name);
            }
        };

        {
            let concept = &concepts[index];
            for point in &concept.key_points {
                if let Some(name) = technique_from_text(point) {
                    push_unique(name, &mut techniques);
                }
            }
            for related in &concept.related_concepts {
                if let Some(name) = technique_from_text(related) {
                    push_unique(name, &mut techniques);
                }
            }
            for hint in technique_hints {
                if let Some(name) = technique_from_text(hint) {
                    push_unique(name, &mut techniques);
                }
            }
        }

        let problem_title = concepts[index].title.clone();
        for name in techniques {
            if synthesized.len() >= MAX_TECHNIQUE_CONCEPTS {
                break;
            }
            // One concept per technique across the whole result, and never
            // shadow a concept the model already produced.
            let in_synthesized = synthesized
                .iter()
                .any(|existing| existing.title.eq_ignore_ascii_case(name));
            let in_concepts = concepts
                .iter()
                .position(|existing| existing.title.eq_ignore_ascii_case(name));
            if in_synthesized || in_concepts.is_some() {
                // Still link the existing concept back to the problem.
                for existing in synthesized.iter_mut() {
                    if existing.title.eq_ignore_ascii_case(name) {
                        existing.add_related(&problem_title);
                    }
                }
                if let Some(pos) = in_concepts {
                    if pos != index {
                        concepts[pos].add_related(&problem_title);
                    }
                }
                concepts[index].add_related(name);
                continue;
            }

            debug!(technique = name, problem = %problem_title, "synthesizing technique concept");
            synthesized.push(technique_concept(name, &problem_title));
            concepts[index].add_related(name);
        }
    }

    if !synthesized.is_empty() {
        info!(count = synthesized.len(), "added technique concepts");
    }
    concepts.extend(synthesized);

    for concept in &mut concepts {
        concept.dedupe_related();
    }
    concepts
}

/// Build the canned secondary concept for a known technique.
fn technique_concept(name: &str, problem_title: &str) -> Concept {
    let info = technique_info(name, problem_title);
    let details = format!(
        "{}\n\nTime complexity: {}\nSpace complexity: {}",
        info.implementation,
        technique_complexity(name, ComplexityKind::Time),
        technique_complexity(name, ComplexityKind::Space),
    );

    let category = if name.eq_ignore_ascii_case("hash table") {
        "Data Structure"
    } else {
        "Algorithm Technique"
    };

    Concept {
        title: name.to_string(),
        category: category.to_string(),
        category_path: vec![category.to_string()],
        summary: info.description,
        details,
        key_points: info.key_points,
        code_snippets: Vec::<CodeSnippet>::new(),
        related_concepts: vec![problem_title.to_string()],
        confidence_score: TECHNIQUE_CONFIDENCE,
        is_technique_derived: true,
        last_updated: Utc::now(),
    }
}

struct TechniqueInfo {
    description: String,
    key_points: Vec<String>,
    implementation: String,
}

fn technique_info(name: &str, problem_title: &str) -> TechniqueInfo {
    let lower = name.to_lowercase();
    if lower.contains("hash table") {
        TechniqueInfo {
            description: "A data structure that maps keys to values using a hash function, \
                          allowing lookups with average O(1) time complexity."
                .to_string(),
            key_points: vec![
                "Provides O(1) average time for lookups, insertions, and deletions".to_string(),
                "Maps keys to values using a hash function".to_string(),
                "Handles collisions through chaining or open addressing".to_string(),
                "Essential for problems requiring fast element lookup or counting".to_string(),
            ],
            implementation: format!(
                "Hash tables transform a key into an array index using a hash function, \
                 giving direct access to values without scanning the structure. In problems \
                 like {problem_title}, hash tables enable efficient element tracking and \
                 duplicate detection."
            ),
        }
    } else if lower.contains("frequency") {
        TechniqueInfo {
            description: "A technique that counts occurrences of elements in a collection, \
                          typically implemented with a hash table."
                .to_string(),
            key_points: vec![
                "Tracks the number of occurrences of each element".to_string(),
                "Typically implemented with a hash table or dictionary".to_string(),
                "Common in string manipulation, anagram detection, and duplicate finding"
                    .to_string(),
                "Usually O(n) time where n is the input size".to_string(),
            ],
            implementation: format!(
                "Frequency counting builds a map from element to count in a single pass over \
                 the collection; the map then answers distribution questions directly. For \
                 {problem_title}, it tracks which elements have been seen before."
            ),
        }
    } else if lower.contains("pointer") {
        TechniqueInfo {
            description: "An algorithm technique using two pointers to traverse a data \
                          structure, often reducing time complexity from O(n²) to O(n)."
                .to_string(),
            key_points: vec![
                "Uses two pointers moving through the data structure".to_string(),
                "Often reduces time complexity from O(n²) to O(n)".to_string(),
                "Effective for search, comparison, and subarray problems".to_string(),
                "Pointers may move in the same or opposite directions".to_string(),
            ],
            implementation: "Two reference points are maintained within the structure, \
                             moving toward each other for pair-finding problems, apart for \
                             expansion problems, or in the same direction for window-style \
                             scans, avoiding a nested loop."
                .to_string(),
        }
    } else if lower.contains("window") {
        TechniqueInfo {
            description: "A technique for processing sequential data with a window that \
                          slides through the data, updating state incrementally."
                .to_string(),
            key_points: vec![
                "Maintains a window of elements that expands or contracts".to_string(),
                "Avoids recomputation by tracking window state incrementally".to_string(),
                "Typically reduces O(n²) or worse to O(n)".to_string(),
                "Ideal for subarray or substring problems with constraints".to_string(),
            ],
            implementation: "A range of elements meeting some criterion is maintained while \
                             sliding across the data; state updates account only for elements \
                             entering and leaving the window, so each element is processed a \
                             constant number of times."
                .to_string(),
        }
    } else if lower.contains("binary search") {
        TechniqueInfo {
            description: "A divide-and-conquer search that finds elements in sorted data in \
                          logarithmic time."
                .to_string(),
            key_points: vec![
                "Works on sorted data structures".to_string(),
                "Achieves O(log n) time complexity".to_string(),
                "Repeatedly halves the search space".to_string(),
                "Also answers yes/no questions over monotonic predicates".to_string(),
            ],
            implementation: "The middle element is compared against the target and half of \
                             the remaining range is discarded each step, until the target is \
                             found or the range is empty."
                .to_string(),
        }
    } else if lower.contains("dynamic programming") {
        TechniqueInfo {
            description: "An algorithmic technique that decomposes problems into overlapping \
                          subproblems and builds solutions bottom-up or with memoization."
                .to_string(),
            key_points: vec![
                "Breaks problems into overlapping subproblems".to_string(),
                "Stores computed results to avoid redundant work".to_string(),
                "Top-down memoization or bottom-up tabulation".to_string(),
                "Turns exponential solutions into polynomial ones".to_string(),
            ],
            implementation: "Solutions to subproblems are cached (memoization) or tabulated \
                             in dependency order, so each subproblem is solved once and the \
                             final answer is assembled from stored results."
                .to_string(),
        }
    } else {
        TechniqueInfo {
            description: format!("A key technique used in {problem_title}."),
            key_points: vec![format!("Used to solve {problem_title} efficiently")],
            implementation: format!(
                "This technique is commonly applied in problems like {problem_title}."
            ),
        }
    }
}

enum ComplexityKind {
    Time,
    Space,
}

fn technique_complexity(name: &str, kind: ComplexityKind) -> &'static str {
    let lower = name.to_lowercase();
    match kind {
        ComplexityKind::Time => {
            if lower.contains("hash table") {
                "Average O(1) for lookups, insertions, and deletions; O(n) worst case under heavy collisions"
            } else if lower.contains("frequency") {
                "O(n) where n is the number of elements counted"
            } else if lower.contains("pointer") || lower.contains("window") {
                "O(n) where n is the size of the input"
            } else if lower.contains("binary search") {
                "O(log n) over the sorted input"
            } else if lower.contains("dynamic programming") {
                "Typically O(n²) or O(n·m) depending on the state space"
            } else {
                "Varies with the implementation and problem constraints"
            }
        }
        ComplexityKind::Space => {
            if lower.contains("hash table") || lower.contains("frequency") {
                "O(n) for the tracked elements"
            } else if lower.contains("pointer") {
                "O(1) extra space"
            } else if lower.contains("window") {
                "O(1) to O(k) where k is the window size"
            } else if lower.contains("binary search") {
                "O(1) iterative, O(log n) recursive"
            } else if lower.contains("dynamic programming") {
                "O(n) to O(n²) for the memo table"
            } else {
                "Varies with the implementation and problem constraints"
            }
        }
    }
}
