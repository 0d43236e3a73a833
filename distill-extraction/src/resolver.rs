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

//! Category normalization: map a freeform category suggestion onto the
//! valid taxonomy. Resolution order: exact match, case-insensitive match,
//! static keyword map, learned-mapping lookup, coarse domain fallback.
//! A taxonomy miss never raises; only empty or "UNCATEGORIZED" input
//! resolves to `None`.

use crate::learning::LearningStore;
use distill_core::taxonomy::CATEGORY_KEYWORD_MAP;
use std::sync::Arc;
use tracing::{debug, info};

pub struct CategoryResolver {
    learning: Arc<LearningStore>,
}

impl CategoryResolver {
    pub fn new(learning: Arc<LearningStore>) -> Self {
        Self { learning }
    }

    /// Normalize a suggested category against the valid list.
    pub fn normalize(&self, suggested: &str, valid_categories: &[String]) -> Option<String> {
        let suggested = suggested.trim();
        if suggested.is_empty() || suggested.eq_ignore_ascii_case("UNCATEGORIZED") {
            return None;
        }

        // (1) Exact match.
        if valid_categories.iter().any(|c| c == suggested) {
            return Some(suggested.to_string());
        }

        // (2) Case-insensitive match, returning the canonical spelling.
        let suggested_lower = suggested.to_lowercase();
        if let Some(canonical) = valid_categories
            .iter()
            .find(|c| c.to_lowercase() == suggested_lower)
        {
            return Some(canonical.clone());
        }

        // (3) Static keyword map, validated against the valid list.
        for (keyword, mapped) in CATEGORY_KEYWORD_MAP {
            if suggested_lower.contains(keyword) {
                if let Some(canonical) = valid_categories
                    .iter()
                    .find(|c| c.eq_ignore_ascii_case(mapped))
                {
                    debug!(
                        suggested,
                        keyword, canonical = %canonical, "category mapped via keyword"
                    );
                    return Some(canonical.clone());
                }
            }
        }

        // (4) Learned mappings.
        if let Some(learned) = self.learning.suggest(suggested) {
            if let Some(canonical) = valid_categories
                .iter()
                .find(|c| c.eq_ignore_ascii_case(&learned))
            {
                info!(suggested, learned = %canonical, "category resolved from learned mapping");
                return Some(canonical.clone());
            }
        }

        // (5) Coarse domain fallback.
        Some(coarse_fallback(&suggested_lower).to_string())
    }
}

fn coarse_fallback(suggested_lower: &str) -> &'static str {
    let contains_any =
        |words: &[&str]| words.iter().any(|word| suggested_lower.contains(word));

    if contains_any(&["technical", "code", "programming", "algorithm", "software"]) {
        "General"
    } else if contains_any(&["business", "finance", "money", "investment"]) {
        "Finance"
    } else if contains_any(&["psychology", "mental", "behavior", "cognitive"]) {
        "Psychology"
    } else if contains_any(&["health", "fitness", "nutrition", "wellness"]) {
        "Health"
    } else {
        "General"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use distill_core::taxonomy::DEFAULT_CATEGORIES;
    use tempfile::TempDir;

    fn resolver_with_store() -> (CategoryResolver, Arc<LearningStore>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Arc::new(LearningStore::new(temp_dir.path().join("learning.json")));
        (CategoryResolver::new(store.clone()), store, temp_dir)
    }

    fn valid() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn exact_match_wins() {
        let (resolver, _, _guard) = resolver_with_store();
        assert_eq!(
            resolver.normalize("LeetCode Problems", &valid()),
            Some("LeetCode Problems".to_string())
        );
    }

    #[test]
    fn case_insensitive_match_returns_canonical_spelling() {
        let (resolver, _, _guard) = resolver_with_store();
        assert_eq!(
            resolver.normalize("leetcode problems", &valid()),
            Some("LeetCode Problems".to_string())
        );
    }

    #[test]
    fn keyword_map_resolves_known_aliases() {
        let (resolver, _, _guard) = resolver_with_store();
        assert_eq!(
            resolver.normalize("React component design", &valid()),
            Some("Frontend Engineering > React".to_string())
        );
        assert_eq!(
            resolver.normalize("stock picking", &valid()),
            Some("Finance > Stock Analysis".to_string())
        );
    }

    #[test]
    fn empty_and_uncategorized_resolve_to_none() {
        let (resolver, _, _guard) = resolver_with_store();
        assert_eq!(resolver.normalize("", &valid()), None);
        assert_eq!(resolver.normalize("  ", &valid()), None);
        assert_eq!(resolver.normalize("UNCATEGORIZED", &valid()), None);
        assert_eq!(resolver.normalize("uncategorized", &valid()), None);
    }

    #[test]
    fn keyword_map_takes_precedence_over_learned_mappings() {
        let (resolver, store, _guard) = resolver_with_store();
        store
            .record(
                "stock portfolio diversification and rebalancing",
                "General",
                "Finance",
            )
            .unwrap();

        // "portfolio" hits the static keyword map before the learned store
        // is consulted.
        let resolved = resolver.normalize("portfolio rebalancing cadence", &valid());
        assert_eq!(resolved, Some("Finance > Investment".to_string()));
    }

    #[test]
    fn learned_mapping_applies_without_keyword_hit() {
        let (resolver, store, _guard) = resolver_with_store();
        store
            .record(
                "sourdough starter feeding schedule maintenance",
                "General",
                "Lifestyle",
            )
            .unwrap();

        let resolved = resolver.normalize("sourdough starter maintenance", &valid());
        assert_eq!(resolved, Some("Lifestyle".to_string()));
    }

    #[test]
    fn coarse_fallback_buckets_unmatched_input() {
        let (resolver, _, _guard) = resolver_with_store();
        assert_eq!(
            resolver.normalize("quantum knitting", &valid()),
            Some("General".to_string())
        );
        assert_eq!(
            resolver.normalize("advanced programming esoterica", &valid()),
            Some("General".to_string())
        );
    }

    #[test]
    fn normalization_is_idempotent_on_valid_categories() {
        let (resolver, _, _guard) = resolver_with_store();
        let categories = valid();
        for category in &categories {
            let once = resolver.normalize(category, &categories).unwrap();
            let twice = resolver.normalize(&once, &categories).unwrap();
            assert_eq!(once, twice);
            assert_eq!(&once, category);
        }
    }
}
