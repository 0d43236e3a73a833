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

//! The static category taxonomy: canonical category paths, the
//! keyword-to-category map used during normalization, and the keyword
//! vocabularies behind domain classification.

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Ordered canonical category paths, depth at most 3 (">"-joined).
pub const DEFAULT_CATEGORIES: &[&str] = &[
    // Core computer science
    "Data Structures and Algorithms",
    "Data Structures",
    "Data Structure",
    "Algorithms",
    "Algorithm Technique",
    "LeetCode Problems",
    // Backend development
    "Backend Engineering",
    "Backend Engineering > Authentication",
    "Backend Engineering > Storage",
    "Backend Engineering > APIs",
    "Backend Engineering > Databases",
    // Frontend development
    "Frontend Engineering",
    "Frontend Engineering > React",
    "Frontend Engineering > Next.js",
    "Frontend Engineering > CSS",
    // Cloud and operations
    "Cloud Engineering",
    "Cloud Engineering > AWS",
    "DevOps",
    // Programming languages
    "JavaScript",
    "TypeScript",
    "Python",
    // Broader technical
    "System Design",
    "Machine Learning",
    // Non-technical domains
    "General",
    "Finance",
    "Finance > Investment",
    "Finance > Personal Finance",
    "Finance > Business Finance",
    "Finance > Stock Analysis",
    "Psychology",
    "Psychology > Behavioral",
    "Psychology > Cognitive",
    "Business",
    "Business > Strategy",
    "Business > Management",
    "Business > Marketing",
    "Health",
    "Health > Nutrition",
    "Health > Fitness",
    "Education",
    "Education > Learning Methods",
    "Science",
    "Science > Physics",
    "Science > Biology",
    "Philosophy",
    "History",
    "Politics",
    "Economics",
    "Arts",
    "Literature",
    "Travel",
    "Lifestyle",
    "Miscellaneous",
];

/// Substring-keyword to category map, checked in order: the first keyword
/// contained in the suggested category wins. Order therefore matters for
/// overlapping keywords ("data structure" before "structure"-free matches).
pub const CATEGORY_KEYWORD_MAP: &[(&str, &str)] = &[
    // Core computer science
    ("dsa", "Data Structures and Algorithms"),
    ("data structure", "Data Structures"),
    ("algorithm", "Algorithms"),
    ("technique", "Algorithm Technique"),
    ("leetcode", "LeetCode Problems"),
    ("coding challenge", "LeetCode Problems"),
    ("problem solving", "LeetCode Problems"),
    // Programming languages
    ("python", "Python"),
    ("javascript", "JavaScript"),
    ("js", "JavaScript"),
    ("es6", "JavaScript"),
    ("typescript", "TypeScript"),
    // Backend development
    ("backend", "Backend Engineering"),
    ("api", "Backend Engineering > APIs"),
    ("rest", "Backend Engineering > APIs"),
    ("graphql", "Backend Engineering > APIs"),
    ("database", "Backend Engineering > Databases"),
    ("sql", "Backend Engineering > Databases"),
    ("nosql", "Backend Engineering > Databases"),
    ("auth", "Backend Engineering > Authentication"),
    ("storage", "Backend Engineering > Storage"),
    ("s3", "Backend Engineering > Storage"),
    // Frontend development
    ("frontend", "Frontend Engineering"),
    ("react", "Frontend Engineering > React"),
    ("next", "Frontend Engineering > Next.js"),
    ("css", "Frontend Engineering > CSS"),
    ("html", "Frontend Engineering"),
    // Cloud and operations
    ("cloud", "Cloud Engineering"),
    ("aws", "Cloud Engineering > AWS"),
    ("docker", "DevOps"),
    ("kubernetes", "DevOps"),
    ("devops", "DevOps"),
    // Broader technical
    ("system", "System Design"),
    ("machine learning", "Machine Learning"),
    ("artificial intelligence", "Machine Learning"),
    ("ml", "Machine Learning"),
    ("ai", "Machine Learning"),
    // Finance
    ("money", "Finance"),
    ("investment", "Finance > Investment"),
    ("investing", "Finance > Investment"),
    ("portfolio", "Finance > Investment"),
    ("stock", "Finance > Stock Analysis"),
    ("trading", "Finance > Stock Analysis"),
    ("budget", "Finance > Personal Finance"),
    ("savings", "Finance > Personal Finance"),
    ("retirement", "Finance > Personal Finance"),
    ("corporate finance", "Finance > Business Finance"),
    // Psychology
    ("psychology", "Psychology"),
    ("behavior", "Psychology > Behavioral"),
    ("cognitive", "Psychology > Cognitive"),
    ("mental health", "Psychology"),
    ("therapy", "Psychology"),
    ("mindset", "Psychology"),
    // Business
    ("business", "Business"),
    ("strategy", "Business > Strategy"),
    ("entrepreneurship", "Business > Strategy"),
    ("startup", "Business > Strategy"),
    ("management", "Business > Management"),
    ("leadership", "Business > Management"),
    ("marketing", "Business > Marketing"),
    // Health
    ("health", "Health"),
    ("nutrition", "Health > Nutrition"),
    ("diet", "Health > Nutrition"),
    ("fitness", "Health > Fitness"),
    ("exercise", "Health > Fitness"),
    ("workout", "Health > Fitness"),
    ("wellness", "Health"),
    // Education
    ("learning", "Education > Learning Methods"),
    ("study", "Education > Learning Methods"),
    ("education", "Education"),
    ("teaching", "Education"),
    ("academic", "Education"),
    // Sciences and humanities
    ("physics", "Science > Physics"),
    ("biology", "Science > Biology"),
    ("chemistry", "Science"),
    ("science", "Science"),
    ("research", "Science"),
    ("philosophy", "Philosophy"),
    ("history", "History"),
    ("politics", "Politics"),
    ("government", "Politics"),
    ("economics", "Economics"),
    ("economy", "Economics"),
    ("literature", "Literature"),
    ("art", "Arts"),
    ("music", "Arts"),
    // Lifestyle
    ("travel", "Travel"),
    ("lifestyle", "Lifestyle"),
    ("personal development", "Lifestyle"),
    ("self improvement", "Lifestyle"),
    ("productivity", "Lifestyle"),
];

/// Vocabulary indicating technical conversation content.
pub const TECHNICAL_KEYWORDS: &[&str] = &[
    "code",
    "programming",
    "algorithm",
    "function",
    "variable",
    "api",
    "database",
    "framework",
    "library",
    "javascript",
    "python",
    "react",
    "sql",
    "html",
    "css",
    "leetcode",
    "dsa",
    "data structure",
    "backend",
    "frontend",
    "server",
    "client",
    "debugging",
    "software",
    "development",
    "git",
    "deployment",
    "testing",
    "method",
    "class",
    "object",
    "array",
    "string",
    "integer",
    "boolean",
    "json",
    "xml",
    "aws",
    "cloud",
    "docker",
    "kubernetes",
    "microservice",
    "optimization",
];

/// Vocabulary indicating non-technical conversation content.
pub const NON_TECHNICAL_KEYWORDS: &[&str] = &[
    "investment",
    "finance",
    "stock",
    "money",
    "budget",
    "savings",
    "portfolio",
    "psychology",
    "behavior",
    "mental health",
    "therapy",
    "mindset",
    "emotions",
    "business",
    "strategy",
    "management",
    "marketing",
    "leadership",
    "sales",
    "health",
    "nutrition",
    "fitness",
    "diet",
    "exercise",
    "wellness",
    "medical",
    "education",
    "learning",
    "teaching",
    "study",
    "academic",
    "school",
    "philosophy",
    "ethics",
    "history",
    "politics",
    "economics",
    "culture",
    "travel",
    "lifestyle",
    "personal development",
    "relationships",
    "family",
];

/// Sentence markers suggesting an insight worth salvaging during fallback
/// extraction.
pub const INSIGHT_KEYWORDS: &[&str] = &[
    "important",
    "key",
    "note",
    "remember",
    "crucial",
    "essential",
    "strategy",
    "approach",
    "method",
    "technique",
    "insight",
    "learn",
    "understand",
    "concept",
    "principle",
];

fn word_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w{4,}\b").expect("static word regex"))
}

/// Significant words of a text: lowercased tokens of four or more
/// word characters. Used for learned-mapping overlap checks.
pub fn significant_words(text: &str) -> HashSet<String> {
    word_regex()
        .find_iter(&text.to_lowercase())
        .map(|word| word.as_str().to_string())
        .collect()
}

/// Count how many vocabulary entries appear in the (lowercased) text.
/// Each keyword counts at most once regardless of repetition.
pub fn keyword_hits(text_lower: &str, vocabulary: &[&str]) -> usize {
    vocabulary
        .iter()
        .filter(|keyword| text_lower.contains(*keyword))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_categories_have_bounded_depth() {
        for category in DEFAULT_CATEGORIES {
            assert!(category.split('>').count() <= 3, "too deep: {category}");
        }
    }

    #[test]
    fn keyword_map_targets_are_canonical() {
        for (keyword, target) in CATEGORY_KEYWORD_MAP {
            assert!(
                DEFAULT_CATEGORIES.contains(target),
                "keyword '{keyword}' maps to unknown category '{target}'"
            );
        }
    }

    #[test]
    fn significant_words_ignores_short_tokens() {
        let words = significant_words("Use a set to see if it has duplicates");
        assert!(words.contains("duplicates"));
        assert!(!words.contains("set"));
        assert!(!words.contains("a"));
    }

    #[test]
    fn keyword_hits_counts_each_entry_once() {
        let text = "python python python and react";
        assert_eq!(keyword_hits(text, &["python", "react", "sql"]), 2);
    }
}
