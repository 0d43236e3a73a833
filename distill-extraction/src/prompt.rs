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

//! Prompt construction for every model call the pipeline makes.
//!
//! All functions here are pure and deterministic given their inputs: the
//! same (segment kind, domain type, guidance) triple always yields the same
//! instruction text. I/O-free by design so prompt selection is testable
//! without a client.

use distill_core::{CategoryGuidance, DomainType, SegmentKind};
use std::fmt::Write;

/// Cap on category paths rendered into guidance instructions, to keep
/// prompts bounded for callers with large taxonomies.
const MAX_GUIDANCE_PATHS: usize = 25;
const MAX_GUIDANCE_KEYWORD_CATEGORIES: usize = 10;
const MAX_GUIDANCE_KEYWORDS_PER_CATEGORY: usize = 8;

/// Build the instruction preamble for a per-segment extraction call.
///
/// The output contract is always the same: a strict JSON object with a
/// `concepts` array in the candidate schema, `confidence_score` in [0, 1],
/// and `details` materially longer than `summary`. The instruction family
/// varies with the segment kind and domain.
pub fn extraction_prompt(
    kind: SegmentKind,
    domain: DomainType,
    guidance: Option<&CategoryGuidance>,
) -> String {
    let base = match (domain, kind) {
        (DomainType::NonTechnical, _) => NON_TECHNICAL_INSTRUCTIONS,
        (_, SegmentKind::ProblemSolving) => PROBLEM_SOLVING_INSTRUCTIONS,
        (_, SegmentKind::ExploratoryLearning) => EXPLORATORY_INSTRUCTIONS,
    };

    let format = match (domain, kind) {
        (DomainType::NonTechnical, _) => NON_TECHNICAL_FORMAT,
        (_, SegmentKind::ProblemSolving) => PROBLEM_SOLVING_FORMAT,
        (_, SegmentKind::ExploratoryLearning) => EXPLORATORY_FORMAT,
    };

    let mut prompt = String::with_capacity(base.len() + format.len() + 512);
    prompt.push_str(base);
    if domain == DomainType::Mixed {
        prompt.push_str(MIXED_DOMAIN_NOTE);
    }
    prompt.push_str(&guidance_instructions(guidance));
    prompt.push_str(format);
    prompt
}

/// Render the segment payload appended after the instructions.
pub fn segment_block(topic: &str, content: &str, context: Option<&serde_json::Value>) -> String {
    let context_text = context
        .map(|value| value.to_string())
        .unwrap_or_else(|| "No additional context provided".to_string());
    format!(
        "\nSEGMENT INFORMATION:\nTopic: {topic}\n\n\
         CONTEXT INFORMATION:\n{context_text}\n\n\
         Conversation Segment:\n\"\"\"\n{content}\n\"\"\"\n"
    )
}

/// Build the single segmentation call's prompt.
pub fn segmentation_prompt(conversation: &str) -> String {
    format!(
        r#"Your task is to analyze the following conversation and identify ONLY MAJOR topic changes.
First, determine if this is:
1. A PROBLEM_SOLVING conversation (discussing a specific algorithm or coding problem)
2. An EXPLORATORY_LEARNING conversation (learning about a technology or concept)

Indicators of PROBLEM_SOLVING conversations:
- Mentions of specific LeetCode problems (Contains Duplicate, Valid Anagram, Two Sum, ...)
- References to 'NeetCode', 'Blind 75', 'LeetCode', or 'DSA practice'
- Discussion of algorithm implementation steps or coding approaches
- Data structures chosen in a problem-solving context (hash table for duplicates, ...)
- Coding interview preparation context

For PROBLEM_SOLVING conversations:
- Use ONE segment for each distinct problem discussed
- Do NOT create separate segments for different approaches to the same problem
- Use the EXACT standard problem name as the topic (e.g. 'Contains Duplicate', never 'Hash Table for Duplicate Detection')
- Name the dominant technique in main_technique

For EXPLORATORY_LEARNING conversations:
- Segment by major topic changes only; sub-topics of one area stay in the same segment

General rules:
1. Identify MAJOR distinct topics, not implementation details
2. Aim for 1-3 segments MAXIMUM for most conversations

Respond in valid JSON with this structure:
{{
    "conversation_type": "PROBLEM_SOLVING" or "EXPLORATORY_LEARNING",
    "segments": [
        {{
            "topic": "Main Topic Title",
            "main_technique": "Hash Table",
            "content": "This portion of the conversation"
        }}
    ]
}}

Here's the conversation to segment:
"""
{conversation}
"""
"#
    )
}

/// Characters of conversation fed to the domain-detection call.
const DOMAIN_SAMPLE_CHARS: usize = 2000;

/// Build the constrained domain-detection prompt. Only a prefix of the
/// conversation is sent; the call expects a one-word answer.
pub fn domain_prompt(conversation: &str) -> String {
    let sample: String = conversation.chars().take(DOMAIN_SAMPLE_CHARS).collect();
    format!(
        "Analyze the following conversation and determine if it is primarily about:\n\
         1. TECHNICAL topics (programming, software development, computer science, algorithms)\n\
         2. NON_TECHNICAL topics (finance, psychology, business, health, general knowledge)\n\
         3. MIXED (significant discussion of both)\n\n\
         Respond with only one word: TECHNICAL, NON_TECHNICAL, or MIXED\n\n\
         Conversation:\n\"\"\"\n{sample}\n\"\"\""
    )
}

fn guidance_instructions(guidance: Option<&CategoryGuidance>) -> String {
    let Some(guidance) = guidance else {
        return String::new();
    };
    if !guidance.use_hierarchical_categories {
        return String::new();
    }

    let mut text = String::from(
        "\nIMPORTANT - HIERARCHICAL CATEGORIZATION:\n\
         Use hierarchical category paths for each concept, formatted as arrays, \
         e.g. [\"Frontend Engineering\", \"React\"], and include the \"categoryPath\" \
         field in your response for each concept.\n\
         - ONLY use categories from the hierarchy below\n\
         - PREFER the most specific appropriate category\n\
         - If unsure, use the parent category rather than guessing\n",
    );

    if !guidance.existing_categories.is_empty() {
        text.push_str("\nEXISTING CATEGORY HIERARCHY (use these exact paths):\n");
        for path in guidance.existing_categories.iter().take(MAX_GUIDANCE_PATHS) {
            let _ = writeln!(text, "- {}", path.join(" > "));
        }
    }

    if !guidance.category_keywords.is_empty() {
        // Sorted so equal guidance always renders equal text.
        let mut categories: Vec<_> = guidance.category_keywords.iter().collect();
        categories.sort_by(|a, b| a.0.cmp(b.0));
        text.push_str("\nCATEGORY KEYWORDS (learned from previous concepts):\n");
        for (category, keywords) in categories
            .into_iter()
            .take(MAX_GUIDANCE_KEYWORD_CATEGORIES)
        {
            if keywords.is_empty() {
                continue;
            }
            let keyword_list = keywords
                .iter()
                .take(MAX_GUIDANCE_KEYWORDS_PER_CATEGORY)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ");
            let _ = writeln!(text, "- {category}: {keyword_list}");
        }
    }

    if let Some(instructions) = &guidance.instructions {
        let _ = writeln!(text, "\n{instructions}");
    }

    text.push('\n');
    text
}

const PROBLEM_SOLVING_INSTRUCTIONS: &str = r#"You are an ELITE technical knowledge extraction system. Your job is to analyze programming conversations and extract SPECIFIC, VALUABLE concepts.

CRITICAL TITLE RULES:
1. The title of the main concept MUST be the standard name of the problem (e.g. 'Valid Anagram', 'Contains Duplicate', 'Two Sum').
2. The technique is NOT the title. Do NOT use 'Hash Table for Duplicates' or similar as the problem title; techniques belong in separate concepts or in the details.

CONCEPT IDENTIFICATION:
1. Primary concept: the problem itself, categorized as "LeetCode Problems".
2. Secondary concepts: each significant technique or data structure discussed (Hash Table, Two Pointer, Sliding Window, Binary Search, Dynamic Programming, Frequency Counting, ...), with how it applies to this problem.
3. When the conversation shows learning difficulties, a 'Learning Insights' concept capturing the gaps addressed and breakthroughs reached.

AVOID generic concepts: 'Iteration', 'Loop', 'Variables', 'Programming', 'Array', 'String' (unless they are the specific focus).

QUALITY STANDARDS:
- Each concept must be IMMEDIATELY USEFUL for future review
- Include the WHY behind each technique, not just the HOW
- Limit to 1-3 HIGH-VALUE concepts maximum
- NO overlapping or duplicate concepts
"#;

const EXPLORATORY_INSTRUCTIONS: &str = r#"You are an ELITE technical knowledge extraction system. Your job is to analyze exploratory learning conversations and extract SPECIFIC, VALUABLE concepts.

CONCEPT IDENTIFICATION RULES:
1. CORE CONCEPTS: fundamental principles and high-level ideas being discussed
2. TECHNOLOGIES & TOOLS: specific libraries, frameworks, or services mentioned
3. KEY INSIGHTS: significant realizations in the conversation
4. METHODOLOGIES & PATTERNS: processes, workflows, or design patterns
5. COMPARISONS: meaningful comparisons between technologies or approaches

AVOID generic concepts: 'Learning', 'Discussion', 'Question', and surface-level mentions without deep explanation.

QUALITY STANDARDS:
- Each concept must be a meaningful unit of knowledge
- Focus on concepts that build a mental model of a topic
- Limit to 2-5 HIGH-VALUE concepts maximum
- NO overlapping or duplicate concepts
"#;

const NON_TECHNICAL_INSTRUCTIONS: &str = r#"You are an ELITE knowledge extraction system specialized in NON-TECHNICAL content analysis. Analyze conversations about finance, psychology, business, health, education and other non-technical domains and extract VALUABLE, ACTIONABLE concepts.

CONCEPT IDENTIFICATION:
1. DOMAIN-SPECIFIC INSIGHTS: key insights, principles, or strategies discussed
2. PRACTICAL KNOWLEDGE: actionable information and real-world applications
3. CONCEPTUAL UNDERSTANDING: deeper understanding of topics, not just facts
4. METHODOLOGIES: systematic approaches or frameworks discussed

AVOID for non-technical content:
- Code snippets or programming examples (unless the topic is learning to code)
- Technical implementation details
- Generic concepts like 'Discussion' or 'Conversation'
- Forcing technical categories onto non-technical content

QUALITY STANDARDS:
- Each concept must provide genuine insight or practical value
- Include the WHY and HOW behind strategies and insights
- Limit to 1-4 HIGH-VALUE concepts maximum
- NO overlapping or duplicate concepts
"#;

const MIXED_DOMAIN_NOTE: &str = "\nThis conversation mixes technical and non-technical topics. \
Extract technical concepts with full rigor, and give non-technical concepts appropriate \
non-technical categories; never force technical categories onto non-technical content.\n";

const PROBLEM_SOLVING_FORMAT: &str = r#"
CONTENT REQUIREMENTS:
1. summary: a unique, concise 1-2 sentence overview specific to this concept only.
2. details: a comprehensive 3-6 paragraph technical deep-dive that goes far beyond the summary: implementation approach, why it works, complexity reasoning, pitfalls, edge cases. CRITICAL: details must be substantially longer than summary.
3. codeSnippets: 2-3 practical examples with language tag, short description, and well-commented code.
4. confidence_score: a float from 0.0 to 1.0.

Respond in this JSON format:
{
    "concepts": [
        {
            "title": "Main Problem or Technique",
            "summary": "A unique, concise summary specific to this concept only.",
            "details": "A comprehensive technical deep-dive...",
            "keyPoints": ["Key point 1", "Key point 2"],
            "relatedConcepts": ["Related Concept 1"],
            "codeSnippets": [
                {
                    "language": "Python",
                    "description": "What this code demonstrates",
                    "code": "commented code example"
                }
            ],
            "category": "LeetCode Problems",
            "categoryPath": ["LeetCode Problems"],
            "confidence_score": 0.9
        }
    ],
    "conversation_title": "A short, descriptive title for this conversation",
    "conversation_summary": "A 1-2 sentence summary of the main topics."
}
"#;

const EXPLORATORY_FORMAT: &str = r#"
CONTENT REQUIREMENTS:
1. summary: a unique, concise 2-4 sentence overview specific to this concept only.
2. details: a comprehensive 4-8 paragraph explanation of the what, why and how, with context, applications and nuances. CRITICAL: details must be substantially longer than summary and must not repeat it.
3. codeSnippets: relevant examples with language tag, description, and code.
4. confidence_score: a float from 0.0 to 1.0.

Respond in this JSON format:
{
    "concepts": [
        {
            "title": "A clear, specific title (~5-10 words)",
            "summary": "A unique, concise summary specific to this concept only.",
            "details": "A comprehensive, in-depth explanation...",
            "keyPoints": ["Distinct takeaway 1", "Distinct takeaway 2"],
            "relatedConcepts": ["Related Concept 1"],
            "codeSnippets": [
                {
                    "language": "python",
                    "description": "What the code shows",
                    "code": "concise snippet"
                }
            ],
            "category": "The most specific category (e.g. 'Python', 'Backend Engineering > APIs')",
            "categoryPath": ["Backend Engineering", "APIs"],
            "confidence_score": 0.85
        }
    ],
    "conversation_title": "A short, descriptive title for this conversation (~5-10 words)",
    "conversation_summary": "A 1-2 sentence summary of the main topics."
}
"#;

const NON_TECHNICAL_FORMAT: &str = r#"
CONTENT REQUIREMENTS:
1. summary: a concise 1-3 sentence overview of the concept or insight.
2. insights: a comprehensive 3-6 paragraph explanation focused on understanding, applications and practical value; substantially longer than summary. Cover benefits, drawbacks, misconceptions and how the concept relates to broader principles.
3. keyPoints: practical takeaways or action items instead of code.
4. confidence_score: a float from 0.0 to 1.0.

Respond in this JSON format:
{
    "concepts": [
        {
            "title": "Main Concept or Insight",
            "summary": "A unique, concise summary specific to this concept only.",
            "insights": "A comprehensive explanation focusing on understanding and practical value...",
            "keyPoints": ["Key takeaway 1", "Key takeaway 2"],
            "relatedConcepts": ["Related Concept 1"],
            "category": "Finance",
            "categoryPath": ["Finance", "Investment"]
        }
    ],
    "conversation_title": "A short, descriptive title for this conversation",
    "conversation_summary": "A 1-2 sentence summary of the main topics and insights."
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn prompt_is_deterministic() {
        let mut keywords = HashMap::new();
        keywords.insert(
            "Frontend Engineering".to_string(),
            vec!["react".to_string(), "hooks".to_string()],
        );
        keywords.insert("Finance".to_string(), vec!["stocks".to_string()]);
        let guidance = CategoryGuidance {
            use_hierarchical_categories: true,
            existing_categories: vec![
                vec!["Frontend Engineering".to_string(), "React".to_string()],
                vec!["Finance".to_string()],
            ],
            category_keywords: keywords,
            instructions: Some("Prefer existing categories.".to_string()),
        };

        let first = extraction_prompt(
            SegmentKind::ProblemSolving,
            DomainType::Technical,
            Some(&guidance),
        );
        let second = extraction_prompt(
            SegmentKind::ProblemSolving,
            DomainType::Technical,
            Some(&guidance),
        );
        assert_eq!(first, second);
    }

    #[test]
    fn non_technical_domain_overrides_segment_kind() {
        let prompt = extraction_prompt(
            SegmentKind::ProblemSolving,
            DomainType::NonTechnical,
            None,
        );
        assert!(prompt.contains("NON-TECHNICAL"));
        assert!(prompt.contains("\"insights\""));
        assert!(!prompt.contains("CRITICAL TITLE RULES"));
    }

    #[test]
    fn problem_solving_prompt_demands_exact_problem_titles() {
        let prompt = extraction_prompt(SegmentKind::ProblemSolving, DomainType::Technical, None);
        assert!(prompt.contains("Contains Duplicate"));
        assert!(prompt.contains("LeetCode Problems"));
        assert!(prompt.contains("confidence_score"));
    }

    #[test]
    fn mixed_domain_uses_technical_family_with_note() {
        let prompt = extraction_prompt(
            SegmentKind::ExploratoryLearning,
            DomainType::Mixed,
            None,
        );
        assert!(prompt.contains("exploratory learning conversations"));
        assert!(prompt.contains("mixes technical and non-technical"));
    }

    #[test]
    fn guidance_paths_are_capped() {
        let guidance = CategoryGuidance {
            use_hierarchical_categories: true,
            existing_categories: (0..100)
                .map(|i| vec![format!("Category {i}")])
                .collect(),
            ..CategoryGuidance::default()
        };
        let prompt = extraction_prompt(
            SegmentKind::ExploratoryLearning,
            DomainType::Technical,
            Some(&guidance),
        );
        assert!(prompt.contains("Category 24"));
        assert!(!prompt.contains("Category 25"));
    }

    #[test]
    fn domain_prompt_truncates_long_conversations() {
        let long_text = "word ".repeat(2000);
        let prompt = domain_prompt(&long_text);
        assert!(prompt.len() < long_text.len());
        assert!(prompt.contains("Respond with only one word"));
    }

    #[test]
    fn segment_block_includes_topic_and_content() {
        let block = segment_block("Contains Duplicate", "we used a hash table", None);
        assert!(block.contains("Topic: Contains Duplicate"));
        assert!(block.contains("we used a hash table"));
        assert!(block.contains("No additional context provided"));
    }
}
