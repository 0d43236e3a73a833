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

//! The orchestrator: one request, one pipeline run.
//!
//! Sequence: cache lookup → segmentation → per-segment extraction on a
//! bounded worker pool, rejoined in original segment order → dedup and
//! technique enrichment → category resolution → assembled result → cache
//! store. Every stage fails open; if the run itself dies, the caller gets a
//! synthesized emergency result. Availability over correctness, always.

use crate::cache::{content_hash, ResultCache};
use crate::categories::CategoryCatalog;
use crate::classifier::DomainClassifier;
use crate::dedup;
use crate::fallback;
use crate::llm::{CompletionClient, CompletionOptions};
use crate::normalize::{self, NormalizedResponse};
use crate::prompt;
use crate::resolver::CategoryResolver;
use crate::retry::{complete_with_retry, RetryPolicy};
use crate::segmenter::Segmenter;
use chrono::Utc;
use distill_core::{
    AnalysisMetadata, AnalysisResult, Concept, ConversationInput, ExtractionMethod, Segment,
};
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::Semaphore;
use tracing::{error, info, warn};

/// Pipeline tuning knobs.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Worker-pool bound for per-segment extraction.
    pub max_concurrent_segments: usize,
    /// Hard timeout around every completion call.
    pub call_timeout: Duration,
    pub retry: RetryPolicy,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_concurrent_segments: 3,
            call_timeout: Duration::from_secs(30),
            retry: RetryPolicy::default(),
        }
    }
}

#[derive(Debug, Error)]
enum PipelineError {
    #[error("segment task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

/// What one segment produced.
struct SegmentOutcome {
    position: usize,
    concepts: Vec<Concept>,
    summary: String,
    title: Option<String>,
    technique: Option<String>,
    recovered: bool,
}

/// The full extraction pipeline. All collaborators are explicit injected
/// services owned by the application root; per-request state stays on the
/// stack.
pub struct ConceptPipeline {
    classifier: DomainClassifier,
    segmenter: Segmenter,
    resolver: CategoryResolver,
    catalog: CategoryCatalog,
    cache: Arc<ResultCache>,
    config: PipelineConfig,
}

impl ConceptPipeline {
    pub fn new(
        resolver: CategoryResolver,
        catalog: CategoryCatalog,
        cache: Arc<ResultCache>,
        config: PipelineConfig,
    ) -> Self {
        Self {
            classifier: DomainClassifier::new(),
            segmenter: Segmenter::new(),
            resolver,
            catalog,
            cache,
            config,
        }
    }

    pub fn cache_stats(&self) -> crate::cache::CacheStats {
        self.cache.stats()
    }

    /// Analyze one conversation. Infallible by contract: every internal
    /// failure degrades, and a run that dies outright yields the emergency
    /// result.
    pub async fn analyze(
        &self,
        client: Arc<dyn CompletionClient>,
        input: &ConversationInput,
    ) -> AnalysisResult {
        let started = Instant::now();
        let hash = content_hash(&input.text);

        if let Some(mut cached) = self.cache.get(&hash).await {
            info!(hash = %&hash[..8], "serving analysis from cache");
            cached.metadata.cache_hit = true;
            return cached;
        }

        match self.run(client.clone(), input, started).await {
            Ok(result) => {
                self.cache.insert(hash, result.clone()).await;
                result
            }
            Err(e) => {
                error!(error = %e, "pipeline run failed, synthesizing emergency result");
                // Emergency results are not cached.
                self.emergency_result(client.model_name(), input, started)
            }
        }
    }

    async fn run(
        &self,
        client: Arc<dyn CompletionClient>,
        input: &ConversationInput,
        started: Instant,
    ) -> Result<AnalysisResult, PipelineError> {
        let (segments, segmentation_degraded) =
            self.segmenter.segment(client.as_ref(), &input.text).await;
        let segment_count = segments.len();

        // Bounded worker pool; join_all preserves spawn order, and the
        // explicit sort keeps the rejoin order-correct regardless.
        let semaphore = Arc::new(Semaphore::new(self.config.max_concurrent_segments.max(1)));
        let mut tasks = Vec::with_capacity(segment_count);
        for segment in segments {
            let client = client.clone();
            let semaphore = semaphore.clone();
            let classifier = self.classifier.clone();
            let config = self.config.clone();
            let context = input.context.clone();
            let guidance = input.category_guidance.clone();

            tasks.push(tokio::spawn(async move {
                let _permit = semaphore.acquire_owned().await;
                process_segment(client, classifier, segment, context, guidance, config).await
            }));
        }

        let mut outcomes = Vec::with_capacity(segment_count);
        for task in futures::future::join_all(tasks).await {
            outcomes.push(task?);
        }
        outcomes.sort_by_key(|outcome| outcome.position);

        let recovered_segments = outcomes.iter().filter(|o| o.recovered).count();
        let technique_hints: Vec<String> = outcomes
            .iter()
            .filter_map(|o| o.technique.clone())
            .collect();

        let mut all_concepts = Vec::new();
        let mut segment_summaries = Vec::new();
        let mut conversation_title = None;
        for outcome in &outcomes {
            all_concepts.extend(outcome.concepts.iter().cloned());
            if !outcome.summary.is_empty() {
                segment_summaries.push(outcome.summary.clone());
            }
            if conversation_title.is_none() {
                conversation_title = outcome.title.clone();
            }
        }

        let deduplicated = dedup::dedupe_by_title(all_concepts);
        let mut concepts = dedup::enrich_with_techniques(deduplicated, &technique_hints);

        let valid_categories = self.catalog.categories().await;
        for concept in &mut concepts {
            let resolved = self.resolver.normalize(&concept.category, &valid_categories);
            match resolved {
                Some(resolved) if resolved != concept.category => {
                    concept.set_category(&resolved);
                }
                Some(_) => {}
                None => concept.set_category("General"),
            }
        }

        let conversation_summary = join_summaries(&segment_summaries);
        let conversation_title =
            standardize_title(conversation_title, &concepts, &conversation_summary);

        let extraction_method = if recovered_segments == segment_count {
            ExtractionMethod::Fallback
        } else {
            ExtractionMethod::Segmented
        };

        let result = AnalysisResult {
            metadata: AnalysisMetadata {
                extraction_method,
                cache_hit: false,
                model: client.model_name().to_string(),
                concept_count: concepts.len(),
                segment_count,
                fallback_segments: recovered_segments,
                duration_ms: started.elapsed().as_millis() as u64,
                extraction_time: Utc::now(),
            },
            concepts,
            conversation_title,
            conversation_summary,
        };

        info!(
            concepts = result.metadata.concept_count,
            segments = result.metadata.segment_count,
            method = ?result.metadata.extraction_method,
            segmentation_degraded,
            duration_ms = result.metadata.duration_ms,
            "analysis complete"
        );
        Ok(result)
    }

    /// Last line of defense: a structurally valid single-concept result.
    fn emergency_result(
        &self,
        model: &str,
        input: &ConversationInput,
        started: Instant,
    ) -> AnalysisResult {
        let preview: String = input.text.chars().take(500).collect();
        let mut concept = Concept::new("Conversation Notes", "General");
        concept.summary =
            "Automatic analysis was unavailable for this conversation.".to_string();
        concept.details = preview;
        concept.key_points = vec![
            "Extraction pipeline failed".to_string(),
            "Manual review recommended".to_string(),
        ];
        concept.confidence_score = 0.1;

        AnalysisResult {
            concepts: vec![concept],
            conversation_title: "Conversation Notes".to_string(),
            conversation_summary: "Automatic analysis was unavailable.".to_string(),
            metadata: AnalysisMetadata {
                extraction_method: ExtractionMethod::Emergency,
                cache_hit: false,
                model: model.to_string(),
                concept_count: 1,
                segment_count: 0,
                fallback_segments: 0,
                duration_ms: started.elapsed().as_millis() as u64,
                extraction_time: Utc::now(),
            },
        }
    }
}

/// Run one segment through classification, extraction, and
/// normalization-or-fallback.
async fn process_segment(
    client: Arc<dyn CompletionClient>,
    classifier: DomainClassifier,
    segment: Segment,
    context: Option<serde_json::Value>,
    guidance: Option<distill_core::CategoryGuidance>,
    config: PipelineConfig,
) -> SegmentOutcome {
    let domain = classifier.classify(client.as_ref(), &segment.content).await;

    let mut prompt_text = prompt::extraction_prompt(segment.kind, domain, guidance.as_ref());
    prompt_text.push_str(&prompt::segment_block(
        &segment.topic,
        &segment.content,
        context.as_ref(),
    ));

    let options = CompletionOptions::default();
    let (normalized, recovered) = match complete_with_retry(
        client.as_ref(),
        &prompt_text,
        &options,
        &config.retry,
        config.call_timeout,
    )
    .await
    {
        Ok(raw) => match normalize::parse_response(&raw) {
            Ok(normalized) => (normalized, false),
            Err(e) => {
                warn!(topic = %segment.topic, error = %e, "response unparseable, falling back");
                (fallback::extract(&raw), true)
            }
        },
        Err(e) => {
            warn!(topic = %segment.topic, error = %e, "extraction call failed, falling back");
            (fallback::extract(&segment.content), true)
        }
    };

    let NormalizedResponse {
        concepts,
        conversation_title,
        conversation_summary,
    } = normalized;

    let summary = if conversation_summary.is_empty() {
        String::new()
    } else {
        format!("{}: {}", segment.topic, conversation_summary)
    };

    SegmentOutcome {
        position: segment.position,
        concepts,
        summary,
        title: conversation_title,
        technique: segment.technique,
        recovered,
    }
}

fn join_summaries(summaries: &[String]) -> String {
    match summaries {
        [] => String::new(),
        [single] => single
            .strip_prefix("Full Conversation: ")
            .unwrap_or(single)
            .to_string(),
        many => many.join(" | "),
    }
}

/// Guarantee a non-empty conversation title, preferring the model's own,
/// then one derived from concept titles, then the summary.
fn standardize_title(
    model_title: Option<String>,
    concepts: &[Concept],
    summary: &str,
) -> String {
    if let Some(title) = model_title {
        return title;
    }

    let titles: Vec<&str> = concepts
        .iter()
        .filter(|concept| !concept.is_technique_derived)
        .map(|concept| concept.title.as_str())
        .collect();
    match titles.as_slice() {
        [] => {}
        [only] => return format!("Discussion about {only}"),
        [first, second] => return format!("{first} and {second} Discussion"),
        [first, second, ..] => return format!("{first}, {second} & More"),
    }

    if !summary.is_empty() {
        let prefix: String = summary.chars().take(40).collect();
        if summary.chars().count() > 50 {
            return format!("Topic: {prefix}...");
        }
        return format!("Topic: {summary}");
    }

    "Conversation Notes".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::learning::LearningStore;
    use crate::llm::LlmError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::TempDir;

    /// Scripted client: each rule maps a prompt substring to a canned
    /// response; unmatched prompts error.
    struct MockClient {
        rules: Vec<(&'static str, Result<String, ()>)>,
        calls: AtomicUsize,
    }

    impl MockClient {
        fn new(rules: Vec<(&'static str, Result<String, ()>)>) -> Self {
            Self {
                rules,
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self::new(vec![])
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionClient for MockClient {
        async fn complete(
            &self,
            prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            for (needle, response) in &self.rules {
                if prompt.contains(needle) {
                    return match response {
                        Ok(text) => Ok(text.clone()),
                        Err(()) => Err(LlmError::Api("scripted failure".to_string())),
                    };
                }
            }
            Err(LlmError::Api("no scripted response".to_string()))
        }

        fn model_name(&self) -> &str {
            "mock-model"
        }
    }

    fn pipeline() -> (ConceptPipeline, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let learning = Arc::new(LearningStore::new(temp_dir.path().join("learning.json")));
        let pipeline = ConceptPipeline::new(
            CategoryResolver::new(learning),
            CategoryCatalog::static_only(),
            Arc::new(ResultCache::new()),
            PipelineConfig {
                retry: RetryPolicy {
                    max_attempts: 1,
                    ..RetryPolicy::default()
                },
                ..PipelineConfig::default()
            },
        );
        (pipeline, temp_dir)
    }

    const CONTAINS_DUPLICATE_TEXT: &str =
        "I solved the Contains Duplicate problem from LeetCode today. My python code uses \
         a hash table so the algorithm runs in O(n), checking each array element against \
         the seen set while debugging the function.";

    fn segmentation_reply() -> String {
        serde_json::json!({
            "conversation_type": "PROBLEM_SOLVING",
            "segments": [{
                "topic": "Contains Duplicate",
                "main_technique": "Hash Table",
                "content": CONTAINS_DUPLICATE_TEXT
            }]
        })
        .to_string()
    }

    fn extraction_reply() -> String {
        serde_json::json!({
            "concepts": [{
                "title": "Contains Duplicate",
                "category": "LeetCode Problems",
                "summary": "Detect whether an array contains any duplicate element.",
                "details": "Track seen elements in a hash table while iterating; the first repeated element short-circuits to true, giving O(n) time and O(n) space.",
                "keyPoints": [
                    "Use a hash table to track previously seen elements",
                    "Time complexity is O(n)"
                ],
                "relatedConcepts": [],
                "codeSnippets": [{
                    "language": "Python",
                    "description": "Hash table implementation",
                    "code": "def containsDuplicate(nums):\n    seen = set()\n    for n in nums:\n        if n in seen:\n            return True\n        seen.add(n)\n    return False"
                }],
                "confidence_score": 0.95
            }],
            "conversation_title": "Contains Duplicate practice",
            "conversation_summary": "Worked through Contains Duplicate with a hash table."
        })
        .to_string()
    }

    fn scripted_client() -> Arc<MockClient> {
        Arc::new(MockClient::new(vec![
            ("identify ONLY MAJOR topic changes", Ok(segmentation_reply())),
            ("Conversation Segment", Ok(extraction_reply())),
        ]))
    }

    #[tokio::test]
    async fn scenario_a_extracts_problem_with_snippets_and_technique() {
        let (pipeline, _guard) = pipeline();
        let client = scripted_client();
        let input = ConversationInput::from_text(CONTAINS_DUPLICATE_TEXT);

        let result = pipeline.analyze(client.clone(), &input).await;

        assert_eq!(result.metadata.extraction_method, ExtractionMethod::Segmented);
        let problem = result
            .concepts
            .iter()
            .find(|c| c.title == "Contains Duplicate")
            .expect("problem concept present");
        assert_eq!(problem.category, "LeetCode Problems");
        assert!(!problem.code_snippets.is_empty());

        // Technique enrichment synthesized a linked Hash Table concept.
        let technique = result
            .concepts
            .iter()
            .find(|c| c.title == "Hash Table")
            .expect("technique concept present");
        assert!(technique.is_technique_derived);
        assert!(technique
            .related_concepts
            .contains(&"Contains Duplicate".to_string()));
        assert!(problem
            .related_concepts
            .contains(&"Hash Table".to_string()));

        assert_eq!(result.conversation_title, "Contains Duplicate practice");
    }

    #[tokio::test]
    async fn scenario_b_second_call_is_a_cache_hit_with_no_model_calls() {
        let (pipeline, _guard) = pipeline();
        let client = scripted_client();
        let input = ConversationInput::from_text(CONTAINS_DUPLICATE_TEXT);

        let first = pipeline.analyze(client.clone(), &input).await;
        let calls_after_first = client.call_count();
        let second = pipeline.analyze(client.clone(), &input).await;

        assert_eq!(client.call_count(), calls_after_first);
        assert!(!first.metadata.cache_hit);
        assert!(second.metadata.cache_hit);
        assert_eq!(first.concepts, second.concepts);
        assert_eq!(first.conversation_summary, second.conversation_summary);
    }

    #[tokio::test]
    async fn scenario_c_total_client_failure_still_returns_a_result() {
        let (pipeline, _guard) = pipeline();
        let client = Arc::new(MockClient::failing());
        let input = ConversationInput::from_text(
            "The important thing about this investment strategy is consistency over timing. \
             Another key principle is that diversification reduces single-stock risk.",
        );

        let result = pipeline.analyze(client, &input).await;

        assert_eq!(result.metadata.extraction_method, ExtractionMethod::Fallback);
        assert!(result.metadata.fallback_segments >= 1);
        assert_eq!(result.metadata.segment_count, 1);
        // The fallback extractor salvaged the insight sentences.
        assert_eq!(result.concepts.len(), 1);
        assert_eq!(result.concepts[0].title, "Key Insights");
        assert_eq!(result.concepts[0].category, "Finance");
    }

    #[tokio::test]
    async fn unparseable_extraction_response_falls_back_per_segment() {
        let (pipeline, _guard) = pipeline();
        let client = Arc::new(MockClient::new(vec![
            ("identify ONLY MAJOR topic changes", Ok(segmentation_reply())),
            (
                "Conversation Segment",
                Ok("Title: Hash Table Notes\nSeen-set lookups are O(1).".to_string()),
            ),
        ]));
        let input = ConversationInput::from_text(CONTAINS_DUPLICATE_TEXT);

        let result = pipeline.analyze(client, &input).await;

        assert_eq!(result.metadata.extraction_method, ExtractionMethod::Fallback);
        assert_eq!(result.concepts.len(), 1);
        assert_eq!(result.concepts[0].title, "Hash Table Notes");
        assert_eq!(result.concepts[0].confidence_score, 0.5);
    }

    #[tokio::test]
    async fn segments_rejoin_in_original_order() {
        let segmentation = serde_json::json!({
            "conversation_type": "EXPLORATORY_LEARNING",
            "segments": [
                {"topic": "First Topic", "content": "python code about the FIRST_MARKER algorithm function array"},
                {"topic": "Second Topic", "content": "python code about the SECOND_MARKER algorithm function array"},
                {"topic": "Third Topic", "content": "python code about the THIRD_MARKER algorithm function array"}
            ]
        })
        .to_string();

        let reply = |title: &str| -> String {
            serde_json::json!({
                "concepts": [{
                    "title": title,
                    "category": "Python",
                    "summary": "s",
                    "details": "much longer details text for this concept"
                }],
                "conversation_summary": format!("about {title}")
            })
            .to_string()
        };

        let client = Arc::new(MockClient::new(vec![
            ("identify ONLY MAJOR topic changes", Ok(segmentation)),
            ("FIRST_MARKER", Ok(reply("Alpha"))),
            ("SECOND_MARKER", Ok(reply("Beta"))),
            ("THIRD_MARKER", Ok(reply("Gamma"))),
        ]));

        let (pipeline, _guard) = pipeline();
        let input = ConversationInput::from_text("three part conversation");
        let result = pipeline.analyze(client, &input).await;

        let titles: Vec<&str> = result.concepts.iter().map(|c| c.title.as_str()).collect();
        assert_eq!(titles, vec!["Alpha", "Beta", "Gamma"]);
        assert_eq!(result.metadata.segment_count, 3);
        assert!(result.conversation_summary.contains(" | "));
    }

    #[tokio::test]
    async fn categories_are_normalized_against_the_taxonomy() {
        let segmentation = serde_json::json!({
            "conversation_type": "EXPLORATORY_LEARNING",
            "segments": [
                {"topic": "React", "content": "python javascript react code function array algorithm"}
            ]
        })
        .to_string();
        let extraction = serde_json::json!({
            "concepts": [{
                "title": "useState Hook",
                "category": "react state management",
                "summary": "s",
                "details": "details that are longer than the summary"
            }],
            "conversation_summary": "react hooks"
        })
        .to_string();

        let client = Arc::new(MockClient::new(vec![
            ("identify ONLY MAJOR topic changes", Ok(segmentation)),
            ("Conversation Segment", Ok(extraction)),
        ]));

        let (pipeline, _guard) = pipeline();
        let input = ConversationInput::from_text("react chat");
        let result = pipeline.analyze(client, &input).await;

        let concept = &result.concepts[0];
        assert_eq!(concept.category, "Frontend Engineering > React");
        assert_eq!(
            concept.category_path,
            vec!["Frontend Engineering", "React"]
        );
    }

    #[tokio::test]
    async fn scenario_d_learned_corrections_steer_resolution() {
        let temp_dir = TempDir::new().unwrap();
        let learning = Arc::new(LearningStore::new(temp_dir.path().join("learning.json")));
        learning
            .record(
                "thoughts on sourdough hydration ratios baking",
                "General",
                "Lifestyle",
            )
            .unwrap();

        let pipeline = ConceptPipeline::new(
            CategoryResolver::new(learning),
            CategoryCatalog::static_only(),
            Arc::new(ResultCache::new()),
            PipelineConfig::default(),
        );

        let segmentation = serde_json::json!({
            "conversation_type": "EXPLORATORY_LEARNING",
            "segments": [
                {"topic": "Baking", "content": "python code array function algorithm about baking"}
            ]
        })
        .to_string();
        let extraction = serde_json::json!({
            "concepts": [{
                "title": "Hydration Ratios",
                "category": "sourdough hydration baking",
                "summary": "s",
                "details": "longer details about hydration ratios in sourdough"
            }],
            "conversation_summary": "sourdough baking"
        })
        .to_string();

        let client = Arc::new(MockClient::new(vec![
            ("identify ONLY MAJOR topic changes", Ok(segmentation)),
            ("Conversation Segment", Ok(extraction)),
        ]));

        let input = ConversationInput::from_text("baking chat");
        let result = pipeline.analyze(client, &input).await;
        assert_eq!(result.concepts[0].category, "Lifestyle");
    }

    #[tokio::test]
    async fn related_concept_lists_stay_unique() {
        let extraction = serde_json::json!({
            "concepts": [{
                "title": "Contains Duplicate",
                "category": "LeetCode Problems",
                "summary": "s",
                "details": "longer details",
                "keyPoints": ["hash table scan", "dictionary of counts"],
                "relatedConcepts": ["Hash Table", "hash table", "HASH table"]
            }],
            "conversation_summary": "dedup practice"
        })
        .to_string();

        let client = Arc::new(MockClient::new(vec![
            ("identify ONLY MAJOR topic changes", Ok(segmentation_reply())),
            ("Conversation Segment", Ok(extraction)),
        ]));

        let (pipeline, _guard) = pipeline();
        let input = ConversationInput::from_text(CONTAINS_DUPLICATE_TEXT);
        let result = pipeline.analyze(client, &input).await;

        for concept in &result.concepts {
            let mut seen = std::collections::HashSet::new();
            for related in &concept.related_concepts {
                assert!(
                    seen.insert(related.to_lowercase()),
                    "duplicate related entry {related} in {}",
                    concept.title
                );
            }
        }
    }

    #[test]
    fn title_standardization_prefers_model_then_concepts_then_summary() {
        let mut a = Concept::new("A", "General");
        let b = Concept::new("B", "General");
        let c = Concept::new("C", "General");

        assert_eq!(
            standardize_title(Some("Model Title".to_string()), &[a.clone()], "sum"),
            "Model Title"
        );
        assert_eq!(
            standardize_title(None, &[a.clone()], "sum"),
            "Discussion about A"
        );
        assert_eq!(
            standardize_title(None, &[a.clone(), b.clone()], "sum"),
            "A and B Discussion"
        );
        assert_eq!(
            standardize_title(None, &[a.clone(), b, c], "sum"),
            "A, B & More"
        );
        assert_eq!(
            standardize_title(None, &[], "short summary"),
            "Topic: short summary"
        );
        assert_eq!(standardize_title(None, &[], ""), "Conversation Notes");

        // Technique concepts never name the conversation.
        a.is_technique_derived = true;
        assert_eq!(standardize_title(None, &[a], ""), "Conversation Notes");
    }
}
