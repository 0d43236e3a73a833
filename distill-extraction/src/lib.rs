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

//! The distill extraction pipeline.
//!
//! Data flow per request: cache lookup → [`Segmenter`] (consulting the
//! [`DomainClassifier`] per segment) → per-segment prompt + completion →
//! [`normalize`] (or [`fallback`] recovery on parse failure) → concept
//! accumulation → [`dedup`] and technique enrichment → category resolution
//! against the taxonomy and the persisted [`LearningStore`] → assembled
//! result → cache store. Nothing in here is fatal to the caller: every
//! failure path degrades to a structurally valid result.

pub mod cache;
pub mod categories;
pub mod classifier;
pub mod dedup;
pub mod fallback;
pub mod learning;
pub mod llm;
pub mod normalize;
pub mod pipeline;
pub mod prompt;
pub mod resolver;
pub mod retry;
pub mod segmenter;

pub use cache::{content_hash, CacheStats, ResultCache};
pub use categories::CategoryCatalog;
pub use classifier::DomainClassifier;
pub use learning::{LearnedMapping, LearningStats, LearningStore};
pub use llm::{AnthropicClient, CompletionClient, CompletionOptions, LlmError, OpenAiClient};
pub use pipeline::{ConceptPipeline, PipelineConfig};
pub use resolver::CategoryResolver;
pub use retry::RetryPolicy;
pub use segmenter::Segmenter;
