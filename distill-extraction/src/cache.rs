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

//! Content-hash memoization of full analyses. Deliberately has no
//! eviction policy and no TTL: identical transcripts are absorbed, nothing
//! more. Keys are raw-text hashes with no whitespace or case
//! normalization.

use distill_core::AnalysisResult;
use moka::future::Cache;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::atomic::{AtomicU64, Ordering};

/// SHA-256 hex digest of the raw conversation text.
pub fn content_hash(text: &str) -> String {
    hex::encode(Sha256::digest(text.as_bytes()))
}

/// Cache statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub hit_rate: f64,
    pub entry_count: u64,
}

/// Memoized analysis results keyed by content hash.
pub struct ResultCache {
    cache: Cache<String, AnalysisResult>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache {
    pub fn new() -> Self {
        Self {
            cache: Cache::builder().build(),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub async fn get(&self, hash: &str) -> Option<AnalysisResult> {
        match self.cache.get(hash).await {
            Some(result) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                Some(result)
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    pub async fn insert(&self, hash: String, result: AnalysisResult) {
        self.cache.insert(hash, result).await;
    }

    pub fn stats(&self) -> CacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        CacheStats {
            hits,
            misses,
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
            entry_count: self.cache.entry_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use distill_core::{AnalysisMetadata, ExtractionMethod};

    fn result() -> AnalysisResult {
        AnalysisResult {
            concepts: vec![],
            conversation_title: "t".to_string(),
            conversation_summary: "s".to_string(),
            metadata: AnalysisMetadata {
                extraction_method: ExtractionMethod::Segmented,
                cache_hit: false,
                model: "test".to_string(),
                concept_count: 0,
                segment_count: 1,
                fallback_segments: 0,
                duration_ms: 0,
                extraction_time: Utc::now(),
            },
        }
    }

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = ResultCache::new();
        let hash = content_hash("conversation");
        cache.insert(hash.clone(), result()).await;
        assert!(cache.get(&hash).await.is_some());
    }

    #[tokio::test]
    async fn stats_track_hits_and_misses() {
        let cache = ResultCache::new();
        let hash = content_hash("conversation");

        cache.get(&hash).await;
        cache.insert(hash.clone(), result()).await;
        cache.get(&hash).await;

        let stats = cache.stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hit_rate, 0.5);
    }

    #[test]
    fn content_hash_is_exact_over_raw_text() {
        assert_eq!(content_hash("abc"), content_hash("abc"));
        // No normalization: whitespace and case changes produce new keys.
        assert_ne!(content_hash("abc"), content_hash("abc "));
        assert_ne!(content_hash("abc"), content_hash("Abc"));
        assert_eq!(content_hash("abc").len(), 64);
    }
}
