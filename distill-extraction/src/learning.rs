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

//! The persisted category-learning store: manual corrections recorded by
//! users, consulted on every future category resolution. This is the
//! system's only durable learning mechanism.
//!
//! The whole map is loaded at startup and rewritten in full on every
//! update (atomic temp-file + rename with a .bak backup). Writes are rare;
//! a std RwLock is enough.

use chrono::Utc;
use distill_core::taxonomy::significant_words;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::sync::RwLock;
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Word-overlap threshold for a learned suggestion to apply.
const MIN_WORD_OVERLAP: usize = 2;

/// Content previews shorter than this carry too little signal to match.
const MIN_PREVIEW_LEN: usize = 20;

/// Characters of the original snippet kept for overlap matching.
const PREVIEW_LEN: usize = 100;

/// One recorded manual correction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearnedMapping {
    pub content_preview: String,
    pub old_category: String,
    pub new_category: String,
    pub updated_at: String,
    pub confidence: f64,
}

/// Aggregate statistics over the learned mappings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningStats {
    pub total_mappings: usize,
    pub categories: HashMap<String, usize>,
    pub last_update: Option<String>,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("lock poisoned")]
    Poisoned,
}

/// Thread-safe, file-backed store of learned category corrections.
pub struct LearningStore {
    mappings: RwLock<HashMap<String, LearnedMapping>>,
    storage_path: PathBuf,
}

impl LearningStore {
    /// Open the store, loading any existing file. A missing file starts
    /// empty; a corrupt file logs a warning and starts empty.
    pub fn new(storage_path: impl AsRef<Path>) -> Self {
        let store = Self {
            mappings: RwLock::new(HashMap::new()),
            storage_path: storage_path.as_ref().to_path_buf(),
        };

        if let Err(e) = store.load_from_disk() {
            warn!(
                "Failed to load learned mappings: {}. Starting with empty store.",
                e
            );
        }

        store
    }

    /// 16-hex content key: truncated SHA-256 of the lowercased snippet.
    pub fn content_key(snippet: &str) -> String {
        let digest = Sha256::digest(snippet.to_lowercase().as_bytes());
        hex::encode(digest)[..16].to_string()
    }

    /// Record a manual category correction and persist the full store.
    pub fn record(
        &self,
        content_snippet: &str,
        old_category: &str,
        new_category: &str,
    ) -> Result<(), StoreError> {
        let key = Self::content_key(content_snippet);
        let entry = LearnedMapping {
            content_preview: content_snippet.chars().take(PREVIEW_LEN).collect(),
            old_category: old_category.to_string(),
            new_category: new_category.to_string(),
            updated_at: Utc::now().to_rfc3339(),
            confidence: 1.0,
        };

        {
            let mut mappings = self.mappings.write().map_err(|_| StoreError::Poisoned)?;
            mappings.insert(key, entry);
        }

        // Persist outside the lock; in-memory state survives a failed write.
        if let Err(e) = self.save_to_disk() {
            error!("Failed to persist learned mappings: {}", e);
            return Err(e);
        }

        info!(
            "Recorded manual category update: '{}' -> '{}'",
            old_category, new_category
        );
        Ok(())
    }

    /// Suggest a category for new content: the first stored correction
    /// whose preview shares at least [`MIN_WORD_OVERLAP`] significant words
    /// with the content wins.
    pub fn suggest(&self, content: &str) -> Option<String> {
        let current_words = significant_words(content);
        let mappings = self.mappings.read().ok()?;

        for mapping in mappings.values() {
            if mapping.content_preview.len() < MIN_PREVIEW_LEN {
                continue;
            }
            let learned_words = significant_words(&mapping.content_preview);
            let overlap = learned_words.intersection(&current_words).count();
            if overlap >= MIN_WORD_OVERLAP {
                debug!(
                    suggestion = %mapping.new_category,
                    overlap,
                    "found learned category suggestion"
                );
                return Some(mapping.new_category.clone());
            }
        }
        None
    }

    pub fn stats(&self) -> LearningStats {
        let mappings = match self.mappings.read() {
            Ok(mappings) => mappings,
            Err(_) => {
                return LearningStats {
                    total_mappings: 0,
                    categories: HashMap::new(),
                    last_update: None,
                }
            }
        };

        let mut categories: HashMap<String, usize> = HashMap::new();
        for mapping in mappings.values() {
            *categories.entry(mapping.new_category.clone()).or_insert(0) += 1;
        }

        LearningStats {
            total_mappings: mappings.len(),
            categories,
            last_update: mappings
                .values()
                .map(|mapping| mapping.updated_at.clone())
                .max(),
        }
    }

    pub fn count(&self) -> usize {
        self.mappings.read().map(|m| m.len()).unwrap_or(0)
    }

    fn load_from_disk(&self) -> Result<(), StoreError> {
        if !self.storage_path.exists() {
            info!("Learning store file not found, starting empty");
            return Ok(());
        }

        let file = File::open(&self.storage_path)?;
        let reader = BufReader::new(file);
        let loaded: HashMap<String, LearnedMapping> = serde_json::from_reader(reader)?;

        let mut mappings = self.mappings.write().map_err(|_| StoreError::Poisoned)?;
        let count = loaded.len();
        *mappings = loaded;
        info!("Loaded {} learned category mappings", count);
        Ok(())
    }

    fn save_to_disk(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.storage_path.parent() {
            fs::create_dir_all(parent)?;
        }

        if self.storage_path.exists() {
            let backup_path = self.storage_path.with_extension("json.bak");
            if let Err(e) = fs::copy(&self.storage_path, &backup_path) {
                warn!("Failed to back up learning store: {}", e);
            }
        }

        // Atomic write: temp file then rename.
        let temp_path = self.storage_path.with_extension("json.tmp");
        {
            let file = File::create(&temp_path)?;
            let writer = BufWriter::new(file);
            let mappings = self.mappings.read().map_err(|_| StoreError::Poisoned)?;
            serde_json::to_writer_pretty(writer, &*mappings)?;
        }
        fs::rename(&temp_path, &self.storage_path)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn record_and_suggest() {
        let temp_dir = TempDir::new().unwrap();
        let store = LearningStore::new(temp_dir.path().join("learning.json"));

        store
            .record(
                "discussion about stock portfolio diversification strategies",
                "General",
                "Finance",
            )
            .unwrap();

        let suggestion = store.suggest("how should I handle portfolio diversification?");
        assert_eq!(suggestion.as_deref(), Some("Finance"));
    }

    #[test]
    fn insufficient_overlap_yields_nothing() {
        let temp_dir = TempDir::new().unwrap();
        let store = LearningStore::new(temp_dir.path().join("learning.json"));

        store
            .record(
                "discussion about stock portfolio diversification strategies",
                "General",
                "Finance",
            )
            .unwrap();

        assert_eq!(store.suggest("react hooks and component state"), None);
    }

    #[test]
    fn short_previews_never_match() {
        let temp_dir = TempDir::new().unwrap();
        let store = LearningStore::new(temp_dir.path().join("learning.json"));

        store.record("tiny note", "General", "Finance").unwrap();
        assert_eq!(store.suggest("tiny note"), None);
    }

    #[test]
    fn corrections_survive_restart() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("learning.json");

        {
            let store = LearningStore::new(&path);
            store
                .record(
                    "cognitive biases affect investment decisions constantly",
                    "General",
                    "Psychology",
                )
                .unwrap();
        }

        let reopened = LearningStore::new(&path);
        assert_eq!(reopened.count(), 1);
        assert_eq!(
            reopened
                .suggest("common cognitive biases in investment decisions")
                .as_deref(),
            Some("Psychology")
        );
    }

    #[test]
    fn corrupt_file_starts_empty() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("learning.json");
        fs::write(&path, "not json at all").unwrap();

        let store = LearningStore::new(&path);
        assert_eq!(store.count(), 0);
    }

    #[test]
    fn content_key_is_16_hex_and_case_insensitive() {
        let a = LearningStore::content_key("Stock Portfolio");
        let b = LearningStore::content_key("stock portfolio");
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn stats_counts_categories() {
        let temp_dir = TempDir::new().unwrap();
        let store = LearningStore::new(temp_dir.path().join("learning.json"));

        store
            .record("first snippet about budgeting and savings", "General", "Finance")
            .unwrap();
        store
            .record("second snippet about index funds investing", "General", "Finance")
            .unwrap();
        store
            .record("third snippet about mindfulness practice habits", "General", "Psychology")
            .unwrap();

        let stats = store.stats();
        assert_eq!(stats.total_mappings, 3);
        assert_eq!(stats.categories.get("Finance"), Some(&2));
        assert_eq!(stats.categories.get("Psychology"), Some(&1));
        assert!(stats.last_update.is_some());

        // No stray temp file left behind by the atomic write.
        assert!(!temp_dir.path().join("learning.json.tmp").exists());
    }
}
