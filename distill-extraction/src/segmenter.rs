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

//! Topic segmentation. One model call splits the conversation; every
//! failure path collapses to a single full-conversation segment, so
//! segmentation never blocks the pipeline.

use crate::llm::{CompletionClient, CompletionOptions};
use crate::normalize::strip_code_fences;
use crate::prompt;
use distill_core::{Segment, SegmentKind};
use tracing::{info, warn};

/// Upper bound on segments per conversation; beyond this the model is
/// considered to have run away and the split is discarded.
pub const MAX_SEGMENTS: usize = 5;

#[derive(Debug, Clone, Default)]
pub struct Segmenter;

impl Segmenter {
    pub fn new() -> Self {
        Self
    }

    /// Split the conversation into topic segments. The second tuple field
    /// reports degradation: true when the model's split was unusable and
    /// the single-segment fallback was taken.
    pub async fn segment(
        &self,
        client: &dyn CompletionClient,
        conversation: &str,
    ) -> (Vec<Segment>, bool) {
        let options = CompletionOptions {
            temperature: 0.3,
            max_tokens: 4000,
            force_json: true,
        };

        let raw = match client
            .complete(&prompt::segmentation_prompt(conversation), &options)
            .await
        {
            Ok(raw) => raw,
            Err(error) => {
                warn!(%error, "segmentation call failed, using full conversation");
                return (vec![Segment::full_conversation(conversation)], true);
            }
        };

        match self.parse_segments(&raw, conversation) {
            Some(segments) => {
                info!(count = segments.len(), "conversation segmented");
                (segments, false)
            }
            None => {
                warn!("segmentation response unusable, using full conversation");
                (vec![Segment::full_conversation(conversation)], true)
            }
        }
    }

    /// Parse and validate the model's segmentation JSON. `None` when the
    /// response is malformed; an over- or under-segmented split collapses
    /// to the single-segment form but is not considered degraded.
    fn parse_segments(&self, raw: &str, conversation: &str) -> Option<Vec<Segment>> {
        let value: serde_json::Value = serde_json::from_str(strip_code_fences(raw)).ok()?;

        let kind = value
            .get("conversation_type")
            .and_then(|v| v.as_str())
            .and_then(SegmentKind::from_label)
            .unwrap_or(SegmentKind::ExploratoryLearning);

        let mut segments = Vec::new();
        if let Some(raw_segments) = value.get("segments").and_then(|v| v.as_array()) {
            for raw_segment in raw_segments {
                let content = raw_segment
                    .get("content")
                    .and_then(|v| v.as_str())
                    .unwrap_or("");
                if content.trim().is_empty() {
                    continue;
                }
                let topic = raw_segment
                    .get("topic")
                    .and_then(|v| v.as_str())
                    .unwrap_or("Uncategorized")
                    .to_string();
                let technique = raw_segment
                    .get("main_technique")
                    .and_then(|v| v.as_str())
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from);

                segments.push(Segment {
                    topic,
                    kind,
                    technique,
                    content: content.to_string(),
                    position: segments.len(),
                });
            }
        }

        if segments.is_empty() || segments.len() > MAX_SEGMENTS {
            warn!(
                count = segments.len(),
                "segment count out of bounds, collapsing to full conversation"
            );
            let mut collapsed = Segment::full_conversation(conversation);
            collapsed.kind = kind;
            return Some(vec![collapsed]);
        }

        Some(segments)
    }
}
