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

//! Two-stage domain classification: a keyword-frequency heuristic, and a
//! constrained model call only when the heuristic is inconclusive. Makes at
//! most one network call per classification.

use crate::llm::{CompletionClient, CompletionOptions};
use crate::prompt;
use distill_core::taxonomy::{keyword_hits, NON_TECHNICAL_KEYWORDS, TECHNICAL_KEYWORDS};
use distill_core::DomainType;
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Default)]
pub struct DomainClassifier;

impl DomainClassifier {
    pub fn new() -> Self {
        Self
    }

    /// Heuristic stage alone. `None` means inconclusive.
    pub fn classify_by_keywords(&self, text: &str) -> Option<DomainType> {
        let lower = text.to_lowercase();
        let technical = keyword_hits(&lower, TECHNICAL_KEYWORDS);
        let non_technical = keyword_hits(&lower, NON_TECHNICAL_KEYWORDS);
        debug!(technical, non_technical, "keyword domain scores");

        if technical >= 3 && non_technical <= 1 {
            Some(DomainType::Technical)
        } else if non_technical >= 2 && technical <= 1 {
            Some(DomainType::NonTechnical)
        } else if technical >= 2 && non_technical >= 2 {
            Some(DomainType::Mixed)
        } else {
            None
        }
    }

    /// Full classification. Degrades to [`DomainType::Technical`] when the
    /// model answers anything other than the three labels, or fails.
    pub async fn classify(&self, client: &dyn CompletionClient, text: &str) -> DomainType {
        if let Some(domain) = self.classify_by_keywords(text) {
            info!(domain = domain.as_label(), "domain detected by keywords");
            return domain;
        }

        let options = CompletionOptions::constrained(10);
        match client.complete(&prompt::domain_prompt(text), &options).await {
            Ok(label) => match DomainType::from_label(&label) {
                Some(domain) => {
                    info!(domain = domain.as_label(), "domain detected by model");
                    domain
                }
                None => {
                    warn!(label = %label.trim(), "unrecognized domain label, defaulting to TECHNICAL");
                    DomainType::Technical
                }
            },
            Err(error) => {
                warn!(%error, "domain detection call failed, defaulting to TECHNICAL");
                DomainType::Technical
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct ScriptedClient {
        reply: Result<&'static str, ()>,
        calls: AtomicUsize,
    }

    impl ScriptedClient {
        fn answering(reply: &'static str) -> Self {
            Self {
                reply: Ok(reply),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reply: Err(()),
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionClient for ScriptedClient {
        async fn complete(
            &self,
            _prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match self.reply {
                Ok(text) => Ok(text.to_string()),
                Err(()) => Err(LlmError::Api("unavailable".to_string())),
            }
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    const TECHNICAL_TEXT: &str =
        "We wrote python code with an algorithm using an array and a hash function \
         while debugging the backend api.";
    const FINANCE_TEXT: &str =
        "We talked about investment strategies and how to balance a stock portfolio \
         against your monthly budget.";

    #[test]
    fn strongly_technical_text_skips_the_model() {
        let classifier = DomainClassifier::new();
        assert_eq!(
            classifier.classify_by_keywords(TECHNICAL_TEXT),
            Some(DomainType::Technical)
        );
    }

    #[test]
    fn strongly_non_technical_text_skips_the_model() {
        let classifier = DomainClassifier::new();
        assert_eq!(
            classifier.classify_by_keywords(FINANCE_TEXT),
            Some(DomainType::NonTechnical)
        );
    }

    #[test]
    fn both_vocabularies_present_means_mixed() {
        let classifier = DomainClassifier::new();
        let text = format!("{TECHNICAL_TEXT} {FINANCE_TEXT}");
        assert_eq!(
            classifier.classify_by_keywords(&text),
            Some(DomainType::Mixed)
        );
    }

    #[tokio::test]
    async fn conclusive_heuristic_makes_no_network_call() {
        let classifier = DomainClassifier::new();
        let client = ScriptedClient::answering("NON_TECHNICAL");
        let domain = classifier.classify(&client, TECHNICAL_TEXT).await;
        assert_eq!(domain, DomainType::Technical);
        assert_eq!(client.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn inconclusive_text_asks_the_model_once() {
        let classifier = DomainClassifier::new();
        let client = ScriptedClient::answering("MIXED");
        let domain = classifier.classify(&client, "a short chat about nothing much").await;
        assert_eq!(domain, DomainType::Mixed);
        assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn garbage_label_degrades_to_technical() {
        let classifier = DomainClassifier::new();
        let client = ScriptedClient::answering("BANANA");
        let domain = classifier.classify(&client, "a short chat about nothing much").await;
        assert_eq!(domain, DomainType::Technical);
    }

    #[tokio::test]
    async fn transport_failure_degrades_to_technical() {
        let classifier = DomainClassifier::new();
        let client = ScriptedClient::failing();
        let domain = classifier.classify(&client, "a short chat about nothing much").await;
        assert_eq!(domain, DomainType::Technical);
    }
}
