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

//! Bounded retry with jitter plus a hard per-call timeout around every
//! completion. Exhaustion surfaces as an ordinary [`LlmError`], which the
//! per-segment path treats identically to a parse failure.

use crate::llm::{CompletionClient, CompletionOptions, LlmError};
use rand::random;
use std::time::Duration;
use tracing::warn;

/// Exponential backoff policy with multiplicative jitter.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay: Duration,
    pub max_delay: Duration,
    pub multiplier: f64,
    pub jitter: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(5),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }
}

impl RetryPolicy {
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let base = self.initial_delay.as_secs_f64() * self.multiplier.powi(attempt as i32);
        let jitter_factor = 1.0 + (random::<f64>() - 0.5) * 2.0 * self.jitter;
        let jittered = base * jitter_factor;
        let clamped = jittered.min(self.max_delay.as_secs_f64()).max(0.0);
        Duration::from_secs_f64(clamped)
    }
}

/// Run one completion under the retry policy, bounding every attempt with
/// `timeout`. Non-retryable errors surface immediately.
pub async fn complete_with_retry(
    client: &dyn CompletionClient,
    prompt: &str,
    options: &CompletionOptions,
    policy: &RetryPolicy,
    timeout: Duration,
) -> Result<String, LlmError> {
    let mut last_error = LlmError::Api("no attempts made".to_string());

    for attempt in 0..policy.max_attempts.max(1) {
        if attempt > 0 {
            tokio::time::sleep(policy.delay_for_attempt(attempt - 1)).await;
        }

        let result = tokio::time::timeout(timeout, client.complete(prompt, options)).await;
        let error = match result {
            Ok(Ok(text)) => return Ok(text),
            Ok(Err(error)) => error,
            Err(_) => LlmError::Timeout(timeout),
        };

        if !error.is_retryable() {
            return Err(error);
        }

        warn!(
            attempt = attempt + 1,
            max_attempts = policy.max_attempts,
            error = %error,
            "completion attempt failed, retrying"
        );
        last_error = error;
    }

    Err(last_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Client that fails a fixed number of times before succeeding.
    struct FlakyClient {
        failures: usize,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl CompletionClient for FlakyClient {
        async fn complete(
            &self,
            _prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                Err(LlmError::RateLimited)
            } else {
                Ok("{\"ok\": true}".to_string())
            }
        }

        fn model_name(&self) -> &str {
            "flaky"
        }
    }

    struct RejectingClient;

    #[async_trait]
    impl CompletionClient for RejectingClient {
        async fn complete(
            &self,
            _prompt: &str,
            _options: &CompletionOptions,
        ) -> Result<String, LlmError> {
            Err(LlmError::Api("invalid request".to_string()))
        }

        fn model_name(&self) -> &str {
            "rejecting"
        }
    }

    fn fast_policy() -> RetryPolicy {
        RetryPolicy {
            max_attempts: 3,
            initial_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(5),
            multiplier: 2.0,
            jitter: 0.1,
        }
    }

    #[tokio::test]
    async fn transient_failures_are_retried() {
        let client = FlakyClient {
            failures: 2,
            calls: AtomicUsize::new(0),
        };
        let text = complete_with_retry(
            &client,
            "prompt",
            &CompletionOptions::default(),
            &fast_policy(),
            Duration::from_secs(1),
        )
        .await
        .unwrap();
        assert_eq!(text, "{\"ok\": true}");
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn retries_are_bounded() {
        let client = FlakyClient {
            failures: 10,
            calls: AtomicUsize::new(0),
        };
        let result = complete_with_retry(
            &client,
            "prompt",
            &CompletionOptions::default(),
            &fast_policy(),
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(LlmError::RateLimited)));
        assert_eq!(client.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn non_retryable_errors_surface_immediately() {
        let result = complete_with_retry(
            &RejectingClient,
            "prompt",
            &CompletionOptions::default(),
            &fast_policy(),
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(LlmError::Api(_))));
    }

    #[test]
    fn delay_never_exceeds_max() {
        let policy = RetryPolicy::default();
        for attempt in 0..10 {
            assert!(policy.delay_for_attempt(attempt) <= policy.max_delay + Duration::from_secs(1));
        }
    }
}
