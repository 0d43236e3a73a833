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

//! Completion client abstraction over the external LLM call.
//!
//! The pipeline treats implementations as slow, fallible and
//! non-deterministic; their output is never trusted without passing through
//! the normalizer or the fallback extractor.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Per-call completion parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletionOptions {
    pub temperature: f32,
    pub max_tokens: u32,
    /// Request a JSON-object response format where the provider supports it.
    pub force_json: bool,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.3,
            max_tokens: 4000,
            force_json: true,
        }
    }
}

impl CompletionOptions {
    /// Short, deterministic call used for single-label classification.
    pub fn constrained(max_tokens: u32) -> Self {
        Self {
            temperature: 0.0,
            max_tokens,
            force_json: false,
        }
    }
}

/// Errors from completion clients.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Completion timed out after {0:?}")]
    Timeout(std::time::Duration),
}

impl LlmError {
    /// Transport-level failures are worth another attempt; provider
    /// rejections of the request itself are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            LlmError::RateLimited | LlmError::Http(_) | LlmError::Timeout(_)
        )
    }
}

/// Trait over the external completion call.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Send a prompt and return the raw completion text.
    async fn complete(&self, prompt: &str, options: &CompletionOptions)
        -> Result<String, LlmError>;

    /// Model identifier reported in result metadata.
    fn model_name(&self) -> &str;
}

/// OpenAI chat-completions client.
pub struct OpenAiClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenAiClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: "https://api.openai.com/v1".to_string(),
            client: reqwest::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    /// Same endpoint and model, different credential. Used for requests
    /// that carry their own API key.
    pub fn with_api_key(&self, api_key: String) -> Self {
        Self {
            api_key,
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            client: self.client.clone(),
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let mut request = serde_json::json!({
            "model": self.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });
        if options.force_json {
            request["response_format"] = serde_json::json!({ "type": "json_object" });
        }

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::RateLimited);
            }
            return Err(LlmError::Api(error_text));
        }

        let response_data: serde_json::Value = response.json().await?;

        let content = response_data["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| LlmError::InvalidResponse("Missing content".to_string()))?
            .to_string();

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

/// Anthropic Claude client.
pub struct AnthropicClient {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl AnthropicClient {
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            base_url: "https://api.anthropic.com/v1".to_string(),
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl CompletionClient for AnthropicClient {
    async fn complete(
        &self,
        prompt: &str,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        // The messages API has no JSON response mode; force_json is encoded
        // in the system instruction instead.
        let system = if options.force_json {
            "Respond only with valid JSON."
        } else {
            "Respond with exactly what is asked, nothing more."
        };

        let request = serde_json::json!({
            "model": self.model,
            "max_tokens": options.max_tokens,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
            "system": system,
            "temperature": options.temperature,
        });

        let response = self
            .client
            .post(format!("{}/messages", self.base_url))
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                return Err(LlmError::RateLimited);
            }
            return Err(LlmError::Api(error_text));
        }

        let response_data: serde_json::Value = response.json().await?;

        let content = response_data["content"][0]["text"]
            .as_str()
            .ok_or_else(|| LlmError::InvalidResponse("Missing content".to_string()))?
            .to_string();

        Ok(content)
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limit_and_timeout_are_retryable() {
        assert!(LlmError::RateLimited.is_retryable());
        assert!(LlmError::Timeout(std::time::Duration::from_secs(30)).is_retryable());
        assert!(!LlmError::Api("bad request".to_string()).is_retryable());
        assert!(!LlmError::InvalidResponse("missing content".to_string()).is_retryable());
    }

    #[test]
    fn custom_key_client_keeps_model_and_base_url() {
        let client = OpenAiClient::new("server-key".to_string(), "gpt-4o".to_string())
            .with_base_url("http://localhost:9999/v1".to_string());
        let custom = client.with_api_key("caller-key".to_string());
        assert_eq!(custom.model_name(), "gpt-4o");
        assert_eq!(custom.base_url, "http://localhost:9999/v1");
        assert_eq!(custom.api_key, "caller-key");
    }

    #[test]
    fn constrained_options_disable_json_mode() {
        let options = CompletionOptions::constrained(10);
        assert_eq!(options.temperature, 0.0);
        assert_eq!(options.max_tokens, 10);
        assert!(!options.force_json);
    }
}
