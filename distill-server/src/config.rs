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

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};

/// Distill server configuration. Priority: file > environment > defaults.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DistillConfig {
    #[serde(default)]
    pub server: HttpServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub categories: CategoriesConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpServerConfig {
    /// HTTP API listen address (e.g., "127.0.0.1:47200")
    #[serde(default = "default_http_addr")]
    pub listen_addr: String,

    /// Per-completion-call timeout in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Enable CORS
    #[serde(default = "default_enable_cors")]
    pub enable_cors: bool,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct StorageConfig {
    /// Directory holding the category-learning store
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LlmConfig {
    /// OpenAI API key
    pub openai_api_key: Option<String>,

    /// Anthropic API key (used when no OpenAI key is configured)
    pub anthropic_api_key: Option<String>,

    /// Model requested for every completion
    #[serde(default = "default_model")]
    pub model: String,

    /// Override for the OpenAI-compatible base URL
    pub base_url: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            openai_api_key: None,
            anthropic_api_key: None,
            model: default_model(),
            base_url: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CategoriesConfig {
    /// Base URL of a remote categories endpoint; the static taxonomy is
    /// used when unset or unreachable.
    pub remote_url: Option<String>,
}

// Default values
fn default_http_addr() -> String {
    "127.0.0.1:47200".to_string()
}

fn default_request_timeout() -> u64 {
    30
}

fn default_enable_cors() -> bool {
    true
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("./distill-data")
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

impl Default for HttpServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_http_addr(),
            request_timeout_secs: default_request_timeout(),
            enable_cors: default_enable_cors(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl Default for DistillConfig {
    fn default() -> Self {
        Self {
            server: HttpServerConfig::default(),
            storage: StorageConfig::default(),
            llm: LlmConfig::default(),
            categories: CategoriesConfig::default(),
        }
    }
}

impl DistillConfig {
    /// Load configuration from TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - DISTILL_HTTP_ADDR: HTTP listen address (default: 127.0.0.1:47200)
    /// - DISTILL_DATA_DIR: Data directory path (default: ./distill-data)
    /// - DISTILL_REQUEST_TIMEOUT: Completion timeout in seconds (default: 30)
    /// - DISTILL_ENABLE_CORS: Enable CORS (default: true)
    /// - DISTILL_MODEL: Completion model (default: gpt-4o)
    /// - DISTILL_CATEGORIES_URL: Remote categories base URL
    /// - OPENAI_API_KEY / ANTHROPIC_API_KEY: provider credentials
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(addr) = std::env::var("DISTILL_HTTP_ADDR") {
            config.server.listen_addr = addr;
        }

        if let Ok(timeout) = std::env::var("DISTILL_REQUEST_TIMEOUT") {
            if let Ok(val) = timeout.parse() {
                config.server.request_timeout_secs = val;
            }
        }

        if let Ok(cors) = std::env::var("DISTILL_ENABLE_CORS") {
            config.server.enable_cors = cors.parse().unwrap_or(true);
        }

        if let Ok(data_dir) = std::env::var("DISTILL_DATA_DIR") {
            config.storage.data_dir = PathBuf::from(data_dir);
        }

        if let Ok(model) = std::env::var("DISTILL_MODEL") {
            config.llm.model = model;
        }

        if let Ok(url) = std::env::var("DISTILL_CATEGORIES_URL") {
            config.categories.remote_url = Some(url);
        }

        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            config.llm.openai_api_key = Some(key);
        }

        if let Ok(key) = std::env::var("ANTHROPIC_API_KEY") {
            config.llm.anthropic_api_key = Some(key);
        }

        config
    }

    /// Load configuration with priority: file > env > defaults
    pub fn load(config_file: Option<PathBuf>) -> Result<Self> {
        let mut config = if let Some(path) = config_file {
            if path.exists() {
                tracing::info!("Loading configuration from file: {:?}", path);
                Self::from_file(&path)?
            } else {
                tracing::warn!("Config file not found: {:?}, using defaults", path);
                Self::default()
            }
        } else {
            Self::default()
        };

        config = Self::merge_with_env(config);

        Ok(config)
    }

    /// Merge config with environment variables (env takes priority)
    fn merge_with_env(mut config: Self) -> Self {
        let env_config = Self::from_env();

        if std::env::var("DISTILL_HTTP_ADDR").is_ok() {
            config.server.listen_addr = env_config.server.listen_addr;
        }
        if std::env::var("DISTILL_DATA_DIR").is_ok() {
            config.storage.data_dir = env_config.storage.data_dir;
        }
        if std::env::var("DISTILL_REQUEST_TIMEOUT").is_ok() {
            config.server.request_timeout_secs = env_config.server.request_timeout_secs;
        }
        if std::env::var("DISTILL_MODEL").is_ok() {
            config.llm.model = env_config.llm.model;
        }
        if std::env::var("DISTILL_CATEGORIES_URL").is_ok() {
            config.categories.remote_url = env_config.categories.remote_url;
        }
        if config.llm.openai_api_key.is_none() {
            config.llm.openai_api_key = env_config.llm.openai_api_key;
        }
        if config.llm.anthropic_api_key.is_none() {
            config.llm.anthropic_api_key = env_config.llm.anthropic_api_key;
        }

        config
    }

    /// Parse listen address as SocketAddr
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        Ok(self.server.listen_addr.parse()?)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        self.socket_addr()?;

        if self.llm.openai_api_key.is_none() && self.llm.anthropic_api_key.is_none() {
            anyhow::bail!(
                "No completion credentials configured: set OPENAI_API_KEY or ANTHROPIC_API_KEY"
            );
        }

        if !self.storage.data_dir.exists() {
            std::fs::create_dir_all(&self.storage.data_dir)?;
        }

        Ok(())
    }

    /// Path of the persisted category-learning store.
    pub fn learning_store_path(&self) -> PathBuf {
        self.storage.data_dir.join("category_learning.json")
    }
}
