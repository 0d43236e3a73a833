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

//! The valid-category catalog: the static taxonomy, optionally refreshed
//! from a remote categories endpoint. Any remote failure falls back to the
//! static list, so category resolution never blocks on the network.

use distill_core::taxonomy::DEFAULT_CATEGORIES;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info, warn};

const REMOTE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(default)]
    categories: Vec<String>,
}

pub struct CategoryCatalog {
    remote_url: Option<String>,
    http: reqwest::Client,
}

impl CategoryCatalog {
    /// A catalog serving only the static defaults.
    pub fn static_only() -> Self {
        Self {
            remote_url: None,
            http: reqwest::Client::new(),
        }
    }

    /// A catalog that refreshes from `{base_url}/api/categories`.
    pub fn with_remote(base_url: String) -> Self {
        Self {
            remote_url: Some(base_url),
            http: reqwest::Client::new(),
        }
    }

    pub fn defaults() -> Vec<String> {
        DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
    }

    /// Current valid categories: the remote list when configured and
    /// healthy, the static defaults otherwise.
    pub async fn categories(&self) -> Vec<String> {
        let Some(base_url) = &self.remote_url else {
            return Self::defaults();
        };

        match self.fetch_remote(base_url).await {
            Some(categories) => {
                info!(count = categories.len(), "fetched categories from remote");
                categories
            }
            None => {
                debug!("using default categories");
                Self::defaults()
            }
        }
    }

    async fn fetch_remote(&self, base_url: &str) -> Option<Vec<String>> {
        let url = format!("{}/api/categories", base_url.trim_end_matches('/'));
        let response = match self.http.get(&url).timeout(REMOTE_TIMEOUT).send().await {
            Ok(response) => response,
            Err(error) => {
                warn!(%error, "categories fetch failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "categories endpoint returned an error");
            return None;
        }

        match response.json::<CategoriesResponse>().await {
            Ok(body) if !body.categories.is_empty() => Some(body.categories),
            Ok(_) => {
                warn!("categories endpoint returned an empty list");
                None
            }
            Err(error) => {
                warn!(%error, "categories response was malformed");
                None
            }
        }
    }
}
