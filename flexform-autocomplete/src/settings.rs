//! HTTP and paging settings for autocomplete sources

use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Settings shared by every URL-backed source
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutocompleteSettings {
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
    pub user_agent: String,
    /// Page size used when a request does not ask for one
    pub default_per_page: usize,
    /// Upper bound on any requested page size
    pub max_per_page: usize,
}

impl Default for AutocompleteSettings {
    fn default() -> Self {
        Self {
            timeout_ms: 10_000,
            user_agent: format!("flexform/{}", env!("CARGO_PKG_VERSION")),
            default_per_page: 20,
            max_per_page: 100,
        }
    }
}

impl AutocompleteSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// The page size to use for a request asking for `requested`
    pub fn per_page(&self, requested: Option<usize>) -> usize {
        requested
            .unwrap_or(self.default_per_page)
            .clamp(1, self.max_per_page.max(1))
    }

    /// An HTTP client honouring these settings
    pub fn build_client(&self) -> Result<reqwest::Client> {
        Ok(reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(&self.user_agent)
            .build()?)
    }
}
