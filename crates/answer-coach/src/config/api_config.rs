use crate::config::{default_base_url, default_timeout_seconds};

use serde::{Deserialize, Serialize};

/// Practice-server endpoint configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct ApiConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
