mod api_config;
#[allow(clippy::module_inception)]
mod config;

pub(crate) use {api_config::ApiConfig, config::Config};

pub(crate) const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";
pub(crate) const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

pub(crate) fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

pub(crate) fn default_timeout_seconds() -> u64 {
    DEFAULT_TIMEOUT_SECONDS
}
