//! Process-wide gateway configuration, read-only after initialization.

use std::time::Duration;

/// Connection settings for the remote execution engine.
///
/// Built once at startup (explicitly or from the environment) and shared
/// read-only by every request handler.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Base URL of the execution engine, e.g. `http://127.0.0.1:8080`.
    pub base_url: String,
    /// Shared secret sent as `X-Internal-Token` on every outbound call.
    pub internal_token: String,
    /// Caller API keys accepted by [`Gateway::authorize`](crate::Gateway::authorize).
    pub api_keys: Vec<String>,
    /// Connect/response timeout applied to every outbound call.
    pub timeout: Duration,
}

impl EngineConfig {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a config with the default timeout and no caller keys.
    pub fn new(base_url: impl Into<String>, internal_token: impl Into<String>) -> Self {
        Self {
            base_url: trim_trailing_slash(base_url.into()),
            internal_token: internal_token.into(),
            api_keys: Vec::new(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets the accepted caller API keys.
    pub fn with_api_keys(mut self, keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.api_keys = keys.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the outbound call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Reads configuration from the environment:
    ///
    /// - `ENGINE_URL` (default `http://127.0.0.1:8080`)
    /// - `ENGINE_INTERNAL_TOKEN` (default empty)
    /// - `API_KEYS` (comma-separated, default empty)
    /// - `ENGINE_TIMEOUT_MS` (default 10000)
    pub fn from_env() -> Self {
        let base_url = std::env::var("ENGINE_URL")
            .unwrap_or_else(|_| "http://127.0.0.1:8080".to_string());
        let internal_token = std::env::var("ENGINE_INTERNAL_TOKEN").unwrap_or_default();
        let api_keys = std::env::var("API_KEYS")
            .map(|keys| {
                keys.split(',')
                    .map(str::trim)
                    .filter(|k| !k.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        let timeout = std::env::var("ENGINE_TIMEOUT_MS")
            .ok()
            .and_then(|ms| ms.parse().ok())
            .map(Duration::from_millis)
            .unwrap_or(Self::DEFAULT_TIMEOUT);

        Self {
            base_url: trim_trailing_slash(base_url),
            internal_token,
            api_keys,
            timeout,
        }
    }
}

fn trim_trailing_slash(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_normalized() {
        let config = EngineConfig::new("http://localhost:8080/", "secret");
        assert_eq!(config.base_url, "http://localhost:8080");
    }
}
