use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;
type Result<T> = anyhow::Result<T>;

#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub leaderboard: LeaderboardConfig,
    #[serde(default)]
    pub feed: FeedConfig,
}

impl EngineConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("failed to deserialize engine config")
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExecutionConfig {
    pub base_url: String,
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl ExecutionConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LeaderboardBackend {
    #[default]
    Memory,
    Redis,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LeaderboardConfig {
    #[serde(default)]
    pub backend: LeaderboardBackend,
    #[serde(default)]
    pub redis_url: Option<String>,
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,
}

impl Default for LeaderboardConfig {
    fn default() -> Self {
        Self {
            backend: LeaderboardBackend::default(),
            redis_url: None,
            key_prefix: default_key_prefix(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct FeedConfig {
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_event_buffer_size")]
    pub event_buffer_size: usize,
}

impl FeedConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: default_poll_interval_ms(),
            event_buffer_size: default_event_buffer_size(),
        }
    }
}

fn default_timeout_ms() -> u64 {
    15_000
}

fn default_key_prefix() -> String {
    "leaderboard".to_string()
}

fn default_poll_interval_ms() -> u64 {
    2_000
}

fn default_event_buffer_size() -> usize {
    1_024
}

#[cfg(test)]
mod tests {
    use super::{EngineConfig, LeaderboardBackend};

    #[test]
    fn test_parse_config() {
        let raw = r#"
[execution]
base_url = "http://judge0:2358"
timeout_ms = 8000
auth_token = "secret"

[leaderboard]
backend = "redis"
redis_url = "redis://127.0.0.1:6379"
key_prefix = "arena:lb"

[feed]
poll_interval_ms = 500
"#;

        let config = EngineConfig::from_str(raw).expect("config should parse");
        assert_eq!(config.execution.base_url, "http://judge0:2358");
        assert_eq!(config.execution.timeout().as_millis(), 8000);
        assert_eq!(config.execution.auth_token.as_deref(), Some("secret"));
        assert_eq!(config.leaderboard.backend, LeaderboardBackend::Redis);
        assert_eq!(
            config.leaderboard.redis_url.as_deref(),
            Some("redis://127.0.0.1:6379")
        );
        assert_eq!(config.leaderboard.key_prefix, "arena:lb");
        assert_eq!(config.feed.poll_interval().as_millis(), 500);
        assert_eq!(config.feed.event_buffer_size, 1_024);
    }

    #[test]
    fn test_defaults() {
        let config = EngineConfig::from_str(
            r#"
[execution]
base_url = "http://localhost:2358"
"#,
        )
        .expect("config should parse");

        assert_eq!(config.execution.timeout_ms, 15_000);
        assert!(config.execution.auth_token.is_none());
        assert_eq!(config.leaderboard.backend, LeaderboardBackend::Memory);
        assert_eq!(config.leaderboard.key_prefix, "leaderboard");
        assert_eq!(config.feed.poll_interval_ms, 2_000);
    }

    #[test]
    fn test_missing_execution_section_fails() {
        assert!(EngineConfig::from_str("[feed]\npoll_interval_ms = 10\n").is_err());
    }
}
