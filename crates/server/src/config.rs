use std::path::Path;

use anyhow::Context;
use arena_engine::EngineConfig;
use serde::Deserialize;

pub const DEFAULT_CONFIG_PATH: &str = "arena.toml";
pub const CONFIG_PATH_ENV: &str = "ARENA_CONFIG";

/// `arena.toml`: the engine sections plus `[server]`.
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

fn default_bind_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl AppConfig {
    /// Reads the file named by `ARENA_CONFIG`, or `arena.toml`.
    pub fn load() -> anyhow::Result<Self> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        Self::from_file(&path)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::parse(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        toml::from_str(content).context("failed to deserialize arena config")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_sections_and_server_section_share_one_file() {
        let config = AppConfig::parse(
            r#"
[server]
bind_addr = "127.0.0.1:9000"

[execution]
base_url = "http://judge0:2358"
auth_token = "token"

[feed]
poll_interval_ms = 1000
"#,
        )
        .expect("config should parse");

        assert_eq!(config.server.bind_addr, "127.0.0.1:9000");
        assert_eq!(config.engine.execution.base_url, "http://judge0:2358");
        assert_eq!(config.engine.feed.poll_interval_ms, 1000);
    }

    #[test]
    fn server_section_is_optional() {
        let config = AppConfig::parse("[execution]\nbase_url = \"http://localhost:2358\"\n")
            .expect("config should parse");

        assert_eq!(config.server.bind_addr, "0.0.0.0:8080");
    }
}
