//! Server configuration from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use ideaforge_core::defaults;

use crate::services::PipelineConfig;

/// Process-level settings. Collaborator settings are read by each
/// collaborator's own `from_env`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    pub request_timeout: Duration,
    pub search_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: defaults::HOST.to_string(),
            port: defaults::PORT,
            database_path: PathBuf::from(defaults::DATABASE_PATH),
            request_timeout: Duration::from_secs(defaults::REQUEST_TIMEOUT_SECS),
            search_timeout: Duration::from_secs(defaults::SEARCH_TIMEOUT_SECS),
        }
    }
}

fn env_secs(name: &str, default: u64) -> Duration {
    Duration::from_secs(
        std::env::var(name)
            .ok()
            .and_then(|s| s.parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(default),
    )
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| defaults::HOST.to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults::PORT),
            database_path: std::env::var("DATABASE_PATH")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(defaults::DATABASE_PATH)),
            request_timeout: env_secs("REQUEST_TIMEOUT_SECS", defaults::REQUEST_TIMEOUT_SECS),
            search_timeout: env_secs("SEARCH_TIMEOUT_SECS", defaults::SEARCH_TIMEOUT_SECS),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            request_timeout: self.request_timeout,
            search_timeout: self.search_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.database_path, PathBuf::from("./data/ideaforge.db"));
        assert_eq!(config.pipeline().request_timeout, Duration::from_secs(60));
        assert_eq!(config.pipeline().search_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_env_secs_falls_back_when_unset() {
        assert_eq!(
            env_secs("IDEAFORGE_TEST_UNSET_TIMEOUT", 7),
            Duration::from_secs(7)
        );
    }
}
