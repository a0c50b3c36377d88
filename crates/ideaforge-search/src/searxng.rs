//! SearXNG link discovery client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info, warn};

use ideaforge_core::{defaults, Error, LinkDiscovery, LinkType, ResourceLink, Result};

use crate::classify::{classify_url, truncate_description};
use crate::deduplication::dedupe_links;

/// Configuration for the SearXNG client.
#[derive(Debug, Clone)]
pub struct SearxngConfig {
    /// Base URL of the SearXNG instance.
    pub base_url: String,
    /// Comma-separated engines requested per query.
    pub engines: String,
    /// Per-request timeout in seconds.
    pub timeout_seconds: u64,
    /// Results kept from each query.
    pub per_query: usize,
    /// Links kept overall after deduplication.
    pub max_links: usize,
}

impl SearxngConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            engines: defaults::SEARCH_ENGINES.to_string(),
            timeout_seconds: defaults::SEARCH_TIMEOUT_SECS,
            per_query: defaults::LINKS_PER_QUERY,
            max_links: defaults::MAX_LINKS,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearxngResponse {
    #[serde(default)]
    results: Vec<SearxngResult>,
}

#[derive(Debug, Deserialize)]
struct SearxngResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
}

/// The discovery queries issued per topic, with the type each one implies.
fn discovery_queries(topic: &str) -> [(String, LinkType); 3] {
    [
        (format!("{} github", topic), LinkType::Github),
        (format!("{} documentation official", topic), LinkType::Docs),
        (format!("{} tutorial setup guide", topic), LinkType::Article),
    ]
}

/// SearXNG-backed link discovery.
pub struct SearxngClient {
    client: Client,
    config: SearxngConfig,
}

impl SearxngClient {
    /// Create a new client with the given configuration.
    pub fn new(config: SearxngConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::Config("SearXNG URL is required".to_string()));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Search(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "search",
            component = "searxng",
            op = "init",
            url = %config.base_url,
            timeout_secs = config.timeout_seconds,
            "Initializing SearXNG client"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables (`SEARXNG_URL`, `SEARCH_TIMEOUT_SECS`).
    pub fn from_env() -> Result<Self> {
        let base_url = std::env::var("SEARXNG_URL")
            .map_err(|_| Error::Config("SEARXNG_URL environment variable is required".to_string()))?;
        let mut config = SearxngConfig::new(base_url);
        if let Some(secs) = std::env::var("SEARCH_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
        {
            config.timeout_seconds = secs;
        }
        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &SearxngConfig {
        &self.config
    }

    /// Run one query, keeping at most `per_query` results.
    async fn search(&self, query: &str, default_type: LinkType) -> Result<Vec<ResourceLink>> {
        let url = format!("{}/search", self.config.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("engines", self.config.engines.as_str()),
            ])
            .send()
            .await
            .map_err(|e| Error::Search(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Search(format!(
                "SearXNG returned {}: {}",
                status, body
            )));
        }

        let parsed: SearxngResponse = response
            .json()
            .await
            .map_err(|e| Error::Search(format!("Failed to parse response: {}", e)))?;

        Ok(parsed
            .results
            .into_iter()
            .filter(|r| !r.url.is_empty())
            .take(self.config.per_query)
            .map(|r| ResourceLink {
                link_type: classify_url(&r.url, default_type),
                description: truncate_description(&r.content),
                title: r.title,
                url: r.url,
            })
            .collect())
    }
}

#[async_trait]
impl LinkDiscovery for SearxngClient {
    async fn discover_links(&self, topic: &str) -> Result<Vec<ResourceLink>> {
        let start = Instant::now();
        let mut collected = Vec::new();
        let mut failures = 0usize;
        let mut last_error = None;

        let queries = discovery_queries(topic);
        for (query, default_type) in &queries {
            match self.search(query, *default_type).await {
                Ok(links) => collected.extend(links),
                Err(e) => {
                    warn!(
                        subsystem = "search",
                        component = "searxng",
                        op = "query",
                        query = %query,
                        error = %e,
                        "Search query failed, continuing"
                    );
                    failures += 1;
                    last_error = Some(e);
                }
            }
        }

        if failures == queries.len() {
            return Err(last_error
                .unwrap_or_else(|| Error::Search("All search queries failed".to_string())));
        }

        let links = dedupe_links(collected, self.config.max_links);
        debug!(
            subsystem = "search",
            component = "searxng",
            op = "discover",
            query = %topic,
            result_count = links.len(),
            failed_queries = failures,
            duration_ms = start.elapsed().as_millis() as u64,
            "Link discovery complete"
        );
        Ok(links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_discovery_queries() {
        let queries = discovery_queries("pi-hole");
        assert_eq!(queries[0], ("pi-hole github".to_string(), LinkType::Github));
        assert_eq!(
            queries[1],
            ("pi-hole documentation official".to_string(), LinkType::Docs)
        );
        assert_eq!(
            queries[2],
            ("pi-hole tutorial setup guide".to_string(), LinkType::Article)
        );
    }

    #[test]
    fn test_config_defaults() {
        let config = SearxngConfig::new("http://searx:8080");
        assert_eq!(config.engines, "google,duckduckgo,bing");
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.per_query, 2);
        assert_eq!(config.max_links, 5);
    }

    #[test]
    fn test_new_requires_url() {
        assert!(matches!(
            SearxngClient::new(SearxngConfig::new("")),
            Err(Error::Config(_))
        ));
    }
}
