use crate::config::Config;
use crate::types::{RegistryTag, TagPage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, warn};

/// Source of tag listings for an image repository.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRegistry: Send + Sync {
    /// Returns the first page of tags in the order the registry lists them.
    async fn list_tags(&self, namespace: &str, repository: &str) -> Result<Vec<RegistryTag>>;
}

pub struct DockerHubRegistry {
    client: reqwest::Client,
    base_url: String,
    page_size: u32,
}

impl DockerHubRegistry {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: config.registry_url.trim_end_matches('/').to_string(),
            page_size: config.page_size,
        })
    }

    fn tags_url(&self, namespace: &str, repository: &str) -> String {
        format!(
            "{}/v2/repositories/{}/{}/tags?page_size={}",
            self.base_url, namespace, repository, self.page_size
        )
    }
}

#[async_trait]
impl TagRegistry for DockerHubRegistry {
    async fn list_tags(&self, namespace: &str, repository: &str) -> Result<Vec<RegistryTag>> {
        let url = self.tags_url(namespace, repository);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .with_context(|| format!("Failed to query tags for {}/{}", namespace, repository))?;

        // A rejected or unreadable listing only means this image has no candidates.
        let status = response.status();
        if !status.is_success() {
            warn!("Registry answered {} for {}/{}", status, namespace, repository);
            return Ok(Vec::new());
        }

        let body = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read tag listing for {}/{}", namespace, repository))?;
        match serde_json::from_slice::<TagPage>(&body) {
            Ok(page) => Ok(page.results),
            Err(e) => {
                warn!("Invalid tag listing for {}/{}: {}", namespace, repository, e);
                Ok(Vec::new())
            }
        }
    }
}
