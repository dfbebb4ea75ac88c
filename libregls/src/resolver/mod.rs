//! Per-tag metadata resolution.
//!
//! A tag's creation time and its architectures come from two independent
//! request chains:
//!
//! - manifest → config blob → `created`
//! - manifest list → one architecture per platform entry
//!
//! Both chains run concurrently and are merged into a [`TagRecord`]. Every
//! HTTP call holds one permit of the resolver's semaphore while it runs.

use crate::client::RegistryClient;
use crate::error::{RegistryError, Result};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{Semaphore, SemaphorePermit};
use tracing::{debug, warn};

#[cfg(test)]
mod tests;

/// Resolved metadata for one tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagRecord {
    pub repository: String,
    pub tag: String,
    /// Creation time exactly as the config blob reported it
    pub created: String,
    /// One entry per listed platform, in response order
    pub architectures: Vec<String>,
}

impl TagRecord {
    /// Architectures joined with a comma.
    pub fn joined_architectures(&self) -> String {
        self.architectures.join(",")
    }
}

/// Resolves [`TagRecord`]s against one registry.
#[derive(Debug, Clone)]
pub struct TagResolver {
    client: RegistryClient,
    permits: Arc<Semaphore>,
}

impl TagResolver {
    /// Creates a resolver that does not limit its requests.
    pub fn new(client: RegistryClient) -> Self {
        Self::with_permits(client, Arc::new(Semaphore::new(Semaphore::MAX_PERMITS)))
    }

    /// Creates a resolver whose HTTP calls each take one permit from `permits`.
    pub fn with_permits(client: RegistryClient, permits: Arc<Semaphore>) -> Self {
        Self { client, permits }
    }

    /// Resolves creation time and architectures of `repository:tag`.
    ///
    /// Fails with the first error of either chain.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use libregls::client::RegistryClient;
    /// use libregls::resolver::TagResolver;
    ///
    /// # async fn example() -> libregls::error::Result<()> {
    /// let resolver = TagResolver::new(RegistryClient::new("localhost:5000")?);
    /// let record = resolver.resolve("alpine", "latest").await?;
    /// println!("{} {}", record.created, record.joined_architectures());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn resolve(&self, repository: &str, tag: &str) -> Result<TagRecord> {
        let (created, architectures) = tokio::try_join!(
            self.created_time(repository, tag),
            self.architectures(repository, tag)
        )?;

        debug!(repository, tag, %created, "resolved tag");

        Ok(TagRecord {
            repository: repository.to_string(),
            tag: tag.to_string(),
            created,
            architectures,
        })
    }

    /// Fetches the manifest, then its config blob, and returns `created` verbatim.
    pub async fn created_time(&self, repository: &str, tag: &str) -> Result<String> {
        let manifest = {
            let _permit = self.acquire().await?;
            self.client.get_manifest(repository, tag).await?
        };

        let digest = manifest.config_digest().ok_or_else(|| {
            RegistryError::decode(format!(
                "manifest for {}:{} has no config digest",
                repository, tag
            ))
        })?;

        let _permit = self.acquire().await?;
        let blob = self.client.get_config_blob(repository, digest).await?;
        Ok(blob.created)
    }

    /// Fetches the manifest list and returns its architectures in order.
    pub async fn architectures(&self, repository: &str, tag: &str) -> Result<Vec<String>> {
        let shape = {
            let _permit = self.acquire().await?;
            self.client.get_manifest_list(repository, tag).await?
        };
        let architectures = shape.architectures();

        if architectures.iter().all(|a| a.is_empty()) {
            warn!(
                repository,
                tag, "registry reported no architecture; showing an empty value"
            );
        }

        Ok(architectures)
    }

    async fn acquire(&self) -> Result<SemaphorePermit<'_>> {
        self.permits
            .acquire()
            .await
            .map_err(|_| RegistryError::task("request pool closed"))
    }
}
