//! High-level API for the regls library.
//!
//! [`Regls`] wires a [`RegistryClient`], a [`TagResolver`] and an
//! [`Aggregator`] together from a URL, an optional [`Config`] and
//! [`ListOptions`]. It is the recommended entry point.
//!
//! # Examples
//!
//! ```no_run
//! use libregls::Regls;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let regls = Regls::connect("http://localhost:5000")?;
//!
//!     let inventory = regls.list().await?;
//!     for row in &inventory.rows {
//!         println!("{}\t{}\t{}\t{}", row.repository, row.tag, row.architecture, row.created);
//!     }
//!
//!     Ok(())
//! }
//! ```

use crate::aggregator::{Aggregator, Inventory, ListOptions};
use crate::client::RegistryClient;
use crate::config::Config;
use crate::error::{RegistryError, Result};
use crate::resolver::{TagRecord, TagResolver};

#[cfg(test)]
#[path = "regls_tests.rs"]
mod tests;

/// High-level interface for inventorying one registry.
///
/// # Examples
///
/// ```no_run
/// use libregls::{FailurePolicy, ListOptions, Regls};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let regls = Regls::builder()
///         .registry_url("https://registry.internal:5000")
///         .with_options(
///             ListOptions::new()
///                 .with_prefix("team-")
///                 .with_policy(FailurePolicy::Strict),
///         )
///         .build()?;
///
///     let inventory = regls.list().await?;
///     println!("{} rows", inventory.rows.len());
///     Ok(())
/// }
/// ```
pub struct Regls {
    client: RegistryClient,
    resolver: TagResolver,
    aggregator: Aggregator,
}

impl Regls {
    /// Connects to a registry with default settings.
    pub fn connect(registry_url: &str) -> Result<Self> {
        Self::builder().registry_url(registry_url).build()
    }

    /// Creates a builder for advanced configuration.
    pub fn builder() -> ReglsBuilder {
        ReglsBuilder::new()
    }

    /// Runs a full inventory with the configured options.
    pub async fn list(&self) -> Result<Inventory> {
        self.aggregator.run().await
    }

    /// Lists every repository in the catalog, unfiltered.
    pub async fn list_repositories(&self) -> Result<Vec<String>> {
        self.client.list_repositories().await
    }

    /// Lists the tags of one repository.
    pub async fn list_tags(&self, repository: &str) -> Result<Vec<String>> {
        self.client.list_tags(repository).await
    }

    /// Resolves a single tag's creation time and architectures.
    pub async fn resolve_tag(&self, repository: &str, tag: &str) -> Result<TagRecord> {
        self.resolver.resolve(repository, tag).await
    }

    /// The options [`Regls::list`] runs with.
    pub fn options(&self) -> &ListOptions {
        self.aggregator.options()
    }

    pub fn registry_url(&self) -> &str {
        self.client.registry_url()
    }
}

/// Builder for [`Regls`].
///
/// The registry URL comes from [`ReglsBuilder::registry_url`] or, failing
/// that, from `registry.url` of the supplied [`Config`].
#[derive(Debug, Default)]
pub struct ReglsBuilder {
    registry_url: Option<String>,
    config: Option<Config>,
    options: Option<ListOptions>,
}

impl ReglsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the registry URL.
    pub fn registry_url(mut self, url: &str) -> Self {
        self.registry_url = Some(url.to_string());
        self
    }

    /// Uses `config` for network settings and as a URL fallback.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the listing options. Without them the concurrency comes from the
    /// config and everything else is default.
    pub fn with_options(mut self, options: ListOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Builds the [`Regls`] instance.
    pub fn build(self) -> Result<Regls> {
        let config = self.config.unwrap_or_default();

        let registry_url = self
            .registry_url
            .or_else(|| config.registry.url.clone())
            .filter(|url| !url.trim().is_empty())
            .ok_or_else(|| RegistryError::missing_argument("registry URL"))?;

        let client = RegistryClient::with_config(&registry_url, config.client_config())?;
        let options = self
            .options
            .unwrap_or_else(|| ListOptions::new().with_concurrency(config.network.concurrency));

        Ok(Regls {
            resolver: TagResolver::new(client.clone()),
            aggregator: Aggregator::new(client.clone(), options),
            client,
        })
    }
}
